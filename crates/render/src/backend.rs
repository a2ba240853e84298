//! Image Render Backend
//!
//! Rasterizes display lists into an in-memory RGBA canvas.

use std::path::Path;

use image::{imageops, RgbaImage};

use crate::display_list::{DisplayList, PaintCommand};
use crate::error::RenderResult;
use crate::paint::{blend_pixel, RenderColor};
use crate::RenderBackend;

/// Offscreen canvas backend
pub struct ImageBackend {
    canvas: RgbaImage,
    frames: u64,
}

impl ImageBackend {
    /// Create a transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::new(width.max(1), height.max(1)),
            frames: 0,
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }

    /// Number of frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Write the canvas to disk; the format follows the extension
    pub fn save(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        self.canvas.save(path.as_ref())?;
        log::info!("Wrote {}", path.as_ref().display());
        Ok(())
    }

    /// Draw a filled rectangle
    fn draw_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: RenderColor) {
        if color.is_transparent() {
            return;
        }
        let x0 = x.max(0) as u32;
        let y0 = y.max(0) as u32;
        let x1 = (x.saturating_add(w as i32)).clamp(0, self.canvas.width() as i32) as u32;
        let y1 = (y.saturating_add(h as i32)).clamp(0, self.canvas.height() as i32) as u32;

        for py in y0..y1 {
            for px in x0..x1 {
                blend_pixel(self.canvas.get_pixel_mut(px, py), color, 255);
            }
        }
    }

    /// Draw a border (four rectangles)
    #[allow(clippy::too_many_arguments)]
    fn draw_border(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        top: f32,
        right: f32,
        bottom: f32,
        left: f32,
        color: RenderColor,
    ) {
        let x = x as i32;
        let y = y as i32;
        let w = w as u32;
        let h = h as u32;

        // Top border
        if top > 0.0 {
            self.draw_rect(x, y, w, top as u32, color);
        }

        // Bottom border
        if bottom > 0.0 {
            self.draw_rect(x, y + h as i32 - bottom as i32, w, bottom as u32, color);
        }

        // Left border, between top and bottom
        if left > 0.0 {
            let inner = h.saturating_sub(top as u32 + bottom as u32);
            self.draw_rect(x, y + top as i32, left as u32, inner, color);
        }

        // Right border, between top and bottom
        if right > 0.0 {
            let inner = h.saturating_sub(top as u32 + bottom as u32);
            self.draw_rect(x + w as i32 - right as i32, y + top as i32, right as u32, inner, color);
        }
    }

    /// Draw an image, resizing it to `w x h` when needed
    fn draw_image(&mut self, pixels: &RgbaImage, x: i32, y: i32, w: u32, h: u32, opacity: u8) {
        if w == 0 || h == 0 || opacity == 0 {
            return;
        }

        let mut source = if pixels.dimensions() == (w, h) {
            pixels.clone()
        } else {
            imageops::resize(pixels, w, h, imageops::FilterType::Nearest)
        };

        if opacity < 255 {
            for pixel in source.pixels_mut() {
                pixel[3] = ((pixel[3] as u32 * opacity as u32) / 255) as u8;
            }
        }

        imageops::overlay(&mut self.canvas, &source, x as i64, y as i64);
    }
}

impl RenderBackend for ImageBackend {
    fn clear(&mut self, color: RenderColor) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = color.to_rgba();
        }
    }

    fn render(&mut self, display_list: &DisplayList) {
        for command in &display_list.commands {
            match command {
                PaintCommand::FillRect { rect, color } => {
                    self.draw_rect(
                        rect.x as i32,
                        rect.y as i32,
                        rect.width as u32,
                        rect.height as u32,
                        *color,
                    );
                }
                PaintCommand::DrawBorder { rect, widths, color } => {
                    self.draw_border(
                        rect.x,
                        rect.y,
                        rect.width,
                        rect.height,
                        widths.top,
                        widths.right,
                        widths.bottom,
                        widths.left,
                        *color,
                    );
                }
                PaintCommand::DrawImage {
                    rect,
                    pixels,
                    opacity,
                } => {
                    self.draw_image(
                        pixels,
                        rect.x as i32,
                        rect.y as i32,
                        rect.width as u32,
                        rect.height as u32,
                        *opacity,
                    );
                }
            }
        }
    }

    fn present(&mut self) {
        self.frames += 1;
        log::trace!("Presented frame {}", self.frames);
    }

    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display_list::BorderWidths;
    use dtext_layout::Rect;
    use image::Rgba;

    #[test]
    fn test_clear() {
        let mut backend = ImageBackend::new(4, 4);
        backend.clear(RenderColor::rgb(1, 2, 3));
        assert!(backend.image().pixels().all(|p| p.0 == [1, 2, 3, 255]));
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut backend = ImageBackend::new(10, 10);
        let mut list = DisplayList::new();
        list.push(PaintCommand::FillRect {
            rect: Rect::new(-5.0, 8.0, 20.0, 20.0),
            color: RenderColor::white(),
        });
        backend.render(&list);

        let image = backend.image();
        assert_eq!(image.get_pixel(0, 7)[3], 0);
        assert_eq!(*image.get_pixel(0, 8), Rgba([255, 255, 255, 255]));
        assert_eq!(*image.get_pixel(9, 9), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_border_leaves_inside_empty() {
        let mut backend = ImageBackend::new(10, 10);
        let mut list = DisplayList::new();
        list.push(PaintCommand::DrawBorder {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            widths: BorderWidths::uniform(2.0),
            color: RenderColor::rgb(255, 0, 0),
        });
        backend.render(&list);

        let image = backend.image();
        assert_eq!(image.get_pixel(0, 5)[0], 255);
        assert_eq!(image.get_pixel(9, 5)[0], 255);
        assert_eq!(image.get_pixel(5, 1)[0], 255);
        assert_eq!(image.get_pixel(5, 5)[3], 0);
    }

    #[test]
    fn test_draw_image_scaled_with_opacity() {
        let mut backend = ImageBackend::new(8, 8);
        let mut list = DisplayList::new();
        list.push(PaintCommand::DrawImage {
            rect: Rect::new(2.0, 2.0, 4.0, 4.0),
            pixels: RgbaImage::from_pixel(2, 2, Rgba([0, 0, 255, 255])),
            opacity: 255,
        });
        list.push(PaintCommand::DrawImage {
            rect: Rect::new(0.0, 0.0, 1.0, 1.0),
            pixels: RgbaImage::from_pixel(1, 1, Rgba([0, 255, 0, 255])),
            opacity: 0,
        });
        backend.render(&list);

        let image = backend.image();
        assert_eq!(*image.get_pixel(2, 2), Rgba([0, 0, 255, 255]));
        assert_eq!(*image.get_pixel(5, 5), Rgba([0, 0, 255, 255]));
        assert_eq!(image.get_pixel(6, 6)[3], 0);
        assert_eq!(image.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_present_counts_frames() {
        let mut backend = ImageBackend::new(1, 1);
        backend.present();
        backend.present();
        assert_eq!(backend.frames(), 2);
        assert_eq!((backend.width(), backend.height()), (1, 1));
    }
}
