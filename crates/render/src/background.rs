//! Picture backgrounds
//!
//! A solid fill with optional transparent fades at either edge.

use image::RgbaImage;

use crate::paint::RenderColor;

/// Background of a text picture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background {
    pub color: RenderColor,
    /// Width of the fade-in at the left edge
    pub gradient_left: u32,
    /// Width of the fade-out at the right edge
    pub gradient_right: u32,
}

impl Background {
    pub fn solid(color: RenderColor) -> Self {
        Self {
            color,
            gradient_left: 0,
            gradient_right: 0,
        }
    }

    pub fn with_gradients(mut self, left: u32, right: u32) -> Self {
        self.gradient_left = left;
        self.gradient_right = right;
        self
    }
}

/// Fill `bitmap` with `background`
///
/// The left fade is painted first and the right fade second, so the right
/// one wins where they overlap. Ramps span their full width even when part
/// of it falls outside the bitmap.
pub fn paint_background(bitmap: &mut RgbaImage, background: &Background) {
    let color = background.color;
    for pixel in bitmap.pixels_mut() {
        *pixel = color.to_rgba();
    }

    let width = bitmap.width() as i64;

    let left = background.gradient_left;
    if left > 0 {
        for step in 0..left {
            let ramp = (step as f32 + 0.5) / left as f32;
            fill_column(bitmap, step as i64, color.with_alpha(scale_alpha(color.a, ramp)));
        }
    }

    let right = background.gradient_right;
    if right > 0 {
        let start = width - right as i64;
        for step in 0..right {
            let ramp = 1.0 - (step as f32 + 0.5) / right as f32;
            fill_column(bitmap, start + step as i64, color.with_alpha(scale_alpha(color.a, ramp)));
        }
    }
}

fn scale_alpha(alpha: u8, ramp: f32) -> u8 {
    (alpha as f32 * ramp).round().clamp(0.0, 255.0) as u8
}

/// Replace one column; columns outside the bitmap are skipped
fn fill_column(bitmap: &mut RgbaImage, x: i64, color: RenderColor) {
    if x < 0 || x >= bitmap.width() as i64 {
        return;
    }
    let x = x as u32;
    for y in 0..bitmap.height() {
        bitmap.put_pixel(x, y, color.to_rgba());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alphas(bitmap: &RgbaImage) -> Vec<u8> {
        (0..bitmap.width()).map(|x| bitmap.get_pixel(x, 0)[3]).collect()
    }

    #[test]
    fn test_solid_fill() {
        let mut bitmap = RgbaImage::new(4, 2);
        let color = RenderColor::new(10, 20, 30, 200);
        paint_background(&mut bitmap, &Background::solid(color));
        assert!(bitmap.pixels().all(|p| p.0 == [10, 20, 30, 200]));
    }

    #[test]
    fn test_left_gradient() {
        let mut bitmap = RgbaImage::new(6, 1);
        let background = Background::solid(RenderColor::rgb(255, 0, 0)).with_gradients(4, 0);
        paint_background(&mut bitmap, &background);
        // 255 * 0.125, 0.375, 0.625, 0.875
        assert_eq!(alphas(&bitmap), vec![32, 96, 159, 223, 255, 255]);
        assert_eq!(bitmap.get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_overlapping_gradients_right_wins() {
        let mut bitmap = RgbaImage::new(10, 3);
        let color = RenderColor::rgb(0, 0, 255);
        let background = Background::solid(color).with_gradients(6, 6);
        paint_background(&mut bitmap, &background);

        // Left ramp on 0..4, right ramp on 4..10
        assert_eq!(alphas(&bitmap), vec![21, 64, 106, 149, 234, 191, 149, 106, 64, 21]);
        for pixel in bitmap.pixels() {
            assert_eq!(&pixel.0[..3], &[0, 0, 255]);
        }
    }

    #[test]
    fn test_gradient_wider_than_bitmap() {
        let mut bitmap = RgbaImage::new(2, 1);
        let background = Background::solid(RenderColor::white()).with_gradients(0, 4);
        paint_background(&mut bitmap, &background);
        // Ramp starts at x = -2; only its last two columns are visible
        assert_eq!(alphas(&bitmap), vec![96, 32]);
    }

    #[test]
    fn test_gradient_scales_fill_alpha() {
        let mut bitmap = RgbaImage::new(2, 1);
        let background =
            Background::solid(RenderColor::new(0, 0, 0, 100)).with_gradients(2, 0);
        paint_background(&mut bitmap, &background);
        assert_eq!(alphas(&bitmap), vec![25, 75]);
    }
}
