//! Bitmap compositor
//!
//! Draws laid-out text into an offscreen RGBA bitmap.

use dtext_escape::{ColorRef, Directive, Segment};
use dtext_layout::{TextLayout, TextRunStyle, ICON_ADVANCE, LINE_SPACING};
use image::{imageops, RgbaImage};
use smallvec::SmallVec;

use crate::background::{paint_background, Background};
use crate::font::{GlyphData, GlyphSource};
use crate::icon::IconSource;
use crate::paint::{blend_pixel, ColorTone, RenderColor};
use crate::theme::ColorTheme;

/// Horizontal shift per pixel of height above the baseline for italics
pub const ITALIC_SHEAR: f32 = 0.2;

/// Largest bitmap side; ink past it is clipped
pub const MAX_BITMAP_SIZE: u32 = 8192;

/// Icons are inset by this much inside their cell
const ICON_INSET: i64 = 2;

/// A generated picture bitmap
#[derive(Debug, Clone)]
pub struct RenderedPicture {
    pub bitmap: RgbaImage,
    /// Tone the host should apply; text pictures are never tinted
    pub tone: ColorTone,
}

impl RenderedPicture {
    pub fn width(&self) -> u32 {
        self.bitmap.width()
    }

    pub fn height(&self) -> u32 {
        self.bitmap.height()
    }
}

/// Colors resolved for one text run
#[derive(Debug, Clone, Copy)]
struct RunColors {
    fill: RenderColor,
    outline: RenderColor,
}

/// Draws text pictures
pub struct Compositor<'a> {
    glyphs: &'a mut dyn GlyphSource,
    theme: &'a dyn ColorTheme,
    icons: &'a dyn IconSource,
}

impl<'a> Compositor<'a> {
    pub fn new(
        glyphs: &'a mut dyn GlyphSource,
        theme: &'a dyn ColorTheme,
        icons: &'a dyn IconSource,
    ) -> Self {
        Self {
            glyphs,
            theme,
            icons,
        }
    }

    /// Render segments placed by `layout`
    pub fn render(
        &mut self,
        segments: &[Segment],
        layout: &TextLayout,
        base: &TextRunStyle,
        background: Option<&Background>,
    ) -> RenderedPicture {
        let width = layout.width.clamp(1, MAX_BITMAP_SIZE);
        let height = layout.height.clamp(1, MAX_BITMAP_SIZE);
        if (width, height) != (layout.width.max(1), layout.height.max(1)) {
            log::warn!(
                "Picture of {}x{} clipped to {}x{}",
                layout.width,
                layout.height,
                width,
                height
            );
        }
        let mut bitmap = RgbaImage::new(width, height);
        if let Some(background) = background {
            paint_background(&mut bitmap, background);
        }

        let mut style = base.clone();
        let mut line_index = 0;
        let mut pen_x = layout.lines.first().map_or(0.0, |line| line.offset_x);

        for segment in segments {
            match segment {
                Segment::Text(text) => {
                    if let Some(line) = layout.lines.get(line_index) {
                        let baseline =
                            line.top + LINE_SPACING / 2.0 + self.glyphs.ascent(line.font_size);
                        pen_x = self.draw_run(&mut bitmap, text, pen_x, baseline, &style);
                    }
                }
                Segment::Directive(Directive::Icon(index)) => {
                    if let Some(line) = layout.lines.get(line_index) {
                        self.draw_icon(&mut bitmap, *index, pen_x, line.top);
                    }
                    pen_x += ICON_ADVANCE;
                }
                Segment::Directive(directive) => style = style.apply(directive),
                Segment::Newline => {
                    line_index += 1;
                    pen_x = layout.lines.get(line_index).map_or(0.0, |line| line.offset_x);
                }
            }
        }

        RenderedPicture {
            bitmap,
            tone: ColorTone::NEUTRAL,
        }
    }

    /// Draw one run of text; returns the pen position after it
    fn draw_run(
        &mut self,
        bitmap: &mut RgbaImage,
        text: &str,
        mut pen_x: f32,
        baseline: f32,
        style: &TextRunStyle,
    ) -> f32 {
        let colors = self.run_colors(style);
        let strikes: SmallVec<[i32; 2]> = if style.bold {
            SmallVec::from_slice(&[0, 1])
        } else {
            SmallVec::from_slice(&[0])
        };
        let shear = if style.italic { ITALIC_SHEAR } else { 0.0 };
        let outline_radius = (style.outline_width / 2.0).round() as i32;
        let bold_extra = if style.bold { 1.0 } else { 0.0 };
        let baseline_y = baseline.round() as i32;

        for c in text.chars() {
            let glyph = self.glyphs.rasterize(c, style.font_size);
            let origin_x = pen_x.round() as i32 + glyph.offset_x;
            let origin_y = baseline_y - glyph.offset_y - glyph.height as i32;
            let stamp = Stamp {
                glyph,
                baseline_y,
                shear,
            };

            if outline_radius > 0 && !colors.outline.is_transparent() {
                for dy in -outline_radius..=outline_radius {
                    for dx in -outline_radius..=outline_radius {
                        if (dx == 0 && dy == 0) || dx * dx + dy * dy > outline_radius * outline_radius {
                            continue;
                        }
                        for strike in &strikes {
                            stamp.draw(bitmap, origin_x + dx + strike, origin_y + dy, colors.outline);
                        }
                    }
                }
            }
            for strike in &strikes {
                stamp.draw(bitmap, origin_x + strike, origin_y, colors.fill);
            }

            pen_x += glyph.advance_width + bold_extra;
        }

        pen_x
    }

    fn draw_icon(&self, bitmap: &mut RgbaImage, index: u32, pen_x: f32, top: f32) {
        match self.icons.icon(index) {
            Some(icon) => {
                let x = pen_x.round() as i64 + ICON_INSET;
                let y = top.round() as i64 + ICON_INSET;
                imageops::overlay(bitmap, &icon, x, y);
            }
            None => log::debug!("No icon {}", index),
        }
    }

    fn run_colors(&self, style: &TextRunStyle) -> RunColors {
        let fill = self
            .color_ref(&style.text_color)
            .unwrap_or_else(|| self.theme.text_color(0));
        let outline = style
            .outline_color
            .as_ref()
            .and_then(|color| self.color_ref(color))
            .unwrap_or_else(|| self.theme.outline_color());
        RunColors { fill, outline }
    }

    fn color_ref(&self, color: &ColorRef) -> Option<RenderColor> {
        match color {
            ColorRef::Index(index) => Some(self.theme.text_color(*index)),
            ColorRef::Literal(value) => match RenderColor::parse(value) {
                Ok(color) => Some(color),
                Err(e) => {
                    log::warn!("{}, using the default", e);
                    None
                }
            },
        }
    }
}

/// A glyph ready to be stamped at several offsets
struct Stamp<'g> {
    glyph: &'g GlyphData,
    baseline_y: i32,
    shear: f32,
}

impl Stamp<'_> {
    fn draw(&self, bitmap: &mut RgbaImage, x: i32, y: i32, color: RenderColor) {
        let glyph = self.glyph;
        if glyph.width == 0 || glyph.height == 0 || glyph.bitmap.is_empty() {
            return;
        }

        let (bitmap_w, bitmap_h) = (bitmap.width() as i32, bitmap.height() as i32);
        for row in 0..glyph.height as i32 {
            let py = y + row;
            if py < 0 || py >= bitmap_h {
                continue;
            }
            let slant = (self.shear * (self.baseline_y - py) as f32).round() as i32;
            for col in 0..glyph.width as i32 {
                let px = x + col + slant;
                if px < 0 || px >= bitmap_w {
                    continue;
                }
                let index = (row * glyph.width as i32 + col) as usize;
                let coverage = match glyph.bitmap.get(index) {
                    Some(&coverage) if coverage > 0 => coverage,
                    _ => continue,
                };
                blend_pixel(bitmap.get_pixel_mut(px as u32, py as u32), color, coverage);
            }
        }
    }
}
