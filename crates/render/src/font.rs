//! Font rendering
//!
//! Glyph sources for the compositor. `FontCache` rasterizes a TrueType font
//! with fontdue; `SimpleGlyphs` draws solid blocks at the fixed advance of
//! `SimpleTextMeasurer`.

use std::path::Path;

use dtext_layout::{SimpleTextMeasurer, TextMeasurer, TextRunStyle};
use fontdue::{Font, FontSettings};
use rustc_hash::FxHashMap;

use crate::error::{RenderError, RenderResult};

/// Measurer that can also hand out glyph bitmaps
pub trait GlyphSource: TextMeasurer {
    /// Rasterize a character at a given size
    fn rasterize(&mut self, c: char, size: f32) -> &GlyphData;

    /// Distance from the top of a line box to the baseline
    fn ascent(&self, size: f32) -> f32;
}

/// Extra advance per character for faux bold
fn bold_extra(style: &TextRunStyle) -> f32 {
    if style.bold {
        1.0
    } else {
        0.0
    }
}

/// Key for cached glyphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GlyphKey {
    character: char,
    size_tenths: u32, // Font size * 10 to avoid float hashing
}

impl GlyphKey {
    fn new(character: char, size: f32) -> Self {
        Self {
            character,
            size_tenths: (size * 10.0) as u32,
        }
    }
}

/// Cached glyph bitmap data
#[derive(Debug, Clone, Default)]
pub struct GlyphData {
    pub width: u32,
    pub height: u32,
    /// Coverage, one byte per pixel, row major
    pub bitmap: Vec<u8>,
    pub advance_width: f32,
    pub offset_x: i32,
    pub offset_y: i32,
}

/// Cache for rendered glyphs
pub struct FontCache {
    font: Font,
    glyph_cache: FxHashMap<GlyphKey, GlyphData>,
}

impl FontCache {
    /// Create a font cache from font data
    pub fn from_bytes(data: &[u8]) -> RenderResult<Self> {
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| RenderError::Font(e.to_string()))?;

        Ok(Self {
            font,
            glyph_cache: FxHashMap::default(),
        })
    }

    /// Load a font file
    pub fn from_path(path: impl AsRef<Path>) -> RenderResult<Self> {
        let data = std::fs::read(path.as_ref())?;
        let cache = Self::from_bytes(&data)?;
        log::debug!("Loaded font {}", path.as_ref().display());
        Ok(cache)
    }

    /// Measure the width of a string
    pub fn measure_text(&mut self, text: &str, size: f32) -> f32 {
        text.chars()
            .map(|c| self.rasterize(c, size).advance_width)
            .sum()
    }

    /// Number of cached glyphs
    pub fn cached_glyphs(&self) -> usize {
        self.glyph_cache.len()
    }
}

impl TextMeasurer for FontCache {
    fn text_width(&mut self, text: &str, style: &TextRunStyle) -> f32 {
        let extra = bold_extra(style) * text.chars().count() as f32;
        self.measure_text(text, style.font_size) + extra
    }
}

impl GlyphSource for FontCache {
    fn rasterize(&mut self, c: char, size: f32) -> &GlyphData {
        let font = &self.font;
        self.glyph_cache
            .entry(GlyphKey::new(c, size))
            .or_insert_with(|| {
                let (metrics, bitmap) = font.rasterize(c, size);
                GlyphData {
                    width: metrics.width as u32,
                    height: metrics.height as u32,
                    bitmap,
                    advance_width: metrics.advance_width,
                    offset_x: metrics.xmin,
                    offset_y: metrics.ymin,
                }
            })
    }

    fn ascent(&self, size: f32) -> f32 {
        match self.font.horizontal_line_metrics(size) {
            Some(m) => m.ascent,
            None => size * 0.8,
        }
    }
}

/// Block glyphs with the advance of `SimpleTextMeasurer`
///
/// Used when no font is available. Whitespace is blank; every other
/// character is a solid box sitting on the baseline.
#[derive(Debug, Default)]
pub struct SimpleGlyphs {
    glyph_cache: FxHashMap<GlyphKey, GlyphData>,
}

impl SimpleGlyphs {
    pub fn new() -> Self {
        Self::default()
    }

    fn block(c: char, size: f32) -> GlyphData {
        let advance_width = size * 3.0 / 5.0;
        if c.is_whitespace() || c.is_control() {
            return GlyphData {
                advance_width,
                ..GlyphData::default()
            };
        }

        let width = ((advance_width.floor() as u32).saturating_sub(2)).max(1);
        let height = ((size * 0.7).round() as u32).max(1);
        GlyphData {
            width,
            height,
            bitmap: vec![255; width as usize * height as usize],
            advance_width,
            offset_x: 1,
            offset_y: 0,
        }
    }
}

impl TextMeasurer for SimpleGlyphs {
    fn text_width(&mut self, text: &str, style: &TextRunStyle) -> f32 {
        SimpleTextMeasurer.text_width(text, style)
    }
}

impl GlyphSource for SimpleGlyphs {
    fn rasterize(&mut self, c: char, size: f32) -> &GlyphData {
        self.glyph_cache
            .entry(GlyphKey::new(c, size))
            .or_insert_with(|| Self::block(c, size))
    }

    fn ascent(&self, size: f32) -> f32 {
        size * 0.8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_from_invalid_bytes() {
        let result = FontCache::from_bytes(b"not a font");
        assert!(matches!(result, Err(RenderError::Font(_))));
    }

    #[test]
    fn test_font_from_missing_path() {
        let result = FontCache::from_path("/nonexistent/font.ttf");
        assert!(matches!(result, Err(RenderError::Io(_))));
    }

    #[test]
    fn test_simple_glyph_block() {
        let mut glyphs = SimpleGlyphs::new();
        let glyph = glyphs.rasterize('A', 20.0);
        assert_eq!(glyph.advance_width, 12.0);
        assert_eq!(glyph.width, 10);
        assert_eq!(glyph.height, 14);
        assert_eq!(glyph.bitmap.len(), 140);
        assert!(glyph.bitmap.iter().all(|&a| a == 255));
    }

    #[test]
    fn test_simple_glyph_space_is_blank() {
        let mut glyphs = SimpleGlyphs::new();
        let glyph = glyphs.rasterize(' ', 20.0);
        assert_eq!(glyph.width, 0);
        assert!(glyph.bitmap.is_empty());
        assert_eq!(glyph.advance_width, 12.0);
    }

    #[test]
    fn test_simple_glyphs_match_measurer() {
        let mut glyphs = SimpleGlyphs::new();
        let style = TextRunStyle::default().with_font_size(20.0);
        let measured = glyphs.text_width("abc", &style);
        let advanced: f32 = "abc"
            .chars()
            .map(|c| glyphs.rasterize(c, 20.0).advance_width)
            .sum();
        assert_eq!(measured, advanced);
    }

    #[test]
    fn test_glyph_caching() {
        let mut glyphs = SimpleGlyphs::new();

        glyphs.rasterize('X', 20.0);
        assert_eq!(glyphs.glyph_cache.len(), 1);

        glyphs.rasterize('X', 20.0);
        assert_eq!(glyphs.glyph_cache.len(), 1);

        // Different size should add new entry
        glyphs.rasterize('X', 24.0);
        assert_eq!(glyphs.glyph_cache.len(), 2);
    }
}
