//! Text run style
//!
//! Formatting state threaded through measurement and drawing. Each directive
//! produces a new style value; nothing is mutated in place.

use dtext_escape::{ColorRef, Directive, FontStyle};

/// Font size used when nothing else is specified
pub const DEFAULT_FONT_SIZE: f32 = 26.0;

/// Default outline stroke width in pixels
pub const DEFAULT_OUTLINE_WIDTH: f32 = 3.0;

/// Largest font size a directive can select
pub const MAX_FONT_SIZE: f32 = 512.0;

/// Largest outline stroke a directive can select
pub const MAX_OUTLINE_WIDTH: f32 = 64.0;

/// `\{` only grows fonts up to this size
const MAX_BIGGER_FONT_SIZE: f32 = 96.0;

/// `\}` only shrinks fonts from this size
const MIN_SMALLER_FONT_SIZE: f32 = 24.0;

/// Step applied by `\{` and `\}`
const FONT_SIZE_STEP: f32 = 12.0;

/// Formatting of a run of text
#[derive(Debug, Clone, PartialEq)]
pub struct TextRunStyle {
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
    /// Fill color
    pub text_color: ColorRef,
    /// Outline color, `None` for the theme default
    pub outline_color: Option<ColorRef>,
    pub outline_width: f32,
}

impl Default for TextRunStyle {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            bold: false,
            italic: false,
            text_color: ColorRef::Index(0),
            outline_color: None,
            outline_width: DEFAULT_OUTLINE_WIDTH,
        }
    }
}

impl TextRunStyle {
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size.clamp(1.0, MAX_FONT_SIZE);
        self
    }

    /// Style after applying a directive
    pub fn apply(&self, directive: &Directive) -> Self {
        let mut next = self.clone();
        match directive {
            Directive::TextColor(index) => next.text_color = ColorRef::Index(*index),
            Directive::FontSize(size) => next.font_size = (*size as f32).clamp(1.0, MAX_FONT_SIZE),
            Directive::FontBigger => {
                if next.font_size <= MAX_BIGGER_FONT_SIZE {
                    next.font_size += FONT_SIZE_STEP;
                }
            }
            Directive::FontSmaller => {
                if next.font_size >= MIN_SMALLER_FONT_SIZE {
                    next.font_size -= FONT_SIZE_STEP;
                }
            }
            Directive::OutlineColor(color) => next.outline_color = Some(color.clone()),
            Directive::OutlineWidth(width) => {
                next.outline_width = (*width as f32).min(MAX_OUTLINE_WIDTH)
            }
            Directive::FontStyle(FontStyle::Bold) => next.bold = true,
            Directive::FontStyle(FontStyle::Italic) => next.italic = true,
            Directive::FontStyle(FontStyle::Normal) => {
                next.bold = false;
                next.italic = false;
            }
            _ => {}
        }
        next
    }
}
