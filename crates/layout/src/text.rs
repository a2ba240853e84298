//! Text Measurement
//!
//! Interface for measuring text runs.

use crate::style::TextRunStyle;

/// Trait for measuring text
pub trait TextMeasurer {
    /// Advance width of a run of text drawn with `style`
    fn text_width(&mut self, text: &str, style: &TextRunStyle) -> f32;
}

/// Fixed-ratio text measurer
///
/// Used when no font is loaded. Every character is 3/5 of the font size
/// wide, plus one pixel when bold.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleTextMeasurer;

impl SimpleTextMeasurer {
    pub fn new() -> Self {
        Self
    }

    /// Advance of a single character
    pub fn char_advance(style: &TextRunStyle) -> f32 {
        let bold_extra = if style.bold { 1.0 } else { 0.0 };
        style.font_size * 3.0 / 5.0 + bold_extra
    }
}

impl TextMeasurer for SimpleTextMeasurer {
    fn text_width(&mut self, text: &str, style: &TextRunStyle) -> f32 {
        text.chars().count() as f32 * Self::char_advance(style)
    }
}

/// Measure text width using the simple measurer
pub fn measure_text_width(text: &str, style: &TextRunStyle) -> f32 {
    SimpleTextMeasurer::new().text_width(text, style)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_measurement() {
        let style = TextRunStyle::default().with_font_size(20.0);
        // 5 chars * 12 = 60
        assert!((measure_text_width("Hello", &style) - 60.0).abs() < 0.01);
    }

    #[test]
    fn test_bold_is_wider() {
        let style = TextRunStyle::default();
        let bold = TextRunStyle {
            bold: true,
            ..TextRunStyle::default()
        };
        let plain = measure_text_width("abc", &style);
        let heavy = measure_text_width("abc", &bold);
        assert!((heavy - plain - 3.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_text() {
        let style = TextRunStyle::default();
        assert_eq!(measure_text_width("", &style), 0.0);
    }
}
