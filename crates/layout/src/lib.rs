//! dtext Layout Engine
//!
//! Text run styles, text measurement and line alignment.

mod align;
mod style;
mod text;

pub use align::{
    measure_and_align, Align, LayoutOptions, LineLayout, ParseAlignError, TextLayout, ICON_ADVANCE,
    ICON_SIZE, LINE_SPACING,
};
pub use style::{
    TextRunStyle, DEFAULT_FONT_SIZE, DEFAULT_OUTLINE_WIDTH, MAX_FONT_SIZE, MAX_OUTLINE_WIDTH,
};
pub use text::{measure_text_width, SimpleTextMeasurer, TextMeasurer};

/// A rectangle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check if a point is inside the rectangle
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Check if the rectangle covers no area
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Rectangle shrunk by `amount` on every side
    pub fn inset(&self, amount: f32) -> Rect {
        Rect {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - amount * 2.0).max(0.0),
            height: (self.height - amount * 2.0).max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(10.0, 10.0));
        assert!(rect.contains(29.9, 29.9));
        assert!(!rect.contains(30.0, 15.0));
    }

    #[test]
    fn test_rect_inset() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0).inset(18.0);
        assert_eq!(rect, Rect::new(18.0, 18.0, 64.0, 14.0));
        assert!(Rect::new(0.0, 0.0, 10.0, 10.0).inset(6.0).is_empty());
    }
}
