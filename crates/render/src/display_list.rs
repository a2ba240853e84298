//! Display List
//!
//! Paint commands for panels and composed frames.

use dtext_layout::Rect;
use image::RgbaImage;

use crate::paint::RenderColor;

/// A display list of paint commands
#[derive(Debug, Default, Clone)]
pub struct DisplayList {
    pub commands: Vec<PaintCommand>,
}

/// A paint command
#[derive(Debug, Clone)]
pub enum PaintCommand {
    /// Fill a rectangle with a solid color
    FillRect { rect: Rect, color: RenderColor },
    /// Draw a border (outline of rectangle)
    DrawBorder {
        rect: Rect,
        widths: BorderWidths,
        color: RenderColor,
    },
    /// Draw an image, scaled to the rect when sizes differ
    DrawImage {
        rect: Rect,
        pixels: RgbaImage,
        /// 0..=255
        opacity: u8,
    },
}

/// Border widths for all four sides
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BorderWidths {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl BorderWidths {
    /// Same width on every side
    pub fn uniform(width: f32) -> Self {
        Self {
            top: width,
            right: width,
            bottom: width,
            left: width,
        }
    }
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: PaintCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Append all commands of `other`
    pub fn extend(&mut self, other: DisplayList) {
        self.commands.extend(other.commands);
    }

    /// Shift every command by `(dx, dy)`
    pub fn translate(&mut self, dx: f32, dy: f32) {
        for command in &mut self.commands {
            let rect = match command {
                PaintCommand::FillRect { rect, .. }
                | PaintCommand::DrawBorder { rect, .. }
                | PaintCommand::DrawImage { rect, .. } => rect,
            };
            rect.x += dx;
            rect.y += dy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_list_new() {
        let list = DisplayList::new();
        assert!(list.is_empty());
    }

    #[test]
    fn test_display_list_push() {
        let mut list = DisplayList::new();
        list.push(PaintCommand::FillRect {
            rect: Rect::new(0.0, 0.0, 100.0, 100.0),
            color: RenderColor::black(),
        });
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_translate() {
        let mut list = DisplayList::new();
        list.push(PaintCommand::DrawBorder {
            rect: Rect::new(1.0, 2.0, 10.0, 10.0),
            widths: BorderWidths::uniform(1.0),
            color: RenderColor::white(),
        });
        list.translate(10.0, -2.0);
        match &list.commands[0] {
            PaintCommand::DrawBorder { rect, .. } => {
                assert_eq!(*rect, Rect::new(11.0, 0.0, 10.0, 10.0))
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_extend() {
        let mut first = DisplayList::new();
        first.push(PaintCommand::FillRect {
            rect: Rect::default(),
            color: RenderColor::black(),
        });
        let mut second = DisplayList::new();
        second.push(PaintCommand::FillRect {
            rect: Rect::default(),
            color: RenderColor::white(),
        });
        first.extend(second);
        assert_eq!(first.len(), 2);
    }
}
