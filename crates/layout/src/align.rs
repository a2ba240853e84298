//! Line Layout
//!
//! Measures resolved text line by line and computes horizontal offsets for
//! alignment. Offsets depend on the widest line, so every line is measured
//! before any offset is assigned.

use std::fmt;
use std::str::FromStr;

use dtext_escape::{Directive, Segment};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::style::TextRunStyle;
use crate::text::TextMeasurer;

/// Extra height added to the largest font size of a line
pub const LINE_SPACING: f32 = 10.0;

/// Icon edge length in pixels
pub const ICON_SIZE: u32 = 32;

/// Horizontal space taken by one icon
pub const ICON_ADVANCE: f32 = ICON_SIZE as f32 + 4.0;

/// Horizontal alignment of lines within the bitmap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown alignment '{0}' (expected left, center or right)")]
pub struct ParseAlignError(pub String);

impl FromStr for Align {
    type Err = ParseAlignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Align::Left),
            "center" => Ok(Align::Center),
            "right" => Ok(Align::Right),
            _ => Err(ParseAlignError(s.to_string())),
        }
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        };
        f.write_str(name)
    }
}

/// Layout request options
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutOptions {
    /// `None` keeps every line flush left
    pub align: Option<Align>,
    /// Width to align within; never smaller than the widest line
    pub declared_width: Option<f32>,
}

/// Placement of one line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLayout {
    /// Top edge, relative to the bitmap
    pub top: f32,
    pub height: f32,
    /// Measured content width
    pub width: f32,
    /// Horizontal start of the line
    pub offset_x: f32,
    /// Largest font size in effect on the line
    pub font_size: f32,
}

/// Result of laying out a text
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub width: u32,
    pub height: u32,
    pub lines: Vec<LineLayout>,
}

impl TextLayout {
    /// Per-line horizontal offsets
    pub fn offsets(&self) -> Vec<f32> {
        self.lines.iter().map(|line| line.offset_x).collect()
    }
}

/// Measure `segments` and align each line
pub fn measure_and_align(
    segments: &[Segment],
    base: &TextRunStyle,
    options: LayoutOptions,
    measurer: &mut dyn TextMeasurer,
) -> TextLayout {
    let mut lines = measure_lines(segments, base, measurer);

    let content_width = lines.iter().map(|line| line.width).fold(0.0, f32::max);
    let box_width = options
        .declared_width
        .map_or(content_width, |declared| declared.max(content_width));

    for line in &mut lines {
        line.offset_x = match options.align {
            Some(Align::Center) => ((box_width - line.width) / 2.0).floor(),
            Some(Align::Right) => box_width - line.width,
            Some(Align::Left) | None => 0.0,
        };
    }

    let height = lines.last().map_or(0.0, |line| line.top + line.height);
    log::trace!(
        "Laid out {} line(s) in {}x{}",
        lines.len(),
        box_width,
        height
    );

    TextLayout {
        width: box_width.ceil() as u32,
        height: height.ceil() as u32,
        lines,
    }
}

/// First pass: width and height of every line
fn measure_lines(
    segments: &[Segment],
    base: &TextRunStyle,
    measurer: &mut dyn TextMeasurer,
) -> Vec<LineLayout> {
    let mut lines = Vec::new();
    let mut style = base.clone();
    let mut top = 0.0;
    let mut width = 0.0;
    let mut font_size = style.font_size;

    for segment in segments {
        match segment {
            Segment::Text(text) => width += measurer.text_width(text, &style),
            Segment::Directive(Directive::Icon(_)) => width += ICON_ADVANCE,
            Segment::Directive(directive) => {
                style = style.apply(directive);
                font_size = f32::max(font_size, style.font_size);
            }
            Segment::Newline => {
                let line = finish_line(top, width, font_size);
                top += line.height;
                lines.push(line);
                width = 0.0;
                font_size = style.font_size;
            }
        }
    }
    lines.push(finish_line(top, width, font_size));

    lines
}

fn finish_line(top: f32, width: f32, font_size: f32) -> LineLayout {
    LineLayout {
        top,
        height: font_size + LINE_SPACING,
        width,
        offset_x: 0.0,
        font_size,
    }
}
