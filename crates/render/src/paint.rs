//! Paint primitives
//!
//! Colors, tones and pixel blending.

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Color for rendering (RGBA)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RenderColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Check if color is fully transparent
    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Parse a color token
    ///
    /// Accepts color names, `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`,
    /// `rgb(r, g, b)` and `rgba(r, g, b, a)` with alpha in `0..=1`.
    pub fn parse(value: &str) -> RenderResult<Self> {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();

        let parsed = if let Some(hex) = lower.strip_prefix('#') {
            Self::from_hex(hex)
        } else if let Some(args) = function_args(&lower, "rgba") {
            Self::from_components(args, true)
        } else if let Some(args) = function_args(&lower, "rgb") {
            Self::from_components(args, false)
        } else {
            Self::from_name(&lower)
        };

        parsed.ok_or_else(|| RenderError::invalid_color(trimmed))
    }

    /// Parse a hex color string (without #)
    pub fn from_hex(hex: &str) -> Option<Self> {
        if !hex.is_ascii() {
            return None;
        }
        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 => Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            4 => Some(Self::new(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?)),
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }

    /// Look up a named color
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name {
            "transparent" => Self::transparent(),
            "black" => Self::rgb(0, 0, 0),
            "white" => Self::rgb(255, 255, 255),
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "lime" => Self::rgb(0, 255, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "cyan" | "aqua" => Self::rgb(0, 255, 255),
            "magenta" | "fuchsia" => Self::rgb(255, 0, 255),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "silver" => Self::rgb(192, 192, 192),
            "maroon" => Self::rgb(128, 0, 0),
            "olive" => Self::rgb(128, 128, 0),
            "navy" => Self::rgb(0, 0, 128),
            "purple" => Self::rgb(128, 0, 128),
            "teal" => Self::rgb(0, 128, 128),
            "orange" => Self::rgb(255, 165, 0),
            "gold" => Self::rgb(255, 215, 0),
            "pink" => Self::rgb(255, 192, 203),
            "hotpink" => Self::rgb(255, 105, 180),
            "brown" => Self::rgb(165, 42, 42),
            "crimson" => Self::rgb(220, 20, 60),
            "coral" => Self::rgb(255, 127, 80),
            "tomato" => Self::rgb(255, 99, 71),
            "salmon" => Self::rgb(250, 128, 114),
            "khaki" => Self::rgb(240, 230, 140),
            "violet" => Self::rgb(238, 130, 238),
            "indigo" => Self::rgb(75, 0, 130),
            "skyblue" => Self::rgb(135, 206, 235),
            "royalblue" => Self::rgb(65, 105, 225),
            "steelblue" => Self::rgb(70, 130, 180),
            "darkblue" => Self::rgb(0, 0, 139),
            "darkgreen" => Self::rgb(0, 100, 0),
            "darkred" => Self::rgb(139, 0, 0),
            "darkgray" | "darkgrey" => Self::rgb(169, 169, 169),
            "lightgray" | "lightgrey" => Self::rgb(211, 211, 211),
            "dimgray" | "dimgrey" => Self::rgb(105, 105, 105),
            "ivory" => Self::rgb(255, 255, 240),
            "beige" => Self::rgb(245, 245, 220),
            _ => return None,
        };
        Some(color)
    }

    fn from_components(args: &str, with_alpha: bool) -> Option<Self> {
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        let expected = if with_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return None;
        }

        let channel = |part: &str| -> Option<u8> {
            let value: f32 = part.parse().ok()?;
            Some(value.clamp(0.0, 255.0).round() as u8)
        };
        let alpha = match parts.get(3) {
            Some(part) => {
                let value: f32 = part.parse().ok()?;
                (value.clamp(0.0, 1.0) * 255.0).round() as u8
            }
            None => 255,
        };

        Some(Self::new(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha,
        ))
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, self.a])
    }
}

impl From<Rgba<u8>> for RenderColor {
    fn from(pixel: Rgba<u8>) -> Self {
        let [r, g, b, a] = pixel.0;
        Self::new(r, g, b, a)
    }
}

impl Default for RenderColor {
    fn default() -> Self {
        Self::black()
    }
}

/// Argument list of `name(...)`, if `value` has that form
fn function_args<'a>(value: &'a str, name: &str) -> Option<&'a str> {
    value
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// Color adjustment applied by the host when compositing a picture
///
/// Channels range over `-255..=255`, gray over `0..=255`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorTone {
    pub red: i16,
    pub green: i16,
    pub blue: i16,
    pub gray: i16,
}

impl ColorTone {
    /// No adjustment
    pub const NEUTRAL: ColorTone = ColorTone {
        red: 0,
        green: 0,
        blue: 0,
        gray: 0,
    };

    pub fn new(red: i16, green: i16, blue: i16, gray: i16) -> Self {
        Self {
            red,
            green,
            blue,
            gray,
        }
    }

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }
}

/// Source-over blend of `color` at `coverage` (0..=255) onto `dst`
pub fn blend_pixel(dst: &mut Rgba<u8>, color: RenderColor, coverage: u8) {
    let src_a = color.a as f32 * coverage as f32 / (255.0 * 255.0);
    if src_a <= 0.0 {
        return;
    }
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    let mix = |src: u8, dst: u8| -> u8 {
        let value = (src as f32 * src_a + dst as f32 * dst_a * (1.0 - src_a)) / out_a;
        value.round().clamp(0.0, 255.0) as u8
    };

    *dst = Rgba([
        mix(color.r, dst[0]),
        mix(color.g, dst[1]),
        mix(color.b, dst[2]),
        (out_a * 255.0).round() as u8,
    ]);
}
