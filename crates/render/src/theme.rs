//! Color themes
//!
//! Indexed text colors used by `\C[n]` and numeric `\OC[n]`.

use image::RgbaImage;

use crate::paint::RenderColor;

/// Source of indexed text colors
pub trait ColorTheme {
    /// Text color for a palette index
    fn text_color(&self, index: u32) -> RenderColor;

    /// Outline color used when no `\OC` is in effect
    fn outline_color(&self) -> RenderColor {
        default_outline_color()
    }
}

/// `rgba(0, 0, 0, 0.6)`
pub fn default_outline_color() -> RenderColor {
    RenderColor::new(0, 0, 0, 153)
}

/// Number of colors in a palette
pub const PALETTE_SIZE: usize = 32;

/// Stock palette
const DEFAULT_PALETTE: [(u8, u8, u8); PALETTE_SIZE] = [
    (0xff, 0xff, 0xff),
    (0x20, 0xa0, 0xd6),
    (0xff, 0x78, 0x4c),
    (0x66, 0xcc, 0x40),
    (0x99, 0xcc, 0xff),
    (0xcc, 0xc0, 0xff),
    (0xff, 0xff, 0xa0),
    (0x80, 0x80, 0x80),
    (0xc0, 0xc0, 0xc0),
    (0x20, 0x80, 0xcc),
    (0xff, 0x38, 0x10),
    (0x00, 0xa0, 0x10),
    (0x3e, 0x9a, 0xde),
    (0xa0, 0x98, 0xff),
    (0xff, 0xcc, 0x20),
    (0x00, 0x00, 0x00),
    (0x84, 0xaa, 0xff),
    (0xff, 0xff, 0x40),
    (0xff, 0x20, 0x20),
    (0x20, 0x20, 0x40),
    (0xe0, 0x80, 0x40),
    (0xf0, 0xc0, 0x40),
    (0x40, 0x80, 0xc0),
    (0x40, 0xc0, 0xf0),
    (0x80, 0xff, 0x80),
    (0xc0, 0x80, 0x80),
    (0x80, 0x80, 0xff),
    (0xff, 0x80, 0xff),
    (0x00, 0xa0, 0x40),
    (0x00, 0xe0, 0x60),
    (0xa0, 0x60, 0xe0),
    (0xc0, 0x80, 0xff),
];

/// Built-in 32 color palette; index 0 is white
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTheme;

impl ColorTheme for DefaultTheme {
    fn text_color(&self, index: u32) -> RenderColor {
        let (r, g, b) = DEFAULT_PALETTE[index as usize % PALETTE_SIZE];
        RenderColor::rgb(r, g, b)
    }
}

/// Palette read from a window skin image
///
/// The skin stores its text colors as 12 px swatches in a 8 x 4 grid starting
/// at (96, 144). The center of every swatch is sampled.
#[derive(Debug, Clone)]
pub struct SkinTheme {
    colors: Vec<RenderColor>,
}

impl SkinTheme {
    const ORIGIN_X: u32 = 96;
    const ORIGIN_Y: u32 = 144;
    const SWATCH: u32 = 12;

    /// Sample the palette from a skin; `None` when the image is too small
    pub fn from_skin(skin: &RgbaImage) -> Option<Self> {
        let needed_width = Self::ORIGIN_X + Self::SWATCH * 8;
        let needed_height = Self::ORIGIN_Y + Self::SWATCH * 4;
        if skin.width() < needed_width || skin.height() < needed_height {
            return None;
        }

        let colors = (0..PALETTE_SIZE as u32)
            .map(|index| {
                let x = Self::ORIGIN_X + (index % 8) * Self::SWATCH + Self::SWATCH / 2;
                let y = Self::ORIGIN_Y + (index / 8) * Self::SWATCH + Self::SWATCH / 2;
                RenderColor::from(*skin.get_pixel(x, y)).with_alpha(255)
            })
            .collect();

        Some(Self { colors })
    }
}

impl ColorTheme for SkinTheme {
    fn text_color(&self, index: u32) -> RenderColor {
        self.colors[index as usize % self.colors.len()]
    }
}
