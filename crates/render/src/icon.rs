//! Icons drawn by `\I[n]`

use dtext_layout::ICON_SIZE;
use image::{imageops, RgbaImage};

/// Source of icon images
pub trait IconSource {
    /// Icon for an index, `None` when there is none
    fn icon(&self, index: u32) -> Option<RgbaImage>;
}

/// Icon source without any icons
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIcons;

impl IconSource for NoIcons {
    fn icon(&self, _index: u32) -> Option<RgbaImage> {
        None
    }
}

/// Icons cut from a sheet of 32 x 32 cells, 16 per row
pub struct IconSheet {
    sheet: RgbaImage,
}

impl IconSheet {
    pub const COLUMNS: u32 = 16;

    pub fn new(sheet: RgbaImage) -> Self {
        Self { sheet }
    }

    /// Number of complete cells in the sheet
    pub fn len(&self) -> u32 {
        (self.sheet.width() / ICON_SIZE).min(Self::COLUMNS) * (self.sheet.height() / ICON_SIZE)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IconSource for IconSheet {
    fn icon(&self, index: u32) -> Option<RgbaImage> {
        if index >= self.len() {
            return None;
        }
        let x = (index % Self::COLUMNS) * ICON_SIZE;
        let y = (index / Self::COLUMNS) * ICON_SIZE;
        Some(imageops::crop_imm(&self.sheet, x, y, ICON_SIZE, ICON_SIZE).to_image())
    }
}
