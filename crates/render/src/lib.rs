//! dtext Render Engine
//!
//! Colors, glyph sources, bitmap compositing and display list rasterization.

mod backend;
mod background;
mod compositor;
mod display_list;
mod error;
mod font;
mod icon;
mod paint;
mod theme;

pub use backend::ImageBackend;
pub use background::{paint_background, Background};
pub use compositor::{Compositor, RenderedPicture, ITALIC_SHEAR, MAX_BITMAP_SIZE};
pub use display_list::{BorderWidths, DisplayList, PaintCommand};
pub use error::{RenderError, RenderResult};
pub use font::{FontCache, GlyphData, GlyphSource, SimpleGlyphs};
pub use icon::{IconSheet, IconSource, NoIcons};
pub use paint::{blend_pixel, ColorTone, RenderColor};
pub use theme::{default_outline_color, ColorTheme, DefaultTheme, SkinTheme, PALETTE_SIZE};

/// Trait for render backends
pub trait RenderBackend {
    /// Clear the canvas with a color
    fn clear(&mut self, color: RenderColor);

    /// Execute a display list
    fn render(&mut self, display_list: &DisplayList);

    /// Finish the current frame
    fn present(&mut self);

    /// Get the canvas width
    fn width(&self) -> u32;

    /// Get the canvas height
    fn height(&self) -> u32;
}
