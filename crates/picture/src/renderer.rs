//! Picture renderers
//!
//! The host asks a [`PictureRenderer`] for a bitmap whenever a slot's
//! content key changes.

use dtext_escape::parse_segments;
use dtext_layout::{measure_and_align, LayoutOptions, TextRunStyle};
use dtext_render::{
    Background, ColorTheme, Compositor, DefaultTheme, GlyphSource, IconSource, NoIcons,
    RenderedPicture, SimpleGlyphs,
};

use crate::slot::PictureSlot;

/// Strategy producing bitmaps for generated pictures
pub trait PictureRenderer {
    /// Bitmap for the slot, `None` when the slot holds no generated text
    fn render(&mut self, slot: &PictureSlot) -> Option<RenderedPicture>;
}

/// Renders resolved text with layout and the compositor
pub struct TextPictureRenderer<G: GlyphSource> {
    glyphs: G,
    theme: Box<dyn ColorTheme>,
    icons: Box<dyn IconSource>,
    base_style: TextRunStyle,
}

impl<G: GlyphSource> TextPictureRenderer<G> {
    pub fn new(glyphs: G) -> Self {
        Self {
            glyphs,
            theme: Box::new(DefaultTheme),
            icons: Box::new(NoIcons),
            base_style: TextRunStyle::default(),
        }
    }

    pub fn with_theme(mut self, theme: impl ColorTheme + 'static) -> Self {
        self.theme = Box::new(theme);
        self
    }

    pub fn with_icons(mut self, icons: impl IconSource + 'static) -> Self {
        self.icons = Box::new(icons);
        self
    }

    pub fn with_base_style(mut self, style: TextRunStyle) -> Self {
        self.base_style = style;
        self
    }

    /// Render a resolved display string
    pub fn render_text(
        &mut self,
        text: &str,
        options: LayoutOptions,
        background: Option<&Background>,
    ) -> RenderedPicture {
        let segments = parse_segments(text);
        let layout = measure_and_align(&segments, &self.base_style, options, &mut self.glyphs);
        let mut compositor =
            Compositor::new(&mut self.glyphs, self.theme.as_ref(), self.icons.as_ref());
        compositor.render(&segments, &layout, &self.base_style, background)
    }
}

impl Default for TextPictureRenderer<SimpleGlyphs> {
    fn default() -> Self {
        Self::new(SimpleGlyphs::new())
    }
}

impl<G: GlyphSource> PictureRenderer for TextPictureRenderer<G> {
    fn render(&mut self, slot: &PictureSlot) -> Option<RenderedPicture> {
        let info = slot.display_info()?;
        let text = slot.rendered_text()?;
        let options = LayoutOptions {
            align: info.align,
            declared_width: None,
        };
        let background = info.background();
        let picture = self.render_text(text, options, background.as_ref());
        log::debug!(
            "Rendered picture {} at {}x{}",
            slot.id(),
            picture.width(),
            picture.height()
        );
        Some(picture)
    }
}
