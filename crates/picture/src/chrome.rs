//! Frame chrome
//!
//! A bordered panel drawn behind a text picture, with an optional cursor.
//! The panel follows its sprite every frame and is torn down as soon as the
//! sprite is hidden or stops showing text.

use dtext_escape::GameState;
use dtext_layout::Rect;
use dtext_render::{BorderWidths, DisplayList, PaintCommand, RenderColor};
use image::RgbaImage;

use crate::assets::AssetLoader;
use crate::slot::CursorState;

/// Border thickness of the panel
const BORDER_WIDTH: f32 = 2.0;

/// Inset of the background inside the border
const BACKGROUND_INSET: f32 = 2.0;

/// Host scene graph that holds frame panels
pub trait SceneGraph {
    /// Insert the panel of `slot` just below its sprite
    ///
    /// Returns `false` while the sprite is not in the scene yet.
    fn attach_panel(&mut self, slot: usize) -> bool;

    /// Remove the panel of `slot`
    fn detach_panel(&mut self, slot: usize);
}

/// Colors of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSkin {
    pub background: RenderColor,
    pub border: RenderColor,
    pub cursor: RenderColor,
}

impl Default for WindowSkin {
    fn default() -> Self {
        Self {
            background: RenderColor::new(0, 0, 32, 192),
            border: RenderColor::white(),
            cursor: RenderColor::new(255, 255, 255, 96),
        }
    }
}

impl WindowSkin {
    /// Required skin image size
    pub const SIZE: u32 = 192;

    /// Derive panel colors from a window skin image
    ///
    /// The background is the average of the top-left quadrant, the border the
    /// average of the frame quadrant and the cursor the average of the cursor
    /// cell below it.
    pub fn from_image(skin: &RgbaImage) -> Option<Self> {
        if skin.width() < Self::SIZE || skin.height() < Self::SIZE {
            return None;
        }
        Some(Self {
            background: average_color(skin, 0, 0, 96, 96)?,
            border: average_color(skin, 96, 0, 96, 96)?,
            cursor: average_color(skin, 96, 96, 48, 48)?,
        })
    }

    /// Load a skin by name; falls back to the default look
    pub fn load(assets: &mut dyn AssetLoader, name: Option<&str>) -> Self {
        let Some(name) = name.filter(|name| !name.is_empty()) else {
            return Self::default();
        };
        match assets.load_system(name) {
            Ok(image) => Self::from_image(&image).unwrap_or_else(|| {
                log::warn!("Window skin '{}' is too small, using the default", name);
                Self::default()
            }),
            Err(e) => {
                log::warn!("Failed to load window skin '{}': {}", name, e);
                Self::default()
            }
        }
    }
}

/// Average of the visible pixels of a region; alpha averages all pixels
fn average_color(image: &RgbaImage, x: u32, y: u32, width: u32, height: u32) -> Option<RenderColor> {
    let mut sums = [0u64; 3];
    let mut alpha = 0u64;
    let mut visible = 0u64;

    for py in y..y + height {
        for px in x..x + width {
            let pixel = image.get_pixel(px, py);
            alpha += pixel[3] as u64;
            if pixel[3] > 0 {
                visible += 1;
                for (sum, channel) in sums.iter_mut().zip(pixel.0.iter()) {
                    *sum += *channel as u64;
                }
            }
        }
    }

    let total = width as u64 * height as u64;
    if total == 0 {
        return None;
    }
    let channel = |sum: u64| if visible == 0 { 0 } else { (sum / visible) as u8 };
    Some(RenderColor::new(
        channel(sums[0]),
        channel(sums[1]),
        channel(sums[2]),
        (alpha / total) as u8,
    ))
}

/// A bordered panel
#[derive(Debug, Clone, PartialEq)]
pub struct FrameWindow {
    pub x: f32,
    pub y: f32,
    width: u32,
    height: u32,
    padding: u32,
    pub opacity: u8,
    /// Inactive cursors are drawn dimmed
    pub active: bool,
    cursor_rect: Rect,
    skin: WindowSkin,
}

impl FrameWindow {
    pub fn new(width: u32, height: u32, padding: u32, skin: WindowSkin) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            padding,
            opacity: 255,
            active: true,
            cursor_rect: Rect::default(),
            skin,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    pub fn skin(&self) -> &WindowSkin {
        &self.skin
    }

    /// Move and resize
    pub fn move_to(&mut self, x: f32, y: f32, width: u32, height: u32) {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
    }

    pub fn contents_width(&self) -> u32 {
        self.width.saturating_sub(self.padding * 2)
    }

    pub fn contents_height(&self) -> u32 {
        self.height.saturating_sub(self.padding * 2)
    }

    /// Cursor rect relative to the contents area
    pub fn set_cursor_rect(&mut self, rect: Rect) {
        self.cursor_rect = rect;
    }

    pub fn cursor_rect(&self) -> Rect {
        self.cursor_rect
    }

    fn faded(&self, color: RenderColor) -> RenderColor {
        color.with_alpha((color.a as u32 * self.opacity as u32 / 255) as u8)
    }

    /// Paint commands for the panel at its current position
    pub fn display_list(&self) -> DisplayList {
        let mut list = DisplayList::new();
        let bounds = Rect::new(self.x, self.y, self.width as f32, self.height as f32);

        let background = bounds.inset(BACKGROUND_INSET);
        if !background.is_empty() {
            list.push(PaintCommand::FillRect {
                rect: background,
                color: self.faded(self.skin.background),
            });
        }

        list.push(PaintCommand::DrawBorder {
            rect: bounds,
            widths: BorderWidths::uniform(BORDER_WIDTH),
            color: self.faded(self.skin.border),
        });

        if !self.cursor_rect.is_empty() {
            let padding = self.padding as f32;
            let cursor = Rect::new(
                self.x + padding + self.cursor_rect.x,
                self.y + padding + self.cursor_rect.y,
                self.cursor_rect.width,
                self.cursor_rect.height,
            );
            let mut color = self.faded(self.skin.cursor);
            if !self.active {
                color = color.with_alpha(color.a / 2);
            }
            list.push(PaintCommand::FillRect {
                rect: cursor,
                color,
            });
            list.push(PaintCommand::DrawBorder {
                rect: cursor,
                widths: BorderWidths::uniform(1.0),
                color: color.with_alpha(color.a.saturating_mul(2)),
            });
        }

        list
    }
}

/// Geometry of the sprite a panel follows
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteGeometry {
    pub x: f32,
    pub y: f32,
    pub anchor: (f32, f32),
    /// Unscaled bitmap size
    pub width: u32,
    pub height: u32,
    pub scale: (f32, f32),
    pub opacity: u8,
    pub visible: bool,
    /// The sprite currently shows generated text
    pub text_origin: bool,
}

/// Panel lifecycle for one picture slot
#[derive(Debug)]
pub struct FrameChrome {
    slot: usize,
    padding: u32,
    window: Option<FrameWindow>,
    attached: bool,
}

impl FrameChrome {
    pub fn new(slot: usize, padding: u32) -> Self {
        Self {
            slot,
            padding,
            window: None,
            attached: false,
        }
    }

    pub fn window(&self) -> Option<&FrameWindow> {
        self.window.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Replace the panel with one sized for a bitmap of `scaled_width x scaled_height`
    pub fn build(&mut self, scaled_width: f32, scaled_height: f32, skin: WindowSkin, scene: &mut dyn SceneGraph) {
        self.release(scene);
        let padding = self.padding;
        let width = (scaled_width + (padding * 2) as f32).floor() as u32;
        let height = (scaled_height + (padding * 2) as f32).floor() as u32;
        log::debug!("Frame panel for picture {}: {}x{}", self.slot, width, height);
        self.window = Some(FrameWindow::new(width, height, padding, skin));
    }

    /// Detach and drop the panel
    pub fn release(&mut self, scene: &mut dyn SceneGraph) {
        if self.attached {
            scene.detach_panel(self.slot);
            self.attached = false;
        }
        if self.window.take().is_some() {
            log::trace!("Released frame panel for picture {}", self.slot);
        }
    }

    /// Per-frame sync with the sprite
    pub fn update(
        &mut self,
        sprite: &SpriteGeometry,
        cursor: Option<&CursorState>,
        state: &dyn GameState,
        frame_count: u64,
        scene: &mut dyn SceneGraph,
    ) {
        let padding = self.padding as f32;
        match self.window.as_mut() {
            Some(window) => {
                window.x = sprite.x - sprite.anchor.0 * sprite.width as f32 * sprite.scale.0 - padding;
                window.y = sprite.y - sprite.anchor.1 * sprite.height as f32 * sprite.scale.1 - padding;
                window.opacity = sprite.opacity;
            }
            None => return,
        }

        if !sprite.visible || !sprite.text_origin {
            self.release(scene);
            return;
        }

        if !self.attached {
            self.attached = scene.attach_panel(self.slot);
        }

        let Some(window) = self.window.as_mut() else {
            return;
        };

        if frame_count % 2 == 0 {
            let width = (sprite.width as f32 * sprite.scale.0 + padding * 2.0).floor() as u32;
            let height = (sprite.height as f32 * sprite.scale.1 + padding * 2.0).floor() as u32;
            if window.width() != width || window.height() != height {
                log::trace!("Resized frame panel for picture {} to {}x{}", self.slot, width, height);
                let (x, y) = (window.x, window.y);
                window.move_to(x, y, width, height);
            }
        }

        match cursor {
            Some(cursor) => {
                let width = if cursor.rect.width > 0.0 {
                    cursor.rect.width
                } else {
                    window.contents_width() as f32
                };
                let height = if cursor.rect.height > 0.0 {
                    cursor.rect.height
                } else {
                    window.contents_height() as f32
                };
                window.set_cursor_rect(Rect::new(cursor.rect.x, cursor.rect.y, width, height));
                window.active = cursor.is_active(state);
            }
            None => window.set_cursor_rect(Rect::default()),
        }
    }
}
