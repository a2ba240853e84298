//! Picture sprites
//!
//! A [`PictureSprite`] is the host-side view of one slot. It reloads its
//! bitmap whenever the slot's content key changes, follows the slot's
//! transform, and drives the slot's frame panel. [`PictureLayer`] holds one
//! sprite per slot and the set of attached panels.

use dtext_escape::GameState;
use dtext_layout::Rect;
use dtext_render::{ColorTone, DisplayList, PaintCommand};
use image::RgbaImage;
use rustc_hash::FxHashSet;

use crate::assets::AssetLoader;
use crate::chrome::{FrameChrome, SceneGraph, SpriteGeometry, WindowSkin};
use crate::config::TextPictureConfig;
use crate::renderer::PictureRenderer;
use crate::slot::{ContentKey, PictureSlot};
use crate::subsystem::TextPictureSubsystem;

/// Host collaborators needed for a sprite update
pub struct SpriteContext<'a> {
    pub renderer: &'a mut dyn PictureRenderer,
    pub assets: &'a mut dyn AssetLoader,
    pub scene: &'a mut dyn SceneGraph,
    pub state: &'a dyn GameState,
    pub frame_count: u64,
}

#[derive(Debug)]
pub struct PictureSprite {
    slot_id: usize,
    skin_name: Option<String>,
    skin: Option<WindowSkin>,
    content: Option<ContentKey>,
    bitmap: Option<RgbaImage>,
    tone: ColorTone,
    geometry: SpriteGeometry,
    chrome: FrameChrome,
}

impl PictureSprite {
    pub fn new(slot_id: usize, config: &TextPictureConfig) -> Self {
        Self {
            slot_id,
            skin_name: config.frame_window_skin.clone(),
            skin: None,
            content: None,
            bitmap: None,
            tone: ColorTone::NEUTRAL,
            geometry: SpriteGeometry {
                x: 0.0,
                y: 0.0,
                anchor: (0.0, 0.0),
                width: 0,
                height: 0,
                scale: (1.0, 1.0),
                opacity: 255,
                visible: false,
                text_origin: false,
            },
            chrome: FrameChrome::new(slot_id, config.frame_window_padding),
        }
    }

    pub fn slot_id(&self) -> usize {
        self.slot_id
    }

    pub fn bitmap(&self) -> Option<&RgbaImage> {
        self.bitmap.as_ref()
    }

    pub fn tone(&self) -> ColorTone {
        self.tone
    }

    pub fn geometry(&self) -> &SpriteGeometry {
        &self.geometry
    }

    pub fn chrome(&self) -> &FrameChrome {
        &self.chrome
    }

    pub fn is_visible(&self) -> bool {
        self.geometry.visible
    }

    /// Per-frame sync with the slot
    pub fn update(&mut self, slot: &PictureSlot, ctx: &mut SpriteContext<'_>) {
        let key = slot.content_key();
        if key != self.content {
            self.reload(slot, key.as_ref(), ctx);
            self.content = key;
        }

        match slot.picture() {
            Some(params) => {
                let geometry = &mut self.geometry;
                geometry.x = params.x;
                geometry.y = params.y;
                geometry.anchor = params.origin.anchor();
                geometry.scale = params.scale();
                geometry.opacity = params.opacity;
                geometry.visible = self.bitmap.is_some();
                geometry.text_origin = slot.is_text();
            }
            None => {
                self.geometry.visible = false;
                self.geometry.text_origin = false;
            }
        }

        self.chrome.update(
            &self.geometry,
            slot.cursor(),
            ctx.state,
            ctx.frame_count,
            ctx.scene,
        );
    }

    fn reload(&mut self, slot: &PictureSlot, key: Option<&ContentKey>, ctx: &mut SpriteContext<'_>) {
        self.bitmap = None;
        self.tone = ColorTone::NEUTRAL;

        match key {
            None => self.chrome.release(ctx.scene),
            Some(ContentKey::Text(token)) => {
                log::debug!("Picture {} loading text bitmap {}", self.slot_id, token);
                if let Some(picture) = ctx.renderer.render(slot) {
                    self.tone = picture.tone;
                    self.bitmap = Some(picture.bitmap);
                }
                self.rebuild_chrome(slot, ctx);
            }
            Some(ContentKey::File(name)) => {
                if let Some(params) = slot.picture() {
                    self.tone = params.tone;
                }
                if name.is_empty() {
                    return;
                }
                match ctx.assets.load_picture(name) {
                    Ok(bitmap) => self.bitmap = Some(bitmap),
                    Err(e) => log::warn!("Picture {}: {}", self.slot_id, e),
                }
            }
        }

        let (width, height) = self.bitmap.as_ref().map_or((0, 0), |b| b.dimensions());
        self.geometry.width = width;
        self.geometry.height = height;
    }

    fn rebuild_chrome(&mut self, slot: &PictureSlot, ctx: &mut SpriteContext<'_>) {
        self.chrome.release(ctx.scene);

        let show_frame = slot.display_info().map_or(false, |info| info.show_frame);
        let (Some(bitmap), Some(params), true) = (self.bitmap.as_ref(), slot.picture(), show_frame) else {
            return;
        };

        let skin = match self.skin {
            Some(skin) => skin,
            None => {
                let skin = WindowSkin::load(ctx.assets, self.skin_name.as_deref());
                self.skin = Some(skin);
                skin
            }
        };
        let (scale_x, scale_y) = params.scale();
        self.chrome.build(
            bitmap.width() as f32 * scale_x,
            bitmap.height() as f32 * scale_y,
            skin,
            ctx.scene,
        );
    }

    /// Screen rectangle covered by the bitmap
    pub fn bounds(&self) -> Rect {
        let g = &self.geometry;
        let width = g.width as f32 * g.scale.0;
        let height = g.height as f32 * g.scale.1;
        Rect::new(g.x - g.anchor.0 * width, g.y - g.anchor.1 * height, width, height)
    }

    /// Panel (when attached) followed by the bitmap
    pub fn display_list(&self) -> DisplayList {
        let mut list = DisplayList::new();
        if !self.geometry.visible {
            return list;
        }

        if self.chrome.is_attached() {
            if let Some(window) = self.chrome.window() {
                list.extend(window.display_list());
            }
        }

        if let Some(bitmap) = &self.bitmap {
            list.push(PaintCommand::DrawImage {
                rect: self.bounds(),
                pixels: bitmap.clone(),
                opacity: self.geometry.opacity,
            });
        }
        list
    }
}

/// Panels currently inserted in the scene
#[derive(Debug, Default)]
pub struct PanelSet {
    attached: FxHashSet<usize>,
}

impl PanelSet {
    pub fn contains(&self, slot: usize) -> bool {
        self.attached.contains(&slot)
    }

    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }
}

impl SceneGraph for PanelSet {
    fn attach_panel(&mut self, slot: usize) -> bool {
        self.attached.insert(slot);
        true
    }

    fn detach_panel(&mut self, slot: usize) {
        self.attached.remove(&slot);
    }
}

/// One sprite per slot, drawn in slot order
#[derive(Debug)]
pub struct PictureLayer {
    sprites: Vec<PictureSprite>,
    panels: PanelSet,
}

impl PictureLayer {
    pub fn new(subsystem: &TextPictureSubsystem) -> Self {
        let sprites = subsystem
            .slots()
            .map(|slot| PictureSprite::new(slot.id(), subsystem.config()))
            .collect();
        Self {
            sprites,
            panels: PanelSet::default(),
        }
    }

    pub fn sprite(&self, id: usize) -> Option<&PictureSprite> {
        id.checked_sub(1).and_then(|index| self.sprites.get(index))
    }

    pub fn panels(&self) -> &PanelSet {
        &self.panels
    }

    pub fn update(
        &mut self,
        subsystem: &TextPictureSubsystem,
        renderer: &mut dyn PictureRenderer,
        assets: &mut dyn AssetLoader,
        state: &dyn GameState,
        frame_count: u64,
    ) {
        let mut ctx = SpriteContext {
            renderer,
            assets,
            scene: &mut self.panels,
            state,
            frame_count,
        };
        for (sprite, slot) in self.sprites.iter_mut().zip(subsystem.slots()) {
            sprite.update(slot, &mut ctx);
        }
    }

    pub fn display_list(&self) -> DisplayList {
        let mut list = DisplayList::new();
        for sprite in &self.sprites {
            list.extend(sprite.display_list());
        }
        list
    }
}
