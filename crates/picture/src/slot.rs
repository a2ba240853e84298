//! Picture slots
//!
//! Per-id picture state: the host picture parameters, the text snapshot taken
//! when a text picture is shown, and the cursor overlay.

use dtext_escape::GameState;
use dtext_layout::{Align, Rect};
use dtext_render::{Background, ColorTone, RenderColor};
use serde::{Deserialize, Serialize};

use crate::refresh::{IdentityToken, RefreshState};
use crate::settings::TextSettings;

/// Point of the picture placed at its position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Origin {
    #[default]
    UpperLeft,
    Center,
}

impl Origin {
    /// Anchor as fractions of the picture size
    pub fn anchor(&self) -> (f32, f32) {
        match self {
            Origin::UpperLeft => (0.0, 0.0),
            Origin::Center => (0.5, 0.5),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlendMode {
    #[default]
    Normal,
    Additive,
    Multiply,
    Screen,
}

/// Host picture parameters given to "show picture"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PictureParams {
    /// Picture file; empty to show prepared text
    pub name: String,
    pub origin: Origin,
    pub x: f32,
    pub y: f32,
    /// Percent
    pub scale_x: f32,
    /// Percent
    pub scale_y: f32,
    pub opacity: u8,
    pub blend_mode: BlendMode,
    pub tone: ColorTone,
}

impl Default for PictureParams {
    fn default() -> Self {
        Self {
            name: String::new(),
            origin: Origin::UpperLeft,
            x: 0.0,
            y: 0.0,
            scale_x: 100.0,
            scale_y: 100.0,
            opacity: 255,
            blend_mode: BlendMode::Normal,
            tone: ColorTone::NEUTRAL,
        }
    }
}

impl PictureParams {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn scaled(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    /// Scale as factors
    pub fn scale(&self) -> (f32, f32) {
        (self.scale_x / 100.0, self.scale_y / 100.0)
    }
}

/// Settings snapshot of a text picture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayInfo {
    /// Prefix plus prepared text, re-resolved on refresh
    pub source_text: String,
    pub background_color: Option<String>,
    pub real_time: bool,
    pub show_frame: bool,
    pub gradient_left: u32,
    pub gradient_right: u32,
    pub align: Option<Align>,
}

impl DisplayInfo {
    pub fn capture(source_text: String, settings: &TextSettings) -> Self {
        Self {
            source_text,
            background_color: settings.background_color.clone(),
            real_time: settings.real_time,
            show_frame: settings.show_frame,
            gradient_left: settings.gradient_left,
            gradient_right: settings.gradient_right,
            align: settings.align,
        }
    }

    /// Background to paint, `None` when unset or unparsable
    pub fn background(&self) -> Option<Background> {
        let token = self.background_color.as_deref()?;
        match RenderColor::parse(token) {
            Ok(color) => Some(
                Background::solid(color).with_gradients(self.gradient_left, self.gradient_right),
            ),
            Err(e) => {
                log::warn!("Background: {}", e);
                None
            }
        }
    }
}

/// Cursor overlay on a frame panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorState {
    /// Zero width or height means the panel's content size
    pub rect: Rect,
    /// Switch that activates the cursor; `None` for always active
    pub activate_switch: Option<usize>,
}

impl CursorState {
    pub fn new(rect: Rect, switch_id: usize) -> Self {
        Self {
            rect,
            activate_switch: (switch_id > 0).then_some(switch_id),
        }
    }

    pub fn is_active(&self, state: &dyn GameState) -> bool {
        self.activate_switch.map_or(true, |id| state.switch(id))
    }
}

/// What a sprite shows for a slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKey {
    /// A picture file
    File(String),
    /// A generated text bitmap
    Text(IdentityToken),
}

/// State of one picture id
#[derive(Debug, Clone, Default)]
pub struct PictureSlot {
    pub(crate) id: usize,
    pub(crate) picture: Option<PictureParams>,
    pub(crate) display_info: Option<DisplayInfo>,
    pub(crate) rendered_text: Option<String>,
    pub(crate) identity: Option<IdentityToken>,
    pub(crate) cursor: Option<CursorState>,
    pub(crate) refresh: RefreshState,
}

impl PictureSlot {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn picture(&self) -> Option<&PictureParams> {
        self.picture.as_ref()
    }

    /// Mutable picture parameters, for hosts that move or fade pictures
    pub fn picture_mut(&mut self) -> Option<&mut PictureParams> {
        self.picture.as_mut()
    }

    pub fn display_info(&self) -> Option<&DisplayInfo> {
        self.display_info.as_ref()
    }

    /// Last resolved display string
    pub fn rendered_text(&self) -> Option<&str> {
        self.rendered_text.as_deref()
    }

    pub fn identity(&self) -> Option<IdentityToken> {
        self.identity
    }

    pub fn cursor(&self) -> Option<&CursorState> {
        self.cursor.as_ref()
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.refresh
    }

    pub fn is_empty(&self) -> bool {
        self.picture.is_none()
    }

    pub fn is_text(&self) -> bool {
        self.display_info.is_some()
    }

    /// Key identifying the current content; changes whenever it must be reloaded
    pub fn content_key(&self) -> Option<ContentKey> {
        let picture = self.picture.as_ref()?;
        match self.identity {
            Some(token) if self.display_info.is_some() => Some(ContentKey::Text(token)),
            _ => Some(ContentKey::File(picture.name.clone())),
        }
    }

    /// Drop everything, including the cursor
    pub(crate) fn clear(&mut self) {
        *self = Self::new(self.id);
    }
}
