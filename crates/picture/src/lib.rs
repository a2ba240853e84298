//! dtext Pictures
//!
//! Picture slots, text picture commands, live refresh and the host-side
//! sprites that turn slots into bitmaps and frame panels.

mod assets;
mod chrome;
mod config;
mod error;
mod refresh;
mod renderer;
mod settings;
mod slot;
mod sprite;
mod subsystem;

pub use assets::{AssetLoader, DirectoryAssets, NoAssets};
pub use chrome::{FrameChrome, FrameWindow, SceneGraph, SpriteGeometry, WindowSkin};
pub use config::{TextPictureConfig, DEFAULT_FRAME_PADDING, DEFAULT_MAX_PICTURES};
pub use error::{PictureError, PictureResult};
pub use refresh::{IdentityToken, RefreshState, TokenCounter};
pub use renderer::{PictureRenderer, TextPictureRenderer};
pub use settings::{TextSettings, TextSettingsUpdate};
pub use slot::{BlendMode, ContentKey, CursorState, DisplayInfo, Origin, PictureParams, PictureSlot};
pub use sprite::{PanelSet, PictureLayer, PictureSprite, SpriteContext};
pub use subsystem::{PendingText, TextPictureSubsystem};
