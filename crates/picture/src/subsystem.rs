//! Text picture subsystem
//!
//! Owns the configuration, the current settings, the pending prepared text
//! and every picture slot. Each public method corresponds to one host command.

use std::ops::RangeInclusive;

use dtext_escape::{GameState, Resolver};
use dtext_layout::Rect;

use crate::config::TextPictureConfig;
use crate::error::PictureResult;
use crate::refresh::{self, RefreshState, TokenCounter};
use crate::settings::{TextSettings, TextSettingsUpdate};
use crate::slot::{CursorState, DisplayInfo, PictureParams, PictureSlot};

/// Text waiting for the next "show picture" without a file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingText {
    pub text: String,
    /// 0 keeps the default size
    pub font_size: u32,
}

impl PendingText {
    /// Source text with the font size applied
    pub fn source(&self) -> String {
        if self.font_size > 0 {
            format!("\\FS[{}]{}", self.font_size, self.text)
        } else {
            self.text.clone()
        }
    }
}

/// State of the text picture feature
#[derive(Debug)]
pub struct TextPictureSubsystem {
    config: TextPictureConfig,
    settings: TextSettings,
    pending: Option<PendingText>,
    slots: Vec<PictureSlot>,
    tokens: TokenCounter,
}

impl TextPictureSubsystem {
    pub fn new(config: TextPictureConfig) -> Self {
        let slots = (1..=config.max_pictures).map(PictureSlot::new).collect();
        Self {
            config,
            settings: TextSettings::default(),
            pending: None,
            slots,
            tokens: TokenCounter::new(),
        }
    }

    pub fn config(&self) -> &TextPictureConfig {
        &self.config
    }

    pub fn settings(&self) -> &TextSettings {
        &self.settings
    }

    pub fn pending(&self) -> Option<&PendingText> {
        self.pending.as_ref()
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slot(&self, id: usize) -> Option<&PictureSlot> {
        self.index(id).map(|index| &self.slots[index])
    }

    pub fn slot_mut(&mut self, id: usize) -> Option<&mut PictureSlot> {
        self.index(id).map(move |index| &mut self.slots[index])
    }

    pub fn slots(&self) -> impl Iterator<Item = &PictureSlot> {
        self.slots.iter()
    }

    /// Resolver configured for this subsystem
    pub fn resolver<'a>(&self, state: &'a dyn GameState) -> Resolver<'a> {
        Resolver::new(state).with_config(self.config.resolver_config())
    }

    fn index(&self, id: usize) -> Option<usize> {
        (1..=self.slots.len()).contains(&id).then(|| id - 1)
    }

    /// Prepare text for the next "show picture" without a file name
    ///
    /// A later call replaces an earlier one.
    pub fn prepare_text(&mut self, text: impl Into<String>, font_size: u32) {
        let pending = PendingText {
            text: text.into(),
            font_size,
        };
        if pending.source().is_empty() {
            log::debug!("Ignoring empty prepared text");
            self.pending = None;
            return;
        }
        self.pending = Some(pending);
    }

    /// Change the settings given in `update`
    pub fn configure_text_settings(&mut self, update: &TextSettingsUpdate) {
        self.settings.apply(update);
        log::debug!("Text settings now {:?}", self.settings);
    }

    /// Set the cursor of a shown picture
    pub fn set_cursor(&mut self, id: usize, rect: Rect, switch_id: usize) {
        match self.slot_mut(id) {
            Some(slot) if !slot.is_empty() => slot.cursor = Some(CursorState::new(rect, switch_id)),
            _ => log::debug!("No picture {} to set a cursor on", id),
        }
    }

    /// Show a picture
    ///
    /// An empty name with prepared text pending shows that text; anything
    /// else shows the named file. The slot's previous content is dropped.
    pub fn show_picture(&mut self, id: usize, params: PictureParams, state: &dyn GameState) {
        let Some(index) = self.index(id) else {
            log::warn!("Picture id {} is out of range 1..={}", id, self.slots.len());
            return;
        };
        let resolver = Resolver::new(state).with_config(self.config.resolver_config());
        let slot = &mut self.slots[index];
        slot.clear();

        let pending = if params.name.is_empty() {
            self.pending.take()
        } else {
            None
        };
        slot.picture = Some(params);

        if let Some(pending) = pending {
            let source = format!("{}{}", self.config.prefix_text, pending.source());
            let info = DisplayInfo::capture(source, &self.settings);
            slot.refresh = if info.real_time {
                RefreshState::Live
            } else {
                RefreshState::Static
            };
            slot.display_info = Some(info);
            refresh::regenerate(slot, &resolver, &mut self.tokens);
        }
    }

    /// Erase one picture
    pub fn erase_picture(&mut self, id: usize) {
        match self.slot_mut(id) {
            Some(slot) => slot.clear(),
            None => log::debug!("Picture id {} is out of range", id),
        }
    }

    /// Erase every picture in `from..=to`
    ///
    /// `from <= 0` means the first slot and `to <= 0` the last one. A reversed
    /// range erases only `from`. Bounds are clamped to the slot range.
    pub fn erase_pictures_range(&mut self, from: i64, to: i64) -> RangeInclusive<usize> {
        let max = self.slots.len() as i64;
        if max == 0 {
            return RangeInclusive::new(1, 0);
        }

        let from = if from <= 0 { 1 } else { from };
        let mut to = if to <= 0 { max } else { to };
        if from > to {
            to = from;
        }
        let range = from.clamp(1, max) as usize..=to.clamp(1, max) as usize;

        for id in range.clone() {
            self.erase_picture(id);
        }
        log::debug!("Erased pictures {:?}", range);
        range
    }

    /// Per-frame live refresh of every slot
    pub fn update(&mut self, state: &dyn GameState) {
        let resolver = Resolver::new(state).with_config(self.config.resolver_config());
        for slot in &mut self.slots {
            refresh::tick(slot, &resolver, &mut self.tokens);
        }
    }

    /// Settings as JSON
    pub fn save_settings(&self) -> PictureResult<String> {
        self.settings.to_json()
    }

    /// Replace the settings from JSON
    pub fn load_settings(&mut self, json: &str) -> PictureResult<()> {
        self.settings = TextSettings::from_json(json)?;
        Ok(())
    }
}

impl Default for TextPictureSubsystem {
    fn default() -> Self {
        Self::new(TextPictureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtext_escape::GameSnapshot;
    use dtext_layout::Align;

    fn show_text(subsystem: &mut TextPictureSubsystem, id: usize, text: &str, state: &GameSnapshot) {
        subsystem.prepare_text(text, 0);
        subsystem.show_picture(id, PictureParams::default(), state);
    }

    #[test]
    fn test_slots_are_one_based() {
        let subsystem = TextPictureSubsystem::default();
        assert_eq!(subsystem.capacity(), 100);
        assert!(subsystem.slot(0).is_none());
        assert_eq!(subsystem.slot(1).unwrap().id(), 1);
        assert_eq!(subsystem.slot(100).unwrap().id(), 100);
        assert!(subsystem.slot(101).is_none());
    }

    #[test]
    fn test_prepare_with_font_size() {
        let mut subsystem = TextPictureSubsystem::default();
        let state = GameSnapshot::new();
        subsystem.prepare_text("Hello", 12);
        subsystem.show_picture(1, PictureParams::default(), &state);

        let slot = subsystem.slot(1).unwrap();
        assert!(slot.display_info().unwrap().source_text.starts_with("\\FS[12]"));
        assert_eq!(slot.rendered_text(), Some("\\FS[12]Hello"));
        assert!(subsystem.pending().is_none());
    }

    #[test]
    fn test_prepare_default_font_size() {
        let mut subsystem = TextPictureSubsystem::default();
        subsystem.prepare_text("Hello", 0);
        assert_eq!(subsystem.pending().unwrap().source(), "Hello");
    }

    #[test]
    fn test_last_prepare_wins() {
        let mut subsystem = TextPictureSubsystem::default();
        let state = GameSnapshot::new();
        subsystem.prepare_text("first", 0);
        subsystem.prepare_text("second", 0);
        subsystem.show_picture(5, PictureParams::default(), &state);
        assert_eq!(subsystem.slot(5).unwrap().rendered_text(), Some("second"));
    }

    #[test]
    fn test_prefix_text() {
        let config = TextPictureConfig {
            prefix_text: "\\C[2]".into(),
            ..TextPictureConfig::default()
        };
        let mut subsystem = TextPictureSubsystem::new(config);
        show_text(&mut subsystem, 1, "Hi", &GameSnapshot::new());
        assert_eq!(subsystem.slot(1).unwrap().display_info().unwrap().source_text, "\\C[2]Hi");
    }

    #[test]
    fn test_show_file_keeps_pending_text() {
        let mut subsystem = TextPictureSubsystem::default();
        let state = GameSnapshot::new();
        subsystem.prepare_text("later", 0);
        subsystem.show_picture(1, PictureParams::new("Castle"), &state);

        let slot = subsystem.slot(1).unwrap();
        assert!(!slot.is_text());
        assert!(slot.rendered_text().is_none());
        assert!(subsystem.pending().is_some());
    }

    #[test]
    fn test_show_empty_name_without_pending() {
        let mut subsystem = TextPictureSubsystem::default();
        subsystem.show_picture(1, PictureParams::default(), &GameSnapshot::new());
        let slot = subsystem.slot(1).unwrap();
        assert!(!slot.is_empty());
        assert!(!slot.is_text());
    }

    #[test]
    fn test_show_out_of_range_keeps_pending() {
        let mut subsystem = TextPictureSubsystem::default();
        subsystem.prepare_text("text", 0);
        subsystem.show_picture(0, PictureParams::default(), &GameSnapshot::new());
        subsystem.show_picture(101, PictureParams::default(), &GameSnapshot::new());
        assert!(subsystem.pending().is_some());
    }

    #[test]
    fn test_settings_are_snapshotted() {
        let mut subsystem = TextPictureSubsystem::default();
        let state = GameSnapshot::new();
        subsystem.configure_text_settings(&TextSettingsUpdate {
            align: Some(Align::Right),
            show_frame: Some(true),
            ..TextSettingsUpdate::default()
        });
        show_text(&mut subsystem, 1, "a", &state);

        subsystem.configure_text_settings(&TextSettingsUpdate {
            align: Some(Align::Left),
            ..TextSettingsUpdate::default()
        });

        let info = subsystem.slot(1).unwrap().display_info().unwrap();
        assert_eq!(info.align, Some(Align::Right));
        assert!(info.show_frame);
    }

    #[test]
    fn test_live_refresh() {
        let mut subsystem = TextPictureSubsystem::default();
        subsystem.configure_text_settings(&TextSettingsUpdate {
            real_time: Some(true),
            ..TextSettingsUpdate::default()
        });
        let mut state = GameSnapshot::new().with_variable(1, 1);
        show_text(&mut subsystem, 1, "\\V[1]", &state);
        let token = subsystem.slot(1).unwrap().identity();
        assert_eq!(subsystem.slot(1).unwrap().refresh_state(), RefreshState::Live);

        subsystem.update(&state);
        assert_eq!(subsystem.slot(1).unwrap().identity(), token);

        state.set_variable(1, 2);
        subsystem.update(&state);
        let slot = subsystem.slot(1).unwrap();
        assert_ne!(slot.identity(), token);
        assert_eq!(slot.rendered_text(), Some("2"));
    }

    #[test]
    fn test_static_picture_is_not_refreshed() {
        let mut subsystem = TextPictureSubsystem::default();
        let mut state = GameSnapshot::new().with_variable(1, 1);
        show_text(&mut subsystem, 1, "\\V[1]", &state);
        state.set_variable(1, 2);
        subsystem.update(&state);
        assert_eq!(subsystem.slot(1).unwrap().rendered_text(), Some("1"));
    }

    #[test]
    fn test_reshow_issues_new_token() {
        let mut subsystem = TextPictureSubsystem::default();
        let state = GameSnapshot::new();
        show_text(&mut subsystem, 1, "same", &state);
        let first = subsystem.slot(1).unwrap().identity();
        show_text(&mut subsystem, 1, "same", &state);
        assert_ne!(subsystem.slot(1).unwrap().identity(), first);
    }

    #[test]
    fn test_pad_character_from_config() {
        let config = TextPictureConfig {
            pad_character: '*',
            ..TextPictureConfig::default()
        };
        let mut subsystem = TextPictureSubsystem::new(config);
        let state = GameSnapshot::new().with_variable(3, -7);
        show_text(&mut subsystem, 1, "\\V[3,4]", &state);
        assert_eq!(subsystem.slot(1).unwrap().rendered_text(), Some("-***7"));
    }

    #[test]
    fn test_set_cursor() {
        let mut subsystem = TextPictureSubsystem::default();
        let state = GameSnapshot::new();
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);

        subsystem.set_cursor(1, rect, 0);
        assert!(subsystem.slot(1).unwrap().cursor().is_none());
        subsystem.set_cursor(500, rect, 0);

        show_text(&mut subsystem, 1, "menu", &state);
        subsystem.set_cursor(1, rect, 3);
        let cursor = subsystem.slot(1).unwrap().cursor().unwrap();
        assert_eq!(cursor.rect, rect);
        assert_eq!(cursor.activate_switch, Some(3));
    }

    #[test]
    fn test_erase_clears_cursor() {
        let mut subsystem = TextPictureSubsystem::default();
        show_text(&mut subsystem, 1, "menu", &GameSnapshot::new());
        subsystem.set_cursor(1, Rect::new(0.0, 0.0, 10.0, 10.0), 0);
        subsystem.erase_picture(1);

        let slot = subsystem.slot(1).unwrap();
        assert!(slot.is_empty());
        assert!(slot.cursor().is_none());
        assert!(slot.display_info().is_none());
        assert_eq!(slot.refresh_state(), RefreshState::Static);
    }

    fn populated(count: usize) -> TextPictureSubsystem {
        let mut subsystem = TextPictureSubsystem::default();
        let state = GameSnapshot::new();
        for id in 1..=count {
            subsystem.show_picture(id, PictureParams::new(format!("pic{}", id)), &state);
        }
        subsystem
    }

    fn shown_ids(subsystem: &TextPictureSubsystem) -> Vec<usize> {
        subsystem.slots().filter(|slot| !slot.is_empty()).map(|slot| slot.id()).collect()
    }

    #[test]
    fn test_erase_range() {
        let mut subsystem = populated(10);
        assert_eq!(subsystem.erase_pictures_range(3, 7), 3..=7);
        assert_eq!(shown_ids(&subsystem), vec![1, 2, 8, 9, 10]);
    }

    #[test]
    fn test_erase_range_defaults_to_everything() {
        let mut subsystem = populated(10);
        assert_eq!(subsystem.erase_pictures_range(0, 0), 1..=100);
        assert!(shown_ids(&subsystem).is_empty());
    }

    #[test]
    fn test_erase_range_reversed_and_clamped() {
        let mut subsystem = populated(10);
        assert_eq!(subsystem.erase_pictures_range(6, 2), 6..=6);
        assert_eq!(shown_ids(&subsystem), vec![1, 2, 3, 4, 5, 7, 8, 9, 10]);

        assert_eq!(subsystem.erase_pictures_range(9, 500), 9..=100);
        assert_eq!(shown_ids(&subsystem), vec![1, 2, 3, 4, 5, 7, 8]);

        assert_eq!(subsystem.erase_pictures_range(-4, 2), 1..=2);
        assert_eq!(shown_ids(&subsystem), vec![3, 4, 5, 7, 8]);
    }

    #[test]
    fn test_settings_persistence() {
        let mut subsystem = TextPictureSubsystem::default();
        subsystem.configure_text_settings(&TextSettingsUpdate {
            background_color: Some("black".into()),
            gradient_left: Some(12),
            ..TextSettingsUpdate::default()
        });
        let saved = subsystem.save_settings().unwrap();

        let mut restored = TextPictureSubsystem::default();
        restored.load_settings(&saved).unwrap();
        assert_eq!(restored.settings(), subsystem.settings());
        assert!(restored.load_settings("not json").is_err());
    }
}
