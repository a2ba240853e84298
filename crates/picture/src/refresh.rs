//! Live refresh
//!
//! Text pictures shown with real-time updates re-resolve their source every
//! frame. A new identity token is issued only when the resolved text differs
//! from what was last rendered.

use std::fmt;

use dtext_escape::Resolver;

use crate::slot::PictureSlot;

/// Opaque marker of a slot's visual content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityToken(u64);

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues strictly increasing identity tokens
#[derive(Debug, Default)]
pub struct TokenCounter {
    last: u64,
}

impl TokenCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_token(&mut self) -> IdentityToken {
        self.last += 1;
        IdentityToken(self.last)
    }
}

/// Refresh mode of a slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshState {
    /// Resolved once when shown
    #[default]
    Static,
    /// Re-resolved every frame
    Live,
}

/// Resolve the slot's source and update its rendered text
///
/// Returns `true` when a new identity token was issued.
pub(crate) fn regenerate(
    slot: &mut PictureSlot,
    resolver: &Resolver<'_>,
    tokens: &mut TokenCounter,
) -> bool {
    let Some(info) = slot.display_info.as_ref() else {
        return false;
    };

    let text = resolver.resolve(&info.source_text);
    if slot.identity.is_some() && slot.rendered_text.as_deref() == Some(text.as_str()) {
        return false;
    }

    let token = tokens.next_token();
    log::debug!("Picture {} regenerated as {}: {:?}", slot.id, token, text);
    slot.rendered_text = Some(text);
    slot.identity = Some(token);
    true
}

/// Per-frame update of one slot
pub(crate) fn tick(slot: &mut PictureSlot, resolver: &Resolver<'_>, tokens: &mut TokenCounter) -> bool {
    match slot.refresh {
        RefreshState::Static => false,
        RefreshState::Live => regenerate(slot, resolver, tokens),
    }
}
