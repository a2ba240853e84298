//! dtext Escape Sequences
//!
//! Tokenizer, directive parser and game-state resolver for
//! control-annotated picture text.

mod directive;
mod error;
mod resolver;
mod state;
mod tokenizer;

pub use directive::{
    segments, ColorRef, Directive, EntityKind, FontStyle, Segment, MAX_PAD_WIDTH,
};
pub use error::{EscapeError, EscapeResult, SourceLocation};
pub use resolver::{
    base_expand, pad_number, resolve, Resolver, ResolverConfig, DEFAULT_COLOR_VARIABLE_OFFSET,
    DEFAULT_PAD_CHARACTER,
};
pub use state::{Entity, GameSnapshot, GameState};
pub use tokenizer::{to_source, tokenize, Token, Tokenizer};

/// Tokenize resolved text and interpret its escapes for drawing
pub fn parse_segments(resolved: &str) -> Vec<Segment> {
    segments(&tokenize(resolved))
}
