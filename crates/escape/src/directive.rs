//! Typed directives
//!
//! Interprets a raw escape (`code` + optional bracket argument) as a directive.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{EscapeError, EscapeResult};
use crate::tokenizer::Token;

/// Widest padding `\V[n,m]` accepts; wider widths are malformed
pub const MAX_PAD_WIDTH: usize = 64;

/// Database table an entity reference points into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Item,
    Weapon,
    Armor,
    Skill,
    State,
}

impl EntityKind {
    /// All kinds, in resolution order
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Item,
        EntityKind::Weapon,
        EntityKind::Armor,
        EntityKind::Skill,
        EntityKind::State,
    ];

    /// Escape code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            EntityKind::Item => "ITEM",
            EntityKind::Weapon => "WEAPON",
            EntityKind::Armor => "ARMOR",
            EntityKind::Skill => "SKILL",
            EntityKind::State => "STATE",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

/// Color given either as a theme index or a literal color token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorRef {
    Index(u32),
    Literal(String),
}

impl ColorRef {
    /// Numbers select a theme color, anything else is kept verbatim
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<u32>() {
            Ok(index) => ColorRef::Index(index),
            Err(_) => ColorRef::Literal(s.to_string()),
        }
    }

    fn to_arg(&self) -> String {
        match self {
            ColorRef::Index(index) => index.to_string(),
            ColorRef::Literal(s) => s.clone(),
        }
    }
}

/// `\F[..]` font style switch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Bold,
    Italic,
    Normal,
}

/// An interpreted escape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// `\V[n]` or `\V[n,m]`
    Variable { id: usize, width: Option<usize> },
    /// `\N[n]`
    ActorName(usize),
    /// `\P[n]`
    PartyMemberName(usize),
    /// `\G`
    CurrencyUnit,
    /// `\ITEM[n]`, `\WEAPON[n]`, ...
    Entity { kind: EntityKind, id: usize },
    /// `\CV[n]`
    ColorVariable(usize),
    /// `\C[n]`
    TextColor(u32),
    /// `\I[n]`
    Icon(u32),
    /// `\FS[n]`
    FontSize(u32),
    /// `\{`
    FontBigger,
    /// `\}`
    FontSmaller,
    /// `\OC[c]`
    OutlineColor(ColorRef),
    /// `\OW[n]`
    OutlineWidth(u32),
    /// `\F[b]`, `\F[i]`, `\F[n]`
    FontStyle(FontStyle),
    /// Anything else, passed through untouched
    Other { code: String, arg: Option<String> },
}

impl Directive {
    /// Interpret an escape
    pub fn from_escape(code: &str, arg: Option<&str>) -> EscapeResult<Self> {
        let directive = match code {
            "V" => {
                let arg = require(code, arg)?;
                let parts: SmallVec<[&str; 2]> = arg.split(',').collect();
                match parts.as_slice() {
                    [id] => Directive::Variable {
                        id: parse_number(code, id)?,
                        width: None,
                    },
                    [id, width] => {
                        let id = parse_number(code, id)?;
                        let width: usize = parse_number(code, width)?;
                        if width > MAX_PAD_WIDTH {
                            return Err(EscapeError::invalid_number(code, width.to_string()));
                        }
                        Directive::Variable {
                            id,
                            width: Some(width),
                        }
                    }
                    _ => {
                        return Err(EscapeError::ArgumentCount {
                            code: code.to_string(),
                            expected: 2,
                            found: parts.len(),
                        })
                    }
                }
            }
            "N" => Directive::ActorName(parse_number(code, require(code, arg)?)?),
            "P" => Directive::PartyMemberName(parse_number(code, require(code, arg)?)?),
            "G" => Directive::CurrencyUnit,
            "CV" => Directive::ColorVariable(parse_number(code, require(code, arg)?)?),
            "C" => Directive::TextColor(parse_number(code, require(code, arg)?)?),
            "I" => Directive::Icon(parse_number(code, require(code, arg)?)?),
            "FS" => Directive::FontSize(parse_number(code, require(code, arg)?)?),
            "{" => Directive::FontBigger,
            "}" => Directive::FontSmaller,
            "OC" => {
                let arg = require(code, arg)?.trim();
                if arg.is_empty() {
                    return Err(EscapeError::missing_argument(code));
                }
                Directive::OutlineColor(ColorRef::parse(arg))
            }
            "OW" => Directive::OutlineWidth(parse_number(code, require(code, arg)?)?),
            "F" => {
                let arg = require(code, arg)?.trim();
                let style = match arg.to_ascii_lowercase().as_str() {
                    "b" => FontStyle::Bold,
                    "i" => FontStyle::Italic,
                    "n" => FontStyle::Normal,
                    _ => {
                        return Err(EscapeError::InvalidFontStyle {
                            value: arg.to_string(),
                        })
                    }
                };
                Directive::FontStyle(style)
            }
            _ => match EntityKind::from_code(code) {
                Some(kind) => Directive::Entity {
                    kind,
                    id: parse_number(code, require(code, arg)?)?,
                },
                None => Directive::Other {
                    code: code.to_string(),
                    arg: arg.map(str::to_string),
                },
            },
        };
        Ok(directive)
    }

    /// Whether this directive survives resolution and is interpreted while drawing
    pub fn is_render_time(&self) -> bool {
        matches!(
            self,
            Directive::TextColor(_)
                | Directive::Icon(_)
                | Directive::FontSize(_)
                | Directive::FontBigger
                | Directive::FontSmaller
                | Directive::OutlineColor(_)
                | Directive::OutlineWidth(_)
                | Directive::FontStyle(_)
                | Directive::Other { .. }
        )
    }

    /// Canonical escape token for this directive
    pub fn to_token(&self) -> Token {
        let (code, arg): (&str, Option<String>) = match self {
            Directive::Variable { id, width: None } => ("V", Some(id.to_string())),
            Directive::Variable {
                id,
                width: Some(width),
            } => ("V", Some(format!("{},{}", id, width))),
            Directive::ActorName(id) => ("N", Some(id.to_string())),
            Directive::PartyMemberName(index) => ("P", Some(index.to_string())),
            Directive::CurrencyUnit => ("G", None),
            Directive::Entity { kind, id } => (kind.code(), Some(id.to_string())),
            Directive::ColorVariable(id) => ("CV", Some(id.to_string())),
            Directive::TextColor(index) => ("C", Some(index.to_string())),
            Directive::Icon(index) => ("I", Some(index.to_string())),
            Directive::FontSize(size) => ("FS", Some(size.to_string())),
            Directive::FontBigger => ("{", None),
            Directive::FontSmaller => ("}", None),
            Directive::OutlineColor(color) => ("OC", Some(color.to_arg())),
            Directive::OutlineWidth(width) => ("OW", Some(width.to_string())),
            Directive::FontStyle(style) => {
                let arg = match style {
                    FontStyle::Bold => "b",
                    FontStyle::Italic => "i",
                    FontStyle::Normal => "n",
                };
                ("F", Some(arg.to_string()))
            }
            Directive::Other { code, arg } => (code.as_str(), arg.clone()),
        };
        Token::escape(code, arg)
    }
}

fn require<'a>(code: &str, arg: Option<&'a str>) -> EscapeResult<&'a str> {
    arg.ok_or_else(|| EscapeError::missing_argument(code))
}

fn parse_number<T: std::str::FromStr>(code: &str, value: &str) -> EscapeResult<T> {
    let trimmed = value.trim();
    trimmed
        .parse::<T>()
        .map_err(|_| EscapeError::invalid_number(code, trimmed))
}

/// A token whose escapes have been interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Newline,
    Directive(Directive),
}

/// Interpret a token stream for drawing.
///
/// Escapes that fail to parse are dropped.
pub fn segments(tokens: &[Token]) -> Vec<Segment> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token {
            Token::Text(text) => out.push(Segment::Text(text.clone())),
            Token::Newline => out.push(Segment::Newline),
            Token::Escape { code, arg } => match Directive::from_escape(code, arg.as_deref()) {
                Ok(directive) => out.push(Segment::Directive(directive)),
                Err(e) => log::debug!("Dropping escape: {}", e),
            },
        }
    }
    out
}
