//! Escape Resolver
//!
//! Expands game-state references in control-annotated text.
//!
//! Resolution happens in two phases over the token stream. The base phase
//! substitutes `\V[n]`, `\N[n]`, `\P[n]` and `\G`. The extended phase adds
//! padded variables (`\V[n,m]`), entity references (`\ITEM[n]`, `\WEAPON[n]`,
//! `\ARMOR[n]`, `\SKILL[n]`, `\STATE[n]`) and color variables (`\CV[n]`).
//! Substituted text is emitted as literal tokens and is never scanned again.
//! Escapes that are interpreted while drawing (colors, icons, font changes)
//! are kept in canonical form.

use crate::directive::{Directive, MAX_PAD_WIDTH};
use crate::state::{Entity, GameState};
use crate::tokenizer::{to_source, tokenize, Token};

/// Default fill character for `\V[n,m]`
pub const DEFAULT_PAD_CHARACTER: char = '0';

/// Default variable offset for `\CV[n]`
pub const DEFAULT_COLOR_VARIABLE_OFFSET: usize = 20;

/// Resolver options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Fill character for padded variables
    pub pad_character: char,
    /// `\CV[n]` reads variable `n + color_variable_offset`
    pub color_variable_offset: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            pad_character: DEFAULT_PAD_CHARACTER,
            color_variable_offset: DEFAULT_COLOR_VARIABLE_OFFSET,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Base,
    Full,
}

/// Resolves control-annotated text against a game state
pub struct Resolver<'a> {
    state: &'a dyn GameState,
    config: ResolverConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(state: &'a dyn GameState) -> Self {
        Self {
            state,
            config: ResolverConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Fully resolve `raw` into a display string
    pub fn resolve(&self, raw: &str) -> String {
        to_source(&self.resolve_tokens(raw))
    }

    /// Fully resolve `raw` into tokens
    pub fn resolve_tokens(&self, raw: &str) -> Vec<Token> {
        self.expand(raw, Phase::Full)
    }

    /// Apply only the base expansion
    pub fn base_expand(&self, raw: &str) -> String {
        to_source(&self.expand(raw, Phase::Base))
    }

    fn expand(&self, raw: &str, phase: Phase) -> Vec<Token> {
        let mut out: Vec<Token> = Vec::new();

        for token in tokenize(raw) {
            let (code, arg) = match token {
                Token::Escape { code, arg } => (code, arg),
                other => {
                    push_token(&mut out, other);
                    continue;
                }
            };

            // Nested escapes in arguments resolve first: \V[\V[1]]
            let arg = match arg {
                Some(arg) if arg.contains('\\') => Some(to_source(&self.expand(&arg, phase))),
                other => other,
            };

            let directive = match Directive::from_escape(&code, arg.as_deref()) {
                Ok(directive) => directive,
                Err(e) if phase == Phase::Base => {
                    log::trace!("Base expansion leaves escape untouched: {}", e);
                    push_token(&mut out, Token::Escape { code, arg });
                    continue;
                }
                Err(e) => {
                    log::debug!("Dropping malformed escape: {}", e);
                    continue;
                }
            };

            match self.substitute(&directive, phase) {
                Some(tokens) => {
                    for token in tokens {
                        push_token(&mut out, token);
                    }
                }
                None => push_token(&mut out, Token::Escape { code, arg }),
            }
        }

        out
    }

    /// Replacement tokens for a directive, or `None` to keep the escape as written
    fn substitute(&self, directive: &Directive, phase: Phase) -> Option<Vec<Token>> {
        let state = self.state;
        let tokens = match (directive, phase) {
            (Directive::Variable { id, width: None }, _) => {
                vec![Token::text(state.variable(*id).to_string())]
            }
            (Directive::ActorName(id), _) => {
                vec![Token::text(state.actor_name(*id).unwrap_or_default())]
            }
            (Directive::PartyMemberName(index), _) => {
                vec![Token::text(state.party_member_name(*index).unwrap_or_default())]
            }
            (Directive::CurrencyUnit, _) => vec![Token::text(state.currency_unit())],
            (_, Phase::Base) => return None,
            (
                Directive::Variable {
                    id,
                    width: Some(width),
                },
                Phase::Full,
            ) => {
                let value = state.variable(*id);
                vec![Token::text(pad_number(value, *width, self.config.pad_character))]
            }
            (Directive::Entity { kind, id }, Phase::Full) => {
                entity_tokens(state.entity(*kind, *id))
            }
            (Directive::ColorVariable(id), Phase::Full) => {
                let value = state.variable(id + self.config.color_variable_offset);
                vec![Token::escape("C", Some(value.to_string()))]
            }
            (directive, Phase::Full) => vec![directive.to_token()],
        };
        Some(tokens)
    }
}

fn push_token(out: &mut Vec<Token>, token: Token) {
    if let Token::Text(next) = &token {
        if next.is_empty() {
            return;
        }
        if let Some(Token::Text(prev)) = out.last_mut() {
            prev.push_str(next);
            return;
        }
    }
    out.push(token);
}

/// Icon followed by name, or nothing for a missing entry
fn entity_tokens(entity: Option<Entity>) -> Vec<Token> {
    match entity {
        Some(entity) => vec![
            Token::escape("I", Some(entity.icon_index.to_string())),
            Token::text(entity.name),
        ],
        None => Vec::new(),
    }
}

/// Left-pad the magnitude of `value` to `width` characters
///
/// `width` is capped at [`MAX_PAD_WIDTH`].
pub fn pad_number(value: i64, width: usize, pad: char) -> String {
    let width = width.min(MAX_PAD_WIDTH);
    let digits = value.unsigned_abs().to_string();
    let fill = width.saturating_sub(digits.chars().count());

    let mut out = String::with_capacity(width + 1);
    if value < 0 {
        out.push('-');
    }
    out.extend(std::iter::repeat(pad).take(fill));
    out.push_str(&digits);
    out
}

/// Fully resolve `raw` with default options
pub fn resolve(raw: &str, state: &dyn GameState) -> String {
    Resolver::new(state).resolve(raw)
}

/// Base expansion only, with default options
pub fn base_expand(raw: &str, state: &dyn GameState) -> String {
    Resolver::new(state).base_expand(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directive::{EntityKind, Segment};
    use crate::state::GameSnapshot;

    fn state() -> GameSnapshot {
        let mut state = GameSnapshot::new()
            .with_variable(1, 42)
            .with_variable(2, -7)
            .with_variable(3, 2)
            .with_variable(24, 5)
            .with_entity(EntityKind::Item, 1, 176, "Potion")
            .with_entity(EntityKind::Weapon, 2, 97, "Short Sword")
            .with_entity(EntityKind::Armor, 3, 135, "Buckler")
            .with_entity(EntityKind::Skill, 4, 64, "Fire")
            .with_entity(EntityKind::State, 5, 2, "Poison")
            .with_actor(1, "Reid");
        state.party = vec![1];
        state.currency_unit = "G".into();
        state
    }

    #[test]
    fn test_plain_text_unchanged() {
        let state = state();
        assert_eq!(resolve("Hello world", &state), "Hello world");
    }

    #[test]
    fn test_resolve_matches_base_expansion_without_extended_escapes() {
        let state = state();
        for s in ["plain", "HP \\V[1]", "\\N[1] has 10\\G", "\\P[1]\nline two", "a\\\\b", ""] {
            assert_eq!(resolve(s, &state), base_expand(s, &state), "input {:?}", s);
        }
    }

    #[test]
    fn test_variable() {
        let state = state();
        assert_eq!(resolve("\\V[1]", &state), "42");
        assert_eq!(resolve("\\v[2]", &state), "-7");
        assert_eq!(resolve("\\V[99]", &state), "0");
    }

    #[test]
    fn test_padded_variable() {
        let state = state();
        assert_eq!(resolve("\\V[2,4]", &state), "-0007");
        assert_eq!(resolve("\\V[1, 5]", &state), "00042");
        assert_eq!(resolve("\\V[1,1]", &state), "42");
    }

    #[test]
    fn test_oversized_pad_width_is_dropped() {
        let state = state();
        assert_eq!(resolve("\\V[1,18446744073709551615]", &state), "");
        assert_eq!(resolve("a\\V[1,99999999999]b", &state), "ab");
        assert_eq!(resolve("\\V[1,64]", &state).len(), 64);
        assert_eq!(resolve("\\V[1,65]", &state), "");
    }

    #[test]
    fn test_substitution_after_bare_escape_stays_text() {
        let state = state();
        let resolved = resolve("\\Q\\N[1]", &state);
        assert_eq!(resolved, "\\Q[]Reid");
        assert!(crate::parse_segments(&resolved).contains(&Segment::Text("Reid".into())));
    }

    #[test]
    fn test_custom_pad_character() {
        let state = state();
        let config = ResolverConfig {
            pad_character: '*',
            ..ResolverConfig::default()
        };
        let resolver = Resolver::new(&state).with_config(config);
        assert_eq!(resolver.resolve("\\V[2,4]"), "-***7");
    }

    #[test]
    fn test_base_expand_keeps_padded_variable() {
        let state = state();
        assert_eq!(base_expand("\\V[2,4]", &state), "\\V[2,4]");
    }

    #[test]
    fn test_nested_variable() {
        let state = state();
        // \V[3] is 2, \V[2] is -7
        assert_eq!(resolve("\\V[\\V[3]]", &state), "-7");
    }

    #[test]
    fn test_entities() {
        let state = state();
        assert_eq!(resolve("\\ITEM[1]", &state), "\\I[176]Potion");
        assert_eq!(resolve("\\weapon[2]", &state), "\\I[97]Short Sword");
        assert_eq!(resolve("\\ARMOR[3]", &state), "\\I[135]Buckler");
        assert_eq!(resolve("\\SKILL[4]", &state), "\\I[64]Fire");
        assert_eq!(resolve("\\STATE[5]", &state), "\\I[2]Poison");
    }

    #[test]
    fn test_missing_entity_is_empty() {
        let state = state();
        assert_eq!(resolve("[\\ITEM[99]]", &state), "[]");
        assert_eq!(resolve("\\STATE[0]", &state), "");
    }

    #[test]
    fn test_malformed_argument_is_dropped() {
        let state = state();
        assert_eq!(resolve("a\\ITEM[x]b", &state), "ab");
        assert_eq!(resolve("\\OW[wide]text", &state), "text");
    }

    #[test]
    fn test_render_escapes_survive() {
        let state = state();
        let resolved = resolve("\\c[2]\\oc[red]\\ow[4]\\f[b]\\fs[30]Hi\\{", &state);
        assert_eq!(resolved, "\\C[2]\\OC[red]\\OW[4]\\F[b]\\FS[30]Hi\\{");
    }

    #[test]
    fn test_color_variable() {
        let state = state();
        // variable 4 + 20 = 24 holds 5
        assert_eq!(resolve("\\CV[4]x", &state), "\\C[5]x");
    }

    #[test]
    fn test_substituted_names_are_not_rescanned() {
        let state = GameSnapshot::new().with_actor(1, "\\V[1]");
        let state = state.with_variable(1, 9);
        assert_eq!(resolve("\\N[1]", &state), "\\\\V[1]");
    }

    #[test]
    fn test_numeric_text_stays_text() {
        let state = state();
        assert_eq!(resolve("007", &state), "007");
    }

    #[test]
    fn test_pad_number() {
        assert_eq!(pad_number(5, 3, '0'), "005");
        assert_eq!(pad_number(-5, 3, ' '), "-  5");
        assert_eq!(pad_number(1234, 2, '0'), "1234");
        assert_eq!(pad_number(i64::MIN, 0, '0'), "-9223372036854775808");
        assert_eq!(pad_number(-5, usize::MAX, '0').len(), MAX_PAD_WIDTH + 1);
    }
}
