//! Escape Tokenizer
//!
//! Splits control-annotated text into literal runs, line breaks and escapes.

use std::fmt;

use crate::error::SourceLocation;

/// A token of control-annotated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text (never contains a line break)
    Text(String),
    /// Line break
    Newline,
    /// Backslash escape, e.g. `\V[3]` or `\{`
    Escape {
        /// Upper-cased code (`V`, `ITEM`, `{`, ...)
        code: String,
        /// Raw text between the brackets, if any
        arg: Option<String>,
    },
}

impl Token {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn escape(code: impl Into<String>, arg: Option<String>) -> Self {
        Self::Escape {
            code: code.into(),
            arg,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(text) => {
                for c in text.chars() {
                    if c == '\\' {
                        f.write_str("\\\\")?;
                    } else {
                        write!(f, "{}", c)?;
                    }
                }
                Ok(())
            }
            Token::Newline => f.write_str("\n"),
            Token::Escape { code, arg: Some(arg) } => write!(f, "\\{}[{}]", code, arg),
            Token::Escape { code, arg: None } => write!(f, "\\{}", code),
        }
    }
}

/// One-character escape codes
const SYMBOL_CODES: &[char] = &['$', '.', '|', '^', '!', '>', '<', '{', '}'];

/// Escape tokenizer
pub struct Tokenizer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    position: usize,
    line: usize,
    column: usize,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Get the current source location
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.position)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_second(&self) -> Option<char> {
        let mut iter = self.input[self.position..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn at_line_break(&mut self) -> bool {
        match self.peek() {
            Some('\n') => true,
            Some('\r') => self.peek_second() == Some('\n'),
            _ => false,
        }
    }

    /// Get the next token, or `None` at end of input
    pub fn next_token(&mut self) -> Option<Token> {
        let c = self.peek()?;

        if self.at_line_break() {
            if c == '\r' {
                self.advance();
            }
            self.advance();
            return Some(Token::Newline);
        }

        if c == '\\' {
            return Some(self.consume_escape());
        }

        Some(self.consume_text())
    }

    fn consume_text(&mut self) -> Token {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' || self.at_line_break() {
                break;
            }
            text.push(c);
            self.advance();
        }
        Token::Text(text)
    }

    fn consume_escape(&mut self) -> Token {
        self.advance(); // consume '\'

        match self.peek() {
            Some('\\') => {
                self.advance();
                Token::text("\\")
            }
            Some(c) if SYMBOL_CODES.contains(&c) => {
                self.advance();
                Token::escape(c.to_string(), None)
            }
            Some(c) if c.is_ascii_alphabetic() => {
                let mut code = String::new();
                while let Some(c) = self.peek() {
                    if !c.is_ascii_alphabetic() {
                        break;
                    }
                    code.push(c.to_ascii_uppercase());
                    self.advance();
                }
                let arg = self.consume_argument();
                Token::Escape { code, arg }
            }
            // Lone or trailing backslash stays literal
            _ => Token::text("\\"),
        }
    }

    /// Consume a bracketed argument, honoring nested brackets
    fn consume_argument(&mut self) -> Option<String> {
        let input = self.input;
        let rest = &input[self.position..];
        if !rest.starts_with('[') {
            return None;
        }

        let mut depth = 0usize;
        let mut end = None;
        for (i, c) in rest.char_indices() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(i);
                        break;
                    }
                }
                '\n' => break,
                _ => {}
            }
        }

        let end = end?;
        let arg = rest[1..end].to_string();
        let char_count = rest[..=end].chars().count();
        for _ in 0..char_count {
            self.advance();
        }
        Some(arg)
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Tokenize a whole string, merging adjacent text runs
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    for token in Tokenizer::new(input) {
        if let Token::Text(next) = &token {
            if next.is_empty() {
                continue;
            }
            if let Some(Token::Text(prev)) = tokens.last_mut() {
                prev.push_str(next);
                continue;
            }
        }
        tokens.push(token);
    }
    tokens
}

/// Serialize tokens back to canonical source text
///
/// A letter escape without an argument gets an empty `[]` when the next text
/// would otherwise read as part of its code or as its argument.
pub fn to_source(tokens: &[Token]) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        out.push_str(&token.to_string());
        if needs_empty_argument(token, tokens.get(i + 1)) {
            out.push_str("[]");
        }
    }
    out
}

fn needs_empty_argument(token: &Token, next: Option<&Token>) -> bool {
    match (token, next) {
        (Token::Escape { code, arg: None }, Some(Token::Text(text))) => {
            code.starts_with(|c: char| c.is_ascii_alphabetic())
                && text.starts_with(|c: char| c.is_ascii_alphabetic() || c == '[')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(tokenize("Hello"), vec![Token::text("Hello")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_escape_with_argument() {
        let tokens = tokenize("HP \\v[12] left");
        assert_eq!(
            tokens,
            vec![
                Token::text("HP "),
                Token::escape("V", Some("12".into())),
                Token::text(" left"),
            ]
        );
    }

    #[test]
    fn test_escape_codes_are_uppercased() {
        let tokens = tokenize("\\Item[3]\\oc[red]");
        assert_eq!(
            tokens,
            vec![
                Token::escape("ITEM", Some("3".into())),
                Token::escape("OC", Some("red".into())),
            ]
        );
    }

    #[test]
    fn test_nested_argument() {
        let tokens = tokenize("\\V[\\V[1]]!");
        assert_eq!(
            tokens,
            vec![Token::escape("V", Some("\\V[1]".into())), Token::text("!")]
        );
    }

    #[test]
    fn test_unclosed_bracket_is_text() {
        let tokens = tokenize("\\V[12");
        assert_eq!(tokens, vec![Token::escape("V", None), Token::text("[12")]);
    }

    #[test]
    fn test_symbol_escapes() {
        let tokens = tokenize("\\{big\\}");
        assert_eq!(
            tokens,
            vec![
                Token::escape("{", None),
                Token::text("big"),
                Token::escape("}", None),
            ]
        );
    }

    #[test]
    fn test_literal_backslash() {
        assert_eq!(tokenize("a\\\\b"), vec![Token::text("a\\b")]);
        assert_eq!(tokenize("end\\"), vec![Token::text("end\\")]);
        assert_eq!(tokenize("\\1"), vec![Token::text("\\1")]);
    }

    #[test]
    fn test_line_breaks() {
        let tokens = tokenize("one\ntwo\r\nthree");
        assert_eq!(
            tokens,
            vec![
                Token::text("one"),
                Token::Newline,
                Token::text("two"),
                Token::Newline,
                Token::text("three"),
            ]
        );
    }

    #[test]
    fn test_location_tracking() {
        let mut tokenizer = Tokenizer::new("ab\ncd");
        tokenizer.next_token();
        tokenizer.next_token();
        let loc = tokenizer.location();
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 1);
        assert_eq!(loc.offset, 3);
    }

    #[test]
    fn test_to_source_is_stable() {
        let source = "\\C[2]Gold: \\V[1,3]\n\\\\path\\{";
        let tokens = tokenize(source);
        let serialized = to_source(&tokens);
        assert_eq!(serialized, source);
        assert_eq!(tokenize(&serialized), tokens);
    }

    #[test]
    fn test_to_source_keeps_bare_escape_apart() {
        let tokens = vec![Token::escape("Q", None), Token::text("abc")];
        let serialized = to_source(&tokens);
        assert_eq!(serialized, "\\Q[]abc");
        assert_eq!(
            tokenize(&serialized),
            vec![Token::escape("Q", Some(String::new())), Token::text("abc")]
        );

        let tokens = vec![Token::escape("Q", None), Token::text("[x]")];
        assert_eq!(to_source(&tokens), "\\Q[][x]");

        let tokens = vec![Token::escape("{", None), Token::text("abc")];
        assert_eq!(to_source(&tokens), "\\{abc");

        let tokens = vec![Token::escape("Q", None), Token::text(" abc")];
        assert_eq!(to_source(&tokens), "\\Q abc");
    }
}
