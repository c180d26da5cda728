mod stream;

pub use stream::TokenStream;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TokenKind {
    #[default]
    Unknown,
    Keyword,
    Identifier,
    Literal,
    Separator,
    Operator,
    Blank,
}

/// A lexical unit produced upstream. `spaced` records whether whitespace
/// preceded the token in the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    value: Box<str>,
    kind: TokenKind,
    spaced: bool,
}

impl Token {
    pub fn new(value: &str) -> Self {
        Self::with_kind(value, TokenKind::Unknown, false)
    }

    pub fn with_kind(value: &str, kind: TokenKind, spaced: bool) -> Self {
        Self {
            value: value.into(),
            kind,
            spaced,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn is_spaced(&self) -> bool {
        self.spaced
    }

    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Joins token values with single spaces where the source had whitespace.
pub fn render(tokens: &[Token]) -> String {
    let mut out = String::new();
    for (idx, token) in tokens.iter().enumerate() {
        if idx > 0 && token.is_spaced() {
            out.push(' ');
        }
        out.push_str(token.value());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_respects_spacing() {
        let tokens = vec![
            Token::with_kind("foo", TokenKind::Identifier, false),
            Token::with_kind("(", TokenKind::Separator, false),
            Token::with_kind("a", TokenKind::Identifier, false),
            Token::with_kind(",", TokenKind::Separator, false),
            Token::with_kind("b", TokenKind::Identifier, true),
            Token::with_kind(")", TokenKind::Separator, false),
        ];

        assert_eq!(render(&tokens), "foo(a, b)");
    }
}
