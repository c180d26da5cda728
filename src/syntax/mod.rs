mod error;
mod operator;
mod separator;

pub use error::{SyntaxError, SyntaxResult};
pub use operator::{Operator, OperatorFamily, OperatorTable};
pub use separator::{Separator, SeparatorId, SeparatorTable};

use crate::token::{Token, TokenKind};

/// Classification tables shared by the compiler and the extractor.
#[derive(Debug, Clone)]
pub struct Syntax {
    separators: SeparatorTable,
    operators: OperatorTable,
}

impl Syntax {
    pub fn new(separators: SeparatorTable, operators: OperatorTable) -> Self {
        Self {
            separators,
            operators,
        }
    }

    pub fn separators(&self) -> &SeparatorTable {
        &self.separators
    }

    pub fn separators_mut(&mut self) -> &mut SeparatorTable {
        &mut self.separators
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    pub fn operators_mut(&mut self) -> &mut OperatorTable {
        &mut self.operators
    }

    pub fn classify(&self, value: &str) -> TokenKind {
        if self.separators.is_separator(value) {
            TokenKind::Separator
        } else if self.operators.is_operator(value) {
            TokenKind::Operator
        } else if value.trim().is_empty() {
            TokenKind::Blank
        } else {
            TokenKind::Unknown
        }
    }

    pub fn token(&self, value: &str, spaced: bool) -> Token {
        Token::with_kind(value, self.classify(value), spaced)
    }

    /// Builds classified tokens, each marked as preceded by whitespace except
    /// the first.
    pub fn tokens<'a, I>(&self, values: I) -> Vec<Token>
    where
        I: IntoIterator<Item = &'a str>,
    {
        values
            .into_iter()
            .enumerate()
            .map(|(idx, value)| self.token(value, idx > 0))
            .collect()
    }

    /// Whether a token bounds its neighbours the way whitespace would.
    pub fn is_boundary(&self, token: &Token) -> bool {
        matches!(
            token.kind(),
            TokenKind::Separator | TokenKind::Operator | TokenKind::Blank
        ) || self.separators.is_separator(token.value())
    }
}

impl Default for Syntax {
    fn default() -> Self {
        Self::new(SeparatorTable::standard(), OperatorTable::standard())
    }
}
