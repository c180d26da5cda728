use crate::token::Token;

/// A position in a shared token slice. Copying a cursor is how the matcher
/// opens a speculative branch; dropping it abandons the branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'t> {
    tokens: &'t [Token],
    index: usize,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn at(tokens: &'t [Token], index: usize) -> Self {
        Self {
            tokens,
            index: index.min(tokens.len()),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tokens(&self) -> &'t [Token] {
        self.tokens
    }

    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.index)
    }

    pub fn previous(&self) -> Option<&'t Token> {
        self.index.checked_sub(1).and_then(|idx| self.tokens.get(idx))
    }

    pub fn remaining(&self) -> &'t [Token] {
        &self.tokens[self.index..]
    }

    pub fn available(&self) -> usize {
        self.tokens.len() - self.index
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    pub fn advance(self, count: usize) -> Self {
        Self::at(self.tokens, self.index + count)
    }

    /// Tokens between `self` and a later cursor over the same slice.
    pub fn span_to(&self, end: Cursor<'t>) -> &'t [Token] {
        &self.tokens[self.index..end.index.max(self.index)]
    }
}
