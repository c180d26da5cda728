use super::Token;

/// Tokens plus a read position. Only a committed extraction moves `index`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::new(values.into_iter().map(Token::new).collect())
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub fn remaining(&self) -> &[Token] {
        &self.tokens[self.index..]
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// Returns up to `count` tokens from the read position and moves past them.
    pub fn read(&mut self, count: usize) -> &[Token] {
        let start = self.index;
        let end = start.saturating_add(count).min(self.tokens.len());
        self.index = end;
        &self.tokens[start..end]
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

impl From<Vec<Token>> for TokenStream {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}
