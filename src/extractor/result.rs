use super::Captures;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractorResult {
    matched: bool,
    consumed: usize,
    captures: Captures,
}

impl ExtractorResult {
    pub fn matched(consumed: usize, captures: Captures) -> Self {
        Self {
            matched: true,
            consumed,
            captures,
        }
    }

    pub fn unmatched() -> Self {
        Self::default()
    }

    pub fn is_matched(&self) -> bool {
        self.matched
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn captures(&self) -> &Captures {
        &self.captures
    }

    pub fn into_captures(self) -> Captures {
        self.captures
    }
}
