use hashbrown::HashMap as FastHashMap;
use smallvec::SmallVec;

use crate::token::{Token, render};

/// Capture recorded during matching: identifier plus token range relative to
/// the matched slice.
pub(crate) type CaptureEntry<'p> = (&'p str, (usize, usize));
pub(crate) type CaptureBuffer<'p> = SmallVec<[CaptureEntry<'p>; 8]>;

/// Named token subsequences produced by a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures {
    map: FastHashMap<String, Vec<Token>>,
}

impl Captures {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_entries(tokens: &[Token], entries: &[CaptureEntry<'_>]) -> Self {
        let mut map = FastHashMap::with_capacity(entries.len());
        for &(name, (start, end)) in entries {
            if start <= end && end <= tokens.len() {
                map.insert(name.to_string(), tokens[start..end].to_vec());
            }
        }
        Self { map }
    }

    pub fn get(&self, identifier: &str) -> Option<&[Token]> {
        self.map.get(identifier).map(Vec::as_slice)
    }

    pub fn values_of(&self, identifier: &str) -> Option<Vec<&str>> {
        self.get(identifier)
            .map(|tokens| tokens.iter().map(Token::value).collect())
    }

    /// Capture rendered back to text, spaced as in the source.
    pub fn text_of(&self, identifier: &str) -> Option<String> {
        self.get(identifier).map(render)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.map.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Token])> {
        self.map
            .iter()
            .map(|(name, tokens)| (name.as_str(), tokens.as_slice()))
    }

    pub fn into_map(self) -> FastHashMap<String, Vec<Token>> {
        self.map
    }
}
