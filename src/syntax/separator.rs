use hashbrown::HashMap as FastHashMap;
use serde::{Deserialize, Serialize};

use super::{SyntaxError, SyntaxResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SeparatorId(pub u16);

/// A separator token value. Paired separators know their counterpart; the
/// shared id groups an opening separator with its closing one so nesting depth
/// can be tracked per kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Separator {
    id: SeparatorId,
    value: Box<str>,
    counterpart: Option<Box<str>>,
    opening: bool,
}

impl Separator {
    pub fn id(&self) -> SeparatorId {
        self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn counterpart(&self) -> Option<&str> {
        self.counterpart.as_deref()
    }

    pub fn is_opening(&self) -> bool {
        self.opening
    }

    pub fn is_closing(&self) -> bool {
        !self.opening && self.counterpart.is_some()
    }
}

pub const PARENTHESIS: (&str, &str) = ("(", ")");
pub const SQUARE_BRACKET: (&str, &str) = ("[", "]");
pub const BRACE: (&str, &str) = ("{", "}");
pub const UNPAIRED: [&str; 3] = [";", ",", "."];

#[derive(Debug, Clone, Default)]
pub struct SeparatorTable {
    by_value: FastHashMap<Box<str>, Separator>,
    /// Wider than `SeparatorId` so that running out is detectable.
    next_id: u32,
}

impl SeparatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut table = Self::new();
        let mut next = 0u16;
        for (open, close) in [PARENTHESIS, SQUARE_BRACKET, BRACE] {
            table.insert_pair(SeparatorId(next), open, close);
            next += 1;
        }
        for value in UNPAIRED {
            table.insert_single(SeparatorId(next), value);
            next += 1;
        }
        table.next_id = u32::from(next);
        table
    }

    /// Registers an opening/closing pair, replacing any previous registration
    /// of either value.
    pub fn register_pair(&mut self, open: &str, close: &str) -> SyntaxResult<SeparatorId> {
        let id = self.allocate(open)?;
        self.insert_pair(id, open, close);
        Ok(id)
    }

    pub fn register(&mut self, value: &str) -> SyntaxResult<SeparatorId> {
        let id = self.allocate(value)?;
        self.insert_single(id, value);
        Ok(id)
    }

    fn allocate(&mut self, value: &str) -> SyntaxResult<SeparatorId> {
        let id = u16::try_from(self.next_id).map_err(|_| SyntaxError::SeparatorIdsExhausted {
            value: value.to_string(),
        })?;
        self.next_id += 1;
        Ok(SeparatorId(id))
    }

    fn insert_pair(&mut self, id: SeparatorId, open: &str, close: &str) {
        self.by_value.insert(
            open.into(),
            Separator {
                id,
                value: open.into(),
                counterpart: Some(close.into()),
                opening: true,
            },
        );
        self.by_value.insert(
            close.into(),
            Separator {
                id,
                value: close.into(),
                counterpart: Some(open.into()),
                opening: false,
            },
        );
    }

    fn insert_single(&mut self, id: SeparatorId, value: &str) {
        self.by_value.insert(
            value.into(),
            Separator {
                id,
                value: value.into(),
                counterpart: None,
                opening: false,
            },
        );
    }

    pub fn get(&self, value: &str) -> Option<&Separator> {
        self.by_value.get(value)
    }

    pub fn opening(&self, value: &str) -> Option<&Separator> {
        self.get(value).filter(|separator| separator.is_opening())
    }

    pub fn closing_of(&self, opening: &Separator) -> Option<&Separator> {
        let close = opening.counterpart()?;
        self.get(close)
            .filter(|separator| separator.is_closing() && separator.id() == opening.id())
    }

    pub fn is_separator(&self, value: &str) -> bool {
        self.by_value.contains_key(value)
    }

    pub fn contains_char(&self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        self.is_separator(ch.encode_utf8(&mut buf))
    }

    pub fn openings(&self) -> impl Iterator<Item = &Separator> {
        self.by_value.values().filter(|separator| separator.is_opening())
    }

    pub fn len(&self) -> usize {
        self.by_value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_value.is_empty()
    }
}
