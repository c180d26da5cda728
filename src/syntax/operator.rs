use hashbrown::HashMap as FastHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatorFamily {
    Arithmetic,
    Comparison,
    Logical,
    Assignment,
    Bitwise,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operator {
    value: Box<str>,
    family: OperatorFamily,
}

impl Operator {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn family(&self) -> OperatorFamily {
        self.family
    }
}

const STANDARD: &[(&str, OperatorFamily)] = &[
    ("+", OperatorFamily::Arithmetic),
    ("-", OperatorFamily::Arithmetic),
    ("*", OperatorFamily::Arithmetic),
    ("/", OperatorFamily::Arithmetic),
    ("%", OperatorFamily::Arithmetic),
    ("++", OperatorFamily::Arithmetic),
    ("--", OperatorFamily::Arithmetic),
    ("==", OperatorFamily::Comparison),
    ("!=", OperatorFamily::Comparison),
    ("<", OperatorFamily::Comparison),
    (">", OperatorFamily::Comparison),
    ("<=", OperatorFamily::Comparison),
    (">=", OperatorFamily::Comparison),
    ("&&", OperatorFamily::Logical),
    ("||", OperatorFamily::Logical),
    ("!", OperatorFamily::Logical),
    ("=", OperatorFamily::Assignment),
    ("+=", OperatorFamily::Assignment),
    ("-=", OperatorFamily::Assignment),
    ("*=", OperatorFamily::Assignment),
    ("/=", OperatorFamily::Assignment),
    ("&", OperatorFamily::Bitwise),
    ("|", OperatorFamily::Bitwise),
    ("^", OperatorFamily::Bitwise),
    ("~", OperatorFamily::Bitwise),
    ("<<", OperatorFamily::Bitwise),
    (">>", OperatorFamily::Bitwise),
];

#[derive(Debug, Clone, Default)]
pub struct OperatorTable {
    by_value: FastHashMap<Box<str>, Operator>,
}

impl OperatorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        let mut table = Self::new();
        for &(value, family) in STANDARD {
            table.register(value, family);
        }
        table
    }

    pub fn register(&mut self, value: &str, family: OperatorFamily) {
        self.by_value.insert(
            value.into(),
            Operator {
                value: value.into(),
                family,
            },
        );
    }

    pub fn get(&self, value: &str) -> Option<&Operator> {
        self.by_value.get(value)
    }

    pub fn is_operator(&self, value: &str) -> bool {
        self.by_value.contains_key(value)
    }

    pub fn family_of(&self, value: &str) -> OperatorFamily {
        self.get(value)
            .map(Operator::family)
            .unwrap_or(OperatorFamily::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_knows_compound_operators() {
        let table = OperatorTable::standard();

        assert_eq!(table.family_of("+="), OperatorFamily::Assignment);
        assert_eq!(table.family_of("&&"), OperatorFamily::Logical);
        assert_eq!(table.family_of("class"), OperatorFamily::Unknown);
        assert!(!table.is_operator("class"));
    }
}
