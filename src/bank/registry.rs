use crate::bank::{BankError, BankResult};
use crate::pattern::Pattern;
use hashbrown::HashMap as FastHashMap;
use std::sync::Arc;

#[derive(Debug, Default, Clone)]
pub struct RegistryMetrics {
    pub total_rules_registered: usize,
}

impl RegistryMetrics {
    pub fn record_insert(&mut self) {
        self.total_rules_registered += 1;
    }
}

/// Named rules collected before the bank is sealed.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: FastHashMap<Box<str>, Arc<Pattern>>,
    metrics: RegistryMetrics,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, pattern: Arc<Pattern>) -> BankResult<()> {
        if self.rules.contains_key(name) {
            return Err(BankError::DuplicateRule {
                name: name.to_string(),
            });
        }
        self.rules.insert(name.into(), pattern);
        self.metrics.record_insert();
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Pattern>> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Moves the rules out, leaving the registry empty.
    pub fn take_rules(&mut self) -> FastHashMap<Box<str>, Arc<Pattern>> {
        self.metrics = RegistryMetrics::default();
        std::mem::take(&mut self.rules)
    }

    pub fn metrics(&self) -> &RegistryMetrics {
        &self.metrics
    }
}
