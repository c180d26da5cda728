use crate::bank::{BankError, BankResult, ExtractorOptions};
use crate::extractor::{Candidates, DynamicResolver, Extractor, ExtractorResult};
use crate::pattern::Pattern;
use crate::syntax::Syntax;
use crate::token::{Token, TokenStream};
use hashbrown::HashMap as FastHashMap;
use std::cell::Cell;
use std::sync::Arc;

/// Nesting limit for `{rule}` references resolved through the snapshot.
/// Left-recursive rules fail to resolve instead of overflowing the stack.
pub const MAX_RESOLVE_DEPTH: usize = 64;

thread_local! {
    static RESOLVE_DEPTH: Cell<usize> = const { Cell::new(0) };
}

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Option<Self> {
        RESOLVE_DEPTH.with(|depth| {
            let current = depth.get();
            if current >= MAX_RESOLVE_DEPTH {
                return None;
            }
            depth.set(current + 1);
            Some(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        RESOLVE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Read-only view of a sealed bank.
#[derive(Debug, Clone)]
pub struct BankSnapshot {
    rules: FastHashMap<Box<str>, Arc<Pattern>>,
    syntax: Arc<Syntax>,
    options: ExtractorOptions,
    debug: bool,
}

impl BankSnapshot {
    pub(crate) fn new(
        rules: FastHashMap<Box<str>, Arc<Pattern>>,
        syntax: Arc<Syntax>,
        options: ExtractorOptions,
        debug: bool,
    ) -> Self {
        Self {
            rules,
            syntax,
            options,
            debug,
        }
    }

    pub fn rule(&self, name: &str) -> Option<&Arc<Pattern>> {
        self.rules.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|name| &**name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Extractor bound to this snapshot's syntax, options and rule resolver.
    pub fn extractor(&self) -> Extractor<'_> {
        Extractor::new(&self.syntax)
            .with_options(self.options)
            .with_resolver(self)
    }

    #[tracing::instrument(level = "trace", skip(self, stream), fields(index = stream.index()))]
    pub fn extract(&self, name: &str, stream: &mut TokenStream) -> BankResult<ExtractorResult> {
        let pattern = self.rule(name).ok_or_else(|| BankError::UnknownRule {
            name: name.to_string(),
        })?;
        let result = self.extractor().extract(pattern, stream)?;
        if self.debug {
            tracing::debug!(
                rule = name,
                matched = result.is_matched(),
                consumed = result.consumed(),
                "rule extracted"
            );
        }
        Ok(result)
    }

    /// Extracts an ad-hoc pattern whose `{name}` references resolve to this
    /// snapshot's rules.
    pub fn extract_pattern(
        &self,
        pattern: &Pattern,
        stream: &mut TokenStream,
    ) -> BankResult<ExtractorResult> {
        Ok(self.extractor().extract(pattern, stream)?)
    }
}

impl DynamicResolver for BankSnapshot {
    fn resolve(&self, reference: &str, tokens: &[Token]) -> Candidates {
        let Some(pattern) = self.rules.get(reference) else {
            return Candidates::new();
        };
        let Some(_guard) = DepthGuard::enter() else {
            return Candidates::new();
        };

        self.extractor()
            .extract_lengths(pattern, tokens)
            .unwrap_or_else(|err| {
                tracing::trace!(reference, error = %err, "rule reference failed");
                Candidates::new()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(rules: &[(&str, &str)]) -> BankSnapshot {
        let rules = rules
            .iter()
            .map(|(name, source)| {
                let pattern = Pattern::compile(source).expect("pattern should compile");
                (Box::<str>::from(*name), Arc::new(pattern))
            })
            .collect();
        BankSnapshot::new(
            rules,
            Arc::new(Syntax::default()),
            ExtractorOptions::default(),
            false,
        )
    }

    #[test]
    fn resolves_references_to_registered_rules() {
        let snapshot = snapshot(&[("pair", "~( ~(")]);
        let tokens = Syntax::default().tokens(["(", ")", "(", "x", ")", "y"]);

        assert_eq!(snapshot.resolve("pair", &tokens).as_slice(), &[5]);
        assert!(snapshot.resolve("missing", &tokens).is_empty());
    }

    #[test]
    fn left_recursive_rule_fails_instead_of_overflowing() {
        let snapshot = snapshot(&[("loop", "{loop} x")]);
        let tokens = Syntax::default().tokens(["x"]);

        assert!(snapshot.resolve("loop", &tokens).is_empty());
    }

    #[test]
    fn rule_ending_in_wildcard_offers_every_length() {
        let snapshot = snapshot(&[("value", "*")]);
        let tokens = Syntax::default().tokens(["1", ";"]);

        assert_eq!(snapshot.resolve("value", &tokens).as_slice(), &[1, 2]);
    }
}
