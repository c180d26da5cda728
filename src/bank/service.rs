use crate::bank::cache::PatternCache;
use crate::bank::registry::RuleRegistry;
use crate::bank::snapshot::BankSnapshot;
use crate::bank::{BankError, BankOptions, BankResult};
use crate::extractor::ExtractorResult;
use crate::pattern::{Pattern, PatternCompiler};
use crate::syntax::Syntax;
use crate::token::TokenStream;
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::OnceLock;

#[derive(Debug)]
struct BankState {
    registry: RuleRegistry,
    readonly: OnceLock<Arc<BankSnapshot>>,
}

/// Collects named patterns, then seals them into a shared read-only
/// snapshot. Compilation goes through an LRU cache keyed by pattern text.
#[derive(Debug)]
pub struct PatternBank {
    inner: RwLock<BankState>,
    compiler: PatternCompiler,
    options: BankOptions,
    cache: RwLock<PatternCache>,
}

impl PatternBank {
    pub fn new(options: Option<BankOptions>) -> BankResult<Self> {
        Self::with_syntax(options, Syntax::default())
    }

    pub fn with_syntax(options: Option<BankOptions>, syntax: Syntax) -> BankResult<Self> {
        let options = options.unwrap_or_default();
        options.validate()?;

        Ok(Self {
            inner: RwLock::new(BankState {
                registry: RuleRegistry::new(),
                readonly: OnceLock::new(),
            }),
            compiler: PatternCompiler::new(options.compiler, Arc::new(syntax)),
            cache: RwLock::new(PatternCache::new(options.cache_capacity)),
            options,
        })
    }

    pub fn options(&self) -> &BankOptions {
        &self.options
    }

    pub fn syntax(&self) -> &Syntax {
        self.compiler.syntax()
    }

    /// Compiles `source` once and hands out the shared result on later calls.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn compile(&self, source: &str) -> BankResult<Arc<Pattern>> {
        let cached = self.cache.read().get(source);
        if let Some(hit) = cached {
            if self.options.debug {
                tracing::debug!(cache = "hit", source, "pattern cache hit");
            }
            return Ok(hit);
        }

        if self.options.debug {
            tracing::debug!(cache = "miss", source, "pattern cache miss");
        }

        let pattern = Arc::new(Pattern::compile_with(&self.compiler, source)?);
        let evicted = self.cache.write().insert(source, pattern.clone());
        if self.options.debug
            && let Some(evicted) = evicted
        {
            tracing::debug!(evicted = &*evicted, "pattern cache eviction");
        }
        Ok(pattern)
    }

    pub fn register(&self, name: &str, source: &str) -> BankResult<()> {
        self.ensure_open(name)?;
        let pattern = self.compile(source)?;
        self.insert(name, pattern)
    }

    /// Registers an already built pattern, e.g. one carrying a wildcard
    /// validator.
    pub fn register_pattern(&self, name: &str, pattern: Pattern) -> BankResult<()> {
        self.insert(name, Arc::new(pattern))
    }

    fn insert(&self, name: &str, pattern: Arc<Pattern>) -> BankResult<()> {
        let mut guard = self.inner.write();
        if guard.readonly.get().is_some() {
            return Err(BankError::RegisterWhileSealed {
                name: name.to_string(),
            });
        }

        guard.registry.insert(name, pattern)?;
        if self.options.debug {
            tracing::debug!(rule = name, total = guard.registry.len(), "rule registered");
        }
        Ok(())
    }

    fn ensure_open(&self, name: &str) -> BankResult<()> {
        if self.is_sealed() {
            return Err(BankError::RegisterWhileSealed {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn is_sealed(&self) -> bool {
        self.inner.read().readonly.get().is_some()
    }

    /// Freezes the registered rules. Sealing twice keeps the first snapshot.
    pub fn seal(&self) -> Arc<BankSnapshot> {
        let mut guard = self.inner.write();
        if let Some(existing) = guard.readonly.get() {
            return existing.clone();
        }

        let registered = guard.registry.metrics().total_rules_registered;
        let snapshot = Arc::new(BankSnapshot::new(
            guard.registry.take_rules(),
            self.compiler.syntax().clone(),
            self.options.extractor,
            self.options.debug,
        ));
        tracing::debug!(rules = registered, "pattern bank sealed");

        let _ = guard.readonly.set(snapshot.clone());
        snapshot
    }

    pub fn extract(&self, name: &str, stream: &mut TokenStream) -> BankResult<ExtractorResult> {
        self.get_readonly()?.extract(name, stream)
    }

    pub fn get_readonly(&self) -> BankResult<Arc<BankSnapshot>> {
        let guard = self.inner.read();
        guard.readonly.get().cloned().ok_or(BankError::NotSealed)
    }

    /// `(hits, misses)` of the compile cache.
    pub fn cache_metrics(&self) -> (u64, u64) {
        self.cache.read().metrics()
    }

    pub fn cached_patterns(&self) -> usize {
        self.cache.read().len()
    }
}
