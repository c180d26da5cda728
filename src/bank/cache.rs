use crate::pattern::Pattern;
use hashbrown::HashMap as FastHashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
struct CacheEntry {
    pattern: Arc<Pattern>,
    last_used: AtomicU64,
}

/// Compiled patterns keyed by their source text.
///
/// Lookups only need a shared reference: each hit stamps its entry from a
/// logical clock, and a full cache evicts the entry with the oldest stamp.
#[derive(Debug)]
pub struct PatternCache {
    capacity: usize,
    entries: FastHashMap<Box<str>, CacheEntry>,
    clock: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl PatternCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: FastHashMap::with_capacity(capacity),
            clock: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Looks `source` up, counting the hit or miss and refreshing recency.
    pub fn get(&self, source: &str) -> Option<Arc<Pattern>> {
        let Some(entry) = self.entries.get(source) else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        };
        entry.last_used.store(self.tick(), Ordering::Relaxed);
        self.hits.fetch_add(1, Ordering::Relaxed);
        Some(entry.pattern.clone())
    }

    pub fn contains(&self, source: &str) -> bool {
        self.entries.contains_key(source)
    }

    /// Stores `pattern` under `source`. Returns the source text evicted to
    /// make room, if any.
    pub fn insert(&mut self, source: &str, pattern: Arc<Pattern>) -> Option<Box<str>> {
        let stamp = self.tick();
        if let Some(entry) = self.entries.get_mut(source) {
            entry.pattern = pattern;
            *entry.last_used.get_mut() = stamp;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.evict_stalest()
        } else {
            None
        };

        self.entries.insert(
            source.into(),
            CacheEntry {
                pattern,
                last_used: AtomicU64::new(stamp),
            },
        );
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// `(hits, misses)` counted by [`PatternCache::get`].
    pub fn metrics(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn evict_stalest(&mut self) -> Option<Box<str>> {
        let stalest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used.load(Ordering::Relaxed))
            .map(|(source, _)| source.clone())?;
        self.entries.remove(&stalest);
        Some(stalest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compiled(source: &str) -> Arc<Pattern> {
        Arc::new(Pattern::compile(source).expect("pattern should compile"))
    }

    #[test]
    fn lookup_keeps_entry_alive_over_newer_ones() {
        let mut cache = PatternCache::new(2);
        cache.insert("let x", compiled("let x"));
        cache.insert("fn f", compiled("fn f"));

        assert!(cache.get("let x").is_some());
        let evicted = cache.insert("if c", compiled("if c"));

        assert_eq!(evicted.as_deref(), Some("fn f"));
        assert!(cache.contains("let x"));
        assert!(cache.contains("if c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn recompiling_same_source_replaces_without_eviction() {
        let mut cache = PatternCache::new(1);
        cache.insert("a <b>", compiled("a <b>"));

        let replacement = compiled("a <b>");
        assert_eq!(cache.insert("a <b>", replacement.clone()), None);

        let stored = cache.get("a <b>").expect("entry should be cached");
        assert!(Arc::ptr_eq(&stored, &replacement));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn lookups_are_counted() {
        let mut cache = PatternCache::new(4);
        assert!(cache.get("x").is_none());
        cache.insert("x", compiled("x"));
        assert!(cache.get("x").is_some());
        assert!(cache.get("x").is_some());

        assert_eq!(cache.metrics(), (2, 1));
    }

    #[test]
    fn zero_capacity_still_holds_one_pattern() {
        let mut cache = PatternCache::new(0);
        cache.insert("a", compiled("a"));

        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.insert("b", compiled("b")).as_deref(), Some("a"));
        assert!(!cache.is_empty());
    }
}
