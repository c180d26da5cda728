use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ESCAPE_CHAR: char = '\\';
pub const DEFAULT_CACHE_CAPACITY: usize = 256;
pub(crate) const STRUCTURAL_CHARS: [char; 12] = [
    '<', '>', '(', ')', '{', '}', '[', ']', '*', '~', '|', ':',
];

/// How a wildcard decides how many tokens to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WildcardPolicy {
    /// Lazy, except when nothing follows in the pattern; then greedy.
    #[default]
    Auto,
    Lazy,
    Greedy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerOptions {
    pub escape_char: char,
    pub split_by_whitespace: bool,
    pub wildcard_policy: WildcardPolicy,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            escape_char: DEFAULT_ESCAPE_CHAR,
            split_by_whitespace: false,
            wildcard_policy: WildcardPolicy::default(),
        }
    }
}

impl CompilerOptions {
    pub fn builder() -> CompilerOptionsBuilder {
        CompilerOptionsBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.escape_char.is_whitespace() || STRUCTURAL_CHARS.contains(&self.escape_char) {
            return Err(ConfigError::InvalidEscapeChar {
                found: self.escape_char,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct CompilerOptionsBuilder {
    options: CompilerOptions,
}

impl CompilerOptionsBuilder {
    pub fn escape_char(mut self, value: char) -> Self {
        self.options.escape_char = value;
        self
    }

    pub fn split_by_whitespace(mut self, value: bool) -> Self {
        self.options.split_by_whitespace = value;
        self
    }

    pub fn wildcard_policy(mut self, value: WildcardPolicy) -> Self {
        self.options.wildcard_policy = value;
        self
    }

    pub fn build(self) -> Result<CompilerOptions, ConfigError> {
        self.options.validate()?;
        Ok(self.options)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExtractorOptions {
    /// Reject matches whose isolated elements abut neighbouring tokens that
    /// are neither spaced nor separators.
    pub enforce_isolation: bool,
}

impl ExtractorOptions {
    pub fn builder() -> ExtractorOptionsBuilder {
        ExtractorOptionsBuilder::default()
    }
}

#[derive(Debug, Default, Clone)]
pub struct ExtractorOptionsBuilder {
    options: ExtractorOptions,
}

impl ExtractorOptionsBuilder {
    pub fn enforce_isolation(mut self, value: bool) -> Self {
        self.options.enforce_isolation = value;
        self
    }

    pub fn build(self) -> ExtractorOptions {
        self.options
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankOptions {
    pub compiler: CompilerOptions,
    pub extractor: ExtractorOptions,
    pub cache_capacity: usize,
    pub debug: bool,
}

impl Default for BankOptions {
    fn default() -> Self {
        Self {
            compiler: CompilerOptions::default(),
            extractor: ExtractorOptions::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            debug: false,
        }
    }
}

impl BankOptions {
    pub fn builder() -> BankOptionsBuilder {
        BankOptionsBuilder::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache_capacity == 0 {
            return Err(ConfigError::CacheCapacityInvalid { provided: 0 });
        }
        self.compiler.validate()?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct BankOptionsBuilder {
    options: BankOptions,
}

impl BankOptionsBuilder {
    pub fn compiler(mut self, value: CompilerOptions) -> Self {
        self.options.compiler = value;
        self
    }

    pub fn extractor(mut self, value: ExtractorOptions) -> Self {
        self.options.extractor = value;
        self
    }

    pub fn cache_capacity(mut self, value: usize) -> Self {
        self.options.cache_capacity = value;
        self
    }

    pub fn debug(mut self, value: bool) -> Self {
        self.options.debug = value;
        self
    }

    pub fn build(self) -> Result<BankOptions, ConfigError> {
        let options = self.options;
        options.validate()?;
        Ok(options)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("escape character '{found}' collides with pattern syntax or whitespace")]
    InvalidEscapeChar { found: char },
    #[error("cache_capacity must be at least 1 (got {provided})")]
    CacheCapacityInvalid { provided: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_structural_escape_char() {
        let err = CompilerOptions::builder()
            .escape_char('~')
            .build()
            .expect_err("structural escape should be rejected");

        assert_eq!(err, ConfigError::InvalidEscapeChar { found: '~' });
    }

    #[test]
    fn rejects_zero_cache_capacity() {
        let err = BankOptions::builder()
            .cache_capacity(0)
            .build()
            .expect_err("zero capacity should be rejected");

        assert_eq!(err, ConfigError::CacheCapacityInvalid { provided: 0 });
    }

    #[test]
    fn builder_keeps_defaults_for_untouched_fields() {
        let options = CompilerOptions::builder()
            .split_by_whitespace(true)
            .build()
            .expect("options should build");

        assert_eq!(options.escape_char, DEFAULT_ESCAPE_CHAR);
        assert_eq!(options.wildcard_policy, WildcardPolicy::Auto);
        assert!(options.split_by_whitespace);
    }
}
