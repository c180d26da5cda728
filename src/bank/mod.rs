mod cache;
mod errors;
mod options;
mod registry;
mod service;
mod snapshot;

pub use cache::PatternCache;
pub use errors::{BankError, BankResult};
pub use options::{
    BankOptions, BankOptionsBuilder, CompilerOptions, CompilerOptionsBuilder, ConfigError,
    DEFAULT_CACHE_CAPACITY, DEFAULT_ESCAPE_CHAR, ExtractorOptions, ExtractorOptionsBuilder,
    WildcardPolicy,
};
pub use registry::{RegistryMetrics, RuleRegistry};
pub use service::PatternBank;
pub use snapshot::{BankSnapshot, MAX_RESOLVE_DEPTH};
