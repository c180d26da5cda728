use crate::bank::ConfigError;
use crate::extractor::ExtractError;
use crate::pattern::PatternError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BankError {
    #[error("pattern bank is sealed; cannot register rule '{name}'")]
    RegisterWhileSealed { name: String },
    #[error("pattern bank is not sealed; rule lookup is unavailable")]
    NotSealed,
    #[error("rule '{name}' is already registered")]
    DuplicateRule { name: String },
    #[error("no rule named '{name}' is registered")]
    UnknownRule { name: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

pub type BankResult<T> = Result<T, BankError>;
