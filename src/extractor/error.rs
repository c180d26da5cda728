use thiserror::Error;

/// Structural inconsistencies detected while matching. Failing to match is
/// not an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("section in pattern '{pattern}' opens with '{separator}', which has no registered closing separator")]
    UnregisteredSeparator { pattern: String, separator: String },
    #[error("pattern '{pattern}' references dynamic '{reference}' but no resolver is configured")]
    MissingResolver { pattern: String, reference: String },
}

pub type ExtractResult<T> = Result<T, ExtractError>;
