use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("no separator id left to register '{value}'")]
    SeparatorIdsExhausted { value: String },
}

pub type SyntaxResult<T> = Result<T, SyntaxError>;
