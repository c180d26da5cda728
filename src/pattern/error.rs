use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern '{pattern}' compiles to no elements")]
    EmptyPattern { pattern: String },
    #[error("pattern '{pattern}' has an unterminated '{open}' starting at byte {start}")]
    UnterminatedGroup {
        pattern: String,
        open: char,
        start: usize,
    },
    #[error("pattern '{pattern}' references unknown separator '{found}' at byte {index}")]
    UnknownSeparator {
        pattern: String,
        found: char,
        index: usize,
    },
    #[error("pattern '{pattern}' ends with a section operator and no separator")]
    DanglingSectionOperator { pattern: String },
    #[error("pattern '{pattern}' ends with a lone escape character at byte {index}")]
    LoneEscapeCharacter { pattern: String, index: usize },
    #[error("identifier '{name}' in pattern '{pattern}' is not followed by an element")]
    DanglingIdentifier { pattern: String, name: String },
    #[error("identifier '{name}' in pattern '{pattern}' targets an element already named '{existing}'")]
    ConflictingIdentifier {
        pattern: String,
        name: String,
        existing: String,
    },
    #[error("identifier '{name}' is bound more than once in pattern '{pattern}'")]
    DuplicateIdentifier { pattern: String, name: String },
    #[error("fragment '{fragment}' of pattern '{pattern}' failed to compile")]
    Nested {
        pattern: String,
        fragment: String,
        #[source]
        source: Box<PatternError>,
    },
}

impl PatternError {
    /// The innermost error, skipping `Nested` wrappers.
    pub fn root_cause(&self) -> &PatternError {
        match self {
            PatternError::Nested { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

pub type PatternResult<T> = Result<T, PatternError>;
