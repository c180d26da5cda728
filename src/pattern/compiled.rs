use std::fmt;
use std::sync::Arc;

use super::analysis::{identifiers, min_length};
use super::element::Element;
use super::{PatternCompiler, PatternResult};
use crate::extractor::WildcardValidator;

/// A compiled element tree together with the validator consulted for hinted
/// wildcards. Immutable once built; share it behind an `Arc`.
#[derive(Clone)]
pub struct Pattern {
    source: Box<str>,
    root: Element,
    validator: Option<Arc<dyn WildcardValidator>>,
    min_length: usize,
}

impl Pattern {
    pub fn new(source: &str, root: Element) -> Self {
        let min_length = min_length(&root);
        Self {
            source: source.into(),
            root,
            validator: None,
            min_length,
        }
    }

    /// Compiles `source` with the default compiler.
    pub fn compile(source: &str) -> PatternResult<Self> {
        Self::compile_with(&PatternCompiler::default(), source)
    }

    pub fn compile_with(compiler: &PatternCompiler, source: &str) -> PatternResult<Self> {
        let root = compiler.compile(source)?;
        Ok(Self::new(source, root))
    }

    pub fn with_validator<V>(mut self, validator: V) -> Self
    where
        V: WildcardValidator + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    pub fn with_shared_validator(mut self, validator: Arc<dyn WildcardValidator>) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn validator(&self) -> Option<&dyn WildcardValidator> {
        self.validator.as_deref()
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn identifiers(&self) -> Vec<&str> {
        identifiers(&self.root)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("source", &self.source)
            .field("root", &self.root)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.root == other.root
    }
}
