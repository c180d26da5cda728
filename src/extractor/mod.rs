mod captures;
mod cursor;
mod error;
mod resolver;
mod result;
mod worker;

pub use captures::Captures;
pub use cursor::Cursor;
pub use error::{ExtractError, ExtractResult};
pub use resolver::{Candidates, DynamicResolver, RegexValidator, WildcardValidator};
pub use result::ExtractorResult;

use std::sync::LazyLock;

use crate::bank::ExtractorOptions;
use crate::pattern::Pattern;
use crate::syntax::Syntax;
use crate::token::{Token, TokenStream};
use worker::Worker;

static DEFAULT_SYNTAX: LazyLock<Syntax> = LazyLock::new(Syntax::default);

/// Runs compiled patterns against token streams.
#[derive(Clone, Copy)]
pub struct Extractor<'a> {
    syntax: &'a Syntax,
    resolver: Option<&'a dyn DynamicResolver>,
    options: ExtractorOptions,
}

impl<'a> Extractor<'a> {
    pub fn new(syntax: &'a Syntax) -> Self {
        Self {
            syntax,
            resolver: None,
            options: ExtractorOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ExtractorOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_resolver(mut self, resolver: &'a dyn DynamicResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn options(&self) -> ExtractorOptions {
        self.options
    }

    /// Matches `pattern` at the stream's read position. Only a successful
    /// match moves the stream, and only past the consumed tokens.
    #[tracing::instrument(level = "trace", skip_all, fields(pattern = %pattern.source(), index = stream.index()))]
    pub fn extract(
        &self,
        pattern: &Pattern,
        stream: &mut TokenStream,
    ) -> ExtractResult<ExtractorResult> {
        let result = self.extract_from(pattern, stream.tokens(), stream.index())?;
        if result.is_matched() {
            stream.read(result.consumed());
        }
        Ok(result)
    }

    /// Matches `pattern` at the start of `tokens`.
    pub fn extract_at(&self, pattern: &Pattern, tokens: &[Token]) -> ExtractResult<ExtractorResult> {
        self.extract_from(pattern, tokens, 0)
    }

    /// Every number of tokens `pattern` can consume at the start of `tokens`,
    /// shortest first. Empty when it cannot match at all.
    pub fn extract_lengths(&self, pattern: &Pattern, tokens: &[Token]) -> ExtractResult<Candidates> {
        let cursor = Cursor::at(tokens, 0);
        if pattern.min_length() > cursor.available() {
            return Ok(Candidates::new());
        }
        Worker::new(pattern, self.syntax, self.resolver, self.options).lengths(cursor)
    }

    fn extract_from(
        &self,
        pattern: &Pattern,
        tokens: &[Token],
        index: usize,
    ) -> ExtractResult<ExtractorResult> {
        let cursor = Cursor::at(tokens, index);
        if pattern.min_length() > cursor.available() {
            tracing::trace!(
                required = pattern.min_length(),
                available = cursor.available(),
                "too few tokens"
            );
            return Ok(ExtractorResult::unmatched());
        }

        let worker = Worker::new(pattern, self.syntax, self.resolver, self.options);
        match worker.run(cursor)? {
            Some((end, entries)) => {
                let captures = Captures::from_entries(tokens, &entries);
                Ok(ExtractorResult::matched(end.index() - cursor.index(), captures))
            }
            None => Ok(ExtractorResult::unmatched()),
        }
    }
}

impl Default for Extractor<'static> {
    fn default() -> Self {
        Self::new(&DEFAULT_SYNTAX)
    }
}

/// Extracts with the default syntax tables and no dynamic resolver.
pub fn extract(pattern: &Pattern, stream: &mut TokenStream) -> ExtractResult<ExtractorResult> {
    Extractor::default().extract(pattern, stream)
}
