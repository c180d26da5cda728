use hashbrown::HashMap as FastHashMap;
use regex::Regex;
use smallvec::SmallVec;

use crate::token::{Token, render};

/// Token counts a dynamic reference may consume, in the order the matcher
/// tries them.
pub type Candidates = SmallVec<[usize; 4]>;

/// Resolves `{reference}` elements. Returns every number of tokens from the
/// start of `tokens` the referenced sub-pattern can consume; an empty list
/// means it does not match there. The matcher tries the candidates in order
/// and backtracks into the next one when the rest of the pattern fails.
pub trait DynamicResolver: Send + Sync {
    fn resolve(&self, reference: &str, tokens: &[Token]) -> Candidates;
}

/// Closures resolve to at most one length.
impl<F> DynamicResolver for F
where
    F: Fn(&str, &[Token]) -> Option<usize> + Send + Sync,
{
    fn resolve(&self, reference: &str, tokens: &[Token]) -> Candidates {
        self(reference, tokens).into_iter().collect()
    }
}

/// Accepts or rejects the run a hinted wildcard is about to consume.
pub trait WildcardValidator: Send + Sync {
    fn accepts(&self, hint: &str, run: &[Token]) -> bool;
}

impl<F> WildcardValidator for F
where
    F: Fn(&str, &[Token]) -> bool + Send + Sync,
{
    fn accepts(&self, hint: &str, run: &[Token]) -> bool {
        self(hint, run)
    }
}

/// Validates hinted runs against one regular expression per hint. The run is
/// rendered with single spaces where its tokens were spaced; hints without a
/// registered expression accept anything.
#[derive(Debug, Clone, Default)]
pub struct RegexValidator {
    rules: FastHashMap<Box<str>, Regex>,
}

impl RegexValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, hint: &str, expression: &str) -> Result<Self, regex::Error> {
        let anchored = Regex::new(&format!("^(?:{expression})$"))?;
        self.rules.insert(hint.into(), anchored);
        Ok(self)
    }
}

impl WildcardValidator for RegexValidator {
    fn accepts(&self, hint: &str, run: &[Token]) -> bool {
        match self.rules.get(hint) {
            Some(expression) => expression.is_match(&render(run)),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_validator_checks_only_registered_hints() {
        let validator = RegexValidator::new()
            .rule("number", r"\d+")
            .expect("expression should compile");

        assert!(validator.accepts("number", &[Token::new("42")]));
        assert!(!validator.accepts("number", &[Token::new("x")]));
        assert!(validator.accepts("anything", &[Token::new("x")]));
    }

    #[test]
    fn closures_act_as_resolvers() {
        let resolver = |reference: &str, tokens: &[Token]| {
            (reference == "one" && !tokens.is_empty()).then_some(1usize)
        };

        assert_eq!(resolver.resolve("one", &[Token::new("a")]).as_slice(), &[1]);
        assert!(resolver.resolve("two", &[Token::new("a")]).is_empty());
    }
}
