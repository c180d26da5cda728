//! Compiles a small pattern language into element trees and matches them
//! against token streams with backtracking, producing named captures.
//!
//! ```
//! use lexpat_rs::{Extractor, Pattern, TokenStream};
//!
//! let pattern = Pattern::compile("let name:* = value:*").expect("pattern should compile");
//! let mut stream = TokenStream::from_values(["let", "x", "=", "1"]);
//! let result = Extractor::default()
//!     .extract(&pattern, &mut stream)
//!     .expect("extraction should not error");
//!
//! assert!(result.is_matched());
//! assert_eq!(result.captures().values_of("name"), Some(vec!["x"]));
//! assert_eq!(result.captures().values_of("value"), Some(vec!["1"]));
//! ```

pub mod bank;
pub mod extractor;
pub mod pattern;
pub mod syntax;
pub mod token;

pub use bank::{
    BankError, BankOptions, BankResult, BankSnapshot, CompilerOptions, ConfigError,
    ExtractorOptions, PatternBank, WildcardPolicy,
};
pub use extractor::{
    Candidates, Captures, DynamicResolver, ExtractError, ExtractResult, Extractor, ExtractorResult,
    RegexValidator, WildcardValidator, extract,
};
pub use pattern::{Element, ElementKind, Isolation, Pattern, PatternCompiler, PatternError, PatternResult};
pub use syntax::{Syntax, SyntaxError, SyntaxResult};
pub use token::{Token, TokenKind, TokenStream};
