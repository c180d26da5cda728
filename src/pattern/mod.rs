pub mod analysis;
mod compiled;
mod compiler;
mod element;
mod error;
mod identifier;
mod isolation;
mod scanner;

pub use compiled::Pattern;
pub use compiler::PatternCompiler;
pub use element::{
    DynamicElement, Element, ElementKind, Lexemes, NodeElement, Rendered, SectionElement,
    UnitElement, WildcardElement,
};
pub use error::{PatternError, PatternResult};
pub use isolation::Isolation;
