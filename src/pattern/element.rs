use smallvec::SmallVec;
use std::fmt;

use super::isolation::Isolation;
use crate::bank::{DEFAULT_ESCAPE_CHAR, WildcardPolicy};
use crate::syntax::Separator;

pub type Lexemes = SmallVec<[Box<str>; 2]>;

/// One node of a compiled pattern tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    kind: ElementKind,
    identifier: Option<Box<str>>,
    optional: bool,
    isolation: Isolation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    Unit(UnitElement),
    Wildcard(WildcardElement),
    Dynamic(DynamicElement),
    Section(SectionElement),
    Node(NodeElement),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitElement {
    literal: Box<str>,
    lexemes: Lexemes,
}

impl UnitElement {
    pub fn new(literal: &str, lexemes: Lexemes) -> Self {
        Self {
            literal: literal.into(),
            lexemes,
        }
    }

    /// A unit that matches exactly one blank token.
    pub fn blank() -> Self {
        Self {
            literal: " ".into(),
            lexemes: Lexemes::new(),
        }
    }

    pub fn literal(&self) -> &str {
        &self.literal
    }

    pub fn lexemes(&self) -> &[Box<str>] {
        &self.lexemes
    }

    pub fn is_blank(&self) -> bool {
        self.lexemes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WildcardElement {
    hint: Option<Box<str>>,
    policy: WildcardPolicy,
}

impl WildcardElement {
    pub fn new(hint: Option<&str>, policy: WildcardPolicy) -> Self {
        Self {
            hint: hint.map(Into::into),
            policy,
        }
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn policy(&self) -> WildcardPolicy {
        self.policy
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DynamicElement {
    reference: Box<str>,
}

impl DynamicElement {
    pub fn new(reference: &str) -> Self {
        Self {
            reference: reference.into(),
        }
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionElement {
    separator: Separator,
}

impl SectionElement {
    pub fn new(separator: Separator) -> Self {
        Self { separator }
    }

    pub fn separator(&self) -> &Separator {
        &self.separator
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeElement {
    children: Vec<Element>,
    variant: bool,
}

impl NodeElement {
    pub fn sequence(children: Vec<Element>) -> Self {
        Self {
            children,
            variant: false,
        }
    }

    pub fn variant(children: Vec<Element>) -> Self {
        Self {
            children,
            variant: true,
        }
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn is_variant(&self) -> bool {
        self.variant
    }
}

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        let isolation = match kind {
            ElementKind::Section(_) => Isolation::BOTH,
            _ => Isolation::NONE,
        };
        Self {
            kind,
            identifier: None,
            optional: false,
            isolation,
        }
    }

    pub fn unit(unit: UnitElement) -> Self {
        Self::new(ElementKind::Unit(unit))
    }

    pub fn wildcard(hint: Option<&str>, policy: WildcardPolicy) -> Self {
        Self::new(ElementKind::Wildcard(WildcardElement::new(hint, policy)))
    }

    pub fn dynamic(reference: &str) -> Self {
        Self::new(ElementKind::Dynamic(DynamicElement::new(reference)))
    }

    pub fn section(separator: Separator) -> Self {
        Self::new(ElementKind::Section(SectionElement::new(separator)))
    }

    pub fn sequence(children: Vec<Element>) -> Self {
        Self::new(ElementKind::Node(NodeElement::sequence(children)))
    }

    pub fn variant(children: Vec<Element>) -> Self {
        Self::new(ElementKind::Node(NodeElement::variant(children)))
    }

    pub fn with_identifier(mut self, identifier: &str) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    /// Merges `isolation` into the isolation the element kind already demands.
    pub fn with_isolation(mut self, isolation: Isolation) -> Self {
        self.isolation = self.isolation.merge(isolation);
        self
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn isolation(&self) -> Isolation {
        self.isolation
    }

    pub fn children(&self) -> &[Element] {
        match &self.kind {
            ElementKind::Node(node) => node.children(),
            _ => &[],
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_element(f, self, DEFAULT_ESCAPE_CHAR)
    }
}

/// Pattern text for an element, escaped with a chosen escape character.
pub struct Rendered<'e> {
    element: &'e Element,
    escape: char,
}

impl Element {
    /// Renders the element as pattern text using `escape`. For trees the
    /// compiler produced, compiling the text again with the same escape
    /// character gives an equal tree.
    pub fn display_with(&self, escape: char) -> Rendered<'_> {
        Rendered {
            element: self,
            escape,
        }
    }
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_element(f, self.element, self.escape)
    }
}

fn is_section(element: &Element) -> bool {
    matches!(element.kind, ElementKind::Section(_))
}

fn is_unit(element: &Element) -> bool {
    matches!(element.kind, ElementKind::Unit(_))
}

fn write_element(f: &mut fmt::Formatter<'_>, element: &Element, escape: char) -> fmt::Result {
    if let Some(identifier) = &element.identifier {
        write!(f, "{identifier}:")?;
        if !is_section(element) && element.isolation.contains(Isolation::START) {
            f.write_str(" ")?;
        }
    }
    if element.optional {
        f.write_str("[")?;
    }
    match &element.kind {
        ElementKind::Unit(unit) if unit.is_blank() => f.write_str(" ")?,
        ElementKind::Unit(unit) => write_unit(f, unit, escape)?,
        ElementKind::Wildcard(wildcard) => match wildcard.hint() {
            Some(hint) => write!(f, "<{hint}>")?,
            None => f.write_str("*")?,
        },
        ElementKind::Dynamic(dynamic) => write!(f, "{{{}}}", dynamic.reference())?,
        ElementKind::Section(section) => write!(f, "~{}", section.separator().value())?,
        ElementKind::Node(node) if node.is_variant() => {
            f.write_str("(")?;
            for (idx, child) in node.children().iter().enumerate() {
                if idx > 0 {
                    f.write_str("|")?;
                }
                write_element(f, child, escape)?;
            }
            f.write_str(")")?;
        }
        ElementKind::Node(node) => {
            let mut previous: Option<&Element> = None;
            for child in node.children() {
                if previous.is_some_and(|previous| needs_space(previous, child)) {
                    f.write_str(" ")?;
                }
                write_element(f, child, escape)?;
                previous = Some(child);
            }
        }
    }
    if element.optional {
        f.write_str("]")?;
    }
    Ok(())
}

/// Sections are isolated whatever surrounds them, so only their neighbours'
/// flags say whether the source had a space. An identifier carries its
/// element's start isolation after the colon.
fn needs_space(previous: &Element, next: &Element) -> bool {
    if is_section(previous) && is_section(next) {
        return true;
    }
    if is_unit(previous) && (is_unit(next) || next.identifier.is_some()) {
        return true;
    }
    let ends = !is_section(previous) && previous.isolation.contains(Isolation::END);
    let starts = !is_section(next)
        && next.identifier.is_none()
        && next.isolation.contains(Isolation::START);
    ends || starts
}

/// Writes the literal lexeme by lexeme. Whitespace between lexemes stays
/// bare; whitespace inside one was escaped in the source.
fn write_unit(f: &mut fmt::Formatter<'_>, unit: &UnitElement, escape: char) -> fmt::Result {
    let mut rest = unit.literal();
    for lexeme in unit.lexemes() {
        let gap = leading_whitespace(rest).saturating_sub(leading_whitespace(lexeme));
        let Some((spacing, tail)) = rest.split_at_checked(gap) else {
            break;
        };
        let Some(tail) = tail.strip_prefix(&**lexeme) else {
            break;
        };
        f.write_str(spacing)?;
        write_escaped(f, lexeme, escape)?;
        rest = tail;
    }
    write_escaped(f, rest, escape)
}

fn leading_whitespace(text: &str) -> usize {
    text.len() - text.trim_start().len()
}

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str, escape: char) -> fmt::Result {
    for ch in text.chars() {
        let reserved = matches!(
            ch,
            '<' | '(' | '{' | '[' | '*' | '~' | '|' | ':' | ']' | ')' | '}' | '>'
        );
        if reserved || ch == escape || ch.is_whitespace() {
            write!(f, "{escape}")?;
        }
        write!(f, "{ch}")?;
    }
    Ok(())
}
