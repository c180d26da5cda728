use std::sync::Arc;

use super::analysis::validate_identifiers;
use super::element::{Element, Lexemes, UnitElement};
use super::identifier::{self, Binding, LiteralRun, RunChar};
use super::isolation::Isolation;
use super::scanner::{Scanner, split_top_level};
use super::{PatternError, PatternResult};
use crate::bank::CompilerOptions;
use crate::syntax::Syntax;

fn is_structural(ch: char) -> bool {
    matches!(ch, '<' | '(' | '{' | '[' | '*' | '~')
}

/// Turns pattern text into an element tree in one left-to-right scan.
#[derive(Debug, Clone, Default)]
pub struct PatternCompiler {
    options: CompilerOptions,
    syntax: Arc<Syntax>,
}

impl PatternCompiler {
    pub fn new(options: CompilerOptions, syntax: Arc<Syntax>) -> Self {
        Self { options, syntax }
    }

    pub fn with_options(options: CompilerOptions) -> Self {
        Self::new(options, Arc::default())
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn syntax(&self) -> &Arc<Syntax> {
        &self.syntax
    }

    #[tracing::instrument(level = "trace", skip(self), fields(pattern = %pattern))]
    pub fn compile(&self, pattern: &str) -> PatternResult<Element> {
        let element = self.compile_fragment(pattern)?;
        validate_identifiers(&element, pattern)?;
        Ok(element)
    }

    fn compile_fragment(&self, pattern: &str) -> PatternResult<Element> {
        let mut scanner = Scanner::new(pattern, self.options.escape_char);
        let mut state = FragmentState::new(pattern);

        while let Some(ch) = scanner.peek() {
            let start = scanner.position();

            if scanner.is_escape(ch) {
                let literal = scanner.consume_escaped()?;
                state.run.push(literal, true, start);
                continue;
            }

            if is_structural(ch) {
                self.flush(&scanner, &mut state)?;
                let element = self.compile_structural(&mut scanner, ch)?;
                let isolation =
                    Isolation::around(scanner.char_before(start), scanner.char_at(scanner.position()));
                state.produce(element.with_isolation(isolation))?;
                continue;
            }

            if self.options.split_by_whitespace && ch == ' ' && !state.run.is_blank() {
                self.flush(&scanner, &mut state)?;
                scanner.next();
                continue;
            }

            state.run.push(ch, false, start);
            scanner.next();
        }

        self.flush(&scanner, &mut state)?;
        state.finish()
    }

    fn compile_structural(&self, scanner: &mut Scanner<'_>, ch: char) -> PatternResult<Element> {
        let pattern = scanner.pattern();
        match ch {
            '[' => {
                let interior = scanner.read_enclosed('[', ']')?;
                let element = self.compile_nested(pattern, &interior)?;
                Ok(element.with_optional(true))
            }
            '(' => {
                let interior = scanner.read_enclosed('(', ')')?;
                let branches = split_top_level(&interior, '|', self.options.escape_char);
                let mut alternatives = Vec::with_capacity(branches.len());
                for branch in &branches {
                    alternatives.push(self.compile_nested(pattern, branch)?);
                }
                Ok(Element::variant(alternatives))
            }
            '{' => {
                let interior = scanner.read_enclosed('{', '}')?;
                let reference = interior.trim();
                if reference.is_empty() {
                    return Err(PatternError::EmptyPattern {
                        pattern: pattern.to_string(),
                    });
                }
                Ok(Element::dynamic(reference))
            }
            '<' => {
                let interior = scanner.read_enclosed('<', '>')?;
                let hint = Some(interior.trim()).filter(|hint| !hint.is_empty());
                Ok(Element::wildcard(hint, self.options.wildcard_policy))
            }
            '*' => {
                scanner.next();
                Ok(Element::wildcard(None, self.options.wildcard_policy))
            }
            _ => {
                scanner.next();
                let operand_position = scanner.position();
                let Some(operand) = scanner.next() else {
                    return Err(PatternError::DanglingSectionOperator {
                        pattern: pattern.to_string(),
                    });
                };
                let mut buf = [0u8; 4];
                let separator = self
                    .syntax
                    .separators()
                    .opening(operand.encode_utf8(&mut buf))
                    .cloned()
                    .ok_or_else(|| PatternError::UnknownSeparator {
                        pattern: pattern.to_string(),
                        found: operand,
                        index: scanner.byte_index(operand_position),
                    })?;
                Ok(Element::section(separator))
            }
        }
    }

    fn compile_nested(&self, pattern: &str, fragment: &str) -> PatternResult<Element> {
        self.compile_fragment(fragment)
            .map_err(|source| PatternError::Nested {
                pattern: pattern.to_string(),
                fragment: fragment.to_string(),
                source: Box::new(source),
            })
    }

    fn flush(&self, scanner: &Scanner<'_>, state: &mut FragmentState<'_>) -> PatternResult<()> {
        if state.run.is_empty() {
            return Ok(());
        }
        let chars = state.run.take();
        let (literal, binding) = identifier::extract(&chars);
        let unit = (!literal.is_empty()).then(|| self.compile_unit(scanner, literal));

        match (unit, binding) {
            (Some(unit), Binding::Unit(name)) => state.produce(unit.with_identifier(&name)),
            (Some(unit), Binding::Next(name)) => {
                state.produce(unit)?;
                state.bind_next(name)
            }
            (Some(unit), Binding::None) => state.produce(unit),
            (None, Binding::Unit(name) | Binding::Next(name)) => state.bind_next(name),
            (None, Binding::None) => Ok(()),
        }
    }

    fn compile_unit(&self, scanner: &Scanner<'_>, chars: &[RunChar]) -> Element {
        let separators = self.syntax.separators();
        let literal: String = chars.iter().map(|c| c.ch).collect();
        let mut lexemes = Lexemes::new();
        let mut current = String::new();

        for c in chars {
            if !c.escaped && c.ch.is_whitespace() {
                push_lexeme(&mut lexemes, &mut current);
            } else if separators.contains_char(c.ch) {
                push_lexeme(&mut lexemes, &mut current);
                lexemes.push(c.ch.to_string().into_boxed_str());
            } else {
                current.push(c.ch);
            }
        }
        push_lexeme(&mut lexemes, &mut current);

        let isolation = match (chars.first(), chars.last()) {
            (Some(first), Some(last)) => {
                let after = last.position + if last.escaped { 2 } else { 1 };
                Isolation::around(scanner.char_before(first.position), scanner.char_at(after))
            }
            _ => Isolation::NONE,
        };

        Element::unit(UnitElement::new(&literal, lexemes)).with_isolation(isolation)
    }
}

fn push_lexeme(lexemes: &mut Lexemes, current: &mut String) {
    if !current.is_empty() {
        lexemes.push(std::mem::take(current).into_boxed_str());
    }
}

struct FragmentState<'p> {
    pattern: &'p str,
    elements: Vec<Element>,
    run: LiteralRun,
    pending: Option<String>,
}

impl<'p> FragmentState<'p> {
    fn new(pattern: &'p str) -> Self {
        Self {
            pattern,
            elements: Vec::new(),
            run: LiteralRun::default(),
            pending: None,
        }
    }

    fn bind_next(&mut self, name: String) -> PatternResult<()> {
        if let Some(previous) = self.pending.replace(name) {
            return Err(PatternError::DanglingIdentifier {
                pattern: self.pattern.to_string(),
                name: previous,
            });
        }
        Ok(())
    }

    fn produce(&mut self, mut element: Element) -> PatternResult<()> {
        if let Some(name) = self.pending.take() {
            if let Some(existing) = element.identifier() {
                return Err(PatternError::ConflictingIdentifier {
                    pattern: self.pattern.to_string(),
                    name,
                    existing: existing.to_string(),
                });
            }
            element = element.with_identifier(&name);
        }
        self.elements.push(element);
        Ok(())
    }

    fn finish(mut self) -> PatternResult<Element> {
        if let Some(name) = self.pending.take() {
            return Err(PatternError::DanglingIdentifier {
                pattern: self.pattern.to_string(),
                name,
            });
        }

        if self.elements.is_empty() {
            if !self.pattern.is_empty() && self.pattern.trim().is_empty() {
                return Ok(Element::unit(UnitElement::blank()));
            }
            return Err(PatternError::EmptyPattern {
                pattern: self.pattern.to_string(),
            });
        }

        if self.elements.len() == 1 {
            return Ok(self.elements.remove(0));
        }
        Ok(Element::sequence(self.elements))
    }
}
