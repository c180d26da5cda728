use super::captures::CaptureBuffer;
use super::cursor::Cursor;
use super::resolver::{Candidates, DynamicResolver};
use super::{ExtractError, ExtractResult};
use crate::bank::{ExtractorOptions, WildcardPolicy};
use crate::pattern::{
    DynamicElement, Element, ElementKind, Isolation, Pattern, SectionElement, UnitElement,
    WildcardElement,
};
use crate::syntax::Syntax;

type Outcome<'t> = ExtractResult<Option<Cursor<'t>>>;

/// What remains to be matched once the current element succeeds.
#[derive(Clone, Copy)]
enum Frame<'p> {
    Seq(&'p [Element]),
    /// Ends an element that started at `start`: checks isolation and records
    /// the capture, if any.
    Close {
        identifier: Option<&'p str>,
        isolation: Isolation,
        start: usize,
    },
}

struct Rest<'p, 'r> {
    frame: Frame<'p>,
    then: Option<&'r Rest<'p, 'r>>,
}

fn is_trailing(mut rest: Option<&Rest<'_, '_>>) -> bool {
    while let Some(current) = rest {
        if let Frame::Seq(elements) = current.frame
            && !elements.is_empty()
        {
            return false;
        }
        rest = current.then;
    }
    true
}

/// One match attempt. Every branch works on copied cursors; the capture
/// buffer is truncated back to its checkpoint whenever a branch is abandoned.
pub(crate) struct Worker<'a, 'p> {
    pattern: &'p Pattern,
    syntax: &'a Syntax,
    resolver: Option<&'a dyn DynamicResolver>,
    options: ExtractorOptions,
    captures: CaptureBuffer<'p>,
    /// Set while enumerating: every reachable end is recorded and the
    /// search carries on as if that end had failed.
    ends: Option<Candidates>,
}

impl<'a, 'p> Worker<'a, 'p> {
    pub(crate) fn new(
        pattern: &'p Pattern,
        syntax: &'a Syntax,
        resolver: Option<&'a dyn DynamicResolver>,
        options: ExtractorOptions,
    ) -> Self {
        Self {
            pattern,
            syntax,
            resolver,
            options,
            captures: CaptureBuffer::new(),
            ends: None,
        }
    }

    pub(crate) fn run<'t>(
        mut self,
        cursor: Cursor<'t>,
    ) -> ExtractResult<Option<(Cursor<'t>, CaptureBuffer<'p>)>> {
        let root = Rest {
            frame: Frame::Seq(std::slice::from_ref(self.pattern.root())),
            then: None,
        };
        let outcome = self.resume(Some(&root), cursor)?;
        Ok(outcome.map(|end| (end, self.captures)))
    }

    /// Every token count a match starting at `cursor` can consume, shortest
    /// first.
    pub(crate) fn lengths(mut self, cursor: Cursor<'_>) -> ExtractResult<Candidates> {
        self.ends = Some(Candidates::new());
        let root = Rest {
            frame: Frame::Seq(std::slice::from_ref(self.pattern.root())),
            then: None,
        };
        self.resume(Some(&root), cursor)?;

        let mut ends = self.ends.take().unwrap_or_default();
        ends.sort_unstable();
        ends.dedup();
        Ok(ends.into_iter().map(|end| end - cursor.index()).collect())
    }

    fn resume<'t>(&mut self, rest: Option<&Rest<'p, '_>>, cursor: Cursor<'t>) -> Outcome<'t> {
        let Some(rest) = rest else {
            if let Some(ends) = self.ends.as_mut() {
                ends.push(cursor.index());
                return Ok(None);
            }
            return Ok(Some(cursor));
        };

        match rest.frame {
            Frame::Seq(elements) => match elements.split_first() {
                None => self.resume(rest.then, cursor),
                Some((first, others)) => {
                    let next = Rest {
                        frame: Frame::Seq(others),
                        then: rest.then,
                    };
                    self.element(first, cursor, Some(&next))
                }
            },
            Frame::Close {
                identifier,
                isolation,
                start,
            } => {
                if !self.is_isolated(isolation, start, cursor) {
                    return Ok(None);
                }
                let checkpoint = self.captures.len();
                if let Some(identifier) = identifier {
                    self.captures.push((identifier, (start, cursor.index())));
                }
                let outcome = self.resume(rest.then, cursor)?;
                if outcome.is_none() {
                    self.captures.truncate(checkpoint);
                }
                Ok(outcome)
            }
        }
    }

    fn element<'t>(
        &mut self,
        element: &'p Element,
        cursor: Cursor<'t>,
        rest: Option<&Rest<'p, '_>>,
    ) -> Outcome<'t> {
        let checkpoint = self.captures.len();
        if let Some(end) = self.required(element, cursor, rest)? {
            return Ok(Some(end));
        }
        self.captures.truncate(checkpoint);

        if element.is_optional() {
            return self.resume(rest, cursor);
        }
        Ok(None)
    }

    fn required<'t>(
        &mut self,
        element: &'p Element,
        cursor: Cursor<'t>,
        rest: Option<&Rest<'p, '_>>,
    ) -> Outcome<'t> {
        // Sections record their inner span themselves.
        let identifier = match element.kind() {
            ElementKind::Section(_) => None,
            _ => element.identifier(),
        };
        let close = Rest {
            frame: Frame::Close {
                identifier,
                isolation: element.isolation(),
                start: cursor.index(),
            },
            then: rest,
        };

        match element.kind() {
            ElementKind::Unit(unit) => match self.match_unit(unit, cursor) {
                Some(end) => self.resume(Some(&close), end),
                None => Ok(None),
            },
            ElementKind::Wildcard(wildcard) => self.match_wildcard(wildcard, cursor, &close),
            ElementKind::Dynamic(dynamic) => self.match_dynamic(dynamic, cursor, &close),
            ElementKind::Section(section) => {
                let Some(end) = self.match_section(section, cursor)? else {
                    return Ok(None);
                };
                let checkpoint = self.captures.len();
                if let Some(identifier) = element.identifier() {
                    self.captures
                        .push((identifier, (cursor.index() + 1, end.index() - 1)));
                }
                let outcome = self.resume(Some(&close), end)?;
                if outcome.is_none() {
                    self.captures.truncate(checkpoint);
                }
                Ok(outcome)
            }
            ElementKind::Node(node) if node.is_variant() => {
                for alternative in node.children() {
                    let checkpoint = self.captures.len();
                    if let Some(end) = self.element(alternative, cursor, Some(&close))? {
                        return Ok(Some(end));
                    }
                    self.captures.truncate(checkpoint);
                }
                Ok(None)
            }
            ElementKind::Node(node) => {
                let body = Rest {
                    frame: Frame::Seq(node.children()),
                    then: Some(&close),
                };
                self.resume(Some(&body), cursor)
            }
        }
    }

    fn match_unit<'t>(&self, unit: &UnitElement, cursor: Cursor<'t>) -> Option<Cursor<'t>> {
        if unit.is_blank() {
            return cursor
                .peek()
                .filter(|token| token.is_blank())
                .map(|_| cursor.advance(1));
        }

        let lexemes = unit.lexemes();
        let remaining = cursor.remaining();
        if remaining.len() < lexemes.len() {
            return None;
        }
        lexemes
            .iter()
            .zip(remaining)
            .all(|(lexeme, token)| lexeme.as_ref() == token.value())
            .then(|| cursor.advance(lexemes.len()))
    }

    fn match_wildcard<'t>(
        &mut self,
        wildcard: &'p WildcardElement,
        cursor: Cursor<'t>,
        close: &Rest<'p, '_>,
    ) -> Outcome<'t> {
        let available = cursor.available();
        let greedy = match wildcard.policy() {
            WildcardPolicy::Greedy => true,
            WildcardPolicy::Lazy => false,
            WildcardPolicy::Auto => is_trailing(close.then),
        };

        for step in 0..available {
            let length = if greedy { available - step } else { step + 1 };

            if let (Some(hint), Some(validator)) = (wildcard.hint(), self.pattern.validator())
                && !validator.accepts(hint, &cursor.remaining()[..length])
            {
                continue;
            }

            let checkpoint = self.captures.len();
            if let Some(end) = self.resume(Some(close), cursor.advance(length))? {
                return Ok(Some(end));
            }
            self.captures.truncate(checkpoint);
        }

        Ok(None)
    }

    fn match_dynamic<'t>(
        &mut self,
        dynamic: &'p DynamicElement,
        cursor: Cursor<'t>,
        close: &Rest<'p, '_>,
    ) -> Outcome<'t> {
        let Some(resolver) = self.resolver else {
            return Err(ExtractError::MissingResolver {
                pattern: self.pattern.source().to_string(),
                reference: dynamic.reference().to_string(),
            });
        };

        let candidates = resolver.resolve(dynamic.reference(), cursor.remaining());
        tracing::trace!(reference = dynamic.reference(), ?candidates, "dynamic resolved");

        for count in candidates {
            if count > cursor.available() {
                continue;
            }
            let checkpoint = self.captures.len();
            if let Some(end) = self.resume(Some(close), cursor.advance(count))? {
                return Ok(Some(end));
            }
            self.captures.truncate(checkpoint);
        }

        Ok(None)
    }

    fn match_section<'t>(&self, section: &SectionElement, cursor: Cursor<'t>) -> Outcome<'t> {
        let separators = self.syntax.separators();
        let opening = section.separator();
        let Some(closing) = separators
            .opening(opening.value())
            .and_then(|open| separators.closing_of(open))
        else {
            return Err(ExtractError::UnregisteredSeparator {
                pattern: self.pattern.source().to_string(),
                separator: opening.value().to_string(),
            });
        };

        if cursor.peek().map(|token| token.value()) != Some(opening.value()) {
            return Ok(None);
        }

        let mut depth = 0usize;
        for (offset, token) in cursor.remaining().iter().enumerate() {
            if token.value() == opening.value() {
                depth += 1;
            } else if token.value() == closing.value() {
                depth -= 1;
                if depth == 0 {
                    return Ok(Some(cursor.advance(offset + 1)));
                }
            }
        }

        Ok(None)
    }

    fn is_isolated(&self, isolation: Isolation, start: usize, end: Cursor<'_>) -> bool {
        if !self.options.enforce_isolation || end.index() <= start {
            return true;
        }
        let tokens = end.tokens();
        let syntax = self.syntax;

        if isolation.contains(Isolation::START) {
            let first = &tokens[start];
            let bounded = start == 0
                || first.is_spaced()
                || syntax.is_boundary(first)
                || syntax.is_boundary(&tokens[start - 1]);
            if !bounded {
                return false;
            }
        }

        if isolation.contains(Isolation::END) {
            let last = &tokens[end.index() - 1];
            let bounded = match tokens.get(end.index()) {
                None => true,
                Some(next) => next.is_spaced() || syntax.is_boundary(next) || syntax.is_boundary(last),
            };
            if !bounded {
                return false;
            }
        }

        true
    }
}
