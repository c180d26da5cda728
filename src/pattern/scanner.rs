use super::{PatternError, PatternResult};

/// Read-only view over a pattern's characters with a movable position.
pub(crate) struct Scanner<'a> {
    pattern: &'a str,
    chars: Vec<(usize, char)>,
    index: usize,
    escape: char,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(pattern: &'a str, escape: char) -> Self {
        Self {
            pattern,
            chars: pattern.char_indices().collect(),
            index: 0,
            escape,
        }
    }

    pub(crate) fn pattern(&self) -> &'a str {
        self.pattern
    }

    pub(crate) fn position(&self) -> usize {
        self.index
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.char_at(self.index)
    }

    pub(crate) fn next(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.index += 1;
        }
        ch
    }

    pub(crate) fn char_at(&self, position: usize) -> Option<char> {
        self.chars.get(position).map(|(_, ch)| *ch)
    }

    /// Character just before `position`, or `None` at the pattern start.
    pub(crate) fn char_before(&self, position: usize) -> Option<char> {
        position.checked_sub(1).and_then(|prev| self.char_at(prev))
    }

    pub(crate) fn byte_index(&self, position: usize) -> usize {
        self.chars
            .get(position)
            .map(|(idx, _)| *idx)
            .unwrap_or(self.pattern.len())
    }

    pub(crate) fn is_escape(&self, ch: char) -> bool {
        ch == self.escape
    }

    pub(crate) fn consume_escaped(&mut self) -> PatternResult<char> {
        let escape_index = self.byte_index(self.index);
        self.next();
        self.next().ok_or_else(|| PatternError::LoneEscapeCharacter {
            pattern: self.pattern.to_string(),
            index: escape_index,
        })
    }

    /// Reads the raw interior of a bracketed region. The scanner must sit on
    /// `open`; afterwards it sits just past the matching `close`. Escapes and
    /// section operands are copied verbatim and never affect depth.
    pub(crate) fn read_enclosed(&mut self, open: char, close: char) -> PatternResult<String> {
        let start = self.byte_index(self.index);
        self.next();

        let mut depth = 1usize;
        let mut interior = String::new();
        while let Some(ch) = self.next() {
            if self.is_escape(ch) || ch == '~' {
                interior.push(ch);
                if let Some(operand) = self.next() {
                    interior.push(operand);
                }
                continue;
            }
            if ch == open {
                depth += 1;
            } else if ch == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(interior);
                }
            }
            interior.push(ch);
        }

        Err(PatternError::UnterminatedGroup {
            pattern: self.pattern.to_string(),
            open,
            start,
        })
    }
}

/// Splits `source` on `delimiter` occurrences that sit outside any bracket,
/// escape or section operand.
pub(crate) fn split_top_level(source: &str, delimiter: char, escape: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut chars = source.chars();

    while let Some(ch) = chars.next() {
        if ch == escape || ch == '~' {
            current.push(ch);
            if let Some(operand) = chars.next() {
                current.push(operand);
            }
            continue;
        }
        match ch {
            '<' | '(' | '{' | '[' => depth += 1,
            '>' | ')' | '}' | ']' => depth = depth.saturating_sub(1),
            _ if ch == delimiter && depth == 0 => {
                parts.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    parts.push(current);
    parts
}
