use memchr::memchr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunChar {
    pub ch: char,
    pub escaped: bool,
    /// Char position in the pattern source.
    pub position: usize,
}

impl RunChar {
    fn is_space(&self) -> bool {
        !self.escaped && self.ch.is_whitespace()
    }

    fn is_colon(&self) -> bool {
        !self.escaped && self.ch == ':'
    }
}

/// Literal text accumulated between structural characters.
#[derive(Debug, Default)]
pub(crate) struct LiteralRun {
    chars: Vec<RunChar>,
}

impl LiteralRun {
    pub(crate) fn push(&mut self, ch: char, escaped: bool, position: usize) {
        self.chars.push(RunChar {
            ch,
            escaped,
            position,
        });
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub(crate) fn is_blank(&self) -> bool {
        self.chars.iter().all(RunChar::is_space)
    }

    pub(crate) fn take(&mut self) -> Vec<RunChar> {
        std::mem::take(&mut self.chars)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Binding {
    None,
    /// The identifier names the unit built from this run.
    Unit(String),
    /// The identifier names the next element the compiler produces.
    Next(String),
}

pub(crate) fn trim(chars: &[RunChar]) -> &[RunChar] {
    let start = chars.iter().position(|c| !c.is_space()).unwrap_or(chars.len());
    let end = chars
        .iter()
        .rposition(|c| !c.is_space())
        .map_or(start, |idx| idx + 1);
    &chars[start..end]
}

pub(crate) fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-'
}

fn is_identifier(chars: &[RunChar]) -> bool {
    !chars.is_empty() && chars.iter().all(|c| !c.escaped && is_identifier_char(c.ch))
}

fn render(chars: &[RunChar]) -> String {
    chars.iter().map(|c| c.ch).collect()
}

/// Splits a flushed run into the literal it still carries and the identifier
/// binding it declares.
pub(crate) fn extract(run: &[RunChar]) -> (&[RunChar], Binding) {
    let trimmed = trim(run);
    let text = render(trimmed);
    if trimmed.len() < 2 || memchr(b':', text.as_bytes()).is_none() {
        return (trimmed, Binding::None);
    }

    let last = trimmed.len() - 1;
    if trimmed[last].is_colon() {
        let name_start = trimmed[..last]
            .iter()
            .rposition(RunChar::is_space)
            .map_or(0, |idx| idx + 1);
        let name = &trimmed[name_start..last];
        if !is_identifier(name) {
            return (trimmed, Binding::None);
        }
        return (trim(&trimmed[..name_start]), Binding::Next(render(name)));
    }

    let Some(colon) = trimmed.iter().position(RunChar::is_colon) else {
        return (trimmed, Binding::None);
    };
    let name = trim(&trimmed[..colon]);
    if !is_identifier(name) {
        return (trimmed, Binding::None);
    }
    (trim(&trimmed[colon + 1..]), Binding::Unit(render(name)))
}
