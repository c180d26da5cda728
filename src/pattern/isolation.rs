use bitflags::bitflags;

bitflags! {
    /// Which sides of an element must sit on a whitespace or separator boundary.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Isolation: u8 {
        const START = 0b01;
        const END = 0b10;
        const BOTH = Self::START.bits() | Self::END.bits();
    }
}

impl Isolation {
    pub const NONE: Isolation = Isolation::empty();

    /// Isolation implied by the source characters around an element; `None`
    /// stands for the pattern boundary.
    pub fn around(previous: Option<char>, next: Option<char>) -> Self {
        let mut isolation = Isolation::NONE;
        if previous.is_none_or(char::is_whitespace) {
            isolation |= Isolation::START;
        }
        if next.is_none_or(char::is_whitespace) {
            isolation |= Isolation::END;
        }
        isolation
    }

    pub fn merge(self, other: Isolation) -> Self {
        self | other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_count_as_whitespace() {
        assert_eq!(Isolation::around(None, None), Isolation::BOTH);
        assert_eq!(Isolation::around(Some(' '), Some('a')), Isolation::START);
        assert_eq!(Isolation::around(Some('a'), Some('\t')), Isolation::END);
        assert_eq!(Isolation::around(Some('a'), Some('b')), Isolation::NONE);
    }

    #[test]
    fn merge_keeps_either_side() {
        let merged = Isolation::START.merge(Isolation::END);
        assert_eq!(merged, Isolation::BOTH);
    }
}
