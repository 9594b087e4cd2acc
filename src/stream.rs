//! The input cursor parsers consume, with an attached user state.

use crate::Failure;

/// A cursor over a source string, carrying a user state `S`.
///
/// Positions are byte offsets into the source, always on a character
/// boundary. Each parse run owns its stream; parsers never hold one.
#[derive(Debug)]
pub struct Stream<'s, S = ()> {
    src: &'s str,
    pos: usize,
    /// User state threaded through the parse, free for parsers to mutate.
    pub state: S,
}

impl<'s> Stream<'s, ()> {
    pub fn new(src: &'s str) -> Self {
        Stream::with_state(src, ())
    }
}

impl<'s, S> Stream<'s, S> {
    pub fn with_state(src: &'s str, state: S) -> Self {
        Stream { src, pos: 0, state }
    }

    /// Current byte offset into the source.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The unconsumed remainder of the source.
    pub fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    pub fn at_end(&self) -> bool {
        self.pos == self.src.len()
    }

    /// Peek at the next character without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peek at the character `n` characters ahead of the cursor.
    pub fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Consume and return the next character.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// A checkpoint for a later [Stream::rewind].
    pub fn mark(&self) -> usize {
        self.pos
    }

    /// Rewind the cursor to an earlier [Stream::mark].
    pub fn rewind(&mut self, mark: usize) {
        debug_assert!(mark <= self.pos && self.src.is_char_boundary(mark));
        self.pos = mark;
    }

    pub(crate) fn advance(&mut self, bytes: usize) {
        debug_assert!(self.src.is_char_boundary(self.pos + bytes));
        self.pos += bytes;
    }

    /// Attempt to consume `lit` exactly; the cursor is untouched on failure.
    pub fn eat_str(&mut self, lit: &str) -> bool {
        if self.rest().starts_with(lit) {
            self.pos += lit.len();
            true
        } else {
            false
        }
    }

    /// Attempt to consume `lit` under a case-folded comparison, returning
    /// the consumed text with its original casing. The cursor is untouched
    /// on failure.
    pub fn eat_str_fold(&mut self, lit: &str) -> Option<&'s str> {
        let mut have = self.rest().chars();
        let mut taken = 0;
        for want in lit.chars() {
            match have.next() {
                Some(c) if fold_eq(c, want) => taken += c.len_utf8(),
                _ => return None,
            }
        }
        let consumed = &self.src[self.pos..self.pos + taken];
        self.pos += taken;
        Some(consumed)
    }

    /// A non-consuming [Failure] reporting `expected` at the cursor.
    pub fn fail_here(&self, expected: impl Into<String>) -> Failure {
        Failure {
            pos: self.pos,
            consumed: false,
            expected: expected.into(),
        }
    }

    /// Describes the next character for `found ...` failure messages.
    pub fn describe_next(&self) -> String {
        match self.peek() {
            Some(c) => format!("'{c}'"),
            None => String::from("end of input"),
        }
    }
}

/// Locale-independent case-folded character equality.
pub(crate) fn fold_eq(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}
