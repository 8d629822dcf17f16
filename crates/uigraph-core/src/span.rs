//! Where a node, property or value was written.

use std::fmt;

/// Start position and byte length, as reported by the external parser.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// 1-based; 0 when unknown.
    pub line: u32,
    pub col: u32,
    pub len: u32,
}

impl Span {
    /// Stand-in for values built without a source position.
    pub const ORIGIN: Span = Span {
        line: 0,
        col: 0,
        len: 0,
    };

    #[inline]
    pub fn new(line: u32, col: u32, len: u32) -> Self {
        Self { line, col, len }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
