//! Source location spans for declarations and diagnostics.

use crate::Name;
use std::fmt;

/// Byte-offset span into a declaration source file.
///
/// Layout: 8 bytes total (start and exclusive end as `u32`).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Dummy span for synthesized declarations (e.g. protocol-derived members).
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    /// Create a new span.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Length of the span in bytes.
    #[inline]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Check if the span is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one covering both.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A span qualified with the file it came from.
///
/// Diagnostics carry this so a failure in one declaration file can be
/// reported without re-deriving which input it belonged to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SourceLoc {
    /// Interned path of the declaration file.
    pub file: Name,
    /// Position within the file.
    pub span: Span,
}

impl SourceLoc {
    /// Create a new source location.
    #[inline]
    pub const fn new(file: Name, span: Span) -> Self {
        SourceLoc { file, span }
    }

    /// Location for synthesized declarations.
    pub const SYNTHESIZED: SourceLoc = SourceLoc {
        file: Name::EMPTY,
        span: Span::DUMMY,
    };
}
