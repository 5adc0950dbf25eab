//! Source locations
//!
//! A [`Location`] is a single point in the source; a [`Span`] is a region
//! between two locations, used when rendering diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Line (1-indexed)
    pub line: u32,
    /// Column (1-indexed)
    pub column: u32,
    /// Byte offset from the beginning of the file
    pub offset: usize,
}

impl Location {
    /// First character of a file.
    pub const START: Location = Location::new(1, 1, 0);

    pub const fn new(line: u32, column: u32, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    /// Location reached after reading `ch` from this location.
    pub fn advance(self, ch: char) -> Self {
        if ch == '\n' {
            Self::new(self.line + 1, 1, self.offset + 1)
        } else {
            Self::new(self.line, self.column + 1, self.offset + ch.len_utf8())
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A region in the source code (start to end)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Location,
    pub end: Location,
    /// Source file ID (to support multiple files)
    pub file_id: u32,
}

impl Span {
    pub fn new(start: Location, end: Location, file_id: u32) -> Self {
        Self {
            start,
            end,
            file_id,
        }
    }

    /// A one-character span starting at `start`.
    pub fn at(start: Location, file_id: u32) -> Self {
        let end = Location::new(start.line, start.column + 1, start.offset + 1);
        Self::new(start, end, file_id)
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_over_newline() {
        let loc = Location::START.advance('a').advance('\n').advance('b');
        assert_eq!(loc, Location::new(2, 2, 3));
    }

    #[test]
    fn test_advance_counts_utf8_bytes() {
        let loc = Location::START.advance('é');
        assert_eq!(loc.column, 2);
        assert_eq!(loc.offset, 2);
    }

    #[test]
    fn test_span_len() {
        let span = Span::new(Location::new(1, 1, 0), Location::new(1, 10, 9), 0);
        assert_eq!(span.len(), 9);
        assert!(!Span::at(Location::START, 0).is_empty());
    }
}
