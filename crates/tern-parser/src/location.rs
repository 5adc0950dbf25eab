//! Location tracking for diagnostics

use crate::stream::TokenStream;
use tern_error::Location;

/// Maps the stream cursor to a source location
#[derive(Debug, Clone, Copy)]
pub struct LocationTracker {
    end: Location,
}

impl LocationTracker {
    /// `end` is reported once every token is consumed
    pub fn new(end: Location) -> Self {
        Self { end }
    }

    /// Location of the next token, or end of input
    pub fn current(&self, stream: &TokenStream<'_>) -> Location {
        if stream.done() {
            self.end
        } else {
            stream.peek().location
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_lexer::scan;

    #[test]
    fn test_current_falls_back_to_end() {
        let result = scan("ab cd");
        let mut stream = TokenStream::new(&result.tokens);
        let tracker = LocationTracker::new(result.end);

        assert_eq!(tracker.current(&stream), Location::new(1, 1, 0));
        stream.advance();
        assert_eq!(tracker.current(&stream), Location::new(1, 4, 3));
        stream.advance();
        assert_eq!(tracker.current(&stream), Location::new(1, 6, 5));
    }
}
