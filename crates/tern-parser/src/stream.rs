//! Token stream with explicit backtracking save-points

use tern_error::InternalError;
use tern_lexer::{Lexeme, Token, INVALID_TOKEN};

/// Cursor over an immutable token buffer
#[derive(Debug)]
pub struct TokenStream<'t> {
    tokens: &'t [Token],
    cursor: usize,
    previous: Option<&'t Token>,
    /// Save-points as `(cursor, previous)`
    saves: Vec<(usize, Option<&'t Token>)>,
}

impl<'t> TokenStream<'t> {
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            cursor: 0,
            previous: None,
            saves: Vec::new(),
        }
    }

    /// Next token, or an `Invalid` token past the end
    pub fn peek(&self) -> &'t Token {
        self.peek_nth(0)
    }

    pub fn peek_nth(&self, n: usize) -> &'t Token {
        self.tokens.get(self.cursor + n).unwrap_or(&INVALID_TOKEN)
    }

    pub fn check(&self, lexeme: Lexeme) -> bool {
        !self.done() && self.peek().lexeme == lexeme
    }

    /// Whether every token has been consumed
    pub fn done(&self) -> bool {
        self.cursor >= self.tokens.len()
    }

    /// Last consumed token
    pub fn previous(&self) -> Option<&'t Token> {
        self.previous
    }

    pub fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        self.previous = Some(token);
        Some(token)
    }

    /// Consumes the next token if it has the given lexeme
    pub fn match_lexeme(&mut self, lexeme: Lexeme) -> Option<&'t Token> {
        self.match_if(|token| token.lexeme == lexeme)
    }

    pub fn match_any(&mut self, lexemes: &[Lexeme]) -> Option<&'t Token> {
        self.match_if(|token| lexemes.contains(&token.lexeme))
    }

    pub fn match_if(&mut self, pred: impl FnOnce(&Token) -> bool) -> Option<&'t Token> {
        if !self.done() && pred(self.peek()) {
            self.advance()
        } else {
            None
        }
    }

    /// Pushes a save-point at the cursor
    pub fn mark_backtrack(&mut self) {
        self.saves.push((self.cursor, self.previous));
    }

    /// Restores the cursor to the innermost save-point, keeping it
    pub fn backtrack(&mut self) {
        if let Some(&(cursor, previous)) = self.saves.last() {
            self.cursor = cursor;
            self.previous = previous;
        }
    }

    /// Drops the innermost save-point.
    ///
    /// # Panics
    ///
    /// Panics if no save-point is open.
    pub fn remove_backtrack(&mut self) {
        if self.saves.pop().is_none() {
            panic!("{}", InternalError::UnbalancedBacktrack);
        }
    }

    /// Index of the next token
    pub fn position(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_lexer::scan;

    #[test]
    fn test_match_consumes_only_on_success() {
        let tokens = scan("a = 1").tokens;
        let mut stream = TokenStream::new(&tokens);
        assert!(stream.match_lexeme(Lexeme::Assign).is_none());
        assert_eq!(stream.position(), 0);
        assert!(stream.match_lexeme(Lexeme::Identifier).is_some());
        assert!(stream
            .match_any(&[Lexeme::Comma, Lexeme::Assign])
            .is_some());
        assert_eq!(stream.previous().map(|t| t.lexeme), Some(Lexeme::Assign));
    }

    #[test]
    fn test_peek_past_end_is_invalid() {
        let tokens = scan("x").tokens;
        let mut stream = TokenStream::new(&tokens);
        stream.advance();
        assert!(stream.done());
        assert!(stream.peek().is_invalid());
        assert!(stream.advance().is_none());
        assert!(!stream.check(Lexeme::Invalid));
    }

    #[test]
    fn test_nested_backtracking() {
        let tokens = scan("a b c d").tokens;
        let mut stream = TokenStream::new(&tokens);

        stream.advance();
        stream.mark_backtrack();
        stream.advance();
        stream.mark_backtrack();
        stream.advance();
        stream.backtrack();
        assert_eq!(stream.position(), 2);
        stream.remove_backtrack();

        stream.advance();
        stream.advance();
        stream.backtrack();
        assert_eq!(stream.position(), 1);
        assert_eq!(stream.previous().map(|t| t.text.as_str()), Some("a"));
        stream.remove_backtrack();
    }

    #[test]
    #[should_panic(expected = "never marked")]
    fn test_unbalanced_release_panics() {
        let tokens = scan("x").tokens;
        TokenStream::new(&tokens).remove_backtrack();
    }
}
