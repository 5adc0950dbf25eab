//! Parsing contexts
//!
//! Every production attempt runs inside a [`Context`]. Entering a context
//! opens a save-point on the token stream and a fresh diagnostic buffer.
//! When the context is dropped it either commits (its diagnostics move to
//! the enclosing context, or to the parse-wide collector for the root) or,
//! if it backtracked, leaves nothing behind: the cursor is back where it
//! started and its diagnostics are gone.
//!
//! A child borrows its parent mutably, so contexts always close in LIFO
//! order.

use crate::ast::{Node, Visibility};
use crate::location::LocationTracker;
use crate::stream::TokenStream;
use std::path::Path;
use tern_error::{ErrorContext, ErrorReason, Location, ScanError, SyntaxError};
use tern_lexer::{Lexeme, Token};
use tracing::trace;

/// Diagnostics held by one open context
#[derive(Debug, Default)]
struct Buffer {
    syntax: Vec<SyntaxError>,
    scan: Vec<ScanError>,
}

impl Buffer {
    fn append(&mut self, mut other: Buffer) {
        self.syntax.append(&mut other.syntax);
        self.scan.append(&mut other.scan);
    }

    fn clear(&mut self) {
        self.syntax.clear();
        self.scan.clear();
    }

    fn is_empty(&self) -> bool {
        self.syntax.is_empty() && self.scan.is_empty()
    }
}

/// Everything shared by the contexts of one parse
#[derive(Debug)]
pub struct ParseState<'t> {
    stream: TokenStream<'t>,
    tracker: LocationTracker,
    /// Diagnostics committed by the root context
    committed: Buffer,
    /// One buffer per open context, innermost last
    buffers: Vec<Buffer>,
    file: Option<&'t Path>,
    interpolation_depth: usize,
}

impl<'t> ParseState<'t> {
    /// `end` is the location just past the last token's source
    pub fn new(tokens: &'t [Token], end: Location) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            tracker: LocationTracker::new(end),
            committed: Buffer::default(),
            buffers: Vec::new(),
            file: None,
            interpolation_depth: 0,
        }
    }

    pub fn with_file(mut self, file: &'t Path) -> Self {
        self.file = Some(file);
        self
    }

    /// State for a placeholder nested one level deeper than `depth`
    pub(crate) fn nested(tokens: &'t [Token], end: Location, depth: usize) -> Self {
        let mut state = Self::new(tokens, end);
        state.interpolation_depth = depth + 1;
        state
    }

    /// Whether every token has been consumed
    pub fn done(&self) -> bool {
        self.stream.done()
    }

    /// Committed syntax and scan errors, in emission order
    pub fn finish(self) -> (Vec<SyntaxError>, Vec<ScanError>) {
        (self.committed.syntax, self.committed.scan)
    }
}

/// One production attempt
pub struct Context<'s, 't> {
    state: &'s mut ParseState<'t>,
    tag: ErrorContext,
    precedence: u8,
    visibility: Visibility,
    backtracked: bool,
}

impl<'s, 't> Context<'s, 't> {
    pub fn root(state: &'s mut ParseState<'t>, tag: ErrorContext) -> Self {
        Self::open(state, tag, 0, Visibility::Local)
    }

    fn open(
        state: &'s mut ParseState<'t>,
        tag: ErrorContext,
        precedence: u8,
        visibility: Visibility,
    ) -> Self {
        state.buffers.push(Buffer::default());
        state.stream.mark_backtrack();
        Self {
            state,
            tag,
            precedence,
            visibility,
            backtracked: false,
        }
    }

    /// Opens a child context
    pub fn enter(&mut self, tag: ErrorContext) -> Context<'_, 't> {
        let visibility = self.visibility;
        Context::open(&mut *self.state, tag, 0, visibility)
    }

    /// Opens a child context with a precedence floor
    pub fn enter_with_precedence(&mut self, tag: ErrorContext, precedence: u8) -> Context<'_, 't> {
        let visibility = self.visibility;
        Context::open(&mut *self.state, tag, precedence, visibility)
    }

    pub fn enter_with_visibility(
        &mut self,
        tag: ErrorContext,
        visibility: Visibility,
    ) -> Context<'_, 't> {
        Context::open(&mut *self.state, tag, 0, visibility)
    }

    pub fn precedence(&self) -> u8 {
        self.precedence
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn interpolation_depth(&self) -> usize {
        self.state.interpolation_depth
    }

    // =========================================
    // Token access
    // =========================================

    pub fn peek(&self) -> &'t Token {
        self.state.stream.peek()
    }

    pub fn peek_nth(&self, n: usize) -> &'t Token {
        self.state.stream.peek_nth(n)
    }

    pub fn check(&self, lexeme: Lexeme) -> bool {
        self.state.stream.check(lexeme)
    }

    pub fn done(&self) -> bool {
        self.state.stream.done()
    }

    /// Whether the last consumed token has the given lexeme
    pub fn previous_is(&self, lexeme: Lexeme) -> bool {
        self.state
            .stream
            .previous()
            .is_some_and(|token| token.lexeme == lexeme)
    }

    pub fn advance(&mut self) -> Option<&'t Token> {
        self.state.stream.advance()
    }

    pub fn match_lexeme(&mut self, lexeme: Lexeme) -> Option<&'t Token> {
        self.state.stream.match_lexeme(lexeme)
    }

    pub fn match_any(&mut self, lexemes: &[Lexeme]) -> Option<&'t Token> {
        self.state.stream.match_any(lexemes)
    }

    pub fn match_if(&mut self, pred: impl FnOnce(&Token) -> bool) -> Option<&'t Token> {
        self.state.stream.match_if(pred)
    }

    /// Location of the next token, or end of input
    pub fn location(&self) -> Location {
        self.state.tracker.current(&self.state.stream)
    }

    // =========================================
    // Diagnostics
    // =========================================

    fn buffer(&mut self) -> &mut Buffer {
        // The innermost buffer always belongs to the context that can
        // currently be used, since children borrow their parent.
        let index = self.state.buffers.len().saturating_sub(1);
        &mut self.state.buffers[index]
    }

    /// Records `reason` at the current location
    pub fn emit(&mut self, reason: ErrorReason) {
        let location = self.location();
        self.emit_at(reason, location);
    }

    pub fn emit_at(&mut self, reason: ErrorReason, location: Location) {
        let error = SyntaxError::new(self.tag, reason, location);
        self.buffer().syntax.push(error);
    }

    /// Records `reason` if `condition` holds, and returns `condition`
    pub fn emit_if(&mut self, condition: bool, reason: ErrorReason) -> bool {
        if condition {
            self.emit(reason);
        }
        condition
    }

    /// Unwraps `node`, or records `reason` and synthesizes a placeholder
    pub fn emit_if_node_missing(&mut self, node: Option<Node>, reason: ErrorReason) -> Node {
        match node {
            Some(node) => node,
            None => {
                let location = self.location();
                self.emit_at(reason, location);
                Node::missing(location)
            }
        }
    }

    /// Records `reason` if `node` is the `Empty` sentinel
    pub fn emit_if_node_empty(&mut self, node: &Node, reason: ErrorReason) -> bool {
        let empty = node.is_empty();
        if empty {
            self.emit_at(reason, node.location());
        }
        empty
    }

    /// Consumes `lexeme` if present, otherwise records `reason`.
    /// Returns whether the lexeme was there.
    pub fn emit_if_lexeme_not_present(&mut self, lexeme: Lexeme, reason: ErrorReason) -> bool {
        let present = self.match_lexeme(lexeme).is_some();
        self.emit_if(!present, reason);
        present
    }

    /// Whether this context or a committed child has recorded anything
    pub fn has_errors(&self) -> bool {
        self.state.buffers.last().is_some_and(|buffer| !buffer.is_empty())
    }

    /// Takes over diagnostics produced by a separate parse
    pub fn absorb(&mut self, syntax: Vec<SyntaxError>, scan: Vec<ScanError>) {
        self.buffer().append(Buffer { syntax, scan });
    }

    // =========================================
    // Recovery
    // =========================================

    /// Skips tokens until one in `recovery` is next, or input ends
    pub fn synchronize(&mut self, recovery: &[Lexeme]) {
        let start = self.state.stream.position();
        while !self.done() && !recovery.contains(&self.peek().lexeme) {
            self.advance();
        }
        trace!(
            context = %self.tag,
            file = ?self.state.file,
            skipped = self.state.stream.position() - start,
            "synchronized"
        );
    }

    /// Restores the cursor to where this context was entered and drops
    /// everything it recorded. Calling it again has no further effect.
    pub fn backtrack(&mut self) {
        if !self.backtracked {
            trace!(context = %self.tag, file = ?self.state.file, "backtrack");
        }
        self.state.stream.backtrack();
        self.buffer().clear();
        self.backtracked = true;
    }

    /// Backtracks and reports no match
    pub fn fail<T>(&mut self) -> Option<T> {
        self.backtrack();
        None
    }
}

impl Drop for Context<'_, '_> {
    fn drop(&mut self) {
        let buffer = self.state.buffers.pop().unwrap_or_default();
        self.state.stream.remove_backtrack();
        if self.backtracked {
            return;
        }
        match self.state.buffers.last_mut() {
            Some(parent) => parent.append(buffer),
            None => self.state.committed.append(buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tern_lexer::scan;

    fn reasons(errors: &[SyntaxError]) -> Vec<(ErrorContext, ErrorReason)> {
        errors.iter().map(|e| (e.context, e.reason)).collect()
    }

    #[test]
    fn test_commit_flows_to_collector() {
        let result = scan("a b");
        let mut state = ParseState::new(&result.tokens, result.end);
        {
            let mut root = Context::root(&mut state, ErrorContext::TranslationUnit);
            let mut child = root.enter(ErrorContext::Tuple);
            child.advance();
            child.emit(ErrorReason::MissingSeparator);
        }
        let (errors, _) = state.finish();
        assert_eq!(
            reasons(&errors),
            [(ErrorContext::Tuple, ErrorReason::MissingSeparator)]
        );
        assert_eq!(errors[0].location, Location::new(1, 3, 2));
    }

    #[test]
    fn test_backtrack_discards_diagnostics_and_restores_cursor() {
        let result = scan("a b c");
        let mut state = ParseState::new(&result.tokens, result.end);
        {
            let mut root = Context::root(&mut state, ErrorContext::TranslationUnit);
            {
                let mut attempt = root.enter(ErrorContext::Loop);
                attempt.advance();
                {
                    let mut inner = attempt.enter(ErrorContext::Block);
                    inner.advance();
                    inner.emit(ErrorReason::MissingClosing);
                }
                attempt.emit(ErrorReason::MissingBlock);
                assert!(attempt.fail::<Node>().is_none());
                attempt.backtrack();
            }
            assert_eq!(root.peek().text, "a");
        }
        let (errors, _) = state.finish();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_has_errors_sees_committed_children_only() {
        let result = scan("a b");
        let mut state = ParseState::new(&result.tokens, result.end);
        let mut root = Context::root(&mut state, ErrorContext::TranslationUnit);
        let mut parent = root.enter(ErrorContext::GenericType);
        {
            let mut abandoned = parent.enter(ErrorContext::Type);
            abandoned.emit(ErrorReason::MissingTypeExpr);
            abandoned.backtrack();
        }
        assert!(!parent.has_errors());
        {
            let mut child = parent.enter(ErrorContext::Type);
            child.emit(ErrorReason::MissingTypeExpr);
        }
        assert!(parent.has_errors());
    }

    #[test]
    fn test_parent_backtrack_drops_committed_child() {
        let result = scan("a b");
        let mut state = ParseState::new(&result.tokens, result.end);
        {
            let mut root = Context::root(&mut state, ErrorContext::TranslationUnit);
            let mut parent = root.enter(ErrorContext::Definition);
            {
                let mut child = parent.enter(ErrorContext::IdDecl);
                child.emit(ErrorReason::MissingTypeExpr);
            }
            parent.backtrack();
        }
        assert!(state.finish().0.is_empty());
    }

    #[test]
    fn test_emit_helpers() {
        let result = scan("x ;");
        let mut state = ParseState::new(&result.tokens, result.end);
        {
            let mut root = Context::root(&mut state, ErrorContext::Definition);
            assert!(!root.emit_if_lexeme_not_present(Lexeme::Assign, ErrorReason::MissingAssignment));
            root.advance();
            assert!(root.emit_if_lexeme_not_present(Lexeme::Semicolon, ErrorReason::MissingSemicolon));
            let node = root.emit_if_node_missing(None, ErrorReason::MissingExpr);
            assert!(node.is_missing());
            assert_eq!(node.location(), result.end);
            assert!(root.emit_if_node_empty(&Node::empty(Location::START), ErrorReason::MissingStmt));
        }
        let (errors, _) = state.finish();
        assert_eq!(
            reasons(&errors),
            [
                (ErrorContext::Definition, ErrorReason::MissingAssignment),
                (ErrorContext::Definition, ErrorReason::MissingExpr),
                (ErrorContext::Definition, ErrorReason::MissingStmt),
            ]
        );
    }

    #[test]
    fn test_synchronize_stops_at_recovery_token() {
        let result = scan("a b ; c");
        let mut state = ParseState::new(&result.tokens, result.end);
        let mut root = Context::root(&mut state, ErrorContext::TranslationUnit);
        root.synchronize(&[Lexeme::Semicolon]);
        assert!(root.check(Lexeme::Semicolon));
        root.advance();
        root.synchronize(&[Lexeme::Semicolon]);
        assert!(root.done());
    }

    #[test]
    fn test_child_inherits_visibility_and_resets_precedence() {
        let result = scan("");
        let mut state = ParseState::new(&result.tokens, result.end);
        let mut root = Context::root(&mut state, ErrorContext::TranslationUnit);
        let mut exported = root.enter_with_visibility(ErrorContext::Definition, Visibility::Exported);
        let mut climbing = exported.enter_with_precedence(ErrorContext::Expr, 9);
        assert_eq!(climbing.precedence(), 9);
        let child = climbing.enter(ErrorContext::Expr);
        assert_eq!(child.precedence(), 0);
        assert_eq!(child.visibility(), Visibility::Exported);
    }
}
