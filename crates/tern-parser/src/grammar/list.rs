//! Bracketed, comma-separated lists
//!
//! Tuples, arrays, records, call arguments, subscripts, tuple and generic
//! declarations, tuple types, generic arguments and array dimensions all go
//! through [`handle_list`], so they recover from errors the same way and a
//! list with `n` commas always has `n + 1` elements.

use crate::ast::Node;
use crate::context::Context;
use tern_error::ErrorReason;
use tern_lexer::Lexeme;

/// Parses `open element (, element)* close` in the caller's context.
///
/// Returns `None` without consuming anything if `open` is not next.
pub(crate) fn handle_list(
    ctx: &mut Context<'_, '_>,
    open: Lexeme,
    close: Lexeme,
    missing: ErrorReason,
    mut element: impl FnMut(&mut Context<'_, '_>) -> Option<Node>,
) -> Option<Vec<Node>> {
    ctx.match_lexeme(open)?;

    let mut elements = Vec::new();
    if ctx.match_lexeme(close).is_some() {
        return Some(elements);
    }

    let recovery = [Lexeme::Comma, close];
    loop {
        match element(&mut *ctx) {
            Some(node) => elements.push(node),
            None => {
                let location = ctx.location();
                ctx.emit_at(missing, location);
                ctx.synchronize(&recovery);
                elements.push(Node::missing(location));
            }
        }

        if ctx.match_lexeme(Lexeme::Comma).is_some() {
            continue;
        }
        if ctx.check(close) || ctx.done() {
            break;
        }

        // Something other than a separator follows the element
        ctx.emit(ErrorReason::MissingSeparator);
        ctx.synchronize(&recovery);
        if ctx.match_lexeme(Lexeme::Comma).is_none() {
            break;
        }
    }

    ctx.emit_if_lexeme_not_present(close, ErrorReason::MissingClosing);
    Some(elements)
}
