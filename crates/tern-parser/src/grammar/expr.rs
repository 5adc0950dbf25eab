//! Expressions: precedence climbing over prefix, primary and postfix forms

use super::decl::{handle_generic_decl, handle_tuple_decl};
use super::list::handle_list;
use super::stmt::handle_block;
use super::types::handle_type;
use crate::ast::{expr, Node};
use crate::context::{Context, ParseState};
use tern_error::{ErrorContext, ErrorReason};
use tern_lexer::precedence::{self, PREFIX_PRECEDENCE};
use tern_lexer::{Lexeme, Scanner, Token};

// =========================================
// Operators
// =========================================

/// A full expression
pub(crate) fn handle_expr(ctx: &mut Context<'_, '_>) -> Option<Node> {
    handle_expr_at(ctx, 0)
}

/// An expression whose binary operators all bind at least as tightly as
/// `floor`
fn handle_expr_at(parent: &mut Context<'_, '_>, floor: u8) -> Option<Node> {
    let mut ctx = parent.enter_with_precedence(ErrorContext::Expr, floor);

    let lhs = match handle_prefix(&mut ctx) {
        Some(node) => Some(node),
        None => handle_primary(&mut ctx).map(|node| handle_postfix(&mut ctx, node)),
    };
    let Some(mut lhs) = lhs else {
        return ctx.fail();
    };

    while let Some(power) = precedence::binary(ctx.peek().lexeme) {
        if ctx.done() || !power.binds_at(ctx.precedence()) {
            break;
        }

        let mut binary = ctx.enter(ErrorContext::BinaryExpr);
        let Some(op) = binary.advance() else {
            break;
        };
        let rhs = handle_expr_at(&mut binary, power.rhs_floor());
        let rhs = binary.emit_if_node_missing(rhs, ErrorReason::MissingExpr);
        drop(binary);

        lhs = expr::Binary {
            location: lhs.location(),
            op: op.lexeme,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
        .into();
    }

    Some(lhs)
}

fn handle_prefix(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::PrefixExpr);
    let op = ctx.match_if(|token| precedence::is_prefix(token.lexeme))?;

    let operand = handle_expr_at(&mut ctx, PREFIX_PRECEDENCE);
    let operand = ctx.emit_if_node_missing(operand, ErrorReason::MissingExpr);

    Some(
        expr::Prefix {
            location: op.location,
            op: op.lexeme,
            operand: Box::new(operand),
        }
        .into(),
    )
}

/// Calls and subscripts
fn handle_postfix(ctx: &mut Context<'_, '_>, mut node: Node) -> Node {
    loop {
        if ctx.check(Lexeme::LParen) {
            let mut call = ctx.enter(ErrorContext::FnApp);
            let Some(args) = handle_list(
                &mut call,
                Lexeme::LParen,
                Lexeme::RParen,
                ErrorReason::MissingExpr,
                handle_expr,
            ) else {
                break;
            };
            node = expr::FnApp {
                location: node.location(),
                callee: Box::new(node),
                args,
            }
            .into();
        } else if ctx.check(Lexeme::LBracket) {
            let mut subscript = ctx.enter(ErrorContext::Subscript);
            let Some(indices) = handle_list(
                &mut subscript,
                Lexeme::LBracket,
                Lexeme::RBracket,
                ErrorReason::MissingExpr,
                handle_expr,
            ) else {
                break;
            };
            node = expr::Subscript {
                location: node.location(),
                target: Box::new(node),
                indices,
            }
            .into();
        } else {
            break;
        }
    }
    node
}

// =========================================
// Primary expressions
// =========================================

fn handle_primary(ctx: &mut Context<'_, '_>) -> Option<Node> {
    if ctx.done() {
        return None;
    }
    match ctx.peek().lexeme {
        Lexeme::Try => handle_try(ctx),
        Lexeme::Binary
        | Lexeme::Octal
        | Lexeme::Decimal
        | Lexeme::Hexadecimal
        | Lexeme::Float
        | Lexeme::True
        | Lexeme::False => handle_literal(ctx),
        Lexeme::LBrace => handle_record(ctx),
        Lexeme::Identifier | Lexeme::Anonymous => handle_identifier(ctx),
        Lexeme::StringFragment => handle_string(ctx),
        Lexeme::LParen => handle_tuple(ctx),
        Lexeme::LBracket => handle_array(ctx),
        Lexeme::Fn => handle_function(ctx),
        _ => None,
    }
}

fn handle_literal(ctx: &mut Context<'_, '_>) -> Option<Node> {
    let token = ctx.advance()?;
    let location = token.location;

    let node = match token.lexeme {
        Lexeme::True | Lexeme::False => expr::Boolean {
            location,
            value: token.lexeme == Lexeme::True,
        }
        .into(),
        // Malformed numbers are scan errors already; they read as zero
        Lexeme::Float => {
            let value = token.float_value().unwrap_or_default();
            expr::Float { location, value }.into()
        }
        lexeme => {
            let base = expr::Base::from_lexeme(lexeme).unwrap_or(expr::Base::Decimal);
            let value = token.integer_value().unwrap_or_default();
            expr::Integer {
                location,
                value,
                base,
            }
            .into()
        }
    };
    Some(node)
}

/// `name`, `a.b.c` or `_`
fn handle_identifier(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Identifier);

    if let Some(token) = ctx.match_lexeme(Lexeme::Anonymous) {
        return Some(
            expr::Anonymous {
                location: token.location,
            }
            .into(),
        );
    }

    let first = ctx.match_lexeme(Lexeme::Identifier)?;
    let mut path = vec![first.text.clone()];
    while ctx.match_lexeme(Lexeme::Dot).is_some() {
        match ctx.match_lexeme(Lexeme::Identifier) {
            Some(segment) => path.push(segment.text.clone()),
            None => {
                ctx.emit(ErrorReason::MissingIdentifier);
                break;
            }
        }
    }

    Some(
        expr::Identifier {
            location: first.location,
            path,
        }
        .into(),
    )
}

fn handle_try(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Try);
    let keyword = ctx.match_lexeme(Lexeme::Try)?;

    let operand = handle_expr_at(&mut ctx, PREFIX_PRECEDENCE);
    let operand = ctx.emit_if_node_missing(operand, ErrorReason::MissingExpr);

    Some(
        expr::Try {
            location: keyword.location,
            operand: Box::new(operand),
        }
        .into(),
    )
}

fn handle_tuple(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Tuple);
    let location = ctx.location();
    let elements = handle_list(
        &mut ctx,
        Lexeme::LParen,
        Lexeme::RParen,
        ErrorReason::MissingExpr,
        handle_expr,
    )?;
    Some(expr::Tuple { location, elements }.into())
}

fn handle_array(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Array);
    let location = ctx.location();
    let elements = handle_list(
        &mut ctx,
        Lexeme::LBracket,
        Lexeme::RBracket,
        ErrorReason::MissingExpr,
        handle_expr,
    )?;
    Some(expr::Array { location, elements }.into())
}

fn handle_record(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Record);
    let location = ctx.location();
    let fields = handle_list(
        &mut ctx,
        Lexeme::LBrace,
        Lexeme::RBrace,
        ErrorReason::MissingExpr,
        handle_field,
    )?;
    Some(expr::Record { location, fields }.into())
}

/// `name: value`
fn handle_field(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Field);
    let name = ctx.match_lexeme(Lexeme::Identifier)?;

    ctx.emit_if_lexeme_not_present(Lexeme::Colon, ErrorReason::MissingSeparator);
    let value = handle_expr(&mut ctx);
    let value = ctx.emit_if_node_missing(value, ErrorReason::MissingExpr);

    Some(
        expr::Field {
            location: name.location,
            name: name.text.clone(),
            value: Box::new(value),
        }
        .into(),
    )
}

/// `fn [T] (params) -> Ret { body }`
fn handle_function(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Function);
    let keyword = ctx.match_lexeme(Lexeme::Fn)?;

    let location = ctx.location();
    let generics = handle_generic_decl(&mut ctx).unwrap_or_else(|| Node::empty(location));

    let params = handle_tuple_decl(&mut ctx);
    let params = ctx.emit_if_node_missing(params, ErrorReason::MissingDecl);

    let ret = if ctx.match_lexeme(Lexeme::Arrow).is_some() {
        let ret = handle_type(&mut ctx);
        ctx.emit_if_node_missing(ret, ErrorReason::MissingTypeExpr)
    } else {
        Node::empty(ctx.location())
    };

    let body = handle_block(&mut ctx);
    let body = ctx.emit_if_node_missing(body, ErrorReason::MissingBlock);

    Some(
        expr::Function {
            location: keyword.location,
            generics: Box::new(generics),
            params: Box::new(params),
            ret: Box::new(ret),
            body: Box::new(body),
        }
        .into(),
    )
}

// =========================================
// Strings
// =========================================

/// `fragment (placeholder fragment)*`
fn handle_string(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::String);
    let first = ctx.match_lexeme(Lexeme::StringFragment)?;

    let mut parts = vec![fragment(first)];
    while let Some(placeholder) = ctx.match_lexeme(Lexeme::StringPlaceholder) {
        parts.push(interpolate(&mut ctx, placeholder));
        match ctx.match_lexeme(Lexeme::StringFragment) {
            Some(token) => parts.push(fragment(token)),
            None => break,
        }
    }

    Some(
        expr::String {
            location: first.location,
            parts,
        }
        .into(),
    )
}

fn fragment(token: &Token) -> Node {
    expr::StringFragment {
        location: token.location,
        value: token.text.clone(),
    }
    .into()
}

/// Parses the source of a placeholder as one expression.
///
/// Diagnostics land in the string's context, so they vanish if the string
/// is backtracked over.
fn interpolate(ctx: &mut Context<'_, '_>, placeholder: &Token) -> Node {
    let depth = ctx.interpolation_depth();
    if depth > 0 {
        ctx.emit_at(ErrorReason::RestrictedAction, placeholder.location);
        return Node::missing(placeholder.location);
    }

    let scanned = Scanner::with_origin(&placeholder.text, placeholder.location).scan();
    let mut state = ParseState::nested(&scanned.tokens, scanned.end, depth);
    let node = {
        let mut root = Context::root(&mut state, ErrorContext::String);
        let node = handle_expr(&mut root);
        let node = root.emit_if_node_missing(node, ErrorReason::MissingExpr);
        if !root.done() {
            root.emit(ErrorReason::UnexpectedToken);
        }
        node
    };

    let (syntax, nested_scan) = state.finish();
    let mut scan_errors = scanned.errors;
    scan_errors.extend(nested_scan);
    ctx.absorb(syntax, scan_errors);
    node
}

#[cfg(test)]
mod tests {
    use crate::ast::expr;
    use crate::parser::{parse_expr, Snippet};
    use crate::shape::shape;
    use tern_error::{ErrorContext, ErrorReason, Location};

    fn sexpr(source: &str) -> String {
        let Snippet { node, errors, .. } = parse_expr(source);
        assert!(errors.is_empty(), "{source}: {errors:?}");
        shape(&node)
    }

    #[test]
    fn test_precedence() {
        assert_eq!(sexpr("-x+y*z"), "(+ (- x) (* y z))");
        assert_eq!(sexpr("x*-y+z"), "(+ (* x (- y)) z)");
        assert_eq!(sexpr("a || b && c == d"), "(|| a (&& b (== c d)))");
        assert_eq!(sexpr("a | b ^ c & d << 1"), "(| a (^ b (& c (<< d 1))))");
    }

    #[test]
    fn test_associativity() {
        assert_eq!(sexpr("a - b - c"), "(- (- a b) c)");
        assert_eq!(sexpr("a ** b ** c"), "(** a (** b c))");
        assert_eq!(sexpr("-a ** 2"), "(- (** a 2))");
    }

    #[test]
    fn test_parentheses_make_tuples() {
        assert_eq!(sexpr("(a + b) * c"), "(* (tuple (+ a b)) c)");
    }

    #[test]
    fn test_postfix_chains() {
        assert_eq!(sexpr("f(x)[0](y, z)"), "(call (index (call f x) 0) y z)");
        assert_eq!(sexpr("io.print(\"hi\")"), "(call io.print (str \"hi\"))");
    }

    #[test]
    fn test_literals() {
        assert_eq!(sexpr("0x123456789abcdef"), "81985529216486895");
        assert_eq!(sexpr("[0b0, 00, 0x0]"), "(array 0 0 0)");
        assert_eq!(sexpr("00.0314"), "0.0314");
        assert_eq!(sexpr("true"), "true");
    }

    #[test]
    fn test_malformed_numbers_are_reported_once() {
        for source in ["019", "0x1G", "12abc", "99999999999999999999"] {
            let snippet = parse_expr(source);
            assert!(snippet.errors.is_empty(), "{source}: {:?}", snippet.errors);
            assert_eq!(snippet.scan_errors.len(), 1, "{source}");
            assert_eq!(snippet.node.cast::<expr::Integer>().value, 0);
        }
    }

    #[test]
    fn test_try_binds_like_prefix() {
        assert_eq!(sexpr("try f(x) + 1"), "(+ (try (call f x)) 1)");
    }

    #[test]
    fn test_record_and_function() {
        assert_eq!(sexpr("{a: 1, b: _}"), "(record (field a 1) (field b _))");
        assert_eq!(
            sexpr("fn [T] (x: T) -> T { return x; }"),
            "(fn (generics T) (dtuple (decl x T)) T (block (return x)))"
        );
        assert_eq!(sexpr("fn () {}"), "(fn () (dtuple) () (block))");
    }

    #[test]
    fn test_interpolation() {
        let Snippet { node, errors, .. } = parse_expr("\"Array: [{0}, { x }, { false}]\"");
        assert!(errors.is_empty());
        let string = node.cast::<expr::String>();
        assert_eq!(string.parts.len(), 7);

        let fragments = string.parts.iter().filter(|p| p.is::<expr::StringFragment>());
        assert_eq!(fragments.count(), 4);
        assert_eq!(string.parts[1].cast::<expr::Integer>().value, 0);
        assert_eq!(string.parts[3].cast::<expr::Identifier>().path, ["x"]);
        assert!(!string.parts[5].cast::<expr::Boolean>().value);
    }

    #[test]
    fn test_placeholder_locations_are_absolute() {
        let Snippet { node, .. } = parse_expr("\"ab{ x }\"");
        let string = node.cast::<expr::String>();
        assert_eq!(string.parts[1].location(), Location::new(1, 6, 5));
    }

    #[test]
    fn test_placeholder_errors() {
        let Snippet { errors, .. } = parse_expr("\"{}\"");
        assert_eq!(
            (errors[0].context, errors[0].reason),
            (ErrorContext::String, ErrorReason::MissingExpr)
        );

        let Snippet { errors, .. } = parse_expr("\"{a b}\"");
        assert_eq!(
            (errors[0].context, errors[0].reason),
            (ErrorContext::String, ErrorReason::UnexpectedToken)
        );
        assert_eq!(errors[0].location, Location::new(1, 5, 4));
    }

    #[test]
    fn test_nested_interpolation_is_restricted() {
        let Snippet { node, errors, .. } = parse_expr("\"{ \"in {x}\" }\"");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            (errors[0].context, errors[0].reason),
            (ErrorContext::String, ErrorReason::RestrictedAction)
        );
        let inner = node.cast::<expr::String>().parts[1].cast::<expr::String>();
        assert!(inner.parts[1].is_missing());
    }

    #[test]
    fn test_missing_operands() {
        let Snippet { node, errors, .. } = parse_expr("a +");
        assert!(node.cast::<expr::Binary>().rhs.is_missing());
        assert_eq!(
            (errors[0].context, errors[0].reason),
            (ErrorContext::BinaryExpr, ErrorReason::MissingExpr)
        );

        let Snippet { errors, .. } = parse_expr("a.");
        assert_eq!(errors[0].reason, ErrorReason::MissingIdentifier);
    }
}
