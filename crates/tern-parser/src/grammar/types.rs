//! Type expressions

use super::expr::handle_expr;
use super::list::handle_list;
use crate::ast::{ty, Node};
use crate::context::Context;
use tern_error::{ErrorContext, ErrorReason};
use tern_lexer::{precedence, Lexeme};

pub(crate) fn handle_type(ctx: &mut Context<'_, '_>) -> Option<Node> {
    handle_type_at(ctx, 0)
}

fn handle_type_at(parent: &mut Context<'_, '_>, floor: u8) -> Option<Node> {
    let mut ctx = parent.enter_with_precedence(ErrorContext::Type, floor);

    let Some(primary) = handle_type_primary(&mut ctx) else {
        return ctx.fail();
    };
    let mut lhs = handle_type_postfix(&mut ctx, primary);

    while let Some(power) = precedence::type_binary(ctx.peek().lexeme) {
        if ctx.done() || !power.binds_at(ctx.precedence()) {
            break;
        }

        let mut binary = ctx.enter(ErrorContext::TypeBinary);
        let Some(op) = binary.advance() else {
            break;
        };
        let rhs = handle_type_at(&mut binary, power.rhs_floor());
        let rhs = binary.emit_if_node_missing(rhs, ErrorReason::MissingTypeExpr);
        drop(binary);

        let location = lhs.location();
        lhs = if op.lexeme == Lexeme::Arrow {
            ty::Function {
                location,
                param: Box::new(lhs),
                ret: Box::new(rhs),
            }
            .into()
        } else {
            ty::Binary {
                location,
                op: op.lexeme,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }
            .into()
        };
    }

    Some(lhs)
}

fn handle_type_primary(ctx: &mut Context<'_, '_>) -> Option<Node> {
    if ctx.done() {
        return None;
    }
    match ctx.peek().lexeme {
        Lexeme::LBracket if ctx.peek_nth(1).lexeme == Lexeme::LBracket => handle_inference(ctx),
        Lexeme::LParen => handle_tuple_type(ctx),
        Lexeme::Dollar | Lexeme::FundamentalType | Lexeme::UserDefinedType => {
            handle_type_name(ctx)
        }
        _ => None,
    }
}

/// `Int`, `$Point`
fn handle_type_name(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Type);
    let dollar = ctx.match_lexeme(Lexeme::Dollar);
    let Some(name) = ctx.match_if(|token| token.lexeme.is_type_name()) else {
        return ctx.fail();
    };

    Some(
        ty::Identifier {
            location: dollar.unwrap_or(name).location,
            name: name.text.clone(),
            constant: dollar.is_none(),
        }
        .into(),
    )
}

/// `[[expr]]`
fn handle_inference(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::TypeInference);
    let open = ctx.match_lexeme(Lexeme::LBracket)?;
    if ctx.match_lexeme(Lexeme::LBracket).is_none() {
        return ctx.fail();
    }

    let expr = handle_expr(&mut ctx);
    let expr = ctx.emit_if_node_missing(expr, ErrorReason::MissingExpr);

    let closed =
        ctx.match_lexeme(Lexeme::RBracket).is_some() && ctx.match_lexeme(Lexeme::RBracket).is_some();
    ctx.emit_if(!closed, ErrorReason::MissingClosing);

    Some(
        ty::Inference {
            location: open.location,
            expr: Box::new(expr),
        }
        .into(),
    )
}

fn handle_tuple_type(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::TupleType);
    let location = ctx.location();
    let elements = handle_list(
        &mut ctx,
        Lexeme::LParen,
        Lexeme::RParen,
        ErrorReason::MissingTypeExpr,
        handle_type,
    )?;
    Some(ty::Tuple { location, elements }.into())
}

/// Generic arguments and array dimensions, in any order
fn handle_type_postfix(ctx: &mut Context<'_, '_>, mut node: Node) -> Node {
    while ctx.check(Lexeme::LBracket) {
        if let Some(args) = handle_generic_args(ctx) {
            node = ty::Generic {
                location: node.location(),
                base: Box::new(node),
                args,
            }
            .into();
            continue;
        }

        let mut array = ctx.enter(ErrorContext::ArrayType);
        let Some(dims) = handle_list(
            &mut array,
            Lexeme::LBracket,
            Lexeme::RBracket,
            ErrorReason::MissingExpr,
            handle_expr,
        ) else {
            break;
        };
        node = ty::Array {
            location: node.location(),
            element: Box::new(node),
            dims,
        }
        .into();
    }
    node
}

/// `[A, B]`, provided the first element parses as a type and the whole list
/// parses cleanly. Otherwise the brackets hold array dimensions and the
/// attempt is abandoned.
fn handle_generic_args(parent: &mut Context<'_, '_>) -> Option<Vec<Node>> {
    let mut ctx = parent.enter(ErrorContext::GenericType);

    let mut first = None;
    let args = handle_list(
        &mut ctx,
        Lexeme::LBracket,
        Lexeme::RBracket,
        ErrorReason::MissingTypeExpr,
        |ctx| {
            let node = handle_type(ctx);
            first.get_or_insert(node.is_some());
            node
        },
    );

    match args {
        Some(args) if first == Some(true) && !ctx.has_errors() => Some(args),
        _ => ctx.fail(),
    }
}
