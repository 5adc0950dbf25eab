//! Declarations

use super::list::handle_list;
use super::types::handle_type;
use crate::ast::{decl, ty, Node};
use crate::context::Context;
use tern_error::{ErrorContext, ErrorReason};
use tern_lexer::Lexeme;

/// An identifier declaration, or a tuple of declarations
pub(crate) fn handle_decl(ctx: &mut Context<'_, '_>) -> Option<Node> {
    if let Some(node) = handle_id_decl(ctx) {
        return Some(node);
    }
    handle_tuple_decl(ctx)
}

/// `$name: Type`
fn handle_id_decl(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::IdDecl);
    let dollar = ctx.match_lexeme(Lexeme::Dollar);
    let Some(name) = ctx.match_any(&[Lexeme::Identifier, Lexeme::Anonymous]) else {
        return ctx.fail();
    };
    let ty = handle_annotation(&mut ctx);

    Some(
        decl::Identifier {
            location: dollar.unwrap_or(name).location,
            name: name.text.clone(),
            constant: dollar.is_none(),
            ty: Box::new(ty),
        }
        .into(),
    )
}

/// `$(a, b: Int): Type`
pub(crate) fn handle_tuple_decl(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::TupleDecl);
    let location = ctx.location();
    let dollar = ctx.match_lexeme(Lexeme::Dollar);
    let Some(elements) = handle_list(
        &mut ctx,
        Lexeme::LParen,
        Lexeme::RParen,
        ErrorReason::MissingDecl,
        handle_decl,
    ) else {
        return ctx.fail();
    };
    let ty = handle_annotation(&mut ctx);

    Some(
        decl::Tuple {
            location,
            elements,
            constant: dollar.is_none(),
            ty: Box::new(ty),
        }
        .into(),
    )
}

/// `[T, U]`
pub(crate) fn handle_generic_decl(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::GenericDecl);
    let location = ctx.location();
    let params = handle_list(
        &mut ctx,
        Lexeme::LBracket,
        Lexeme::RBracket,
        ErrorReason::MissingTypeExpr,
        handle_type_param,
    )?;
    Some(decl::Generic { location, params }.into())
}

fn handle_type_param(ctx: &mut Context<'_, '_>) -> Option<Node> {
    let name = ctx.match_lexeme(Lexeme::UserDefinedType)?;
    Some(
        ty::Identifier {
            location: name.location,
            name: name.text.clone(),
            constant: true,
        }
        .into(),
    )
}

/// `: Type`, or `Empty` when there is no colon
fn handle_annotation(ctx: &mut Context<'_, '_>) -> Node {
    if ctx.match_lexeme(Lexeme::Colon).is_none() {
        return Node::empty(ctx.location());
    }
    let ty = handle_type(ctx);
    ctx.emit_if_node_missing(ty, ErrorReason::MissingTypeExpr)
}
