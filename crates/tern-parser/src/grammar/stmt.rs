//! Statements and blocks

use super::decl::handle_decl;
use super::expr::handle_expr;
use crate::ast::{stmt, Node};
use crate::context::Context;
use tern_error::{ErrorContext, ErrorReason};
use tern_lexer::{precedence, Lexeme};

pub(crate) fn handle_stmt(ctx: &mut Context<'_, '_>) -> Option<Node> {
    match ctx.peek().lexeme {
        Lexeme::LBrace => handle_block(ctx),
        Lexeme::Return => handle_return(ctx),
        Lexeme::Yield => handle_yield(ctx),
        Lexeme::Defer => handle_defer(ctx),
        Lexeme::Preface => handle_preface(ctx),
        Lexeme::Loop => handle_loop(ctx),
        Lexeme::Match => handle_match(ctx),
        _ => handle_simple(ctx),
    }
}

/// Consumes the `;` ending a statement. It may be left out after `}`.
pub(super) fn handle_terminator(ctx: &mut Context<'_, '_>) {
    if ctx.previous_is(Lexeme::RBrace) {
        ctx.match_lexeme(Lexeme::Semicolon);
    } else {
        ctx.emit_if_lexeme_not_present(Lexeme::Semicolon, ErrorReason::MissingSemicolon);
    }
}

/// Statements up to the closing `}`, each one terminated
fn handle_statements(ctx: &mut Context<'_, '_>, missing: ErrorReason) -> Vec<Node> {
    let mut statements = Vec::new();
    loop {
        if ctx.match_lexeme(Lexeme::RBrace).is_some() {
            break;
        }
        if ctx.done() {
            ctx.emit(ErrorReason::MissingClosing);
            break;
        }

        match handle_stmt(&mut *ctx) {
            Some(statement) => {
                statements.push(statement);
                handle_terminator(ctx);
            }
            None => {
                ctx.emit(missing);
                ctx.synchronize(&[Lexeme::Semicolon, Lexeme::RBrace]);
                ctx.match_lexeme(Lexeme::Semicolon);
            }
        }
    }
    statements
}

/// `{ stmt; ... }`
pub(crate) fn handle_block(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Block);
    let open = ctx.match_lexeme(Lexeme::LBrace)?;
    let statements = handle_statements(&mut ctx, ErrorReason::MissingStmt);
    Some(
        stmt::Block {
            location: open.location,
            statements,
        }
        .into(),
    )
}

fn handle_return(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Return);
    let keyword = ctx.match_lexeme(Lexeme::Return)?;
    let value = handle_expr(&mut ctx).unwrap_or_else(|| Node::empty(ctx.location()));
    Some(
        stmt::Return {
            location: keyword.location,
            value: Box::new(value),
        }
        .into(),
    )
}

fn handle_yield(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Yield);
    let keyword = ctx.match_lexeme(Lexeme::Yield)?;
    let value = handle_expr(&mut ctx).unwrap_or_else(|| Node::empty(ctx.location()));
    Some(
        stmt::Yield {
            location: keyword.location,
            value: Box::new(value),
        }
        .into(),
    )
}

fn handle_defer(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Defer);
    let keyword = ctx.match_lexeme(Lexeme::Defer)?;
    let body = handle_stmt(&mut ctx);
    let body = ctx.emit_if_node_missing(body, ErrorReason::MissingStmt);
    Some(
        stmt::Defer {
            location: keyword.location,
            body: Box::new(body),
        }
        .into(),
    )
}

fn handle_preface(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Preface);
    let keyword = ctx.match_lexeme(Lexeme::Preface)?;
    let body = handle_stmt(&mut ctx);
    let body = ctx.emit_if_node_missing(body, ErrorReason::MissingStmt);
    Some(
        stmt::Preface {
            location: keyword.location,
            body: Box::new(body),
        }
        .into(),
    )
}

/// `loop x in xs {}`, `loop {}` or `loop cond {}`
fn handle_loop(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Loop);
    let keyword = ctx.match_lexeme(Lexeme::Loop)?;

    let (binding, source) = match handle_loop_binding(&mut ctx) {
        Some(parts) => parts,
        None if ctx.check(Lexeme::LBrace) => {
            let location = ctx.location();
            (Node::empty(location), Node::empty(location))
        }
        None => {
            let binding = Node::empty(ctx.location());
            let source = handle_expr(&mut ctx);
            let source = ctx.emit_if_node_missing(source, ErrorReason::MissingExpr);
            (binding, source)
        }
    };

    let body = handle_block(&mut ctx);
    let body = ctx.emit_if_node_missing(body, ErrorReason::MissingBlock);

    Some(
        stmt::Loop {
            location: keyword.location,
            binding: Box::new(binding),
            source: Box::new(source),
            body: Box::new(body),
        }
        .into(),
    )
}

/// `decl in source`
fn handle_loop_binding(parent: &mut Context<'_, '_>) -> Option<(Node, Node)> {
    let mut ctx = parent.enter(ErrorContext::Loop);
    let Some(binding) = handle_decl(&mut ctx) else {
        return ctx.fail();
    };
    if ctx.match_lexeme(Lexeme::In).is_none() {
        return ctx.fail();
    }
    let source = handle_expr(&mut ctx);
    let source = ctx.emit_if_node_missing(source, ErrorReason::MissingExpr);
    Some((binding, source))
}

/// `match subject { pattern => stmt; ... }`
fn handle_match(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Match);
    let keyword = ctx.match_lexeme(Lexeme::Match)?;

    let subject = handle_expr(&mut ctx);
    let subject = ctx.emit_if_node_missing(subject, ErrorReason::MissingExpr);

    let arms = if ctx.match_lexeme(Lexeme::LBrace).is_some() {
        handle_statements(&mut ctx, ErrorReason::MissingConditional)
    } else {
        ctx.emit(ErrorReason::MissingBlock);
        Vec::new()
    };
    for arm in arms.iter().filter(|arm| !arm.is::<stmt::Conditional>()) {
        ctx.emit_at(ErrorReason::MissingConditional, arm.location());
    }

    Some(
        stmt::Match {
            location: keyword.location,
            subject: Box::new(subject),
            arms,
        }
        .into(),
    )
}

/// Declarations, assignments, conditionals and expression statements
fn handle_simple(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Statement);
    let location = ctx.location();

    let Some(lead) = handle_explicit_decl(&mut ctx).or_else(|| handle_expr(&mut ctx)) else {
        return ctx.fail();
    };

    if let Some(op) = ctx.match_if(|token| precedence::is_assignment(token.lexeme)) {
        let mut assign = ctx.enter(ErrorContext::Assign);
        let value = handle_expr(&mut assign);
        let value = assign.emit_if_node_missing(value, ErrorReason::MissingExpr);
        return Some(
            stmt::Assign {
                location,
                op: op.lexeme,
                target: Box::new(lead),
                value: Box::new(value),
            }
            .into(),
        );
    }

    if ctx.match_lexeme(Lexeme::FatArrow).is_some() {
        let mut conditional = ctx.enter(ErrorContext::Conditional);
        let body = handle_stmt(&mut conditional);
        let body = conditional.emit_if_node_missing(body, ErrorReason::MissingStmt);
        return Some(
            stmt::Conditional {
                location,
                condition: Box::new(lead),
                body: Box::new(body),
            }
            .into(),
        );
    }

    let node = if matches!(lead, Node::Decl(_)) {
        stmt::Declaration {
            location,
            decl: Box::new(lead),
        }
        .into()
    } else {
        stmt::Expression {
            location,
            expr: Box::new(lead),
        }
        .into()
    };
    Some(node)
}

/// A declaration that cannot be mistaken for an expression
fn handle_explicit_decl(parent: &mut Context<'_, '_>) -> Option<Node> {
    let mut ctx = parent.enter(ErrorContext::Statement);
    match handle_decl(&mut ctx) {
        Some(Node::Decl(decl)) if decl.is_explicit() => Some(Node::Decl(decl)),
        _ => ctx.fail(),
    }
}
