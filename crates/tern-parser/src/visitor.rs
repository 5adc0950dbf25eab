//! Generic traversal of the syntax tree
//!
//! A [`Visitor`] has one hook per namespace. Every hook defaults to [`walk`],
//! which visits the children in source order and yields
//! `Output::default()`, so a visitor only overrides what it cares about.

use crate::ast::{decl::Decl, expr::Expr, global::Global, stmt::Stmt, ty::Type};
use crate::ast::{Node, TranslationUnit};

pub trait Visitor {
    type Output: Default;

    /// Dispatches on the node's namespace
    fn visit(&mut self, node: &Node) -> Self::Output {
        match node {
            Node::Empty(_) | Node::RequiredButMissing(_) => self.visit_sentinel(node),
            Node::TranslationUnit(unit) => self.visit_translation_unit(unit),
            Node::Expr(expr) => self.visit_expr(expr),
            Node::Type(ty) => self.visit_type(ty),
            Node::Decl(decl) => self.visit_decl(decl),
            Node::Stmt(stmt) => self.visit_stmt(stmt),
            Node::Global(global) => self.visit_global(global),
        }
    }

    fn visit_translation_unit(&mut self, unit: &TranslationUnit) -> Self::Output {
        walk(self, unit.children())
    }

    fn visit_expr(&mut self, expr: &Expr) -> Self::Output {
        walk(self, expr.children())
    }

    fn visit_type(&mut self, ty: &Type) -> Self::Output {
        walk(self, ty.children())
    }

    fn visit_decl(&mut self, decl: &Decl) -> Self::Output {
        walk(self, decl.children())
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> Self::Output {
        walk(self, stmt.children())
    }

    fn visit_global(&mut self, global: &Global) -> Self::Output {
        walk(self, global.children())
    }

    /// `Empty` and `RequiredButMissing`
    fn visit_sentinel(&mut self, _node: &Node) -> Self::Output {
        Self::Output::default()
    }
}

/// Visits `children` pre-order and discards their results
pub fn walk<'n, V: Visitor + ?Sized>(
    visitor: &mut V,
    children: impl IntoIterator<Item = &'n Node>,
) -> V::Output {
    for child in children {
        visitor.visit(child);
    }
    V::Output::default()
}
