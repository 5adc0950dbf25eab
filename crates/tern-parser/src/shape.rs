//! S-expression rendering of a tree, without locations
//!
//! Two trees have the same shape exactly when they differ only in where
//! their nodes sit in the source. Tests compare trees this way.

use crate::ast::decl::Decl;
use crate::ast::expr::Expr;
use crate::ast::global::Global;
use crate::ast::stmt::Stmt;
use crate::ast::ty::Type;
use crate::ast::{Node, TranslationUnit, Visibility};
use crate::printer::format_float;
use crate::visitor::Visitor;
use tern_lexer::Lexeme;

/// Renders `node` as an S-expression
pub fn shape(node: &Node) -> String {
    Shape.visit(node)
}

struct Shape;

impl Shape {
    /// `(head child...)`
    fn list<'n>(&mut self, head: &str, children: impl IntoIterator<Item = &'n Node>) -> String {
        let mut out = format!("({head}");
        for child in children {
            out.push(' ');
            out.push_str(&self.visit(child));
        }
        out.push(')');
        out
    }
}

fn op(lexeme: Lexeme) -> &'static str {
    lexeme.symbol().unwrap_or("?")
}

impl Visitor for Shape {
    type Output = String;

    fn visit_translation_unit(&mut self, unit: &TranslationUnit) -> String {
        self.list("unit", unit.children())
    }

    fn visit_global(&mut self, global: &Global) -> String {
        match global {
            Global::Module(g) => format!("(module {})", g.path.join(".")),
            Global::Import(g) => match &g.alias {
                Some(alias) => format!("(import {} as {alias})", g.path.join(".")),
                None => format!("(import {})", g.path.join(".")),
            },
            Global::ImportGroup(g) => self.list("imports", &g.imports),
            Global::Definition(g) => {
                let head = match g.visibility {
                    Visibility::Exported => "export",
                    Visibility::Local => "def",
                };
                self.list(head, [g.decl.as_ref(), g.value.as_ref()])
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Integer(e) => e.value.to_string(),
            Expr::Float(e) => format_float(e.value),
            Expr::Boolean(e) => e.value.to_string(),
            Expr::StringFragment(e) => format!("{:?}", e.value),
            Expr::String(e) => self.list("str", &e.parts),
            Expr::Identifier(e) => e.path.join("."),
            Expr::Anonymous(_) => "_".to_string(),
            Expr::Tuple(e) => self.list("tuple", &e.elements),
            Expr::Array(e) => self.list("array", &e.elements),
            Expr::Record(e) => self.list("record", &e.fields),
            Expr::Field(e) => {
                let value = self.visit(&e.value);
                format!("(field {} {value})", e.name)
            }
            Expr::Prefix(e) => self.list(op(e.op), [e.operand.as_ref()]),
            Expr::Binary(e) => self.list(op(e.op), [e.lhs.as_ref(), e.rhs.as_ref()]),
            Expr::FnApp(e) => self.list("call", std::iter::once(e.callee.as_ref()).chain(&e.args)),
            Expr::Subscript(e) => {
                self.list("index", std::iter::once(e.target.as_ref()).chain(&e.indices))
            }
            Expr::Try(e) => self.list("try", [e.operand.as_ref()]),
            Expr::Function(_) => self.list("fn", expr.children()),
        }
    }

    fn visit_type(&mut self, ty: &Type) -> String {
        match ty {
            Type::Identifier(t) if !t.constant => format!("${}", t.name),
            Type::Identifier(t) => t.name.clone(),
            Type::Tuple(t) => self.list("ttuple", &t.elements),
            Type::Array(_) => self.list("tarray", ty.children()),
            Type::Generic(_) => self.list("generic", ty.children()),
            Type::Binary(t) => self.list(op(t.op), [t.lhs.as_ref(), t.rhs.as_ref()]),
            Type::Function(t) => self.list("->", [t.param.as_ref(), t.ret.as_ref()]),
            Type::Inference(t) => self.list("infer", [t.expr.as_ref()]),
        }
    }

    fn visit_decl(&mut self, decl: &Decl) -> String {
        match decl {
            Decl::Identifier(d) => {
                let dollar = if d.constant { "" } else { "$" };
                let ty = self.visit(&d.ty);
                format!("(decl {dollar}{} {ty})", d.name)
            }
            Decl::Tuple(d) => {
                let mut out = String::from("(dtuple");
                if !d.constant {
                    out.push_str(" $");
                }
                for element in &d.elements {
                    out.push(' ');
                    out.push_str(&self.visit(element));
                }
                if !d.ty.is_empty() {
                    out.push_str(" : ");
                    out.push_str(&self.visit(&d.ty));
                }
                out.push(')');
                out
            }
            Decl::Generic(d) => self.list("generics", &d.params),
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Block(s) => self.list("block", &s.statements),
            Stmt::Return(_) => self.list("return", stmt.children()),
            Stmt::Yield(_) => self.list("yield", stmt.children()),
            Stmt::Defer(_) => self.list("defer", stmt.children()),
            Stmt::Preface(_) => self.list("preface", stmt.children()),
            Stmt::Loop(_) => self.list("loop", stmt.children()),
            Stmt::Match(_) => self.list("match", stmt.children()),
            Stmt::Assign(s) => self.list(op(s.op), stmt.children()),
            Stmt::Conditional(_) => self.list("=>", stmt.children()),
            Stmt::Declaration(_) => self.list("let", stmt.children()),
            Stmt::Expression(s) => self.visit(&s.expr),
        }
    }

    fn visit_sentinel(&mut self, node: &Node) -> String {
        if node.is_missing() {
            "?".to_string()
        } else {
            "()".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_expr, parse_stmt, Snippet};
    use tern_error::Location;

    #[test]
    fn test_sentinels() {
        assert_eq!(shape(&Node::empty(Location::START)), "()");
        assert_eq!(shape(&Node::missing(Location::START)), "?");
    }

    #[test]
    fn test_locations_do_not_matter() {
        let Snippet { node: a, .. } = parse_expr("f(x,y)");
        let Snippet { node: b, .. } = parse_expr("f(\n  x,\n  y\n)");
        assert_ne!(a, b);
        assert_eq!(shape(&a), shape(&b));
    }

    #[test]
    fn test_statements() {
        let Snippet { node, .. } = parse_stmt("{ x: Int = 1; defer f(); x; }");
        assert_eq!(
            shape(&node),
            "(block (= (decl x Int) 1) (defer (call f)) x)"
        );
    }

    #[test]
    fn test_missing_parts() {
        let Snippet { node, .. } = parse_expr("[1,,3]");
        assert_eq!(shape(&node), "(array 1 ? 3)");
    }
}
