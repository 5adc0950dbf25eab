//! Canonical source printer
//!
//! Prints a tree back to Tern source. Parsing the output gives a tree with
//! the same shape as the input, so `tern fmt` is built on this.

use crate::ast::decl::Decl;
use crate::ast::expr::{Base, Expr};
use crate::ast::global::Global;
use crate::ast::stmt::Stmt;
use crate::ast::ty::Type;
use crate::ast::{Node, TranslationUnit, Visibility};
use crate::visitor::Visitor;
use tern_lexer::Lexeme;

const INDENT: &str = "    ";

/// Prints `node` as Tern source
pub fn print(node: &Node) -> String {
    Printer::default().visit(node)
}

#[derive(Debug, Default)]
pub struct Printer {
    depth: usize,
}

impl Printer {
    fn join<'n>(&mut self, nodes: impl IntoIterator<Item = &'n Node>) -> String {
        nodes
            .into_iter()
            .map(|node| self.visit(node))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn block(&mut self, statements: &[Node]) -> String {
        if statements.is_empty() {
            return "{}".to_string();
        }
        self.depth += 1;
        let indent = INDENT.repeat(self.depth);
        let mut out = String::from("{\n");
        for statement in statements {
            out.push_str(&indent);
            out.push_str(&self.visit(statement));
            out.push_str(";\n");
        }
        self.depth -= 1;
        out.push_str(&INDENT.repeat(self.depth));
        out.push('}');
        out
    }

    /// `: Type`, or nothing for `Empty`
    fn annotation(&mut self, ty: &Node) -> String {
        if ty.is_empty() {
            String::new()
        } else {
            format!(": {}", self.visit(ty))
        }
    }
}

fn op(lexeme: Lexeme) -> &'static str {
    lexeme.symbol().unwrap_or("?")
}

/// Marker for names that are not constant
fn dollar(constant: bool) -> &'static str {
    if constant {
        ""
    } else {
        "$"
    }
}

/// Shortest decimal form that still scans as a float
pub(crate) fn format_float(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') || !text.bytes().all(|b| b.is_ascii_digit() || b == b'-') {
        text
    } else {
        format!("{text}.0")
    }
}

fn escape(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    for ch in fragment.chars() {
        match ch {
            '\\' | '"' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{7}' => out.push_str("\\a"),
            _ => out.push(ch),
        }
    }
    out
}

impl Visitor for Printer {
    type Output = String;

    fn visit_translation_unit(&mut self, unit: &TranslationUnit) -> String {
        let mut out = String::new();
        if !unit.module.is_missing() {
            out.push_str(&self.visit(&unit.module));
            out.push('\n');
        }

        let imports = self.visit(&unit.imports);
        if !imports.is_empty() {
            out.push_str(&imports);
        }

        for definition in &unit.definitions {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&self.visit(definition));
            out.push('\n');
        }
        out
    }

    fn visit_global(&mut self, global: &Global) -> String {
        match global {
            Global::Module(g) => format!("module {};", g.path.join(".")),
            Global::Import(g) => match &g.alias {
                Some(alias) => format!("import {alias} = {};", g.path.join(".")),
                None => format!("import {};", g.path.join(".")),
            },
            Global::ImportGroup(g) => g
                .imports
                .iter()
                .filter(|import| !import.is_missing())
                .map(|import| format!("{}\n", self.visit(import)))
                .collect(),
            Global::Definition(g) => {
                let export = match g.visibility {
                    Visibility::Exported => "export ",
                    Visibility::Local => "",
                };
                let decl = self.visit(&g.decl);
                let value = self.visit(&g.value);
                format!("{export}{decl} = {value};")
            }
        }
    }

    fn visit_expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Integer(e) => match e.base {
                Base::Binary => format!("0b{:b}", e.value),
                Base::Octal if e.value == 0 => "0".to_string(),
                Base::Octal => format!("0{:o}", e.value),
                Base::Decimal => e.value.to_string(),
                Base::Hexadecimal => format!("0x{:x}", e.value),
            },
            Expr::Float(e) => format_float(e.value),
            Expr::Boolean(e) => e.value.to_string(),
            Expr::StringFragment(e) => escape(&e.value),
            Expr::String(e) => {
                let mut out = String::from("\"");
                for part in &e.parts {
                    if part.is::<crate::ast::expr::StringFragment>() {
                        out.push_str(&self.visit(part));
                    } else {
                        out.push('{');
                        out.push_str(&self.visit(part));
                        out.push('}');
                    }
                }
                out.push('"');
                out
            }
            Expr::Identifier(e) => e.path.join("."),
            Expr::Anonymous(_) => "_".to_string(),
            Expr::Tuple(e) => format!("({})", self.join(&e.elements)),
            Expr::Array(e) => format!("[{}]", self.join(&e.elements)),
            Expr::Record(e) => format!("{{{}}}", self.join(&e.fields)),
            Expr::Field(e) => format!("{}: {}", e.name, self.visit(&e.value)),
            Expr::Prefix(e) => format!("{}{}", op(e.op), self.visit(&e.operand)),
            Expr::Binary(e) => {
                let lhs = self.visit(&e.lhs);
                let rhs = self.visit(&e.rhs);
                format!("{lhs} {} {rhs}", op(e.op))
            }
            Expr::FnApp(e) => {
                let callee = self.visit(&e.callee);
                format!("{callee}({})", self.join(&e.args))
            }
            Expr::Subscript(e) => {
                let target = self.visit(&e.target);
                format!("{target}[{}]", self.join(&e.indices))
            }
            Expr::Try(e) => format!("try {}", self.visit(&e.operand)),
            Expr::Function(e) => {
                let mut out = String::from("fn ");
                if !e.generics.is_empty() {
                    out.push_str(&self.visit(&e.generics));
                    out.push(' ');
                }
                out.push_str(&self.visit(&e.params));
                if !e.ret.is_empty() {
                    out.push_str(" -> ");
                    out.push_str(&self.visit(&e.ret));
                }
                out.push(' ');
                out.push_str(&self.visit(&e.body));
                out
            }
        }
    }

    fn visit_type(&mut self, ty: &Type) -> String {
        match ty {
            Type::Identifier(t) => format!("{}{}", dollar(t.constant), t.name),
            Type::Tuple(t) => format!("({})", self.join(&t.elements)),
            Type::Array(t) => {
                let element = self.visit(&t.element);
                format!("{element}[{}]", self.join(&t.dims))
            }
            Type::Generic(t) => {
                let base = self.visit(&t.base);
                format!("{base}[{}]", self.join(&t.args))
            }
            Type::Binary(t) => {
                let lhs = self.visit(&t.lhs);
                let rhs = self.visit(&t.rhs);
                format!("{lhs} {} {rhs}", op(t.op))
            }
            Type::Function(t) => {
                let param = self.visit(&t.param);
                let ret = self.visit(&t.ret);
                format!("{param} -> {ret}")
            }
            Type::Inference(t) => format!("[[{}]]", self.visit(&t.expr)),
        }
    }

    fn visit_decl(&mut self, decl: &Decl) -> String {
        match decl {
            Decl::Identifier(d) => {
                let annotation = self.annotation(&d.ty);
                format!("{}{}{annotation}", dollar(d.constant), d.name)
            }
            Decl::Tuple(d) => {
                let elements = self.join(&d.elements);
                let annotation = self.annotation(&d.ty);
                format!("{}({elements}){annotation}", dollar(d.constant))
            }
            Decl::Generic(d) => format!("[{}]", self.join(&d.params)),
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Block(s) => self.block(&s.statements),
            Stmt::Return(s) if s.value.is_empty() => "return".to_string(),
            Stmt::Return(s) => format!("return {}", self.visit(&s.value)),
            Stmt::Yield(s) if s.value.is_empty() => "yield".to_string(),
            Stmt::Yield(s) => format!("yield {}", self.visit(&s.value)),
            Stmt::Defer(s) => format!("defer {}", self.visit(&s.body)),
            Stmt::Preface(s) => format!("preface {}", self.visit(&s.body)),
            Stmt::Loop(s) => {
                let mut out = String::from("loop ");
                if !s.binding.is_empty() {
                    out.push_str(&self.visit(&s.binding));
                    out.push_str(" in ");
                }
                if !s.source.is_empty() {
                    out.push_str(&self.visit(&s.source));
                    out.push(' ');
                }
                out.push_str(&self.visit(&s.body));
                out
            }
            Stmt::Match(s) => {
                let subject = self.visit(&s.subject);
                format!("match {subject} {}", self.block(&s.arms))
            }
            Stmt::Assign(s) => {
                let target = self.visit(&s.target);
                let value = self.visit(&s.value);
                format!("{target} {} {value}", op(s.op))
            }
            Stmt::Conditional(s) => {
                let condition = self.visit(&s.condition);
                let body = self.visit(&s.body);
                format!("{condition} => {body}")
            }
            Stmt::Declaration(s) => self.visit(&s.decl),
            Stmt::Expression(s) => self.visit(&s.expr),
        }
    }

    fn visit_sentinel(&mut self, _node: &Node) -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_decl, parse_expr, parse_stmt, Snippet};
    use pretty_assertions::assert_eq;

    fn reprint_expr(source: &str) -> String {
        let Snippet { node, errors, .. } = parse_expr(source);
        assert!(errors.is_empty(), "{source}: {errors:?}");
        print(&node)
    }

    #[test]
    fn test_literals_keep_their_base() {
        assert_eq!(reprint_expr("0x1F"), "0x1f");
        assert_eq!(reprint_expr("0b101"), "0b101");
        assert_eq!(reprint_expr("017"), "017");
        assert_eq!(reprint_expr("0"), "0");
        assert_eq!(reprint_expr("3.0"), "3.0");
        assert_eq!(reprint_expr("00.0314"), "0.0314");
    }

    #[test]
    fn test_float_formatting() {
        assert_eq!(format_float(2.0), "2.0");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(1e21), "1000000000000000000000.0");
    }

    #[test]
    fn test_unrepresentable_float_prints_as_zero() {
        let source = format!("{}.5", "9".repeat(400));
        let snippet = parse_expr(&source);
        assert!(snippet.errors.is_empty());
        assert_eq!(snippet.scan_errors.len(), 1);
        assert_eq!(print(&snippet.node), "0.0");
    }

    #[test]
    fn test_dollar_marks_non_constant_names() {
        assert_eq!(print(&parse_decl("$x: $Point").node), "$x: $Point");
        assert_eq!(print(&parse_decl("x: Point").node), "x: Point");
        assert_eq!(print(&parse_decl("$(a, $b)").node), "$(a, $b)");
    }

    #[test]
    fn test_strings_are_escaped() {
        assert_eq!(
            reprint_expr(r#""a\"b\{c\}\n{x + 1}""#),
            r#""a\"b\{c\}\n{x + 1}""#
        );
        assert_eq!(reprint_expr(r#""{x}""#), r#""{x}""#);
    }

    #[test]
    fn test_expressions() {
        assert_eq!(reprint_expr("-x+y*z"), "-x + y * z");
        assert_eq!(reprint_expr("f( a,[1 ,2] )[i]"), "f(a, [1, 2])[i]");
        assert_eq!(reprint_expr("{a:1,b:(2)}"), "{a: 1, b: (2)}");
        assert_eq!(
            reprint_expr("fn[T](x:T)->T{return x;}"),
            "fn [T] (x: T) -> T {\n    return x;\n}"
        );
    }

    #[test]
    fn test_nested_blocks_indent() {
        let node = parse_stmt("loop x in xs { match x { 0 => { f(); } } }").node;
        assert_eq!(
            print(&node),
            "loop x in xs {\n    match x {\n        0 => {\n            f();\n        };\n    };\n}"
        );
    }

    #[test]
    fn test_translation_unit() {
        let result = parse("module a.b; import c; import d = e.f; export x: Int = 1; y = \"s\";");
        assert!(result.is_clean());
        assert_eq!(
            print(&result.unit),
            "module a.b;\nimport c;\nimport d = e.f;\n\nexport x: Int = 1;\n\ny = \"s\";\n"
        );
    }
}
