use super::*;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;
use tern_parser::ast::{expr, global, stmt};
use tern_parser::{
    parse_expr, parse_file, parse_stmt, parse_type, Node, Snippet, TranslationUnit,
};

fn definitions(result: &ParseResult) -> &[Node] {
    &result.unit.cast::<TranslationUnit>().definitions
}

fn sexpr_expr(source: &str) -> String {
    let Snippet { node, errors, .. } = parse_expr(source);
    assert!(errors.is_empty(), "{source}: {errors:?}");
    shape(&node)
}

// =========================================
// Sample program
// =========================================

#[test]
fn test_sample_is_clean() {
    let result = parse_clean(SAMPLE);
    let unit = result.unit.cast::<TranslationUnit>();

    assert_eq!(shape(&unit.module), "(module demo.shapes)");
    assert_eq!(
        shape(&unit.imports),
        "(imports (import io) (import std.format as fmt))"
    );
    assert_eq!(unit.definitions.len(), 7);
}

#[test]
fn test_sample_definitions() {
    let result = parse_clean(SAMPLE);
    let shapes: Vec<String> = definitions(&result).iter().map(shape).collect();

    assert_eq!(
        shapes[..6].to_vec(),
        [
            "(def (decl $origin Point) (record (field x 0) (field y 0)))",
            "(def (decl copy (infer origin)) origin)",
            "(def (dtuple $ (decl left ()) (decl right ()) : Pair) (call split origin))",
            "(def (decl handler (-> (ttuple Int Str) (| Bool Void))) check)",
            "(def (decl identity ()) (fn (generics T) (dtuple (decl x T)) T (block (return x))))",
            "(def (decl area ()) (fn () (dtuple (decl w Float) (decl h Float)) Float (block (return (* w h)))))",
        ]
    );
    assert!(shapes[6].starts_with("(export (decl main ()) (fn () (dtuple) Int (block"));
}

#[test]
fn test_sample_main_body() {
    let result = parse_clean(SAMPLE);
    let main = definitions(&result)[6].cast::<global::Definition>();
    let body = main.value.cast::<expr::Function>().body.cast::<stmt::Block>();

    assert_eq!(body.statements.len(), 13);
    assert_eq!(
        shape(&body.statements[3]),
        "(loop (decl i ()) (call range 0 10) (block (+= total (** i 2))))"
    );
    assert_eq!(
        shape(&body.statements[6]),
        "(match (% total 3) (=> 0 (call io.print (str \"fizz\"))) (=> _ (block (yield total))))"
    );
    assert_eq!(
        shape(&body.statements[7]),
        "(= (decl values (tarray Int 3 _)) (array (array 1 2) (array 3 4) (array 5 6)))"
    );
    assert_eq!(
        shape(&body.statements[8]),
        "(= (decl table (generic Map Str (tarray Int))) (call make))"
    );
    assert_eq!(
        shape(&body.statements[10]),
        "(= (decl ok Bool) (&& (try (call check (index values 0 1))) (! done)))"
    );
    assert_eq!(shape(&body.statements[12]), "(return (| 31 (^ 5 15)))");
}

#[test]
fn test_sample_round_trips() {
    assert_round_trip(SAMPLE);
}

#[test]
fn test_reformatting_is_stable() {
    assert_round_trip("module m;import a;x=fn(y:Int)->Int{loop{yield;}return y;};");
    assert_round_trip("module m; t: [[f(1)]] = \"{a}{b}\\{c\\}\";");
}

// =========================================
// Expressions
// =========================================

#[test]
fn test_precedence_examples() {
    assert_eq!(sexpr_expr("1 + 2 * 3"), "(+ 1 (* 2 3))");
    assert_eq!(sexpr_expr("a == b || c < d && e"), "(|| (== a b) (&& (< c d) e))");
    assert_eq!(sexpr_expr("2 ** 3 ** 2"), "(** 2 (** 3 2))");
    assert_eq!(sexpr_expr("x << 1 + y"), "(<< x (+ 1 y))");
    assert_eq!(sexpr_expr("!a && ~b"), "(&& (! a) (~ b))");
}

#[test]
fn test_numeric_bases() {
    assert_eq!(
        sexpr_expr("[0x1f, 0b101, 017, 0, 42, 00.0314]"),
        "(array 31 5 15 0 42 0.0314)"
    );
}

#[test]
fn test_interpolated_string() {
    let Snippet { node, errors, .. } = parse_expr("\"Hello, {name}! {a + 1} and {f(x)}.\"");
    assert!(errors.is_empty());
    assert_eq!(
        shape(&node),
        "(str \"Hello, \" name \"! \" (+ a 1) \" and \" (call f x) \".\")"
    );

    let string = node.cast::<expr::String>();
    let fragments = string
        .parts
        .iter()
        .filter(|part| part.is::<expr::StringFragment>())
        .count();
    assert_eq!(fragments, 4);
    assert_eq!(string.parts.len() - fragments, 3);
}

// =========================================
// Backtracking
// =========================================

#[test]
fn test_abandoned_attempts_leave_no_errors() {
    for source in [
        "(a, b + 1) = c",
        "loop f(x) {}",
        "loop (k, v) in pairs {}",
        "x: Int[n + 1] = xs",
        "t: Map[Str, Int] = m",
        "m: Int[(a + b) * 2] = xs",
    ] {
        let Snippet { errors, .. } = parse_stmt(source);
        assert!(errors.is_empty(), "{source}: {errors:?}");
    }

    let Snippet { node, errors, .. } = parse_type("Int[n + 1]");
    assert!(errors.is_empty());
    assert_eq!(shape(&node), "(tarray Int (+ n 1))");
}

#[test]
fn test_snippets_report_scan_errors() {
    for source in ["\"abc", "0x", "\"{ 1 @ 2 }\"", "7up"] {
        let snippet = parse_expr(source);
        assert!(!snippet.is_clean(), "{source}");
        assert_eq!(snippet.scan_errors.len(), 1, "{source}");
    }
    assert!(parse_expr("\"{x}\" + 0x1f").is_clean());
}

#[test]
fn test_failed_definition_is_reported_once() {
    let result = parse("module m; export ) ;");
    assert_eq!(
        reasons(&result.errors),
        [(ErrorContext::TranslationUnit, ErrorReason::MissingDecl)]
    );
    assert!(definitions(&result).is_empty());
}

// =========================================
// Files
// =========================================

#[test]
fn test_parse_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();

    let result = parse_file(file.path()).unwrap();
    assert!(result.is_clean());
    assert_eq!(definitions(&result).len(), 7);
}

#[test]
fn test_parse_missing_file() {
    let error = parse_file("/nonexistent/sample.tn").unwrap_err();
    assert_eq!(error.kind(), std::io::ErrorKind::NotFound);
}
