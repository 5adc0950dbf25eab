//! Parser entry points
//!
//! [`parse`] reads a whole translation unit. The `parse_*` functions parse
//! a single production from a snippet, which is what the tests and the
//! tooling around the parser mostly need.

use crate::ast::Node;
use crate::context::{Context, ParseState};
use crate::grammar::{
    handle_decl, handle_expr, handle_stmt, handle_translation_unit, handle_type,
};
use std::path::Path;
use std::{fs, io};
use tern_error::{Diagnostics, ErrorContext, ErrorReason, ScanError, SyntaxError};
use tern_lexer::scan;
use tracing::debug;

/// Everything produced by parsing one file
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Always a `TranslationUnit`
    pub unit: Node,
    /// Syntax errors in emission order
    pub errors: Vec<SyntaxError>,
    /// Scan errors, including those found inside string placeholders
    pub scan_errors: Vec<ScanError>,
}

impl ParseResult {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.scan_errors.is_empty()
    }

    /// Converts every error into a diagnostic for the file `file_id`
    pub fn diagnostics(&self, file_id: u32) -> Diagnostics {
        Diagnostics::collect(&self.scan_errors, &self.errors, file_id)
    }
}

/// Parses a complete translation unit
pub fn parse(source: &str) -> ParseResult {
    parse_source(source, None)
}

/// Reads and parses a source file
pub fn parse_file(path: impl AsRef<Path>) -> io::Result<ParseResult> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    debug!(file = %path.display(), bytes = source.len(), "read source file");
    Ok(parse_source(&source, Some(path)))
}

fn parse_source(source: &str, file: Option<&Path>) -> ParseResult {
    let scanned = scan(source);

    let mut state = ParseState::new(&scanned.tokens, scanned.end);
    if let Some(file) = file {
        state = state.with_file(file);
    }
    let unit = {
        let mut root = Context::root(&mut state, ErrorContext::TranslationUnit);
        handle_translation_unit(&mut root)
    };
    let (errors, nested_scan) = state.finish();

    let mut scan_errors = scanned.errors;
    scan_errors.extend(nested_scan);

    debug!(
        tokens = scanned.tokens.len(),
        syntax_errors = errors.len(),
        scan_errors = scan_errors.len(),
        "parsed translation unit"
    );
    ParseResult {
        unit,
        errors,
        scan_errors,
    }
}

/// A single production parsed from a snippet
#[derive(Debug, Clone)]
pub struct Snippet {
    pub node: Node,
    pub errors: Vec<SyntaxError>,
    /// Scan errors, including those found inside string placeholders
    pub scan_errors: Vec<ScanError>,
}

impl Snippet {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.scan_errors.is_empty()
    }
}

type Production = fn(&mut Context<'_, '_>) -> Option<Node>;

/// Parses `source` as exactly one `production`. A missing production is
/// reported as `missing`, and leftover tokens as unexpected.
fn parse_production(
    source: &str,
    tag: ErrorContext,
    production: Production,
    missing: ErrorReason,
) -> Snippet {
    let scanned = scan(source);
    let mut state = ParseState::new(&scanned.tokens, scanned.end);
    let node = {
        let mut root = Context::root(&mut state, tag);
        let node = production(&mut root);
        let node = root.emit_if_node_missing(node, missing);
        if !root.done() {
            root.emit(ErrorReason::UnexpectedToken);
        }
        node
    };
    let (errors, nested_scan) = state.finish();

    let mut scan_errors = scanned.errors;
    scan_errors.extend(nested_scan);
    Snippet {
        node,
        errors,
        scan_errors,
    }
}

pub fn parse_expr(source: &str) -> Snippet {
    parse_production(source, ErrorContext::Expr, handle_expr, ErrorReason::MissingExpr)
}

pub fn parse_type(source: &str) -> Snippet {
    parse_production(
        source,
        ErrorContext::Type,
        handle_type,
        ErrorReason::MissingTypeExpr,
    )
}

pub fn parse_decl(source: &str) -> Snippet {
    parse_production(source, ErrorContext::IdDecl, handle_decl, ErrorReason::MissingDecl)
}

pub fn parse_stmt(source: &str) -> Snippet {
    parse_production(
        source,
        ErrorContext::Statement,
        handle_stmt,
        ErrorReason::MissingStmt,
    )
}
