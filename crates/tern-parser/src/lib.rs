//! tern-parser - Parser for the Tern language
//!
//! Turns the token buffer produced by `tern-lexer` into a [`Node`] tree.
//! The parser never gives up: productions that cannot be completed leave a
//! `RequiredButMissing` node behind and a [`SyntaxError`] explaining what
//! was expected, so one run reports every problem in a file.
//!
//! Productions that might not apply are tried inside a backtracking
//! [`Context`]; abandoning an attempt also drops every diagnostic it
//! produced.
//!
//! # Example
//!
//! ```rust
//! use tern_parser::{parse, shape, print};
//!
//! let result = parse("module demo; answer: Int = 6 * 7;");
//! assert!(result.is_clean());
//! assert_eq!(
//!     shape(&result.unit),
//!     "(unit (module demo) (imports) (def (decl answer Int) (* 6 7)))"
//! );
//! assert_eq!(print(&result.unit), "module demo;\n\nanswer: Int = 6 * 7;\n");
//! ```
//!
//! [`SyntaxError`]: tern_error::SyntaxError

pub mod ast;
pub mod context;
mod grammar;
pub mod location;
pub mod parser;
pub mod printer;
pub mod shape;
pub mod stream;
pub mod visitor;

pub use ast::{Node, TranslationUnit, Variant, Visibility};
pub use context::{Context, ParseState};
pub use parser::{
    parse, parse_decl, parse_expr, parse_file, parse_stmt, parse_type, ParseResult, Snippet,
};
pub use printer::print;
pub use shape::shape;
pub use visitor::{walk, Visitor};
