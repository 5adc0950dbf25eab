//! tern-lexer - Scanner for the Tern language
//!
//! This crate converts Tern source code into a flat buffer of tokens.
//!
//! # Features
//!
//! - Integer literals in binary, octal, decimal and hexadecimal
//! - String interpolation: `"sum: {a + b}"` scans into alternating
//!   fragment and placeholder tokens
//! - Nesting block comments
//! - Greedy longest-match operators
//!
//! # Example
//!
//! ```rust
//! use tern_lexer::{scan, Lexeme};
//!
//! let result = scan("total: Int = 0x1F;");
//! assert!(result.errors.is_empty());
//!
//! for token in &result.tokens {
//!     println!("{:?} {:?}", token.lexeme, token.text);
//! }
//! assert_eq!(result.tokens[4].lexeme, Lexeme::Hexadecimal);
//! ```

pub mod lexeme;
pub mod lexer;
pub mod precedence;
pub mod symbols;
pub mod token;

pub use lexeme::Lexeme;
pub use lexer::{scan, ScanResult, Scanner};
pub use precedence::{Associativity, BindingPower};
pub use token::{Token, INVALID_TOKEN};
