//! Scanner errors
//!
//! The scanner never stops at a malformed token: every defect is recorded as
//! a [`ScanError`] and scanning carries on to the end of the input.

use crate::diagnostic::{Diagnostic, ErrorCode};
use crate::span::{Location, Span};
use thiserror::Error;

/// The kind of lexical defect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unterminated block comment")]
    UnterminatedComment,

    #[error("numeric literal `{0}` has no digits after its base prefix")]
    EmptyNumericLiteral(String),

    #[error("invalid digit `{digit}` in base {base} literal")]
    InvalidDigit { digit: char, base: u32 },

    #[error("numeric literal `{0}` does not fit in 64 bits")]
    NumericOverflow(String),

    #[error("identifier `{0}` may not contain `_`")]
    IllegalIdentifier(String),

    #[error("unrecognized symbol `{0}`")]
    UnrecognizedSymbol(char),
}

impl ScanErrorKind {
    fn code(&self) -> ErrorCode {
        match self {
            ScanErrorKind::UnterminatedString => ErrorCode::UNTERMINATED_STRING,
            ScanErrorKind::UnterminatedComment => ErrorCode::UNTERMINATED_COMMENT,
            ScanErrorKind::EmptyNumericLiteral(_)
            | ScanErrorKind::InvalidDigit { .. }
            | ScanErrorKind::NumericOverflow(_) => ErrorCode::INVALID_NUMBER,
            ScanErrorKind::IllegalIdentifier(_) => ErrorCode::ILLEGAL_IDENTIFIER,
            ScanErrorKind::UnrecognizedSymbol(_) => ErrorCode::UNEXPECTED_CHAR,
        }
    }
}

/// A lexical error with the location of the offending token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {location}")]
pub struct ScanError {
    pub kind: ScanErrorKind,
    pub location: Location,
}

impl ScanError {
    pub fn new(kind: ScanErrorKind, location: Location) -> Self {
        Self { kind, location }
    }

    pub fn to_diagnostic(&self, file_id: u32) -> Diagnostic {
        Diagnostic::error(self.kind.to_string())
            .with_code(self.kind.code())
            .with_label(Span::at(self.location, file_id), "here")
    }
}
