//! Parser errors
//!
//! A [`SyntaxError`] records which grammar production was active
//! ([`ErrorContext`]), what it expected ([`ErrorReason`]) and where. The
//! human-readable message is looked up on both axes at render time.

use crate::diagnostic::{Diagnostic, ErrorCode};
use crate::span::{Location, Span};
use std::fmt;
use thiserror::Error;

/// The grammar production that reported an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorContext {
    TranslationUnit,
    ModuleDecl,
    Import,
    Definition,
    Expr,
    PrefixExpr,
    BinaryExpr,
    Identifier,
    FnApp,
    Subscript,
    Tuple,
    Array,
    Record,
    Field,
    String,
    Try,
    Function,
    Type,
    TypeInference,
    TupleType,
    ArrayType,
    GenericType,
    TypeBinary,
    IdDecl,
    TupleDecl,
    GenericDecl,
    Statement,
    Block,
    Return,
    Yield,
    Defer,
    Preface,
    Loop,
    Match,
    Assign,
    Conditional,
}

impl ErrorContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorContext::TranslationUnit => "translation unit",
            ErrorContext::ModuleDecl => "module declaration",
            ErrorContext::Import => "import",
            ErrorContext::Definition => "definition",
            ErrorContext::Expr => "expression",
            ErrorContext::PrefixExpr => "prefix expression",
            ErrorContext::BinaryExpr => "binary expression",
            ErrorContext::Identifier => "identifier",
            ErrorContext::FnApp => "function application",
            ErrorContext::Subscript => "subscript",
            ErrorContext::Tuple => "tuple",
            ErrorContext::Array => "array",
            ErrorContext::Record => "record",
            ErrorContext::Field => "record field",
            ErrorContext::String => "string",
            ErrorContext::Try => "try expression",
            ErrorContext::Function => "function",
            ErrorContext::Type => "type",
            ErrorContext::TypeInference => "type inference",
            ErrorContext::TupleType => "tuple type",
            ErrorContext::ArrayType => "array type",
            ErrorContext::GenericType => "generic type",
            ErrorContext::TypeBinary => "type operator",
            ErrorContext::IdDecl => "declaration",
            ErrorContext::TupleDecl => "tuple declaration",
            ErrorContext::GenericDecl => "generic declaration",
            ErrorContext::Statement => "statement",
            ErrorContext::Block => "block",
            ErrorContext::Return => "return statement",
            ErrorContext::Yield => "yield statement",
            ErrorContext::Defer => "defer statement",
            ErrorContext::Preface => "preface statement",
            ErrorContext::Loop => "loop",
            ErrorContext::Match => "match",
            ErrorContext::Assign => "assignment",
            ErrorContext::Conditional => "conditional",
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the reporting production expected but did not find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorReason {
    MissingExpr,
    MissingTypeExpr,
    MissingDecl,
    MissingStmt,
    MissingBlock,
    MissingIdentifier,
    MissingSeparator,
    MissingClosing,
    MissingSemicolon,
    MissingAssignment,
    MissingConditional,
    UnexpectedToken,
    RestrictedAction,
}

impl ErrorReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorReason::MissingExpr => "missing expression",
            ErrorReason::MissingTypeExpr => "missing type",
            ErrorReason::MissingDecl => "missing declaration",
            ErrorReason::MissingStmt => "missing statement",
            ErrorReason::MissingBlock => "missing block",
            ErrorReason::MissingIdentifier => "missing identifier",
            ErrorReason::MissingSeparator => "missing separator",
            ErrorReason::MissingClosing => "missing closing delimiter",
            ErrorReason::MissingSemicolon => "missing `;`",
            ErrorReason::MissingAssignment => "missing `=`",
            ErrorReason::MissingConditional => "missing conditional",
            ErrorReason::UnexpectedToken => "unexpected token",
            ErrorReason::RestrictedAction => "restricted action",
        }
    }

    fn code(&self) -> ErrorCode {
        match self {
            ErrorReason::MissingExpr => ErrorCode::EXPECTED_EXPRESSION,
            ErrorReason::MissingTypeExpr => ErrorCode::EXPECTED_TYPE,
            ErrorReason::MissingDecl => ErrorCode::EXPECTED_DECLARATION,
            ErrorReason::MissingStmt | ErrorReason::MissingBlock => ErrorCode::EXPECTED_STATEMENT,
            ErrorReason::MissingIdentifier
            | ErrorReason::MissingSeparator
            | ErrorReason::MissingClosing
            | ErrorReason::MissingSemicolon
            | ErrorReason::MissingAssignment
            | ErrorReason::MissingConditional => ErrorCode::EXPECTED_TOKEN,
            ErrorReason::UnexpectedToken => ErrorCode::UNEXPECTED_TOKEN,
            ErrorReason::RestrictedAction => ErrorCode::RESTRICTED,
        }
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message template for a `(context, reason)` pair, if one is defined.
fn template(context: ErrorContext, reason: ErrorReason) -> Option<&'static str> {
    use ErrorContext as C;
    use ErrorReason as R;

    let message = match (context, reason) {
        (C::TranslationUnit, R::MissingDecl) => "expected a module declaration or a definition",
        (C::ModuleDecl, R::MissingSemicolon) => "expected `;` after the module declaration",
        (C::Import, R::MissingIdentifier) => "expected a module path after `import`",
        (C::Import, R::MissingSemicolon) => "expected `;` after the import",
        (C::Definition, R::MissingAssignment) => "expected `=` after the defined name",
        (C::Definition, R::MissingExpr) => "expected a value for the definition",
        (C::Definition, R::MissingSemicolon) => "expected `;` after the definition",
        (C::PrefixExpr, R::MissingExpr) => "expected an operand after the prefix operator",
        (C::BinaryExpr, R::MissingExpr) => "expected a right-hand operand",
        (C::Identifier, R::MissingIdentifier) => "expected a name after `.`",
        (C::FnApp, R::MissingExpr) => "expected an argument",
        (C::FnApp, R::MissingClosing) => "expected `)` to close the argument list",
        (C::Subscript, R::MissingExpr) => "expected an index expression",
        (C::Subscript, R::MissingClosing) => "expected `]` to close the subscript",
        (C::Tuple, R::MissingExpr) => "expected a tuple element",
        (C::Tuple, R::MissingClosing) => "expected `)` to close the tuple",
        (C::Array, R::MissingExpr) => "expected an array element",
        (C::Array, R::MissingClosing) => "expected `]` to close the array",
        (C::Record, R::MissingExpr) => "expected a `name: value` field",
        (C::Record, R::MissingClosing) => "expected `}` to close the record",
        (C::Field, R::MissingSeparator) => "expected `:` after the field name",
        (C::Field, R::MissingExpr) => "expected a value for the field",
        (C::String, R::RestrictedAction) => {
            "string interpolation cannot be nested inside a placeholder"
        }
        (C::String, R::MissingExpr) => "expected an expression inside the placeholder",
        (C::String, R::UnexpectedToken) => "unexpected input after the placeholder expression",
        (C::Try, R::MissingExpr) => "expected an expression after `try`",
        (C::Function, R::MissingDecl) => "expected a parameter list after `fn`",
        (C::Function, R::MissingTypeExpr) => "expected a return type after `->`",
        (C::Function, R::MissingBlock) => "expected a function body",
        (C::TypeInference, R::MissingExpr) => "expected an expression inside `[[ ]]`",
        (C::TypeInference, R::MissingClosing) => "expected `]]` to close the type inference",
        (C::TupleType, R::MissingTypeExpr) => "expected an element type",
        (C::TupleType, R::MissingClosing) => "expected `)` to close the tuple type",
        (C::ArrayType, R::MissingExpr) => "expected an array dimension",
        (C::ArrayType, R::MissingClosing) => "expected `]` to close the array dimensions",
        (C::GenericType, R::MissingTypeExpr) => "expected a generic argument",
        (C::GenericType, R::MissingClosing) => "expected `]` to close the generic arguments",
        (C::TypeBinary, R::MissingTypeExpr) => "expected a right-hand type",
        (C::IdDecl, R::MissingTypeExpr) => "expected a type after `:`",
        (C::TupleDecl, R::MissingDecl) => "expected a declaration",
        (C::TupleDecl, R::MissingTypeExpr) => "expected a type after `:`",
        (C::TupleDecl, R::MissingClosing) => "expected `)` to close the tuple declaration",
        (C::GenericDecl, R::MissingTypeExpr) => "expected a type parameter name",
        (C::GenericDecl, R::MissingClosing) => "expected `]` to close the type parameters",
        (C::Block, R::MissingStmt) => "expected a statement",
        (C::Block, R::MissingSemicolon) => "expected `;` after the statement",
        (C::Block, R::MissingClosing) => "expected `}` to close the block",
        (C::Yield, R::MissingExpr) => "expected a value after `yield`",
        (C::Defer, R::MissingStmt) => "expected a statement after `defer`",
        (C::Preface, R::MissingStmt) => "expected a statement after `preface`",
        (C::Loop, R::MissingExpr) => "expected an iterable after `in`",
        (C::Loop, R::MissingBlock) => "expected a loop body",
        (C::Match, R::MissingExpr) => "expected a value to match on",
        (C::Match, R::MissingBlock) => "expected `{` to open the match arms",
        (C::Match, R::MissingConditional) => "match arms have the form `pattern => statement`",
        (C::Match, R::MissingSemicolon) => "expected `;` after the match arm",
        (C::Match, R::MissingClosing) => "expected `}` to close the match arms",
        (C::Assign, R::MissingExpr) => "expected a value after the assignment operator",
        (C::Conditional, R::MissingStmt) => "expected a statement after `=>`",
        (_, R::MissingSeparator) => "expected `,` between elements",
        _ => return None,
    };
    Some(message)
}

/// A parser diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{location}: {}", self.message())]
pub struct SyntaxError {
    pub context: ErrorContext,
    pub reason: ErrorReason,
    pub location: Location,
}

impl SyntaxError {
    pub fn new(context: ErrorContext, reason: ErrorReason, location: Location) -> Self {
        Self {
            context,
            reason,
            location,
        }
    }

    /// Renders the error for a human.
    ///
    /// Pairs without a dedicated template fall back to a generic message
    /// naming both axes.
    pub fn message(&self) -> String {
        match template(self.context, self.reason) {
            Some(message) => message.to_string(),
            None => format!("{} while parsing {}", self.reason, self.context),
        }
    }

    pub fn to_diagnostic(&self, file_id: u32) -> Diagnostic {
        Diagnostic::error(self.message())
            .with_code(self.reason.code())
            .with_label(Span::at(self.location, file_id), format!("in this {}", self.context))
    }
}
