//! Lexemes of the Tern language
//!
//! A [`Lexeme`] is the class of a token. The token itself carries the text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every token class the scanner can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Lexeme {
    // =========================================
    // Delimiters
    // =========================================
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    Dot,
    /// `$` - non-constant marker
    Dollar,
    /// `=>`
    FatArrow,
    /// `->`
    Arrow,

    // =========================================
    // Assignment operators
    // =========================================
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    PowAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    ShlAssign,
    ShrAssign,

    // =========================================
    // Operators
    // =========================================
    LogicalOr,
    LogicalAnd,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Pipe,
    Caret,
    Ampersand,
    ShiftLeft,
    ShiftRight,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,
    Bang,
    Tilde,

    // =========================================
    // Keywords
    // =========================================
    Module,
    Import,
    Export,
    Fn,
    Return,
    Yield,
    Defer,
    Preface,
    Loop,
    In,
    Match,
    Try,
    True,
    False,

    // =========================================
    // Names
    // =========================================
    /// Lowercase-initial name that is not a keyword
    Identifier,
    /// Built-in type name such as `Int32` or `Str`
    FundamentalType,
    /// Any other uppercase-initial name
    UserDefinedType,
    /// `_`
    Anonymous,

    // =========================================
    // Literals
    // =========================================
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
    Float,
    /// Decoded text between placeholders of a string literal
    StringFragment,
    /// Raw source of a `{...}` placeholder
    StringPlaceholder,

    // =========================================
    // Sentinels
    // =========================================
    Empty,
    Invalid,
}

/// Keyword spellings
const KEYWORDS: &[(&str, Lexeme)] = &[
    ("module", Lexeme::Module),
    ("import", Lexeme::Import),
    ("export", Lexeme::Export),
    ("fn", Lexeme::Fn),
    ("return", Lexeme::Return),
    ("yield", Lexeme::Yield),
    ("defer", Lexeme::Defer),
    ("preface", Lexeme::Preface),
    ("loop", Lexeme::Loop),
    ("in", Lexeme::In),
    ("match", Lexeme::Match),
    ("try", Lexeme::Try),
    ("true", Lexeme::True),
    ("false", Lexeme::False),
];

/// Built-in type names
const FUNDAMENTAL_TYPES: &[&str] = &[
    "Int", "Int8", "Int16", "Int32", "Int64", "UInt", "UInt8", "UInt16", "UInt32", "UInt64",
    "Float", "Float32", "Float64", "Bool", "Char", "Str", "Void",
];

impl Lexeme {
    /// Converts a lowercase word to a keyword, if it is one
    pub fn keyword(word: &str) -> Option<Lexeme> {
        KEYWORDS
            .iter()
            .find(|(spelling, _)| *spelling == word)
            .map(|(_, lexeme)| *lexeme)
    }

    /// Classifies a complete ASCII word by its first character
    pub fn classify_word(word: &str) -> Lexeme {
        match word.chars().next() {
            Some('_') if word.len() == 1 => Lexeme::Anonymous,
            Some(c) if c.is_ascii_uppercase() => {
                if FUNDAMENTAL_TYPES.contains(&word) {
                    Lexeme::FundamentalType
                } else {
                    Lexeme::UserDefinedType
                }
            }
            Some(_) => Lexeme::keyword(word).unwrap_or(Lexeme::Identifier),
            None => Lexeme::Empty,
        }
    }

    pub fn is_keyword(&self) -> bool {
        KEYWORDS.iter().any(|(_, lexeme)| lexeme == self)
    }

    /// Names that can start a type
    pub fn is_type_name(&self) -> bool {
        matches!(self, Lexeme::FundamentalType | Lexeme::UserDefinedType)
    }

    /// Radix of an integer literal
    pub fn radix(&self) -> Option<u32> {
        match self {
            Lexeme::Binary => Some(2),
            Lexeme::Octal => Some(8),
            Lexeme::Decimal => Some(10),
            Lexeme::Hexadecimal => Some(16),
            _ => None,
        }
    }

    /// Fixed spelling of punctuation, operators and keywords
    pub fn symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            Lexeme::LParen => "(",
            Lexeme::RParen => ")",
            Lexeme::LBracket => "[",
            Lexeme::RBracket => "]",
            Lexeme::LBrace => "{",
            Lexeme::RBrace => "}",
            Lexeme::Comma => ",",
            Lexeme::Semicolon => ";",
            Lexeme::Colon => ":",
            Lexeme::Dot => ".",
            Lexeme::Dollar => "$",
            Lexeme::FatArrow => "=>",
            Lexeme::Arrow => "->",
            Lexeme::Assign => "=",
            Lexeme::AddAssign => "+=",
            Lexeme::SubAssign => "-=",
            Lexeme::MulAssign => "*=",
            Lexeme::DivAssign => "/=",
            Lexeme::ModAssign => "%=",
            Lexeme::PowAssign => "**=",
            Lexeme::AndAssign => "&=",
            Lexeme::OrAssign => "|=",
            Lexeme::XorAssign => "^=",
            Lexeme::ShlAssign => "<<=",
            Lexeme::ShrAssign => ">>=",
            Lexeme::LogicalOr => "||",
            Lexeme::LogicalAnd => "&&",
            Lexeme::Equal => "==",
            Lexeme::NotEqual => "!=",
            Lexeme::Less => "<",
            Lexeme::LessEqual => "<=",
            Lexeme::Greater => ">",
            Lexeme::GreaterEqual => ">=",
            Lexeme::Pipe => "|",
            Lexeme::Caret => "^",
            Lexeme::Ampersand => "&",
            Lexeme::ShiftLeft => "<<",
            Lexeme::ShiftRight => ">>",
            Lexeme::Plus => "+",
            Lexeme::Minus => "-",
            Lexeme::Star => "*",
            Lexeme::Slash => "/",
            Lexeme::Percent => "%",
            Lexeme::StarStar => "**",
            Lexeme::Bang => "!",
            Lexeme::Tilde => "~",
            Lexeme::Anonymous => "_",
            keyword if keyword.is_keyword() => {
                return KEYWORDS
                    .iter()
                    .find(|(_, lexeme)| lexeme == keyword)
                    .map(|(spelling, _)| *spelling)
            }
            _ => return None,
        };
        Some(symbol)
    }

    /// All lexemes spelled with operator characters, for the symbol graph
    pub fn operators() -> impl Iterator<Item = (&'static str, Lexeme)> {
        const OPERATORS: &[Lexeme] = &[
            Lexeme::LParen,
            Lexeme::RParen,
            Lexeme::LBracket,
            Lexeme::RBracket,
            Lexeme::LBrace,
            Lexeme::RBrace,
            Lexeme::Comma,
            Lexeme::Semicolon,
            Lexeme::Colon,
            Lexeme::Dot,
            Lexeme::Dollar,
            Lexeme::FatArrow,
            Lexeme::Arrow,
            Lexeme::Assign,
            Lexeme::AddAssign,
            Lexeme::SubAssign,
            Lexeme::MulAssign,
            Lexeme::DivAssign,
            Lexeme::ModAssign,
            Lexeme::PowAssign,
            Lexeme::AndAssign,
            Lexeme::OrAssign,
            Lexeme::XorAssign,
            Lexeme::ShlAssign,
            Lexeme::ShrAssign,
            Lexeme::LogicalOr,
            Lexeme::LogicalAnd,
            Lexeme::Equal,
            Lexeme::NotEqual,
            Lexeme::Less,
            Lexeme::LessEqual,
            Lexeme::Greater,
            Lexeme::GreaterEqual,
            Lexeme::Pipe,
            Lexeme::Caret,
            Lexeme::Ampersand,
            Lexeme::ShiftLeft,
            Lexeme::ShiftRight,
            Lexeme::Plus,
            Lexeme::Minus,
            Lexeme::Star,
            Lexeme::Slash,
            Lexeme::Percent,
            Lexeme::StarStar,
            Lexeme::Bang,
            Lexeme::Tilde,
        ];
        OPERATORS
            .iter()
            .filter_map(|lexeme| lexeme.symbol().map(|symbol| (symbol, *lexeme)))
    }
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(symbol) = self.symbol() {
            return write!(f, "`{}`", symbol);
        }
        let name = match self {
            Lexeme::Identifier => "identifier",
            Lexeme::FundamentalType => "fundamental type",
            Lexeme::UserDefinedType => "type name",
            Lexeme::Binary => "binary literal",
            Lexeme::Octal => "octal literal",
            Lexeme::Decimal => "decimal literal",
            Lexeme::Hexadecimal => "hexadecimal literal",
            Lexeme::Float => "float literal",
            Lexeme::StringFragment => "string fragment",
            Lexeme::StringPlaceholder => "string placeholder",
            Lexeme::Empty => "nothing",
            _ => "invalid token",
        };
        f.write_str(name)
    }
}
