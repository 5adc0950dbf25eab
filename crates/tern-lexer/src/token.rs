//! Tokens for the Tern language

use crate::lexeme::Lexeme;
use serde::{Deserialize, Serialize};
use std::fmt;
use tern_error::span::Location;

/// A token with its location in the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub lexeme: Lexeme,
    /// Raw source text. Decoded text for string fragments.
    pub text: String,
    /// Location of the first character
    pub location: Location,
}

/// Returned when peeking past the last token
pub static INVALID_TOKEN: Token = Token {
    lexeme: Lexeme::Invalid,
    text: String::new(),
    location: Location::START,
};

impl Token {
    pub fn new(lexeme: Lexeme, text: impl Into<String>, location: Location) -> Self {
        Self {
            lexeme,
            text: text.into(),
            location,
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.lexeme == Lexeme::Invalid
    }

    /// Value of an integer literal.
    ///
    /// A base prefix with no digits is zero. `None` means the text is not an
    /// integer literal or does not fit in 64 bits.
    pub fn integer_value(&self) -> Option<u64> {
        let radix = self.lexeme.radix()?;
        let digits = match self.lexeme {
            Lexeme::Binary | Lexeme::Hexadecimal => self.text.get(2..).unwrap_or(""),
            _ => self.text.as_str(),
        };
        if digits.is_empty() {
            return Some(0);
        }
        u64::from_str_radix(digits, radix).ok()
    }

    /// Value of a float literal. `None` when it does not parse or is too
    /// large for an `f64`.
    pub fn float_value(&self) -> Option<f64> {
        match self.lexeme {
            Lexeme::Float => self.text.parse::<f64>().ok().filter(|value| value.is_finite()),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lexeme {
            Lexeme::StringFragment => write!(f, "{:?} at {}", self.text, self.location),
            _ => write!(f, "{} at {}", self.lexeme, self.location),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(lexeme: Lexeme, text: &str) -> Token {
        Token::new(lexeme, text, Location::START)
    }

    #[test]
    fn test_integer_values() {
        assert_eq!(token(Lexeme::Hexadecimal, "0xff").integer_value(), Some(255));
        assert_eq!(token(Lexeme::Binary, "0b101").integer_value(), Some(5));
        assert_eq!(token(Lexeme::Octal, "017").integer_value(), Some(15));
        assert_eq!(token(Lexeme::Octal, "0").integer_value(), Some(0));
        assert_eq!(token(Lexeme::Hexadecimal, "0x").integer_value(), Some(0));
        assert_eq!(token(Lexeme::Decimal, "42").integer_value(), Some(42));
    }

    #[test]
    fn test_integer_overflow_has_no_value() {
        let big = token(Lexeme::Decimal, "18446744073709551616");
        assert_eq!(big.integer_value(), None);
        assert_eq!(token(Lexeme::Identifier, "x").integer_value(), None);
    }

    #[test]
    fn test_float_value_with_leading_zeros() {
        assert_eq!(token(Lexeme::Float, "00.0314").float_value(), Some(0.0314));
    }

    #[test]
    fn test_float_too_large_has_no_value() {
        let huge = token(Lexeme::Float, &format!("{}.5", "1".repeat(320)));
        assert_eq!(huge.float_value(), None);
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_string(&token(Lexeme::Identifier, "x")).unwrap();
        assert_eq!(
            json,
            r#"{"lexeme":"Identifier","text":"x","location":{"line":1,"column":1,"offset":0}}"#
        );
    }
}
