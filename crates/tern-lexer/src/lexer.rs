//! Scanner for the Tern language
//!
//! Converts source text into a flat token buffer. Malformed input never
//! stops the scanner: each defect is recorded as a [`ScanError`] and
//! scanning resumes after it.

use crate::lexeme::Lexeme;
use crate::symbols::SymbolGraph;
use crate::token::Token;
use tern_error::{
    scan::{ScanError, ScanErrorKind},
    span::Location,
};
use tracing::debug;

/// Output of a complete scan
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<ScanError>,
    /// Location just past the last character
    pub end: Location,
}

/// The Tern scanner
pub struct Scanner<'src> {
    /// Source code being analyzed
    source: &'src str,
    /// Byte index into `source`
    pos: usize,
    /// Absolute location of `pos`
    location: Location,
    tokens: Vec<Token>,
    errors: Vec<ScanError>,
}

impl<'src> Scanner<'src> {
    /// Creates a scanner for a whole file
    pub fn new(source: &'src str) -> Self {
        Self::with_origin(source, Location::START)
    }

    /// Creates a scanner for a substring whose first character sits at
    /// `origin` in the enclosing file.
    pub fn with_origin(source: &'src str, origin: Location) -> Self {
        Self {
            source,
            pos: 0,
            location: origin,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    /// Returns the current character without advancing
    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Returns the next character without advancing
    fn peek_next(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    /// Advances to the next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        self.location = self.location.advance(ch);
        Some(ch)
    }

    /// Advances while `pred` holds and returns the consumed text
    fn advance_while(&mut self, pred: impl Fn(char) -> bool) -> &'src str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
        &self.source[start..self.pos]
    }

    fn push(&mut self, lexeme: Lexeme, text: impl Into<String>, location: Location) {
        self.tokens.push(Token::new(lexeme, text, location));
    }

    fn error(&mut self, kind: ScanErrorKind, location: Location) {
        self.errors.push(ScanError::new(kind, location));
    }

    /// Tokenizes the entire input
    pub fn scan(mut self) -> ScanResult {
        while let Some(ch) = self.peek() {
            let start = self.location;
            match ch {
                c if c.is_whitespace() => {
                    self.advance();
                }
                '/' if self.peek_next() == Some('/') => self.skip_line_comment(),
                '/' if self.peek_next() == Some('*') => self.skip_block_comment(start),
                '"' => self.read_string(start),
                c if c.is_ascii_digit() => self.read_number(start),
                c if c.is_ascii_alphabetic() || c == '_' => self.read_word(start),
                c => self.read_symbol(c, start),
            }
        }

        debug!(
            tokens = self.tokens.len(),
            errors = self.errors.len(),
            "scanned source"
        );
        ScanResult {
            tokens: self.tokens,
            errors: self.errors,
            end: self.location,
        }
    }

    /// Skips `// ...` until end of line
    fn skip_line_comment(&mut self) {
        self.advance_while(|c| c != '\n');
    }

    /// Skips `/* ... */`, which may nest
    fn skip_block_comment(&mut self, start: Location) {
        self.advance();
        self.advance();
        let mut depth = 1usize;

        while depth > 0 {
            match (self.peek(), self.peek_next()) {
                (Some('/'), Some('*')) => {
                    self.advance();
                    self.advance();
                    depth += 1;
                }
                (Some('*'), Some('/')) => {
                    self.advance();
                    self.advance();
                    depth -= 1;
                }
                (Some(_), _) => {
                    self.advance();
                }
                (None, _) => {
                    self.error(ScanErrorKind::UnterminatedComment, start);
                    return;
                }
            }
        }
    }

    /// Reads an identifier, keyword or type name
    fn read_word(&mut self, start: Location) {
        let word = self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');

        if word != "_" && word.contains('_') {
            self.error(ScanErrorKind::IllegalIdentifier(word.to_string()), start);
            self.push(Lexeme::Invalid, word, start);
            return;
        }
        self.push(Lexeme::classify_word(word), word, start);
    }

    /// Reads an integer or float literal
    fn read_number(&mut self, start: Location) {
        let begin = self.pos;

        let lexeme = if self.peek() == Some('0') {
            self.advance();
            match self.peek() {
                Some('x' | 'X') => {
                    self.advance();
                    self.advance_while(|c| c.is_ascii_hexdigit());
                    Lexeme::Hexadecimal
                }
                Some('b' | 'B') => {
                    self.advance();
                    self.advance_while(|c| c.is_ascii_digit());
                    Lexeme::Binary
                }
                _ => {
                    self.advance_while(|c| c.is_ascii_digit());
                    if self.read_fraction() {
                        Lexeme::Float
                    } else {
                        Lexeme::Octal
                    }
                }
            }
        } else {
            self.advance_while(|c| c.is_ascii_digit());
            if self.read_fraction() {
                Lexeme::Float
            } else {
                Lexeme::Decimal
            }
        };

        // Letters or digits glued to the literal belong to it
        self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');

        let text = &self.source[begin..self.pos];
        let token = Token::new(lexeme, text, start);
        if let Some(kind) = Self::check_number(&token) {
            self.error(kind, start);
        }
        self.tokens.push(token);
    }

    /// Consumes `.digits` if present
    fn read_fraction(&mut self) -> bool {
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
            return true;
        }
        false
    }

    fn check_number(token: &Token) -> Option<ScanErrorKind> {
        if token.lexeme == Lexeme::Float {
            if let Some(digit) = token.text.chars().find(|c| !c.is_ascii_digit() && *c != '.') {
                return Some(ScanErrorKind::InvalidDigit { digit, base: 10 });
            }
            return match token.float_value() {
                Some(_) => None,
                None => Some(ScanErrorKind::NumericOverflow(token.text.clone())),
            };
        }

        let radix = token.lexeme.radix()?;
        let digits = match token.lexeme {
            Lexeme::Binary | Lexeme::Hexadecimal => &token.text[2..],
            _ => token.text.as_str(),
        };

        if digits.is_empty() {
            return Some(ScanErrorKind::EmptyNumericLiteral(token.text.clone()));
        }
        if let Some(digit) = digits.chars().find(|c| !c.is_digit(radix)) {
            return Some(ScanErrorKind::InvalidDigit { digit, base: radix });
        }
        match token.integer_value() {
            Some(_) => None,
            None => Some(ScanErrorKind::NumericOverflow(token.text.clone())),
        }
    }

    /// Reads a string literal as alternating fragments and placeholders
    fn read_string(&mut self, start: Location) {
        self.advance(); // Consume the opening quote
        let mut fragment = String::new();
        let mut fragment_start = start;

        loop {
            match self.peek() {
                None => {
                    self.error(ScanErrorKind::UnterminatedString, start);
                    self.push(Lexeme::StringFragment, fragment, fragment_start);
                    return;
                }
                Some('"') => {
                    self.advance();
                    self.push(Lexeme::StringFragment, fragment, fragment_start);
                    return;
                }
                Some('\\') => {
                    self.advance();
                    match self.advance() {
                        Some(escaped) => match unescape(escaped) {
                            Some(decoded) => fragment.push(decoded),
                            None => {
                                fragment.push('\\');
                                fragment.push(escaped);
                            }
                        },
                        None => fragment.push('\\'),
                    }
                }
                Some('{') => {
                    self.push(
                        Lexeme::StringFragment,
                        std::mem::take(&mut fragment),
                        fragment_start,
                    );
                    if !self.read_placeholder() {
                        self.error(ScanErrorKind::UnterminatedString, start);
                        self.push(Lexeme::StringFragment, "", self.location);
                        return;
                    }
                    fragment_start = self.location;
                }
                Some(ch) => {
                    fragment.push(ch);
                    self.advance();
                }
            }
        }
    }

    /// Reads `{...}` and emits its raw inner text, located at the first
    /// character after the brace. Returns false if the input ends first.
    fn read_placeholder(&mut self) -> bool {
        self.advance(); // Consume {
        let inner_start = self.location;
        let begin = self.pos;
        let mut depth = 1usize;

        loop {
            match self.peek() {
                None => {
                    let text = &self.source[begin..self.pos];
                    self.push(Lexeme::StringPlaceholder, text, inner_start);
                    return false;
                }
                Some('\\') => {
                    self.advance();
                    self.advance();
                }
                Some('{') => {
                    depth += 1;
                    self.advance();
                }
                Some('}') => {
                    depth -= 1;
                    if depth == 0 {
                        let text = &self.source[begin..self.pos];
                        self.push(Lexeme::StringPlaceholder, text, inner_start);
                        self.advance(); // Consume closing }
                        return true;
                    }
                    self.advance();
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Reads the longest operator at the cursor
    fn read_symbol(&mut self, ch: char, start: Location) {
        let begin = self.pos;
        match SymbolGraph::get().longest_match(self.rest()) {
            Some((lexeme, len)) => {
                for _ in 0..len {
                    self.advance();
                }
                let text = &self.source[begin..self.pos];
                self.push(lexeme, text, start);
            }
            None => {
                self.advance();
                self.error(ScanErrorKind::UnrecognizedSymbol(ch), start);
                self.push(Lexeme::Invalid, ch.to_string(), start);
            }
        }
    }
}

/// Decodes the character after a backslash
fn unescape(ch: char) -> Option<char> {
    let decoded = match ch {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        'b' => '\u{8}',
        'f' => '\u{c}',
        'a' => '\u{7}',
        '\\' | '\'' | '"' | '{' | '}' => ch,
        _ => return None,
    };
    Some(decoded)
}

/// Scans a whole file
pub fn scan(source: &str) -> ScanResult {
    Scanner::new(source).scan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lex(source: &str) -> Vec<(Lexeme, String)> {
        scan(source)
            .tokens
            .into_iter()
            .map(|t| (t.lexeme, t.text))
            .collect()
    }

    fn lexemes(source: &str) -> Vec<Lexeme> {
        scan(source).tokens.into_iter().map(|t| t.lexeme).collect()
    }

    fn kinds(source: &str) -> Vec<ScanErrorKind> {
        scan(source).errors.into_iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_basic_tokens() {
        assert_eq!(
            lexemes("x: Int32 = 10;"),
            vec![
                Lexeme::Identifier,
                Lexeme::Colon,
                Lexeme::FundamentalType,
                Lexeme::Assign,
                Lexeme::Decimal,
                Lexeme::Semicolon,
            ]
        );
    }

    #[test]
    fn test_keywords_and_names() {
        assert_eq!(
            lexemes("module loop in try Point _ export"),
            vec![
                Lexeme::Module,
                Lexeme::Loop,
                Lexeme::In,
                Lexeme::Try,
                Lexeme::UserDefinedType,
                Lexeme::Anonymous,
                Lexeme::Export,
            ]
        );
    }

    #[test]
    fn test_numeric_bases() {
        assert_eq!(
            lex("0x1F 0b101 017 0 42 3.5 00.0314"),
            vec![
                (Lexeme::Hexadecimal, "0x1F".to_string()),
                (Lexeme::Binary, "0b101".to_string()),
                (Lexeme::Octal, "017".to_string()),
                (Lexeme::Octal, "0".to_string()),
                (Lexeme::Decimal, "42".to_string()),
                (Lexeme::Float, "3.5".to_string()),
                (Lexeme::Float, "00.0314".to_string()),
            ]
        );
        assert!(scan("0x123456789abcdef 0b0 00 0x0").errors.is_empty());
    }

    #[test]
    fn test_numeric_errors() {
        assert_eq!(
            kinds("0x 019 0b12 99999999999999999999"),
            vec![
                ScanErrorKind::EmptyNumericLiteral("0x".into()),
                ScanErrorKind::InvalidDigit { digit: '9', base: 8 },
                ScanErrorKind::InvalidDigit { digit: '2', base: 2 },
                ScanErrorKind::NumericOverflow("99999999999999999999".into()),
            ]
        );
        // The bare prefix is still emitted
        assert_eq!(lexemes("0b"), vec![Lexeme::Binary]);
    }

    #[test]
    fn test_letters_glued_to_numbers() {
        assert_eq!(
            lex("0x1G 12abc 1.5e3 7;"),
            vec![
                (Lexeme::Hexadecimal, "0x1G".to_string()),
                (Lexeme::Decimal, "12abc".to_string()),
                (Lexeme::Float, "1.5e3".to_string()),
                (Lexeme::Decimal, "7".to_string()),
                (Lexeme::Semicolon, ";".to_string()),
            ]
        );
        assert_eq!(
            kinds("0x1G 12abc 1.5e3 0b_"),
            vec![
                ScanErrorKind::InvalidDigit { digit: 'G', base: 16 },
                ScanErrorKind::InvalidDigit { digit: 'a', base: 10 },
                ScanErrorKind::InvalidDigit { digit: 'e', base: 10 },
                ScanErrorKind::InvalidDigit { digit: '_', base: 2 },
            ]
        );
    }

    #[test]
    fn test_float_overflow() {
        let huge = format!("{}.0", "9".repeat(400));
        assert_eq!(kinds(&huge), vec![ScanErrorKind::NumericOverflow(huge.clone())]);
        assert!(scan("123456789.987654321").errors.is_empty());
    }

    #[test]
    fn test_interpolation_alternates() {
        let tokens = lex(r#""Array: [{0}, { x }, { false}]""#);
        assert_eq!(
            tokens,
            vec![
                (Lexeme::StringFragment, "Array: [".to_string()),
                (Lexeme::StringPlaceholder, "0".to_string()),
                (Lexeme::StringFragment, ", ".to_string()),
                (Lexeme::StringPlaceholder, " x ".to_string()),
                (Lexeme::StringFragment, ", ".to_string()),
                (Lexeme::StringPlaceholder, " false".to_string()),
                (Lexeme::StringFragment, "]".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_fragments_keep_alternation() {
        assert_eq!(
            lexemes(r#""{a}{b}""#),
            vec![
                Lexeme::StringFragment,
                Lexeme::StringPlaceholder,
                Lexeme::StringFragment,
                Lexeme::StringPlaceholder,
                Lexeme::StringFragment,
            ]
        );
        assert_eq!(lexemes(r#""" """#), vec![Lexeme::StringFragment; 2]);
    }

    #[test]
    fn test_placeholder_location_is_absolute() {
        let result = scan("s = \"ab{ x }\";");
        let placeholder = &result.tokens[3];
        assert_eq!(placeholder.lexeme, Lexeme::StringPlaceholder);
        assert_eq!(placeholder.location, Location::new(1, 9, 8));
    }

    #[test]
    fn test_nested_braces_in_placeholder() {
        let tokens = lex(r#""{ {a: 1} }""#);
        assert_eq!(tokens[1], (Lexeme::StringPlaceholder, " {a: 1} ".to_string()));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_escapes() {
        let tokens = lex(r#""a\n\{b\}\q""#);
        assert_eq!(tokens, vec![(Lexeme::StringFragment, "a\n{b}\\q".to_string())]);
    }

    #[test]
    fn test_unterminated_string_keeps_partial_tokens() {
        let result = scan("\"abc{x");
        assert_eq!(
            result.errors.iter().map(|e| &e.kind).collect::<Vec<_>>(),
            vec![&ScanErrorKind::UnterminatedString]
        );
        assert_eq!(
            result.tokens.iter().map(|t| t.lexeme).collect::<Vec<_>>(),
            vec![
                Lexeme::StringFragment,
                Lexeme::StringPlaceholder,
                Lexeme::StringFragment,
            ]
        );
    }

    #[test]
    fn test_identifiers_with_underscore() {
        let result = scan("snake_case _ ok");
        assert_eq!(
            result.tokens.iter().map(|t| t.lexeme).collect::<Vec<_>>(),
            vec![Lexeme::Invalid, Lexeme::Anonymous, Lexeme::Identifier]
        );
        assert_eq!(
            result.errors[0].kind,
            ScanErrorKind::IllegalIdentifier("snake_case".into())
        );
    }

    #[test]
    fn test_comments() {
        let source = "a // line\n/* outer /* inner */ still */ b";
        assert_eq!(lexemes(source), vec![Lexeme::Identifier, Lexeme::Identifier]);
        assert_eq!(kinds("/* /* */"), vec![ScanErrorKind::UnterminatedComment]);
    }

    #[test]
    fn test_operators_longest_match() {
        assert_eq!(
            lexemes("**= ** <<= >> => -> || && != ~"),
            vec![
                Lexeme::PowAssign,
                Lexeme::StarStar,
                Lexeme::ShlAssign,
                Lexeme::ShiftRight,
                Lexeme::FatArrow,
                Lexeme::Arrow,
                Lexeme::LogicalOr,
                Lexeme::LogicalAnd,
                Lexeme::NotEqual,
                Lexeme::Tilde,
            ]
        );
    }

    #[test]
    fn test_unrecognized_symbol() {
        let result = scan("a @ b");
        assert_eq!(result.tokens[1].lexeme, Lexeme::Invalid);
        assert_eq!(result.errors[0].kind, ScanErrorKind::UnrecognizedSymbol('@'));
        assert_eq!(result.errors[0].location, Location::new(1, 3, 2));
    }

    #[test]
    fn test_locations_track_lines() {
        let result = scan("a\n  bc");
        assert_eq!(result.tokens[1].location, Location::new(2, 3, 4));
        assert_eq!(result.end, Location::new(2, 5, 6));
    }

    #[test]
    fn test_with_origin_offsets_locations() {
        let origin = Location::new(3, 10, 40);
        let result = Scanner::with_origin(" x", origin).scan();
        assert_eq!(result.tokens[0].location, Location::new(3, 11, 41));
    }
}
