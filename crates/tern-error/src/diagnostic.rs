//! Diagnostic - Rust-style error reports
//!
//! Both scanner and parser errors are converted into a [`Diagnostic`] before
//! being shown: a level, an error code (`EL001`, `EP002`, ...), a message,
//! labels pointing into the source and optional notes.

use crate::span::Span;
use std::fmt::{self, Write};

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
    Note,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Note => "note",
        }
    }

    /// ANSI color used for the level's header
    pub fn color_code(&self) -> &'static str {
        match self {
            Level::Error => "\x1b[1;31m",   // Bold Red
            Level::Warning => "\x1b[1;33m", // Bold Yellow
            Level::Note => "\x1b[1;36m",    // Bold Cyan
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode {
    /// Category (L = Lexer, P = Parser)
    pub category: char,
    pub number: u16,
}

impl ErrorCode {
    pub const fn new(category: char, number: u16) -> Self {
        Self { category, number }
    }

    // Lexer errors
    pub const UNEXPECTED_CHAR: Self = Self::new('L', 1);
    pub const UNTERMINATED_STRING: Self = Self::new('L', 2);
    pub const INVALID_NUMBER: Self = Self::new('L', 3);
    pub const UNTERMINATED_COMMENT: Self = Self::new('L', 4);
    pub const ILLEGAL_IDENTIFIER: Self = Self::new('L', 5);

    // Parser errors
    pub const UNEXPECTED_TOKEN: Self = Self::new('P', 1);
    pub const EXPECTED_EXPRESSION: Self = Self::new('P', 2);
    pub const EXPECTED_TYPE: Self = Self::new('P', 3);
    pub const EXPECTED_DECLARATION: Self = Self::new('P', 4);
    pub const EXPECTED_STATEMENT: Self = Self::new('P', 5);
    pub const EXPECTED_TOKEN: Self = Self::new('P', 6);
    pub const RESTRICTED: Self = Self::new('P', 7);
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}{:03}", self.category, self.number)
    }
}

/// A label pointing at a region of the source
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
}

/// A complete diagnostic
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: Level,
    pub code: Option<ErrorCode>,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn with_level(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_level(Level::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with_level(Level::Warning, message)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            span,
            message: message.into(),
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

/// Source files known to the renderer
#[derive(Debug, Default)]
pub struct SourceCache {
    files: Vec<SourceFile>,
}

#[derive(Debug)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
}

impl SourceFile {
    /// Text of a 1-indexed line, without its terminator
    pub fn line(&self, line: u32) -> Option<&str> {
        let index = line.checked_sub(1)? as usize;
        self.source.lines().nth(index)
    }
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file and returns its ID
    pub fn add(&mut self, name: impl Into<String>, source: impl Into<String>) -> u32 {
        let id = self.files.len() as u32;
        self.files.push(SourceFile {
            name: name.into(),
            source: source.into(),
        });
        id
    }

    pub fn get(&self, id: u32) -> Option<&SourceFile> {
        self.files.get(id as usize)
    }
}

/// Renders diagnostics against a [`SourceCache`]
pub struct DiagnosticRenderer<'a> {
    cache: &'a SourceCache,
    use_colors: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(cache: &'a SourceCache) -> Self {
        Self {
            cache,
            use_colors: true,
        }
    }

    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    fn paint(&self, code: &'static str) -> &'static str {
        if self.use_colors {
            code
        } else {
            ""
        }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_diagnostic(&mut out, diagnostic);
        out
    }

    fn write_diagnostic(&self, out: &mut String, diagnostic: &Diagnostic) -> fmt::Result {
        let reset = self.paint("\x1b[0m");
        let blue = self.paint("\x1b[1;34m");
        let color = self.paint(diagnostic.level.color_code());

        // error[EP002]: message
        write!(out, "{}{}", color, diagnostic.level)?;
        if let Some(code) = diagnostic.code {
            write!(out, "[{}]", code)?;
        }
        writeln!(out, "{}: {}", reset, diagnostic.message)?;

        for label in &diagnostic.labels {
            let Some(file) = self.cache.get(label.span.file_id) else {
                continue;
            };
            let start = label.span.start;
            writeln!(out, " {}-->{} {}:{}:{}", blue, reset, file.name, start.line, start.column)?;

            let Some(text) = file.line(start.line) else {
                continue;
            };
            let gutter = " ".repeat(start.line.to_string().len());
            let width = if label.span.end.line == start.line {
                label.span.end.column.saturating_sub(start.column).max(1) as usize
            } else {
                1
            };
            let indent = " ".repeat(start.column.saturating_sub(1) as usize);

            writeln!(out, " {} {}|{}", gutter, blue, reset)?;
            writeln!(out, " {}{}{} | {}", blue, start.line, reset, text)?;
            writeln!(
                out,
                " {} {}|{} {}{}{}{} {}",
                gutter,
                blue,
                reset,
                indent,
                color,
                "^".repeat(width),
                reset,
                label.message
            )?;
        }

        for note in &diagnostic.notes {
            writeln!(out, "  = note: {}", note)?;
        }
        Ok(())
    }
}
