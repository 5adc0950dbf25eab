//! tern-error - Error model for the Tern front end
//!
//! Scanner and parser errors are plain values ([`ScanError`], [`SyntaxError`])
//! that the front end accumulates while it keeps going. They are turned into
//! rustc-style [`Diagnostic`]s only when they are shown.
//!
//! # Example
//!
//! ```rust
//! use tern_error::{DiagnosticRenderer, ErrorContext, ErrorReason, SourceCache, SyntaxError};
//! use tern_error::span::Location;
//!
//! let mut cache = SourceCache::new();
//! let file_id = cache.add("example.tn", "x: = 10");
//!
//! let error = SyntaxError::new(
//!     ErrorContext::IdDecl,
//!     ErrorReason::MissingTypeExpr,
//!     Location::new(1, 3, 2),
//! );
//!
//! let renderer = DiagnosticRenderer::new(&cache);
//! println!("{}", renderer.render(&error.to_diagnostic(file_id)));
//! ```

pub mod diagnostic;
pub mod internal;
pub mod scan;
pub mod span;
pub mod syntax;

pub use diagnostic::{
    Diagnostic, DiagnosticRenderer, ErrorCode, Label, Level, SourceCache, SourceFile,
};
pub use internal::InternalError;
pub use scan::{ScanError, ScanErrorKind};
pub use span::{Location, Span};
pub use syntax::{ErrorContext, ErrorReason, SyntaxError};

/// Diagnostics accumulated over one run of the front end
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects scanner errors followed by parser errors, both in source order.
    pub fn collect(scan_errors: &[ScanError], syntax_errors: &[SyntaxError], file_id: u32) -> Self {
        let mut diagnostics = Self::new();
        diagnostics.extend(scan_errors.iter().map(|e| e.to_diagnostic(file_id)));

        let mut syntax: Vec<&SyntaxError> = syntax_errors.iter().collect();
        syntax.sort_by_key(|e| e.location);
        diagnostics.extend(syntax.into_iter().map(|e| e.to_diagnostic(file_id)));
        diagnostics
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.level == Level::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Renders all diagnostics, separated by blank lines
    pub fn render(&self, renderer: &DiagnosticRenderer<'_>) -> String {
        self.items
            .iter()
            .map(|d| renderer.render(d))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
