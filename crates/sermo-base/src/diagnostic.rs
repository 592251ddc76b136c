//! Diagnostics: spanned, stably-coded compiler messages.
//!
//! Every stage (lexer, parser, semantic analyzer, code generator) reports
//! problems as [`Diagnostic`] values rather than throwing. This keeps error
//! handling uniform across the pipeline and lets the driver sort and render
//! diagnostics from every stage the same way.

use crate::span::Span;
use std::fmt;

/// How serious a diagnostic is. Only `Error` halts the pipeline (see the
/// driver gating rule in spec §2); `Warning` is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// A single compiler message tied to a source location.
///
/// `code` is a short, stable identifier (`"L001"`, `"E-UNDECLARED"`,
/// `"C-NO-TRANSLATION"`) used both for documentation cross-referencing and
/// for the deterministic ordering spec §5 requires: diagnostics are sorted
/// by `(span.start, code)` within a file.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub span: Span,
    /// Secondary locations relevant to the diagnostic, e.g. the other edge
    /// of a cyclic import, or the declaration site of a duplicate symbol.
    pub related: Vec<(String, Span)>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>, span: Span) -> Self {
        Self { severity: Severity::Error, code, message: message.into(), span, related: Vec::new() }
    }

    pub fn warning(code: &'static str, message: impl Into<String>, span: Span) -> Self {
        Self { severity: Severity::Warning, code, message: message.into(), span, related: Vec::new() }
    }

    pub fn with_related(mut self, note: impl Into<String>, span: Span) -> Self {
        self.related.push((note.into(), span));
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Renders in the driver's `path:line:column - message` format (spec §6).
    pub fn render(&self, path: &str) -> String {
        format!(
            "{}:{}:{} - {} [{}]",
            path, self.span.start.line, self.span.start.column, self.message, self.code
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} - {} [{}]",
            self.span.start.line, self.span.start.column, self.message, self.code
        )
    }
}

impl std::error::Error for Diagnostic {}

/// Sorts diagnostics by the deterministic order spec §5 mandates: position
/// first, then code, so repeated compiles of identical input always print
/// diagnostics in the same order.
pub fn sort_deterministic(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        (a.span.start.offset, a.code).cmp(&(b.span.start.offset, b.code))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Position;

    fn span_at(offset: u32) -> Span {
        let p = Position::new(1, offset + 1, offset);
        Span::point(p)
    }

    #[test]
    fn render_matches_driver_format() {
        let diag = Diagnostic::error("L003", "unexpected character", span_at(4));
        assert_eq!(diag.render("main.srm"), "main.srm:1:5 - unexpected character [L003]");
    }

    #[test]
    fn sort_deterministic_orders_by_position_then_code() {
        let mut diags = vec![
            Diagnostic::error("E-B", "later", span_at(10)),
            Diagnostic::error("E-A", "earlier", span_at(0)),
            Diagnostic::error("E-A", "same offset, tie on code", span_at(10)),
        ];
        sort_deterministic(&mut diags);
        assert_eq!(diags[0].message, "earlier");
        assert_eq!(diags[1].code, "E-A");
        assert_eq!(diags[2].code, "E-B");
    }

    #[test]
    fn is_error_distinguishes_severities() {
        let err = Diagnostic::error("X", "bad", span_at(0));
        let warn = Diagnostic::warning("Y", "hmm", span_at(0));
        assert!(err.is_error());
        assert!(!warn.is_error());
    }
}
