//! Diagnostics accumulated across a build.
//!
//! Every stage of the pipeline reports problems as [`Diagnostic`] values
//! rather than failing outright. A [`Diagnostics`] collection is threaded
//! through the build and handed back to the caller together with whatever
//! partial module was produced.

use std::fmt;

use crate::{CompilationError, KrugError, LexError, ParseError, Span};

/// The category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Malformed input found by the lexer.
    Lex,
    /// A syntax error found by the parser.
    Parse,
    /// An impl, method, structure or trait declared twice.
    DuplicateDeclaration,
    /// A reference to a name with no visible binding.
    UnresolvedSymbol,
    /// A recognized construct no stage handles yet.
    Unimplemented,
    /// An internal consistency violation.
    ///
    /// The only fatal kind: the build stops after the stage that reports it.
    Internal,
}

impl DiagnosticKind {
    /// Short title used when rendering the diagnostic.
    pub fn title(&self) -> &'static str {
        match self {
            DiagnosticKind::Lex => "lex error",
            DiagnosticKind::Parse => "parse error",
            DiagnosticKind::DuplicateDeclaration => "duplicate declaration",
            DiagnosticKind::UnresolvedSymbol => "unresolved symbol",
            DiagnosticKind::Unimplemented => "unimplemented",
            DiagnosticKind::Internal => "internal error",
        }
    }

    /// Whether diagnostics of this kind abort the current build.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DiagnosticKind::Internal)
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A single reportable problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The category of the problem.
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
    /// Where in the unit's source the problem occurred.
    pub span: Span,
    /// Index of the unit the span refers to.
    pub unit: usize,
}

impl Diagnostic {
    /// Create a diagnostic in unit 0.
    pub fn new(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            unit: 0,
        }
    }

    /// Attribute the diagnostic to another unit.
    pub fn in_unit(mut self, unit: usize) -> Self {
        self.unit = unit;
        self
    }

    /// Whether this diagnostic aborts the current build.
    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }

    /// Render as `name:line:col: title: message` using the unit's source.
    pub fn display_with_source(&self, unit_name: &str, source: &str) -> String {
        let (line, col) = self.span.line_col(source);
        format!(
            "{unit_name}:{line}:{col}: {}: {}",
            self.kind.title(),
            self.message
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}: {}", self.kind, self.span, self.message)
    }
}

impl From<LexError> for Diagnostic {
    fn from(error: LexError) -> Self {
        Diagnostic::new(DiagnosticKind::Lex, error.span(), error.to_string())
    }
}

impl From<ParseError> for Diagnostic {
    fn from(error: ParseError) -> Self {
        let message = format!("{}: {}", error.kind, error.message);
        Diagnostic::new(DiagnosticKind::Parse, error.span, message)
    }
}

impl From<CompilationError> for Diagnostic {
    fn from(error: CompilationError) -> Self {
        let kind = match &error {
            CompilationError::DuplicateDeclaration { .. } => DiagnosticKind::DuplicateDeclaration,
            CompilationError::UnresolvedSymbol { .. } => DiagnosticKind::UnresolvedSymbol,
            CompilationError::Unimplemented { .. } => DiagnosticKind::Unimplemented,
            CompilationError::Internal { .. } => DiagnosticKind::Internal,
        };
        let message = match &error {
            CompilationError::DuplicateDeclaration { kind, name, .. } => {
                format!("duplicate {kind} '{name}'")
            }
            CompilationError::UnresolvedSymbol { name, .. } => {
                format!("cannot find '{name}' in this scope")
            }
            CompilationError::Unimplemented { feature, .. } => feature.clone(),
            CompilationError::Internal { message, .. } => message.clone(),
        };
        Diagnostic::new(kind, error.span(), message)
    }
}

impl From<KrugError> for Diagnostic {
    fn from(error: KrugError) -> Self {
        match error {
            KrugError::Lex(e) => e.into(),
            KrugError::Parse(e) => e.into(),
            KrugError::Compilation(e) => e.into(),
        }
    }
}

/// An ordered collection of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a diagnostic.
    pub fn push(&mut self, diagnostic: impl Into<Diagnostic>) {
        self.items.push(diagnostic.into());
    }

    /// Append every diagnostic of `other`, preserving order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    /// Check if there are any diagnostics.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of diagnostics.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterate over the diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Whether any diagnostic aborts the build.
    pub fn has_fatal(&self) -> bool {
        self.items.iter().any(Diagnostic::is_fatal)
    }

    /// Count diagnostics of a given kind.
    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    /// Drop everything past the first `max` diagnostics.
    pub fn truncate(&mut self, max: usize) {
        self.items.truncate(max);
    }

    /// Convert to a Vec of diagnostics.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<D: Into<Diagnostic>> FromIterator<D> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = D>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParseErrorKind;

    #[test]
    fn diagnostic_from_parse_error() {
        let err = ParseError::new(ParseErrorKind::MissingSemicolon, Span::new(5, 6), "expected ';'");
        let diagnostic: Diagnostic = err.into();
        assert_eq!(diagnostic.kind, DiagnosticKind::Parse);
        assert_eq!(diagnostic.span, Span::new(5, 6));
        assert_eq!(diagnostic.message, "missing semicolon: expected ';'");
    }

    #[test]
    fn diagnostic_from_compilation_error() {
        let diagnostic: Diagnostic = CompilationError::UnresolvedSymbol {
            name: "y".to_string(),
            span: Span::new(30, 31),
        }
        .into();
        assert_eq!(diagnostic.kind, DiagnosticKind::UnresolvedSymbol);
        assert_eq!(diagnostic.message, "cannot find 'y' in this scope");
        assert!(!diagnostic.is_fatal());
    }

    #[test]
    fn diagnostic_display_with_source() {
        let source = "fn f() {\n  return y;\n}";
        let diagnostic = Diagnostic::new(DiagnosticKind::UnresolvedSymbol, Span::new(18, 19), "cannot find 'y'")
            .in_unit(2);
        assert_eq!(diagnostic.unit, 2);
        assert_eq!(
            diagnostic.display_with_source("main.krug", source),
            "main.krug:2:10: unresolved symbol: cannot find 'y'"
        );
    }

    #[test]
    fn diagnostics_counting() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(LexError::UnterminatedString {
            span: Span::new(0, 4),
        });
        diagnostics.push(CompilationError::Unimplemented {
            feature: "type inference".to_string(),
            span: Span::default(),
        });
        diagnostics.push(CompilationError::Unimplemented {
            feature: "lambda expressions".to_string(),
            span: Span::default(),
        });

        assert_eq!(diagnostics.len(), 3);
        assert_eq!(diagnostics.count_of(DiagnosticKind::Unimplemented), 2);
        assert_eq!(diagnostics.count_of(DiagnosticKind::Lex), 1);
        assert!(!diagnostics.has_fatal());

        diagnostics.push(CompilationError::Internal {
            message: "scope stack underflow".to_string(),
            span: Span::default(),
        });
        assert!(diagnostics.has_fatal());

        diagnostics.truncate(1);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn diagnostics_from_iterator() {
        let diagnostics: Diagnostics = vec![
            ParseError::expected_identifier(Span::new(0, 1), "'('"),
            ParseError::expected_type(Span::new(1, 2), "';'"),
        ]
        .into_iter()
        .collect();
        assert_eq!(diagnostics.count_of(DiagnosticKind::Parse), 2);
    }
}
