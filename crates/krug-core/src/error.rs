//! Error values produced by each stage of the front-end.
//!
//! ```text
//! KrugError
//! ├── LexError          scanning
//! ├── ParseError        syntax, categorised by ParseErrorKind
//! └── CompilationError  lowering, scope resolution, type declaration
//! ```
//!
//! None of these stop a build on their own. Each one is turned into a
//! [`Diagnostic`](crate::Diagnostic) and collected; only
//! [`CompilationError::Internal`] aborts.

use std::fmt;

use thiserror::Error;

use crate::Span;

// ============================================================================
// Lexing
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// No token starts with this character.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    /// End of input inside a `"..."` literal.
    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },

    /// End of input, or a second character, inside a `'.'` literal.
    #[error("unterminated character literal at {span}")]
    UnterminatedChar { span: Span },

    /// `''` with nothing between the quotes.
    #[error("empty character literal at {span}")]
    EmptyChar { span: Span },

    /// Offsets are `u32`; the unit is not scanned at all.
    #[error("source of {len} bytes is too large to scan")]
    SourceTooLarge { len: usize },
}

impl LexError {
    pub fn span(&self) -> Span {
        match *self {
            Self::UnexpectedChar { span, .. }
            | Self::UnterminatedString { span }
            | Self::UnterminatedChar { span }
            | Self::EmptyChar { span } => span,
            Self::SourceTooLarge { .. } => Span::default(),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// What kind of expectation the parser failed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    ExpectedToken,
    UnexpectedToken,
    UnexpectedEof,
    ExpectedExpression,
    ExpectedType,
    ExpectedBlock,
    /// `return`, `break`, `let` and friends at the top level of a unit.
    MisplacedStatement,
    /// A second `else` on one chain.
    DuplicateElse,
    /// `else` followed by neither `if` nor `{`.
    MalformedElseIf,
    ExpectedDeclaration,
    InvalidDeclaration,
    ExpectedIdentifier,
    MissingSemicolon,
    InvalidSyntax,
    /// Number or character literal whose text does not decode.
    InvalidLiteral,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExpectedToken => "expected token",
            Self::UnexpectedToken => "unexpected token",
            Self::UnexpectedEof => "unexpected end of file",
            Self::ExpectedExpression => "expected expression",
            Self::ExpectedType => "expected type",
            Self::ExpectedBlock => "expected block",
            Self::MisplacedStatement => "misplaced statement",
            Self::DuplicateElse => "duplicate else",
            Self::MalformedElseIf => "malformed else-if chain",
            Self::ExpectedDeclaration => "expected declaration",
            Self::InvalidDeclaration => "invalid declaration",
            Self::ExpectedIdentifier => "expected identifier",
            Self::MissingSemicolon => "missing semicolon",
            Self::InvalidSyntax => "invalid syntax",
            Self::InvalidLiteral => "invalid literal",
        })
    }
}

/// A syntax error.
///
/// The span runs from the start of the construct being parsed to the token
/// where the expectation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        let message = message.into();
        Self { kind, span, message }
    }

    /// `expected <what>, found <found>` under `kind`.
    fn mismatch(kind: ParseErrorKind, span: Span, what: &str, found: &str) -> Self {
        Self::new(kind, span, format!("expected {what}, found {found}"))
    }

    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::mismatch(ParseErrorKind::ExpectedToken, span, expected, found)
    }

    pub fn unexpected_token(span: Span, found: &str) -> Self {
        Self::new(ParseErrorKind::UnexpectedToken, span, format!("unexpected token: {found}"))
    }

    pub fn expected_identifier(span: Span, found: &str) -> Self {
        Self::mismatch(ParseErrorKind::ExpectedIdentifier, span, "identifier", found)
    }

    pub fn expected_expression(span: Span, found: &str) -> Self {
        Self::mismatch(ParseErrorKind::ExpectedExpression, span, "expression", found)
    }

    pub fn expected_type(span: Span, found: &str) -> Self {
        Self::mismatch(ParseErrorKind::ExpectedType, span, "type", found)
    }
}

/// Every syntax error of one unit, in the order they were found.
///
/// The parser recovers at statement and item boundaries, so one unit can
/// produce several of these.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseErrors(Vec<ParseError>);

impl ParseErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ParseError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ParseError> {
        self.0.iter()
    }
}

impl Extend<ParseError> for ParseErrors {
    fn extend<I: IntoIterator<Item = ParseError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<ParseError> for ParseErrors {
    fn from_iter<I: IntoIterator<Item = ParseError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for error in &self.0 {
            if !first {
                f.write_str("\n")?;
            }
            first = false;
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}

// ============================================================================
// Lowering and semantic passes
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilationError {
    /// A name taken twice among impls, traits, structures, methods,
    /// functions or the parameters of one signature. The first declaration wins.
    #[error("at {span}: duplicate {kind} '{name}'")]
    DuplicateDeclaration {
        /// "impl", "trait", "method", "function", "parameter", ...
        kind: &'static str,
        name: String,
        /// Site of the rejected declaration.
        span: Span,
    },

    /// An identifier with no visible binding.
    #[error("at {span}: unresolved symbol '{name}'")]
    UnresolvedSymbol { name: String, span: Span },

    /// Parsed and lowered, but no pass handles it yet.
    #[error("at {span}: unimplemented: {feature}")]
    Unimplemented { feature: String, span: Span },

    /// The IR disagrees with itself. Aborts the build.
    #[error("at {span}: internal error: {message}")]
    Internal { message: String, span: Span },
}

impl CompilationError {
    pub fn span(&self) -> Span {
        match *self {
            Self::DuplicateDeclaration { span, .. }
            | Self::UnresolvedSymbol { span, .. }
            | Self::Unimplemented { span, .. }
            | Self::Internal { span, .. } => span,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }
}

// ============================================================================
// Any stage
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KrugError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Compilation(#[from] CompilationError),
}

impl KrugError {
    pub fn span(&self) -> Span {
        match self {
            Self::Lex(inner) => inner.span(),
            Self::Parse(inner) => inner.span,
            Self::Compilation(inner) => inner.span(),
        }
    }
}
