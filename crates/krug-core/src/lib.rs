//! Shared foundation types for the Krug front-end.
//!
//! - [`Span`]: byte-offset source locations
//! - [`error`]: the per-stage error taxonomy
//! - [`diagnostic`]: the uniform diagnostic surface every stage reports into

pub mod diagnostic;
pub mod error;
mod span;

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::{CompilationError, KrugError, LexError, ParseError, ParseErrorKind, ParseErrors};
pub use span::Span;
