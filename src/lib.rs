//! Krug front-end.
//!
//! Turns Krug source text into tokens, an AST, and finally an IR module
//! checked by the scope resolution and type declaration passes.
//!
//! # Example
//!
//! ```
//! use krug::{Compiler, BuildOptions};
//!
//! let source = r#"
//!     type Node = struct { value int, next *Node, };
//!
//!     fn sum(head *Node) int {
//!         mut total int = 0;
//!         return total;
//!     }
//! "#;
//!
//! let compiler = Compiler::with_options(BuildOptions::new().with_unit_names(["list.krug"]));
//! let output = compiler.compile(&[source]);
//! assert!(output.is_success(), "{}", compiler.render(&output.diagnostics, &[source]));
//! ```
//!
//! The stages are also available on their own through the re-exported
//! [`krug_parser`] and [`krug_compiler`] crates.

mod compiler;
mod unit;

pub use compiler::{compile, CompileOutput, Compiler};
pub use unit::{BuildError, Unit, UnitError};

pub use krug_compiler::ir::Module;
pub use krug_compiler::BuildOptions;
pub use krug_core::{Diagnostic, DiagnosticKind, Diagnostics, Span};

pub use krug_compiler;
pub use krug_core;
pub use krug_parser;
