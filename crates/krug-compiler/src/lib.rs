//! Krug Compiler
//!
//! Lowers parsed Krug scripts to an IR module and runs the semantic passes
//! over it.
//!
//! ## Architecture
//!
//! - **Lowering**: register-then-fill sweeps turn one or more scripts into a
//!   single [`Module`](ir::Module)
//! - **Scope Resolution**: every name reference is checked against the scope
//!   chain
//! - **Type Declaration**: reference types are bound to structures and local
//!   types are registered into their scopes
//!
//! ## Modules
//!
//! - [`ir`]: IR types, values, instructions and the module container
//! - [`symbols`]: arena-linked symbol tables
//! - [`passes`]: the two semantic passes
//! - [`options`]: build configuration

pub mod ir;
mod lower;
pub mod options;
pub mod passes;
pub mod symbols;

pub use lower::{flatten, IrBuilder};
pub use options::BuildOptions;
pub use passes::{
    declare_types, resolve_symbols, DeclarationOutput, ResolutionOutput, ScopeResolutionPass,
    TypeDeclarationPass,
};
pub use symbols::{ScopeId, Symbol, SymbolKind, SymbolTable};

// Re-export CompilationError from core for convenience
pub use krug_core::CompilationError;
