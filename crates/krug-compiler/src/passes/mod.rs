//! Semantic passes over a lowered [`Module`](crate::ir::Module).
//!
//! - [`scope_resolution`]: check every name reference against the scope chain
//! - [`type_declaration`]: bind reference types and register local types

pub mod scope_resolution;
pub mod type_declaration;

pub use scope_resolution::{resolve_symbols, ResolutionOutput, ScopeResolutionPass};
pub use type_declaration::{declare_types, DeclarationOutput, TypeDeclarationPass};
