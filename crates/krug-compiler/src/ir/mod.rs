//! Intermediate representation produced by the IR builder.
//!
//! The IR owns all of its data: nothing borrows from the AST arena, so a
//! [`Module`] outlives the scripts it was lowered from.
//!
//! - [`types`]: `Type`, primitives and structures
//! - [`value`]: expression values
//! - [`instr`]: instructions and blocks
//! - [`module`]: functions, impls, traits and the module itself

pub mod instr;
pub mod module;
pub mod types;
pub mod value;

pub use instr::{Block, Defer, ElseIf, IfStatement, Instruction, Local, LocalFlags, Loop, Return, WhileLoop};
pub use module::{Function, Global, Impl, Module, Param, Trait, TraitMethod, TypeAlias};
pub use types::{Field, Primitive, Structure, Type};
pub use value::Value;

use krug_core::Span;
use std::fmt;

/// An owned name with the span it was written at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name {
    pub value: String,
    pub span: Span,
}

impl Name {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            value: value.into(),
            span,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl From<krug_parser::ast::Ident<'_>> for Name {
    fn from(ident: krug_parser::ast::Ident<'_>) -> Self {
        Name::new(ident.name, ident.span)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
