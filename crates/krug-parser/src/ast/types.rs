//! Type expression AST nodes.
//!
//! Types appear in parameter lists, return positions, variable
//! declarations, alias and structure definitions, and (for pointer, array
//! and structure forms) directly in expression position.

use crate::ast::expr::Expr;
use crate::ast::node::Ident;
use krug_core::Span;

/// A type as written in source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeExpr<'ast> {
    /// `*T`
    Pointer(PointerType<'ast>),
    /// `[T; size]`
    Array(ArrayType<'ast>),
    /// `(A, B, ...)`
    Tuple(TupleType<'ast>),
    /// `struct { name T, ... }`
    Structure(StructType<'ast>),
    /// A bare name, resolved later.
    Named(Ident<'ast>),
}

impl<'ast> TypeExpr<'ast> {
    /// Get the source span of this type.
    pub fn span(&self) -> Span {
        match self {
            Self::Pointer(t) => t.span,
            Self::Array(t) => t.span,
            Self::Tuple(t) => t.span,
            Self::Structure(t) => t.span,
            Self::Named(name) => name.span,
        }
    }
}

/// `*T`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerType<'ast> {
    pub base: &'ast TypeExpr<'ast>,
    pub span: Span,
}

/// `[T; size]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrayType<'ast> {
    pub base: &'ast TypeExpr<'ast>,
    pub size: &'ast Expr<'ast>,
    pub span: Span,
}

/// `(A, B, ...)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TupleType<'ast> {
    pub elements: &'ast [TypeExpr<'ast>],
    pub span: Span,
}

/// An anonymous structure body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructType<'ast> {
    /// Fields in declaration order.
    pub fields: &'ast [FieldDecl<'ast>],
    pub span: Span,
}

/// One `name Type` entry of a structure body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDecl<'ast> {
    pub name: Ident<'ast>,
    pub ty: TypeExpr<'ast>,
    /// Fields are never owned.
    pub owned: bool,
    /// Fields are always mutable.
    pub mutable: bool,
    pub span: Span,
}
