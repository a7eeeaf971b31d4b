//! Top-level declaration AST nodes.

use crate::ast::expr::Expr;
use crate::ast::node::Ident;
use crate::ast::stmt::Block;
use crate::ast::types::{StructType, TypeExpr};
use krug_core::Span;

/// A top-level item in a script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item<'ast> {
    /// `fn name(params) Ret { }`
    Function(FunctionDecl<'ast>),
    /// `type Name = struct { ... };`
    Structure(StructDecl<'ast>),
    /// `impl Name { fn ... }`
    Impl(ImplDecl<'ast>),
    /// `trait Name { fn ...; }`
    Trait(TraitDecl<'ast>),
    /// `type Name = T;`
    TypeAlias(TypeAliasDecl<'ast>),
    /// `let`/`mut` at top level
    Global(VarDecl<'ast>),
}

impl<'ast> Item<'ast> {
    /// Get the source span of this item.
    pub fn span(&self) -> Span {
        match self {
            Self::Function(d) => d.span,
            Self::Structure(d) => d.span,
            Self::Impl(d) => d.span,
            Self::Trait(d) => d.span,
            Self::TypeAlias(d) => d.span,
            Self::Global(d) => d.span,
        }
    }
}

/// A function signature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prototype<'ast> {
    /// `None` for lambdas.
    pub name: Option<Ident<'ast>>,
    pub params: &'ast [Param<'ast>],
    pub return_type: Option<TypeExpr<'ast>>,
    pub span: Span,
}

/// `[mut] [~]name Type`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    pub name: Ident<'ast>,
    pub ty: TypeExpr<'ast>,
    pub mutable: bool,
    /// False when the name is prefixed with `~`.
    pub owned: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionDecl<'ast> {
    pub proto: Prototype<'ast>,
    pub body: Block<'ast>,
    pub span: Span,
}

impl<'ast> FunctionDecl<'ast> {
    /// The declared name. Top-level functions and methods always have one.
    pub fn name(&self) -> Option<Ident<'ast>> {
        self.proto.name
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructDecl<'ast> {
    pub name: Ident<'ast>,
    pub body: StructType<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImplDecl<'ast> {
    pub name: Ident<'ast>,
    pub methods: &'ast [FunctionDecl<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitDecl<'ast> {
    pub name: Ident<'ast>,
    pub methods: &'ast [Prototype<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypeAliasDecl<'ast> {
    pub name: Ident<'ast>,
    pub ty: TypeExpr<'ast>,
    pub span: Span,
}

/// A `let` or `mut` binding, local or global.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDecl<'ast> {
    pub name: Ident<'ast>,
    pub mutable: bool,
    /// False when the name is prefixed with `~`.
    pub owned: bool,
    pub ty: Option<TypeExpr<'ast>>,
    pub value: Option<&'ast Expr<'ast>>,
    pub span: Span,
}
