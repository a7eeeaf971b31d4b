//! Expression AST nodes.
//!
//! Expressions are allocated in the parser's arena; recursive children are
//! held by `&'ast` reference so every node stays `Copy`.

use crate::ast::decl::Prototype;
use crate::ast::node::Ident;
use crate::ast::ops::{AssignOp, BinaryOp, Builtin, UnaryOp};
use crate::ast::stmt::Block;
use crate::ast::types::TypeExpr;
use krug_core::Span;
use ordered_float::OrderedFloat;

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Literal value: `42`, `1.5`, `"text"`, `'c'`
    Literal(LiteralExpr<'ast>),
    /// Variable reference: `x`
    Ident(Ident<'ast>),
    /// Binary operation: `a + b`
    Binary(&'ast BinaryExpr<'ast>),
    /// Unary prefix operation: `-x`, `@p`
    Unary(&'ast UnaryExpr<'ast>),
    /// Assignment: `x = 1`, `x += 1`
    Assign(&'ast AssignExpr<'ast>),
    /// Function call: `f(a, b)`
    Call(&'ast CallExpr<'ast>),
    /// Subscript: `xs[i]`
    Index(&'ast IndexExpr<'ast>),
    /// Member chain: `a.b.c`
    Path(PathExpr<'ast>),
    /// Parenthesized expression: `(x)`
    Grouping(&'ast ParenExpr<'ast>),
    /// Parenthesized list: `(a, b)`
    List(ListExpr<'ast>),
    /// Structure initializer: `:Point{1, 2}`
    Init(InitExpr<'ast>),
    /// Builtin pseudo-call: `sizeof!int`
    Builtin(BuiltinExpr<'ast>),
    /// Anonymous function: `fn(x int) int { ... }`
    Lambda(&'ast LambdaExpr<'ast>),
    /// Type in expression position: `*int`
    Type(&'ast TypeExpr<'ast>),
}

impl<'ast> Expr<'ast> {
    /// Get the source span of this expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Literal(e) => e.span,
            Self::Ident(e) => e.span,
            Self::Binary(e) => e.span,
            Self::Unary(e) => e.span,
            Self::Assign(e) => e.span,
            Self::Call(e) => e.span,
            Self::Index(e) => e.span,
            Self::Path(e) => e.span,
            Self::Grouping(e) => e.span,
            Self::List(e) => e.span,
            Self::Init(e) => e.span,
            Self::Builtin(e) => e.span,
            Self::Lambda(e) => e.span,
            Self::Type(t) => t.span(),
        }
    }

    /// Check if this expression is a valid assignment target.
    pub fn is_lvalue(&self) -> bool {
        match self {
            Self::Ident(_) | Self::Index(_) | Self::Path(_) => true,
            Self::Unary(u) => u.op == UnaryOp::Deref,
            Self::Grouping(p) => p.expr.is_lvalue(),
            _ => false,
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiteralExpr<'ast> {
    pub kind: LiteralKind<'ast>,
    pub span: Span,
}

/// Literal values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralKind<'ast> {
    Int(u128),
    Float(OrderedFloat<f64>),
    /// String contents without the surrounding quotes.
    String(&'ast str),
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryExpr<'ast> {
    pub left: Expr<'ast>,
    pub op: BinaryOp,
    pub right: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnaryExpr<'ast> {
    pub op: UnaryOp,
    pub operand: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssignExpr<'ast> {
    pub target: Expr<'ast>,
    pub op: AssignOp,
    pub value: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallExpr<'ast> {
    pub callee: Expr<'ast>,
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexExpr<'ast> {
    pub object: Expr<'ast>,
    pub index: Expr<'ast>,
    pub span: Span,
}

/// A dotted chain. The parser splices nested chains so `elements` is flat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathExpr<'ast> {
    pub elements: &'ast [Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParenExpr<'ast> {
    pub expr: Expr<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListExpr<'ast> {
    pub elements: &'ast [Expr<'ast>],
    pub span: Span,
}

/// What an initializer builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InitKind {
    Structure,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitExpr<'ast> {
    pub kind: InitKind,
    pub name: Option<Ident<'ast>>,
    pub values: &'ast [Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuiltinExpr<'ast> {
    pub builtin: Builtin,
    /// The identifier after `!`; a type name for `alloc`/`sizeof`.
    pub operand: Ident<'ast>,
    pub args: &'ast [Expr<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambdaExpr<'ast> {
    pub proto: Prototype<'ast>,
    pub body: Block<'ast>,
    pub span: Span,
}
