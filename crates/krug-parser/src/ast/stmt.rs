//! Statement AST nodes.

use crate::ast::decl::{TypeAliasDecl, VarDecl};
use crate::ast::expr::Expr;
use crate::ast::node::Ident;
use krug_core::Span;

/// A statement inside a function body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// `let x T = v;`
    Let(VarDecl<'ast>),
    /// `mut x T = v;`
    Mut(VarDecl<'ast>),
    /// `type Name = T;` inside a body
    TypeAlias(TypeAliasDecl<'ast>),
    /// `return v;`
    Return(ReturnStmt<'ast>),
    /// `break;`
    Break(Span),
    /// `next;`
    Next(Span),
    /// `$name;`
    Label(Ident<'ast>),
    /// `jump name;`
    Jump(JumpStmt<'ast>),
    /// `if c { } else if d { } else { }`
    If(&'ast IfStmt<'ast>),
    /// `while c; post { }`
    While(&'ast WhileStmt<'ast>),
    /// `loop { }`
    Loop(LoopStmt<'ast>),
    /// `defer stmt` / `defer { }`
    Defer(&'ast DeferStmt<'ast>),
    /// `{ ... }`
    Block(Block<'ast>),
    /// `expr;`
    Expr(ExprStmt<'ast>),
}

impl<'ast> Stmt<'ast> {
    /// Get the source span of this statement.
    pub fn span(&self) -> Span {
        match self {
            Self::Let(d) | Self::Mut(d) => d.span,
            Self::TypeAlias(d) => d.span,
            Self::Return(s) => s.span,
            Self::Break(span) | Self::Next(span) => *span,
            Self::Label(name) => name.span,
            Self::Jump(s) => s.span,
            Self::If(s) => s.span,
            Self::While(s) => s.span,
            Self::Loop(s) => s.span,
            Self::Defer(s) => s.span,
            Self::Block(b) => b.span,
            Self::Expr(s) => s.span,
        }
    }
}

/// A braced sequence of statements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block<'ast> {
    pub stmts: &'ast [Stmt<'ast>],
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnStmt<'ast> {
    pub value: Option<&'ast Expr<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpStmt<'ast> {
    pub label: Ident<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IfStmt<'ast> {
    pub condition: Expr<'ast>,
    pub then_block: Block<'ast>,
    /// `else if` arms in source order.
    pub else_ifs: &'ast [ElseIf<'ast>],
    pub else_block: Option<Block<'ast>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElseIf<'ast> {
    pub condition: Expr<'ast>,
    pub block: Block<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WhileStmt<'ast> {
    pub condition: Expr<'ast>,
    /// Expression run after each iteration: `while i < n; i += 1 { }`
    pub post: Option<Expr<'ast>>,
    pub body: Block<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopStmt<'ast> {
    pub body: Block<'ast>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeferStmt<'ast> {
    pub body: DeferBody<'ast>,
    pub span: Span,
}

/// What a `defer` postpones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferBody<'ast> {
    Stmt(&'ast Stmt<'ast>),
    Block(Block<'ast>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprStmt<'ast> {
    pub expr: Expr<'ast>,
    pub span: Span,
}
