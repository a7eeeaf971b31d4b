//! IR instructions.

use super::types::Type;
use super::value::Value;
use super::Name;
use crate::symbols::ScopeId;
use bitflags::bitflags;
use krug_core::Span;

bitflags! {
    /// Binding properties of a local or global.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LocalFlags: u8 {
        /// The binding owns its value (no `~`).
        const OWNED = 1 << 0;
        /// Declared with `mut`.
        const MUTABLE = 1 << 1;
    }
}

/// A single instruction inside a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Local(Local),
    Return(Return),
    If(IfStatement),
    While(WhileLoop),
    Loop(Loop),
    Block(Block),
    Break(Span),
    Next(Span),
    Jump(Name),
    Label(Name),
    Expression { value: Value, span: Span },
    Defer(Defer),
}

/// `let`/`mut` binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Local {
    pub name: Name,
    /// Rewritten in place by type declaration.
    pub ty: Option<Type>,
    pub flags: LocalFlags,
    pub value: Option<Value>,
}

impl Local {
    #[inline]
    pub fn is_owned(&self) -> bool {
        self.flags.contains(LocalFlags::OWNED)
    }

    #[inline]
    pub fn is_mutable(&self) -> bool {
        self.flags.contains(LocalFlags::MUTABLE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Option<Value>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    pub cond: Value,
    pub then_block: Block,
    pub else_ifs: Vec<ElseIf>,
    pub else_block: Option<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub cond: Value,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub cond: Value,
    pub post: Option<Value>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub body: Block,
}

/// Work postponed to the end of the enclosing block.
#[derive(Debug, Clone, PartialEq)]
pub enum Defer {
    Statement(Box<Instruction>),
    Block(Block),
}

/// A lowered block.
///
/// Deferred work and the trailing return are kept apart from the
/// instruction list.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub instructions: Vec<Instruction>,
    pub deferred: Vec<Defer>,
    pub ret: Option<Return>,
    /// The block's own scope.
    pub scope: ScopeId,
    pub span: Span,
}

impl Block {
    pub fn new(scope: ScopeId, span: Span) -> Self {
        Self {
            instructions: Vec::new(),
            deferred: Vec::new(),
            ret: None,
            scope,
            span,
        }
    }
}
