//! IR values.

use super::types::Type;
use super::Name;
use krug_parser::ast::{AssignOp, BinaryOp, Builtin, InitKind, UnaryOp};
use ordered_float::OrderedFloat;

/// An expression in the IR.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(u128),
    Float(OrderedFloat<f64>),
    String(String),
    Char(char),
    Identifier(Name),
    Binary {
        op: BinaryOp,
        lhs: Box<Value>,
        rhs: Box<Value>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Value>,
    },
    Grouping(Box<Value>),
    /// `(a, b, ...)`
    List(Vec<Value>),
    Call {
        callee: Box<Value>,
        args: Vec<Value>,
    },
    Index {
        base: Box<Value>,
        subscript: Box<Value>,
    },
    /// A flat member chain; never contains a nested `Path`.
    Path(Vec<Value>),
    Init {
        kind: InitKind,
        name: Option<Name>,
        values: Vec<Value>,
    },
    Assign {
        lhs: Box<Value>,
        op: AssignOp,
        rhs: Box<Value>,
    },
    /// `alloc`/`sizeof` carry a type; the value builtins carry their
    /// operand as the first argument.
    Builtin {
        builtin: Builtin,
        ty: Option<Type>,
        args: Vec<Value>,
    },
    /// A type in value position.
    Type(Box<Type>),
    /// Stands in for constructs that are not lowered yet.
    Placeholder,
}

impl Value {
    pub fn binary(lhs: Value, op: BinaryOp, rhs: Value) -> Self {
        Value::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Char(_) => "char",
            Value::Identifier(_) => "identifier",
            Value::Binary { .. } => "binary",
            Value::Unary { .. } => "unary",
            Value::Grouping(_) => "grouping",
            Value::List(_) => "list",
            Value::Call { .. } => "call",
            Value::Index { .. } => "index",
            Value::Path(_) => "path",
            Value::Init { .. } => "initializer",
            Value::Assign { .. } => "assignment",
            Value::Builtin { .. } => "builtin",
            Value::Type(_) => "type",
            Value::Placeholder => "placeholder",
        }
    }
}
