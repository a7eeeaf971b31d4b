//! Operator definitions for Krug expressions.
//!
//! Provides enums for binary, unary and assignment operators plus the
//! builtin pseudo-calls, along with the precedence table used by the
//! precedence-climbing expression parser.

use std::fmt;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `&&`
    LogicalAnd,
    /// `||`
    LogicalOr,
}

impl BinaryOp {
    /// Precedence level. Higher values bind more tightly.
    pub fn precedence(&self) -> u8 {
        use BinaryOp::*;
        match self {
            Mul | Div | Mod => 5,
            Add | Sub => 4,
            Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => 3,
            LogicalAnd => 2,
            LogicalOr => 1,
        }
    }

    /// Try to convert a symbol lexeme to a binary operator.
    pub fn from_symbol(sym: &str) -> Option<Self> {
        use BinaryOp::*;
        Some(match sym {
            "*" => Mul,
            "/" => Div,
            "%" => Mod,
            "+" => Add,
            "-" => Sub,
            "==" => Equal,
            "!=" => NotEqual,
            "<" => Less,
            "<=" => LessEqual,
            ">" => Greater,
            ">=" => GreaterEqual,
            "&&" => LogicalAnd,
            "||" => LogicalOr,
            _ => return None,
        })
    }

    /// The operator's source spelling.
    pub fn as_str(&self) -> &'static str {
        use BinaryOp::*;
        match self {
            Mul => "*",
            Div => "/",
            Mod => "%",
            Add => "+",
            Sub => "-",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            LogicalAnd => "&&",
            LogicalOr => "||",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `!`
    Not,
    /// `+`
    Plus,
    /// `@` (dereference)
    Deref,
    /// `&` (address-of)
    AddressOf,
    /// `~`
    Tilde,
}

impl UnaryOp {
    /// Try to convert a symbol lexeme to a unary operator.
    pub fn from_symbol(sym: &str) -> Option<Self> {
        Some(match sym {
            "-" => UnaryOp::Neg,
            "!" => UnaryOp::Not,
            "+" => UnaryOp::Plus,
            "@" => UnaryOp::Deref,
            "&" => UnaryOp::AddressOf,
            "~" => UnaryOp::Tilde,
            _ => return None,
        })
    }

    /// The operator's source spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::Plus => "+",
            UnaryOp::Deref => "@",
            UnaryOp::AddressOf => "&",
            UnaryOp::Tilde => "~",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubAssign,
    /// `*=`
    MulAssign,
    /// `/=`
    DivAssign,
}

impl AssignOp {
    /// The compound operator formed by `sym` followed directly by `=`.
    pub fn compound(sym: &str) -> Option<Self> {
        Some(match sym {
            "+" => AssignOp::AddAssign,
            "-" => AssignOp::SubAssign,
            "*" => AssignOp::MulAssign,
            "/" => AssignOp::DivAssign,
            _ => return None,
        })
    }

    /// The operator's source spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
        }
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builtin pseudo-calls written `name!operand`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// `alloc!T`
    Alloc,
    /// `sizeof!T`
    Sizeof,
    /// `len!value`
    Len,
    /// `free!value`
    Free,
    /// `move!value`
    Move,
    /// `ref!value`
    Ref,
}

impl Builtin {
    /// Look up a builtin by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "alloc" => Builtin::Alloc,
            "sizeof" => Builtin::Sizeof,
            "len" => Builtin::Len,
            "free" => Builtin::Free,
            "move" => Builtin::Move,
            "ref" => Builtin::Ref,
            _ => return None,
        })
    }

    /// Whether the operand names a type rather than a value.
    pub fn takes_type(&self) -> bool {
        matches!(self, Builtin::Alloc | Builtin::Sizeof)
    }

    /// The builtin's name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Builtin::Alloc => "alloc",
            Builtin::Sizeof => "sizeof",
            Builtin::Len => "len",
            Builtin::Free => "free",
            Builtin::Move => "move",
            Builtin::Ref => "ref",
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!", self.as_str())
    }
}
