//! IR types.

use super::value::Value;
use super::Name;
use indexmap::IndexMap;
use std::fmt;

/// Built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Void,
    Bool,
    Rune,
    S8,
    S16,
    S32,
    S64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Int,
    Uint,
    String,
}

impl Primitive {
    /// Look up a primitive by its source name.
    pub fn from_name(name: &str) -> Option<Self> {
        use Primitive::*;
        Some(match name {
            "void" => Void,
            "bool" => Bool,
            "rune" => Rune,
            "s8" => S8,
            "s16" => S16,
            "s32" => S32,
            "s64" => S64,
            "u8" => U8,
            "u16" => U16,
            "u32" => U32,
            "u64" => U64,
            "f32" => F32,
            "f64" => F64,
            "int" => Int,
            "uint" => Uint,
            "string" => String,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        use Primitive::*;
        match self {
            Void => "void",
            Bool => "bool",
            Rune => "rune",
            S8 => "s8",
            S16 => "s16",
            S32 => "s32",
            S64 => "s64",
            U8 => "u8",
            U16 => "u16",
            U32 => "u32",
            U64 => "u64",
            F32 => "f32",
            F64 => "f64",
            Int => "int",
            Uint => "uint",
            String => "string",
        }
    }
}

/// A type in the IR.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(Primitive),
    /// `*T`
    Pointer(Box<Type>),
    /// `[T; size]`. The size is kept as an unevaluated value.
    Array { base: Box<Type>, size: Box<Value> },
    /// `(A, B, ...)`
    Tuple(Vec<Type>),
    /// A name not yet bound to a structure.
    Reference(Name),
    /// A structure, bound in place of a reference.
    Structure(Structure),
}

impl Type {
    /// The canonical default return type.
    pub const VOID: Type = Type::Primitive(Primitive::Void);

    /// Whether this is a reference still waiting to be bound.
    pub fn is_reference(&self) -> bool {
        matches!(self, Type::Reference(_))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Primitive(p) => f.write_str(p.name()),
            Type::Pointer(base) => write!(f, "*{base}"),
            Type::Array { base, .. } => write!(f, "[{base}; _]"),
            Type::Tuple(elements) => {
                f.write_str("(")?;
                for (i, ty) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{ty}")?;
                }
                f.write_str(")")
            }
            Type::Reference(name) => write!(f, "{name}"),
            Type::Structure(s) => write!(f, "{}", s.name),
        }
    }
}

/// A named structure with ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub name: Name,
    pub fields: IndexMap<String, Field>,
    /// Unit the structure was declared in.
    pub unit: usize,
}

impl Structure {
    /// A structure with no fields yet.
    pub fn new(name: Name, unit: usize) -> Self {
        Self {
            name,
            fields: IndexMap::new(),
            unit,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }
}

/// One structure field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Name,
    pub owned: bool,
    pub ty: Type,
}
