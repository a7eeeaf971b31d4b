//! Module-level IR: functions, impls, traits and the module container.

use super::instr::{Block, Local};
use super::types::{Structure, Type};
use super::Name;
use crate::symbols::{self, ScopeId, Symbol, SymbolTable};
use indexmap::IndexMap;
use krug_core::Span;
use la_arena::Arena;

/// A function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: Name,
    pub owned: bool,
    pub mutable: bool,
    pub ty: Type,
}

/// A lowered function or method.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Name,
    /// Parameters in declaration order.
    pub params: IndexMap<String, Param>,
    pub return_type: Type,
    pub body: Block,
    /// Holds the parameters. Parent is the module root.
    pub scope: ScopeId,
    pub unit: usize,
    pub span: Span,
}

impl Function {
    /// Parameter mutability, parallel to `params`.
    pub fn mutability(&self) -> impl Iterator<Item = bool> + '_ {
        self.params.values().map(|p| p.mutable)
    }

    /// Parameter types keyed by name.
    pub fn param_types(&self) -> impl Iterator<Item = (&str, &Type)> + '_ {
        self.params.iter().map(|(name, p)| (name.as_str(), &p.ty))
    }
}

/// Methods attached to a named type.
#[derive(Debug, Clone, PartialEq)]
pub struct Impl {
    pub name: Name,
    pub methods: IndexMap<String, Function>,
    pub unit: usize,
}

impl Impl {
    pub fn new(name: Name, unit: usize) -> Self {
        Self {
            name,
            methods: IndexMap::new(),
            unit,
        }
    }

    /// Add a method. Returns `false` and leaves the impl untouched if a
    /// method of that name already exists.
    pub fn register_method(&mut self, method: Function) -> bool {
        if self.methods.contains_key(method.name.as_str()) {
            return false;
        }
        self.methods.insert(method.name.value.clone(), method);
        true
    }
}

/// A trait method signature.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitMethod {
    pub name: Name,
    pub params: IndexMap<String, Param>,
    pub return_type: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trait {
    pub name: Name,
    pub methods: IndexMap<String, TraitMethod>,
    pub unit: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub name: Name,
    pub ty: Type,
    pub unit: usize,
}

/// A top-level `let`/`mut`.
#[derive(Debug, Clone, PartialEq)]
pub struct Global {
    pub local: Local,
    pub unit: usize,
}

/// The result of lowering one or more units.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub structures: IndexMap<String, Structure>,
    pub impls: IndexMap<String, Impl>,
    /// Top-level functions in declaration order.
    pub functions: IndexMap<String, Function>,
    pub traits: IndexMap<String, Trait>,
    pub aliases: IndexMap<String, TypeAlias>,
    pub globals: Vec<Global>,
    /// Every scope of the module.
    pub scopes: Arena<SymbolTable>,
    pub root: ScopeId,
    /// References left unbound by type declaration.
    pub unresolved_references: Vec<Name>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        let mut scopes = Arena::new();
        let root = scopes.alloc(SymbolTable::new(None));
        Self {
            name: name.into(),
            structures: IndexMap::new(),
            impls: IndexMap::new(),
            functions: IndexMap::new(),
            traits: IndexMap::new(),
            aliases: IndexMap::new(),
            globals: Vec::new(),
            scopes,
            root,
            unresolved_references: Vec::new(),
        }
    }

    /// Allocate a fresh scope under `outer`.
    pub fn new_scope(&mut self, outer: ScopeId) -> ScopeId {
        self.scopes.alloc(SymbolTable::new(Some(outer)))
    }

    pub fn scope(&self, id: ScopeId) -> &SymbolTable {
        &self.scopes[id]
    }

    /// Resolve `name` starting at `scope` and walking outward.
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        symbols::lookup(&self.scopes, scope, name)
    }
}

impl Default for Module {
    fn default() -> Self {
        Module::new("main")
    }
}
