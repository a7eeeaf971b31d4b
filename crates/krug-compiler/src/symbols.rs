//! Scope-chained symbol tables.
//!
//! Tables live in a [`la_arena::Arena`] owned by the module. Each table
//! links to its parent by index, so the chain is a tree rooted at the
//! module scope and no table owns another.

use crate::ir::Type;
use la_arena::{Arena, Idx};
use rustc_hash::FxHashMap;

/// Index of a [`SymbolTable`] in the module's scope arena.
pub type ScopeId = Idx<SymbolTable>;

/// What a symbol was declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Global,
    Function,
    Param,
    Local,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Filled in by type declaration.
    pub ty: Option<Type>,
}

/// The bindings of a single scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolTable {
    pub outer: Option<ScopeId>,
    symbols: FxHashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new(outer: Option<ScopeId>) -> Self {
        Self {
            outer,
            symbols: FxHashMap::default(),
        }
    }

    /// Declare `name` in this scope. A redeclaration replaces the earlier one.
    pub fn declare(&mut self, name: impl Into<String>, kind: SymbolKind) {
        let name = name.into();
        self.symbols.insert(
            name.clone(),
            Symbol {
                name,
                kind,
                ty: None,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Register a type for `name`, declaring it as a local if needed.
    pub fn set_type(&mut self, name: &str, ty: Type) {
        match self.symbols.get_mut(name) {
            Some(symbol) => symbol.ty = Some(ty),
            None => {
                self.symbols.insert(
                    name.to_string(),
                    Symbol {
                        name: name.to_string(),
                        kind: SymbolKind::Local,
                        ty: Some(ty),
                    },
                );
            }
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Walk the chain starting at `scope` and return the innermost binding.
pub fn lookup<'a>(scopes: &'a Arena<SymbolTable>, mut scope: ScopeId, name: &str) -> Option<&'a Symbol> {
    loop {
        let table = &scopes[scope];
        if let Some(symbol) = table.get(name) {
            return Some(symbol);
        }
        scope = table.outer?;
    }
}
