//! Scope Resolution Pass - check that every name reference is visible.
//!
//! The root scope is seeded with top-level functions. Globals follow in
//! declaration order, each one after its initializer, which is the same rule
//! blocks apply to their locals. Each function then gets its parameters. A
//! name that cannot be found by walking outward from the current scope is an
//! `UnresolvedSymbol`.
//!
//! Types are walked too: the size of an array type is an ordinary value and
//! its names must be visible where the type is written.
//!
//! Only the head of a path is looked up. The remaining elements are member
//! accesses, so only the arguments and subscripts inside them are resolved.

use crate::ir::{
    Block, Defer, Function, Global, Impl, Instruction, Module, Name, Param, Structure, Trait, Type, TypeAlias, Value,
};
use crate::symbols::{self, ScopeId, SymbolKind, SymbolTable};
use indexmap::IndexMap;
use krug_core::{CompilationError, Diagnostic, Diagnostics};
use la_arena::Arena;
use tracing::debug;

/// Output of the scope resolution pass.
#[derive(Debug, Default)]
pub struct ResolutionOutput {
    /// Number of name references that resolved.
    pub symbols_resolved: usize,
    /// Collected diagnostics.
    pub errors: Diagnostics,
}

/// Scope Resolution Pass - walks every body with a scope cursor.
pub struct ScopeResolutionPass<'m> {
    scopes: &'m mut Arena<SymbolTable>,
    root: ScopeId,
    structures: &'m IndexMap<String, Structure>,
    impls: &'m IndexMap<String, Impl>,
    functions: &'m IndexMap<String, Function>,
    traits: &'m IndexMap<String, Trait>,
    aliases: &'m IndexMap<String, TypeAlias>,
    globals: &'m [Global],
    /// Unit of the declaration being walked.
    unit: usize,
    output: ResolutionOutput,
}

impl<'m> ScopeResolutionPass<'m> {
    /// Create a new scope resolution pass.
    pub fn new(module: &'m mut Module) -> Self {
        let Module {
            structures,
            impls,
            functions,
            traits,
            aliases,
            globals,
            scopes,
            root,
            ..
        } = module;

        Self {
            scopes,
            root: *root,
            structures,
            impls,
            functions,
            traits,
            aliases,
            globals,
            unit: 0,
            output: ResolutionOutput::default(),
        }
    }

    /// Run the scope resolution pass.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self) -> ResolutionOutput {
        let (root, globals, impls, functions) = (self.root, self.globals, self.impls, self.functions);
        for name in functions.keys() {
            self.scopes[root].declare(name.clone(), SymbolKind::Function);
        }

        for global in globals {
            self.unit = global.unit;
            let local = &global.local;
            if let Some(ty) = &local.ty {
                self.resolve_type(ty, root);
            }
            if let Some(value) = &local.value {
                self.resolve_value(value, root);
            }
            self.scopes[root].declare(local.name.value.clone(), SymbolKind::Global);
        }

        self.resolve_signatures(root);

        for imp in impls.values() {
            for method in imp.methods.values() {
                self.resolve_function(method);
            }
        }
        for function in functions.values() {
            self.resolve_function(function);
        }

        debug!(
            resolved = self.output.symbols_resolved,
            unresolved = self.output.errors.len(),
            "scope resolution finished"
        );
        self.output
    }

    /// Field, alias and trait prototype types, all written at the top level.
    fn resolve_signatures(&mut self, root: ScopeId) {
        let (structures, aliases, traits) = (self.structures, self.aliases, self.traits);
        for structure in structures.values() {
            self.unit = structure.unit;
            for field in structure.fields.values() {
                self.resolve_type(&field.ty, root);
            }
        }
        for alias in aliases.values() {
            self.unit = alias.unit;
            self.resolve_type(&alias.ty, root);
        }
        for tr in traits.values() {
            self.unit = tr.unit;
            for method in tr.methods.values() {
                self.resolve_params(method.params.values(), &method.return_type, root);
            }
        }
    }

    fn resolve_function(&mut self, function: &Function) {
        self.unit = function.unit;
        for name in function.params.keys() {
            self.scopes[function.scope].declare(name.clone(), SymbolKind::Param);
        }
        self.resolve_params(function.params.values(), &function.return_type, function.scope);
        self.resolve_block(&function.body);
    }

    fn resolve_params<'p>(&mut self, params: impl Iterator<Item = &'p Param>, ret: &Type, scope: ScopeId) {
        for param in params {
            self.resolve_type(&param.ty, scope);
        }
        self.resolve_type(ret, scope);
    }

    /// Array sizes are the only values a type can hold.
    fn resolve_type(&mut self, ty: &Type, scope: ScopeId) {
        match ty {
            Type::Pointer(base) => self.resolve_type(base, scope),
            Type::Array { base, size } => {
                self.resolve_type(base, scope);
                self.resolve_value(size, scope);
            }
            Type::Tuple(elements) => {
                for element in elements {
                    self.resolve_type(element, scope);
                }
            }
            // Names in type position are bound by type declaration.
            Type::Primitive(_) | Type::Reference(_) | Type::Structure(_) => {}
        }
    }

    fn resolve_block(&mut self, block: &Block) {
        let scope = block.scope;
        for instruction in &block.instructions {
            self.resolve_instruction(instruction, scope);
        }
        for defer in &block.deferred {
            self.resolve_defer(defer, scope);
        }
        if let Some(value) = block.ret.as_ref().and_then(|ret| ret.value.as_ref()) {
            self.resolve_value(value, scope);
        }
    }

    fn resolve_defer(&mut self, defer: &Defer, scope: ScopeId) {
        match defer {
            Defer::Statement(instruction) => self.resolve_instruction(instruction, scope),
            Defer::Block(block) => self.resolve_block(block),
        }
    }

    fn resolve_instruction(&mut self, instruction: &Instruction, scope: ScopeId) {
        match instruction {
            Instruction::Local(local) => {
                if let Some(ty) = &local.ty {
                    self.resolve_type(ty, scope);
                }
                if let Some(value) = &local.value {
                    self.resolve_value(value, scope);
                }
                self.scopes[scope].declare(local.name.value.clone(), SymbolKind::Local);
            }
            Instruction::Return(ret) => {
                if let Some(value) = &ret.value {
                    self.resolve_value(value, scope);
                }
            }
            Instruction::If(stmt) => {
                self.resolve_value(&stmt.cond, scope);
                self.resolve_block(&stmt.then_block);
                for branch in &stmt.else_ifs {
                    self.resolve_value(&branch.cond, scope);
                    self.resolve_block(&branch.block);
                }
                if let Some(block) = &stmt.else_block {
                    self.resolve_block(block);
                }
            }
            Instruction::While(stmt) => {
                self.resolve_value(&stmt.cond, scope);
                if let Some(post) = &stmt.post {
                    self.resolve_value(post, scope);
                }
                self.resolve_block(&stmt.body);
            }
            Instruction::Loop(stmt) => self.resolve_block(&stmt.body),
            Instruction::Block(block) => self.resolve_block(block),
            Instruction::Expression { value, .. } => self.resolve_value(value, scope),
            Instruction::Defer(defer) => self.resolve_defer(defer, scope),
            Instruction::Break(_) | Instruction::Next(_) | Instruction::Jump(_) | Instruction::Label(_) => {}
        }
    }

    fn resolve_value(&mut self, value: &Value, scope: ScopeId) {
        match value {
            Value::Integer(_)
            | Value::Float(_)
            | Value::String(_)
            | Value::Char(_)
            | Value::Placeholder => {}
            Value::Type(ty) => self.resolve_type(ty, scope),
            Value::Identifier(name) => self.resolve_name(name, scope),
            Value::Binary { lhs, rhs, .. } => {
                self.resolve_value(lhs, scope);
                self.resolve_value(rhs, scope);
            }
            Value::Unary { operand, .. } => self.resolve_value(operand, scope),
            Value::Grouping(inner) => self.resolve_value(inner, scope),
            Value::List(values) => self.resolve_values(values, scope),
            Value::Call { callee, args } => {
                self.resolve_value(callee, scope);
                self.resolve_values(args, scope);
            }
            Value::Index { base, subscript } => {
                self.resolve_value(base, scope);
                self.resolve_value(subscript, scope);
            }
            Value::Path(elements) => {
                let Some((head, members)) = elements.split_first() else {
                    return;
                };
                match head {
                    // `Type.method()` names an impl directly.
                    Value::Identifier(name) if self.impls.contains_key(name.as_str()) => {
                        self.output.symbols_resolved += 1;
                    }
                    _ => self.resolve_value(head, scope),
                }
                for member in members {
                    self.resolve_member(member, scope);
                }
            }
            Value::Init { name, values, .. } => {
                if let Some(name) = name {
                    if self.structures.contains_key(name.as_str()) {
                        self.output.symbols_resolved += 1;
                    } else {
                        self.unresolved(name);
                    }
                }
                self.resolve_values(values, scope);
            }
            Value::Assign { lhs, rhs, .. } => {
                self.resolve_value(lhs, scope);
                self.resolve_value(rhs, scope);
            }
            Value::Builtin { args, .. } => self.resolve_values(args, scope),
        }
    }

    fn resolve_values(&mut self, values: &[Value], scope: ScopeId) {
        for value in values {
            self.resolve_value(value, scope);
        }
    }

    /// A path element after the head. Member names are not looked up.
    fn resolve_member(&mut self, member: &Value, scope: ScopeId) {
        match member {
            Value::Identifier(_) => {}
            Value::Call { callee, args } => {
                self.resolve_member(callee, scope);
                self.resolve_values(args, scope);
            }
            Value::Index { base, subscript } => {
                self.resolve_member(base, scope);
                self.resolve_value(subscript, scope);
            }
            other => self.resolve_value(other, scope),
        }
    }

    fn resolve_name(&mut self, name: &Name, scope: ScopeId) {
        if symbols::lookup(self.scopes, scope, name.as_str()).is_some() {
            self.output.symbols_resolved += 1;
        } else {
            self.unresolved(name);
        }
    }

    fn unresolved(&mut self, name: &Name) {
        let err = CompilationError::UnresolvedSymbol {
            name: name.value.clone(),
            span: name.span,
        };
        self.output.errors.push(Diagnostic::from(err).in_unit(self.unit));
    }
}

/// Run scope resolution over `module` and return its diagnostics.
pub fn resolve_symbols(module: &mut Module) -> Diagnostics {
    ScopeResolutionPass::new(module).run().errors
}
