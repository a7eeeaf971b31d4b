//! Type Declaration Pass - bind reference types and register local types.
//!
//! A `Reference` is replaced in place by the structure of that name, or
//! failing that by the target of a type alias. Whatever cannot be bound is
//! left as a reference and recorded in `Module::unresolved_references`.
//!
//! ## Order
//!
//! 1. Structure fields, bound against a snapshot of the structures as
//!    lowered. Forward references between structures resolve and a
//!    self-referential structure stays finite.
//! 2. Type alias targets.
//! 3. Globals, in the root scope.
//! 4. Functions in declaration order, then impl methods.
//! 5. Trait signatures.

use crate::ir::{Block, Defer, Function, Instruction, Local, Module, Name, Structure, Type, TypeAlias, Value};
use crate::symbols::{ScopeId, SymbolTable};
use indexmap::IndexMap;
use krug_core::{CompilationError, Diagnostic, Diagnostics};
use la_arena::Arena;
use tracing::debug;

/// Output of the type declaration pass.
#[derive(Debug, Default)]
pub struct DeclarationOutput {
    /// Number of local, global and parameter types registered into scopes.
    pub types_registered: usize,
    /// Number of references bound to a structure or alias.
    pub references_bound: usize,
    /// Collected diagnostics.
    pub errors: Diagnostics,
}

/// Type Declaration Pass - rewrites types in place.
pub struct TypeDeclarationPass<'m> {
    module: &'m mut Module,
    strict_references: bool,
}

impl<'m> TypeDeclarationPass<'m> {
    /// Create a new type declaration pass.
    pub fn new(module: &'m mut Module) -> Self {
        Self {
            module,
            strict_references: false,
        }
    }

    /// Also report every reference left unbound as `UnresolvedSymbol`.
    pub fn strict_references(mut self, strict: bool) -> Self {
        self.strict_references = strict;
        self
    }

    /// Run the type declaration pass.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(self) -> DeclarationOutput {
        let Module {
            structures,
            impls,
            functions,
            traits,
            aliases,
            globals,
            scopes,
            root,
            unresolved_references,
            ..
        } = self.module;

        let mut declarer = Declarer {
            scopes,
            unresolved: Vec::new(),
            unit: 0,
            strict: self.strict_references,
            output: DeclarationOutput::default(),
        };

        let lowered_structures = structures.clone();
        let lowered_aliases = aliases.clone();
        let binder = Binder {
            structures: &lowered_structures,
            aliases: &lowered_aliases,
        };
        for structure in structures.values_mut() {
            declarer.unit = structure.unit;
            for field in structure.fields.values_mut() {
                declarer.bind(&binder, &mut field.ty);
            }
        }

        let binder = Binder {
            structures,
            aliases: &lowered_aliases,
        };
        for alias in aliases.values_mut() {
            declarer.bind(&binder, &mut alias.ty);
        }

        for global in globals.iter_mut() {
            declarer.unit = global.unit;
            declarer.visit_local(&binder, &mut global.local, *root);
        }
        for function in functions.values_mut() {
            declarer.visit_function(&binder, function);
        }
        for imp in impls.values_mut() {
            for method in imp.methods.values_mut() {
                declarer.visit_function(&binder, method);
            }
        }
        for tr in traits.values_mut() {
            declarer.unit = tr.unit;
            for method in tr.methods.values_mut() {
                for param in method.params.values_mut() {
                    declarer.bind(&binder, &mut param.ty);
                }
                declarer.bind(&binder, &mut method.return_type);
            }
        }

        debug!(
            registered = declarer.output.types_registered,
            bound = declarer.output.references_bound,
            unresolved = declarer.unresolved.len(),
            "type declaration finished"
        );
        unresolved_references.extend(declarer.unresolved);
        declarer.output
    }
}

/// Run type declaration over `module` and return its diagnostics.
pub fn declare_types(module: &mut Module) -> Diagnostics {
    TypeDeclarationPass::new(module).run().errors
}

// ============================================================================
// Binding
// ============================================================================

/// Looks reference names up in a fixed view of the module's types.
struct Binder<'a> {
    structures: &'a IndexMap<String, Structure>,
    aliases: &'a IndexMap<String, TypeAlias>,
}

impl Binder<'_> {
    /// Bind every reference inside `ty`. Unbound names are pushed to
    /// `unresolved`. Returns the number of references bound.
    fn bind(&self, ty: &mut Type, unresolved: &mut Vec<Name>, expanding: &mut Vec<String>) -> usize {
        match ty {
            Type::Reference(name) => {
                let name = name.clone();
                match self.lookup(&name, unresolved, expanding) {
                    Some((bound, count)) => {
                        *ty = bound;
                        count + 1
                    }
                    None => {
                        unresolved.push(name);
                        0
                    }
                }
            }
            Type::Pointer(base) => self.bind(base, unresolved, expanding),
            Type::Array { base, .. } => self.bind(base, unresolved, expanding),
            Type::Tuple(elements) => elements
                .iter_mut()
                .map(|element| self.bind(element, unresolved, expanding))
                .sum(),
            Type::Primitive(_) | Type::Structure(_) => 0,
        }
    }

    fn lookup(
        &self,
        name: &Name,
        unresolved: &mut Vec<Name>,
        expanding: &mut Vec<String>,
    ) -> Option<(Type, usize)> {
        if let Some(structure) = self.structures.get(name.as_str()) {
            return Some((Type::Structure(structure.clone()), 0));
        }

        let alias = self.aliases.get(name.as_str())?;
        // An alias that refers back to itself stays unbound.
        if expanding.iter().any(|n| n == name.as_str()) {
            return None;
        }
        expanding.push(name.value.clone());
        let mut target = alias.ty.clone();
        let count = self.bind(&mut target, unresolved, expanding);
        expanding.pop();
        Some((target, count))
    }
}

/// Walks bodies, rewriting types and registering them into scopes.
struct Declarer<'a> {
    scopes: &'a mut Arena<SymbolTable>,
    unresolved: Vec<Name>,
    /// Unit of the declaration being visited.
    unit: usize,
    strict: bool,
    output: DeclarationOutput,
}

impl Declarer<'_> {
    fn bind(&mut self, binder: &Binder<'_>, ty: &mut Type) {
        let mut unresolved = Vec::new();
        self.output.references_bound += binder.bind(ty, &mut unresolved, &mut Vec::new());
        for name in unresolved {
            if self.strict {
                self.report(CompilationError::UnresolvedSymbol {
                    name: name.value.clone(),
                    span: name.span,
                });
            }
            self.unresolved.push(name);
        }
    }

    fn report(&mut self, err: CompilationError) {
        self.output.errors.push(Diagnostic::from(err).in_unit(self.unit));
    }

    fn register(&mut self, scope: ScopeId, name: &str, ty: &Type) {
        self.scopes[scope].set_type(name, ty.clone());
        self.output.types_registered += 1;
    }

    fn visit_function(&mut self, binder: &Binder<'_>, function: &mut Function) {
        self.unit = function.unit;
        for (name, param) in function.params.iter_mut() {
            self.bind(binder, &mut param.ty);
            self.register(function.scope, name, &param.ty);
        }
        self.bind(binder, &mut function.return_type);
        self.visit_block(binder, &mut function.body);
    }

    fn visit_local(&mut self, binder: &Binder<'_>, local: &mut Local, scope: ScopeId) {
        let Some(ty) = local.ty.as_mut() else {
            self.report(CompilationError::Unimplemented {
                feature: "type inference".to_string(),
                span: local.name.span,
            });
            return;
        };
        self.bind(binder, ty);
        self.register(scope, local.name.as_str(), ty);
    }

    fn visit_block(&mut self, binder: &Binder<'_>, block: &mut Block) {
        let scope = block.scope;
        for instruction in &mut block.instructions {
            self.visit_instruction(binder, instruction, scope);
        }
        for defer in &mut block.deferred {
            self.visit_defer(binder, defer, scope);
        }
    }

    fn visit_defer(&mut self, binder: &Binder<'_>, defer: &mut Defer, scope: ScopeId) {
        match defer {
            Defer::Statement(instruction) => self.visit_instruction(binder, instruction, scope),
            Defer::Block(block) => self.visit_block(binder, block),
        }
    }

    fn visit_instruction(&mut self, binder: &Binder<'_>, instruction: &mut Instruction, scope: ScopeId) {
        match instruction {
            Instruction::Local(local) => self.visit_local(binder, local, scope),
            Instruction::Block(block) => self.visit_block(binder, block),
            Instruction::If(stmt) => {
                self.visit_block(binder, &mut stmt.then_block);
                for branch in &mut stmt.else_ifs {
                    self.visit_block(binder, &mut branch.block);
                }
                if let Some(block) = &mut stmt.else_block {
                    self.visit_block(binder, block);
                }
            }
            Instruction::While(stmt) => self.visit_block(binder, &mut stmt.body),
            Instruction::Loop(stmt) => self.visit_block(binder, &mut stmt.body),
            Instruction::Defer(defer) => self.visit_defer(binder, defer, scope),
            Instruction::Return(_)
            | Instruction::Break(_)
            | Instruction::Next(_)
            | Instruction::Label(_)
            | Instruction::Jump(_) => {}
            Instruction::Expression { value: Value::Path(_), .. } => {}
            Instruction::Expression { value, span } => {
                self.report(CompilationError::Unimplemented {
                    feature: format!("type declaration for {} statement", value.kind_name()),
                    span: *span,
                });
            }
        }
    }
}
