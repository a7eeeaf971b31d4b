//! Lowering from AST to IR.
//!
//! Each unit is lowered in sweeps so that declarations can refer to each
//! other regardless of source order:
//!
//! 1. Register structures (empty), impls and traits.
//! 2. Fill structure fields and type aliases, then impl methods.
//! 3. Lower top-level functions and globals.
//!
//! Impls, traits, structures, methods, functions and parameters are
//! flagged when declared twice; the first declaration is kept.
//!
//! Lowering never fails outright. Problems become diagnostics tagged with
//! the unit index. Only an internal inconsistency stops the unit.

mod expr;
mod stmt;
mod types;

pub use expr::flatten;

use crate::ir::{Global, Impl, Module, Name, Structure, Trait, TraitMethod, TypeAlias};
use indexmap::IndexMap;
use krug_core::{CompilationError, Diagnostic, Diagnostics};
use krug_parser::ast::{Item, Script, StructDecl};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

/// Builds a [`Module`] from parsed scripts.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use krug_compiler::IrBuilder;
/// use krug_parser::Parser;
///
/// let arena = Bump::new();
/// let script = Parser::parse("fn main() { return; }", &arena).unwrap();
///
/// let (module, diagnostics) = IrBuilder::build(&[script]);
/// assert!(diagnostics.is_empty());
/// assert!(module.functions.contains_key("main"));
/// ```
#[derive(Debug)]
pub struct IrBuilder {
    module: Module,
    diagnostics: Diagnostics,
    /// Index of the unit being lowered.
    unit: usize,
}

impl IrBuilder {
    pub fn new() -> Self {
        Self {
            module: Module::default(),
            diagnostics: Diagnostics::new(),
            unit: 0,
        }
    }

    /// Lower every script into one module.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(scripts: &[Script<'_>]) -> (Module, Diagnostics) {
        let mut builder = Self::new();
        for (unit, script) in scripts.iter().enumerate() {
            builder.build_unit(unit, script);
        }
        builder.finish()
    }

    /// Lower one unit into the module under construction.
    pub fn build_unit(&mut self, unit: usize, script: &Script<'_>) {
        self.unit = unit;
        if let Err(err) = self.lower_unit(script) {
            self.report(err);
        }
    }

    pub fn finish(self) -> (Module, Diagnostics) {
        debug!(
            structures = self.module.structures.len(),
            impls = self.module.impls.len(),
            functions = self.module.functions.len(),
            diagnostics = self.diagnostics.len(),
            "lowering finished"
        );
        (self.module, self.diagnostics)
    }

    /// Diagnostics reported so far.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub(crate) fn report(&mut self, err: CompilationError) {
        self.diagnostics.push(Diagnostic::from(err).in_unit(self.unit));
    }

    fn lower_unit(&mut self, script: &Script<'_>) -> Result<(), CompilationError> {
        // Items rejected as duplicates in the first sweep, by position.
        let mut skipped = FxHashSet::default();

        // ====================================================================
        // Sweep 1: register
        // ====================================================================

        for (index, item) in script.items().iter().enumerate() {
            let duplicate = match item {
                Item::Structure(decl) => !self.register_structure(decl),
                Item::Impl(decl) => {
                    let name = Name::from(decl.name);
                    if self.module.impls.contains_key(name.as_str()) {
                        self.duplicate("impl", &name);
                        true
                    } else {
                        trace!(name = %name, "registered impl");
                        self.module
                            .impls
                            .insert(name.value.clone(), Impl::new(name, self.unit));
                        false
                    }
                }
                Item::Trait(decl) => {
                    let name = Name::from(decl.name);
                    if self.module.traits.contains_key(name.as_str()) {
                        self.duplicate("trait", &name);
                        true
                    } else {
                        let mut methods = IndexMap::new();
                        for proto in decl.methods {
                            let Some(method_name) = proto.name.map(Name::from) else {
                                continue;
                            };
                            if methods.contains_key(method_name.as_str()) {
                                self.duplicate("method", &method_name);
                                continue;
                            }
                            let (params, return_type) = self.lower_signature(proto);
                            methods.insert(
                                method_name.value.clone(),
                                TraitMethod {
                                    name: method_name,
                                    params,
                                    return_type,
                                },
                            );
                        }
                        trace!(name = %name, methods = methods.len(), "registered trait");
                        self.module.traits.insert(
                            name.value.clone(),
                            Trait {
                                name,
                                methods,
                                unit: self.unit,
                            },
                        );
                        false
                    }
                }
                _ => false,
            };
            if duplicate {
                skipped.insert(index);
            }
        }

        // ====================================================================
        // Sweep 2: fill structures and aliases, then methods
        // ====================================================================

        for (index, item) in script.items().iter().enumerate() {
            if skipped.contains(&index) {
                continue;
            }
            match item {
                Item::Structure(decl) => self.fill_structure(decl)?,
                Item::TypeAlias(decl) => {
                    let name = Name::from(decl.name);
                    let ty = self.lower_type(&decl.ty);
                    trace!(name = %name, "registered alias");
                    let alias = TypeAlias {
                        name,
                        ty,
                        unit: self.unit,
                    };
                    self.module.aliases.insert(alias.name.value.clone(), alias);
                }
                _ => {}
            }
        }

        for (index, item) in script.items().iter().enumerate() {
            if skipped.contains(&index) {
                continue;
            }
            if let Item::Impl(decl) = item {
                for method in decl.methods {
                    let function = self.lower_function(method)?;
                    let imp = self.module.impls.get_mut(decl.name.name).ok_or_else(|| {
                        CompilationError::Internal {
                            message: format!("impl '{}' was not registered", decl.name),
                            span: decl.name.span,
                        }
                    })?;
                    let name = function.name.clone();
                    if !imp.register_method(function) {
                        self.duplicate("method", &name);
                    }
                }
            }
        }

        // ====================================================================
        // Sweep 3: functions and globals
        // ====================================================================

        for item in script.items() {
            match item {
                Item::Function(decl) => {
                    let function = self.lower_function(decl)?;
                    if self.module.functions.contains_key(function.name.as_str()) {
                        self.duplicate("function", &function.name);
                        continue;
                    }
                    trace!(name = %function.name, params = function.params.len(), "lowered function");
                    self.module
                        .functions
                        .insert(function.name.value.clone(), function);
                }
                Item::Global(decl) => {
                    if let Some(local) = self.lower_local(decl) {
                        trace!(name = %local.name, "lowered global");
                        self.module.globals.push(Global {
                            local,
                            unit: self.unit,
                        });
                    }
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Returns `false` if a structure of that name already exists.
    fn register_structure(&mut self, decl: &StructDecl<'_>) -> bool {
        let name = Name::from(decl.name);
        if self.module.structures.contains_key(name.as_str()) {
            self.duplicate("structure", &name);
            return false;
        }
        trace!(name = %name, "registered structure");
        self.module
            .structures
            .insert(name.value.clone(), Structure::new(name, self.unit));
        true
    }

    fn fill_structure(&mut self, decl: &StructDecl<'_>) -> Result<(), CompilationError> {
        let fields = self.lower_fields(&decl.body);
        let structure = self.module.structures.get_mut(decl.name.name).ok_or_else(|| {
            CompilationError::Internal {
                message: format!("structure '{}' was not registered", decl.name),
                span: decl.name.span,
            }
        })?;
        structure.fields = fields;
        Ok(())
    }

    fn duplicate(&mut self, kind: &'static str, name: &Name) {
        self.report(CompilationError::DuplicateDeclaration {
            kind,
            name: name.value.clone(),
            span: name.span,
        });
    }
}

impl Default for IrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
