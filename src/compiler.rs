//! The staged front-end pipeline.
//!
//! Lex and parse every unit, lower them into one module, then run scope
//! resolution and type declaration. Diagnostics accumulate across stages.
//! A fatal diagnostic stops the pipeline after the stage that produced it
//! unless [`BuildOptions::abort_on_fatal`] is off.

use bumpalo::Bump;
use krug_compiler::ir::Module;
use krug_compiler::{BuildOptions, IrBuilder, ScopeResolutionPass, TypeDeclarationPass};
use krug_core::{Diagnostic, Diagnostics};
use krug_parser::{parse, tokenize, Script};
use tracing::{debug, info_span, warn};

/// Everything a build produces.
#[derive(Debug)]
pub struct CompileOutput {
    /// The module, possibly partial if the build was aborted.
    pub module: Module,
    pub diagnostics: Diagnostics,
    /// Whether a fatal diagnostic stopped the pipeline early.
    pub aborted: bool,
}

impl CompileOutput {
    /// Completed with no diagnostics at all.
    pub fn is_success(&self) -> bool {
        !self.aborted && self.diagnostics.is_empty()
    }
}

/// Runs the pipeline with a fixed set of [`BuildOptions`].
///
/// # Example
///
/// ```
/// use krug::Compiler;
///
/// let output = Compiler::new().compile(&["fn main() int { let x int = 1; return x; }"]);
/// assert!(!output.aborted);
/// assert!(output.module.functions.contains_key("main"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: BuildOptions,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    /// Compile the given sources, one unit each, in order.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(&self, sources: &[&str]) -> CompileOutput {
        let arena = Bump::new();
        let mut diagnostics = Diagnostics::new();

        let scripts = {
            let _stage = info_span!("parse", units = sources.len()).entered();
            let scripts: Vec<Script<'_>> = sources
                .iter()
                .enumerate()
                .map(|(unit, source)| parse_unit(unit, source, &arena, &mut diagnostics))
                .collect();
            debug!(diagnostics = diagnostics.len(), "parsing finished");
            scripts
        };

        let mut module = {
            let _stage = info_span!("lower").entered();
            let mut builder = IrBuilder::new();
            for (unit, script) in scripts.iter().enumerate() {
                builder.build_unit(unit, script);
            }
            let (module, lowered) = builder.finish();
            diagnostics.extend(lowered);
            module
        };
        if self.should_abort(&diagnostics, "lower") {
            return self.finish(module, diagnostics, true);
        }

        {
            let _stage = info_span!("resolve").entered();
            let output = ScopeResolutionPass::new(&mut module).run();
            debug!(
                resolved = output.symbols_resolved,
                diagnostics = output.errors.len(),
                "scope resolution"
            );
            diagnostics.extend(output.errors);
        }
        if self.should_abort(&diagnostics, "resolve") {
            return self.finish(module, diagnostics, true);
        }

        {
            let _stage = info_span!("declare").entered();
            let output = TypeDeclarationPass::new(&mut module)
                .strict_references(self.options.strict_references)
                .run();
            debug!(
                registered = output.types_registered,
                bound = output.references_bound,
                unresolved = module.unresolved_references.len(),
                "type declaration"
            );
            diagnostics.extend(output.errors);
        }
        let aborted = self.should_abort(&diagnostics, "declare");
        self.finish(module, diagnostics, aborted)
    }

    /// Render diagnostics as `unit:line:col: kind: message`, one per line.
    pub fn render(&self, diagnostics: &Diagnostics, sources: &[&str]) -> String {
        diagnostics
            .iter()
            .map(|d| {
                let name = self.options.unit_name(d.unit);
                match sources.get(d.unit) {
                    Some(source) => d.display_with_source(&name, source),
                    None => format!("{name}: {d}"),
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn should_abort(&self, diagnostics: &Diagnostics, stage: &str) -> bool {
        let abort = self.options.abort_on_fatal && diagnostics.has_fatal();
        if abort {
            warn!(stage, "build aborted by a fatal diagnostic");
        }
        abort
    }

    fn finish(&self, module: Module, mut diagnostics: Diagnostics, aborted: bool) -> CompileOutput {
        if let Some(max) = self.options.max_diagnostics {
            diagnostics.truncate(max);
        }
        CompileOutput {
            module,
            diagnostics,
            aborted,
        }
    }
}

/// Lex and parse one unit, recording its problems.
fn parse_unit<'ast>(unit: usize, source: &str, arena: &'ast Bump, diagnostics: &mut Diagnostics) -> Script<'ast> {
    let (tokens, lex_errors) = tokenize(source);
    for err in lex_errors {
        diagnostics.push(Diagnostic::from(err).in_unit(unit));
    }
    let (script, parse_errors) = parse(&tokens, arena);
    for err in parse_errors {
        diagnostics.push(Diagnostic::from(err).in_unit(unit));
    }
    debug!(unit, tokens = tokens.len(), items = script.items().len(), "parsed unit");
    script
}

/// Compile `sources` with default options.
pub fn compile(sources: &[&str]) -> CompileOutput {
    Compiler::new().compile(sources)
}
