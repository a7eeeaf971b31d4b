//! Compilation unit API.
//!
//! A [`Unit`] collects named source files, builds them together into one
//! module and keeps the result for inspection.
//!
//! # Example
//!
//! ```
//! use krug::Unit;
//!
//! let mut unit = Unit::new();
//! unit.add_source("shapes.krug", "type Square = struct { side int, };")?;
//! unit.add_source("main.krug", "fn area(s Square) int { return s.side; }")?;
//!
//! let output = unit.build()?;
//! assert!(output.is_success());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::compiler::{CompileOutput, Compiler};
use krug_compiler::BuildOptions;

/// Named sources built together.
///
/// Sources keep the order they were added in; that order is the unit index
/// carried by diagnostics.
#[derive(Debug, Default)]
pub struct Unit {
    /// (filename, source) in insertion order
    sources: Vec<(String, String)>,

    options: BuildOptions,

    /// Available after build
    output: Option<CompileOutput>,
}

impl Unit {
    /// Create a new empty unit with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty unit that builds with `options`.
    ///
    /// Unit names in `options` are replaced by the added filenames.
    pub fn with_options(options: BuildOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Append a named source.
    ///
    /// # Errors
    ///
    /// Fails if the unit was already built or a file of that name exists.
    pub fn add_source(&mut self, filename: impl Into<String>, source: impl Into<String>) -> Result<(), UnitError> {
        if self.output.is_some() {
            return Err(UnitError::AlreadyBuilt);
        }
        let filename = filename.into();
        if self.sources.iter().any(|(name, _)| *name == filename) {
            return Err(UnitError::DuplicateSource(filename));
        }
        self.sources.push((filename, source.into()));
        Ok(())
    }

    /// Replace the text of an existing file and drop any previous build.
    ///
    /// Returns whether the text actually changed.
    pub fn update_source(&mut self, filename: &str, source: impl Into<String>) -> Result<bool, UnitError> {
        let entry = self
            .sources
            .iter_mut()
            .find(|(name, _)| name == filename)
            .ok_or_else(|| UnitError::FileNotFound(filename.to_string()))?;

        let source = source.into();
        if entry.1 == source {
            return Ok(false);
        }
        entry.1 = source;
        self.output = None;
        Ok(true)
    }

    /// Build every source into one module.
    ///
    /// Problems in the sources are reported through the output's
    /// diagnostics. Only misuse of the unit itself is an error.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(&mut self) -> Result<&CompileOutput, BuildError> {
        if self.output.is_some() {
            return Err(BuildError::AlreadyBuilt);
        }
        if self.sources.is_empty() {
            return Err(BuildError::NoSources);
        }

        let options = self
            .options
            .clone()
            .with_unit_names(self.sources.iter().map(|(name, _)| name.clone()));
        let sources: Vec<&str> = self.sources.iter().map(|(_, source)| source.as_str()).collect();
        let output = Compiler::with_options(options).compile(&sources);

        Ok(self.output.insert(output))
    }

    /// Build again from the current sources.
    pub fn rebuild(&mut self) -> Result<&CompileOutput, BuildError> {
        self.output = None;
        self.build()
    }

    pub fn is_built(&self) -> bool {
        self.output.is_some()
    }

    /// The last build's output.
    pub fn output(&self) -> Option<&CompileOutput> {
        self.output.as_ref()
    }

    /// Render the last build's diagnostics against the unit's sources.
    pub fn render_diagnostics(&self) -> String {
        let Some(output) = &self.output else {
            return String::new();
        };
        let options = self
            .options
            .clone()
            .with_unit_names(self.sources.iter().map(|(name, _)| name.clone()));
        let sources: Vec<&str> = self.sources.iter().map(|(_, source)| source.as_str()).collect();
        Compiler::with_options(options).render(&output.diagnostics, &sources)
    }

    /// Forget every source and the last build.
    pub fn clear(&mut self) {
        self.sources.clear();
        self.output = None;
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Zero until built.
    pub fn function_count(&self) -> usize {
        self.output.as_ref().map_or(0, |o| o.module.functions.len())
    }

    /// Zero until built.
    pub fn structure_count(&self) -> usize {
        self.output.as_ref().map_or(0, |o| o.module.structures.len())
    }
}

/// Misuse of [`Unit::add_source`] or [`Unit::update_source`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnitError {
    #[error("unit has already been built; use update_source() or clear() first")]
    AlreadyBuilt,

    #[error("source '{0}' already added to unit")]
    DuplicateSource(String),

    #[error("file '{0}' not found in unit")]
    FileNotFound(String),
}

/// Why [`Unit::build`] refused to run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("no sources added to unit")]
    NoSources,

    #[error("unit has already been built")]
    AlreadyBuilt,
}

#[cfg(test)]
mod tests {
    use super::*;
    use krug_core::DiagnosticKind;

    #[test]
    fn create_empty_unit() {
        let unit = Unit::new();
        assert!(!unit.is_built());
        assert_eq!(unit.source_count(), 0);
        assert_eq!(unit.function_count(), 0);
    }

    #[test]
    fn build_simple_unit() {
        let mut unit = Unit::new();
        unit.add_source("main.krug", "fn main() { }").unwrap();

        let output = unit.build().unwrap();
        assert!(output.is_success());
        assert!(unit.is_built());
        assert_eq!(unit.function_count(), 1);
    }

    #[test]
    fn build_fails_with_no_sources() {
        let mut unit = Unit::new();
        assert_eq!(unit.build().unwrap_err(), BuildError::NoSources);
    }

    #[test]
    fn build_already_built() {
        let mut unit = Unit::new();
        unit.add_source("main.krug", "fn main() { }").unwrap();
        unit.build().unwrap();

        assert_eq!(unit.build().unwrap_err(), BuildError::AlreadyBuilt);
        assert_eq!(
            unit.add_source("other.krug", "fn other() { }"),
            Err(UnitError::AlreadyBuilt)
        );
    }

    #[test]
    fn duplicate_source_name() {
        let mut unit = Unit::new();
        unit.add_source("main.krug", "").unwrap();
        assert_eq!(
            unit.add_source("main.krug", ""),
            Err(UnitError::DuplicateSource("main.krug".to_string()))
        );
    }

    #[test]
    fn update_source_requires_rebuild() {
        let mut unit = Unit::new();
        unit.add_source("main.krug", "fn main() { return x; }").unwrap();
        assert_eq!(
            unit.build().unwrap().diagnostics.count_of(DiagnosticKind::UnresolvedSymbol),
            1
        );

        assert_eq!(unit.update_source("main.krug", "fn main() { return x; }"), Ok(false));
        assert!(unit.is_built());

        assert_eq!(unit.update_source("main.krug", "fn main(x int) { return x; }"), Ok(true));
        assert!(!unit.is_built());
        assert!(unit.build().unwrap().is_success());

        assert_eq!(
            unit.update_source("missing.krug", ""),
            Err(UnitError::FileNotFound("missing.krug".to_string()))
        );
    }

    #[test]
    fn diagnostics_render_with_filenames() {
        let mut unit = Unit::new();
        unit.add_source("a.krug", "fn a() { }").unwrap();
        unit.add_source("b.krug", "fn b() {\n  return nope;\n}").unwrap();
        unit.build().unwrap();

        assert_eq!(
            unit.render_diagnostics(),
            "b.krug:2:10: unresolved symbol: cannot find 'nope' in this scope"
        );
    }

    #[test]
    fn clear_resets() {
        let mut unit = Unit::new();
        unit.add_source("main.krug", "fn main() { }").unwrap();
        unit.build().unwrap();
        unit.clear();

        assert!(!unit.is_built());
        assert_eq!(unit.source_count(), 0);
    }
}
