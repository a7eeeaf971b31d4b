//! Build configuration.

/// Options controlling a build.
///
/// The default is permissive: dangling references are only recorded,
/// diagnostics are unlimited and a fatal diagnostic stops the build.
///
/// ```
/// use krug_compiler::BuildOptions;
///
/// let options = BuildOptions::new()
///     .with_unit_names(["main.krug", "util.krug"])
///     .with_strict_references(true)
///     .with_max_diagnostics(Some(20));
///
/// assert_eq!(options.unit_name(1), "util.krug");
/// assert_eq!(options.unit_name(7), "unit7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Names used when rendering diagnostics, indexed by unit.
    pub unit_names: Vec<String>,
    /// Report references left unbound after type declaration.
    pub strict_references: bool,
    /// Cap on diagnostics returned per build. `None` is unlimited.
    pub max_diagnostics: Option<usize>,
    /// Stop after a stage that produced an internal error.
    pub abort_on_fatal: bool,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unit_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_strict_references(mut self, strict: bool) -> Self {
        self.strict_references = strict;
        self
    }

    pub fn with_max_diagnostics(mut self, max: Option<usize>) -> Self {
        self.max_diagnostics = max;
        self
    }

    pub fn with_abort_on_fatal(mut self, abort: bool) -> Self {
        self.abort_on_fatal = abort;
        self
    }

    /// The display name of `unit`, falling back to `unit<N>`.
    pub fn unit_name(&self, unit: usize) -> String {
        self.unit_names
            .get(unit)
            .cloned()
            .unwrap_or_else(|| format!("unit{unit}"))
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            unit_names: Vec::new(),
            strict_references: false,
            max_diagnostics: None,
            abort_on_fatal: true,
        }
    }
}
