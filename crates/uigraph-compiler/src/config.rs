//! Compiler configuration.

use uigraph_core::ClassName;

use crate::naming;

/// Options shared by every unit a driver compiles.
///
/// # Example
///
/// ```
/// use uigraph_compiler::CompilerOptions;
///
/// let options = CompilerOptions::default()
///     .with_component_package("javax.swing")
///     .with_unit_package("com.example.ui");
///
/// assert_eq!(options.component_class("button").to_string(), "javax.swing.JButton");
/// assert_eq!(options.unit_class("MainWindow").to_string(), "com.example.ui.MainWindow");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Prepended to the title-cased node name to form the class lookup name.
    pub component_prefix: char,
    /// Package searched for component classes.
    pub component_package: Vec<String>,
    /// Package of emitted units.
    pub unit_package: Vec<String>,
    pub initializer_name: String,
    pub entry_point_name: String,
    /// Declared in the throws list of emitted procedures.
    pub failure_type: ClassName,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            component_prefix: 'J',
            component_package: Vec::new(),
            unit_package: Vec::new(),
            initializer_name: "init".to_string(),
            entry_point_name: "main".to_string(),
            failure_type: ClassName::global("Exception"),
        }
    }
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_component_prefix(mut self, prefix: char) -> Self {
        self.component_prefix = prefix;
        self
    }

    /// Dotted package name, e.g. `javax.swing`.
    pub fn with_component_package(mut self, package: &str) -> Self {
        self.component_package = split_package(package);
        self
    }

    pub fn with_unit_package(mut self, package: &str) -> Self {
        self.unit_package = split_package(package);
        self
    }

    pub fn with_initializer_name(mut self, name: impl Into<String>) -> Self {
        self.initializer_name = name.into();
        self
    }

    pub fn with_entry_point_name(mut self, name: impl Into<String>) -> Self {
        self.entry_point_name = name.into();
        self
    }

    pub fn with_failure_type(mut self, failure_type: &str) -> Self {
        self.failure_type = ClassName::parse(failure_type);
        self
    }

    /// Class a node named `node_name` resolves to.
    pub fn component_class(&self, node_name: &str) -> ClassName {
        ClassName::new(
            naming::lookup_name(self.component_prefix, node_name),
            self.component_package.clone(),
        )
    }

    /// Class name of the unit emitted for a source named `unit_name`.
    pub fn unit_class(&self, unit_name: &str) -> ClassName {
        ClassName::new(unit_name, self.unit_package.clone())
    }
}

fn split_package(package: &str) -> Vec<String> {
    package
        .split('.')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
