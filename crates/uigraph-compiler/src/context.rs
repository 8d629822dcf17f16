//! Resolution context shared by the binding passes and expressions.

use uigraph_core::{ClassName, TypeRef};
use uigraph_registry::ClassLibrary;

use crate::CompilerOptions;

/// Read-only view of the class library and the options for one unit.
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    pub library: &'a dyn ClassLibrary,
    pub options: &'a CompilerOptions,
}

impl<'a> ResolveContext<'a> {
    pub fn new(library: &'a dyn ClassLibrary, options: &'a CompilerOptions) -> Self {
        Self { library, options }
    }

    /// Resolve the class a node named `node_name` maps to.
    ///
    /// Returns the derived lookup name alongside, for diagnostics.
    pub fn resolve_component(&self, node_name: &str) -> (ClassName, Option<TypeRef>) {
        let class = self.options.component_class(node_name);
        let resolved = self.library.resolve_type(&class);
        (class, resolved)
    }

    pub fn string_type(&self) -> TypeRef {
        self.library.string_type()
    }
}

impl std::fmt::Debug for ResolveContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveContext")
            .field("options", self.options)
            .finish_non_exhaustive()
    }
}
