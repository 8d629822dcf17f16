//! ClassRegistry - an in-memory class library.
//!
//! [`ClassRegistry`] stores class entries by [`ClassName`] and keeps the
//! subtype relation in a [`ClassHierarchy`]. It implements [`ClassLibrary`],
//! so the compiler can run against it without any real component toolkit.
//!
//! # Example
//!
//! ```
//! use uigraph_core::{TypeRef, ClassName};
//! use uigraph_registry::{ClassLibrary, ClassRegistry};
//!
//! let mut registry = ClassRegistry::new();
//! registry
//!     .class("JLabel")
//!     .default_constructor()
//!     .method("setText", vec![TypeRef::class("String")], TypeRef::Void)
//!     .register()
//!     .unwrap();
//!
//! let label = registry.resolve_type(&ClassName::global("JLabel")).unwrap();
//! let set_text = registry
//!     .resolve_method(&label, "setText", &[TypeRef::class("String")])
//!     .unwrap();
//! assert_eq!(set_text.name, "setText");
//! ```

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;
use uigraph_core::{ClassName, ConstructorRef, LookupError, MethodRef, RegistrationError, TypeRef};

use crate::conversion::find_conversion;
use crate::hierarchy::{ClassHierarchy, HierarchyEdge};
use crate::library::ClassLibrary;
use crate::overload::resolve_overload;

// ============================================================================
// Entries
// ============================================================================

/// A public instance method declared by a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodEntry {
    pub name: String,
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
}

/// A public constructor declared by a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorEntry {
    pub params: Vec<TypeRef>,
}

/// A registered class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassEntry {
    pub name: ClassName,
    pub superclass: Option<ClassName>,
    pub interfaces: Vec<ClassName>,
    pub is_abstract: bool,
    pub constructors: Vec<ConstructorEntry>,
    pub methods: Vec<MethodEntry>,
}

impl ClassEntry {
    pub fn new(name: ClassName) -> Self {
        Self {
            name,
            superclass: None,
            interfaces: Vec::new(),
            is_abstract: false,
            constructors: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Abstract classes cannot be instantiated, whatever constructors they declare.
    pub fn has_default_constructor(&self) -> bool {
        !self.is_abstract && self.constructors.iter().any(|c| c.params.is_empty())
    }

    fn method_ref(&self, method: &MethodEntry) -> MethodRef {
        MethodRef::new(
            self.name.clone(),
            method.name.clone(),
            method.params.clone(),
            method.return_type.clone(),
        )
    }
}

// ============================================================================
// Registry
// ============================================================================

#[derive(Debug)]
pub struct ClassRegistry {
    classes: FxHashMap<ClassName, ClassEntry>,
    hierarchy: ClassHierarchy,
    string_type: TypeRef,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self {
            classes: FxHashMap::default(),
            hierarchy: ClassHierarchy::new(),
            string_type: TypeRef::class("String"),
        }
    }
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `ty` as the static type of string literals.
    pub fn with_string_type(mut self, ty: TypeRef) -> Self {
        self.string_type = ty;
        self
    }

    /// Start building a class with the given dotted name.
    pub fn class(&mut self, name: &str) -> ClassBuilder<'_> {
        ClassBuilder {
            registry: self,
            entry: ClassEntry::new(ClassName::parse(name)),
        }
    }

    /// Register a class entry.
    ///
    /// Returns an error if a class with the same name already exists, if the
    /// class names itself as a supertype, or if it declares the same method
    /// signature twice.
    pub fn register(&mut self, entry: ClassEntry) -> Result<(), RegistrationError> {
        if self.classes.contains_key(&entry.name) {
            return Err(RegistrationError::DuplicateClass(entry.name.to_string()));
        }
        if entry.superclass.as_ref() == Some(&entry.name) || entry.interfaces.contains(&entry.name)
        {
            return Err(RegistrationError::SelfInheritance(entry.name.to_string()));
        }

        let mut signatures = FxHashSet::default();
        for method in &entry.methods {
            if !signatures.insert((method.name.as_str(), method.params.as_slice())) {
                return Err(RegistrationError::DuplicateMember {
                    class: entry.name.to_string(),
                    member: method.name.clone(),
                });
            }
        }

        if let Some(superclass) = &entry.superclass {
            self.hierarchy
                .add_edge(&entry.name, superclass, HierarchyEdge::Extends);
        }
        for interface in &entry.interfaces {
            self.hierarchy
                .add_edge(&entry.name, interface, HierarchyEdge::Implements);
        }

        self.classes.insert(entry.name.clone(), entry);
        Ok(())
    }

    pub fn get(&self, name: &ClassName) -> Option<&ClassEntry> {
        self.classes.get(name)
    }

    pub fn contains(&self, name: &ClassName) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn hierarchy(&self) -> &ClassHierarchy {
        &self.hierarchy
    }

    /// Methods named `name` visible on `owner`, including inherited ones.
    ///
    /// A signature declared by a nearer class hides the same signature
    /// declared further up.
    pub fn visible_methods(&self, owner: &ClassName, name: &str) -> Vec<MethodRef> {
        let mut seen: FxHashSet<&[TypeRef]> = FxHashSet::default();
        let mut out = Vec::new();
        for ancestor in self.hierarchy.ancestors(owner) {
            let Some(entry) = self.classes.get(&ancestor) else {
                continue;
            };
            for method in entry.methods.iter().filter(|m| m.name == name) {
                if seen.insert(method.params.as_slice()) {
                    out.push(entry.method_ref(method));
                }
            }
        }
        out
    }
}

impl ClassLibrary for ClassRegistry {
    fn resolve_type(&self, name: &ClassName) -> Option<TypeRef> {
        self.classes
            .get(name)
            .map(|entry| TypeRef::Class(entry.name.clone()))
    }

    fn resolve_method(
        &self,
        owner: &TypeRef,
        name: &str,
        args: &[TypeRef],
    ) -> Result<MethodRef, LookupError> {
        let candidates = match owner.as_class() {
            Some(class) => self.visible_methods(class, name),
            None => Vec::new(),
        };
        trace!(%owner, method = name, candidates = candidates.len(), "resolving method");
        resolve_overload(owner, name, &candidates, args, &self.hierarchy)
    }

    fn resolve_zero_arg_constructor(&self, ty: &TypeRef) -> Option<ConstructorRef> {
        let entry = self.classes.get(ty.as_class()?)?;
        entry
            .has_default_constructor()
            .then(|| ConstructorRef::default_for(entry.name.clone()))
    }

    fn string_type(&self) -> TypeRef {
        self.string_type.clone()
    }

    fn is_assignable(&self, from: &TypeRef, to: &TypeRef) -> bool {
        find_conversion(from, to, &self.hierarchy).is_some()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Fluent registration of one class. Nothing is stored until [`register`](Self::register).
pub struct ClassBuilder<'r> {
    registry: &'r mut ClassRegistry,
    entry: ClassEntry,
}

impl<'r> ClassBuilder<'r> {
    pub fn extends(mut self, superclass: &str) -> Self {
        self.entry.superclass = Some(ClassName::parse(superclass));
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.entry.interfaces.push(ClassName::parse(interface));
        self
    }

    pub fn abstract_class(mut self) -> Self {
        self.entry.is_abstract = true;
        self
    }

    pub fn default_constructor(self) -> Self {
        self.constructor(Vec::new())
    }

    pub fn constructor(mut self, params: Vec<TypeRef>) -> Self {
        self.entry.constructors.push(ConstructorEntry { params });
        self
    }

    pub fn method(mut self, name: &str, params: Vec<TypeRef>, return_type: TypeRef) -> Self {
        self.entry.methods.push(MethodEntry {
            name: name.to_string(),
            params,
            return_type,
        });
        self
    }

    pub fn register(self) -> Result<(), RegistrationError> {
        self.registry.register(self.entry)
    }
}
