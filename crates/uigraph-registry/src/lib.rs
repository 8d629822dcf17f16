//! Class-library lookup for uigraph.
//!
//! [`ClassLibrary`] is the read-only capability the compiler resolves names
//! against. [`ClassRegistry`] is an in-memory implementation with inheritance,
//! conversion costs and most-specific overload selection.

pub mod conversion;
mod hierarchy;
mod library;
pub mod overload;
mod registry;

pub use conversion::{Conversion, ConversionKind, find_conversion, find_primitive_conversion};
pub use hierarchy::{ClassHierarchy, HierarchyEdge};
pub use library::ClassLibrary;
pub use overload::{OverloadMatch, resolve_overload};
pub use registry::{ClassBuilder, ClassEntry, ClassRegistry, ConstructorEntry, MethodEntry};
