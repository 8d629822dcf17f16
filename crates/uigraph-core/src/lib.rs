//! Core types shared by every uigraph crate.
//!
//! - [`Span`]: source positions reported with diagnostics
//! - [`TypeHash`]: deterministic identity of classes, members and emitted symbols
//! - [`ClassName`], [`TypeRef`], [`MethodRef`], [`ConstructorRef`]: the vocabulary
//!   of the external class library
//! - [`Diagnostic`], [`LookupError`], [`CompileError`]: error handling

mod class_name;
pub mod error;
mod span;
pub mod type_hash;
mod types;

pub use class_name::ClassName;
pub use error::{
    CompileError, Diagnostic, DiagnosticKind, Diagnostics, LookupError, RegistrationError,
};
pub use span::Span;
pub use type_hash::TypeHash;
pub use types::{ConstructorRef, MethodRef, PrimitiveKind, TypeRef};
