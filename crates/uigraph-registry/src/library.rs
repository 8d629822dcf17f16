//! The class-library lookup capability.
//!
//! The compiler never inspects a component library directly. Everything it needs
//! goes through [`ClassLibrary`], which is read-only and may be shared between
//! units compiled in parallel when the implementation is `Sync`.

use uigraph_core::{ClassName, ConstructorRef, LookupError, MethodRef, TypeRef};

/// Read access to an already-loaded class namespace.
pub trait ClassLibrary {
    /// Resolve a fully qualified class name to its type.
    fn resolve_type(&self, name: &ClassName) -> Option<TypeRef>;

    /// Resolve an instance method on `owner` applicable to `args`.
    ///
    /// When several overloads apply, the most specific one is returned.
    /// [`LookupError::Ambiguous`] is returned only when no overload is more
    /// specific than all the others.
    fn resolve_method(
        &self,
        owner: &TypeRef,
        name: &str,
        args: &[TypeRef],
    ) -> Result<MethodRef, LookupError>;

    /// The public zero-argument constructor of `ty`, if it can be instantiated.
    fn resolve_zero_arg_constructor(&self, ty: &TypeRef) -> Option<ConstructorRef>;

    /// Static type of string literals.
    fn string_type(&self) -> TypeRef {
        TypeRef::class("String")
    }

    /// Whether a value of type `from` may be stored where `to` is expected.
    fn is_assignable(&self, from: &TypeRef, to: &TypeRef) -> bool {
        from == to
    }
}

impl<L: ClassLibrary + ?Sized> ClassLibrary for &L {
    fn resolve_type(&self, name: &ClassName) -> Option<TypeRef> {
        (**self).resolve_type(name)
    }

    fn resolve_method(
        &self,
        owner: &TypeRef,
        name: &str,
        args: &[TypeRef],
    ) -> Result<MethodRef, LookupError> {
        (**self).resolve_method(owner, name, args)
    }

    fn resolve_zero_arg_constructor(&self, ty: &TypeRef) -> Option<ConstructorRef> {
        (**self).resolve_zero_arg_constructor(ty)
    }

    fn string_type(&self) -> TypeRef {
        (**self).string_type()
    }

    fn is_assignable(&self, from: &TypeRef, to: &TypeRef) -> bool {
        (**self).is_assignable(from, to)
    }
}
