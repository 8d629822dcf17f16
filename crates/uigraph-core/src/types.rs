//! Static types and resolved library members.
//!
//! [`TypeRef`] is the static type of a value or slot. [`MethodRef`] and
//! [`ConstructorRef`] are what a class-library lookup hands back once a
//! member has been selected; they carry everything the emitter needs.

use std::fmt;

use crate::{ClassName, TypeHash};

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "boolean",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Int8 => "byte",
            PrimitiveKind::Int16 => "short",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Int64 => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// Position in the numeric widening order, `None` for non-numeric kinds.
    ///
    /// `char` widens like an unsigned 16-bit value, so it enters the order at `int`.
    pub const fn numeric_rank(self) -> Option<u32> {
        match self {
            PrimitiveKind::Bool => None,
            PrimitiveKind::Int8 => Some(0),
            PrimitiveKind::Int16 => Some(1),
            PrimitiveKind::Char | PrimitiveKind::Int32 => Some(2),
            PrimitiveKind::Int64 => Some(3),
            PrimitiveKind::Float => Some(4),
            PrimitiveKind::Double => Some(5),
        }
    }

    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Char
                | PrimitiveKind::Int8
                | PrimitiveKind::Int16
                | PrimitiveKind::Int32
                | PrimitiveKind::Int64
        )
    }

    pub const fn is_floating(self) -> bool {
        matches!(self, PrimitiveKind::Float | PrimitiveKind::Double)
    }

    pub fn type_hash(self) -> TypeHash {
        TypeHash::from_name(self.name())
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The static type of a value, parameter or storage slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Return type of procedures that produce nothing.
    Void,
    /// Type of the `null` literal; converts to any class type.
    Null,
    Primitive(PrimitiveKind),
    Class(ClassName),
}

impl TypeRef {
    /// Class type from a dotted name.
    pub fn class(name: &str) -> Self {
        TypeRef::Class(ClassName::parse(name))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }

    /// Whether values of this type are object references.
    pub fn is_reference(&self) -> bool {
        matches!(self, TypeRef::Class(_) | TypeRef::Null)
    }

    pub fn as_class(&self) -> Option<&ClassName> {
        match self {
            TypeRef::Class(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            TypeRef::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn type_hash(&self) -> TypeHash {
        match self {
            TypeRef::Void => TypeHash::from_name("void"),
            TypeRef::Null => TypeHash::from_name("null"),
            TypeRef::Primitive(kind) => kind.type_hash(),
            TypeRef::Class(name) => name.type_hash(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Void => f.write_str("void"),
            TypeRef::Null => f.write_str("null"),
            TypeRef::Primitive(kind) => write!(f, "{}", kind),
            TypeRef::Class(name) => write!(f, "{}", name),
        }
    }
}

impl From<PrimitiveKind> for TypeRef {
    fn from(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive(kind)
    }
}

impl From<ClassName> for TypeRef {
    fn from(name: ClassName) -> Self {
        TypeRef::Class(name)
    }
}

/// An instance method selected by a library lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    /// The class that declares the method (may be an ancestor of the receiver).
    pub owner: ClassName,
    pub name: String,
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
}

impl MethodRef {
    pub fn new(
        owner: ClassName,
        name: impl Into<String>,
        params: Vec<TypeRef>,
        return_type: TypeRef,
    ) -> Self {
        Self {
            owner,
            name: name.into(),
            params,
            return_type,
        }
    }

    pub fn hash(&self) -> TypeHash {
        let params: Vec<TypeHash> = self.params.iter().map(TypeRef::type_hash).collect();
        TypeHash::from_method(self.owner.type_hash(), &self.name, &params)
    }

    /// Whether a call leaves a value on the evaluation stack.
    pub fn returns_value(&self) -> bool {
        !self.return_type.is_void()
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.owner, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ") -> {}", self.return_type)
    }
}

/// A constructor selected by a library lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstructorRef {
    pub owner: ClassName,
    pub params: Vec<TypeRef>,
}

impl ConstructorRef {
    pub fn new(owner: ClassName, params: Vec<TypeRef>) -> Self {
        Self { owner, params }
    }

    /// The zero-argument constructor of `owner`.
    pub fn default_for(owner: ClassName) -> Self {
        Self {
            owner,
            params: Vec::new(),
        }
    }

    pub fn hash(&self) -> TypeHash {
        let params: Vec<TypeHash> = self.params.iter().map(TypeRef::type_hash).collect();
        TypeHash::from_constructor(self.owner.type_hash(), &params)
    }
}

impl fmt::Display for ConstructorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.<init>({} params)", self.owner, self.params.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_rank_orders_widening() {
        assert!(PrimitiveKind::Int8.numeric_rank() < PrimitiveKind::Int32.numeric_rank());
        assert!(PrimitiveKind::Int64.numeric_rank() < PrimitiveKind::Float.numeric_rank());
        assert_eq!(
            PrimitiveKind::Char.numeric_rank(),
            PrimitiveKind::Int32.numeric_rank()
        );
        assert_eq!(PrimitiveKind::Bool.numeric_rank(), None);
    }

    #[test]
    fn type_ref_display() {
        assert_eq!(TypeRef::class("javax.swing.JLabel").to_string(), "javax.swing.JLabel");
        assert_eq!(TypeRef::from(PrimitiveKind::Int32).to_string(), "int");
        assert_eq!(TypeRef::Void.to_string(), "void");
    }

    #[test]
    fn reference_types() {
        assert!(TypeRef::class("JLabel").is_reference());
        assert!(TypeRef::Null.is_reference());
        assert!(!TypeRef::from(PrimitiveKind::Bool).is_reference());
    }

    #[test]
    fn method_hash_depends_on_signature() {
        let owner = ClassName::global("JLabel");
        let set_text = MethodRef::new(
            owner.clone(),
            "setText",
            vec![TypeRef::class("String")],
            TypeRef::Void,
        );
        let set_int = MethodRef::new(
            owner,
            "setText",
            vec![PrimitiveKind::Int32.into()],
            TypeRef::Void,
        );
        assert_ne!(set_text.hash(), set_int.hash());
        assert!(!set_text.returns_value());
        assert_eq!(set_text.to_string(), "JLabel.setText(String) -> void");
    }

    #[test]
    fn constructor_hash() {
        let ctor = ConstructorRef::default_for(ClassName::global("JFrame"));
        assert_eq!(
            ctor.hash(),
            TypeHash::from_constructor(ClassName::global("JFrame").type_hash(), &[])
        );
    }
}
