//! Argument conversions and their costs.
//!
//! ## Conversion Priority
//!
//! Best to worst:
//! 1. Identity (exact match)
//! 2. Primitive widening within integers or within floating types
//! 3. Integer to floating point
//! 4. Subtype to supertype, by inheritance distance
//! 5. `null` to any reference type

use uigraph_core::{ClassName, PrimitiveKind, TypeRef};

use crate::ClassHierarchy;

/// An implicit conversion of an argument to a parameter type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub kind: ConversionKind,
    /// Lower is better.
    pub cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionKind {
    Identity,
    PrimitiveWidening {
        from: PrimitiveKind,
        to: PrimitiveKind,
    },
    IntToFloat {
        from: PrimitiveKind,
        to: PrimitiveKind,
    },
    DerivedToBase {
        base: ClassName,
        distance: u32,
    },
    NullToReference,
}

impl Conversion {
    pub const COST_EXACT: u32 = 0;
    pub const COST_PRIMITIVE_WIDENING: u32 = 1;
    pub const COST_INT_TO_FLOAT: u32 = 10;
    pub const COST_DERIVED_TO_BASE: u32 = 20;
    pub const COST_NULL_TO_REFERENCE: u32 = 100;

    pub fn identity() -> Self {
        Self {
            kind: ConversionKind::Identity,
            cost: Self::COST_EXACT,
        }
    }

    pub fn is_exact(&self) -> bool {
        matches!(self.kind, ConversionKind::Identity)
    }
}

/// Find the implicit conversion from `from` to `to`, if there is one.
pub fn find_conversion(
    from: &TypeRef,
    to: &TypeRef,
    hierarchy: &ClassHierarchy,
) -> Option<Conversion> {
    if from == to {
        return Some(Conversion::identity());
    }

    match (from, to) {
        (TypeRef::Primitive(src), TypeRef::Primitive(dst)) => find_primitive_conversion(*src, *dst),
        (TypeRef::Null, TypeRef::Class(_)) => Some(Conversion {
            kind: ConversionKind::NullToReference,
            cost: Conversion::COST_NULL_TO_REFERENCE,
        }),
        (TypeRef::Class(sub), TypeRef::Class(sup)) => {
            let distance = hierarchy.distance(sub, sup)?;
            Some(Conversion {
                kind: ConversionKind::DerivedToBase {
                    base: sup.clone(),
                    distance,
                },
                cost: Conversion::COST_DERIVED_TO_BASE + distance,
            })
        }
        _ => None,
    }
}

/// Widening primitive conversions. Narrowing is never implicit.
pub fn find_primitive_conversion(from: PrimitiveKind, to: PrimitiveKind) -> Option<Conversion> {
    if from == to {
        return Some(Conversion::identity());
    }
    // Nothing widens into char; bool converts to nothing.
    if to == PrimitiveKind::Char {
        return None;
    }
    let src = from.numeric_rank()?;
    let dst = to.numeric_rank()?;
    if dst < src || (dst == src && from != PrimitiveKind::Char) {
        return None;
    }
    let distance = dst - src;

    if from.is_integral() && to.is_floating() {
        Some(Conversion {
            kind: ConversionKind::IntToFloat { from, to },
            cost: Conversion::COST_INT_TO_FLOAT + distance,
        })
    } else {
        Some(Conversion {
            kind: ConversionKind::PrimitiveWidening { from, to },
            cost: Conversion::COST_PRIMITIVE_WIDENING + distance,
        })
    }
}
