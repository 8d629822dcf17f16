//! Deterministic hash-based symbol identity.
//!
//! [`TypeHash`] is a 64-bit hash that identifies classes, methods, constructors
//! and emitted fields. Hashes are computed from names and signatures, so the
//! emitter can reference a symbol without holding on to the library entry that
//! produced it.
//!
//! # Examples
//!
//! ```
//! use uigraph_core::TypeHash;
//!
//! let label = TypeHash::from_name("JLabel");
//! assert_eq!(label, TypeHash::from_name("JLabel"));
//!
//! let string = TypeHash::from_name("String");
//! let set_text = TypeHash::from_method(label, "setText", &[string]);
//! let set_icon = TypeHash::from_method(label, "setIcon", &[string]);
//! assert_ne!(set_text, set_icon);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
///
/// Different entity kinds produce distinct hashes even when they share a name.
pub mod hash_constants {
    /// Separator constant for path components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for instance method hashes.
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for constructor hashes.
    pub const CONSTRUCTOR: u64 = 0x9a7f3d5e2b8c4601;

    /// Domain marker for static procedure hashes.
    pub const PROCEDURE: u64 = 0x5ea77ffbcdf5f302;

    /// Domain marker for static field hashes.
    pub const FIELD: u64 = 0x1a095090689d4647;

    /// Parameter position mixing constants.
    pub const PARAM_MARKERS: [u64; 8] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
    ];
}

/// A deterministic 64-bit hash identifying a class, member or field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a qualified type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a method hash from the declaring type, method name and parameter types.
    ///
    /// Parameter order matters.
    #[inline]
    pub fn from_method(owner: TypeHash, name: &str, param_hashes: &[TypeHash]) -> Self {
        let hash = hash_constants::METHOD ^ owner.0 ^ xxh64(name.as_bytes(), 0);
        TypeHash(mix_params(hash, param_hashes))
    }

    /// Create a constructor hash from owner type and parameter type hashes.
    #[inline]
    pub fn from_constructor(owner: TypeHash, param_hashes: &[TypeHash]) -> Self {
        TypeHash(mix_params(hash_constants::CONSTRUCTOR ^ owner.0, param_hashes))
    }

    /// Create the hash of a static procedure declared by a compiled unit.
    #[inline]
    pub fn from_procedure(unit: TypeHash, name: &str) -> Self {
        TypeHash(hash_constants::PROCEDURE ^ unit.0 ^ xxh64(name.as_bytes(), 0))
    }

    /// Create the hash of a static field declared by a compiled unit.
    #[inline]
    pub fn from_field(unit: TypeHash, name: &str) -> Self {
        TypeHash(hash_constants::FIELD ^ unit.0 ^ xxh64(name.as_bytes(), 0))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

fn mix_params(mut hash: u64, param_hashes: &[TypeHash]) -> u64 {
    for (i, param) in param_hashes.iter().enumerate() {
        let marker = hash_constants::PARAM_MARKERS
            .get(i)
            .copied()
            .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
        // wrapping_mul keeps parameter order significant
        hash = hash
            .wrapping_mul(hash_constants::SEP)
            .wrapping_add(marker ^ param.0);
    }
    hash
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
