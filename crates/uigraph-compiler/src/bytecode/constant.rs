//! Constant pool for compiled units.
//!
//! The constant pool stores values referenced by bytecode instructions:
//! numeric literals, string data and symbol hashes. It also remembers the
//! readable name of every symbol hash so a unit can be disassembled.

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use uigraph_core::TypeHash;

/// Values stored in the constant pool.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    /// Signed integer, wide enough for every integral primitive.
    Int(i64),
    Float32(OrderedFloat<f32>),
    Float64(OrderedFloat<f64>),
    /// UTF-8 string literal. The runtime creates the string object.
    StringData(String),
    /// Hash of a class, member, field or procedure.
    TypeHash(TypeHash),
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constant::Int(v) => write!(f, "{v}"),
            Constant::Float32(v) => write!(f, "{v}f"),
            Constant::Float64(v) => write!(f, "{v}"),
            Constant::StringData(s) => write!(f, "{s:?}"),
            Constant::TypeHash(h) => write!(f, "{h}"),
        }
    }
}

/// Unit-level constant pool with deduplication.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    constants: Vec<Constant>,
    index: FxHashMap<Constant, u32>,
    symbols: FxHashMap<TypeHash, String>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or get an existing constant, returning its index.
    pub fn add(&mut self, constant: Constant) -> u32 {
        if let Some(&idx) = self.index.get(&constant) {
            return idx;
        }

        let idx = self.constants.len() as u32;
        self.constants.push(constant.clone());
        self.index.insert(constant, idx);
        idx
    }

    pub fn add_int(&mut self, value: i64) -> u32 {
        self.add(Constant::Int(value))
    }

    pub fn add_f32(&mut self, value: f32) -> u32 {
        self.add(Constant::Float32(OrderedFloat(value)))
    }

    pub fn add_f64(&mut self, value: f64) -> u32 {
        self.add(Constant::Float64(OrderedFloat(value)))
    }

    pub fn add_string(&mut self, value: &str) -> u32 {
        self.add(Constant::StringData(value.to_string()))
    }

    pub fn add_type_hash(&mut self, hash: TypeHash) -> u32 {
        self.add(Constant::TypeHash(hash))
    }

    /// Add a symbol hash and remember its readable name.
    pub fn add_symbol(&mut self, hash: TypeHash, name: impl Into<String>) -> u32 {
        self.symbols.entry(hash).or_insert_with(|| name.into());
        self.add_type_hash(hash)
    }

    /// Readable name of a symbol hash added with [`add_symbol`](Self::add_symbol).
    pub fn symbol_name(&self, hash: TypeHash) -> Option<&str> {
        self.symbols.get(&hash).map(String::as_str)
    }

    pub fn get(&self, index: u32) -> Option<&Constant> {
        self.constants.get(index as usize)
    }

    pub fn constants(&self) -> &[Constant] {
        &self.constants
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// Render the constant at `index`, resolving symbol hashes to names.
    pub fn describe(&self, index: u32) -> String {
        match self.get(index) {
            Some(Constant::TypeHash(hash)) => match self.symbol_name(*hash) {
                Some(name) => name.to_string(),
                None => hash.to_string(),
            },
            Some(other) => other.to_string(),
            None => format!("<invalid #{index}>"),
        }
    }
}
