//! uigraph compiler
//!
//! Compiles a declarative component tree into a unit that rebuilds the
//! object graph at runtime.
//!
//! ## Architecture
//!
//! - **Type resolution**: map each node name onto a library class by naming convention
//! - **Binding**: select constructors, getters, setters and adders for nodes and properties
//! - **Field table**: collect the unit's static storage slots
//! - **Emission**: generate the initializer and the entry point
//!
//! ## Modules
//!
//! - [`bytecode`]: Bytecode types (OpCode, BytecodeChunk, ConstantPool)
//! - [`config`]: Compiler options
//! - [`context`]: Read-only resolution context
//! - [`driver`]: Per-unit orchestration
//! - [`emit`]: Low-level bytecode emitter
//! - [`field_table`]: Static storage of a unit
//! - [`graph_emitter`]: Initializer and entry point generation
//! - [`naming`]: Lookup, accessor and qualified-name conventions
//! - [`passes`]: Type resolution and binding passes
//! - [`tree`]: Tree model and value expressions
//! - [`unit`]: Compiled unit and disassembly

pub mod bytecode;
pub mod config;
pub mod context;
pub mod driver;
pub mod emit;
pub mod field_table;
pub mod graph_emitter;
pub mod naming;
pub mod passes;
pub mod tree;
pub mod unit;

pub use config::CompilerOptions;
pub use context::ResolveContext;
pub use driver::{CompilationResult, UnitDriver, UnitSource};
pub use emit::BytecodeEmitter;
pub use field_table::FieldTable;
pub use graph_emitter::{EmittedInitializer, GraphEmitter, emit_entry_point};
pub use passes::{BindingOutput, BindingPass, TypeResolutionOutput, TypeResolutionPass};
pub use tree::{
    Expr, Literal, LiteralExpr, Node, NodeBinding, NodeId, Property, PropertyBinding, Reference,
    Tree, Value,
};
pub use unit::{CompiledUnit, FieldDecl, LocalVarInfo, MemberFlags, Procedure};
