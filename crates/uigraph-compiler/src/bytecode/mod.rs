//! Bytecode types for emitted units.
//!
//! - [`OpCode`] - the instruction set
//! - [`BytecodeChunk`] - code of one procedure
//! - [`Constant`] and [`ConstantPool`] - unit-level constant storage

mod chunk;
mod constant;
mod opcode;

pub use chunk::BytecodeChunk;
pub use constant::{Constant, ConstantPool};
pub use opcode::OpCode;
