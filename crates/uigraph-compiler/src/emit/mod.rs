//! Bytecode emitter.
//!
//! [`BytecodeEmitter`] writes instructions for one procedure into a
//! [`BytecodeChunk`], adding literals and symbol hashes to the unit's shared
//! [`ConstantPool`].
//!
//! # Example
//!
//! ```
//! use uigraph_compiler::bytecode::{ConstantPool, OpCode};
//! use uigraph_compiler::emit::BytecodeEmitter;
//!
//! let mut constants = ConstantPool::new();
//! let mut emitter = BytecodeEmitter::new(&mut constants);
//!
//! emitter.set_line(1);
//! emitter.emit_string("Hi").unwrap();
//! emitter.emit_dup();
//! emitter.emit_return_void();
//!
//! let chunk = emitter.finish();
//! chunk.assert_opcodes(&[OpCode::Constant, OpCode::Dup, OpCode::ReturnVoid]);
//! ```

use uigraph_core::{CompileError, ConstructorRef, MethodRef, TypeHash};

use crate::bytecode::{BytecodeChunk, Constant, ConstantPool, OpCode};

/// Emits bytecode instructions for a single procedure.
pub struct BytecodeEmitter<'pool> {
    chunk: BytecodeChunk,
    constants: &'pool mut ConstantPool,
    current_line: u32,
}

impl<'pool> BytecodeEmitter<'pool> {
    pub fn new(constants: &'pool mut ConstantPool) -> Self {
        Self {
            chunk: BytecodeChunk::new(),
            constants,
            current_line: 1,
        }
    }

    /// Set current source line for debug info.
    ///
    /// All subsequent instructions will be associated with this line number.
    pub fn set_line(&mut self, line: u32) {
        self.current_line = line;
    }

    pub fn current_line(&self) -> u32 {
        self.current_line
    }

    /// Offset of the next instruction.
    pub fn current_offset(&self) -> usize {
        self.chunk.current_offset()
    }

    // ==========================================================================
    // Basic Emission
    // ==========================================================================

    /// Emit a single opcode with no operands.
    pub fn emit(&mut self, op: OpCode) {
        self.chunk.write_op(op, self.current_line);
    }

    pub fn emit_byte(&mut self, op: OpCode, byte: u8) {
        self.chunk.write_op(op, self.current_line);
        self.chunk.write_byte(byte, self.current_line);
    }

    pub fn emit_u16(&mut self, op: OpCode, value: u16) {
        self.chunk.write_op(op, self.current_line);
        self.chunk.write_u16(value, self.current_line);
    }

    /// Emit a constant load, narrow or wide depending on the pool index.
    pub fn emit_constant(&mut self, constant: Constant) -> Result<(), CompileError> {
        let index = self.constants.add(constant);
        match u8::try_from(index) {
            Ok(narrow) => self.emit_byte(OpCode::Constant, narrow),
            Err(_) => self.emit_u16(OpCode::ConstantWide, wide_operand(index as usize)?),
        }
        Ok(())
    }

    // ==========================================================================
    // Literals
    // ==========================================================================

    /// Emit an integer constant. 0 and 1 use `PushZero` / `PushOne`.
    pub fn emit_int(&mut self, value: i64) -> Result<(), CompileError> {
        match value {
            0 => self.emit(OpCode::PushZero),
            1 => self.emit(OpCode::PushOne),
            _ => return self.emit_constant(Constant::Int(value)),
        }
        Ok(())
    }

    pub fn emit_f32(&mut self, value: f32) -> Result<(), CompileError> {
        self.emit_constant(Constant::Float32(value.into()))
    }

    pub fn emit_f64(&mut self, value: f64) -> Result<(), CompileError> {
        self.emit_constant(Constant::Float64(value.into()))
    }

    pub fn emit_string(&mut self, value: &str) -> Result<(), CompileError> {
        self.emit_constant(Constant::StringData(value.to_string()))
    }

    pub fn emit_null(&mut self) {
        self.emit(OpCode::PushNull);
    }

    pub fn emit_bool(&mut self, value: bool) {
        self.emit(if value {
            OpCode::PushTrue
        } else {
            OpCode::PushFalse
        });
    }

    // ==========================================================================
    // Stack
    // ==========================================================================

    pub fn emit_pop(&mut self) {
        self.emit(OpCode::Pop);
    }

    pub fn emit_dup(&mut self) {
        self.emit(OpCode::Dup);
    }

    // ==========================================================================
    // Locals and Static Fields
    // ==========================================================================

    /// Emit get local variable, narrow or wide depending on the slot.
    pub fn emit_get_local(&mut self, slot: u32) -> Result<(), CompileError> {
        match u8::try_from(slot) {
            Ok(narrow) => self.emit_byte(OpCode::GetLocal, narrow),
            Err(_) => self.emit_u16(OpCode::GetLocalWide, wide_operand(slot as usize)?),
        }
        Ok(())
    }

    /// Emit set local variable, narrow or wide depending on the slot.
    pub fn emit_set_local(&mut self, slot: u32) -> Result<(), CompileError> {
        match u8::try_from(slot) {
            Ok(narrow) => self.emit_byte(OpCode::SetLocal, narrow),
            Err(_) => self.emit_u16(OpCode::SetLocalWide, wide_operand(slot as usize)?),
        }
        Ok(())
    }

    pub fn emit_set_static(&mut self, field: TypeHash, name: &str) -> Result<(), CompileError> {
        let index = self.symbol_operand(field, name)?;
        self.emit_u16(OpCode::SetStatic, index);
        Ok(())
    }

    // ==========================================================================
    // Calls and Objects
    // ==========================================================================

    /// Emit a call to a static procedure of the unit.
    pub fn emit_call(
        &mut self,
        procedure: TypeHash,
        name: &str,
        arg_count: u8,
    ) -> Result<(), CompileError> {
        let index = self.symbol_operand(procedure, name)?;
        self.emit_u16(OpCode::Call, index);
        self.chunk.write_byte(arg_count, self.current_line);
        Ok(())
    }

    /// Emit an instance method call. The receiver and arguments must be on the stack.
    pub fn emit_call_method(&mut self, method: &MethodRef) -> Result<(), CompileError> {
        let index = self.symbol_operand(method.hash(), &method.to_string())?;
        let arg_count = narrow_operand(method.arity())?;
        self.emit_u16(OpCode::CallMethod, index);
        self.chunk.write_byte(arg_count, self.current_line);
        Ok(())
    }

    /// Emit object creation through `ctor`, leaving the new reference on the stack.
    pub fn emit_new(&mut self, ctor: &ConstructorRef) -> Result<(), CompileError> {
        let type_index = self.symbol_operand(ctor.owner.type_hash(), &ctor.owner.to_string())?;
        let ctor_index = self.symbol_operand(ctor.hash(), &ctor.to_string())?;
        let arg_count = narrow_operand(ctor.params.len())?;
        self.emit_u16(OpCode::New, type_index);
        self.chunk.write_u16(ctor_index, self.current_line);
        self.chunk.write_byte(arg_count, self.current_line);
        Ok(())
    }

    pub fn emit_return_void(&mut self) {
        self.emit(OpCode::ReturnVoid);
    }

    // ==========================================================================
    // Finalization
    // ==========================================================================

    pub fn finish(self) -> BytecodeChunk {
        self.chunk
    }

    fn symbol_operand(&mut self, hash: TypeHash, name: &str) -> Result<u16, CompileError> {
        let index = self.constants.add_symbol(hash, name);
        wide_operand(index as usize)
    }
}

fn wide_operand(value: usize) -> Result<u16, CompileError> {
    u16::try_from(value).map_err(|_| CompileError::OperandOverflow { value, bits: 16 })
}

fn narrow_operand(value: usize) -> Result<u8, CompileError> {
    u8::try_from(value).map_err(|_| CompileError::OperandOverflow { value, bits: 8 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uigraph_core::{ClassName, TypeRef};

    #[test]
    fn emit_constant() {
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        emitter.emit_int(42).unwrap();
        let chunk = emitter.finish();

        assert_eq!(chunk.read_op(0), Some(OpCode::Constant));
        assert_eq!(chunk.read_byte(1), Some(0));
        assert_eq!(constants.get(0), Some(&Constant::Int(42)));
    }

    #[test]
    fn emit_special_ints() {
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        emitter.emit_int(0).unwrap();
        emitter.emit_int(1).unwrap();
        let chunk = emitter.finish();

        chunk.assert_opcodes(&[OpCode::PushZero, OpCode::PushOne]);
        assert!(constants.is_empty());
    }

    #[test]
    fn constant_deduplication() {
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        emitter.emit_string("hello").unwrap();
        emitter.emit_string("hello").unwrap();
        assert_eq!(constants.len(), 1);
    }

    #[test]
    fn wide_constant_index() {
        let mut constants = ConstantPool::new();
        for i in 0..300 {
            constants.add_int(1000 + i);
        }
        let mut emitter = BytecodeEmitter::new(&mut constants);
        emitter.emit_int(1299).unwrap();
        emitter.emit_int(5000).unwrap();
        let chunk = emitter.finish();

        assert_eq!(chunk.read_op(0), Some(OpCode::ConstantWide));
        assert_eq!(chunk.read_u16(1), Some(299));
        assert_eq!(chunk.read_op(3), Some(OpCode::ConstantWide));
        assert_eq!(chunk.read_u16(4), Some(300));
    }

    #[test]
    fn local_slots_narrow_and_wide() {
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        emitter.emit_set_local(3).unwrap();
        emitter.emit_get_local(300).unwrap();
        let chunk = emitter.finish();

        chunk.assert_opcodes(&[OpCode::SetLocal, OpCode::GetLocalWide]);
        assert_eq!(chunk.read_u16(3), Some(300));
    }

    #[test]
    fn slot_overflow_is_an_error() {
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        let err = emitter.emit_get_local(70_000).unwrap_err();
        assert_eq!(
            err,
            CompileError::OperandOverflow {
                value: 70_000,
                bits: 16
            }
        );
    }

    #[test]
    fn method_call_records_symbol() {
        let method = MethodRef::new(
            ClassName::global("JFrame"),
            "setTitle",
            vec![TypeRef::class("String")],
            TypeRef::Void,
        );
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        emitter.emit_call_method(&method).unwrap();
        let chunk = emitter.finish();

        assert_eq!(chunk.read_op(0), Some(OpCode::CallMethod));
        assert_eq!(chunk.read_byte(3), Some(1));
        assert_eq!(
            constants.symbol_name(method.hash()),
            Some("JFrame.setTitle(String) -> void")
        );
    }

    #[test]
    fn new_has_type_and_constructor_operands() {
        let ctor = ConstructorRef::default_for(ClassName::global("JFrame"));
        let mut constants = ConstantPool::new();
        let mut emitter = BytecodeEmitter::new(&mut constants);
        emitter.set_line(4);
        emitter.emit_new(&ctor).unwrap();
        let chunk = emitter.finish();

        assert_eq!(chunk.len(), 6);
        assert_eq!(chunk.read_u16(1), Some(0));
        assert_eq!(chunk.read_u16(3), Some(1));
        assert_eq!(chunk.read_byte(5), Some(0));
        assert_eq!(chunk.line_at(5), Some(4));
        assert_eq!(constants.describe(0), "JFrame");
    }
}
