//! Bytecode operation codes.
//!
//! Each opcode is a single byte, with operands following inline. Multi-byte
//! operands are big-endian.

use num_enum::TryFromPrimitive;

/// Instruction set of the emitted initializer and entry-point procedures.
///
/// The target machine is stack-based. Calls pop their receiver and arguments
/// and push the result when the callee returns a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
#[repr(u8)]
pub enum OpCode {
    // =========================================================================
    // Constants
    // =========================================================================
    /// Push constant from pool.
    /// Operand: u8 constant index
    Constant = 0,
    /// Push constant from pool.
    /// Operand: u16 constant index
    ConstantWide,
    PushNull,
    PushTrue,
    PushFalse,
    PushZero,
    PushOne,

    // =========================================================================
    // Stack Operations
    // =========================================================================
    Pop,
    Dup,

    // =========================================================================
    // Local Variables
    // =========================================================================
    /// Operand: u8 slot index
    GetLocal,
    /// Operand: u8 slot index
    SetLocal,
    /// Operand: u16 slot index
    GetLocalWide,
    /// Operand: u16 slot index
    SetLocalWide,

    // =========================================================================
    // Static Fields
    // =========================================================================
    /// Store to a static field of the unit.
    /// Operand: u16 constant index (field TypeHash)
    SetStatic,

    // =========================================================================
    // Calls and Objects
    // =========================================================================
    /// Call a static procedure.
    /// Operands: u16 constant index (procedure hash), u8 arg count
    Call,
    /// Call an instance method. The receiver is below the arguments.
    /// Operands: u16 constant index (method hash), u8 arg count
    CallMethod,
    /// Allocate an instance and run a constructor, pushing the initialized reference.
    /// Operands: u16 type index, u16 constructor index, u8 arg count
    New,

    // =========================================================================
    // Return
    // =========================================================================
    Return,
    ReturnVoid,
}

impl OpCode {
    /// Convert from u8, returning None for invalid values.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::try_from_primitive(value).ok()
    }

    /// Size of the operands in bytes, not counting the opcode byte itself.
    pub fn operand_size(&self) -> usize {
        match self {
            OpCode::PushNull
            | OpCode::PushTrue
            | OpCode::PushFalse
            | OpCode::PushZero
            | OpCode::PushOne
            | OpCode::Pop
            | OpCode::Dup
            | OpCode::Return
            | OpCode::ReturnVoid => 0,

            OpCode::Constant | OpCode::GetLocal | OpCode::SetLocal => 1,

            OpCode::ConstantWide
            | OpCode::GetLocalWide
            | OpCode::SetLocalWide
            | OpCode::SetStatic => 2,

            OpCode::Call | OpCode::CallMethod => 3,

            OpCode::New => 5,
        }
    }

    /// Get the name of this opcode for debugging.
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::Constant => "CONSTANT",
            OpCode::ConstantWide => "CONSTANT_WIDE",
            OpCode::PushNull => "PUSH_NULL",
            OpCode::PushTrue => "PUSH_TRUE",
            OpCode::PushFalse => "PUSH_FALSE",
            OpCode::PushZero => "PUSH_ZERO",
            OpCode::PushOne => "PUSH_ONE",
            OpCode::Pop => "POP",
            OpCode::Dup => "DUP",
            OpCode::GetLocal => "GET_LOCAL",
            OpCode::SetLocal => "SET_LOCAL",
            OpCode::GetLocalWide => "GET_LOCAL_WIDE",
            OpCode::SetLocalWide => "SET_LOCAL_WIDE",
            OpCode::SetStatic => "SET_STATIC",
            OpCode::Call => "CALL",
            OpCode::CallMethod => "CALL_METHOD",
            OpCode::New => "NEW",
            OpCode::Return => "RETURN",
            OpCode::ReturnVoid => "RETURN_VOID",
        }
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
