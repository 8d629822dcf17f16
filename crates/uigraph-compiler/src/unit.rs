//! Compiled unit: static fields, procedures and the shared constant pool.

use std::fmt::Write as _;

use bitflags::bitflags;
use uigraph_core::{ClassName, TypeHash, TypeRef};

use crate::bytecode::{BytecodeChunk, ConstantPool, OpCode};

bitflags! {
    /// Access and storage modifiers of a unit member.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MemberFlags: u32 {
        const PUBLIC = 0x0001;
        const STATIC = 0x0008;
        const FINAL = 0x0010;
    }
}

/// One static storage slot of the unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Fully qualified `$`-separated name.
    pub name: String,
    pub ty: TypeRef,
    pub flags: MemberFlags,
    pub hash: TypeHash,
}

/// Debug range of one local slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVarInfo {
    pub slot: u32,
    /// Name of the node held in the slot.
    pub name: String,
    pub ty: TypeRef,
    /// First bytecode offset where the slot is live.
    pub start: usize,
    /// Offset just past the node's last instruction.
    pub end: usize,
}

#[derive(Debug, Clone)]
pub struct Procedure {
    pub name: String,
    pub hash: TypeHash,
    pub flags: MemberFlags,
    pub params: Vec<TypeRef>,
    pub return_type: TypeRef,
    /// Failures the procedure is declared to raise.
    pub throws: Vec<ClassName>,
    pub code: BytecodeChunk,
    pub locals: Vec<LocalVarInfo>,
    pub max_locals: u32,
}

/// Output of compiling one tree.
#[derive(Debug, Clone)]
pub struct CompiledUnit {
    pub name: ClassName,
    pub hash: TypeHash,
    /// Sorted by name.
    pub fields: Vec<FieldDecl>,
    pub procedures: Vec<Procedure>,
    pub constants: ConstantPool,
}

impl CompiledUnit {
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn procedure(&self, name: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.name == name)
    }

    /// Render a procedure as text, one instruction per line, with symbol names.
    pub fn disassemble(&self, procedure: &Procedure) -> String {
        let code = &procedure.code;
        let mut out = String::new();
        let _ = writeln!(out, "== {}.{} ==", self.name, procedure.name);

        for (offset, op) in code.instructions() {
            let byte = |at: usize| code.read_byte(offset + at).unwrap_or(0);
            let word = |at: usize| code.read_u16(offset + at).unwrap_or(0);
            let operands = match op {
                OpCode::Constant => self.constants.describe(byte(1) as u32),
                OpCode::ConstantWide | OpCode::SetStatic => {
                    self.constants.describe(word(1) as u32)
                }
                OpCode::GetLocal | OpCode::SetLocal => byte(1).to_string(),
                OpCode::GetLocalWide | OpCode::SetLocalWide => word(1).to_string(),
                OpCode::Call | OpCode::CallMethod => {
                    format!("{} ({} args)", self.constants.describe(word(1) as u32), byte(3))
                }
                OpCode::New => self.constants.describe(word(1) as u32),
                _ => String::new(),
            };
            let line = code.line_at(offset).unwrap_or(0);
            let _ = writeln!(
                out,
                "{offset:04} {line:>4} {:<14} {operands}",
                op.name()
            );
        }
        out.truncate(out.trim_end().len());
        out
    }
}
