//! Instruction IR with symbolic operands.
//!
//! Lowering emits [`Emit`] items: instructions whose operands may still be
//! labels or names, interleaved with label placements. The resolver turns
//! them into plain [`msc_bytecode::Command`]s.

use msc_bytecode::Opcode;

use crate::ast::Coord;

/// Compiler-synthesized jump target, unique within one compilation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub u32);

/// An instruction parameter before resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Value(u32),
    Label(Label),
    /// Named source label in the same function, else a function name.
    Symbol(String),
    /// `break`/`continue` with no enclosing loop.
    Unbound(Coord),
}

impl From<u32> for Operand {
    fn from(v: u32) -> Self {
        Operand::Value(v)
    }
}

impl From<Label> for Operand {
    fn from(l: Label) -> Self {
        Operand::Label(l)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionIR {
    pub opcode: Opcode,
    pub push: bool,
    pub operands: Vec<Operand>,
}

impl InstructionIR {
    pub fn new(opcode: Opcode, operands: Vec<Operand>) -> Self {
        debug_assert_eq!(operands.len(), opcode.params().len(), "{}", opcode.mnemonic());
        Self {
            opcode,
            push: false,
            operands,
        }
    }

    pub fn values(opcode: Opcode, values: &[u32]) -> Self {
        Self::new(opcode, values.iter().copied().map(Operand::Value).collect())
    }

    pub fn with_push(mut self, push: bool) -> Self {
        self.push = push;
        self
    }

    pub fn size(&self) -> usize {
        self.opcode.size()
    }
}

/// One item of a lowered instruction stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Emit {
    Instr(InstructionIR),
    Label(Label),
    /// `name:` in source; visible to `goto` within the same function.
    Named(String),
}

impl Emit {
    pub fn as_instr(&self) -> Option<&InstructionIR> {
        match self {
            Emit::Instr(i) => Some(i),
            _ => None,
        }
    }
}
