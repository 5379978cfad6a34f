//! Instruction encoding and decoding.
//!
//! Wire layout: one opcode byte (`id | PUSH_BIT` when the result is consumed)
//! followed by the opcode's parameter block, big-endian.

use super::opcode::{Opcode, PUSH_BIT, Param};

/// A decoded or compiled instruction with a known opcode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub opcode: Opcode,
    /// Result is consumed by an enclosing operation.
    pub push: bool,
    /// One value per entry in `opcode.params()`.
    pub params: Vec<u32>,
}

impl Command {
    pub fn new(opcode: Opcode, params: impl Into<Vec<u32>>) -> Self {
        let params = params.into();
        debug_assert_eq!(
            params.len(),
            opcode.params().len(),
            "parameter count mismatch for {}",
            opcode.mnemonic()
        );
        Self {
            opcode,
            push: false,
            params,
        }
    }

    pub fn with_push(mut self, push: bool) -> Self {
        self.push = push;
        self
    }

    pub fn pushed(self) -> Self {
        self.with_push(true)
    }

    pub fn size(&self) -> usize {
        self.opcode.size()
    }

    /// Net operand-stack change: one value produced when pushed, minus pops.
    pub fn stack_effect(&self) -> i32 {
        i32::from(self.push) - self.opcode.pops(&self.params)
    }

    /// Absolute code offset this instruction may transfer control to.
    pub fn branch_target(&self) -> Option<u32> {
        if self.opcode.is_branch() {
            self.params.first().copied()
        } else {
            None
        }
    }

    fn opcode_byte(&self) -> u8 {
        let id = self.opcode as u8;
        if self.push { id | PUSH_BIT } else { id }
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.push(self.opcode_byte());
        for (param, &value) in self.opcode.params().iter().zip(&self.params) {
            let value = value & param.mask();
            match param {
                Param::U8 => out.push(value as u8),
                Param::U16 => out.extend_from_slice(&(value as u16).to_be_bytes()),
                Param::U32 => out.extend_from_slice(&value.to_be_bytes()),
            }
        }
    }
}

/// One entry of an instruction stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    Command(Command),
    /// Byte that does not start a decodable instruction, kept verbatim.
    RawByte(u8),
    /// Opaque 32-bit word, big-endian.
    RawWord(u32),
}

impl From<Command> for Instruction {
    fn from(cmd: Command) -> Self {
        Instruction::Command(cmd)
    }
}

impl Instruction {
    pub fn size(&self) -> usize {
        match self {
            Instruction::Command(cmd) => cmd.size(),
            Instruction::RawByte(_) => 1,
            Instruction::RawWord(_) => 4,
        }
    }

    pub fn as_command(&self) -> Option<&Command> {
        match self {
            Instruction::Command(cmd) => Some(cmd),
            _ => None,
        }
    }

    pub fn as_command_mut(&mut self) -> Option<&mut Command> {
        match self {
            Instruction::Command(cmd) => Some(cmd),
            _ => None,
        }
    }

    pub fn opcode(&self) -> Option<Opcode> {
        self.as_command().map(|cmd| cmd.opcode)
    }

    pub fn is_pushed(&self) -> bool {
        self.as_command().is_some_and(|cmd| cmd.push)
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Command(cmd) => cmd.opcode.mnemonic(),
            Instruction::RawByte(_) => "byte",
            Instruction::RawWord(_) => "word",
        }
    }

    /// Parameter values as shown by the disassembler.
    pub fn operands(&self) -> Vec<u32> {
        match self {
            Instruction::Command(cmd) => cmd.params.clone(),
            Instruction::RawByte(b) => vec![u32::from(*b)],
            Instruction::RawWord(w) => vec![*w],
        }
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Instruction::Command(cmd) => cmd.write_to(out),
            Instruction::RawByte(b) => out.push(*b),
            Instruction::RawWord(w) => out.extend_from_slice(&w.to_be_bytes()),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        self.write_to(&mut out);
        out
    }

    /// Decode the instruction at the start of `bytes`.
    ///
    /// Returns the instruction and the number of bytes consumed, or `None` for
    /// empty input. Unknown opcodes and truncated parameter blocks decode as
    /// [`Instruction::RawByte`] so that re-encoding reproduces the input.
    pub fn decode(bytes: &[u8]) -> Option<(Instruction, usize)> {
        let (&byte, rest) = bytes.split_first()?;
        let Some(opcode) = Opcode::from_u8(byte & !PUSH_BIT) else {
            return Some((Instruction::RawByte(byte), 1));
        };
        if rest.len() < opcode.param_size() {
            return Some((Instruction::RawByte(byte), 1));
        }

        let mut params = Vec::with_capacity(opcode.params().len());
        let mut pos = 0;
        for param in opcode.params() {
            let value = match param {
                Param::U8 => u32::from(rest[pos]),
                Param::U16 => u32::from(u16::from_be_bytes([rest[pos], rest[pos + 1]])),
                Param::U32 => u32::from_be_bytes([
                    rest[pos],
                    rest[pos + 1],
                    rest[pos + 2],
                    rest[pos + 3],
                ]),
            };
            params.push(value);
            pos += param.size();
        }

        let cmd = Command {
            opcode,
            push: byte & PUSH_BIT != 0,
            params,
        };
        Some((cmd.into(), 1 + pos))
    }

    /// Decode a whole byte range into instructions paired with their offsets.
    pub fn decode_all(bytes: &[u8], base: u32) -> Vec<(u32, Instruction)> {
        let mut out = Vec::new();
        let mut pos = 0;
        while let Some((instr, len)) = Instruction::decode(&bytes[pos..]) {
            out.push((base + pos as u32, instr));
            pos += len;
        }
        out
    }
}
