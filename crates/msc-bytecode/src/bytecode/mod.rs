//! MSC bytecode: instruction set, MSCSB container and disassembly.

mod annotate;
mod dump;
mod header;
mod instructions;
mod opcode;
mod program;


pub use annotate::{annotate_call_targets, annotate_print_strings};
pub use dump::dump;
pub use header::{Endian, Header};
pub use instructions::{Command, Instruction};
pub use opcode::{Opcode, PUSH_BIT, Param};
pub use program::{ContainerError, Placed, Program, Script};

/// Container magic bytes.
pub const MAGIC: [u8; 16] = [
    0xB2, 0xAC, 0xBC, 0xBA, 0xE6, 0x90, 0x32, 0x01, 0xFD, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Size of the fixed file header.
pub const HEADER_SIZE: usize = 0x40;

/// File position that code offsets are relative to.
pub const FILE_BASE: u32 = 0x30;

/// Offset of the first instruction.
pub const CODE_START: u32 = 0x10;

/// Alignment of the offset table and string section.
pub const SECTION_ALIGN: usize = 0x10;

/// Value written to the header's unknown field.
pub const HEADER_UNKNOWN: u32 = 0x16;

/// Round `n` up to a multiple of `align`.
#[inline]
pub fn align_up(n: usize, align: usize) -> usize {
    n.div_ceil(align) * align
}
