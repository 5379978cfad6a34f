//! MSC bytecode: the instruction set, the MSCSB container format and
//! disassembly helpers.
//!
//! This crate contains:
//! - The opcode table and instruction codec
//! - The program model with its container reader/writer
//! - Disassembly (`dump`) and best-effort annotators

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod bytecode;
mod colors;

pub use bytecode::{
    CODE_START, Command, ContainerError, Endian, FILE_BASE, HEADER_SIZE, HEADER_UNKNOWN, Header,
    Instruction, MAGIC, Opcode, PUSH_BIT, Param, Placed, Program, SECTION_ALIGN, Script,
    align_up, annotate_call_targets, annotate_print_strings, dump,
};
pub use colors::Colors;
