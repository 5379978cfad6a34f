//! Human-readable disassembly of a [`Program`].
//!
//! Instruction lines follow the long-standing MSC listing format:
//!
//! ```text
//! 00000010:     begin                  0x0, 0x1
//! 00000015: ->  pushShort              0x1
//! ```
//!
//! The mnemonic column is padded so parameters start at column 37.

use std::fmt::Write as _;

use crate::Colors;

use super::program::{Placed, Program};

/// Column where instruction parameters begin.
const PARAMS_COLUMN: usize = 37;

/// Generate a disassembly listing of the whole program.
pub fn dump(program: &Program, colors: Colors) -> String {
    let mut out = String::new();

    dump_strings(&mut out, program, colors);
    let entry = program.entry_script();
    for (i, script) in program.scripts.iter().enumerate() {
        let c = &colors;
        write!(out, "{}[{}]{}", c.blue, script.name, c.reset).unwrap();
        if entry == Some(i) {
            write!(out, " {}(entry){}", c.dim, c.reset).unwrap();
        }
        out.push('\n');
        for placed in &script.instructions {
            dump_instruction(&mut out, placed, colors);
        }
        out.push('\n');
    }

    out
}

fn dump_strings(out: &mut String, program: &Program, colors: Colors) {
    if program.strings.is_empty() {
        return;
    }
    let c = &colors;
    writeln!(out, "{}[strings]{}", c.blue, c.reset).unwrap();
    for (i, s) in program.strings.iter().enumerate() {
        writeln!(out, "S{i} {}{s:?}{}", c.green, c.reset).unwrap();
    }
    out.push('\n');
}

fn dump_instruction(out: &mut String, placed: &Placed, colors: Colors) {
    let c = &colors;
    let instr = &placed.instruction;
    let arrow = if instr.is_pushed() { " -> " } else { "    " };
    let head = format!("{:08X}:{arrow} {} ", placed.offset, instr.mnemonic());

    let mut line = format!(
        "{}{:08X}:{}{arrow} {} ",
        c.dim,
        placed.offset,
        c.reset,
        instr.mnemonic()
    );

    let operands = instr.operands();
    if !operands.is_empty() {
        let pad = PARAMS_COLUMN.saturating_sub(head.len());
        line.push_str(&" ".repeat(pad));
        let params: Vec<String> = operands.iter().map(|v| format!("{v:#x}")).collect();
        line.push_str(&params.join(", "));
    }
    if let Some(comment) = &placed.comment {
        write!(line, "   {}#{comment}{}", c.green, c.reset).unwrap();
    }

    out.push_str(line.trim_end());
    out.push('\n');
}
