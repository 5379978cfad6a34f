//! Best-effort disassembly annotations.
//!
//! Both passes only recognize straight-line patterns and leave an
//! instruction untouched when the pattern is absent.

use super::opcode::Opcode;
use super::program::{Placed, Program};

/// Attach the format string to every `printf` whose first argument is a
/// string-table literal.
pub fn annotate_print_strings(program: &mut Program) {
    let Program {
        scripts, strings, ..
    } = program;

    for script in scripts.iter_mut() {
        for i in 0..script.instructions.len() {
            let Some(cmd) = script.instructions[i].instruction.as_command() else {
                continue;
            };
            if cmd.opcode != Opcode::Printf || cmd.params[0] == 0 {
                continue;
            }
            let text = first_argument(&script.instructions, i, cmd.params[0])
                .and_then(|j| literal(&script.instructions[j]))
                .and_then(|index| strings.get(index as usize));
            if let Some(text) = text {
                script.instructions[i].comment = Some(text.clone());
            }
        }
    }
}

/// Name the callee of `callFunc`-family instructions whose target was pushed
/// as a literal address.
pub fn annotate_call_targets(program: &mut Program) {
    let mut found = Vec::new();

    for (s, script) in program.scripts.iter().enumerate() {
        for (i, placed) in script.instructions.iter().enumerate() {
            let is_call = matches!(
                placed.instruction.opcode(),
                Some(Opcode::CallFunc | Opcode::CallFunc2 | Opcode::CallFunc3)
            );
            if !is_call {
                continue;
            }
            let Some(pusher) = script.instructions[..i]
                .iter()
                .rev()
                .find(|p| p.instruction.is_pushed())
            else {
                continue;
            };
            if let Some(callee) = literal(pusher).and_then(|addr| program.script_at(addr)) {
                found.push((s, i, program.scripts[callee].name.clone()));
            }
        }
    }

    for (s, i, name) in found {
        program.scripts[s].instructions[i].comment = Some(name);
    }
}

/// Value of a `pushInt`/`pushShort` literal.
fn literal(placed: &Placed) -> Option<u32> {
    placed
        .instruction
        .as_command()
        .filter(|cmd| matches!(cmd.opcode, Opcode::PushInt | Opcode::PushShort))
        .map(|cmd| cmd.params[0])
}

/// Walk backwards from the instruction at `at` to the one that pushed the
/// first of its `argc` arguments. Gives up at any control transfer.
fn first_argument(instructions: &[Placed], at: usize, argc: u32) -> Option<usize> {
    let mut needed = argc as i32;
    for j in (0..at).rev() {
        let cmd = instructions[j].instruction.as_command()?;
        if cmd.opcode.is_branch() {
            return None;
        }
        needed -= i32::from(cmd.push);
        if needed == 0 && cmd.push {
            return Some(j);
        }
        needed += cmd.opcode.pops(&cmd.params);
    }
    None
}
