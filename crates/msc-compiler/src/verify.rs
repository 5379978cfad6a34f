//! Debug-only checks on a resolved program.
//!
//! Zero-cost in release builds.

#[cfg(debug_assertions)]
use msc_bytecode::{Command, Program};

/// Panic if any branch target is not the start of an instruction.
#[cfg(debug_assertions)]
pub fn verify(program: &Program) {
    for script in &program.scripts {
        for placed in &script.instructions {
            let Some(target) = placed
                .instruction
                .as_command()
                .and_then(Command::branch_target)
            else {
                continue;
            };
            let lands = program
                .script_at(target)
                .is_some_and(|s| program.scripts[s].instruction_at(target).is_some());
            assert!(
                lands,
                "{}: {} at {:#x} targets {:#x}, which is not an instruction start",
                script.name,
                placed.instruction.mnemonic(),
                placed.offset,
                target
            );
        }
    }
}
