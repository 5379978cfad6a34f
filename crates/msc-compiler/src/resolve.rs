//! Whole-program reference resolution.
//!
//! Pass 1 lays every script out from [`CODE_START`] and records where each
//! label and script lands. Pass 2 rewrites symbolic operands to those
//! offsets. Pass 1 completes before any rewrite, so calls to functions
//! defined later in the source resolve like any other.

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use msc_bytecode::{CODE_START, Command, Instruction, Program, Script};

use crate::assemble::AssembledScript;
use crate::error::ResolveError;
use crate::ir::{Emit, InstructionIR, Label, Operand};

/// Offsets recorded by the layout pass.
struct Layout<'s> {
    labels: BTreeMap<Label, u32>,
    /// Script starts by name, first definition wins.
    functions: IndexMap<&'s str, u32>,
    /// Start offset of each script, by index.
    starts: Vec<u32>,
    /// Source labels of each script, by index.
    named: Vec<HashMap<&'s str, u32>>,
}

fn layout(scripts: &[AssembledScript]) -> Layout<'_> {
    let mut out = Layout {
        labels: BTreeMap::new(),
        functions: IndexMap::new(),
        starts: Vec::with_capacity(scripts.len()),
        named: Vec::with_capacity(scripts.len()),
    };

    let mut pos = CODE_START;
    for script in scripts {
        out.functions.entry(script.name.as_str()).or_insert(pos);
        out.starts.push(pos);
        let mut named = HashMap::new();
        for item in &script.body {
            match item {
                Emit::Instr(instr) => pos += instr.size() as u32,
                Emit::Label(label) => {
                    out.labels.insert(*label, pos);
                }
                Emit::Named(name) => {
                    named.entry(name.as_str()).or_insert(pos);
                }
            }
        }
        out.named.push(named);
    }
    out
}

/// Resolve every script and assemble the final program.
///
/// The entry point is the start of `main`, or [`CODE_START`] when there is
/// no `main`.
pub fn resolve(scripts: &[AssembledScript], strings: Vec<String>) -> Result<Program, ResolveError> {
    let layout = layout(scripts);

    let mut resolved = Vec::with_capacity(scripts.len());
    for (index, script) in scripts.iter().enumerate() {
        let instructions = script
            .body
            .iter()
            .filter_map(Emit::as_instr)
            .map(|instr| resolve_instruction(instr, &layout, index, &script.name))
            .collect::<Result<Vec<_>, _>>()?;
        resolved.push(Script::new(
            script.name.clone(),
            layout.starts[index],
            instructions,
        ));
    }

    let entry_point = layout.functions.get("main").copied().unwrap_or(CODE_START);
    tracing::debug!(
        scripts = resolved.len(),
        labels = layout.labels.len(),
        entry_point,
        "resolved references"
    );

    let program = Program {
        scripts: resolved,
        strings,
        entry_point,
    };

    #[cfg(debug_assertions)]
    crate::verify::verify(&program);

    Ok(program)
}

fn resolve_instruction(
    instr: &InstructionIR,
    layout: &Layout<'_>,
    index: usize,
    script: &str,
) -> Result<Instruction, ResolveError> {
    let params = instr
        .operands
        .iter()
        .map(|operand| match operand {
            Operand::Value(v) => Ok(*v),
            Operand::Label(label) => {
                layout
                    .labels
                    .get(label)
                    .copied()
                    .ok_or_else(|| ResolveError::UnresolvedReference {
                        name: format!("L{}", label.0),
                        script: script.to_string(),
                    })
            }
            Operand::Symbol(name) => layout.named[index]
                .get(name.as_str())
                .or_else(|| layout.functions.get(name.as_str()))
                .copied()
                .ok_or_else(|| ResolveError::UnresolvedReference {
                    name: name.clone(),
                    script: script.to_string(),
                }),
            Operand::Unbound(coord) => Err(ResolveError::UnboundJump {
                script: script.to_string(),
                coord: *coord,
            }),
        })
        .collect::<Result<Vec<u32>, _>>()?;

    Ok(Command::new(instr.opcode, params)
        .with_push(instr.push)
        .into())
}
