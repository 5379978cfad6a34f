//! Script assembly: one lowered function body plus its prologue and epilogue.

use msc_bytecode::Opcode;

use crate::ast::FunctionDef;
use crate::context::{CompilationContext, Locals};
use crate::error::CompileError;
use crate::ir::{Emit, InstructionIR};
use crate::lower::Lowerer;

/// A function's instruction stream before reference resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembledScript {
    pub name: String,
    pub body: Vec<Emit>,
}

/// Lower `func` to `begin argc, locals; body; end`.
///
/// Parameters occupy the first local slots in declaration order.
pub fn assemble_script(
    ctx: &mut CompilationContext<'_>,
    func: &FunctionDef,
) -> Result<AssembledScript, CompileError> {
    let mut locals = Locals::default();
    for param in &func.params {
        locals.declare(&param.name, param.ty);
    }

    let mut lowerer = Lowerer::new(ctx, locals);
    lowerer.stmts(&func.body)?;
    let (body, locals) = lowerer.finish();

    let argc = func.params.len() as u32;
    let begin = InstructionIR::values(Opcode::Begin, &[argc, locals.len() as u32]);

    let mut out = Vec::with_capacity(body.len() + 2);
    out.push(Emit::Instr(begin));
    out.extend(body);
    out.push(Emit::Instr(InstructionIR::values(Opcode::End, &[])));

    tracing::debug!(
        script = %func.name,
        argc,
        locals = locals.len(),
        items = out.len(),
        "assembled script"
    );
    Ok(AssembledScript {
        name: func.name.clone(),
        body: out,
    })
}
