//! Test utilities: logging, program builders and instruction listings.

use msc_bytecode::Program;

use crate::ast::{Expr, FunctionDef, GlobalDecl, Item, Stmt, TranslationUnit, Type};
use crate::context::CompilationContext;
use crate::ir::{Emit, Operand};
use crate::{CompileOptions, Syscalls, assemble_script, compile};

/// Initialize a tracing subscriber at DEBUG level for the current test.
pub fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

pub fn global(name: &str, ty: Type) -> Item {
    Item::Global(GlobalDecl::new(name, ty))
}

pub fn func(name: &str, ret: Type, body: Vec<Stmt>) -> Item {
    Item::Function(FunctionDef::new(name, ret, body))
}

pub fn func_with(name: &str, ret: Type, params: &[(&str, Type)], body: Vec<Stmt>) -> Item {
    Item::Function(FunctionDef::new(name, ret, body).with_params(params))
}

/// `int main() { body }` as a one-function unit.
pub fn main_only(body: Vec<Stmt>) -> TranslationUnit {
    TranslationUnit::new(vec![func("main", Type::Int, body)])
}

pub fn assign(target: &str, value: Expr) -> Stmt {
    Stmt::expr(Expr::assign(crate::ast::AssignOp::Set, Expr::ident(target), value))
}

pub fn compile_default(unit: &TranslationUnit) -> Program {
    compile_with(unit, &CompileOptions::default())
}

pub fn compile_with(unit: &TranslationUnit, options: &CompileOptions) -> Program {
    init_test_logging();
    compile(unit, options, &Syscalls::builtin()).expect("compilation should succeed")
}

/// Resolved instructions of one script: `[-> ]mnemonic params`.
pub fn ops(program: &Program, script: &str) -> Vec<String> {
    let script = program
        .scripts
        .iter()
        .find(|s| s.name == script)
        .expect("script exists");
    script
        .instructions
        .iter()
        .map(|p| {
            let instr = &p.instruction;
            let params: Vec<String> = instr.operands().iter().map(|v| format!("{v:#x}")).collect();
            line(instr.is_pushed(), instr.mnemonic(), &params)
        })
        .collect()
}

/// Symbolic instruction stream of one function before resolution.
///
/// Labels print as `L<n>:` and label operands as `L<n>`.
pub fn lowered(unit: &TranslationUnit, name: &str, options: &CompileOptions) -> Vec<String> {
    init_test_logging();
    let syscalls = Syscalls::builtin();
    let mut ctx = CompilationContext::new(options, &syscalls);
    ctx.scan(unit).expect("declarations are valid");
    let func = unit
        .functions()
        .find(|f| f.name == name)
        .expect("function exists");
    let script = assemble_script(&mut ctx, func).expect("lowering should succeed");

    script
        .body
        .iter()
        .map(|item| match item {
            Emit::Label(l) => format!("L{}:", l.0),
            Emit::Named(n) => format!("{n}:"),
            Emit::Instr(instr) => {
                let params: Vec<String> = instr
                    .operands
                    .iter()
                    .map(|op| match op {
                        Operand::Value(v) => format!("{v:#x}"),
                        Operand::Label(l) => format!("L{}", l.0),
                        Operand::Symbol(s) => s.clone(),
                        Operand::Unbound(_) => "?".to_string(),
                    })
                    .collect();
                line(instr.push, instr.opcode.mnemonic(), &params)
            }
        })
        .collect()
}

fn line(pushed: bool, mnemonic: &str, params: &[String]) -> String {
    let mut out = String::new();
    if pushed {
        out.push_str("-> ");
    }
    out.push_str(mnemonic);
    if !params.is_empty() {
        out.push(' ');
        out.push_str(&params.join(", "));
    }
    out
}
