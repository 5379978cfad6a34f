use std::fs;
use std::path::{Path, PathBuf};

use msc_compiler::{CompileOptions, SyscallTable, Syscalls, TranslationUnit};

use crate::error::{CliError, exit_with};

pub struct CompileArgs {
    pub ast_path: PathBuf,
    pub output: PathBuf,
    pub autocast: bool,
    pub short_literals: bool,
    pub info: Option<PathBuf>,
}

pub fn run(args: CompileArgs) {
    if let Err(e) = execute(&args) {
        exit_with(e);
    }
}

/// Compile and write the container. The output file is only created once
/// compilation has succeeded.
pub fn execute(args: &CompileArgs) -> Result<(), CliError> {
    let unit: TranslationUnit = read_json(&args.ast_path)?;
    let syscalls = match &args.info {
        Some(path) => Syscalls::with_table(read_json::<SyscallTable>(path)?),
        None => Syscalls::builtin(),
    };
    let options = CompileOptions {
        autocast: args.autocast,
        short_literals: args.short_literals,
    };

    let bytes = msc_compiler::compile_to_bytes(&unit, &options, &syscalls)?;
    fs::write(&args.output, &bytes).map_err(CliError::io(&args.output))?;
    tracing::info!(
        output = %args.output.display(),
        bytes = bytes.len(),
        "wrote container"
    );
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = fs::read_to_string(path).map_err(CliError::io(path))?;
    serde_json::from_str(&text).map_err(CliError::json(path))
}
