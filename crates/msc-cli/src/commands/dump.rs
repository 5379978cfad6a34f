use std::fs;
use std::path::PathBuf;

use msc_bytecode::{Colors, Program, annotate_call_targets, annotate_print_strings, dump};

use crate::error::{CliError, exit_with};

pub struct DumpArgs {
    pub container_path: PathBuf,
    pub annotate: bool,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    match render(&args) {
        Ok(listing) => print!("{}", listing),
        Err(e) => exit_with(e),
    }
}

pub fn render(args: &DumpArgs) -> Result<String, CliError> {
    let path = &args.container_path;
    let bytes = fs::read(path).map_err(CliError::io(path))?;
    let mut program = Program::from_bytes(&bytes).map_err(|source| CliError::Container {
        path: path.clone(),
        source,
    })?;

    if args.annotate {
        annotate_print_strings(&mut program);
        annotate_call_targets(&mut program);
    }
    Ok(dump(&program, Colors::new(args.color)))
}
