//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("msc")
        .about("msC compiler and MSC bytecode disassembler")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(compile_command())
        .subcommand(dump_command())
}

/// Compile a syntax tree to an MSCSB container.
pub fn compile_command() -> Command {
    Command::new("compile")
        .about("Compile an msC syntax tree to MSCSB bytecode")
        .after_help(
            r#"EXAMPLES:
  msc compile fighter.json                # writes fighter.mscsb
  msc compile fighter.json -o out.mscsb   # explicit output
  msc compile fighter.json -a             # with int/float autocasting
  msc compile fighter.json -x info.json   # with a syscall metadata table"#,
        )
        .arg(ast_path_arg())
        .arg(output_file_arg())
        .arg(autocast_arg())
        .arg(push_int_arg())
        .arg(info_arg())
}

/// Disassemble an MSCSB container.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Disassemble MSCSB bytecode")
        .after_help(
            r#"EXAMPLES:
  msc dump fighter.mscsb                  # annotated listing
  msc dump fighter.mscsb --no-annotate    # raw listing
  msc dump fighter.mscsb --color always   # force colors"#,
        )
        .arg(container_path_arg())
        .arg(color_arg())
        .arg(no_annotate_arg())
}
