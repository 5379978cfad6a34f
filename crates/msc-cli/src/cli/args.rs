//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Syntax tree JSON to compile (positional).
pub fn ast_path_arg() -> Arg {
    Arg::new("ast_path")
        .value_name("AST_JSON")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Syntax tree of the msC source, as JSON")
}

/// Compiled container to disassemble (positional).
pub fn container_path_arg() -> Arg {
    Arg::new("container_path")
        .value_name("MSCSB")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Compiled MSCSB file")
}

/// Write output to file (-o/--output).
pub fn output_file_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Output file (default: input name with .mscsb extension)")
}

/// Insert int/float conversions (-a/--autocast).
pub fn autocast_arg() -> Arg {
    Arg::new("autocast")
        .short('a')
        .long("autocast")
        .action(ArgAction::SetTrue)
        .help("Convert between int and float in mixed arithmetic and assignments")
}

/// Always encode integer literals as pushInt (-i/--push-int).
pub fn push_int_arg() -> Arg {
    Arg::new("push_int")
        .short('i')
        .long("push-int")
        .action(ArgAction::SetTrue)
        .help("Never use pushShort for small integer literals")
}

/// Syscall metadata table (-x/--info).
pub fn info_arg() -> Arg {
    Arg::new("info")
        .short('x')
        .long("info")
        .value_name("TABLE_JSON")
        .value_parser(value_parser!(PathBuf))
        .help("Syscall metadata table (default: ~/.mscinfo.json when present)")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Skip disassembly annotations (--no-annotate).
pub fn no_annotate_arg() -> Arg {
    Arg::new("no_annotate")
        .long("no-annotate")
        .action(ArgAction::SetTrue)
        .help("Don't annotate printf strings and call targets")
}
