//! Tests for CLI dispatch logic: argument parsing and params extraction.

use std::path::PathBuf;

use super::*;
use crate::cli::commands::{compile_command, dump_command};
use crate::commands::compile::CompileArgs;
use crate::commands::dump::DumpArgs;

#[test]
fn compile_defaults() {
    let m = compile_command()
        .try_get_matches_from(["compile", "fighter.json"])
        .unwrap();
    let params = CompileParams::from_matches(&m);

    assert_eq!(params.ast_path, PathBuf::from("fighter.json"));
    assert_eq!(params.output, None);
    assert!(!params.autocast);
    assert!(!params.push_int);
    assert_eq!(params.info, None);
}

#[test]
fn compile_short_flags() {
    let m = compile_command()
        .try_get_matches_from([
            "compile",
            "fighter.json",
            "-a",
            "-i",
            "-x",
            "table.json",
            "-o",
            "out.mscsb",
        ])
        .unwrap();
    let params = CompileParams::from_matches(&m);

    assert!(params.autocast);
    assert!(params.push_int);
    assert_eq!(params.info, Some(PathBuf::from("table.json")));
    assert_eq!(params.output, Some(PathBuf::from("out.mscsb")));
}

#[test]
fn compile_long_flags() {
    let m = compile_command()
        .try_get_matches_from(["compile", "a.json", "--autocast", "--push-int"])
        .unwrap();
    let args: CompileArgs = CompileParams::from_matches(&m).into();

    assert!(args.autocast);
    assert!(!args.short_literals);
}

#[test]
fn compile_output_defaults_to_input_stem() {
    let m = compile_command()
        .try_get_matches_from(["compile", "dir/fighter.json"])
        .unwrap();
    let args: CompileArgs = CompileParams::from_matches(&m).into();

    assert_eq!(args.output, PathBuf::from("dir/fighter.mscsb"));
    assert!(args.short_literals);
}

#[test]
fn explicit_info_path_wins() {
    let m = compile_command()
        .try_get_matches_from(["compile", "a.json", "--info", "mine.json"])
        .unwrap();
    let args: CompileArgs = CompileParams::from_matches(&m).into();

    assert_eq!(args.info, Some(PathBuf::from("mine.json")));
}

#[test]
fn compile_requires_input() {
    let result = compile_command().try_get_matches_from(["compile"]);
    assert!(result.is_err());
}

#[test]
fn dump_defaults() {
    let m = dump_command()
        .try_get_matches_from(["dump", "fighter.mscsb"])
        .unwrap();
    let params = DumpParams::from_matches(&m);

    assert_eq!(params.container_path, PathBuf::from("fighter.mscsb"));
    assert_eq!(params.color, ColorChoice::Auto);
    assert!(!params.no_annotate);
}

#[test]
fn dump_flags() {
    let m = dump_command()
        .try_get_matches_from(["dump", "fighter.mscsb", "--color", "never", "--no-annotate"])
        .unwrap();
    let args: DumpArgs = DumpParams::from_matches(&m).into();

    assert!(!args.color);
    assert!(!args.annotate);

    let m = dump_command()
        .try_get_matches_from(["dump", "fighter.mscsb", "--color", "always"])
        .unwrap();
    assert!(DumpParams::from_matches(&m).color.should_colorize());
}

#[test]
fn dump_rejects_unknown_color() {
    let result = dump_command().try_get_matches_from(["dump", "x.mscsb", "--color", "sometimes"]);
    assert!(result.is_err());
}

#[test]
fn dump_rejects_compile_flags() {
    let result = dump_command().try_get_matches_from(["dump", "x.mscsb", "--autocast"]);
    assert!(result.is_err());
}

#[test]
fn help_lists_both_commands() {
    let help = build_cli().render_help().to_string();
    assert!(help.contains("compile"));
    assert!(help.contains("dump"));
}
