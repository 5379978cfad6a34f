//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! - `*Params` structs mirror command `*Args` but are populated from clap
//! - `Into<*Args>` impls bridge dispatch to the command handlers

use std::path::PathBuf;

use clap::ArgMatches;

use super::ColorChoice;
use crate::commands::compile::CompileArgs;
use crate::commands::dump::DumpArgs;

pub struct CompileParams {
    pub ast_path: PathBuf,
    pub output: Option<PathBuf>,
    pub autocast: bool,
    pub push_int: bool,
    pub info: Option<PathBuf>,
}

impl CompileParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            ast_path: m
                .get_one::<PathBuf>("ast_path")
                .cloned()
                .unwrap_or_default(),
            output: m.get_one::<PathBuf>("output").cloned(),
            autocast: m.get_flag("autocast"),
            push_int: m.get_flag("push_int"),
            info: m.get_one::<PathBuf>("info").cloned(),
        }
    }
}

impl From<CompileParams> for CompileArgs {
    fn from(p: CompileParams) -> Self {
        let output = p
            .output
            .unwrap_or_else(|| p.ast_path.with_extension("mscsb"));
        Self {
            ast_path: p.ast_path,
            output,
            autocast: p.autocast,
            short_literals: !p.push_int,
            info: p.info.or_else(default_info_path),
        }
    }
}

/// `~/.mscinfo.json`, when it exists.
fn default_info_path() -> Option<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".mscinfo.json"))
        .filter(|path| path.is_file())
}

pub struct DumpParams {
    pub container_path: PathBuf,
    pub color: ColorChoice,
    pub no_annotate: bool,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            container_path: m
                .get_one::<PathBuf>("container_path")
                .cloned()
                .unwrap_or_default(),
            color: parse_color(m),
            no_annotate: m.get_flag("no_annotate"),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            container_path: p.container_path,
            annotate: !p.no_annotate,
            color: p.color.should_colorize(),
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
