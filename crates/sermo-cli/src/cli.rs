//! Command-line surface for `sermo` (spec §6's driver commands, expanded
//! with the ambient flags a real build tool carries: `--verbose` toggles
//! log level, `--target` chooses the back end).
//!
//! Each subcommand maps to one driver command: `emit`, `check`, `build`,
//! `run`. Argument parsing is [`clap`]'s derive macros, matching the
//! teacher CLI's shape; dispatch lives in free functions below rather than
//! on `Commands` itself so each command stays independently testable.

use std::fs;
use std::io::{self, Read as _};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use sermo_base::{Interner, Target};
use sermo_codegen::{codegen_module, codegen_program, CodegenOptions};
use sermo_lang::compile_program;
use sermo_registry::Registry;

use crate::driver::{FsImportResolver, FsSourceReader, StdinSourceReader, STDIN_PATH};
use crate::report::report;
use crate::toolchain;

#[derive(Parser)]
#[command(name = "sermo")]
#[command(about = "The Sermo compiler", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Emit `debug`-level tracing instead of the default `info`.
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compile one file (or stdin, with `-`) and print the generated
    /// target source to stdout, or to `--output` if given.
    Emit {
        /// Source file to compile, or `-` to read from stdin.
        file: String,

        /// Back end to generate for: `ferrum`, `nebula`, or `glacies`.
        #[arg(long, default_value = "ferrum")]
        target: String,

        /// Write the generated source here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run the tokenizer, parser, and semantic analyzer over a file (and
    /// everything it imports) without generating any code.
    Check {
        /// Entry source file.
        file: PathBuf,
    },

    /// Compile an entry file and everything it imports, writing one
    /// generated file per source module under `--output`, preserving each
    /// module's path relative to the entry file's directory.
    Build {
        /// Entry source file.
        entry: PathBuf,

        /// Back end to generate for: `ferrum`, `nebula`, or `glacies`.
        #[arg(long, default_value = "ferrum")]
        target: String,

        /// Output directory for generated files.
        #[arg(long, default_value = "out")]
        output: PathBuf,
    },

    /// Compile an entry file, write the generated source to a temp file,
    /// and invoke the target's toolchain on it.
    Run {
        /// Entry source file.
        entry: PathBuf,

        /// Back end to generate for: `ferrum`, `nebula`, or `glacies`.
        #[arg(long, default_value = "ferrum")]
        target: String,

        /// Arguments forwarded to the generated program.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

/// Parses arguments, initializes tracing, and dispatches to the matching
/// command handler. Returns the process exit code (spec §6: "exit code is
/// 0 on clean, 1 on any diagnostic at any stage").
pub fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    dispatch(cli.command)
}

/// Runs one already-parsed [`Commands`] value. Split out from [`run_cli`]
/// so integration tests can drive a command via `Cli::parse_from` without
/// touching real `std::env::args`.
pub fn dispatch(command: Commands) -> i32 {
    match command {
        Commands::Emit { file, target, output } => cmd_emit(&file, &target, output.as_deref()),
        Commands::Check { file } => cmd_check(&file),
        Commands::Build { entry, target, output } => cmd_build(&entry, &target, &output),
        Commands::Run { entry, target, args } => cmd_run(&entry, &target, &args),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::new(filter)).try_init();
}

fn parse_target(name: &str) -> Result<Target, i32> {
    Target::parse(name).ok_or_else(|| {
        eprintln!("unknown target `{name}` (expected `ferrum`, `nebula`, or `glacies`)");
        1
    })
}

fn cmd_emit(file: &str, target: &str, output: Option<&Path>) -> i32 {
    let target = match parse_target(target) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let mut interner = Interner::new();
    let resolver = FsImportResolver;

    let (entry_path, program) = if file == "-" {
        let mut source = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut source) {
            eprintln!("could not read stdin: {err}");
            return 1;
        }
        let reader = StdinSourceReader::new(source);
        let program = compile_program(Path::new(STDIN_PATH), &mut interner, &reader, &resolver);
        (PathBuf::from(STDIN_PATH), program)
    } else {
        let reader = FsSourceReader;
        let entry_path = PathBuf::from(file);
        let program = compile_program(&entry_path, &mut interner, &reader, &resolver);
        (entry_path, program)
    };

    let mut diagnostics = program.diagnostics;
    if report(&mut diagnostics, &entry_path.display().to_string()) {
        return 1;
    }

    let Some(statements) = program.modules.get(&entry_path) else {
        eprintln!("internal error: entry module `{}` was not retained by the compiler", entry_path.display());
        return 1;
    };

    let registry = Registry::for_target(target);
    let options = CodegenOptions::for_target(target);
    let generated = match codegen_module(statements, &interner, options, &registry) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    match output {
        Some(path) => {
            if let Err(err) = fs::write(path, generated) {
                eprintln!("could not write `{}`: {err}", path.display());
                return 1;
            }
        }
        None => println!("{generated}"),
    }
    0
}

fn cmd_check(file: &Path) -> i32 {
    let mut interner = Interner::new();
    let reader = FsSourceReader;
    let resolver = FsImportResolver;
    let program = compile_program(file, &mut interner, &reader, &resolver);

    let mut diagnostics = program.diagnostics;
    if report(&mut diagnostics, &file.display().to_string()) {
        return 1;
    }
    println!("check passed");
    0
}

fn cmd_build(entry: &Path, target: &str, output: &Path) -> i32 {
    let target = match parse_target(target) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let mut interner = Interner::new();
    let reader = FsSourceReader;
    let resolver = FsImportResolver;
    let program = compile_program(entry, &mut interner, &reader, &resolver);

    let mut diagnostics = program.diagnostics;
    if report(&mut diagnostics, &entry.display().to_string()) {
        return 1;
    }

    let base_dir = entry.parent().unwrap_or_else(|| Path::new("."));
    let modules: std::collections::BTreeMap<_, _> =
        program.modules.into_iter().filter(|(path, _)| !is_stdlib_marker(path)).collect();

    let registry = Registry::for_target(target);
    let options = CodegenOptions::for_target(target);
    let generated = match codegen_program(&modules, &interner, &options, &registry) {
        Ok(generated) => generated,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    for module in &generated {
        let relative = module.path.strip_prefix(base_dir).unwrap_or(&module.path);
        let mut out_path = output.join(relative);
        out_path.set_extension(target_extension(target));
        if let Some(parent) = out_path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                eprintln!("could not create `{}`: {err}", parent.display());
                return 1;
            }
        }
        if let Err(err) = fs::write(&out_path, &module.source) {
            eprintln!("could not write `{}`: {err}", out_path.display());
            return 1;
        }
    }

    println!("built {} module(s) into {}", generated.len(), output.display());
    0
}

fn cmd_run(entry: &Path, target: &str, args: &[String]) -> i32 {
    let target = match parse_target(target) {
        Ok(t) => t,
        Err(code) => return code,
    };

    let mut interner = Interner::new();
    let reader = FsSourceReader;
    let resolver = FsImportResolver;
    let program = compile_program(entry, &mut interner, &reader, &resolver);

    let mut diagnostics = program.diagnostics;
    if report(&mut diagnostics, &entry.display().to_string()) {
        return 1;
    }

    let Some(statements) = program.modules.get(entry) else {
        eprintln!("internal error: entry module `{}` was not retained by the compiler", entry.display());
        return 1;
    };

    let registry = Registry::for_target(target);
    let options = CodegenOptions::for_target(target);
    let generated = match codegen_module(statements, &interner, options, &registry) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    let temp_dir = match tempfile::tempdir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("could not create a temp directory: {err}");
            return 1;
        }
    };
    let source_path = temp_dir.path().join(format!("program.{}", target_extension(target)));
    if let Err(err) = fs::write(&source_path, &generated) {
        eprintln!("could not write `{}`: {err}", source_path.display());
        return 1;
    }

    match toolchain::run_generated(target, &source_path, args) {
        Ok(Some(code)) => code,
        Ok(None) => {
            eprintln!("generated program terminated by signal");
            1
        }
        Err(err) => {
            eprintln!("could not run generated program: {err}");
            1
        }
    }
}

fn target_extension(target: Target) -> &'static str {
    match target {
        Target::Ferrum => "rs",
        Target::Nebula => "js",
        Target::Glacies => "glc",
    }
}

fn is_stdlib_marker(path: &Path) -> bool {
    path.to_str().is_some_and(|s| s.starts_with("<stdlib:"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_target_is_rejected() {
        assert!(parse_target("cobol").is_err());
    }

    #[test]
    fn known_targets_round_trip_through_parse() {
        for name in ["ferrum", "nebula", "glacies"] {
            assert!(parse_target(name).is_ok());
        }
    }

    #[test]
    fn target_extension_is_distinct_per_target() {
        let exts: std::collections::HashSet<_> =
            [Target::Ferrum, Target::Nebula, Target::Glacies].into_iter().map(target_extension).collect();
        assert_eq!(exts.len(), 3);
    }
}
