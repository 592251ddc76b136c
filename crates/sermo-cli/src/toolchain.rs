//! The target-to-toolchain lookup table `run` needs (spec §6: "`run` shells
//! out to the target toolchain named by `--target`; which toolchain binary
//! corresponds to which target is a CLI-level lookup table, not a core
//! concern").

use std::path::Path;
use std::process::Command;

use sermo_base::Target;

/// How a target's generated source gets turned into a running process.
enum ToolchainKind {
    /// Run the file directly with an interpreter (`node file.js`).
    Interpret { interpreter: &'static str },
    /// Compile to a binary first, then execute it (`rustc file.rs -o out`).
    Compile { compiler: &'static str },
}

fn toolchain_for(target: Target) -> ToolchainKind {
    match target {
        Target::Ferrum => ToolchainKind::Compile { compiler: "rustc" },
        Target::Nebula | Target::Glacies => ToolchainKind::Interpret { interpreter: "node" },
    }
}

/// Runs a generated source file with the toolchain its target names,
/// passing `args` through to the program, and returns the child's exit
/// code (or `None` if it was killed by a signal).
pub fn run_generated(target: Target, source_path: &Path, args: &[String]) -> std::io::Result<Option<i32>> {
    match toolchain_for(target) {
        ToolchainKind::Interpret { interpreter } => {
            let status = Command::new(interpreter).arg(source_path).args(args).status()?;
            Ok(status.code())
        }
        ToolchainKind::Compile { compiler } => {
            let binary_path = source_path.with_extension(std::env::consts::EXE_SUFFIX.trim_start_matches('.'));
            let compile_status = Command::new(compiler).arg(source_path).arg("-o").arg(&binary_path).status()?;
            if !compile_status.success() {
                return Ok(compile_status.code());
            }
            let status = Command::new(&binary_path).args(args).status()?;
            Ok(status.code())
        }
    }
}
