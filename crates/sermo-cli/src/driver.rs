//! Filesystem-backed implementations of the core's I/O boundary
//! (`sermo_lang::pipeline::{SourceReader, ImportResolver}`, spec §6): the
//! only place in this crate that touches `std::fs`.

use std::fs;
use std::path::{Component, Path, PathBuf};

use sermo_lang::{ImportResolver, SourceReader};
use sermo_registry::StdlibModule;

const SOURCE_EXTENSION: &str = "srm";

/// Reads `.srm` files from disk. Specifiers resolved to a stdlib marker
/// path (see [`FsImportResolver`]) read back as an empty module: the
/// registry, not a source file, is the source of truth for what a stdlib
/// module exports, so there is nothing to parse.
pub struct FsSourceReader;

impl SourceReader for FsSourceReader {
    fn read(&self, canonical_path: &Path) -> std::io::Result<String> {
        if is_stdlib_marker(canonical_path) {
            return Ok(String::new());
        }
        fs::read_to_string(canonical_path)
    }
}

/// Resolves `importa ... ex "specifier"` strings against the real
/// filesystem (spec §6): a leading `.`/`..` names a relative module file,
/// normalized and canonicalized when the target exists (spec §5.6
/// "Source files ... Import specifiers: relative paths (normalized and
/// canonicalized, resolving symlinks)"); anything else is checked against
/// the stdlib module names the registry knows about.
pub struct FsImportResolver;

impl ImportResolver for FsImportResolver {
    fn resolve(&self, from: &Path, specifier: &str) -> Option<PathBuf> {
        if specifier.starts_with('.') || specifier.starts_with('/') {
            let base = from.parent().unwrap_or_else(|| Path::new("."));
            let mut joined = if specifier.starts_with('/') { PathBuf::from(specifier) } else { base.join(specifier) };
            if joined.extension().is_none() {
                joined.set_extension(SOURCE_EXTENSION);
            }
            let normalized = lexically_normalize(&joined);
            return Some(fs::canonicalize(&normalized).unwrap_or(normalized));
        }

        stdlib_module_named(specifier).map(stdlib_marker_path)
    }
}

fn stdlib_module_named(specifier: &str) -> Option<StdlibModule> {
    [
        StdlibModule::Collection,
        StdlibModule::FileSystem,
        StdlibModule::Networking,
        StdlibModule::Time,
        StdlibModule::Math,
        StdlibModule::KvStore,
        StdlibModule::Process,
        StdlibModule::Ipc,
    ]
    .into_iter()
    .find(|m| m.name() == specifier)
}

fn stdlib_marker_path(module: StdlibModule) -> PathBuf {
    PathBuf::from(format!("<stdlib:{}>", module.name()))
}

fn is_stdlib_marker(path: &Path) -> bool {
    path.to_str().is_some_and(|s| s.starts_with("<stdlib:"))
}

/// Collapses `.`/`..` components without touching the filesystem, so a
/// specifier resolves to a stable path even before the target file exists
/// (needed so a missing-module diagnostic can still name a sensible path).
fn lexically_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// The marker path `emit` gives a module compiled from stdin rather than a
/// real file (spec §6: "emit (stdin or file -> target text ...)").
pub const STDIN_PATH: &str = "<stdin>";

/// Reads a single in-memory source under [`STDIN_PATH`], falling back to
/// [`FsSourceReader`] for anything else a stdin-rooted module imports.
pub struct StdinSourceReader {
    source: String,
}

impl StdinSourceReader {
    pub fn new(source: String) -> Self {
        StdinSourceReader { source }
    }
}

impl SourceReader for StdinSourceReader {
    fn read(&self, canonical_path: &Path) -> std::io::Result<String> {
        if canonical_path == Path::new(STDIN_PATH) {
            return Ok(self.source.clone());
        }
        FsSourceReader.read(canonical_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdlib_specifier_resolves_to_a_marker_path() {
        let resolver = FsImportResolver;
        let resolved = resolver.resolve(Path::new("main.srm"), "fs").expect("fs is a known stdlib module");
        assert!(is_stdlib_marker(&resolved));
    }

    #[test]
    fn unknown_bare_specifier_is_unresolved() {
        let resolver = FsImportResolver;
        assert!(resolver.resolve(Path::new("main.srm"), "not_a_module").is_none());
    }

    #[test]
    fn relative_specifier_gains_the_source_extension() {
        let resolver = FsImportResolver;
        let resolved = resolver.resolve(Path::new("src/main.srm"), "./lib").unwrap();
        assert_eq!(resolved.extension().and_then(|e| e.to_str()), Some("srm"));
        assert!(resolved.ends_with("lib.srm"));
    }

    #[test]
    fn stdlib_marker_reads_back_as_an_empty_module() {
        let reader = FsSourceReader;
        let source = reader.read(Path::new("<stdlib:fs>")).unwrap();
        assert!(source.is_empty());
    }

    #[test]
    fn lexical_normalize_collapses_parent_components() {
        let normalized = lexically_normalize(Path::new("src/routes/../lib.srm"));
        assert_eq!(normalized, PathBuf::from("src/lib.srm"));
    }
}
