//! The front end's external I/O boundary (spec §6): two trait objects the
//! driver supplies so the core never touches the filesystem directly, plus
//! [`compile_program`], which discovers, parses, and semantically analyzes
//! every module reachable from an entry file.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};

use sermo_base::{Diagnostic, Interner};

use crate::ast::{Statement, StatementKind};
use crate::lexer::Lexer;
use crate::parser;
use crate::semantics::{self, ModuleGraph, ModuleInput};

/// Reads source text by canonical path. The driver's only file-system read
/// path into the compiler.
pub trait SourceReader {
    fn read(&self, canonical_path: &Path) -> std::io::Result<String>;
}

/// Resolves an `importa ... ex "specifier"` string, relative to the
/// importing file, to the canonical path of the module it names.
pub trait ImportResolver {
    fn resolve(&self, from: &Path, specifier: &str) -> Option<PathBuf>;
}

/// Everything a completed compilation produced: the analyzed module graph
/// and every diagnostic raised across lexing, parsing, and analysis. The
/// caller (`sermo-cli`) decides whether any diagnostic's severity should
/// halt later stages (spec §6: "a non-empty diagnostic list ... sets the
/// exit code; the compiler does not attempt to run later stages on broken
/// input").
pub struct CompiledProgram {
    pub graph: ModuleGraph,
    pub diagnostics: Vec<Diagnostic>,
    /// Each discovered module's parsed statements, keyed by canonical path.
    /// The semantic analyzer only needs `ModuleInput` transiently to build
    /// the [`ModuleGraph`]'s scopes; codegen needs the AST itself, so it is
    /// kept here rather than discarded after analysis.
    pub modules: BTreeMap<PathBuf, Vec<Statement>>,
}

/// Discovers every module reachable from `entry` by following `importa`
/// statements (via `resolver`), reading each one (via `reader`), and
/// running lexing, parsing, and cross-module semantic analysis over the
/// whole set.
pub fn compile_program(
    entry: &Path,
    interner: &mut Interner,
    reader: &dyn SourceReader,
    resolver: &dyn ImportResolver,
) -> CompiledProgram {
    let mut diagnostics = Vec::new();
    let mut discovered: BTreeMap<PathBuf, Vec<Statement>> = BTreeMap::new();
    let mut import_edges: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    let mut queue = VecDeque::new();
    let mut queued: BTreeSet<PathBuf> = BTreeSet::new();

    queue.push_back(entry.to_path_buf());
    queued.insert(entry.to_path_buf());

    while let Some(path) = queue.pop_front() {
        let source = match reader.read(&path) {
            Ok(text) => text,
            Err(err) => {
                diagnostics.push(Diagnostic::error(
                    "E-UNRESOLVED-IMPORT",
                    format!("could not read `{}`: {err}", path.display()),
                    sermo_base::Span::point(sermo_base::Position::START),
                ));
                continue;
            }
        };

        let (tokens, lex_errors) = Lexer::new(&source, interner).tokenize();
        diagnostics.extend(lex_errors);
        let (module, parse_errors) = parser::parse(tokens, interner);
        diagnostics.extend(parse_errors);

        let mut edges = Vec::new();
        for stmt in &module.statements {
            if let StatementKind::ImportDeclaration(decl) = &stmt.kind {
                match resolver.resolve(&path, &decl.source) {
                    Some(resolved) => {
                        if queued.insert(resolved.clone()) {
                            queue.push_back(resolved.clone());
                        }
                        edges.push(resolved);
                    }
                    None => {
                        diagnostics.push(Diagnostic::error(
                            "E-UNRESOLVED-IMPORT",
                            format!("could not resolve import of `{}`", decl.source),
                            stmt.span,
                        ));
                    }
                }
            }
        }

        import_edges.insert(path.clone(), edges);
        discovered.insert(path, module.statements);
    }

    let modules = discovered.clone();

    let inputs = discovered
        .into_iter()
        .map(|(path, statements)| {
            let imports = import_edges.remove(&path).unwrap_or_default();
            ModuleInput { path, statements, imports }
        })
        .collect();

    let (graph, analysis_diagnostics) = semantics::resolve_module_graph(interner, inputs);
    diagnostics.extend(analysis_diagnostics);

    CompiledProgram { graph, diagnostics, modules }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    struct MapReader(HashMap<PathBuf, String>);

    impl SourceReader for MapReader {
        fn read(&self, canonical_path: &Path) -> std::io::Result<String> {
            self.0
                .get(canonical_path)
                .cloned()
                .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "no such module"))
        }
    }

    struct SpecifierResolver;

    impl ImportResolver for SpecifierResolver {
        fn resolve(&self, _from: &Path, specifier: &str) -> Option<PathBuf> {
            Some(PathBuf::from(format!("{}.srm", specifier.trim_start_matches("./"))))
        }
    }

    #[test]
    fn compiles_an_entry_module_with_one_import() {
        let mut files = HashMap::new();
        files.insert(PathBuf::from("main.srm"), r#"importa { adde } ex "./lib" munus entry() fit numerus { redde adde(1, 2) }"#.to_string());
        files.insert(PathBuf::from("lib.srm"), "munus adde(a: numerus, b: numerus) fit numerus { redde a }".to_string());
        let reader = MapReader(files);
        let resolver = SpecifierResolver;
        let mut interner = Interner::new();
        let program = compile_program(Path::new("main.srm"), &mut interner, &reader, &resolver);
        assert!(!program.diagnostics.iter().any(|d| d.is_error()), "{:?}", program.diagnostics);
        assert!(program.graph.get(Path::new("lib.srm")).is_some());
        assert!(program.graph.get(Path::new("main.srm")).is_some());
    }

    #[test]
    fn missing_import_source_is_reported() {
        let mut files = HashMap::new();
        files.insert(PathBuf::from("main.srm"), r#"importa { adde } ex "./missing""#.to_string());
        let reader = MapReader(files);
        let resolver = SpecifierResolver;
        let mut interner = Interner::new();
        let program = compile_program(Path::new("main.srm"), &mut interner, &reader, &resolver);
        assert!(program.diagnostics.iter().any(|d| d.code == "E-UNRESOLVED-IMPORT"));
    }

    #[test]
    #[allow(dead_code)]
    fn reader_is_object_safe() {
        fn _assert<T: SourceReader>() {}
        let _ = RefCell::new(0); // keeps `std::cell` import used across cfg combinations
    }
}
