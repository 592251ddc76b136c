//! Semantic analysis (spec §4.3): types, scopes/module graph, per-module
//! analysis, the feature-capability visitor, and cross-module resolution.

pub mod analyzer;
pub mod capability;
pub mod scope;
pub mod types;

pub use analyzer::{analyze, Analyzer};
pub use capability::{check_capabilities, collect_feature_usages, FeatureUse};
pub use scope::{Module, ModuleGraph, Scope, SymbolEntry, SymbolKind};
pub use types::{CollectionKind, DiscretioType, FunctionType, GenusType, OrdoType, PactumType, PrimitiveKind, SemanticType};

use std::collections::BTreeMap;
use std::path::PathBuf;

use sermo_base::{Diagnostic, Interner, Position, Span};

use crate::ast::{ImportDeclaration, Statement, StatementKind};

/// One source file handed to [`resolve_module_graph`]: its canonical path,
/// parsed statements, and the canonical paths its `importa` statements
/// resolved to. Resolving an import's source string to a path is the
/// driver's job (spec §6's `ImportResolver`); this module only consumes
/// the resolved edges. `imports` must list one entry per `ImportDeclaration`
/// statement in `statements`, in the same order those statements appear —
/// the positional correlation this module uses to match a statement back to
/// the path it resolved to.
pub struct ModuleInput {
    pub path: PathBuf,
    pub statements: Vec<Statement>,
    pub imports: Vec<PathBuf>,
}

/// Analyzes a set of modules together (spec §5.4/§4.3's cross-module
/// resolution, run as three passes):
///
/// 1. Each module's own body is analyzed in isolation, so declarations
///    that only reference names from within the same file resolve
///    regardless of import order, and every module gets a declared-type
///    shell with an exported surface.
/// 2. Modules are revisited in topological order of the import graph,
///    checking each `importa` statement's specifiers against the already-
///    computed exported surface of the module it resolved to.
/// 3. A cyclic import graph is reported once, at the edge that closes the
///    cycle (spec §4.3 "cyclic module import"), and skips pass 2 entirely
///    since there is no well-defined analysis order to re-visit modules in.
pub fn resolve_module_graph(interner: &Interner, inputs: Vec<ModuleInput>) -> (ModuleGraph, Vec<Diagnostic>) {
    let mut graph = ModuleGraph::new();
    let mut diagnostics = Vec::new();
    let mut statements_by_path = BTreeMap::new();

    for input in inputs {
        let (scope, module_diags) = analyzer::analyze(interner, &input.statements);
        diagnostics.extend(module_diags);
        statements_by_path.insert(input.path.clone(), input.statements);
        graph.insert(Module::new(input.path.clone(), scope), input.imports);
    }

    let order = match graph.topological_order() {
        Ok(order) => order,
        Err((from, to)) => {
            diagnostics.push(Diagnostic::error(
                "E-CYCLIC-IMPORT",
                format!("cyclic import: `{}` imports `{}`, closing a cycle", from.display(), to.display()),
                Span::point(Position::START),
            ));
            return (graph, diagnostics);
        }
    };

    for path in &order {
        let imports = graph.imports_of(path).to_vec();
        let Some(statements) = statements_by_path.get(path) else { continue };
        let mut import_index = 0;
        for stmt in statements {
            if let StatementKind::ImportDeclaration(decl) = &stmt.kind {
                let resolved = imports.get(import_index).cloned();
                import_index += 1;
                resolve_import(interner, &graph, resolved, decl, stmt.span, &mut diagnostics);
            }
        }
    }

    (graph, diagnostics)
}

fn resolve_import(
    interner: &Interner,
    graph: &ModuleGraph,
    resolved_path: Option<PathBuf>,
    decl: &ImportDeclaration,
    span: Span,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(path) = resolved_path else {
        diagnostics.push(Diagnostic::error("E-UNRESOLVED-IMPORT", format!("could not resolve import of `{}`", decl.source), span));
        return;
    };
    let Some(module) = graph.get(&path) else {
        diagnostics.push(Diagnostic::error("E-UNRESOLVED-IMPORT", format!("could not resolve import of `{}`", decl.source), span));
        return;
    };
    for spec in &decl.specifiers {
        if spec.is_wildcard {
            continue;
        }
        if !module.exports.contains_key(&spec.imported) {
            diagnostics.push(Diagnostic::error(
                "E-UNRESOLVED-IMPORT",
                format!("`{}` is not exported by `{}`", interner.resolve(spec.imported), decl.source),
                span,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser;
    use std::path::PathBuf;

    fn parse(interner: &mut Interner, source: &str) -> Vec<Statement> {
        let (tokens, lex_errors) = Lexer::new(source, interner).tokenize();
        assert!(lex_errors.is_empty(), "{lex_errors:?}");
        let (module, parse_errors) = parser::parse(tokens, interner);
        assert!(parse_errors.is_empty(), "{parse_errors:?}");
        module.statements
    }

    #[test]
    fn importing_an_exported_name_resolves_cleanly() {
        let mut interner = Interner::new();
        let lib = parse(&mut interner, "munus adde(a: numerus, b: numerus) fit numerus { redde a }");
        let main = parse(&mut interner, r#"importa { adde } ex "./lib""#);
        let inputs = vec![
            ModuleInput { path: PathBuf::from("lib.srm"), statements: lib, imports: Vec::new() },
            ModuleInput { path: PathBuf::from("main.srm"), statements: main, imports: vec![PathBuf::from("lib.srm")] },
        ];
        let (_, diagnostics) = resolve_module_graph(&interner, inputs);
        assert!(!diagnostics.iter().any(|d| d.code == "E-UNRESOLVED-IMPORT"), "{diagnostics:?}");
    }

    #[test]
    fn importing_a_name_the_source_does_not_export_is_reported() {
        let mut interner = Interner::new();
        let lib = parse(&mut interner, "munus f() fit { }");
        let main = parse(&mut interner, r#"importa { nonExistent } ex "./lib""#);
        let inputs = vec![
            ModuleInput { path: PathBuf::from("lib.srm"), statements: lib, imports: Vec::new() },
            ModuleInput { path: PathBuf::from("main.srm"), statements: main, imports: vec![PathBuf::from("lib.srm")] },
        ];
        let (_, diagnostics) = resolve_module_graph(&interner, inputs);
        assert!(diagnostics.iter().any(|d| d.code == "E-UNRESOLVED-IMPORT"));
    }

    #[test]
    fn cyclic_import_is_reported_once() {
        let mut interner = Interner::new();
        let a = parse(&mut interner, r#"importa { * } ex "./b""#);
        let b = parse(&mut interner, r#"importa { * } ex "./a""#);
        let inputs = vec![
            ModuleInput { path: PathBuf::from("a.srm"), statements: a, imports: vec![PathBuf::from("b.srm")] },
            ModuleInput { path: PathBuf::from("b.srm"), statements: b, imports: vec![PathBuf::from("a.srm")] },
        ];
        let (_, diagnostics) = resolve_module_graph(&interner, inputs);
        assert_eq!(diagnostics.iter().filter(|d| d.code == "E-CYCLIC-IMPORT").count(), 1);
    }
}
