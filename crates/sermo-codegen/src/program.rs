//! Top-level code generation entry point (spec §4.5): a capability
//! pre-check against the chosen target, then a walk of each module's
//! top-level statements through [`codegen_stmt`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use sermo_base::{Diagnostic, Interner};
use sermo_lang::ast::Statement;
use sermo_lang::semantics::check_capabilities;
use sermo_registry::Registry;
use thiserror::Error;

use crate::context::{CodegenOptions, GenContext};
use crate::stmt::codegen_stmt;

#[derive(Debug, Error)]
pub enum CodegenError {
    /// The analyzer found statements that use a feature the chosen target
    /// marks `Unsupported` (spec §4.4: "the semantic analyzer ... must
    /// reject unsupported features before codegen runs").
    #[error("{} unsupported feature(s) for the chosen target", .0.len())]
    UnsupportedFeatures(Vec<Diagnostic>),
}

/// One generated module's rendered source text.
pub struct GeneratedModule {
    pub path: PathBuf,
    pub source: String,
}

/// Generates one module's source, failing closed if it uses a feature the
/// target cannot express.
pub fn codegen_module(statements: &[Statement], interner: &Interner, options: CodegenOptions, registry: &Registry) -> Result<String, CodegenError> {
    let gaps = check_capabilities(options.target, statements);
    if gaps.iter().any(Diagnostic::is_error) {
        return Err(CodegenError::UnsupportedFeatures(gaps));
    }

    let mut ctx = GenContext::new(options, registry);
    let mut body = Vec::new();
    for stmt in statements {
        let rendered = codegen_stmt(stmt, interner, &mut ctx);
        if !rendered.is_empty() {
            body.push(rendered);
        }
    }

    let mut source = body.join("\n\n");
    if !ctx.test_cases.is_empty() {
        source.push_str("\n\n");
        source.push_str(&render_standalone_runner(&ctx.test_cases, ctx.target()));
    }
    Ok(source)
}

/// Emits the standalone test runner a non-`ferrum` target needs (spec
/// §4.5 "Tests"): a nullary function per case plus a filtering loop over
/// every case name recorded while generating the module.
fn render_standalone_runner(cases: &[String], target: sermo_base::Target) -> String {
    let entries: Vec<_> = cases.iter().map(|name| format!("    [\"{name}\", {name}],")).collect();
    match target {
        sermo_base::Target::Nebula | sermo_base::Target::Glacies => format!(
            "function __run_tests(filter) {{\n    const cases = [\n{}\n    ];\n    for (const [name, fn] of cases) {{\n        if (filter && !name.includes(filter)) continue;\n        fn();\n        console.log(`ok ${{name}}`);\n    }}\n}}\n\n__run_tests(typeof __TEST_FILTER__ !== \"undefined\" ? __TEST_FILTER__ : null);",
            entries.join("\n")
        ),
        sermo_base::Target::Ferrum => String::new(),
    }
}

/// Generates every module discovered by `sermo_lang::compile_program`,
/// keyed by its canonical path, short-circuiting the whole batch on the
/// first module with a capability gap.
pub fn codegen_program(modules: &BTreeMap<PathBuf, Vec<Statement>>, interner: &Interner, options: &CodegenOptions, registry: &Registry) -> Result<Vec<GeneratedModule>, CodegenError> {
    let mut generated = Vec::with_capacity(modules.len());
    for (path, statements) in modules {
        let source = codegen_module(statements, interner, options.clone(), registry)?;
        generated.push(GeneratedModule { path: path.clone(), source });
    }
    Ok(generated)
}
