//! Generator context threaded through every `codegen_*` call (spec §4.5):
//! indent depth, semicolon policy, required-feature flags, the module
//! constant set, and the allocator parameter name for ownership-strict
//! targets.

use std::collections::HashSet;

use sermo_base::{FeatureKey, Target};
use sermo_registry::Registry;

/// Explicit configuration threaded through code generation (SPEC_FULL §3's
/// ambient `CompilerOptions`, scoped to the concerns codegen owns — indent
/// style and the allocator parameter name. Driver-level concerns like
/// output path live in `sermo-cli` instead).
#[derive(Debug, Clone)]
pub struct CodegenOptions {
    pub indent: String,
    pub target: Target,
    /// Parameter name codegen inserts into allocating calls on an
    /// ownership-strict target (spec §4.5: "ownership-strict targets
    /// parameterize calls that allocate with an allocator argument").
    pub allocator_param: String,
    pub strip_tests: bool,
}

impl CodegenOptions {
    pub fn for_target(target: Target) -> Self {
        CodegenOptions { indent: "    ".to_string(), target, allocator_param: "alloc".to_string(), strip_tests: false }
    }
}

pub struct GenContext<'r> {
    pub options: CodegenOptions,
    pub registry: &'r Registry,
    depth: usize,
    /// Module-level constant names; a generated parameter that would shadow
    /// one gets prefixed (spec §4.5 "module-level symbol handling").
    pub module_constants: HashSet<String>,
    /// Every feature key actually rendered, recorded so callers can assert
    /// codegen never emitted something the capability matrix forbids.
    pub rendered_features: HashSet<FeatureKey>,
    /// One entry per `proba` test case emitted in standalone-harness mode,
    /// consumed by the generated runner (spec §4.5 "Tests").
    pub test_cases: Vec<String>,
}

impl<'r> GenContext<'r> {
    pub fn new(options: CodegenOptions, registry: &'r Registry) -> Self {
        GenContext {
            options,
            registry,
            depth: 0,
            module_constants: HashSet::new(),
            rendered_features: HashSet::new(),
            test_cases: Vec::new(),
        }
    }

    pub fn target(&self) -> Target {
        self.options.target
    }

    pub fn indent(&self) -> String {
        self.options.indent.repeat(self.depth)
    }

    pub fn push_indent(&mut self) {
        self.depth += 1;
    }

    pub fn pop_indent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Most targets here terminate statements with `;`; `glacies` is
    /// modeled as a whitespace-significant target that doesn't.
    pub fn semicolon(&self) -> &'static str {
        match self.target() {
            Target::Ferrum | Target::Nebula => ";",
            Target::Glacies => "",
        }
    }

    /// Disambiguates a parameter/binding name that would otherwise shadow a
    /// module-level constant (spec §4.5).
    pub fn disambiguate(&self, name: &str) -> String {
        if self.module_constants.contains(name) {
            format!("mod_{name}")
        } else {
            name.to_string()
        }
    }

    pub fn mark_feature(&mut self, feature: FeatureKey) {
        self.rendered_features.insert(feature);
    }
}
