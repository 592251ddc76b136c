//! # sermo-registry
//!
//! The stdlib translation registry (spec §3.5/§4.4): given a target and a
//! `(stdlib-module, method)` pair, returns how the call lowers on that
//! target. Built once per target from hand-authored `const` tables (no
//! build-time codegen step — see [`table`]'s module doc for why that's a
//! deliberate deviation from the teacher's build-script-generated tables).
//!
//! The registry is a read-only value after construction (spec §5's
//! "shared resources: none across modules during analysis... read-only
//! after construction"); codegen consults it once per call-site render.

mod entry;
mod table;

pub use entry::{RegistryEntry, StdlibModule, Translation};

use std::collections::HashMap;

use sermo_base::Target;

/// A target's stdlib translation table, keyed by `(module, method)`.
pub struct Registry {
    target: Target,
    entries: HashMap<(StdlibModule, &'static str), RegistryEntry>,
}

impl Registry {
    /// Builds the registry for one target from the static data tables.
    /// Cheap enough to call once per compilation (spec §5.5: "built once
    /// at process start").
    pub fn for_target(target: Target) -> Registry {
        let entries: HashMap<(StdlibModule, &'static str), RegistryEntry> = table::ROWS
            .iter()
            .filter(|row| row.target == target)
            .map(|row| ((row.module, row.method), row.entry))
            .collect();
        tracing::debug!(target = target.name(), count = entries.len(), "built stdlib registry");
        Registry { target, entries }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Looks up a stdlib call's translation. `None` means a capability gap:
    /// the target has no idiom for this method (spec §4.4).
    pub fn lookup<'a>(&'a self, module: StdlibModule, method: &str) -> Option<&'a RegistryEntry> {
        self.entries.iter().find(|((m, k), _)| *m == module && *k == method).map(|(_, v)| v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nebula_renames_append_to_push() {
        let registry = Registry::for_target(Target::Nebula);
        let entry = registry.lookup(StdlibModule::Collection, "append").expect("append should be registered");
        assert!(entry.mutates);
        match entry.translation {
            Translation::Rename(name) => assert_eq!(name, "push"),
            other => panic!("expected a rename, got {other:?}"),
        }
    }

    #[test]
    fn glacies_has_no_filesystem_entry() {
        let registry = Registry::for_target(Target::Glacies);
        assert!(registry.lookup(StdlibModule::FileSystem, "readFile").is_none());
    }

    #[test]
    fn native_union_renders_from_receiver_and_args() {
        let registry = Registry::for_target(Target::Nebula);
        let entry = registry.lookup(StdlibModule::Collection, "union").unwrap();
        let Translation::Native(render) = entry.translation else { panic!("expected a native translation") };
        assert_eq!(render("a", &["b".to_string()]), "(a | b)");
    }

    #[test]
    fn ferrum_and_nebula_disagree_on_union_idiom() {
        let nebula_entry = Registry::for_target(Target::Nebula).lookup(StdlibModule::Collection, "union").copied().unwrap();
        let ferrum_entry = Registry::for_target(Target::Ferrum).lookup(StdlibModule::Collection, "union").copied().unwrap();
        let Translation::Native(nebula_render) = nebula_entry.translation else { panic!() };
        let Translation::Native(ferrum_render) = ferrum_entry.translation else { panic!() };
        assert_ne!(nebula_render("a", &["b".to_string()]), ferrum_render("a", &["b".to_string()]));
    }

    #[test]
    fn each_target_builds_a_distinct_registry() {
        for target in [Target::Ferrum, Target::Nebula, Target::Glacies] {
            let registry = Registry::for_target(target);
            assert_eq!(registry.target(), target);
        }
    }
}
