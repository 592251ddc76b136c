//! Hand-authored `const` data tables (spec §5.5: no build-time codegen step
//! — the registry is small enough to write by hand, a deliberate deviation
//! from the teacher's `build.rs`-generated lexicon, recorded in DESIGN.md).

use sermo_base::Target;

use crate::entry::{RegistryEntry, StdlibModule};

pub struct Row {
    pub target: Target,
    pub module: StdlibModule,
    pub method: &'static str,
    pub entry: RegistryEntry,
}

fn native_set_union(receiver: &str, args: &[String]) -> String {
    match args.first() {
        Some(other) => format!("({receiver} | {other})"),
        None => receiver.to_string(),
    }
}

fn native_set_union_ferrum(receiver: &str, args: &[String]) -> String {
    match args.first() {
        Some(other) => format!("{receiver}.union(&{other}).cloned().collect()"),
        None => receiver.to_string(),
    }
}

pub static ROWS: &[Row] = &[
    // --- nebula: managed target, every stdlib surface maps natively ---
    Row { target: Target::Nebula, module: StdlibModule::Collection, method: "append", entry: RegistryEntry::rename("push").mutating() },
    Row { target: Target::Nebula, module: StdlibModule::Collection, method: "remove", entry: RegistryEntry::rename("delete").mutating() },
    Row {
        target: Target::Nebula,
        module: StdlibModule::Collection,
        method: "union",
        entry: RegistryEntry { translation: crate::entry::Translation::Native(native_set_union), mutates: false, is_async: false, auxiliary_imports: &[] },
    },
    Row { target: Target::Nebula, module: StdlibModule::FileSystem, method: "readFile", entry: RegistryEntry::rename("readFile").asynchronous().with_imports(&["fs/promises"]) },
    Row { target: Target::Nebula, module: StdlibModule::FileSystem, method: "writeFile", entry: RegistryEntry::rename("writeFile").asynchronous().mutating().with_imports(&["fs/promises"]) },
    Row { target: Target::Nebula, module: StdlibModule::Networking, method: "fetch", entry: RegistryEntry::rename("fetch").asynchronous() },
    Row { target: Target::Nebula, module: StdlibModule::Time, method: "now", entry: RegistryEntry::rename("Date.now") },
    Row { target: Target::Nebula, module: StdlibModule::Math, method: "floor", entry: RegistryEntry::rename("Math.floor") },
    Row { target: Target::Nebula, module: StdlibModule::KvStore, method: "get", entry: RegistryEntry::rename("get") },
    Row { target: Target::Nebula, module: StdlibModule::KvStore, method: "set", entry: RegistryEntry::rename("set").mutating() },
    Row { target: Target::Nebula, module: StdlibModule::Process, method: "exit", entry: RegistryEntry::rename("process.exit") },
    Row { target: Target::Nebula, module: StdlibModule::Ipc, method: "send", entry: RegistryEntry { translation: crate::entry::Translation::Template("§0.postMessage(§1)"), mutates: false, is_async: false, auxiliary_imports: &[] } },

    // --- ferrum: ownership-strict target, collection ops route through owned methods ---
    Row { target: Target::Ferrum, module: StdlibModule::Collection, method: "append", entry: RegistryEntry::rename("push").mutating() },
    Row { target: Target::Ferrum, module: StdlibModule::Collection, method: "remove", entry: RegistryEntry::rename("remove").mutating() },
    Row {
        target: Target::Ferrum,
        module: StdlibModule::Collection,
        method: "union",
        entry: RegistryEntry { translation: crate::entry::Translation::Native(native_set_union_ferrum), mutates: false, is_async: false, auxiliary_imports: &[] },
    },
    Row { target: Target::Ferrum, module: StdlibModule::FileSystem, method: "readFile", entry: RegistryEntry::rename("std::fs::read_to_string").with_imports(&["std::fs"]) },
    Row { target: Target::Ferrum, module: StdlibModule::FileSystem, method: "writeFile", entry: RegistryEntry::rename("std::fs::write").mutating().with_imports(&["std::fs"]) },
    Row { target: Target::Ferrum, module: StdlibModule::Time, method: "now", entry: RegistryEntry::rename("std::time::Instant::now").with_imports(&["std::time::Instant"]) },
    Row { target: Target::Ferrum, module: StdlibModule::Math, method: "floor", entry: RegistryEntry::rename("f64::floor") },
    Row { target: Target::Ferrum, module: StdlibModule::Process, method: "exit", entry: RegistryEntry::rename("std::process::exit").with_imports(&["std::process"]) },

    // --- glacies: feature-poor target, deliberately narrow coverage ---
    Row { target: Target::Glacies, module: StdlibModule::Collection, method: "append", entry: RegistryEntry::rename("push").mutating() },
    Row { target: Target::Glacies, module: StdlibModule::Collection, method: "remove", entry: RegistryEntry::rename("remove").mutating() },
    Row { target: Target::Glacies, module: StdlibModule::Math, method: "floor", entry: RegistryEntry::rename("floor") },
    Row { target: Target::Glacies, module: StdlibModule::KvStore, method: "get", entry: RegistryEntry::rename("get") },
    // No FileSystem, Networking, Time, Process, or Ipc rows for Glacies: it
    // has no entries for those modules at all, exercising the capability
    // gap path described in spec §4.4 ("when a method has no entry for the
    // chosen target, codegen reports a capability gap").
];
