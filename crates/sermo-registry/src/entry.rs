//! Registry entry shape (spec §3.5/§4.4): what a stdlib call lowers to on a
//! given target, plus the bookkeeping codegen needs to render it correctly.

/// A well-known stdlib receiver category. Method names are looked up
/// within one of these, not globally, so two modules may reuse a method
/// name (e.g. `size` on both `Collection` and `KvStore`) without collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StdlibModule {
    Collection,
    FileSystem,
    Networking,
    Time,
    Math,
    KvStore,
    Process,
    Ipc,
}

impl StdlibModule {
    pub fn name(self) -> &'static str {
        match self {
            StdlibModule::Collection => "collection",
            StdlibModule::FileSystem => "fs",
            StdlibModule::Networking => "net",
            StdlibModule::Time => "time",
            StdlibModule::Math => "math",
            StdlibModule::KvStore => "kv",
            StdlibModule::Process => "process",
            StdlibModule::Ipc => "ipc",
        }
    }
}

/// How a call renders on the chosen target.
#[derive(Debug, Clone, Copy)]
pub enum Translation {
    /// The method is renamed verbatim; arguments render unchanged
    /// (`append` → `push_back`).
    Rename(&'static str),
    /// A template with positional placeholders (`§0`, `§1`, …) substituted
    /// by stringified argument renderings. The receiver is not part of the
    /// template; codegen prefixes `receiver.` before it as usual.
    Template(&'static str),
    /// A native idiom that reshapes the whole call, given the receiver's
    /// rendering and each argument's rendering (set union → `a | b`).
    Native(fn(receiver: &str, args: &[String]) -> String),
}

/// One resolved `(target, module, method)` translation (spec §4.4's
/// lookup record).
#[derive(Debug, Clone, Copy)]
pub struct RegistryEntry {
    pub translation: Translation,
    pub mutates: bool,
    pub is_async: bool,
    pub auxiliary_imports: &'static [&'static str],
}

impl RegistryEntry {
    pub const fn rename(symbol: &'static str) -> Self {
        RegistryEntry { translation: Translation::Rename(symbol), mutates: false, is_async: false, auxiliary_imports: &[] }
    }

    pub const fn mutating(mut self) -> Self {
        self.mutates = true;
        self
    }

    pub const fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }

    pub const fn with_imports(mut self, imports: &'static [&'static str]) -> Self {
        self.auxiliary_imports = imports;
        self
    }
}
