//! Re-exports the shared target identifiers and capability matrix under the
//! path spec §5.6 names (`sermo_codegen::target::CapabilityMatrix`). The
//! matrix itself lives in `sermo-base` so the semantic analyzer can reject
//! unsupported features before codegen ever runs without a circular crate
//! dependency (see `sermo_base::capability`'s module doc) — this module is
//! the public face codegen callers are expected to use.

pub use sermo_base::{Capability, CapabilityMatrix, FeatureKey, Target};
