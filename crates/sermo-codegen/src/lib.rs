//! # sermo-codegen
//!
//! Target-polymorphic code generator (spec §4.5): renders an analyzed
//! Sermo module into `ferrum`, `nebula`, or `glacies` source text. Consults
//! [`sermo_registry::Registry`] for stdlib call translation and
//! [`sermo_base::CapabilityMatrix`] (re-exported as [`target`]) for the
//! per-target feature support table the semantic analyzer already used to
//! reject anything this crate could not possibly render.

pub mod context;
pub mod expr;
pub mod idiom;
pub mod program;
pub mod stmt;
pub mod target;

pub use context::{CodegenOptions, GenContext};
pub use program::{codegen_module, codegen_program, CodegenError, GeneratedModule};
