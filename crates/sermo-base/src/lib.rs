//! # sermo-base
//!
//! Pure structural atoms shared by every stage of the Sermo compiler:
//!
//! - [`Interner`]/[`Symbol`] — string interning for O(1) identifier equality
//! - [`Position`]/[`Span`] — source location tracking
//! - [`Diagnostic`]/[`Severity`] — spanned compiler messages
//! - [`Target`]/[`CapabilityMatrix`] — back-end identifiers and the
//!   per-target feature support table shared by analysis and codegen
//!
//! This crate has no knowledge of the Sermo grammar, type system, or any
//! target language beyond the closed `Target` enum. It provides only
//! generic infrastructure that the tokenizer, parser, semantic analyzer,
//! registry, and code generator all build on, so that a `Span` produced by
//! the lexer means the same thing to the code generator five stages later.

pub mod capability;
pub mod diagnostic;
pub mod intern;
pub mod span;

pub use capability::{Capability, CapabilityMatrix, FeatureKey, Target};
pub use diagnostic::{Diagnostic, Severity};
pub use intern::{Interner, Symbol, SymbolEq};
pub use span::{Position, Span};
