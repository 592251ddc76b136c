//! # sermo-cli
//!
//! Command-line driver for the Sermo compiler (spec §6): wires the real
//! filesystem into `sermo-lang`'s [`sermo_lang::SourceReader`]/
//! [`sermo_lang::ImportResolver`] traits, runs the full lex/parse/analyze
//! pipeline, and dispatches to `sermo-codegen` or the target toolchain
//! depending on the subcommand.

pub mod cli;
pub mod driver;
pub mod report;
pub mod toolchain;

pub use cli::run_cli;
