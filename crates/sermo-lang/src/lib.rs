//! # sermo-lang
//!
//! Front end for the Sermo language: tokenizer, recursive-descent parser,
//! AST, the three-phase semantic analyzer, and the [`pipeline`] that drives
//! them over a set of files reachable from an entry module. Nothing here
//! knows about target languages, the stdlib registry, or code generation —
//! the driver (`sermo-cli`) supplies file I/O via [`pipeline::SourceReader`]
//! and [`pipeline::ImportResolver`] and receives back a [`semantics::ModuleGraph`].

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod pipeline;
pub mod semantics;
pub mod token;

pub use lexer::Lexer;
pub use pipeline::{compile_program, CompiledProgram, ImportResolver, SourceReader};
pub use token::{Token, TokenKind};
