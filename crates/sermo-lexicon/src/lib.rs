//! # sermo-lexicon
//!
//! Two independent lookup tables over the Sermo vocabulary:
//!
//! - [`keyword`] — the closed set of reserved words the tokenizer must
//!   recognize (`varia`, `genus`, `discerne`, ...), each tagged with a
//!   [`KeywordTag`] naming the specific reserved word.
//! - [`morphology`] — a best-effort Latin noun declension table used to
//!   decorate plain identifiers with `(stem, case, number)` metadata. This
//!   is advisory: the parser does not consult it, but the semantic analyzer
//!   and code generator use it for DSL sugar like the collection filter
//!   `ab users activus` (spec §9, "Morphology").
//!
//! Neither table has any notion of tokens, AST nodes, or target languages —
//! this crate is pure data plus lookup functions, kept separate so the
//! vocabulary can grow without touching the lexer's control flow.

pub mod keyword;
pub mod morphology;

pub use keyword::{keyword_tag, KeywordTag};
pub use morphology::{decompose, Case, Morphology, Number};
