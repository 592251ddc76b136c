//! The Sermo AST (spec §3.2): a discriminated union with two top-level
//! families, [`Statement`] and [`Expression`], plus auxiliary node kinds.
//!
//! The AST owns its children directly (`Box`/`Vec`), rather than borrowing
//! from an arena the way the teacher's natural-language AST does: Sermo's
//! tree shape is fixed at parse time and never needs the teacher's
//! multi-lifetime `'a` threading, so plain ownership keeps every node's
//! lifetime trivial at the cost of one extra allocation per node — a trade
//! favoring straightforward ownership over maximum allocation reuse.
//!
//! Every node carries its own [`Span`] and optional leading/trailing comment
//! lists (spec §3.2: "every node carries its source position and optional
//! leading/trailing comment lists").

pub mod expr;
pub mod stmt;
pub mod types;

pub use expr::{
    ArrayElement, Argument, AssignmentOperator, BinaryOperator, CastKind, Expression,
    ExpressionKind, MemberKey, ObjectElement, TemplateElement, UnaryOperator,
};
pub use stmt::{
    ClassDeclaration, DiscerneCase, DiscerneStatement, DiscretioDeclaration, DispatchStatement,
    EntryPointDeclaration, EnumDeclaration, EnumMember, FieldDeclaration, FunctionDeclaration,
    GuardStatement, IfBranch, IfStatement, ImportDeclaration, InterfaceDeclaration,
    InterfaceMethodSignature, IterationStatement, OutputLevel, OutputStatement, ResourceKind,
    ResourceStatement, Statement, StatementKind, SwitchStatement, TestCase, TestSuite,
    TryStatement, TypeAliasDeclaration, VariableDeclaration, WhileStatement,
};
pub use types::*;

use sermo_base::{Span, Symbol};
use sermo_lexicon::{Case, Number};

/// A comment attached to a node as leading or trailing trivia. Distinct from
/// [`crate::token::Comment`]: that type lives on the raw token stream, this
/// one survives into the AST for whichever downstream consumer wants source
/// comments (codegen does not re-emit them verbatim; spec Non-goals).
#[derive(Debug, Clone, PartialEq)]
pub struct NodeComment {
    pub text: String,
    pub is_doc: bool,
}

/// Best-effort Latin declension metadata attached to an identifier when
/// [`sermo_lexicon::decompose`] recognized an inflected ending. Advisory
/// only (spec §9 "Morphology"): nothing in the parser or analyzer depends
/// on its presence.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphologyInfo {
    pub stem: String,
    pub case: Case,
    pub number: Number,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: Symbol,
    pub morphology: Option<MorphologyInfo>,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: Symbol, span: Span) -> Self {
        Identifier { name, morphology: None, span }
    }

    pub fn with_morphology(mut self, morphology: MorphologyInfo) -> Self {
        self.morphology = Some(morphology);
        self
    }
}

/// A complete parsed module: the ordered top-level statement list plus the
/// diagnostics raised while producing it. The parser never fails outright
/// (spec §4.2 "never throw on ill-formed input"); a partial tree still
/// reaches the analyzer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub statements: Vec<Statement>,
}
