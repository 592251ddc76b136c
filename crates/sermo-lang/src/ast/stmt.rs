//! The Statement family (spec §3.2, grammar productions enumerated in §4.2).

use sermo_base::{Span, Symbol};

use super::{
    CatchClause, Identifier, ImportSpecifier, IterationKind, MutabilityKind, NodeComment, Parameter,
    Pattern, PraeparaBlock, ReturnVerb, SwitchCase, TestModifiers, TypeAnnotation, VariantCase,
};
use crate::ast::Expression;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    /// `scribe` — info.
    Info,
    /// `vide` — debug.
    Debug,
    /// `mone` — warn.
    Warn,
}

/// `arena` or `pagina` allocator kind named by a `cura` resource block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Arena,
    Pagina,
    /// A user expression yielding a resource with a release method, rather
    /// than one of the two built-in allocator kinds.
    Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub mutability: MutabilityKind,
    pub name: Identifier,
    pub type_annotation: Option<TypeAnnotation>,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration {
    pub name: Identifier,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeAnnotation>,
    pub verb: ReturnVerb,
    pub body: Vec<Statement>,
    pub is_exported: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDeclaration {
    pub name: Identifier,
    pub type_annotation: TypeAnnotation,
    pub default_value: Option<Expression>,
}

/// `genus` class declaration: optional superclass (`sub`) and implemented
/// interfaces (`implet`).
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclaration {
    pub name: Identifier,
    pub superclass: Option<Identifier>,
    pub implements: Vec<Identifier>,
    pub fields: Vec<FieldDeclaration>,
    pub methods: Vec<FunctionDeclaration>,
    pub is_exported: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceMethodSignature {
    pub name: Identifier,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeAnnotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDeclaration {
    pub name: Identifier,
    pub methods: Vec<InterfaceMethodSignature>,
    pub is_exported: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: Identifier,
    pub value: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDeclaration {
    pub name: Identifier,
    pub members: Vec<EnumMember>,
    pub is_exported: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscretioDeclaration {
    pub name: Identifier,
    pub variants: Vec<VariantCase>,
    pub is_exported: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDeclaration {
    pub name: Identifier,
    pub target: TypeAnnotation,
    pub is_exported: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclaration {
    pub source: String,
    pub specifiers: Vec<ImportSpecifier>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfBranch {
    pub condition: Expression,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    /// The leading `si` plus every `aliter si` in source order.
    pub branches: Vec<IfBranch>,
    /// The trailing plain `aliter` body, if present.
    pub else_body: Option<Vec<Statement>>,
    pub catch: Option<CatchClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Vec<Statement>,
    pub catch: Option<CatchClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IterationStatement {
    pub kind: IterationKind,
    pub iterable: Expression,
    pub binding: Identifier,
    pub is_async: bool,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStatement {
    pub discriminant: Expression,
    pub cases: Vec<SwitchCase>,
}

/// `discerne` pattern match over one or more discriminant values (spec
/// §3.2: "multi-discriminant matching uses parallel lists").
#[derive(Debug, Clone, PartialEq)]
pub struct DiscerneStatement {
    pub discriminants: Vec<Expression>,
    pub cases: Vec<DiscerneCase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscerneCase {
    pub pattern: Pattern,
    pub body: Vec<Statement>,
}

/// `custodi <condition> aliter <body>` — a guard clause: the enclosing
/// block continues only if `condition` holds, otherwise `otherwise` runs
/// (typically ending in a `cede`/`mori`/`redde`-style exit).
#[derive(Debug, Clone, PartialEq)]
pub struct GuardStatement {
    pub condition: Expression,
    pub otherwise: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    pub body: Vec<Statement>,
    pub catch: Option<CatchClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceStatement {
    pub kind: ResourceKind,
    /// Present only when `kind` is `Expression`.
    pub resource: Option<Expression>,
    pub binding: Option<Identifier>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchStatement {
    pub endpoint: Identifier,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryPointDeclaration {
    pub is_async: bool,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestCase {
    pub name: String,
    pub modifiers: TestModifiers,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestSuite {
    pub name: String,
    pub hooks: Vec<PraeparaBlock>,
    pub cases: Vec<TestCase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputStatement {
    pub level: OutputLevel,
    /// The first argument when it is a string literal is desugared by the
    /// parser into the format template (spec §4.2); remaining expressions
    /// are the `§` positional substitutions.
    pub template: String,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    VariableDeclaration(VariableDeclaration),
    FunctionDeclaration(FunctionDeclaration),
    ClassDeclaration(ClassDeclaration),
    InterfaceDeclaration(InterfaceDeclaration),
    EnumDeclaration(EnumDeclaration),
    DiscretioDeclaration(DiscretioDeclaration),
    TypeAliasDeclaration(TypeAliasDeclaration),
    ImportDeclaration(ImportDeclaration),
    If(IfStatement),
    While(WhileStatement),
    Iteration(IterationStatement),
    Switch(SwitchStatement),
    Discerne(DiscerneStatement),
    Guard(GuardStatement),
    Try(TryStatement),
    /// `iace <expr>` — throw.
    Throw(Expression),
    /// `mori <expr>` — panic (unrecoverable, unlike `iace`).
    Panic(Expression),
    /// `adfirma <expr>` — runtime assertion.
    Assert(Expression),
    Resource(ResourceStatement),
    Dispatch(DispatchStatement),
    EntryPoint(EntryPointDeclaration),
    TestSuite(TestSuite),
    Output(OutputStatement),
    Return(Option<Expression>),
    Break(Option<Symbol>),
    Continue(Option<Symbol>),
    Block(Vec<Statement>),
    Expression(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
    pub leading_comments: Vec<NodeComment>,
    pub trailing_comments: Vec<NodeComment>,
}

impl Statement {
    pub fn new(kind: StatementKind, span: Span) -> Self {
        Statement { kind, span, leading_comments: Vec::new(), trailing_comments: Vec::new() }
    }
}
