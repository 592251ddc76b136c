//! Auxiliary AST node kinds named in spec §3.2: `TypeAnnotation`,
//! `Parameter`, `Pattern`, `CatchClause`, `ObjectProperty`,
//! `ImportSpecifier`, `SwitchCase`, `VariantCase`, `PraeparaBlock`.

use sermo_base::{Span, Symbol};

use super::{Expression, Identifier, Statement};

/// A mutability kind on a variable declaration (spec §4.2: four kinds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutabilityKind {
    /// `varia` — ordinary mutable binding.
    Varia,
    /// `fixum` — single-assignment binding.
    Fixum,
    /// `figendum` — deeply immutable; the referent may not be mutated
    /// through this binding even if its declared type is otherwise mutable.
    Figendum,
    /// `variandum` — mutable binding whose value type may itself widen on
    /// reassignment (spec's union-producing mutable slot).
    Variandum,
}

/// Sync/async × singular/plural return-type verb (spec §4.2: fit/fiet/fiunt/fient).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnVerb {
    /// `fit` — sync, single value.
    Fit,
    /// `fiet` — async, single value.
    Fiet,
    /// `fiunt` — sync, generator (plural values over time).
    Fiunt,
    /// `fient` — async generator.
    Fient,
}

impl ReturnVerb {
    pub fn is_async(self) -> bool {
        matches!(self, ReturnVerb::Fiet | ReturnVerb::Fient)
    }

    pub fn is_generator(self) -> bool {
        matches!(self, ReturnVerb::Fiunt | ReturnVerb::Fient)
    }
}

/// Recursive type annotation: base name + optional type parameters +
/// nullability + optional union alternatives + optional function-type
/// parameters/return (spec §3.2).
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAnnotation {
    pub name: Symbol,
    pub type_parameters: Vec<TypeAnnotation>,
    pub nullable: bool,
    /// Non-empty only for an explicit union annotation (`T | U | V`); when
    /// non-empty, `name`/`type_parameters` of the annotation itself are
    /// ignored and this list is authoritative.
    pub union_alternatives: Vec<TypeAnnotation>,
    pub function_signature: Option<Box<FunctionTypeSignature>>,
    pub span: Span,
}

impl TypeAnnotation {
    pub fn named(name: Symbol, span: Span) -> Self {
        TypeAnnotation {
            name,
            type_parameters: Vec::new(),
            nullable: false,
            union_alternatives: Vec::new(),
            function_signature: None,
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionTypeSignature {
    pub parameters: Vec<TypeAnnotation>,
    pub return_type: TypeAnnotation,
}

/// A function or preposition-labeled call parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: Identifier,
    pub type_annotation: Option<TypeAnnotation>,
    pub default_value: Option<Box<Expression>>,
    pub is_rest: bool,
    pub is_optional: bool,
    pub span: Span,
}

/// One `discerne` match arm (spec §3.2): a variant name, an optional bound
/// alias, an ordered field-binding list, an optional wildcard marker, and a
/// body. Multi-discriminant matching (matching on more than one value at
/// once) uses parallel `variant_names`/`field_bindings` lists per case.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub variant_names: Vec<Symbol>,
    pub alias: Option<Identifier>,
    pub field_bindings: Vec<Identifier>,
    pub is_wildcard: bool,
    pub guard: Option<Box<Expression>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub binding: Option<Identifier>,
    pub body: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProperty {
    pub key: Identifier,
    pub value: Expression,
    /// `{ x }` shorthand where the key and value identifier coincide.
    pub shorthand: bool,
    pub span: Span,
}

/// One entry in an `importa` statement: the imported name, an optional
/// alias introduced by `ut`, or the wildcard `*` form.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpecifier {
    pub imported: Symbol,
    pub alias: Option<Identifier>,
    pub is_wildcard: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub test: Option<Expression>,
    pub body: Vec<Statement>,
    pub span: Span,
}

/// One variant record in a `discretio` declaration: a name plus an ordered
/// field list (each field a name + type).
#[derive(Debug, Clone, PartialEq)]
pub struct VariantCase {
    pub name: Identifier,
    pub fields: Vec<(Identifier, TypeAnnotation)>,
    pub span: Span,
}

/// A `praepara`/`postpara` hook, either scoped per-case or per-suite.
#[derive(Debug, Clone, PartialEq)]
pub struct PraeparaBlock {
    pub is_teardown: bool,
    pub is_suite_scoped: bool,
    pub body: Vec<Statement>,
    pub span: Span,
}

/// Modifiers recognized on a `proba` test case (spec §4.2, §4.5 filters).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TestModifiers {
    pub tags: Vec<String>,
    pub only: bool,
    pub skip: bool,
    pub platform: Option<String>,
    pub env: Option<String>,
    pub repeat: Option<u32>,
    pub retries: Option<u32>,
    pub timeout_ms: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationKind {
    /// `ex <iterable> pro <binding>` — for-of, iterates values.
    ExPro,
    /// `de <iterable> pro <binding>` — for-in, iterates keys.
    DePro,
}
