//! Semantic types (spec §3.3): a closed sum, checked structurally for
//! primitives/unions/collections and nominally for declared types.

use std::collections::BTreeMap;

use sermo_base::Symbol;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Textus,
    Numerus,
    Fractus,
    Decimus,
    Magnus,
    Bivalens,
    Nihil,
    Vacuum,
    Octeti,
}

impl PrimitiveKind {
    pub fn from_name(name: &str) -> Option<PrimitiveKind> {
        Some(match name {
            "textus" => PrimitiveKind::Textus,
            "numerus" => PrimitiveKind::Numerus,
            "fractus" => PrimitiveKind::Fractus,
            "decimus" => PrimitiveKind::Decimus,
            "magnus" => PrimitiveKind::Magnus,
            "bivalens" => PrimitiveKind::Bivalens,
            "nihil" => PrimitiveKind::Nihil,
            "vacuum" => PrimitiveKind::Vacuum,
            "octeti" => PrimitiveKind::Octeti,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Lista,
    Tabula,
    Copia,
    Promissum,
    Cursor,
    Fluxus,
}

impl CollectionKind {
    pub fn from_name(name: &str) -> Option<CollectionKind> {
        Some(match name {
            "lista" => CollectionKind::Lista,
            "tabula" => CollectionKind::Tabula,
            "copia" => CollectionKind::Copia,
            "promissum" => CollectionKind::Promissum,
            "cursor" => CollectionKind::Cursor,
            "fluxus" => CollectionKind::Fluxus,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenusType {
    pub name: Symbol,
    pub fields: Vec<(Symbol, SemanticType)>,
    pub methods: Vec<(Symbol, FunctionType)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PactumType {
    pub name: Symbol,
    pub methods: Vec<(Symbol, FunctionType)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrdoType {
    pub name: Symbol,
    pub members: Vec<Symbol>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DiscretioType {
    pub name: Symbol,
    /// Variant name → its ordered field list (name, type). A `BTreeMap`
    /// keeps variant iteration order deterministic for exhaustiveness
    /// diagnostics (spec §5's determinism guarantee).
    pub variants: BTreeMap<Symbol, Vec<(Symbol, SemanticType)>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    pub parameters: Vec<SemanticType>,
    pub return_type: Box<SemanticType>,
    pub is_async: bool,
    pub is_generator: bool,
    pub allocator_parameter: Option<Symbol>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SemanticType {
    /// Optional bit width for numeric primitives (`magnus<64>`); `None`
    /// means the target's native width for that primitive.
    Primitive(PrimitiveKind, Option<u16>),
    Collection(CollectionKind, Vec<SemanticType>),
    Genus(GenusType),
    Pactum(PactumType),
    Ordo(OrdoType),
    Discretio(DiscretioType),
    /// Nominal placeholder referencing a declared type by name, used
    /// before signature resolution reconciles it against the real
    /// declaration (spec §4.3: "A User placeholder must be reconciled
    /// against any other kind").
    User(Symbol),
    Union(Vec<SemanticType>),
    Function(FunctionType),
    /// Wraps a stdlib module registry handle (spec §3.3); the handle
    /// itself lives in `sermo-registry` and is looked up by this name at
    /// codegen time.
    Namespace(Symbol),
    Unknown,
}

impl SemanticType {
    pub fn unit() -> SemanticType {
        SemanticType::Primitive(PrimitiveKind::Vacuum, None)
    }

    /// The nominal name compared for Genus/Pactum/Ordo/Discretio/User
    /// equivalence; `None` for structurally-compared types.
    fn nominal_name(&self) -> Option<Symbol> {
        match self {
            SemanticType::Genus(g) => Some(g.name),
            SemanticType::Pactum(p) => Some(p.name),
            SemanticType::Ordo(o) => Some(o.name),
            SemanticType::Discretio(d) => Some(d.name),
            SemanticType::User(name) => Some(*name),
            _ => None,
        }
    }

    /// Structural equivalence/assignability per spec §4.3: primitives,
    /// unions, and collection generics compare structurally; Genus/
    /// Pactum/Ordo/Discretio compare nominally; a `User` placeholder
    /// reconciles against any nominal kind sharing its name.
    pub fn is_assignable_to(&self, target: &SemanticType) -> bool {
        use SemanticType::*;
        match (self, target) {
            (Unknown, _) | (_, Unknown) => true,
            // Source union: every alternative must fit the target.
            (Union(alts), Union(_)) => alts.iter().all(|a| a.is_assignable_to(target)),
            (Union(alts), _) => alts.iter().all(|a| a.is_assignable_to(target)),
            // Non-union source against a union target: fits some alternative.
            (_, Union(alts)) => alts.iter().any(|t| self.is_assignable_to(t)),
            (Primitive(a, wa), Primitive(b, wb)) => {
                a == b && (wa.is_none() || wb.is_none() || wa == wb)
            }
            (Collection(a, ta), Collection(b, tb)) => {
                a == b && ta.len() == tb.len() && ta.iter().zip(tb).all(|(x, y)| x.is_assignable_to(y))
            }
            (Function(f1), Function(f2)) => {
                f1.parameters.len() == f2.parameters.len()
                    && f1.is_async == f2.is_async
                    && f1.is_generator == f2.is_generator
                    // Parameters are contravariant, return covariant.
                    && f1.parameters.iter().zip(&f2.parameters).all(|(p1, p2)| p2.is_assignable_to(p1))
                    && f1.return_type.is_assignable_to(&f2.return_type)
            }
            (Namespace(a), Namespace(b)) => a == b,
            _ => match (self.nominal_name(), target.nominal_name()) {
                (Some(a), Some(b)) => a == b,
                _ => self == target,
            },
        }
    }

    /// The common super-type of a list of element types (spec §4.3 "array
    /// literal checks"): identical elements share that type exactly;
    /// otherwise the elements form a union and the caller decides whether
    /// that union is acceptable for the context.
    pub fn common_supertype(types: &[SemanticType]) -> SemanticType {
        match types.split_first() {
            None => SemanticType::Unknown,
            Some((first, rest)) => {
                if rest.iter().all(|t| t == first) {
                    first.clone()
                } else {
                    let mut alts = vec![first.clone()];
                    for t in rest {
                        if !alts.contains(t) {
                            alts.push(t.clone());
                        }
                    }
                    SemanticType::Union(alts)
                }
            }
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, SemanticType::Function(_) | SemanticType::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numerus() -> SemanticType {
        SemanticType::Primitive(PrimitiveKind::Numerus, None)
    }
    fn textus() -> SemanticType {
        SemanticType::Primitive(PrimitiveKind::Textus, None)
    }

    #[test]
    fn identical_primitives_are_assignable() {
        assert!(numerus().is_assignable_to(&numerus()));
    }

    #[test]
    fn mismatched_primitives_are_not_assignable() {
        assert!(!numerus().is_assignable_to(&textus()));
    }

    #[test]
    fn value_is_assignable_to_union_containing_its_type() {
        let union = SemanticType::Union(vec![numerus(), textus()]);
        assert!(numerus().is_assignable_to(&union));
    }

    #[test]
    fn union_to_union_requires_every_alternative_to_match() {
        let wide = SemanticType::Union(vec![numerus(), textus()]);
        let narrow = SemanticType::Union(vec![numerus()]);
        assert!(narrow.is_assignable_to(&wide));
        assert!(!wide.is_assignable_to(&narrow));
    }

    #[test]
    fn unknown_is_assignable_both_ways() {
        assert!(SemanticType::Unknown.is_assignable_to(&numerus()));
        assert!(numerus().is_assignable_to(&SemanticType::Unknown));
    }

    #[test]
    fn user_placeholder_reconciles_against_nominal_kind_by_name() {
        let mut interner = sermo_base::Interner::new();
        let name = interner.intern("Recipe");
        let placeholder = SemanticType::User(name);
        let genus = SemanticType::Genus(GenusType { name, fields: Vec::new(), methods: Vec::new() });
        assert!(placeholder.is_assignable_to(&genus));
        assert!(genus.is_assignable_to(&placeholder));
    }

    #[test]
    fn common_supertype_of_identical_elements_is_that_type() {
        let ty = SemanticType::common_supertype(&[numerus(), numerus(), numerus()]);
        assert_eq!(ty, numerus());
    }

    #[test]
    fn common_supertype_of_mixed_elements_is_a_union() {
        let ty = SemanticType::common_supertype(&[numerus(), textus()]);
        assert_eq!(ty, SemanticType::Union(vec![numerus(), textus()]));
    }
}
