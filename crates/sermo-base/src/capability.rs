//! Target identifiers and the per-target feature capability matrix (spec
//! §3.6). Lives here rather than in `sermo-codegen` so both the semantic
//! analyzer (which must reject unsupported features before codegen runs)
//! and the code generator (which needs the same classification for idiom
//! selection) can consult one table without a circular crate dependency —
//! `sermo-codegen` re-exports [`Target`] and [`CapabilityMatrix`] from its
//! own `target` module so callers see the path spec §5.6 names.

/// A supported back-end identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Ownership-strict target requiring explicit allocator threading.
    Ferrum,
    /// Garbage-collected/managed target with full feature support.
    Nebula,
    /// Deliberately feature-poor managed target; exercises the
    /// "unsupported" capability path.
    Glacies,
}

impl Target {
    pub fn name(self) -> &'static str {
        match self {
            Target::Ferrum => "ferrum",
            Target::Nebula => "nebula",
            Target::Glacies => "glacies",
        }
    }

    pub fn parse(s: &str) -> Option<Target> {
        match s {
            "ferrum" => Some(Target::Ferrum),
            "nebula" => Some(Target::Nebula),
            "glacies" => Some(Target::Glacies),
            _ => None,
        }
    }
}

/// A language feature the capability matrix classifies per target. Named
/// for what the analyzer's feature-detection visitor looks for, not for any
/// single AST node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    AsyncFunction,
    GeneratorFunction,
    TryCatch,
    ObjectDestructure,
    DefaultParams,
    OptionalChaining,
    NonNullAssert,
    SpreadElement,
    TemplateInterpolation,
    TaggedUnion,
    ResourceScope,
}

impl FeatureKey {
    pub fn name(self) -> &'static str {
        match self {
            FeatureKey::AsyncFunction => "async-function",
            FeatureKey::GeneratorFunction => "generator",
            FeatureKey::TryCatch => "try-catch",
            FeatureKey::ObjectDestructure => "object-destructure",
            FeatureKey::DefaultParams => "default-params",
            FeatureKey::OptionalChaining => "optional-chaining",
            FeatureKey::NonNullAssert => "non-null-assert",
            FeatureKey::SpreadElement => "spread-element",
            FeatureKey::TemplateInterpolation => "template-interpolation",
            FeatureKey::TaggedUnion => "tagged-union",
            FeatureKey::ResourceScope => "resource-scope",
        }
    }
}

/// How well a target supports a given feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Supported,
    /// The feature is reachable but lowers to a different shape (e.g.
    /// optional-chaining expanded into a conditional).
    Emulated,
    Unsupported,
}

/// The per-target, per-feature classification table (spec §3.6). A plain
/// `match` rather than an indexed array: `Target`/`FeatureKey` additions
/// then fail to compile here instead of silently reading a zeroed slot.
pub struct CapabilityMatrix;

impl CapabilityMatrix {
    pub fn classify(target: Target, feature: FeatureKey) -> Capability {
        use Capability::*;
        use FeatureKey::*;
        use Target::*;
        match (target, feature) {
            (Nebula, _) => Supported,

            (Ferrum, AsyncFunction) => Emulated,
            (Ferrum, GeneratorFunction) => Emulated,
            (Ferrum, TryCatch) => Emulated,
            (Ferrum, ObjectDestructure) => Supported,
            (Ferrum, DefaultParams) => Supported,
            (Ferrum, OptionalChaining) => Emulated,
            (Ferrum, NonNullAssert) => Supported,
            (Ferrum, SpreadElement) => Supported,
            (Ferrum, TemplateInterpolation) => Supported,
            (Ferrum, TaggedUnion) => Supported,
            (Ferrum, ResourceScope) => Supported,

            (Glacies, AsyncFunction) => Unsupported,
            (Glacies, GeneratorFunction) => Unsupported,
            (Glacies, TryCatch) => Emulated,
            (Glacies, ObjectDestructure) => Unsupported,
            (Glacies, DefaultParams) => Supported,
            (Glacies, OptionalChaining) => Unsupported,
            (Glacies, NonNullAssert) => Unsupported,
            (Glacies, SpreadElement) => Unsupported,
            (Glacies, TemplateInterpolation) => Supported,
            (Glacies, TaggedUnion) => Emulated,
            (Glacies, ResourceScope) => Emulated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nebula_supports_everything() {
        assert_eq!(CapabilityMatrix::classify(Target::Nebula, FeatureKey::GeneratorFunction), Capability::Supported);
    }

    #[test]
    fn glacies_rejects_async() {
        assert_eq!(CapabilityMatrix::classify(Target::Glacies, FeatureKey::AsyncFunction), Capability::Unsupported);
    }

    #[test]
    fn ferrum_emulates_try_catch() {
        assert_eq!(CapabilityMatrix::classify(Target::Ferrum, FeatureKey::TryCatch), Capability::Emulated);
    }

    #[test]
    fn target_name_round_trips_through_parse() {
        for t in [Target::Ferrum, Target::Nebula, Target::Glacies] {
            assert_eq!(Target::parse(t.name()), Some(t));
        }
    }
}
