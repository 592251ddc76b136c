//! The closed keyword table.
//!
//! `keyword_tag` is consulted once per identifier-shaped lexeme by the
//! tokenizer (spec §4.1: "Identifier runs are classified against a keyword
//! table keyed on stem"). Anything not found here is an ordinary identifier.

/// Names the specific reserved word a keyword token represents. The
/// tokenizer stores this on the token so the parser can dispatch on it
/// without re-comparing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordTag {
    // Mutability kinds (variable declarations)
    Varia,
    Fixum,
    Figendum,
    Variandum,

    // Function declaration and return-type verbs
    Munus,
    Fit,
    Fiet,
    Fiunt,
    Fient,

    // Type declarations
    Genus,
    Sub,
    Implet,
    Pactum,
    Ordo,
    Discretio,
    Nomen,

    // Imports
    Importa,
    Ut,

    // Control flow
    Si,
    Aliter,
    Dum,
    Ex,
    De,
    Pro,
    Elige,
    Casu,
    Discerne,
    Custodi,

    // Exceptions
    Tempta,
    Iace,
    Mori,
    Adfirma,

    // Resource scope
    Cura,
    Arena,
    Pagina,

    // Function exit / loop control
    Redde,
    Rumpe,
    Perge,

    // Dispatch
    Ad,

    // Entry points
    Incipit,
    Incipiet,

    // Test framework
    Probandum,
    Proba,
    Praepara,
    Postpara,

    // Output statements
    Scribe,
    Vide,
    Mone,

    // Operators expressed as keywords
    Est,
    Non,
    Intra,
    Inter,
    Sinistratum,
    Dextratum,
    Usque,
    Per,
    Qua,
    Innatum,
    Numeratum,
    Fractatum,
    Textatum,
    Bivalentum,
    Vel,
    Cede,

    // Literals
    Verum,
    Falsum,
    Nihil,
    Vacuum,

    // Generic collection type names
    Lista,
    Tabula,
    Copia,
    Promissum,
    Cursor,
    Fluxus,

    // Primitive type names
    Textus,
    Numerus,
    Fractus,
    Decimus,
    Magnus,
    Bivalens,
    Octeti,

    // Regex literal introducer: `expressio "pattern" flagsIdent`
    Expressio,
}

/// Looks up a keyword by its exact stem (case-sensitive: Sermo identifiers
/// are case-sensitive, matching the target languages it compiles to).
pub fn keyword_tag(stem: &str) -> Option<KeywordTag> {
    use KeywordTag::*;
    Some(match stem {
        "varia" => Varia,
        "fixum" => Fixum,
        "figendum" => Figendum,
        "variandum" => Variandum,

        "munus" => Munus,
        "fit" => Fit,
        "fiet" => Fiet,
        "fiunt" => Fiunt,
        "fient" => Fient,

        "genus" => Genus,
        "sub" => Sub,
        "implet" => Implet,
        "pactum" => Pactum,
        "ordo" => Ordo,
        "discretio" => Discretio,
        "nomen" => Nomen,

        "importa" => Importa,
        "ut" => Ut,

        "si" => Si,
        "aliter" => Aliter,
        "dum" => Dum,
        "ex" => Ex,
        "de" => De,
        "pro" => Pro,
        "elige" => Elige,
        "casu" => Casu,
        "discerne" => Discerne,
        "custodi" => Custodi,

        "tempta" => Tempta,
        "iace" => Iace,
        "mori" => Mori,
        "adfirma" => Adfirma,

        "cura" => Cura,
        "arena" => Arena,
        "pagina" => Pagina,

        "redde" => Redde,
        "rumpe" => Rumpe,
        "perge" => Perge,

        "ad" => Ad,

        "incipit" => Incipit,
        "incipiet" => Incipiet,

        "probandum" => Probandum,
        "proba" => Proba,
        "praepara" => Praepara,
        "postpara" => Postpara,

        "scribe" => Scribe,
        "vide" => Vide,
        "mone" => Mone,

        "est" => Est,
        "non" => Non,
        "intra" => Intra,
        "inter" => Inter,
        "sinistratum" => Sinistratum,
        "dextratum" => Dextratum,
        "usque" => Usque,
        "per" => Per,
        "qua" => Qua,
        "innatum" => Innatum,
        "numeratum" => Numeratum,
        "fractatum" => Fractatum,
        "textatum" => Textatum,
        "bivalentum" => Bivalentum,
        "vel" => Vel,
        "cede" => Cede,

        "verum" => Verum,
        "falsum" => Falsum,
        "nihil" => Nihil,
        "vacuum" => Vacuum,

        "lista" => Lista,
        "tabula" => Tabula,
        "copia" => Copia,
        "promissum" => Promissum,
        "cursor" => Cursor,
        "fluxus" => Fluxus,

        "textus" => Textus,
        "numerus" => Numerus,
        "fractus" => Fractus,
        "decimus" => Decimus,
        "magnus" => Magnus,
        "bivalens" => Bivalens,
        "octeti" => Octeti,

        "expressio" => Expressio,

        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_mutability_keywords() {
        assert_eq!(keyword_tag("varia"), Some(KeywordTag::Varia));
        assert_eq!(keyword_tag("fixum"), Some(KeywordTag::Fixum));
        assert_eq!(keyword_tag("figendum"), Some(KeywordTag::Figendum));
        assert_eq!(keyword_tag("variandum"), Some(KeywordTag::Variandum));
    }

    #[test]
    fn recognizes_pattern_matching_keywords() {
        assert_eq!(keyword_tag("discerne"), Some(KeywordTag::Discerne));
        assert_eq!(keyword_tag("casu"), Some(KeywordTag::Casu));
        assert_eq!(keyword_tag("custodi"), Some(KeywordTag::Custodi));
    }

    #[test]
    fn ordinary_identifier_is_not_a_keyword() {
        assert_eq!(keyword_tag("userActivus"), None);
        assert_eq!(keyword_tag("Varia"), None, "keywords are case-sensitive");
    }

    #[test]
    fn recognizes_function_exit_and_loop_control_keywords() {
        assert_eq!(keyword_tag("redde"), Some(KeywordTag::Redde));
        assert_eq!(keyword_tag("rumpe"), Some(KeywordTag::Rumpe));
        assert_eq!(keyword_tag("perge"), Some(KeywordTag::Perge));
    }

    #[test]
    fn ut_is_shared_between_import_alias_and_pattern_alias() {
        // Spec: `ut` names both import aliasing and `discerne` case aliasing.
        // The tokenizer only needs to recognize the lexeme once; the parser
        // decides which grammar position it fills.
        assert_eq!(keyword_tag("ut"), Some(KeywordTag::Ut));
    }
}
