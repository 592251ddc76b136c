//! Idiom mapping for the ownership-strict target (`ferrum`): allocator
//! threading, arena-bound resource blocks, and `Result`-based error
//! propagation (spec §4.5).

use sermo_base::Interner;
use sermo_lang::ast::types::TypeAnnotation;

/// Maps a Sermo type annotation to `ferrum` type syntax. The primitive and
/// collection vocabulary mirrors the semantic analyzer's
/// `PrimitiveKind`/`CollectionKind` name tables (spec §3.3), but codegen
/// works from the raw annotation's name text rather than the analyzer's
/// resolved `SemanticType` — see `sermo-codegen`'s module doc for why.
pub fn render_type(ty: &TypeAnnotation, interner: &Interner) -> String {
    if !ty.union_alternatives.is_empty() {
        // No native sum type for an inline union annotation (only a
        // `discretio` declaration gets one); the first alternative stands
        // in for the whole union.
        return render_type(&ty.union_alternatives[0], interner);
    }

    if let Some(signature) = &ty.function_signature {
        let params = signature.parameters.iter().map(|p| render_type(p, interner)).collect::<Vec<_>>().join(", ");
        let ret = render_type(&signature.return_type, interner);
        return format!("impl Fn({params}) -> {ret}");
    }

    let name = interner.resolve(ty.name);
    let base = match name {
        "numerus" => "i64".to_string(),
        "fractus" => "f64".to_string(),
        "decimus" => "f64".to_string(),
        "magnus" => "i128".to_string(),
        "textus" => "String".to_string(),
        "bivalens" => "bool".to_string(),
        "octeti" => "Vec<u8>".to_string(),
        "nihil" | "vacuum" => "()".to_string(),
        "lista" | "copia" => {
            let element = ty.type_parameters.first().map(|p| render_type(p, interner)).unwrap_or_else(|| "()".to_string());
            if name == "copia" { format!("std::collections::HashSet<{element}>") } else { format!("Vec<{element}>") }
        }
        "tabula" => {
            let key = ty.type_parameters.first().map(|p| render_type(p, interner)).unwrap_or_else(|| "String".to_string());
            let value = ty.type_parameters.get(1).map(|p| render_type(p, interner)).unwrap_or_else(|| "()".to_string());
            format!("std::collections::HashMap<{key}, {value}>")
        }
        "promissum" => {
            let inner = ty.type_parameters.first().map(|p| render_type(p, interner)).unwrap_or_else(|| "()".to_string());
            format!("impl std::future::Future<Output = {inner}>")
        }
        "cursor" | "fluxus" => {
            let element = ty.type_parameters.first().map(|p| render_type(p, interner)).unwrap_or_else(|| "()".to_string());
            format!("Box<dyn Iterator<Item = {element}>>")
        }
        other => {
            let generics = ty.type_parameters.iter().map(|p| render_type(p, interner)).collect::<Vec<_>>();
            if generics.is_empty() {
                other.to_string()
            } else {
                format!("{other}<{}>", generics.join(", "))
            }
        }
    };

    if ty.nullable {
        format!("Option<{base}>")
    } else {
        base
    }
}

pub fn render_range(start: &str, end: &str, inclusive: bool, step: Option<&str>) -> String {
    let op = if inclusive { "..=" } else { ".." };
    let base = format!("({start}{op}{end})");
    match step {
        Some(step) => format!("{base}.step_by({step})"),
        None => base,
    }
}

/// `cura arena`/`cura page` lower to an arena-bound block; a resource
/// expression lowers to a block releasing it on every exit path via `drop`.
pub fn render_resource_scope(allocator_param: Option<&str>, resource_kind_label: &str, resource_code: Option<&str>, binding: Option<&str>, body: &str, indent: &str) -> String {
    let bound = binding.unwrap_or("_resource");
    match resource_code {
        Some(expr) => format!("{indent}{{\n{indent}    let {bound} = {expr};\n{body}\n{indent}    drop({bound});\n{indent}}}"),
        None => {
            let allocator = allocator_param.unwrap_or("alloc");
            format!(
                "{indent}{{\n{indent}    let {bound} = {resource_kind_label}::new();\n{indent}    let {allocator} = &{bound};\n{body}\n{indent}}}"
            )
        }
    }
}

/// `try-catch` is emulated: a closure capturing the body, matched against
/// `Ok`/`Err` to reach the catch body.
pub fn render_try_catch(body: &str, catch_binding: Option<&str>, catch_body: &str, indent: &str) -> String {
    let binding = catch_binding.unwrap_or("err");
    format!(
        "{indent}match (|| -> Result<(), Box<dyn std::error::Error>> {{\n{body}\n{indent}    Ok(())\n{indent}}})() {{\n{indent}    Ok(()) => {{}}\n{indent}    Err({binding}) => {{\n{catch_body}\n{indent}    }}\n{indent}}}"
    )
}

pub fn render_optional_member_conditional(object: &str, member: &str) -> String {
    format!("(if {object}.is_some() {{ {object}.unwrap().{member} }} else {{ None }})")
}

#[cfg(test)]
mod tests {
    use sermo_base::{Interner, Span};
    use sermo_lang::ast::TypeAnnotation;

    use super::render_type;

    fn named(interner: &mut Interner, name: &str) -> TypeAnnotation {
        TypeAnnotation::named(interner.intern(name), Span::new(Default::default(), Default::default()))
    }

    #[test]
    fn primitive_names_map_to_rust_types() {
        let mut interner = Interner::new();
        let numerus = named(&mut interner, "numerus");
        assert_eq!(render_type(&numerus, &interner), "i64");
        let textus = named(&mut interner, "textus");
        assert_eq!(render_type(&textus, &interner), "String");
    }

    #[test]
    fn nullable_wraps_in_option() {
        let mut interner = Interner::new();
        let mut ty = named(&mut interner, "numerus");
        ty.nullable = true;
        assert_eq!(render_type(&ty, &interner), "Option<i64>");
    }

    #[test]
    fn lista_renders_as_a_generic_vec() {
        let mut interner = Interner::new();
        let mut lista = named(&mut interner, "lista");
        lista.type_parameters.push(named(&mut interner, "textus"));
        assert_eq!(render_type(&lista, &interner), "Vec<String>");
    }

    #[test]
    fn tabula_renders_key_and_value_generics() {
        let mut interner = Interner::new();
        let mut tabula = named(&mut interner, "tabula");
        tabula.type_parameters.push(named(&mut interner, "textus"));
        tabula.type_parameters.push(named(&mut interner, "numerus"));
        assert_eq!(render_type(&tabula, &interner), "std::collections::HashMap<String, i64>");
    }

    #[test]
    fn unknown_name_with_generics_renders_as_a_user_type() {
        let mut interner = Interner::new();
        let mut widget = named(&mut interner, "Widget");
        widget.type_parameters.push(named(&mut interner, "numerus"));
        assert_eq!(render_type(&widget, &interner), "Widget<i64>");
    }

    #[test]
    fn union_alternative_falls_back_to_the_first_variant() {
        let mut interner = Interner::new();
        let mut union = named(&mut interner, "unused");
        union.union_alternatives.push(named(&mut interner, "numerus"));
        union.union_alternatives.push(named(&mut interner, "textus"));
        assert_eq!(render_type(&union, &interner), "i64");
    }
}
