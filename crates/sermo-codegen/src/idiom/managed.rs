//! Idiom mapping for memory-managed targets — `nebula` (full support) and
//! `glacies` (feature-poor, spec §4.5's "shaping differences" apply more
//! often here than on `nebula`).

use sermo_base::Interner;
use sermo_lang::ast::types::TypeAnnotation;

/// Maps a Sermo type name to the runtime global that constructs it, for an
/// `innatum T` native cast. Falls back to the type's own name for anything
/// outside the built-in vocabulary, matching how a user-defined class name
/// already is its own constructor.
pub fn native_constructor_name(ty: &TypeAnnotation, interner: &Interner) -> String {
    let name = interner.resolve(ty.name);
    match name {
        "numerus" | "fractus" | "decimus" | "magnus" => "Number".to_string(),
        "textus" => "String".to_string(),
        "bivalens" => "Boolean".to_string(),
        "octeti" => "Uint8Array".to_string(),
        "copia" => "Set".to_string(),
        "tabula" => "Object".to_string(),
        "lista" | "cursor" | "fluxus" => "Array".to_string(),
        other => other.to_string(),
    }
}

pub fn render_range(start: &str, end: &str, inclusive: bool, step: Option<&str>) -> String {
    let end = if inclusive { format!("({end} + 1)") } else { end.to_string() };
    match step {
        Some(step) => format!("range({start}, {end}, {step})"),
        None => format!("range({start}, {end})"),
    }
}

pub fn render_resource_scope(resource_kind_label: &str, resource_code: Option<&str>, binding: Option<&str>, body: &str, indent: &str) -> String {
    let resource_expr = resource_code.map(str::to_string).unwrap_or_else(|| format!("{resource_kind_label}.open()"));
    let bound = binding.unwrap_or("__resource");
    format!(
        "{indent}{{\n{indent}    const {bound} = {resource_expr};\n{indent}    try {{\n{body}\n{indent}    }} finally {{\n{indent}        {bound}.release();\n{indent}    }}\n{indent}}}"
    )
}

pub fn render_try_catch(body: &str, catch_binding: Option<&str>, catch_body: &str, indent: &str) -> String {
    let binding = catch_binding.unwrap_or("err");
    format!("{indent}try {{\n{body}\n{indent}}} catch ({binding}) {{\n{catch_body}\n{indent}}}")
}

pub fn render_optional_member_conditional(object: &str, member: &str) -> String {
    format!("({object} != null ? {object}.{member} : null)")
}
