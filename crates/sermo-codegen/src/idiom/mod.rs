//! Per-target-family idiom mapping (spec §4.5): the same statement or
//! expression shape renders differently depending on whether the target is
//! memory-managed ([`managed`]) or ownership-strict ([`strict`]).

pub mod managed;
pub mod strict;

use sermo_base::{Interner, Target};
use sermo_lang::ast::types::TypeAnnotation;

/// Renders a type annotation in target syntax. `nebula`/`glacies` are
/// dynamically typed, so callers on those targets should skip annotations
/// entirely rather than call this — it exists for `ferrum`'s sake and
/// returns an empty string on the others as a safe default.
pub fn render_type(target: Target, ty: &TypeAnnotation, interner: &Interner) -> String {
    match target {
        Target::Ferrum => strict::render_type(ty, interner),
        Target::Nebula | Target::Glacies => String::new(),
    }
}

/// Renders the constructor used by an `innatum T` native cast: on `ferrum`
/// this is a generic `Into` conversion, on the managed targets it is the
/// runtime's own native constructor for the equivalent built-in type.
pub fn render_native_cast(target: Target, ty: &TypeAnnotation, interner: &Interner, value: &str) -> String {
    match target {
        Target::Ferrum => format!("Into::<{}>::into({value})", strict::render_type(ty, interner)),
        Target::Nebula | Target::Glacies => {
            format!("{}({value})", managed::native_constructor_name(ty, interner))
        }
    }
}

pub fn render_range(target: Target, start: &str, end: &str, inclusive: bool, step: Option<&str>) -> String {
    match target {
        Target::Ferrum => strict::render_range(start, end, inclusive, step),
        Target::Nebula | Target::Glacies => managed::render_range(start, end, inclusive, step),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn render_resource_scope(
    target: Target,
    allocator_param: &str,
    resource_kind_label: &str,
    resource_code: Option<&str>,
    binding: Option<&str>,
    body: &str,
    indent: &str,
) -> String {
    match target {
        Target::Ferrum => strict::render_resource_scope(Some(allocator_param), resource_kind_label, resource_code, binding, body, indent),
        Target::Nebula | Target::Glacies => managed::render_resource_scope(resource_kind_label, resource_code, binding, body, indent),
    }
}

pub fn render_try_catch(target: Target, body: &str, catch_binding: Option<&str>, catch_body: &str, indent: &str) -> String {
    match target {
        Target::Ferrum => strict::render_try_catch(body, catch_binding, catch_body, indent),
        Target::Nebula | Target::Glacies => managed::render_try_catch(body, catch_binding, catch_body, indent),
    }
}

/// Native `?.` only renders on `nebula` (the only target where the
/// capability matrix marks optional-chaining `Supported`); every other
/// target expands to a conditional.
pub fn render_optional_member(target: Target, object: &str, member: &str) -> String {
    match target {
        Target::Nebula => format!("{object}?.{member}"),
        Target::Ferrum => strict::render_optional_member_conditional(object, member),
        Target::Glacies => managed::render_optional_member_conditional(object, member),
    }
}
