//! Statement code generation (spec §4.5: "a dispatch table per AST kind,
//! keyed on target").

use sermo_base::{FeatureKey, Interner, Target};
use sermo_lang::ast::stmt::{OutputLevel, ResourceKind};
use sermo_lang::ast::{IterationKind, MutabilityKind, Statement, StatementKind};

use crate::context::GenContext;
use crate::expr::codegen_expr;
use crate::idiom;

pub fn codegen_block(statements: &[Statement], interner: &Interner, ctx: &mut GenContext) -> String {
    statements.iter().map(|s| codegen_stmt(s, interner, ctx)).collect::<Vec<_>>().join("\n")
}

pub fn codegen_stmt(stmt: &Statement, interner: &Interner, ctx: &mut GenContext) -> String {
    let indent = ctx.indent();
    let semi = ctx.semicolon();
    match &stmt.kind {
        StatementKind::VariableDeclaration(decl) => {
            let name = ctx.disambiguate(interner.resolve(decl.name.name));
            let target = ctx.target();
            let value = decl.initializer.as_ref().map(|e| codegen_expr(e, interner, ctx)).unwrap_or_else(|| default_value(target));
            let mutable = is_mutable(decl.mutability);
            match target {
                Target::Ferrum => {
                    let kw = if mutable { "let mut" } else { "let" };
                    // A type-less `Default::default()` initializer needs an
                    // explicit annotation or Rust can't infer a type for it.
                    let annotation = decl.type_annotation.as_ref().map(|ty| format!(": {}", idiom::render_type(target, ty, interner))).unwrap_or_default();
                    format!("{indent}{kw} {name}{annotation} = {value}{semi}")
                }
                Target::Nebula | Target::Glacies => {
                    let kw = if mutable { "let" } else { "const" };
                    format!("{indent}{kw} {name} = {value}{semi}")
                }
            }
        }
        StatementKind::FunctionDeclaration(decl) => codegen_function_declaration(decl, interner, ctx, &indent),
        StatementKind::ClassDeclaration(decl) => codegen_class_declaration(decl, interner, ctx, &indent),
        StatementKind::InterfaceDeclaration(decl) => codegen_interface_declaration(decl, interner, ctx, &indent),
        StatementKind::EnumDeclaration(decl) => codegen_enum_declaration(decl, interner, ctx, &indent),
        StatementKind::DiscretioDeclaration(decl) => codegen_discretio_declaration(decl, interner, ctx, &indent),
        StatementKind::TypeAliasDeclaration(decl) => {
            let name = interner.resolve(decl.name.name);
            let target = ctx.target();
            match target {
                Target::Ferrum => {
                    format!("{indent}type {name} = {};", idiom::render_type(target, &decl.target, interner))
                }
                Target::Nebula | Target::Glacies => {
                    let raw_target = interner.resolve(decl.target.name);
                    format!("{indent}// type alias {name} = {raw_target} (erased at codegen)")
                }
            }
        }
        StatementKind::ImportDeclaration(_) => String::new(),
        StatementKind::If(if_stmt) => codegen_if(if_stmt, interner, ctx, &indent),
        StatementKind::While(while_stmt) => codegen_while(while_stmt, interner, ctx, &indent),
        StatementKind::Iteration(iter_stmt) => codegen_iteration(iter_stmt, interner, ctx, &indent),
        StatementKind::Switch(switch_stmt) => codegen_switch(switch_stmt, interner, ctx, &indent),
        StatementKind::Discerne(discerne_stmt) => codegen_discerne(discerne_stmt, interner, ctx, &indent),
        StatementKind::Guard(guard) => {
            let condition = codegen_expr(&guard.condition, interner, ctx);
            ctx.push_indent();
            let otherwise = codegen_block(&guard.otherwise, interner, ctx);
            ctx.pop_indent();
            format!("{indent}if !({condition}) {{\n{otherwise}\n{indent}}}")
        }
        StatementKind::Try(try_stmt) => {
            ctx.mark_feature(FeatureKey::TryCatch);
            ctx.push_indent();
            let body = codegen_block(&try_stmt.body, interner, ctx);
            let catch_body = match &try_stmt.catch {
                Some(c) => codegen_block(&c.body, interner, ctx),
                None => String::new(),
            };
            ctx.pop_indent();
            let binding = try_stmt.catch.as_ref().and_then(|c| c.binding.as_ref()).map(|id| interner.resolve(id.name));
            idiom::render_try_catch(ctx.target(), &body, binding, &catch_body, &indent)
        }
        StatementKind::Throw(expr) => {
            let value = codegen_expr(expr, interner, ctx);
            match ctx.target() {
                Target::Ferrum => format!("{indent}return Err({value}.into()){semi}"),
                Target::Nebula | Target::Glacies => format!("{indent}throw {value}{semi}"),
            }
        }
        StatementKind::Panic(expr) => {
            let value = codegen_expr(expr, interner, ctx);
            match ctx.target() {
                Target::Ferrum => format!("{indent}panic!(\"{{}}\", {value}){semi}"),
                Target::Nebula | Target::Glacies => format!("{indent}throw {value}{semi}"),
            }
        }
        StatementKind::Assert(expr) => {
            let value = codegen_expr(expr, interner, ctx);
            match ctx.target() {
                Target::Ferrum => format!("{indent}assert!({value}){semi}"),
                Target::Nebula | Target::Glacies => format!("{indent}console.assert({value}){semi}"),
            }
        }
        StatementKind::Resource(resource) => codegen_resource(resource, interner, ctx, &indent),
        StatementKind::Dispatch(dispatch) => {
            let endpoint = interner.resolve(dispatch.endpoint.name);
            let args: Vec<_> = dispatch.arguments.iter().map(|a| codegen_expr(a, interner, ctx)).collect();
            match ctx.target() {
                Target::Ferrum => format!("{indent}tokio::spawn({endpoint}({})){semi}", args.join(", ")),
                Target::Nebula | Target::Glacies => format!("{indent}dispatch({endpoint}, [{}]){semi}", args.join(", ")),
            }
        }
        StatementKind::EntryPoint(entry) => codegen_entry_point(entry, interner, ctx, &indent),
        StatementKind::TestSuite(suite) => codegen_test_suite(suite, interner, ctx, &indent),
        StatementKind::Output(output) => codegen_output(output, interner, ctx, &indent),
        StatementKind::Return(value) => match value {
            Some(e) => format!("{indent}return {}{semi}", codegen_expr(e, interner, ctx)),
            None => format!("{indent}return{semi}"),
        },
        StatementKind::Break(label) => match label {
            Some(sym) => format!("{indent}break /* {} */{semi}", interner.resolve(*sym)),
            None => format!("{indent}break{semi}"),
        },
        StatementKind::Continue(label) => match label {
            Some(sym) => format!("{indent}continue /* {} */{semi}", interner.resolve(*sym)),
            None => format!("{indent}continue{semi}"),
        },
        StatementKind::Block(body) => {
            ctx.push_indent();
            let inner = codegen_block(body, interner, ctx);
            ctx.pop_indent();
            format!("{indent}{{\n{inner}\n{indent}}}")
        }
        StatementKind::Expression(expr) => format!("{indent}{}{semi}", codegen_expr(expr, interner, ctx)),
    }
}

fn is_mutable(kind: MutabilityKind) -> bool {
    matches!(kind, MutabilityKind::Varia | MutabilityKind::Variandum)
}

fn default_value(target: Target) -> String {
    match target {
        Target::Ferrum => "Default::default()".to_string(),
        Target::Nebula | Target::Glacies => "null".to_string(),
    }
}

fn codegen_function_declaration(decl: &sermo_lang::ast::stmt::FunctionDeclaration, interner: &Interner, ctx: &mut GenContext, indent: &str) -> String {
    let name = interner.resolve(decl.name.name);
    let params: Vec<_> = decl
        .parameters
        .iter()
        .map(|p| {
            let pname = ctx.disambiguate(interner.resolve(p.name.name));
            match ctx.target() {
                Target::Ferrum => match &p.type_annotation {
                    Some(ty) => format!("{pname}: {}", idiom::render_type(ctx.target(), ty, interner)),
                    None => format!("{pname}: impl std::fmt::Debug"),
                },
                Target::Nebula | Target::Glacies => pname,
            }
        })
        .collect();
    ctx.push_indent();
    let body = codegen_block(&decl.body, interner, ctx);
    ctx.pop_indent();
    let is_async = decl.verb.is_async();
    if is_async {
        ctx.mark_feature(FeatureKey::AsyncFunction);
    }
    if decl.verb.is_generator() {
        ctx.mark_feature(FeatureKey::GeneratorFunction);
    }
    match ctx.target() {
        Target::Ferrum => {
            let async_kw = if is_async { "async " } else { "" };
            let vis = if decl.is_exported { "pub " } else { "" };
            let ret = match &decl.return_type {
                Some(ty) => format!(" -> {}", idiom::render_type(ctx.target(), ty, interner)),
                None => String::new(),
            };
            format!("{indent}{vis}{async_kw}fn {name}({}){ret} {{\n{body}\n{indent}}}", params.join(", "))
        }
        Target::Nebula | Target::Glacies => {
            let async_kw = if is_async { "async " } else { "" };
            let star = if decl.verb.is_generator() { "*" } else { "" };
            let export = if decl.is_exported { "export " } else { "" };
            format!("{indent}{export}{async_kw}function{star} {name}({}) {{\n{body}\n{indent}}}", params.join(", "))
        }
    }
}

fn codegen_class_declaration(decl: &sermo_lang::ast::stmt::ClassDeclaration, interner: &Interner, ctx: &mut GenContext, indent: &str) -> String {
    let name = interner.resolve(decl.name.name);
    match ctx.target() {
        Target::Ferrum => {
            let fields: Vec<_> = decl
                .fields
                .iter()
                .map(|f| format!("{indent}    pub {}: {},", interner.resolve(f.name.name), idiom::render_type(Target::Ferrum, &f.type_annotation, interner)))
                .collect();
            let vis = if decl.is_exported { "pub " } else { "" };
            let mut out = format!("{indent}{vis}struct {name} {{\n{}\n{indent}}}", fields.join("\n"));
            if !decl.methods.is_empty() {
                ctx.push_indent();
                let method_indent = ctx.indent();
                let mut methods = Vec::new();
                for m in &decl.methods {
                    methods.push(codegen_function_declaration(m, interner, ctx, &method_indent));
                }
                ctx.pop_indent();
                out.push_str(&format!("\n\n{indent}impl {name} {{\n{}\n{indent}}}", methods.join("\n\n")));
            }
            out
        }
        Target::Nebula | Target::Glacies => {
            let extends = decl.superclass.as_ref().map(|s| format!(" extends {}", interner.resolve(s.name))).unwrap_or_default();
            let export = if decl.is_exported { "export " } else { "" };
            ctx.push_indent();
            let field_indent = ctx.indent();
            let fields: Vec<_> = decl.fields.iter().map(|f| format!("{field_indent}{};", interner.resolve(f.name.name))).collect();
            let mut methods = Vec::new();
            for m in &decl.methods {
                methods.push(codegen_function_declaration(m, interner, ctx, &field_indent));
            }
            ctx.pop_indent();
            let mut body = fields.join("\n");
            if !methods.is_empty() {
                if !body.is_empty() {
                    body.push('\n');
                }
                body.push_str(&methods.join("\n\n"));
            }
            format!("{indent}{export}class {name}{extends} {{\n{body}\n{indent}}}")
        }
    }
}

fn codegen_interface_declaration(decl: &sermo_lang::ast::stmt::InterfaceDeclaration, interner: &Interner, ctx: &GenContext, indent: &str) -> String {
    let name = interner.resolve(decl.name.name);
    match ctx.target() {
        Target::Ferrum => {
            let sigs: Vec<_> = decl
                .methods
                .iter()
                .map(|m| {
                    let params: Vec<_> = m
                        .parameters
                        .iter()
                        .map(|p| {
                            let pname = interner.resolve(p.name.name);
                            match &p.type_annotation {
                                Some(ty) => format!("{pname}: {}", idiom::render_type(Target::Ferrum, ty, interner)),
                                None => format!("{pname}: impl std::fmt::Debug"),
                            }
                        })
                        .collect();
                    let ret = m
                        .return_type
                        .as_ref()
                        .map(|ty| format!(" -> {}", idiom::render_type(Target::Ferrum, ty, interner)))
                        .unwrap_or_default();
                    let params_str = if params.is_empty() { String::new() } else { format!(", {}", params.join(", ")) };
                    format!("{indent}    fn {}(&self{params_str}){ret};", interner.resolve(m.name.name))
                })
                .collect();
            let vis = if decl.is_exported { "pub " } else { "" };
            format!("{indent}{vis}trait {name} {{\n{}\n{indent}}}", sigs.join("\n"))
        }
        Target::Nebula | Target::Glacies => {
            let sigs: Vec<_> = decl.methods.iter().map(|m| format!("{indent}    {}();", interner.resolve(m.name.name))).collect();
            let export = if decl.is_exported { "export " } else { "" };
            format!("{indent}{export}interface {name} {{\n{}\n{indent}}}", sigs.join("\n"))
        }
    }
}

fn codegen_enum_declaration(decl: &sermo_lang::ast::stmt::EnumDeclaration, interner: &Interner, ctx: &mut GenContext, indent: &str) -> String {
    let name = interner.resolve(decl.name.name);
    match ctx.target() {
        Target::Ferrum => {
            let members: Vec<_> = decl.members.iter().map(|m| format!("{indent}    {},", interner.resolve(m.name.name))).collect();
            let vis = if decl.is_exported { "pub " } else { "" };
            format!("{indent}{vis}enum {name} {{\n{}\n{indent}}}", members.join("\n"))
        }
        Target::Nebula | Target::Glacies => {
            let members: Vec<_> = decl
                .members
                .iter()
                .map(|m| match &m.value {
                    Some(v) => format!("{indent}    {} = {},", interner.resolve(m.name.name), codegen_expr(v, interner, ctx)),
                    None => format!("{indent}    {},", interner.resolve(m.name.name)),
                })
                .collect();
            let export = if decl.is_exported { "export " } else { "" };
            format!("{indent}{export}enum {name} {{\n{}\n{indent}}}", members.join("\n"))
        }
    }
}

fn codegen_discretio_declaration(decl: &sermo_lang::ast::stmt::DiscretioDeclaration, interner: &Interner, ctx: &mut GenContext, indent: &str) -> String {
    let name = interner.resolve(decl.name.name);
    ctx.mark_feature(FeatureKey::TaggedUnion);
    match ctx.target() {
        Target::Ferrum => {
            let variants: Vec<_> = decl
                .variants
                .iter()
                .map(|v| {
                    if v.fields.is_empty() {
                        format!("{indent}    {},", interner.resolve(v.name.name))
                    } else {
                        let fields: Vec<_> = v.fields.iter().map(|(n, t)| format!("{}: {}", interner.resolve(n.name), idiom::render_type(Target::Ferrum, t, interner))).collect();
                        format!("{indent}    {} {{ {} }},", interner.resolve(v.name.name), fields.join(", "))
                    }
                })
                .collect();
            let vis = if decl.is_exported { "pub " } else { "" };
            format!("{indent}{vis}enum {name} {{\n{}\n{indent}}}", variants.join("\n"))
        }
        Target::Nebula | Target::Glacies => {
            // Tagged unions are emulated: each variant becomes a class with a
            // `kind` discriminant string (spec §3.6's Emulated capability).
            let variants: Vec<_> = decl
                .variants
                .iter()
                .map(|v| {
                    let field_names: Vec<_> = v.fields.iter().map(|(n, _)| interner.resolve(n.name)).collect();
                    format!(
                        "{indent}class {}_{} {{ constructor({}) {{ this.kind = \"{}\"; {} }} }}",
                        name,
                        interner.resolve(v.name.name),
                        field_names.join(", "),
                        interner.resolve(v.name.name),
                        field_names.iter().map(|f| format!("this.{f} = {f};")).collect::<Vec<_>>().join(" ")
                    )
                })
                .collect();
            variants.join("\n")
        }
    }
}

fn codegen_if(if_stmt: &sermo_lang::ast::stmt::IfStatement, interner: &Interner, ctx: &mut GenContext, indent: &str) -> String {
    let mut out = String::new();
    for (i, branch) in if_stmt.branches.iter().enumerate() {
        let condition = codegen_expr(&branch.condition, interner, ctx);
        ctx.push_indent();
        let body = codegen_block(&branch.body, interner, ctx);
        ctx.pop_indent();
        if i == 0 {
            out.push_str(&format!("{indent}if {condition} {{\n{body}\n{indent}}}"));
        } else {
            out.push_str(&format!(" else if {condition} {{\n{body}\n{indent}}}"));
        }
    }
    if let Some(else_body) = &if_stmt.else_body {
        ctx.push_indent();
        let body = codegen_block(else_body, interner, ctx);
        ctx.pop_indent();
        out.push_str(&format!(" else {{\n{body}\n{indent}}}"));
    }
    out
}

fn codegen_while(while_stmt: &sermo_lang::ast::stmt::WhileStatement, interner: &Interner, ctx: &mut GenContext, indent: &str) -> String {
    let condition = codegen_expr(&while_stmt.condition, interner, ctx);
    ctx.push_indent();
    let body = codegen_block(&while_stmt.body, interner, ctx);
    ctx.pop_indent();
    format!("{indent}while {condition} {{\n{body}\n{indent}}}")
}

fn codegen_iteration(iter_stmt: &sermo_lang::ast::stmt::IterationStatement, interner: &Interner, ctx: &mut GenContext, indent: &str) -> String {
    let iterable = codegen_expr(&iter_stmt.iterable, interner, ctx);
    let binding = ctx.disambiguate(interner.resolve(iter_stmt.binding.name));
    ctx.push_indent();
    let body = codegen_block(&iter_stmt.body, interner, ctx);
    ctx.pop_indent();
    match ctx.target() {
        Target::Ferrum => match iter_stmt.kind {
            IterationKind::ExPro => format!("{indent}for {binding} in {iterable} {{\n{body}\n{indent}}}"),
            IterationKind::DePro => format!("{indent}for {binding} in {iterable}.keys() {{\n{body}\n{indent}}}"),
        },
        Target::Nebula | Target::Glacies => match iter_stmt.kind {
            IterationKind::ExPro => format!("{indent}for (const {binding} of {iterable}) {{\n{body}\n{indent}}}"),
            IterationKind::DePro => format!("{indent}for (const {binding} in {iterable}) {{\n{body}\n{indent}}}"),
        },
    }
}

fn codegen_switch(switch_stmt: &sermo_lang::ast::stmt::SwitchStatement, interner: &Interner, ctx: &mut GenContext, indent: &str) -> String {
    let discriminant = codegen_expr(&switch_stmt.discriminant, interner, ctx);
    ctx.push_indent();
    let cases: Vec<_> = switch_stmt
        .cases
        .iter()
        .map(|case| {
            let test = case.test.as_ref().map(|t| codegen_expr(t, interner, ctx));
            ctx.push_indent();
            let body = codegen_block(&case.body, interner, ctx);
            ctx.pop_indent();
            let label = test.map(|t| format!("case {t}:")).unwrap_or_else(|| "default:".to_string());
            format!("{}{label}\n{body}", ctx.indent())
        })
        .collect();
    ctx.pop_indent();
    format!("{indent}switch ({discriminant}) {{\n{}\n{indent}}}", cases.join("\n"))
}

fn codegen_discerne(discerne_stmt: &sermo_lang::ast::stmt::DiscerneStatement, interner: &Interner, ctx: &mut GenContext, indent: &str) -> String {
    let discriminants: Vec<_> = discerne_stmt.discriminants.iter().map(|d| codegen_expr(d, interner, ctx)).collect();
    match ctx.target() {
        Target::Ferrum => {
            let scrutinee = if discriminants.len() == 1 { discriminants[0].clone() } else { format!("({})", discriminants.join(", ")) };
            ctx.push_indent();
            let arms: Vec<_> = discerne_stmt
                .cases
                .iter()
                .map(|case| {
                    let pattern = render_pattern_ferrum(&case.pattern, interner);
                    ctx.push_indent();
                    let body = codegen_block(&case.body, interner, ctx);
                    ctx.pop_indent();
                    format!("{}{pattern} => {{\n{body}\n{}}}", ctx.indent(), ctx.indent())
                })
                .collect();
            ctx.pop_indent();
            format!("{indent}match {scrutinee} {{\n{}\n{indent}}}", arms.join("\n"))
        }
        Target::Nebula | Target::Glacies => {
            let tag_checks: Vec<_> = discriminants.iter().map(|d| format!("{d}.kind")).collect();
            ctx.push_indent();
            let arms: Vec<_> = discerne_stmt
                .cases
                .iter()
                .map(|case| {
                    let variant_tag = case.pattern.variant_names.first().map(|s| interner.resolve(*s)).unwrap_or("_");
                    ctx.push_indent();
                    let body = codegen_block(&case.body, interner, ctx);
                    ctx.pop_indent();
                    if case.pattern.is_wildcard {
                        format!("{}default:\n{body}\n{}break;", ctx.indent(), ctx.indent())
                    } else {
                        format!("{}case \"{variant_tag}\":\n{body}\n{}break;", ctx.indent(), ctx.indent())
                    }
                })
                .collect();
            ctx.pop_indent();
            format!("{indent}switch ({}) {{\n{}\n{indent}}}", tag_checks.join(" + \"|\" + "), arms.join("\n"))
        }
    }
}

fn render_pattern_ferrum(pattern: &sermo_lang::ast::types::Pattern, interner: &Interner) -> String {
    if pattern.is_wildcard {
        return "_".to_string();
    }
    let names: Vec<_> = pattern.variant_names.iter().map(|n| interner.resolve(*n)).collect();
    let fields: Vec<_> = pattern.field_bindings.iter().map(|f| interner.resolve(f.name)).collect();
    let head = names.join(" | ");
    if fields.is_empty() {
        head
    } else {
        format!("{head} {{ {} }}", fields.join(", "))
    }
}

fn codegen_resource(resource: &sermo_lang::ast::stmt::ResourceStatement, interner: &Interner, ctx: &mut GenContext, indent: &str) -> String {
    ctx.mark_feature(FeatureKey::ResourceScope);
    let resource_code = resource.resource.as_ref().map(|e| codegen_expr(e, interner, ctx));
    let binding = resource.binding.as_ref().map(|id| interner.resolve(id.name));
    let label = match resource.kind {
        ResourceKind::Arena => "Arena",
        ResourceKind::Pagina => "Page",
        ResourceKind::Expression => "Resource",
    };
    ctx.push_indent();
    let body = codegen_block(&resource.body, interner, ctx);
    ctx.pop_indent();
    idiom::render_resource_scope(ctx.target(), &ctx.options.allocator_param.clone(), label, resource_code.as_deref(), binding, &body, indent)
}

fn codegen_entry_point(entry: &sermo_lang::ast::stmt::EntryPointDeclaration, interner: &Interner, ctx: &mut GenContext, indent: &str) -> String {
    if entry.is_async {
        ctx.mark_feature(FeatureKey::AsyncFunction);
    }
    ctx.push_indent();
    let body = codegen_block(&entry.body, interner, ctx);
    ctx.pop_indent();
    match ctx.target() {
        Target::Ferrum => {
            let async_kw = if entry.is_async { "#[tokio::main]\nasync " } else { "" };
            format!("{indent}{async_kw}fn main() {{\n{body}\n{indent}}}")
        }
        Target::Nebula | Target::Glacies => {
            let async_kw = if entry.is_async { "async " } else { "" };
            format!("{indent}{async_kw}function main() {{\n{body}\n{indent}}}\nmain();")
        }
    }
}

/// Emits a `proba` suite. `ferrum` uses the target's own native `#[cfg(test)]
/// convention; the other targets get a standalone harness function per case,
/// collected by name into `ctx.test_cases` for a generated filtering runner
/// (spec §4.5 "Tests" — no native test framework to lean on there).
fn codegen_test_suite(suite: &sermo_lang::ast::stmt::TestSuite, interner: &Interner, ctx: &mut GenContext, indent: &str) -> String {
    if ctx.options.strip_tests {
        return String::new();
    }
    match ctx.target() {
        Target::Ferrum => {
            ctx.push_indent();
            let cases: Vec<_> = suite
                .cases
                .iter()
                .map(|case| {
                    let fn_name = sanitize_test_name(&case.name);
                    ctx.push_indent();
                    let body = codegen_block(&case.body, interner, ctx);
                    ctx.pop_indent();
                    format!("{}#[test]\n{}fn {fn_name}() {{\n{body}\n{}}}", ctx.indent(), ctx.indent(), ctx.indent())
                })
                .collect();
            ctx.pop_indent();
            format!("{indent}#[cfg(test)]\n{indent}mod tests {{\n{indent}    use super::*;\n\n{}\n{indent}}}", cases.join("\n\n"))
        }
        Target::Nebula | Target::Glacies => {
            let mut out = String::new();
            for case in &suite.cases {
                let fn_name = sanitize_test_name(&case.name);
                ctx.test_cases.push(fn_name.clone());
                ctx.push_indent();
                let body = codegen_block(&case.body, interner, ctx);
                ctx.pop_indent();
                out.push_str(&format!("{indent}function {fn_name}() {{\n{body}\n{indent}}}\n\n"));
            }
            out
        }
    }
}

fn sanitize_test_name(name: &str) -> String {
    name.chars().map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' }).collect()
}

fn codegen_output(output: &sermo_lang::ast::stmt::OutputStatement, interner: &Interner, ctx: &mut GenContext, indent: &str) -> String {
    let args: Vec<_> = output.arguments.iter().map(|a| codegen_expr(a, interner, ctx)).collect();
    let semi = ctx.semicolon();
    match ctx.target() {
        Target::Ferrum => {
            let macro_name = match output.level {
                OutputLevel::Info => "tracing::info!",
                OutputLevel::Debug => "tracing::debug!",
                OutputLevel::Warn => "tracing::warn!",
            };
            let mut fmt = output.template.clone();
            for i in 0..args.len() {
                fmt = fmt.replacen(format!("§{i}").as_str(), "{}", 1);
            }
            if args.is_empty() {
                format!("{indent}{macro_name}(\"{fmt}\"){semi}")
            } else {
                format!("{indent}{macro_name}(\"{fmt}\", {}){semi}", args.join(", "))
            }
        }
        Target::Nebula | Target::Glacies => {
            let method = match output.level {
                OutputLevel::Info => "console.log",
                OutputLevel::Debug => "console.debug",
                OutputLevel::Warn => "console.warn",
            };
            let mut fmt = output.template.clone();
            for (i, arg) in args.iter().enumerate() {
                fmt = fmt.replace(format!("§{i}").as_str(), &format!("${{{arg}}}"));
            }
            format!("{indent}{method}(`{fmt}`){semi}")
        }
    }
}

#[cfg(test)]
mod tests {
    use sermo_base::{Interner, Span, Target};
    use sermo_lang::ast::stmt::{OutputLevel, OutputStatement};
    use sermo_lang::ast::{Statement, StatementKind};

    use crate::context::{CodegenOptions, GenContext};
    use sermo_registry::Registry;

    fn stmt(kind: StatementKind) -> Statement {
        Statement::new(kind, Span::new(Default::default(), Default::default()))
    }

    #[test]
    fn renders_output_statement_on_ferrum() {
        let interner = sermo_base::Interner::new();
        let registry = Registry::for_target(Target::Ferrum);
        let mut ctx = GenContext::new(CodegenOptions::for_target(Target::Ferrum), &registry);
        let output = stmt(StatementKind::Output(OutputStatement { level: OutputLevel::Info, template: "hello".to_string(), arguments: Vec::new() }));
        let rendered = super::codegen_stmt(&output, &interner, &mut ctx);
        assert!(rendered.contains("tracing::info!"));
    }

    #[test]
    fn renders_output_statement_on_nebula() {
        let interner = sermo_base::Interner::new();
        let registry = Registry::for_target(Target::Nebula);
        let mut ctx = GenContext::new(CodegenOptions::for_target(Target::Nebula), &registry);
        let output = stmt(StatementKind::Output(OutputStatement { level: OutputLevel::Warn, template: "hello".to_string(), arguments: Vec::new() }));
        let rendered = super::codegen_stmt(&output, &interner, &mut ctx);
        assert!(rendered.contains("console.warn"));
    }

    #[test]
    fn block_indents_nested_statements() {
        let interner = sermo_base::Interner::new();
        let registry = Registry::for_target(Target::Ferrum);
        let mut ctx = GenContext::new(CodegenOptions::for_target(Target::Ferrum), &registry);
        let inner = stmt(StatementKind::Return(None));
        let block = stmt(StatementKind::Block(vec![inner]));
        let rendered = super::codegen_stmt(&block, &interner, &mut ctx);
        assert!(rendered.contains("return;"));
    }
}
