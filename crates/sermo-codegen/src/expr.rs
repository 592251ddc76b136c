//! Expression code generation (spec §4.5: "expression handlers compose by
//! recursion").

use sermo_base::{FeatureKey, Interner, Target};
use sermo_lang::ast::expr::{ArrayElement, AssignmentOperator, BinaryOperator, CastKind, MemberKey, ObjectElement, TemplateElement, UnaryOperator};
use sermo_lang::ast::{Expression, ExpressionKind};
use sermo_registry::{StdlibModule, Translation};

use crate::context::GenContext;
use crate::idiom;
use crate::stmt::codegen_block;

pub fn codegen_expr(expr: &Expression, interner: &Interner, ctx: &mut GenContext) -> String {
    match &expr.kind {
        ExpressionKind::Literal { value, raw } => codegen_literal(value, *raw, interner, ctx),
        ExpressionKind::Identifier(id) => ctx.disambiguate(interner.resolve(id.name)),
        ExpressionKind::TemplateLiteral { parts } => codegen_template(parts, interner, ctx),
        ExpressionKind::ArrayLiteral { elements } => codegen_array_literal(elements, interner, ctx),
        ExpressionKind::ObjectLiteral { elements } => codegen_object_literal(elements, interner, ctx),
        ExpressionKind::Binary { operator, left, right } => codegen_binary(*operator, left, right, interner, ctx),
        ExpressionKind::Unary { operator, operand } => codegen_unary(*operator, operand, interner, ctx),
        ExpressionKind::Assignment { operator, target, value } => codegen_assignment(*operator, target, value, interner, ctx),
        ExpressionKind::Ternary { test, consequent, alternate } => codegen_ternary(test, consequent, alternate, interner, ctx),
        ExpressionKind::Range { start, end, inclusive, step } => {
            let start = codegen_expr(start, interner, ctx);
            let end = codegen_expr(end, interner, ctx);
            let step = step.as_ref().map(|s| codegen_expr(s, interner, ctx));
            idiom::render_range(ctx.target(), &start, &end, *inclusive, step.as_deref())
        }
        ExpressionKind::Cast { kind, operand, target_type, fallback } => codegen_cast(*kind, operand, target_type.as_ref(), fallback.as_deref(), interner, ctx),
        ExpressionKind::Call { callee, arguments } => codegen_call(callee, arguments, interner, ctx),
        ExpressionKind::Member { object, key, optional, non_null } => codegen_member(object, key, *optional, *non_null, interner, ctx),
        ExpressionKind::Cede { operand } => {
            ctx.mark_feature(FeatureKey::AsyncFunction);
            let inner = codegen_expr(operand, interner, ctx);
            match ctx.target() {
                Target::Ferrum => format!("{inner}.await"),
                Target::Nebula | Target::Glacies => format!("(await {inner})"),
            }
        }
        ExpressionKind::FunctionExpression { parameters, body, .. } => codegen_function_expression(parameters, body, interner, ctx),
        ExpressionKind::Unknown => match ctx.target() {
            Target::Ferrum => "()".to_string(),
            Target::Nebula | Target::Glacies => "null".to_string(),
        },
    }
}

fn codegen_literal(value: &sermo_lang::token::LiteralKind, raw: sermo_base::Symbol, interner: &Interner, ctx: &GenContext) -> String {
    use sermo_lang::token::LiteralKind::*;
    match value {
        Bool(b) => b.to_string(),
        Nil => {
            let spelling = interner.resolve(raw);
            match (ctx.target(), spelling) {
                (Target::Ferrum, "vacuum") => "()".to_string(),
                (Target::Ferrum, _) => "None".to_string(),
                (_, _) => "null".to_string(),
            }
        }
        Integer(n) => n.to_string(),
        Float(f) => f.to_string(),
        BigInteger(digits) => digits.clone(),
        Str(s) => format!("{s:?}"),
        TemplateStr(s) => format!("{s:?}"),
        Regex { pattern, flags_symbol } => {
            let flags = interner.resolve(*flags_symbol);
            match ctx.target() {
                Target::Ferrum => format!("regex::Regex::new(r{pattern:?}).unwrap()"),
                Target::Nebula | Target::Glacies => format!("/{pattern}/{flags}"),
            }
        }
    }
}

fn codegen_template(parts: &[TemplateElement], interner: &Interner, ctx: &mut GenContext) -> String {
    ctx.mark_feature(FeatureKey::TemplateInterpolation);
    match ctx.target() {
        Target::Ferrum => {
            let mut fmt = String::new();
            let mut args = Vec::new();
            for part in parts {
                match part {
                    TemplateElement::Str(s) => fmt.push_str(&s.replace('{', "{{").replace('}', "}}")),
                    TemplateElement::Expr(e) => {
                        fmt.push_str("{}");
                        args.push(codegen_expr(e, interner, ctx));
                    }
                }
            }
            if args.is_empty() {
                format!("{fmt:?}")
            } else {
                format!("format!({:?}, {})", fmt, args.join(", "))
            }
        }
        Target::Nebula | Target::Glacies => {
            let mut rendered = String::from("`");
            for part in parts {
                match part {
                    TemplateElement::Str(s) => rendered.push_str(s),
                    TemplateElement::Expr(e) => {
                        rendered.push_str("${");
                        rendered.push_str(&codegen_expr(e, interner, ctx));
                        rendered.push('}');
                    }
                }
            }
            rendered.push('`');
            rendered
        }
    }
}

fn codegen_array_literal(elements: &[ArrayElement], interner: &Interner, ctx: &mut GenContext) -> String {
    let has_spread = elements.iter().any(|e| e.is_spread);
    match ctx.target() {
        Target::Ferrum if has_spread => {
            ctx.mark_feature(FeatureKey::SpreadElement);
            let mut chain = String::from("Vec::<_>::new()");
            for el in elements {
                let rendered = codegen_expr(&el.value, interner, ctx);
                if el.is_spread {
                    chain = format!("{chain}.into_iter().chain({rendered}).collect::<Vec<_>>()");
                } else {
                    chain = format!("{{ let mut v = {chain}; v.push({rendered}); v }}");
                }
            }
            chain
        }
        Target::Ferrum => {
            let items: Vec<_> = elements.iter().map(|e| codegen_expr(&e.value, interner, ctx)).collect();
            format!("vec![{}]", items.join(", "))
        }
        Target::Nebula | Target::Glacies => {
            let items: Vec<_> = elements
                .iter()
                .map(|e| {
                    if e.is_spread {
                        ctx.mark_feature(FeatureKey::SpreadElement);
                        format!("...{}", codegen_expr(&e.value, interner, ctx))
                    } else {
                        codegen_expr(&e.value, interner, ctx)
                    }
                })
                .collect();
            format!("[{}]", items.join(", "))
        }
    }
}

fn codegen_object_literal(elements: &[ObjectElement], interner: &Interner, ctx: &mut GenContext) -> String {
    match ctx.target() {
        Target::Ferrum => {
            let mut pairs = Vec::new();
            for el in elements {
                match el {
                    ObjectElement::Property(p) => {
                        let key = interner.resolve(p.key.name);
                        let value = codegen_expr(&p.value, interner, ctx);
                        pairs.push(format!("({key:?}.to_string(), {value})"));
                    }
                    ObjectElement::Spread(e) => {
                        ctx.mark_feature(FeatureKey::SpreadElement);
                        pairs.push(format!("/* ...{} */", codegen_expr(e, interner, ctx)));
                    }
                }
            }
            format!("std::collections::HashMap::from([{}])", pairs.join(", "))
        }
        Target::Nebula | Target::Glacies => {
            let mut pairs = Vec::new();
            for el in elements {
                match el {
                    ObjectElement::Property(p) => {
                        let key = interner.resolve(p.key.name);
                        if p.shorthand {
                            pairs.push(key.to_string());
                        } else {
                            let value = codegen_expr(&p.value, interner, ctx);
                            pairs.push(format!("{key}: {value}"));
                        }
                    }
                    ObjectElement::Spread(e) => {
                        ctx.mark_feature(FeatureKey::SpreadElement);
                        pairs.push(format!("...{}", codegen_expr(e, interner, ctx)));
                    }
                }
            }
            format!("{{ {} }}", pairs.join(", "))
        }
    }
}

fn binary_symbol(operator: BinaryOperator, target: Target) -> Option<&'static str> {
    use BinaryOperator::*;
    Some(match operator {
        Add => "+",
        Subtract => "-",
        Multiply => "*",
        Divide => "/",
        Modulo => "%",
        BitOr => "|",
        BitXor => "^",
        BitAnd => "&",
        ShiftLeft => "<<",
        ShiftRight => ">>",
        Equal | StrictEqual => "==",
        NotEqual | StrictNotEqual => "!=",
        Less => "<",
        LessEqual => "<=",
        Greater => ">",
        GreaterEqual => ">=",
        LogicalAnd => match target {
            Target::Ferrum => "&&",
            Target::Nebula | Target::Glacies => "&&",
        },
        LogicalOr => "||",
        Within | Between | NullishCoalesce | Is | IsNot => return None,
    })
}

fn codegen_binary(operator: BinaryOperator, left: &Expression, right: &Expression, interner: &Interner, ctx: &mut GenContext) -> String {
    let l = codegen_expr(left, interner, ctx);
    let r = codegen_expr(right, interner, ctx);
    match operator {
        BinaryOperator::Within => format!("({l} >= {r}.0 && {l} <= {r}.1)"),
        BinaryOperator::Between => format!("({l} > {r}.0 && {l} < {r}.1)"),
        BinaryOperator::NullishCoalesce => match ctx.target() {
            Target::Ferrum => format!("{l}.unwrap_or({r})"),
            Target::Nebula | Target::Glacies => format!("({l} ?? {r})"),
        },
        BinaryOperator::Is => match ctx.target() {
            Target::Ferrum => format!("matches!({l}, {r})"),
            Target::Nebula | Target::Glacies => format!("({l} instanceof {r})"),
        },
        BinaryOperator::IsNot => match ctx.target() {
            Target::Ferrum => format!("!matches!({l}, {r})"),
            Target::Nebula | Target::Glacies => format!("!({l} instanceof {r})"),
        },
        _ => {
            let symbol = binary_symbol(operator, ctx.target()).unwrap_or("+");
            format!("({l} {symbol} {r})")
        }
    }
}

fn codegen_unary(operator: UnaryOperator, operand: &Expression, interner: &Interner, ctx: &mut GenContext) -> String {
    let value = codegen_expr(operand, interner, ctx);
    let symbol = match operator {
        UnaryOperator::Negate => "-",
        UnaryOperator::Not => "!",
        UnaryOperator::BitNot => "!",
        UnaryOperator::Plus => "+",
    };
    format!("({symbol}{value})")
}

fn assignment_symbol(operator: AssignmentOperator) -> &'static str {
    use AssignmentOperator::*;
    match operator {
        Assign => "=",
        AddAssign => "+=",
        SubtractAssign => "-=",
        MultiplyAssign => "*=",
        DivideAssign => "/=",
        ModuloAssign => "%=",
        BitAndAssign => "&=",
        BitOrAssign => "|=",
        BitXorAssign => "^=",
        LogicalAndAssign => "&&=",
        LogicalOrAssign => "||=",
        NullishAssign => "??=",
    }
}

fn codegen_assignment(operator: AssignmentOperator, target: &Expression, value: &Expression, interner: &Interner, ctx: &mut GenContext) -> String {
    let t = codegen_expr(target, interner, ctx);
    let v = codegen_expr(value, interner, ctx);
    if ctx.target() == Target::Ferrum && matches!(operator, AssignmentOperator::LogicalAndAssign | AssignmentOperator::LogicalOrAssign | AssignmentOperator::NullishAssign) {
        match operator {
            AssignmentOperator::NullishAssign => format!("{t} = {t}.or({v})"),
            AssignmentOperator::LogicalAndAssign => format!("if {t} {{ {t} = {v}; }}"),
            _ => format!("if !{t} {{ {t} = {v}; }}"),
        }
    } else {
        format!("{t} {} {v}", assignment_symbol(operator))
    }
}

fn codegen_ternary(test: &Expression, consequent: &Expression, alternate: &Expression, interner: &Interner, ctx: &mut GenContext) -> String {
    let t = codegen_expr(test, interner, ctx);
    let c = codegen_expr(consequent, interner, ctx);
    let a = codegen_expr(alternate, interner, ctx);
    match ctx.target() {
        Target::Ferrum => format!("(if {t} {{ {c} }} else {{ {a} }})"),
        Target::Nebula | Target::Glacies => format!("({t} ? {c} : {a})"),
    }
}

fn codegen_cast(
    kind: CastKind,
    operand: &Expression,
    target_type: Option<&sermo_lang::ast::TypeAnnotation>,
    fallback: Option<&Expression>,
    interner: &Interner,
    ctx: &mut GenContext,
) -> String {
    let value = codegen_expr(operand, interner, ctx);
    let rendered = match kind {
        CastKind::Assert => match (ctx.target(), target_type) {
            (Target::Ferrum, Some(ty)) => format!("({value} as {})", idiom::render_type(Target::Ferrum, ty, interner)),
            _ => value.clone(),
        },
        CastKind::Native => match target_type {
            Some(ty) => idiom::render_native_cast(ctx.target(), ty, interner, &value),
            None => value.clone(),
        },
        CastKind::ToNumerus => match ctx.target() {
            Target::Ferrum => format!("({value}).parse::<i64>()"),
            Target::Nebula | Target::Glacies => format!("Number({value})"),
        },
        CastKind::ToFractus => match ctx.target() {
            Target::Ferrum => format!("({value}).parse::<f64>()"),
            Target::Nebula | Target::Glacies => format!("parseFloat({value})"),
        },
        CastKind::ToTextus => match ctx.target() {
            Target::Ferrum => format!("({value}).to_string()"),
            Target::Nebula | Target::Glacies => format!("String({value})"),
        },
        CastKind::ToBivalens => match ctx.target() {
            Target::Ferrum => format!("({value} != 0)"),
            Target::Nebula | Target::Glacies => format!("Boolean({value})"),
        },
    };
    match fallback {
        Some(fb) => {
            let fb_rendered = codegen_expr(fb, interner, ctx);
            match ctx.target() {
                Target::Ferrum => format!("({rendered}).unwrap_or({fb_rendered})"),
                Target::Nebula | Target::Glacies => format!("({rendered} ?? {fb_rendered})"),
            }
        }
        None => rendered,
    }
}

/// Names a stdlib namespace identifier maps to, if any — the compile-time
/// surface a `cura`-free namespace import binds (spec §4.4's `(target,
/// stdlib-module, method)` lookup key). A real implementation would
/// consult the resolved `Namespace` semantic type recorded on the member
/// expression; since codegen here works from the bare AST rather than an
/// in-place-annotated tree, the namespace is recovered from the import
/// alias's surface spelling instead.
fn stdlib_module_for(name: &str) -> Option<StdlibModule> {
    Some(match name {
        "collection" | "coll" => StdlibModule::Collection,
        "fs" => StdlibModule::FileSystem,
        "net" => StdlibModule::Networking,
        "time" => StdlibModule::Time,
        "math" => StdlibModule::Math,
        "kv" => StdlibModule::KvStore,
        "process" => StdlibModule::Process,
        "ipc" => StdlibModule::Ipc,
        _ => return None,
    })
}

fn codegen_call(callee: &Expression, arguments: &[sermo_lang::ast::expr::Argument], interner: &Interner, ctx: &mut GenContext) -> String {
    let args: Vec<_> = arguments.iter().map(|a| codegen_expr(&a.value, interner, ctx)).collect();

    if let ExpressionKind::Member { object, key: MemberKey::Name(method), optional: false, non_null: false } = &callee.kind {
        if let ExpressionKind::Identifier(obj_id) = &object.kind {
            let namespace_name = interner.resolve(obj_id.name);
            if let Some(module) = stdlib_module_for(namespace_name) {
                let method_name = interner.resolve(method.name);
                if let Some(entry) = ctx.registry.lookup(module, method_name) {
                    return render_registry_call(entry, namespace_name, &args);
                }
                tracing::debug!(module = module.name(), method = method_name, "stdlib call has no registry entry for this target");
            }
        }
    }

    let callee_code = codegen_expr(callee, interner, ctx);
    format!("{callee_code}({})", args.join(", "))
}

fn render_registry_call(entry: &sermo_registry::RegistryEntry, receiver: &str, args: &[String]) -> String {
    let rendered = match entry.translation {
        // A dotted/qualified name (`Date.now`, `std::fs::read_to_string`) is a
        // free-standing path; the namespace identifier itself (`time`, `fs`)
        // never appears in the rendering. A bare name is a true method call
        // on the receiver value (`collection.push(x)`).
        Translation::Rename(name) if name.contains('.') || name.contains("::") => format!("{name}({})", args.join(", ")),
        Translation::Rename(name) => format!("{receiver}.{name}({})", args.join(", ")),
        Translation::Template(template) => {
            let mut combined = vec![receiver.to_string()];
            combined.extend(args.iter().cloned());
            let mut out = template.to_string();
            for (i, arg) in combined.iter().enumerate() {
                out = out.replace(format!("§{i}").as_str(), arg);
            }
            out
        }
        Translation::Native(render) => render(receiver, args),
    };
    if entry.is_async {
        format!("{rendered} /* async */")
    } else {
        rendered
    }
}

fn codegen_member(object: &Expression, key: &MemberKey, optional: bool, non_null: bool, interner: &Interner, ctx: &mut GenContext) -> String {
    let object_code = codegen_expr(object, interner, ctx);
    let member_code = match key {
        MemberKey::Name(id) => interner.resolve(id.name).to_string(),
        MemberKey::Computed(index) => {
            let index_code = codegen_expr(index, interner, ctx);
            return match ctx.target() {
                Target::Ferrum => format!("{object_code}[{index_code} as usize]"),
                Target::Nebula | Target::Glacies => format!("{object_code}[{index_code}]"),
            };
        }
    };
    if optional {
        ctx.mark_feature(FeatureKey::OptionalChaining);
        idiom::render_optional_member(ctx.target(), &object_code, &member_code)
    } else if non_null {
        ctx.mark_feature(FeatureKey::NonNullAssert);
        match ctx.target() {
            Target::Ferrum => format!("{object_code}.unwrap().{member_code}"),
            Target::Nebula | Target::Glacies => format!("{object_code}!.{member_code}"),
        }
    } else {
        format!("{object_code}.{member_code}")
    }
}

fn codegen_function_expression(parameters: &[sermo_lang::ast::Parameter], body: &[sermo_lang::ast::Statement], interner: &Interner, ctx: &mut GenContext) -> String {
    let params: Vec<_> = parameters.iter().map(|p| interner.resolve(p.name.name).to_string()).collect();
    ctx.push_indent();
    let body_code = codegen_block(body, interner, ctx);
    ctx.pop_indent();
    match ctx.target() {
        Target::Ferrum => format!("|{}| {{\n{body_code}\n{}}}", params.join(", "), ctx.indent()),
        Target::Nebula | Target::Glacies => format!("(({}) => {{\n{body_code}\n{}}})", params.join(", "), ctx.indent()),
    }
}
