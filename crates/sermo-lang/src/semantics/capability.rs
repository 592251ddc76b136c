//! Feature-detection visitor (spec §4.3: "a visitor collects feature keys
//! used ... for each key whose target capability is unsupported, emit a
//! diagnostic"). This module only walks the AST and reports *where* a
//! feature is used; the classification table itself is
//! [`sermo_base::CapabilityMatrix`], shared with `sermo-codegen` so both
//! stages agree on what each target supports.

use sermo_base::{Capability, CapabilityMatrix, Diagnostic, FeatureKey, Span, Target};

use crate::ast::*;

/// One use of a capability-gated feature, tied to the node that introduced
/// it — the analyzer reports a diagnostic at the first-seen use per spec
/// §4.3, so callers only need the earliest occurrence per key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureUse {
    pub feature: FeatureKey,
    pub span: Span,
}

/// Walks a module's statements, collecting every capability-gated feature
/// use in source order.
pub fn collect_feature_usages(statements: &[Statement]) -> Vec<FeatureUse> {
    let mut uses = Vec::new();
    for stmt in statements {
        visit_statement(stmt, &mut uses);
    }
    uses
}

fn push(uses: &mut Vec<FeatureUse>, feature: FeatureKey, span: Span) {
    uses.push(FeatureUse { feature, span });
}

/// Cross-references a module's feature uses against one target's
/// capability row, reporting each unsupported key once, at its first-seen
/// use (spec §4.3).
pub fn check_capabilities(target: Target, statements: &[Statement]) -> Vec<Diagnostic> {
    let mut seen = std::collections::HashSet::new();
    let mut diagnostics = Vec::new();
    for use_ in collect_feature_usages(statements) {
        if !seen.insert(use_.feature) {
            continue;
        }
        if CapabilityMatrix::classify(target, use_.feature) == Capability::Unsupported {
            diagnostics.push(Diagnostic::error(
                "C-UNSUPPORTED-FEATURE",
                format!("`{}` is not supported on target `{}`", use_.feature.name(), target.name()),
                use_.span,
            ));
        }
    }
    diagnostics
}

fn visit_statement(stmt: &Statement, uses: &mut Vec<FeatureUse>) {
    match &stmt.kind {
        StatementKind::VariableDeclaration(decl) => {
            if let Some(init) = &decl.initializer {
                visit_expression(init, uses);
            }
        }
        StatementKind::FunctionDeclaration(f) => visit_function(f, stmt.span, uses),
        StatementKind::ClassDeclaration(c) => {
            for m in &c.methods {
                visit_function(m, stmt.span, uses);
            }
            for field in &c.fields {
                if let Some(default) = &field.default_value {
                    visit_expression(default, uses);
                }
            }
        }
        StatementKind::InterfaceDeclaration(_) => {}
        StatementKind::EnumDeclaration(_) => {}
        StatementKind::DiscretioDeclaration(_) => {
            push(uses, FeatureKey::TaggedUnion, stmt.span);
        }
        StatementKind::TypeAliasDeclaration(_) => {}
        StatementKind::ImportDeclaration(_) => {}
        StatementKind::If(s) => {
            for branch in &s.branches {
                visit_expression(&branch.condition, uses);
                for inner in &branch.body {
                    visit_statement(inner, uses);
                }
            }
            if let Some(else_body) = &s.else_body {
                for inner in else_body {
                    visit_statement(inner, uses);
                }
            }
            if let Some(catch) = &s.catch {
                push(uses, FeatureKey::TryCatch, catch.span);
                for inner in &catch.body {
                    visit_statement(inner, uses);
                }
            }
        }
        StatementKind::While(s) => {
            visit_expression(&s.condition, uses);
            for inner in &s.body {
                visit_statement(inner, uses);
            }
            if let Some(catch) = &s.catch {
                push(uses, FeatureKey::TryCatch, catch.span);
                for inner in &catch.body {
                    visit_statement(inner, uses);
                }
            }
        }
        StatementKind::Iteration(s) => {
            if s.is_async {
                push(uses, FeatureKey::AsyncFunction, stmt.span);
            }
            visit_expression(&s.iterable, uses);
            for inner in &s.body {
                visit_statement(inner, uses);
            }
        }
        StatementKind::Switch(s) => {
            visit_expression(&s.discriminant, uses);
            for case in &s.cases {
                if let Some(test) = &case.test {
                    visit_expression(test, uses);
                }
                for inner in &case.body {
                    visit_statement(inner, uses);
                }
            }
        }
        StatementKind::Discerne(s) => {
            push(uses, FeatureKey::TaggedUnion, stmt.span);
            for d in &s.discriminants {
                visit_expression(d, uses);
            }
            for case in &s.cases {
                if let Some(guard) = &case.pattern.guard {
                    visit_expression(guard, uses);
                }
                for inner in &case.body {
                    visit_statement(inner, uses);
                }
            }
        }
        StatementKind::Guard(s) => {
            visit_expression(&s.condition, uses);
            for inner in &s.otherwise {
                visit_statement(inner, uses);
            }
        }
        StatementKind::Try(s) => {
            push(uses, FeatureKey::TryCatch, stmt.span);
            for inner in &s.body {
                visit_statement(inner, uses);
            }
            if let Some(catch) = &s.catch {
                for inner in &catch.body {
                    visit_statement(inner, uses);
                }
            }
        }
        StatementKind::Throw(e) | StatementKind::Panic(e) | StatementKind::Assert(e) => {
            visit_expression(e, uses);
        }
        StatementKind::Resource(s) => {
            push(uses, FeatureKey::ResourceScope, stmt.span);
            if let Some(resource) = &s.resource {
                visit_expression(resource, uses);
            }
            for inner in &s.body {
                visit_statement(inner, uses);
            }
        }
        StatementKind::Dispatch(s) => {
            for arg in &s.arguments {
                visit_expression(arg, uses);
            }
        }
        StatementKind::EntryPoint(s) => {
            if s.is_async {
                push(uses, FeatureKey::AsyncFunction, stmt.span);
            }
            for inner in &s.body {
                visit_statement(inner, uses);
            }
        }
        StatementKind::TestSuite(s) => {
            for hook in &s.hooks {
                for inner in &hook.body {
                    visit_statement(inner, uses);
                }
            }
            for case in &s.cases {
                for inner in &case.body {
                    visit_statement(inner, uses);
                }
            }
        }
        StatementKind::Output(s) => {
            for arg in &s.arguments {
                visit_expression(arg, uses);
            }
        }
        StatementKind::Return(Some(e)) => visit_expression(e, uses),
        StatementKind::Return(None) | StatementKind::Break(_) | StatementKind::Continue(_) => {}
        StatementKind::Block(body) => {
            for inner in body {
                visit_statement(inner, uses);
            }
        }
        StatementKind::Expression(e) => visit_expression(e, uses),
    }
}

fn visit_function(f: &FunctionDeclaration, span: Span, uses: &mut Vec<FeatureUse>) {
    if f.verb.is_async() {
        push(uses, FeatureKey::AsyncFunction, span);
    }
    if f.verb.is_generator() {
        push(uses, FeatureKey::GeneratorFunction, span);
    }
    for param in &f.parameters {
        if let Some(default) = &param.default_value {
            push(uses, FeatureKey::DefaultParams, param.span);
            visit_expression(default, uses);
        }
    }
    for inner in &f.body {
        visit_statement(inner, uses);
    }
}

fn visit_expression(expr: &Expression, uses: &mut Vec<FeatureUse>) {
    match &expr.kind {
        ExpressionKind::Literal { .. } | ExpressionKind::Identifier(_) | ExpressionKind::Unknown => {}
        ExpressionKind::TemplateLiteral { parts } => {
            for part in parts {
                if let TemplateElement::Expr(e) = part {
                    push(uses, FeatureKey::TemplateInterpolation, e.span);
                    visit_expression(e, uses);
                }
            }
        }
        ExpressionKind::ArrayLiteral { elements } => {
            for el in elements {
                if el.is_spread {
                    push(uses, FeatureKey::SpreadElement, el.value.span);
                }
                visit_expression(&el.value, uses);
            }
        }
        ExpressionKind::ObjectLiteral { elements } => {
            for el in elements {
                match el {
                    ObjectElement::Property(p) => visit_expression(&p.value, uses),
                    ObjectElement::Spread(e) => {
                        push(uses, FeatureKey::SpreadElement, e.span);
                        visit_expression(e, uses);
                    }
                }
            }
        }
        ExpressionKind::Binary { left, right, .. } => {
            visit_expression(left, uses);
            visit_expression(right, uses);
        }
        ExpressionKind::Unary { operand, .. } => visit_expression(operand, uses),
        ExpressionKind::Assignment { target, value, .. } => {
            visit_expression(target, uses);
            visit_expression(value, uses);
        }
        ExpressionKind::Ternary { test, consequent, alternate } => {
            visit_expression(test, uses);
            visit_expression(consequent, uses);
            visit_expression(alternate, uses);
        }
        ExpressionKind::Range { start, end, step, .. } => {
            visit_expression(start, uses);
            visit_expression(end, uses);
            if let Some(step) = step {
                visit_expression(step, uses);
            }
        }
        ExpressionKind::Cast { operand, fallback, .. } => {
            visit_expression(operand, uses);
            if let Some(fallback) = fallback {
                visit_expression(fallback, uses);
            }
        }
        ExpressionKind::Call { callee, arguments } => {
            visit_expression(callee, uses);
            for arg in arguments {
                if arg.is_spread {
                    push(uses, FeatureKey::SpreadElement, arg.value.span);
                }
                visit_expression(&arg.value, uses);
            }
        }
        ExpressionKind::Member { object, key, optional, non_null } => {
            if *optional {
                push(uses, FeatureKey::OptionalChaining, expr.span);
            }
            if *non_null {
                push(uses, FeatureKey::NonNullAssert, expr.span);
            }
            visit_expression(object, uses);
            if let MemberKey::Computed(inner) = key {
                visit_expression(inner, uses);
            }
        }
        ExpressionKind::Cede { operand } => {
            push(uses, FeatureKey::AsyncFunction, expr.span);
            visit_expression(operand, uses);
        }
        ExpressionKind::FunctionExpression { parameters, verb, body, .. } => {
            if let Some(verb) = verb {
                if verb.is_async() {
                    push(uses, FeatureKey::AsyncFunction, expr.span);
                }
                if verb.is_generator() {
                    push(uses, FeatureKey::GeneratorFunction, expr.span);
                }
            }
            for param in parameters {
                if let Some(default) = &param.default_value {
                    push(uses, FeatureKey::DefaultParams, param.span);
                    visit_expression(default, uses);
                }
            }
            for inner in body {
                visit_statement(inner, uses);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser;
    use sermo_base::Interner;

    fn features_in(source: &str) -> Vec<FeatureKey> {
        let mut interner = Interner::new();
        let (tokens, lex_errors) = Lexer::new(source, &mut interner).tokenize();
        assert!(lex_errors.is_empty(), "{lex_errors:?}");
        let (module, parse_errors) = parser::parse(tokens, &mut interner);
        assert!(parse_errors.is_empty(), "{parse_errors:?}");
        collect_feature_usages(&module.statements).into_iter().map(|u| u.feature).collect()
    }

    #[test]
    fn async_function_is_detected() {
        let features = features_in("munus f() fiet { }");
        assert!(features.contains(&FeatureKey::AsyncFunction));
    }

    #[test]
    fn generator_function_is_detected() {
        let features = features_in("munus f() fiunt { }");
        assert!(features.contains(&FeatureKey::GeneratorFunction));
    }

    #[test]
    fn resource_scope_is_detected() {
        let features = features_in("cura arena { }");
        assert!(features.contains(&FeatureKey::ResourceScope));
    }

    #[test]
    fn plain_function_has_no_features() {
        let features = features_in("munus f() fit { }");
        assert!(features.is_empty());
    }

    #[test]
    fn async_function_is_rejected_on_a_target_without_it() {
        let mut interner = Interner::new();
        let source = "munus f() fiet { }";
        let (tokens, _) = Lexer::new(source, &mut interner).tokenize();
        let (module, _) = parser::parse(tokens, &mut interner);
        let diagnostics = check_capabilities(Target::Glacies, &module.statements);
        assert!(diagnostics.iter().any(|d| d.code == "C-UNSUPPORTED-FEATURE"));
    }

    #[test]
    fn nebula_target_accepts_every_feature() {
        let mut interner = Interner::new();
        let source = "munus f() fiet { }";
        let (tokens, _) = Lexer::new(source, &mut interner).tokenize();
        let (module, _) = parser::parse(tokens, &mut interner);
        let diagnostics = check_capabilities(Target::Nebula, &module.statements);
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
    }
}
