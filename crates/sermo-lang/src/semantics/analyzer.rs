//! The semantic analyzer (spec §4.3): three phases per module —
//! predeclaration, signature resolution, body analysis — plus pattern
//! exhaustiveness and array-literal checks folded into body analysis.
//! Cross-module resolution lives in [`super`], one level up, since it needs
//! to run several `Analyzer`s against a shared [`ModuleGraph`].

use std::collections::BTreeMap;

use sermo_base::{Diagnostic, Interner, Span, Symbol};

use crate::ast::*;
use crate::token::LiteralKind;

use super::scope::{Scope, ScopeStack, SymbolEntry, SymbolKind};
use super::types::{CollectionKind, DiscretioType, FunctionType, GenusType, OrdoType, PactumType, PrimitiveKind, SemanticType};

pub struct Analyzer<'a> {
    interner: &'a Interner,
    diagnostics: Vec<Diagnostic>,
    scopes: ScopeStack,
    /// Declared return type of the function currently being analyzed, one
    /// entry per nesting level of function/closure bodies.
    current_function_return: Vec<SemanticType>,
}

impl<'a> Analyzer<'a> {
    pub fn new(interner: &'a Interner) -> Self {
        Analyzer { interner, diagnostics: Vec::new(), scopes: ScopeStack::new(), current_function_return: Vec::new() }
    }

    /// Runs all three phases over a module's top-level statements in order
    /// and returns its finished module scope (the caller wraps this in a
    /// `Module` for the graph) plus every diagnostic raised.
    pub fn analyze_module(mut self, statements: &[Statement]) -> (Scope, Vec<Diagnostic>) {
        self.predeclare(statements);
        self.resolve_signatures(statements);
        for stmt in statements {
            self.analyze_statement(stmt, true);
        }
        (self.scopes.module_scope().clone(), self.diagnostics)
    }

    fn text(&self, sym: Symbol) -> &'a str {
        self.interner.resolve(sym)
    }

    fn error(&mut self, span: Span, code: &'static str, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(code, message, span));
    }

    // -- phase 1: predeclaration ---------------------------------------

    /// Registers every top-level name with a placeholder type so mutually
    /// recursive references resolve (spec §4.3 phase 1).
    fn predeclare(&mut self, statements: &[Statement]) {
        for stmt in statements {
            match &stmt.kind {
                StatementKind::VariableDeclaration(d) => {
                    let mutable = matches!(d.mutability, MutabilityKind::Varia | MutabilityKind::Variandum);
                    let entry = SymbolEntry { kind: SymbolKind::Variable, ty: SemanticType::Unknown, mutable, exported: false, span: stmt.span };
                    self.declare_checked(d.name.name, entry);
                }
                StatementKind::FunctionDeclaration(f) => {
                    let entry = SymbolEntry {
                        kind: SymbolKind::Function,
                        ty: SemanticType::User(f.name.name),
                        mutable: false,
                        exported: f.is_exported,
                        span: stmt.span,
                    };
                    self.declare_checked(f.name.name, entry);
                }
                StatementKind::ClassDeclaration(c) => self.predeclare_type(c.name.name, c.is_exported, stmt.span),
                StatementKind::InterfaceDeclaration(i) => self.predeclare_type(i.name.name, i.is_exported, stmt.span),
                StatementKind::EnumDeclaration(e) => self.predeclare_type(e.name.name, e.is_exported, stmt.span),
                StatementKind::DiscretioDeclaration(d) => self.predeclare_type(d.name.name, d.is_exported, stmt.span),
                StatementKind::TypeAliasDeclaration(t) => self.predeclare_type(t.name.name, t.is_exported, stmt.span),
                StatementKind::ImportDeclaration(d) => self.predeclare_import(d, stmt.span),
                _ => {}
            }
        }
    }

    fn predeclare_type(&mut self, name: Symbol, exported: bool, span: Span) {
        let entry = SymbolEntry { kind: SymbolKind::Type, ty: SemanticType::User(name), mutable: false, exported, span };
        self.declare_checked(name, entry);
    }

    /// Binds each import specifier into this module's scope before body
    /// analysis runs (spec §4.3 phase 1), so a call to an imported symbol
    /// resolves within this module regardless of import order. The bound
    /// type is a placeholder: cross-module resolution (`resolve_import`,
    /// one level up in `semantics::mod`) only checks a specifier's name
    /// against the source module's exports — it has no resolved type to
    /// feed back into this scope, since modules are analyzed before the
    /// import graph's topological order is known.
    fn predeclare_import(&mut self, decl: &ImportDeclaration, span: Span) {
        for spec in &decl.specifiers {
            if spec.is_wildcard {
                if let Some(alias) = &spec.alias {
                    let entry = SymbolEntry { kind: SymbolKind::Namespace, ty: SemanticType::Unknown, mutable: false, exported: false, span };
                    self.declare_checked(alias.name, entry);
                }
                continue;
            }
            let local_name = spec.alias.as_ref().map(|a| a.name).unwrap_or(spec.imported);
            let entry = SymbolEntry { kind: SymbolKind::Import, ty: SemanticType::Unknown, mutable: false, exported: false, span };
            self.declare_checked(local_name, entry);
        }
    }

    fn declare_checked(&mut self, name: Symbol, entry: SymbolEntry) {
        if self.scopes.is_bound_in_current_scope(name) {
            self.error(entry.span, "E-DUPLICATE", format!("`{}` is already declared in this scope", self.text(name)));
            return;
        }
        self.scopes.bind(name, entry);
    }

    // -- phase 2: signature resolution ----------------------------------

    /// Resolves type annotations on the placeholders phase 1 registered
    /// (spec §4.3 phase 2): function signatures, class fields/methods,
    /// interface methods, union variant fields, variable annotations.
    fn resolve_signatures(&mut self, statements: &[Statement]) {
        for stmt in statements {
            match &stmt.kind {
                StatementKind::FunctionDeclaration(f) => {
                    let ty = SemanticType::Function(self.function_type(f));
                    self.update_binding(f.name.name, ty);
                }
                StatementKind::ClassDeclaration(c) => {
                    let fields = c.fields.iter().map(|fld| (fld.name.name, self.type_from_annotation(&fld.type_annotation))).collect();
                    let methods = c.methods.iter().map(|m| (m.name.name, self.function_type(m))).collect();
                    self.update_binding(c.name.name, SemanticType::Genus(GenusType { name: c.name.name, fields, methods }));
                }
                StatementKind::InterfaceDeclaration(i) => {
                    let methods = i
                        .methods
                        .iter()
                        .map(|m| {
                            let parameters = m
                                .parameters
                                .iter()
                                .map(|p| p.type_annotation.as_ref().map(|t| self.type_from_annotation(t)).unwrap_or(SemanticType::Unknown))
                                .collect();
                            let return_type =
                                Box::new(m.return_type.as_ref().map(|t| self.type_from_annotation(t)).unwrap_or_else(SemanticType::unit));
                            (m.name.name, FunctionType { parameters, return_type, is_async: false, is_generator: false, allocator_parameter: None })
                        })
                        .collect();
                    self.update_binding(i.name.name, SemanticType::Pactum(PactumType { name: i.name.name, methods }));
                }
                StatementKind::EnumDeclaration(e) => {
                    let members = e.members.iter().map(|m| m.name.name).collect();
                    self.update_binding(e.name.name, SemanticType::Ordo(OrdoType { name: e.name.name, members }));
                }
                StatementKind::DiscretioDeclaration(d) => {
                    let mut variants = BTreeMap::new();
                    for v in &d.variants {
                        let fields = v.fields.iter().map(|(fname, fty)| (fname.name, self.type_from_annotation(fty))).collect();
                        variants.insert(v.name.name, fields);
                    }
                    self.update_binding(d.name.name, SemanticType::Discretio(DiscretioType { name: d.name.name, variants }));
                }
                StatementKind::TypeAliasDeclaration(t) => {
                    let target = self.type_from_annotation(&t.target);
                    self.update_binding(t.name.name, target);
                }
                StatementKind::VariableDeclaration(v) => {
                    if let Some(annot) = &v.type_annotation {
                        let ty = self.type_from_annotation(annot);
                        self.update_binding(v.name.name, ty);
                    }
                }
                _ => {}
            }
        }
    }

    fn update_binding(&mut self, name: Symbol, ty: SemanticType) {
        if let Some(entry) = self.scopes.module_scope_mut().get_mut(name) {
            entry.ty = ty;
        }
    }

    fn function_type(&self, f: &FunctionDeclaration) -> FunctionType {
        let parameters =
            f.parameters.iter().map(|p| p.type_annotation.as_ref().map(|t| self.type_from_annotation(t)).unwrap_or(SemanticType::Unknown)).collect();
        let return_type = Box::new(f.return_type.as_ref().map(|t| self.type_from_annotation(t)).unwrap_or_else(SemanticType::unit));
        FunctionType { parameters, return_type, is_async: f.verb.is_async(), is_generator: f.verb.is_generator(), allocator_parameter: None }
    }

    /// Converts a parsed `TypeAnnotation` into a `SemanticType`, resolving
    /// primitive/collection keyword names and falling back to a `User`
    /// placeholder (or the already-resolved type, if signature resolution
    /// already reached that name) for nominal references.
    fn type_from_annotation(&self, annot: &TypeAnnotation) -> SemanticType {
        if !annot.union_alternatives.is_empty() {
            return SemanticType::Union(annot.union_alternatives.iter().map(|a| self.type_from_annotation(a)).collect());
        }
        if let Some(sig) = &annot.function_signature {
            let parameters = sig.parameters.iter().map(|p| self.type_from_annotation(p)).collect();
            let return_type = Box::new(self.type_from_annotation(&sig.return_type));
            let ty = SemanticType::Function(FunctionType { parameters, return_type, is_async: false, is_generator: false, allocator_parameter: None });
            return self.wrap_nullable(ty, annot.nullable);
        }
        let name_text = self.text(annot.name);
        let base = if let Some(prim) = PrimitiveKind::from_name(name_text) {
            let width = annot.type_parameters.first().and_then(|p| self.text(p.name).parse::<u16>().ok());
            SemanticType::Primitive(prim, width)
        } else if let Some(coll) = CollectionKind::from_name(name_text) {
            SemanticType::Collection(coll, annot.type_parameters.iter().map(|p| self.type_from_annotation(p)).collect())
        } else {
            match self.scopes.lookup(annot.name) {
                Some(entry) if matches!(entry.kind, SymbolKind::Type | SymbolKind::Function) => entry.ty.clone(),
                _ => SemanticType::User(annot.name),
            }
        };
        self.wrap_nullable(base, annot.nullable)
    }

    /// `T?` is sugar for `T | nihil` (spec's `nullable` flag has no
    /// dedicated semantic-type variant; representing it as a two-member
    /// union reuses the existing union-assignability rules unchanged).
    fn wrap_nullable(&self, ty: SemanticType, nullable: bool) -> SemanticType {
        if nullable {
            SemanticType::Union(vec![ty, SemanticType::Primitive(PrimitiveKind::Nihil, None)])
        } else {
            ty
        }
    }

    // -- phase 3: body analysis ------------------------------------------

    fn analyze_statement(&mut self, stmt: &Statement, top_level: bool) {
        match &stmt.kind {
            StatementKind::VariableDeclaration(d) => self.analyze_variable_declaration(d, stmt.span, top_level),
            StatementKind::FunctionDeclaration(f) => self.analyze_function_body(f),
            StatementKind::ClassDeclaration(c) => {
                for m in &c.methods {
                    self.analyze_function_body(m);
                }
                for field in &c.fields {
                    if let Some(default) = &field.default_value {
                        self.infer_expression(default);
                    }
                }
            }
            StatementKind::EnumDeclaration(e) => {
                for member in &e.members {
                    if let Some(value) = &member.value {
                        self.infer_expression(value);
                    }
                }
            }
            // Binding already happened in `predeclare_import` (phase 1);
            // there is nothing further for body analysis to do with an
            // import statement itself.
            StatementKind::InterfaceDeclaration(_)
            | StatementKind::DiscretioDeclaration(_)
            | StatementKind::TypeAliasDeclaration(_)
            | StatementKind::ImportDeclaration(_) => {}
            StatementKind::If(s) => {
                for branch in &s.branches {
                    self.infer_expression(&branch.condition);
                    self.analyze_block(&branch.body);
                }
                if let Some(else_body) = &s.else_body {
                    self.analyze_block(else_body);
                }
                if let Some(catch) = &s.catch {
                    self.analyze_catch(catch);
                }
            }
            StatementKind::While(s) => {
                self.infer_expression(&s.condition);
                self.analyze_block(&s.body);
                if let Some(catch) = &s.catch {
                    self.analyze_catch(catch);
                }
            }
            StatementKind::Iteration(s) => self.analyze_iteration(s),
            StatementKind::Switch(s) => {
                self.infer_expression(&s.discriminant);
                for case in &s.cases {
                    if let Some(test) = &case.test {
                        self.infer_expression(test);
                    }
                    self.analyze_block(&case.body);
                }
            }
            StatementKind::Discerne(s) => self.analyze_discerne(s, stmt.span),
            StatementKind::Guard(s) => {
                self.infer_expression(&s.condition);
                self.analyze_block(&s.otherwise);
            }
            StatementKind::Try(s) => {
                self.analyze_block(&s.body);
                if let Some(catch) = &s.catch {
                    self.analyze_catch(catch);
                }
            }
            StatementKind::Throw(e) | StatementKind::Panic(e) | StatementKind::Assert(e) => {
                self.infer_expression(e);
            }
            StatementKind::Resource(s) => {
                if let Some(resource) = &s.resource {
                    self.infer_expression(resource);
                }
                self.scopes.push_scope();
                if let Some(binding) = &s.binding {
                    self.scopes.bind(
                        binding.name,
                        SymbolEntry { kind: SymbolKind::Variable, ty: SemanticType::Unknown, mutable: false, exported: false, span: binding.span },
                    );
                }
                for inner in &s.body {
                    self.analyze_statement(inner, false);
                }
                self.scopes.pop_scope();
            }
            StatementKind::Dispatch(s) => {
                for arg in &s.arguments {
                    self.infer_expression(arg);
                }
            }
            StatementKind::EntryPoint(s) => self.analyze_block(&s.body),
            StatementKind::TestSuite(s) => {
                for hook in &s.hooks {
                    self.analyze_block(&hook.body);
                }
                for case in &s.cases {
                    self.analyze_block(&case.body);
                }
            }
            StatementKind::Output(s) => {
                for arg in &s.arguments {
                    self.infer_expression(arg);
                }
            }
            StatementKind::Return(Some(e)) => {
                let ty = self.infer_expression(e);
                if let Some(expected) = self.current_function_return.last().cloned() {
                    if !ty.is_assignable_to(&expected) {
                        self.error(stmt.span, "E-TYPE-MISMATCH", "returned value does not match the function's declared return type");
                    }
                }
            }
            StatementKind::Return(None) | StatementKind::Break(_) | StatementKind::Continue(_) => {}
            StatementKind::Block(body) => self.analyze_block(body),
            StatementKind::Expression(e) => {
                self.infer_expression(e);
            }
        }
    }

    fn analyze_variable_declaration(&mut self, d: &VariableDeclaration, span: Span, top_level: bool) {
        let inferred = d.initializer.as_ref().map(|e| self.infer_expression(e));
        if top_level {
            // Already predeclared and signature-resolved; just check the
            // initializer against the declared type, if any.
            if let (Some(annot), Some(init_ty)) = (&d.type_annotation, &inferred) {
                let declared = self.type_from_annotation(annot);
                if !init_ty.is_assignable_to(&declared) {
                    self.error(span, "E-TYPE-MISMATCH", format!("initializer does not match the declared type of `{}`", self.text(d.name.name)));
                }
            }
            return;
        }
        let declared = d.type_annotation.as_ref().map(|t| self.type_from_annotation(t));
        let ty = match (&declared, &inferred) {
            (Some(decl_ty), Some(init_ty)) => {
                if !init_ty.is_assignable_to(decl_ty) {
                    self.error(span, "E-TYPE-MISMATCH", format!("initializer does not match the declared type of `{}`", self.text(d.name.name)));
                }
                decl_ty.clone()
            }
            (Some(decl_ty), None) => decl_ty.clone(),
            (None, Some(init_ty)) => init_ty.clone(),
            (None, None) => SemanticType::Unknown,
        };
        let mutable = matches!(d.mutability, MutabilityKind::Varia | MutabilityKind::Variandum);
        let entry = SymbolEntry { kind: SymbolKind::Variable, ty, mutable, exported: false, span };
        self.declare_checked(d.name.name, entry);
    }

    fn analyze_block(&mut self, body: &[Statement]) {
        self.scopes.push_scope();
        for stmt in body {
            self.analyze_statement(stmt, false);
        }
        self.scopes.pop_scope();
    }

    fn analyze_catch(&mut self, catch: &CatchClause) {
        self.scopes.push_scope();
        if let Some(binding) = &catch.binding {
            self.scopes.bind(
                binding.name,
                SymbolEntry { kind: SymbolKind::Variable, ty: SemanticType::Unknown, mutable: false, exported: false, span: binding.span },
            );
        }
        for inner in &catch.body {
            self.analyze_statement(inner, false);
        }
        self.scopes.pop_scope();
    }

    fn analyze_function_body(&mut self, f: &FunctionDeclaration) {
        let return_ty = f.return_type.as_ref().map(|t| self.type_from_annotation(t)).unwrap_or_else(SemanticType::unit);
        self.scopes.push_scope();
        for param in &f.parameters {
            let ty = param.type_annotation.as_ref().map(|t| self.type_from_annotation(t)).unwrap_or(SemanticType::Unknown);
            self.scopes.bind(param.name.name, SymbolEntry { kind: SymbolKind::Variable, ty, mutable: true, exported: false, span: param.span });
        }
        self.current_function_return.push(return_ty);
        for inner in &f.body {
            self.analyze_statement(inner, false);
        }
        self.current_function_return.pop();
        self.scopes.pop_scope();
    }

    fn analyze_iteration(&mut self, s: &IterationStatement) {
        let iterable_ty = self.infer_expression(&s.iterable);
        self.scopes.push_scope();
        let elem_ty = match &iterable_ty {
            SemanticType::Collection(_, args) => args.first().cloned().unwrap_or(SemanticType::Unknown),
            _ => SemanticType::Unknown,
        };
        self.scopes.bind(s.binding.name, SymbolEntry { kind: SymbolKind::Variable, ty: elem_ty, mutable: false, exported: false, span: s.binding.span });
        for inner in &s.body {
            self.analyze_statement(inner, false);
        }
        self.scopes.pop_scope();
    }

    /// Pattern inference and exhaustiveness (spec §4.3): a single-
    /// discriminant match against a `Discretio` value types each field
    /// binding from the matched variant's record and is reported
    /// exhaustive iff the case set (plus any wildcard) covers every
    /// declared variant. Multi-discriminant matches have no single
    /// declared product type to check exhaustiveness against, so only
    /// their guards/bodies are analyzed.
    fn analyze_discerne(&mut self, s: &DiscerneStatement, span: Span) {
        let discriminant_types: Vec<_> = s.discriminants.iter().map(|d| self.infer_expression(d)).collect();
        let single_discretio = if let [SemanticType::Discretio(d)] = discriminant_types.as_slice() { Some(d.clone()) } else { None };

        if let Some(discretio) = &single_discretio {
            let mut covered = std::collections::BTreeSet::new();
            let mut has_wildcard = false;
            for case in &s.cases {
                if case.pattern.is_wildcard {
                    has_wildcard = true;
                } else {
                    covered.extend(case.pattern.variant_names.iter().copied());
                }
            }
            if !has_wildcard && discretio.variants.keys().any(|v| !covered.contains(v)) {
                self.error(span, "E-NON-EXHAUSTIVE", "discerne does not cover every variant of the matched union");
            }
        }

        for case in &s.cases {
            self.scopes.push_scope();
            if !case.pattern.is_wildcard {
                if let (Some(discretio), [variant_name]) = (&single_discretio, case.pattern.variant_names.as_slice()) {
                    if let Some(fields) = discretio.variants.get(variant_name) {
                        for (binding, (_, field_ty)) in case.pattern.field_bindings.iter().zip(fields) {
                            self.scopes.bind(
                                binding.name,
                                SymbolEntry { kind: SymbolKind::Variable, ty: field_ty.clone(), mutable: false, exported: false, span: binding.span },
                            );
                        }
                    }
                } else {
                    // Wildcard, or a shape without a resolved Discretio to
                    // type fields against: bind bindings as Unknown (spec
                    // §4.3: "wildcard bindings are typed as Unknown").
                    for binding in &case.pattern.field_bindings {
                        self.scopes.bind(
                            binding.name,
                            SymbolEntry { kind: SymbolKind::Variable, ty: SemanticType::Unknown, mutable: false, exported: false, span: binding.span },
                        );
                    }
                }
            }
            if let Some(alias) = &case.pattern.alias {
                let alias_ty = discriminant_types.first().cloned().unwrap_or(SemanticType::Unknown);
                self.scopes.bind(
                    alias.name,
                    SymbolEntry { kind: SymbolKind::Variable, ty: alias_ty, mutable: false, exported: false, span: alias.span },
                );
            }
            if let Some(guard) = &case.pattern.guard {
                self.infer_expression(guard);
            }
            for inner in &case.body {
                self.analyze_statement(inner, false);
            }
            self.scopes.pop_scope();
        }
    }

    // -- expression type inference ----------------------------------------

    fn infer_expression(&mut self, expr: &Expression) -> SemanticType {
        match &expr.kind {
            ExpressionKind::Literal { value, raw } => self.literal_type(value, *raw),
            ExpressionKind::Identifier(id) => match self.scopes.lookup(id.name) {
                Some(entry) => entry.ty.clone(),
                None => {
                    self.error(expr.span, "E-UNDECLARED", format!("`{}` is not declared", self.text(id.name)));
                    SemanticType::Unknown
                }
            },
            ExpressionKind::TemplateLiteral { parts } => {
                for part in parts {
                    if let TemplateElement::Expr(e) = part {
                        self.infer_expression(e);
                    }
                }
                SemanticType::Primitive(PrimitiveKind::Textus, None)
            }
            ExpressionKind::ArrayLiteral { elements } => self.infer_array_literal(elements, expr.span),
            ExpressionKind::ObjectLiteral { elements } => {
                for el in elements {
                    match el {
                        ObjectElement::Property(p) => {
                            self.infer_expression(&p.value);
                        }
                        ObjectElement::Spread(e) => {
                            self.infer_expression(e);
                        }
                    }
                }
                SemanticType::Collection(CollectionKind::Tabula, Vec::new())
            }
            ExpressionKind::Binary { operator, left, right } => self.infer_binary(*operator, left, right, expr.span),
            ExpressionKind::Unary { operand, .. } => self.infer_expression(operand),
            ExpressionKind::Assignment { target, value, .. } => {
                let value_ty = self.infer_expression(value);
                let target_ty = self.infer_expression(target);
                if !value_ty.is_assignable_to(&target_ty) {
                    self.error(expr.span, "E-TYPE-MISMATCH", "assigned value does not match the target's type");
                }
                target_ty
            }
            ExpressionKind::Ternary { test, consequent, alternate } => {
                self.infer_expression(test);
                let c = self.infer_expression(consequent);
                let a = self.infer_expression(alternate);
                SemanticType::common_supertype(&[c, a])
            }
            ExpressionKind::Range { start, end, step, .. } => {
                self.infer_expression(start);
                self.infer_expression(end);
                if let Some(step) = step {
                    self.infer_expression(step);
                }
                SemanticType::Collection(CollectionKind::Cursor, vec![SemanticType::Primitive(PrimitiveKind::Numerus, None)])
            }
            ExpressionKind::Cast { operand, target_type, .. } => {
                self.infer_expression(operand);
                target_type.as_ref().map(|t| self.type_from_annotation(t)).unwrap_or(SemanticType::Unknown)
            }
            ExpressionKind::Call { callee, arguments } => self.infer_call(callee, arguments, expr.span),
            ExpressionKind::Member { object, key, .. } => self.infer_member(object, key, expr.span),
            ExpressionKind::Cede { operand } => self.infer_expression(operand),
            ExpressionKind::FunctionExpression { parameters, return_type, verb, body } => {
                self.scopes.push_scope();
                let params: Vec<_> = parameters
                    .iter()
                    .map(|p| {
                        let ty = p.type_annotation.as_ref().map(|t| self.type_from_annotation(t)).unwrap_or(SemanticType::Unknown);
                        self.scopes.bind(p.name.name, SymbolEntry { kind: SymbolKind::Variable, ty: ty.clone(), mutable: true, exported: false, span: p.span });
                        ty
                    })
                    .collect();
                let ret = return_type.as_ref().map(|t| self.type_from_annotation(t)).unwrap_or_else(SemanticType::unit);
                self.current_function_return.push(ret.clone());
                for inner in body {
                    self.analyze_statement(inner, false);
                }
                self.current_function_return.pop();
                self.scopes.pop_scope();
                SemanticType::Function(FunctionType {
                    parameters: params,
                    return_type: Box::new(ret),
                    is_async: verb.map(|v| v.is_async()).unwrap_or(false),
                    is_generator: verb.map(|v| v.is_generator()).unwrap_or(false),
                    allocator_parameter: None,
                })
            }
            ExpressionKind::Unknown => SemanticType::Unknown,
        }
    }

    fn literal_type(&self, value: &LiteralKind, raw: Symbol) -> SemanticType {
        match value {
            LiteralKind::Bool(_) => SemanticType::Primitive(PrimitiveKind::Bivalens, None),
            // `nihil` and `vacuum` share this variant; the source spelling
            // (preserved on `raw`) is the only thing that tells them apart.
            LiteralKind::Nil => {
                if self.text(raw) == "vacuum" {
                    SemanticType::unit()
                } else {
                    SemanticType::Primitive(PrimitiveKind::Nihil, None)
                }
            }
            LiteralKind::Integer(_) => SemanticType::Primitive(PrimitiveKind::Numerus, None),
            LiteralKind::Float(_) => SemanticType::Primitive(PrimitiveKind::Fractus, None),
            LiteralKind::BigInteger(_) => SemanticType::Primitive(PrimitiveKind::Magnus, None),
            LiteralKind::Str(_) | LiteralKind::TemplateStr(_) => SemanticType::Primitive(PrimitiveKind::Textus, None),
            // No dedicated regex member exists in the closed type sum (spec
            // §3.3); flag/pattern validation is deferred to the target's
            // regex engine per spec §9's open question, so the front end
            // never needs a concrete type for it here.
            LiteralKind::Regex { .. } => SemanticType::Unknown,
        }
    }

    fn infer_array_literal(&mut self, elements: &[ArrayElement], span: Span) -> SemanticType {
        let element_types: Vec<_> = elements.iter().map(|e| self.infer_expression(&e.value)).collect();
        if let Some((first, rest)) = element_types.split_first() {
            for t in rest {
                if !t.is_assignable_to(first) && !first.is_assignable_to(t) {
                    self.error(span, "E-TYPE-MISMATCH", "array elements are not mutually assignable");
                    break;
                }
            }
        }
        SemanticType::Collection(CollectionKind::Lista, vec![SemanticType::common_supertype(&element_types)])
    }

    fn infer_binary(&mut self, operator: BinaryOperator, left: &Expression, right: &Expression, span: Span) -> SemanticType {
        let lt = self.infer_expression(left);
        let rt = self.infer_expression(right);
        use BinaryOperator::*;
        match operator {
            Add | Subtract | Multiply | Divide | Modulo | BitOr | BitXor | BitAnd | ShiftLeft | ShiftRight => {
                if !lt.is_assignable_to(&rt) && !rt.is_assignable_to(&lt) {
                    self.error(span, "E-TYPE-MISMATCH", "operands of arithmetic/bitwise operator do not share a type");
                }
                lt
            }
            Equal | StrictEqual | NotEqual | StrictNotEqual | Less | LessEqual | Greater | GreaterEqual | Within | Between | Is | IsNot => {
                SemanticType::Primitive(PrimitiveKind::Bivalens, None)
            }
            LogicalAnd | LogicalOr => SemanticType::common_supertype(&[lt, rt]),
            NullishCoalesce => rt,
        }
    }

    fn infer_call(&mut self, callee: &Expression, arguments: &[Argument], span: Span) -> SemanticType {
        let callee_ty = self.infer_expression(callee);
        let arg_types: Vec<_> = arguments.iter().map(|a| self.infer_expression(&a.value)).collect();
        match &callee_ty {
            SemanticType::Function(f) => {
                let has_spread = arguments.iter().any(|a| a.is_spread);
                if !has_spread && arguments.len() != f.parameters.len() {
                    self.error(span, "E-ARITY", format!("expected {} argument(s), found {}", f.parameters.len(), arguments.len()));
                }
                for (arg_ty, expected) in arg_types.iter().zip(&f.parameters) {
                    if !arg_ty.is_assignable_to(expected) {
                        self.error(span, "E-TYPE-MISMATCH", "argument does not match the parameter's declared type");
                    }
                }
                (*f.return_type).clone()
            }
            SemanticType::Unknown => SemanticType::Unknown,
            _ => {
                self.error(span, "E-NOT-CALLABLE", "callee is not callable");
                SemanticType::Unknown
            }
        }
    }

    fn infer_member(&mut self, object: &Expression, key: &MemberKey, span: Span) -> SemanticType {
        let object_ty = self.infer_expression(object);
        if let MemberKey::Computed(inner) = key {
            self.infer_expression(inner);
        }
        match (&object_ty, key) {
            (SemanticType::Genus(g), MemberKey::Name(name)) => {
                if let Some((_, ty)) = g.fields.iter().find(|(n, _)| *n == name.name) {
                    return ty.clone();
                }
                if let Some((_, f)) = g.methods.iter().find(|(n, _)| *n == name.name) {
                    return SemanticType::Function(f.clone());
                }
                self.error(span, "E-MISSING-FIELD", format!("`{}` has no field or method `{}`", self.text(g.name), self.text(name.name)));
                SemanticType::Unknown
            }
            (SemanticType::Pactum(p), MemberKey::Name(name)) => {
                p.methods.iter().find(|(n, _)| *n == name.name).map(|(_, f)| SemanticType::Function(f.clone())).unwrap_or(SemanticType::Unknown)
            }
            (SemanticType::Collection(kind, args), MemberKey::Computed(_))
                if matches!(kind, CollectionKind::Lista | CollectionKind::Tabula | CollectionKind::Copia) =>
            {
                args.first().cloned().unwrap_or(SemanticType::Unknown)
            }
            (SemanticType::Unknown, _) => SemanticType::Unknown,
            // Namespace member accesses (stdlib module methods) resolve
            // against the registry at codegen time, not here (spec §4.4).
            (SemanticType::Namespace(_), MemberKey::Name(_)) => SemanticType::Unknown,
            (_, MemberKey::Computed(_)) => {
                self.error(span, "E-NOT-INDEXABLE", "value is not indexable");
                SemanticType::Unknown
            }
            _ => SemanticType::Unknown,
        }
    }
}

/// Analyzes one module's statements in isolation (no cross-module import
/// resolution — see [`super::resolve_module_graph`] for that).
pub fn analyze(interner: &Interner, statements: &[Statement]) -> (Scope, Vec<Diagnostic>) {
    Analyzer::new(interner).analyze_module(statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser;

    fn analyze_source(source: &str) -> Vec<Diagnostic> {
        let mut interner = Interner::new();
        let (tokens, lex_errors) = Lexer::new(source, &mut interner).tokenize();
        assert!(lex_errors.is_empty(), "{lex_errors:?}");
        let (module, parse_errors) = parser::parse(tokens, &mut interner);
        assert!(parse_errors.is_empty(), "{parse_errors:?}");
        let (_, diagnostics) = analyze(&interner, &module.statements);
        diagnostics
    }

    #[test]
    fn undeclared_identifier_is_reported() {
        let diags = analyze_source("munus f() fit { scribe \"hi\", x }");
        assert!(diags.iter().any(|d| d.code == "E-UNDECLARED"));
    }

    #[test]
    fn declared_variable_resolves_without_error() {
        let diags = analyze_source("munus f() fit { varia x = 1 scribe \"v\", x }");
        assert!(diags.is_empty(), "{diags:?}");
    }

    #[test]
    fn duplicate_top_level_declaration_is_reported() {
        let diags = analyze_source("munus f() fit { } munus f() fit { }");
        assert!(diags.iter().any(|d| d.code == "E-DUPLICATE"));
    }

    #[test]
    fn calling_a_non_function_is_reported() {
        let diags = analyze_source("munus f() fit { varia x = 1 x() }");
        assert!(diags.iter().any(|d| d.code == "E-NOT-CALLABLE"));
    }

    #[test]
    fn wrong_arity_is_reported() {
        let diags = analyze_source("munus f(a: numerus) fit { } munus g() fit { f() }");
        assert!(diags.iter().any(|d| d.code == "E-ARITY"));
    }

    #[test]
    fn calling_an_imported_symbol_does_not_raise_undeclared() {
        let diags = analyze_source(r#"importa { adde } ex "./lib" munus entry() fit numerus { redde adde(1, 2) }"#);
        assert!(!diags.iter().any(|d| d.code == "E-UNDECLARED"), "{diags:?}");
    }

    #[test]
    fn aliased_import_binds_under_its_alias_not_its_original_name() {
        let diags = analyze_source(r#"importa { adde ut plus } ex "./lib" munus entry() fit numerus { redde plus(1, 2) }"#);
        assert!(!diags.iter().any(|d| d.code == "E-UNDECLARED"), "{diags:?}");
    }

    #[test]
    fn wildcard_import_binds_its_alias_as_a_namespace() {
        let diags = analyze_source(r#"importa * ut lib ex "./lib" munus entry() fit { scribe "", lib }"#);
        assert!(!diags.iter().any(|d| d.code == "E-UNDECLARED"), "{diags:?}");
    }

    #[test]
    fn exhaustive_discerne_over_discretio_has_no_exhaustiveness_diagnostic() {
        let source = r#"
            discretio Resultatum {
                Recte { numerus valor }
                Erratum { textus error }
            }
            munus f(r: Resultatum) fit {
                discerne r {
                    casu Recte pro v { scribe "ok" }
                    casu Erratum pro e { scribe "err" }
                }
            }
        "#;
        let diags = analyze_source(source);
        assert!(!diags.iter().any(|d| d.code == "E-NON-EXHAUSTIVE"), "{diags:?}");
    }

    #[test]
    fn non_exhaustive_discerne_is_reported() {
        let source = r#"
            discretio Resultatum {
                Recte { numerus valor }
                Erratum { textus error }
            }
            munus f(r: Resultatum) fit {
                discerne r {
                    casu Recte pro v { scribe "ok" }
                }
            }
        "#;
        let diags = analyze_source(source);
        assert!(diags.iter().any(|d| d.code == "E-NON-EXHAUSTIVE"));
    }

    #[test]
    fn wildcard_case_suppresses_exhaustiveness_diagnostic() {
        let source = r#"
            discretio Resultatum {
                Recte { numerus valor }
                Erratum { textus error }
            }
            munus f(r: Resultatum) fit {
                discerne r {
                    casu Recte pro v { scribe "ok" }
                    casu _ { scribe "other" }
                }
            }
        "#;
        let diags = analyze_source(source);
        assert!(!diags.iter().any(|d| d.code == "E-NON-EXHAUSTIVE"), "{diags:?}");
    }
}
