//! Statement dispatch (spec §4.2): selects on the leading keyword, with
//! limited lookahead in the handful of places the grammar needs it.

use sermo_base::Span;
use sermo_lexicon::KeywordTag;

use super::{ParseResult, Parser};
use crate::ast::*;
use crate::token::TokenKind;

impl<'a> Parser<'a> {
    pub(crate) fn parse_top_level_statement(&mut self) -> ParseResult<Statement> {
        self.parse_statement_at(true)
    }

    pub(crate) fn parse_statement(&mut self) -> ParseResult<Statement> {
        self.parse_statement_at(false)
    }

    /// Sermo has no `exporta`/visibility keyword, so a declaration's exported
    /// status is purely positional: a declaration written directly at module
    /// scope is part of the module's importable surface, one nested inside a
    /// function or block body is not. `top_level` threads that position down
    /// to the declaration-kind arms below.
    fn parse_statement_at(&mut self, top_level: bool) -> ParseResult<Statement> {
        let start = self.current_span();
        if self.check(&TokenKind::LBrace) {
            self.advance();
            let body = self.parse_block_body()?;
            let span = start.merge(self.previous().span);
            return Ok(Statement::new(StatementKind::Block(body), span));
        }
        let TokenKind::Keyword(tag) = self.peek().kind else {
            return self.parse_expression_statement(start);
        };
        match tag {
            KeywordTag::Varia | KeywordTag::Fixum | KeywordTag::Figendum | KeywordTag::Variandum => {
                self.parse_variable_declaration(start)
            }
            KeywordTag::Munus => self.parse_function_declaration(start, top_level),
            KeywordTag::Genus => self.parse_class_declaration(start, top_level),
            KeywordTag::Pactum => self.parse_interface_declaration(start, top_level),
            KeywordTag::Ordo => self.parse_enum_declaration(start, top_level),
            KeywordTag::Discretio => self.parse_discretio_declaration(start, top_level),
            KeywordTag::Nomen => self.parse_type_alias_declaration(start, top_level),
            KeywordTag::Importa => self.parse_import_declaration(start),
            KeywordTag::Si => self.parse_if_statement(start),
            KeywordTag::Dum => self.parse_while_statement(start),
            KeywordTag::Ex | KeywordTag::De => self.parse_iteration_statement(start),
            KeywordTag::Elige => self.parse_switch_statement(start),
            KeywordTag::Discerne => self.parse_discerne_statement(start),
            KeywordTag::Custodi => self.parse_guard_statement(start),
            KeywordTag::Tempta => self.parse_try_statement(start),
            KeywordTag::Iace => {
                self.advance();
                let expr = self.parse_expression()?;
                self.match_kind(&TokenKind::Semicolon);
                let span = start.merge(self.previous().span);
                Ok(Statement::new(StatementKind::Throw(expr), span))
            }
            KeywordTag::Mori => {
                self.advance();
                let expr = self.parse_expression()?;
                self.match_kind(&TokenKind::Semicolon);
                let span = start.merge(self.previous().span);
                Ok(Statement::new(StatementKind::Panic(expr), span))
            }
            KeywordTag::Adfirma => {
                self.advance();
                let expr = self.parse_expression()?;
                self.match_kind(&TokenKind::Semicolon);
                let span = start.merge(self.previous().span);
                Ok(Statement::new(StatementKind::Assert(expr), span))
            }
            KeywordTag::Redde => {
                self.advance();
                let expr = if self.check(&TokenKind::RBrace) { None } else { Some(self.parse_expression()?) };
                self.match_kind(&TokenKind::Semicolon);
                let span = start.merge(self.previous().span);
                Ok(Statement::new(StatementKind::Return(expr), span))
            }
            // No loop-labeling syntax exists in the grammar, so `rumpe`/
            // `perge` never carry a label: the `Option<Symbol>` the AST
            // reserves for one is always `None` today.
            KeywordTag::Rumpe => {
                self.advance();
                self.match_kind(&TokenKind::Semicolon);
                let span = start.merge(self.previous().span);
                Ok(Statement::new(StatementKind::Break(None), span))
            }
            KeywordTag::Perge => {
                self.advance();
                self.match_kind(&TokenKind::Semicolon);
                let span = start.merge(self.previous().span);
                Ok(Statement::new(StatementKind::Continue(None), span))
            }
            KeywordTag::Cura => self.parse_resource_statement(start),
            KeywordTag::Ad => self.parse_dispatch_statement(start),
            KeywordTag::Incipit => self.parse_entry_point(start, false),
            KeywordTag::Incipiet => self.parse_entry_point(start, true),
            KeywordTag::Probandum => self.parse_test_suite(start),
            KeywordTag::Scribe => self.parse_output_statement(start, OutputLevel::Info),
            KeywordTag::Vide => self.parse_output_statement(start, OutputLevel::Debug),
            KeywordTag::Mone => self.parse_output_statement(start, OutputLevel::Warn),
            _ => self.parse_expression_statement(start),
        }
    }

    /// Parses the statements inside an already-opened `{`, consuming the
    /// closing `}`. Recovers past a failing statement so one malformed
    /// statement doesn't blank out the rest of the block.
    pub(crate) fn parse_block_body(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(()) => self.synchronize_statement(),
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close block")?;
        Ok(statements)
    }

    fn parse_expression_statement(&mut self, start: Span) -> ParseResult<Statement> {
        let expr = self.parse_expression()?;
        self.match_kind(&TokenKind::Semicolon);
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::Expression(expr), span))
    }

    fn parse_variable_declaration(&mut self, start: Span) -> ParseResult<Statement> {
        let mutability = match self.advance().kind {
            TokenKind::Keyword(KeywordTag::Varia) => MutabilityKind::Varia,
            TokenKind::Keyword(KeywordTag::Fixum) => MutabilityKind::Fixum,
            TokenKind::Keyword(KeywordTag::Figendum) => MutabilityKind::Figendum,
            TokenKind::Keyword(KeywordTag::Variandum) => MutabilityKind::Variandum,
            _ => unreachable!("dispatched only on mutability keywords"),
        };
        let name = self.expect_identifier("variable name")?;
        let type_annotation = if self.match_kind(&TokenKind::Colon) { Some(self.parse_type_annotation()?) } else { None };
        let initializer = if self.match_kind(&TokenKind::Assign) { Some(self.parse_expression()?) } else { None };
        self.match_kind(&TokenKind::Semicolon);
        let span = start.merge(self.previous().span);
        Ok(Statement::new(
            StatementKind::VariableDeclaration(VariableDeclaration { mutability, name, type_annotation, initializer }),
            span,
        ))
    }

    /// Parses `fit`/`fiet`/`fiunt`/`fient`, returning `None` when the next
    /// token isn't one of them (functions may omit the verb when the return
    /// type is inferred as `vacuum`).
    pub(crate) fn parse_return_verb(&mut self) -> ParseResult<Option<(ReturnVerb, Span)>> {
        let span = self.current_span();
        let verb = if self.match_keyword(KeywordTag::Fit) {
            ReturnVerb::Fit
        } else if self.match_keyword(KeywordTag::Fiet) {
            ReturnVerb::Fiet
        } else if self.match_keyword(KeywordTag::Fiunt) {
            ReturnVerb::Fiunt
        } else if self.match_keyword(KeywordTag::Fient) {
            ReturnVerb::Fient
        } else {
            return Ok(None);
        };
        Ok(Some((verb, span)))
    }

    pub(crate) fn parse_parameters(&mut self) -> ParseResult<Vec<Parameter>> {
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let start = self.current_span();
                let is_rest = self.match_kind(&TokenKind::DotDotDot);
                let name = self.expect_identifier("parameter name")?;
                let is_optional = self.match_kind(&TokenKind::Question);
                let type_annotation = if self.match_kind(&TokenKind::Colon) { Some(self.parse_type_annotation()?) } else { None };
                let default_value =
                    if self.match_kind(&TokenKind::Assign) { Some(Box::new(self.parse_assignment_for_default()?)) } else { None };
                let span = start.merge(self.previous().span);
                params.push(Parameter { name, type_annotation, default_value, is_rest, is_optional, span });
                if !self.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "`)` to close parameter list")?;
        Ok(params)
    }

    fn parse_assignment_for_default(&mut self) -> ParseResult<Expression> {
        self.parse_expression()
    }

    fn parse_function_declaration(&mut self, start: Span, is_exported: bool) -> ParseResult<Statement> {
        self.advance();
        let name = self.expect_identifier("function name")?;
        self.expect(TokenKind::LParen, "`(` to start parameter list")?;
        let parameters = self.parse_parameters()?;
        let verb = self.parse_return_verb()?.map(|(v, _)| v).unwrap_or(ReturnVerb::Fit);
        let return_type = if !self.check(&TokenKind::LBrace) { Some(self.parse_type_annotation()?) } else { None };
        self.expect(TokenKind::LBrace, "`{` to start function body")?;
        let body = self.parse_block_body()?;
        let span = start.merge(self.previous().span);
        Ok(Statement::new(
            StatementKind::FunctionDeclaration(FunctionDeclaration { name, parameters, return_type, verb, body, is_exported }),
            span,
        ))
    }

    fn parse_class_declaration(&mut self, start: Span, is_exported: bool) -> ParseResult<Statement> {
        self.advance();
        let name = self.expect_identifier("class name")?;
        let superclass = if self.match_keyword(KeywordTag::Sub) { Some(self.expect_identifier("superclass name")?) } else { None };
        let mut implements = Vec::new();
        if self.match_keyword(KeywordTag::Implet) {
            loop {
                implements.push(self.expect_identifier("implemented interface name")?);
                if !self.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::LBrace, "`{` to start class body")?;
        let mut fields = Vec::new();
        let mut methods = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            match self.parse_class_member() {
                Ok(ClassMember::Field(f)) => fields.push(f),
                Ok(ClassMember::Method(m)) => methods.push(m),
                Err(()) => self.synchronize_class_member(),
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close class body")?;
        let span = start.merge(self.previous().span);
        Ok(Statement::new(
            StatementKind::ClassDeclaration(ClassDeclaration { name, superclass, implements, fields, methods, is_exported }),
            span,
        ))
    }

    fn parse_class_member(&mut self) -> ParseResult<ClassMember> {
        if self.check_keyword(KeywordTag::Munus) {
            self.advance();
            let name = self.expect_identifier("method name")?;
            self.expect(TokenKind::LParen, "`(` to start parameter list")?;
            let parameters = self.parse_parameters()?;
            let verb = self.parse_return_verb()?.map(|(v, _)| v).unwrap_or(ReturnVerb::Fit);
            let return_type = if !self.check(&TokenKind::LBrace) { Some(self.parse_type_annotation()?) } else { None };
            self.expect(TokenKind::LBrace, "`{` to start method body")?;
            let body = self.parse_block_body()?;
            return Ok(ClassMember::Method(FunctionDeclaration { name, parameters, return_type, verb, body, is_exported: false }));
        }
        // Field: mutability keyword, name, type, optional default.
        self.advance();
        let name = self.expect_identifier("field name")?;
        self.expect(TokenKind::Colon, "`:` before field type")?;
        let type_annotation = self.parse_type_annotation()?;
        let default_value = if self.match_kind(&TokenKind::Assign) { Some(self.parse_expression()?) } else { None };
        self.match_kind(&TokenKind::Semicolon);
        Ok(ClassMember::Field(FieldDeclaration { name, type_annotation, default_value }))
    }

    fn parse_interface_declaration(&mut self, start: Span, is_exported: bool) -> ParseResult<Statement> {
        self.advance();
        let name = self.expect_identifier("interface name")?;
        self.expect(TokenKind::LBrace, "`{` to start interface body")?;
        let mut methods = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            self.expect_keyword(KeywordTag::Munus, "method signature")?;
            let name = self.expect_identifier("method name")?;
            self.expect(TokenKind::LParen, "`(` to start parameter list")?;
            let parameters = self.parse_parameters()?;
            self.parse_return_verb()?;
            let return_type = if !self.check(&TokenKind::RBrace) && !self.check_keyword(KeywordTag::Munus) {
                Some(self.parse_type_annotation()?)
            } else {
                None
            };
            self.match_kind(&TokenKind::Semicolon);
            methods.push(InterfaceMethodSignature { name, parameters, return_type });
        }
        self.expect(TokenKind::RBrace, "`}` to close interface body")?;
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::InterfaceDeclaration(InterfaceDeclaration { name, methods, is_exported }), span))
    }

    fn parse_enum_declaration(&mut self, start: Span, is_exported: bool) -> ParseResult<Statement> {
        self.advance();
        let name = self.expect_identifier("enum name")?;
        self.expect(TokenKind::LBrace, "`{` to start enum body")?;
        let mut members = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let member_name = self.expect_identifier("enum member name")?;
            let value = if self.match_kind(&TokenKind::Assign) { Some(self.parse_expression()?) } else { None };
            members.push(EnumMember { name: member_name, value });
            if !self.match_kind(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close enum body")?;
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::EnumDeclaration(EnumDeclaration { name, members, is_exported }), span))
    }

    fn parse_discretio_declaration(&mut self, start: Span, is_exported: bool) -> ParseResult<Statement> {
        self.advance();
        let name = self.expect_identifier("discretio name")?;
        self.expect(TokenKind::LBrace, "`{` to start discretio body")?;
        let mut variants = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let variant_start = self.current_span();
            let variant_name = self.expect_identifier("variant name")?;
            let mut fields = Vec::new();
            if self.match_kind(&TokenKind::LBrace) {
                while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
                    let field_type = self.parse_type_annotation()?;
                    let field_name = self.expect_identifier("variant field name")?;
                    fields.push((field_name, field_type));
                    if !self.match_kind(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RBrace, "`}` to close variant fields")?;
            }
            let span = variant_start.merge(self.previous().span);
            variants.push(VariantCase { name: variant_name, fields, span });
            if !self.match_kind(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close discretio body")?;
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::DiscretioDeclaration(DiscretioDeclaration { name, variants, is_exported }), span))
    }

    fn parse_type_alias_declaration(&mut self, start: Span, is_exported: bool) -> ParseResult<Statement> {
        self.advance();
        let name = self.expect_identifier("type alias name")?;
        self.expect(TokenKind::Assign, "`=` in type alias")?;
        let target = self.parse_type_annotation()?;
        self.match_kind(&TokenKind::Semicolon);
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::TypeAliasDeclaration(TypeAliasDeclaration { name, target, is_exported }), span))
    }

    fn parse_import_declaration(&mut self, start: Span) -> ParseResult<Statement> {
        self.advance();
        let mut specifiers = Vec::new();
        if self.match_kind(&TokenKind::Star) {
            let alias = if self.match_keyword(KeywordTag::Ut) { Some(self.expect_identifier("import alias")?) } else { None };
            let span = start.merge(self.previous().span);
            specifiers.push(ImportSpecifier { imported: sermo_base::Symbol::EMPTY, alias, is_wildcard: true, span });
        } else {
            self.expect(TokenKind::LBrace, "`{` to start import list")?;
            while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
                let spec_start = self.current_span();
                let name = self.expect_identifier("imported name")?;
                let alias = if self.match_keyword(KeywordTag::Ut) { Some(self.expect_identifier("import alias")?) } else { None };
                let span = spec_start.merge(self.previous().span);
                specifiers.push(ImportSpecifier { imported: name.name, alias, is_wildcard: false, span });
                if !self.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::RBrace, "`}` to close import list")?;
        }
        self.expect_keyword(KeywordTag::Ex, "`ex` before import source")?;
        let source = match &self.peek().kind {
            TokenKind::Literal(crate::token::LiteralKind::Str(s)) => {
                let s = s.clone();
                self.advance();
                s
            }
            _ => {
                self.error_here("P004", "expected a string module specifier after `ex`");
                String::new()
            }
        };
        self.match_kind(&TokenKind::Semicolon);
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::ImportDeclaration(ImportDeclaration { source, specifiers }), span))
    }

    fn parse_if_statement(&mut self, start: Span) -> ParseResult<Statement> {
        let mut branches = Vec::new();
        self.advance();
        let condition = self.parse_expression()?;
        self.expect(TokenKind::LBrace, "`{` to start `si` body")?;
        let body = self.parse_block_body()?;
        branches.push(IfBranch { condition, body });
        let mut else_body = None;
        while self.match_keyword(KeywordTag::Aliter) {
            if self.match_keyword(KeywordTag::Si) {
                let condition = self.parse_expression()?;
                self.expect(TokenKind::LBrace, "`{` to start `aliter si` body")?;
                let body = self.parse_block_body()?;
                branches.push(IfBranch { condition, body });
            } else {
                self.expect(TokenKind::LBrace, "`{` to start `aliter` body")?;
                else_body = Some(self.parse_block_body()?);
                break;
            }
        }
        let catch = self.parse_optional_catch()?;
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::If(IfStatement { branches, else_body, catch }), span))
    }

    fn parse_optional_catch(&mut self) -> ParseResult<Option<CatchClause>> {
        if !self.match_keyword(KeywordTag::Tempta) {
            return Ok(None);
        }
        let catch_start = self.current_span();
        let binding = if self.match_kind(&TokenKind::LParen) {
            let b = self.expect_identifier("catch binding name")?;
            self.expect(TokenKind::RParen, "`)` after catch binding")?;
            Some(b)
        } else {
            None
        };
        self.expect(TokenKind::LBrace, "`{` to start catch body")?;
        let body = self.parse_block_body()?;
        let span = catch_start.merge(self.previous().span);
        Ok(Some(CatchClause { binding, body, span }))
    }

    fn parse_while_statement(&mut self, start: Span) -> ParseResult<Statement> {
        self.advance();
        let condition = self.parse_expression()?;
        self.expect(TokenKind::LBrace, "`{` to start `dum` body")?;
        let body = self.parse_block_body()?;
        let catch = self.parse_optional_catch()?;
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::While(WhileStatement { condition, body, catch }), span))
    }

    fn parse_iteration_statement(&mut self, start: Span) -> ParseResult<Statement> {
        let kind = if self.match_keyword(KeywordTag::Ex) {
            IterationKind::ExPro
        } else {
            self.expect_keyword(KeywordTag::De, "`de`")?;
            IterationKind::DePro
        };
        // Optional async-iteration verb (spec §4.2): the same `cede`
        // keyword that marks an await expression, placed right after
        // `ex`/`de`, mirroring a for-await-of loop.
        let is_async = self.match_keyword(KeywordTag::Cede);
        let iterable = self.parse_expression()?;
        self.expect_keyword(KeywordTag::Pro, "`pro` before loop binding")?;
        let binding = self.expect_identifier("loop binding name")?;
        self.expect(TokenKind::LBrace, "`{` to start loop body")?;
        let body = self.parse_block_body()?;
        let span = start.merge(self.previous().span);
        Ok(Statement::new(
            StatementKind::Iteration(IterationStatement { kind, iterable, binding, is_async, body }),
            span,
        ))
    }

    fn parse_switch_statement(&mut self, start: Span) -> ParseResult<Statement> {
        self.advance();
        let discriminant = self.parse_expression()?;
        self.expect(TokenKind::LBrace, "`{` to start `elige` body")?;
        let mut cases = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            let case_start = self.current_span();
            let test = if self.match_keyword(KeywordTag::Casu) { Some(self.parse_expression()?) } else { None };
            self.expect(TokenKind::Colon, "`:` after switch case")?;
            let mut body = Vec::new();
            while !self.check_keyword(KeywordTag::Casu) && !self.check(&TokenKind::RBrace) && !self.is_at_end() {
                body.push(self.parse_statement()?);
            }
            let span = case_start.merge(self.previous().span);
            cases.push(SwitchCase { test, body, span });
        }
        self.expect(TokenKind::RBrace, "`}` to close `elige` body")?;
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::Switch(SwitchStatement { discriminant, cases }), span))
    }

    fn parse_discerne_statement(&mut self, start: Span) -> ParseResult<Statement> {
        self.advance();
        let mut discriminants = vec![self.parse_expression()?];
        while self.match_kind(&TokenKind::Comma) {
            discriminants.push(self.parse_expression()?);
        }
        self.expect(TokenKind::LBrace, "`{` to start `discerne` body")?;
        let mut cases = Vec::new();
        while self.check_keyword(KeywordTag::Casu) && !self.is_at_end() {
            cases.push(self.parse_discerne_case()?);
        }
        self.expect(TokenKind::RBrace, "`}` to close `discerne` body")?;
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::Discerne(DiscerneStatement { discriminants, cases }), span))
    }

    fn parse_discerne_case(&mut self) -> ParseResult<DiscerneCase> {
        let case_start = self.current_span();
        self.advance(); // `casu`
        let mut variant_names = Vec::new();
        let is_wildcard = self.check_wildcard_identifier();
        if is_wildcard {
            self.advance();
        } else {
            loop {
                if self.check(&TokenKind::Identifier) {
                    variant_names.push(self.advance().lexeme);
                }
                if !self.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let alias = if self.match_keyword(KeywordTag::Ut) { Some(self.expect_identifier("case alias")?) } else { None };
        let mut field_bindings = Vec::new();
        if self.match_keyword(KeywordTag::Pro) {
            loop {
                field_bindings.push(self.expect_identifier("field binding name")?);
                if !self.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }
        let guard = if self.match_keyword(KeywordTag::Custodi) { Some(Box::new(self.parse_expression()?)) } else { None };
        self.expect(TokenKind::LBrace, "`{` to start case body")?;
        let body = self.parse_block_body()?;
        let span = case_start.merge(self.previous().span);
        let pattern = Pattern { variant_names, alias, field_bindings, is_wildcard, guard, span };
        Ok(DiscerneCase { pattern, body })
    }

    fn parse_guard_statement(&mut self, start: Span) -> ParseResult<Statement> {
        self.advance();
        let condition = self.parse_expression()?;
        self.expect_keyword(KeywordTag::Aliter, "`aliter` after guard condition")?;
        let otherwise = if self.match_kind(&TokenKind::LBrace) {
            self.parse_block_body()?
        } else {
            vec![self.parse_statement()?]
        };
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::Guard(GuardStatement { condition, otherwise }), span))
    }

    fn parse_try_statement(&mut self, start: Span) -> ParseResult<Statement> {
        self.advance();
        self.expect(TokenKind::LBrace, "`{` to start `tempta` body")?;
        let body = self.parse_block_body()?;
        let catch = self.parse_optional_catch()?;
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::Try(TryStatement { body, catch }), span))
    }

    fn parse_resource_statement(&mut self, start: Span) -> ParseResult<Statement> {
        self.advance();
        let (kind, resource) = if self.match_keyword(KeywordTag::Arena) {
            (ResourceKind::Arena, None)
        } else if self.match_keyword(KeywordTag::Pagina) {
            (ResourceKind::Pagina, None)
        } else {
            (ResourceKind::Expression, Some(self.parse_expression()?))
        };
        let binding = if self.match_keyword(KeywordTag::Ut) { Some(self.expect_identifier("resource binding name")?) } else { None };
        self.expect(TokenKind::LBrace, "`{` to start `cura` body")?;
        let body = self.parse_block_body()?;
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::Resource(ResourceStatement { kind, resource, binding, body }), span))
    }

    fn parse_dispatch_statement(&mut self, start: Span) -> ParseResult<Statement> {
        self.advance();
        let endpoint = self.expect_identifier("dispatch endpoint name")?;
        let mut arguments = Vec::new();
        if self.match_kind(&TokenKind::LParen) {
            if !self.check(&TokenKind::RParen) {
                loop {
                    arguments.push(self.parse_expression()?);
                    if !self.match_kind(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen, "`)` to close dispatch arguments")?;
        }
        self.match_kind(&TokenKind::Semicolon);
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::Dispatch(DispatchStatement { endpoint, arguments }), span))
    }

    fn parse_entry_point(&mut self, start: Span, is_async: bool) -> ParseResult<Statement> {
        self.advance();
        self.expect(TokenKind::LBrace, "`{` to start entry point body")?;
        let body = self.parse_block_body()?;
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::EntryPoint(EntryPointDeclaration { is_async, body }), span))
    }

    fn parse_test_suite(&mut self, start: Span) -> ParseResult<Statement> {
        self.advance();
        let name = self.expect_string_literal("suite name")?;
        self.expect(TokenKind::LBrace, "`{` to start `probandum` body")?;
        let mut hooks = Vec::new();
        let mut cases = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if self.check_keyword(KeywordTag::Praepara) || self.check_keyword(KeywordTag::Postpara) {
                hooks.push(self.parse_praepara_block()?);
            } else if self.check_keyword(KeywordTag::Proba) {
                cases.push(self.parse_test_case()?);
            } else {
                self.error_here("P005", "expected `proba`, `praepara`, or `postpara` in test suite body");
                return Err(());
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close `probandum` body")?;
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::TestSuite(TestSuite { name, hooks, cases }), span))
    }

    fn parse_praepara_block(&mut self) -> ParseResult<PraeparaBlock> {
        let start = self.current_span();
        let is_teardown = self.check_keyword(KeywordTag::Postpara);
        self.advance();
        // Per-suite hooks take no case binding; both flavors share body shape.
        let is_suite_scoped = !self.check(&TokenKind::LBrace);
        if is_suite_scoped {
            // e.g. `praepara semel { ... }` (once-per-suite) vs default
            // per-case `praepara { ... }`; the modifier identifier itself
            // isn't semantically load-bearing beyond this flag.
            self.advance();
        }
        self.expect(TokenKind::LBrace, "`{` to start hook body")?;
        let body = self.parse_block_body()?;
        let span = start.merge(self.previous().span);
        Ok(PraeparaBlock { is_teardown, is_suite_scoped, body, span })
    }

    fn parse_test_case(&mut self) -> ParseResult<TestCase> {
        self.advance();
        let name = self.expect_string_literal("case name")?;
        let modifiers = self.parse_test_modifiers()?;
        self.expect(TokenKind::LBrace, "`{` to start `proba` body")?;
        let body = self.parse_block_body()?;
        Ok(TestCase { name, modifiers, body })
    }

    fn parse_test_modifiers(&mut self) -> ParseResult<TestModifiers> {
        // Modifiers, when present, are written as a parenthesized labeled
        // argument list before the case body: `proba "name" (only: verum) { ... }`.
        let mut modifiers = TestModifiers::default();
        if !self.match_kind(&TokenKind::LParen) {
            return Ok(modifiers);
        }
        if !self.check(&TokenKind::RParen) {
            loop {
                let label = self.expect_identifier("test modifier name")?;
                self.expect(TokenKind::Colon, "`:` after test modifier name")?;
                let value = self.parse_assignment()?;
                self.apply_test_modifier(&mut modifiers, &label, value);
                if !self.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "`)` to close test modifiers")?;
        Ok(modifiers)
    }

    fn apply_test_modifier(&self, modifiers: &mut TestModifiers, label: &Identifier, value: Expression) {
        let name = self.text(label.name);
        match name {
            "only" => modifiers.only = literal_bool(&value),
            "skip" => modifiers.skip = literal_bool(&value),
            "platform" => modifiers.platform = literal_string(&value),
            "env" => modifiers.env = literal_string(&value),
            "repeat" => modifiers.repeat = literal_u32(&value),
            "retries" => modifiers.retries = literal_u32(&value),
            "timeout" => modifiers.timeout_ms = literal_u32(&value),
            "tags" => modifiers.tags = literal_string_list(&value),
            _ => {}
        }
    }

    fn parse_output_statement(&mut self, start: Span, level: OutputLevel) -> ParseResult<Statement> {
        self.advance();
        let mut arguments = Vec::new();
        let template = if let TokenKind::Literal(crate::token::LiteralKind::Str(s)) = &self.peek().kind {
            let s = s.clone();
            self.advance();
            s
        } else {
            String::new()
        };
        if self.match_kind(&TokenKind::Comma) {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.match_kind(&TokenKind::Semicolon);
        let span = start.merge(self.previous().span);
        Ok(Statement::new(StatementKind::Output(OutputStatement { level, template, arguments }), span))
    }

    fn expect_string_literal(&mut self, what: &str) -> ParseResult<String> {
        if let TokenKind::Literal(crate::token::LiteralKind::Str(s)) = &self.peek().kind {
            let s = s.clone();
            self.advance();
            Ok(s)
        } else {
            self.error_here("P006", format!("expected a string literal for {what}"));
            Err(())
        }
    }

    /// Recursive type annotation parsing (spec §3.2): base name, optional
    /// `<...>` type parameters, optional `?` nullability, optional `| ...`
    /// union alternatives.
    pub(crate) fn parse_type_annotation(&mut self) -> ParseResult<TypeAnnotation> {
        let start = self.current_span();
        let mut base = if self.check_keyword(KeywordTag::Munus) {
            self.parse_function_type_signature(start)?
        } else {
            let name_tok = self.expect_identifier("type name")?;
            let mut type_parameters = Vec::new();
            if self.match_kind(&TokenKind::Lt) {
                loop {
                    type_parameters.push(self.parse_type_annotation()?);
                    if !self.match_kind(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::Gt, "`>` to close type parameter list")?;
            }
            let nullable = self.match_kind(&TokenKind::Question);
            TypeAnnotation {
                name: name_tok.name,
                type_parameters,
                nullable,
                union_alternatives: Vec::new(),
                function_signature: None,
                span: start.merge(self.previous().span),
            }
        };
        let mut union_alternatives = Vec::new();
        while self.match_kind(&TokenKind::Pipe) {
            if union_alternatives.is_empty() {
                union_alternatives.push(base.clone());
            }
            union_alternatives.push(self.parse_type_annotation()?);
        }
        if !union_alternatives.is_empty() {
            base.union_alternatives = union_alternatives;
        }
        base.span = start.merge(self.previous().span);
        Ok(base)
    }

    /// Parses a `munus(T1, T2): R` function-type annotation — spec §3.2's
    /// "optional function-type parameters/return" — reusing the `munus`
    /// keyword that introduces an ordinary function declaration rather than
    /// inventing a second keyword for the same concept at the type level.
    fn parse_function_type_signature(&mut self, start: Span) -> ParseResult<TypeAnnotation> {
        self.advance();
        self.expect(TokenKind::LParen, "`(` to start a function-type parameter list")?;
        let mut parameters = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                parameters.push(self.parse_type_annotation()?);
                if !self.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "`)` to close a function-type parameter list")?;
        self.expect(TokenKind::Colon, "`:` before a function-type return type")?;
        let return_type = self.parse_type_annotation()?;
        let nullable = self.match_kind(&TokenKind::Question);
        Ok(TypeAnnotation {
            name: sermo_base::Symbol::EMPTY,
            type_parameters: Vec::new(),
            nullable,
            union_alternatives: Vec::new(),
            function_signature: Some(Box::new(FunctionTypeSignature { parameters, return_type })),
            span: start.merge(self.previous().span),
        })
    }
}

enum ClassMember {
    Field(FieldDeclaration),
    Method(FunctionDeclaration),
}

fn literal_bool(expr: &Expression) -> bool {
    matches!(&expr.kind, ExpressionKind::Literal { value: crate::token::LiteralKind::Bool(true), .. })
}

fn literal_string(expr: &Expression) -> Option<String> {
    match &expr.kind {
        ExpressionKind::Literal { value: crate::token::LiteralKind::Str(s), .. } => Some(s.clone()),
        _ => None,
    }
}

fn literal_u32(expr: &Expression) -> Option<u32> {
    match &expr.kind {
        ExpressionKind::Literal { value: crate::token::LiteralKind::Integer(n), .. } => u32::try_from(*n).ok(),
        _ => None,
    }
}

fn literal_string_list(expr: &Expression) -> Vec<String> {
    match &expr.kind {
        ExpressionKind::ArrayLiteral { elements } => elements.iter().filter_map(|e| literal_string(&e.value)).collect(),
        _ => Vec::new(),
    }
}
