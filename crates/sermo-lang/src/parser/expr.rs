//! Expression parsing: precedence climbing across the 17 levels spec §4.2
//! enumerates, low to high. Each level is one method that parses its
//! left-hand side by calling the next-higher level, then loops consuming
//! operators at its own level — the standard recursive-descent
//! precedence-climbing shape.

use sermo_base::Span;
use sermo_lexicon::KeywordTag;

use super::{ParseResult, Parser};
use crate::ast::{
    ArrayElement, Argument, AssignmentOperator, BinaryOperator, CastKind, Expression, ExpressionKind,
    Identifier, MemberKey, ObjectElement, ObjectProperty, TemplateElement, UnaryOperator,
};
use crate::token::{LiteralKind, TokenKind};

impl<'a> Parser<'a> {
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_assignment()
    }

    // Level 1 (lowest): assignment, right-associative, all compound forms.
    pub(crate) fn parse_assignment(&mut self) -> ParseResult<Expression> {
        let start = self.current_span();
        let target = self.parse_ternary()?;
        let op = match &self.peek().kind {
            TokenKind::Assign => AssignmentOperator::Assign,
            TokenKind::PlusAssign => AssignmentOperator::AddAssign,
            TokenKind::MinusAssign => AssignmentOperator::SubtractAssign,
            TokenKind::StarAssign => AssignmentOperator::MultiplyAssign,
            TokenKind::SlashAssign => AssignmentOperator::DivideAssign,
            TokenKind::PercentAssign => AssignmentOperator::ModuloAssign,
            TokenKind::AmpAssign => AssignmentOperator::BitAndAssign,
            TokenKind::PipeAssign => AssignmentOperator::BitOrAssign,
            TokenKind::CaretAssign => AssignmentOperator::BitXorAssign,
            TokenKind::AmpAmpAssign => AssignmentOperator::LogicalAndAssign,
            TokenKind::PipePipeAssign => AssignmentOperator::LogicalOrAssign,
            TokenKind::QuestionQuestionAssign => AssignmentOperator::NullishAssign,
            _ => return Ok(target),
        };
        self.advance();
        let value = self.parse_assignment()?;
        let span = start.merge(value.span);
        Ok(Expression::new(
            ExpressionKind::Assignment { operator: op, target: Box::new(target), value: Box::new(value) },
            span,
        ))
    }

    // Level 2: ternary, right-associative.
    fn parse_ternary(&mut self) -> ParseResult<Expression> {
        let start = self.current_span();
        let test = self.parse_logical_or()?;
        if self.match_kind(&TokenKind::Question) {
            let consequent = self.parse_assignment()?;
            self.expect(TokenKind::Colon, "`:` in ternary expression")?;
            let alternate = self.parse_assignment()?;
            let span = start.merge(alternate.span);
            return Ok(Expression::new(
                ExpressionKind::Ternary {
                    test: Box::new(test),
                    consequent: Box::new(consequent),
                    alternate: Box::new(alternate),
                },
                span,
            ));
        }
        Ok(test)
    }

    // Level 3: logical-or, including nullish-coalescing.
    fn parse_logical_or(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_logical_and()?;
        loop {
            let op = match &self.peek().kind {
                TokenKind::PipePipe => BinaryOperator::LogicalOr,
                TokenKind::QuestionQuestion => BinaryOperator::NullishCoalesce,
                _ => break,
            };
            self.advance();
            let right = self.parse_logical_and()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    // Level 4: logical-and.
    fn parse_logical_and(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_equality()?;
        while self.match_kind(&TokenKind::AmpAmp) {
            let right = self.parse_equality()?;
            left = binary(left, BinaryOperator::LogicalAnd, right);
        }
        Ok(left)
    }

    // Level 5: equality, including the type-check verb `est` / `non est`.
    fn parse_equality(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_comparison()?;
        loop {
            let op = if self.match_kind(&TokenKind::EqEqEq) {
                BinaryOperator::StrictEqual
            } else if self.match_kind(&TokenKind::EqEq) {
                BinaryOperator::Equal
            } else if self.match_kind(&TokenKind::BangEqEq) {
                BinaryOperator::StrictNotEqual
            } else if self.match_kind(&TokenKind::BangEq) {
                BinaryOperator::NotEqual
            } else if self.match_keyword(KeywordTag::Non) {
                self.expect_keyword(KeywordTag::Est, "`est` after `non`")?;
                BinaryOperator::IsNot
            } else if self.match_keyword(KeywordTag::Est) {
                BinaryOperator::Is
            } else {
                break;
            };
            let right = self.parse_comparison()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    // Level 6: comparison, including interval operators `intra`/`inter`.
    fn parse_comparison(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_bitor()?;
        loop {
            let op = if self.match_kind(&TokenKind::LtEq) {
                BinaryOperator::LessEqual
            } else if self.match_kind(&TokenKind::GtEq) {
                BinaryOperator::GreaterEqual
            } else if self.match_kind(&TokenKind::Lt) {
                BinaryOperator::Less
            } else if self.match_kind(&TokenKind::Gt) {
                BinaryOperator::Greater
            } else if self.match_keyword(KeywordTag::Intra) {
                BinaryOperator::Within
            } else if self.match_keyword(KeywordTag::Inter) {
                BinaryOperator::Between
            } else {
                break;
            };
            let right = self.parse_bitor()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    // Level 7: bitwise-or.
    fn parse_bitor(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_bitxor()?;
        while self.match_kind(&TokenKind::Pipe) {
            let right = self.parse_bitxor()?;
            left = binary(left, BinaryOperator::BitOr, right);
        }
        Ok(left)
    }

    // Level 8: bitwise-xor.
    fn parse_bitxor(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_bitand()?;
        while self.match_kind(&TokenKind::Caret) {
            let right = self.parse_bitand()?;
            left = binary(left, BinaryOperator::BitXor, right);
        }
        Ok(left)
    }

    // Level 9: bitwise-and.
    fn parse_bitand(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_shift()?;
        while self.match_kind(&TokenKind::Amp) {
            let right = self.parse_shift()?;
            left = binary(left, BinaryOperator::BitAnd, right);
        }
        Ok(left)
    }

    // Level 10: shift. Spec's open question ("keyword-only or also
    // symbolic") is resolved keyword-only: `sinistratum`/`dextratum`, so a
    // nested generic like `lista<lista<T>>` never has to disambiguate `<<`
    // from two closing angle brackets (see DESIGN.md).
    fn parse_shift(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_range()?;
        loop {
            let op = if self.match_keyword(KeywordTag::Sinistratum) {
                BinaryOperator::ShiftLeft
            } else if self.match_keyword(KeywordTag::Dextratum) {
                BinaryOperator::ShiftRight
            } else {
                break;
            };
            let right = self.parse_range()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    // Level 11: range (`..` exclusive, `usque` inclusive, optional `per` step).
    fn parse_range(&mut self) -> ParseResult<Expression> {
        let start_span = self.current_span();
        let left = self.parse_additive()?;
        let inclusive = if self.match_kind(&TokenKind::DotDot) {
            false
        } else if self.match_keyword(KeywordTag::Usque) {
            true
        } else {
            return Ok(left);
        };
        let end = self.parse_additive()?;
        let step = if self.match_keyword(KeywordTag::Per) { Some(Box::new(self.parse_additive()?)) } else { None };
        let span = start_span.merge(end.span);
        Ok(Expression::new(
            ExpressionKind::Range { start: Box::new(left), end: Box::new(end), inclusive, step },
            span,
        ))
    }

    // Level 12: additive.
    fn parse_additive(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = if self.match_kind(&TokenKind::Plus) {
                BinaryOperator::Add
            } else if self.match_kind(&TokenKind::Minus) {
                BinaryOperator::Subtract
            } else {
                break;
            };
            let right = self.parse_multiplicative()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    // Level 13: multiplicative.
    fn parse_multiplicative(&mut self) -> ParseResult<Expression> {
        let mut left = self.parse_unary()?;
        loop {
            let op = if self.match_kind(&TokenKind::Star) {
                BinaryOperator::Multiply
            } else if self.match_kind(&TokenKind::Slash) {
                BinaryOperator::Divide
            } else if self.match_kind(&TokenKind::Percent) {
                BinaryOperator::Modulo
            } else {
                break;
            };
            let right = self.parse_unary()?;
            left = binary(left, op, right);
        }
        Ok(left)
    }

    // Level 14: unary, prefix operators plus `cede` for suspend/await.
    fn parse_unary(&mut self) -> ParseResult<Expression> {
        let start = self.current_span();
        if self.match_keyword(KeywordTag::Cede) {
            let operand = self.parse_unary()?;
            let span = start.merge(operand.span);
            return Ok(Expression::new(ExpressionKind::Cede { operand: Box::new(operand) }, span));
        }
        let op = if self.match_kind(&TokenKind::Minus) {
            Some(UnaryOperator::Negate)
        } else if self.match_kind(&TokenKind::Bang) {
            Some(UnaryOperator::Not)
        } else if self.match_kind(&TokenKind::Tilde) {
            Some(UnaryOperator::BitNot)
        } else if self.match_kind(&TokenKind::Plus) {
            Some(UnaryOperator::Plus)
        } else {
            None
        };
        if let Some(operator) = op {
            let operand = self.parse_unary()?;
            let span = start.merge(operand.span);
            return Ok(Expression::new(ExpressionKind::Unary { operator, operand: Box::new(operand) }, span));
        }
        self.parse_cast()
    }

    // Level 15: cast/conversion verbs, with optional `vel` fallback.
    fn parse_cast(&mut self) -> ParseResult<Expression> {
        let start = self.current_span();
        let mut expr = self.parse_call_member()?;
        loop {
            let kind = if self.match_keyword(KeywordTag::Qua) {
                CastKind::Assert
            } else if self.match_keyword(KeywordTag::Innatum) {
                CastKind::Native
            } else if self.match_keyword(KeywordTag::Numeratum) {
                CastKind::ToNumerus
            } else if self.match_keyword(KeywordTag::Fractatum) {
                CastKind::ToFractus
            } else if self.match_keyword(KeywordTag::Textatum) {
                CastKind::ToTextus
            } else if self.match_keyword(KeywordTag::Bivalentum) {
                CastKind::ToBivalens
            } else {
                break;
            };
            let target_type = if kind == CastKind::Assert || kind == CastKind::Native {
                Some(self.parse_type_annotation()?)
            } else {
                None
            };
            let fallback = if self.match_keyword(KeywordTag::Vel) { Some(Box::new(self.parse_unary()?)) } else { None };
            let span = start.merge(self.previous().span);
            expr = Expression::new(
                ExpressionKind::Cast { kind, operand: Box::new(expr), target_type, fallback },
                span,
            );
        }
        Ok(expr)
    }

    // Level 16: call/member chain (`()`, `[]`, `.`, `?.`, `!.`, `?[]`, `![]`).
    fn parse_call_member(&mut self) -> ParseResult<Expression> {
        let start = self.current_span();
        let mut expr = self.parse_primary()?;
        loop {
            if self.match_kind(&TokenKind::Dot) {
                let name = self.expect_identifier("member name after `.`")?;
                let span = start.merge(name.span);
                expr = Expression::new(
                    ExpressionKind::Member { object: Box::new(expr), key: MemberKey::Name(name), optional: false, non_null: false },
                    span,
                );
            } else if self.match_kind(&TokenKind::QuestionDot) {
                let name = self.expect_identifier("member name after `?.`")?;
                let span = start.merge(name.span);
                expr = Expression::new(
                    ExpressionKind::Member { object: Box::new(expr), key: MemberKey::Name(name), optional: true, non_null: false },
                    span,
                );
            } else if self.match_kind(&TokenKind::BangDot) {
                let name = self.expect_identifier("member name after `!.`")?;
                let span = start.merge(name.span);
                expr = Expression::new(
                    ExpressionKind::Member { object: Box::new(expr), key: MemberKey::Name(name), optional: false, non_null: true },
                    span,
                );
            } else if self.match_kind(&TokenKind::LBracket) {
                let index = self.parse_expression()?;
                self.expect(TokenKind::RBracket, "`]`")?;
                let span = start.merge(self.previous().span);
                expr = Expression::new(
                    ExpressionKind::Member { object: Box::new(expr), key: MemberKey::Computed(Box::new(index)), optional: false, non_null: false },
                    span,
                );
            } else if self.match_kind(&TokenKind::QuestionBracket) {
                let index = self.parse_expression()?;
                self.expect(TokenKind::RBracket, "`]`")?;
                let span = start.merge(self.previous().span);
                expr = Expression::new(
                    ExpressionKind::Member { object: Box::new(expr), key: MemberKey::Computed(Box::new(index)), optional: true, non_null: false },
                    span,
                );
            } else if self.match_kind(&TokenKind::BangBracket) {
                let index = self.parse_expression()?;
                self.expect(TokenKind::RBracket, "`]`")?;
                let span = start.merge(self.previous().span);
                expr = Expression::new(
                    ExpressionKind::Member { object: Box::new(expr), key: MemberKey::Computed(Box::new(index)), optional: false, non_null: true },
                    span,
                );
            } else if self.match_kind(&TokenKind::LParen) {
                let arguments = self.parse_arguments()?;
                let span = start.merge(self.previous().span);
                expr = Expression::new(ExpressionKind::Call { callee: Box::new(expr), arguments }, span);
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Argument>> {
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let is_spread = self.match_kind(&TokenKind::DotDotDot);
                let label = if matches!(self.peek().kind, TokenKind::Identifier)
                    && matches!(self.peek_at(1).map(|t| &t.kind), Some(TokenKind::Colon))
                {
                    let tok = self.advance().clone();
                    self.advance();
                    Some(tok.lexeme)
                } else {
                    None
                };
                let value = self.parse_assignment()?;
                args.push(Argument { value, is_spread, label });
                if !self.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "`)` to close argument list")?;
        Ok(args)
    }

    // Level 17 (highest): primary.
    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let start = self.current_span();
        if self.match_kind(&TokenKind::LParen) {
            let inner = self.parse_expression()?;
            self.expect(TokenKind::RParen, "`)` to close grouped expression")?;
            return Ok(inner);
        }
        if self.match_kind(&TokenKind::LBracket) {
            return self.parse_array_literal(start);
        }
        if self.match_kind(&TokenKind::LBrace) {
            return self.parse_object_literal(start);
        }
        if self.match_keyword(KeywordTag::Munus) {
            return self.parse_function_expression(start);
        }
        if self.match_keyword(KeywordTag::Expressio) {
            return self.parse_regex_literal(start);
        }
        if self.match_keyword(KeywordTag::Verum) {
            return Ok(literal(start, LiteralKind::Bool(true), "verum"));
        }
        if self.match_keyword(KeywordTag::Falsum) {
            return Ok(literal(start, LiteralKind::Bool(false), "falsum"));
        }
        if self.match_keyword(KeywordTag::Nihil) {
            return Ok(literal(start, LiteralKind::Nil, "nihil"));
        }
        if self.match_keyword(KeywordTag::Vacuum) {
            return Ok(literal(start, LiteralKind::Nil, "vacuum"));
        }
        match &self.peek().kind {
            TokenKind::Literal(_) => {
                let tok = self.advance().clone();
                let TokenKind::Literal(value) = tok.kind else { unreachable!() };
                if let LiteralKind::TemplateStr(raw) = &value {
                    return Ok(self.parse_template_parts(tok.span, raw.clone()));
                }
                Ok(Expression::new(ExpressionKind::Literal { value, raw: tok.lexeme }, tok.span))
            }
            TokenKind::Identifier => {
                let tok = self.advance().clone();
                let name = self.intern_morphology(&tok);
                Ok(Expression::new(ExpressionKind::Identifier(name), tok.span))
            }
            _ => {
                self.error_here("P002", format!("unexpected token {:?} in expression", self.peek().kind));
                self.advance();
                Ok(Expression::unknown(start))
            }
        }
    }

    /// Attaches advisory Latin morphology to an identifier when the lexicon
    /// recognizes its spelling as an inflected noun form (spec §9:
    /// "Morphology... must survive into the AST").
    fn intern_morphology(&self, tok: &crate::token::Token) -> Identifier {
        let base = Identifier::new(tok.lexeme, tok.span);
        match sermo_lexicon::decompose(self.text(tok.lexeme)) {
            Some(m) => base.with_morphology(crate::ast::MorphologyInfo { stem: m.stem, case: m.case, number: m.number }),
            None => base,
        }
    }

    /// Splits a template's raw contents on `${...}` holes (spec §3.1), then
    /// re-lexes and re-parses each hole's inner text as its own expression.
    /// Braces inside a hole (e.g. an object literal) are depth-counted so
    /// the first `}` at depth zero, not the first `}` overall, closes it.
    /// Hole sub-expressions share the module's interner, so an identifier
    /// referenced inside `${...}` resolves to the same symbol as everywhere
    /// else in the module; their spans point at the whole template, since
    /// the hole's own offsets are relative to the extracted substring, not
    /// the source file.
    fn parse_template_parts(&mut self, span: Span, raw: String) -> Expression {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let chars: Vec<char> = raw.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if chars[i] == '$' && chars.get(i + 1) == Some(&'{') {
                if !literal.is_empty() {
                    parts.push(TemplateElement::Str(std::mem::take(&mut literal)));
                }
                let hole_start = i + 2;
                let mut depth = 1;
                let mut j = hole_start;
                while j < chars.len() && depth > 0 {
                    match chars[j] {
                        '{' => depth += 1,
                        '}' => depth -= 1,
                        _ => {}
                    }
                    if depth > 0 {
                        j += 1;
                    }
                }
                if j >= chars.len() {
                    self.error_here("P007", "unterminated template interpolation hole");
                    i = chars.len();
                    continue;
                }
                let hole_text: String = chars[hole_start..j].iter().collect();
                parts.push(TemplateElement::Expr(self.parse_interpolation_hole(span, &hole_text)));
                i = j + 1;
            } else {
                literal.push(chars[i]);
                i += 1;
            }
        }
        if !literal.is_empty() || parts.is_empty() {
            parts.push(TemplateElement::Str(literal));
        }
        Expression::new(ExpressionKind::TemplateLiteral { parts }, span)
    }

    /// Re-lexes and re-parses a single `${...}` hole's text as a standalone
    /// expression, folding its diagnostics into the enclosing parse.
    fn parse_interpolation_hole(&mut self, span: Span, hole_text: &str) -> Expression {
        let (tokens, lex_diagnostics) = crate::lexer::Lexer::new(hole_text, self.interner_mut()).tokenize();
        self.diagnostics_mut().extend(lex_diagnostics);
        let mut sub_parser = Parser::new(tokens, self.interner_mut());
        let result = sub_parser.parse_expression();
        let sub_diagnostics = std::mem::take(sub_parser.diagnostics_mut());
        drop(sub_parser);
        self.diagnostics_mut().extend(sub_diagnostics);
        match result {
            Ok(expr) => expr,
            Err(()) => {
                self.error_here("P007", format!("malformed template interpolation `{hole_text}`"));
                Expression::unknown(span)
            }
        }
    }

    fn parse_array_literal(&mut self, start: Span) -> ParseResult<Expression> {
        let mut elements = Vec::new();
        if !self.check(&TokenKind::RBracket) {
            loop {
                let is_spread = self.match_kind(&TokenKind::DotDotDot);
                let value = self.parse_assignment()?;
                elements.push(ArrayElement { value, is_spread });
                if !self.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket, "`]` to close array literal")?;
        let span = start.merge(self.previous().span);
        Ok(Expression::new(ExpressionKind::ArrayLiteral { elements }, span))
    }

    fn parse_object_literal(&mut self, start: Span) -> ParseResult<Expression> {
        let mut elements = Vec::new();
        if !self.check(&TokenKind::RBrace) {
            loop {
                if self.match_kind(&TokenKind::DotDotDot) {
                    let value = self.parse_assignment()?;
                    elements.push(ObjectElement::Spread(value));
                } else {
                    let key = self.expect_identifier("object property key")?;
                    let shorthand = !self.match_kind(&TokenKind::Colon);
                    let value = if shorthand {
                        Expression::new(ExpressionKind::Identifier(key.clone()), key.span)
                    } else {
                        self.parse_assignment()?
                    };
                    let span = key.span.merge(value.span);
                    elements.push(ObjectElement::Property(ObjectProperty { key, value, shorthand, span }));
                }
                if !self.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBrace, "`}` to close object literal")?;
        let span = start.merge(self.previous().span);
        Ok(Expression::new(ExpressionKind::ObjectLiteral { elements }, span))
    }

    fn parse_function_expression(&mut self, start: Span) -> ParseResult<Expression> {
        self.expect(TokenKind::LParen, "`(` after `munus`")?;
        let parameters = self.parse_parameters()?;
        let verb = self.parse_return_verb()?;
        let return_type =
            if verb.is_some() && !self.check(&TokenKind::LBrace) { Some(self.parse_type_annotation()?) } else { None };
        self.expect(TokenKind::LBrace, "`{` to start function body")?;
        let body = self.parse_block_body()?;
        let span = start.merge(self.previous().span);
        Ok(Expression::new(
            ExpressionKind::FunctionExpression {
                parameters,
                return_type,
                verb: verb.map(|(v, _)| v),
                body,
            },
            span,
        ))
    }

    fn parse_regex_literal(&mut self, start: Span) -> ParseResult<Expression> {
        let pattern_tok = self.advance().clone();
        let pattern = match pattern_tok.kind {
            TokenKind::Literal(LiteralKind::Str(s)) => s,
            _ => {
                self.error_here("P003", "expected a string pattern after `expressio`");
                String::new()
            }
        };
        let flags_symbol = if matches!(self.peek().kind, TokenKind::Identifier) {
            self.advance().lexeme
        } else {
            sermo_base::Symbol::EMPTY
        };
        let span = start.merge(self.previous().span);
        Ok(Expression::new(
            ExpressionKind::Literal { value: LiteralKind::Regex { pattern, flags_symbol }, raw: sermo_base::Symbol::EMPTY },
            span,
        ))
    }
}

fn binary(left: Expression, op: BinaryOperator, right: Expression) -> Expression {
    let span = left.span.merge(right.span);
    Expression::new(ExpressionKind::Binary { operator: op, left: Box::new(left), right: Box::new(right) }, span)
}

fn literal(span: Span, value: LiteralKind, _keyword_text: &str) -> Expression {
    // These four literal keywords have no separate lexeme worth preserving
    // beyond the keyword spelling itself; codegen renders from `value`.
    Expression::new(ExpressionKind::Literal { value, raw: sermo_base::Symbol::EMPTY }, span)
}
