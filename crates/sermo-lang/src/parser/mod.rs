//! Recursive-descent parser (spec §4.2).
//!
//! Organized the way the teacher splits parsing concerns into traits over a
//! shared cursor (`ModalParsing`, `ClauseParsing`, `NounParsing` there;
//! `expr`/`stmt` here): [`Parser`] and its cursor primitives live in this
//! module, expression precedence-climbing lives in [`expr`], statement
//! dispatch lives in [`stmt`], and synchronization lives in [`error`].

mod error;
mod expr;
mod stmt;

use sermo_base::{Diagnostic, Interner};
use sermo_lexicon::KeywordTag;

use crate::ast::Module;
use crate::token::{Token, TokenKind};

pub type ParseResult<T> = Result<T, ()>;

/// Holds a read-only reference to the module's [`Interner`] alongside the
/// token cursor: the vast majority of grammar decisions dispatch on token
/// *kind* and never need lexeme text, but a few (the `discerne` wildcard
/// `_`, test-modifier names) compare an identifier's spelling directly.
pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    interner: &'a mut Interner,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, interner: &'a mut Interner) -> Self {
        Parser { tokens, pos: 0, diagnostics: Vec::new(), interner }
    }

    /// Parses a full module: every top-level statement, recovering past
    /// each one that fails so a single bad declaration never stops the
    /// whole file from producing a best-effort tree (spec §4.2).
    pub fn parse_module(mut self) -> (Module, Vec<Diagnostic>) {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            match self.parse_top_level_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(()) => self.synchronize_statement(),
            }
        }
        (Module { statements }, self.diagnostics)
    }

    // -- cursor primitives --------------------------------------------------

    pub(crate) fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1).min(self.tokens.len() - 1)]
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Eof)
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous()
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.peek().kind) == std::mem::discriminant(kind)
    }

    pub(crate) fn check_keyword(&self, tag: KeywordTag) -> bool {
        matches!(&self.peek().kind, TokenKind::Keyword(t) if *t == tag)
    }

    pub(crate) fn match_kind(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn match_keyword(&mut self, tag: KeywordTag) -> bool {
        if self.check_keyword(tag) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn diagnostics_mut(&mut self) -> &mut Vec<Diagnostic> {
        &mut self.diagnostics
    }

    /// Resolves an interned lexeme to its source text.
    pub(crate) fn text(&self, symbol: sermo_base::Symbol) -> &str {
        self.interner.resolve(symbol)
    }

    /// Mutable access to the shared interner, needed when a sub-grammar
    /// (template interpolation holes) re-lexes a substring of the source
    /// and must intern new symbols into the same table as the rest of the
    /// module rather than a disposable scratch interner.
    pub(crate) fn interner_mut(&mut self) -> &mut Interner {
        self.interner
    }

    /// True when the current token is an identifier spelled exactly `_`,
    /// the `discerne` wildcard marker. Sermo has no dedicated underscore
    /// token; the tokenizer lexes `_` as an ordinary identifier and the
    /// grammar distinguishes it by spelling at the one place it matters.
    pub(crate) fn check_wildcard_identifier(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Identifier) && self.text(self.peek().lexeme) == "_"
    }
}

/// Parses the token stream for a single module into an AST plus the
/// diagnostics raised along the way. This is the crate's front-door parser
/// entry point; `sermo-cli` calls it once per source file after lexing.
pub fn parse(tokens: Vec<Token>, interner: &mut Interner) -> (Module, Vec<Diagnostic>) {
    Parser::new(tokens, interner).parse_module()
}

#[cfg(test)]
mod tests {
    use sermo_base::{Diagnostic, Interner};

    use crate::ast::{ExpressionKind, Module, StatementKind, TemplateElement};
    use crate::lexer::Lexer;

    use super::parse;

    fn parse_source(source: &str) -> (Module, Vec<Diagnostic>, Interner) {
        let mut interner = Interner::new();
        let (tokens, lex_diagnostics) = Lexer::new(source, &mut interner).tokenize();
        assert!(lex_diagnostics.is_empty(), "{lex_diagnostics:?}");
        let (module, parse_diagnostics) = parse(tokens, &mut interner);
        (module, parse_diagnostics, interner)
    }

    fn template_parts(module: &Module) -> &[TemplateElement] {
        match &module.statements[0].kind {
            StatementKind::VariableDeclaration(decl) => match &decl.initializer.as_ref().unwrap().kind {
                ExpressionKind::TemplateLiteral { parts } => parts,
                other => panic!("expected a template literal, got {other:?}"),
            },
            other => panic!("expected a variable declaration, got {other:?}"),
        }
    }

    #[test]
    fn template_without_holes_is_a_single_literal_part() {
        let (module, diagnostics, _) = parse_source("varia x = `hello`");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let parts = template_parts(&module);
        assert_eq!(parts, &[TemplateElement::Str("hello".to_string())]);
    }

    #[test]
    fn template_interpolation_hole_parses_as_an_expression() {
        let (module, diagnostics, interner) = parse_source("varia x = `sum: ${1 + 2}!`");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let parts = template_parts(&module);
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], TemplateElement::Str("sum: ".to_string()));
        match &parts[1] {
            TemplateElement::Expr(e) => assert!(matches!(e.kind, ExpressionKind::Binary { .. })),
            other => panic!("expected an interpolated expression, got {other:?}"),
        }
        assert_eq!(parts[2], TemplateElement::Str("!".to_string()));
        let _ = interner;
    }

    #[test]
    fn template_hole_referencing_an_outer_identifier_shares_its_symbol() {
        let (module, diagnostics, interner) = parse_source("varia name = `x` varia greeting = `hi ${name}`");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let StatementKind::VariableDeclaration(outer) = &module.statements[0].kind else {
            panic!("expected a variable declaration");
        };
        let outer_symbol = outer.name.name;
        match &module.statements[1].kind {
            StatementKind::VariableDeclaration(decl) => match &decl.initializer.as_ref().unwrap().kind {
                ExpressionKind::TemplateLiteral { parts } => match &parts[1] {
                    TemplateElement::Expr(e) => match &e.kind {
                        ExpressionKind::Identifier(id) => assert_eq!(id.name, outer_symbol),
                        other => panic!("expected an identifier, got {other:?}"),
                    },
                    other => panic!("expected an interpolated expression, got {other:?}"),
                },
                other => panic!("expected a template literal, got {other:?}"),
            },
            other => panic!("expected a variable declaration, got {other:?}"),
        }
        let _ = interner;
    }

    #[test]
    fn nested_braces_inside_a_hole_do_not_close_it_early() {
        let (module, diagnostics, _) = parse_source("varia x = `${ { uno: 1 } }`");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let parts = template_parts(&module);
        assert_eq!(parts.len(), 1);
        assert!(matches!(&parts[0], TemplateElement::Expr(e) if matches!(e.kind, ExpressionKind::ObjectLiteral { .. })));
    }

    #[test]
    fn function_type_annotation_parses_parameters_and_return_type() {
        let (module, diagnostics, interner) = parse_source("varia callback: munus(numerus, textus): bivalens");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let StatementKind::VariableDeclaration(decl) = &module.statements[0].kind else {
            panic!("expected a variable declaration");
        };
        let annotation = decl.type_annotation.as_ref().expect("expected a type annotation");
        let sig = annotation.function_signature.as_ref().expect("expected a function-type signature");
        assert_eq!(sig.parameters.len(), 2);
        assert_eq!(interner.resolve(sig.parameters[0].name), "numerus");
        assert_eq!(interner.resolve(sig.parameters[1].name), "textus");
        assert_eq!(interner.resolve(sig.return_type.name), "bivalens");
    }

    #[test]
    fn nullable_function_type_annotation_parses() {
        let (module, diagnostics, _) = parse_source("varia callback: munus(): vacuum?");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let StatementKind::VariableDeclaration(decl) = &module.statements[0].kind else {
            panic!("expected a variable declaration");
        };
        let annotation = decl.type_annotation.as_ref().expect("expected a type annotation");
        assert!(annotation.nullable);
        assert!(annotation.function_signature.is_some());
    }

    #[test]
    fn plain_for_of_loop_is_not_async() {
        let (module, diagnostics, _) = parse_source("ex items pro item { }");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let StatementKind::Iteration(s) = &module.statements[0].kind else {
            panic!("expected an iteration statement");
        };
        assert!(!s.is_async);
    }

    #[test]
    fn async_for_of_loop_sets_is_async() {
        let (module, diagnostics, _) = parse_source("ex cede items pro item { }");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let StatementKind::Iteration(s) = &module.statements[0].kind else {
            panic!("expected an iteration statement");
        };
        assert!(s.is_async);
    }

    #[test]
    fn async_for_in_loop_sets_is_async() {
        let (module, diagnostics, _) = parse_source("de cede items pro key { }");
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let StatementKind::Iteration(s) = &module.statements[0].kind else {
            panic!("expected an iteration statement");
        };
        assert!(s.is_async);
    }
}
