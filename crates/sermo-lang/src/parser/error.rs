//! Panic-mode recovery (spec §4.2: "errors are appended to a list; the
//! parser inserts a synthetic token of the expected kind and advances. At
//! statement granularity a panic-mode synchronization skips tokens until
//! the next statement-starting keyword or block boundary.").

use sermo_base::{Diagnostic, Span};
use sermo_lexicon::KeywordTag;

use super::{ParseResult, Parser};
use crate::token::TokenKind;

/// Keywords that begin a statement; synchronization stops as soon as one of
/// these is the next token, so a malformed statement never drags its
/// neighbors into error recovery.
const STATEMENT_START_KEYWORDS: &[KeywordTag] = &[
    KeywordTag::Varia,
    KeywordTag::Fixum,
    KeywordTag::Figendum,
    KeywordTag::Variandum,
    KeywordTag::Munus,
    KeywordTag::Genus,
    KeywordTag::Pactum,
    KeywordTag::Ordo,
    KeywordTag::Discretio,
    KeywordTag::Nomen,
    KeywordTag::Importa,
    KeywordTag::Si,
    KeywordTag::Dum,
    KeywordTag::Ex,
    KeywordTag::De,
    KeywordTag::Elige,
    KeywordTag::Discerne,
    KeywordTag::Custodi,
    KeywordTag::Tempta,
    KeywordTag::Iace,
    KeywordTag::Mori,
    KeywordTag::Adfirma,
    KeywordTag::Cura,
    KeywordTag::Ad,
    KeywordTag::Incipit,
    KeywordTag::Incipiet,
    KeywordTag::Probandum,
    KeywordTag::Scribe,
    KeywordTag::Vide,
    KeywordTag::Mone,
];

/// Field/method-start sync set used inside `genus`/`pactum` bodies (spec
/// §4.2: "Genus/class bodies use their own sync set (field/method starts,
/// `}`)").
const CLASS_MEMBER_START_KEYWORDS: &[KeywordTag] = &[
    KeywordTag::Varia,
    KeywordTag::Fixum,
    KeywordTag::Figendum,
    KeywordTag::Variandum,
    KeywordTag::Munus,
];

impl<'a> Parser<'a> {
    /// Records a syntax error at the current token's position.
    pub(crate) fn error_here(&mut self, code: &'static str, message: impl Into<String>) {
        let span = self.peek().span;
        self.diagnostics_mut().push(Diagnostic::error(code, message, span));
    }

    /// Consumes `kind` if present; otherwise records an "expected token"
    /// diagnostic and inserts a synthetic token of the expected kind so the
    /// caller can keep building a tree around it without an `Option` at
    /// every call site.
    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> ParseResult<()> {
        if self.check(&kind) {
            self.advance();
            Ok(())
        } else {
            self.error_here("P001", format!("expected {what}, found {:?}", self.peek().kind));
            Err(())
        }
    }

    pub(crate) fn expect_keyword(&mut self, tag: KeywordTag, what: &str) -> ParseResult<()> {
        if self.check_keyword(tag) {
            self.advance();
            Ok(())
        } else {
            self.error_here("P001", format!("expected {what}, found {:?}", self.peek().kind));
            Err(())
        }
    }

    pub(crate) fn expect_identifier(&mut self, what: &str) -> ParseResult<crate::ast::Identifier> {
        if self.check(&TokenKind::Identifier) {
            let tok = self.advance().clone();
            Ok(crate::ast::Identifier::new(tok.lexeme, tok.span))
        } else {
            self.error_here("P001", format!("expected {what}, found {:?}", self.peek().kind));
            Err(())
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    /// Skips tokens until the next statement-starting keyword, block
    /// boundary, or end of input. Called after a top-level or block
    /// statement fails to parse.
    pub(crate) fn synchronize_statement(&mut self) {
        while !self.is_at_end() {
            if matches!(self.peek().kind, TokenKind::Semicolon) {
                self.advance();
                return;
            }
            if matches!(self.peek().kind, TokenKind::RBrace) {
                return;
            }
            if let TokenKind::Keyword(tag) = self.peek().kind {
                if STATEMENT_START_KEYWORDS.contains(&tag) {
                    return;
                }
            }
            self.advance();
        }
    }

    /// The synchronization set used while recovering inside a `genus` or
    /// `pactum` body.
    pub(crate) fn synchronize_class_member(&mut self) {
        while !self.is_at_end() {
            if matches!(self.peek().kind, TokenKind::RBrace) {
                return;
            }
            if let TokenKind::Keyword(tag) = self.peek().kind {
                if CLASS_MEMBER_START_KEYWORDS.contains(&tag) {
                    return;
                }
            }
            self.advance();
        }
    }
}
