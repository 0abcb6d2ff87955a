//! Parser state shared by the grammar rules: the token cursor, expectation
//! checks and diagnostics.

use probe_lexer::token::{Token, TokenKind};
use probe_types::ast::{Expr, Ident};
use probe_types::{Diagnostics, ErrorCode, ProbeError, SourceText, Span};

/// Deepest nesting of sub-expressions the parser accepts.
pub const MAX_NESTING_DEPTH: u32 = 64;

/// Tallest tree an operator or postfix chain may build.
pub const MAX_EXPRESSION_HEIGHT: u32 = 256;

/// Builds one expression tree from a lexed token stream.
pub struct Parser<'src> {
    tokens: Vec<Token>,
    pos: usize,
    source: &'src SourceText,
    errors: Diagnostics,
    /// Open parentheses and unary operators around the current rule.
    pub(crate) depth: u32,
}

/// The tree (absent when no expression could be read) and every diagnostic.
pub struct ParseResult {
    pub expr: Option<Expr>,
    pub errors: Diagnostics,
}

impl<'src> Parser<'src> {
    /// A trailing `Eof` is appended when the stream lacks one.
    pub fn new(mut tokens: Vec<Token>, source: &'src SourceText) -> Self {
        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            let end = tokens.last().map_or(Span::point(1, 1), |t| t.span);
            tokens.push(Token::new(TokenKind::Eof, end));
        }
        Self {
            tokens,
            pos: 0,
            source,
            errors: Diagnostics::empty(),
            depth: 0,
        }
    }

    // ── Cursor ──────────────────────────────────────────────────────────────

    /// The token under the cursor; past the end this stays on `Eof`.
    pub(crate) fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    pub(crate) fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Consume the token under the cursor.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Span of the last consumed token.
    pub(crate) fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::point(1, 1)
        }
    }

    pub(crate) fn current_span(&self) -> Span {
        self.peek().span
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    pub(crate) fn check_exact(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consume the token if it is `kind`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check_exact(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    // ── Expectations ────────────────────────────────────────────────────────

    /// Consume `expected` or report what was found instead.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Option<Token> {
        if self.check_exact(expected) {
            Some(self.advance())
        } else {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected '{}', got '{}'", expected, self.peek_kind()),
            );
            None
        }
    }

    /// The name after `.` or `?.`. Keywords are allowed here (`value.null`).
    pub(crate) fn expect_member_name(&mut self) -> Option<Ident> {
        let kind = self.peek_kind().clone();
        match &kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Some(Ident::new(name, span))
            }
            _ if kind.is_keyword() => {
                let span = self.advance().span;
                Some(Ident::new(kind.to_string(), span))
            }
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected property name, got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }

    /// An object literal key: a name, a string, or a number in its display form.
    pub(crate) fn expect_property_key(&mut self) -> Option<Ident> {
        match self.peek_kind().clone() {
            TokenKind::StringLiteral(text) => {
                let span = self.advance().span;
                Some(Ident::new(text, span))
            }
            TokenKind::NumberLit(n) => {
                let span = self.advance().span;
                Some(Ident::new(probe_types::format_number(n), span))
            }
            _ => self.expect_member_name(),
        }
    }

    // ── Diagnostics ─────────────────────────────────────────────────────────

    pub(crate) fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(code, message, span);
    }

    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let error = self.diagnostic(code, message, span);
        self.errors.push_error(error);
    }

    pub(crate) fn error_with_suggestion(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let error = self.diagnostic(code, message, span).with_suggestion(suggestion);
        self.errors.push_error(error);
    }

    fn diagnostic(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> ProbeError {
        let line = self.source.line(span.start_line).unwrap_or_default();
        ProbeError::new(&self.source.name, code, message, span, line)
    }

    // ────────────────────────────────────────────────────────────────────────

    /// Read exactly one expression; anything left over is an error.
    pub fn parse(mut self) -> ParseResult {
        let expr = self.parse_expression();
        if expr.is_some() && !self.at_end() {
            self.error_at_current(
                ErrorCode::TRAILING_INPUT,
                format!("unexpected '{}' after end of expression", self.peek_kind()),
            );
        }
        ParseResult {
            expr,
            errors: self.errors,
        }
    }
}
