//! Expression parsing with JavaScript operator precedence.
//!
//! Precedence (lowest → highest):
//! 9. `? :` (conditional, right-associative)
//! 8. `??` (cannot mix with `||` / `&&` without parentheses)
//! 7. `||`
//! 6. `&&`
//! 5. `==`, `!=`, `===`, `!==`
//! 4. `<`, `<=`, `>`, `>=`
//! 3. `+`, `-`
//! 2. `*`, `/`, `%`
//! 1. unary `!`, `-`, `+`, `typeof`
//! 0. `.`, `?.`, `[]`, `()` (postfix chain)

use probe_lexer::token::TokenKind;
use probe_types::ast::*;
use probe_types::{ErrorCode, Span};

use crate::parser::{Parser, MAX_EXPRESSION_HEIGHT, MAX_NESTING_DEPTH};

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        if !self.enter() {
            return None;
        }
        let result = self.parse_conditional();
        self.depth -= 1;
        result
    }

    /// Bump the nesting depth, reporting an error past the limit.
    fn enter(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_NESTING_DEPTH {
            self.error_at_current(
                ErrorCode::NESTING_LIMIT_EXCEEDED,
                format!("maximum expression nesting depth is {MAX_NESTING_DEPTH}"),
            );
            self.depth -= 1;
            return false;
        }
        true
    }

    /// Pass `expr` through unless its chain has grown past the height limit.
    fn bounded(&mut self, expr: Expr) -> Option<Expr> {
        if expr.height() > MAX_EXPRESSION_HEIGHT {
            self.error_at(
                ErrorCode::NESTING_LIMIT_EXCEEDED,
                format!("expression is too deeply chained (limit {MAX_EXPRESSION_HEIGHT})"),
                expr.span,
            );
            return None;
        }
        Some(expr)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `Conditional = Coalesce [ "?" Expression ":" Expression ]`
    fn parse_conditional(&mut self) -> Option<Expr> {
        let test = self.parse_coalesce()?;
        if !self.eat(&TokenKind::Question) {
            return Some(test);
        }
        let consequent = self.parse_expression()?;
        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_expression()?;
        let span = test.span.merge(alternate.span);
        Some(Expr::new(
            ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            span,
        ))
    }

    /// `Coalesce = Or { "??" Or }`
    fn parse_coalesce(&mut self) -> Option<Expr> {
        let mut left = self.parse_or()?;
        if !self.check_exact(&TokenKind::QuestionQuestion) {
            return Some(left);
        }
        self.reject_mixed_logical(&left);
        while self.eat(&TokenKind::QuestionQuestion) {
            let right = self.parse_or()?;
            self.reject_mixed_logical(&right);
            left = self.bounded(logical(left, LogicalOp::Coalesce, right))?;
        }
        Some(left)
    }

    fn reject_mixed_logical(&mut self, operand: &Expr) {
        if let ExprKind::Logical {
            op: LogicalOp::And | LogicalOp::Or,
            ..
        } = operand.kind
        {
            self.error_with_suggestion(
                ErrorCode::UNEXPECTED_TOKEN,
                "cannot mix '??' with '||' or '&&'",
                operand.span,
                "Wrap the '||' / '&&' operand in parentheses",
            );
        }
    }

    /// `Or = And { "||" And }`
    fn parse_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::PipePipe) {
            let right = self.parse_and()?;
            left = self.bounded(logical(left, LogicalOp::Or, right))?;
        }
        Some(left)
    }

    /// `And = Equality { "&&" Equality }`
    fn parse_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_equality()?;
        while self.eat(&TokenKind::AmpAmp) {
            let right = self.parse_equality()?;
            left = self.bounded(logical(left, LogicalOp::And, right))?;
        }
        Some(left)
    }

    /// `Equality = Relational { EqOp Relational }`
    fn parse_equality(&mut self) -> Option<Expr> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::BangEq => BinOp::NotEq,
                TokenKind::EqEqEq => BinOp::StrictEq,
                TokenKind::BangEqEq => BinOp::StrictNotEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            left = self.bounded(binary(left, op, right))?;
        }
        Some(left)
    }

    /// `Relational = Additive { RelOp Additive }`
    fn parse_relational(&mut self) -> Option<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Less => BinOp::Less,
                TokenKind::LessEq => BinOp::LessEq,
                TokenKind::Greater => BinOp::Greater,
                TokenKind::GreaterEq => BinOp::GreaterEq,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = self.bounded(binary(left, op, right))?;
        }
        Some(left)
    }

    /// `Additive = Multiplicative { ("+" | "-") Multiplicative }`
    fn parse_additive(&mut self) -> Option<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.bounded(binary(left, op, right))?;
        }
        Some(left)
    }

    /// `Multiplicative = Unary { ("*" | "/" | "%") Unary }`
    fn parse_multiplicative(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = self.bounded(binary(left, op, right))?;
        }
        Some(left)
    }

    /// `Unary = ("!" | "-" | "+" | "typeof") Unary | Postfix`
    fn parse_unary(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let op = match self.peek_kind() {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Typeof => UnaryOp::TypeOf,
            _ => return self.parse_postfix(),
        };
        self.advance();
        if !self.enter() {
            return None;
        }
        let operand = self.parse_unary();
        self.depth -= 1;
        let operand = operand?;
        let span = start.merge(operand.span);
        Some(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// `Postfix = Primary { "." Name | "?." Name | "?." "[" Expr "]" | "?." Args
    ///            | "[" Expr "]" | Args }`
    ///
    /// A chain containing any `?.` link is wrapped in [`ExprKind::OptionalChain`]
    /// so that a short-circuit ends the whole chain.
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        let mut has_optional = false;
        loop {
            match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let property = self.expect_member_name()?;
                    expr = self.bounded(member(expr, property, false))?;
                }
                TokenKind::QuestionDot => {
                    self.advance();
                    has_optional = true;
                    match self.peek_kind() {
                        TokenKind::LBracket => {
                            self.advance();
                            expr = self.parse_index(expr, true)?;
                        }
                        TokenKind::LParen => {
                            self.advance();
                            expr = self.parse_call(expr, true)?;
                        }
                        _ => {
                            let property = self.expect_member_name()?;
                            expr = self.bounded(member(expr, property, true))?;
                        }
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    expr = self.parse_index(expr, false)?;
                }
                TokenKind::LParen => {
                    self.advance();
                    expr = self.parse_call(expr, false)?;
                }
                _ => break,
            }
        }
        if has_optional {
            let span = expr.span;
            expr = Expr::new(ExprKind::OptionalChain(Box::new(expr)), span);
        }
        Some(expr)
    }

    /// Parse `[index]` after the opening bracket has been consumed.
    fn parse_index(&mut self, object: Expr, optional: bool) -> Option<Expr> {
        let index = self.parse_expression()?;
        self.expect(&TokenKind::RBracket)?;
        let span = object.span.merge(self.previous_span());
        self.bounded(Expr::new(
            ExprKind::Index {
                object: Box::new(object),
                index: Box::new(index),
                optional,
            },
            span,
        ))
    }

    /// Parse `(args)` after the opening paren has been consumed.
    fn parse_call(&mut self, callee: Expr, optional: bool) -> Option<Expr> {
        let args = self.parse_comma_list(&TokenKind::RParen)?;
        self.expect(&TokenKind::RParen)?;
        let span = callee.span.merge(self.previous_span());
        self.bounded(Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
                optional,
            },
            span,
        ))
    }

    /// Parse a comma-separated expression list up to (not including) `close`.
    /// A trailing comma is allowed.
    fn parse_comma_list(&mut self, close: &TokenKind) -> Option<Vec<Expr>> {
        let mut items = Vec::new();
        while !self.check_exact(close) {
            items.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Some(items)
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Primary Expressions
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse a primary expression.
    fn parse_primary(&mut self) -> Option<Expr> {
        let start = self.current_span();
        match self.peek_kind().clone() {
            // ── Literals ────────────────────────────────────────────────
            TokenKind::NumberLit(n) => {
                self.advance();
                Some(Expr::new(ExprKind::NumberLit(n), start))
            }
            TokenKind::StringLiteral(s) => {
                self.advance();
                Some(Expr::new(ExprKind::StringLit(s), start))
            }
            TokenKind::True => {
                self.advance();
                Some(Expr::new(ExprKind::BoolLit(true), start))
            }
            TokenKind::False => {
                self.advance();
                Some(Expr::new(ExprKind::BoolLit(false), start))
            }
            TokenKind::Null => {
                self.advance();
                Some(Expr::new(ExprKind::NullLit, start))
            }

            // ── Names ───────────────────────────────────────────────────
            TokenKind::Identifier(name) => {
                self.advance();
                Some(Expr::new(ExprKind::Identifier(name), start))
            }

            // ── Collections ─────────────────────────────────────────────
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_object_literal(),

            // ── Grouping ────────────────────────────────────────────────
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                let span = start.merge(self.previous_span());
                Some(Expr::new(ExprKind::Paren(Box::new(inner)), span))
            }

            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected expression, got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Literals
    // ══════════════════════════════════════════════════════════════════════════

    /// Parse `[expr, ...]`
    fn parse_array_literal(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.advance(); // eat `[`
        let elements = self.parse_comma_list(&TokenKind::RBracket)?;
        self.expect(&TokenKind::RBracket)?;
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::ArrayLit(elements), span))
    }

    /// Parse `{ key: expr, shorthand, "quoted": expr, 1: expr }` or `{}`
    fn parse_object_literal(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.advance(); // eat `{`
        let mut entries = Vec::new();
        while !self.check_exact(&TokenKind::RBrace) {
            let shorthand = matches!(self.peek_kind(), TokenKind::Identifier(_));
            let key = self.expect_property_key()?;
            let value = if self.eat(&TokenKind::Colon) {
                self.parse_expression()?
            } else if shorthand {
                Expr::new(ExprKind::Identifier(key.name.clone()), key.span)
            } else {
                self.expect(&TokenKind::Colon)?;
                return None;
            };
            entries.push(ObjectEntry { key, value });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::ObjectLit(entries), span))
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Node Builders
// ══════════════════════════════════════════════════════════════════════════════

fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}

fn logical(left: Expr, op: LogicalOp, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Logical {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}

fn member(object: Expr, property: Ident, optional: bool) -> Expr {
    let span: Span = object.span.merge(property.span);
    Expr::new(
        ExprKind::Member {
            object: Box::new(object),
            property,
            optional,
        },
        span,
    )
}
