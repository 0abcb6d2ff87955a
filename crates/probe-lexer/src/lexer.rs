//! Expression text to tokens.
//!
//! Numbers may be decimal, exponent or hex; strings use either quote and
//! the usual escapes. Comments and newlines are whitespace. Assignment,
//! arrow and bitwise operators are reported with a hint, and lexing goes on
//! after an error until the diagnostic cap is reached.

use probe_types::{Diagnostics, ErrorCode, ProbeError, SourceText, Span};

use crate::token::{Token, TokenKind};

pub struct Lexer<'src> {
    chars: Vec<char>,
    source: &'src SourceText,
    pos: usize,
    /// 1-based position of `chars[pos]`.
    line: u32,
    col: u32,
    errors: Diagnostics,
}

pub struct LexResult {
    /// Terminated by [`TokenKind::Eof`] even when lexing stopped early.
    pub tokens: Vec<Token>,
    pub errors: Diagnostics,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src SourceText) -> Self {
        Self {
            chars: source.text.chars().collect(),
            source,
            pos: 0,
            line: 1,
            col: 1,
            errors: Diagnostics::empty(),
        }
    }

    /// Tokenize the whole source, stopping once [`probe_types::MAX_ERRORS`]
    /// diagnostics have been collected.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();
        loop {
            if self.errors.is_full() {
                break;
            }
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        if !matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
            tokens.push(Token::new(TokenKind::Eof, self.current_span()));
        }

        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn current_span(&self) -> Span {
        Span::point(self.line, self.col)
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn error(&self, code: ErrorCode, message: impl Into<String>, span: Span) -> ProbeError {
        let source_line = self.source.line(span.start_line).unwrap_or("");
        ProbeError::new(&self.source.name, code, message, span, source_line)
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let err = self.error(code, message, span);
        self.errors.push_error(err);
    }

    fn emit_error_with_suggestion(
        &mut self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        suggestion: impl Into<String>,
    ) {
        let err = self.error(code, message, span).with_suggestion(suggestion);
        self.errors.push_error(err);
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    /// Skip whitespace (including newlines) and comments.
    fn skip_trivia(&mut self) {
        loop {
            match (self.peek(), self.peek_at(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.advance();
                }
                (Some('/'), Some('/')) => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                (Some('/'), Some('*')) => self.skip_block_comment(),
                _ => break,
            }
        }
    }

    fn skip_block_comment(&mut self) {
        let start_line = self.line;
        let start_col = self.col;
        self.advance();
        self.advance();
        loop {
            match self.peek() {
                None => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error(ErrorCode::UNEXPECTED_TOKEN, "Unterminated comment", span);
                    return;
                }
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    return;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Token scanning
    // ─────────────────────────────────────────────────────────────

    /// Scan one token.
    fn scan_token(&mut self) -> Token {
        self.skip_trivia();

        let start_line = self.line;
        let start_col = self.col;
        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, self.current_span());
        };

        let kind = match ch {
            '"' | '\'' => self.scan_string(ch, start_line, start_col),
            '0'..='9' => self.scan_number(ch, start_line, start_col),
            '.' if self.peek().is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number(ch, start_line, start_col)
            }
            c if is_ident_start(c) => self.scan_identifier(c),

            '.' => TokenKind::Dot,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,

            '?' => {
                if self.peek() == Some('.') && !self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                    TokenKind::QuestionDot
                } else if self.eat('?') {
                    TokenKind::QuestionQuestion
                } else {
                    TokenKind::Question
                }
            }

            '=' => {
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::EqEqEq
                    } else {
                        TokenKind::EqEq
                    }
                } else if self.eat('>') {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error_with_suggestion(
                        ErrorCode::UNSUPPORTED_SYNTAX,
                        "Arrow functions are not supported",
                        span,
                        "Pick an existing function from the object graph instead",
                    );
                    return self.recover();
                } else {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error_with_suggestion(
                        ErrorCode::UNSUPPORTED_SYNTAX,
                        "Assignment is not supported; the object graph is read-only",
                        span,
                        "Use '===' to compare values",
                    );
                    return self.recover();
                }
            }

            '!' => {
                if self.eat('=') {
                    if self.eat('=') {
                        TokenKind::BangEqEq
                    } else {
                        TokenKind::BangEq
                    }
                } else {
                    TokenKind::Bang
                }
            }

            '<' => {
                if self.eat('=') {
                    TokenKind::LessEq
                } else {
                    TokenKind::Less
                }
            }

            '>' => {
                if self.eat('=') {
                    TokenKind::GreaterEq
                } else {
                    TokenKind::Greater
                }
            }

            '&' | '|' => {
                if self.eat(ch) {
                    if ch == '&' {
                        TokenKind::AmpAmp
                    } else {
                        TokenKind::PipePipe
                    }
                } else {
                    let span = self.span_from(start_line, start_col);
                    let doubled = if ch == '&' { "&&" } else { "||" };
                    self.emit_error_with_suggestion(
                        ErrorCode::UNSUPPORTED_SYNTAX,
                        format!("Bitwise operator '{ch}' is not supported"),
                        span,
                        format!("Use '{doubled}' for logical operations"),
                    );
                    return self.recover();
                }
            }

            other => {
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("Unexpected character '{other}'"),
                    span,
                );
                return self.recover();
            }
        };

        Token::new(kind, self.span_from(start_line, start_col))
    }

    /// Error recovery: skip the offending lexeme and scan the next token,
    /// unless the error budget is spent.
    fn recover(&mut self) -> Token {
        if self.errors.is_full() {
            return Token::new(TokenKind::Eof, self.current_span());
        }
        self.scan_token()
    }

    // ─────────────────────────────────────────────────────────────
    // Number literals
    // ─────────────────────────────────────────────────────────────

    fn scan_number(&mut self, first: char, start_line: u32, start_col: u32) -> TokenKind {
        let mut text = if first == '.' {
            String::from("0.")
        } else {
            String::from(first)
        };

        if first == '0' && matches!(self.peek(), Some('x' | 'X')) {
            self.advance();
            let mut value = 0.0_f64;
            let mut any_digit = false;
            while let Some(digit) = self.peek().and_then(|c| c.to_digit(16)) {
                value = value * 16.0 + f64::from(digit);
                any_digit = true;
                self.advance();
            }
            if !any_digit {
                let span = self.span_from(start_line, start_col);
                self.emit_error(ErrorCode::INVALID_NUMBER, "Invalid hexadecimal literal", span);
                return TokenKind::NumberLit(f64::NAN);
            }
            return self.finish_number(value, start_line, start_col);
        }

        self.take_digits(&mut text);
        // `1.` is a complete literal; `1..toString()` reads a member of it.
        if first != '.' && self.peek() == Some('.') {
            text.push('.');
            self.advance();
            self.take_digits(&mut text);
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            text.push('e');
            self.advance();
            if let Some(sign) = self.peek().filter(|c| matches!(c, '+' | '-')) {
                text.push(sign);
                self.advance();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                let span = self.span_from(start_line, start_col);
                self.emit_error(ErrorCode::INVALID_NUMBER, "Missing exponent digits", span);
                return TokenKind::NumberLit(f64::NAN);
            }
            self.take_digits(&mut text);
        }

        let value = text.parse().unwrap_or(f64::NAN);
        self.finish_number(value, start_line, start_col)
    }

    fn take_digits(&mut self, text: &mut String) {
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            text.push(c);
            self.advance();
        }
    }

    /// A number must not run straight into an identifier (`3px`).
    fn finish_number(&mut self, value: f64, start_line: u32, start_col: u32) -> TokenKind {
        if self.peek().is_some_and(is_ident_start) {
            while self.peek().is_some_and(is_ident_part) {
                self.advance();
            }
            let span = self.span_from(start_line, start_col);
            self.emit_error(
                ErrorCode::INVALID_NUMBER,
                "Identifier starts immediately after numeric literal",
                span,
            );
        }
        TokenKind::NumberLit(value)
    }

    // ─────────────────────────────────────────────────────────────
    // Identifiers & keywords
    // ─────────────────────────────────────────────────────────────

    fn scan_identifier(&mut self, first: char) -> TokenKind {
        let mut text = String::from(first);
        while let Some(c) = self.peek().filter(|c| is_ident_part(*c)) {
            text.push(c);
            self.advance();
        }
        TokenKind::from_keyword(&text).unwrap_or(TokenKind::Identifier(text))
    }

    // ─────────────────────────────────────────────────────────────
    // String literals
    // ─────────────────────────────────────────────────────────────

    /// Scan a string literal starting after the opening quote.
    fn scan_string(&mut self, quote: char, start_line: u32, start_col: u32) -> TokenKind {
        let mut buf = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error(
                        ErrorCode::UNTERMINATED_STRING,
                        "Unterminated string literal",
                        span,
                    );
                    return TokenKind::StringLiteral(buf);
                }
                Some(c) if c == quote => {
                    self.advance();
                    return TokenKind::StringLiteral(buf);
                }
                Some('\\') => {
                    if let Some(escaped) = self.scan_escape_sequence() {
                        buf.push(escaped);
                    }
                }
                Some(c) => {
                    self.advance();
                    buf.push(c);
                }
            }
        }
    }

    /// Scan an escape sequence starting at the `\`.
    /// Returns the unescaped character, or `None` for a line continuation or
    /// an invalid escape (error emitted).
    fn scan_escape_sequence(&mut self) -> Option<char> {
        let start_line = self.line;
        let start_col = self.col;
        self.advance();

        match self.advance() {
            Some('n') => Some('\n'),
            Some('t') => Some('\t'),
            Some('r') => Some('\r'),
            Some('b') => Some('\u{8}'),
            Some('f') => Some('\u{c}'),
            Some('v') => Some('\u{b}'),
            Some('0') => Some('\0'),
            Some('\n') => None,
            Some('x') => self.scan_code_point(2, start_line, start_col),
            Some('u') => {
                if self.eat('{') {
                    let mut digits = String::new();
                    while let Some(c) = self.peek().filter(char::is_ascii_hexdigit) {
                        digits.push(c);
                        self.advance();
                    }
                    if !self.eat('}') {
                        digits.clear();
                    }
                    self.code_point(&digits, start_line, start_col)
                } else {
                    self.scan_code_point(4, start_line, start_col)
                }
            }
            // Any other escaped character stands for itself: \\ \' \" \q
            Some(ch) => Some(ch),
            None => {
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::UNTERMINATED_STRING,
                    "Unexpected end of input in escape sequence",
                    span,
                );
                None
            }
        }
    }

    fn scan_code_point(&mut self, len: usize, start_line: u32, start_col: u32) -> Option<char> {
        let mut digits = String::new();
        for _ in 0..len {
            match self.peek().filter(char::is_ascii_hexdigit) {
                Some(c) => {
                    digits.push(c);
                    self.advance();
                }
                None => {
                    digits.clear();
                    break;
                }
            }
        }
        self.code_point(&digits, start_line, start_col)
    }

    fn code_point(&mut self, digits: &str, start_line: u32, start_col: u32) -> Option<char> {
        let decoded = u32::from_str_radix(digits, 16).ok().and_then(char::from_u32);
        if decoded.is_none() {
            let span = self.span_from(start_line, start_col);
            self.emit_error(ErrorCode::INVALID_ESCAPE, "Invalid Unicode escape sequence", span);
        }
        decoded
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}
