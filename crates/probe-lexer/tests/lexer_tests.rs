//! Lexer tests.
//!
//! Covers: keywords, operators, optional-chaining punctuation, number and
//! string literals, comments, rejected syntax, spans and error recovery.

use probe_lexer::{Lexer, TokenKind};
use probe_types::{ErrorCode, SourceText};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    let src = SourceText::expression(source);
    Lexer::new(&src)
        .lex()
        .tokens
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

/// Lex and return the error count.
fn error_count(source: &str) -> usize {
    let src = SourceText::expression(source);
    Lexer::new(&src).lex().errors.total_errors
}

/// Lex and return the first error's code and message.
fn first_error(source: &str) -> (ErrorCode, String) {
    let src = SourceText::expression(source);
    let result = Lexer::new(&src).lex();
    let err = result.errors.first().expect("expected a lex error");
    (err.code, err.message.clone())
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Identifier(name.to_string())
}

fn string(text: &str) -> TokenKind {
    TokenKind::StringLiteral(text.to_string())
}

// ─────────────────────────────────────────────────────────────────────
// Keywords & identifiers
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_keywords() {
    assert_eq!(
        kinds("true false null typeof"),
        vec![
            TokenKind::True,
            TokenKind::False,
            TokenKind::Null,
            TokenKind::Typeof
        ]
    );
}

#[test]
fn test_undefined_is_an_identifier() {
    assert_eq!(kinds("undefined"), vec![ident("undefined")]);
}

#[test]
fn test_identifier_characters() {
    assert_eq!(
        kinds("_private $ref camelCase2"),
        vec![ident("_private"), ident("$ref"), ident("camelCase2")]
    );
}

#[test]
fn test_member_path() {
    assert_eq!(
        kinds("host.window.activeTextEditor"),
        vec![
            ident("host"),
            TokenKind::Dot,
            ident("window"),
            TokenKind::Dot,
            ident("activeTextEditor"),
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Operators & punctuation
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_arithmetic_operators() {
    assert_eq!(
        kinds("+ - * / %"),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent
        ]
    );
}

#[test]
fn test_comparison_operators() {
    assert_eq!(
        kinds("== != === !== < <= > >="),
        vec![
            TokenKind::EqEq,
            TokenKind::BangEq,
            TokenKind::EqEqEq,
            TokenKind::BangEqEq,
            TokenKind::Less,
            TokenKind::LessEq,
            TokenKind::Greater,
            TokenKind::GreaterEq,
        ]
    );
}

#[test]
fn test_logical_operators() {
    assert_eq!(
        kinds("! && || ??"),
        vec![
            TokenKind::Bang,
            TokenKind::AmpAmp,
            TokenKind::PipePipe,
            TokenKind::QuestionQuestion
        ]
    );
}

#[test]
fn test_optional_chaining() {
    assert_eq!(
        kinds("a?.b?.[0]"),
        vec![
            ident("a"),
            TokenKind::QuestionDot,
            ident("b"),
            TokenKind::QuestionDot,
            TokenKind::LBracket,
            TokenKind::NumberLit(0.0),
            TokenKind::RBracket,
        ]
    );
}

#[test]
fn test_question_dot_before_digit_is_conditional() {
    assert_eq!(
        kinds("a?.5:1"),
        vec![
            ident("a"),
            TokenKind::Question,
            TokenKind::NumberLit(0.5),
            TokenKind::Colon,
            TokenKind::NumberLit(1.0),
        ]
    );
}

#[test]
fn test_brackets_and_braces() {
    assert_eq!(
        kinds("[](){},:"),
        vec![
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::RBrace,
            TokenKind::Comma,
            TokenKind::Colon,
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Number literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_numbers() {
    assert_eq!(
        kinds("0 42 3.25 .5 1e3 2E-2 0xff"),
        vec![
            TokenKind::NumberLit(0.0),
            TokenKind::NumberLit(42.0),
            TokenKind::NumberLit(3.25),
            TokenKind::NumberLit(0.5),
            TokenKind::NumberLit(1000.0),
            TokenKind::NumberLit(0.02),
            TokenKind::NumberLit(255.0),
        ]
    );
}

#[test]
fn test_number_followed_by_member_access() {
    assert_eq!(
        kinds("1..toString"),
        vec![TokenKind::NumberLit(1.0), TokenKind::Dot, ident("toString")]
    );
}

#[test]
fn test_trailing_dot_numbers() {
    assert_eq!(
        kinds("1. 2.e3 (7.)"),
        vec![
            TokenKind::NumberLit(1.0),
            TokenKind::NumberLit(2000.0),
            TokenKind::LParen,
            TokenKind::NumberLit(7.0),
            TokenKind::RParen,
        ]
    );
}

#[test]
fn test_name_glued_to_trailing_dot() {
    let (code, _) = first_error("1.toString");
    assert_eq!(code, ErrorCode::INVALID_NUMBER);
}

#[test]
fn test_wide_hex_literals() {
    assert_eq!(
        kinds("0x1ffffffffffffffff 0XFF"),
        vec![
            TokenKind::NumberLit(36893488147419103232.0),
            TokenKind::NumberLit(255.0),
        ]
    );
}

#[test]
fn test_missing_exponent_digits() {
    let (code, msg) = first_error("1e");
    assert_eq!(code, ErrorCode::INVALID_NUMBER);
    assert!(msg.contains("exponent"));
}

#[test]
fn test_identifier_glued_to_number() {
    let (code, _) = first_error("3px");
    assert_eq!(code, ErrorCode::INVALID_NUMBER);
}

#[test]
fn test_empty_hex_literal() {
    let (code, _) = first_error("0x");
    assert_eq!(code, ErrorCode::INVALID_NUMBER);
}

// ─────────────────────────────────────────────────────────────────────
// String literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_both_quote_styles() {
    assert_eq!(
        kinds(r#"'single' "double" 'it"s' "it's""#),
        vec![
            string("single"),
            string("double"),
            string("it\"s"),
            string("it's")
        ]
    );
}

#[test]
fn test_simple_escapes() {
    assert_eq!(
        kinds(r#""a\nb\tc\\d\'e\"f""#),
        vec![string("a\nb\tc\\d'e\"f")]
    );
}

#[test]
fn test_unicode_escapes() {
    assert_eq!(
        kinds(r#""\x41B\u{1F600}""#),
        vec![string("AB\u{1F600}")]
    );
}

#[test]
fn test_unknown_escape_keeps_character() {
    assert_eq!(kinds(r#""\q""#), vec![string("q")]);
}

#[test]
fn test_invalid_unicode_escape() {
    let (code, _) = first_error(r#""\uZZZZ""#);
    assert_eq!(code, ErrorCode::INVALID_ESCAPE);
}

#[test]
fn test_unterminated_string() {
    let (code, msg) = first_error("'open");
    assert_eq!(code, ErrorCode::UNTERMINATED_STRING);
    assert_eq!(msg, "Unterminated string literal");
}

#[test]
fn test_string_cannot_span_lines() {
    let (code, _) = first_error("'line\nnext'");
    assert_eq!(code, ErrorCode::UNTERMINATED_STRING);
}

// ─────────────────────────────────────────────────────────────────────
// Comments & whitespace
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_line_comment() {
    assert_eq!(
        kinds("1 // trailing\n+ 2"),
        vec![
            TokenKind::NumberLit(1.0),
            TokenKind::Plus,
            TokenKind::NumberLit(2.0)
        ]
    );
}

#[test]
fn test_block_comment() {
    assert_eq!(kinds("a /* b */ c"), vec![ident("a"), ident("c")]);
}

#[test]
fn test_unterminated_block_comment() {
    assert_eq!(first_error("a /* b").1, "Unterminated comment");
}

#[test]
fn test_empty_source_yields_only_eof() {
    let src = SourceText::expression("   \n\t ");
    let result = Lexer::new(&src).lex();
    assert_eq!(result.tokens.len(), 1);
    assert_eq!(result.tokens[0].kind, TokenKind::Eof);
    assert!(!result.errors.has_errors());
}

// ─────────────────────────────────────────────────────────────────────
// Rejected syntax
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_assignment_rejected() {
    let src = SourceText::expression("a = 1");
    let result = Lexer::new(&src).lex();
    let err = result.errors.first().expect("error");
    assert_eq!(err.code, ErrorCode::UNSUPPORTED_SYNTAX);
    assert_eq!(err.suggestion.as_deref(), Some("Use '===' to compare values"));
    // The `=` is skipped and lexing continues.
    let kinds: Vec<_> = result.tokens.into_iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![ident("a"), TokenKind::NumberLit(1.0), TokenKind::Eof]
    );
}

#[test]
fn test_arrow_rejected() {
    let (code, msg) = first_error("x => x");
    assert_eq!(code, ErrorCode::UNSUPPORTED_SYNTAX);
    assert!(msg.contains("Arrow"));
}

#[test]
fn test_bitwise_rejected() {
    assert_eq!(first_error("a & b").0, ErrorCode::UNSUPPORTED_SYNTAX);
    assert_eq!(first_error("a | b").0, ErrorCode::UNSUPPORTED_SYNTAX);
}

#[test]
fn test_unexpected_character() {
    let (code, msg) = first_error("a # b");
    assert_eq!(code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(msg, "Unexpected character '#'");
}

// ─────────────────────────────────────────────────────────────────────
// Spans & error recovery
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_token_spans() {
    let src = SourceText::expression("ab +\n  cd");
    let tokens = Lexer::new(&src).lex().tokens;
    assert_eq!((tokens[0].span.start_col, tokens[0].span.end_col), (1, 2));
    assert_eq!(tokens[1].span.start_col, 4);
    assert_eq!((tokens[2].span.start_line, tokens[2].span.start_col), (2, 3));
}

#[test]
fn test_multiple_errors_collected() {
    assert_eq!(error_count("# @ ~"), 3);
}

#[test]
fn test_error_cap() {
    let source = "#".repeat(30);
    assert_eq!(error_count(&source), probe_types::MAX_ERRORS);
}

#[test]
fn test_error_reports_source_line() {
    let src = SourceText::expression("host.window\n  #");
    let result = Lexer::new(&src).lex();
    let err = result.errors.first().expect("error");
    assert_eq!(err.span.start_line, 2);
    assert_eq!(err.source_line, "  #");
}

#[test]
fn test_determinism() {
    let source = "host?.window.showInformationMessage('hi', 1 + 2 * 3) ?? null";
    let first = kinds(source);
    for _ in 0..20 {
        assert_eq!(kinds(source), first);
    }
}
