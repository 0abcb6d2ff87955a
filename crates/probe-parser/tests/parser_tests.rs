//! Parser tests.
//!
//! Covers: literals, precedence and associativity, postfix chains with
//! optional links, object and array literals, error reporting, the nesting
//! limit and the `parse_expression` convenience pipeline.

use probe_lexer::Lexer;
use probe_parser::{
    parse_expression, ParseResult, Parser, MAX_EXPRESSION_HEIGHT, MAX_NESTING_DEPTH,
};
use probe_types::ast::*;
use probe_types::{ErrorCode, SourceText};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Parse source and return the result (expression + errors).
fn parse(source: &str) -> ParseResult {
    let src = SourceText::expression(source);
    let lex = Lexer::new(&src).lex();
    Parser::new(lex.tokens, &src).parse()
}

/// Parse source and return the expression, panicking if there are errors.
fn parse_ok(source: &str) -> Expr {
    let result = parse(source);
    if result.errors.has_errors() {
        for e in &result.errors.errors {
            eprintln!("  ERROR: {} ({})", e.message, e.code);
        }
        panic!("unexpected parse errors (see above)");
    }
    result.expr.expect("no expression returned")
}

/// Parse source and return the first error's code and message.
fn first_error(source: &str) -> (ErrorCode, String) {
    let result = parse(source);
    let err = result.errors.first().expect("expected a parse error");
    (err.code, err.message.clone())
}

/// Render an expression as a fully parenthesized string, for
/// precedence assertions.
fn sexpr(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::NumberLit(n) => probe_types::format_number(*n),
        ExprKind::StringLit(s) => format!("{s:?}"),
        ExprKind::BoolLit(b) => b.to_string(),
        ExprKind::NullLit => "null".into(),
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::ArrayLit(items) => {
            let items: Vec<_> = items.iter().map(sexpr).collect();
            format!("[{}]", items.join(" "))
        }
        ExprKind::ObjectLit(entries) => {
            let entries: Vec<_> = entries
                .iter()
                .map(|e| format!("{}:{}", e.key.name, sexpr(&e.value)))
                .collect();
            format!("{{{}}}", entries.join(" "))
        }
        ExprKind::Member {
            object,
            property,
            optional,
        } => {
            let dot = if *optional { "?." } else { "." };
            format!("{}{dot}{}", sexpr(object), property.name)
        }
        ExprKind::Index {
            object,
            index,
            optional,
        } => {
            let dot = if *optional { "?." } else { "" };
            format!("{}{dot}[{}]", sexpr(object), sexpr(index))
        }
        ExprKind::Call {
            callee,
            args,
            optional,
        } => {
            let dot = if *optional { "?." } else { "" };
            let args: Vec<_> = args.iter().map(sexpr).collect();
            format!("{}{dot}({})", sexpr(callee), args.join(" "))
        }
        ExprKind::OptionalChain(inner) => format!("<{}>", sexpr(inner)),
        ExprKind::Unary { op, operand } => format!("({op} {})", sexpr(operand)),
        ExprKind::Binary { left, op, right } => {
            format!("({op} {} {})", sexpr(left), sexpr(right))
        }
        ExprKind::Logical { left, op, right } => {
            format!("({op} {} {})", sexpr(left), sexpr(right))
        }
        ExprKind::Conditional {
            test,
            consequent,
            alternate,
        } => format!(
            "(? {} {} {})",
            sexpr(test),
            sexpr(consequent),
            sexpr(alternate)
        ),
        ExprKind::Paren(inner) => sexpr(inner),
    }
}

fn shape(source: &str) -> String {
    sexpr(&parse_ok(source))
}

// ─────────────────────────────────────────────────────────────────────
// Literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_literals() {
    assert_eq!(parse_ok("42").kind, ExprKind::NumberLit(42.0));
    assert_eq!(parse_ok("'hi'").kind, ExprKind::StringLit("hi".into()));
    assert_eq!(parse_ok("true").kind, ExprKind::BoolLit(true));
    assert_eq!(parse_ok("null").kind, ExprKind::NullLit);
    assert_eq!(
        parse_ok("undefined").kind,
        ExprKind::Identifier("undefined".into())
    );
}

#[test]
fn test_array_literal() {
    assert_eq!(shape("[1, 'a', [true]]"), r#"[1 "a" [true]]"#);
    assert_eq!(shape("[]"), "[]");
    assert_eq!(shape("[1, 2,]"), "[1 2]");
}

#[test]
fn test_object_literal() {
    assert_eq!(shape("{}"), "{}");
    assert_eq!(shape("{a: 1, 'b c': 2, 3: x}"), "{a:1 b c:2 3:x}");
    assert_eq!(shape("{host, null: 1}"), "{host:host null:1}");
}

#[test]
fn test_object_literal_requires_colon_after_string_key() {
    let (code, msg) = first_error("{'a'}");
    assert_eq!(code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(msg, "expected ':', got '}'");
}

// ─────────────────────────────────────────────────────────────────────
// Precedence & associativity
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_multiplication_binds_tighter() {
    assert_eq!(shape("1 + 2 * 3"), "(+ 1 (* 2 3))");
    assert_eq!(shape("(1 + 2) * 3"), "(* (+ 1 2) 3)");
}

#[test]
fn test_left_associative_arithmetic() {
    assert_eq!(shape("10 - 4 - 3"), "(- (- 10 4) 3)");
}

#[test]
fn test_comparison_and_equality() {
    assert_eq!(shape("a < b === c > d"), "(=== (< a b) (> c d))");
    assert_eq!(shape("1 < 2 < 3"), "(< (< 1 2) 3)");
}

#[test]
fn test_logical_precedence() {
    assert_eq!(shape("a || b && c"), "(|| a (&& b c))");
    assert_eq!(shape("a ?? b ?? c"), "(?? (?? a b) c)");
}

#[test]
fn test_conditional_is_right_associative() {
    assert_eq!(shape("a ? b : c ? d : e"), "(? a b (? c d e))");
}

#[test]
fn test_unary_operators() {
    assert_eq!(shape("!a"), "(! a)");
    assert_eq!(shape("-x * 2"), "(* (- x) 2)");
    assert_eq!(shape("typeof host.window"), "(typeof host.window)");
    assert_eq!(shape("!!a"), "(! (! a))");
}

#[test]
fn test_coalesce_cannot_mix_with_or() {
    let (code, msg) = first_error("a || b ?? c");
    assert_eq!(code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(msg, "cannot mix '??' with '||' or '&&'");
    assert_eq!(shape("(a || b) ?? c"), "(?? (|| a b) c)");
}

// ─────────────────────────────────────────────────────────────────────
// Postfix chains
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_member_chain() {
    assert_eq!(
        shape("host.window.activeTextEditor"),
        "host.window.activeTextEditor"
    );
}

#[test]
fn test_keyword_member_names() {
    assert_eq!(shape("a.null.typeof"), "a.null.typeof");
}

#[test]
fn test_index_and_call() {
    assert_eq!(shape("list[0].name"), "list[0].name");
    assert_eq!(
        shape("host.commands.getCommands(true)[1]"),
        "host.commands.getCommands(true)[1]"
    );
    assert_eq!(shape("f()()"), "f()()");
}

#[test]
fn test_call_arguments() {
    assert_eq!(shape("Math.max(1, 2 + 3, x)"), "Math.max(1 (+ 2 3) x)");
    assert_eq!(shape("f(1,)"), "f(1)");
}

#[test]
fn test_optional_chain_wraps_whole_chain() {
    assert_eq!(shape("a?.b.c"), "<a?.b.c>");
    assert_eq!(shape("a?.[0]?.(1)"), "<a?.[0]?.(1)>");
}

#[test]
fn test_parens_end_an_optional_chain() {
    assert_eq!(shape("(a?.b).c"), "<a?.b>.c");
}

#[test]
fn test_spans_cover_whole_expression() {
    let expr = parse_ok("host.window");
    assert_eq!((expr.span.start_col, expr.span.end_col), (1, 11));
}

// ─────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_input() {
    let (code, msg) = first_error("");
    assert_eq!(code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(msg, "expected expression, got 'end of input'");
}

#[test]
fn test_trailing_input() {
    let (code, msg) = first_error("a b");
    assert_eq!(code, ErrorCode::TRAILING_INPUT);
    assert_eq!(msg, "unexpected 'b' after end of expression");
}

#[test]
fn test_unclosed_call() {
    let (code, msg) = first_error("f(1, 2");
    assert_eq!(code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(msg, "expected ')', got 'end of input'");
}

#[test]
fn test_missing_property_name() {
    let (_, msg) = first_error("a.");
    assert_eq!(msg, "expected property name, got 'end of input'");
}

#[test]
fn test_conditional_missing_colon() {
    let (_, msg) = first_error("a ? b");
    assert_eq!(msg, "expected ':', got 'end of input'");
}

#[test]
fn test_nesting_limit() {
    let depth = MAX_NESTING_DEPTH as usize + 5;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    let (code, _) = first_error(&source);
    assert_eq!(code, ErrorCode::NESTING_LIMIT_EXCEEDED);
}

#[test]
fn test_nesting_within_limit() {
    let source = format!("{}1{}", "[".repeat(30), "]".repeat(30));
    parse_ok(&source);
}

#[test]
fn test_deep_unary_chain_is_limited() {
    let source = format!("{}a", "!".repeat(200));
    let (code, _) = first_error(&source);
    assert_eq!(code, ErrorCode::NESTING_LIMIT_EXCEEDED);
}

#[test]
fn test_long_binary_chain_is_limited() {
    let source = format!("1{}", "+1".repeat(100_000));
    let (code, msg) = first_error(&source);
    assert_eq!(code, ErrorCode::NESTING_LIMIT_EXCEEDED);
    assert!(msg.contains(&MAX_EXPRESSION_HEIGHT.to_string()));
}

#[test]
fn test_long_postfix_chains_are_limited() {
    for source in [
        format!("a{}", ".b".repeat(100_000)),
        format!("x{}", "[0]".repeat(100_000)),
        format!("f{}", "()".repeat(100_000)),
        format!("a{}", "?.b".repeat(100_000)),
    ] {
        let (code, _) = first_error(&source);
        assert_eq!(code, ErrorCode::NESTING_LIMIT_EXCEEDED);
    }
}

#[test]
fn test_chain_height_counts_nested_operands() {
    let inner = format!("(1{})", "+1".repeat(200));
    let source = format!("{inner}{}", "*2".repeat(100));
    let (code, _) = first_error(&source);
    assert_eq!(code, ErrorCode::NESTING_LIMIT_EXCEEDED);
}

#[test]
fn test_chain_within_height_limit() {
    let source = format!("a{}", ".b".repeat(200));
    let expr = parse_ok(&source);
    assert_eq!(expr.height(), 201);
}

// ─────────────────────────────────────────────────────────────────────
// parse_expression pipeline
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_pipeline_ok() {
    let src = SourceText::expression("1 + 1");
    let expr = parse_expression(&src).expect("parses");
    assert!(matches!(expr.kind, ExprKind::Binary { op: BinOp::Add, .. }));
}

#[test]
fn test_pipeline_reports_lex_errors_first() {
    let src = SourceText::expression("'open");
    let errors = parse_expression(&src).expect_err("lex error");
    assert_eq!(errors.errors[0].code, ErrorCode::UNTERMINATED_STRING);
}

#[test]
fn test_pipeline_reports_parse_errors() {
    let src = SourceText::expression("1 +");
    let errors = parse_expression(&src).expect_err("parse error");
    assert_eq!(errors.errors[0].code, ErrorCode::UNEXPECTED_TOKEN);
}
