//! Probe parser: converts a token stream into an expression AST.

mod parse_expr;
mod parser;

pub use parser::{ParseResult, Parser, MAX_EXPRESSION_HEIGHT, MAX_NESTING_DEPTH};

use probe_lexer::Lexer;
use probe_types::ast::Expr;
use probe_types::{Diagnostics, SourceText};

/// Lex and parse a complete expression.
///
/// Lexer errors stop the pipeline before parsing; otherwise the parser's
/// diagnostics are returned when it could not produce a clean tree.
pub fn parse_expression(source: &SourceText) -> Result<Expr, Diagnostics> {
    let lexed = Lexer::new(source).lex();
    if lexed.errors.has_errors() {
        return Err(lexed.errors);
    }
    let parsed = Parser::new(lexed.tokens, source).parse();
    match parsed.expr {
        Some(expr) if !parsed.errors.has_errors() => Ok(expr),
        _ => Err(parsed.errors),
    }
}
