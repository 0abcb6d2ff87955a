//! Token types for the probe lexer.
//!
//! Defines [`TokenKind`] covering every lexeme of the expression grammar and
//! [`Token`], which pairs a kind with a source [`Span`].

use probe_types::Span;
use std::fmt;

/// Reserved words recognised by the lexer.
///
/// `undefined`, `NaN` and `Infinity` are deliberately absent: they are
/// ordinary identifiers resolved from the ambient environment.
pub const ALL_KEYWORDS: &[&str] = &["true", "false", "null", "typeof"];

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Source location.
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns `true` if this token is a reserved keyword.
    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

/// Every token kind in the expression grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────
    /// Numeric literal: `42`, `3.14`, `1e3`, `0xff`
    NumberLit(f64),
    /// Quoted string literal, escapes already resolved
    StringLiteral(String),
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,

    // ── Names ─────────────────────────────────────────────────
    /// Identifier: `host`, `_private`, `$ref`
    Identifier(String),
    /// `typeof`
    Typeof,

    // ── Punctuation ───────────────────────────────────────────
    /// `.`
    Dot,
    /// `?.`
    QuestionDot,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `?`
    Question,

    // ── Operators ─────────────────────────────────────────────
    /// `??`
    QuestionQuestion,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `!`
    Bang,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `===`
    EqEqEq,
    /// `!==`
    BangEqEq,
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Map a word to its keyword token, if it is one.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "true" => Some(Self::True),
            "false" => Some(Self::False),
            "null" => Some(Self::Null),
            "typeof" => Some(Self::Typeof),
            _ => None,
        }
    }

    pub fn is_keyword(&self) -> bool {
        matches!(self, Self::True | Self::False | Self::Null | Self::Typeof)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumberLit(n) => write!(f, "{}", probe_types::format_number(*n)),
            Self::StringLiteral(s) => write!(f, "{s:?}"),
            Self::Identifier(name) => f.write_str(name),
            Self::True => f.write_str("true"),
            Self::False => f.write_str("false"),
            Self::Null => f.write_str("null"),
            Self::Typeof => f.write_str("typeof"),
            Self::Dot => f.write_str("."),
            Self::QuestionDot => f.write_str("?."),
            Self::LBracket => f.write_str("["),
            Self::RBracket => f.write_str("]"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::LBrace => f.write_str("{"),
            Self::RBrace => f.write_str("}"),
            Self::Comma => f.write_str(","),
            Self::Colon => f.write_str(":"),
            Self::Question => f.write_str("?"),
            Self::QuestionQuestion => f.write_str("??"),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::Percent => f.write_str("%"),
            Self::Bang => f.write_str("!"),
            Self::EqEq => f.write_str("=="),
            Self::BangEq => f.write_str("!="),
            Self::EqEqEq => f.write_str("==="),
            Self::BangEqEq => f.write_str("!=="),
            Self::Less => f.write_str("<"),
            Self::LessEq => f.write_str("<="),
            Self::Greater => f.write_str(">"),
            Self::GreaterEq => f.write_str(">="),
            Self::AmpAmp => f.write_str("&&"),
            Self::PipePipe => f.write_str("||"),
            Self::Eof => f.write_str("end of input"),
        }
    }
}
