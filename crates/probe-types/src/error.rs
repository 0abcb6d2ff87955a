use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostics kept per expression; later ones are only counted.
pub const MAX_ERRORS: usize = 20;

/// Broad class of a failure. Lexer and parser diagnostics are always
/// [`ErrorCategory::Syntax`]; the rest classify runtime errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Reference,
    Type,
    Serialization,
}

/// Numeric syntax error code (E100–E199).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax errors (E100–E199) ──
    pub const UNEXPECTED_TOKEN: Self = Self(100);
    pub const UNTERMINATED_STRING: Self = Self(101);
    pub const INVALID_ESCAPE: Self = Self(102);
    pub const INVALID_NUMBER: Self = Self(103);
    pub const NESTING_LIMIT_EXCEEDED: Self = Self(104);
    pub const TRAILING_INPUT: Self = Self(105);
    pub const UNSUPPORTED_SYNTAX: Self = Self(106);
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// A structured diagnostic produced while reading an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeError {
    pub source: String,
    pub code: ErrorCode,
    pub category: ErrorCategory,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
    /// The line of the expression the span points into.
    pub source_line: String,
    /// How to rewrite the expression, when there is an obvious fix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ProbeError {
    pub fn new(
        source: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            code,
            category: ErrorCategory::Syntax,
            message: message.into(),
            span,
            source_line: source_line.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.span, self.code, self.category, self.message
        )
    }
}

impl std::error::Error for ProbeError {}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Reference => write!(f, "reference"),
            Self::Type => write!(f, "type"),
            Self::Serialization => write!(f, "serialization"),
        }
    }
}

/// Errors collected by the lexer and parser for one expression.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub errors: Vec<ProbeError>,
    pub total_errors: usize,
}

impl Diagnostics {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Returns `true` once the fail-fast limit has been reached.
    pub fn is_full(&self) -> bool {
        self.total_errors >= MAX_ERRORS
    }

    /// The first error, which is what gets shown to the user.
    pub fn first(&self) -> Option<&ProbeError> {
        self.errors.first()
    }

    /// Record an error; past [`MAX_ERRORS`] it is counted but dropped.
    pub fn push_error(&mut self, error: ProbeError) {
        if self.errors.len() < MAX_ERRORS {
            self.errors.push(error);
        }
        self.total_errors += 1;
    }

    /// Append every error from another collection.
    pub fn extend(&mut self, other: Diagnostics) {
        let extra = other.total_errors.saturating_sub(other.errors.len());
        for error in other.errors {
            self.push_error(error);
        }
        self.total_errors += extra;
    }
}
