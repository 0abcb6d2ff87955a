//! Error types for the probe evaluator.

use probe_types::{Diagnostics, ErrorCategory, ErrorKind, ThrownError};
use thiserror::Error;

/// Why a result could not be rendered as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    /// The value graph contains a cycle.
    #[error("Converting circular structure to JSON")]
    Circular,
    /// The value graph nests deeper than the serializer follows.
    #[error("Maximum nesting depth of {0} exceeded while serializing")]
    TooDeep(usize),
}

impl From<SerializationError> for ThrownError {
    fn from(err: SerializationError) -> Self {
        ThrownError::type_error(err.to_string())
    }
}

/// An expression that could not be evaluated or rendered.
///
/// Displays as the thrown error would convert to a string, so the outcome
/// text is always `"Error: " + self`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// The expression text is malformed.
    #[error("SyntaxError: {}", first_message(.0))]
    Syntax(Diagnostics),
    /// Evaluation threw.
    #[error(transparent)]
    Thrown(#[from] ThrownError),
    /// The result could not be serialized.
    #[error("TypeError: {0}")]
    Serialization(#[from] SerializationError),
}

impl EvaluationError {
    /// The diagnostic category, for logging.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Syntax(_) => ErrorCategory::Syntax,
            Self::Thrown(thrown) if thrown.kind == ErrorKind::ReferenceError => {
                ErrorCategory::Reference
            }
            Self::Thrown(thrown) if thrown.kind == ErrorKind::SyntaxError => ErrorCategory::Syntax,
            Self::Thrown(_) => ErrorCategory::Type,
            Self::Serialization(_) => ErrorCategory::Serialization,
        }
    }
}

fn first_message(diagnostics: &Diagnostics) -> &str {
    diagnostics
        .first()
        .map_or("invalid expression", |e| e.message.as_str())
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvaluationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use probe_types::{ErrorCode, ProbeError, Span};

    #[test]
    fn test_display_reads_like_a_thrown_error() {
        let thrown = EvaluationError::from(ThrownError::reference_error("x is not defined"));
        assert_eq!(thrown.to_string(), "ReferenceError: x is not defined");
        assert_eq!(thrown.category(), ErrorCategory::Reference);

        let circular = EvaluationError::from(SerializationError::Circular);
        assert_eq!(
            circular.to_string(),
            "TypeError: Converting circular structure to JSON"
        );
    }

    #[test]
    fn test_syntax_error_uses_first_diagnostic() {
        let mut diags = Diagnostics::empty();
        diags.push_error(ProbeError::new(
            "<expression>",
            ErrorCode::UNEXPECTED_TOKEN,
            "expected expression, got 'end of input'",
            Span::point(1, 4),
            "1 +",
        ));
        let err = EvaluationError::Syntax(diags);
        assert_eq!(
            err.to_string(),
            "SyntaxError: expected expression, got 'end of input'"
        );
        assert_eq!(err.category(), ErrorCategory::Syntax);
    }
}
