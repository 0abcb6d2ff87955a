//! Evaluate-and-render: the text shown for an expression's result.

use crate::env::Environment;
use crate::error::{EvalResult, EvaluationError};
use crate::evaluator::Evaluator;
use crate::json;
use probe_types::{SourceText, Value};
use serde::{Deserialize, Serialize};

/// The classified result of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationOutcome {
    pub succeeded: bool,
    pub rendered_text: String,
}

impl EvaluationOutcome {
    pub fn success(rendered_text: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            rendered_text: rendered_text.into(),
        }
    }

    /// A failure, rendered as `Error: <description>`.
    pub fn failure(error: &EvaluationError) -> Self {
        Self {
            succeeded: false,
            rendered_text: format!("Error: {error}"),
        }
    }
}

/// Evaluate `expression` against `env` and classify the result.
///
/// Never panics on malformed input or unrenderable results: every problem
/// becomes a failed outcome.
pub fn evaluate(expression: &str, env: &Environment) -> EvaluationOutcome {
    match evaluate_value(expression, env).and_then(|value| render(&value)) {
        Ok(text) => {
            tracing::debug!(expression, "evaluation succeeded");
            EvaluationOutcome::success(text)
        }
        Err(err) => {
            tracing::warn!(expression, category = %err.category(), error = %err, "evaluation failed");
            EvaluationOutcome::failure(&err)
        }
    }
}

/// Parse and evaluate `expression`, returning the raw value.
pub fn evaluate_value(expression: &str, env: &Environment) -> EvalResult<Value> {
    let source = SourceText::expression(expression);
    let expr = probe_parser::parse_expression(&source).map_err(EvaluationError::Syntax)?;
    Ok(Evaluator::new(env).eval(&expr)?)
}

/// Render a value for the output panel.
///
/// Objects are serialized as JSON; `undefined` and `null` render as their
/// names; other primitives and functions use their string conversion.
pub fn render(value: &Value) -> EvalResult<String> {
    match value {
        Value::Undefined => Ok("undefined".to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Object(obj) if !obj.is_function() => {
            Ok(json::stringify(value, "")?.unwrap_or_default())
        }
        other => Ok(other.to_display_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use probe_types::ObjectRef;

    #[test]
    fn test_render_rules() {
        assert_eq!(render(&Value::Undefined).as_deref(), Ok("undefined"));
        assert_eq!(render(&Value::Null).as_deref(), Ok("null"));
        assert_eq!(render(&Value::from(2.0)).as_deref(), Ok("2"));
        assert_eq!(render(&Value::from("text")).as_deref(), Ok("text"));
        let f = Value::Object(ObjectRef::function("show", 0, |_, _| Ok(Value::Null)));
        assert_eq!(
            render(&f).as_deref(),
            Ok("function show() { [native code] }")
        );
        let obj = Value::Object(ObjectRef::new().with("a", 1));
        assert_eq!(render(&obj).as_deref(), Ok(r#"{"a":1}"#));
    }

    #[test]
    fn test_outcome_serializes_camel_case() {
        let json = serde_json::to_string(&EvaluationOutcome::success("2")).expect("json");
        assert_eq!(json, r#"{"succeeded":true,"renderedText":"2"}"#);
    }
}
