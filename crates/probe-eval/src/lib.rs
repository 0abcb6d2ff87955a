//! Probe tree-walking evaluator.
//!
//! Evaluates expressions written in a read-only JavaScript subset against an
//! ambient [`Environment`] holding the host's root object, and renders the
//! result the way the output panel shows it.

pub mod builtins;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod json;
pub mod outcome;

pub use env::Environment;
pub use error::{EvalResult, EvaluationError, SerializationError};
pub use evaluator::Evaluator;
pub use outcome::{evaluate, evaluate_value, render, EvaluationOutcome};
