//! Shared types for probe.
//!
//! This crate defines the JavaScript-like object graph ([`Value`]) that the
//! explorer browses and the evaluator walks, the expression AST, source
//! spans, and the structured diagnostics reported by the lexer and parser.

mod error;
mod intrinsics;
mod span;
mod thrown;
mod value;
pub mod ast;

pub use error::{Diagnostics, ErrorCategory, ErrorCode, ProbeError, MAX_ERRORS};
pub use intrinsics::Intrinsics;
pub use span::{SourceText, Span};
pub use thrown::{ErrorKind, ThrownError};
pub use value::{format_number, NativeFn, NativeFunction, ObjectKind, ObjectRef, Value};

/// Result type for operations that can throw inside the object graph.
pub type Completion<T> = std::result::Result<T, ThrownError>;
