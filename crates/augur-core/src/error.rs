//! Error types shared across the core.
//!
//! Four failure kinds cross this crate's boundary: construction errors from
//! the node factories, call-dispatch and type errors surfaced to the
//! evaluator, wire codec errors, and plain-JSON conversion errors. Each is
//! a separate enum so callers can route them without string matching.

use thiserror::Error;

use crate::types::AugurType;
use crate::value::Value;

/// Errors raised while building typed expression nodes from raw parse-tree
/// nodes.
///
/// These surface immediately to the parser-facing caller; the factories
/// never construct a partial node.
#[derive(Debug, Clone, Error)]
pub enum BuildError {
    /// The raw node's shape does not match the factory that received it.
    #[error("expected a {expected} node, found {found}")]
    UnexpectedShape {
        expected: &'static str,
        found: &'static str,
    },

    /// A literal field holds text the factory cannot interpret.
    #[error("invalid {what} literal: {message}")]
    InvalidLiteral {
        what: &'static str,
        message: String,
    },

    /// A type annotation names a type this core does not know.
    #[error("unknown type annotation '{0}'")]
    UnknownAnnotation(String),
}

/// Errors surfaced to the evaluator during call dispatch.
///
/// The evaluator is responsible for attaching source locations before
/// presenting these to an end user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// No registered definition matched the call, or a required namespace
    /// prefix was omitted at the call site.
    #[error("no definition matches {name}({arg_kinds})")]
    UnresolvedCall { name: String, arg_kinds: String },

    /// A descriptor's unpack failed where a specific type was required.
    #[error("expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// Arguments had the right types but unusable contents.
    #[error("{0}")]
    InvalidArgument(String),
}

impl EvalError {
    /// Build an unresolved-call error reporting the attempted argument kinds.
    pub fn unresolved_call(name: &str, args: &[Value]) -> Self {
        let arg_kinds = args
            .iter()
            .map(Value::kind)
            .collect::<Vec<_>>()
            .join(", ");
        EvalError::UnresolvedCall {
            name: name.to_string(),
            arg_kinds,
        }
    }

    /// Build a type-mismatch error from a descriptor and the offending value.
    pub fn type_mismatch(expected: &AugurType, actual: &Value) -> Self {
        EvalError::TypeMismatch {
            expected: expected.display_name(),
            actual: actual.kind().to_string(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        EvalError::InvalidArgument(message.into())
    }
}

/// Errors raised by the wire codec.
#[derive(Debug, Clone, Error)]
pub enum SerializationError {
    /// The payload declares a kind this core does not know.
    #[error("unknown kind '{0}'")]
    UnknownKind(String),

    /// The payload's shape does not match its declared kind.
    #[error("{kind} payload: {message}")]
    PayloadShape {
        kind: &'static str,
        message: String,
    },

    /// The kind carries an embedded expression tree and was serialized
    /// without the shared value table that makes that possible.
    #[error("{0} values cannot be serialized without a value store")]
    NonSerializable(&'static str),

    /// A payload references a value-store entry the caller did not supply.
    #[error("value store has no entry {0}")]
    MissingStoreEntry(usize),
}

impl SerializationError {
    pub fn payload_shape(kind: &'static str, message: impl Into<String>) -> Self {
        SerializationError::PayloadShape {
            kind,
            message: message.into(),
        }
    }
}

/// Errors raised by plain-JSON conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The value embeds state (an expression tree) that has no plain-JSON
    /// representation.
    #[error("{0} values have no plain-JSON representation")]
    Unrepresentable(&'static str),
}
