//! augur-core: the expression, type, and value core of the Augur
//! estimation language.
//!
//! This crate sits between a parser and an evaluator. The parser hands it
//! raw parse-tree nodes ([`RawNode`]); the typed-tree factories turn those
//! into [`TypedNode`]s, each annotated with its resolved [`AugurType`].
//! The evaluator walks the typed tree, producing and consuming [`Value`]s
//! and dispatching function applications through the [`Registry`].
//!
//! # Quick Start
//!
//! ```
//! use augur_core::{standard_library, Environment, Value};
//!
//! let registry = standard_library("0.1.0");
//! let env = Environment::new(1000, 42);
//!
//! let result = registry
//!     .resolve("System.sampleCount", &[], &env)
//!     .unwrap();
//! assert_eq!(result, Value::number(1000.0));
//! ```
//!
//! # Modules
//!
//! - `types`: type descriptors — matching, construction, persistence, and
//!   presentation hints
//! - `value`: the runtime value model, its wire codec, and plain-JSON
//!   conversion
//! - `parse_tree` / `ast`: the raw parser contract and the typed
//!   expression tree built from it
//! - `registry` / `builtins`: call dispatch and the standard library
//! - `env`: per-evaluation configuration (sample count, scoped RNG)

pub mod ast;
pub mod builtins;
pub mod env;
pub mod error;
pub mod parse_tree;
pub mod registry;
pub mod types;
pub mod value;

pub use ast::{location_contains, NodeKind, TypedNode};
pub use builtins::standard_library;
pub use env::{Environment, DEFAULT_SAMPLE_COUNT};
pub use error::{BuildError, EvalError, SerializationError, ValueError};
pub use parse_tree::{RawKind, RawNode, RawParam, Span};
pub use registry::{FnDefinition, NativeFn, RegisteredFunction, Registry};
pub use types::{AugurType, DictField, FormInput};
pub use value::{
    deserialize_value, deserialize_value_with, serialize_value, serialize_value_with, Calculator,
    CalculatorInput, DateValue, Dist, DurationValue, Lambda, LambdaParam, SymbolicDist, Value,
    ValueMap, ValueStore,
};
