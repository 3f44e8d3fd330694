//! Runtime values.
//!
//! `Value` is the closed set of data an evaluation can produce: one tagged
//! variant per kind, each with a canonical rendering, structural equality,
//! and a serialization payload. Values are immutable after construction and
//! composite values exclusively own their children, so sharing across
//! independent evaluations is safe.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

mod calculator;
mod dist;
mod json;
mod lambda;
mod serialize;
mod time;

pub use calculator::{Calculator, CalculatorInput};
pub use dist::{Dist, SymbolicDist};
pub use lambda::{Lambda, LambdaParam};
pub use serialize::{
    deserialize_value, deserialize_value_with, serialize_value, serialize_value_with, ValueStore,
};
pub use time::{DateValue, DurationValue};

use crate::types::AugurType;

/// An Augur runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Bool(bool),
    /// Unicode string (Arc for cheap cloning).
    String(Arc<str>),
    Date(DateValue),
    Duration(DurationValue),
    Dist(Dist),
    Array(Arc<[Value]>),
    /// Key-ordered dictionary (BTreeMap, so iteration is deterministic).
    Dict(Arc<ValueMap>),
    Lambda(Lambda),
    Calculator(Arc<Calculator>),
    Void,
}

/// A key-ordered string-to-value mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueMap {
    entries: BTreeMap<Arc<str>, Value>,
}

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (Arc<str>, Value)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<Arc<str>>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Arc<str>, &Value)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Arc<str>> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }
}

// ==================== Constructors ====================

impl Value {
    pub fn number(n: f64) -> Self {
        Value::Number(n)
    }

    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn date(date: DateValue) -> Self {
        Value::Date(date)
    }

    pub fn duration(duration: DurationValue) -> Self {
        Value::Duration(duration)
    }

    pub fn dist(dist: Dist) -> Self {
        Value::Dist(dist)
    }

    pub fn array(items: impl Into<Arc<[Value]>>) -> Self {
        Value::Array(items.into())
    }

    pub fn dict(entries: impl IntoIterator<Item = (Arc<str>, Value)>) -> Self {
        Value::Dict(Arc::new(ValueMap::from_entries(entries)))
    }

    pub fn lambda(lambda: Lambda) -> Self {
        Value::Lambda(lambda)
    }

    pub fn calculator(calculator: Calculator) -> Self {
        Value::Calculator(Arc::new(calculator))
    }

    pub fn void() -> Self {
        Value::Void
    }
}

// ==================== Kind & Type ====================

impl Value {
    /// The kind tag, used for dispatch and as the serialization tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "Number",
            Value::Bool(_) => "Bool",
            Value::String(_) => "String",
            Value::Date(_) => "Date",
            Value::Duration(_) => "Duration",
            Value::Dist(_) => "Dist",
            Value::Array(_) => "Array",
            Value::Dict(_) => "Dict",
            Value::Lambda(_) => "Lambda",
            Value::Calculator(_) => "Calculator",
            Value::Void => "Void",
        }
    }

    /// The type descriptor this value matches.
    pub fn type_of(&self) -> AugurType {
        match self {
            Value::Number(_) => AugurType::Number,
            Value::Bool(_) => AugurType::Bool,
            Value::String(_) => AugurType::String,
            Value::Date(_) => AugurType::Date,
            Value::Duration(_) => AugurType::Duration,
            Value::Dist(_) => AugurType::Dist,
            Value::Array(_) => AugurType::array(AugurType::Any),
            Value::Dict(_) => AugurType::dict(Vec::new()),
            Value::Lambda(lambda) => lambda.signature_type(),
            Value::Calculator(_) => AugurType::Calculator,
            Value::Void => AugurType::Void,
        }
    }
}

// ==================== Accessors ====================

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateValue> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<DurationValue> {
        match self {
            Value::Duration(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_dist(&self) -> Option<&Dist> {
        match self {
            Value::Dist(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&ValueMap> {
        match self {
            Value::Dict(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_lambda(&self) -> Option<&Lambda> {
        match self {
            Value::Lambda(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_calculator(&self) -> Option<&Calculator> {
        match self {
            Value::Calculator(c) => Some(c),
            _ => None,
        }
    }
}

// ==================== Equality ====================

impl PartialEq for Value {
    /// Structural equality within a kind; comparing across kinds is always
    /// false, never an error.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Dist(a), Value::Dist(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Lambda(a), Value::Lambda(b)) => a == b,
            (Value::Calculator(a), Value::Calculator(b)) => a == b,
            (Value::Void, Value::Void) => true,
            _ => false,
        }
    }
}

// ==================== Display ====================

/// Render a number the way estimation output shows it: no trailing `.0`
/// on whole values.
pub(crate) fn fmt_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", fmt_number(*n)),
            Value::Bool(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "\"{s}\""),
            Value::Date(d) => write!(f, "{d}"),
            Value::Duration(d) => write!(f, "{d}"),
            Value::Dist(d) => write!(f, "{d}"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Dict(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            Value::Lambda(lambda) => write!(f, "{lambda}"),
            Value::Calculator(calculator) => write!(f, "{calculator}"),
            Value::Void => write!(f, "()"),
        }
    }
}
