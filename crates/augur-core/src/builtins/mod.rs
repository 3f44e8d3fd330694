//! The builtin function library.
//!
//! One module per namespace, each installing its functions into the
//! registry. [`standard_library`] assembles the full set; hosts that want
//! a reduced surface can install individual modules into their own
//! [`Registry`].

mod date;
mod dist;
mod list;
mod number;
mod string;
mod system;

use crate::error::EvalError;
use crate::registry::Registry;
use crate::types::AugurType;
use crate::value::Value;

/// Build a registry containing the full standard library.
///
/// `version` is the process-wide version constant; it is captured here at
/// construction and exposed through `System.version`.
pub fn standard_library(version: &str) -> Registry {
    let mut registry = Registry::new(version);
    system::install(&mut registry);
    number::install(&mut registry);
    dist::install(&mut registry);
    string::install(&mut registry);
    list::install(&mut registry);
    date::install(&mut registry);
    registry
}

// Argument accessors for implementations. Signatures already guarantee the
// kinds; these keep the failure typed if an implementation is ever invoked
// outside the registry's dispatch.

pub(crate) fn number_arg(args: &[Value], index: usize) -> Result<f64, EvalError> {
    args[index]
        .as_number()
        .ok_or_else(|| EvalError::type_mismatch(&AugurType::Number, &args[index]))
}

pub(crate) fn string_arg(args: &[Value], index: usize) -> Result<&str, EvalError> {
    args[index]
        .as_string()
        .ok_or_else(|| EvalError::type_mismatch(&AugurType::String, &args[index]))
}

pub(crate) fn dist_arg<'a>(
    args: &'a [Value],
    index: usize,
) -> Result<&'a crate::value::Dist, EvalError> {
    args[index]
        .as_dist()
        .ok_or_else(|| EvalError::type_mismatch(&AugurType::Dist, &args[index]))
}

pub(crate) fn array_arg<'a>(args: &'a [Value], index: usize) -> Result<&'a [Value], EvalError> {
    args[index]
        .as_array()
        .ok_or_else(|| EvalError::type_mismatch(&AugurType::array(AugurType::Any), &args[index]))
}

pub(crate) fn date_arg(args: &[Value], index: usize) -> Result<crate::value::DateValue, EvalError> {
    args[index]
        .as_date()
        .ok_or_else(|| EvalError::type_mismatch(&AugurType::Date, &args[index]))
}

/// A whole number argument, rejected when fractional or out of range.
pub(crate) fn integer_arg(args: &[Value], index: usize) -> Result<i64, EvalError> {
    let n = number_arg(args, index)?;
    if n.fract() != 0.0 || !n.is_finite() {
        return Err(EvalError::invalid_argument(format!(
            "expected a whole number, got {n}"
        )));
    }
    Ok(n as i64)
}
