//! The `Date` and `Duration` namespaces.

use crate::builtins::{date_arg, integer_arg, number_arg};
use crate::error::EvalError;
use crate::registry::{FnDefinition, RegisteredFunction, Registry};
use crate::types::AugurType;
use crate::value::{DateValue, DurationValue, Value};

pub(crate) fn install(registry: &mut Registry) {
    registry.register(
        RegisteredFunction::new("make")
            .in_namespace("Date")
            .with_definition(FnDefinition::new(
                vec![AugurType::Number, AugurType::Number, AugurType::Number],
                |args, _| {
                    let year = integer_arg(args, 0)?;
                    let month = integer_arg(args, 1)?;
                    let day = integer_arg(args, 2)?;
                    let date = DateValue::from_ymd(
                        year as i32,
                        month.try_into().unwrap_or(u32::MAX),
                        day.try_into().unwrap_or(u32::MAX),
                    )
                    .ok_or_else(|| {
                        EvalError::invalid_argument(format!(
                            "no such date: {year}-{month}-{day}"
                        ))
                    })?;
                    Ok(Value::date(date))
                },
            )),
    );

    registry.register(
        RegisteredFunction::new("subtract")
            .in_namespace("Date")
            .with_definition(FnDefinition::new(
                vec![AugurType::Date, AugurType::Date],
                |args, _| {
                    let later = date_arg(args, 0)?;
                    let earlier = date_arg(args, 1)?;
                    Ok(Value::duration(later.difference(earlier)))
                },
            )),
    );

    for &(name, build) in DURATION_UNITS {
        registry.register(
            RegisteredFunction::new(name)
                .in_namespace("Duration")
                .with_definition(FnDefinition::new(vec![AugurType::Number], move |args, _| {
                    Ok(Value::duration(build(number_arg(args, 0)?)))
                })),
        );
    }
}

const DURATION_UNITS: &[(&str, fn(f64) -> DurationValue)] = &[
    ("minutes", DurationValue::from_minutes),
    ("hours", DurationValue::from_hours),
    ("days", DurationValue::from_days),
    ("years", DurationValue::from_years),
];
