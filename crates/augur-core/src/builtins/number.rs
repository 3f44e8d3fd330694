//! The `Number` namespace: scalar arithmetic helpers.

use crate::builtins::{array_arg, number_arg};
use crate::error::EvalError;
use crate::registry::{FnDefinition, RegisteredFunction, Registry};
use crate::types::AugurType;
use crate::value::Value;

pub(crate) fn install(registry: &mut Registry) {
    registry.register(
        RegisteredFunction::new("abs")
            .in_namespace("Number")
            .with_definition(FnDefinition::new(vec![AugurType::Number], |args, _| {
                Ok(Value::number(number_arg(args, 0)?.abs()))
            })),
    );

    registry.register(
        RegisteredFunction::new("ceil")
            .in_namespace("Number")
            .with_definition(FnDefinition::new(vec![AugurType::Number], |args, _| {
                Ok(Value::number(number_arg(args, 0)?.ceil()))
            })),
    );

    registry.register(
        RegisteredFunction::new("floor")
            .in_namespace("Number")
            .with_definition(FnDefinition::new(vec![AugurType::Number], |args, _| {
                Ok(Value::number(number_arg(args, 0)?.floor()))
            })),
    );

    // sum is overloaded: an array of numbers, or the numbers spread as
    // variadic arguments. The array form registers first and wins when
    // both could apply.
    registry.register(
        RegisteredFunction::new("sum")
            .in_namespace("Number")
            .with_definition(FnDefinition::new(
                vec![AugurType::array(AugurType::Number)],
                |args, _| {
                    let total = numbers(array_arg(args, 0)?)?.into_iter().sum();
                    Ok(Value::number(total))
                },
            ))
            .with_definition(FnDefinition::variadic(
                Vec::new(),
                AugurType::Number,
                |args, _| {
                    let total = args.iter().filter_map(Value::as_number).sum();
                    Ok(Value::number(total))
                },
            )),
    );

    registry.register(
        RegisteredFunction::new("min")
            .in_namespace("Number")
            .with_definition(FnDefinition::new(
                vec![AugurType::array(AugurType::Number)],
                |args, _| fold_extreme(array_arg(args, 0)?, f64::min),
            )),
    );

    registry.register(
        RegisteredFunction::new("max")
            .in_namespace("Number")
            .with_definition(FnDefinition::new(
                vec![AugurType::array(AugurType::Number)],
                |args, _| fold_extreme(array_arg(args, 0)?, f64::max),
            )),
    );
}

fn numbers(items: &[Value]) -> Result<Vec<f64>, EvalError> {
    items
        .iter()
        .map(|item| {
            item.as_number()
                .ok_or_else(|| EvalError::type_mismatch(&AugurType::Number, item))
        })
        .collect()
}

fn fold_extreme(items: &[Value], pick: fn(f64, f64) -> f64) -> Result<Value, EvalError> {
    let numbers = numbers(items)?;
    numbers
        .into_iter()
        .reduce(pick)
        .map(Value::number)
        .ok_or_else(|| EvalError::invalid_argument("expected a non-empty array"))
}
