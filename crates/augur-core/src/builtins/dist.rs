//! The `Dist` namespace: distribution construction and sampling.
//!
//! Stochastic functions draw exclusively from the environment's scoped
//! random source; none of them touch global state.

use crate::builtins::{array_arg, dist_arg, number_arg};
use crate::error::EvalError;
use crate::registry::{FnDefinition, RegisteredFunction, Registry};
use crate::types::AugurType;
use crate::value::{Dist, Value};

pub(crate) fn install(registry: &mut Registry) {
    registry.register(
        RegisteredFunction::new("normal")
            .in_namespace("Dist")
            .with_definition(FnDefinition::new(
                vec![AugurType::Number, AugurType::Number],
                |args, _| {
                    let mean = number_arg(args, 0)?;
                    let stdev = number_arg(args, 1)?;
                    if !(stdev > 0.0) {
                        return Err(EvalError::invalid_argument(format!(
                            "normal requires a positive standard deviation, got {stdev}"
                        )));
                    }
                    Ok(Value::dist(Dist::normal(mean, stdev)))
                },
            )),
    );

    registry.register(
        RegisteredFunction::new("uniform")
            .in_namespace("Dist")
            .with_definition(FnDefinition::new(
                vec![AugurType::Number, AugurType::Number],
                |args, _| {
                    let low = number_arg(args, 0)?;
                    let high = number_arg(args, 1)?;
                    if !(low < high) {
                        return Err(EvalError::invalid_argument(format!(
                            "uniform requires low < high, got [{low}, {high}]"
                        )));
                    }
                    Ok(Value::dist(Dist::uniform(low, high)))
                },
            )),
    );

    registry.register(
        RegisteredFunction::new("pointMass")
            .in_namespace("Dist")
            .with_definition(FnDefinition::new(vec![AugurType::Number], |args, _| {
                Ok(Value::dist(Dist::point_mass(number_arg(args, 0)?)))
            })),
    );

    registry.register(
        RegisteredFunction::new("fromSamples")
            .in_namespace("Dist")
            .with_definition(FnDefinition::new(
                vec![AugurType::array(AugurType::Number)],
                |args, _| {
                    let samples: Vec<f64> = array_arg(args, 0)?
                        .iter()
                        .filter_map(Value::as_number)
                        .collect();
                    if samples.is_empty() {
                        return Err(EvalError::invalid_argument(
                            "fromSamples requires at least one sample",
                        ));
                    }
                    Ok(Value::dist(Dist::from_samples(samples)))
                },
            )),
    );

    registry.register(
        RegisteredFunction::new("mean")
            .in_namespace("Dist")
            .with_definition(FnDefinition::new(vec![AugurType::Dist], |args, _| {
                Ok(Value::number(dist_arg(args, 0)?.mean()))
            })),
    );

    registry.register(
        RegisteredFunction::new("sample")
            .in_namespace("Dist")
            .with_definition(FnDefinition::new(vec![AugurType::Dist], |args, env| {
                let dist = dist_arg(args, 0)?;
                Ok(Value::number(env.with_rng(|rng| dist.sample(rng))))
            })),
    );

    registry.register(
        RegisteredFunction::new("sampleN")
            .in_namespace("Dist")
            .with_definition(FnDefinition::new(vec![AugurType::Dist], |args, env| {
                let samples: Vec<Value> = dist_arg(args, 0)?
                    .sample_n(env)
                    .into_iter()
                    .map(Value::number)
                    .collect();
                Ok(Value::array(samples))
            })),
    );
}
