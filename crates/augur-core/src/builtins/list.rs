//! The `List` namespace.

use crate::builtins::{array_arg, integer_arg};
use crate::error::EvalError;
use crate::registry::{FnDefinition, RegisteredFunction, Registry};
use crate::types::AugurType;
use crate::value::Value;

pub(crate) fn install(registry: &mut Registry) {
    registry.register(
        RegisteredFunction::new("length")
            .in_namespace("List")
            .with_definition(FnDefinition::new(
                vec![AugurType::array(AugurType::Any)],
                |args, _| Ok(Value::number(array_arg(args, 0)?.len() as f64)),
            )),
    );

    registry.register(
        RegisteredFunction::new("make")
            .in_namespace("List")
            .with_definition(FnDefinition::new(
                vec![AugurType::Number, AugurType::Any],
                |args, _| {
                    let count = integer_arg(args, 0)?;
                    if count < 0 {
                        return Err(EvalError::invalid_argument(format!(
                            "make requires a non-negative count, got {count}"
                        )));
                    }
                    Ok(Value::array(vec![args[1].clone(); count as usize]))
                },
            )),
    );
}
