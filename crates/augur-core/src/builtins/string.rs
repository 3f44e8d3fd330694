//! The `String` namespace.

use crate::builtins::{number_arg, string_arg};
use crate::registry::{FnDefinition, RegisteredFunction, Registry};
use crate::types::AugurType;
use crate::value::{fmt_number, Value};

pub(crate) fn install(registry: &mut Registry) {
    registry.register(
        RegisteredFunction::new("concat")
            .in_namespace("String")
            .with_definition(FnDefinition::new(
                vec![AugurType::String, AugurType::String],
                |args, _| {
                    let mut out = string_arg(args, 0)?.to_string();
                    out.push_str(string_arg(args, 1)?);
                    Ok(Value::string(out))
                },
            ))
            .with_definition(FnDefinition::new(
                vec![AugurType::String, AugurType::Number],
                |args, _| {
                    let mut out = string_arg(args, 0)?.to_string();
                    out.push_str(&fmt_number(number_arg(args, 1)?));
                    Ok(Value::string(out))
                },
            )),
    );
}
