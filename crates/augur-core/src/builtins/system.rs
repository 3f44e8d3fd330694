//! The `System` namespace: evaluation configuration.
//!
//! Both functions require their namespace prefix so user code can freely
//! bind names like `sampleCount` without shadowing them.

use crate::registry::{FnDefinition, RegisteredFunction, Registry};
use crate::value::Value;

pub(crate) fn install(registry: &mut Registry) {
    let version = registry.version().clone();
    registry.register(
        RegisteredFunction::new("version")
            .in_namespace("System")
            .require_namespace()
            .with_definition(FnDefinition::new(vec![], move |_, _| {
                Ok(Value::string(version.clone()))
            })),
    );

    registry.register(
        RegisteredFunction::new("sampleCount")
            .in_namespace("System")
            .require_namespace()
            .with_definition(FnDefinition::new(vec![], |_, env| {
                Ok(Value::number(env.sample_count() as f64))
            })),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::Environment;

    #[test]
    fn sample_count_reads_environment() {
        let mut registry = Registry::new("0.1.0");
        install(&mut registry);

        let env = Environment::new(1000, 0);
        let result = registry.resolve("System.sampleCount", &[], &env).unwrap();
        assert_eq!(result, Value::number(1000.0));
    }

    #[test]
    fn bare_names_are_rejected() {
        let mut registry = Registry::new("0.1.0");
        install(&mut registry);

        let env = Environment::default();
        assert!(registry.resolve("sampleCount", &[], &env).is_err());
        assert!(registry.resolve("version", &[], &env).is_err());
    }
}
