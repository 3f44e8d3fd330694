//! The builtin function registry.
//!
//! Functions register under a (possibly namespaced) name with an ordered
//! list of definitions, each a typed signature plus a native
//! implementation. Resolution walks a name's definitions in registration
//! order and invokes the first whose signature matches the argument values
//! — the list is a deliberate priority order, not a best-match search.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::env::Environment;
use crate::error::EvalError;
use crate::types::AugurType;
use crate::value::Value;

/// A native implementation: evaluated arguments plus the per-evaluation
/// environment in, a value or typed failure out.
pub type NativeFn = Arc<dyn Fn(&[Value], &Environment) -> Result<Value, EvalError> + Send + Sync>;

/// A single typed signature with its implementation.
#[derive(Clone)]
pub struct FnDefinition {
    params: Arc<[AugurType]>,
    /// Descriptor matched by zero or more trailing arguments.
    variadic: Option<AugurType>,
    implementation: NativeFn,
}

impl FnDefinition {
    /// Create a fixed-arity definition.
    pub fn new<F>(params: Vec<AugurType>, f: F) -> Self
    where
        F: Fn(&[Value], &Environment) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Self {
            params: params.into(),
            variadic: None,
            implementation: Arc::new(f),
        }
    }

    /// Create a definition whose trailing arguments all match `tail`.
    pub fn variadic<F>(params: Vec<AugurType>, tail: AugurType, f: F) -> Self
    where
        F: Fn(&[Value], &Environment) -> Result<Value, EvalError> + Send + Sync + 'static,
    {
        Self {
            params: params.into(),
            variadic: Some(tail),
            implementation: Arc::new(f),
        }
    }

    /// Whether this definition's signature matches the argument values:
    /// exact arity (or enough arguments for the fixed prefix when
    /// variadic), every position unpacking successfully.
    pub fn matches(&self, args: &[Value]) -> bool {
        match &self.variadic {
            None => {
                args.len() == self.params.len()
                    && self.params.iter().zip(args).all(|(p, a)| p.matches(a))
            }
            Some(tail) => {
                args.len() >= self.params.len()
                    && self
                        .params
                        .iter()
                        .zip(args)
                        .all(|(p, a)| p.matches(a))
                    && args[self.params.len()..].iter().all(|a| tail.matches(a))
            }
        }
    }

    /// Invoke the implementation.
    pub fn call(&self, args: &[Value], env: &Environment) -> Result<Value, EvalError> {
        (self.implementation)(args, env)
    }

    /// Human rendering of the signature, for diagnostics.
    pub fn signature(&self) -> String {
        let mut parts: Vec<String> = self.params.iter().map(AugurType::display_name).collect();
        if let Some(tail) = &self.variadic {
            parts.push(format!("{}...", tail.display_name()));
        }
        format!("({})", parts.join(", "))
    }
}

impl std::fmt::Debug for FnDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnDefinition")
            .field("signature", &self.signature())
            .finish()
    }
}

/// A named function with its ordered definitions.
#[derive(Debug, Clone)]
pub struct RegisteredFunction {
    name: String,
    namespace: Option<String>,
    /// When set, the namespace prefix is mandatory at call sites.
    requires_namespace: bool,
    definitions: Vec<FnDefinition>,
}

impl RegisteredFunction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            requires_namespace: false,
            definitions: Vec::new(),
        }
    }

    /// Place this function in a namespace (e.g. `System`).
    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Require the namespace prefix at call sites. Prevents user code from
    /// accidentally shadowing namespaced utilities.
    pub fn require_namespace(mut self) -> Self {
        self.requires_namespace = true;
        self
    }

    pub fn with_definition(mut self, definition: FnDefinition) -> Self {
        self.definitions.push(definition);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn requires_namespace(&self) -> bool {
        self.requires_namespace
    }

    pub fn definitions(&self) -> &[FnDefinition] {
        &self.definitions
    }

    /// The fully qualified name: `Namespace.name` or just `name`.
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, self.name),
            None => self.name.clone(),
        }
    }
}

/// Registry of builtin functions available during evaluation.
#[derive(Debug, Clone)]
pub struct Registry {
    /// Functions keyed by qualified name.
    functions: HashMap<String, RegisteredFunction>,
    /// Bare-name index for namespaced functions callable without prefix.
    bare_names: HashMap<String, String>,
    /// Process-wide version constant, injected at construction.
    version: Arc<str>,
}

impl Registry {
    pub fn new(version: impl Into<Arc<str>>) -> Self {
        Self {
            functions: HashMap::new(),
            bare_names: HashMap::new(),
            version: version.into(),
        }
    }

    /// The version constant this registry was built with.
    pub fn version(&self) -> &Arc<str> {
        &self.version
    }

    /// Register a function. Registering a name that already exists appends
    /// the new definitions as overloads, preserving earlier priority.
    pub fn register(&mut self, function: RegisteredFunction) {
        let key = function.qualified_name();
        match self.functions.get_mut(&key) {
            Some(existing) => {
                existing.definitions.extend(function.definitions);
            }
            None => {
                if function.namespace.is_some() && !function.requires_namespace {
                    self.bare_names.insert(function.name.clone(), key.clone());
                }
                self.functions.insert(key, function);
            }
        }
    }

    /// Register a function, replacing any existing definition list.
    pub fn register_replacing(&mut self, function: RegisteredFunction) {
        let key = function.qualified_name();
        self.functions.remove(&key);
        self.register(function);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredFunction> {
        self.functions.get(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RegisteredFunction)> {
        self.functions.iter()
    }

    /// Resolve and invoke a call.
    ///
    /// Definitions are tried in registration order; the first whose
    /// signature matches wins. A name registered with a mandatory
    /// namespace fails as unresolved when called without its prefix, even
    /// if the bare name would otherwise be unambiguous.
    pub fn resolve(
        &self,
        name: &str,
        args: &[Value],
        env: &Environment,
    ) -> Result<Value, EvalError> {
        let function = self.lookup(name, args)?;

        for (index, definition) in function.definitions.iter().enumerate() {
            if definition.matches(args) {
                debug!(
                    name = %function.qualified_name(),
                    overload = index,
                    signature = %definition.signature(),
                    "resolved builtin call"
                );
                return definition.call(args, env);
            }
        }

        debug!(name, "no definition matched call");
        Err(EvalError::unresolved_call(name, args))
    }

    fn lookup(&self, name: &str, args: &[Value]) -> Result<&RegisteredFunction, EvalError> {
        if let Some(function) = self.functions.get(name) {
            return Ok(function);
        }
        if let Some(qualified) = self.bare_names.get(name) {
            return Ok(&self.functions[qualified]);
        }
        Err(EvalError::unresolved_call(name, args))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Environment {
        Environment::new(100, 0)
    }

    fn constant(n: f64) -> FnDefinition {
        FnDefinition::new(vec![], move |_, _| Ok(Value::number(n)))
    }

    #[test]
    fn first_matching_definition_wins() {
        let mut registry = Registry::new("0.1.0");
        registry.register(
            RegisteredFunction::new("f")
                .with_definition(FnDefinition::new(vec![AugurType::Number], |_, _| {
                    Ok(Value::string("number"))
                }))
                .with_definition(FnDefinition::new(vec![AugurType::String], |_, _| {
                    Ok(Value::string("string"))
                }))
                // Any would also match a number, but registration order
                // keeps it behind the more specific definitions.
                .with_definition(FnDefinition::new(vec![AugurType::Any], |_, _| {
                    Ok(Value::string("any"))
                })),
        );

        let result = registry.resolve("f", &[Value::number(1.0)], &env()).unwrap();
        assert_eq!(result, Value::string("number"));

        let result = registry.resolve("f", &[Value::string("s")], &env()).unwrap();
        assert_eq!(result, Value::string("string"));

        let result = registry.resolve("f", &[Value::Bool(true)], &env()).unwrap();
        assert_eq!(result, Value::string("any"));
    }

    #[test]
    fn reregistering_appends_overloads() {
        let mut registry = Registry::new("0.1.0");
        registry.register(RegisteredFunction::new("f").with_definition(constant(1.0)));
        registry.register(
            RegisteredFunction::new("f").with_definition(FnDefinition::new(
                vec![AugurType::Number],
                |_, _| Ok(Value::number(2.0)),
            )),
        );

        // Earlier registration keeps priority.
        assert_eq!(registry.resolve("f", &[], &env()).unwrap(), Value::number(1.0));
        assert_eq!(
            registry.resolve("f", &[Value::number(0.0)], &env()).unwrap(),
            Value::number(2.0)
        );
    }

    #[test]
    fn register_replacing_swaps_definitions() {
        let mut registry = Registry::new("0.1.0");
        registry.register(RegisteredFunction::new("f").with_definition(constant(1.0)));
        registry.register_replacing(RegisteredFunction::new("f").with_definition(constant(2.0)));

        assert_eq!(registry.resolve("f", &[], &env()).unwrap(), Value::number(2.0));
    }

    #[test]
    fn unresolved_call_reports_argument_kinds() {
        let mut registry = Registry::new("0.1.0");
        registry.register(
            RegisteredFunction::new("f").with_definition(FnDefinition::new(
                vec![AugurType::Number],
                |_, _| Ok(Value::void()),
            )),
        );

        let err = registry
            .resolve("f", &[Value::string("s"), Value::Bool(true)], &env())
            .unwrap_err();
        assert_eq!(
            err,
            EvalError::UnresolvedCall {
                name: "f".to_string(),
                arg_kinds: "String, Bool".to_string(),
            }
        );
    }

    #[test]
    fn namespaced_function_resolves_with_prefix() {
        let mut registry = Registry::new("0.1.0");
        registry.register(
            RegisteredFunction::new("mean")
                .in_namespace("Dist")
                .with_definition(constant(5.0)),
        );

        assert_eq!(
            registry.resolve("Dist.mean", &[], &env()).unwrap(),
            Value::number(5.0)
        );
        // Prefix not mandatory, so the bare name works too.
        assert_eq!(registry.resolve("mean", &[], &env()).unwrap(), Value::number(5.0));
    }

    #[test]
    fn mandatory_namespace_blocks_bare_name() {
        let mut registry = Registry::new("0.1.0");
        registry.register(
            RegisteredFunction::new("sampleCount")
                .in_namespace("System")
                .require_namespace()
                .with_definition(constant(0.0)),
        );

        assert!(registry.resolve("System.sampleCount", &[], &env()).is_ok());
        assert!(matches!(
            registry.resolve("sampleCount", &[], &env()),
            Err(EvalError::UnresolvedCall { .. })
        ));
    }

    #[test]
    fn variadic_tail_matches_zero_or_more() {
        let def = FnDefinition::variadic(vec![AugurType::Number], AugurType::Number, |args, _| {
            Ok(Value::number(args.len() as f64))
        });

        assert!(def.matches(&[Value::number(1.0)]));
        assert!(def.matches(&[Value::number(1.0), Value::number(2.0), Value::number(3.0)]));
        assert!(!def.matches(&[]));
        assert!(!def.matches(&[Value::number(1.0), Value::string("s")]));
    }

    #[test]
    fn version_is_injected_at_construction() {
        let registry = Registry::new("2.3.1");
        assert_eq!(registry.version().as_ref(), "2.3.1");
    }
}
