//! Calculator payloads.
//!
//! A calculator wraps a lambda with the metadata a form-driven host needs
//! to present it: one input row per parameter, each carrying its type
//! descriptor and form-input hint. The widget itself lives outside this
//! core; this is only the data contract.

use std::fmt;
use std::sync::Arc;

use super::Lambda;
use crate::types::{AugurType, FormInput};

/// One editable input of a calculator.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorInput {
    pub name: Arc<str>,
    pub ty: AugurType,
    pub input: FormInput,
    /// Source text pre-filled into the input, if any.
    pub default: Option<Arc<str>>,
}

impl CalculatorInput {
    /// Create an input with the type's default form widget.
    pub fn new(name: impl Into<Arc<str>>, ty: AugurType) -> Self {
        let input = ty.default_form_input();
        Self {
            name: name.into(),
            ty,
            input,
            default: None,
        }
    }

    pub fn with_input(mut self, input: FormInput) -> Self {
        self.input = input;
        self
    }

    pub fn with_default(mut self, default: impl Into<Arc<str>>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A calculator value: a lambda plus presentation metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculator {
    pub func: Lambda,
    pub title: Option<Arc<str>>,
    pub description: Option<Arc<str>>,
    pub inputs: Arc<[CalculatorInput]>,
    /// Whether the host should re-run on every input edit.
    pub autorun: bool,
}

impl Calculator {
    /// Build a calculator for a lambda, deriving one input per parameter.
    pub fn for_lambda(func: Lambda) -> Self {
        let inputs: Vec<CalculatorInput> = func
            .params
            .iter()
            .map(|p| CalculatorInput::new(p.name.clone(), p.ty.clone()))
            .collect();
        Self {
            func,
            title: None,
            description: None,
            inputs: inputs.into(),
            autorun: true,
        }
    }

    pub fn with_title(mut self, title: impl Into<Arc<str>>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<Arc<str>>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = CalculatorInput>) -> Self {
        self.inputs = inputs.into_iter().collect();
        self
    }

    pub fn with_autorun(mut self, autorun: bool) -> Self {
        self.autorun = autorun;
        self
    }
}

impl fmt::Display for Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "Calculator({title})"),
            None => write!(f, "Calculator({})", self.func),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ast::TypedNode;
    use crate::parse_tree::{RawKind, RawNode};
    use crate::value::LambdaParam;

    fn lambda() -> Lambda {
        let body = Arc::new(
            TypedNode::from_raw(&RawNode::new(
                0..1,
                RawKind::Identifier("x".to_string()),
            ))
            .unwrap(),
        );
        Lambda::new(
            vec![
                LambdaParam::new("x", AugurType::Number),
                LambdaParam::new("flag", AugurType::Bool),
            ],
            body,
        )
    }

    #[test]
    fn inputs_derived_from_params() {
        let calc = Calculator::for_lambda(lambda());
        assert_eq!(calc.inputs.len(), 2);
        assert_eq!(calc.inputs[0].name.as_ref(), "x");
        assert_eq!(calc.inputs[0].input, FormInput::Text);
        assert_eq!(calc.inputs[1].name.as_ref(), "flag");
        assert_eq!(calc.inputs[1].input, FormInput::Checkbox);
        assert!(calc.autorun);
    }

    #[test]
    fn builder_overrides() {
        let calc = Calculator::for_lambda(lambda())
            .with_title("Fermi estimate")
            .with_autorun(false)
            .with_inputs(vec![CalculatorInput::new("x", AugurType::Number)
                .with_input(FormInput::TextArea)
                .with_default("Normal(5, 2)")]);

        assert_eq!(calc.title.as_deref(), Some("Fermi estimate"));
        assert!(!calc.autorun);
        assert_eq!(calc.inputs.len(), 1);
        assert_eq!(calc.inputs[0].input, FormInput::TextArea);
        assert_eq!(calc.inputs[0].default.as_deref(), Some("Normal(5, 2)"));
        assert_eq!(calc.to_string(), "Calculator(Fermi estimate)");
    }
}
