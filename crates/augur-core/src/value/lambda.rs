//! Lambda payloads.
//!
//! A lambda value owns its body expression tree. Equality compares the
//! signature structurally and the body by identity — two lambdas are the
//! same value only when they share the same tree, which is also what makes
//! value-store round trips observable.

use std::fmt;
use std::sync::Arc;

use crate::ast::TypedNode;
use crate::types::AugurType;

/// A lambda parameter: name plus resolved type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaParam {
    pub name: Arc<str>,
    pub ty: AugurType,
}

impl LambdaParam {
    pub fn new(name: impl Into<Arc<str>>, ty: AugurType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A lambda value: optional name, typed parameters, owned body.
#[derive(Debug, Clone)]
pub struct Lambda {
    pub name: Option<Arc<str>>,
    pub params: Arc<[LambdaParam]>,
    pub body: Arc<TypedNode>,
}

impl Lambda {
    pub fn new(params: impl IntoIterator<Item = LambdaParam>, body: Arc<TypedNode>) -> Self {
        Self {
            name: None,
            params: params.into_iter().collect(),
            body,
        }
    }

    pub fn named(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The lambda-with-signature descriptor for this value.
    pub fn signature_type(&self) -> AugurType {
        AugurType::lambda(self.params.iter().map(|p| p.ty.clone()), AugurType::Any)
    }
}

impl PartialEq for Lambda {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.params == other.params
            && Arc::ptr_eq(&self.body, &other.body)
    }
}

impl fmt::Display for Lambda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<&str> = self.params.iter().map(|p| p.name.as_ref()).collect();
        match &self.name {
            Some(name) => write!(f, "fn {}({})", name, params.join(", ")),
            None => write!(f, "fn({})", params.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_tree::{RawKind, RawNode};

    fn body() -> Arc<TypedNode> {
        Arc::new(
            TypedNode::from_raw(&RawNode::new(
                0..1,
                RawKind::Float {
                    integer: 1,
                    fractional: None,
                    exponent: None,
                },
            ))
            .unwrap(),
        )
    }

    #[test]
    fn signature_type() {
        let lambda = Lambda::new(
            vec![
                LambdaParam::new("x", AugurType::Number),
                LambdaParam::new("y", AugurType::Any),
            ],
            body(),
        );
        assert_eq!(
            lambda.signature_type(),
            AugurType::lambda(vec![AugurType::Number, AugurType::Any], AugurType::Any)
        );
    }

    #[test]
    fn equality_is_by_body_identity() {
        let shared = body();
        let a = Lambda::new(vec![LambdaParam::new("x", AugurType::Number)], shared.clone());
        let b = Lambda::new(vec![LambdaParam::new("x", AugurType::Number)], shared);
        assert_eq!(a, b);

        let c = Lambda::new(vec![LambdaParam::new("x", AugurType::Number)], body());
        assert_ne!(a, c);
    }

    #[test]
    fn display() {
        let anon = Lambda::new(vec![LambdaParam::new("x", AugurType::Any)], body());
        assert_eq!(anon.to_string(), "fn(x)");

        let named = Lambda::new(
            vec![
                LambdaParam::new("a", AugurType::Any),
                LambdaParam::new("b", AugurType::Any),
            ],
            body(),
        )
        .named("add");
        assert_eq!(named.to_string(), "fn add(a, b)");
    }
}
