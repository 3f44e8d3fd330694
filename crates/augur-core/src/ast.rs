//! The typed expression tree.
//!
//! One [`NodeKind`] variant per syntax construct. Nodes are built
//! exclusively through the named factories, each of which accepts the
//! matching [`RawKind`] shape, resolves or propagates the node's
//! [`AugurType`], and rejects anything else with a [`BuildError`]. Nodes
//! are immutable once constructed.

use std::sync::Arc;

use crate::error::BuildError;
use crate::parse_tree::{RawKind, RawNode, RawParam, Span};
use crate::types::{AugurType, DictField};
use crate::value::LambdaParam;

/// Inclusive range test mapping a cursor offset back to a node.
///
/// Both ends are inclusive so zero-width and single-token spans behave the
/// same as wider ones.
pub fn location_contains(span: &Span, offset: usize) -> bool {
    span.start <= offset && offset <= span.end
}

/// A typed expression node: source span, resolved type, and the
/// construct-specific payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedNode {
    span: Span,
    ty: AugurType,
    kind: NodeKind,
}

/// The construct variants of the typed tree.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Numeric literal, kept in its source parts so formatting survives
    /// round trips through the tree.
    FloatLiteral {
        integer: i64,
        fractional: Option<Arc<str>>,
        exponent: Option<i64>,
    },
    StringLiteral(Arc<str>),
    BoolLiteral(bool),
    Identifier(Arc<str>),
    Array(Vec<TypedNode>),
    Dict(Vec<(Arc<str>, TypedNode)>),
    Block(Vec<TypedNode>),
    LetStatement {
        name: Arc<str>,
        value: Box<TypedNode>,
    },
    DefunStatement {
        name: Arc<str>,
        lambda: Box<TypedNode>,
    },
    /// A statement wrapped by a decorator. Wraps transparently; use
    /// [`TypedNode::undecorated`] to reach the underlying statement.
    Decorated {
        decorator: Arc<str>,
        args: Vec<TypedNode>,
        inner: Box<TypedNode>,
    },
    Lambda {
        params: Vec<LambdaParam>,
        body: Box<TypedNode>,
    },
    Call {
        callee: Box<TypedNode>,
        args: Vec<TypedNode>,
    },
    Ternary {
        condition: Box<TypedNode>,
        then_branch: Box<TypedNode>,
        else_branch: Box<TypedNode>,
    },
    Program {
        statements: Vec<TypedNode>,
    },
}

// ==================== Factories ====================

impl TypedNode {
    /// Build a typed node from any raw node, dispatching to the matching
    /// factory.
    pub fn from_raw(raw: &RawNode) -> Result<TypedNode, BuildError> {
        match &raw.kind {
            RawKind::Float { .. } => Self::float_literal(raw),
            RawKind::String(_) => Self::string_literal(raw),
            RawKind::Bool(_) => Self::bool_literal(raw),
            RawKind::Identifier(_) => Self::identifier(raw),
            RawKind::Array(_) => Self::array(raw),
            RawKind::Dict(_) => Self::dict(raw),
            RawKind::Block(_) => Self::block(raw),
            RawKind::LetStatement { .. } => Self::let_statement(raw),
            RawKind::DefunStatement { .. } => Self::defun_statement(raw),
            RawKind::Decorated { .. } => Self::decorated(raw),
            RawKind::Lambda { .. } => Self::lambda(raw),
            RawKind::Call { .. } => Self::call(raw),
            RawKind::Ternary { .. } => Self::ternary(raw),
            RawKind::Program { .. } => Self::program(raw),
        }
    }

    /// Numeric literal. Type: `Number`.
    pub fn float_literal(raw: &RawNode) -> Result<TypedNode, BuildError> {
        let RawKind::Float {
            integer,
            fractional,
            exponent,
        } = &raw.kind
        else {
            return Err(unexpected("float literal", raw));
        };

        if let Some(digits) = fractional {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(BuildError::InvalidLiteral {
                    what: "float",
                    message: format!("fractional part '{digits}' is not a digit sequence"),
                });
            }
        }

        Ok(TypedNode {
            span: raw.span.clone(),
            ty: AugurType::Number,
            kind: NodeKind::FloatLiteral {
                integer: *integer,
                fractional: fractional.as_deref().map(Arc::from),
                exponent: *exponent,
            },
        })
    }

    /// String literal. Type: `String`.
    pub fn string_literal(raw: &RawNode) -> Result<TypedNode, BuildError> {
        let RawKind::String(text) = &raw.kind else {
            return Err(unexpected("string literal", raw));
        };
        Ok(TypedNode {
            span: raw.span.clone(),
            ty: AugurType::String,
            kind: NodeKind::StringLiteral(Arc::from(text.as_str())),
        })
    }

    /// Boolean literal. Type: `Bool`.
    pub fn bool_literal(raw: &RawNode) -> Result<TypedNode, BuildError> {
        let RawKind::Bool(value) = &raw.kind else {
            return Err(unexpected("boolean literal", raw));
        };
        Ok(TypedNode {
            span: raw.span.clone(),
            ty: AugurType::Bool,
            kind: NodeKind::BoolLiteral(*value),
        })
    }

    /// Identifier reference. Type: `Any` — the referent's type is only
    /// known to the evaluator.
    pub fn identifier(raw: &RawNode) -> Result<TypedNode, BuildError> {
        let RawKind::Identifier(name) = &raw.kind else {
            return Err(unexpected("identifier", raw));
        };
        Ok(TypedNode {
            span: raw.span.clone(),
            ty: AugurType::Any,
            kind: NodeKind::Identifier(Arc::from(name.as_str())),
        })
    }

    /// Array literal. Type: `Array(T)` when every element resolves to the
    /// same `T`, `Array(Any)` otherwise.
    pub fn array(raw: &RawNode) -> Result<TypedNode, BuildError> {
        let RawKind::Array(items) = &raw.kind else {
            return Err(unexpected("array", raw));
        };
        let items = items
            .iter()
            .map(TypedNode::from_raw)
            .collect::<Result<Vec<_>, _>>()?;
        let elem_ty = unified_type(items.iter().map(TypedNode::ty));
        Ok(TypedNode {
            span: raw.span.clone(),
            ty: AugurType::array(elem_ty),
            kind: NodeKind::Array(items),
        })
    }

    /// Dict literal. Type: `Dict` with one declared field per entry.
    pub fn dict(raw: &RawNode) -> Result<TypedNode, BuildError> {
        let RawKind::Dict(entries) = &raw.kind else {
            return Err(unexpected("dict", raw));
        };
        let entries = entries
            .iter()
            .map(|(key, value)| {
                Ok((Arc::<str>::from(key.as_str()), TypedNode::from_raw(value)?))
            })
            .collect::<Result<Vec<_>, BuildError>>()?;
        let fields: Vec<DictField> = entries
            .iter()
            .map(|(key, value)| DictField::new(key.clone(), value.ty().clone()))
            .collect();
        Ok(TypedNode {
            span: raw.span.clone(),
            ty: AugurType::dict(fields),
            kind: NodeKind::Dict(entries),
        })
    }

    /// Statement block. Type: the last statement's type, `Void` if empty.
    pub fn block(raw: &RawNode) -> Result<TypedNode, BuildError> {
        let RawKind::Block(statements) = &raw.kind else {
            return Err(unexpected("block", raw));
        };
        let statements = statements
            .iter()
            .map(TypedNode::from_raw)
            .collect::<Result<Vec<_>, _>>()?;
        let ty = statements
            .last()
            .map(|s| s.ty().clone())
            .unwrap_or(AugurType::Void);
        Ok(TypedNode {
            span: raw.span.clone(),
            ty,
            kind: NodeKind::Block(statements),
        })
    }

    /// Let binding. Type: the bound expression's type.
    pub fn let_statement(raw: &RawNode) -> Result<TypedNode, BuildError> {
        let RawKind::LetStatement { name, value } = &raw.kind else {
            return Err(unexpected("let statement", raw));
        };
        let value = TypedNode::from_raw(value)?;
        Ok(TypedNode {
            span: raw.span.clone(),
            ty: value.ty().clone(),
            kind: NodeKind::LetStatement {
                name: Arc::from(name.as_str()),
                value: Box::new(value),
            },
        })
    }

    /// Function definition. Type: the defined lambda's type.
    pub fn defun_statement(raw: &RawNode) -> Result<TypedNode, BuildError> {
        let RawKind::DefunStatement { name, lambda } = &raw.kind else {
            return Err(unexpected("function definition", raw));
        };
        let lambda = TypedNode::lambda(lambda)?;
        Ok(TypedNode {
            span: raw.span.clone(),
            ty: lambda.ty().clone(),
            kind: NodeKind::DefunStatement {
                name: Arc::from(name.as_str()),
                lambda: Box::new(lambda),
            },
        })
    }

    /// Decorated statement. Type: the inner statement's type — decoration
    /// is transparent.
    pub fn decorated(raw: &RawNode) -> Result<TypedNode, BuildError> {
        let RawKind::Decorated {
            decorator,
            args,
            inner,
        } = &raw.kind
        else {
            return Err(unexpected("decorated statement", raw));
        };
        let args = args
            .iter()
            .map(TypedNode::from_raw)
            .collect::<Result<Vec<_>, _>>()?;
        let inner = TypedNode::from_raw(inner)?;
        Ok(TypedNode {
            span: raw.span.clone(),
            ty: inner.ty().clone(),
            kind: NodeKind::Decorated {
                decorator: Arc::from(decorator.as_str()),
                args,
                inner: Box::new(inner),
            },
        })
    }

    /// Lambda. Type: `Lambda` over the annotated parameter types (`Any`
    /// where unannotated) with an `Any` result.
    pub fn lambda(raw: &RawNode) -> Result<TypedNode, BuildError> {
        let RawKind::Lambda { params, body } = &raw.kind else {
            return Err(unexpected("lambda", raw));
        };
        let params = params
            .iter()
            .map(resolve_param)
            .collect::<Result<Vec<_>, _>>()?;
        let body = TypedNode::from_raw(body)?;
        let ty = AugurType::lambda(params.iter().map(|p| p.ty.clone()), AugurType::Any);
        Ok(TypedNode {
            span: raw.span.clone(),
            ty,
            kind: NodeKind::Lambda {
                params,
                body: Box::new(body),
            },
        })
    }

    /// Function application. Type: `Any` — resolved at dispatch time.
    pub fn call(raw: &RawNode) -> Result<TypedNode, BuildError> {
        let RawKind::Call { callee, args } = &raw.kind else {
            return Err(unexpected("call", raw));
        };
        let callee = TypedNode::from_raw(callee)?;
        let args = args
            .iter()
            .map(TypedNode::from_raw)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TypedNode {
            span: raw.span.clone(),
            ty: AugurType::Any,
            kind: NodeKind::Call {
                callee: Box::new(callee),
                args,
            },
        })
    }

    /// Ternary conditional. Type: the branches' common type, or their
    /// union when they disagree.
    pub fn ternary(raw: &RawNode) -> Result<TypedNode, BuildError> {
        let RawKind::Ternary {
            condition,
            then_branch,
            else_branch,
        } = &raw.kind
        else {
            return Err(unexpected("ternary", raw));
        };
        let condition = TypedNode::from_raw(condition)?;
        let then_branch = TypedNode::from_raw(then_branch)?;
        let else_branch = TypedNode::from_raw(else_branch)?;
        let ty = if then_branch.ty() == else_branch.ty() {
            then_branch.ty().clone()
        } else {
            AugurType::union(vec![then_branch.ty().clone(), else_branch.ty().clone()])
        };
        Ok(TypedNode {
            span: raw.span.clone(),
            ty,
            kind: NodeKind::Ternary {
                condition: Box::new(condition),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
        })
    }

    /// Whole program. Type: the last statement's type, `Void` if empty.
    pub fn program(raw: &RawNode) -> Result<TypedNode, BuildError> {
        let RawKind::Program { statements } = &raw.kind else {
            return Err(unexpected("program", raw));
        };
        let statements = statements
            .iter()
            .map(TypedNode::from_raw)
            .collect::<Result<Vec<_>, _>>()?;
        let ty = statements
            .last()
            .map(|s| s.ty().clone())
            .unwrap_or(AugurType::Void);
        Ok(TypedNode {
            span: raw.span.clone(),
            ty,
            kind: NodeKind::Program { statements },
        })
    }
}

fn unexpected(expected: &'static str, raw: &RawNode) -> BuildError {
    BuildError::UnexpectedShape {
        expected,
        found: raw.kind_name(),
    }
}

fn resolve_param(param: &RawParam) -> Result<LambdaParam, BuildError> {
    let ty = match &param.annotation {
        Some(name) => AugurType::from_name(name)
            .ok_or_else(|| BuildError::UnknownAnnotation(name.clone()))?,
        None => AugurType::Any,
    };
    Ok(LambdaParam {
        name: Arc::from(param.name.as_str()),
        ty,
    })
}

/// The single type shared by all items, or `Any` when they disagree or
/// there are none.
fn unified_type<'a>(mut types: impl Iterator<Item = &'a AugurType>) -> AugurType {
    let Some(first) = types.next() else {
        return AugurType::Any;
    };
    if types.all(|t| t == first) {
        first.clone()
    } else {
        AugurType::Any
    }
}

// ==================== Accessors ====================

impl TypedNode {
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// The node's resolved static type.
    pub fn ty(&self) -> &AugurType {
        &self.ty
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Direct child nodes in evaluation order (left-to-right source
    /// order). Tree-walking consumers must rely on this ordering.
    pub fn children(&self) -> Vec<&TypedNode> {
        match &self.kind {
            NodeKind::FloatLiteral { .. }
            | NodeKind::StringLiteral(_)
            | NodeKind::BoolLiteral(_)
            | NodeKind::Identifier(_) => Vec::new(),
            NodeKind::Array(items) => items.iter().collect(),
            NodeKind::Dict(entries) => entries.iter().map(|(_, v)| v).collect(),
            NodeKind::Block(statements) | NodeKind::Program { statements } => {
                statements.iter().collect()
            }
            NodeKind::LetStatement { value, .. } => vec![value],
            NodeKind::DefunStatement { lambda, .. } => vec![lambda],
            NodeKind::Decorated { args, inner, .. } => {
                args.iter().chain(std::iter::once(inner.as_ref())).collect()
            }
            NodeKind::Lambda { body, .. } => vec![body],
            NodeKind::Call { callee, args } => {
                std::iter::once(callee.as_ref()).chain(args.iter()).collect()
            }
            NodeKind::Ternary {
                condition,
                then_branch,
                else_branch,
            } => vec![condition, then_branch, else_branch],
        }
    }

    /// Unwrap decoration layers until a non-decorated node is reached.
    ///
    /// Callers inspecting let/function-definition statements must go
    /// through this rather than matching the outer kind — decoration can
    /// wrap bindings arbitrarily deep.
    pub fn undecorated(&self) -> &TypedNode {
        let mut node = self;
        while let NodeKind::Decorated { inner, .. } = &node.kind {
            node = inner.as_ref();
        }
        node
    }

    /// True when this statement introduces a name binding: a let
    /// statement, a function definition, or a decorated wrapper around
    /// either.
    pub fn is_binding_statement(&self) -> bool {
        matches!(
            self.undecorated().kind,
            NodeKind::LetStatement { .. } | NodeKind::DefunStatement { .. }
        )
    }

    /// The name this statement binds, through any decoration layers.
    pub fn binding_name(&self) -> Option<&str> {
        match &self.undecorated().kind {
            NodeKind::LetStatement { name, .. } => Some(name),
            NodeKind::DefunStatement { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The numeric value of a float literal, reassembled from its source
    /// parts. `None` for other node kinds.
    pub fn float_value(&self) -> Option<f64> {
        let NodeKind::FloatLiteral {
            integer,
            fractional,
            exponent,
        } = &self.kind
        else {
            return None;
        };
        let mut text = integer.to_string();
        if let Some(digits) = fractional {
            text.push('.');
            text.push_str(digits);
        }
        if let Some(exp) = exponent {
            text.push('e');
            text.push_str(&exp.to_string());
        }
        text.parse().ok()
    }
}
