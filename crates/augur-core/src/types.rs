//! Type descriptors for Augur values.
//!
//! `AugurType` is the closed set of descriptors paralleling the value
//! kinds, plus composite descriptors for arrays, dictionaries, unions, and
//! lambda signatures. Descriptors drive three things: signature matching in
//! the builtin registry, persistence of type annotations, and the default
//! presentation hint for form-driven hosts.
//!
//! Descriptors are stateless and side-effect-free. Equality is structural
//! (`PartialEq` on the enum), never identity-based — descriptors are
//! rebuilt freely.

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value as Json};

use crate::error::SerializationError;
use crate::value::Value;

/// Presentation hint for a value of a given type.
///
/// Hosts that render editable inputs (e.g. calculator forms) key their
/// widget choice off this; the widgets themselves live outside this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    /// Single-line text entry.
    Text,
    /// Multi-line text entry, for code-like payloads.
    TextArea,
    /// Boolean toggle.
    Checkbox,
    /// Choice among fixed options.
    Select,
}

impl FormInput {
    /// Stable name used in serialized calculator metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormInput::Text => "Text",
            FormInput::TextArea => "TextArea",
            FormInput::Checkbox => "Checkbox",
            FormInput::Select => "Select",
        }
    }

    /// Inverse of [`FormInput::as_str`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Text" => Some(FormInput::Text),
            "TextArea" => Some(FormInput::TextArea),
            "Checkbox" => Some(FormInput::Checkbox),
            "Select" => Some(FormInput::Select),
            _ => None,
        }
    }
}

/// A declared field of a dictionary type.
#[derive(Debug, Clone, PartialEq)]
pub struct DictField {
    pub name: Arc<str>,
    pub ty: AugurType,
    /// Optional fields may be absent from a matching dictionary value.
    pub optional: bool,
}

impl DictField {
    pub fn new(name: impl Into<Arc<str>>, ty: AugurType) -> Self {
        Self {
            name: name.into(),
            ty,
            optional: false,
        }
    }

    /// Mark this field as allowed to be absent.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// An Augur type descriptor.
///
/// One variant per value kind, plus composite descriptors. `Any` matches
/// every value and is the type of expressions whose result kind is only
/// known at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub enum AugurType {
    Number,
    Bool,
    String,
    Date,
    Duration,
    /// A probability distribution.
    Dist,
    /// Homogeneous array: every element must match the element descriptor.
    Array(Arc<AugurType>),
    /// Dictionary with declared fields. Keys not declared here are allowed;
    /// declared non-optional fields must be present and match.
    Dict(Arc<[DictField]>),
    /// Matches when any arm matches.
    Union(Arc<[AugurType]>),
    /// A lambda with the given parameter descriptors and result.
    Lambda {
        params: Arc<[AugurType]>,
        result: Arc<AugurType>,
    },
    /// A calculator widget.
    Calculator,
    Void,
    /// Matches every value.
    Any,
}

// ==================== Constructors ====================

impl AugurType {
    /// Create an array descriptor with the given element type.
    pub fn array(elem: AugurType) -> Self {
        AugurType::Array(Arc::new(elem))
    }

    /// Create a dictionary descriptor from declared fields.
    pub fn dict(fields: impl IntoIterator<Item = DictField>) -> Self {
        AugurType::Dict(fields.into_iter().collect())
    }

    /// Create a union descriptor. Matching tries arms in order.
    pub fn union(arms: impl IntoIterator<Item = AugurType>) -> Self {
        AugurType::Union(arms.into_iter().collect())
    }

    /// Create a lambda descriptor with the given signature.
    pub fn lambda(params: impl IntoIterator<Item = AugurType>, result: AugurType) -> Self {
        AugurType::Lambda {
            params: params.into_iter().collect(),
            result: Arc::new(result),
        }
    }

    /// Resolve a source-level type annotation to a descriptor.
    ///
    /// Only the non-composite names are addressable from annotations.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Number" => Some(AugurType::Number),
            "Bool" => Some(AugurType::Bool),
            "String" => Some(AugurType::String),
            "Date" => Some(AugurType::Date),
            "Duration" => Some(AugurType::Duration),
            "Dist" => Some(AugurType::Dist),
            "Calculator" => Some(AugurType::Calculator),
            "Void" => Some(AugurType::Void),
            "Any" => Some(AugurType::Any),
            _ => None,
        }
    }
}

// ==================== Matching ====================

impl AugurType {
    /// Returns true iff the value's kind matches this descriptor,
    /// recursively for composites.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (AugurType::Any, _) => true,
            (AugurType::Number, Value::Number(_)) => true,
            (AugurType::Bool, Value::Bool(_)) => true,
            (AugurType::String, Value::String(_)) => true,
            (AugurType::Date, Value::Date(_)) => true,
            (AugurType::Duration, Value::Duration(_)) => true,
            (AugurType::Dist, Value::Dist(_)) => true,
            (AugurType::Array(elem), Value::Array(items)) => {
                items.iter().all(|item| elem.matches(item))
            }
            (AugurType::Dict(fields), Value::Dict(map)) => fields.iter().all(|field| {
                match map.get(&field.name) {
                    Some(v) => field.ty.matches(v),
                    None => field.optional,
                }
            }),
            (AugurType::Union(arms), v) => arms.iter().any(|arm| arm.matches(v)),
            (AugurType::Lambda { params, .. }, Value::Lambda(lambda)) => {
                params.len() == lambda.params.len()
                    && params.iter().zip(lambda.params.iter()).all(|(decl, param)| {
                        matches!(decl, AugurType::Any) || *decl == param.ty
                    })
            }
            (AugurType::Calculator, Value::Calculator(_)) => true,
            (AugurType::Void, Value::Void) => true,
            _ => false,
        }
    }

    /// Type-testing accessor: the value back iff it matches this
    /// descriptor, `None` otherwise. Never fails — callers branch on
    /// presence.
    ///
    /// In this representation the payload of a matched value is the value
    /// itself; kind-specific extraction goes through the `Value::as_*`
    /// accessors.
    pub fn unpack(&self, value: &Value) -> Option<Value> {
        self.matches(value).then(|| value.clone())
    }

    /// Constructor counterpart of [`AugurType::unpack`]: re-wraps a payload
    /// produced by `unpack`, so `pack(unpack(v)) == v` for every matching
    /// `v`.
    pub fn pack(&self, payload: Value) -> Value {
        payload
    }
}

// ==================== Presentation ====================

impl AugurType {
    /// The default form-input widget for editing a value of this type.
    pub fn default_form_input(&self) -> FormInput {
        match self {
            AugurType::Bool => FormInput::Checkbox,
            AugurType::Dist
            | AugurType::Array(_)
            | AugurType::Dict(_)
            | AugurType::Lambda { .. }
            | AugurType::Calculator => FormInput::TextArea,
            AugurType::Union(arms) => arms
                .first()
                .map(AugurType::default_form_input)
                .unwrap_or(FormInput::Text),
            _ => FormInput::Text,
        }
    }
}

// ==================== Serialization ====================

impl AugurType {
    /// The kind tag used in the serialized form.
    pub fn kind_name(&self) -> &'static str {
        match self {
            AugurType::Number => "Number",
            AugurType::Bool => "Bool",
            AugurType::String => "String",
            AugurType::Date => "Date",
            AugurType::Duration => "Duration",
            AugurType::Dist => "Dist",
            AugurType::Array(_) => "Array",
            AugurType::Dict(_) => "Dict",
            AugurType::Union(_) => "Union",
            AugurType::Lambda { .. } => "Lambda",
            AugurType::Calculator => "Calculator",
            AugurType::Void => "Void",
            AugurType::Any => "Any",
        }
    }

    /// Serialize to the structural, language-agnostic description used to
    /// persist type annotations. Composites recurse.
    pub fn serialize(&self) -> Json {
        match self {
            AugurType::Array(elem) => json!({
                "kind": "Array",
                "element": elem.serialize(),
            }),
            AugurType::Dict(fields) => json!({
                "kind": "Dict",
                "fields": fields
                    .iter()
                    .map(|f| json!({
                        "name": f.name.as_ref(),
                        "type": f.ty.serialize(),
                        "optional": f.optional,
                    }))
                    .collect::<Vec<_>>(),
            }),
            AugurType::Union(arms) => json!({
                "kind": "Union",
                "variants": arms.iter().map(AugurType::serialize).collect::<Vec<_>>(),
            }),
            AugurType::Lambda { params, result } => json!({
                "kind": "Lambda",
                "params": params.iter().map(AugurType::serialize).collect::<Vec<_>>(),
                "result": result.serialize(),
            }),
            other => json!({ "kind": other.kind_name() }),
        }
    }

    /// Reconstruct a descriptor from its serialized form.
    pub fn deserialize(json: &Json) -> Result<Self, SerializationError> {
        let kind = json
            .get("kind")
            .and_then(Json::as_str)
            .ok_or_else(|| SerializationError::payload_shape("Type", "missing kind tag"))?;

        match kind {
            "Array" => {
                let elem = json.get("element").ok_or_else(|| {
                    SerializationError::payload_shape("Array", "missing element")
                })?;
                Ok(AugurType::array(AugurType::deserialize(elem)?))
            }
            "Dict" => {
                let fields = json
                    .get("fields")
                    .and_then(Json::as_array)
                    .ok_or_else(|| SerializationError::payload_shape("Dict", "missing fields"))?;
                let fields = fields
                    .iter()
                    .map(|f| {
                        let name = f.get("name").and_then(Json::as_str).ok_or_else(|| {
                            SerializationError::payload_shape("Dict", "field missing name")
                        })?;
                        let ty = f.get("type").ok_or_else(|| {
                            SerializationError::payload_shape("Dict", "field missing type")
                        })?;
                        Ok(DictField {
                            name: Arc::from(name),
                            ty: AugurType::deserialize(ty)?,
                            optional: f
                                .get("optional")
                                .and_then(Json::as_bool)
                                .unwrap_or(false),
                        })
                    })
                    .collect::<Result<Vec<_>, SerializationError>>()?;
                Ok(AugurType::dict(fields))
            }
            "Union" => {
                let arms = json
                    .get("variants")
                    .and_then(Json::as_array)
                    .ok_or_else(|| SerializationError::payload_shape("Union", "missing variants"))?;
                let arms = arms
                    .iter()
                    .map(AugurType::deserialize)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(AugurType::union(arms))
            }
            "Lambda" => {
                let params = json
                    .get("params")
                    .and_then(Json::as_array)
                    .ok_or_else(|| SerializationError::payload_shape("Lambda", "missing params"))?;
                let params = params
                    .iter()
                    .map(AugurType::deserialize)
                    .collect::<Result<Vec<_>, _>>()?;
                let result = json.get("result").ok_or_else(|| {
                    SerializationError::payload_shape("Lambda", "missing result")
                })?;
                Ok(AugurType::lambda(params, AugurType::deserialize(result)?))
            }
            other => AugurType::from_name(other)
                .ok_or_else(|| SerializationError::UnknownKind(other.to_string())),
        }
    }
}

// ==================== Display ====================

impl AugurType {
    /// Canonical rendering of this type, as shown in diagnostics.
    pub fn display_name(&self) -> String {
        match self {
            AugurType::Array(elem) => format!("Array({})", elem.display_name()),
            AugurType::Dict(fields) => {
                let fields: Vec<_> = fields
                    .iter()
                    .map(|f| {
                        format!(
                            "{}{}: {}",
                            f.name,
                            if f.optional { "?" } else { "" },
                            f.ty.display_name()
                        )
                    })
                    .collect();
                format!("{{{}}}", fields.join(", "))
            }
            AugurType::Union(arms) => arms
                .iter()
                .map(AugurType::display_name)
                .collect::<Vec<_>>()
                .join("|"),
            AugurType::Lambda { params, result } => {
                let params: Vec<_> = params.iter().map(AugurType::display_name).collect();
                format!("({}) => {}", params.join(", "), result.display_name())
            }
            other => other.kind_name().to_string(),
        }
    }
}

impl fmt::Display for AugurType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
