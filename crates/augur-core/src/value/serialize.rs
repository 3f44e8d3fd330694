//! The value wire codec.
//!
//! Every value encodes as `{ "kind": <tag>, "payload": <kind-specific
//! JSON> }`, recursively for containers. The pairing is bidirectional:
//! [`serialize_value`] and [`deserialize_value`] round-trip every kind
//! except lambdas and calculators, whose payloads embed expression trees.
//! Those go through the `_with` entry points, which thread an explicit,
//! caller-owned [`ValueStore`] interning the trees; serializing them
//! without a store is a typed failure, not a lossy fallback.

use std::sync::Arc;

use serde_json::{json, Map, Value as Json};
use tracing::trace;

use super::{
    Calculator, CalculatorInput, DateValue, Dist, DurationValue, Lambda, LambdaParam, Value,
};
use crate::ast::TypedNode;
use crate::error::SerializationError;
use crate::types::{AugurType, FormInput};

/// Caller-owned table of lambda bodies referenced by serialized payloads.
///
/// The caller persists the store alongside the payloads and supplies it
/// again at deserialization time; this core neither stores nor collects it.
#[derive(Debug, Clone, Default)]
pub struct ValueStore {
    entries: Vec<Arc<TypedNode>>,
}

impl ValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern an expression tree, returning its index. The same tree
    /// (by identity) interns to the same index.
    pub fn intern(&mut self, body: &Arc<TypedNode>) -> usize {
        if let Some(index) = self.entries.iter().position(|e| Arc::ptr_eq(e, body)) {
            return index;
        }
        self.entries.push(body.clone());
        self.entries.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Arc<TypedNode>> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serialize a value to its `{kind, payload}` encoding.
///
/// Fails with [`SerializationError::NonSerializable`] for lambdas and
/// calculators; use [`serialize_value_with`] for those.
pub fn serialize_value(value: &Value) -> Result<Json, SerializationError> {
    serialize_inner(value, None)
}

/// Serialize a value, interning embedded expression trees in `store`.
pub fn serialize_value_with(
    value: &Value,
    store: &mut ValueStore,
) -> Result<Json, SerializationError> {
    trace!(kind = value.kind(), "serializing value with store");
    serialize_inner(value, Some(store))
}

/// Reconstruct a value from its `{kind, payload}` encoding.
pub fn deserialize_value(json: &Json) -> Result<Value, SerializationError> {
    deserialize_inner(json, None)
}

/// Reconstruct a value, resolving embedded expression trees from `store`.
pub fn deserialize_value_with(
    json: &Json,
    store: &ValueStore,
) -> Result<Value, SerializationError> {
    deserialize_inner(json, Some(store))
}

fn serialize_inner(
    value: &Value,
    mut store: Option<&mut ValueStore>,
) -> Result<Json, SerializationError> {
    let payload = match value {
        Value::Number(n) => json!(n),
        Value::Bool(b) => json!(b),
        Value::String(s) => json!(s.as_ref()),
        Value::Date(d) => json!(d.ms()),
        Value::Duration(d) => json!(d.ms()),
        Value::Dist(dist) => serialize_dist(dist),
        Value::Array(items) => {
            let items = items
                .iter()
                .map(|item| serialize_inner(item, store.as_deref_mut()))
                .collect::<Result<Vec<_>, _>>()?;
            Json::Array(items)
        }
        Value::Dict(map) => {
            let mut entries = Map::new();
            for (key, entry) in map.iter() {
                entries.insert(key.to_string(), serialize_inner(entry, store.as_deref_mut())?);
            }
            Json::Object(entries)
        }
        Value::Lambda(lambda) => match store {
            Some(store) => serialize_lambda(lambda, store),
            None => return Err(SerializationError::NonSerializable("Lambda")),
        },
        Value::Calculator(calculator) => match store {
            Some(store) => serialize_calculator(calculator, store),
            None => return Err(SerializationError::NonSerializable("Calculator")),
        },
        Value::Void => Json::Null,
    };

    Ok(json!({ "kind": value.kind(), "payload": payload }))
}

fn serialize_dist(dist: &Dist) -> Json {
    match dist {
        Dist::Symbolic(super::SymbolicDist::Normal { mean, stdev }) => {
            json!({ "type": "normal", "mean": mean, "stdev": stdev })
        }
        Dist::Symbolic(super::SymbolicDist::Uniform { low, high }) => {
            json!({ "type": "uniform", "low": low, "high": high })
        }
        Dist::Symbolic(super::SymbolicDist::PointMass { value }) => {
            json!({ "type": "pointMass", "value": value })
        }
        Dist::Samples(samples) => json!({ "type": "samples", "samples": samples.as_ref() }),
    }
}

fn serialize_lambda(lambda: &Lambda, store: &mut ValueStore) -> Json {
    let params: Vec<Json> = lambda
        .params
        .iter()
        .map(|p| json!({ "name": p.name.as_ref(), "type": p.ty.serialize() }))
        .collect();
    json!({
        "name": lambda.name.as_deref(),
        "params": params,
        "body": store.intern(&lambda.body),
    })
}

fn serialize_calculator(calculator: &Calculator, store: &mut ValueStore) -> Json {
    let inputs: Vec<Json> = calculator
        .inputs
        .iter()
        .map(|input| {
            json!({
                "name": input.name.as_ref(),
                "type": input.ty.serialize(),
                "input": input.input.as_str(),
                "default": input.default.as_deref(),
            })
        })
        .collect();
    json!({
        "func": serialize_lambda(&calculator.func, store),
        "title": calculator.title.as_deref(),
        "description": calculator.description.as_deref(),
        "inputs": inputs,
        "autorun": calculator.autorun,
    })
}

fn deserialize_inner(
    json: &Json,
    store: Option<&ValueStore>,
) -> Result<Value, SerializationError> {
    let kind = json
        .get("kind")
        .and_then(Json::as_str)
        .ok_or_else(|| SerializationError::payload_shape("Value", "missing kind tag"))?;
    let payload = json
        .get("payload")
        .ok_or_else(|| SerializationError::payload_shape("Value", "missing payload"))?;

    match kind {
        "Number" => payload
            .as_f64()
            .map(Value::number)
            .ok_or_else(|| SerializationError::payload_shape("Number", "expected a number")),
        "Bool" => payload
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| SerializationError::payload_shape("Bool", "expected a boolean")),
        "String" => payload
            .as_str()
            .map(Value::string)
            .ok_or_else(|| SerializationError::payload_shape("String", "expected a string")),
        "Date" => payload
            .as_f64()
            .map(|ms| Value::date(DateValue::from_ms(ms)))
            .ok_or_else(|| SerializationError::payload_shape("Date", "expected milliseconds")),
        "Duration" => payload
            .as_f64()
            .map(|ms| Value::duration(DurationValue::from_ms(ms)))
            .ok_or_else(|| {
                SerializationError::payload_shape("Duration", "expected milliseconds")
            }),
        "Dist" => deserialize_dist(payload).map(Value::dist),
        "Array" => {
            let items = payload.as_array().ok_or_else(|| {
                SerializationError::payload_shape("Array", "expected an array")
            })?;
            let items = items
                .iter()
                .map(|item| deserialize_inner(item, store))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::array(items))
        }
        "Dict" => {
            let entries = payload.as_object().ok_or_else(|| {
                SerializationError::payload_shape("Dict", "expected an object")
            })?;
            let entries = entries
                .iter()
                .map(|(key, entry)| {
                    Ok((Arc::<str>::from(key.as_str()), deserialize_inner(entry, store)?))
                })
                .collect::<Result<Vec<_>, SerializationError>>()?;
            Ok(Value::dict(entries))
        }
        "Lambda" => {
            let store = store.ok_or(SerializationError::NonSerializable("Lambda"))?;
            deserialize_lambda(payload, store).map(Value::lambda)
        }
        "Calculator" => {
            let store = store.ok_or(SerializationError::NonSerializable("Calculator"))?;
            deserialize_calculator(payload, store).map(Value::calculator)
        }
        "Void" => Ok(Value::Void),
        other => Err(SerializationError::UnknownKind(other.to_string())),
    }
}

fn deserialize_dist(payload: &Json) -> Result<Dist, SerializationError> {
    let shape = payload
        .get("type")
        .and_then(Json::as_str)
        .ok_or_else(|| SerializationError::payload_shape("Dist", "missing type"))?;

    let field = |name: &'static str| {
        payload.get(name).and_then(Json::as_f64).ok_or_else(|| {
            SerializationError::payload_shape("Dist", format!("missing field '{name}'"))
        })
    };

    match shape {
        "normal" => Ok(Dist::normal(field("mean")?, field("stdev")?)),
        "uniform" => Ok(Dist::uniform(field("low")?, field("high")?)),
        "pointMass" => Ok(Dist::point_mass(field("value")?)),
        "samples" => {
            let samples = payload
                .get("samples")
                .and_then(Json::as_array)
                .ok_or_else(|| SerializationError::payload_shape("Dist", "missing samples"))?;
            let samples = samples
                .iter()
                .map(|s| {
                    s.as_f64().ok_or_else(|| {
                        SerializationError::payload_shape("Dist", "non-numeric sample")
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Dist::from_samples(samples))
        }
        other => Err(SerializationError::payload_shape(
            "Dist",
            format!("unknown distribution type '{other}'"),
        )),
    }
}

fn deserialize_lambda(payload: &Json, store: &ValueStore) -> Result<Lambda, SerializationError> {
    let params = payload
        .get("params")
        .and_then(Json::as_array)
        .ok_or_else(|| SerializationError::payload_shape("Lambda", "missing params"))?;
    let params = params
        .iter()
        .map(|p| {
            let name = p.get("name").and_then(Json::as_str).ok_or_else(|| {
                SerializationError::payload_shape("Lambda", "param missing name")
            })?;
            let ty = p.get("type").ok_or_else(|| {
                SerializationError::payload_shape("Lambda", "param missing type")
            })?;
            Ok(LambdaParam::new(name, AugurType::deserialize(ty)?))
        })
        .collect::<Result<Vec<_>, SerializationError>>()?;

    let index = payload
        .get("body")
        .and_then(Json::as_u64)
        .ok_or_else(|| SerializationError::payload_shape("Lambda", "missing body index"))?
        as usize;
    let body = store
        .get(index)
        .ok_or(SerializationError::MissingStoreEntry(index))?
        .clone();

    let mut lambda = Lambda::new(params, body);
    if let Some(name) = payload.get("name").and_then(Json::as_str) {
        lambda = lambda.named(name);
    }
    Ok(lambda)
}

fn deserialize_calculator(
    payload: &Json,
    store: &ValueStore,
) -> Result<Calculator, SerializationError> {
    let func = payload
        .get("func")
        .ok_or_else(|| SerializationError::payload_shape("Calculator", "missing func"))?;
    let func = deserialize_lambda(func, store)?;

    let inputs = payload
        .get("inputs")
        .and_then(Json::as_array)
        .ok_or_else(|| SerializationError::payload_shape("Calculator", "missing inputs"))?;
    let inputs = inputs
        .iter()
        .map(|input| {
            let name = input.get("name").and_then(Json::as_str).ok_or_else(|| {
                SerializationError::payload_shape("Calculator", "input missing name")
            })?;
            let ty = input.get("type").ok_or_else(|| {
                SerializationError::payload_shape("Calculator", "input missing type")
            })?;
            let mut built = CalculatorInput::new(name, AugurType::deserialize(ty)?);
            if let Some(widget) = input.get("input").and_then(Json::as_str) {
                let widget = FormInput::from_name(widget).ok_or_else(|| {
                    SerializationError::payload_shape(
                        "Calculator",
                        format!("unknown form input '{widget}'"),
                    )
                })?;
                built = built.with_input(widget);
            }
            if let Some(default) = input.get("default").and_then(Json::as_str) {
                built = built.with_default(default);
            }
            Ok(built)
        })
        .collect::<Result<Vec<_>, SerializationError>>()?;

    let mut calculator = Calculator::for_lambda(func).with_inputs(inputs);
    if let Some(title) = payload.get("title").and_then(Json::as_str) {
        calculator = calculator.with_title(title);
    }
    if let Some(description) = payload.get("description").and_then(Json::as_str) {
        calculator = calculator.with_description(description);
    }
    if let Some(autorun) = payload.get("autorun").and_then(Json::as_bool) {
        calculator = calculator.with_autorun(autorun);
    }
    Ok(calculator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_tree::{RawKind, RawNode};

    fn roundtrip(value: &Value) -> Value {
        let json = serialize_value(value).expect("serialize");
        deserialize_value(&json).expect("deserialize")
    }

    #[test]
    fn plain_kinds_roundtrip() {
        let values = [
            Value::number(42.5),
            Value::Bool(true),
            Value::string("hello"),
            Value::date(DateValue::from_ms(86_400_000.0)),
            Value::duration(DurationValue::from_hours(3.0)),
            Value::dist(Dist::normal(5.0, 2.0)),
            Value::dist(Dist::from_samples(vec![1.0, 2.0, 3.0])),
            Value::array(vec![Value::number(1.0), Value::string("two")]),
            Value::dict(vec![
                ("x".into(), Value::number(5.0)),
                ("y".into(), Value::array(vec![Value::Bool(false)])),
            ]),
            Value::void(),
        ];
        for value in &values {
            assert_eq!(&roundtrip(value), value, "kind {}", value.kind());
        }
    }

    #[test]
    fn encoding_shape() {
        let json = serialize_value(&Value::number(5.0)).unwrap();
        assert_eq!(json["kind"], "Number");
        assert_eq!(json["payload"], 5.0);

        let json = serialize_value(&Value::dist(Dist::uniform(0.0, 1.0))).unwrap();
        assert_eq!(json["kind"], "Dist");
        assert_eq!(json["payload"]["type"], "uniform");
    }

    #[test]
    fn lambda_requires_store() {
        let body = Arc::new(
            TypedNode::from_raw(&RawNode::new(0..1, RawKind::Identifier("x".to_string())))
                .unwrap(),
        );
        let lambda = Value::lambda(Lambda::new(
            vec![LambdaParam::new("x", crate::types::AugurType::Number)],
            body,
        ));

        assert!(matches!(
            serialize_value(&lambda),
            Err(SerializationError::NonSerializable("Lambda"))
        ));
    }

    #[test]
    fn lambda_roundtrips_through_store() {
        let body = Arc::new(
            TypedNode::from_raw(&RawNode::new(0..1, RawKind::Identifier("x".to_string())))
                .unwrap(),
        );
        let lambda = Value::lambda(
            Lambda::new(
                vec![LambdaParam::new("x", crate::types::AugurType::Number)],
                body,
            )
            .named("double"),
        );

        let mut store = ValueStore::new();
        let json = serialize_value_with(&lambda, &mut store).unwrap();
        assert_eq!(store.len(), 1);

        let back = deserialize_value_with(&json, &store).unwrap();
        assert_eq!(back, lambda);
    }

    #[test]
    fn calculator_roundtrips_through_store() {
        let body = Arc::new(
            TypedNode::from_raw(&RawNode::new(0..1, RawKind::Identifier("x".to_string())))
                .unwrap(),
        );
        let calculator = Value::calculator(
            Calculator::for_lambda(Lambda::new(
                vec![LambdaParam::new("x", crate::types::AugurType::Dist)],
                body,
            ))
            .with_title("Estimate")
            .with_autorun(false),
        );

        let mut store = ValueStore::new();
        let json = serialize_value_with(&calculator, &mut store).unwrap();
        let back = deserialize_value_with(&json, &store).unwrap();
        assert_eq!(back, calculator);
    }

    #[test]
    fn interning_is_by_identity() {
        let body = Arc::new(
            TypedNode::from_raw(&RawNode::new(0..1, RawKind::Identifier("x".to_string())))
                .unwrap(),
        );
        let mut store = ValueStore::new();
        assert_eq!(store.intern(&body), 0);
        assert_eq!(store.intern(&body), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_store_entry_is_reported() {
        let json = json!({
            "kind": "Lambda",
            "payload": { "name": null, "params": [], "body": 3 },
        });
        let store = ValueStore::new();
        assert!(matches!(
            deserialize_value_with(&json, &store),
            Err(SerializationError::MissingStoreEntry(3))
        ));
    }

    #[test]
    fn payload_shape_mismatch_is_reported() {
        let json = json!({ "kind": "Number", "payload": "five" });
        assert!(matches!(
            deserialize_value(&json),
            Err(SerializationError::PayloadShape { kind: "Number", .. })
        ));
    }

    #[test]
    fn unknown_kind_is_reported() {
        let json = json!({ "kind": "Matrix", "payload": [] });
        assert!(matches!(
            deserialize_value(&json),
            Err(SerializationError::UnknownKind(_))
        ));
    }

    #[test]
    fn nested_container_with_dist_roundtrips() {
        let value = Value::dict(vec![(
            "y".into(),
            Value::array(vec![
                Value::number(3.0),
                Value::dict(vec![("dist".into(), Value::dist(Dist::normal(0.0, 1.0)))]),
            ]),
        )]);
        assert_eq!(roundtrip(&value), value);
    }
}
