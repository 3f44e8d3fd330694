//! Serialization round-trip properties across the public API.

use std::sync::Arc;

use augur_core::{
    deserialize_value, deserialize_value_with, serialize_value, serialize_value_with, AugurType,
    Calculator, DateValue, Dist, DurationValue, Lambda, LambdaParam, RawKind, RawNode,
    SerializationError, TypedNode, Value, ValueStore,
};

fn lambda_body() -> Arc<TypedNode> {
    let raw = RawNode::new(
        4..9,
        RawKind::Call {
            callee: Box::new(RawNode::new(4..5, RawKind::Identifier("f".to_string()))),
            args: vec![RawNode::new(6..8, RawKind::Identifier("x".to_string()))],
        },
    );
    Arc::new(TypedNode::from_raw(&raw).unwrap())
}

#[test]
fn every_serializable_kind_roundtrips() {
    let values = [
        Value::number(2.5),
        Value::number(-0.0),
        Value::Bool(false),
        Value::string(""),
        Value::string("multi\nline"),
        Value::date(DateValue::from_ymd(2024, 12, 31).unwrap()),
        Value::duration(DurationValue::from_years(1.5)),
        Value::dist(Dist::normal(5.0, 2.0)),
        Value::dist(Dist::uniform(-1.0, 1.0)),
        Value::dist(Dist::point_mass(3.0)),
        Value::dist(Dist::from_samples(vec![0.5, 1.5, 2.5])),
        Value::array(Vec::new()),
        Value::array(vec![
            Value::number(1.0),
            Value::array(vec![Value::string("nested")]),
        ]),
        Value::dict(vec![
            ("a".into(), Value::void()),
            ("b".into(), Value::dist(Dist::point_mass(1.0))),
        ]),
        Value::void(),
    ];

    for value in &values {
        let json = serialize_value(value).expect("serialize");
        let back = deserialize_value(&json).expect("deserialize");
        assert_eq!(&back, value, "round trip of {}", value.kind());
    }
}

#[test]
fn wire_shape_is_kind_plus_payload() {
    let json = serialize_value(&Value::string("hi")).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert_eq!(object["kind"], "String");
    assert_eq!(object["payload"], "hi");
}

#[test]
fn dict_key_order_survives_the_wire() {
    let value = Value::dict(vec![
        ("zebra".into(), Value::number(1.0)),
        ("apple".into(), Value::number(2.0)),
    ]);
    let json = serialize_value(&value).unwrap();
    let keys: Vec<&String> = json["payload"].as_object().unwrap().keys().collect();
    assert_eq!(keys, ["apple", "zebra"]);
}

#[test]
fn lambda_serialization_requires_the_store() {
    let lambda = Value::lambda(Lambda::new(
        vec![LambdaParam::new("x", AugurType::Number)],
        lambda_body(),
    ));

    assert!(matches!(
        serialize_value(&lambda),
        Err(SerializationError::NonSerializable("Lambda"))
    ));
}

#[test]
fn calculator_roundtrips_through_a_caller_owned_store() {
    let calculator = Value::calculator(
        Calculator::for_lambda(
            Lambda::new(
                vec![
                    LambdaParam::new("rate", AugurType::Dist),
                    LambdaParam::new("label", AugurType::String),
                ],
                lambda_body(),
            )
            .named("payoff"),
        )
        .with_title("Payoff estimate")
        .with_description("Expected payoff under a rate distribution")
        .with_autorun(false),
    );

    let mut store = ValueStore::new();
    let json = serialize_value_with(&calculator, &mut store).unwrap();

    // The embedded tree lives in the store, not the payload.
    assert_eq!(store.len(), 1);
    assert_eq!(json["payload"]["func"]["body"], 0);

    let back = deserialize_value_with(&json, &store).unwrap();
    assert_eq!(back, calculator);
}

#[test]
fn containers_of_lambdas_intern_shared_bodies_once() {
    let body = lambda_body();
    let one = Lambda::new(vec![LambdaParam::new("x", AugurType::Any)], body.clone());
    let two = Lambda::new(vec![LambdaParam::new("y", AugurType::Any)], body);
    let value = Value::array(vec![Value::lambda(one), Value::lambda(two)]);

    let mut store = ValueStore::new();
    let json = serialize_value_with(&value, &mut store).unwrap();
    assert_eq!(store.len(), 1);

    let back = deserialize_value_with(&json, &store).unwrap();
    assert_eq!(back, value);
}

#[test]
fn deserializing_against_the_wrong_store_is_detected() {
    let lambda = Value::lambda(Lambda::new(vec![], lambda_body()));

    let mut store = ValueStore::new();
    let json = serialize_value_with(&lambda, &mut store).unwrap();

    let empty = ValueStore::new();
    assert!(matches!(
        deserialize_value_with(&json, &empty),
        Err(SerializationError::MissingStoreEntry(0))
    ));
}

#[test]
fn type_annotations_roundtrip() {
    let ty = AugurType::dict(vec![
        augur_core::DictField::new("samples", AugurType::array(AugurType::Number)),
        augur_core::DictField::new("source", AugurType::String).optional(),
    ]);
    let back = AugurType::deserialize(&ty.serialize()).unwrap();
    assert_eq!(back, ty);
}
