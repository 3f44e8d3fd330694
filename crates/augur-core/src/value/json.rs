//! Plain-JSON conversion.
//!
//! Cross-boundary consumers (host applications, notebooks) want values as
//! ordinary nested maps/lists/scalars rather than tagged payloads. This
//! conversion recursively unwraps every container kind; only values whose
//! payload is an expression tree are unrepresentable, and those fail with
//! a distinguishable error rather than a silent placeholder.

use serde_json::{json, Map, Value as Json};

use super::{serialize::serialize_value, Dist, Value};
use crate::error::ValueError;

impl Value {
    /// Convert to a plain JSON structure.
    ///
    /// Dates become ISO-8601 strings, durations millisecond counts,
    /// distributions a structural object (never null). Fails with
    /// [`ValueError::Unrepresentable`] for lambdas and calculators.
    pub fn to_json(&self) -> Result<Json, ValueError> {
        match self {
            Value::Number(n) => Ok(json!(n)),
            Value::Bool(b) => Ok(json!(b)),
            Value::String(s) => Ok(json!(s.as_ref())),
            Value::Date(d) => match d.to_datetime() {
                Some(dt) => Ok(json!(dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())),
                None => Ok(json!(d.ms())),
            },
            Value::Duration(d) => Ok(json!(d.ms())),
            Value::Dist(dist) => Ok(dist_to_json(dist)),
            Value::Array(items) => {
                let items = items
                    .iter()
                    .map(Value::to_json)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Json::Array(items))
            }
            Value::Dict(map) => {
                let mut entries = Map::new();
                for (key, entry) in map.iter() {
                    entries.insert(key.to_string(), entry.to_json()?);
                }
                Ok(Json::Object(entries))
            }
            Value::Lambda(_) => Err(ValueError::Unrepresentable("Lambda")),
            Value::Calculator(_) => Err(ValueError::Unrepresentable("Calculator")),
            Value::Void => Ok(Json::Null),
        }
    }
}

fn dist_to_json(dist: &Dist) -> Json {
    // Same structural shape as the wire payload, so hosts see one format.
    serialize_value(&Value::Dist(dist.clone()))
        .map(|mut json| json["payload"].take())
        .unwrap_or(Json::Null)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ast::TypedNode;
    use crate::parse_tree::{RawKind, RawNode};
    use crate::value::{DurationValue, Lambda};

    #[test]
    fn scalars() {
        assert_eq!(Value::number(5.0).to_json().unwrap(), json!(5.0));
        assert_eq!(Value::Bool(true).to_json().unwrap(), json!(true));
        assert_eq!(Value::string("hi").to_json().unwrap(), json!("hi"));
        assert_eq!(Value::void().to_json().unwrap(), Json::Null);
        assert_eq!(
            Value::duration(DurationValue::from_seconds(2.0)).to_json().unwrap(),
            json!(2000.0)
        );
    }

    #[test]
    fn nested_mixed_containers() {
        let value = Value::dict(vec![
            ("x".into(), Value::number(5.0)),
            (
                "y".into(),
                Value::array(vec![
                    Value::number(3.0),
                    Value::string("foo"),
                    Value::dict(vec![("dist".into(), Value::dist(Dist::normal(0.0, 1.0)))]),
                ]),
            ),
        ]);

        let json = value.to_json().unwrap();
        assert_eq!(json["x"], json!(5.0));
        assert_eq!(json["y"][1], json!("foo"));
        assert!(!json["y"][2]["dist"].is_null());
        assert_eq!(json["y"][2]["dist"]["type"], "normal");
    }

    #[test]
    fn lambda_is_unrepresentable() {
        let body = Arc::new(
            TypedNode::from_raw(&RawNode::new(0..1, RawKind::Identifier("x".to_string())))
                .unwrap(),
        );
        let lambda = Value::lambda(Lambda::new(vec![], body));
        assert_eq!(
            lambda.to_json(),
            Err(ValueError::Unrepresentable("Lambda"))
        );
    }
}
