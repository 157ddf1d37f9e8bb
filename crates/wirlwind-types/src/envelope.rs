use crate::value::{Row, ScalarValue};
use serde_json::{Map, Value};

/// The final published value for a collection (§3 "Collection envelope",
/// GLOSSARY "Envelope"). Always a JSON object so it can be handed to the
/// rendering front-end verbatim (§1: "JSON-serializable payloads").
pub type Envelope = Map<String, Value>;

pub fn scalar_to_json(v: &ScalarValue) -> Value {
    match v {
        ScalarValue::String(s) => Value::String(s.clone()),
        ScalarValue::Int(i) => Value::Number((*i).into()),
        ScalarValue::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ScalarValue::Bool(b) => Value::Bool(*b),
    }
}

pub fn row_to_json_object(row: &Row) -> Map<String, Value> {
    row.iter().map(|(k, v)| (k.clone(), scalar_to_json(v))).collect()
}

/// Build an error envelope per §4.6/§7: `{error: "<kind>: <detail>",
/// _collection: name}`.
pub fn error_envelope(collection: &str, kind: &str, detail: &str) -> Envelope {
    let mut env = Map::new();
    env.insert(
        "error".to_string(),
        Value::String(format!("{kind}: {detail}")),
    );
    env.insert("_collection".to_string(), Value::String(collection.to_string()));
    env
}

pub fn is_error_envelope(envelope: &Envelope) -> bool {
    envelope.contains_key("error")
}
