//! Normalize (§4.4): field rename via the inverted normalize map, then
//! schema-based type coercion. Row-by-row; one row's coercion failure
//! never affects another's.

use std::collections::BTreeMap;

use wirlwind_types::{FieldType, Row, ScalarValue};

/// Rename `source -> canonical` fields in place, leaving unmapped fields
/// untouched (§4.4, §8 property 2).
pub fn rename_fields(row: Row, inverted_map: &BTreeMap<String, String>) -> Row {
    row.into_iter()
        .map(|(key, value)| {
            let renamed = inverted_map.get(&key).cloned().unwrap_or(key);
            (renamed, value)
        })
        .collect()
}

/// One non-fatal coercion outcome, folded into the parse trace rather
/// than propagated as an `Error` (§7 `SchemaCoercionWarning`).
pub struct CoercionWarning {
    pub field: String,
    pub raw_value: String,
}

/// Coerce string fields to the schema's declared type. A value that fails
/// to parse is left as a string and reported as a warning (§4.4).
pub fn coerce_schema(row: Row, schema: &BTreeMap<String, FieldType>) -> (Row, Vec<CoercionWarning>) {
    let mut warnings = Vec::new();
    let coerced = row
        .into_iter()
        .map(|(field, value)| {
            let Some(field_type) = schema.get(&field) else {
                return (field, value);
            };
            let ScalarValue::String(raw) = &value else {
                return (field, value);
            };
            match coerce_one(raw, *field_type) {
                Some(coerced) => (field, coerced),
                None => {
                    warnings.push(CoercionWarning { field: field.clone(), raw_value: raw.clone() });
                    (field, value)
                }
            }
        })
        .collect();
    (coerced, warnings)
}

fn coerce_one(raw: &str, field_type: FieldType) -> Option<ScalarValue> {
    match field_type {
        FieldType::Int => raw.trim().parse::<i64>().ok().map(ScalarValue::Int),
        FieldType::Float => raw.trim().parse::<f64>().ok().map(ScalarValue::Float),
        FieldType::Bool => match raw.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(ScalarValue::Bool(true)),
            "false" | "no" | "0" => Some(ScalarValue::Bool(false)),
            _ => None,
        },
        FieldType::String => None,
    }
}
