//! Output Shaper (§4.5): rows-of-fields → the canonical per-collection
//! envelope.

use wirlwind_types::{row_to_json_object, scalar_to_json, shape_for_collection, Envelope, Row, Shape};

/// Shape a normalized row list into its published envelope for
/// `collection_name` (§3, §4.5).
pub fn shape(collection_name: &str, rows: Vec<Row>) -> Envelope {
    match shape_for_collection(collection_name) {
        Shape::Flat => shape_flat(rows),
        Shape::ListUnder(key) => shape_list_under(key, rows),
        Shape::CpuHoistWithProcesses => shape_cpu(rows),
    }
}

fn shape_flat(rows: Vec<Row>) -> Envelope {
    match rows.into_iter().next() {
        Some(first) => row_to_json_object(&first),
        None => Envelope::new(),
    }
}

fn shape_list_under(key: &'static str, rows: Vec<Row>) -> Envelope {
    let mut envelope = Envelope::new();
    let list: Vec<_> = rows.iter().map(|r| serde_json::Value::Object(row_to_json_object(r))).collect();
    envelope.insert(key.to_string(), serde_json::Value::Array(list));
    envelope
}

/// Fields that belong at the envelope's top level rather than on any one
/// process row. `Filldown` on the template means every row carries these,
/// so they're hoisted from the first row and stripped back out of each
/// process entry rather than relying on a dedicated summary-only row.
const CPU_TOTAL_KEYS: [&str; 3] = ["five_sec_total", "one_min", "five_min"];

fn shape_cpu(rows: Vec<Row>) -> Envelope {
    if rows.is_empty() {
        return Envelope::new();
    }
    let mut envelope = Envelope::new();
    for key in CPU_TOTAL_KEYS {
        if let Some(value) = rows[0].get(key) {
            envelope.insert(key.to_string(), scalar_to_json(value));
        }
    }
    let processes: Vec<_> = rows
        .iter()
        .filter_map(|r| {
            let mut obj = row_to_json_object(r);
            for key in CPU_TOTAL_KEYS {
                obj.remove(key);
            }
            if obj.is_empty() {
                None
            } else {
                Some(serde_json::Value::Object(obj))
            }
        })
        .collect();
    envelope.insert("processes".to_string(), serde_json::Value::Array(processes));
    envelope
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirlwind_types::ScalarValue;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), ScalarValue::String(v.to_string()))).collect()
    }

    #[test]
    fn empty_multi_row_collection_yields_empty_list() {
        let out = shape("interfaces", vec![]);
        assert_eq!(out["interfaces"], serde_json::json!([]));
    }

    #[test]
    fn empty_single_row_collection_yields_empty_object() {
        let out = shape("memory", vec![]);
        assert!(out.is_empty());
    }

    #[test]
    fn cpu_hoists_totals_and_keeps_every_process_row() {
        // Filldown totals land on every row, including the summary-only
        // one (which has no pid/name and must not appear as a process).
        let rows = vec![
            row(&[("five_sec_total", "13"), ("one_min", "11"), ("five_min", "10")]),
            row(&[("five_sec_total", "13"), ("one_min", "11"), ("five_min", "10"), ("pid", "1"), ("name", "init")]),
            row(&[("five_sec_total", "13"), ("one_min", "11"), ("five_min", "10"), ("pid", "2"), ("name", "sshd")]),
        ];
        let out = shape("cpu", rows);
        assert_eq!(out["five_sec_total"], serde_json::json!("13"));
        let processes = out["processes"].as_array().unwrap();
        assert_eq!(processes.len(), 2);
        assert_eq!(processes[0]["pid"], serde_json::json!("1"));
        assert!(processes[0].get("five_sec_total").is_none());
        assert_eq!(processes[1]["pid"], serde_json::json!("2"));
    }

    #[test]
    fn unknown_collection_wraps_under_data() {
        let out = shape("frobnicate", vec![row(&[("a", "1")])]);
        assert!(out["data"].as_array().is_some());
    }
}
