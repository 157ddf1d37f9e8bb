use wirlwind_types::{Envelope, StateReader};

use crate::common;
use crate::traits::VendorDriver;

/// Classic IOS: `terminal length 0` disables paging, `show processes cpu`
/// process rows carry a `five_sec` field, and averaged CPU means rows
/// sitting at 0% are noise rather than signal (§4.6 "drop-zero", S1).
pub struct CiscoIos;

impl VendorDriver for CiscoIos {
    fn vendor_id(&self) -> &'static str {
        "cisco_ios"
    }

    fn pagination_command(&self) -> &'static str {
        "terminal length 0"
    }

    fn post_process(&self, collection_name: &str, envelope: Envelope, _state: &dyn StateReader) -> Envelope {
        match collection_name {
            "cpu" => common::cpu_drop_zero(envelope, "five_sec"),
            "memory" => common::memory_transform(envelope),
            "interface_detail" => common::interface_detail_rates(envelope, "input_rate", "output_rate"),
            "neighbors" => common::neighbors_infer_capabilities(envelope),
            "log" => common::log_transform(envelope),
            "bgp_summary" => common::bgp_transform(envelope),
            _ => envelope,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};
    use wirlwind_types::EmptyStateReader;

    #[test]
    fn cpu_collection_drops_zero_five_sec_rows() {
        let mut envelope = Map::new();
        envelope.insert("five_sec_total".into(), json!(13));
        envelope.insert(
            "processes".into(),
            json!([
                {"pid": 1, "name": "init", "five_sec": "0.00"},
                {"pid": 42, "name": "ip_input", "five_sec": "3.50"},
            ]),
        );
        let out = CiscoIos.post_process("cpu", envelope, &EmptyStateReader);
        let processes = out["processes"].as_array().unwrap();
        assert_eq!(processes.len(), 1);
        assert_eq!(processes[0]["name"], Value::String("ip_input".to_string()));
    }

    #[test]
    fn unrelated_collection_passes_through() {
        let mut envelope = Map::new();
        envelope.insert("interfaces".into(), json!([]));
        let out = CiscoIos.post_process("interfaces", envelope.clone(), &EmptyStateReader);
        assert_eq!(out, envelope);
    }
}
