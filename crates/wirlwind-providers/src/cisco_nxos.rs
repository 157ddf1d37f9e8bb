use wirlwind_types::{Envelope, StateReader};

use crate::common;
use crate::traits::VendorDriver;

/// NX-OS shares IOS's paging command and averaged-CPU semantics, but
/// `show processes cpu` labels the column `cpu_pct` rather than
/// `five_sec`, so it gets its own drop-zero key.
pub struct CiscoNxos;

impl VendorDriver for CiscoNxos {
    fn vendor_id(&self) -> &'static str {
        "cisco_nxos"
    }

    fn pagination_command(&self) -> &'static str {
        "terminal length 0"
    }

    fn post_process(&self, collection_name: &str, envelope: Envelope, _state: &dyn StateReader) -> Envelope {
        match collection_name {
            "cpu" => common::cpu_drop_zero(envelope, "cpu_pct"),
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
    use serde_json::{json, Map};
    use wirlwind_types::EmptyStateReader;

    #[test]
    fn cpu_drop_zero_uses_cpu_pct_key() {
        let mut envelope = Map::new();
        envelope.insert(
            "processes".into(),
            json!([
                {"pid": 1, "name": "idle", "cpu_pct": 0.0},
                {"pid": 2, "name": "ospf", "cpu_pct": 1.5},
            ]),
        );
        let out = CiscoNxos.post_process("cpu", envelope, &EmptyStateReader);
        assert_eq!(out["processes"].as_array().unwrap().len(), 1);
    }
}
