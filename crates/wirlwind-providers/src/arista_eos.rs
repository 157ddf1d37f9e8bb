use wirlwind_types::{Envelope, StateReader};

use crate::common;
use crate::traits::VendorDriver;

/// EOS's `show processes top once` is an instantaneous snapshot, not an
/// averaged counter, so the top-N-by-CPU-then-memory filter applies
/// instead of drop-zero (§4.6, S2) and rows sitting at 0% CPU are kept.
pub struct AristaEos;

impl VendorDriver for AristaEos {
    fn vendor_id(&self) -> &'static str {
        "arista_eos"
    }

    fn pagination_command(&self) -> &'static str {
        "terminal length 0"
    }

    fn post_process(&self, collection_name: &str, envelope: Envelope, _state: &dyn StateReader) -> Envelope {
        match collection_name {
            "cpu" => {
                let envelope = common::cpu_total_from_idle(envelope, "idle");
                common::cpu_top_n(envelope, "cpu_pct", "mem_pct")
            }
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
    fn cpu_top_scenario_s2_keeps_zero_cpu_rows() {
        let mut envelope = Map::new();
        envelope.insert("idle".into(), json!(82.4));
        let mut processes = Vec::new();
        processes.push(json!({"pid": 1, "name": "Bash", "cpu_pct": 0.0, "mem_pct": 0.1}));
        for i in 0..25 {
            processes.push(json!({"pid": 100 + i, "name": format!("proc{i}"), "cpu_pct": (i as f64) * 0.5, "mem_pct": 1.0}));
        }
        envelope.insert("processes".into(), json!(processes));
        let out = AristaEos.post_process("cpu", envelope, &EmptyStateReader);
        assert_eq!(out["five_sec_total"], json!(17.6));
        let out_processes = out["processes"].as_array().unwrap();
        assert_eq!(out_processes.len(), 20);
        assert!(out_processes.iter().any(|p| p["cpu_pct"] == json!(0.0)));
    }

    #[test]
    fn rate_conversion_scenario_s5() {
        let mut envelope = Map::new();
        envelope.insert("interfaces".into(), json!([{"interface": "Et3", "input_rate": "1.23 Mbps"}]));
        let out = AristaEos.post_process("interface_detail", envelope, &EmptyStateReader);
        let iface = &out["interfaces"].as_array().unwrap()[0];
        assert_eq!(iface["input_rate_bps"], json!(1_230_000));
    }
}
