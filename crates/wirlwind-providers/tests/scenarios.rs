//! Driver-layer scenarios from spec §8 (S1, S2, S5). These start from the
//! envelope shape the Output Shaper would have already produced and
//! exercise only `VendorDriver::post_process`; the full command-to-envelope
//! pipeline scenarios (S3, S4, S6) live in `wirlwind-engine`'s tests, since
//! they need the Template Resolver and Parser Chain too.

use serde_json::{json, Map};
use wirlwind_providers::{AristaEos, CiscoIosXe, VendorDriver};
use wirlwind_types::EmptyStateReader;

#[test]
fn s1_cisco_cpu_success_drops_zero_processes() {
    let mut envelope = Map::new();
    envelope.insert("five_sec_total".into(), json!(13));
    envelope.insert("one_min".into(), json!(11));
    envelope.insert("five_min".into(), json!(10));
    envelope.insert(
        "processes".into(),
        json!([
            {"pid": 1, "name": "init", "five_sec": "0.00"},
            {"pid": 2, "name": "chunkmgr", "five_sec": "0.00"},
            {"pid": 74, "name": "ip_input", "five_sec": "1.10"},
        ]),
    );

    let out = CiscoIosXe.post_process("cpu", envelope, &EmptyStateReader);

    assert_eq!(out["five_sec_total"], json!(13));
    assert_eq!(out["one_min"], json!(11));
    assert_eq!(out["five_min"], json!(10));
    let processes = out["processes"].as_array().unwrap();
    assert_eq!(processes.len(), 1);
    assert_eq!(processes[0]["name"], json!("ip_input"));
}

#[test]
fn s2_arista_top_cpu_keeps_top_20_including_zero_cpu() {
    let mut envelope = Map::new();
    envelope.insert("idle".into(), json!(82.4));
    let mut processes: Vec<_> = (0..30)
        .map(|i| json!({"pid": i, "name": format!("proc{i}"), "cpu_pct": (30 - i) as f64 * 0.1, "mem_pct": 1.0}))
        .collect();
    processes.push(json!({"pid": 999, "name": "idle-task", "cpu_pct": 0.0, "mem_pct": 0.0}));
    envelope.insert("processes".into(), json!(processes));

    let out = AristaEos.post_process("cpu", envelope, &EmptyStateReader);

    assert_eq!(out["five_sec_total"], json!(17.6));
    let out_processes = out["processes"].as_array().unwrap();
    assert_eq!(out_processes.len(), 20);
    // Highest cpu_pct sorts first.
    assert_eq!(out_processes[0]["pid"], json!(0));
}

#[test]
fn s5_arista_rate_conversion_to_bps() {
    let mut envelope = Map::new();
    envelope.insert(
        "interfaces".into(),
        json!([{"interface": "Ethernet3", "link_status": "up", "input_rate": "1.23 Mbps"}]),
    );

    let out = AristaEos.post_process("interface_detail", envelope, &EmptyStateReader);

    let iface = &out["interfaces"].as_array().unwrap()[0];
    assert_eq!(iface["input_rate_bps"], json!(1_230_000));
    assert_eq!(iface["interface"], json!("Ethernet3"));
}
