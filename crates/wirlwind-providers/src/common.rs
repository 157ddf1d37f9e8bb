//! Shared per-collection transforms built on top of [`crate::transforms`],
//! operating directly on the envelope shape the Output Shaper hands to
//! `post_process` (§4.6). Every built-in driver composes these; vendor
//! modules only need to say *which* field names and *which* filter apply.

use serde_json::{Map, Value};

use crate::transforms::{
    assemble_log_timestamp, coerce_severity, display_bytes, drop_zero_cpu,
    infer_capability_from_platform, memory_used_pct, normalize_bgp_peer,
    order_and_cap_log_entries, parse_rate_to_bps, top_n_by_cpu_then_memory,
};
use wirlwind_types::Envelope;

fn take_list(envelope: &mut Envelope, key: &str) -> Vec<Map<String, Value>> {
    match envelope.remove(key) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| if let Value::Object(m) = v { Some(m) } else { None })
            .collect(),
        _ => Vec::new(),
    }
}

fn put_list(envelope: &mut Envelope, key: &str, rows: Vec<Map<String, Value>>) {
    envelope.insert(key.to_string(), Value::Array(rows.into_iter().map(Value::Object).collect()));
}

/// Cisco-style `cpu`: filter `processes` down to nonzero 5-second CPU rows
/// (S1).
pub fn cpu_drop_zero(mut envelope: Envelope, five_sec_key: &str) -> Envelope {
    let processes = take_list(&mut envelope, "processes");
    put_list(&mut envelope, "processes", drop_zero_cpu(processes, five_sec_key));
    envelope
}

/// Arista-style `cpu`: top-20 snapshot, zero-CPU rows retained (S2).
pub fn cpu_top_n(mut envelope: Envelope, cpu_key: &str, mem_key: &str) -> Envelope {
    let processes = take_list(&mut envelope, "processes");
    put_list(&mut envelope, "processes", top_n_by_cpu_then_memory(processes, cpu_key, mem_key, 20));
    envelope
}

/// Derive `five_sec_total` from a reported idle percentage for CLIs (Arista
/// EOS's `show processes top once`) that report idle rather than busy time.
pub fn cpu_total_from_idle(mut envelope: Envelope, idle_key: &str) -> Envelope {
    let idle = envelope.remove(idle_key).and_then(|v| v.as_f64().or_else(|| v.as_str()?.parse().ok()));
    if let Some(idle) = idle {
        let busy = ((100.0 - idle) * 10.0).round() / 10.0;
        envelope.insert("five_sec_total".to_string(), Value::from(busy));
    }
    envelope
}

/// `memory`: compute `used_pct`/`total_display`/`used_display` from
/// whichever raw byte pair the vendor's template produced.
pub fn memory_transform(mut envelope: Envelope) -> Envelope {
    if let Some(pct) = memory_used_pct(&envelope) {
        envelope.insert("used_pct".to_string(), Value::from(pct));
    }
    let as_bytes = |env: &Envelope, key: &str| env.get(key).and_then(|v| v.as_f64().or_else(|| v.as_str()?.parse().ok()));
    if let Some(total) = as_bytes(&envelope, "total_bytes").or_else(|| as_bytes(&envelope, "total_kb").map(|v| v * 1024.0)) {
        envelope.insert("total_display".to_string(), Value::String(display_bytes(total)));
    }
    if let Some(used) = as_bytes(&envelope, "used_bytes").or_else(|| as_bytes(&envelope, "used_kb").map(|v| v * 1024.0)) {
        envelope.insert("used_display".to_string(), Value::String(display_bytes(used)));
    }
    envelope
}

/// `interface_detail`: convert vendor rate strings to integer bits/second
/// (S5).
pub fn interface_detail_rates(mut envelope: Envelope, input_field: &str, output_field: &str) -> Envelope {
    let mut interfaces = take_list(&mut envelope, "interfaces");
    for iface in &mut interfaces {
        if let Some(Value::String(raw)) = iface.remove(input_field) {
            if let Some(bps) = parse_rate_to_bps(&raw) {
                iface.insert("input_rate_bps".to_string(), Value::from(bps));
            }
        }
        if let Some(Value::String(raw)) = iface.remove(output_field) {
            if let Some(bps) = parse_rate_to_bps(&raw) {
                iface.insert("output_rate_bps".to_string(), Value::from(bps));
            }
        }
    }
    put_list(&mut envelope, "interfaces", interfaces);
    envelope
}

/// `neighbors`: infer `capabilities` from `platform` when the vendor's CLI
/// never reports it directly (§4.6, §9 Open Question).
pub fn neighbors_infer_capabilities(mut envelope: Envelope) -> Envelope {
    let mut neighbors = take_list(&mut envelope, "neighbors");
    for neighbor in &mut neighbors {
        if neighbor.contains_key("capabilities") {
            continue;
        }
        if let Some(Value::String(platform)) = neighbor.get("platform").cloned() {
            if let Some(capability) = infer_capability_from_platform(&platform) {
                neighbor.insert("capabilities".to_string(), Value::String(capability.to_string()));
            }
        }
    }
    put_list(&mut envelope, "neighbors", neighbors);
    envelope
}

/// `log`: assemble timestamps, coerce severities, order newest-first, cap
/// at 50 (§4.6).
pub fn log_transform(mut envelope: Envelope) -> Envelope {
    let mut entries = take_list(&mut envelope, "entries");
    for entry in &mut entries {
        if let Some(ts) = assemble_log_timestamp(entry) {
            entry.insert("timestamp".to_string(), Value::String(ts));
        }
        if let Some(severity) = entry.get("severity").cloned() {
            entry.insert("severity".to_string(), Value::from(coerce_severity(&severity)));
        }
    }
    put_list(&mut envelope, "entries", order_and_cap_log_entries(entries));
    envelope
}

/// `bgp_summary`: trim and normalize every peer row (§4.6).
pub fn bgp_transform(mut envelope: Envelope) -> Envelope {
    let peers = take_list(&mut envelope, "peers");
    let normalized = peers.into_iter().map(normalize_bgp_peer).collect();
    put_list(&mut envelope, "peers", normalized);
    envelope
}
