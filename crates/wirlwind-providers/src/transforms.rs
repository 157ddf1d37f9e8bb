//! Vendor-agnostic helpers available to every driver (§4.6 "Shared
//! transforms").

use serde_json::{Map, Value};

/// Compute a memory-used percentage from whichever pair of fields is
/// present: `{total_bytes,used_bytes}`, `{total_kb,used_kb}`, or
/// `{total,used,free}` (§4.6).
pub fn memory_used_pct(fields: &Map<String, Value>) -> Option<f64> {
    let as_f64 = |key: &str| fields.get(key).and_then(|v| v.as_f64().or_else(|| v.as_str()?.parse().ok()));

    if let (Some(total), Some(used)) = (as_f64("total_bytes"), as_f64("used_bytes")) {
        return pct(used, total);
    }
    if let (Some(total), Some(used)) = (as_f64("total_kb"), as_f64("used_kb")) {
        return pct(used, total);
    }
    if let Some(used) = as_f64("used") {
        if let Some(total) = as_f64("total") {
            return pct(used, total);
        }
        if let Some(free) = as_f64("free") {
            return pct(used, used + free);
        }
    }
    None
}

fn pct(used: f64, total: f64) -> Option<f64> {
    if total <= 0.0 {
        None
    } else {
        Some((used / total) * 100.0)
    }
}

/// Human-readable byte count, matching the `total_display`/`used_display`
/// fields of the `memory` contract (§4.6).
pub fn display_bytes(bytes: f64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1}{}", UNITS[unit])
}

/// Trim whitespace, coerce prefix count to an integer, and normalize state
/// casing for one BGP peer row (§4.6).
pub fn normalize_bgp_peer(mut peer: Map<String, Value>) -> Map<String, Value> {
    for key in ["neighbor", "state"] {
        if let Some(Value::String(s)) = peer.get_mut(key) {
            *s = s.trim().to_string();
        }
    }
    if let Some(Value::String(state)) = peer.get("state").cloned() {
        peer.insert("state".to_string(), Value::String(normalize_bgp_state(&state)));
    } else if peer.contains_key("prefixes_rcvd") {
        // The prefix-count branch of the summary line never reports a
        // state column; a peer advertising prefixes is established.
        peer.insert("state".to_string(), Value::String("Established".to_string()));
    }
    if let Some(prefixes) = peer.get("prefixes_rcvd").cloned() {
        let coerced = match prefixes {
            Value::String(s) => s.trim().parse::<i64>().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        };
        peer.insert(
            "prefixes_rcvd".to_string(),
            coerced.map(Value::from).unwrap_or(Value::Number(0.into())),
        );
    }
    peer
}

fn normalize_bgp_state(raw: &str) -> String {
    let trimmed = raw.trim();
    // Numeric prefix counts in place of a state name mean "Established"
    // with an active session, per common vendor CLI convention.
    if trimmed.chars().all(|c| c.is_ascii_digit()) && !trimmed.is_empty() {
        return "Established".to_string();
    }
    let lower = trimmed.to_lowercase();
    match lower.as_str() {
        "idle" => "Idle".to_string(),
        "connect" => "Connect".to_string(),
        "active" => "Active".to_string(),
        "opensent" => "OpenSent".to_string(),
        "openconfirm" => "OpenConfirm".to_string(),
        "established" => "Established".to_string(),
        other => other.to_string(),
    }
}

/// Assemble a log entry's timestamp from TextFSM-split `month`/`day`/`time`
/// components if all three are present; otherwise pass the raw
/// `timestamp` field through unchanged (partial components are not
/// guessed at).
pub fn assemble_log_timestamp(entry: &Map<String, Value>) -> Option<String> {
    let month = entry.get("month").and_then(|v| v.as_str());
    let day = entry.get("day").and_then(|v| v.as_str());
    let time = entry.get("time").and_then(|v| v.as_str());
    match (month, day, time) {
        (Some(m), Some(d), Some(t)) => Some(format!("{m} {d} {t}")),
        _ => entry.get("timestamp").and_then(|v| v.as_str()).map(str::to_string),
    }
}

/// Coerce a severity field (numeric or named) to the 0-7 syslog range
/// (§4.6).
pub fn coerce_severity(raw: &Value) -> i64 {
    match raw {
        Value::Number(n) => n.as_i64().unwrap_or(6).clamp(0, 7),
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(n) => n.clamp(0, 7),
            Err(_) => match s.to_lowercase().as_str() {
                "emergency" => 0,
                "alert" => 1,
                "critical" => 2,
                "error" => 3,
                "warning" => 4,
                "notice" => 5,
                "informational" | "info" => 6,
                "debugging" | "debug" => 7,
                _ => 6,
            },
        },
        _ => 6,
    }
}

/// Order log entries newest-first and cap at the most recent 50 (§4.6).
pub fn order_and_cap_log_entries(mut entries: Vec<Map<String, Value>>) -> Vec<Map<String, Value>> {
    entries.reverse();
    entries.truncate(50);
    entries
}

/// Cisco-style CPU process filter: drop rows with zero 5-second CPU
/// (§4.6, S1).
pub fn drop_zero_cpu(rows: Vec<Map<String, Value>>, five_sec_key: &str) -> Vec<Map<String, Value>> {
    rows.into_iter()
        .filter(|row| {
            row.get(five_sec_key)
                .and_then(|v| v.as_str().and_then(|s| s.parse::<f64>().ok()).or_else(|| v.as_f64()))
                .map(|v| v != 0.0)
                .unwrap_or(false)
        })
        .collect()
}

/// Arista-style instantaneous snapshot: top N rows by CPU then memory,
/// zero-CPU rows included (§4.6, S2).
pub fn top_n_by_cpu_then_memory(
    mut rows: Vec<Map<String, Value>>,
    cpu_key: &str,
    mem_key: &str,
    n: usize,
) -> Vec<Map<String, Value>> {
    let as_f64 = |row: &Map<String, Value>, key: &str| -> f64 {
        row.get(key)
            .and_then(|v| v.as_f64().or_else(|| v.as_str()?.parse().ok()))
            .unwrap_or(0.0)
    };
    rows.sort_by(|a, b| {
        let cpu_cmp = as_f64(b, cpu_key).partial_cmp(&as_f64(a, cpu_key)).unwrap_or(std::cmp::Ordering::Equal);
        if cpu_cmp != std::cmp::Ordering::Equal {
            return cpu_cmp;
        }
        as_f64(b, mem_key).partial_cmp(&as_f64(a, mem_key)).unwrap_or(std::cmp::Ordering::Equal)
    });
    rows.truncate(n);
    rows
}

/// Convert a rate string like `"1.23 Mbps"`/`"512 Kbps"`/`"10 Gbps"` to an
/// integer bits-per-second value (§4.6 `interface_detail`, S5).
pub fn parse_rate_to_bps(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let number_str = parts.next()?;
    let unit = parts.next().unwrap_or("").trim().to_lowercase();
    let number: f64 = number_str.parse().ok()?;
    let multiplier = match unit.as_str() {
        "bps" | "bits/sec" | "b/s" => 1.0,
        "kbps" | "kbit/s" => 1_000.0,
        "mbps" | "mbit/s" => 1_000_000.0,
        "gbps" | "gbit/s" => 1_000_000_000.0,
        "" => 1.0,
        _ => return None,
    };
    Some((number * multiplier).round() as i64)
}

/// Infer a coarse neighbor capability classification from a platform
/// string when the vendor never provides an explicit `capabilities` field
/// (§4.6, §9 Open Question — a lossy heuristic; downstream consumers
/// should allow an "unknown" rendering when neither substring matches).
pub fn infer_capability_from_platform(platform: &str) -> Option<&'static str> {
    if platform.contains("Router") {
        Some("router")
    } else if platform.contains("Switch") {
        Some("switch")
    } else {
        None
    }
}
