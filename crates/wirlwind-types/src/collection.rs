use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One parser attempt in a collection's parser stack (§4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParserSpec {
    TextFsm { templates: Vec<String> },
    Ttp { templates: Vec<String> },
    Regex {
        pattern: String,
        #[serde(default)]
        flags: Vec<RegexFlag>,
        groups: BTreeMap<String, String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RegexFlag {
    Multiline,
    Dotall,
    Ignorecase,
}

/// Per-field type coercion rule (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Int,
    Float,
    String,
    Bool,
}

pub type Schema = BTreeMap<String, FieldType>;

/// Named configuration for one piece of telemetry (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionDef {
    pub name: String,
    pub command: String,
    pub interval_seconds: u64,
    pub parsers: Vec<ParserSpec>,
    /// On-disk form is `canonical: source` (§9); callers invert this once
    /// at load time via [`CollectionDef::inverted_normalize`].
    #[serde(default)]
    pub normalize: BTreeMap<String, String>,
    #[serde(default)]
    pub schema: Option<Schema>,
}

impl CollectionDef {
    /// One-shot collections (§3, §4.7, §9) run once at connect and are never
    /// rescheduled.
    pub fn is_one_shot(&self) -> bool {
        self.interval_seconds == 0
    }

    /// Invert the on-disk `canonical: source` map into the runtime's
    /// `source -> canonical` map (§9 "Inverted normalize map"). Duplicate
    /// sources are a config error, surfaced by the caller.
    pub fn inverted_normalize(&self) -> Result<BTreeMap<String, String>, String> {
        let mut inverted = BTreeMap::new();
        for (canonical, source) in &self.normalize {
            if let Some(prev) = inverted.insert(source.clone(), canonical.clone()) {
                return Err(format!(
                    "duplicate normalize source '{source}' maps to both '{prev}' and '{canonical}'"
                ));
            }
        }
        Ok(inverted)
    }
}

/// The canonical shape a collection's rows are published under (§3, §9).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    /// First row's fields hoisted to the envelope's top level; any
    /// remaining rows discarded.
    Flat,
    /// Rows wrapped under a named list key (e.g. `interfaces`, `peers`).
    ListUnder(&'static str),
    /// `cpu`'s special case: first row hoisted to top level, rows[1..]
    /// become `processes`.
    CpuHoistWithProcesses,
}

/// Resolve a collection name to its publishing shape (§3 known bindings,
/// §9 `COLLECTION_LIST_KEYS`). Unknown collections wrap under `data`.
pub fn shape_for_collection(name: &str) -> Shape {
    match name {
        "cpu" => Shape::CpuHoistWithProcesses,
        "memory" | "device_info" => Shape::Flat,
        "interfaces" => Shape::ListUnder("interfaces"),
        "interface_detail" => Shape::ListUnder("interfaces"),
        "bgp_summary" => Shape::ListUnder("peers"),
        "neighbors" => Shape::ListUnder("neighbors"),
        "log" => Shape::ListUnder("entries"),
        "environment" => Shape::ListUnder("sensors"),
        _ => Shape::ListUnder("data"),
    }
}
