//! Collection Registry (§2 item 4, §6): loads per-vendor collection
//! definitions from `collections/<name>/<vendor_id>.yaml`, applying the
//! §3 vendor-fallback rule and picking up an optional sibling
//! `_schema.yaml`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use wirlwind_types::{CollectionDef, FieldType, ParserSpec, Schema, VendorId};

use crate::error::{Error, Result};

/// On-disk collection YAML shape (§6: required `command`, `interval`,
/// `parsers`; optional `normalize`).
#[derive(Debug, Deserialize)]
struct CollectionFile {
    command: String,
    interval: u64,
    parsers: Vec<ParserSpec>,
    #[serde(default)]
    normalize: BTreeMap<String, String>,
}

/// Loaded collection definitions for one vendor, keyed by collection name.
pub struct CollectionRegistry {
    defs: BTreeMap<String, CollectionDef>,
    /// Collections present on disk for *some* vendor but not resolvable
    /// for this one — surfaced by `--preflight-only`, not an error.
    missing_schema: Vec<String>,
}

impl CollectionRegistry {
    /// Walk `<root>/collections/*` and load each collection's definition
    /// for `vendor_id`, applying the single-trailing-segment fallback
    /// (§3) when an exact per-vendor file is absent. A collection
    /// directory with neither an exact nor a fallback file for this
    /// vendor is simply not available to this session.
    pub fn load(root: &Path, vendor_id: &str) -> Result<Self> {
        let collections_dir = root.join("collections");
        let mut defs = BTreeMap::new();
        let mut missing_schema = Vec::new();

        if !collections_dir.is_dir() {
            return Ok(Self { defs, missing_schema });
        }

        let mut names: Vec<_> = fs::read_dir(&collections_dir)
            .map_err(|e| Error::Io { path: collections_dir.display().to_string(), reason: e.to_string() })?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();

        for name in names {
            let dir = collections_dir.join(&name);
            let Some((path, _used_fallback)) = resolve_vendor_file(&dir, vendor_id)? else {
                continue;
            };

            let raw = fs::read_to_string(&path)
                .map_err(|e| Error::Io { path: path.display().to_string(), reason: e.to_string() })?;
            let file: CollectionFile = serde_yaml::from_str(&raw)
                .map_err(|e| Error::Config { detail: format!("{}: {e}", path.display()) })?;

            let schema_path = dir.join("_schema.yaml");
            let schema = if schema_path.is_file() {
                let raw = fs::read_to_string(&schema_path)
                    .map_err(|e| Error::Io { path: schema_path.display().to_string(), reason: e.to_string() })?;
                let schema: Schema = serde_yaml::from_str::<BTreeMap<String, String>>(&raw)
                    .map_err(|e| Error::Config { detail: format!("{}: {e}", schema_path.display()) })?
                    .into_iter()
                    .map(|(field, ty)| Ok((field, parse_field_type(&ty)?)))
                    .collect::<Result<BTreeMap<_, _>>>()?;
                Some(schema)
            } else {
                missing_schema.push(name.clone());
                None
            };

            let def = CollectionDef {
                name: name.clone(),
                command: file.command,
                interval_seconds: file.interval,
                parsers: file.parsers,
                normalize: file.normalize,
                schema,
            };
            defs.insert(name, def);
        }

        Ok(Self { defs, missing_schema })
    }

    pub fn get(&self, name: &str) -> Option<&CollectionDef> {
        self.defs.get(name)
    }

    /// All loaded collections, in name order (the Poll Engine fires them
    /// in definition order per cycle — §5 Ordering guarantees — which for
    /// this YAML-per-directory layout is collection-name order).
    pub fn all(&self) -> impl Iterator<Item = &CollectionDef> {
        self.defs.values()
    }

    pub fn missing_schema(&self) -> &[String] {
        &self.missing_schema
    }
}

fn resolve_vendor_file(dir: &Path, vendor_id: &str) -> Result<Option<(std::path::PathBuf, bool)>> {
    let exact = dir.join(format!("{vendor_id}.yaml"));
    if exact.is_file() {
        return Ok(Some((exact, false)));
    }
    if let Some(fallback) = VendorId::new(vendor_id).fallback() {
        let fallback_path = dir.join(format!("{}.yaml", fallback.as_str()));
        if fallback_path.is_file() {
            return Ok(Some((fallback_path, true)));
        }
    }
    Ok(None)
}

fn parse_field_type(raw: &str) -> Result<FieldType> {
    match raw {
        "int" => Ok(FieldType::Int),
        "float" => Ok(FieldType::Float),
        "string" => Ok(FieldType::String),
        "bool" => Ok(FieldType::Bool),
        other => Err(Error::Config { detail: format!("unknown schema field type '{other}'") }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn fallback_rule_selects_stripped_vendor_file() {
        let root = tempdir().unwrap();
        write(
            &root.path().join("collections/cpu/cisco_ios.yaml"),
            "command: show processes cpu\ninterval: 30\nparsers: []\n",
        );
        let registry = CollectionRegistry::load(root.path(), "cisco_ios_xe").unwrap();
        assert!(registry.get("cpu").is_some());
    }

    #[test]
    fn exact_match_wins_over_fallback() {
        let root = tempdir().unwrap();
        write(
            &root.path().join("collections/cpu/cisco_ios.yaml"),
            "command: show processes cpu\ninterval: 30\nparsers: []\n",
        );
        write(
            &root.path().join("collections/cpu/cisco_ios_xe.yaml"),
            "command: show processes cpu platform\ninterval: 30\nparsers: []\n",
        );
        let registry = CollectionRegistry::load(root.path(), "cisco_ios_xe").unwrap();
        assert_eq!(registry.get("cpu").unwrap().command, "show processes cpu platform");
    }

    #[test]
    fn missing_schema_is_reported_not_fatal() {
        let root = tempdir().unwrap();
        write(
            &root.path().join("collections/memory/cisco_ios.yaml"),
            "command: show memory\ninterval: 60\nparsers: []\n",
        );
        let registry = CollectionRegistry::load(root.path(), "cisco_ios").unwrap();
        assert_eq!(registry.missing_schema(), &["memory".to_string()]);
    }

    #[test]
    fn unavailable_collection_for_vendor_is_skipped() {
        let root = tempdir().unwrap();
        write(
            &root.path().join("collections/bgp_summary/juniper_junos.yaml"),
            "command: show bgp summary\ninterval: 30\nparsers: []\n",
        );
        let registry = CollectionRegistry::load(root.path(), "cisco_ios").unwrap();
        assert!(registry.get("bgp_summary").is_none());
    }
}
