use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use wirlwind_types::{lowercase_keys, Row, RegexFlag, ScalarValue};

/// Applies a declared regex pattern + flags + group mapping to sanitized
/// output (§4.3 Regex parser). Each match produces one row, built from the
/// `groups` map (positional index or named group -> canonical field name).
pub struct RegexParserSpec {
    regex: Regex,
    /// Maps a group reference (numeric index as a string, or a named
    /// group) to the canonical field name it should be published as.
    groups: BTreeMap<String, String>,
}

impl RegexParserSpec {
    pub fn compile(pattern: &str, flags: &[RegexFlag], groups: BTreeMap<String, String>) -> Result<Self> {
        let mut builder = RegexBuilder::new(pattern);
        for flag in flags {
            match flag {
                RegexFlag::Multiline => {
                    builder.multi_line(true);
                }
                RegexFlag::Dotall => {
                    builder.dot_matches_new_line(true);
                }
                RegexFlag::Ignorecase => {
                    builder.case_insensitive(true);
                }
            }
        }
        let regex = builder.build().map_err(|e| Error::ParseError {
            reason: format!("bad regex '{pattern}': {e}"),
        })?;
        Ok(Self { regex, groups })
    }

    pub fn parse(&self, text: &str) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        for caps in self.regex.captures_iter(text) {
            let mut row: Row = Row::new();
            for (group_ref, field_name) in &self.groups {
                let value = if let Ok(idx) = group_ref.parse::<usize>() {
                    caps.get(idx).map(|m| m.as_str())
                } else {
                    caps.name(group_ref).map(|m| m.as_str())
                };
                if let Some(v) = value {
                    row.insert(field_name.clone(), ScalarValue::String(v.to_string()));
                }
            }
            if !row.is_empty() {
                rows.push(lowercase_keys(&row));
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_groups_map_to_field_names() {
        let mut groups = BTreeMap::new();
        groups.insert("1".to_string(), "neighbor".to_string());
        groups.insert("2".to_string(), "state".to_string());
        let spec = RegexParserSpec::compile(
            r"(\d+\.\d+\.\d+\.\d+)\s+\d+\s+(\w+)",
            &[],
            groups,
        )
        .unwrap();
        let rows = spec.parse("10.0.0.1 4 Established").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("neighbor").unwrap().as_str(), Some("10.0.0.1"));
        assert_eq!(rows[0].get("state").unwrap().as_str(), Some("Established"));
    }

    #[test]
    fn named_groups_map_to_field_names() {
        let mut groups = BTreeMap::new();
        groups.insert("ip".to_string(), "neighbor".to_string());
        let spec =
            RegexParserSpec::compile(r"(?P<ip>\d+\.\d+\.\d+\.\d+)", &[], groups).unwrap();
        let rows = spec.parse("peer 10.0.0.2 up").unwrap();
        assert_eq!(rows[0].get("neighbor").unwrap().as_str(), Some("10.0.0.2"));
    }

    #[test]
    fn zero_matches_yields_zero_rows() {
        let groups = BTreeMap::new();
        let spec = RegexParserSpec::compile(r"nomatch", &[], groups).unwrap();
        assert!(spec.parse("totally different text").unwrap().is_empty());
    }
}
