//! A minimal TTP-style ("Template Text Parser") engine.
//!
//! Like the TextFSM engine in this crate, the real TTP library is named as
//! an out-of-scope external collaborator; this is the stand-in. TTP
//! templates here are a single pattern per line using `{{ name }}`
//! placeholders (default token: `\S+`), with an optional explicit regex via
//! `{{ name | re(PATTERN) }}`. Per §4.3, the whole engine is an optional
//! adapter: the parser chain treats its absence as a silent skip rather
//! than a failure.

use crate::error::{Error, Result};
use regex::Regex;
use wirlwind_types::{lowercase_keys, Row, ScalarValue};

pub struct TtpTemplate {
    regex: Regex,
}

fn compile_line_pattern(line: &str) -> Result<String> {
    let mut out = String::new();
    let mut rest = line;

    while let Some(start) = rest.find("{{") {
        out.push_str(&regex::escape(&rest[..start]));
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or_else(|| Error::ParseError {
            reason: format!("unterminated '{{{{' placeholder in TTP line: '{line}'"),
        })?;
        let inner = after[..end].trim();

        let (name, pattern) = if let Some((n, spec)) = inner.split_once('|') {
            let n = n.trim();
            let spec = spec.trim();
            if let Some(custom) = spec.strip_prefix("re(").and_then(|s| s.strip_suffix(')')) {
                (n, custom.to_string())
            } else {
                (n, r"\S+".to_string())
            }
        } else {
            (inner, r"\S+".to_string())
        };

        out.push_str(&format!("(?P<{name}>{pattern})"));
        rest = &after[end + 2..];
    }
    out.push_str(&regex::escape(rest));
    Ok(out)
}

impl TtpTemplate {
    pub fn compile(source: &str) -> Result<Self> {
        let line = source
            .lines()
            .find(|l| !l.trim().is_empty())
            .ok_or_else(|| Error::ParseError {
                reason: "empty TTP template".to_string(),
            })?;
        let pattern = compile_line_pattern(line.trim_end())?;
        let regex = Regex::new(&pattern).map_err(|e| Error::ParseError {
            reason: format!("bad TTP-derived regex '{pattern}': {e}"),
        })?;
        Ok(Self { regex })
    }

    pub fn parse(&self, text: &str) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        for line in text.lines() {
            if let Some(caps) = self.regex.captures(line) {
                let mut row: Row = Row::new();
                for name in self.regex.capture_names().flatten() {
                    if let Some(m) = caps.name(name) {
                        row.insert(name.to_string(), ScalarValue::String(m.as_str().to_string()));
                    }
                }
                if !row.is_empty() {
                    rows.push(lowercase_keys(&row));
                }
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_placeholder_line() {
        let tmpl = TtpTemplate::compile("Uptime is {{ uptime }}").unwrap();
        let rows = tmpl.parse("Uptime is 14w2d").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("uptime").unwrap().as_str(), Some("14w2d"));
    }

    #[test]
    fn custom_regex_placeholder() {
        let tmpl = TtpTemplate::compile("load is {{ pct | re(\\d+) }}%").unwrap();
        let rows = tmpl.parse("load is 42%").unwrap();
        assert_eq!(rows[0].get("pct").unwrap().as_str(), Some("42"));
    }

    #[test]
    fn no_match_yields_zero_rows() {
        let tmpl = TtpTemplate::compile("Uptime is {{ uptime }}").unwrap();
        let rows = tmpl.parse("totally unrelated text").unwrap();
        assert!(rows.is_empty());
    }
}
