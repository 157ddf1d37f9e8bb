//! A compact TextFSM-compatible template engine.
//!
//! The parser chain (§4.3) consumes templates through a uniform
//! interface; this module is the self-contained implementation backing
//! it. It supports the subset of template syntax needed here:
//! `Value [Filldown][,Required][,List] NAME (regex)` declarations,
//! `${NAME}` substitution inside state rules, and
//! `-> [Continue|NoRecord].Record`/`-> StateName` line actions, terminating
//! with an `EOF` state.

use crate::error::{Error, Result};
use regex::Regex;
use std::collections::BTreeMap;
use wirlwind_types::{lowercase_keys, Row, ScalarValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueOption {
    Filldown,
    Required,
    List,
}

#[derive(Debug, Clone)]
struct ValueDef {
    name: String,
    options: Vec<ValueOption>,
    regex: String,
}

#[derive(Debug, Clone)]
struct Rule {
    regex: Regex,
    record: bool,
    next_state: Option<String>,
}

#[derive(Debug, Clone)]
struct State {
    rules: Vec<Rule>,
}

/// A compiled TextFSM template, ready to parse sanitized command output.
pub struct TextFsmTemplate {
    values: Vec<ValueDef>,
    states: BTreeMap<String, State>,
}

/// Extract the content of the first balanced `(...)` group starting at
/// `start`, returning `(content, index_after_closing_paren)`.
fn extract_balanced_parens(s: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = s.as_bytes();
    if bytes.get(start) != Some(&b'(') {
        return None;
    }
    let mut depth = 0i32;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some((&s[start + 1..i], i + 1));
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_value_line(line: &str) -> Result<ValueDef> {
    let rest = line
        .strip_prefix("Value")
        .ok_or_else(|| Error::ParseError {
            reason: format!("malformed Value line: '{line}'"),
        })?
        .trim_start();

    let paren_start = rest.find('(').ok_or_else(|| Error::ParseError {
        reason: format!("Value line missing regex: '{line}'"),
    })?;
    let (regex, _end) = extract_balanced_parens(rest, paren_start).ok_or_else(|| Error::ParseError {
        reason: format!("unbalanced parentheses in Value line: '{line}'"),
    })?;

    let prefix = rest[..paren_start].trim();
    let tokens: Vec<&str> = prefix.split_whitespace().collect();
    let (opts_token, name) = match tokens.as_slice() {
        [name] => (None, *name),
        [opts, name] => (Some(*opts), *name),
        _ => {
            return Err(Error::ParseError {
                reason: format!("cannot parse Value declaration: '{line}'"),
            })
        }
    };

    let mut options = Vec::new();
    if let Some(opts) = opts_token {
        for tok in opts.split(',') {
            match tok {
                "Filldown" => options.push(ValueOption::Filldown),
                "Required" => options.push(ValueOption::Required),
                "List" => options.push(ValueOption::List),
                "Key" => {} // accepted, not distinguished from an ordinary value here
                other => {
                    return Err(Error::ParseError {
                        reason: format!("unknown Value option '{other}' in '{line}'"),
                    })
                }
            }
        }
    }

    Ok(ValueDef {
        name: name.to_string(),
        options,
        regex: regex.to_string(),
    })
}

fn substitute_values(pattern: &str, values: &[ValueDef]) -> String {
    let mut out = pattern.to_string();
    for v in values {
        let marker = format!("${{{}}}", v.name);
        if out.contains(&marker) {
            out = out.replace(&marker, &format!("(?P<{}>{})", v.name, v.regex));
        }
    }
    out
}

fn parse_rule_line(raw: &str, values: &[ValueDef]) -> Result<Rule> {
    let (pattern_part, action_part) = match raw.split_once("->") {
        Some((p, a)) => (p.trim(), Some(a.trim())),
        None => (raw.trim(), None),
    };

    let expanded = substitute_values(pattern_part, values);
    let regex = Regex::new(&expanded).map_err(|e| Error::ParseError {
        reason: format!("bad rule regex '{expanded}': {e}"),
    })?;

    let mut record = false;
    let mut next_state = None;
    if let Some(action) = action_part {
        for token in action.split('.') {
            match token {
                "Record" => record = true,
                "NoRecord" | "Continue" => {}
                "Error" => {
                    return Err(Error::ParseError {
                        reason: format!("template rule raised Error action: '{raw}'"),
                    })
                }
                state => next_state = Some(state.to_string()),
            }
        }
    }

    Ok(Rule {
        regex,
        record,
        next_state,
    })
}

impl TextFsmTemplate {
    /// Compile template source text. Returns `ParseError` for malformed
    /// Value declarations or rule regexes (§4.3: "a parser exception
    /// aborts only that parser with its reason recorded").
    pub fn compile(source: &str) -> Result<Self> {
        let lines: Vec<&str> = source.lines().collect();
        let mut idx = 0;
        let mut values = Vec::new();

        while idx < lines.len() {
            let line = lines[idx];
            if line.trim().is_empty() {
                idx += 1;
                break;
            }
            if line.starts_with("Value") {
                values.push(parse_value_line(line.trim_end())?);
            } else if !line.trim_start().starts_with('#') {
                return Err(Error::ParseError {
                    reason: format!("expected Value declaration or blank line, got: '{line}'"),
                });
            }
            idx += 1;
        }

        let mut states: BTreeMap<String, State> = BTreeMap::new();
        let mut current_state: Option<String> = None;

        while idx < lines.len() {
            let line = lines[idx];
            idx += 1;
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            if !line.starts_with(char::is_whitespace) {
                let name = line.trim().to_string();
                states.entry(name.clone()).or_insert(State { rules: Vec::new() });
                current_state = Some(name);
                continue;
            }
            let state_name = current_state.as_ref().ok_or_else(|| Error::ParseError {
                reason: "rule line appears before any state header".to_string(),
            })?;
            let rule = parse_rule_line(line.trim(), &values)?;
            states.get_mut(state_name).unwrap().rules.push(rule);
        }

        if !states.contains_key("Start") {
            return Err(Error::ParseError {
                reason: "template defines no 'Start' state".to_string(),
            });
        }

        Ok(Self { values, states })
    }

    /// Run the compiled template over sanitized text, producing rows with
    /// lowercase keys (§3 invariant 1). Zero rows is a normal, non-error
    /// outcome (§4.3).
    pub fn parse(&self, text: &str) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        let mut current: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut state_name = "Start".to_string();

        let mut record = |current: &mut BTreeMap<String, Vec<String>>, rows: &mut Vec<Row>| {
            let mut row: Row = BTreeMap::new();
            let mut missing_required = false;
            for v in &self.values {
                match current.get(&v.name) {
                    Some(vals) if !vals.is_empty() => {
                        let joined = vals.join(",");
                        row.insert(v.name.clone(), ScalarValue::String(joined));
                    }
                    _ => {
                        if v.options.contains(&ValueOption::Required) {
                            missing_required = true;
                        }
                    }
                }
            }
            if !missing_required {
                rows.push(lowercase_keys(&row));
            }
            current.retain(|name, _| {
                self.values
                    .iter()
                    .find(|v| &v.name == name)
                    .map(|v| v.options.contains(&ValueOption::Filldown))
                    .unwrap_or(false)
            });
        };

        let process_line = |line: &str,
                             state_name: &mut String,
                             current: &mut BTreeMap<String, Vec<String>>,
                             rows: &mut Vec<Row>,
                             record: &mut dyn FnMut(&mut BTreeMap<String, Vec<String>>, &mut Vec<Row>)| {
            let Some(state) = self.states.get(state_name.as_str()) else {
                return;
            };
            for rule in &state.rules {
                if let Some(caps) = rule.regex.captures(line) {
                    for v in &self.values {
                        if let Some(m) = caps.name(&v.name) {
                            if v.options.contains(&ValueOption::List) {
                                current.entry(v.name.clone()).or_default().push(m.as_str().to_string());
                            } else {
                                current.insert(v.name.clone(), vec![m.as_str().to_string()]);
                            }
                        }
                    }
                    if rule.record {
                        record(current, rows);
                    }
                    if let Some(next) = &rule.next_state {
                        *state_name = next.clone();
                    }
                    break;
                }
            }
        };

        for line in text.lines() {
            if state_name == "End" {
                break;
            }
            process_line(line, &mut state_name, &mut current, &mut rows, &mut record);
        }

        if state_name != "End" && self.states.contains_key("EOF") {
            let saved = state_name.clone();
            state_name = "EOF".to_string();
            process_line("", &mut state_name, &mut current, &mut rows, &mut record);
            let _ = saved;
        }

        Ok(rows)
    }
}
