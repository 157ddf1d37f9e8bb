use serde::{Deserialize, Serialize};

/// Which parser kind produced (or attempted to produce) rows (§3, §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParserKind {
    TextFsm,
    Ttp,
    Regex,
    /// No parser in the chain produced rows (§6: `parsed_by: none`).
    None,
}

impl std::fmt::Display for ParserKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ParserKind::TextFsm => "textfsm",
            ParserKind::Ttp => "ttp",
            ParserKind::Regex => "regex",
            ParserKind::None => "none",
        };
        write!(f, "{s}")
    }
}

/// Which tier of the Template Resolver search order satisfied a lookup
/// (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    Local,
    System,
}

/// The outcome of resolving one template filename (§3 "each template's
/// resolution path").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateResolution {
    pub filename: String,
    pub tier: Option<ResolutionTier>,
    pub local_path_searched: String,
    pub system_path_searched: String,
}

/// One attempt within a parser chain invocation, for the per-cycle trace
/// entry's `error summary` / per-attempt reasons (§3, §4.3, §8 property 8).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserAttempt {
    pub kind: ParserKind,
    pub template: Option<String>,
    pub resolution: Option<TemplateResolution>,
    pub outcome: AttemptOutcome,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Parser ran and produced at least one row; the chain stops here.
    Matched { row_count: usize, field_count: usize },
    /// Parser ran but produced zero rows — not an error (§4.3, §7
    /// `ParseEmpty`).
    Empty,
    /// Parser raised or a template failed to resolve/compile (§7
    /// `ParseError`/`TemplateNotFound`).
    Failed { reason: String },
    /// Parser kind unavailable at runtime (TTP adapter absent, §4.3) —
    /// silently skipped, recorded for completeness.
    Skipped { reason: String },
}

/// One parse-cycle audit entry (§3 "Parse trace entry", GLOSSARY "Parse
/// trace"). Always emitted, success or failure (§3 invariants, §8
/// property 4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseTraceEntry {
    pub collection: String,
    pub command: String,
    pub attempts: Vec<ParserAttempt>,
    pub winner: ParserKind,
    pub winning_template: Option<String>,
    pub duration_micros: u64,
    pub row_count: usize,
    pub field_count: usize,
    /// Populated only at debug verbosity (§3, §6 `--debug`).
    pub raw_output_preview: Option<String>,
    /// Monotonic engine-clock sequence, not wall time, so ordering survives
    /// clock skew between engine and device (§4.8).
    pub sequence: u64,
}

impl ParseTraceEntry {
    pub fn error_summary(&self) -> Option<String> {
        let reasons: Vec<String> = self
            .attempts
            .iter()
            .filter_map(|a| match &a.outcome {
                AttemptOutcome::Failed { reason } => Some(reason.clone()),
                _ => None,
            })
            .collect();
        if reasons.is_empty() {
            None
        } else {
            Some(reasons.join("; "))
        }
    }
}
