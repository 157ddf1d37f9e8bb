//! The per-collection pipeline binding parser chain, normalize, shape, and
//! driver post-process into one call (§2 data flow, §4.7 "Pipeline per
//! invocation"). This is the piece that ties `wirlwind-core`,
//! `wirlwind-providers`, and this crate's own normalize/shaper modules
//! together into a single provider-output envelope.

use std::time::Instant;

use wirlwind_core::{sanitize, ChainOutcome, ParserChain, TemplateResolver};
use wirlwind_providers::VendorDriver;
use wirlwind_types::{
    error_envelope, AttemptOutcome, CollectionDef, Envelope, ParseTraceEntry, ParserKind, Row,
    StateReader,
};

use crate::normalize::{coerce_schema, rename_fields};
use crate::shaper::shape;

/// Everything `run_pipeline` needs that isn't a per-call argument.
pub struct PipelineContext<'a> {
    pub textfsm_resolver: &'a TemplateResolver,
    pub ttp_resolver: Option<&'a TemplateResolver>,
    pub driver: &'a dyn VendorDriver,
    pub state: &'a dyn StateReader,
    /// Monotonic sequence for this trace entry, reserved by the caller
    /// (typically `ParseTraceRecorder::next_sequence`).
    pub trace_sequence: u64,
    /// Populate `ParseTraceEntry::raw_output_preview` (§6 `--debug`).
    pub debug: bool,
}

/// Result of one pipeline invocation: the published envelope plus the
/// trace entry that must always be recorded (§3 invariant, §8 property 4).
pub struct PipelineResult {
    pub envelope: Envelope,
    pub parsed_by: ParserKind,
    pub template: Option<String>,
    pub trace: ParseTraceEntry,
}

/// Run one collection's full pipeline over raw command output (§4.7
/// "Pipeline per invocation", steps 2-7; step 1, sending the command, is
/// the transport collaborator's job and happens before this is called).
pub fn run_pipeline(
    collection: &CollectionDef,
    raw_output: &str,
    prompt: &str,
    ctx: &PipelineContext<'_>,
) -> PipelineResult {
    let started = Instant::now();
    let sanitized = sanitize(raw_output, &collection.command, prompt);

    let chain = ParserChain {
        textfsm_resolver: ctx.textfsm_resolver,
        ttp_resolver: ctx.ttp_resolver,
    };
    let (outcome, attempts) = chain.run(&collection.parsers, &sanitized);

    let inverted_normalize = match collection.inverted_normalize() {
        Ok(map) => map,
        Err(reason) => {
            // Caught here rather than at load time so one malformed
            // collection never blocks the others; surfaced as an
            // AllParsersFailed-style sentinel since no rows can be
            // trusted once normalize direction is ambiguous.
            return failed_result(collection, &sanitized, attempts, started, ctx, &reason);
        }
    };

    let (envelope, parsed_by, template) = match outcome {
        ChainOutcome::Success { kind, template, rows } => {
            let rows = apply_normalize_and_schema(rows, &inverted_normalize, collection);
            let shaped = shape(&collection.name, rows);
            let post_processed = ctx.driver.post_process(&collection.name, shaped, ctx.state);
            (post_processed, kind, template)
        }
        ChainOutcome::AllFailed => {
            let reasons: Vec<String> = attempts
                .iter()
                .filter_map(|a| match &a.outcome {
                    AttemptOutcome::Failed { reason } => Some(reason.clone()),
                    AttemptOutcome::Empty => Some("parser matched zero rows".to_string()),
                    AttemptOutcome::Skipped { reason } => Some(reason.clone()),
                    AttemptOutcome::Matched { .. } => None,
                })
                .collect();
            let detail = if reasons.is_empty() { "no parsers configured".to_string() } else { reasons.join("; ") };
            (error_envelope(&collection.name, "AllParsersFailed", &detail), ParserKind::None, None)
        }
    };

    let row_count = envelope_row_count(&collection.name, &envelope);
    let field_count = envelope_field_count(&envelope);

    let trace = ParseTraceEntry {
        collection: collection.name.clone(),
        command: collection.command.clone(),
        attempts,
        winner: parsed_by,
        winning_template: template.clone(),
        duration_micros: started.elapsed().as_micros() as u64,
        row_count,
        field_count,
        raw_output_preview: ctx.debug.then(|| preview(&sanitized)),
        sequence: ctx.trace_sequence,
    };

    PipelineResult { envelope, parsed_by, template, trace }
}

fn apply_normalize_and_schema(
    rows: Vec<Row>,
    inverted_normalize: &std::collections::BTreeMap<String, String>,
    collection: &CollectionDef,
) -> Vec<Row> {
    rows.into_iter()
        .map(|row| {
            let renamed = rename_fields(row, inverted_normalize);
            match &collection.schema {
                Some(schema) => coerce_schema(renamed, schema).0,
                None => renamed,
            }
        })
        .collect()
}

fn failed_result(
    collection: &CollectionDef,
    sanitized: &str,
    attempts: Vec<wirlwind_types::ParserAttempt>,
    started: Instant,
    ctx: &PipelineContext<'_>,
    reason: &str,
) -> PipelineResult {
    let envelope = error_envelope(&collection.name, "ConfigError", reason);
    let trace = ParseTraceEntry {
        collection: collection.name.clone(),
        command: collection.command.clone(),
        attempts,
        winner: ParserKind::None,
        winning_template: None,
        duration_micros: started.elapsed().as_micros() as u64,
        row_count: 0,
        field_count: 0,
        raw_output_preview: ctx.debug.then(|| preview(sanitized)),
        sequence: ctx.trace_sequence,
    };
    PipelineResult { envelope, parsed_by: ParserKind::None, template: None, trace }
}

fn envelope_row_count(collection_name: &str, envelope: &Envelope) -> usize {
    use wirlwind_types::{shape_for_collection, Shape};
    match shape_for_collection(collection_name) {
        Shape::Flat => usize::from(!envelope.is_empty()),
        Shape::ListUnder(key) => envelope.get(key).and_then(|v| v.as_array()).map(Vec::len).unwrap_or(0),
        Shape::CpuHoistWithProcesses => {
            let processes = envelope.get("processes").and_then(|v| v.as_array()).map(Vec::len).unwrap_or(0);
            usize::from(!envelope.is_empty()) + processes
        }
    }
}

fn envelope_field_count(envelope: &Envelope) -> usize {
    envelope.len()
}

fn preview(sanitized: &str) -> String {
    const MAX: usize = 500;
    if sanitized.len() <= MAX {
        sanitized.to_string()
    } else {
        format!("{}...", &sanitized[..MAX])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::tempdir;
    use wirlwind_types::{EmptyStateReader, ParserSpec};

    struct NoopDriver;
    impl VendorDriver for NoopDriver {
        fn vendor_id(&self) -> &'static str {
            "noop"
        }
        fn pagination_command(&self) -> &'static str {
            ""
        }
        fn post_process(&self, _c: &str, e: Envelope, _s: &dyn StateReader) -> Envelope {
            e
        }
    }

    fn collection(parsers: Vec<ParserSpec>) -> CollectionDef {
        CollectionDef {
            name: "cpu".to_string(),
            command: "show processes cpu".to_string(),
            interval_seconds: 30,
            parsers,
            normalize: BTreeMap::new(),
            schema: None,
        }
    }

    #[test]
    fn all_failed_yields_sentinel_error_envelope_s6() {
        let dir = tempdir().unwrap();
        let resolver = TemplateResolver::new(dir.path(), None);
        let def = collection(vec![ParserSpec::TextFsm { templates: vec!["missing.textfsm".to_string()] }]);
        let ctx = PipelineContext {
            textfsm_resolver: &resolver,
            ttp_resolver: None,
            driver: &NoopDriver,
            state: &EmptyStateReader,
            trace_sequence: 0,
            debug: false,
        };
        let result = run_pipeline(&def, "%Invalid input detected", "router#", &ctx);
        assert_eq!(result.parsed_by, ParserKind::None);
        assert!(result.envelope["error"].as_str().unwrap().starts_with("AllParsersFailed"));
        assert_eq!(result.envelope["_collection"], serde_json::json!("cpu"));
        assert_eq!(result.trace.attempts.len(), 1);
    }

    #[test]
    fn template_fallback_records_both_attempts_s3() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("bad.textfsm"), "Value BAD (unterminated\n\nStart\n").unwrap();
        std::fs::write(
            dir.path().join("good.textfsm"),
            "Value FIVE_SEC_TOTAL (\\d+)\n\nStart\n  ^CPU utilization for five seconds: ${FIVE_SEC_TOTAL}% -> Record\n",
        )
        .unwrap();
        let resolver = TemplateResolver::new(dir.path(), None);
        let def = collection(vec![ParserSpec::TextFsm {
            templates: vec!["bad.textfsm".to_string(), "good.textfsm".to_string()],
        }]);
        let ctx = PipelineContext {
            textfsm_resolver: &resolver,
            ttp_resolver: None,
            driver: &NoopDriver,
            state: &EmptyStateReader,
            trace_sequence: 0,
            debug: false,
        };
        let result = run_pipeline(&def, "CPU utilization for five seconds: 13%", "router#", &ctx);
        assert_eq!(result.parsed_by, ParserKind::TextFsm);
        assert_eq!(result.template.as_deref(), Some("good.textfsm"));
        assert_eq!(result.trace.attempts.len(), 2);
        assert!(matches!(result.trace.attempts[0].outcome, AttemptOutcome::Failed { .. }));
    }
}
