//! End-to-end scenarios from spec §8 that need the Collection Registry and
//! Template Resolver together with the pipeline (S3, S4, S6; S1/S2/S5 are
//! covered at the driver layer in `wirlwind-providers/tests`).

use std::fs;
use tempfile::tempdir;

use wirlwind_core::TemplateResolver;
use wirlwind_engine::{run_pipeline, CollectionRegistry, PipelineContext};
use wirlwind_providers::VendorDriver;
use wirlwind_types::{EmptyStateReader, Envelope, ParserKind, StateReader};

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

fn write(path: &std::path::Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn s4_local_template_shadows_system_template() {
    let root = tempdir().unwrap();
    let system = tempdir().unwrap();

    write(
        &root.path().join("templates/textfsm/foo.textfsm"),
        "Value FIVE_SEC_TOTAL (\\d+)\n\nStart\n  ^CPU utilization for five seconds: ${FIVE_SEC_TOTAL}% -> Record\n",
    );
    write(&system.path().join("foo.textfsm"), "Value BAD (unterminated\n\nStart\n");
    write(
        &root.path().join("collections/cpu/cisco_ios.yaml"),
        "command: show processes cpu\ninterval: 30\nparsers:\n  - kind: text_fsm\n    templates: [foo.textfsm]\n",
    );

    let registry = CollectionRegistry::load(root.path(), "cisco_ios").unwrap();
    let def = registry.get("cpu").unwrap();

    let resolver = TemplateResolver::new(root.path().join("templates/textfsm"), Some(system.path().to_path_buf()));
    let ctx = PipelineContext {
        textfsm_resolver: &resolver,
        ttp_resolver: None,
        driver: &NoopDriver,
        state: &EmptyStateReader,
        trace_sequence: 0,
        debug: false,
    };
    let result = run_pipeline(def, "CPU utilization for five seconds: 13%", "router#", &ctx);

    assert_eq!(result.parsed_by, ParserKind::TextFsm);
    let attempt = &result.trace.attempts[0];
    assert_eq!(attempt.resolution.as_ref().unwrap().tier, Some(wirlwind_types::ResolutionTier::Local));
}

#[test]
fn s6_all_parsers_fail_publishes_sentinel_and_one_trace_entry() {
    let root = tempdir().unwrap();
    write(
        &root.path().join("collections/cpu/cisco_ios.yaml"),
        "command: show processes cpu\ninterval: 30\nparsers:\n  - kind: text_fsm\n    templates: [missing.textfsm]\n",
    );
    let registry = CollectionRegistry::load(root.path(), "cisco_ios").unwrap();
    let def = registry.get("cpu").unwrap();

    let resolver = TemplateResolver::new(root.path().join("templates/textfsm"), None);
    let ctx = PipelineContext {
        textfsm_resolver: &resolver,
        ttp_resolver: None,
        driver: &NoopDriver,
        state: &EmptyStateReader,
        trace_sequence: 0,
        debug: false,
    };
    let result = run_pipeline(def, "%Invalid input detected", "router#", &ctx);

    assert!(wirlwind_types::is_error_envelope(&result.envelope));
    assert_eq!(result.envelope["_collection"], serde_json::json!("cpu"));
    assert_eq!(result.trace.attempts.len(), 1);
    assert_eq!(result.parsed_by, ParserKind::None);
}
