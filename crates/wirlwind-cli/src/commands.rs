use std::sync::Arc;

use anyhow::{bail, Context, Result};
use wirlwind_core::{ParseTraceRecorder, TemplateResolver};
use wirlwind_engine::CollectionRegistry;
use wirlwind_providers::DriverRegistry;
use wirlwind_runtime::{PollEngine, StateStore, DEFAULT_RING_CAPACITY};

use crate::args::Cli;
use crate::channel::LocalShellChannel;
use crate::console::ConsoleRenderer;
use crate::preflight::run_preflight;
use crate::session::build_session_config;

/// Parse-trace ring buffer capacity (independent of the state store's own
/// per-series ring capacity, §4.8/§5).
const TRACE_CAPACITY: usize = 500;

pub fn run(cli: Cli) -> Result<()> {
    let config = build_session_config(&cli)?;

    let drivers = DriverRegistry::build().context("building driver registry")?;
    let driver = drivers.lookup(&config.vendor_id).context("resolving vendor driver")?;

    let registry = CollectionRegistry::load(&config.root, &config.vendor_id)
        .with_context(|| format!("loading collections from {}", config.root.display()))?;

    let textfsm_resolver = TemplateResolver::new(config.local_template_dir("textfsm"), None);
    // The TTP adapter is an external template engine (spec §1 Out of
    // scope); no system directory is wired in, so TTP parser specs are
    // always skipped per the Parser Chain's documented fallback.
    let ttp_resolver: Option<TemplateResolver> = None;

    if config.preflight_only {
        let all_resolved = run_preflight(&registry, &textfsm_resolver, ttp_resolver.as_ref(), &drivers, &config.vendor_id);
        if !all_resolved {
            bail!("preflight failed: one or more templates did not resolve");
        }
        return Ok(());
    }

    let state = Arc::new(StateStore::new(DEFAULT_RING_CAPACITY));
    let trace = Arc::new(ParseTraceRecorder::new(TRACE_CAPACITY));
    let transport = LocalShellChannel::new(&config.host);

    let engine = PollEngine {
        registry,
        driver,
        textfsm_resolver,
        ttp_resolver,
        state: state.clone(),
        trace,
        transport,
        debug: config.debug,
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(run_session(engine, state, config.debug))
}

async fn run_session(
    engine: PollEngine<LocalShellChannel>,
    state: Arc<StateStore>,
    debug: bool,
) -> Result<()> {
    let (cancel_tx, cancel_rx) = tokio::sync::watch::channel(false);
    let renderer = ConsoleRenderer::new(debug);
    let mut events = state.subscribe();

    let render_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            renderer.render(&event);
        }
    });

    let mut engine_task = tokio::spawn(engine.run(cancel_rx));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            let _ = cancel_tx.send(true);
            (&mut engine_task).await.context("poll engine task panicked")?.context("poll engine run failed")?;
        }
        result = &mut engine_task => {
            result.context("poll engine task panicked")?.context("poll engine run failed")?;
        }
    }

    render_task.abort();
    Ok(())
}
