//! Poll Engine (§4.7): drives the full cycle for each enabled collection
//! on its own interval, as a background worker reachable over a plain
//! channel. Built on `tokio::time` + `tokio::select!` since the
//! suspension points here are channel I/O and timers (§5 Suspension
//! points).

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use wirlwind_core::TemplateResolver;
use wirlwind_engine::{run_pipeline, CollectionRegistry, PipelineContext};
use wirlwind_providers::VendorDriver;
use wirlwind_types::ConnectionEvent;

use crate::backoff::backoff_delay;
use crate::error::Result;
use crate::state_store::{StateStore, StateStoreReader};
use crate::transport::CommandChannel;

/// Transport failures across *all* collections before the engine enters
/// reconnect backoff (§4.7 default N=3).
const CONSECUTIVE_FAILURE_THRESHOLD: u32 = 3;

/// Default per-command read timeout (§5).
const COMMAND_TIMEOUT: Duration = Duration::from_secs(15);

pub struct PollEngine<C: CommandChannel> {
    pub registry: CollectionRegistry,
    pub driver: Arc<dyn VendorDriver>,
    pub textfsm_resolver: TemplateResolver,
    pub ttp_resolver: Option<TemplateResolver>,
    pub state: Arc<StateStore>,
    pub trace: Arc<wirlwind_core::ParseTraceRecorder>,
    pub transport: C,
    pub debug: bool,
}

impl<C: CommandChannel> PollEngine<C> {
    /// Run the startup sequence (§4.7 steps 1-3) followed by the main
    /// scheduling loop (step 4), until `cancel` fires.
    pub async fn run(mut self, mut cancel: tokio::sync::watch::Receiver<bool>) -> Result<()> {
        let pagination_command = self.driver.pagination_command();
        if !pagination_command.is_empty() {
            let _ = self.transport.execute(pagination_command, COMMAND_TIMEOUT).await;
        }

        let mut next_fire: HashMap<String, Instant> = HashMap::new();
        let now = Instant::now();

        let (one_shot, scheduled): (Vec<String>, Vec<String>) =
            self.registry.all().map(|def| (def.name.clone(), def.is_one_shot())).fold(
                (Vec::new(), Vec::new()),
                |(mut one_shot, mut scheduled), (name, is_one_shot)| {
                    if is_one_shot {
                        one_shot.push(name);
                    } else {
                        scheduled.push(name);
                    }
                    (one_shot, scheduled)
                },
            );

        for name in &one_shot {
            self.run_one(name).await;
        }
        for name in scheduled {
            next_fire.insert(name, now);
        }

        let mut consecutive_failures = 0u32;
        let mut reconnect_attempt = 0u32;

        loop {
            if *cancel.borrow() {
                return Ok(());
            }

            let due: Vec<String> = next_fire
                .iter()
                .filter(|(_, at)| **at <= Instant::now())
                .map(|(name, _)| name.clone())
                .collect();

            for name in &due {
                let failed = self.run_one(name).await;
                if failed {
                    consecutive_failures += 1;
                } else {
                    consecutive_failures = 0;
                    reconnect_attempt = 0;
                }
                if let Some(def) = self.registry.get(name) {
                    next_fire.insert(name.clone(), Instant::now() + Duration::from_secs(def.interval_seconds));
                }
            }

            if consecutive_failures >= CONSECUTIVE_FAILURE_THRESHOLD {
                self.reconnect(&mut reconnect_attempt).await;
                consecutive_failures = 0;
                continue;
            }

            let sleep_until = next_fire.values().min().copied().unwrap_or_else(|| Instant::now() + Duration::from_secs(1));

            tokio::select! {
                _ = tokio::time::sleep_until(sleep_until) => {}
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Run one collection's pipeline. Returns `true` if the command
    /// execution itself failed at the transport level (§4.7 failure
    /// handling); parser/post-process failures are absorbed into an error
    /// envelope and do not count toward the reconnect threshold.
    async fn run_one(&mut self, collection_name: &str) -> bool {
        let Some(def) = self.registry.get(collection_name) else { return false };
        let def = def.clone();

        let raw_output = match self.transport.execute(&def.command, COMMAND_TIMEOUT).await {
            Ok(output) => output,
            Err(_) => return true,
        };

        let prompt = self.transport.prompt().to_string();
        let ctx = PipelineContext {
            textfsm_resolver: &self.textfsm_resolver,
            ttp_resolver: self.ttp_resolver.as_ref(),
            driver: self.driver.as_ref(),
            state: &StateStoreReader(&self.state),
            trace_sequence: self.trace.next_sequence(),
            debug: self.debug,
        };

        let result = run_pipeline(&def, &raw_output, &prompt, &ctx);
        self.trace.record(result.trace);

        let error = if wirlwind_types::is_error_envelope(&result.envelope) {
            result.envelope.get("error").and_then(|v| v.as_str()).map(str::to_string)
        } else {
            None
        };

        let numeric_series = extract_numeric_series(&def.name, &result.envelope);
        self.state.put(&def.name, result.envelope, result.parsed_by, result.template, error, &numeric_series);
        false
    }

    async fn reconnect(&mut self, attempt: &mut u32) {
        loop {
            let delay = backoff_delay(*attempt);
            self.state.publish_connection(ConnectionEvent::Reconnecting {
                attempt: *attempt + 1,
                delay_secs: delay.as_secs(),
            });
            tokio::time::sleep(delay).await;
            *attempt += 1;

            if self.transport.reconnect().await.is_ok() {
                let pagination_command = self.driver.pagination_command();
                if !pagination_command.is_empty() {
                    let _ = self.transport.execute(pagination_command, COMMAND_TIMEOUT).await;
                }
                self.state.publish_connection(ConnectionEvent::Connected);
                return;
            }
        }
    }
}

fn extract_numeric_series(collection_name: &str, envelope: &wirlwind_types::Envelope) -> Vec<(String, f64)> {
    let mut out = Vec::new();
    for key in ["five_sec_total", "one_min", "five_min", "used_pct"] {
        if let Some(value) = envelope.get(key).and_then(|v| v.as_f64()) {
            out.push((format!("{collection_name}.{key}"), value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::extract_numeric_series;
    use serde_json::json;
    use wirlwind_types::Envelope;

    #[test]
    fn extracts_known_numeric_fields_only() {
        let mut envelope = Envelope::new();
        envelope.insert("five_sec_total".into(), json!(13));
        envelope.insert("processes".into(), json!([]));
        let series = extract_numeric_series("cpu", &envelope);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].0, "cpu.five_sec_total");
    }
}
