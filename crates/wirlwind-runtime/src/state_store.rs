//! State Store (§4.8): latest-envelope map per collection, per-series
//! ring buffers, and an update-event pub/sub fan-out. The writer side is
//! the poll engine itself, publishing straight onto bounded
//! `tokio::sync::mpsc` subscriber queues.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use wirlwind_types::{ConnectionEvent, Envelope, ParserKind, SessionEvent, StateReader, UpdateEvent};

/// One numeric sample in a ring buffer (§4.8: "each sample carries a
/// monotonic timestamp from the engine clock, not the device clock").
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub engine_clock: u64,
    pub value: f64,
}

struct RingBuffer {
    capacity: usize,
    samples: VecDeque<Sample>,
}

impl RingBuffer {
    fn new(capacity: usize) -> Self {
        Self { capacity, samples: VecDeque::with_capacity(capacity) }
    }

    fn push(&mut self, sample: Sample) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }
}

struct CollectionState {
    latest: Option<Envelope>,
    sequence: u64,
    series: HashMap<String, RingBuffer>,
}

impl CollectionState {
    fn new() -> Self {
        Self { latest: None, sequence: 0, series: HashMap::new() }
    }
}

/// Default ring buffer capacity: "sufficient for 24h at 30s intervals"
/// (§3) is 2,880 samples; round up slightly for headroom.
pub const DEFAULT_RING_CAPACITY: usize = 2_880;

/// Bounded per-subscriber queue depth. Overflow drops the newest event
/// rather than blocking the poll engine (§9 "State store event fan-out").
const SUBSCRIBER_QUEUE_DEPTH: usize = 256;

/// The engine clock: a monotonically increasing counter independent of
/// wall time, advanced once per sample recorded (§4.8).
#[derive(Default)]
pub struct EngineClock(AtomicU64);

impl EngineClock {
    pub fn tick(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// Single-writer, multi-reader store: the poll engine calls `put`; event
/// subscribers and history queries read concurrently (§5 Shared
/// resources). Each collection's state lives behind its own mutex so one
/// collection's history query never blocks another's publish.
pub struct StateStore {
    collections: Mutex<HashMap<String, CollectionState>>,
    ring_capacity: usize,
    clock: EngineClock,
    subscribers: Mutex<Vec<tokio::sync::mpsc::Sender<SessionEvent>>>,
}

impl StateStore {
    pub fn new(ring_capacity: usize) -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            ring_capacity,
            clock: EngineClock::default(),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Register a new subscriber and return its receiver (§4.8, §9).
    pub fn subscribe(&self) -> tokio::sync::mpsc::Receiver<SessionEvent> {
        let (tx, rx) = tokio::sync::mpsc::channel(SUBSCRIBER_QUEUE_DEPTH);
        self.subscribers.lock().unwrap_or_else(|e| e.into_inner()).push(tx);
        rx
    }

    /// Replace the latest envelope for `collection`, append any declared
    /// numeric extractions, and publish an update event (§4.8 `put`).
    pub fn put(
        &self,
        collection: &str,
        envelope: Envelope,
        parsed_by: ParserKind,
        template: Option<String>,
        error: Option<String>,
        numeric_series: &[(String, f64)],
    ) {
        let sequence = {
            let mut guard = self.collections.lock().unwrap_or_else(|e| e.into_inner());
            let state = guard.entry(collection.to_string()).or_insert_with(CollectionState::new);
            state.sequence += 1;
            let tick = self.clock.tick();
            for (series_name, value) in numeric_series {
                state
                    .series
                    .entry(series_name.clone())
                    .or_insert_with(|| RingBuffer::new(self.ring_capacity))
                    .push(Sample { engine_clock: tick, value: *value });
            }
            state.latest = Some(envelope.clone());
            state.sequence
        };

        self.publish(SessionEvent::Update(UpdateEvent {
            collection: collection.to_string(),
            envelope,
            sequence,
            parsed_by,
            template,
            error,
        }));
    }

    /// Publish a session-level connection-state transition on the same
    /// stream collection updates travel on (§4.7 "emit a connection-state
    /// event", §9 "State store event fan-out").
    pub fn publish_connection(&self, event: ConnectionEvent) {
        self.publish(SessionEvent::Connection(event));
    }

    fn publish(&self, event: SessionEvent) {
        let mut guard = self.subscribers.lock().unwrap_or_else(|e| e.into_inner());
        guard.retain(|tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => true,
            Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => false,
        });
    }

    /// Latest envelope for `collection`, or `None` if it has never fired
    /// (§4.8 `get`).
    pub fn get(&self, collection: &str) -> Option<Envelope> {
        let guard = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        guard.get(collection).and_then(|s| s.latest.clone())
    }

    /// Ordered samples for a declared series (§4.8 `history`; series names
    /// like `cpu.five_sec_total`, `interface_detail.interfaces[Et1].input_rate_bps`).
    pub fn history(&self, collection: &str, series: &str) -> Vec<Sample> {
        let guard = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .get(collection)
            .and_then(|s| s.series.get(series))
            .map(|buf| buf.samples.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Samples newer than `since_clock`.
    pub fn history_since(&self, collection: &str, series: &str, since_clock: u64) -> Vec<Sample> {
        self.history(collection, series).into_iter().filter(|s| s.engine_clock > since_clock).collect()
    }

    pub fn current_sequence(&self, collection: &str) -> u64 {
        let guard = self.collections.lock().unwrap_or_else(|e| e.into_inner());
        guard.get(collection).map(|s| s.sequence).unwrap_or(0)
    }
}

/// Adapter so `VendorDriver::post_process` can read prior state without a
/// dependency on this crate's concrete `StateStore` (§4.6 driver contract;
/// see `wirlwind_types::StateReader` for why this trait lives at the leaf).
pub struct StateStoreReader<'a>(pub &'a StateStore);

impl StateReader for StateStoreReader<'_> {
    fn get(&self, collection: &str) -> Option<Envelope> {
        self.0.get(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(v: i64) -> Envelope {
        let mut e = Envelope::new();
        e.insert("five_sec_total".to_string(), json!(v));
        e
    }

    #[test]
    fn put_then_get_returns_latest() {
        let store = StateStore::new(10);
        store.put("cpu", envelope(13), ParserKind::TextFsm, None, None, &[]);
        store.put("cpu", envelope(20), ParserKind::TextFsm, None, None, &[]);
        assert_eq!(store.get("cpu").unwrap()["five_sec_total"], json!(20));
    }

    #[test]
    fn ring_buffer_evicts_oldest_on_overflow() {
        let store = StateStore::new(2);
        for i in 0..5 {
            store.put("cpu", envelope(i), ParserKind::TextFsm, None, None, &[("cpu.five_sec_total".to_string(), i as f64)]);
        }
        let history = store.history("cpu", "cpu.five_sec_total");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].value, 3.0);
        assert_eq!(history[1].value, 4.0);
    }

    #[test]
    fn get_on_unknown_collection_is_none() {
        let store = StateStore::new(10);
        assert!(store.get("memory").is_none());
    }

    #[tokio::test]
    async fn subscriber_receives_published_events() {
        let store = StateStore::new(10);
        let mut rx = store.subscribe();
        store.put("cpu", envelope(13), ParserKind::TextFsm, None, None, &[]);
        let event = rx.recv().await.unwrap();
        match event {
            SessionEvent::Update(update) => assert_eq!(update.collection, "cpu"),
            _ => panic!("expected update event"),
        }
    }
}
