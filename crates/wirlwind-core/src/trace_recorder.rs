use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use wirlwind_types::ParseTraceEntry;

/// Append-only ring buffer of recent parse-trace entries (§5: "Parse trace:
/// append-only ring buffer of recent entries... trace writes must be
/// non-blocking"). Writers are the poll engine and, per §5, any driver
/// post-process step; both only ever append, never remove or rewrite
/// entries, so a short-held mutex is sufficient — there is no I/O on the
/// write path to block on.
pub struct ParseTraceRecorder {
    capacity: usize,
    entries: Mutex<VecDeque<ParseTraceEntry>>,
    next_sequence: AtomicU64,
}

impl ParseTraceRecorder {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Reserve the next monotonic sequence number for a trace entry,
    /// independent of the state store's own per-collection sequence (§4.8).
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence.fetch_add(1, Ordering::Relaxed)
    }

    /// Record one entry, evicting the oldest on overflow (§8 property 6
    /// applies equally to this buffer and the state store's ring buffers).
    pub fn record(&self, entry: ParseTraceEntry) {
        let mut guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if guard.len() >= self.capacity {
            guard.pop_front();
        }
        guard.push_back(entry);
    }

    /// Snapshot of the most recent entries, oldest first.
    pub fn recent(&self) -> Vec<ParseTraceEntry> {
        let guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        guard.iter().cloned().collect()
    }

    /// Most recent entries for one collection only.
    pub fn recent_for(&self, collection: &str) -> Vec<ParseTraceEntry> {
        let guard = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .iter()
            .filter(|e| e.collection == collection)
            .cloned()
            .collect()
    }
}
