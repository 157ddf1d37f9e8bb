use crate::envelope::Envelope;

/// Read-only view onto the state store that a driver's `post_process` may
/// consult for prior state (e.g. computing a rate delta), without being
/// able to mutate it directly (§4.6 Driver contract). Defined here, at the
/// leaf of the dependency order, so `wirlwind-providers` can depend on the
/// capability without depending on `wirlwind-runtime` (which depends on
/// `wirlwind-providers`).
pub trait StateReader: Send + Sync {
    fn get(&self, collection: &str) -> Option<Envelope>;
}

/// A `StateReader` that has nothing (used at session start before any
/// collection has produced a first envelope, and in tests).
pub struct EmptyStateReader;

impl StateReader for EmptyStateReader {
    fn get(&self, _collection: &str) -> Option<Envelope> {
        None
    }
}
