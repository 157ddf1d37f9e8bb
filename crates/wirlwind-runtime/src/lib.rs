//! Session configuration, the in-memory State Store, the command-channel
//! transport abstraction, and the Poll Engine that drives the per-device
//! scheduling loop (spec §2 items 7-8, §4.7, §4.8, §5).

mod backoff;
mod config;
mod error;
mod poll_engine;
mod state_store;
mod transport;

pub use backoff::backoff_delay;
pub use config::{resolve_workspace_root, Auth, SessionConfig};
pub use error::{Error, Result};
pub use poll_engine::PollEngine;
pub use state_store::{EngineClock, Sample, StateStore, StateStoreReader, DEFAULT_RING_CAPACITY};
pub use transport::CommandChannel;
