use crate::envelope::Envelope;
use crate::trace::ParserKind;
use serde::{Deserialize, Serialize};

/// A single state-store update, published per §6: "Each state-store update
/// emits a tagged message: `{collection, envelope, sequence, parsed_by,
/// template, error?}`".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEvent {
    pub collection: String,
    pub envelope: Envelope,
    pub sequence: u64,
    pub parsed_by: ParserKind,
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Connection-state transitions (§4.7: "emit a connection-state event").
/// Published on the same publish/subscribe channel as collection updates
/// so a single consumer stream carries both (§9 "State store event
/// fan-out").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionEvent {
    Connected,
    Reconnecting { attempt: u32, delay_secs: u64 },
    Disconnected { reason: String },
}

/// Everything a subscriber of the session's event stream may observe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    Update(UpdateEvent),
    Connection(ConnectionEvent),
}
