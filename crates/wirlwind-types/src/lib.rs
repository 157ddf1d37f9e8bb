//! Canonical data model shared by every other `wirlwind-*` crate: rows,
//! envelopes, collection/driver contracts, and the parse trace schema.
//!
//! This crate has no I/O and no vendor-specific knowledge; it is the leaf of
//! the dependency order in spec §2.

mod collection;
mod envelope;
mod error;
mod event;
mod state_reader;
mod trace;
mod value;
mod vendor;

pub use collection::{
    shape_for_collection, CollectionDef, FieldType, ParserSpec, RegexFlag, Schema, Shape,
};
pub use envelope::{error_envelope, is_error_envelope, row_to_json_object, scalar_to_json, Envelope};
pub use error::{Error, Result};
pub use event::{ConnectionEvent, SessionEvent, UpdateEvent};
pub use state_reader::{EmptyStateReader, StateReader};
pub use trace::{
    AttemptOutcome, ParseTraceEntry, ParserAttempt, ParserKind, ResolutionTier, TemplateResolution,
};
pub use value::{lowercase_keys, Row, ScalarValue};
pub use vendor::VendorId;
