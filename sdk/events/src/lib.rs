//! Bridge Event Decoder
//!
//! Recovers the events emitted by the bridge program from raw transaction
//! logs and decodes them into [`BridgeEvent`]s.
//!
//! ```text
//! ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    ┌─────────────┐
//! │  log lines    │───▶│   envelope    │───▶│ schema table │───▶│ BridgeEvent │
//! │ (transaction) │    │ invoke stack  │    │ disc → fields│    │  (typed)    │
//! └───────────────┘    │ Program data: │    └──────────────┘    └─────────────┘
//!                      └───────────────┘
//! ```
//!
//! Log lines that are not events are skipped. Unknown discriminators are
//! skipped. A recognised event with a bad body fails on its own with
//! [`EventError::MalformedEvent`] and never aborts the rest of the batch.

pub mod decoder;
pub mod envelope;
pub mod event;
pub mod schema;
pub mod value;

use thiserror::Error;

pub use decoder::{DecodeFailure, DecodedLogs, EventDecoder};
pub use envelope::{EventRecord, LogEnvelope};
pub use event::{
    BridgeEvent, DepositedEvent, EventFilter, EventKind, OpaqueEvent, ReceivedEvent,
    WithdrawnEvent,
};
pub use schema::{EVENT_SCHEMAS, EventSchema, FieldSpec, FieldType, schema_for};
pub use value::FieldValue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("malformed {event} event: {reason}")]
    MalformedEvent { event: &'static str, reason: String },
}

impl EventError {
    pub(crate) fn malformed(event: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedEvent {
            event,
            reason: reason.into(),
        }
    }
}
