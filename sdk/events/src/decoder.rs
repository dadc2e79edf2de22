use solana_sdk::pubkey::Pubkey;

use crate::EventError;
use crate::envelope::{EventRecord, LogEnvelope};
use crate::event::BridgeEvent;
use crate::schema::schema_for;
use crate::value::decode_body;

/// An enveloped event that failed to decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    pub line: usize,
    pub error: EventError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedLogs {
    pub events: Vec<BridgeEvent>,
    pub failures: Vec<DecodeFailure>,
}

/// Decodes bridge events out of one transaction's log lines.
#[derive(Debug, Clone)]
pub struct EventDecoder {
    envelope: LogEnvelope,
}

impl EventDecoder {
    pub fn new(program_id: &Pubkey) -> Self {
        Self {
            envelope: LogEnvelope::new(program_id),
        }
    }

    /// Decode every bridge event in `logs`, in order. A malformed event is
    /// reported in `failures` and never stops the rest of the batch.
    pub fn decode_logs(&self, logs: &[String]) -> DecodedLogs {
        let mut out = DecodedLogs::default();
        for record in self.envelope.records(logs) {
            let line = record.line;
            match decode_record(record) {
                Ok(Some(event)) => out.events.push(event),
                Ok(None) => {}
                Err(error) => {
                    log::warn!("log line {line}: {error}");
                    out.failures.push(DecodeFailure { line, error });
                }
            }
        }
        out
    }
}

/// `Ok(None)` for discriminators outside the schema table.
pub fn decode_record(record: EventRecord) -> Result<Option<BridgeEvent>, EventError> {
    let Some(schema) = schema_for(&record.discriminator) else {
        log::debug!(
            "skipping unknown event discriminator {:?} on line {}",
            record.discriminator,
            record.line
        );
        return Ok(None);
    };
    let fields = decode_body(schema, &record.body)?;
    BridgeEvent::from_fields(schema, record.body, fields).map(Some)
}
