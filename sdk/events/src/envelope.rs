//! Anchor event envelope recovery.
//!
//! Runtime logs look like:
//!
//! ```text
//! Program <id> invoke [1]
//! Program log: Instruction: DepositUsdc
//! Program data: <base64(discriminator ‖ body)>
//! Program <id> consumed 12345 of 200000 compute units
//! Program <id> success
//! ```
//!
//! Only `Program data:` lines emitted while the bridge program is on top of
//! the invocation stack are event envelopes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use solana_sdk::pubkey::Pubkey;

const PROGRAM_PREFIX: &str = "Program ";
const DATA_PREFIX: &str = "Program data: ";

/// Program-authored lines; their text never changes the invocation stack.
const MESSAGE_PREFIXES: [&str; 3] = [
    "Program log:",
    "Program return:",
    "Program consumption:",
];

pub const DISCRIMINATOR_LEN: usize = 8;

/// One event envelope found in a log batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Index of the source line in the batch
    pub line: usize,
    pub discriminator: [u8; DISCRIMINATOR_LEN],
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct LogEnvelope {
    program_id: String,
}

impl LogEnvelope {
    pub fn new(program_id: &Pubkey) -> Self {
        Self {
            program_id: program_id.to_string(),
        }
    }

    /// Extract every envelope attributed to the bridge program, in log order.
    pub fn records(&self, logs: &[String]) -> Vec<EventRecord> {
        let mut stack: Vec<&str> = Vec::new();
        let mut records = Vec::new();

        for (line, log) in logs.iter().enumerate() {
            if let Some(encoded) = log.strip_prefix(DATA_PREFIX) {
                if stack.last() != Some(&self.program_id.as_str()) {
                    continue;
                }
                if let Some(record) = decode_envelope(line, encoded.trim()) {
                    records.push(record);
                }
                continue;
            }

            if MESSAGE_PREFIXES.iter().any(|p| log.starts_with(p)) {
                continue;
            }
            let Some(rest) = log.strip_prefix(PROGRAM_PREFIX) else {
                continue;
            };
            match frame_change(rest) {
                Some(FrameChange::Invoke(id)) => stack.push(id),
                Some(FrameChange::Exit) => {
                    stack.pop();
                }
                None => {}
            }
        }

        records
    }
}

enum FrameChange<'a> {
    Invoke(&'a str),
    Exit,
}

/// Classify the text after `Program `. Only `<id> invoke [n]`, `<id> success`
/// and `<id> failed...` move the stack.
fn frame_change(rest: &str) -> Option<FrameChange<'_>> {
    let mut parts = rest.split_whitespace();
    let id = parts.next()?;
    let action = parts.next()?;
    match action {
        "invoke" => {
            let depth = parts.next()?;
            let is_depth = depth
                .strip_prefix('[')
                .and_then(|d| d.strip_suffix(']'))
                .is_some_and(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()));
            (is_depth && parts.next().is_none()).then_some(FrameChange::Invoke(id))
        }
        "success" => parts.next().is_none().then_some(FrameChange::Exit),
        a if a == "failed" || a.starts_with("failed:") => Some(FrameChange::Exit),
        _ => None,
    }
}

fn decode_envelope(line: usize, encoded: &str) -> Option<EventRecord> {
    let raw = match STANDARD.decode(encoded) {
        Ok(raw) => raw,
        Err(e) => {
            log::debug!("skipping non-base64 data line {line}: {e}");
            return None;
        }
    };
    if raw.len() < DISCRIMINATOR_LEN {
        log::debug!("skipping short data line {line} ({} bytes)", raw.len());
        return None;
    }
    let mut discriminator = [0u8; DISCRIMINATOR_LEN];
    discriminator.copy_from_slice(&raw[..DISCRIMINATOR_LEN]);
    Some(EventRecord {
        line,
        discriminator,
        body: raw[DISCRIMINATOR_LEN..].to_vec(),
    })
}
