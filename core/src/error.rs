use solana_sdk::pubkey::Pubkey;
use stable_bridge_attestation::AttestationError;
use stable_bridge_codec::CodecError;
use stable_bridge_events::EventError;
use thiserror::Error;

/// Every failure an orchestrator operation can return.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("invalid input length for {field}: expected {expected} bytes, got {actual}")]
    InvalidInputLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("encoding overflow: value needs {needed} bytes, field holds {width}")]
    EncodingOverflow { needed: usize, width: usize },

    #[error("malformed hex: {0}")]
    MalformedHex(String),

    #[error("too many signatures: got {got}, validator capacity is {max}")]
    TooManySignatures { got: usize, max: usize },

    #[error("mismatched signature components: r={r}, s={s}, v={v}")]
    MismatchedSignatureComponents { r: usize, s: usize, v: usize },

    #[error(transparent)]
    MalformedEvent(#[from] EventError),

    #[error("invalid account data at {address}: {reason}")]
    InvalidAccountData { address: Pubkey, reason: String },

    #[error("ledger client failure: {0:#}")]
    ExternalFailure(#[from] anyhow::Error),
}

impl From<CodecError> for BridgeError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::EncodingOverflow { needed, width } => {
                BridgeError::EncodingOverflow { needed, width }
            }
            CodecError::InvalidInputLength {
                field,
                expected,
                actual,
            } => BridgeError::InvalidInputLength {
                field,
                expected,
                actual,
            },
            CodecError::MalformedHex(s) => BridgeError::MalformedHex(s),
        }
    }
}

impl From<AttestationError> for BridgeError {
    fn from(err: AttestationError) -> Self {
        match err {
            AttestationError::Codec(e) => e.into(),
            AttestationError::TooManySignatures { got, max } => {
                BridgeError::TooManySignatures { got, max }
            }
            AttestationError::MismatchedSignatureComponents { r, s, v } => {
                BridgeError::MismatchedSignatureComponents { r, s, v }
            }
        }
    }
}
