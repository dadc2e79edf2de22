//! Stable Bridge Attestation
//!
//! The two pieces of the withdrawal path that must stay bit-exact with the
//! bridge program:
//!
//! ```text
//! ┌──────────────┐   sign(hash)    ┌──────────────┐   r/s/v x16   ┌─────────────┐
//! │  Withdrawal  │───────────────▶│  Validators  │──────────────▶│  withdraw   │
//! │  message     │   (off-chain)   │  (1..=16)    │   (padded)    │  instruction│
//! └──────────────┘                 └──────────────┘               └─────────────┘
//! ```
//!
//! The program re-derives the message hash from the instruction arguments and
//! checks the signatures slot by slot, so both layouts are protocol wire
//! formats.

pub mod message;
pub mod signatures;

use stable_bridge_codec::CodecError;
use thiserror::Error;

pub use message::{MESSAGE_LEN, build_message, message_hash};
pub use signatures::{
    MAX_VALIDATORS, PackedSignatures, SignatureComponents, SignatureTriple, pack_signatures,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttestationError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("too many signatures: got {got}, validator capacity is {max}")]
    TooManySignatures { got: usize, max: usize },

    #[error("mismatched signature components: r={r}, s={s}, v={v}")]
    MismatchedSignatureComponents { r: usize, s: usize, v: usize },
}
