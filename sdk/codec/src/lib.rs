//! Byte Codec
//!
//! Fixed-width encoding primitives shared by the message builder, the
//! signature packager and the instruction encoders. Every field on the
//! bridge wire is a fixed-size, big-endian, left-zero-padded slot.

pub mod address;
pub mod bytes;
pub mod hexstr;

use thiserror::Error;

pub use address::ExternalAddress;
pub use bytes::{encode_be, left_pad, to_fixed};
pub use hexstr::{hex_decode, hex_encode};

/// Codec errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("encoding overflow: value needs {needed} bytes, field holds {width}")]
    EncodingOverflow { needed: usize, width: usize },

    #[error("invalid input length for {field}: expected {expected} bytes, got {actual}")]
    InvalidInputLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("malformed hex: {0}")]
    MalformedHex(String),
}
