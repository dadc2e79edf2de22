use num_bigint::BigUint;

use crate::CodecError;

/// Encode `value` into exactly `width` bytes, big-endian, left-zero-padded.
pub fn encode_be(value: &BigUint, width: usize) -> Result<Vec<u8>, CodecError> {
    // BigUint encodes zero as a single 0x00 byte
    if value.bits() == 0 {
        return Ok(vec![0u8; width]);
    }
    left_pad(&value.to_bytes_be(), width)
}

/// Copy `bytes` into the rightmost end of a zero buffer of length `width`.
pub fn left_pad(bytes: &[u8], width: usize) -> Result<Vec<u8>, CodecError> {
    if bytes.len() > width {
        return Err(CodecError::EncodingOverflow {
            needed: bytes.len(),
            width,
        });
    }
    let mut out = vec![0u8; width];
    out[width - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}

/// Check that `bytes` is exactly `N` long and copy it into an array.
pub fn to_fixed<const N: usize>(field: &'static str, bytes: &[u8]) -> Result<[u8; N], CodecError> {
    bytes
        .try_into()
        .map_err(|_| CodecError::InvalidInputLength {
            field,
            expected: N,
            actual: bytes.len(),
        })
}
