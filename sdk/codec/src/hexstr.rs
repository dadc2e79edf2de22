use crate::CodecError;

/// Decode a hex string. Case-insensitive; an optional `0x` prefix is accepted.
pub fn hex_decode(text: &str) -> Result<Vec<u8>, CodecError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    hex::decode(digits).map_err(|e| CodecError::MalformedHex(e.to_string()))
}

/// Encode bytes as lowercase hex without a prefix.
pub fn hex_encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}
