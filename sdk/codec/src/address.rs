use std::fmt;
use std::str::FromStr;

use crate::{CodecError, hex_decode, hex_encode, to_fixed};

/// A 20-byte account address on the EVM side of the bridge.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ExternalAddress(pub [u8; 20]);

impl ExternalAddress {
    pub const LEN: usize = 20;

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl TryFrom<&[u8]> for ExternalAddress {
    type Error = CodecError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        to_fixed("external address", bytes).map(Self)
    }
}

/// Parses the strict `0x` + 40 hex digit form.
impl FromStr for ExternalAddress {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with("0x") {
            return Err(CodecError::MalformedHex(
                "external address must start with 0x".into(),
            ));
        }
        let bytes = hex_decode(s)?;
        Self::try_from(bytes.as_slice())
    }
}

impl fmt::Display for ExternalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex_encode(&self.0))
    }
}

impl fmt::Debug for ExternalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExternalAddress({self})")
    }
}

impl AsRef<[u8]> for ExternalAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
