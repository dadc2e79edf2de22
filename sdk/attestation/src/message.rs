//! Withdrawal message construction.
//!
//! ```text
//! offset  0      1            33           65           97          129
//!         ┌──────┬────────────┬────────────┬────────────┬────────────┐
//!         │ tag  │   nonce    │   amount   │   source   │    dest    │
//!         │ 0x01 │  32 bytes  │ 24x00‖u64BE│ 12x00‖evm  │  pubkey    │
//!         └──────┴────────────┴────────────┴────────────┴────────────┘
//! ```

use num_bigint::BigUint;
use sha2::{Digest, Sha256};
use stable_bridge_codec::{encode_be, left_pad, to_fixed};

use crate::AttestationError;

/// Total preimage length
pub const MESSAGE_LEN: usize = 1 + FIELD_LEN * 4;

/// Chain identifier tag in byte 0
pub const CHAIN_TAG: u8 = 1;

pub const NONCE_LEN: usize = 32;
pub const SOURCE_ADDRESS_LEN: usize = 20;
pub const DEST_ADDRESS_LEN: usize = 32;

const FIELD_LEN: usize = 32;
const AMOUNT_LEN: usize = 8;

const NONCE_OFFSET: usize = 1;
const AMOUNT_OFFSET: usize = NONCE_OFFSET + FIELD_LEN;
const SOURCE_OFFSET: usize = AMOUNT_OFFSET + FIELD_LEN;
const DEST_OFFSET: usize = SOURCE_OFFSET + FIELD_LEN;

/// Build the 129-byte withdrawal message.
///
/// The amount is written as an 8-byte big-endian integer and only then
/// left-padded into its 32-byte slot; the program reads it back the same way.
pub fn build_message(
    nonce: &[u8],
    amount: u64,
    source_address: &[u8],
    dest_address: &[u8],
) -> Result<[u8; MESSAGE_LEN], AttestationError> {
    let nonce: [u8; NONCE_LEN] = to_fixed("nonce", nonce)?;
    let source: [u8; SOURCE_ADDRESS_LEN] = to_fixed("source address", source_address)?;
    let dest: [u8; DEST_ADDRESS_LEN] = to_fixed("destination address", dest_address)?;

    let mut message = [0u8; MESSAGE_LEN];
    message[0] = CHAIN_TAG;
    message[NONCE_OFFSET..AMOUNT_OFFSET].copy_from_slice(&nonce);

    let amount_be = encode_be(&BigUint::from(amount), AMOUNT_LEN)?;
    message[AMOUNT_OFFSET..SOURCE_OFFSET].copy_from_slice(&left_pad(&amount_be, FIELD_LEN)?);
    message[SOURCE_OFFSET..DEST_OFFSET].copy_from_slice(&left_pad(&source, FIELD_LEN)?);
    message[DEST_OFFSET..MESSAGE_LEN].copy_from_slice(&left_pad(&dest, FIELD_LEN)?);

    Ok(message)
}

/// SHA-256 digest of [`build_message`], the value validators sign.
pub fn message_hash(
    nonce: &[u8],
    amount: u64,
    source_address: &[u8],
    dest_address: &[u8],
) -> Result<[u8; 32], AttestationError> {
    let message = build_message(nonce, amount, source_address, dest_address)?;
    Ok(Sha256::digest(message).into())
}
