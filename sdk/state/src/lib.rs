//! On-chain pool state as seen by clients.

pub mod pool;
pub mod tax;

use thiserror::Error;

pub use pool::{MAX_VALIDATORS, POOL_STATE_DISCRIMINATOR, PoolState, PoolStatistics};
pub use tax::{BPS_DENOMINATOR, calculate_tax};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("account data too short: {len} bytes")]
    TooShort { len: usize },

    #[error("account discriminator mismatch: {found:?}")]
    WrongDiscriminator { found: [u8; 8] },

    #[error("account body does not decode: {0}")]
    Decode(String),
}
