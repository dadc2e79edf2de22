use borsh::BorshDeserialize;
use solana_sdk::pubkey::Pubkey;

use crate::StateError;
use crate::tax::{BPS_DENOMINATOR, calculate_tax};

pub const POOL_STATE_DISCRIMINATOR: [u8; 8] = [247, 237, 227, 245, 215, 195, 222, 70];
pub const MAX_VALIDATORS: usize = 16;

/// Serialized length of the fields after the discriminator.
pub const POOL_STATE_BODY_LEN: usize = 32 * 3 + 1 + 32 * MAX_VALIDATORS + 1 + 2 + 8 + 8 + 32 + 1;

#[derive(BorshDeserialize)]
struct RawPoolState {
    owner: [u8; 32],
    proposed_owner: [u8; 32],
    usdc_mint: [u8; 32],
    paused: bool,
    validators: [[u8; 32]; MAX_VALIDATORS],
    required_signatures: u8,
    tax: u16,
    total_volume: u64,
    accumulated_fees: u64,
    treasury: [u8; 32],
    bump: u8,
}

/// Bridge pool configuration account. Read-only from the client's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub owner: Pubkey,
    pub proposed_owner: Pubkey,
    pub mint: Pubkey,
    pub paused: bool,
    /// Raw slots; unused slots hold the all-zero key.
    pub validator_slots: [Pubkey; MAX_VALIDATORS],
    pub required_signatures: u8,
    /// Basis points
    pub tax: u16,
    pub total_volume: u64,
    pub accumulated_fees: u64,
    pub treasury: Pubkey,
    pub bump: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStatistics {
    pub total_volume: u64,
    pub accumulated_fees: u64,
    pub tax_bps: u16,
}

impl PoolState {
    /// Decode raw account data. Bytes past the last field are ignored.
    pub fn decode(data: &[u8]) -> Result<Self, StateError> {
        if data.len() < 8 + POOL_STATE_BODY_LEN {
            return Err(StateError::TooShort { len: data.len() });
        }
        let mut found = [0u8; 8];
        found.copy_from_slice(&data[..8]);
        if found != POOL_STATE_DISCRIMINATOR {
            return Err(StateError::WrongDiscriminator { found });
        }

        let raw = RawPoolState::deserialize(&mut &data[8..])
            .map_err(|e| StateError::Decode(e.to_string()))?;

        let state = Self {
            owner: Pubkey::new_from_array(raw.owner),
            proposed_owner: Pubkey::new_from_array(raw.proposed_owner),
            mint: Pubkey::new_from_array(raw.usdc_mint),
            paused: raw.paused,
            validator_slots: raw.validators.map(Pubkey::new_from_array),
            required_signatures: raw.required_signatures,
            tax: raw.tax,
            total_volume: raw.total_volume,
            accumulated_fees: raw.accumulated_fees,
            treasury: Pubkey::new_from_array(raw.treasury),
            bump: raw.bump,
        };
        state.check_invariants();
        Ok(state)
    }

    /// Occupied validator slots in slot order.
    pub fn validators(&self) -> Vec<Pubkey> {
        self.validator_slots
            .iter()
            .filter(|pk| **pk != Pubkey::default())
            .copied()
            .collect()
    }

    pub fn statistics(&self) -> PoolStatistics {
        PoolStatistics {
            total_volume: self.total_volume,
            accumulated_fees: self.accumulated_fees,
            tax_bps: self.tax,
        }
    }

    pub fn tax_for(&self, amount: u64) -> u64 {
        calculate_tax(amount, self.tax)
    }

    /// Whether the account satisfies the program's own invariants.
    pub fn is_consistent(&self) -> bool {
        usize::from(self.required_signatures) <= self.validators().len()
            && u64::from(self.tax) <= BPS_DENOMINATOR
    }

    fn check_invariants(&self) {
        if !self.is_consistent() {
            log::warn!(
                "pool state inconsistent: required_signatures={} validators={} tax={}",
                self.required_signatures,
                self.validators().len(),
                self.tax
            );
        }
    }
}
