use solana_sdk::pubkey::Pubkey;
use stable_bridge_config::ResolvedConfig;

use crate::pda::{custody_address, pool_state_address};

/// Addresses every bridge operation needs, derived once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeContext {
    pub program_id: Pubkey,
    pub mint: Pubkey,
    pub pool_state: Pubkey,
    pub pool_bump: u8,
    /// The pool's own token account
    pub pool_custody: Pubkey,
}

impl BridgeContext {
    pub fn new(program_id: Pubkey, mint: Pubkey) -> Self {
        let (pool_state, pool_bump) = pool_state_address(&program_id);
        let pool_custody = custody_address(&pool_state, &mint);
        log::debug!("pool state {pool_state} (bump {pool_bump}), custody {pool_custody}");
        Self {
            program_id,
            mint,
            pool_state,
            pool_bump,
            pool_custody,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.program_id, config.mint)
    }

    /// Token account of `owner` for the bridged mint
    pub fn custody_of(&self, owner: &Pubkey) -> Pubkey {
        custody_address(owner, &self.mint)
    }
}
