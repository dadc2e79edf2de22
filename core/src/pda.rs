//! Program and account addresses.

use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

/// `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    6, 221, 246, 225, 215, 101, 161, 147, 217, 203, 225, 70, 206, 235, 121, 172, 28, 180, 133,
    237, 95, 91, 55, 145, 58, 140, 245, 133, 126, 255, 0, 169,
]);

/// `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey::new_from_array([
    140, 151, 37, 143, 78, 36, 137, 241, 187, 61, 16, 41, 20, 142, 13, 131, 11, 90, 19, 153,
    218, 255, 16, 132, 4, 142, 123, 216, 219, 233, 248, 89,
]);

pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey::new_from_array([0u8; 32]);

pub const POOL_STATE_SEED: &[u8] = b"pool_state";

/// Derive the pool state PDA
pub fn pool_state_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POOL_STATE_SEED], program_id)
}

/// Associated token account of `owner` for `mint`
pub fn custody_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .0
}

/// Create the associated token account of `owner` for `mint`, paid by `payer`.
pub fn create_custody_instruction(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    let custody = custody_address(owner, mint);
    Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(custody, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_program_ids() {
        assert_eq!(
            TOKEN_PROGRAM_ID.to_string(),
            "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA"
        );
        assert_eq!(
            ASSOCIATED_TOKEN_PROGRAM_ID.to_string(),
            "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL"
        );
        assert_eq!(SYSTEM_PROGRAM_ID.to_string(), "11111111111111111111111111111111");
    }

    #[test]
    fn pool_state_is_off_curve_and_stable() {
        let program = Pubkey::new_unique();
        let (a, bump_a) = pool_state_address(&program);
        let (b, bump_b) = pool_state_address(&program);
        assert_eq!((a, bump_a), (b, bump_b));
        assert!(!a.is_on_curve());
        assert_eq!(
            Pubkey::create_program_address(&[POOL_STATE_SEED, &[bump_a]], &program).unwrap(),
            a
        );
    }

    #[test]
    fn custody_differs_per_owner() {
        let mint = Pubkey::new_unique();
        let a = custody_address(&Pubkey::new_unique(), &mint);
        let b = custody_address(&Pubkey::new_unique(), &mint);
        assert_ne!(a, b);
    }

    #[test]
    fn create_custody_layout() {
        let payer = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ix = create_custody_instruction(&payer, &owner, &mint);

        assert_eq!(ix.program_id, ASSOCIATED_TOKEN_PROGRAM_ID);
        assert!(ix.data.is_empty());
        assert_eq!(ix.accounts.len(), 6);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, custody_address(&owner, &mint));
        assert!(ix.accounts[1].is_writable);
        assert_eq!(ix.accounts[2].pubkey, owner);
        assert!(!ix.accounts[2].is_writable);
    }
}
