//! Deposit, withdraw and pool queries.

use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use stable_bridge_attestation::{SignatureTriple, pack_signatures};
use stable_bridge_codec::{ExternalAddress, to_fixed};
use stable_bridge_state::{PoolState, PoolStatistics, calculate_tax};

use crate::BridgeError;
use crate::context::BridgeContext;
use crate::instruction::{self, WithdrawArgs};
use crate::ledger::LedgerClient;
use crate::pda::create_custody_instruction;

/// Everything needed to release funds attested on the external chain.
///
/// The nonce is carried verbatim; it is never generated or rewritten here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalRequest {
    pub amount: u64,
    /// 20-byte external chain sender
    pub sender: Vec<u8>,
    /// 32-byte nonce the validators signed
    pub nonce: Vec<u8>,
    pub recipient: Pubkey,
    /// Ascending validator-index order
    pub signatures: Vec<SignatureTriple>,
}

impl BridgeContext {
    /// Instructions for a deposit, given whether the pool's custody account exists.
    pub fn deposit_instructions(
        &self,
        depositor: &Pubkey,
        amount: u64,
        recipient: &[u8],
        pool_custody_exists: bool,
    ) -> Result<Vec<Instruction>, BridgeError> {
        let recipient = ExternalAddress::try_from(recipient)?;

        let mut instructions = Vec::with_capacity(2);
        if !pool_custody_exists {
            instructions.push(create_custody_instruction(
                depositor,
                &self.pool_state,
                &self.mint,
            ));
        }
        instructions.push(instruction::deposit_usdc(self, depositor, amount, &recipient)?);
        Ok(instructions)
    }

    /// Instructions for a withdrawal, given whether the recipient's custody account exists.
    pub fn withdraw_instructions(
        &self,
        payer: &Pubkey,
        request: &WithdrawalRequest,
        recipient_custody_exists: bool,
    ) -> Result<Vec<Instruction>, BridgeError> {
        let args = withdraw_args(request)?;

        let mut instructions = Vec::with_capacity(2);
        if !recipient_custody_exists {
            instructions.push(create_custody_instruction(
                payer,
                &request.recipient,
                &self.mint,
            ));
        }
        instructions.push(instruction::withdraw_usdc(
            self,
            payer,
            &request.recipient,
            &args,
        )?);
        Ok(instructions)
    }

    /// Lock `amount` in the pool for delivery to `recipient` on the external chain.
    pub async fn deposit<L: LedgerClient + ?Sized>(
        &self,
        ledger: &L,
        amount: u64,
        recipient: &[u8],
    ) -> Result<String, BridgeError> {
        // validate before touching the ledger
        ExternalAddress::try_from(recipient)?;

        let depositor = ledger.payer();
        let exists = ledger.account_exists(&self.pool_custody).await?;
        if !exists {
            log::info!("Pool custody {} missing, creating it", self.pool_custody);
        }
        let instructions = self.deposit_instructions(&depositor, amount, recipient, exists)?;

        let signature = ledger.submit(instructions).await?;
        log::info!("Deposit of {amount} submitted: {signature}");
        Ok(signature)
    }

    /// Release funds on Solana against validator signatures.
    pub async fn withdraw<L: LedgerClient + ?Sized>(
        &self,
        ledger: &L,
        request: &WithdrawalRequest,
    ) -> Result<String, BridgeError> {
        withdraw_args(request)?;

        let payer = ledger.payer();
        let recipient_custody = self.custody_of(&request.recipient);
        let exists = ledger.account_exists(&recipient_custody).await?;
        if !exists {
            log::info!("Recipient custody {recipient_custody} missing, creating it");
        }
        let instructions = self.withdraw_instructions(&payer, request, exists)?;

        let signature = ledger.submit(instructions).await?;
        log::info!(
            "Withdrawal of {} to {} submitted: {signature}",
            request.amount,
            request.recipient
        );
        Ok(signature)
    }

    pub async fn pool_state<L: LedgerClient + ?Sized>(
        &self,
        ledger: &L,
    ) -> Result<PoolState, BridgeError> {
        let data = ledger
            .account_data(&self.pool_state)
            .await?
            .ok_or_else(|| BridgeError::InvalidAccountData {
                address: self.pool_state,
                reason: "account does not exist".into(),
            })?;
        PoolState::decode(&data).map_err(|e| BridgeError::InvalidAccountData {
            address: self.pool_state,
            reason: e.to_string(),
        })
    }

    pub async fn is_paused<L: LedgerClient + ?Sized>(
        &self,
        ledger: &L,
    ) -> Result<bool, BridgeError> {
        Ok(self.pool_state(ledger).await?.paused)
    }

    /// Current tax rate in basis points
    pub async fn tax_bps<L: LedgerClient + ?Sized>(&self, ledger: &L) -> Result<u16, BridgeError> {
        Ok(self.pool_state(ledger).await?.tax)
    }

    /// Configured validators, empty slots removed
    pub async fn validators<L: LedgerClient + ?Sized>(
        &self,
        ledger: &L,
    ) -> Result<Vec<Pubkey>, BridgeError> {
        Ok(self.pool_state(ledger).await?.validators())
    }

    pub async fn required_signatures<L: LedgerClient + ?Sized>(
        &self,
        ledger: &L,
    ) -> Result<u8, BridgeError> {
        Ok(self.pool_state(ledger).await?.required_signatures)
    }

    pub async fn statistics<L: LedgerClient + ?Sized>(
        &self,
        ledger: &L,
    ) -> Result<PoolStatistics, BridgeError> {
        Ok(self.pool_state(ledger).await?.statistics())
    }

    /// Tax on `amount` at the pool's live rate.
    pub async fn calculate_tax<L: LedgerClient + ?Sized>(
        &self,
        ledger: &L,
        amount: u64,
    ) -> Result<u64, BridgeError> {
        let bps = self.tax_bps(ledger).await?;
        Ok(calculate_tax(amount, bps))
    }
}

fn withdraw_args(request: &WithdrawalRequest) -> Result<WithdrawArgs, BridgeError> {
    let sender: [u8; 20] = to_fixed("sender address", &request.sender)?;
    let nonce: [u8; 32] = to_fixed("nonce", &request.nonce)?;
    let packed = pack_signatures(&request.signatures)?;
    Ok(WithdrawArgs::new(request.amount, sender, nonce, &packed))
}
