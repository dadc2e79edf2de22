//! The seam between the orchestrator and a Solana node.

use anyhow::Result;
use async_trait::async_trait;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use tokio::sync::mpsc;

/// A confirmed transaction signature that mentions a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureInfo {
    pub signature: String,
    /// Seconds since the Unix epoch, when the node knows it
    pub block_time: Option<i64>,
}

/// One transaction's logs as pushed by a log subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogNotification {
    pub signature: String,
    pub logs: Vec<String>,
}

/// Operations the bridge needs from the ledger. Failures are opaque and are
/// surfaced to callers unmodified.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// The fee payer and signer of submitted transactions
    fn payer(&self) -> Pubkey;

    async fn account_exists(&self, address: &Pubkey) -> Result<bool>;

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    /// Sign, send and confirm one transaction. Returns its signature.
    async fn submit(&self, instructions: Vec<Instruction>) -> Result<String>;

    /// Newest first
    async fn recent_signatures(&self, program_id: &Pubkey, limit: usize)
    -> Result<Vec<SignatureInfo>>;

    /// `None` when the transaction or its logs are unavailable
    async fn transaction_logs(&self, signature: &str) -> Result<Option<Vec<String>>>;

    /// Stream of log notifications for transactions mentioning `program_id`.
    /// Dropping the receiver ends the subscription.
    async fn subscribe_logs(&self, program_id: &Pubkey) -> Result<mpsc::Receiver<LogNotification>>;
}
