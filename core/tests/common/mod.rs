#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, bail};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use stable_bridge_core::{LedgerClient, LogNotification, SignatureInfo};
use stable_bridge_state::POOL_STATE_DISCRIMINATOR;
use tokio::sync::mpsc;

pub const DEPOSITED_DISC: [u8; 8] = [75, 200, 113, 3, 12, 197, 106, 215];
pub const WITHDRAWN_DISC: [u8; 8] = [58, 59, 209, 122, 222, 203, 160, 217];

/// In-memory ledger that records submissions.
#[derive(Default)]
pub struct MockLedger {
    pub payer: Pubkey,
    pub accounts: Mutex<HashMap<Pubkey, Vec<u8>>>,
    pub submitted: Mutex<Vec<Vec<Instruction>>>,
    pub calls: Mutex<usize>,
    signatures: Vec<SignatureInfo>,
    transactions: HashMap<String, Vec<String>>,
    feed: Mutex<Option<mpsc::Receiver<LogNotification>>>,
    offline: bool,
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            payer: Pubkey::new_unique(),
            ..Default::default()
        }
    }

    /// Every call fails
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::new()
        }
    }

    pub fn with_account(self, address: Pubkey, data: Vec<u8>) -> Self {
        self.accounts.lock().unwrap().insert(address, data);
        self
    }

    /// Push newest transactions last; `recent_signatures` returns newest first.
    pub fn with_transaction(
        mut self,
        signature: &str,
        block_time: Option<i64>,
        logs: Vec<String>,
    ) -> Self {
        self.signatures.insert(
            0,
            SignatureInfo {
                signature: signature.to_string(),
                block_time,
            },
        );
        self.transactions.insert(signature.to_string(), logs);
        self
    }

    /// Sender side of the live log feed
    pub fn live_feed(&self) -> mpsc::Sender<LogNotification> {
        let (tx, rx) = mpsc::channel(64);
        *self.feed.lock().unwrap() = Some(rx);
        tx
    }

    pub fn submissions(&self) -> Vec<Vec<Instruction>> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn enter(&self) -> Result<()> {
        *self.calls.lock().unwrap() += 1;
        if self.offline {
            bail!("rpc unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    fn payer(&self) -> Pubkey {
        self.payer
    }

    async fn account_exists(&self, address: &Pubkey) -> Result<bool> {
        self.enter()?;
        Ok(self.accounts.lock().unwrap().contains_key(address))
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        self.enter()?;
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn submit(&self, instructions: Vec<Instruction>) -> Result<String> {
        self.enter()?;
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(instructions);
        Ok(format!("sig{}", submitted.len()))
    }

    async fn recent_signatures(
        &self,
        _program_id: &Pubkey,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>> {
        self.enter()?;
        Ok(self.signatures.iter().take(limit).cloned().collect())
    }

    async fn transaction_logs(&self, signature: &str) -> Result<Option<Vec<String>>> {
        self.enter()?;
        Ok(self.transactions.get(signature).cloned())
    }

    async fn subscribe_logs(
        &self,
        _program_id: &Pubkey,
    ) -> Result<mpsc::Receiver<LogNotification>> {
        self.enter()?;
        match self.feed.lock().unwrap().take() {
            Some(rx) => Ok(rx),
            None => bail!("no live feed configured"),
        }
    }
}

// ============================================================================
// Log and account fixtures
// ============================================================================

pub fn data_line(disc: [u8; 8], body: &[u8]) -> String {
    let mut raw = disc.to_vec();
    raw.extend_from_slice(body);
    format!("Program data: {}", STANDARD.encode(raw))
}

pub fn program_logs(program_id: &Pubkey, lines: Vec<String>) -> Vec<String> {
    let mut logs = vec![format!("Program {program_id} invoke [1]")];
    logs.extend(lines);
    logs.push(format!("Program {program_id} success"));
    logs
}

pub fn deposited_body(amount: u64, nonce: u64) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&[1u8; 32]);
    body.extend_from_slice(&[2u8; 32]);
    body.extend_from_slice(&[0xcd; 20]);
    body.extend_from_slice(&amount.to_le_bytes());
    body.extend_from_slice(&(amount / 200).to_le_bytes());
    body.extend_from_slice(&nonce.to_le_bytes());
    body.extend_from_slice(&1_700_000_000i64.to_le_bytes());
    body
}

pub fn withdrawn_body(amount: u64) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&[3u8; 32]);
    body.extend_from_slice(&[4u8; 32]);
    body.extend_from_slice(&amount.to_le_bytes());
    body.extend_from_slice(&1_700_000_001i64.to_le_bytes());
    body
}

/// Pool state account with the given validator slots filled in order.
pub fn pool_account(validators: &[Pubkey], required: u8, tax: u16, paused: bool) -> Vec<u8> {
    let mut data = POOL_STATE_DISCRIMINATOR.to_vec();
    data.extend_from_slice(&[9u8; 32]);
    data.extend_from_slice(&[0u8; 32]);
    data.extend_from_slice(&[8u8; 32]);
    data.push(paused as u8);
    for slot in 0..16 {
        match validators.get(slot) {
            Some(pk) => data.extend_from_slice(pk.as_ref()),
            None => data.extend_from_slice(&[0u8; 32]),
        }
    }
    data.push(required);
    data.extend_from_slice(&tax.to_le_bytes());
    data.extend_from_slice(&42_000_000u64.to_le_bytes());
    data.extend_from_slice(&210_000u64.to_le_bytes());
    data.extend_from_slice(&[7u8; 32]);
    data.push(255);
    data
}
