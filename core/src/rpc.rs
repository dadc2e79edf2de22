//! JSON-RPC and websocket implementation of [`LedgerClient`].

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, error, info};
use solana_client::nonblocking::pubsub_client::PubsubClient;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_client::GetConfirmedSignaturesForAddress2Config;
use solana_client::rpc_config::{
    RpcTransactionConfig, RpcTransactionLogsConfig, RpcTransactionLogsFilter,
};
use solana_commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::signer::keypair::read_keypair_file;
use solana_sdk::transaction::Transaction;
use solana_transaction_status_client_types::UiTransactionEncoding;
use solana_transaction_status_client_types::option_serializer::OptionSerializer;
use stable_bridge_config::ResolvedConfig;
use tokio::sync::{mpsc, oneshot};
use tokio_stream::StreamExt;

use crate::ledger::{LedgerClient, LogNotification, SignatureInfo};

const LOG_CHANNEL_CAPACITY: usize = 256;

pub struct RpcLedgerClient {
    rpc: RpcClient,
    ws_url: String,
    /// `None` for a read-only client
    payer: Option<Arc<Keypair>>,
    commitment: CommitmentConfig,
}

impl RpcLedgerClient {
    pub fn new(rpc_url: &str, ws_url: &str, payer: Keypair, commitment: CommitmentConfig) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.to_string(), commitment),
            ws_url: ws_url.to_string(),
            payer: Some(Arc::new(payer)),
            commitment,
        }
    }

    /// A client that can query and subscribe but not submit.
    pub fn read_only(rpc_url: &str, ws_url: &str, commitment: CommitmentConfig) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.to_string(), commitment),
            ws_url: ws_url.to_string(),
            payer: None,
            commitment,
        }
    }

    /// Connect using a resolved config, reading the keypair from disk.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self> {
        let payer = read_keypair_file(&config.keypair_path).map_err(|e| {
            anyhow::anyhow!(
                "Failed to read keypair file '{}': {}",
                config.keypair_path.display(),
                e
            )
        })?;
        info!("Loaded payer keypair: {}", payer.pubkey());
        Ok(Self::new(
            &config.rpc_url,
            &config.ws_url,
            payer,
            config.commitment,
        ))
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    fn payer(&self) -> Pubkey {
        self.payer
            .as_ref()
            .map(|kp| kp.pubkey())
            .unwrap_or_default()
    }

    async fn account_exists(&self, address: &Pubkey) -> Result<bool> {
        Ok(self.account_data(address).await?.is_some())
    }

    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.commitment)
            .await
            .with_context(|| format!("Failed to fetch account {address}"))?;
        Ok(response.value.map(|account| account.data))
    }

    async fn submit(&self, instructions: Vec<Instruction>) -> Result<String> {
        let payer: &Keypair = self
            .payer
            .as_deref()
            .context("No payer keypair configured, client is read-only")?;
        let blockhash = self
            .rpc
            .get_latest_blockhash()
            .await
            .context("Failed to get recent blockhash")?;
        let tx = Transaction::new_signed_with_payer(
            &instructions,
            Some(&payer.pubkey()),
            &[payer],
            blockhash,
        );
        let signature = self
            .rpc
            .send_and_confirm_transaction(&tx)
            .await
            .context("Transaction failed")?;
        info!("Transaction confirmed: {signature}");
        Ok(signature.to_string())
    }

    async fn recent_signatures(
        &self,
        program_id: &Pubkey,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>> {
        let statuses = self
            .rpc
            .get_signatures_for_address_with_config(
                program_id,
                GetConfirmedSignaturesForAddress2Config {
                    before: None,
                    until: None,
                    limit: Some(limit),
                    commitment: Some(self.commitment),
                },
            )
            .await
            .with_context(|| format!("Failed to list signatures for {program_id}"))?;

        Ok(statuses
            .into_iter()
            .map(|s| SignatureInfo {
                signature: s.signature,
                block_time: s.block_time,
            })
            .collect())
    }

    async fn transaction_logs(&self, signature: &str) -> Result<Option<Vec<String>>> {
        let sig = Signature::from_str(signature)
            .with_context(|| format!("Invalid signature: {signature}"))?;
        let tx = self
            .rpc
            .get_transaction_with_config(
                &sig,
                RpcTransactionConfig {
                    encoding: Some(UiTransactionEncoding::Json),
                    commitment: Some(self.commitment),
                    max_supported_transaction_version: Some(0),
                },
            )
            .await
            .with_context(|| format!("Failed to fetch transaction {signature}"))?;

        Ok(match tx.transaction.meta.map(|m| m.log_messages) {
            Some(OptionSerializer::Some(logs)) => Some(logs),
            _ => None,
        })
    }

    async fn subscribe_logs(&self, program_id: &Pubkey) -> Result<mpsc::Receiver<LogNotification>> {
        let pubsub = PubsubClient::new(&self.ws_url)
            .await
            .with_context(|| format!("Failed to connect to {}", self.ws_url))?;
        info!("Connected to Solana pubsub at {}", self.ws_url);

        let (tx, rx) = mpsc::channel(LOG_CHANNEL_CAPACITY);
        let (ready_tx, ready_rx) = oneshot::channel();
        let filter = RpcTransactionLogsFilter::Mentions(vec![program_id.to_string()]);
        let config = RpcTransactionLogsConfig {
            commitment: Some(self.commitment),
        };

        // the stream borrows the client, so both live in the task
        tokio::spawn(async move {
            let (mut stream, unsubscribe) = match pubsub.logs_subscribe(filter, config).await {
                Ok(subscription) => {
                    let _ = ready_tx.send(Ok(()));
                    subscription
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };

            loop {
                tokio::select! {
                    _ = tx.closed() => {
                        debug!("Log receiver dropped, unsubscribing");
                        break;
                    }
                    item = stream.next() => match item {
                        Some(response) => {
                            let notification = LogNotification {
                                signature: response.value.signature,
                                logs: response.value.logs,
                            };
                            if tx.send(notification).await.is_err() {
                                break;
                            }
                        }
                        None => {
                            error!("Log subscription stream ended");
                            break;
                        }
                    }
                }
            }

            drop(stream);
            unsubscribe().await;
        });

        ready_rx
            .await
            .context("Log subscription task exited early")?
            .context("Failed to subscribe to program logs")?;
        info!("Subscribed to logs mentioning {program_id}");
        Ok(rx)
    }
}
