//! Bridge Event Listener
//!
//! Watches the bridge program's logs and hands decoded events to a callback.
//!
//! Features:
//! - Live subscription filtered to deposits, withdrawals or everything
//! - Bounded historical fetch of the most recent program transactions
//! - Malformed events are isolated and reported on a diagnostics channel
//!
//! Decoding is synchronous; the callback only ever sees well-formed events.

use std::time::{SystemTime, UNIX_EPOCH};

use log::{debug, error, info, warn};
use solana_sdk::pubkey::Pubkey;
use stable_bridge_events::{DecodeFailure, EventDecoder, EventFilter, ReceivedEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::BridgeError;
use crate::context::BridgeContext;
use crate::ledger::{LedgerClient, LogNotification};

/// An event that failed to decode, with the transaction it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub signature: String,
    pub failure: DecodeFailure,
}

/// Handle to a live subscription. Dropping it unsubscribes.
pub struct Subscription {
    token: CancellationToken,
    diagnostics: mpsc::UnboundedReceiver<Diagnostic>,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Stop delivering events. A callback already running is not interrupted.
    pub fn unsubscribe(&self) {
        if !self.token.is_cancelled() {
            info!("Unsubscribing from bridge events");
        }
        self.token.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled() && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Decode failures seen so far, in order.
    pub fn diagnostics(&mut self) -> &mut mpsc::UnboundedReceiver<Diagnostic> {
        &mut self.diagnostics
    }

    /// Wait for the dispatch task to finish, after unsubscribe or transport close.
    pub async fn closed(mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!("Event dispatch task failed: {e}");
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[derive(Debug, Clone)]
pub struct EventListener {
    program_id: Pubkey,
    decoder: EventDecoder,
}

impl EventListener {
    pub fn new(ctx: &BridgeContext) -> Self {
        Self {
            program_id: ctx.program_id,
            decoder: EventDecoder::new(&ctx.program_id),
        }
    }

    /// Start a live subscription. `callback` runs on the dispatch task, once
    /// per matching event, in log order.
    pub async fn subscribe<L, F>(
        &self,
        ledger: &L,
        filter: EventFilter,
        callback: F,
    ) -> Result<Subscription, BridgeError>
    where
        L: LedgerClient + ?Sized,
        F: FnMut(ReceivedEvent) + Send + 'static,
    {
        let notifications = ledger.subscribe_logs(&self.program_id).await?;
        let token = CancellationToken::new();
        let (diag_tx, diag_rx) = mpsc::unbounded_channel();

        info!(
            "Bridge event subscription started ({filter:?}). Watching: {}",
            self.program_id
        );
        let handle = tokio::spawn(dispatch(
            self.decoder.clone(),
            notifications,
            filter,
            callback,
            diag_tx,
            token.clone(),
        ));

        Ok(Subscription {
            token,
            diagnostics: diag_rx,
            handle: Some(handle),
        })
    }

    /// Decode events from the latest `limit` program transactions, newest
    /// transaction first. Any ledger failure aborts the whole fetch.
    pub async fn recent_events<L: LedgerClient + ?Sized>(
        &self,
        ledger: &L,
        limit: usize,
        filter: EventFilter,
    ) -> Result<Vec<ReceivedEvent>, BridgeError> {
        let signatures = ledger.recent_signatures(&self.program_id, limit).await?;
        debug!("Fetched {} recent signatures", signatures.len());

        let mut events = Vec::new();
        for info in signatures {
            let Some(logs) = ledger.transaction_logs(&info.signature).await? else {
                debug!("No logs for {}, skipping", info.signature);
                continue;
            };
            let received_at_ms = info
                .block_time
                .map(|secs| secs.saturating_mul(1000))
                .unwrap_or_else(now_ms);

            let decoded = self.decoder.decode_logs(&logs);
            for failure in &decoded.failures {
                warn!("Transaction {}: {}", info.signature, failure.error);
            }
            events.extend(
                decoded
                    .events
                    .into_iter()
                    .filter(|event| filter.matches(event))
                    .map(|event| ReceivedEvent {
                        event,
                        signature: info.signature.clone(),
                        received_at_ms,
                    }),
            );
        }
        Ok(events)
    }
}

async fn dispatch<F>(
    decoder: EventDecoder,
    mut notifications: mpsc::Receiver<LogNotification>,
    filter: EventFilter,
    mut callback: F,
    diagnostics: mpsc::UnboundedSender<Diagnostic>,
    token: CancellationToken,
) where
    F: FnMut(ReceivedEvent) + Send + 'static,
{
    loop {
        let notification = tokio::select! {
            biased;
            _ = token.cancelled() => break,
            next = notifications.recv() => match next {
                Some(notification) => notification,
                None => {
                    error!("Log subscription closed by the ledger client");
                    break;
                }
            },
        };
        if notification.logs.is_empty() {
            continue;
        }

        let decoded = decoder.decode_logs(&notification.logs);
        for failure in decoded.failures {
            // receiver may be gone
            let _ = diagnostics.send(Diagnostic {
                signature: notification.signature.clone(),
                failure,
            });
        }

        let received_at_ms = now_ms();
        for event in decoded.events.into_iter().filter(|e| filter.matches(e)) {
            if token.is_cancelled() {
                break;
            }
            debug!("{} in {}", event.name(), notification.signature);
            callback(ReceivedEvent {
                event,
                signature: notification.signature.clone(),
                received_at_ms,
            });
        }
    }
    info!("Bridge event subscription ended");
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
