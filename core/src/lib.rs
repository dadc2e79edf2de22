//! Stable Bridge Core
//!
//! Client-side orchestration of the Solana leg of the bridge: deposits,
//! withdrawals, pool queries and the event listener.
//!
//! ```text
//! ┌──────────┐   ┌────────────────┐   ┌──────────────┐   ┌────────────────┐
//! │  caller  │──▶│ BridgeContext  │──▶│ instructions │──▶│  LedgerClient  │
//! └──────────┘   │deposit/withdraw│   │ (borsh args) │   │ (rpc / memory) │
//!      ▲         └────────────────┘   └──────────────┘   └───────┬────────┘
//!      │                                                         │ logs
//!      │         ┌────────────────┐                              │
//!      └─────────│ EventListener  │◀─────────────────────────────┘
//!                └────────────────┘
//! ```
//!
//! There is no process-wide state. The context and the ledger client are
//! passed to every operation.

pub mod bridge;
pub mod context;
pub mod error;
pub mod instruction;
pub mod ledger;
pub mod listener;
pub mod pda;
pub mod rpc;

pub use bridge::WithdrawalRequest;
pub use context::BridgeContext;
pub use error::BridgeError;
pub use ledger::{LedgerClient, LogNotification, SignatureInfo};
pub use listener::{Diagnostic, EventListener, Subscription};
pub use rpc::RpcLedgerClient;

pub use stable_bridge_attestation::{SignatureComponents, SignatureTriple, message_hash};
pub use stable_bridge_events::{BridgeEvent, EventFilter, ReceivedEvent};
pub use stable_bridge_state::{PoolState, PoolStatistics, calculate_tax};
