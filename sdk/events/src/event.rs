use std::fmt;

use num_bigint::BigUint;
use solana_sdk::pubkey::Pubkey;
use stable_bridge_codec::ExternalAddress;

use crate::EventError;
use crate::schema::{DEPOSITED, EventSchema, WITHDRAWN};
use crate::value::{FieldValue, FieldView, Fields};

/// A deposit left Solana for the external chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositedEvent {
    pub address: Pubkey,
    pub depositor: Pubkey,
    /// `0x`-prefixed lowercase hex
    pub recipient_external_address: String,
    pub amount: BigUint,
    pub tax: BigUint,
    pub nonce: BigUint,
    pub timestamp: i64,
}

/// A withdrawal was paid out on Solana.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawnEvent {
    pub address: Pubkey,
    pub recipient: Pubkey,
    pub amount: BigUint,
    pub timestamp: i64,
}

/// An administrative event, decoded generically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueEvent {
    pub name: &'static str,
    pub discriminator: [u8; 8],
    pub body: Vec<u8>,
    pub fields: Fields,
}

impl OpaqueEvent {
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    Deposited(DepositedEvent),
    Withdrawn(WithdrawnEvent),
    Opaque(OpaqueEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Deposited,
    Withdrawn,
    Administrative,
}

impl BridgeEvent {
    pub(crate) fn from_fields(
        schema: &'static EventSchema,
        body: Vec<u8>,
        fields: Fields,
    ) -> Result<Self, EventError> {
        let view = FieldView::new(schema.name, &fields);
        let event = match schema.name {
            DEPOSITED => {
                let address = ExternalAddress::try_from(view.bytes("recipient_evm_address")?)
                    .map_err(|e| EventError::malformed(schema.name, e.to_string()))?;
                BridgeEvent::Deposited(DepositedEvent {
                    address: view.pubkey("address")?,
                    depositor: view.pubkey("depositor")?,
                    recipient_external_address: address.to_string(),
                    amount: BigUint::from(view.u64("amount")?),
                    tax: BigUint::from(view.u64("tax")?),
                    nonce: BigUint::from(view.u64("nonce")?),
                    timestamp: view.i64("timestamp")?,
                })
            }
            WITHDRAWN => BridgeEvent::Withdrawn(WithdrawnEvent {
                address: view.pubkey("address")?,
                recipient: view.pubkey("recipient")?,
                amount: BigUint::from(view.u64("amount")?),
                timestamp: view.i64("timestamp")?,
            }),
            name => BridgeEvent::Opaque(OpaqueEvent {
                name,
                discriminator: schema.discriminator,
                body,
                fields,
            }),
        };
        Ok(event)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BridgeEvent::Deposited(_) => DEPOSITED,
            BridgeEvent::Withdrawn(_) => WITHDRAWN,
            BridgeEvent::Opaque(e) => e.name,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            BridgeEvent::Deposited(_) => EventKind::Deposited,
            BridgeEvent::Withdrawn(_) => EventKind::Withdrawn,
            BridgeEvent::Opaque(_) => EventKind::Administrative,
        }
    }
}

impl fmt::Display for BridgeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeEvent::Deposited(e) => write!(
                f,
                "deposit {} (tax {}) from {} to {} nonce={} ts={}",
                e.amount, e.tax, e.depositor, e.recipient_external_address, e.nonce, e.timestamp
            ),
            BridgeEvent::Withdrawn(e) => write!(
                f,
                "withdrawal {} to {} ts={}",
                e.amount, e.recipient, e.timestamp
            ),
            BridgeEvent::Opaque(e) => write!(f, "{} ({} fields)", e.name, e.fields.len()),
        }
    }
}

/// Which events a consumer wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventFilter {
    Deposits,
    Withdrawals,
    #[default]
    All,
}

impl EventFilter {
    pub fn matches(&self, event: &BridgeEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Deposits => event.kind() == EventKind::Deposited,
            EventFilter::Withdrawals => event.kind() == EventKind::Withdrawn,
        }
    }
}

impl std::str::FromStr for EventFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposits" | "deposit" => Ok(EventFilter::Deposits),
            "withdrawals" | "withdrawal" => Ok(EventFilter::Withdrawals),
            "all" => Ok(EventFilter::All),
            other => Err(format!("unknown event filter: {other}")),
        }
    }
}

/// A decoded event with where and when it was seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedEvent {
    pub event: BridgeEvent,
    pub signature: String,
    /// Milliseconds since the Unix epoch
    pub received_at_ms: i64,
}
