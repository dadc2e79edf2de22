//! Static event schema table.
//!
//! One entry per event in the program's published interface. Discriminators
//! are the first 8 bytes of `sha256("event:<Name>")`. Supporting a new
//! program event means adding one entry here.

/// Wire type of a single field. All little-endian, no length prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    U8,
    U16,
    U64,
    I64,
    /// One byte, 0 or 1
    Bool,
    /// 32 raw bytes
    Pubkey,
    /// Fixed-size byte array
    Bytes(usize),
    /// Fixed-size array of another field type
    Array(&'static FieldType, usize),
    /// Nested struct, fields in declaration order
    Struct(&'static [FieldSpec]),
}

impl FieldType {
    /// Encoded width in bytes.
    pub fn width(&self) -> usize {
        match self {
            FieldType::U8 | FieldType::Bool => 1,
            FieldType::U16 => 2,
            FieldType::U64 | FieldType::I64 => 8,
            FieldType::Pubkey => 32,
            FieldType::Bytes(len) => *len,
            FieldType::Array(inner, len) => inner.width() * len,
            FieldType::Struct(fields) => fields.iter().map(|f| f.ty.width()).sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
}

const fn field(name: &'static str, ty: FieldType) -> FieldSpec {
    FieldSpec { name, ty }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSchema {
    pub name: &'static str,
    pub discriminator: [u8; 8],
    pub fields: &'static [FieldSpec],
}

impl EventSchema {
    /// Exact body length after the discriminator.
    pub fn body_len(&self) -> usize {
        self.fields.iter().map(|f| f.ty.width()).sum()
    }
}

pub const DEPOSITED: &str = "USDCDeposited";
pub const WITHDRAWN: &str = "USDCWithdrawn";

pub static EVENT_SCHEMAS: &[EventSchema] = &[
    EventSchema {
        name: "FeesWithdrawn",
        discriminator: [234, 15, 0, 119, 148, 241, 40, 21],
        fields: &[
            field("address", FieldType::Pubkey),
            field("recipient", FieldType::Pubkey),
            field("amount", FieldType::U64),
            field("timestamp", FieldType::I64),
        ],
    },
    EventSchema {
        name: "OwnerChanged",
        discriminator: [34, 223, 103, 225, 239, 231, 51, 53],
        fields: &[
            field("address", FieldType::Pubkey),
            field("new_owner", FieldType::Pubkey),
            field("timestamp", FieldType::I64),
        ],
    },
    EventSchema {
        name: "PoolCreated",
        discriminator: [202, 44, 41, 88, 104, 220, 157, 82],
        fields: &[
            field("address", FieldType::Pubkey),
            field("treasury", FieldType::Pubkey),
            field("tax", FieldType::U16),
            field("timestamp", FieldType::I64),
        ],
    },
    EventSchema {
        name: "PoolStateUpdated",
        discriminator: [231, 22, 226, 177, 26, 215, 227, 97],
        fields: &[
            field("address", FieldType::Pubkey),
            field("proposed_owner", FieldType::Pubkey),
            field("treasury", FieldType::Pubkey),
            field("tax", FieldType::U16),
            field("paused", FieldType::Bool),
            field("timestamp", FieldType::I64),
        ],
    },
    EventSchema {
        name: DEPOSITED,
        discriminator: [75, 200, 113, 3, 12, 197, 106, 215],
        fields: &[
            field("address", FieldType::Pubkey),
            field("depositor", FieldType::Pubkey),
            field("recipient_evm_address", FieldType::Bytes(20)),
            field("amount", FieldType::U64),
            field("tax", FieldType::U64),
            field("nonce", FieldType::U64),
            field("timestamp", FieldType::I64),
        ],
    },
    EventSchema {
        name: WITHDRAWN,
        discriminator: [58, 59, 209, 122, 222, 203, 160, 217],
        fields: &[
            field("address", FieldType::Pubkey),
            field("recipient", FieldType::Pubkey),
            field("amount", FieldType::U64),
            field("timestamp", FieldType::I64),
        ],
    },
    EventSchema {
        name: "ValidatorAdded",
        discriminator: [67, 26, 43, 25, 58, 219, 99, 48],
        fields: &[
            field("pool_state", FieldType::Pubkey),
            field("address", FieldType::Pubkey),
            field("required_validators", FieldType::U8),
            field("timestamp", FieldType::I64),
        ],
    },
    EventSchema {
        name: "ValidatorRemoved",
        discriminator: [133, 140, 80, 83, 7, 209, 70, 130],
        fields: &[
            field("pool_state", FieldType::Pubkey),
            field("address", FieldType::Pubkey),
            field("required_validators", FieldType::U8),
            field("timestamp", FieldType::I64),
        ],
    },
];

/// Look up the schema for an 8-byte discriminator.
pub fn schema_for(discriminator: &[u8; 8]) -> Option<&'static EventSchema> {
    EVENT_SCHEMAS
        .iter()
        .find(|schema| &schema.discriminator == discriminator)
}

/// Look up a schema by event name.
pub fn schema_named(name: &str) -> Option<&'static EventSchema> {
    EVENT_SCHEMAS.iter().find(|schema| schema.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    #[test]
    fn discriminators_match_event_names() {
        for schema in EVENT_SCHEMAS {
            let digest = Sha256::digest(format!("event:{}", schema.name).as_bytes());
            assert_eq!(&digest[..8], &schema.discriminator, "{}", schema.name);
        }
    }

    #[test]
    fn discriminators_are_unique() {
        for (i, a) in EVENT_SCHEMAS.iter().enumerate() {
            for b in &EVENT_SCHEMAS[i + 1..] {
                assert_ne!(a.discriminator, b.discriminator);
            }
        }
    }

    #[test]
    fn transfer_event_body_lengths() {
        assert_eq!(schema_named(DEPOSITED).unwrap().body_len(), 116);
        assert_eq!(schema_named(WITHDRAWN).unwrap().body_len(), 80);
        assert_eq!(schema_named("PoolStateUpdated").unwrap().body_len(), 32 * 3 + 2 + 1 + 8);
    }

    #[test]
    fn nested_widths() {
        static INNER: FieldType = FieldType::Bytes(32);
        static PAIR: &[FieldSpec] = &[field("a", FieldType::U16), field("b", FieldType::Bool)];
        assert_eq!(FieldType::Array(&INNER, 16).width(), 512);
        assert_eq!(FieldType::Struct(PAIR).width(), 3);
    }

    #[test]
    fn lookup_unknown_is_none() {
        assert!(schema_for(&[0u8; 8]).is_none());
        assert_eq!(
            schema_for(&[58, 59, 209, 122, 222, 203, 160, 217]).map(|s| s.name),
            Some(WITHDRAWN)
        );
    }
}
