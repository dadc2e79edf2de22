use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use num_bigint::BigUint;
use solana_sdk::pubkey::Pubkey;
use stable_bridge_events::{
    BridgeEvent, EventDecoder, EventError, EventFilter, EventKind, FieldValue,
};

const DEPOSITED_DISC: [u8; 8] = [75, 200, 113, 3, 12, 197, 106, 215];
const WITHDRAWN_DISC: [u8; 8] = [58, 59, 209, 122, 222, 203, 160, 217];
const OWNER_CHANGED_DISC: [u8; 8] = [34, 223, 103, 225, 239, 231, 51, 53];

fn program() -> Pubkey {
    Pubkey::new_from_array([42u8; 32])
}

fn data(disc: [u8; 8], body: &[u8]) -> String {
    let mut raw = disc.to_vec();
    raw.extend_from_slice(body);
    format!("Program data: {}", STANDARD.encode(raw))
}

fn deposited_body(amount: u64, tax: u64, nonce: u64) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&[1u8; 32]);
    body.extend_from_slice(&[2u8; 32]);
    body.extend_from_slice(&[0xab; 20]);
    body.extend_from_slice(&amount.to_le_bytes());
    body.extend_from_slice(&tax.to_le_bytes());
    body.extend_from_slice(&nonce.to_le_bytes());
    body.extend_from_slice(&1_700_000_000i64.to_le_bytes());
    body
}

fn withdrawn_body(amount: u64) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&[3u8; 32]);
    body.extend_from_slice(&[4u8; 32]);
    body.extend_from_slice(&amount.to_le_bytes());
    body.extend_from_slice(&1_700_000_001i64.to_le_bytes());
    body
}

fn wrap(id: &Pubkey, lines: Vec<String>) -> Vec<String> {
    let mut logs = vec![format!("Program {id} invoke [1]")];
    logs.extend(lines);
    logs.push(format!("Program {id} success"));
    logs
}

#[test]
fn mixed_batch_isolates_malformed_and_skips_unknown() {
    let id = program();
    let logs = wrap(
        &id,
        vec![
            "Program log: Instruction: DepositUsdc".to_string(),
            data(DEPOSITED_DISC, &deposited_body(1_000_000, 5_000, 7)),
            // truncated deposit
            data(DEPOSITED_DISC, &deposited_body(10, 0, 8)[..100]),
            data([9u8; 8], &[0u8; 16]),
            data(WITHDRAWN_DISC, &withdrawn_body(995_000)),
        ],
    );

    let decoded = EventDecoder::new(&id).decode_logs(&logs);

    assert_eq!(decoded.events.len(), 2);
    assert_eq!(decoded.failures.len(), 1);
    assert_eq!(decoded.failures[0].line, 3);
    assert!(matches!(
        decoded.failures[0].error,
        EventError::MalformedEvent { event: "USDCDeposited", .. }
    ));

    let BridgeEvent::Deposited(dep) = &decoded.events[0] else {
        panic!("expected deposit, got {:?}", decoded.events[0]);
    };
    assert_eq!(dep.amount, BigUint::from(1_000_000u64));
    assert_eq!(dep.tax, BigUint::from(5_000u64));
    assert_eq!(dep.nonce, BigUint::from(7u64));
    assert_eq!(dep.depositor, Pubkey::new_from_array([2u8; 32]));
    assert_eq!(dep.recipient_external_address, format!("0x{}", "ab".repeat(20)));
    assert_eq!(dep.timestamp, 1_700_000_000);

    let BridgeEvent::Withdrawn(wd) = &decoded.events[1] else {
        panic!("expected withdrawal, got {:?}", decoded.events[1]);
    };
    assert_eq!(wd.amount, BigUint::from(995_000u64));
    assert_eq!(wd.recipient, Pubkey::new_from_array([4u8; 32]));
}

#[test]
fn cpi_log_text_does_not_hide_later_events() {
    let id = program();
    let token = Pubkey::new_from_array([8u8; 32]);
    let logs = vec![
        format!("Program {id} invoke [1]"),
        format!("Program {token} invoke [2]"),
        "Program log: success".to_string(),
        "Program log: invoke [1]".to_string(),
        "Program log: failed".to_string(),
        format!("Program {token} success"),
        data(WITHDRAWN_DISC, &withdrawn_body(42)),
        format!("Program {id} success"),
    ];

    let decoded = EventDecoder::new(&id).decode_logs(&logs);
    assert!(decoded.failures.is_empty());
    assert_eq!(decoded.events.len(), 1);
    let BridgeEvent::Withdrawn(wd) = &decoded.events[0] else {
        panic!("expected withdrawal, got {:?}", decoded.events[0]);
    };
    assert_eq!(wd.amount, BigUint::from(42u64));
}

#[test]
fn amounts_beyond_u32_survive() {
    let id = program();
    let logs = wrap(&id, vec![data(DEPOSITED_DISC, &deposited_body(u64::MAX, u64::MAX - 1, 0))]);
    let decoded = EventDecoder::new(&id).decode_logs(&logs);
    let BridgeEvent::Deposited(dep) = &decoded.events[0] else {
        panic!("expected deposit");
    };
    assert_eq!(dep.amount.to_string(), "18446744073709551615");
    assert_eq!(dep.tax, BigUint::from(u64::MAX - 1));
}

#[test]
fn administrative_events_are_opaque() {
    let id = program();
    let mut body = vec![5u8; 32];
    body.extend_from_slice(&[6u8; 32]);
    body.extend_from_slice(&12i64.to_le_bytes());
    let logs = wrap(&id, vec![data(OWNER_CHANGED_DISC, &body)]);

    let decoded = EventDecoder::new(&id).decode_logs(&logs);
    assert_eq!(decoded.events.len(), 1);
    let event = &decoded.events[0];
    assert_eq!(event.name(), "OwnerChanged");
    assert_eq!(event.kind(), EventKind::Administrative);
    let BridgeEvent::Opaque(opaque) = event else {
        panic!("expected opaque event");
    };
    assert_eq!(opaque.discriminator, OWNER_CHANGED_DISC);
    assert_eq!(opaque.body, body);
    assert_eq!(
        opaque.field("new_owner"),
        Some(&FieldValue::Pubkey(Pubkey::new_from_array([6u8; 32])))
    );
    assert_eq!(opaque.field("timestamp"), Some(&FieldValue::I64(12)));
}

#[test]
fn data_from_other_programs_is_ignored() {
    let id = program();
    let other = Pubkey::new_from_array([1u8; 32]);
    let logs = wrap(
        &other,
        vec![data(WITHDRAWN_DISC, &withdrawn_body(1))],
    );
    let decoded = EventDecoder::new(&id).decode_logs(&logs);
    assert!(decoded.events.is_empty());
    assert!(decoded.failures.is_empty());
}

#[test]
fn filters_select_by_kind() {
    let id = program();
    let logs = wrap(
        &id,
        vec![
            data(DEPOSITED_DISC, &deposited_body(1, 0, 1)),
            data(WITHDRAWN_DISC, &withdrawn_body(1)),
        ],
    );
    let events = EventDecoder::new(&id).decode_logs(&logs).events;

    let count = |filter: EventFilter| events.iter().filter(|e| filter.matches(e)).count();
    assert_eq!(count(EventFilter::All), 2);
    assert_eq!(count(EventFilter::Deposits), 1);
    assert_eq!(count(EventFilter::Withdrawals), 1);
    assert_eq!("withdrawals".parse::<EventFilter>(), Ok(EventFilter::Withdrawals));
    assert!("bogus".parse::<EventFilter>().is_err());
}
