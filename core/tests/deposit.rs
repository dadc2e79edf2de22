mod common;

use common::MockLedger;
use solana_sdk::pubkey::Pubkey;
use stable_bridge_core::instruction::discriminator;
use stable_bridge_core::pda::{ASSOCIATED_TOKEN_PROGRAM_ID, custody_address};
use stable_bridge_core::{BridgeContext, BridgeError};

fn ctx() -> BridgeContext {
    BridgeContext::new(Pubkey::new_unique(), Pubkey::new_unique())
}

#[tokio::test]
async fn creates_pool_custody_when_missing() {
    let ctx = ctx();
    let ledger = MockLedger::new();

    let sig = ctx.deposit(&ledger, 1_000_000, &[0xaa; 20]).await.unwrap();
    assert_eq!(sig, "sig1");

    let submitted = ledger.submissions();
    assert_eq!(submitted.len(), 1);
    let ixs = &submitted[0];
    assert_eq!(ixs.len(), 2);

    let create = &ixs[0];
    assert_eq!(create.program_id, ASSOCIATED_TOKEN_PROGRAM_ID);
    assert_eq!(create.accounts[0].pubkey, ledger.payer);
    assert_eq!(create.accounts[1].pubkey, ctx.pool_custody);
    assert_eq!(create.accounts[2].pubkey, ctx.pool_state);

    let deposit = &ixs[1];
    assert_eq!(deposit.program_id, ctx.program_id);
    assert_eq!(&deposit.data[..8], &discriminator::DEPOSIT_USDC);
    assert_eq!(
        deposit.accounts[3].pubkey,
        custody_address(&ledger.payer, &ctx.mint)
    );
}

#[tokio::test]
async fn skips_creation_when_pool_custody_exists() {
    let ctx = ctx();
    let ledger = MockLedger::new().with_account(ctx.pool_custody, vec![0; 165]);

    ctx.deposit(&ledger, 5, &[0xaa; 20]).await.unwrap();

    let submitted = ledger.submissions();
    assert_eq!(submitted[0].len(), 1);
    assert_eq!(&submitted[0][0].data[..8], &discriminator::DEPOSIT_USDC);
}

#[tokio::test]
async fn rejects_bad_external_address_before_any_ledger_call() {
    let ctx = ctx();
    let ledger = MockLedger::new();

    for len in [0usize, 19, 21, 32] {
        let err = ctx.deposit(&ledger, 1, &vec![1u8; len]).await.unwrap_err();
        assert!(
            matches!(
                err,
                BridgeError::InvalidInputLength { expected: 20, actual, .. } if actual == len
            ),
            "{len}: {err}"
        );
    }
    assert_eq!(ledger.call_count(), 0);
    assert!(ledger.submissions().is_empty());
}

#[tokio::test]
async fn ledger_failure_is_external() {
    let ctx = ctx();
    let ledger = MockLedger::offline();

    let err = ctx.deposit(&ledger, 1, &[0xaa; 20]).await.unwrap_err();
    assert!(matches!(err, BridgeError::ExternalFailure(_)));
    assert!(err.to_string().contains("rpc unavailable"));
}

#[test]
fn deposit_instructions_are_pure() {
    let ctx = ctx();
    let depositor = Pubkey::new_unique();
    let a = ctx.deposit_instructions(&depositor, 10, &[1; 20], false).unwrap();
    let b = ctx.deposit_instructions(&depositor, 10, &[1; 20], false).unwrap();
    assert_eq!(a, b);
    assert_eq!(ctx.deposit_instructions(&depositor, 10, &[1; 20], true).unwrap().len(), 1);
}
