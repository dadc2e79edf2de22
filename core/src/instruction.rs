//! Bridge program instruction encoders.
//!
//! Instruction data is the 8-byte discriminator followed by the Borsh
//! encoded arguments. Account order follows the program's interface.

use borsh::BorshSerialize;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use stable_bridge_attestation::{MAX_VALIDATORS, PackedSignatures};
use stable_bridge_codec::ExternalAddress;

use crate::BridgeError;
use crate::context::BridgeContext;
use crate::pda::{ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_PROGRAM_ID};

pub mod discriminator {
    pub const ACCEPT_OWNERSHIP: [u8; 8] = [172, 23, 43, 13, 238, 213, 85, 150];
    pub const ADD_VALIDATOR: [u8; 8] = [250, 113, 53, 54, 141, 117, 215, 185];
    pub const DEPOSIT_USDC: [u8; 8] = [184, 148, 250, 169, 224, 213, 34, 126];
    pub const INITIALIZE: [u8; 8] = [175, 175, 109, 31, 13, 152, 155, 237];
    pub const REMOVE_VALIDATOR: [u8; 8] = [25, 96, 211, 155, 161, 14, 168, 188];
    pub const UPDATE_STATE: [u8; 8] = [135, 112, 215, 75, 247, 185, 53, 176];
    pub const WITHDRAW_FEES: [u8; 8] = [198, 212, 171, 109, 144, 215, 174, 89];
    pub const WITHDRAW_USDC: [u8; 8] = [114, 49, 72, 184, 27, 156, 243, 155];
}

#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct DepositArgs {
    pub amount: u64,
    pub recipient_evm_address: [u8; 20],
}

#[derive(BorshSerialize, Debug, Clone, PartialEq, Eq)]
pub struct WithdrawArgs {
    pub amount: u64,
    pub sender_evm_address: [u8; 20],
    pub nonce: [u8; 32],
    pub r: [[u8; 32]; MAX_VALIDATORS],
    pub s: [[u8; 32]; MAX_VALIDATORS],
    pub v: [u8; MAX_VALIDATORS],
}

impl WithdrawArgs {
    pub fn new(amount: u64, sender: [u8; 20], nonce: [u8; 32], sigs: &PackedSignatures) -> Self {
        Self {
            amount,
            sender_evm_address: sender,
            nonce,
            r: sigs.r,
            s: sigs.s,
            v: sigs.v,
        }
    }
}

/// Partial pool configuration update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub treasury: Option<Pubkey>,
    pub owner: Option<Pubkey>,
    pub tax: Option<u16>,
    pub paused: Option<bool>,
}

#[derive(BorshSerialize)]
struct ConfigUpdateArgs {
    treasury: Option<[u8; 32]>,
    owner: Option<[u8; 32]>,
    tax: Option<u16>,
    paused: Option<bool>,
}

impl From<&ConfigUpdate> for ConfigUpdateArgs {
    fn from(u: &ConfigUpdate) -> Self {
        Self {
            treasury: u.treasury.map(|pk| pk.to_bytes()),
            owner: u.owner.map(|pk| pk.to_bytes()),
            tax: u.tax,
            paused: u.paused,
        }
    }
}

fn data_with(discriminator: [u8; 8], args: &impl BorshSerialize) -> Result<Vec<u8>, BridgeError> {
    let mut data = discriminator.to_vec();
    args.serialize(&mut data)
        .map_err(|e| anyhow::Error::new(e).context("encoding instruction arguments"))?;
    Ok(data)
}

fn token_program_accounts() -> [AccountMeta; 3] {
    [
        AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
        AccountMeta::new_readonly(ASSOCIATED_TOKEN_PROGRAM_ID, false),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
    ]
}

pub fn deposit_usdc(
    ctx: &BridgeContext,
    depositor: &Pubkey,
    amount: u64,
    recipient: &ExternalAddress,
) -> Result<Instruction, BridgeError> {
    let args = DepositArgs {
        amount,
        recipient_evm_address: recipient.0,
    };
    let mut accounts = vec![
        AccountMeta::new(*depositor, true),
        AccountMeta::new(ctx.pool_state, false),
        AccountMeta::new(ctx.mint, false),
        AccountMeta::new(ctx.custody_of(depositor), false),
        AccountMeta::new(ctx.pool_custody, false),
    ];
    accounts.extend(token_program_accounts());

    Ok(Instruction {
        program_id: ctx.program_id,
        accounts,
        data: data_with(discriminator::DEPOSIT_USDC, &args)?,
    })
}

pub fn withdraw_usdc(
    ctx: &BridgeContext,
    payer: &Pubkey,
    recipient: &Pubkey,
    args: &WithdrawArgs,
) -> Result<Instruction, BridgeError> {
    let mut accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new(ctx.pool_state, false),
        AccountMeta::new(ctx.mint, false),
        AccountMeta::new(ctx.custody_of(recipient), false),
        // the program marks pool_ata read-only here
        AccountMeta::new_readonly(ctx.pool_custody, false),
    ];
    accounts.extend(token_program_accounts());

    Ok(Instruction {
        program_id: ctx.program_id,
        accounts,
        data: data_with(discriminator::WITHDRAW_USDC, &(recipient.to_bytes(), args))?,
    })
}

pub fn initialize(
    ctx: &BridgeContext,
    owner: &Pubkey,
    treasury: &Pubkey,
    tax: u16,
) -> Result<Instruction, BridgeError> {
    Ok(Instruction {
        program_id: ctx.program_id,
        accounts: vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new(ctx.pool_state, false),
            AccountMeta::new_readonly(*treasury, false),
            AccountMeta::new_readonly(ctx.mint, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ],
        data: data_with(discriminator::INITIALIZE, &tax)?,
    })
}

pub fn update_state(
    ctx: &BridgeContext,
    owner: &Pubkey,
    update: &ConfigUpdate,
) -> Result<Instruction, BridgeError> {
    Ok(Instruction {
        program_id: ctx.program_id,
        accounts: owner_accounts(ctx, owner, None),
        data: data_with(discriminator::UPDATE_STATE, &ConfigUpdateArgs::from(update))?,
    })
}

pub fn add_validator(ctx: &BridgeContext, owner: &Pubkey, validator: &Pubkey) -> Instruction {
    Instruction {
        program_id: ctx.program_id,
        accounts: owner_accounts(ctx, owner, Some(validator)),
        data: discriminator::ADD_VALIDATOR.to_vec(),
    }
}

pub fn remove_validator(ctx: &BridgeContext, owner: &Pubkey, validator: &Pubkey) -> Instruction {
    Instruction {
        program_id: ctx.program_id,
        accounts: owner_accounts(ctx, owner, Some(validator)),
        data: discriminator::REMOVE_VALIDATOR.to_vec(),
    }
}

/// Signed by the proposed owner.
pub fn accept_ownership(ctx: &BridgeContext, signer: &Pubkey) -> Instruction {
    Instruction {
        program_id: ctx.program_id,
        accounts: owner_accounts(ctx, signer, None),
        data: discriminator::ACCEPT_OWNERSHIP.to_vec(),
    }
}

pub fn withdraw_fees(ctx: &BridgeContext, owner: &Pubkey, treasury: &Pubkey) -> Instruction {
    let mut accounts = vec![
        AccountMeta::new(*owner, true),
        AccountMeta::new(ctx.pool_state, false),
        AccountMeta::new_readonly(*treasury, false),
        AccountMeta::new(ctx.mint, false),
        AccountMeta::new(ctx.custody_of(treasury), false),
        AccountMeta::new_readonly(ctx.pool_custody, false),
    ];
    accounts.extend(token_program_accounts());

    Instruction {
        program_id: ctx.program_id,
        accounts,
        data: discriminator::WITHDRAW_FEES.to_vec(),
    }
}

/// signer, pool state, optional subject account, system program
fn owner_accounts(
    ctx: &BridgeContext,
    signer: &Pubkey,
    subject: Option<&Pubkey>,
) -> Vec<AccountMeta> {
    let mut accounts = vec![
        AccountMeta::new(*signer, true),
        AccountMeta::new(ctx.pool_state, false),
    ];
    if let Some(subject) = subject {
        accounts.push(AccountMeta::new_readonly(*subject, false));
    }
    accounts.push(AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false));
    accounts
}
