use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use solana_sdk::pubkey::Pubkey;
use stable_bridge_codec::{ExternalAddress, hex_decode, hex_encode};
use stable_bridge_config::{BridgeConfig, ResolvedConfig};
use stable_bridge_core::{
    BridgeContext, EventFilter, EventListener, ReceivedEvent, RpcLedgerClient, WithdrawalRequest,
    message_hash as compute_message_hash,
};

use crate::sigs;

fn read_only(config: &BridgeConfig) -> Result<(ResolvedConfig, BridgeContext, RpcLedgerClient)> {
    let resolved = config.resolve()?;
    let ctx = BridgeContext::from_config(&resolved);
    let ledger =
        RpcLedgerClient::read_only(&resolved.rpc_url, &resolved.ws_url, resolved.commitment);
    Ok((resolved, ctx, ledger))
}

fn signing(config: &BridgeConfig) -> Result<(BridgeContext, RpcLedgerClient)> {
    let resolved = config.resolve()?;
    let ctx = BridgeContext::from_config(&resolved);
    let ledger = RpcLedgerClient::from_config(&resolved)?;
    Ok((ctx, ledger))
}

fn parse_amount(amount: &str) -> Result<u64> {
    amount
        .parse()
        .with_context(|| format!("Amount must be a whole number of base units: {amount}"))
}

fn parse_pubkey(key: &str) -> Result<Pubkey> {
    Pubkey::from_str(key).with_context(|| format!("Invalid Solana address: {key}"))
}

pub async fn status(config: &BridgeConfig) -> Result<()> {
    let (_, ctx, ledger) = read_only(config)?;
    let state = ctx.pool_state(&ledger).await?;

    println!("Program:              {}", ctx.program_id);
    println!("Pool state:           {}", ctx.pool_state);
    println!("Pool custody:         {}", ctx.pool_custody);
    println!("Owner:                {}", state.owner);
    println!("Mint:                 {}", state.mint);
    println!("Treasury:             {}", state.treasury);
    println!("Paused:               {}", state.paused);
    println!("Tax:                  {} bps", state.tax);
    println!(
        "Validators:           {} (required {})",
        state.validators().len(),
        state.required_signatures
    );
    let stats = state.statistics();
    println!("Total volume:         {}", stats.total_volume);
    println!("Accumulated fees:     {}", stats.accumulated_fees);
    if !state.is_consistent() {
        println!("⚠️  Pool state violates its own invariants");
    }
    Ok(())
}

pub async fn validators(config: &BridgeConfig) -> Result<()> {
    let (_, ctx, ledger) = read_only(config)?;
    let state = ctx.pool_state(&ledger).await?;
    for (i, validator) in state.validators().iter().enumerate() {
        println!("{i:>2}  {validator}");
    }
    println!("required signatures: {}", state.required_signatures);
    Ok(())
}

pub async fn tax(config: &BridgeConfig, amount: &str) -> Result<()> {
    let amount = parse_amount(amount)?;
    let (_, ctx, ledger) = read_only(config)?;
    let bps = ctx.tax_bps(&ledger).await?;
    let tax = stable_bridge_core::calculate_tax(amount, bps);
    println!("{tax} ({bps} bps of {amount}, {} after tax)", amount.saturating_sub(tax));
    Ok(())
}

pub async fn deposit(config: &BridgeConfig, amount: &str, recipient: &str) -> Result<()> {
    let amount = parse_amount(amount)?;
    let recipient = ExternalAddress::from_str(recipient)?;
    let (ctx, ledger) = signing(config)?;

    let signature = ctx.deposit(&ledger, amount, recipient.as_ref()).await?;
    println!("✅ Deposit submitted: {signature}");
    Ok(())
}

pub async fn withdraw(
    config: &BridgeConfig,
    amount: &str,
    sender: &str,
    recipient: &str,
    nonce: &str,
    sigs_file: &str,
) -> Result<()> {
    let request = WithdrawalRequest {
        amount: parse_amount(amount)?,
        sender: ExternalAddress::from_str(sender)?.as_ref().to_vec(),
        nonce: hex_decode(nonce)?,
        recipient: parse_pubkey(recipient)?,
        signatures: sigs::load(Path::new(sigs_file))?,
    };
    let (ctx, ledger) = signing(config)?;

    let signature = ctx.withdraw(&ledger, &request).await?;
    println!("✅ Withdrawal submitted: {signature}");
    Ok(())
}

pub fn message_hash(nonce: &str, amount: &str, sender: &str, recipient: &str) -> Result<()> {
    let nonce = hex_decode(nonce)?;
    let amount = parse_amount(amount)?;
    let sender = ExternalAddress::from_str(sender)?;
    let recipient = parse_pubkey(recipient)?;

    let hash = compute_message_hash(&nonce, amount, sender.as_ref(), recipient.as_ref())?;
    println!("0x{}", hex_encode(&hash));
    Ok(())
}

fn print_event(received: &ReceivedEvent) {
    println!(
        "[{}] {} {}",
        received.received_at_ms, received.signature, received.event
    );
}

pub async fn events(config: &BridgeConfig, limit: Option<&str>) -> Result<()> {
    let (resolved, ctx, ledger) = read_only(config)?;
    let limit = match limit {
        Some(l) => l.parse().with_context(|| format!("Invalid limit: {l}"))?,
        None => resolved.history_limit,
    };

    let events = EventListener::new(&ctx)
        .recent_events(&ledger, limit, EventFilter::All)
        .await?;
    if events.is_empty() {
        println!("No bridge events in the last {limit} transactions");
    }
    events.iter().for_each(print_event);
    Ok(())
}

pub async fn watch(config: &BridgeConfig, filter: Option<&str>) -> Result<()> {
    let filter = match filter {
        Some(f) => EventFilter::from_str(f).map_err(|e| anyhow!(e))?,
        None => EventFilter::All,
    };
    let (_, ctx, ledger) = read_only(config)?;

    let mut subscription = EventListener::new(&ctx)
        .subscribe(&ledger, filter, |event| print_event(&event))
        .await?;
    println!("Watching bridge events ({filter:?}), Ctrl-C to stop");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            diagnostic = subscription.diagnostics().recv() => match diagnostic {
                Some(d) => eprintln!("⚠️  {}: {}", d.signature, d.failure.error),
                None => break,
            },
        }
    }

    subscription.unsubscribe();
    subscription.closed().await;
    Ok(())
}

pub fn show_config(config: &BridgeConfig, which: Option<&str>) -> Result<()> {
    match which {
        Some("sample") => print!("{}", BridgeConfig::generate_sample()),
        None => print!("{}", toml::to_string_pretty(config)?),
        Some(other) => anyhow::bail!("unknown config view: {other}"),
    }
    Ok(())
}
