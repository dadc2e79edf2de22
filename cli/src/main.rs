mod commands;
mod sigs;

use std::env;

use stable_bridge_config::BridgeConfig;

#[tokio::main]
async fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let cmd = args[1].as_str();
    let rest = &args[2..];

    if matches!(cmd, "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    let config = match BridgeConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error loading config: {e:#}");
            std::process::exit(1);
        }
    };

    let result = match cmd {
        "status" => commands::status(&config).await,
        "validators" => commands::validators(&config).await,
        "tax" => match rest.first() {
            Some(amount) => commands::tax(&config, amount).await,
            None => usage_error("tax <amount>"),
        },
        "deposit" => match rest {
            [amount, recipient] => commands::deposit(&config, amount, recipient).await,
            _ => usage_error("deposit <amount> <0xrecipient>"),
        },
        "withdraw" => match rest {
            [amount, sender, recipient, nonce, sigs_file] => {
                commands::withdraw(&config, amount, sender, recipient, nonce, sigs_file).await
            }
            _ => usage_error("withdraw <amount> <0xsender> <recipient> <nonce-hex> <sigs-file>"),
        },
        "message-hash" => match rest {
            [nonce, amount, sender, recipient] => {
                commands::message_hash(nonce, amount, sender, recipient)
            }
            _ => usage_error("message-hash <nonce-hex> <amount> <0xsender> <recipient>"),
        },
        "events" => commands::events(&config, rest.first().map(String::as_str)).await,
        "watch" => commands::watch(&config, rest.first().map(String::as_str)).await,
        "config" => commands::show_config(&config, rest.first().map(String::as_str)),
        _ => {
            println!("❌ Unknown command: {cmd}");
            println!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {e:#}");
        std::process::exit(1);
    }
}

fn usage_error(usage: &str) -> anyhow::Result<()> {
    anyhow::bail!("usage: stable-bridge {usage}")
}

fn print_usage() {
    println!("Stable Bridge CLI - Solana side of the USDC bridge");
    println!();
    println!("USAGE:");
    println!("  stable-bridge <command> [args]");
    println!();
    println!("QUERY COMMANDS:");
    println!("  status                     Pool state and statistics");
    println!("  validators                 Configured validator keys");
    println!("  tax <amount>               Tax on an amount at the live rate");
    println!("  events [limit]             Recent bridge events");
    println!("  watch [deposits|withdrawals|all]");
    println!("                             Stream live bridge events");
    println!();
    println!("TRANSFER COMMANDS:");
    println!("  deposit <amount> <0xrecipient>");
    println!("                             Lock tokens for an EVM recipient");
    println!("  withdraw <amount> <0xsender> <recipient> <nonce-hex> <sigs-file>");
    println!("                             Release tokens with validator signatures");
    println!("  message-hash <nonce-hex> <amount> <0xsender> <recipient>");
    println!("                             Print the hash validators sign");
    println!();
    println!("OTHER COMMANDS:");
    println!("  config [sample]            Show effective or sample configuration");
    println!("  help                       Show this help message");
    println!();
    println!("ENVIRONMENT VARIABLES:");
    println!("  SB_CONFIG            Config file path");
    println!("  SOLANA_RPC_URL       Solana RPC endpoint");
    println!("  SOLANA_WS_URL        Solana websocket endpoint");
    println!("  SB_PROGRAM_ID        Bridge program id");
    println!("  SB_MINT              Bridged token mint");
    println!("  SB_KEYPAIR           Payer keypair file");
    println!("  SB_COMMITMENT        processed/confirmed/finalized");
    println!("  SB_HISTORY_LIMIT     Default limit for `events`");
    println!("  RUST_LOG             Log level (debug/info/warn/error)");
}
