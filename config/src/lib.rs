//! Stable Bridge Configuration
//!
//! Handles loading configuration from:
//! 1. SB_CONFIG env var (explicit path)
//! 2. ./bridge.toml (current directory)
//! 3. ~/.stable-bridge/config.toml (user home)
//!
//! Environment variables take precedence over TOML config. The loaded value
//! is passed explicitly to whoever needs it.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use solana_commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, fs};

const CONFIG_FILE_NAME: &str = "bridge.toml";
const HOME_CONFIG_FILE_NAME: &str = "config.toml";
const CONFIG_DIR_NAME: &str = ".stable-bridge";

// ============================================================================
// Default Constants
// ============================================================================

const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
const DEFAULT_WS_URL: &str = "wss://api.devnet.solana.com/";
const DEFAULT_COMMITMENT: &str = "confirmed";
const DEFAULT_BRIDGE_PROGRAM: &str = "qbuMdeYxYJXBjU6C6qFKjZKjXmrU83eDQomHdrch826";
const DEFAULT_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
const DEFAULT_KEYPAIR_PATH: &str = "~/.config/solana/id.json";
const DEFAULT_HISTORY_LIMIT: usize = 10;

// ============================================================================
// Config Structs
// ============================================================================

/// Root configuration structure (matches TOML layout)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub solana: SolanaConfig,
    #[serde(default)]
    pub bridge: ProgramConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
    #[serde(default)]
    pub events: EventsConfig,
}

/// Solana connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolanaConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// processed | confirmed | finalized
    #[serde(default = "default_commitment")]
    pub commitment: String,
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.into(),
            ws_url: DEFAULT_WS_URL.into(),
            commitment: DEFAULT_COMMITMENT.into(),
        }
    }
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.into()
}
fn default_ws_url() -> String {
    DEFAULT_WS_URL.into()
}
fn default_commitment() -> String {
    DEFAULT_COMMITMENT.into()
}

/// Bridge program identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramConfig {
    #[serde(default = "default_bridge_program")]
    pub program_id: String,
    #[serde(default = "default_mint")]
    pub mint: String,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            program_id: DEFAULT_BRIDGE_PROGRAM.into(),
            mint: DEFAULT_MINT.into(),
        }
    }
}

fn default_bridge_program() -> String {
    DEFAULT_BRIDGE_PROGRAM.into()
}
fn default_mint() -> String {
    DEFAULT_MINT.into()
}

/// Signing wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    #[serde(default = "default_keypair_path")]
    pub keypair_path: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            keypair_path: DEFAULT_KEYPAIR_PATH.into(),
        }
    }
}

fn default_keypair_path() -> String {
    DEFAULT_KEYPAIR_PATH.into()
}

/// Historical event retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventsConfig {
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

/// Config with ids parsed and paths expanded, ready to hand to a client.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub rpc_url: String,
    pub ws_url: String,
    pub commitment: CommitmentConfig,
    pub program_id: Pubkey,
    pub mint: Pubkey,
    pub keypair_path: PathBuf,
    pub history_limit: usize,
}

// ============================================================================
// Environment Variable Helpers
// ============================================================================

/// Set field from a lookup if present
fn override_string(lookup: &impl Fn(&str) -> Option<String>, key: &str, field: &mut String) {
    if let Some(v) = lookup(key) {
        *field = v;
    }
}

/// Set field from a lookup if present and parseable
fn override_parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, field: &mut T) {
    if let Some(v) = lookup(key) {
        match v.parse() {
            Ok(parsed) => *field = parsed,
            Err(_) => log::warn!("ignoring unparseable {key}={v}"),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|h| h.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

fn parse_commitment(level: &str) -> Result<CommitmentConfig> {
    Ok(match level.to_ascii_lowercase().as_str() {
        "processed" => CommitmentConfig::processed(),
        "confirmed" => CommitmentConfig::confirmed(),
        "finalized" => CommitmentConfig::finalized(),
        other => bail!("unknown commitment level: {other}"),
    })
}

// ============================================================================
// Implementation
// ============================================================================

impl BridgeConfig {
    /// Load configuration from config file with env var overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => {
                log::info!("Loading config from: {}", path.display());
                Self::read(&path)?
            }
            None => {
                log::info!("No config file found, using defaults and environment variables");
                Self::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Find the config file path
    fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = env::var("SB_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
            log::warn!("SB_CONFIG points at missing file: {}", path.display());
        }

        let local_path = PathBuf::from(CONFIG_FILE_NAME);
        if local_path.exists() {
            return Some(local_path);
        }

        Self::default_config_path().filter(|p| p.exists())
    }

    /// Apply process environment overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Solana
        override_string(&lookup, "SOLANA_RPC_URL", &mut self.solana.rpc_url);
        override_string(&lookup, "SOLANA_WS_URL", &mut self.solana.ws_url);
        override_string(&lookup, "SB_COMMITMENT", &mut self.solana.commitment);

        // Bridge
        override_string(&lookup, "SB_PROGRAM_ID", &mut self.bridge.program_id);
        override_string(&lookup, "SB_MINT", &mut self.bridge.mint);

        // Wallet
        override_string(&lookup, "SB_KEYPAIR", &mut self.wallet.keypair_path);

        // Events
        override_parse(&lookup, "SB_HISTORY_LIMIT", &mut self.events.history_limit);
    }

    /// Parse ids and expand paths.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let program_id = Pubkey::from_str(&self.bridge.program_id)
            .with_context(|| format!("Invalid bridge.program_id: {}", self.bridge.program_id))?;
        let mint = Pubkey::from_str(&self.bridge.mint)
            .with_context(|| format!("Invalid bridge.mint: {}", self.bridge.mint))?;
        let commitment = parse_commitment(&self.solana.commitment)?;

        Ok(ResolvedConfig {
            rpc_url: self.solana.rpc_url.clone(),
            ws_url: self.solana.ws_url.clone(),
            commitment,
            program_id,
            mint,
            keypair_path: expand_home(&self.wallet.keypair_path),
            history_limit: self.events.history_limit,
        })
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CONFIG_DIR_NAME).join(HOME_CONFIG_FILE_NAME))
    }

    /// Generate a sample config file
    pub fn generate_sample() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.solana.rpc_url, DEFAULT_RPC_URL);
        assert_eq!(config.bridge.program_id, DEFAULT_BRIDGE_PROGRAM);
        assert_eq!(config.events.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_generate_sample() {
        let sample = BridgeConfig::generate_sample();
        assert!(sample.contains("[solana]"));
        assert!(sample.contains("[bridge]"));
        assert!(sample.contains("[wallet]"));
        assert!(sample.contains("[events]"));
    }

    #[test]
    fn test_parse_sample() {
        let sample = BridgeConfig::generate_sample();
        let parsed: BridgeConfig = toml::from_str(&sample).unwrap();
        assert_eq!(parsed, BridgeConfig::default());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let env: HashMap<&str, &str> = [
            ("SOLANA_RPC_URL", "http://127.0.0.1:8899"),
            ("SB_COMMITMENT", "finalized"),
            ("SB_HISTORY_LIMIT", "25"),
        ]
        .into_iter()
        .collect();

        let mut config = BridgeConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.solana.rpc_url, "http://127.0.0.1:8899");
        assert_eq!(config.solana.commitment, "finalized");
        assert_eq!(config.events.history_limit, 25);
        assert_eq!(config.solana.ws_url, DEFAULT_WS_URL);
    }

    #[test]
    fn test_unparseable_override_is_ignored() {
        let mut config = BridgeConfig::default();
        config.apply_overrides(|k| (k == "SB_HISTORY_LIMIT").then(|| "lots".to_string()));
        assert_eq!(config.events.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_resolve_defaults() {
        let resolved = BridgeConfig::default().resolve().unwrap();
        assert_eq!(resolved.program_id.to_string(), DEFAULT_BRIDGE_PROGRAM);
        assert_eq!(resolved.mint.to_string(), DEFAULT_MINT);
        assert_eq!(resolved.commitment, CommitmentConfig::confirmed());
        assert!(!resolved.keypair_path.starts_with("~"));
    }

    #[test]
    fn test_resolve_rejects_bad_values() {
        let mut config = BridgeConfig::default();
        config.bridge.program_id = "not-a-key".into();
        assert!(config.resolve().is_err());

        let mut config = BridgeConfig::default();
        config.solana.commitment = "eventually".into();
        assert!(config.resolve().is_err());
    }
}
