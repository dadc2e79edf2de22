//! Validator signature files.
//!
//! ```json
//! { "r": ["0x…", …], "s": ["0x…", …], "v": [27, 28, …] }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use stable_bridge_attestation::{SignatureComponents, SignatureTriple};
use stable_bridge_codec::hex_decode;

#[derive(Debug, Deserialize)]
struct SignatureFile {
    r: Vec<String>,
    s: Vec<String>,
    v: Vec<u8>,
}

pub fn parse(json: &str) -> Result<Vec<SignatureTriple>> {
    let file: SignatureFile = serde_json::from_str(json).context("Invalid signature file")?;
    let decode = |items: &[String]| -> Result<Vec<Vec<u8>>> {
        items
            .iter()
            .map(|h| hex_decode(h).map_err(anyhow::Error::from))
            .collect()
    };
    let components = SignatureComponents {
        r: decode(&file.r)?,
        s: decode(&file.s)?,
        v: file.v,
    };
    Ok(components.triples()?)
}

pub fn load(path: &Path) -> Result<Vec<SignatureTriple>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read signature file: {}", path.display()))?;
    parse(&json)
}
