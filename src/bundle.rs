use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sharecrypt::{Envelope, Share, ShareConfig};
use std::fs;
use std::io::Read;
use std::path::Path;
use x25519_dalek::PublicKey;

/// Shares written by `split`, with the parameters they were made with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareBundle {
    pub config: ShareConfig,
    pub shares: Vec<Share>,
}

/// Input accepted by `combine`: a full bundle or a bare list of shares
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ShareInput {
    Bundle(ShareBundle),
    Shares(Vec<Share>),
}

impl ShareInput {
    pub fn threshold(&self) -> Option<u32> {
        match self {
            ShareInput::Bundle(bundle) => Some(bundle.config.threshold()),
            ShareInput::Shares(_) => None,
        }
    }

    pub fn shares(&self) -> &[Share] {
        match self {
            ShareInput::Bundle(bundle) => &bundle.shares,
            ShareInput::Shares(shares) => shares,
        }
    }
}

/// Envelopes produced by `seal`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealedBundle {
    pub created_at: DateTime<Utc>,
    /// Base64-encoded X25519 public key of the sealing session. Identifies the
    /// session only; its secret half is never written out.
    pub public_key: Option<String>,
    pub config: ShareConfig,
    pub envelopes: Vec<Envelope>,
}

impl SealedBundle {
    pub fn new(config: ShareConfig, public_key: Option<PublicKey>, envelopes: Vec<Envelope>) -> Self {
        Self {
            created_at: Utc::now(),
            public_key: public_key.map(|key| general_purpose::STANDARD.encode(key.as_bytes())),
            config,
            envelopes,
        }
    }
}

/// Read a share document from a file, or stdin when `path` is `None` or `-`
pub fn read_share_input(path: Option<&Path>) -> Result<ShareInput> {
    let contents = match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read shares from {}", path.display()))?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read shares from stdin")?;
            buffer
        }
    };

    serde_json::from_str(&contents).context("Failed to parse shares")
}
