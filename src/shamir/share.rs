use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SharingError};

/// Most shares a single split may produce.
pub const MAX_SHARES: u32 = 255;

/// Longest share value accepted, enough for fields up to 512 bits.
pub const MAX_SHARE_VALUE_LEN: usize = 64;

/// A single point `(index, f(index))` on the sharing polynomial.
///
/// On the wire the value is base64: `{"index": 1, "value": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireShare", into = "WireShare")]
pub struct Share {
    index: u32,
    value: Vec<u8>,
}

impl Share {
    /// Create a share, rejecting index 0 and empty or oversized values.
    pub fn new(index: u32, value: Vec<u8>) -> Result<Self> {
        if index == 0 {
            return Err(SharingError::MalformedShare(
                "share index must be at least 1".into(),
            ));
        }
        if value.is_empty() || value.len() > MAX_SHARE_VALUE_LEN {
            return Err(SharingError::MalformedShare(format!(
                "share value must be 1 to {} bytes, got {}",
                MAX_SHARE_VALUE_LEN,
                value.len()
            )));
        }
        Ok(Self { index, value })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

#[derive(Serialize, Deserialize)]
struct WireShare {
    index: u32,
    value: String,
}

impl From<Share> for WireShare {
    fn from(share: Share) -> Self {
        Self {
            index: share.index,
            value: general_purpose::STANDARD.encode(&share.value),
        }
    }
}

impl TryFrom<WireShare> for Share {
    type Error = SharingError;

    fn try_from(wire: WireShare) -> Result<Self> {
        let value = general_purpose::STANDARD
            .decode(&wire.value)
            .map_err(|e| SharingError::Encoding(format!("share value is not base64: {}", e)))?;
        Share::new(wire.index, value)
    }
}

/// How many shares to produce and how many are needed to recover the secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireShareConfig", into = "WireShareConfig")]
pub struct ShareConfig {
    num_shares: u32,
    threshold: u32,
}

impl ShareConfig {
    /// Requires `1 <= threshold <= num_shares <= MAX_SHARES`.
    pub fn new(num_shares: u32, threshold: u32) -> Result<Self> {
        if num_shares > MAX_SHARES {
            return Err(SharingError::Config(format!(
                "number of shares ({}) cannot exceed {}",
                num_shares, MAX_SHARES
            )));
        }
        if threshold < 1 {
            return Err(SharingError::Config("threshold must be at least 1".into()));
        }
        if num_shares < threshold {
            return Err(SharingError::Config(format!(
                "number of shares ({}) cannot be less than threshold ({})",
                num_shares, threshold
            )));
        }
        Ok(Self {
            num_shares,
            threshold,
        })
    }

    pub fn num_shares(&self) -> u32 {
        self.num_shares
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireShareConfig {
    num_shares: u32,
    threshold: u32,
}

impl From<ShareConfig> for WireShareConfig {
    fn from(config: ShareConfig) -> Self {
        Self {
            num_shares: config.num_shares,
            threshold: config.threshold,
        }
    }
}

impl TryFrom<WireShareConfig> for ShareConfig {
    type Error = SharingError;

    fn try_from(wire: WireShareConfig) -> Result<Self> {
        ShareConfig::new(wire.num_shares, wire.threshold)
    }
}
