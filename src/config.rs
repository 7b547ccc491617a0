use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sharecrypt::ShareConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for the sharecrypt CLI
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Number of shares to create (default: 5)
    pub default_shares: u32,
    /// Threshold required to recover secret (default: 3)
    pub default_threshold: u32,
    /// Log filter used when RUST_LOG is unset and no -v flag is given
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_shares: 5,
            default_threshold: 3,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Get the platform config file path
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "sharecrypt", "sharecrypt")
            .context("Failed to determine configuration directory")?;

        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, falling back to defaults if it is missing
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        // Reject bad defaults at load time instead of at first use
        config.share_config(None, None)?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Share configuration from command-line overrides or the stored defaults
    pub fn share_config(&self, shares: Option<u32>, threshold: Option<u32>) -> Result<ShareConfig> {
        let shares = shares.unwrap_or(self.default_shares);
        let threshold = threshold.unwrap_or(self.default_threshold);

        ShareConfig::new(shares, threshold).context("Invalid share configuration")
    }
}
