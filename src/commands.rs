use anyhow::{anyhow, bail, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use console::style;
use dialoguer::Password;
use sharecrypt::{Envelope, SecretSharingService, Share};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use zeroize::Zeroizing;

use crate::bundle::{read_share_input, SealedBundle, ShareBundle};
use crate::config::Config;

/// Execute the init command
pub fn init(path: &Path, shares: Option<u32>, threshold: Option<u32>, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file {} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let mut config = Config::default();
    let share_config = config.share_config(shares, threshold)?;
    config.default_shares = share_config.num_shares();
    config.default_threshold = share_config.threshold();
    config.save(path)?;

    info!(path = %path.display(), "config written");
    eprintln!(
        "{} {}",
        style("Configuration saved to").green(),
        style(path.display()).bold()
    );
    Ok(())
}

/// Execute the split command
pub fn split(
    config: &Config,
    secret: Option<String>,
    shares: Option<u32>,
    threshold: Option<u32>,
    output: Option<PathBuf>,
) -> Result<()> {
    let share_config = config.share_config(shares, threshold)?;
    let secret = read_secret(secret)?;

    let service = SecretSharingService::new();
    let shares = service
        .generate_shares(secret.as_bytes(), &share_config)
        .context("Failed to split secret")?;

    let bundle = ShareBundle {
        config: share_config,
        shares,
    };
    let json = serde_json::to_string_pretty(&bundle).context("Failed to serialize shares")?;

    match output {
        Some(path) => {
            fs::write(&path, json)
                .with_context(|| format!("Failed to write shares to {}", path.display()))?;
            eprintln!(
                "{} {} shares written to {} (any {} recover the secret)",
                style("✓").green(),
                share_config.num_shares(),
                style(path.display()).bold(),
                share_config.threshold()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Execute the combine command
pub fn combine(
    config: &Config,
    input: Option<PathBuf>,
    threshold: Option<u32>,
    as_base64: bool,
) -> Result<()> {
    let input = read_share_input(input.as_deref())?;
    let threshold = threshold
        .or_else(|| input.threshold())
        .unwrap_or(config.default_threshold);

    let service = SecretSharingService::new();
    let secret = Zeroizing::new(
        service
            .reconstruct_secret(input.shares(), threshold)
            .context("Failed to recover secret")?,
    );

    if as_base64 {
        println!("{}", general_purpose::STANDARD.encode(secret.as_slice()));
    } else {
        let text = std::str::from_utf8(&secret)
            .map_err(|_| anyhow!("Recovered secret is not valid UTF-8; rerun with --base64"))?;
        println!("{}", text);
    }

    Ok(())
}

/// Execute the seal command
///
/// Envelopes are bound to this process's session key, so a quorum is opened
/// and recombined before anything is printed.
pub fn seal(
    config: &Config,
    secret: Option<String>,
    shares: Option<u32>,
    threshold: Option<u32>,
) -> Result<()> {
    let share_config = config.share_config(shares, threshold)?;
    let secret = read_secret(secret)?;

    let service = SecretSharingService::new();
    let shares = service
        .generate_shares(secret.as_bytes(), &share_config)
        .context("Failed to split secret")?;

    let envelopes = shares
        .iter()
        .map(|share| service.encrypt_share(share))
        .collect::<sharecrypt::Result<Vec<Envelope>>>()
        .context("Failed to encrypt shares")?;

    let quorum = envelopes
        .iter()
        .take(share_config.threshold() as usize)
        .map(|envelope| service.decrypt_share(envelope))
        .collect::<sharecrypt::Result<Vec<Share>>>()
        .context("Failed to open sealed shares")?;
    let recovered = Zeroizing::new(
        service
            .reconstruct_secret(&quorum, share_config.threshold())
            .context("Failed to recombine sealed shares")?,
    );
    if recovered.as_slice() != secret.as_bytes() {
        bail!("Sealed shares did not recombine to the original secret");
    }
    info!(envelopes = envelopes.len(), "sealed shares verified");

    let bundle = SealedBundle::new(share_config, service.public_key(), envelopes);
    let json = serde_json::to_string_pretty(&bundle).context("Failed to serialize envelopes")?;
    println!("{}", json);

    Ok(())
}

fn read_secret(secret: Option<String>) -> Result<Zeroizing<String>> {
    let secret = match secret {
        Some(secret) => secret,
        None => Password::new()
            .with_prompt("Enter the secret to split")
            .interact()
            .context("Failed to read secret")?,
    };

    if secret.is_empty() {
        bail!("Secret cannot be empty");
    }

    Ok(Zeroizing::new(secret))
}
