mod bundle;
mod commands;
mod config;
mod logging;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use logging::LogFormat;

#[derive(Parser)]
#[command(name = "sharecrypt")]
#[command(about = "Threshold secret sharing with per-share authenticated encryption", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = "SHARECRYPT_CONFIG")]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file with default share parameters
    Init {
        /// Default number of shares
        #[arg(long)]
        shares: Option<u32>,

        /// Default threshold
        #[arg(long)]
        threshold: Option<u32>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Split a secret into shares
    Split {
        /// The secret to split (prompted for if omitted)
        #[arg(long, env = "SHARECRYPT_SECRET", hide_env_values = true)]
        secret: Option<String>,

        /// Number of shares to create
        #[arg(short = 'n', long)]
        shares: Option<u32>,

        /// Shares required to recover the secret
        #[arg(short, long)]
        threshold: Option<u32>,

        /// Write shares to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Recover a secret from shares
    Combine {
        /// Shares file, or `-` for stdin
        input: Option<PathBuf>,

        /// Shares required to recover the secret
        #[arg(short, long)]
        threshold: Option<u32>,

        /// Print the recovered secret as base64
        #[arg(long)]
        base64: bool,
    },

    /// Split a secret and seal every share in an encrypted envelope
    ///
    /// The envelopes are encrypted under a session key that exists only for
    /// this run. The printed bundle cannot be opened afterwards; `publicKey`
    /// only identifies the session that produced it.
    Seal {
        /// The secret to split (prompted for if omitted)
        #[arg(long, env = "SHARECRYPT_SECRET", hide_env_values = true)]
        secret: Option<String>,

        /// Number of shares to create
        #[arg(short = 'n', long)]
        shares: Option<u32>,

        /// Shares required to recover the secret
        #[arg(short, long)]
        threshold: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::Config::default_path()?,
    };

    // Init writes the config, so it must not fail on a broken existing one
    let config = match cli.command {
        Commands::Init { .. } => config::Config::default(),
        _ => config::Config::load(&config_path).context("Failed to load configuration")?,
    };

    logging::init_logging(
        &logging::level_for(cli.verbose, &config.log_level),
        cli.log_format,
    );

    match cli.command {
        Commands::Init {
            shares,
            threshold,
            force,
        } => commands::init(&config_path, shares, threshold, force)?,
        Commands::Split {
            secret,
            shares,
            threshold,
            output,
        } => commands::split(&config, secret, shares, threshold, output)?,
        Commands::Combine {
            input,
            threshold,
            base64,
        } => commands::combine(&config, input, threshold, base64)?,
        Commands::Seal {
            secret,
            shares,
            threshold,
        } => commands::seal(&config, secret, shares, threshold)?,
    }

    Ok(())
}
