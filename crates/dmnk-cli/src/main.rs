//! Command-line shell for the DMNK account and wager core
//!
//! - `status`: show whether an account exists on this device
//! - `create`: create the local account
//! - `unlock`: check the passphrase and show the account address
//! - `wager`: compute the accepted opponent bid range
//! - `config`: show or initialize the configuration file

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dmnk_core::DmnkConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dmnk")]
#[command(about = "DMNK account and wager tool", long_about = None)]
struct Cli {
    /// SQLite store path (overrides the configuration)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the session state of the local account
    Status,

    /// Create the local account
    Create,

    /// Unlock the local account and print its address
    Unlock {
        /// Passphrase attempts before giving up
        #[arg(short, long, default_value = "3")]
        attempts: u32,
    },

    /// Compute the opponent bid range for a wager
    Wager {
        /// Bid amount (defaults to the configured slider default)
        #[arg(short, long)]
        bid: Option<f64>,

        /// Slippage as a fraction, e.g. 0.2 for 20%
        #[arg(short, long)]
        slippage: Option<f64>,

        /// Current balance, to report the slider maximum
        #[arg(long)]
        balance: Option<f64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or initialize the configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => DmnkConfig::default_path().context("No home directory; pass --config")?,
    };

    if let Commands::Config {
        action: ConfigAction::Init { force },
    } = cli.command
    {
        return commands::config_init(&config_path, force);
    }

    let config = DmnkConfig::load_or_default(&config_path)
        .with_context(|| format!("Failed to load {}", config_path.display()))?;
    let store_path = match cli.store {
        Some(path) => path,
        None => config.storage.resolve_path()?,
    };

    match cli.command {
        Commands::Status => commands::status(&config, &store_path),
        Commands::Create => commands::create(&config, &store_path),
        Commands::Unlock { attempts } => commands::unlock(&config, &store_path, attempts),
        Commands::Wager {
            bid,
            slippage,
            balance,
            json,
        } => commands::wager(&config, bid, slippage, balance, json),
        Commands::Config { .. } => commands::config_show(&config, &config_path),
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_wager() {
        let cli = Cli::try_parse_from(["dmnk", "wager", "-b", "0.4", "-s", "0.2", "--json"]).unwrap();
        match cli.command {
            Commands::Wager {
                bid,
                slippage,
                balance,
                json,
            } => {
                assert_eq!(bid, Some(0.4));
                assert_eq!(slippage, Some(0.2));
                assert_eq!(balance, None);
                assert!(json);
            }
            _ => panic!("expected wager"),
        }
    }

    #[test]
    fn test_global_store_flag() {
        let cli = Cli::try_parse_from(["dmnk", "status", "--store", "/tmp/dmnk.sqlite"]).unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/dmnk.sqlite")));
        assert!(matches!(cli.command, Commands::Status));
    }
}
