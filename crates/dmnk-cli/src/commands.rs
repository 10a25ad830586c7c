//! Subcommand implementations

use anyhow::{anyhow, bail, Context};
use dmnk_core::{DmnkConfig, WagerLimits, WagerSettings};
use dmnk_storage::{
    AccountKeystore, Error as StorageError, PassphraseStrength, Session, SessionState,
    SqliteStore,
};
use std::path::Path;

/// Non-interactive passphrase source
const PASSPHRASE_ENV: &str = "DMNK_PASSPHRASE";

fn open_session(config: &DmnkConfig, store_path: &Path) -> anyhow::Result<Session<SqliteStore>> {
    let store = SqliteStore::open(store_path)
        .map_err(user_error)
        .with_context(|| format!("Failed to open store at {}", store_path.display()))?;
    let keystore = AccountKeystore::with_kdf_params(store, config.keystore.kdf)?;
    Ok(Session::new(keystore))
}

/// Storage errors the user can act on are shown by their friendly message
fn user_error(e: StorageError) -> anyhow::Error {
    tracing::debug!(category = %e.category(), "{}", e);
    if e.is_user_error() {
        anyhow!(e.user_message())
    } else {
        anyhow::Error::new(e)
    }
}

fn read_passphrase(prompt: &str) -> anyhow::Result<String> {
    if let Ok(passphrase) = std::env::var(PASSPHRASE_ENV) {
        tracing::debug!("Using passphrase from {}", PASSPHRASE_ENV);
        return Ok(passphrase);
    }
    rpassword::prompt_password(prompt).context("Failed to read passphrase")
}

pub fn status(config: &DmnkConfig, store_path: &Path) -> anyhow::Result<()> {
    let mut session = open_session(config, store_path)?;
    let kind = session.kind().map_err(user_error)?;
    println!("Store:   {}", store_path.display());
    println!("Account: {}", kind);
    Ok(())
}

pub fn create(config: &DmnkConfig, store_path: &Path) -> anyhow::Result<()> {
    let mut session = open_session(config, store_path)?;
    if let SessionState::Locked(_) = session.current_state().map_err(user_error)? {
        bail!("{}", StorageError::AlreadyExists.user_message());
    }

    let passphrase = read_passphrase("New passphrase: ")?;
    if std::env::var_os(PASSPHRASE_ENV).is_none() {
        let confirm = read_passphrase("Repeat passphrase: ")?;
        if confirm != passphrase {
            bail!("Passphrases do not match");
        }
    }

    if let Some(warning) = PassphraseStrength::evaluate(&passphrase).warning() {
        eprintln!("Warning: {}", warning);
    }

    let account = session.create_account(&passphrase).map_err(user_error)?;
    println!("Created account {}", account.checksum_address());
    println!("Short form: {}", account.short_address());
    Ok(())
}

pub fn unlock(config: &DmnkConfig, store_path: &Path, attempts: u32) -> anyhow::Result<()> {
    let mut session = open_session(config, store_path)?;
    // A fixed passphrase cannot improve on retry
    let attempts = if std::env::var_os(PASSPHRASE_ENV).is_some() {
        1
    } else {
        attempts.max(1)
    };

    for attempt in 1..=attempts {
        let unlocker = match session.current_state().map_err(user_error)? {
            SessionState::NonExistent => bail!("No account on this device. Run `dmnk create` first."),
            SessionState::Unlocked(account) => {
                println!("Unlocked {}", account.checksum_address());
                return Ok(());
            }
            SessionState::Locked(unlocker) => unlocker,
        };

        let passphrase = read_passphrase("Passphrase: ")?;
        match unlocker.try_unlock(&passphrase) {
            Ok(account) => {
                println!("Unlocked {}", account.checksum_address());
                return Ok(());
            }
            Err(StorageError::UnlockFailed) => {
                eprintln!(
                    "{} ({}/{})",
                    StorageError::UnlockFailed.user_message(),
                    attempt,
                    attempts
                );
            }
            Err(e) => return Err(user_error(e)),
        }
    }

    bail!("Unlock failed after {} attempt(s)", attempts)
}

pub fn wager(
    config: &DmnkConfig,
    bid: Option<f64>,
    slippage: Option<f64>,
    balance: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let limits = &config.wager;
    let bid = bid.unwrap_or(limits.default_bid);
    let slippage = slippage.unwrap_or(limits.default_slippage);

    let settings = WagerSettings::compute(bid, slippage).map_err(|e| anyhow!(e.user_message()))?;
    let max_bid = balance.map(|balance| limits.effective_max_bid(balance));

    if json {
        let mut value = serde_json::to_value(settings)?;
        if let Some(max_bid) = max_bid {
            value["max_bid"] = max_bid.into();
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Bid:        {}", settings.bid());
    println!(
        "Slippage:   {}",
        WagerLimits::format_slippage(settings.slippage())
    );
    println!(
        "Accepts:    {} to {}",
        settings.range_from(),
        settings.range_to()
    );
    if let Some(max_bid) = max_bid {
        println!("Max bid:    {}", max_bid);
        if bid > max_bid {
            eprintln!("Warning: bid exceeds the maximum your balance allows");
        }
    }
    Ok(())
}

pub fn config_show(config: &DmnkConfig, config_path: &Path) -> anyhow::Result<()> {
    println!("# {}", config_path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

pub fn config_init(config_path: &Path, force: bool) -> anyhow::Result<()> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite",
            config_path.display()
        );
    }
    DmnkConfig::default()
        .save(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Wrote {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors_use_friendly_message() {
        let err = user_error(StorageError::UnlockFailed);
        assert_eq!(err.to_string(), StorageError::UnlockFailed.user_message());

        let err = user_error(StorageError::StoreUnavailable("disk full".to_string()));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_wager_rejects_invalid_bid() {
        let config = DmnkConfig::default();
        assert!(wager(&config, Some(0.0), Some(0.2), None, false).is_err());
        assert!(wager(&config, Some(0.4), Some(1.0), None, true).is_err());
        assert!(wager(&config, None, None, Some(0.3), false).is_ok());
    }

    #[test]
    fn test_config_init_refuses_overwrite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");

        config_init(&path, false).unwrap();
        assert!(config_init(&path, false).is_err());
        config_init(&path, true).unwrap();
        assert_eq!(DmnkConfig::load(&path).unwrap(), DmnkConfig::default());
    }
}
