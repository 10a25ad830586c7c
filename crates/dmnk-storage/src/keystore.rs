//! Single-account keystore
//!
//! Holds at most one sealed account record in a [`KeyValueStore`] and, while
//! unlocked, the decrypted [`Account`] in memory. Nothing but the sealed
//! record is ever written to the store.

use crate::record::{EncryptedKeystoreRecord, RECORD_VERSION};
use crate::security::{generate_nonce, generate_salt, SealingKey};
use crate::store::KeyValueStore;
use crate::{Error, Result};
use dmnk_core::{Account, KdfParams, SecretHandle};

/// Store key of the account record
pub const ACCOUNT_RECORD_KEY: &str = "dmnk.account.v1";

/// Passphrase-gated store for the local account
pub struct AccountKeystore<S> {
    store: S,
    kdf_params: KdfParams,
    active: Option<Account>,
}

impl<S: KeyValueStore> AccountKeystore<S> {
    /// Keystore over `store`, sealing new records with default KDF costs
    pub fn new(store: S) -> Self {
        Self {
            store,
            kdf_params: KdfParams::default(),
            active: None,
        }
    }

    /// Keystore sealing new records with `kdf_params`
    ///
    /// Existing records always open with the params they were sealed with.
    pub fn with_kdf_params(store: S, kdf_params: KdfParams) -> Result<Self> {
        kdf_params.validate()?;
        Ok(Self {
            store,
            kdf_params,
            active: None,
        })
    }

    /// Whether a record is present in the store
    pub fn exists(&self) -> Result<bool> {
        Ok(self.store.get(ACCOUNT_RECORD_KEY)?.is_some())
    }

    /// The unlocked account, if any
    pub fn account(&self) -> Option<&Account> {
        self.active.as_ref()
    }

    /// Whether the secret is held in memory
    pub fn is_unlocked(&self) -> bool {
        self.active.is_some()
    }

    /// Underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Generate a new account and seal it under `passphrase`
    ///
    /// Fails with [`Error::AlreadyExists`] if a record is present. On success
    /// the new account is held unlocked.
    pub fn create(&mut self, passphrase: &str) -> Result<&Account> {
        if self.exists()? {
            return Err(Error::AlreadyExists);
        }

        let account = Account::generate()?;
        let salt = generate_salt();
        let iv = generate_nonce();

        let mut record = EncryptedKeystoreRecord {
            version: RECORD_VERSION,
            address: account.address(),
            kdf_params: self.kdf_params,
            salt,
            iv,
            cipher_text: Vec::new(),
        };

        let key = SealingKey::derive(passphrase, &record.salt, &record.kdf_params)?;
        record.cipher_text = key.seal(
            &record.iv,
            account.secret().expose_secret(),
            &record.associated_data(),
        )?;

        if !self.store.insert_new(ACCOUNT_RECORD_KEY, &record.to_bytes()?)? {
            return Err(Error::AlreadyExists);
        }

        tracing::info!(address = %account.short_address(), "Created account");
        Ok(&*self.active.insert(account))
    }

    /// Decrypt the stored record with `passphrase`
    ///
    /// A wrong passphrase, a missing record, and a damaged record all fail
    /// with [`Error::UnlockFailed`]. Store failures surface as
    /// [`Error::StoreUnavailable`]. State is unchanged on failure.
    pub fn unlock(&mut self, passphrase: &str) -> Result<&Account> {
        let stored = self.store.get(ACCOUNT_RECORD_KEY)?;

        let account = match stored {
            Some(bytes) => open_record(&bytes, passphrase).map_err(|e| {
                tracing::debug!(category = %e.category(), "Unlock rejected: {}", e);
                Error::UnlockFailed
            })?,
            None => {
                // Same KDF work as a real attempt before failing
                let _ = SealingKey::derive(passphrase, &generate_salt(), &self.kdf_params);
                tracing::debug!("Unlock rejected: no account record");
                return Err(Error::UnlockFailed);
            }
        };

        tracing::info!(address = %account.short_address(), "Unlocked account");
        Ok(&*self.active.insert(account))
    }

    /// Drop the in-memory secret. Idempotent.
    pub fn lock(&mut self) {
        if self.active.take().is_some() {
            tracing::info!("Locked account");
        }
    }

    pub(crate) fn view(&mut self) -> KeystoreView<'_, S> {
        match self.active {
            Some(ref account) => KeystoreView::Unlocked(account),
            None => KeystoreView::Locked(self),
        }
    }
}

pub(crate) enum KeystoreView<'a, S> {
    Unlocked(&'a Account),
    Locked(&'a mut AccountKeystore<S>),
}

fn open_record(bytes: &[u8], passphrase: &str) -> Result<Account> {
    let record = EncryptedKeystoreRecord::from_bytes(bytes)?;
    record.kdf_params.validate()?;

    let key = SealingKey::derive(passphrase, &record.salt, &record.kdf_params)?;
    let secret_bytes = key.open(&record.iv, &record.cipher_text, &record.associated_data())?;
    let account = Account::from_secret(SecretHandle::from_bytes(&secret_bytes)?)?;

    if account.address() != record.address {
        return Err(Error::Encryption(
            "Decrypted key does not match record address".to_string(),
        ));
    }
    Ok(account)
}
