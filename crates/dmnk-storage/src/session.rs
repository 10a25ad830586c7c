//! Session state derived from the keystore
//!
//! Nothing here is persisted. Every query re-reads record existence from the
//! store and combines it with the keystore's unlock flag:
//!
//! ```text
//! NonExistent --create--> Unlocked --lock--> Locked --unlock--> Unlocked
//!                                             |  ^
//!                                             +--+ wrong passphrase
//! ```
//!
//! A fresh process with an existing record starts out `Locked`.

use crate::keystore::{AccountKeystore, KeystoreView};
use crate::store::KeyValueStore;
use crate::{Error, Result};
use dmnk_core::Account;
use std::fmt;

/// Current session state
pub enum SessionState<'a, S> {
    /// No account record in the store
    NonExistent,
    /// A record exists but the secret is not in memory
    Locked(Unlocker<'a, S>),
    /// The account is usable
    Unlocked(&'a Account),
}

impl<S> SessionState<'_, S> {
    /// Tag without the payload
    pub fn kind(&self) -> SessionKind {
        match self {
            SessionState::NonExistent => SessionKind::NonExistent,
            SessionState::Locked(_) => SessionKind::Locked,
            SessionState::Unlocked(_) => SessionKind::Unlocked,
        }
    }
}

impl<S> fmt::Debug for SessionState<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::NonExistent => f.write_str("NonExistent"),
            SessionState::Locked(_) => f.write_str("Locked(..)"),
            SessionState::Unlocked(account) => f.debug_tuple("Unlocked").field(account).finish(),
        }
    }
}

/// Session state tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// No account record
    NonExistent,
    /// Record present, secret not loaded
    Locked,
    /// Secret loaded
    Unlocked,
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::NonExistent => write!(f, "no account"),
            SessionKind::Locked => write!(f, "locked"),
            SessionKind::Unlocked => write!(f, "unlocked"),
        }
    }
}

/// Unlock capability handed out with [`SessionState::Locked`]
pub struct Unlocker<'a, S> {
    keystore: &'a mut AccountKeystore<S>,
}

impl<'a, S: KeyValueStore> Unlocker<'a, S> {
    /// Try `passphrase`. Returns whether the session is now unlocked.
    ///
    /// `false` does not mean the passphrase was wrong: an unreadable store
    /// also reports `false` (logged at `warn`). Callers that must tell the
    /// two apart use [`Unlocker::try_unlock`], which returns
    /// [`Error::UnlockFailed`] or [`Error::StoreUnavailable`].
    pub fn unlock(&mut self, passphrase: &str) -> bool {
        match self.keystore.unlock(passphrase) {
            Ok(_) => true,
            Err(Error::UnlockFailed) => false,
            Err(e) => {
                tracing::warn!(category = %e.category(), "Unlock could not complete: {}", e);
                false
            }
        }
    }

    /// Try `passphrase`, reporting the failure reason
    pub fn try_unlock(self, passphrase: &str) -> Result<&'a Account> {
        self.keystore.unlock(passphrase)
    }
}

/// Derived session over one keystore
pub struct Session<S> {
    keystore: AccountKeystore<S>,
}

impl<S: KeyValueStore> Session<S> {
    /// Session over `keystore`
    pub fn new(keystore: AccountKeystore<S>) -> Self {
        Self { keystore }
    }

    /// Re-derive the current state from the store
    ///
    /// If the record has disappeared, any in-memory secret is dropped.
    pub fn current_state(&mut self) -> Result<SessionState<'_, S>> {
        if !self.keystore.exists()? {
            self.keystore.lock();
            return Ok(SessionState::NonExistent);
        }

        Ok(match self.keystore.view() {
            KeystoreView::Unlocked(account) => SessionState::Unlocked(account),
            KeystoreView::Locked(keystore) => SessionState::Locked(Unlocker { keystore }),
        })
    }

    /// Current state tag
    pub fn kind(&mut self) -> Result<SessionKind> {
        Ok(self.current_state()?.kind())
    }

    /// Create the account; the session ends up unlocked
    pub fn create_account(&mut self, passphrase: &str) -> Result<&Account> {
        self.keystore.create(passphrase)
    }

    /// Unlock the existing account
    pub fn unlock(&mut self, passphrase: &str) -> Result<&Account> {
        self.keystore.unlock(passphrase)
    }

    /// Drop the in-memory secret
    pub fn lock(&mut self) {
        self.keystore.lock();
    }

    /// The unlocked account, if any
    pub fn account(&self) -> Option<&Account> {
        self.keystore.account()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use dmnk_core::KdfParams;

    fn session() -> Session<MemoryStore> {
        let keystore =
            AccountKeystore::with_kdf_params(MemoryStore::new(), KdfParams::new(1, 64, 1)).unwrap();
        Session::new(keystore)
    }

    #[test]
    fn test_empty_store_is_non_existent() {
        let mut session = session();
        assert_eq!(session.kind().unwrap(), SessionKind::NonExistent);
    }

    #[test]
    fn test_locked_capability_unlocks() {
        let mut session = session();
        session.create_account("pw1").unwrap();
        session.lock();

        match session.current_state().unwrap() {
            SessionState::Locked(mut unlocker) => {
                assert!(!unlocker.unlock("wrong"));
                assert!(unlocker.unlock("pw1"));
            }
            other => panic!("expected Locked, got {:?}", other),
        }
        assert_eq!(session.kind().unwrap(), SessionKind::Unlocked);
    }

    #[test]
    fn test_try_unlock_reports_reason() {
        let mut session = session();
        session.create_account("pw1").unwrap();
        session.lock();

        let SessionState::Locked(unlocker) = session.current_state().unwrap() else {
            panic!("expected Locked");
        };
        assert!(matches!(unlocker.try_unlock("wrong"), Err(Error::UnlockFailed)));
        assert_eq!(session.kind().unwrap(), SessionKind::Locked);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(SessionKind::NonExistent.to_string(), "no account");
        assert_eq!(SessionKind::Locked.to_string(), "locked");
    }
}
