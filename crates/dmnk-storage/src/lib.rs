//! Encrypted account storage for DMNK
//!
//! Owns the single local account: its passphrase-encrypted record in a
//! durable key-value store, the in-memory secret while unlocked, and the
//! session state derived from both.
//!
//! ## Security Features
//!
//! - **Passphrase KDF**: Argon2id, 64 MiB / 3 iterations / 4 lanes by default
//! - **Record Encryption**: ChaCha20-Poly1305 with the record header bound as associated data
//! - **Zeroization**: secret key and derived keys are wiped on drop
//! - **No plaintext at rest**: only the sealed record ever reaches the store

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod keystore;
pub mod passphrase;
pub mod record;
pub mod security;
pub mod session;
pub mod sqlite;
pub mod store;

pub use error::{Error, ErrorCategory, Result};
pub use keystore::{AccountKeystore, ACCOUNT_RECORD_KEY};
pub use passphrase::PassphraseStrength;
pub use record::EncryptedKeystoreRecord;
pub use security::{generate_nonce, generate_salt, SealingKey};
pub use session::{Session, SessionKind, SessionState, Unlocker};
pub use sqlite::SqliteStore;
pub use store::{KeyValueStore, MemoryStore};
