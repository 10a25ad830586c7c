//! Persisted keystore record
//!
//! Stored as JSON with hex-encoded byte fields:
//!
//! ```json
//! {
//!   "version": 1,
//!   "address": "0x…",
//!   "cipher": "chacha20poly1305",
//!   "kdf": "argon2id",
//!   "kdfParams": { "iterations": 3, "memoryCost": 65536, "parallelism": 4 },
//!   "salt": "…", "iv": "…", "cipherText": "…"
//! }
//! ```
//!
//! The header (version, address, KDF params) is bound into the AEAD tag, so
//! editing any of it makes the record fail to open.

use crate::security::{NONCE_LENGTH, SALT_LENGTH};
use crate::{Error, Result};
use dmnk_core::{Address, KdfParams};
use serde::{Deserialize, Serialize};

/// Current record format version
pub const RECORD_VERSION: u32 = 1;

const CIPHER_NAME: &str = "chacha20poly1305";
const KDF_NAME: &str = "argon2id";
const AAD_DOMAIN: &[u8] = b"dmnk-keystore";

/// Passphrase-encrypted account secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedKeystoreRecord {
    /// Format version
    pub version: u32,
    /// Address of the sealed account
    pub address: Address,
    /// KDF costs the sealing key was derived with
    pub kdf_params: KdfParams,
    /// KDF salt
    pub salt: [u8; SALT_LENGTH],
    /// AEAD nonce
    pub iv: [u8; NONCE_LENGTH],
    /// Sealed secret key including the authentication tag
    pub cipher_text: Vec<u8>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    version: u32,
    address: Address,
    cipher: String,
    kdf: String,
    kdf_params: KdfParams,
    salt: String,
    iv: String,
    cipher_text: String,
}

impl EncryptedKeystoreRecord {
    /// Bytes authenticated alongside the ciphertext
    pub fn associated_data(&self) -> Vec<u8> {
        let mut aad = Vec::with_capacity(AAD_DOMAIN.len() + 4 + 20 + 12);
        aad.extend_from_slice(AAD_DOMAIN);
        aad.extend_from_slice(&self.version.to_le_bytes());
        aad.extend_from_slice(self.address.as_bytes());
        aad.extend_from_slice(&self.kdf_params.iterations.to_le_bytes());
        aad.extend_from_slice(&self.kdf_params.memory_cost.to_le_bytes());
        aad.extend_from_slice(&self.kdf_params.parallelism.to_le_bytes());
        aad
    }

    /// Serialize for storage
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let stored = StoredRecord {
            version: self.version,
            address: self.address,
            cipher: CIPHER_NAME.to_string(),
            kdf: KDF_NAME.to_string(),
            kdf_params: self.kdf_params,
            salt: hex::encode(self.salt),
            iv: hex::encode(self.iv),
            cipher_text: hex::encode(&self.cipher_text),
        };
        serde_json::to_vec(&stored).map_err(|e| Error::Encryption(e.to_string()))
    }

    /// Deserialize from storage
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let stored: StoredRecord = serde_json::from_slice(data)
            .map_err(|e| Error::Encryption(format!("Malformed keystore record: {}", e)))?;

        if stored.version != RECORD_VERSION {
            return Err(Error::Encryption(format!(
                "Unsupported keystore record version: {}",
                stored.version
            )));
        }
        if stored.cipher != CIPHER_NAME || stored.kdf != KDF_NAME {
            return Err(Error::Encryption(format!(
                "Unsupported keystore algorithms: cipher={} kdf={}",
                stored.cipher, stored.kdf
            )));
        }

        let mut salt = [0u8; SALT_LENGTH];
        hex::decode_to_slice(&stored.salt, &mut salt)
            .map_err(|e| Error::Encryption(format!("Invalid salt: {}", e)))?;
        let mut iv = [0u8; NONCE_LENGTH];
        hex::decode_to_slice(&stored.iv, &mut iv)
            .map_err(|e| Error::Encryption(format!("Invalid iv: {}", e)))?;
        let cipher_text = hex::decode(&stored.cipher_text)
            .map_err(|e| Error::Encryption(format!("Invalid cipher text: {}", e)))?;

        Ok(Self {
            version: stored.version,
            address: stored.address,
            kdf_params: stored.kdf_params,
            salt,
            iv,
            cipher_text,
        })
    }
}
