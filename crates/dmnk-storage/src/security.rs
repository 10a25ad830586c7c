//! Security and encryption primitives
//!
//! Argon2id turns a passphrase into a 256-bit sealing key; ChaCha20-Poly1305
//! seals the account secret under it.

use crate::{Error, Result};
use argon2::{Algorithm, Argon2, ParamsBuilder, Version};
use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Key, Nonce,
};
use dmnk_core::KdfParams;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

/// Salt length in bytes
pub const SALT_LENGTH: usize = 32;

/// ChaCha20-Poly1305 nonce length in bytes
pub const NONCE_LENGTH: usize = 12;

/// Derived key length in bytes
pub const KEY_LENGTH: usize = 32;

/// Key derived from a passphrase, used to seal or open one record
pub struct SealingKey {
    key: Zeroizing<[u8; KEY_LENGTH]>,
}

impl SealingKey {
    /// Derive from passphrase using Argon2id + salt
    pub fn derive(passphrase: &str, salt: &[u8], params: &KdfParams) -> Result<Self> {
        if salt.len() < 16 {
            return Err(Error::Encryption("Salt too short".to_string()));
        }

        let argon_params = ParamsBuilder::new()
            .m_cost(params.memory_cost)
            .t_cost(params.iterations)
            .p_cost(params.parallelism)
            .output_len(KEY_LENGTH)
            .build()
            .map_err(|e| Error::Encryption(e.to_string()))?;

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

        let mut key = Zeroizing::new([0u8; KEY_LENGTH]);
        argon2
            .hash_password_into(passphrase.as_bytes(), salt, &mut key[..])
            .map_err(|e| Error::Encryption(e.to_string()))?;

        Ok(Self { key })
    }

    /// Encrypt `plaintext`, authenticating `aad` alongside it
    pub fn seal(&self, nonce: &[u8; NONCE_LENGTH], plaintext: &[u8], aad: &[u8]) -> Result<Vec<u8>> {
        self.cipher()
            .encrypt(Nonce::from_slice(nonce), Payload { msg: plaintext, aad })
            .map_err(|e| Error::Encryption(e.to_string()))
    }

    /// Decrypt and authenticate; any tampering or a wrong key fails
    pub fn open(
        &self,
        nonce: &[u8; NONCE_LENGTH],
        ciphertext: &[u8],
        aad: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>> {
        self.cipher()
            .decrypt(Nonce::from_slice(nonce), Payload { msg: ciphertext, aad })
            .map(Zeroizing::new)
            .map_err(|e| Error::Encryption(e.to_string()))
    }

    fn cipher(&self) -> ChaCha20Poly1305 {
        ChaCha20Poly1305::new(Key::from_slice(&self.key[..]))
    }
}

/// Generate secure random salt
pub fn generate_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Generate a random nonce
pub fn generate_nonce() -> [u8; NONCE_LENGTH] {
    let mut nonce = [0u8; NONCE_LENGTH];
    OsRng.fill_bytes(&mut nonce);
    nonce
}
