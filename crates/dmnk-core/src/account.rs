//! Account key material and address derivation
//!
//! An account is a secp256k1 key pair. Its address is the last 20 bytes of the
//! keccak-256 hash of the uncompressed public key, rendered as `0x` followed by
//! 40 lowercase hex digits.

use crate::{Error, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// Length of an address in bytes
pub const ADDRESS_LENGTH: usize = 20;

/// Length of a secret key in bytes
pub const SECRET_KEY_LENGTH: usize = 32;

/// Public account identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Derive the address belonging to a secret key
    fn from_secret_key(secret: &SecretKey) -> Self {
        let secp = Secp256k1::signing_only();
        let public = PublicKey::from_secret_key(&secp, secret);
        let uncompressed = public.serialize_uncompressed();
        // Drop the 0x04 SEC1 tag before hashing
        let hash = alloy_primitives::keccak256(&uncompressed[1..]);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&hash[12..]);
        Self(bytes)
    }

    /// Get address bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    /// EIP-55 mixed-case rendering
    pub fn to_checksum(&self) -> String {
        alloy_primitives::Address::from(self.0).to_checksum(None)
    }

    /// Abbreviated form for compact display
    pub fn short(&self) -> String {
        shorten_address(&self.to_string())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| Error::InvalidAddress(format!("missing 0x prefix: {}", s)))?;
        if digits.len() != ADDRESS_LENGTH * 2 {
            return Err(Error::InvalidAddress(format!(
                "expected {} hex digits, got {}",
                ADDRESS_LENGTH * 2,
                digits.len()
            )));
        }
        let mut bytes = [0u8; ADDRESS_LENGTH];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| Error::InvalidAddress(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Shorten an address for display, e.g. `0x53e4…ba8b`.
///
/// Strings too short to benefit are returned unchanged.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 12 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

/// In-memory secret key.
///
/// Zeroized on drop. Not `Clone`, not serializable, and its `Debug` output is
/// redacted.
pub struct SecretHandle {
    bytes: Zeroizing<[u8; SECRET_KEY_LENGTH]>,
}

impl SecretHandle {
    /// Generate a fresh secret from the OS RNG
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
        loop {
            OsRng.fill_bytes(&mut bytes[..]);
            // Rejects zero and values >= the curve order; astronomically rare
            if SecretKey::from_slice(&bytes[..]).is_ok() {
                return Self { bytes };
            }
        }
    }

    /// Load a secret from raw bytes (e.g. after decryption)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != SECRET_KEY_LENGTH {
            return Err(Error::KeyMaterial(format!(
                "expected {} bytes, got {}",
                SECRET_KEY_LENGTH,
                bytes.len()
            )));
        }
        SecretKey::from_slice(bytes).map_err(|e| Error::KeyMaterial(e.to_string()))?;
        let mut key = Zeroizing::new([0u8; SECRET_KEY_LENGTH]);
        key.copy_from_slice(bytes);
        Ok(Self { bytes: key })
    }

    /// Raw secret bytes. Only the keystore should call this, to encrypt them.
    pub fn expose_secret(&self) -> &[u8; SECRET_KEY_LENGTH] {
        &self.bytes
    }

    fn secret_key(&self) -> Result<SecretKey> {
        SecretKey::from_slice(&self.bytes[..]).map_err(|e| Error::KeyMaterial(e.to_string()))
    }
}

impl fmt::Debug for SecretHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretHandle(<redacted>)")
    }
}

/// A usable account: public address plus the secret handle.
pub struct Account {
    address: Address,
    secret: SecretHandle,
}

impl Account {
    /// Create a new account with fresh key material
    pub fn generate() -> Result<Self> {
        Self::from_secret(SecretHandle::generate())
    }

    /// Build an account around existing key material
    pub fn from_secret(secret: SecretHandle) -> Result<Self> {
        let address = Address::from_secret_key(&secret.secret_key()?);
        Ok(Self { address, secret })
    }

    /// Public address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Secret handle
    pub fn secret(&self) -> &SecretHandle {
        &self.secret
    }

    /// EIP-55 rendering of the address
    pub fn checksum_address(&self) -> String {
        self.address.to_checksum()
    }

    /// Abbreviated address for display
    pub fn short_address(&self) -> String {
        self.address.short()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known test account
    const TEST_SECRET: &str = "c8c85b769e94fed2e800e05f20dba23e12a77bc9223b85cb04db8b8e4045634b";
    const TEST_ADDRESS: &str = "0x53E450514589267b6B83E279Cd67c2C22987ba8B";

    fn is_address_format(s: &str) -> bool {
        s.len() == 42
            && s.starts_with("0x")
            && s[2..].chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }

    #[test]
    fn test_known_address_derivation() {
        let secret = SecretHandle::from_bytes(&hex::decode(TEST_SECRET).unwrap()).unwrap();
        let account = Account::from_secret(secret).unwrap();
        assert_eq!(account.address().to_string(), TEST_ADDRESS.to_lowercase());
        assert_eq!(account.checksum_address(), TEST_ADDRESS);
    }

    #[test]
    fn test_generated_address_format() {
        let account = Account::generate().unwrap();
        assert!(is_address_format(&account.address().to_string()));
    }

    #[test]
    fn test_generated_accounts_differ() {
        let a = Account::generate().unwrap();
        let b = Account::generate().unwrap();
        assert_ne!(a.address(), b.address());
    }

    #[test]
    fn test_same_secret_same_address() {
        let a = Account::generate().unwrap();
        let copy = SecretHandle::from_bytes(a.secret().expose_secret()).unwrap();
        let b = Account::from_secret(copy).unwrap();
        assert_eq!(a.address(), b.address());
    }

    #[test]
    fn test_invalid_secret_rejected() {
        assert!(SecretHandle::from_bytes(&[0u8; 32]).is_err());
        assert!(SecretHandle::from_bytes(&[1u8; 31]).is_err());
        assert!(SecretHandle::from_bytes(&[0xffu8; 32]).is_err());
    }

    #[test]
    fn test_address_parse() {
        let parsed: Address = TEST_ADDRESS.parse().unwrap();
        assert_eq!(parsed.to_string(), TEST_ADDRESS.to_lowercase());

        assert!("53E450514589267b6B83E279Cd67c2C22987ba8B".parse::<Address>().is_err());
        assert!("0x53E4".parse::<Address>().is_err());
        assert!("0xzz3E450514589267b6B83E279Cd67c2C22987ba8B"
            .parse::<Address>()
            .is_err());
    }

    #[test]
    fn test_address_serde() {
        let parsed: Address = TEST_ADDRESS.parse().unwrap();
        let json = serde_json::to_string(&parsed).unwrap();
        assert_eq!(json, format!("\"{}\"", TEST_ADDRESS.to_lowercase()));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, parsed);
    }

    #[test]
    fn test_shorten_address() {
        assert_eq!(
            shorten_address("0x53e450514589267b6b83e279cd67c2c22987ba8b"),
            "0x53e4…ba8b"
        );
        assert_eq!(shorten_address("0x1234"), "0x1234");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let secret = SecretHandle::from_bytes(&hex::decode(TEST_SECRET).unwrap()).unwrap();
        let account = Account::from_secret(secret).unwrap();
        let rendered = format!("{:?} {:?}", account, account.secret());
        assert!(!rendered.contains(TEST_SECRET));
        assert!(rendered.contains("redacted"));
    }
}
