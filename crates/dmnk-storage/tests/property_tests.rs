//! Property-based tests for dmnk-storage

use dmnk_core::KdfParams;
use dmnk_storage::{
    generate_nonce, generate_salt, AccountKeystore, EncryptedKeystoreRecord, Error, MemoryStore,
    SealingKey,
};
use proptest::prelude::*;

fn fast_params() -> KdfParams {
    KdfParams::new(1, 64, 1)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: any other passphrase fails to open a sealed secret
    #[test]
    fn prop_other_passphrase_fails(
        passphrase in ".{0,24}",
        other in ".{0,24}",
        secret in prop::array::uniform32(any::<u8>()),
    ) {
        prop_assume!(passphrase != other);
        let salt = generate_salt();
        let nonce = generate_nonce();

        let key = SealingKey::derive(&passphrase, &salt, &fast_params()).unwrap();
        let sealed = key.seal(&nonce, &secret, b"aad").unwrap();
        prop_assert_eq!(&key.open(&nonce, &sealed, b"aad").unwrap()[..], &secret[..]);

        let wrong = SealingKey::derive(&other, &salt, &fast_params()).unwrap();
        prop_assert!(wrong.open(&nonce, &sealed, b"aad").is_err());
    }

    /// Property: arbitrary bytes never parse into a usable record without error
    #[test]
    fn prop_garbage_record_rejected(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        prop_assert!(EncryptedKeystoreRecord::from_bytes(&bytes).is_err());
    }

    /// Property: unlock with the creating passphrase yields the same address
    #[test]
    fn prop_create_unlock_same_address(passphrase in "[ -~]{0,32}") {
        let mut keystore =
            AccountKeystore::with_kdf_params(MemoryStore::new(), fast_params()).unwrap();
        let created = keystore.create(&passphrase).unwrap().address();
        keystore.lock();

        let unlocked = keystore.unlock(&passphrase).unwrap().address();
        prop_assert_eq!(created, unlocked);

        let wrong = format!("{}!", passphrase);
        prop_assert!(matches!(keystore.unlock(&wrong), Err(Error::UnlockFailed)));
    }
}
