//! Account ids and addresses derived from public keys.
//!
//! ```text
//! public_key (32 bytes)
//!     -> SHA256(public_key)
//!     -> first 8 bytes, little-endian      account id (u64)
//!     -> Reed-Solomon(id, prefix)           PREFIX-XXXX-XXXX-XXXX-XXXXX
//! ```
//!
//! Ids use the full unsigned 64-bit range. Values above `i64::MAX` are
//! ordinary accounts, not errors.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::reed_solomon;
use crate::codec::CodecError;
use crate::config::ACCOUNT_ID_LENGTH;
use crate::crypto::hash::sha256;
use crate::crypto::keys::{derive_public_key, PublicKey};

/// An account: its id, public key and rendered address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: u64,
    pub public_key: PublicKey,
    pub address: String,
}

impl Account {
    pub fn from_public_key(public_key: &PublicKey, prefix: &str) -> Self {
        let id = account_id(public_key);
        Self {
            id,
            public_key: *public_key,
            address: reed_solomon::encode(id, prefix),
        }
    }

    pub fn from_passphrase(passphrase: &str, prefix: &str) -> Self {
        Self::from_public_key(&derive_public_key(passphrase), prefix)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.address, self.id)
    }
}

/// Account id of a public key.
pub fn account_id(public_key: &PublicKey) -> u64 {
    let hash = sha256(public_key.as_bytes());
    let mut id = [0u8; ACCOUNT_ID_LENGTH];
    id.copy_from_slice(&hash[..ACCOUNT_ID_LENGTH]);
    u64::from_le_bytes(id)
}

/// Account id of a hex-encoded public key.
pub fn account_id_hex(public_key_hex: &str) -> Result<u64, CodecError> {
    Ok(account_id(&PublicKey::from_hex(public_key_hex)?))
}

/// Address of a public key under `prefix`.
pub fn account_address(public_key: &PublicKey, prefix: &str) -> String {
    reed_solomon::encode(account_id(public_key), prefix)
}

/// Address of a hex-encoded public key under `prefix`.
pub fn account_address_hex(public_key_hex: &str, prefix: &str) -> Result<String, CodecError> {
    Ok(account_address(&PublicKey::from_hex(public_key_hex)?, prefix))
}

/// Address of the account a passphrase controls.
pub fn account_address_from_passphrase(passphrase: &str, prefix: &str) -> String {
    account_address(&derive_public_key(passphrase), prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ACCOUNT_PREFIX;

    const TEST_PUBLIC_KEY: &str =
        "d9d5c57971eefb085e3abaf7a5a4a6cdb8185f30105583cdb09ad8f61886ec65";

    #[test]
    fn test_account_id_known_vector() {
        assert_eq!(account_id_hex(TEST_PUBLIC_KEY).unwrap(), 4_273_301_882_745_002_507);
    }

    #[test]
    fn test_account_address_known_vector() {
        assert_eq!(
            account_address_hex(TEST_PUBLIC_KEY, DEFAULT_ACCOUNT_PREFIX).unwrap(),
            "NXT-E8JD-FHKJ-CQ9H-5KGMQ"
        );
        // Only the prefix changes.
        assert_eq!(
            account_address_hex(TEST_PUBLIC_KEY, "DBN").unwrap(),
            "DBN-E8JD-FHKJ-CQ9H-5KGMQ"
        );
    }

    #[test]
    fn test_id_above_signed_range() {
        let account = Account::from_passphrase("correct horse battery staple", "NXT");
        assert_eq!(account.id, 11_623_955_783_251_610_612);
        assert!(account.id > i64::MAX as u64);
        assert_eq!(account.address, "NXT-YLZN-8DAS-R3V8-CQ6N4");
    }

    #[test]
    fn test_from_passphrase_matches_from_public_key() {
        let account = Account::from_passphrase("test", "NXT");
        assert_eq!(account.public_key.to_hex(), TEST_PUBLIC_KEY);
        assert_eq!(account.address, account_address_from_passphrase("test", "NXT"));
        assert_eq!(reed_solomon::decode(&account.address).unwrap(), account.id);
    }

    #[test]
    fn test_bad_public_key_hex() {
        assert!(account_id_hex("xyz").is_err());
        assert!(account_address_hex(&TEST_PUBLIC_KEY[..10], "NXT").is_err());
    }

    #[test]
    fn test_account_serializes_key_as_hex() {
        let account = Account::from_passphrase("test", "NXT");
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["public_key"], TEST_PUBLIC_KEY);
        assert_eq!(json["address"], "NXT-E8JD-FHKJ-CQ9H-5KGMQ");
    }
}
