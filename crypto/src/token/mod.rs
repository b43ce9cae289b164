//! # Authentication Tokens
//!
//! A token proves that whoever holds a passphrase vouched for a piece of
//! data (typically a website name) at a point in time, without revealing
//! the passphrase.
//!
//! ## Layout
//!
//! ```text
//! body (100 bytes) = public_key (32) ‖ timestamp u32 LE (4) ‖ signature (64)
//! signed message   = UTF8(data) ‖ public_key ‖ timestamp bytes
//! ```
//!
//! The body is packed into 160 base-32 characters (see [`packing`]). The
//! timestamp counts seconds since the network epoch.
//!
//! ## Verification
//!
//! [`parse_token`] only fails when the token can't be decoded at all. A
//! token that decodes but doesn't verify for the given data comes back
//! with `is_valid: false`, along with the timestamp and key it claims.

pub mod packing;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::{ProtocolConfig, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH, TOKEN_BYTES};
use crate::crypto::keys::{KeyPair, PublicKey, Signature};

/// Errors from producing or decoding a token.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The string isn't 160 base-32 characters.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// The clock reads earlier than the configured epoch.
    #[error("current time is before the network epoch")]
    ClockBeforeEpoch,

    /// More seconds have passed since the epoch than fit in 32 bits.
    #[error("timestamp {0} does not fit in 32 bits")]
    TimestampOutOfRange(u64),
}

/// What a decoded token claims, and whether the claim holds for the data
/// it was checked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenVerification {
    pub is_valid: bool,
    /// Seconds since the network epoch.
    pub timestamp: u32,
    /// Hex-encoded public key.
    pub public_key: String,
}

/// A decoded token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub public_key: PublicKey,
    pub timestamp: u32,
    pub signature: Signature,
}

impl Token {
    /// Signs `data` at `timestamp` with `keypair`.
    pub fn issue(data: &str, keypair: &KeyPair, timestamp: u32) -> Self {
        let public_key = keypair.public_key();
        let signature = keypair.sign(&signed_message(data, &public_key, timestamp));
        Self {
            public_key,
            timestamp,
            signature,
        }
    }

    /// Decodes the 160-character form.
    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let body = packing::unpack(token)?;
        let (public_key, rest) = body.split_at(PUBLIC_KEY_LENGTH);
        let (timestamp, signature) = rest.split_at(4);

        let mut key = [0u8; PUBLIC_KEY_LENGTH];
        key.copy_from_slice(public_key);
        let mut time = [0u8; 4];
        time.copy_from_slice(timestamp);
        let mut sig = [0u8; SIGNATURE_LENGTH];
        sig.copy_from_slice(signature);

        Ok(Self {
            public_key: PublicKey::from_bytes(key),
            timestamp: u32::from_le_bytes(time),
            signature: Signature::from_bytes(sig),
        })
    }

    /// Encodes to the 160-character form.
    pub fn encode(&self) -> String {
        let mut body = [0u8; TOKEN_BYTES];
        body[..PUBLIC_KEY_LENGTH].copy_from_slice(self.public_key.as_bytes());
        body[PUBLIC_KEY_LENGTH..PUBLIC_KEY_LENGTH + 4].copy_from_slice(&self.timestamp.to_le_bytes());
        body[PUBLIC_KEY_LENGTH + 4..].copy_from_slice(&self.signature.to_bytes());
        packing::pack(&body)
    }

    /// Checks the signature against `data`.
    pub fn verify(&self, data: &str) -> bool {
        let message = signed_message(data, &self.public_key, self.timestamp);
        self.public_key.verify(&message, &self.signature)
    }
}

fn signed_message(data: &str, public_key: &PublicKey, timestamp: u32) -> Vec<u8> {
    let mut message = Vec::with_capacity(data.len() + PUBLIC_KEY_LENGTH + 4);
    message.extend_from_slice(data.as_bytes());
    message.extend_from_slice(public_key.as_bytes());
    message.extend_from_slice(&timestamp.to_le_bytes());
    message
}

/// Issues a token for `data`, timestamped from `config`'s clock and epoch.
pub fn generate_token(
    data: &str,
    passphrase: &str,
    config: &ProtocolConfig,
) -> Result<String, TokenError> {
    let seconds = config.epoch_seconds().ok_or(TokenError::ClockBeforeEpoch)?;
    let timestamp = u32::try_from(seconds).map_err(|_| TokenError::TimestampOutOfRange(seconds))?;
    Ok(generate_token_at(data, passphrase, timestamp))
}

/// Issues a token with an explicit epoch-relative timestamp.
///
/// ```
/// use nxt_crypto::{generate_token_at, parse_token};
///
/// let token = generate_token_at("example.com", "test", 100_000_000);
/// let claim = parse_token(&token, "example.com").unwrap();
/// assert!(claim.is_valid);
/// assert_eq!(claim.timestamp, 100_000_000);
/// ```
pub fn generate_token_at(data: &str, passphrase: &str, timestamp: u32) -> String {
    let keypair = KeyPair::from_passphrase(passphrase);
    Token::issue(data, &keypair, timestamp).encode()
}

/// Decodes `token` and checks it against `data`.
pub fn parse_token(token: &str, data: &str) -> Result<TokenVerification, TokenError> {
    let decoded = Token::decode(token)?;
    let is_valid = decoded.verify(data);
    debug!(
        public_key = %decoded.public_key,
        timestamp = decoded.timestamp,
        is_valid,
        "parsed token"
    );
    Ok(TokenVerification {
        is_valid,
        timestamp: decoded.timestamp,
        public_key: decoded.public_key.to_hex(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EPOCH_BEGINNING_MS;
    use crate::crypto::keys::derive_public_key;
    use proptest::prelude::*;

    const TEST_TOKEN: &str = "e5ssblep79f0huvekqiabttq61fhhe6dm36o6l8ggocfdm4qungg0pfci4ugi9o58itrurinun7cr499rmeve5gnuaflkjo9474v8s5lgbq0u2g7afrbp1v64i2j51c27sq2lhct69oqd9lvcutpbqpe5dtlaj0t";

    #[test]
    fn test_known_token() {
        assert_eq!(generate_token_at("example.com", "test", 100_000_000), TEST_TOKEN);
    }

    #[test]
    fn test_parse_known_token() {
        let claim = parse_token(TEST_TOKEN, "example.com").unwrap();
        assert!(claim.is_valid);
        assert_eq!(claim.timestamp, 100_000_000);
        assert_eq!(claim.public_key, derive_public_key("test").to_hex());
    }

    #[test]
    fn test_wrong_data_is_invalid_not_error() {
        let claim = parse_token(TEST_TOKEN, "evil.example").unwrap();
        assert!(!claim.is_valid);
        assert_eq!(claim.timestamp, 100_000_000);
    }

    #[test]
    fn test_uppercase_token_still_verifies() {
        let claim = parse_token(&TEST_TOKEN.to_uppercase(), "example.com").unwrap();
        assert!(claim.is_valid);
    }

    #[test]
    fn test_truncated_token_is_malformed() {
        assert!(matches!(
            parse_token(&TEST_TOKEN[..152], "example.com"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_generate_token_uses_config_clock() {
        let config = ProtocolConfig::with_fixed_time(EPOCH_BEGINNING_MS + 42_000);
        let token = generate_token("example.com", "test", &config).unwrap();
        let claim = parse_token(&token, "example.com").unwrap();
        assert!(claim.is_valid);
        assert_eq!(claim.timestamp, 42);
    }

    #[test]
    fn test_generate_token_before_epoch() {
        let config = ProtocolConfig::with_fixed_time(EPOCH_BEGINNING_MS - 1_000);
        assert!(matches!(
            generate_token("x", "test", &config),
            Err(TokenError::ClockBeforeEpoch)
        ));
    }

    #[test]
    fn test_generate_token_timestamp_overflow() {
        let config = ProtocolConfig::with_fixed_time(EPOCH_BEGINNING_MS + (1u64 << 32) * 1000);
        assert!(matches!(
            generate_token("x", "test", &config),
            Err(TokenError::TimestampOutOfRange(_))
        ));
    }

    #[test]
    fn test_token_struct_round_trip() {
        let token = Token::decode(TEST_TOKEN).unwrap();
        assert_eq!(token.encode(), TEST_TOKEN);
        assert!(token.verify("example.com"));
    }

    #[test]
    fn test_verification_json_shape() {
        let claim = parse_token(TEST_TOKEN, "example.com").unwrap();
        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(json["isValid"], true);
        assert_eq!(json["timestamp"], 100_000_000);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn token_round_trip(
            data in "\\PC{0,40}",
            passphrase in "[a-z ]{1,30}",
            timestamp in any::<u32>(),
        ) {
            let token = generate_token_at(&data, &passphrase, timestamp);
            let claim = parse_token(&token, &data).unwrap();
            prop_assert!(claim.is_valid);
            prop_assert_eq!(claim.timestamp, timestamp);
            prop_assert_eq!(claim.public_key, derive_public_key(&passphrase).to_hex());
        }
    }
}
