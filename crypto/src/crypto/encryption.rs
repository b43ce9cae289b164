//! # Secretbox Encryption
//!
//! Symmetric authenticated encryption for short UTF-8 messages, compatible
//! with NaCl `crypto_secretbox` (XSalsa20-Poly1305).
//!
//! The key is a passphrase-like string; the cipher key is `SHA256(UTF8(key))`.
//! Each call draws a fresh random 24-byte nonce.
//!
//! ## Wire format
//!
//! ```json
//! { "nonce": "<base64, 24 bytes>", "message": "<base64, tag(16) ‖ ciphertext>" }
//! ```
//!
//! The Poly1305 tag sits in front of the ciphertext, NaCl-style, so boxes
//! produced here open with any NaCl/TweetNaCl implementation and vice versa.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use crypto_secretbox::aead::generic_array::GenericArray;
use crypto_secretbox::aead::{AeadInPlace, KeyInit};
use crypto_secretbox::XSalsa20Poly1305;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use zeroize::Zeroizing;

use super::hash::sha256;
use crate::config::{SECRETBOX_KEY_LENGTH, SECRETBOX_NONCE_LENGTH, SECRETBOX_TAG_LENGTH};

/// Errors from sealing or opening a box.
///
/// A wrong key and a tampered ciphertext both surface as
/// `AuthenticationFailed`.
#[derive(Debug, Error)]
pub enum CipherError {
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    #[error("authentication failed -- wrong key or corrupted ciphertext")]
    AuthenticationFailed,

    #[error("encryption failed")]
    EncryptionFailed,
}

/// A sealed message as it travels: both fields base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedMessage {
    pub nonce: String,
    pub message: String,
}

/// What [`decrypt`] accepts: either the JSON text of an
/// [`EncryptedMessage`] or an already-parsed one.
#[derive(Debug, Clone)]
pub enum EncryptedInput {
    Json(String),
    Structured(EncryptedMessage),
}

impl EncryptedInput {
    /// Resolves the input to a typed record.
    pub fn parse(self) -> Result<EncryptedMessage, CipherError> {
        match self {
            EncryptedInput::Structured(message) => Ok(message),
            EncryptedInput::Json(text) => serde_json::from_str(&text)
                .map_err(|e| CipherError::MalformedCiphertext(format!("invalid JSON: {e}"))),
        }
    }
}

impl From<&str> for EncryptedInput {
    fn from(text: &str) -> Self {
        EncryptedInput::Json(text.to_string())
    }
}

impl From<String> for EncryptedInput {
    fn from(text: String) -> Self {
        EncryptedInput::Json(text)
    }
}

impl From<EncryptedMessage> for EncryptedInput {
    fn from(message: EncryptedMessage) -> Self {
        EncryptedInput::Structured(message)
    }
}

impl From<&EncryptedMessage> for EncryptedInput {
    fn from(message: &EncryptedMessage) -> Self {
        EncryptedInput::Structured(message.clone())
    }
}

fn cipher_for(key: &str) -> XSalsa20Poly1305 {
    let key_bytes: Zeroizing<[u8; SECRETBOX_KEY_LENGTH]> =
        Zeroizing::new(sha256(key.as_bytes()));
    XSalsa20Poly1305::new(GenericArray::from_slice(&key_bytes[..]))
}

/// Seals `message` under `key` with a random nonce.
///
/// # Example
///
/// ```
/// use nxt_crypto::{decrypt, encrypt};
///
/// let sealed = encrypt("meet at noon", "shared secret").unwrap();
/// assert_eq!(decrypt(&sealed, "shared secret").as_deref(), Some("meet at noon"));
/// assert_eq!(decrypt(&sealed, "wrong secret"), None);
/// ```
pub fn encrypt(message: &str, key: &str) -> Result<EncryptedMessage, CipherError> {
    let mut nonce = [0u8; SECRETBOX_NONCE_LENGTH];
    OsRng.fill_bytes(&mut nonce);

    let mut buffer = message.as_bytes().to_vec();
    let tag = cipher_for(key)
        .encrypt_in_place_detached(GenericArray::from_slice(&nonce), b"", &mut buffer)
        .map_err(|_| CipherError::EncryptionFailed)?;

    let mut sealed = Vec::with_capacity(SECRETBOX_TAG_LENGTH + buffer.len());
    sealed.extend_from_slice(&tag);
    sealed.extend_from_slice(&buffer);

    Ok(EncryptedMessage {
        nonce: STANDARD.encode(nonce),
        message: STANDARD.encode(sealed),
    })
}

/// Opens a box, reporting why it failed.
pub fn open(input: impl Into<EncryptedInput>, key: &str) -> Result<String, CipherError> {
    let sealed = input.into().parse()?;

    let nonce = STANDARD
        .decode(&sealed.nonce)
        .map_err(|e| CipherError::MalformedCiphertext(format!("nonce is not base64: {e}")))?;
    if nonce.len() != SECRETBOX_NONCE_LENGTH {
        return Err(CipherError::MalformedCiphertext(format!(
            "nonce must be {SECRETBOX_NONCE_LENGTH} bytes, got {}",
            nonce.len()
        )));
    }

    let body = STANDARD
        .decode(&sealed.message)
        .map_err(|e| CipherError::MalformedCiphertext(format!("message is not base64: {e}")))?;
    if body.len() < SECRETBOX_TAG_LENGTH {
        return Err(CipherError::MalformedCiphertext(format!(
            "message shorter than the {SECRETBOX_TAG_LENGTH}-byte tag"
        )));
    }

    let (tag, ciphertext) = body.split_at(SECRETBOX_TAG_LENGTH);
    let mut buffer = Zeroizing::new(ciphertext.to_vec());
    cipher_for(key)
        .decrypt_in_place_detached(
            GenericArray::from_slice(&nonce),
            b"",
            &mut *buffer,
            GenericArray::from_slice(tag),
        )
        .map_err(|_| CipherError::AuthenticationFailed)?;

    String::from_utf8(buffer.to_vec())
        .map_err(|_| CipherError::MalformedCiphertext("plaintext is not UTF-8".to_string()))
}

/// Opens a box, or `None` if it can't be opened for any reason.
pub fn decrypt(input: impl Into<EncryptedInput>, key: &str) -> Option<String> {
    match open(input, key) {
        Ok(plaintext) => Some(plaintext),
        Err(e) => {
            debug!(error = %e, "secretbox rejected");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let sealed = encrypt("hello, world", "key").unwrap();
        assert_eq!(decrypt(&sealed, "key").as_deref(), Some("hello, world"));
    }

    #[test]
    fn test_round_trip_unicode_and_empty() {
        for message in ["", "ünïcödé ✓", "a\nmulti\nline message"] {
            let sealed = encrypt(message, "k").unwrap();
            assert_eq!(decrypt(&sealed, "k").as_deref(), Some(message));
        }
    }

    #[test]
    fn test_layout_is_tag_then_ciphertext() {
        let sealed = encrypt("12345", "key").unwrap();
        assert_eq!(STANDARD.decode(&sealed.nonce).unwrap().len(), 24);
        assert_eq!(STANDARD.decode(&sealed.message).unwrap().len(), 16 + 5);
    }

    #[test]
    fn test_nonces_differ() {
        let a = encrypt("same", "key").unwrap();
        let b = encrypt("same", "key").unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.message, b.message);
    }

    #[test]
    fn test_json_input() {
        let sealed = encrypt("via json", "key").unwrap();
        let json = serde_json::to_string(&sealed).unwrap();
        assert_eq!(decrypt(json.as_str(), "key").as_deref(), Some("via json"));
        assert_eq!(decrypt(json, "key").as_deref(), Some("via json"));
    }

    #[test]
    fn test_cipher_key_is_sha256_of_key_string() {
        // Seal with a cipher keyed directly by SHA256("key") and a fixed nonce.
        let nonce = [7u8; SECRETBOX_NONCE_LENGTH];
        let raw_key = sha256(b"key");
        let mut buffer = b"interop".to_vec();
        let tag = XSalsa20Poly1305::new(GenericArray::from_slice(&raw_key))
            .encrypt_in_place_detached(GenericArray::from_slice(&nonce), b"", &mut buffer)
            .unwrap();

        let mut body = tag.to_vec();
        body.extend_from_slice(&buffer);
        let sealed = EncryptedMessage {
            nonce: STANDARD.encode(nonce),
            message: STANDARD.encode(body),
        };
        assert_eq!(raw_key.len(), SECRETBOX_KEY_LENGTH);
        assert_eq!(open(&sealed, "key").unwrap(), "interop");
    }

    #[test]
    fn test_wrong_key_is_none() {
        let sealed = encrypt("secret", "right").unwrap();
        assert_eq!(decrypt(&sealed, "wrong"), None);
        assert!(matches!(open(&sealed, "wrong"), Err(CipherError::AuthenticationFailed)));
    }

    #[test]
    fn test_tampered_ciphertext_is_none() {
        let sealed = encrypt("secret", "key").unwrap();
        let mut body = STANDARD.decode(&sealed.message).unwrap();
        let last = body.len() - 1;
        body[last] ^= 0x01;
        let tampered = EncryptedMessage {
            nonce: sealed.nonce.clone(),
            message: STANDARD.encode(body),
        };
        assert_eq!(decrypt(tampered, "key"), None);
    }

    #[test]
    fn test_tampered_nonce_is_none() {
        let sealed = encrypt("secret", "key").unwrap();
        let mut nonce = STANDARD.decode(&sealed.nonce).unwrap();
        nonce[0] ^= 0x80;
        let tampered = EncryptedMessage {
            nonce: STANDARD.encode(nonce),
            message: sealed.message.clone(),
        };
        assert_eq!(decrypt(tampered, "key"), None);
    }

    #[test]
    fn test_malformed_inputs_are_none() {
        assert_eq!(decrypt("not json", "key"), None);
        assert_eq!(decrypt("{}", "key"), None);
        assert_eq!(decrypt(r#"{"nonce":"AAAA"}"#, "key"), None);
        assert!(matches!(
            open(r#"{"nonce":"!!","message":"AAAA"}"#, "key"),
            Err(CipherError::MalformedCiphertext(_))
        ));
        assert!(matches!(
            open(r#"{"nonce":"AAAA","message":"AAAA"}"#, "key"),
            Err(CipherError::MalformedCiphertext(_))
        ));
    }
}
