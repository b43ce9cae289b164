//! # Key Management
//!
//! Passphrase-derived keypairs and the hash-chained signature scheme that
//! runs on top of them.
//!
//! A keypair is a pure function of its passphrase: `seed = SHA256(passphrase)`
//! goes through [`curve::keygen`] and out comes a Curve25519 public key plus
//! the signing scalar. Nothing is stored; re-entering the passphrase
//! reproduces the key.
//!
//! ## Signing
//!
//! ```text
//! m = SHA256(message)
//! x = SHA256(m ‖ s)          ephemeral, deterministic per message
//! Y = public_point(x)        commitment
//! h = SHA256(m ‖ Y)          challenge
//! v = (x − h)·s mod ℓ        response
//! signature = v ‖ h
//! ```
//!
//! Verification recovers `Y` from `(v, h, P)` and recomputes `h`.
//!
//! ## Security considerations
//!
//! - The signing scalar is zeroized on drop and never printed by `Debug`.
//! - The challenge comparison is constant-time (`subtle`).
//! - A passphrase-derived key is only as strong as the passphrase. Use
//!   [`generate_secret_phrase`] for new accounts.

use std::fmt;

use curve25519_dalek::scalar::Scalar;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use super::curve;
use super::hash::{sha256, sha256_concat, sha512};
use crate::codec::{bytes_to_hex, hex_to_array, CodecError};
use crate::config::{
    HASH_OUTPUT_LENGTH, PRIVATE_KEY_LENGTH, PUBLIC_KEY_LENGTH, SECRET_PHRASE_ENTROPY_BYTES,
    SIGNATURE_LENGTH,
};

/// A passphrase-derived signing keypair.
///
/// Deliberately not `Serialize` and not `Clone`: the way to get a second
/// copy of the key is to re-derive it from the passphrase.
///
/// # Examples
///
/// ```
/// use nxt_crypto::crypto::keys::KeyPair;
///
/// let keypair = KeyPair::from_passphrase("test");
/// let signature = keypair.sign(b"hello");
/// assert!(keypair.public_key().verify(b"hello", &signature));
/// ```
pub struct KeyPair {
    public: PublicKey,
    private: Scalar,
}

/// A 32-byte Curve25519 public key (Montgomery u-coordinate).
///
/// Serializes as a lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PublicKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

/// A 64-byte signature, `v ‖ h`.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Signature {
    v: [u8; 32],
    h: [u8; HASH_OUTPUT_LENGTH],
}

impl KeyPair {
    /// Derives the keypair for a passphrase: `keygen(SHA256(UTF8(passphrase)))`.
    pub fn from_passphrase(passphrase: &str) -> Self {
        Self::from_seed(&sha256(passphrase.as_bytes()))
    }

    /// Derives a keypair from 32 bytes of key material.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let generated = curve::keygen(seed);
        Self {
            public: PublicKey::from_bytes(generated.public),
            private: generated.private,
        }
    }

    /// Returns the public half.
    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    /// Signs `message`. Deterministic: the same key and message always give
    /// the same signature.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let m = sha256(message);
        let private: Zeroizing<[u8; PRIVATE_KEY_LENGTH]> =
            Zeroizing::new(self.private.to_bytes());
        let x = Zeroizing::new(sha256_concat(&[&m[..], &private[..]]));

        let commitment = curve::public_point(&x);
        let h = sha256_concat(&[&m[..], &commitment[..]]);
        let v = curve::sign(&h, &x, &self.private);
        Signature { v, h }
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.private.zeroize();
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyPair(pub={})", self.public.to_hex())
    }
}

// ---------------------------------------------------------------------------
// PublicKey
// ---------------------------------------------------------------------------

impl PublicKey {
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Parses exactly 64 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        Ok(Self {
            bytes: hex_to_array(s)?,
        })
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.bytes)
    }

    /// Checks `signature` over `message` against this key.
    ///
    /// Any malformed input (non-canonical scalar, a public key that is not
    /// on the curve) is simply `false`.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Some(commitment) = curve::verify(signature.v(), signature.h(), &self.bytes) else {
            return false;
        };
        let m = sha256(message);
        let h = sha256_concat(&[&m[..], &commitment[..]]);
        h[..].ct_eq(&signature.h()[..]).into()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.to_hex()
    }
}

impl TryFrom<String> for PublicKey {
    type Error = CodecError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        let mut v = [0u8; 32];
        let mut h = [0u8; HASH_OUTPUT_LENGTH];
        v.copy_from_slice(&bytes[..32]);
        h.copy_from_slice(&bytes[32..]);
        Self { v, h }
    }

    /// Parses exactly 128 hex characters.
    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        Ok(Self::from_bytes(hex_to_array(s)?))
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes[..32].copy_from_slice(&self.v);
        bytes[32..].copy_from_slice(&self.h);
        bytes
    }

    /// Response scalar, the first 32 bytes.
    pub fn v(&self) -> &[u8; 32] {
        &self.v
    }

    /// Challenge hash, the last 32 bytes.
    pub fn h(&self) -> &[u8; HASH_OUTPUT_LENGTH] {
        &self.h
    }

    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.to_bytes())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "Signature({}..{})", &hex[..8], &hex[hex.len() - 8..])
    }
}

impl From<Signature> for String {
    fn from(signature: Signature) -> Self {
        signature.to_hex()
    }
}

impl TryFrom<String> for Signature {
    type Error = CodecError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Public key for a passphrase.
///
/// ```
/// use nxt_crypto::derive_public_key;
///
/// assert_eq!(
///     derive_public_key("test").to_hex(),
///     "d9d5c57971eefb085e3abaf7a5a4a6cdb8185f30105583cdb09ad8f61886ec65"
/// );
/// ```
pub fn derive_public_key(passphrase: &str) -> PublicKey {
    KeyPair::from_passphrase(passphrase).public_key()
}

/// A fresh secret phrase: SHA-512 over 128 bytes from the OS RNG, as 128
/// lowercase hex characters.
pub fn generate_secret_phrase() -> String {
    let mut entropy = Zeroizing::new([0u8; SECRET_PHRASE_ENTROPY_BYTES]);
    OsRng.fill_bytes(&mut entropy[..]);
    let digest = Zeroizing::new(sha512(&entropy[..]));
    bytes_to_hex(&digest[..])
}
