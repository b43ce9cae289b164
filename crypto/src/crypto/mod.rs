//! # Cryptographic Primitives
//!
//! Everything key- and signature-related sits here:
//!
//! - **Curve25519 KCDSA** for signatures ([`curve`], [`keys`], [`signatures`]).
//! - **XSalsa20-Poly1305** secretbox for symmetric encryption.
//! - **SHA-256** for every derivation, **SHA-512** for secret phrases.
//!
//! The curve and cipher arithmetic comes from `curve25519-dalek`,
//! `x25519-dalek` and `crypto_secretbox`. What lives in this module is the
//! protocol glue: which bytes get hashed, in what order, and how the sign
//! conventions line up.

pub mod curve;
pub mod encryption;
pub mod hash;
pub mod keys;
pub mod signatures;

pub use encryption::{decrypt, encrypt, open, CipherError, EncryptedInput, EncryptedMessage};
pub use hash::{sha256, sha256_hex};
pub use keys::{derive_public_key, generate_secret_phrase, KeyPair, PublicKey, Signature};
pub use signatures::{sign, sign_hex, verify, verify_hex, SignatureError};
