// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # NXT Crypto: Core Library
//!
//! Client-side cryptography for an NXT-style ledger: everything a wallet
//! needs to turn a passphrase into an account, prove it holds that
//! passphrase, and produce payment bytes a node will accept. No network,
//! no storage, no ledger state.
//!
//! ## Architecture
//!
//! Data flows strictly downward:
//!
//! - **codec**: hex, UTF-8, little-endian and big-integer conversions.
//! - **crypto**: passphrase keypairs, Curve25519 KCDSA signatures,
//!   secretbox encryption, hashing.
//! - **identity**: account ids and Reed-Solomon addresses.
//! - **token**: 160-character signed authentication tokens.
//! - **transaction**: the 176-byte signed payment format.
//! - **config**: protocol constants, the epoch, the clock.
//!
//! ## Quick tour
//!
//! ```
//! use nxt_crypto::{account_address_from_passphrase, derive_public_key, sign, verify};
//!
//! let address = account_address_from_passphrase("test", "NXT");
//! assert_eq!(address, "NXT-E8JD-FHKJ-CQ9H-5KGMQ");
//!
//! let signature = sign(b"hello", "test");
//! assert!(verify(&signature, b"hello", &derive_public_key("test")));
//! ```
//!
//! Every function here is pure apart from the clock and the RNG behind
//! secret phrases and nonces, and all of them are safe to call from any
//! thread.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod identity;
pub mod token;
pub mod transaction;

pub use config::{ConfigError, ProtocolConfig};
pub use crypto::{
    decrypt, derive_public_key, encrypt, generate_secret_phrase, open, sha256_hex, sign,
    sign_hex, verify, verify_hex, CipherError, EncryptedInput, EncryptedMessage, KeyPair,
    PublicKey, Signature, SignatureError,
};
pub use identity::{
    account_address, account_address_from_passphrase, account_address_hex, account_id,
    account_id_hex, Account, AddressError,
};
pub use token::{generate_token, generate_token_at, parse_token, TokenError, TokenVerification};
pub use transaction::{generate_transaction_bytes, TransactionError};
