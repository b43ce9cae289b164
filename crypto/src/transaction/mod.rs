//! # Transaction Module
//!
//! Builds and signs ordinary-payment transactions in the 176-byte wire
//! format.
//!
//! ## Architecture
//!
//! ```text
//! types.rs    TransactionType, Recipient, amount parsing
//! builder.rs  TransferBuilder -> UnsignedTransaction (96-byte layout)
//! signing.rs  sign_transaction -> SignedTransaction (176 bytes)
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: [`TransferBuilder`] lays out the header and payment fields.
//! 2. **Sign**: [`sign_transaction`] signs the layout with the signature
//!    slot zeroed, then appends the signature and a zero trailer.
//! 3. **Broadcast**: the hex of the signed bytes is what a node accepts.
//!    Submitting it is outside this crate.
//!
//! [`generate_transaction_bytes`] runs all three steps from plain strings.

pub mod builder;
pub mod signing;
pub mod types;

use num_bigint::BigUint;
use thiserror::Error;

use crate::codec::CodecError;
use crate::config::ProtocolConfig;
use crate::crypto::keys::KeyPair;
use crate::identity::AddressError;

pub use builder::{TransferBuilder, UnsignedTransaction};
pub use signing::{sign_transaction, sign_transaction_with, SignedTransaction};
pub use types::{parse_nqt, Recipient, TransactionType};

/// Errors from building or signing a transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("invalid recipient: {0}")]
    Recipient(#[from] AddressError),

    #[error("field encoding failed: {0}")]
    Encoding(#[from] CodecError),

    #[error("invalid amount {0:?}: expected a non-negative decimal integer")]
    InvalidAmount(String),

    #[error("cannot timestamp transaction: {0}")]
    Clock(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("passphrase does not control the sender key")]
    SenderMismatch,

    #[error("transaction must be {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
}

/// Builds and signs a payment, returning the hex of the 176-byte blob.
///
/// `recipient` is a Reed-Solomon address (any prefix) or a decimal account
/// id. The timestamp comes from `config`'s clock.
///
/// ```
/// use nxt_crypto::config::ProtocolConfig;
/// use nxt_crypto::generate_transaction_bytes;
///
/// let config = ProtocolConfig::with_fixed_time(1_494_481_510_847);
/// let hex = generate_transaction_bytes(
///     "NXT-E8JD-FHKJ-CQ9H-5KGMQ",
///     100_000_000u64,
///     100_000_000u64,
///     "test",
///     &config,
/// )
/// .unwrap();
/// assert_eq!(hex.len(), 352);
/// ```
pub fn generate_transaction_bytes(
    recipient: &str,
    amount_nqt: impl Into<BigUint>,
    fee_nqt: impl Into<BigUint>,
    passphrase: &str,
    config: &ProtocolConfig,
) -> Result<String, TransactionError> {
    let recipient: Recipient = recipient.parse()?;
    let keypair = KeyPair::from_passphrase(passphrase);

    let unsigned = TransferBuilder::new()
        .sender(keypair.public_key())
        .recipient(recipient)
        .amount(amount_nqt)
        .fee(fee_nqt)
        .build(config)?;

    Ok(sign_transaction_with(&unsigned, &keypair)?.to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXED_TIME_MS: u64 = 1_494_481_510_847;
    const KNOWN_TRANSACTION: &str = "001026108206a005d9d5c57971eefb085e3abaf7a5a4a6cdb8185f30105583cdb09ad8f61886ec650b1a06e36bd14d3b00e1f5050000000000e1f505000000000000000000000000000000000000000000000000000000000000000000000000f96bd0c7c46d1bd7a94d9e0da17ff26b0bc916524e33f132f1f30ff410d2890efdbc8fe2ba303c5d8940b70b13a08d89e9e5c070f1b3221675bfeabe1f8250bb00000000000000000000000000000000";

    #[test]
    fn test_known_transaction_bytes() {
        let config = ProtocolConfig::with_fixed_time(FIXED_TIME_MS);
        let hex = generate_transaction_bytes(
            "NXT-E8JD-FHKJ-CQ9H-5KGMQ",
            100_000_000u64,
            100_000_000u64,
            "test",
            &config,
        )
        .unwrap();
        assert_eq!(hex, KNOWN_TRANSACTION);
    }

    #[test]
    fn test_numeric_recipient_matches_address() {
        let config = ProtocolConfig::with_fixed_time(FIXED_TIME_MS);
        let hex = generate_transaction_bytes(
            "4273301882745002507",
            100_000_000u64,
            100_000_000u64,
            "test",
            &config,
        )
        .unwrap();
        assert_eq!(hex, KNOWN_TRANSACTION);
    }

    #[test]
    fn test_known_transaction_verifies() {
        let signed = SignedTransaction::from_hex(KNOWN_TRANSACTION).unwrap();
        assert!(signed.verify());
        assert_eq!(signed.unsigned().timestamp(), 109_187_110);
    }

    #[test]
    fn test_bad_recipient() {
        let err = generate_transaction_bytes(
            "NXT-E8JD-FHKJ-CQ9H-5KGMR",
            1u64,
            1u64,
            "test",
            &ProtocolConfig::with_fixed_time(FIXED_TIME_MS),
        )
        .unwrap_err();
        assert!(matches!(err, TransactionError::Recipient(AddressError::ChecksumMismatch)));
    }

    #[test]
    fn test_fee_overflow() {
        let err = generate_transaction_bytes(
            "4273301882745002507",
            1u64,
            BigUint::from(1u8) << 64u32,
            "test",
            &ProtocolConfig::with_fixed_time(FIXED_TIME_MS),
        )
        .unwrap_err();
        assert!(matches!(err, TransactionError::Encoding(CodecError::Overflow { .. })));
    }
}
