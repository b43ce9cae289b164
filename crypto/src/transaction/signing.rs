//! Transaction signing.
//!
//! Signing is a separate step from building so the layout can be inspected
//! (and tested) without key material. The signature covers the unsigned
//! layout with the signature slot and trailer zeroed; the signed blob is
//! the layout with the signature and zero trailer appended.

use std::fmt;

use super::builder::UnsignedTransaction;
use super::TransactionError;
use crate::codec::{bytes_to_hex, hex_to_bytes};
use crate::config::{SIGNATURE_LENGTH, TX_SIGNED_LENGTH, TX_UNSIGNED_LENGTH};
use crate::crypto::keys::{KeyPair, Signature};

/// A complete 176-byte transaction.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SignedTransaction {
    bytes: [u8; TX_SIGNED_LENGTH],
}

impl SignedTransaction {
    /// Wraps raw bytes, checking only the length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let bytes = bytes
            .try_into()
            .map_err(|_| TransactionError::InvalidLength {
                expected: TX_SIGNED_LENGTH,
                got: bytes.len(),
            })?;
        Ok(Self { bytes })
    }

    pub fn from_hex(s: &str) -> Result<Self, TransactionError> {
        Self::from_bytes(&hex_to_bytes(s)?)
    }

    pub fn as_bytes(&self) -> &[u8; TX_SIGNED_LENGTH] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.bytes)
    }

    /// The unsigned layout this transaction was built from.
    pub fn unsigned(&self) -> UnsignedTransaction {
        let mut layout = [0u8; TX_UNSIGNED_LENGTH];
        layout.copy_from_slice(&self.bytes[..TX_UNSIGNED_LENGTH]);
        UnsignedTransaction::from_layout(layout)
    }

    pub fn signature(&self) -> Signature {
        let mut sig = [0u8; SIGNATURE_LENGTH];
        sig.copy_from_slice(&self.bytes[TX_UNSIGNED_LENGTH..TX_UNSIGNED_LENGTH + SIGNATURE_LENGTH]);
        Signature::from_bytes(sig)
    }

    /// Checks the embedded signature against the embedded sender key.
    pub fn verify(&self) -> bool {
        let unsigned = self.unsigned();
        unsigned
            .sender_public_key()
            .verify(&unsigned.signing_payload(), &self.signature())
    }
}

impl fmt::Display for SignedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for SignedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unsigned = self.unsigned();
        f.debug_struct("SignedTransaction")
            .field("sender", &unsigned.sender_public_key())
            .field("recipient", &unsigned.recipient_id())
            .field("amount_nqt", &unsigned.amount_nqt())
            .field("fee_nqt", &unsigned.fee_nqt())
            .field("timestamp", &unsigned.timestamp())
            .field("signature", &self.signature())
            .finish()
    }
}

/// Signs `unsigned` with the key derived from `passphrase`.
///
/// The passphrase must control the sender key in the layout; anything else
/// is [`TransactionError::SenderMismatch`].
pub fn sign_transaction(
    unsigned: &UnsignedTransaction,
    passphrase: &str,
) -> Result<SignedTransaction, TransactionError> {
    sign_transaction_with(unsigned, &KeyPair::from_passphrase(passphrase))
}

/// [`sign_transaction`] with an already-derived keypair.
pub fn sign_transaction_with(
    unsigned: &UnsignedTransaction,
    keypair: &KeyPair,
) -> Result<SignedTransaction, TransactionError> {
    if keypair.public_key() != unsigned.sender_public_key() {
        return Err(TransactionError::SenderMismatch);
    }

    let signature = keypair.sign(&unsigned.signing_payload());

    let mut bytes = [0u8; TX_SIGNED_LENGTH];
    bytes[..TX_UNSIGNED_LENGTH].copy_from_slice(unsigned.as_bytes());
    bytes[TX_UNSIGNED_LENGTH..TX_UNSIGNED_LENGTH + SIGNATURE_LENGTH]
        .copy_from_slice(&signature.to_bytes());
    // Trailer stays zero.
    Ok(SignedTransaction { bytes })
}
