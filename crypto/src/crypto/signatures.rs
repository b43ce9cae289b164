//! # Digital Signatures
//!
//! Passphrase-in, signature-out entry points over [`KeyPair`], plus hex
//! variants for callers that pass messages around as hex strings.
//!
//! Message hex goes through [`hex_to_bytes`](crate::codec::hex_to_bytes),
//! including its short-input zero pad. Fixed-size fields (public key,
//! signature) are parsed strictly.

use thiserror::Error;
use tracing::trace;

use super::keys::{KeyPair, PublicKey, Signature};
use crate::codec::{bytes_to_hex, hex_to_bytes, CodecError};

/// Errors from the hex entry points. Verification failure itself is never
/// an error; it is `false`.
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("invalid hex encoding: {0}")]
    Encoding(#[from] CodecError),

    #[error("invalid {what} length: expected {expected} bytes, got {got}")]
    InvalidLength {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}

impl SignatureError {
    fn for_field(what: &'static str, err: CodecError) -> Self {
        match err {
            CodecError::InvalidLength { expected, got } => Self::InvalidLength {
                what,
                expected,
                got,
            },
            other => Self::Encoding(other),
        }
    }
}

/// Signs `message` with the key derived from `passphrase`.
///
/// # Example
///
/// ```
/// use nxt_crypto::{derive_public_key, sign, verify};
///
/// let signature = sign(b"test", "test");
/// assert!(verify(&signature, b"test", &derive_public_key("test")));
/// ```
pub fn sign(message: &[u8], passphrase: &str) -> Signature {
    KeyPair::from_passphrase(passphrase).sign(message)
}

/// Verifies `signature` over `message` against `public_key`.
pub fn verify(signature: &Signature, message: &[u8], public_key: &PublicKey) -> bool {
    public_key.verify(message, signature)
}

/// Signs hex-encoded message bytes, returning 128 hex characters.
pub fn sign_hex(message_hex: &str, passphrase: &str) -> Result<String, SignatureError> {
    let message = hex_to_bytes(message_hex)?;
    Ok(sign(&message, passphrase).to_hex())
}

/// Hex counterpart of [`verify`].
///
/// Malformed hex or a wrong-length signature/public key is an error; a
/// well-formed signature that doesn't verify is `Ok(false)`.
pub fn verify_hex(
    signature_hex: &str,
    message_hex: &str,
    public_key_hex: &str,
) -> Result<bool, SignatureError> {
    let signature =
        Signature::from_hex(signature_hex).map_err(|e| SignatureError::for_field("signature", e))?;
    let public_key = PublicKey::from_hex(public_key_hex)
        .map_err(|e| SignatureError::for_field("public key", e))?;
    let message = hex_to_bytes(message_hex)?;

    let valid = verify(&signature, &message, &public_key);
    trace!(
        public_key = %public_key,
        message = %bytes_to_hex(&message),
        valid,
        "verified hex message"
    );
    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::derive_public_key;
    use proptest::prelude::*;

    const TEST_PUBLIC_KEY: &str =
        "d9d5c57971eefb085e3abaf7a5a4a6cdb8185f30105583cdb09ad8f61886ec65";

    #[test]
    fn test_sign_then_verify() {
        let signature = sign(b"test", "test");
        assert!(verify(&signature, b"test", &derive_public_key("test")));
    }

    #[test]
    fn test_sign_hex_matches_raw_bytes_above_pad_threshold() {
        let message = b"five+ bytes";
        assert_eq!(
            sign_hex(&bytes_to_hex(message), "test").unwrap(),
            sign(message, "test").to_hex()
        );
    }

    #[test]
    fn test_sign_hex_covers_padded_short_message() {
        // "74657374" decodes to 00 74 65 73 74, so the leading zero is signed.
        let signature = sign_hex("74657374", "test").unwrap();
        assert_eq!(signature, sign(&[0, 0x74, 0x65, 0x73, 0x74], "test").to_hex());
        assert_ne!(signature, sign(b"test", "test").to_hex());
    }

    #[test]
    fn test_verify_hex_round_trip() {
        let message_hex = bytes_to_hex(b"some payload");
        let signature = sign_hex(&message_hex, "test").unwrap();
        assert!(verify_hex(&signature, &message_hex, TEST_PUBLIC_KEY).unwrap());
        assert!(!verify_hex(&signature, &bytes_to_hex(b"other payload"), TEST_PUBLIC_KEY).unwrap());
    }

    #[test]
    fn test_verify_hex_reports_bad_lengths() {
        let signature = sign(b"x", "test").to_hex();
        let err = verify_hex(&signature[..126], "00", TEST_PUBLIC_KEY).unwrap_err();
        assert!(matches!(
            err,
            SignatureError::InvalidLength { what: "signature", expected: 64, .. }
        ));

        let err = verify_hex(&signature, "00", &TEST_PUBLIC_KEY[..60]).unwrap_err();
        assert!(matches!(
            err,
            SignatureError::InvalidLength { what: "public key", expected: 32, .. }
        ));
    }

    #[test]
    fn test_hex_entry_points_reject_non_hex() {
        assert!(matches!(sign_hex("not hex", "test"), Err(SignatureError::Encoding(_))));
        let signature = sign(b"x", "test").to_hex();
        assert!(verify_hex(&signature, "zz", TEST_PUBLIC_KEY).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn sign_verify_round_trip(
            message in prop::collection::vec(any::<u8>(), 0..256),
            passphrase in "[ -~]{0,40}",
        ) {
            let signature = sign(&message, &passphrase);
            prop_assert!(verify(&signature, &message, &derive_public_key(&passphrase)));
        }
    }
}
