//! # Hashing Utilities
//!
//! SHA-256 drives everything in the signing protocol: passphrase seeds,
//! message digests, the ephemeral scalar, the challenge, account ids and
//! the secretbox key. SHA-512 only appears in secret-phrase generation.

use sha2::{Digest, Sha256, Sha512};

use crate::codec::bytes_to_hex;

/// SHA-256 of `data` as a fixed-size array.
///
/// # Example
///
/// ```
/// use nxt_crypto::crypto::hash::sha256;
///
/// let hash = sha256(b"test");
/// assert_eq!(hash[0], 0x9f);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&Sha256::digest(data));
    output
}

/// SHA-256 over the concatenation of several parts, without building the
/// concatenated buffer.
///
/// `sha256_concat(&[a, b]) == sha256(&[a, b].concat())`.
pub fn sha256_concat(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// SHA-256 of the UTF-8 bytes of `input`, as 64 lowercase hex characters.
///
/// ```
/// use nxt_crypto::sha256_hex;
///
/// assert_eq!(
///     sha256_hex("test"),
///     "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
/// );
/// ```
pub fn sha256_hex(input: &str) -> String {
    bytes_to_hex(&sha256(input.as_bytes()))
}

/// SHA-512 of `data`.
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let mut output = [0u8; 64];
    output.copy_from_slice(&Sha512::digest(data));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex("test"),
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_is_64_chars() {
        for input in ["", "a", "a much longer input string with ünïcode"] {
            let digest = sha256_hex(input);
            assert_eq!(digest.len(), 64);
            assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn test_sha256_concat_matches_joined_input() {
        let a = b"message digest";
        let b = [7u8; 32];
        assert_eq!(sha256_concat(&[&a[..], &b[..]]), sha256(&[&a[..], &b[..]].concat()));
        assert_eq!(sha256_concat(&[]), sha256(b""));
    }

    #[test]
    fn test_sha512_length_and_determinism() {
        let first = sha512(b"entropy");
        assert_eq!(first.len(), 64);
        assert_eq!(first, sha512(b"entropy"));
        assert_ne!(first, sha512(b"entropy!"));
    }
}
