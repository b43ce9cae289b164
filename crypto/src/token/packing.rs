//! Base-32 packing of the 100-byte token body.
//!
//! The body is cut into 20 groups of 5 bytes. Each group is read as a
//! little-endian 40-bit integer and written as exactly 8 base-32 digits
//! (`0-9a-v`, most significant first). Decoding reverses that: 8 digits
//! back to 40 bits, then 5 little-endian bytes.

use super::TokenError;
use crate::config::{TOKEN_BYTES, TOKEN_GROUP_BYTES, TOKEN_GROUP_CHARS, TOKEN_LENGTH};

const DIGITS: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";

/// Packs a token body into its 160-character form.
pub fn pack(body: &[u8; TOKEN_BYTES]) -> String {
    let mut out = String::with_capacity(TOKEN_LENGTH);
    for group in body.chunks_exact(TOKEN_GROUP_BYTES) {
        let value = group
            .iter()
            .rev()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
        for k in (0..TOKEN_GROUP_CHARS).rev() {
            out.push(DIGITS[((value >> (5 * k)) & 31) as usize] as char);
        }
    }
    out
}

/// Unpacks a 160-character token. Digits are case-insensitive.
pub fn unpack(token: &str) -> Result<[u8; TOKEN_BYTES], TokenError> {
    if token.len() != TOKEN_LENGTH || !token.is_ascii() {
        return Err(TokenError::Malformed(format!(
            "expected {TOKEN_LENGTH} ASCII characters, got {} bytes",
            token.len()
        )));
    }

    let mut body = [0u8; TOKEN_BYTES];
    let groups = token.as_bytes().chunks_exact(TOKEN_GROUP_CHARS);
    for (index, (digits, out)) in groups
        .zip(body.chunks_exact_mut(TOKEN_GROUP_BYTES))
        .enumerate()
    {
        let mut value = 0u64;
        for (offset, &c) in digits.iter().enumerate() {
            let digit = (c as char).to_digit(32).ok_or_else(|| {
                TokenError::Malformed(format!(
                    "invalid character {:?} at position {}",
                    c as char,
                    index * TOKEN_GROUP_CHARS + offset
                ))
            })?;
            value = (value << 5) | u64::from(digit);
        }
        out.copy_from_slice(&value.to_le_bytes()[..TOKEN_GROUP_BYTES]);
    }
    Ok(body)
}
