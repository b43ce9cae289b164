//! Byte-level conversions shared by every other module.
//!
//! Hex, UTF-8, little-endian integers and arbitrary-precision integers. The
//! token and transaction formats are defined in terms of these exact
//! conversions, so a few of them keep behavior that would look odd in a
//! general-purpose library (see [`hex_to_bytes`]).

use num_bigint::BigUint;

use super::CodecError;

/// Lowercase hex digits, indexed by nibble value.
const NIBBLE_TO_CHAR: &[u8; 16] = b"0123456789abcdef";

/// Decoded sequences shorter than this get one leading zero byte.
const HEX_PAD_THRESHOLD: usize = 5;

/// Reconstructs an integer from little-endian bytes: `Σ b[i]·256^i`.
///
/// Accepts up to 8 bytes. Longer input cannot be represented and is an
/// [`CodecError::Overflow`].
pub fn bytes_to_unsigned_int(bytes: &[u8]) -> Result<u64, CodecError> {
    if bytes.len() > 8 {
        return Err(CodecError::Overflow {
            width: 8,
            needed: bytes.len(),
        });
    }
    Ok(bytes
        .iter()
        .rev()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}

/// Encodes bytes as lowercase hex, two characters per byte.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(NIBBLE_TO_CHAR[usize::from(b >> 4)] as char);
        out.push(NIBBLE_TO_CHAR[usize::from(b & 0x0f)] as char);
    }
    out
}

/// Decodes a hex string into bytes.
///
/// Two deliberate departures from a plain hex decoder:
///
/// - Odd-length input is accepted; the first character becomes a byte on
///   its own (`"abc"` → `[0x0a, 0xbc]`).
/// - If the result is shorter than 5 bytes, a single zero byte is prepended
///   (`"ff"` → `[0x00, 0xff]`). Message hex handed to the signer goes
///   through this path, so signatures over short hex messages cover the
///   padded bytes.
///
/// Both cases are part of the observed wire behavior and must not be
/// "fixed". Characters outside `[0-9a-fA-F]` are rejected.
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, CodecError> {
    check_hex_digits(s)?;
    let digits = s.as_bytes();
    let mut out = Vec::with_capacity(digits.len() / 2 + 2);
    let mut i = 0;

    if digits.len() % 2 != 0 {
        out.push(nibble(digits[0], 0)?);
        i = 1;
    }
    while i + 1 < digits.len() {
        let hi = nibble(digits[i], i)?;
        let lo = nibble(digits[i + 1], i + 1)?;
        out.push((hi << 4) | lo);
        i += 2;
    }

    if out.len() < HEX_PAD_THRESHOLD {
        out.insert(0, 0);
    }
    Ok(out)
}

/// Strict variant for fixed-size fields: plain hex, exact byte count, no
/// padding quirk.
pub fn hex_to_array<const N: usize>(s: &str) -> Result<[u8; N], CodecError> {
    check_hex_digits(s)?;
    let bytes = hex::decode(s).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { c, index } => {
            CodecError::InvalidHexCharacter { character: c, index }
        }
        _ => CodecError::InvalidLength {
            expected: N,
            got: s.len() / 2,
        },
    })?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| CodecError::InvalidLength {
            expected: N,
            got: bytes.len(),
        })
}

/// UTF-8 bytes of a string.
pub fn string_to_bytes(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

/// Hex of the UTF-8 bytes of a string.
pub fn string_to_hex(s: &str) -> String {
    bytes_to_hex(s.as_bytes())
}

/// Folds little-endian bytes into an arbitrary-precision integer.
///
/// Walks from the last (most significant) byte down to index 0,
/// accumulating `value = value·256 + b[i]`.
pub fn bytes_to_big_unsigned(bytes: &[u8]) -> BigUint {
    bytes.iter().rev().fold(BigUint::default(), |value, &b| {
        (value << 8u32) + BigUint::from(b)
    })
}

/// Encodes `n` into exactly `width` little-endian bytes, zero-padded.
///
/// A magnitude that needs more than `width` bytes is an overflow error.
/// There is no sign byte to strip: `BigUint` carries magnitude only, which
/// is what the 9th-byte trimming in the wire format amounts to.
pub fn fixed_width_le_bytes(n: &BigUint, width: usize) -> Result<Vec<u8>, CodecError> {
    let mut bytes = n.to_bytes_le();
    // BigUint renders zero as a single 0x00 byte.
    while bytes.len() > 1 && bytes.last() == Some(&0) {
        bytes.pop();
    }
    if bytes.len() > width {
        return Err(CodecError::Overflow {
            width,
            needed: bytes.len(),
        });
    }
    bytes.resize(width, 0);
    Ok(bytes)
}

/// Rejects the first character outside `[0-9a-fA-F]`, reporting the whole
/// character and its byte offset. Everything after this is plain ASCII.
fn check_hex_digits(s: &str) -> Result<(), CodecError> {
    match s.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
        Some((index, character)) => Err(CodecError::InvalidHexCharacter { character, index }),
        None => Ok(()),
    }
}

fn nibble(c: u8, index: usize) -> Result<u8, CodecError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(CodecError::InvalidHexCharacter {
            character: char::from(c),
            index,
        }),
    }
}
