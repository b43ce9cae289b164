//! # Byte Codec
//!
//! Lossless conversions between byte sequences, hex strings, UTF-8 strings,
//! fixed-width little-endian integers and arbitrary-precision integers.
//! Everything above this module speaks in terms of these conversions.
//!
//! Malformed input is reported, not papered over: a stray non-hex character
//! or a number that doesn't fit its field is a [`CodecError`].

pub mod bytes;

use thiserror::Error;

pub use bytes::{
    bytes_to_big_unsigned, bytes_to_hex, bytes_to_unsigned_int, fixed_width_le_bytes,
    hex_to_array, hex_to_bytes, string_to_bytes, string_to_hex,
};

/// Errors raised by byte-level conversions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A character outside `[0-9a-fA-F]` in hex input.
    #[error("invalid hex character {character:?} at index {index}")]
    InvalidHexCharacter { character: char, index: usize },

    /// A value needs more bytes than its field provides.
    #[error("value needs {needed} bytes but the field is {width} bytes wide")]
    Overflow { width: usize, needed: usize },

    /// Decoded input has the wrong size for a fixed-length field.
    #[error("expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
}
