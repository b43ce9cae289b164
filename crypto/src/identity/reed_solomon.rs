//! # Reed-Solomon Account Addresses
//!
//! Encodes a 64-bit account id as `PREFIX-XXXX-XXXX-XXXX-XXXXX`: 13 base-32
//! data symbols plus 4 Reed-Solomon parity symbols over GF(32), shuffled
//! into display order and grouped with dashes.
//!
//! The code detects any single mistyped character and most transpositions,
//! which is the point: people copy these by hand.
//!
//! ## Symbols
//!
//! Each symbol is 5 bits, written with the alphabet
//! `23456789ABCDEFGHJKLMNPQRSTUVWXYZ` (no `0`, `1`, `I`, `O`). Data symbol
//! `i` holds bits `5i..5i+5` of the id, so 13 symbols cover 65 bits. An
//! address whose 65th bit is set does not name a valid account.

use thiserror::Error;

/// Address alphabet, indexed by symbol value.
const ALPHABET: &[u8; 32] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Display position → codeword index.
const CODEWORD_MAP: [usize; CODEWORD_LENGTH] = [3, 2, 1, 0, 7, 6, 5, 4, 13, 14, 15, 16, 12, 8, 9, 10, 11];

/// Data symbols per address.
const DATA_LENGTH: usize = 13;

/// Data plus parity symbols.
const CODEWORD_LENGTH: usize = 17;

/// Generator polynomial coefficients for the parity LFSR, lowest first.
const GENERATOR: [u8; 4] = [17, 9, 6, 30];

/// Errors from parsing an address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("address must have {expected} symbols, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid address character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("address checksum mismatch")]
    ChecksumMismatch,

    #[error("address encodes a value wider than 64 bits")]
    IdOutOfRange,
}

/// GF(32) with the primitive polynomial x^5 + x^2 + 1 and generator 2.
mod gf32 {
    const MODULUS: u8 = 0x25;

    /// EXP[i] = 2^i. EXP[31] wraps back to 1.
    const fn build_exp_table() -> [u8; 32] {
        let mut table = [0u8; 32];
        let mut val: u8 = 1;
        let mut i = 0;
        while i < 31 {
            table[i] = val;
            val <<= 1;
            if val >= 32 {
                val ^= MODULUS;
            }
            i += 1;
        }
        table[31] = table[0];
        table
    }

    /// LOG[EXP[i]] = i. LOG[0] is unused.
    const fn build_log_table() -> [u8; 32] {
        let exp = build_exp_table();
        let mut table = [0u8; 32];
        let mut i = 0;
        while i < 31 {
            table[exp[i] as usize] = i as u8;
            i += 1;
        }
        table
    }

    pub static EXP: [u8; 32] = build_exp_table();
    static LOG: [u8; 32] = build_log_table();

    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_sum = (LOG[a as usize] as usize + LOG[b as usize] as usize) % 31;
        EXP[log_sum]
    }
}

/// Renders `id` as an address with the given prefix.
///
/// ```
/// use nxt_crypto::identity::reed_solomon::encode;
///
/// assert_eq!(encode(4273301882745002507, "NXT"), "NXT-E8JD-FHKJ-CQ9H-5KGMQ");
/// ```
pub fn encode(id: u64, prefix: &str) -> String {
    let mut codeword = [0u8; CODEWORD_LENGTH];
    for (i, symbol) in codeword.iter_mut().take(DATA_LENGTH).enumerate() {
        // Shifts past bit 63 read as zero.
        *symbol = id.checked_shr(5 * i as u32).map_or(0, |v| (v & 31) as u8);
    }

    let mut parity = [0u8; 4];
    for i in (0..DATA_LENGTH).rev() {
        let feedback = codeword[i] ^ parity[3];
        parity[3] = parity[2] ^ gf32::mul(GENERATOR[3], feedback);
        parity[2] = parity[1] ^ gf32::mul(GENERATOR[2], feedback);
        parity[1] = parity[0] ^ gf32::mul(GENERATOR[1], feedback);
        parity[0] = gf32::mul(GENERATOR[0], feedback);
    }
    codeword[DATA_LENGTH..].copy_from_slice(&parity);

    let mut out = String::with_capacity(prefix.len() + 1 + CODEWORD_LENGTH + 3);
    out.push_str(prefix);
    out.push('-');
    for (i, &index) in CODEWORD_MAP.iter().enumerate() {
        out.push(ALPHABET[codeword[index] as usize] as char);
        if i & 3 == 3 && i < DATA_LENGTH {
            out.push('-');
        }
    }
    out
}

/// Parses an address back to its account id.
///
/// Case-insensitive. The prefix is optional and not checked against any
/// particular network; dashes inside the body are optional too.
pub fn decode(address: &str) -> Result<u64, AddressError> {
    let upper = address.trim().to_ascii_uppercase();
    let body = strip_prefix(&upper);

    let mut codeword = [0u8; CODEWORD_LENGTH];
    let mut count = 0;
    for (position, c) in body.chars().enumerate() {
        if c == '-' {
            continue;
        }
        let symbol = ALPHABET
            .iter()
            .position(|&a| a as char == c)
            .ok_or(AddressError::InvalidCharacter {
                character: c,
                position,
            })?;
        if count < CODEWORD_LENGTH {
            codeword[CODEWORD_MAP[count]] = symbol as u8;
        }
        count += 1;
    }
    if count != CODEWORD_LENGTH {
        return Err(AddressError::InvalidLength {
            expected: CODEWORD_LENGTH,
            got: count,
        });
    }

    if !is_codeword_valid(&codeword) {
        return Err(AddressError::ChecksumMismatch);
    }

    let mut id: u64 = 0;
    for i in (0..DATA_LENGTH).rev() {
        let symbol = u64::from(codeword[i]);
        if id.leading_zeros() < 5 {
            return Err(AddressError::IdOutOfRange);
        }
        id = (id << 5) | symbol;
    }
    Ok(id)
}

/// Drops a leading `PREFIX-` when the remainder alone holds a full
/// codeword's worth of symbols.
fn strip_prefix(address: &str) -> &str {
    let symbols = address.chars().filter(|&c| c != '-').count();
    if symbols > CODEWORD_LENGTH {
        if let Some((_, rest)) = address.split_once('-') {
            return rest;
        }
    }
    address
}

/// Evaluates the syndrome at α^1..α^4; all four must vanish.
fn is_codeword_valid(codeword: &[u8; CODEWORD_LENGTH]) -> bool {
    let mut sum = 0u8;
    for i in 1..5 {
        let mut t = 0u8;
        for j in 0..31 {
            // Positions 13..=26 are the implicit zero padding of the
            // shortened code; 27..=30 map back onto the parity symbols.
            if j > 12 && j < 27 {
                continue;
            }
            let pos = if j > 26 { j - 14 } else { j };
            t ^= gf32::mul(codeword[pos], gf32::EXP[(i * j) % 31]);
        }
        sum |= t;
    }
    sum == 0
}
