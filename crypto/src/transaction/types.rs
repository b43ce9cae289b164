//! Core type definitions for transactions.
//!
//! Only ordinary payments are built here, but the type byte and subtype
//! nibble are kept as an enum so the header bytes have a single source.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use super::TransactionError;
use crate::config::{TX_SUBTYPE_ORDINARY_PAYMENT, TX_TYPE_PAYMENT};
use crate::identity::reed_solomon;
use crate::identity::AddressError;

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// Operation a transaction performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransactionType {
    /// Plain value transfer between two accounts.
    #[default]
    OrdinaryPayment,
}

impl TransactionType {
    /// Byte 0 of the layout.
    pub fn type_byte(&self) -> u8 {
        match self {
            Self::OrdinaryPayment => TX_TYPE_PAYMENT,
        }
    }

    /// Low nibble of byte 1.
    pub fn subtype(&self) -> u8 {
        match self {
            Self::OrdinaryPayment => TX_SUBTYPE_ORDINARY_PAYMENT,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrdinaryPayment => write!(f, "OrdinaryPayment"),
        }
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// A payment recipient, resolved to its account id.
///
/// Parses from either a Reed-Solomon address (`NXT-E8JD-FHKJ-CQ9H-5KGMQ`,
/// any prefix) or a plain decimal account id (`4273301882745002507`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Recipient(u64);

impl Recipient {
    pub fn from_id(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }

    /// Renders the recipient as an address under `prefix`.
    pub fn to_address(&self, prefix: &str) -> String {
        reed_solomon::encode(self.0, prefix)
    }
}

impl FromStr for Recipient {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed
                .parse::<u64>()
                .map(Self)
                .map_err(|_| AddressError::IdOutOfRange);
        }
        reed_solomon::decode(trimmed).map(Self)
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a decimal NQT amount of any size. Width is checked later, when
/// the value is laid out.
pub fn parse_nqt(s: &str) -> Result<BigUint, TransactionError> {
    BigUint::from_str(s.trim()).map_err(|_| TransactionError::InvalidAmount(s.to_string()))
}
