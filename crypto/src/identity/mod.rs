//! # Identity Module
//!
//! Accounts as the network sees them. A public key hashes down to a 64-bit
//! account id, and the id renders as a checksummed Reed-Solomon address
//! that people can read aloud and type back without silent mistakes.
//!
//! 1. **Account** ([`account`]) derives ids and addresses from keys.
//! 2. **Reed-Solomon** ([`reed_solomon`]) handles the address encoding over GF(32).
//!
//! The address prefix (`NXT` by default) is cosmetic. The checksum covers
//! only the id, so the same account renders as `NXT-…` or `DBN-…` with an
//! identical body.

pub mod account;
pub mod reed_solomon;

pub use account::{
    account_address, account_address_from_passphrase, account_address_hex, account_id,
    account_id_hex, Account,
};
pub use reed_solomon::AddressError;
