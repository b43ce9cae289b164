//! # Protocol Configuration & Constants
//!
//! Every wire-format number lives here: key and signature lengths, the
//! network epoch, the token geometry, the transaction header bytes. These
//! values are fixed by the network we interoperate with, so they are not
//! tunable. Changing one of them produces bytes the network will reject.
//!
//! The handful of things that *are* caller choices (the epoch, the address
//! prefix and the clock) travel in a [`ProtocolConfig`] value instead of
//! hiding behind default arguments.

use chrono::Utc;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Key Material
// ---------------------------------------------------------------------------

/// Curve25519 public keys are a 32-byte little-endian u-coordinate.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Private signing scalars are 32 bytes, little-endian, reduced mod ℓ.
pub const PRIVATE_KEY_LENGTH: usize = 32;

/// Signatures are `v ‖ h`: a 32-byte response scalar followed by a
/// 32-byte SHA-256 challenge.
pub const SIGNATURE_LENGTH: usize = 64;

/// SHA-256 digest length.
pub const HASH_OUTPUT_LENGTH: usize = 32;

/// Number of OS-random bytes hashed into a fresh secret phrase.
pub const SECRET_PHRASE_ENTROPY_BYTES: usize = 128;

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// Genesis of the network clock: 2013-11-24 12:00:00 UTC, in milliseconds.
/// Token and transaction timestamps count seconds from here.
pub const EPOCH_BEGINNING_MS: u64 = 1_385_294_400_000;

/// Default human-readable prefix of Reed-Solomon account addresses.
pub const DEFAULT_ACCOUNT_PREFIX: &str = "NXT";

/// Number of leading SHA-256(public key) bytes that form the account id.
pub const ACCOUNT_ID_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// Raw token size: public key (32) + timestamp (4) + signature (64).
pub const TOKEN_BYTES: usize = PUBLIC_KEY_LENGTH + 4 + SIGNATURE_LENGTH;

/// Bytes packed into one base-32 group.
pub const TOKEN_GROUP_BYTES: usize = 5;

/// Characters per base-32 group. 40 bits fit exactly in 8 base-32 digits.
pub const TOKEN_GROUP_CHARS: usize = 8;

/// Encoded token length: 20 groups of 8 characters.
pub const TOKEN_LENGTH: usize = TOKEN_BYTES / TOKEN_GROUP_BYTES * TOKEN_GROUP_CHARS;

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// Transaction type byte for an ordinary payment.
pub const TX_TYPE_PAYMENT: u8 = 0;

/// Payment subtype. Shares a byte with the version nibble.
pub const TX_SUBTYPE_ORDINARY_PAYMENT: u8 = 0;

/// Transaction format version, stored in the high nibble of byte 1.
pub const TX_VERSION: u8 = 1;

/// Deadline in minutes after the timestamp. Serialized as u16 LE (`a0 05`).
pub const TX_DEADLINE_MINUTES: u16 = 1440;

/// Width of the recipient / amount / fee fields.
pub const TX_AMOUNT_WIDTH: usize = 8;

/// Zeroed referenced-transaction full hash.
pub const TX_REFERENCED_HASH_LENGTH: usize = 32;

/// Zeroed trailer after the signature (flags, EC block height and id).
pub const TX_TRAILER_LENGTH: usize = 16;

/// Bytes before the signature slot.
pub const TX_UNSIGNED_LENGTH: usize = 1 + 1 + 4 + 2 + PUBLIC_KEY_LENGTH + 3 * TX_AMOUNT_WIDTH
    + TX_REFERENCED_HASH_LENGTH;

/// Full signed transaction size.
pub const TX_SIGNED_LENGTH: usize = TX_UNSIGNED_LENGTH + SIGNATURE_LENGTH + TX_TRAILER_LENGTH;

// ---------------------------------------------------------------------------
// Secretbox
// ---------------------------------------------------------------------------

/// XSalsa20-Poly1305 key length.
pub const SECRETBOX_KEY_LENGTH: usize = 32;

/// XSalsa20-Poly1305 nonce length. 24 bytes, large enough for random nonces.
pub const SECRETBOX_NONCE_LENGTH: usize = 24;

/// Poly1305 tag length, prepended to the ciphertext NaCl-style.
pub const SECRETBOX_TAG_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Environment overrides
// ---------------------------------------------------------------------------

/// Pins the clock to a fixed Unix time in milliseconds. Meant for tests that
/// need reproducible transaction bytes.
pub const ENV_FIXED_TIME_MS: &str = "NXT_FIXED_TIME_MS";

/// Overrides [`EPOCH_BEGINNING_MS`].
pub const ENV_EPOCH_MS: &str = "NXT_EPOCH_MS";

/// Overrides [`DEFAULT_ACCOUNT_PREFIX`].
pub const ENV_ACCOUNT_PREFIX: &str = "NXT_ACCOUNT_PREFIX";

/// Errors raised while reading configuration overrides.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {name} is not a valid integer: {value:?}")]
    InvalidInteger { name: &'static str, value: String },

    #[error("account prefix must be non-empty ASCII alphanumerics, got {0:?}")]
    InvalidPrefix(String),
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of "now" for tokens and transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// Wall-clock time from the operating system.
    #[default]
    System,
    /// A frozen Unix time in milliseconds.
    Fixed(u64),
}

impl Clock {
    /// Current Unix time in milliseconds. A system clock set before 1970
    /// reads as zero.
    pub fn now_ms(&self) -> u64 {
        match self {
            Clock::System => u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0),
            Clock::Fixed(ms) => *ms,
        }
    }
}

/// Converts a Unix time in milliseconds to whole seconds since the epoch.
///
/// Both sides are floored to seconds before subtracting. Returns `None` if
/// `now_ms` precedes the epoch.
pub fn seconds_since_epoch(now_ms: u64, epoch_ms: u64) -> Option<u64> {
    (now_ms / 1000).checked_sub(epoch_ms / 1000)
}

// ---------------------------------------------------------------------------
// ProtocolConfig
// ---------------------------------------------------------------------------

/// Caller-selectable protocol parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolConfig {
    /// Network epoch in Unix milliseconds.
    pub epoch_ms: u64,
    /// Prefix rendered in front of Reed-Solomon addresses.
    pub account_prefix: String,
    /// Where timestamps come from.
    pub clock: Clock,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            epoch_ms: EPOCH_BEGINNING_MS,
            account_prefix: DEFAULT_ACCOUNT_PREFIX.to_string(),
            clock: Clock::System,
        }
    }
}

impl ProtocolConfig {
    /// Defaults with the clock frozen at `now_ms`.
    pub fn with_fixed_time(now_ms: u64) -> Self {
        Self {
            clock: Clock::Fixed(now_ms),
            ..Self::default()
        }
    }

    /// Replaces the account prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.account_prefix = prefix.into();
        self
    }

    /// Defaults, overridden by `NXT_FIXED_TIME_MS`, `NXT_EPOCH_MS` and
    /// `NXT_ACCOUNT_PREFIX` when those are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable
    /// source, so tests don't have to mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_FIXED_TIME_MS) {
            config.clock = Clock::Fixed(parse_u64(ENV_FIXED_TIME_MS, &value)?);
        }
        if let Some(value) = lookup(ENV_EPOCH_MS) {
            config.epoch_ms = parse_u64(ENV_EPOCH_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_ACCOUNT_PREFIX) {
            validate_prefix(&value)?;
            config.account_prefix = value;
        }

        Ok(config)
    }

    /// Seconds elapsed since the configured epoch according to the clock.
    pub fn epoch_seconds(&self) -> Option<u64> {
        seconds_since_epoch(self.clock.now_ms(), self.epoch_ms)
    }
}

/// Checks that an address prefix is plain ASCII alphanumerics.
pub fn validate_prefix(prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

fn parse_u64(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidInteger {
            name,
            value: value.to_string(),
        })
}
