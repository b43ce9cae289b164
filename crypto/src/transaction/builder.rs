//! Transaction construction via the builder pattern.
//!
//! [`TransferBuilder`] collects the payment fields and lays them out into
//! an [`UnsignedTransaction`]: the first 96 bytes of the wire format. The
//! builder does not sign; that happens in [`super::signing`], which only
//! ever appends to these bytes.

use num_bigint::BigUint;
use tracing::debug;

use super::types::{Recipient, TransactionType};
use super::TransactionError;
use crate::codec::{bytes_to_hex, fixed_width_le_bytes};
use crate::config::{
    ProtocolConfig, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH, TX_AMOUNT_WIDTH, TX_DEADLINE_MINUTES,
    TX_TRAILER_LENGTH, TX_UNSIGNED_LENGTH, TX_VERSION,
};
use crate::crypto::keys::PublicKey;

// Field offsets within the unsigned layout.
const OFFSET_TYPE: usize = 0;
const OFFSET_VERSION_SUBTYPE: usize = 1;
const OFFSET_TIMESTAMP: usize = 2;
const OFFSET_DEADLINE: usize = 6;
const OFFSET_SENDER: usize = 8;
const OFFSET_RECIPIENT: usize = OFFSET_SENDER + PUBLIC_KEY_LENGTH;
const OFFSET_AMOUNT: usize = OFFSET_RECIPIENT + TX_AMOUNT_WIDTH;
const OFFSET_FEE: usize = OFFSET_AMOUNT + TX_AMOUNT_WIDTH;
const OFFSET_REFERENCED_HASH: usize = OFFSET_FEE + TX_AMOUNT_WIDTH;

// ---------------------------------------------------------------------------
// UnsignedTransaction
// ---------------------------------------------------------------------------

/// The 96-byte unsigned layout: header, sender key, recipient, amount, fee
/// and an all-zero referenced-transaction hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsignedTransaction {
    bytes: [u8; TX_UNSIGNED_LENGTH],
}

impl UnsignedTransaction {
    pub(crate) fn from_layout(bytes: [u8; TX_UNSIGNED_LENGTH]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; TX_UNSIGNED_LENGTH] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.bytes)
    }

    /// The bytes a signature covers: the layout followed by an all-zero
    /// signature slot and trailer.
    pub fn signing_payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(TX_UNSIGNED_LENGTH + SIGNATURE_LENGTH + TX_TRAILER_LENGTH);
        payload.extend_from_slice(&self.bytes);
        payload.resize(TX_UNSIGNED_LENGTH + SIGNATURE_LENGTH + TX_TRAILER_LENGTH, 0);
        payload
    }

    pub fn type_byte(&self) -> u8 {
        self.bytes[OFFSET_TYPE]
    }

    pub fn version(&self) -> u8 {
        self.bytes[OFFSET_VERSION_SUBTYPE] >> 4
    }

    pub fn subtype(&self) -> u8 {
        self.bytes[OFFSET_VERSION_SUBTYPE] & 0x0f
    }

    /// Seconds since the network epoch.
    pub fn timestamp(&self) -> u32 {
        u32::from_le_bytes(self.field(OFFSET_TIMESTAMP))
    }

    /// Deadline in minutes.
    pub fn deadline(&self) -> u16 {
        u16::from_le_bytes(self.field(OFFSET_DEADLINE))
    }

    pub fn sender_public_key(&self) -> PublicKey {
        PublicKey::from_bytes(self.field(OFFSET_SENDER))
    }

    pub fn recipient_id(&self) -> u64 {
        u64::from_le_bytes(self.field(OFFSET_RECIPIENT))
    }

    pub fn amount_nqt(&self) -> u64 {
        u64::from_le_bytes(self.field(OFFSET_AMOUNT))
    }

    pub fn fee_nqt(&self) -> u64 {
        u64::from_le_bytes(self.field(OFFSET_FEE))
    }

    fn field<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[offset..offset + N]);
        out
    }
}

// ---------------------------------------------------------------------------
// TransferBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`UnsignedTransaction`].
///
/// # Usage
///
/// ```
/// use nxt_crypto::config::ProtocolConfig;
/// use nxt_crypto::derive_public_key;
/// use nxt_crypto::transaction::TransferBuilder;
///
/// let unsigned = TransferBuilder::new()
///     .sender(derive_public_key("test"))
///     .recipient("NXT-E8JD-FHKJ-CQ9H-5KGMQ".parse().unwrap())
///     .amount(100_000_000u64)
///     .fee(100_000_000u64)
///     .build(&ProtocolConfig::with_fixed_time(1_494_481_510_847))
///     .unwrap();
///
/// assert_eq!(unsigned.timestamp(), 109_187_110);
/// ```
///
/// The timestamp comes from the config's clock unless set explicitly.
#[derive(Debug, Clone)]
pub struct TransferBuilder {
    tx_type: TransactionType,
    deadline: u16,
    timestamp: Option<u32>,
    sender: Option<PublicKey>,
    recipient: Option<Recipient>,
    amount: BigUint,
    fee: BigUint,
}

impl Default for TransferBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TransferBuilder {
    /// Defaults: ordinary payment, 1440-minute deadline, zero amount and
    /// fee, timestamp taken at build time.
    pub fn new() -> Self {
        Self {
            tx_type: TransactionType::OrdinaryPayment,
            deadline: TX_DEADLINE_MINUTES,
            timestamp: None,
            sender: None,
            recipient: None,
            amount: BigUint::default(),
            fee: BigUint::default(),
        }
    }

    pub fn sender(mut self, public_key: PublicKey) -> Self {
        self.sender = Some(public_key);
        self
    }

    pub fn recipient(mut self, recipient: Recipient) -> Self {
        self.recipient = Some(recipient);
        self
    }

    /// Amount in NQT. Must fit in 8 bytes by build time.
    pub fn amount(mut self, amount_nqt: impl Into<BigUint>) -> Self {
        self.amount = amount_nqt.into();
        self
    }

    /// Fee in NQT. Must fit in 8 bytes by build time.
    pub fn fee(mut self, fee_nqt: impl Into<BigUint>) -> Self {
        self.fee = fee_nqt.into();
        self
    }

    /// Fixes the epoch-relative timestamp instead of reading the clock.
    pub fn timestamp(mut self, seconds_since_epoch: u32) -> Self {
        self.timestamp = Some(seconds_since_epoch);
        self
    }

    pub fn deadline(mut self, minutes: u16) -> Self {
        self.deadline = minutes;
        self
    }

    /// Lays out the transaction.
    pub fn build(self, config: &ProtocolConfig) -> Result<UnsignedTransaction, TransactionError> {
        let sender = self.sender.ok_or(TransactionError::MissingField("sender"))?;
        let recipient = self
            .recipient
            .ok_or(TransactionError::MissingField("recipient"))?;
        let timestamp = match self.timestamp {
            Some(t) => t,
            None => epoch_timestamp(config)?,
        };

        let mut bytes = [0u8; TX_UNSIGNED_LENGTH];
        bytes[OFFSET_TYPE] = self.tx_type.type_byte();
        bytes[OFFSET_VERSION_SUBTYPE] = (TX_VERSION << 4) | self.tx_type.subtype();
        bytes[OFFSET_TIMESTAMP..OFFSET_DEADLINE].copy_from_slice(&timestamp.to_le_bytes());
        bytes[OFFSET_DEADLINE..OFFSET_SENDER].copy_from_slice(&self.deadline.to_le_bytes());
        bytes[OFFSET_SENDER..OFFSET_RECIPIENT].copy_from_slice(sender.as_bytes());
        bytes[OFFSET_RECIPIENT..OFFSET_AMOUNT].copy_from_slice(&recipient.id().to_le_bytes());
        bytes[OFFSET_AMOUNT..OFFSET_FEE]
            .copy_from_slice(&fixed_width_le_bytes(&self.amount, TX_AMOUNT_WIDTH)?);
        bytes[OFFSET_FEE..OFFSET_REFERENCED_HASH]
            .copy_from_slice(&fixed_width_le_bytes(&self.fee, TX_AMOUNT_WIDTH)?);
        // Referenced transaction hash stays zero.

        debug!(
            sender = %sender,
            recipient = recipient.id(),
            timestamp,
            "assembled unsigned transaction"
        );
        Ok(UnsignedTransaction::from_layout(bytes))
    }
}

fn epoch_timestamp(config: &ProtocolConfig) -> Result<u32, TransactionError> {
    let seconds = config
        .epoch_seconds()
        .ok_or_else(|| TransactionError::Clock("current time is before the network epoch".into()))?;
    u32::try_from(seconds)
        .map_err(|_| TransactionError::Clock(format!("timestamp {seconds} does not fit in 32 bits")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EPOCH_BEGINNING_MS;
    use crate::crypto::keys::derive_public_key;

    const FIXED_TIME_MS: u64 = 1_494_481_510_847;

    fn sample_builder() -> TransferBuilder {
        TransferBuilder::new()
            .sender(derive_public_key("test"))
            .recipient(Recipient::from_id(4_273_301_882_745_002_507))
            .amount(100_000_000u64)
            .fee(100_000_000u64)
    }

    #[test]
    fn test_known_layout() {
        let unsigned = sample_builder()
            .build(&ProtocolConfig::with_fixed_time(FIXED_TIME_MS))
            .unwrap();
        assert_eq!(
            unsigned.to_hex(),
            "001026108206a005d9d5c57971eefb085e3abaf7a5a4a6cdb8185f30105583cdb09ad8f61886ec65\
             0b1a06e36bd14d3b00e1f5050000000000e1f50500000000\
             0000000000000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_field_accessors() {
        let unsigned = sample_builder()
            .build(&ProtocolConfig::with_fixed_time(FIXED_TIME_MS))
            .unwrap();
        assert_eq!(unsigned.type_byte(), 0);
        assert_eq!(unsigned.version(), 1);
        assert_eq!(unsigned.subtype(), 0);
        assert_eq!(unsigned.timestamp(), 109_187_110);
        assert_eq!(unsigned.deadline(), 1440);
        assert_eq!(unsigned.sender_public_key(), derive_public_key("test"));
        assert_eq!(unsigned.recipient_id(), 4_273_301_882_745_002_507);
        assert_eq!(unsigned.amount_nqt(), 100_000_000);
        assert_eq!(unsigned.fee_nqt(), 100_000_000);
    }

    #[test]
    fn test_signing_payload_is_zero_extended() {
        let unsigned = sample_builder().timestamp(1).build(&ProtocolConfig::default()).unwrap();
        let payload = unsigned.signing_payload();
        assert_eq!(payload.len(), 176);
        assert_eq!(&payload[..96], unsigned.as_bytes());
        assert!(payload[96..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_explicit_timestamp_overrides_clock() {
        let unsigned = sample_builder()
            .timestamp(7)
            .build(&ProtocolConfig::with_fixed_time(FIXED_TIME_MS))
            .unwrap();
        assert_eq!(unsigned.timestamp(), 7);
    }

    #[test]
    fn test_high_bit_recipient_uses_all_eight_bytes() {
        let unsigned = sample_builder()
            .recipient(Recipient::from_id(u64::MAX))
            .timestamp(0)
            .build(&ProtocolConfig::default())
            .unwrap();
        assert_eq!(unsigned.recipient_id(), u64::MAX);
        assert_eq!(&unsigned.as_bytes()[40..48], &[0xff; 8]);
    }

    #[test]
    fn test_amount_overflow_is_an_error() {
        let err = sample_builder()
            .amount(BigUint::from(u64::MAX) + 1u8)
            .timestamp(0)
            .build(&ProtocolConfig::default())
            .unwrap_err();
        assert!(matches!(err, TransactionError::Encoding(_)));
    }

    #[test]
    fn test_missing_fields() {
        let err = TransferBuilder::new().build(&ProtocolConfig::default()).unwrap_err();
        assert!(matches!(err, TransactionError::MissingField("sender")));
        let err = TransferBuilder::new()
            .sender(derive_public_key("test"))
            .build(&ProtocolConfig::default())
            .unwrap_err();
        assert!(matches!(err, TransactionError::MissingField("recipient")));
    }

    #[test]
    fn test_clock_before_epoch() {
        let err = sample_builder()
            .build(&ProtocolConfig::with_fixed_time(EPOCH_BEGINNING_MS - 1_000))
            .unwrap_err();
        assert!(matches!(err, TransactionError::Clock(_)));
    }
}
