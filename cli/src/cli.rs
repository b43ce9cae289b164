//! # CLI Interface
//!
//! Defines the command-line argument structure for `nxt` using `clap`
//! derive. Every subcommand maps onto one library operation and prints its
//! result as JSON.

use clap::{Args, Parser, Subcommand};

use nxt_crypto::config::{validate_prefix, Clock, ConfigError, ProtocolConfig};

/// Offline key, token and transaction tool for NXT-style ledgers.
#[derive(Parser, Debug)]
#[command(
    name = "nxt",
    about = "Passphrase keys, signatures, auth tokens and payment bytes",
    version,
    propagate_version = true
)]
pub struct NxtCli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Log output format: pretty or json.
    #[arg(long, global = true, env = "NXT_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    /// Level for `nxt` and `nxt_crypto`, or raw filter directives. Ignored
    /// when `RUST_LOG` is set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Prefix for rendered Reed-Solomon addresses. Overrides
    /// `NXT_ACCOUNT_PREFIX`.
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// Network epoch in Unix milliseconds. Overrides `NXT_EPOCH_MS`.
    #[arg(long, global = true)]
    pub epoch_ms: Option<u64>,

    /// Freeze the clock at this Unix time in milliseconds. Overrides
    /// `NXT_FIXED_TIME_MS`.
    #[arg(long, global = true)]
    pub fixed_time_ms: Option<u64>,
}

impl GlobalArgs {
    /// Environment configuration with the explicit flags laid on top.
    pub fn protocol_config(&self) -> Result<ProtocolConfig, ConfigError> {
        self.apply(ProtocolConfig::from_env()?)
    }

    fn apply(&self, mut config: ProtocolConfig) -> Result<ProtocolConfig, ConfigError> {
        if let Some(prefix) = &self.prefix {
            validate_prefix(prefix)?;
            config.account_prefix = prefix.clone();
        }
        if let Some(epoch_ms) = self.epoch_ms {
            config.epoch_ms = epoch_ms;
        }
        if let Some(now_ms) = self.fixed_time_ms {
            config.clock = Clock::Fixed(now_ms);
        }
        Ok(config)
    }
}

/// The secret passphrase, from a flag or `NXT_PASSPHRASE`.
#[derive(Args, Debug)]
pub struct PassphraseArg {
    /// Secret passphrase. Prefer the environment variable over the flag so
    /// it stays out of shell history.
    #[arg(long, env = "NXT_PASSPHRASE", hide_env_values = true)]
    pub passphrase: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the public key derived from a passphrase.
    PublicKey(PassphraseArg),

    /// Print the account id and address for a passphrase or public key.
    Account {
        /// Secret passphrase.
        #[arg(
            long,
            env = "NXT_PASSPHRASE",
            hide_env_values = true,
            required_unless_present = "public_key",
            conflicts_with = "public_key"
        )]
        passphrase: Option<String>,

        /// Hex-encoded public key.
        #[arg(long)]
        public_key: Option<String>,
    },

    /// Generate a fresh random secret phrase.
    SecretPhrase,

    /// Sign a hex-encoded message.
    Sign {
        /// Message bytes as hex.
        #[arg(long)]
        message_hex: String,

        #[command(flatten)]
        secret: PassphraseArg,
    },

    /// Verify a signature over a hex-encoded message.
    Verify {
        /// 64-byte signature as hex.
        #[arg(long)]
        signature: String,

        /// Message bytes as hex.
        #[arg(long)]
        message_hex: String,

        /// Signer's public key as hex.
        #[arg(long)]
        public_key: String,
    },

    /// Issue or check authentication tokens.
    #[command(subcommand)]
    Token(TokenCommand),

    /// Build and sign an ordinary payment.
    Transaction {
        /// Recipient address (any prefix) or decimal account id.
        #[arg(long)]
        recipient: String,

        /// Amount in NQT.
        #[arg(long)]
        amount_nqt: String,

        /// Fee in NQT.
        #[arg(long, default_value = "100000000")]
        fee_nqt: String,

        #[command(flatten)]
        secret: PassphraseArg,
    },

    /// Encrypt a message with a shared key.
    Encrypt {
        #[arg(long)]
        message: String,

        #[arg(long, env = "NXT_SHARED_KEY", hide_env_values = true)]
        key: String,
    },

    /// Decrypt the JSON produced by `encrypt`.
    Decrypt {
        /// `{"nonce": ..., "message": ...}` as a JSON string.
        #[arg(long)]
        ciphertext: String,

        #[arg(long, env = "NXT_SHARED_KEY", hide_env_values = true)]
        key: String,
    },

    /// SHA-256 of a UTF-8 string, as hex.
    Sha256 {
        input: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TokenCommand {
    /// Sign `data` with the current timestamp.
    Generate {
        /// Website or other string the token is bound to.
        #[arg(long)]
        data: String,

        #[command(flatten)]
        secret: PassphraseArg,
    },
    /// Decode a token and check it against `data`.
    Parse {
        #[arg(long)]
        token: String,

        #[arg(long)]
        data: String,
    },
}
