//! # Structured Logging
//!
//! `nxt` prints exactly one JSON document on stdout per invocation, so
//! scripts can pipe it straight into `jq`. Every log line goes to stderr
//! and never mixes with that result.
//!
//! Two crates emit events:
//!
//! - `nxt_crypto`: `debug` when a token is parsed, a transaction is
//!   assembled or a secretbox is rejected; `trace` for hex verification.
//! - `nxt`: `debug`/`info` from the command handlers in this binary.
//!
//! Passphrases, private scalars and plaintexts are never logged. Public
//! keys, account ids and recipients are.
//!
//! Filtering comes from `RUST_LOG` when it is set; otherwise `--log-level`
//! is applied to both crates above. `--log-format json` (or
//! `NXT_LOG_FORMAT=json`) switches to one JSON object per line.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crate targets that `--log-level` applies to.
const LOG_TARGETS: [&str; 2] = ["nxt", "nxt_crypto"];

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, colored output with file and line.
    Pretty,
    /// One JSON object per line, for log shippers.
    Json,
}

impl LogFormat {
    /// Accepts "json" or "pretty" (case-insensitive). Anything else is
    /// `Pretty`.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Filter directives for a `--log-level` value.
///
/// A bare level such as `debug` is scoped to this binary and the library,
/// keeping `clap` and other dependencies quiet. A value that already
/// contains directives (`nxt_crypto=trace,warn`) is used as given.
pub fn default_directives(level: &str) -> String {
    if level.contains('=') || level.contains(',') {
        return level.to_string();
    }
    LOG_TARGETS
        .iter()
        .map(|target| format!("{target}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the global stderr subscriber. Call once, before any command
/// runs.
///
/// ```text
/// RUST_LOG=nxt_crypto=debug nxt token parse --token ... --data example.com
/// nxt --log-level debug --log-format json transaction ...
/// ```
pub fn init_logging(level: &str, format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    match format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true),
                )
                .init();
        }
    }

    tracing::debug!(?format, "logging initialized");
}
