// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # nxt
//!
//! Entry point for the `nxt` binary. Parses CLI arguments, initializes
//! logging, runs one library operation and prints its result as JSON on
//! stdout.
//!
//! - `public-key`, `account`, `secret-phrase` derive identities
//! - `sign`, `verify` work on hex messages
//! - `token generate|parse` handle authentication tokens
//! - `transaction` builds a signed payment
//! - `encrypt`, `decrypt`, `sha256` are the symmetric helpers

mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{json, Value};

use nxt_crypto::config::ProtocolConfig;
use nxt_crypto::transaction::parse_nqt;
use nxt_crypto::{
    account_address, account_id, derive_public_key, encrypt, generate_secret_phrase,
    generate_token, generate_transaction_bytes, open, parse_token, sha256_hex, sign_hex,
    verify_hex, Account, PublicKey,
};

use cli::{Commands, NxtCli, TokenCommand};
use logging::LogFormat;

fn main() -> Result<()> {
    let cli = NxtCli::parse();

    logging::init_logging(
        &cli.global.log_level,
        LogFormat::from_str_lossy(&cli.global.log_format),
    );

    let config = cli
        .global
        .protocol_config()
        .context("invalid protocol configuration")?;

    let output = run(cli.command, &config)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Executes one subcommand and returns its JSON result.
fn run(command: Commands, config: &ProtocolConfig) -> Result<Value> {
    let prefix = config.account_prefix.as_str();

    match command {
        Commands::PublicKey(secret) => {
            let public_key = derive_public_key(&secret.passphrase);
            Ok(json!({ "publicKey": public_key.to_hex() }))
        }

        Commands::Account {
            passphrase,
            public_key,
        } => {
            let account = match (passphrase, public_key) {
                (Some(passphrase), _) => Account::from_passphrase(&passphrase, prefix),
                (None, Some(hex)) => {
                    let public_key =
                        PublicKey::from_hex(&hex).context("invalid public key")?;
                    Account::from_public_key(&public_key, prefix)
                }
                (None, None) => anyhow::bail!("either --passphrase or --public-key is required"),
            };
            tracing::debug!(id = account.id, "account derived");
            Ok(json!({
                "accountId": account.id.to_string(),
                "address": account.address,
                "publicKey": account.public_key.to_hex(),
            }))
        }

        Commands::SecretPhrase => {
            let phrase = generate_secret_phrase();
            let public_key = derive_public_key(&phrase);
            Ok(json!({
                "secretPhrase": phrase,
                "accountId": account_id(&public_key).to_string(),
                "address": account_address(&public_key, prefix),
            }))
        }

        Commands::Sign {
            message_hex,
            secret,
        } => {
            let signature =
                sign_hex(&message_hex, &secret.passphrase).context("cannot sign message")?;
            Ok(json!({ "signature": signature }))
        }

        Commands::Verify {
            signature,
            message_hex,
            public_key,
        } => {
            let valid = verify_hex(&signature, &message_hex, &public_key)
                .context("cannot verify signature")?;
            Ok(json!({ "isValid": valid }))
        }

        Commands::Token(TokenCommand::Generate { data, secret }) => {
            let token = generate_token(&data, &secret.passphrase, config)
                .context("cannot generate token")?;
            Ok(json!({ "token": token }))
        }

        Commands::Token(TokenCommand::Parse { token, data }) => {
            let claim = parse_token(&token, &data).context("cannot parse token")?;
            Ok(serde_json::to_value(claim)?)
        }

        Commands::Transaction {
            recipient,
            amount_nqt,
            fee_nqt,
            secret,
        } => {
            let amount = parse_nqt(&amount_nqt)?;
            let fee = parse_nqt(&fee_nqt)?;
            let bytes =
                generate_transaction_bytes(&recipient, amount, fee, &secret.passphrase, config)
                    .with_context(|| format!("cannot build payment to {recipient}"))?;
            tracing::info!(%recipient, amount_nqt = %amount_nqt, "transaction signed");
            Ok(json!({ "transactionBytes": bytes }))
        }

        Commands::Encrypt { message, key } => {
            let sealed = encrypt(&message, &key).context("encryption failed")?;
            Ok(serde_json::to_value(sealed)?)
        }

        Commands::Decrypt { ciphertext, key } => {
            let plaintext = open(ciphertext, &key).context("decryption failed")?;
            Ok(json!({ "message": plaintext }))
        }

        Commands::Sha256 { input } => Ok(json!({ "hash": sha256_hex(&input) })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cli::PassphraseArg;

    fn secret(passphrase: &str) -> PassphraseArg {
        PassphraseArg {
            passphrase: passphrase.to_string(),
        }
    }

    #[test]
    fn test_public_key_command() {
        let out = run(Commands::PublicKey(secret("test")), &ProtocolConfig::default()).unwrap();
        assert_eq!(
            out["publicKey"],
            "d9d5c57971eefb085e3abaf7a5a4a6cdb8185f30105583cdb09ad8f61886ec65"
        );
    }

    #[test]
    fn test_account_command_uses_prefix() {
        let config = ProtocolConfig::default().with_prefix("DBN");
        let out = run(
            Commands::Account {
                passphrase: None,
                public_key: Some(
                    "d9d5c57971eefb085e3abaf7a5a4a6cdb8185f30105583cdb09ad8f61886ec65".into(),
                ),
            },
            &config,
        )
        .unwrap();
        assert_eq!(out["accountId"], "4273301882745002507");
        assert_eq!(out["address"], "DBN-E8JD-FHKJ-CQ9H-5KGMQ");
    }

    #[test]
    fn test_transaction_command() {
        let config = ProtocolConfig::with_fixed_time(1_494_481_510_847);
        let out = run(
            Commands::Transaction {
                recipient: "NXT-E8JD-FHKJ-CQ9H-5KGMQ".into(),
                amount_nqt: "100000000".into(),
                fee_nqt: "100000000".into(),
                secret: secret("test"),
            },
            &config,
        )
        .unwrap();
        let bytes = out["transactionBytes"].as_str().unwrap();
        assert_eq!(bytes.len(), 352);
        assert!(bytes.starts_with("001026108206a005"));
    }

    #[test]
    fn test_transaction_command_rejects_bad_amount() {
        let result = run(
            Commands::Transaction {
                recipient: "4273301882745002507".into(),
                amount_nqt: "-1".into(),
                fee_nqt: "1".into(),
                secret: secret("test"),
            },
            &ProtocolConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_sign_then_verify_commands() {
        let config = ProtocolConfig::default();
        let signed = run(
            Commands::Sign {
                message_hex: "cafe".into(),
                secret: secret("test"),
            },
            &config,
        )
        .unwrap();
        let out = run(
            Commands::Verify {
                signature: signed["signature"].as_str().unwrap().to_string(),
                message_hex: "cafe".into(),
                public_key: "d9d5c57971eefb085e3abaf7a5a4a6cdb8185f30105583cdb09ad8f61886ec65"
                    .into(),
            },
            &config,
        )
        .unwrap();
        assert_eq!(out["isValid"], true);
    }

    #[test]
    fn test_token_commands() {
        let config = ProtocolConfig::with_fixed_time(1_494_481_510_847);
        let issued = run(
            Commands::Token(TokenCommand::Generate {
                data: "example.com".into(),
                secret: secret("test"),
            }),
            &config,
        )
        .unwrap();
        let out = run(
            Commands::Token(TokenCommand::Parse {
                token: issued["token"].as_str().unwrap().to_string(),
                data: "example.com".into(),
            }),
            &config,
        )
        .unwrap();
        assert_eq!(out["isValid"], true);
        assert_eq!(out["timestamp"], 109_187_110);
    }

    #[test]
    fn test_encrypt_decrypt_commands() {
        let config = ProtocolConfig::default();
        let sealed = run(
            Commands::Encrypt {
                message: "hello".into(),
                key: "k".into(),
            },
            &config,
        )
        .unwrap();
        let out = run(
            Commands::Decrypt {
                ciphertext: sealed.to_string(),
                key: "k".into(),
            },
            &config,
        )
        .unwrap();
        assert_eq!(out["message"], "hello");

        let wrong = run(
            Commands::Decrypt {
                ciphertext: sealed.to_string(),
                key: "other".into(),
            },
            &config,
        );
        assert!(wrong.is_err());
    }
}
