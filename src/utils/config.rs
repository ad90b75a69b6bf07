// src/utils/config.rs
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::ValueEnum;

use crate::utils::error::AppError;

/// Environment variable consulted when `--amount-policy` is not given.
pub const AMOUNT_POLICY_ENV: &str = "CONTRACT_AMOUNT_POLICY";

/// Upload limit for the extraction endpoint (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// What to do with a beneficiary row whose amount cannot be read as a locale decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AmountPolicy {
    /// Keep the row and use 0.00 for the unreadable amount.
    #[default]
    Zero,
    /// Drop the row from its block.
    SkipRow,
    /// Fail the whole extraction.
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub amount_policy: AmountPolicy,
}

impl ExtractorConfig {
    /// Resolves the config: explicit CLI value first, then `CONTRACT_AMOUNT_POLICY`, then defaults.
    pub fn resolve(cli_policy: Option<AmountPolicy>) -> Result<Self, AppError> {
        if let Some(amount_policy) = cli_policy {
            tracing::debug!("Using amount policy {:?} from command-line argument", amount_policy);
            return Ok(Self { amount_policy });
        }

        match std::env::var(AMOUNT_POLICY_ENV) {
            Ok(raw) => {
                let amount_policy = parse_amount_policy(&raw)?;
                tracing::debug!("Using amount policy {:?} from {}", amount_policy, AMOUNT_POLICY_ENV);
                Ok(Self { amount_policy })
            }
            Err(_) => Ok(Self::default()),
        }
    }
}

fn parse_amount_policy(raw: &str) -> Result<AmountPolicy, AppError> {
    AmountPolicy::from_str(raw.trim(), true).map_err(|_| {
        AppError::Config(format!(
            "Invalid {} value '{}' (expected zero, skip-row or reject)",
            AMOUNT_POLICY_ENV, raw
        ))
    })
}

/// Settings for the HTTP endpoint.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub default_dataset: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub extractor: ExtractorConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_policy_wins() {
        let config = ExtractorConfig::resolve(Some(AmountPolicy::Reject)).unwrap();
        assert_eq!(config.amount_policy, AmountPolicy::Reject);
    }

    #[test]
    fn policy_names_parse_case_insensitively() {
        assert_eq!(parse_amount_policy("zero").unwrap(), AmountPolicy::Zero);
        assert_eq!(parse_amount_policy(" Skip-Row ").unwrap(), AmountPolicy::SkipRow);
        assert_eq!(parse_amount_policy("REJECT").unwrap(), AmountPolicy::Reject);
    }

    #[test]
    fn unknown_policy_is_a_config_error() {
        let err = parse_amount_policy("nan").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("nan"));
    }
}
