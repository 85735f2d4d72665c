//! # CLI Configuration
//!
//! Display and policy settings for the command-line front end.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--currency`, `--decimals`, `--strict`, ...)
//! 2. Environment variables (`TABSPLIT_*`)
//! 3. Defaults (this file)
//!
//! ## Environment Variables
//! | Variable                       | Field                |
//! |--------------------------------|----------------------|
//! | `TABSPLIT_CURRENCY_SYMBOL`     | `currency_symbol`    |
//! | `TABSPLIT_DECIMALS`            | `decimals` (0-6)     |
//! | `TABSPLIT_SHOW_ITEMS`          | `show_items`         |
//! | `TABSPLIT_FAIL_ON_UNASSIGNED`  | `fail_on_unassigned` |

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Largest number of decimals accepted for display.
pub const MAX_DECIMALS: u8 = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    /// Prefix for every rendered amount.
    pub currency_symbol: String,

    /// Decimal places shown. Computation is never rounded.
    pub decimals: u8,

    /// Print each participant's item lines, not only the totals.
    pub show_items: bool,

    /// Treat unassigned items as an error instead of a warning.
    pub fail_on_unassigned: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            currency_symbol: "$".to_string(),
            decimals: 2,
            show_items: true,
            fail_on_unassigned: false,
        }
    }
}

impl CliConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let mut config = CliConfig::default();

        if let Some(symbol) = lookup("TABSPLIT_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }
        if let Some(raw) = lookup("TABSPLIT_DECIMALS") {
            config.decimals = parse_decimals("TABSPLIT_DECIMALS", &raw)?;
        }
        if let Some(raw) = lookup("TABSPLIT_SHOW_ITEMS") {
            config.show_items = parse_flag("TABSPLIT_SHOW_ITEMS", &raw)?;
        }
        if let Some(raw) = lookup("TABSPLIT_FAIL_ON_UNASSIGNED") {
            config.fail_on_unassigned = parse_flag("TABSPLIT_FAIL_ON_UNASSIGNED", &raw)?;
        }

        Ok(config)
    }
}

fn parse_decimals(key: &str, raw: &str) -> AppResult<u8> {
    match raw.trim().parse::<u8>() {
        Ok(decimals) if decimals <= MAX_DECIMALS => Ok(decimals),
        _ => Err(AppError::Config {
            key: key.to_string(),
            reason: format!("expected a number from 0 to {MAX_DECIMALS}, got '{raw}'"),
        }),
    }
}

fn parse_flag(key: &str, raw: &str) -> AppResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Config {
            key: key.to_string(),
            reason: format!("expected true/false, got '{raw}'"),
        }),
    }
}
