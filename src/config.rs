// ⚙️ Ledger configuration - loan period and fine rate as data
//
// JSON form:
//   { "loanPeriodDays": 21, "dailyFineRate": 0.5 }
// Missing keys take the defaults below, unknown keys are rejected.

use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::LedgerError;

/// Days a copy may be held before it is due
pub const DEFAULT_LOAN_PERIOD_DAYS: i64 = 14;

/// Fine charged per whole overdue day
pub const DEFAULT_DAILY_FINE_RATE: f64 = 1.0;

/// Longest accepted loan period (100 years)
pub const MAX_LOAN_PERIOD_DAYS: i64 = 36_500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LedgerConfig {
    #[serde(default = "default_loan_period_days")]
    pub loan_period_days: i64,

    #[serde(default = "default_daily_fine_rate")]
    pub daily_fine_rate: f64,
}

fn default_loan_period_days() -> i64 {
    DEFAULT_LOAN_PERIOD_DAYS
}

fn default_daily_fine_rate() -> f64 {
    DEFAULT_DAILY_FINE_RATE
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            loan_period_days: DEFAULT_LOAN_PERIOD_DAYS,
            daily_fine_rate: DEFAULT_DAILY_FINE_RATE,
        }
    }
}

impl LedgerConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LedgerConfig =
            serde_json::from_str(json).context("Failed to parse ledger config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_json(&content)
    }

    /// Reject settings that would break due-date or fine arithmetic
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.loan_period_days <= 0 {
            return Err(LedgerError::InvalidConfig(format!(
                "loanPeriodDays must be positive (got {})",
                self.loan_period_days
            )));
        }

        if self.loan_period_days > MAX_LOAN_PERIOD_DAYS || self.loan_period().is_none() {
            return Err(LedgerError::InvalidConfig(format!(
                "loanPeriodDays must be at most {MAX_LOAN_PERIOD_DAYS} (got {})",
                self.loan_period_days
            )));
        }

        if !self.daily_fine_rate.is_finite() || self.daily_fine_rate < 0.0 {
            return Err(LedgerError::InvalidConfig(format!(
                "dailyFineRate must be a non-negative number (got {})",
                self.daily_fine_rate
            )));
        }

        Ok(())
    }

    /// Loan period as a duration; None if it does not fit a `Duration`
    pub fn loan_period(&self) -> Option<Duration> {
        Duration::try_days(self.loan_period_days)
    }

    /// Fine owed for a number of whole overdue days
    pub fn fine_for(&self, overdue_days: i64) -> f64 {
        overdue_days as f64 * self.daily_fine_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::default();
        assert_eq!(config.loan_period_days, 14);
        assert_eq!(config.daily_fine_rate, 1.0);
        assert_eq!(config.loan_period(), Some(Duration::days(14)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = LedgerConfig::from_json(r#"{ "dailyFineRate": 0.25 }"#).unwrap();
        assert_eq!(config.loan_period_days, 14);
        assert_eq!(config.daily_fine_rate, 0.25);
        assert_eq!(config.fine_for(4), 1.0);
    }

    #[test]
    fn test_from_json_full() {
        let config =
            LedgerConfig::from_json(r#"{ "loanPeriodDays": 21, "dailyFineRate": 2.0 }"#).unwrap();
        assert_eq!(config.loan_period(), Some(Duration::days(21)));
        assert_eq!(config.fine_for(3), 6.0);
    }

    #[test]
    fn test_from_json_rejects_unknown_keys() {
        assert!(LedgerConfig::from_json(r#"{ "loanPeriod": 21 }"#).is_err());
    }

    #[test]
    fn test_from_json_rejects_invalid_values() {
        assert!(LedgerConfig::from_json(r#"{ "loanPeriodDays": 0 }"#).is_err());
        assert!(LedgerConfig::from_json(r#"{ "dailyFineRate": -1.0 }"#).is_err());
    }

    #[test]
    fn test_from_json_rejects_oversized_period() {
        let err = LedgerConfig::from_json(r#"{ "loanPeriodDays": 9223372036854775807 }"#).unwrap_err();
        assert!(format!("{err:#}").contains("loanPeriodDays must be at most"));

        assert!(LedgerConfig::from_json(r#"{ "loanPeriodDays": 36501 }"#).is_err());
        assert!(LedgerConfig::from_json(r#"{ "loanPeriodDays": 36500 }"#).is_ok());
    }

    #[test]
    fn test_validate_rejects_period_beyond_cap() {
        let config = LedgerConfig {
            loan_period_days: 1_000_000_000,
            daily_fine_rate: 1.0,
        };
        assert!(matches!(config.validate(), Err(LedgerError::InvalidConfig(_))));

        let config = LedgerConfig {
            loan_period_days: i64::MAX,
            daily_fine_rate: 1.0,
        };
        assert_eq!(config.loan_period(), None);
        assert!(matches!(config.validate(), Err(LedgerError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_reports_invalid_config() {
        let config = LedgerConfig {
            loan_period_days: -3,
            daily_fine_rate: 1.0,
        };
        assert!(matches!(config.validate(), Err(LedgerError::InvalidConfig(_))));

        let config = LedgerConfig {
            loan_period_days: 14,
            daily_fine_rate: f64::NAN,
        };
        assert!(matches!(config.validate(), Err(LedgerError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let err = LedgerConfig::from_file("/nonexistent/ledger.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_from_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("ledger-config-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, r#"{ "loanPeriodDays": 7 }"#).unwrap();

        let config = LedgerConfig::from_file(&path).unwrap();
        assert_eq!(config.loan_period_days, 7);

        fs::remove_file(&path).unwrap();
    }
}
