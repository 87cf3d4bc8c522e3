//! Configuration for the delta scanner.
//!
//! `ScanConfig` centralizes thresholds and behavioral knobs so callers
//! never hardcode epsilons at call sites.

use crate::error_codes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Two prices within this distance compare as unchanged.
    pub price_epsilon: f64,
    /// Trim and case-fold section names and row labels before matching.
    ///
    /// Off by default: exact structural identity is the contract, and
    /// normalization is a clearly-labeled opt-in, not a silent change.
    pub normalize_labels: bool,
    /// Emit a warning when a document's master grand total diverges from
    /// the sum of its detail grand totals.
    pub reconcile_master: bool,
    /// Divergence tolerance for the master reconciliation check.
    pub reconcile_epsilon: f64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            price_epsilon: 0.005,
            normalize_labels: false,
            reconcile_master: true,
            reconcile_epsilon: 0.01,
        }
    }
}

impl ScanConfig {
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder {
            inner: ScanConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite_non_negative(self.price_epsilon, "price_epsilon")?;
        ensure_finite_non_negative(self.reconcile_epsilon, "reconcile_epsilon")?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("[PRICING_CFG_001] {field} must be finite (got {value})")]
    NonFinite { field: &'static str, value: f64 },
    #[error("[PRICING_CFG_002] {field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::NonFinite { .. } => error_codes::CONFIG_NON_FINITE,
            ConfigError::Negative { .. } => error_codes::CONFIG_NEGATIVE,
        }
    }
}

fn ensure_finite_non_negative(value: f64, field: &'static str) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NonFinite { field, value });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct ScanConfigBuilder {
    inner: ScanConfig,
}

impl ScanConfigBuilder {
    pub fn new() -> Self {
        ScanConfig::builder()
    }

    pub fn price_epsilon(mut self, value: f64) -> Self {
        self.inner.price_epsilon = value;
        self
    }

    pub fn normalize_labels(mut self, value: bool) -> Self {
        self.inner.normalize_labels = value;
        self
    }

    pub fn reconcile_master(mut self, value: bool) -> Self {
        self.inner.reconcile_master = value;
        self
    }

    pub fn reconcile_epsilon(mut self, value: f64) -> Self {
        self.inner.reconcile_epsilon = value;
        self
    }

    pub fn build(self) -> Result<ScanConfig, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_thresholds() {
        let cfg = ScanConfig::default();
        assert_eq!(cfg.price_epsilon, 0.005);
        assert!(!cfg.normalize_labels);
        assert!(cfg.reconcile_master);
        assert_eq!(cfg.reconcile_epsilon, 0.01);
    }

    #[test]
    fn serde_roundtrip_preserves_defaults() {
        let cfg = ScanConfig::default();
        let json = serde_json::to_string(&cfg).expect("serialize default config");
        let parsed: ScanConfig = serde_json::from_str(&json).expect("deserialize default config");
        assert_eq!(cfg, parsed);
    }

    #[test]
    fn builder_rejects_negative_epsilon() {
        let err = ScanConfig::builder()
            .price_epsilon(-0.01)
            .build()
            .expect_err("builder should reject negative epsilon");
        assert!(matches!(err, ConfigError::Negative { field, .. } if field == "price_epsilon"));
    }

    #[test]
    fn builder_rejects_non_finite_epsilon() {
        let err = ScanConfig::builder()
            .reconcile_epsilon(f64::NAN)
            .build()
            .expect_err("builder should reject NaN");
        assert_eq!(err.code(), "PRICING_CFG_001");
    }

    #[test]
    fn builder_accepts_valid_overrides() {
        let cfg = ScanConfig::builder()
            .price_epsilon(0.01)
            .normalize_labels(true)
            .reconcile_master(false)
            .build()
            .expect("valid config should build");
        assert!(cfg.normalize_labels);
        assert!(!cfg.reconcile_master);
    }
}
