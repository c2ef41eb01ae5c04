// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Mining and rule parameters with range validation
//!
//! Validation happens before any computation starts, so a bad parameter
//! never leaves partial work behind.

use crate::error::{BasketError, BasketResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default minimum support (2% of transactions)
pub const DEFAULT_MIN_SUPPORT: f64 = 0.02;

/// Default itemset size cap (pairs only, A -> B)
pub const DEFAULT_MAX_LEN: usize = 2;

/// Default lift threshold
pub const DEFAULT_MIN_THRESHOLD: f64 = 1.5;

/// Default secondary confidence filter
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.2;

/// Frequent itemset mining parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MiningParams {
    /// Minimum fraction of transactions an itemset must appear in, (0, 1]
    #[serde(default = "default_min_support")]
    pub min_support: f64,

    /// Largest itemset size to explore (None = unbounded)
    #[serde(default = "default_max_len")]
    pub max_len: Option<usize>,
}

fn default_min_support() -> f64 {
    DEFAULT_MIN_SUPPORT
}

fn default_max_len() -> Option<usize> {
    Some(DEFAULT_MAX_LEN)
}

impl Default for MiningParams {
    fn default() -> Self {
        Self {
            min_support: DEFAULT_MIN_SUPPORT,
            max_len: Some(DEFAULT_MAX_LEN),
        }
    }
}

impl MiningParams {
    pub fn new(min_support: f64) -> Self {
        Self {
            min_support,
            max_len: None,
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn validate(&self) -> BasketResult<()> {
        if !(self.min_support > 0.0 && self.min_support <= 1.0) {
            return Err(BasketError::invalid(
                "min_support",
                format!("must be in (0, 1], got {}", self.min_support),
            ));
        }
        if self.max_len == Some(0) {
            return Err(BasketError::invalid("max_len", "must be at least 1"));
        }
        Ok(())
    }

    /// Whether `count` out of `n_transactions` meets the support threshold.
    ///
    /// Every support decision in the miner goes through this predicate so
    /// that pruning and reporting agree exactly.
    #[inline]
    pub fn is_frequent(&self, count: u64, n_transactions: usize) -> bool {
        n_transactions > 0 && count > 0 && count as f64 / n_transactions as f64 >= self.min_support
    }
}

/// Interest measure used as the primary rule filter
///
/// Deserialized through `FromStr`, so config files accept the same
/// spellings as the environment and the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleMetric {
    Support,
    Confidence,
    #[default]
    Lift,
    Leverage,
    Conviction,
}

impl RuleMetric {
    pub const ALL: [RuleMetric; 5] = [
        RuleMetric::Support,
        RuleMetric::Confidence,
        RuleMetric::Lift,
        RuleMetric::Leverage,
        RuleMetric::Conviction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleMetric::Support => "support",
            RuleMetric::Confidence => "confidence",
            RuleMetric::Lift => "lift",
            RuleMetric::Leverage => "leverage",
            RuleMetric::Conviction => "conviction",
        }
    }
}

impl fmt::Display for RuleMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleMetric {
    type Err = BasketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        RuleMetric::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| {
                BasketError::invalid(
                    "metric",
                    format!(
                        "unknown metric `{}` (expected support, confidence, lift, leverage or conviction)",
                        s
                    ),
                )
            })
    }
}

impl<'de> Deserialize<'de> for RuleMetric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Rule generation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleParams {
    /// Primary filter metric
    #[serde(default)]
    pub metric: RuleMetric,

    /// Rules keep only if `metric >= min_threshold`
    #[serde(default = "default_min_threshold")]
    pub min_threshold: f64,

    /// Secondary filter applied after the primary metric
    #[serde(default = "default_min_confidence")]
    pub min_confidence: Option<f64>,
}

fn default_min_threshold() -> f64 {
    DEFAULT_MIN_THRESHOLD
}

fn default_min_confidence() -> Option<f64> {
    Some(DEFAULT_MIN_CONFIDENCE)
}

impl Default for RuleParams {
    fn default() -> Self {
        Self {
            metric: RuleMetric::Lift,
            min_threshold: DEFAULT_MIN_THRESHOLD,
            min_confidence: Some(DEFAULT_MIN_CONFIDENCE),
        }
    }
}

impl RuleParams {
    pub fn new(metric: RuleMetric, min_threshold: f64) -> Self {
        Self {
            metric,
            min_threshold,
            min_confidence: None,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = Some(min_confidence);
        self
    }

    pub fn validate(&self) -> BasketResult<()> {
        if self.min_threshold.is_nan() {
            return Err(BasketError::invalid("min_threshold", "must be a number"));
        }
        if let Some(conf) = self.min_confidence {
            if !(0.0..=1.0).contains(&conf) {
                return Err(BasketError::invalid(
                    "min_confidence",
                    format!("must be in [0, 1], got {}", conf),
                ));
            }
        }
        Ok(())
    }
}

/// Random sampling of transactions before mining
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Fraction of transactions to keep, (0, 1]
    pub fraction: f64,

    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_seed() -> u64 {
    42
}

impl SamplingConfig {
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction,
            seed: default_seed(),
        }
    }

    pub fn validate(&self) -> BasketResult<()> {
        if !(self.fraction > 0.0 && self.fraction <= 1.0) {
            return Err(BasketError::invalid(
                "sample_fraction",
                format!("must be in (0, 1], got {}", self.fraction),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_support_range() {
        assert!(MiningParams::new(0.5).validate().is_ok());
        assert!(MiningParams::new(1.0).validate().is_ok());
        for bad in [0.0, -0.1, 1.01, f64::NAN, f64::INFINITY] {
            let err = MiningParams::new(bad).validate().unwrap_err();
            assert!(matches!(
                err,
                BasketError::InvalidParameter { name: "min_support", .. }
            ));
        }
    }

    #[test]
    fn test_max_len_range() {
        assert!(MiningParams::new(0.1).with_max_len(1).validate().is_ok());
        assert!(MiningParams::new(0.1).with_max_len(0).validate().is_err());
    }

    #[test]
    fn test_is_frequent_uses_exact_ratio() {
        let params = MiningParams::new(0.5);
        assert!(params.is_frequent(2, 4));
        assert!(!params.is_frequent(1, 4));
        assert!(!params.is_frequent(0, 0));
    }

    #[test]
    fn test_metric_parse() {
        assert_eq!("lift".parse::<RuleMetric>().unwrap(), RuleMetric::Lift);
        assert_eq!(" Confidence ".parse::<RuleMetric>().unwrap(), RuleMetric::Confidence);
        assert!("zhang".parse::<RuleMetric>().is_err());
        for metric in RuleMetric::ALL {
            assert_eq!(metric.to_string().parse::<RuleMetric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_metric_serde_uses_parser() {
        let metric: RuleMetric = serde_json::from_str(r#""Leverage""#).unwrap();
        assert_eq!(metric, RuleMetric::Leverage);
        assert_eq!(serde_json::to_string(&RuleMetric::Conviction).unwrap(), r#""conviction""#);
        assert!(serde_json::from_str::<RuleMetric>(r#""zhang""#).is_err());
    }

    #[test]
    fn test_rule_params_validation() {
        assert!(RuleParams::default().validate().is_ok());
        assert!(RuleParams::new(RuleMetric::Leverage, -0.2).validate().is_ok());
        assert!(RuleParams::new(RuleMetric::Lift, f64::NAN).validate().is_err());
        assert!(RuleParams::default().with_min_confidence(1.0).validate().is_ok());
        assert!(RuleParams::default().with_min_confidence(1.2).validate().is_err());
        assert!(RuleParams::default().with_min_confidence(-0.1).validate().is_err());
    }

    #[test]
    fn test_sampling_validation() {
        assert!(SamplingConfig::new(0.1).validate().is_ok());
        assert!(SamplingConfig::new(0.0).validate().is_err());
    }
}
