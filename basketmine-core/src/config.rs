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

//! Basketmine configuration
//!
//! Settings come from a TOML file, then environment variables, then
//! built-in defaults that mirror the interactive dashboard:
//!
//! ```toml
//! [mining]
//! min_support = 0.02
//! max_len = 2
//!
//! [rules]
//! metric = "lift"
//! min_threshold = 1.5
//! min_confidence = 0.2
//!
//! [encoder]
//! column_order = "sorted"
//!
//! [sampling]
//! fraction = 0.1
//! seed = 42
//! ```

use crate::encoder::EncoderConfig;
use crate::error::{BasketError, BasketResult};
use crate::params::{MiningParams, RuleMetric, RuleParams, SamplingConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_MIN_SUPPORT: &str = "BASKETMINE_MIN_SUPPORT";
pub const ENV_MAX_LEN: &str = "BASKETMINE_MAX_LEN";
pub const ENV_METRIC: &str = "BASKETMINE_METRIC";
pub const ENV_MIN_THRESHOLD: &str = "BASKETMINE_MIN_THRESHOLD";
pub const ENV_MIN_CONFIDENCE: &str = "BASKETMINE_MIN_CONFIDENCE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BasketConfig {
    #[serde(default)]
    pub mining: MiningParams,

    #[serde(default)]
    pub rules: RuleParams,

    #[serde(default)]
    pub encoder: EncoderConfig,

    /// Mine a random sample instead of every transaction
    #[serde(default)]
    pub sampling: Option<SamplingConfig>,
}

impl BasketConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> BasketResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse TOML. An unknown `rules.metric` is an invalid parameter, as it
    /// is when it comes from the environment.
    pub fn from_toml(content: &str) -> BasketResult<Self> {
        let table: toml::Table = content.parse()?;
        let metric = table
            .get("rules")
            .and_then(|rules| rules.get("metric"))
            .and_then(toml::Value::as_str);
        if let Some(metric) = metric {
            metric.parse::<RuleMetric>()?;
        }
        Ok(toml::Value::Table(table).try_into()?)
    }

    /// Load configuration with priority: file > env > defaults
    pub fn load(config_file: Option<PathBuf>) -> BasketResult<Self> {
        let config = match config_file {
            Some(path) if path.exists() => {
                tracing::info!("Loading configuration from file: {:?}", path);
                Self::from_file(&path)?
            }
            Some(path) => {
                tracing::warn!("Config file not found: {:?}, using defaults", path);
                Self::default()
            }
            None => Self::default(),
        };

        let config = config.merge_with_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from environment-style variables.
    ///
    /// `lookup` returns the raw value of a variable if set. Unparseable
    /// values are configuration errors rather than silently ignored.
    pub fn merge_with_env<F>(mut self, lookup: F) -> BasketResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_MIN_SUPPORT) {
            self.mining.min_support = parse_env(ENV_MIN_SUPPORT, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_LEN) {
            self.mining.max_len = match value.trim() {
                "" | "none" => None,
                raw => Some(parse_env(ENV_MAX_LEN, raw)?),
            };
        }
        if let Some(value) = lookup(ENV_METRIC) {
            self.rules.metric = value.parse()?;
        }
        if let Some(value) = lookup(ENV_MIN_THRESHOLD) {
            self.rules.min_threshold = parse_env(ENV_MIN_THRESHOLD, &value)?;
        }
        if let Some(value) = lookup(ENV_MIN_CONFIDENCE) {
            self.rules.min_confidence = match value.trim() {
                "" | "none" => None,
                raw => Some(parse_env(ENV_MIN_CONFIDENCE, raw)?),
            };
        }
        Ok(self)
    }

    /// Validate every parameter group
    pub fn validate(&self) -> BasketResult<()> {
        self.mining.validate()?;
        self.rules.validate()?;
        if let Some(sampling) = &self.sampling {
            sampling.validate()?;
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> BasketResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| BasketError::Config(format!("{} has invalid value `{}`", key, value)))
}
