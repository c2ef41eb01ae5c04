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

//! Error types shared by the mining, rule and query layers

use thiserror::Error;

/// Result type for basket mining operations
pub type BasketResult<T> = Result<T, BasketError>;

/// Errors that can occur while mining itemsets or deriving rules
///
/// Empty results are never errors: a run that finds nothing returns an
/// empty collection.
#[derive(Debug, Error)]
pub enum BasketError {
    /// A scalar parameter is outside its valid range
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Input data has the wrong shape
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The caller aborted the run before it completed
    #[error("Mining run aborted")]
    Aborted,

    /// Itemsets handed to the rule generator are missing a subset
    #[error("Inconsistent itemsets: {0}")]
    InconsistentItemsets(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BasketError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        BasketError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BasketError {
    fn from(e: serde_json::Error) -> Self {
        BasketError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for BasketError {
    fn from(e: toml::de::Error) -> Self {
        BasketError::Config(e.to_string())
    }
}
