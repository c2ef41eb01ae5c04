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

//! Basketmine Core
//!
//! Data model for market basket analysis: item vocabulary, transactions,
//! the sparse incidence matrix the miner consumes, itemsets, association
//! rules, parameters and configuration.
//!
//! Data flows strictly one way:
//!
//! ```text
//! TransactionSet -> TransactionEncoder -> IncidenceMatrix
//!     -> miner -> FrequentItemsets -> rule generator -> RuleSet -> queries
//! ```

pub mod abort;
pub mod config;
pub mod encoder;
pub mod error;
pub mod item;
pub mod itemset;
pub mod matrix;
pub mod params;
pub mod rule;
pub mod transaction;

pub use abort::AbortSignal;
pub use config::BasketConfig;
pub use encoder::{ColumnOrder, EncoderConfig, TransactionEncoder};
pub use error::{BasketError, BasketResult};
pub use item::{ItemCatalog, ItemId};
pub use itemset::{FrequentItemset, FrequentItemsets, Itemset};
pub use matrix::IncidenceMatrix;
pub use params::{
    MiningParams, RuleMetric, RuleParams, SamplingConfig, DEFAULT_MAX_LEN,
    DEFAULT_MIN_CONFIDENCE, DEFAULT_MIN_SUPPORT, DEFAULT_MIN_THRESHOLD,
};
pub use rule::{AssociationRule, RuleSet};
pub use transaction::{ContextFilter, Transaction, TransactionSet};
