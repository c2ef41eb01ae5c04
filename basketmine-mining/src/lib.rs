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

//! Basketmine Mining
//!
//! FP-growth frequent itemset mining and association rule generation over
//! the incidence matrices built by `basketmine-core`.
//!
//! ```
//! use basketmine_core::{IncidenceMatrix, MiningParams, RuleMetric, RuleParams};
//!
//! let matrix = IncidenceMatrix::from_dense(
//!     &["bread", "milk"],
//!     &[vec![true, true], vec![true, true], vec![true, false]],
//! )
//! .unwrap();
//! let itemsets = basketmine_mining::mine(&matrix, MiningParams::new(0.5)).unwrap();
//! let rules = basketmine_mining::generate(&itemsets, RuleParams::new(RuleMetric::Confidence, 0.9))
//!     .unwrap();
//! assert_eq!(rules.len(), 1);
//! ```

mod fp_tree;
pub mod miner;
pub mod pipeline;
pub mod rules;

pub use miner::{mine, FpGrowth, MiningStats};
pub use pipeline::{BasketPipeline, MiningOutcome, MIN_CONTEXT_TRANSACTIONS};
pub use rules::{generate, RuleGenerator};
