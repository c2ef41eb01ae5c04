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

//! End-to-end mining pipeline
//!
//! Transactions are optionally narrowed to a context slice and sampled,
//! then encoded, mined and turned into rules in one call.

use crate::miner::{FpGrowth, MiningStats};
use crate::rules::RuleGenerator;
use basketmine_core::{
    AbortSignal, BasketConfig, BasketResult, ContextFilter, FrequentItemsets, ItemCatalog,
    RuleSet, TransactionEncoder, TransactionSet,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Slices with fewer transactions than this produce no rules
pub const MIN_CONTEXT_TRANSACTIONS: usize = 2;

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct MiningOutcome {
    pub itemsets: FrequentItemsets,
    pub rules: RuleSet,
    pub stats: MiningStats,
}

impl MiningOutcome {
    fn empty(n_transactions: usize) -> Self {
        let catalog = Arc::new(ItemCatalog::new());
        Self {
            itemsets: FrequentItemsets::new(catalog.clone(), n_transactions),
            rules: RuleSet::empty(catalog),
            stats: MiningStats::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BasketPipeline {
    config: BasketConfig,
    abort: Option<AbortSignal>,
}

impl BasketPipeline {
    pub fn new(config: BasketConfig) -> Self {
        Self {
            config,
            abort: None,
        }
    }

    pub fn with_abort(mut self, signal: AbortSignal) -> Self {
        self.abort = Some(signal);
        self
    }

    pub fn config(&self) -> &BasketConfig {
        &self.config
    }

    /// Mine itemsets and derive rules from every transaction.
    pub fn run(&self, transactions: &TransactionSet) -> BasketResult<MiningOutcome> {
        self.config.validate()?;
        let sampled = self.sample(transactions)?;
        let (itemsets, stats) = self.mine_set(&sampled)?;

        let mut generator = RuleGenerator::new(self.config.rules);
        if let Some(signal) = &self.abort {
            generator = generator.with_abort(signal.clone());
        }
        let rules = generator.generate(&itemsets)?;

        info!(
            transactions = sampled.len(),
            itemsets = itemsets.len(),
            rules = rules.len(),
            "Mining run complete"
        );
        Ok(MiningOutcome {
            itemsets,
            rules,
            stats,
        })
    }

    /// Run on the transactions whose context matches every pair of `filter`.
    pub fn run_with_context(
        &self,
        transactions: &TransactionSet,
        filter: &ContextFilter,
    ) -> BasketResult<MiningOutcome> {
        self.config.validate()?;
        let slice = transactions.filter_context(filter);
        if slice.len() < MIN_CONTEXT_TRANSACTIONS {
            info!(matched = slice.len(), "Too few transactions in context, nothing to mine");
            return Ok(MiningOutcome::empty(slice.len()));
        }
        debug!(matched = slice.len(), total = transactions.len(), "Filtered by context");
        self.run(&slice)
    }

    /// Frequent itemsets only, skipping rule generation.
    pub fn mine(&self, transactions: &TransactionSet) -> BasketResult<FrequentItemsets> {
        self.config.validate()?;
        let sampled = self.sample(transactions)?;
        self.mine_set(&sampled).map(|(itemsets, _)| itemsets)
    }

    fn sample(&self, transactions: &TransactionSet) -> BasketResult<TransactionSet> {
        match &self.config.sampling {
            Some(sampling) => {
                let sampled = transactions.sample(sampling.fraction, sampling.seed)?;
                debug!(
                    sampled = sampled.len(),
                    total = transactions.len(),
                    seed = sampling.seed,
                    "Sampled transactions"
                );
                Ok(sampled)
            }
            None => Ok(transactions.clone()),
        }
    }

    fn mine_set(
        &self,
        transactions: &TransactionSet,
    ) -> BasketResult<(FrequentItemsets, MiningStats)> {
        let encoder = TransactionEncoder::from_config(&self.config.encoder);
        let matrix = encoder.fit_transform(transactions)?;
        let mut miner = FpGrowth::new(self.config.mining);
        if let Some(signal) = &self.abort {
            miner = miner.with_abort(signal.clone());
        }
        miner.mine_with_stats(&matrix)
    }
}
