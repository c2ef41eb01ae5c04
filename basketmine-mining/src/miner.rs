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

//! FP-growth frequent itemset miner
//!
//! 1. Count every item; drop the ones below `min_support`. Only the
//!    surviving items, ranked by descending count (ties by label), are
//!    ever considered again.
//! 2. Insert each transaction, projected onto that vocabulary and sorted
//!    by rank, into an FP-tree.
//! 3. For each item of a tree, least frequent first, emit `suffix + item`
//!    and recurse into the conditional tree built from the item's prefix
//!    paths. Items failing the threshold inside a conditional pattern base
//!    never enter the conditional tree, so their branches are never
//!    explored.
//! 4. `max_len` stops the recursion once the suffix reaches that size.
//!
//! Supports are exact: every count is a whole number of transactions.

use crate::fp_tree::{FpTree, WeightedPath};
use basketmine_core::{
    AbortSignal, BasketResult, FrequentItemsets, IncidenceMatrix, ItemId, Itemset, MiningParams,
};
use std::cmp::Reverse;
use tracing::debug;

/// Work done by one mining run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MiningStats {
    /// Items meeting the support threshold on their own
    pub frequent_items: usize,
    /// Nodes in the initial FP-tree
    pub tree_nodes: usize,
    /// Conditional trees built during recursion
    pub conditional_trees: usize,
    /// Itemsets emitted
    pub itemsets: usize,
}

/// FP-growth miner over an incidence matrix
#[derive(Debug, Clone)]
pub struct FpGrowth {
    params: MiningParams,
    abort: Option<AbortSignal>,
    /// Raise `abort` once this many conditional trees exist
    #[cfg(test)]
    trip_after: Option<usize>,
}

impl FpGrowth {
    pub fn new(params: MiningParams) -> Self {
        Self {
            params,
            abort: None,
            #[cfg(test)]
            trip_after: None,
        }
    }

    /// Check `signal` at every recursion boundary.
    pub fn with_abort(mut self, signal: AbortSignal) -> Self {
        self.abort = Some(signal);
        self
    }

    pub fn params(&self) -> &MiningParams {
        &self.params
    }

    /// Mine all itemsets whose support reaches `min_support`.
    pub fn mine(&self, matrix: &IncidenceMatrix) -> BasketResult<FrequentItemsets> {
        self.mine_with_stats(matrix).map(|(itemsets, _)| itemsets)
    }

    pub fn mine_with_stats(
        &self,
        matrix: &IncidenceMatrix,
    ) -> BasketResult<(FrequentItemsets, MiningStats)> {
        self.params.validate()?;
        self.check_abort()?;

        let n = matrix.n_rows();
        let mut itemsets = FrequentItemsets::new(matrix.catalog().clone(), n);
        let mut stats = MiningStats::default();
        if n == 0 || matrix.n_cols() == 0 {
            debug!(rows = n, cols = matrix.n_cols(), "Empty incidence matrix, nothing to mine");
            return Ok((itemsets, stats));
        }

        let order = self.frequent_order(matrix);
        stats.frequent_items = order.len();
        if order.is_empty() {
            debug!(min_support = self.params.min_support, "No item meets min_support");
            return Ok((itemsets, stats));
        }

        let mut rank_of: Vec<Option<u32>> = vec![None; matrix.n_cols()];
        for (rank, item) in order.iter().enumerate() {
            rank_of[item.index()] = Some(rank as u32);
        }

        let mut tree = FpTree::new();
        let mut path = Vec::new();
        for row in matrix.rows() {
            path.clear();
            path.extend(row.iter().filter_map(|item| rank_of[item.index()]));
            path.sort_unstable();
            tree.insert(&path, 1);
        }
        stats.tree_nodes = tree.node_count();
        debug!(
            frequent_items = stats.frequent_items,
            tree_nodes = stats.tree_nodes,
            "Built FP-tree"
        );

        let mut growth = Growth {
            miner: self,
            order: &order,
            n_transactions: n,
            suffix: Vec::new(),
            itemsets: &mut itemsets,
            stats: &mut stats,
        };
        growth.grow(&tree)?;

        stats.itemsets = itemsets.len();
        debug!(
            itemsets = stats.itemsets,
            conditional_trees = stats.conditional_trees,
            "Mined frequent itemsets"
        );
        Ok((itemsets, stats))
    }

    /// Frequent items by descending count, ties broken by label.
    fn frequent_order(&self, matrix: &IncidenceMatrix) -> Vec<ItemId> {
        let n = matrix.n_rows();
        let catalog = matrix.catalog();
        let mut frequent: Vec<(ItemId, u64)> = matrix
            .column_counts()
            .into_iter()
            .enumerate()
            .filter(|&(_, count)| self.params.is_frequent(count, n))
            .map(|(i, count)| (ItemId(i as u32), count))
            .collect();
        frequent.sort_by(|(a, count_a), (b, count_b)| {
            Reverse(count_a)
                .cmp(&Reverse(count_b))
                .then_with(|| catalog.label(*a).cmp(&catalog.label(*b)))
                .then_with(|| a.cmp(b))
        });
        frequent.into_iter().map(|(item, _)| item).collect()
    }

    fn check_abort(&self) -> BasketResult<()> {
        match &self.abort {
            Some(signal) => signal.check(),
            None => Ok(()),
        }
    }
}

/// Mutable state of one recursive descent
struct Growth<'a> {
    miner: &'a FpGrowth,
    order: &'a [ItemId],
    n_transactions: usize,
    /// Ranks of the itemset being extended
    suffix: Vec<u32>,
    itemsets: &'a mut FrequentItemsets,
    stats: &'a mut MiningStats,
}

impl Growth<'_> {
    fn grow(&mut self, tree: &FpTree) -> BasketResult<()> {
        self.miner.check_abort()?;

        let max_len = self.miner.params.max_len;
        let ranks: Vec<(u32, u64)> = tree
            .header()
            .rev()
            .map(|(rank, entry)| (rank, entry.count))
            .collect();

        for (rank, count) in ranks {
            if !self.is_frequent(count) {
                continue;
            }

            self.suffix.push(rank);
            let itemset: Itemset = self.suffix.iter().map(|&r| self.order[r as usize]).collect();
            let inserted = self.itemsets.insert(itemset, count);
            debug_assert!(inserted, "FP-growth emitted an itemset twice");

            if max_len.map_or(true, |cap| self.suffix.len() < cap) {
                let base: Vec<WeightedPath> = tree.prefix_paths(rank);
                if !base.is_empty() {
                    let n = self.n_transactions;
                    let params = self.miner.params;
                    let conditional = FpTree::build(&base, |total| params.is_frequent(total, n));
                    if !conditional.is_empty() {
                        self.stats.conditional_trees += 1;
                        #[cfg(test)]
                        self.trip_if_due();
                        self.grow(&conditional)?;
                    }
                }
            }
            self.suffix.pop();
        }
        Ok(())
    }

    fn is_frequent(&self, count: u64) -> bool {
        self.miner.params.is_frequent(count, self.n_transactions)
    }

    #[cfg(test)]
    fn trip_if_due(&self) {
        if let (Some(after), Some(signal)) = (self.miner.trip_after, &self.miner.abort) {
            if self.stats.conditional_trees >= after {
                signal.abort();
            }
        }
    }
}

/// Mine `matrix` with `params`.
pub fn mine(matrix: &IncidenceMatrix, params: MiningParams) -> BasketResult<FrequentItemsets> {
    FpGrowth::new(params).mine(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use basketmine_core::BasketError;

    fn scenario_a() -> IncidenceMatrix {
        IncidenceMatrix::from_dense(
            &["A", "B", "C"],
            &[
                vec![true, true, false],
                vec![true, true, false],
                vec![true, false, true],
                vec![false, true, true],
            ],
        )
        .unwrap()
    }

    fn support(itemsets: &FrequentItemsets, labels: &[&str]) -> Option<f64> {
        let catalog = itemsets.catalog();
        let set: Itemset = labels.iter().map(|l| catalog.id_of(l).unwrap()).collect();
        itemsets.support_of(&set)
    }

    #[test]
    fn test_frequent_order_ties_by_label() {
        let miner = FpGrowth::new(MiningParams::new(0.5));
        let order = miner.frequent_order(&scenario_a());
        // A and B both appear 3 times, C twice
        assert_eq!(order, vec![ItemId(0), ItemId(1), ItemId(2)]);
    }

    #[test]
    fn test_scenario_a() {
        let itemsets = mine(&scenario_a(), MiningParams::new(0.5)).unwrap();
        assert_eq!(support(&itemsets, &["A"]), Some(0.75));
        assert_eq!(support(&itemsets, &["B"]), Some(0.75));
        assert_eq!(support(&itemsets, &["C"]), Some(0.5));
        assert_eq!(support(&itemsets, &["A", "B"]), Some(0.5));
        assert_eq!(support(&itemsets, &["A", "C"]), None);
        assert_eq!(support(&itemsets, &["B", "C"]), None);
        assert_eq!(itemsets.len(), 4);
    }

    #[test]
    fn test_max_len_caps_depth() {
        let matrix = IncidenceMatrix::from_dense(
            &["a", "b", "c"],
            &[vec![true, true, true], vec![true, true, true]],
        )
        .unwrap();

        let (all, full_stats) = FpGrowth::new(MiningParams::new(0.5))
            .mine_with_stats(&matrix)
            .unwrap();
        assert_eq!(all.len(), 7);

        let (pairs, pair_stats) = FpGrowth::new(MiningParams::new(0.5).with_max_len(2))
            .mine_with_stats(&matrix)
            .unwrap();
        assert_eq!(pairs.len(), 6);
        assert!(pairs.iter().all(|f| f.len() <= 2));
        assert!(pair_stats.conditional_trees < full_stats.conditional_trees);

        let (singles, single_stats) = FpGrowth::new(MiningParams::new(0.5).with_max_len(1))
            .mine_with_stats(&matrix)
            .unwrap();
        assert_eq!(singles.len(), 3);
        assert_eq!(single_stats.conditional_trees, 0);
    }

    #[test]
    fn test_no_frequent_items_is_empty() {
        let itemsets = mine(&scenario_a(), MiningParams::new(0.9)).unwrap();
        assert!(itemsets.is_empty());
    }

    #[test]
    fn test_empty_matrix() {
        let matrix = IncidenceMatrix::from_dense::<&str>(&[], &[]).unwrap();
        let itemsets = mine(&matrix, MiningParams::new(0.1)).unwrap();
        assert!(itemsets.is_empty());
        assert_eq!(itemsets.n_transactions(), 0);
    }

    #[test]
    fn test_rows_without_items_count_toward_n() {
        let matrix = IncidenceMatrix::from_dense(
            &["x"],
            &[vec![true], vec![false], vec![false], vec![true]],
        )
        .unwrap();
        let itemsets = mine(&matrix, MiningParams::new(0.5)).unwrap();
        assert_eq!(support(&itemsets, &["x"]), Some(0.5));
    }

    #[test]
    fn test_invalid_params_fail_fast() {
        let err = mine(&scenario_a(), MiningParams::new(0.0)).unwrap_err();
        assert!(matches!(err, BasketError::InvalidParameter { .. }));

        let err = mine(&scenario_a(), MiningParams::new(0.5).with_max_len(0)).unwrap_err();
        assert!(matches!(err, BasketError::InvalidParameter { .. }));
    }

    #[test]
    fn test_abort_during_recursion() {
        let labels = ["a", "b", "c", "d", "e"];
        let matrix = IncidenceMatrix::from_dense(&labels, &vec![vec![true; 5]; 3]).unwrap();
        let (all, stats) = FpGrowth::new(MiningParams::new(0.5))
            .mine_with_stats(&matrix)
            .unwrap();
        assert_eq!(all.len(), 31);
        assert!(stats.conditional_trees > 2);

        let signal = AbortSignal::new();
        let mut miner = FpGrowth::new(MiningParams::new(0.5)).with_abort(signal.clone());
        miner.trip_after = Some(2);
        assert!(!signal.is_aborted());

        let result = miner.mine_with_stats(&matrix);
        assert!(matches!(result, Err(BasketError::Aborted)));
        assert!(signal.is_aborted());
    }

    #[test]
    fn test_abort_before_start() {
        let signal = AbortSignal::new();
        signal.abort();
        let result = FpGrowth::new(MiningParams::new(0.5))
            .with_abort(signal)
            .mine(&scenario_a());
        assert!(matches!(result, Err(BasketError::Aborted)));
    }
}
