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

//! Frequent-pattern tree
//!
//! Transactions projected onto the frequent vocabulary are inserted as
//! paths of item ranks (rank 0 = most frequent item), so baskets that share
//! their most common items share a prefix. Every node counts how many
//! transactions pass through it. The header table links all nodes of one
//! rank so its conditional pattern base can be collected without a full
//! traversal.
//!
//! Nodes live in a flat arena and refer to each other by index.

use std::collections::{BTreeMap, HashMap};

/// Arena index of the root sentinel
const ROOT: usize = 0;

#[derive(Debug, Clone)]
struct FpNode {
    rank: u32,
    count: u64,
    parent: usize,
    children: HashMap<u32, usize>,
}

impl FpNode {
    fn root() -> Self {
        Self {
            rank: u32::MAX,
            count: 0,
            parent: ROOT,
            children: HashMap::new(),
        }
    }
}

/// Header table entry: total count of a rank and the nodes carrying it
#[derive(Debug, Clone, Default)]
pub(crate) struct HeaderEntry {
    pub count: u64,
    pub nodes: Vec<usize>,
}

/// A weighted path of ranks in ascending order
pub(crate) type WeightedPath = (Vec<u32>, u64);

#[derive(Debug, Clone)]
pub(crate) struct FpTree {
    nodes: Vec<FpNode>,
    header: BTreeMap<u32, HeaderEntry>,
}

impl FpTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![FpNode::root()],
            header: BTreeMap::new(),
        }
    }

    /// Build a tree from weighted paths, keeping only ranks whose total
    /// weight passes `keep`.
    pub fn build<F>(paths: &[WeightedPath], keep: F) -> Self
    where
        F: Fn(u64) -> bool,
    {
        let mut totals: HashMap<u32, u64> = HashMap::new();
        for (path, count) in paths {
            for &rank in path {
                *totals.entry(rank).or_insert(0) += count;
            }
        }

        let mut tree = Self::new();
        let mut filtered = Vec::new();
        for (path, count) in paths {
            filtered.clear();
            filtered.extend(
                path.iter()
                    .copied()
                    .filter(|rank| totals.get(rank).is_some_and(|&total| keep(total))),
            );
            tree.insert(&filtered, *count);
        }
        tree
    }

    /// Insert one path (ranks ascending) with multiplicity `count`.
    pub fn insert(&mut self, path: &[u32], count: u64) {
        if path.is_empty() || count == 0 {
            return;
        }
        debug_assert!(path.windows(2).all(|w| w[0] < w[1]));

        let mut node_idx = ROOT;
        for &rank in path {
            let next_idx = if let Some(&child) = self.nodes[node_idx].children.get(&rank) {
                child
            } else {
                let child = self.nodes.len();
                self.nodes.push(FpNode {
                    rank,
                    count: 0,
                    parent: node_idx,
                    children: HashMap::new(),
                });
                self.nodes[node_idx].children.insert(rank, child);
                self.header.entry(rank).or_default().nodes.push(child);
                child
            };

            self.nodes[next_idx].count += count;
            if let Some(entry) = self.header.get_mut(&rank) {
                entry.count += count;
            }
            node_idx = next_idx;
        }
    }

    /// Ranks present in the tree with their total counts, most frequent rank first.
    pub fn header(&self) -> impl DoubleEndedIterator<Item = (u32, &HeaderEntry)> {
        self.header.iter().map(|(&rank, entry)| (rank, entry))
    }

    /// Conditional pattern base of `rank`: the prefix path above every node
    /// carrying `rank`, weighted by that node's count.
    pub fn prefix_paths(&self, rank: u32) -> Vec<WeightedPath> {
        let Some(entry) = self.header.get(&rank) else {
            return Vec::new();
        };

        let mut paths = Vec::with_capacity(entry.nodes.len());
        for &node_idx in &entry.nodes {
            let node = &self.nodes[node_idx];
            let mut path = Vec::new();
            let mut cursor = node.parent;
            while cursor != ROOT {
                path.push(self.nodes[cursor].rank);
                cursor = self.nodes[cursor].parent;
            }
            if !path.is_empty() {
                path.reverse();
                paths.push((path, node.count));
            }
        }
        paths
    }

    /// Number of item nodes, root excluded
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> FpTree {
        let mut tree = FpTree::new();
        tree.insert(&[0, 1], 1);
        tree.insert(&[0, 1], 1);
        tree.insert(&[0, 2], 1);
        tree.insert(&[1, 2], 1);
        tree
    }

    #[test]
    fn test_shared_prefixes() {
        let tree = sample_tree();
        // 0 -> {1, 2}, 1 -> 2
        assert_eq!(tree.node_count(), 5);

        let header: Vec<(u32, u64, usize)> = tree
            .header()
            .map(|(rank, entry)| (rank, entry.count, entry.nodes.len()))
            .collect();
        assert_eq!(header, vec![(0, 3, 1), (1, 3, 2), (2, 2, 2)]);
    }

    #[test]
    fn test_prefix_paths() {
        let tree = sample_tree();
        let mut paths = tree.prefix_paths(2);
        paths.sort();
        assert_eq!(paths, vec![(vec![0], 1), (vec![1], 1)]);

        let paths = tree.prefix_paths(1);
        // the root-level node for rank 1 has no prefix
        assert_eq!(paths, vec![(vec![0], 2)]);

        assert!(tree.prefix_paths(0).is_empty());
        assert!(tree.prefix_paths(9).is_empty());
    }

    #[test]
    fn test_build_filters_infrequent_ranks() {
        let paths = vec![(vec![0, 1, 3], 2), (vec![0, 3], 1), (vec![1], 1)];
        let tree = FpTree::build(&paths, |total| total >= 3);
        let ranks: Vec<u32> = tree.header().map(|(rank, _)| rank).collect();
        assert_eq!(ranks, vec![0, 1, 3]);

        let tree = FpTree::build(&paths, |total| total >= 4);
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 0);
    }

    #[test]
    fn test_empty_paths_are_ignored() {
        let mut tree = FpTree::new();
        tree.insert(&[], 5);
        tree.insert(&[2], 0);
        assert!(tree.is_empty());
    }
}
