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

//! Itemsets and the miner's output collection

use crate::item::{ItemCatalog, ItemId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Non-empty set of distinct items, stored sorted.
///
/// Equality and hashing depend only on the members, never on the order in
/// which they were discovered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Vec<ItemId>", into = "Vec<ItemId>")]
pub struct Itemset {
    items: SmallVec<[ItemId; 4]>,
}

impl Itemset {
    pub fn new<I: IntoIterator<Item = ItemId>>(items: I) -> Self {
        let mut items: SmallVec<[ItemId; 4]> = items.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Self { items }
    }

    pub fn single(item: ItemId) -> Self {
        let mut items = SmallVec::new();
        items.push(item);
        Self { items }
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.items.binary_search(&item).is_ok()
    }

    pub fn is_subset_of(&self, other: &Itemset) -> bool {
        self.items.iter().all(|&item| other.contains(item))
    }

    /// Members selected by the bits of `mask` (bit i = i-th smallest item).
    pub fn select(&self, mask: u64) -> Itemset {
        Self {
            items: self
                .items
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1u64 << *i) != 0)
                .map(|(_, &item)| item)
                .collect(),
        }
    }
}

impl From<Vec<ItemId>> for Itemset {
    fn from(items: Vec<ItemId>) -> Self {
        Self::new(items)
    }
}

impl From<Itemset> for Vec<ItemId> {
    fn from(itemset: Itemset) -> Self {
        itemset.items.into_vec()
    }
}

impl FromIterator<ItemId> for Itemset {
    fn from_iter<T: IntoIterator<Item = ItemId>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// An itemset with its exact support
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequentItemset {
    pub itemset: Itemset,
    /// Number of transactions containing every member
    pub count: u64,
    /// `count / n_transactions`
    pub support: f64,
}

impl FrequentItemset {
    /// Cardinality of the itemset
    pub fn len(&self) -> usize {
        self.itemset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemset.is_empty()
    }
}

/// All frequent itemsets of one mining run, indexed by member set.
#[derive(Debug, Clone)]
pub struct FrequentItemsets {
    entries: Vec<FrequentItemset>,
    index: HashMap<Itemset, usize>,
    n_transactions: usize,
    catalog: Arc<ItemCatalog>,
}

impl FrequentItemsets {
    pub fn new(catalog: Arc<ItemCatalog>, n_transactions: usize) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            n_transactions,
            catalog,
        }
    }

    /// Record an itemset with its transaction count.
    ///
    /// Returns false, and keeps the first record, if the member set is
    /// already present.
    pub fn insert(&mut self, itemset: Itemset, count: u64) -> bool {
        if self.index.contains_key(&itemset) {
            return false;
        }
        let support = if self.n_transactions == 0 {
            0.0
        } else {
            count as f64 / self.n_transactions as f64
        };
        self.index.insert(itemset.clone(), self.entries.len());
        self.entries.push(FrequentItemset {
            itemset,
            count,
            support,
        });
        true
    }

    pub fn get(&self, itemset: &Itemset) -> Option<&FrequentItemset> {
        self.index.get(itemset).map(|&i| &self.entries[i])
    }

    pub fn support_of(&self, itemset: &Itemset) -> Option<f64> {
        self.get(itemset).map(|f| f.support)
    }

    pub fn contains(&self, itemset: &Itemset) -> bool {
        self.index.contains_key(itemset)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrequentItemset> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn n_transactions(&self) -> usize {
        self.n_transactions
    }

    pub fn catalog(&self) -> &Arc<ItemCatalog> {
        &self.catalog
    }

    /// Itemsets with exactly `len` members.
    pub fn by_length(&self, len: usize) -> impl Iterator<Item = &FrequentItemset> {
        self.entries.iter().filter(move |f| f.len() == len)
    }

    /// Number of itemsets per cardinality.
    pub fn length_distribution(&self) -> BTreeMap<usize, usize> {
        let mut distribution = BTreeMap::new();
        for entry in &self.entries {
            *distribution.entry(entry.len()).or_insert(0) += 1;
        }
        distribution
    }

    /// Labels of an itemset's members, in id order.
    pub fn labels(&self, itemset: &Itemset) -> Vec<&str> {
        itemset
            .items()
            .iter()
            .filter_map(|&id| self.catalog.label(id))
            .collect()
    }

    /// Sort entries by support descending, then by members. Lookups are unaffected.
    pub fn sort_by_support(&mut self) {
        self.entries.sort_by(|a, b| {
            b.support
                .total_cmp(&a.support)
                .then_with(|| a.itemset.cmp(&b.itemset))
        });
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, f)| (f.itemset.clone(), i))
            .collect();
    }
}

impl<'a> IntoIterator for &'a FrequentItemsets {
    type Item = &'a FrequentItemset;
    type IntoIter = std::slice::Iter<'a, FrequentItemset>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Itemset {
        Itemset::new(raw.iter().map(|&i| ItemId(i)))
    }

    #[test]
    fn test_itemset_is_order_independent() {
        assert_eq!(ids(&[3, 1, 2]), ids(&[1, 2, 3]));
        assert_eq!(ids(&[1, 1, 2]).len(), 2);
        assert!(ids(&[1, 3]).is_subset_of(&ids(&[1, 2, 3])));
        assert!(!ids(&[1, 4]).is_subset_of(&ids(&[1, 2, 3])));
    }

    #[test]
    fn test_select_mask() {
        let set = ids(&[5, 7, 9]);
        assert_eq!(set.select(0b101), ids(&[5, 9]));
        assert_eq!(set.select(0b010), ids(&[7]));
    }

    #[test]
    fn test_insert_and_lookup() {
        let catalog = Arc::new(ItemCatalog::from_labels(["A", "B", "C"]));
        let mut sets = FrequentItemsets::new(catalog, 4);
        assert!(sets.insert(ids(&[0]), 3));
        assert!(sets.insert(ids(&[0, 1]), 2));
        assert!(!sets.insert(ids(&[1, 0]), 1));

        assert_eq!(sets.len(), 2);
        assert_eq!(sets.support_of(&ids(&[1, 0])), Some(0.5));
        assert_eq!(sets.get(&ids(&[0])).unwrap().count, 3);
        assert_eq!(sets.support_of(&ids(&[2])), None);
        assert_eq!(sets.labels(&ids(&[1, 0])), vec!["A", "B"]);
    }

    #[test]
    fn test_length_distribution_and_sort() {
        let catalog = Arc::new(ItemCatalog::from_labels(["A", "B", "C"]));
        let mut sets = FrequentItemsets::new(catalog, 10);
        sets.insert(ids(&[2]), 4);
        sets.insert(ids(&[0]), 9);
        sets.insert(ids(&[0, 2]), 3);

        let dist = sets.length_distribution();
        assert_eq!(dist.get(&1), Some(&2));
        assert_eq!(dist.get(&2), Some(&1));
        assert_eq!(sets.by_length(2).count(), 1);

        sets.sort_by_support();
        let order: Vec<u64> = sets.iter().map(|f| f.count).collect();
        assert_eq!(order, vec![9, 4, 3]);
        assert_eq!(sets.get(&ids(&[0, 2])).unwrap().count, 3);
    }

    #[test]
    fn test_deserialize_normalizes_members() {
        let restored: Itemset = serde_json::from_str("[2, 0, 2]").unwrap();
        assert_eq!(restored, ids(&[0, 2]));
        assert_eq!(restored.len(), 2);
        assert!(restored.contains(ItemId(2)));

        let json = serde_json::to_string(&ids(&[9, 4])).unwrap();
        assert_eq!(json, "[4,9]");
        let back: Itemset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ids(&[4, 9]));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn complementary_masks_partition(
                raw in proptest::collection::vec(0u32..64, 1..12),
                mask in any::<u64>(),
            ) {
                let set = ids(&raw);
                let full = (1u64 << set.len()) - 1;
                let left = set.select(mask & full);
                let right = set.select(!mask & full);

                prop_assert_eq!(left.len() + right.len(), set.len());
                prop_assert!(left.items().iter().all(|&i| !right.contains(i)));
                prop_assert!(left.is_subset_of(&set) && right.is_subset_of(&set));
                let union: Itemset = left.items().iter().chain(right.items()).copied().collect();
                prop_assert_eq!(union, set);
            }
        }
    }
}
