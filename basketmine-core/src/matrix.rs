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

//! Compressed Sparse Row (CSR) incidence matrix
//!
//! Baskets are sparse: a retail catalog has thousands of products but a
//! basket holds a handful. The matrix therefore stores, per transaction,
//! only the sorted ids of the items it contains:
//!
//! - `items`: flat array of all item ids, row after row
//! - `offsets`: `offsets[i]..offsets[i + 1]` is the slice of row `i`
//!
//! Cell `(i, j)` is true iff `j` appears in row `i`. The matrix is
//! immutable once built and can be shared between concurrent mining runs.

use crate::error::{BasketError, BasketResult};
use crate::item::{ItemCatalog, ItemId};
use std::sync::Arc;

/// Boolean transactions x items matrix
#[derive(Debug, Clone)]
pub struct IncidenceMatrix {
    catalog: Arc<ItemCatalog>,
    items: Vec<ItemId>,
    offsets: Vec<usize>,
}

impl IncidenceMatrix {
    /// Build from per-transaction item ids. Ids are sorted and deduplicated per row.
    pub fn from_rows<I>(catalog: Arc<ItemCatalog>, rows: I) -> BasketResult<Self>
    where
        I: IntoIterator<Item = Vec<ItemId>>,
    {
        let mut items = Vec::new();
        let mut offsets = vec![0];

        for mut row in rows {
            row.sort_unstable();
            row.dedup();
            if let Some(&last) = row.last() {
                if last.index() >= catalog.len() {
                    return Err(BasketError::InvalidInput(format!(
                        "item {} outside vocabulary of {} items",
                        last,
                        catalog.len()
                    )));
                }
            }
            items.extend(row);
            offsets.push(items.len());
        }

        Ok(Self {
            catalog,
            items,
            offsets,
        })
    }

    /// Build from a dense boolean matrix with one label per column.
    pub fn from_dense<S: AsRef<str>>(labels: &[S], cells: &[Vec<bool>]) -> BasketResult<Self> {
        let catalog = ItemCatalog::from_labels(labels);
        if catalog.len() != labels.len() {
            return Err(BasketError::InvalidInput(
                "duplicate column labels in dense matrix".to_string(),
            ));
        }

        let mut rows = Vec::with_capacity(cells.len());
        for (i, row) in cells.iter().enumerate() {
            if row.len() != labels.len() {
                return Err(BasketError::InvalidInput(format!(
                    "row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    labels.len()
                )));
            }
            rows.push(
                row.iter()
                    .enumerate()
                    .filter(|(_, set)| **set)
                    .map(|(j, _)| ItemId(j as u32))
                    .collect(),
            );
        }

        Self::from_rows(Arc::new(catalog), rows)
    }

    /// Number of transactions (N)
    pub fn n_rows(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Vocabulary size (M)
    pub fn n_cols(&self) -> usize {
        self.catalog.len()
    }

    pub fn catalog(&self) -> &Arc<ItemCatalog> {
        &self.catalog
    }

    /// Sorted item ids of transaction `i`.
    pub fn row(&self, i: usize) -> &[ItemId] {
        &self.items[self.offsets[i]..self.offsets[i + 1]]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[ItemId]> {
        (0..self.n_rows()).map(move |i| self.row(i))
    }

    pub fn contains(&self, i: usize, item: ItemId) -> bool {
        self.row(i).binary_search(&item).is_ok()
    }

    /// Number of set cells
    pub fn nnz(&self) -> usize {
        self.items.len()
    }

    /// Per-column count of transactions containing the item.
    pub fn column_counts(&self) -> Vec<u64> {
        let mut counts = vec![0u64; self.n_cols()];
        for &item in &self.items {
            counts[item.index()] += 1;
        }
        counts
    }

    /// Count transactions containing every item of `itemset` by scanning all rows.
    pub fn count_containing(&self, itemset: &[ItemId]) -> u64 {
        self.rows()
            .filter(|row| itemset.iter().all(|item| row.binary_search(item).is_ok()))
            .count() as u64
    }
}
