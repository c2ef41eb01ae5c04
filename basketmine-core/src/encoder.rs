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

//! Transaction encoder
//!
//! Turns item-label baskets into an `IncidenceMatrix` over a fixed
//! vocabulary. Column order is deterministic: either sorted by label or
//! in first-seen order.

use crate::error::BasketResult;
use crate::item::{ItemCatalog, ItemId};
use crate::matrix::IncidenceMatrix;
use crate::transaction::{Transaction, TransactionSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Vocabulary column ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnOrder {
    /// Lexicographic by label
    #[default]
    Sorted,
    /// Order of first appearance in the input
    FirstSeen,
}

/// Encoder settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderConfig {
    #[serde(default)]
    pub column_order: ColumnOrder,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionEncoder {
    column_order: ColumnOrder,
}

impl TransactionEncoder {
    pub fn new(column_order: ColumnOrder) -> Self {
        Self { column_order }
    }

    pub fn from_config(config: &EncoderConfig) -> Self {
        Self::new(config.column_order)
    }

    /// Learn the vocabulary of `transactions`.
    pub fn fit(&self, transactions: &TransactionSet) -> ItemCatalog {
        match self.column_order {
            ColumnOrder::Sorted => {
                let labels: BTreeSet<&str> = transactions
                    .iter()
                    .flat_map(clean_labels)
                    .collect();
                ItemCatalog::from_labels(labels)
            }
            ColumnOrder::FirstSeen => {
                ItemCatalog::from_labels(transactions.iter().flat_map(clean_labels))
            }
        }
    }

    /// Encode `transactions` against a fitted vocabulary.
    ///
    /// Labels missing from the catalog are ignored. Transactions left without
    /// any known item stay as empty rows.
    pub fn transform(
        &self,
        catalog: Arc<ItemCatalog>,
        transactions: &TransactionSet,
    ) -> BasketResult<IncidenceMatrix> {
        let rows: Vec<Vec<ItemId>> = transactions
            .iter()
            .map(|t| clean_labels(t).filter_map(|label| catalog.id_of(label)).collect())
            .collect();
        IncidenceMatrix::from_rows(catalog, rows)
    }

    pub fn fit_transform(&self, transactions: &TransactionSet) -> BasketResult<IncidenceMatrix> {
        let catalog = Arc::new(self.fit(transactions));
        let matrix = self.transform(catalog, transactions)?;
        debug!(
            rows = matrix.n_rows(),
            cols = matrix.n_cols(),
            nnz = matrix.nnz(),
            "Encoded transactions"
        );
        Ok(matrix)
    }
}

fn clean_labels(transaction: &Transaction) -> impl Iterator<Item = &str> {
    transaction
        .items
        .iter()
        .map(|label| label.trim())
        .filter(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baskets() -> TransactionSet {
        TransactionSet::from_baskets(vec![
            vec!["Milk", "Bread"],
            vec!["Bread", " Butter ", "Bread"],
            vec!["", "  "],
            vec!["Apple"],
        ])
    }

    #[test]
    fn test_sorted_vocabulary() {
        let catalog = TransactionEncoder::default().fit(&baskets());
        let labels: Vec<&str> = catalog.iter().map(|(_, l)| l).collect();
        assert_eq!(labels, vec!["Apple", "Bread", "Butter", "Milk"]);
    }

    #[test]
    fn test_first_seen_vocabulary() {
        let catalog = TransactionEncoder::new(ColumnOrder::FirstSeen).fit(&baskets());
        let labels: Vec<&str> = catalog.iter().map(|(_, l)| l).collect();
        assert_eq!(labels, vec!["Milk", "Bread", "Butter", "Apple"]);
    }

    #[test]
    fn test_fit_transform() {
        let matrix = TransactionEncoder::default()
            .fit_transform(&baskets())
            .unwrap();
        assert_eq!(matrix.n_rows(), 4);
        assert_eq!(matrix.n_cols(), 4);

        let catalog = matrix.catalog();
        let bread = catalog.id_of("Bread").unwrap();
        let butter = catalog.id_of("Butter").unwrap();
        assert_eq!(matrix.row(1), &[bread, butter]);
        assert!(matrix.row(2).is_empty());
    }

    #[test]
    fn test_transform_ignores_unknown_labels() {
        let encoder = TransactionEncoder::default();
        let catalog = Arc::new(ItemCatalog::from_labels(["Milk"]));
        let matrix = encoder
            .transform(catalog, &TransactionSet::from_baskets(vec![vec!["Milk", "Caviar"]]))
            .unwrap();
        assert_eq!(matrix.row(0), &[ItemId(0)]);
    }
}
