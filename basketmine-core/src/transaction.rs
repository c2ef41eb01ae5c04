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

//! Raw transactions as handed over by the loader

use crate::error::{BasketError, BasketResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One basket: item labels plus optional context attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub items: Vec<String>,
    /// Attributes such as store type or season, used for context filtering
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

impl Transaction {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
            context: BTreeMap::new(),
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// True if every filter pair is present with the same value.
    pub fn matches(&self, filter: &ContextFilter) -> bool {
        filter
            .pairs
            .iter()
            .all(|(key, value)| self.context.get(key) == Some(value))
    }
}

/// Conjunction of `key = value` context constraints. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFilter {
    pub pairs: BTreeMap<String, String>,
}

impl ContextFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.insert(key.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Parse a `key=value` argument.
    pub fn parse_pair(s: &str) -> BasketResult<(String, String)> {
        match s.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.trim().to_string()))
            }
            _ => Err(BasketError::invalid(
                "context",
                format!("expected key=value, got `{}`", s),
            )),
        }
    }
}

/// Ordered collection of transactions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionSet {
    transactions: Vec<Transaction>,
}

impl TransactionSet {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Build from bare item lists without context.
    pub fn from_baskets<I, B, S>(baskets: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(baskets.into_iter().map(Transaction::new).collect())
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.transactions.iter()
    }

    pub fn push(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Keep the transactions matching every pair of `filter`.
    pub fn filter_context(&self, filter: &ContextFilter) -> TransactionSet {
        Self::new(
            self.transactions
                .iter()
                .filter(|t| t.matches(filter))
                .cloned()
                .collect(),
        )
    }

    /// Deterministic random sample of `fraction` of the transactions.
    ///
    /// Sampled transactions keep their original relative order. At least one
    /// transaction is kept from a non-empty set.
    pub fn sample(&self, fraction: f64, seed: u64) -> BasketResult<TransactionSet> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(BasketError::invalid(
                "sample_fraction",
                format!("must be in (0, 1], got {}", fraction),
            ));
        }
        if fraction == 1.0 || self.is_empty() {
            return Ok(self.clone());
        }

        let n = self.len();
        let amount = ((n as f64 * fraction).round() as usize).clamp(1, n);
        let mut rng = StdRng::seed_from_u64(seed);
        let mut picked = rand::seq::index::sample(&mut rng, n, amount).into_vec();
        picked.sort_unstable();

        Ok(Self::new(
            picked
                .into_iter()
                .map(|i| self.transactions[i].clone())
                .collect(),
        ))
    }
}

impl<'a> IntoIterator for &'a TransactionSet {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.transactions.iter()
    }
}

impl FromIterator<Transaction> for TransactionSet {
    fn from_iter<T: IntoIterator<Item = Transaction>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
