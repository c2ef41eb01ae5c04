// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Transaction file loading
//!
//! The input file is a JSON array. Each element is either a bare list of
//! labels or an object with `items` and an optional `context` map:
//!
//! ```json
//! [
//!   ["whole milk", "yogurt"],
//!   {"items": ["soda", "rolls/buns"], "context": {"season": "winter"}}
//! ]
//! ```

use anyhow::{Context, Result};
use basketmine_core::{Transaction, TransactionSet};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputTransaction {
    Basket(Vec<String>),
    Record(Transaction),
}

impl From<InputTransaction> for Transaction {
    fn from(input: InputTransaction) -> Self {
        match input {
            InputTransaction::Basket(items) => Transaction::new(items),
            InputTransaction::Record(transaction) => transaction,
        }
    }
}

pub fn load_transactions(path: &Path) -> Result<TransactionSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transactions from {:?}", path))?;
    let transactions = parse_transactions(&content)
        .with_context(|| format!("Failed to parse transactions in {:?}", path))?;
    debug!(count = transactions.len(), "Loaded transactions");
    Ok(transactions)
}

pub fn parse_transactions(content: &str) -> Result<TransactionSet> {
    let raw: Vec<InputTransaction> =
        serde_json::from_str(content).context("Expected a JSON array of transactions")?;
    Ok(raw.into_iter().map(Transaction::from).collect())
}
