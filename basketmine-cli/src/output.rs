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

//! Text and JSON rendering

use anyhow::Result;
use basketmine_core::{AssociationRule, FrequentItemsets, RuleSet};
use basketmine_query::{ItemsetView, RuleSummary, RuleView};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Serialize)]
pub struct ItemsetReport {
    pub n_transactions: usize,
    pub length_distribution: BTreeMap<usize, usize>,
    pub itemsets: Vec<ItemsetView>,
}

impl ItemsetReport {
    /// Itemsets by support, strongest first, truncated to `limit`.
    pub fn new(itemsets: &FrequentItemsets, limit: Option<usize>) -> Self {
        let mut sorted = itemsets.clone();
        sorted.sort_by_support();
        let catalog = itemsets.catalog();
        Self {
            n_transactions: itemsets.n_transactions(),
            length_distribution: itemsets.length_distribution(),
            itemsets: sorted
                .iter()
                .take(limit.unwrap_or(usize::MAX))
                .map(|f| ItemsetView::new(f, catalog))
                .collect(),
        }
    }
}

impl fmt::Display for ItemsetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: usize = self.length_distribution.values().sum();
        writeln!(
            f,
            "Found {} frequent itemsets in {} transactions",
            total, self.n_transactions
        )?;
        for (length, count) in &self.length_distribution {
            writeln!(f, "  length {}: {}", length, count)?;
        }
        if self.itemsets.is_empty() {
            return Ok(());
        }

        writeln!(f)?;
        writeln!(f, "{:>8}  {:>6}  Items", "Support", "Count")?;
        for view in &self.itemsets {
            writeln!(f, "{:>8.4}  {:>6}  {}", view.support, view.count, view.items)?;
        }
        if self.itemsets.len() < total {
            writeln!(f, "  ... and {} more", total - self.itemsets.len())?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct RuleReport {
    pub summary: RuleSummary,
    pub rules: Vec<RuleView>,
}

impl RuleReport {
    pub fn new<'a, I>(rules: I, rule_set: &RuleSet, limit: Option<usize>) -> Self
    where
        I: IntoIterator<Item = &'a AssociationRule>,
    {
        let selected: Vec<_> = rules.into_iter().collect();
        let summary = RuleSummary::from_rules(selected.iter().copied());
        let shown = selected.into_iter().take(limit.unwrap_or(usize::MAX));
        let rules = RuleView::from_rules(shown, rule_set.catalog());
        Self { summary, rules }
    }
}

impl fmt::Display for RuleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.summary.is_empty() {
            return writeln!(f, "No rules found");
        }

        writeln!(f, "Found {} rules", self.summary.count)?;
        if let (Some(max_lift), Some(mean_confidence)) =
            (self.summary.max_lift, self.summary.mean_confidence)
        {
            writeln!(
                f,
                "  max lift: {:.3}, mean confidence: {:.3}",
                max_lift, mean_confidence
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:<32} {:<32} {:>8} {:>10} {:>7} {:>10}",
            "Antecedent", "Consequent", "Support", "Confidence", "Lift", "Conviction"
        )?;
        for view in &self.rules {
            writeln!(
                f,
                "{:<32} {:<32} {:>8.4} {:>10.4} {:>7.3} {:>10}",
                view.antecedent,
                view.consequent,
                view.support,
                view.confidence,
                view.lift,
                format_conviction(view.conviction)
            )?;
        }
        if self.rules.len() < self.summary.count {
            writeln!(f, "  ... and {} more", self.summary.count - self.rules.len())?;
        }
        Ok(())
    }
}

fn format_conviction(value: f64) -> String {
    if value.is_infinite() {
        "inf".to_string()
    } else {
        format!("{:.3}", value)
    }
}

pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use basketmine_core::{IncidenceMatrix, MiningParams, RuleMetric, RuleParams};

    fn mined() -> (FrequentItemsets, RuleSet) {
        let matrix = IncidenceMatrix::from_dense(
            &["bread", "milk", "eggs"],
            &[
                vec![true, true, false],
                vec![true, true, false],
                vec![true, false, true],
                vec![false, true, false],
            ],
        )
        .unwrap();
        let itemsets = basketmine_mining::mine(&matrix, MiningParams::new(0.25)).unwrap();
        let params = RuleParams::new(RuleMetric::Confidence, 0.5);
        let rules = basketmine_mining::generate(&itemsets, params).unwrap();
        (itemsets, rules)
    }

    #[test]
    fn test_itemset_report() {
        let (itemsets, _) = mined();
        let report = ItemsetReport::new(&itemsets, Some(2));
        assert_eq!(report.itemsets.len(), 2);
        assert_eq!(report.itemsets[0].items, "bread");
        assert_eq!(report.length_distribution.get(&1), Some(&3));

        let text = report.to_string();
        assert!(text.starts_with("Found 5 frequent itemsets in 4 transactions"));
        assert!(text.contains("... and 3 more"));
    }

    #[test]
    fn test_rule_report() {
        let (_, rules) = mined();
        let report = RuleReport::new(&rules, &rules, None);
        assert_eq!(report.summary.count, rules.len());

        let text = report.to_string();
        assert!(text.contains("eggs"));
        assert!(text.contains("inf"));

        let json: serde_json::Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();
        assert_eq!(json["rules"].as_array().map(Vec::len), Some(rules.len()));
    }

    #[test]
    fn test_empty_rule_report() {
        let (_, rules) = mined();
        let report = RuleReport::new(std::iter::empty(), &rules, None);
        assert_eq!(report.to_string(), "No rules found\n");
    }
}
