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

//! Rule lookups
//!
//! Matching is done on item ids: a label is resolved through the rule set's
//! catalog once, then rules are tested for set membership. Every result is
//! ordered by lift descending; rules of equal lift keep their order in the
//! rule set.

use basketmine_core::{AssociationRule, ItemId, RuleMetric, RuleSet};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Query handle over a rule set
#[derive(Debug, Clone, Copy)]
pub struct RuleQuery<'a> {
    rules: &'a RuleSet,
}

impl<'a> RuleQuery<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    pub fn rule_set(&self) -> &'a RuleSet {
        self.rules
    }

    /// Rules with `label` in the antecedent or the consequent.
    ///
    /// Unknown labels match nothing.
    pub fn rules_for_item(&self, label: &str) -> Vec<&'a AssociationRule> {
        match self.rules.catalog().id_of(label) {
            Some(item) => self.rules_containing(item),
            None => Vec::new(),
        }
    }

    pub fn rules_containing(&self, item: ItemId) -> Vec<&'a AssociationRule> {
        by_lift(self.rules.iter().filter(|rule| rule.mentions(item)).collect())
    }

    /// Rules mentioning any item whose label contains `keyword`, ignoring case.
    ///
    /// An empty keyword matches every rule.
    pub fn search(&self, keyword: &str) -> Vec<&'a AssociationRule> {
        let needle = keyword.to_lowercase();
        if needle.is_empty() {
            return by_lift(self.rules.iter().collect());
        }

        let matching: HashSet<ItemId> = self
            .rules
            .catalog()
            .iter()
            .filter(|(_, label)| label.to_lowercase().contains(&needle))
            .map(|(id, _)| id)
            .collect();
        debug!(keyword, items = matching.len(), "Resolved search keyword");
        if matching.is_empty() {
            return Vec::new();
        }

        by_lift(
            self.rules
                .iter()
                .filter(|rule| {
                    rule.antecedent
                        .items()
                        .iter()
                        .chain(rule.consequent.items())
                        .any(|item| matching.contains(item))
                })
                .collect(),
        )
    }

    /// Rules whose antecedent is exactly `{label}`, strongest `limit` first.
    pub fn recommend(&self, label: &str, limit: usize) -> Vec<&'a AssociationRule> {
        let Some(item) = self.rules.catalog().id_of(label) else {
            return Vec::new();
        };
        let mut found = by_lift(
            self.rules
                .iter()
                .filter(|rule| rule.antecedent.items() == [item])
                .collect(),
        );
        found.truncate(limit);
        found
    }

    /// The `n` rules with the largest value of `metric`. NaN values rank last.
    pub fn top_by(&self, metric: RuleMetric, n: usize) -> Vec<&'a AssociationRule> {
        let mut ranked: Vec<&AssociationRule> = self.rules.iter().collect();
        ranked.sort_by(|a, b| descending(a.metric(metric), b.metric(metric)));
        ranked.truncate(n);
        ranked
    }
}

fn by_lift(mut rules: Vec<&AssociationRule>) -> Vec<&AssociationRule> {
    rules.sort_by(|a, b| descending(a.lift, b.lift));
    rules
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basketmine_core::{ItemCatalog, Itemset};
    use std::sync::Arc;

    fn rule(a: &[u32], c: &[u32], lift: f64) -> AssociationRule {
        let mut rule = AssociationRule::from_supports(
            Itemset::new(a.iter().map(|&i| ItemId(i))),
            Itemset::new(c.iter().map(|&i| ItemId(i))),
            0.5,
            0.5,
            0.25,
        );
        rule.lift = lift;
        rule
    }

    fn rule_set() -> RuleSet {
        let catalog = Arc::new(ItemCatalog::from_labels([
            "Whole Milk",
            "Yogurt",
            "Rolls/Buns",
            "Soda",
        ]));
        RuleSet::new(
            catalog,
            vec![
                rule(&[0], &[1], 1.2),
                rule(&[2], &[3], 2.5),
                rule(&[1], &[0], 1.8),
                rule(&[0, 2], &[1], 3.0),
            ],
        )
    }

    fn lifts(found: &[&AssociationRule]) -> Vec<f64> {
        found.iter().map(|r| r.lift).collect()
    }

    #[test]
    fn test_rules_for_item() {
        let rules = rule_set();
        let query = RuleQuery::new(&rules);
        assert_eq!(lifts(&query.rules_for_item("Yogurt")), vec![3.0, 1.8, 1.2]);
        assert_eq!(lifts(&query.rules_for_item("Soda")), vec![2.5]);
        assert!(query.rules_for_item("yogurt").is_empty());
        assert!(query.rules_for_item("Caviar").is_empty());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let rules = rule_set();
        let query = RuleQuery::new(&rules);
        assert_eq!(lifts(&query.search("MILK")), vec![3.0, 1.8, 1.2]);
        assert_eq!(lifts(&query.search("buns")), vec![3.0, 2.5]);
        assert!(query.search("caviar").is_empty());
    }

    #[test]
    fn test_empty_keyword_matches_all() {
        let rules = rule_set();
        let query = RuleQuery::new(&rules);
        assert_eq!(lifts(&query.search("")), vec![3.0, 2.5, 1.8, 1.2]);
        // no label contains two spaces
        assert!(query.search("  ").is_empty());
    }

    #[test]
    fn test_search_keeps_surrounding_whitespace() {
        let catalog = Arc::new(ItemCatalog::from_labels(["whole milk", "milkshake", "bread"]));
        let rules = RuleSet::new(
            catalog,
            vec![rule(&[1], &[2], 2.0), rule(&[0], &[2], 1.5)],
        );
        let query = RuleQuery::new(&rules);

        assert_eq!(lifts(&query.search("milk")), vec![2.0, 1.5]);
        assert_eq!(lifts(&query.search(" milk")), vec![1.5]);
        assert_eq!(lifts(&query.search(" MILK")), vec![1.5]);
        assert!(query.search("milk ").is_empty());
    }

    #[test]
    fn test_recommend_single_antecedent() {
        let rules = rule_set();
        let query = RuleQuery::new(&rules);
        // {Whole Milk, Rolls/Buns} -> Yogurt has a compound antecedent
        assert_eq!(lifts(&query.recommend("Whole Milk", 5)), vec![1.2]);
        assert_eq!(lifts(&query.recommend("Yogurt", 0)), Vec::<f64>::new());
        assert!(query.recommend("Caviar", 5).is_empty());
    }

    #[test]
    fn test_top_by() {
        let mut rules = rule_set().into_rules();
        rules[0].confidence = f64::NAN;
        rules[1].confidence = 0.9;
        rules[2].confidence = 0.1;
        rules[3].confidence = 0.5;
        let catalog = Arc::new(ItemCatalog::from_labels(["a", "b", "c", "d"]));
        let rules = RuleSet::new(catalog, rules);
        let query = RuleQuery::new(&rules);

        let top: Vec<f64> = query
            .top_by(RuleMetric::Confidence, 3)
            .iter()
            .map(|r| r.confidence)
            .collect();
        assert_eq!(top, vec![0.9, 0.5, 0.1]);
        assert_eq!(query.top_by(RuleMetric::Lift, 10).len(), 4);
    }
}
