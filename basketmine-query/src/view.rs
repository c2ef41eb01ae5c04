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

//! Display projections
//!
//! Labels are joined into strings here and nowhere else; the views are
//! output only and never feed back into mining or lookups.

use basketmine_core::{AssociationRule, FrequentItemset, ItemCatalog, Itemset};
use serde::Serialize;

/// Separator between labels of a multi-item side
pub const LABEL_SEPARATOR: &str = ", ";

/// A rule with its item ids replaced by labels
///
/// Infinite conviction serializes as `null` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleView {
    pub antecedent: String,
    pub consequent: String,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    pub leverage: f64,
    pub conviction: f64,
    pub zhangs_metric: f64,
}

impl RuleView {
    pub fn new(rule: &AssociationRule, catalog: &ItemCatalog) -> Self {
        Self {
            antecedent: join_labels(&rule.antecedent, catalog),
            consequent: join_labels(&rule.consequent, catalog),
            antecedent_support: rule.antecedent_support,
            consequent_support: rule.consequent_support,
            support: rule.support,
            confidence: rule.confidence,
            lift: rule.lift,
            leverage: rule.leverage,
            conviction: rule.conviction,
            zhangs_metric: rule.zhangs_metric,
        }
    }

    pub fn from_rules<'a, I>(rules: I, catalog: &ItemCatalog) -> Vec<Self>
    where
        I: IntoIterator<Item = &'a AssociationRule>,
    {
        rules.into_iter().map(|rule| Self::new(rule, catalog)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemsetView {
    pub items: String,
    pub length: usize,
    pub count: u64,
    pub support: f64,
}

impl ItemsetView {
    pub fn new(frequent: &FrequentItemset, catalog: &ItemCatalog) -> Self {
        Self {
            items: join_labels(&frequent.itemset, catalog),
            length: frequent.len(),
            count: frequent.count,
            support: frequent.support,
        }
    }
}

/// Labels of `itemset` in catalog order, joined by [`LABEL_SEPARATOR`].
pub fn join_labels(itemset: &Itemset, catalog: &ItemCatalog) -> String {
    itemset
        .items()
        .iter()
        .filter_map(|&id| catalog.label(id))
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use basketmine_core::ItemId;

    fn catalog() -> ItemCatalog {
        ItemCatalog::from_labels(["bread", "butter", "jam"])
    }

    #[test]
    fn test_rule_view() {
        let rule = AssociationRule::from_supports(
            Itemset::new([ItemId(2), ItemId(0)]),
            Itemset::single(ItemId(1)),
            0.25,
            0.5,
            0.25,
        );
        let view = RuleView::new(&rule, &catalog());
        assert_eq!(view.antecedent, "bread, jam");
        assert_eq!(view.consequent, "butter");
        assert_eq!(view.lift, 2.0);
        assert_eq!(view.conviction, f64::INFINITY);
    }

    #[test]
    fn test_itemset_view() {
        let frequent = FrequentItemset {
            itemset: Itemset::new([ItemId(1), ItemId(0)]),
            count: 3,
            support: 0.3,
        };
        let view = ItemsetView::new(&frequent, &catalog());
        assert_eq!(view.items, "bread, butter");
        assert_eq!(view.length, 2);
    }
}
