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

//! Association rules derived from frequent itemsets

use crate::item::{ItemCatalog, ItemId};
use crate::itemset::Itemset;
use crate::params::RuleMetric;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// "If antecedent then consequent", scored from itemset supports.
///
/// `antecedent` and `consequent` are disjoint and non-empty; their union is
/// a mined itemset whose support is `support`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    /// Support of `antecedent ∪ consequent`
    pub support: f64,
    /// `support / antecedent_support`
    pub confidence: f64,
    /// `confidence / consequent_support`
    pub lift: f64,
    /// `support - antecedent_support * consequent_support`
    pub leverage: f64,
    /// `(1 - consequent_support) / (1 - confidence)`, `+inf` at confidence 1
    pub conviction: f64,
    /// Zhang's metric in [-1, 1], 0 when undefined
    pub zhangs_metric: f64,
}

impl AssociationRule {
    /// Score a rule from the three supports involved.
    ///
    /// Callers pass supports looked up from mined itemsets; nothing here
    /// counts transactions.
    pub fn from_supports(
        antecedent: Itemset,
        consequent: Itemset,
        antecedent_support: f64,
        consequent_support: f64,
        support: f64,
    ) -> Self {
        let confidence = support / antecedent_support;
        let lift = confidence / consequent_support;
        let leverage = support - antecedent_support * consequent_support;
        let conviction = if confidence >= 1.0 {
            f64::INFINITY
        } else {
            (1.0 - consequent_support) / (1.0 - confidence)
        };
        let zhang_denominator = f64::max(
            support * (1.0 - antecedent_support),
            antecedent_support * (consequent_support - support),
        );
        let zhangs_metric = if zhang_denominator == 0.0 {
            0.0
        } else {
            leverage / zhang_denominator
        };

        Self {
            antecedent,
            consequent,
            antecedent_support,
            consequent_support,
            support,
            confidence,
            lift,
            leverage,
            conviction,
            zhangs_metric,
        }
    }

    pub fn metric(&self, metric: RuleMetric) -> f64 {
        match metric {
            RuleMetric::Support => self.support,
            RuleMetric::Confidence => self.confidence,
            RuleMetric::Lift => self.lift,
            RuleMetric::Leverage => self.leverage,
            RuleMetric::Conviction => self.conviction,
        }
    }

    /// Union of antecedent and consequent
    pub fn itemset(&self) -> Itemset {
        self.antecedent
            .items()
            .iter()
            .chain(self.consequent.items())
            .copied()
            .collect()
    }

    pub fn mentions(&self, item: ItemId) -> bool {
        self.antecedent.contains(item) || self.consequent.contains(item)
    }
}

/// Rules of one generation run, sorted strongest first, with the vocabulary
/// needed to display them.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<AssociationRule>,
    catalog: Arc<ItemCatalog>,
}

impl RuleSet {
    pub fn new(catalog: Arc<ItemCatalog>, rules: Vec<AssociationRule>) -> Self {
        Self { rules, catalog }
    }

    pub fn empty(catalog: Arc<ItemCatalog>) -> Self {
        Self::new(catalog, Vec::new())
    }

    pub fn rules(&self) -> &[AssociationRule] {
        &self.rules
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AssociationRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn catalog(&self) -> &Arc<ItemCatalog> {
        &self.catalog
    }

    /// Labels of an itemset's members, in id order.
    pub fn labels_of(&self, itemset: &Itemset) -> Vec<&str> {
        itemset
            .items()
            .iter()
            .filter_map(|&id| self.catalog.label(id))
            .collect()
    }

    pub fn into_rules(self) -> Vec<AssociationRule> {
        self.rules
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a AssociationRule;
    type IntoIter = std::slice::Iter<'a, AssociationRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(s_a: f64, s_c: f64, s_ac: f64) -> AssociationRule {
        AssociationRule::from_supports(
            Itemset::single(ItemId(0)),
            Itemset::single(ItemId(1)),
            s_a,
            s_c,
            s_ac,
        )
    }

    #[test]
    fn test_metrics() {
        let r = rule(0.75, 0.75, 0.5);
        assert!((r.confidence - 2.0 / 3.0).abs() < 1e-12);
        assert!((r.lift - 8.0 / 9.0).abs() < 1e-12);
        assert!((r.leverage - (0.5 - 0.5625)).abs() < 1e-12);
        assert!((r.conviction - 0.75).abs() < 1e-12);
        assert!(r.zhangs_metric < 0.0);
        assert_eq!(r.metric(RuleMetric::Lift), r.lift);
    }

    #[test]
    fn test_conviction_at_full_confidence() {
        let r = rule(0.5, 0.5, 0.5);
        assert_eq!(r.confidence, 1.0);
        assert_eq!(r.lift, 2.0);
        assert!(r.conviction.is_infinite() && r.conviction > 0.0);
        assert_eq!(r.metric(RuleMetric::Conviction), f64::INFINITY);
    }

    #[test]
    fn test_zhang_degenerate() {
        // consequent in every transaction: no information either way
        let r = rule(0.5, 1.0, 0.5);
        assert_eq!(r.leverage, 0.0);
        assert_eq!(r.zhangs_metric, 0.0);
    }

    #[test]
    fn test_itemset_union() {
        let r = rule(0.5, 0.5, 0.5);
        assert_eq!(r.itemset(), Itemset::new([ItemId(1), ItemId(0)]));
        assert!(r.mentions(ItemId(1)));
        assert!(!r.mentions(ItemId(2)));
    }
}
