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

//! Association rule generation
//!
//! Every frequent itemset of two or more items is split into each
//! (antecedent, consequent) pair of non-empty complementary subsets. The
//! supports of both sides are looked up in the mined itemsets: anti-
//! monotonicity guarantees they are present, and a missing subset means the
//! input did not come from a complete mining run.

use basketmine_core::{
    AbortSignal, AssociationRule, BasketError, BasketResult, FrequentItemsets, ItemCatalog,
    Itemset, RuleParams, RuleSet,
};
use tracing::debug;

/// Largest itemset whose subsets fit in a `u64` mask
const MAX_SPLIT_LEN: usize = 63;

/// Derives scored rules from a snapshot of frequent itemsets
#[derive(Debug, Clone)]
pub struct RuleGenerator {
    params: RuleParams,
    abort: Option<AbortSignal>,
    /// Raise `abort` once this many splits have been considered
    #[cfg(test)]
    trip_after: Option<usize>,
}

impl RuleGenerator {
    pub fn new(params: RuleParams) -> Self {
        Self {
            params,
            abort: None,
            #[cfg(test)]
            trip_after: None,
        }
    }

    /// Check `signal` between itemsets.
    pub fn with_abort(mut self, signal: AbortSignal) -> Self {
        self.abort = Some(signal);
        self
    }

    pub fn params(&self) -> &RuleParams {
        &self.params
    }

    /// Generate every rule passing the metric threshold, then the optional
    /// confidence filter, sorted by lift descending.
    pub fn generate(&self, itemsets: &FrequentItemsets) -> BasketResult<RuleSet> {
        self.params.validate()?;

        let mut rules = Vec::new();
        let mut candidates = 0usize;
        for frequent in itemsets.iter().filter(|f| f.len() >= 2) {
            if let Some(signal) = &self.abort {
                signal.check()?;
            }
            candidates += self.split(itemsets, &frequent.itemset, frequent.support, &mut rules)?;
            #[cfg(test)]
            self.trip_if_due(candidates);
        }

        sort_rules(&mut rules, itemsets.catalog());
        debug!(
            itemsets = itemsets.len(),
            candidates,
            rules = rules.len(),
            metric = %self.params.metric,
            "Generated association rules"
        );
        Ok(RuleSet::new(itemsets.catalog().clone(), rules))
    }

    /// Push the rules of one itemset that pass both filters; returns the
    /// number of splits considered.
    fn split(
        &self,
        itemsets: &FrequentItemsets,
        itemset: &Itemset,
        support: f64,
        out: &mut Vec<AssociationRule>,
    ) -> BasketResult<usize> {
        let len = itemset.len();
        if len > MAX_SPLIT_LEN {
            return Err(BasketError::InvalidInput(format!(
                "itemset of {} items is too large to split into rules",
                len
            )));
        }

        let full: u64 = (1u64 << len) - 1;
        let mut considered = 0;
        for mask in 1..full {
            let antecedent = itemset.select(mask);
            let consequent = itemset.select(full & !mask);
            let antecedent_support = lookup(itemsets, &antecedent, itemset)?;
            let consequent_support = lookup(itemsets, &consequent, itemset)?;
            considered += 1;

            let rule = AssociationRule::from_supports(
                antecedent,
                consequent,
                antecedent_support,
                consequent_support,
                support,
            );
            if self.accepts(&rule) {
                out.push(rule);
            }
        }
        Ok(considered)
    }

    #[cfg(test)]
    fn trip_if_due(&self, candidates: usize) {
        if let (Some(after), Some(signal)) = (self.trip_after, &self.abort) {
            if candidates >= after {
                signal.abort();
            }
        }
    }

    /// Primary metric first, then the secondary confidence filter.
    fn accepts(&self, rule: &AssociationRule) -> bool {
        if rule.metric(self.params.metric) < self.params.min_threshold {
            return false;
        }
        match self.params.min_confidence {
            Some(min_confidence) => rule.confidence >= min_confidence,
            None => true,
        }
    }
}

fn lookup(itemsets: &FrequentItemsets, subset: &Itemset, parent: &Itemset) -> BasketResult<f64> {
    itemsets.support_of(subset).ok_or_else(|| {
        BasketError::InconsistentItemsets(format!(
            "subset {:?} of frequent itemset {:?} was not mined",
            itemsets.labels(subset),
            itemsets.labels(parent)
        ))
    })
}

/// Lift descending, then antecedent labels, then consequent labels.
///
/// Label keys are resolved once per rule before sorting.
fn sort_rules(rules: &mut Vec<AssociationRule>, catalog: &ItemCatalog) {
    let mut keyed: Vec<(Vec<&str>, Vec<&str>, AssociationRule)> = rules
        .drain(..)
        .map(|rule| {
            (
                labels(catalog, &rule.antecedent),
                labels(catalog, &rule.consequent),
                rule,
            )
        })
        .collect();
    keyed.sort_by(|(a_ante, a_cons, a), (b_ante, b_cons, b)| {
        b.lift
            .total_cmp(&a.lift)
            .then_with(|| a_ante.cmp(b_ante))
            .then_with(|| a_cons.cmp(b_cons))
            .then_with(|| a.antecedent.cmp(&b.antecedent))
            .then_with(|| a.consequent.cmp(&b.consequent))
    });
    rules.extend(keyed.into_iter().map(|(_, _, rule)| rule));
}

fn labels<'a>(catalog: &'a ItemCatalog, itemset: &Itemset) -> Vec<&'a str> {
    itemset
        .items()
        .iter()
        .map(|&id| catalog.label(id).unwrap_or(""))
        .collect()
}

/// Generate rules from `itemsets` with `params`.
pub fn generate(itemsets: &FrequentItemsets, params: RuleParams) -> BasketResult<RuleSet> {
    RuleGenerator::new(params).generate(itemsets)
}
