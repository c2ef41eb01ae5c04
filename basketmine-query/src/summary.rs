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

//! Aggregate statistics over a rule selection

use basketmine_core::AssociationRule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub count: usize,
    /// None for an empty selection
    pub max_lift: Option<f64>,
    /// None for an empty selection
    pub mean_confidence: Option<f64>,
}

impl RuleSummary {
    pub fn from_rules<'a, I>(rules: I) -> Self
    where
        I: IntoIterator<Item = &'a AssociationRule>,
    {
        let mut count = 0usize;
        let mut max_lift: Option<f64> = None;
        let mut confidence_sum = 0.0;

        for rule in rules {
            count += 1;
            confidence_sum += rule.confidence;
            max_lift = Some(match max_lift {
                Some(max) => max.max(rule.lift),
                None => rule.lift,
            });
        }

        Self {
            count,
            max_lift,
            mean_confidence: (count > 0).then(|| confidence_sum / count as f64),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basketmine_core::{ItemId, Itemset};

    #[test]
    fn test_summary() {
        let a = AssociationRule::from_supports(
            Itemset::single(ItemId(0)),
            Itemset::single(ItemId(1)),
            0.5,
            0.5,
            0.5,
        );
        let b = AssociationRule::from_supports(
            Itemset::single(ItemId(1)),
            Itemset::single(ItemId(2)),
            0.5,
            0.8,
            0.25,
        );
        let summary = RuleSummary::from_rules([&a, &b]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.max_lift, Some(2.0));
        assert_eq!(summary.mean_confidence, Some(0.75));
    }

    #[test]
    fn test_empty_summary() {
        let summary = RuleSummary::from_rules(std::iter::empty());
        assert!(summary.is_empty());
        assert_eq!(summary.max_lift, None);
        assert_eq!(summary.mean_confidence, None);
    }
}
