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

//! Basketmine Query
//!
//! Read-only lookups over a mined rule set: exact item containment,
//! case-insensitive keyword search, single-item recommendations and top-N
//! selection, plus summaries and display views.

pub mod query;
pub mod summary;
pub mod view;

pub use query::RuleQuery;
pub use summary::RuleSummary;
pub use view::{ItemsetView, RuleView, LABEL_SEPARATOR};
