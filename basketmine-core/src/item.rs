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

//! Item interning
//!
//! Every item label is mapped to a dense `ItemId` once, at encoding time.
//! Mining, rule derivation and queries work on ids; labels are looked up
//! again only when results are displayed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Dense identifier of a vocabulary item (column index in the incidence matrix)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u32);

impl ItemId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Vocabulary of item labels, indexed by `ItemId`
///
/// Serialized as the plain list of labels in id order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ItemCatalog {
    labels: Vec<String>,
    by_label: HashMap<String, ItemId>,
}

impl From<Vec<String>> for ItemCatalog {
    fn from(labels: Vec<String>) -> Self {
        Self::from_labels(labels)
    }
}

impl From<ItemCatalog> for Vec<String> {
    fn from(catalog: ItemCatalog) -> Self {
        catalog.labels
    }
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from labels in order; repeated labels keep their first id.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut catalog = Self::new();
        for label in labels {
            catalog.intern(label.as_ref());
        }
        catalog
    }

    /// Get or assign the id for a label.
    pub fn intern(&mut self, label: &str) -> ItemId {
        if let Some(&id) = self.by_label.get(label) {
            return id;
        }
        let id = ItemId(self.labels.len() as u32);
        self.labels.push(label.to_string());
        self.by_label.insert(label.to_string(), id);
        id
    }

    pub fn id_of(&self, label: &str) -> Option<ItemId> {
        self.by_label.get(label).copied()
    }

    pub fn label(&self, id: ItemId) -> Option<&str> {
        self.labels.get(id.index()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate `(id, label)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemId, &str)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| (ItemId(i as u32), label.as_str()))
    }
}
