//! Seed values for featured items.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::InteractionRecord;

/// Starting counters for one featured item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedValues {
    pub view_count: u64,
    pub like_count: u64,
    pub save_count: u64,
}

impl SeedValues {
    pub const fn new(view_count: u64, like_count: u64, save_count: u64) -> Self {
        Self {
            view_count,
            like_count,
            save_count,
        }
    }
}

/// The featured catalog entries and their starting counters.
///
/// | id             | views | likes | saves |
/// |----------------|-------|-------|-------|
/// | `featured-001` | 1250  | 89    | 34    |
/// | `featured-002` | 980   | 67    | 28    |
/// | `featured-003` | 1540  | 112   | 51    |
/// | `featured-004` | 720   | 45    | 19    |
/// | `featured-005` | 860   | 58    | 23    |
pub const FEATURED_SEEDS: [(&str, SeedValues); 5] = [
    ("featured-001", SeedValues::new(1250, 89, 34)),
    ("featured-002", SeedValues::new(980, 67, 28)),
    ("featured-003", SeedValues::new(1540, 112, 51)),
    ("featured-004", SeedValues::new(720, 45, 19)),
    ("featured-005", SeedValues::new(860, 58, 23)),
];

/// Item id → seed values, consulted only when an item has no persisted record.
///
/// `Default` is [`SeedTable::featured`]; use [`SeedTable::empty`] for none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedTable(BTreeMap<String, SeedValues>);

impl Default for SeedTable {
    fn default() -> Self {
        Self::featured()
    }
}

impl SeedTable {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn featured() -> Self {
        Self(
            FEATURED_SEEDS
                .iter()
                .map(|(id, values)| (id.to_string(), *values))
                .collect(),
        )
    }

    pub fn with(mut self, id: impl Into<String>, values: SeedValues) -> Self {
        self.0.insert(id.into(), values);
        self
    }

    pub fn get(&self, id: &str) -> Option<&SeedValues> {
        self.0.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The record an untracked item starts from.
    pub fn initial_record(&self, id: &str) -> InteractionRecord {
        self.get(id)
            .map(InteractionRecord::seeded)
            .unwrap_or_default()
    }
}
