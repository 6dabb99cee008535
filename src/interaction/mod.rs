//! Interaction Store - per-item view/like/save counters and flags.
//!
//! `is_liked` / `is_saved` are the current user's last toggle. The counts
//! are accumulated activity (seeded for featured items), so a count of 40
//! with `is_liked == false` is normal.

mod seed;
mod store;

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::{Namespace, NamespaceKind};

pub use seed::{SeedTable, SeedValues, FEATURED_SEEDS};
pub use store::InteractionStore;

/// Client-local engagement state for one catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub view_count: u64,
    pub like_count: u64,
    pub save_count: u64,
    pub is_liked: bool,
    pub is_saved: bool,
    pub last_viewed_at: Option<DateTime<Utc>>,
}

impl InteractionRecord {
    pub fn seeded(seed: &SeedValues) -> Self {
        Self {
            view_count: seed.view_count,
            like_count: seed.like_count,
            save_count: seed.save_count,
            ..Self::default()
        }
    }

    /// Count a view unless the previous one is within `window`.
    ///
    /// Returns true if the view was counted.
    pub fn register_view(&mut self, now: DateTime<Utc>, window: Duration) -> bool {
        let due = match self.last_viewed_at {
            None => true,
            Some(last) => now - last > window,
        };
        if due {
            self.view_count = self.view_count.saturating_add(1);
            self.last_viewed_at = Some(now);
        }
        due
    }

    /// Flip `is_liked`, moving `like_count` with it. Returns the new flag.
    ///
    /// Two toggles restore the record unless the count sat at zero while
    /// liked: the floored unlike cannot be undone, so the pair ends one up.
    pub fn toggle_like(&mut self) -> bool {
        self.is_liked = !self.is_liked;
        self.like_count = step(self.like_count, self.is_liked);
        self.is_liked
    }

    /// Flip `is_saved`, moving `save_count` with it. Returns the new flag.
    ///
    /// Same zero-floor caveat as [`InteractionRecord::toggle_like`].
    pub fn toggle_save(&mut self) -> bool {
        self.is_saved = !self.is_saved;
        self.save_count = step(self.save_count, self.is_saved);
        self.is_saved
    }
}

fn step(count: u64, up: bool) -> u64 {
    if up {
        count.saturating_add(1)
    } else {
        count.saturating_sub(1)
    }
}

/// All interaction records, persisted as one namespace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct InteractionTable(pub(crate) BTreeMap<String, InteractionRecord>);

impl Namespace for InteractionTable {
    const KIND: NamespaceKind = NamespaceKind::Interactions;
}
