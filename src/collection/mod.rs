//! Collection Store - saved items, liked items and visit history.
//!
//! The liked-items set here is independent of the like counters kept by
//! the interaction store. Nothing reconciles the two; they can disagree.

mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::TasteAnalysis;
use crate::codec::{Namespace, NamespaceKind};
use crate::projection::CatalogItem;

pub use store::CollectionStore;

/// Ratings are whole stars from 1 to 5.
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// A saved item. At most one per `item_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEntry {
    pub item_id: String,
    pub saved_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// A liked item. At most one per `item_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedEntry {
    pub item_id: String,
    pub liked_at: DateTime<Utc>,
}

/// The last known visit to an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub item_id: String,
    pub visit_date: DateTime<Utc>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub rating: Option<u8>,
}

impl VisitRecord {
    /// Overwrite the fields `details` supplies; keep the rest.
    fn apply(&mut self, details: VisitDetails, at: DateTime<Utc>) {
        self.visit_date = at;
        if details.category.is_some() {
            self.category = details.category;
        }
        if details.location.is_some() {
            self.location = details.location;
        }
        if details.rating.is_some() {
            self.rating = details.rating;
        }
    }
}

/// Optional metadata for [`CollectionStore::record_visit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitDetails {
    pub category: Option<String>,
    pub location: Option<String>,
    pub rating: Option<u8>,
}

impl VisitDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }
}

impl CatalogItem for SavedEntry {
    fn item_id(&self) -> &str {
        &self.item_id
    }
}

impl CatalogItem for LikedEntry {
    fn item_id(&self) -> &str {
        &self.item_id
    }
}

impl CatalogItem for VisitRecord {
    fn item_id(&self) -> &str {
        &self.item_id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct SavedTable(pub(crate) Vec<SavedEntry>);

impl Namespace for SavedTable {
    const KIND: NamespaceKind = NamespaceKind::SavedItems;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct LikedTable(pub(crate) Vec<LikedEntry>);

impl Namespace for LikedTable {
    const KIND: NamespaceKind = NamespaceKind::LikedItems;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct VisitTable(pub(crate) Vec<VisitRecord>);

impl Namespace for VisitTable {
    const KIND: NamespaceKind = NamespaceKind::VisitHistory;
}

/// Last non-empty analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct TasteCache(pub(crate) Option<TasteAnalysis>);

impl Namespace for TasteCache {
    const KIND: NamespaceKind = NamespaceKind::TasteAnalysis;
}

fn position<E: CatalogItem>(entries: &[E], id: &str) -> Option<usize> {
    entries.iter().position(|entry| entry.item_id() == id)
}
