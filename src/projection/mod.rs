//! Projection Merger - catalog item + interaction record → display item.
//!
//! Pure read side: nothing here touches storage. The catalog item is
//! cloned, never modified.
//!
//! ## Example
//!
//! ```
//! use engagement_store::{merge, InteractionRecord};
//!
//! #[derive(Clone)]
//! struct Venue { id: String, name: String }
//!
//! let venue = Venue { id: "v1".into(), name: "Corner Bistro".into() };
//! let record = InteractionRecord { like_count: 3, is_liked: true, ..Default::default() };
//!
//! let shown = merge(&venue, &record);
//! assert_eq!(shown.item.name, "Corner Bistro");
//! assert_eq!(shown.like_count, 3);
//! assert!(shown.is_liked);
//! ```

use serde::{Deserialize, Serialize};

use crate::interaction::InteractionRecord;

/// A catalog entity that interaction records can be attached to.
pub trait CatalogItem {
    fn item_id(&self) -> &str;
}

/// A catalog item with engagement counters overlaid.
///
/// Serializes flat: the item's own fields plus the counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayItem<T> {
    #[serde(flatten)]
    pub item: T,
    pub view_count: u64,
    pub like_count: u64,
    pub save_count: u64,
    pub is_liked: bool,
    pub is_saved: bool,
}

impl<T> DisplayItem<T> {
    pub fn into_item(self) -> T {
        self.item
    }
}

impl<T: CatalogItem> CatalogItem for DisplayItem<T> {
    fn item_id(&self) -> &str {
        self.item.item_id()
    }
}

/// Overlay `record` onto a copy of `item`.
pub fn merge<T: Clone>(item: &T, record: &InteractionRecord) -> DisplayItem<T> {
    DisplayItem {
        item: item.clone(),
        view_count: record.view_count,
        like_count: record.like_count,
        save_count: record.save_count,
        is_liked: record.is_liked,
        is_saved: record.is_saved,
    }
}

/// Merge every item with the record `lookup` returns for it.
pub fn merge_all<T, F>(items: &[T], lookup: F) -> Vec<DisplayItem<T>>
where
    T: Clone,
    F: Fn(&T) -> InteractionRecord,
{
    items.iter().map(|item| merge(item, &lookup(item))).collect()
}
