use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::{InteractionRecord, InteractionTable};
use crate::error::StoreError;
use crate::projection::{merge, CatalogItem, DisplayItem};
use crate::store::StoreContext;
use crate::substrate::Substrate;

/// Per-item counters and flags for one execution context.
///
/// Every mutation reads the whole interaction table, changes one record,
/// writes the table back and publishes the namespace key.
pub struct InteractionStore<S: Substrate> {
    ctx: Arc<StoreContext<S>>,
}

impl<S: Substrate> Clone for InteractionStore<S> {
    fn clone(&self) -> Self {
        Self {
            ctx: Arc::clone(&self.ctx),
        }
    }
}

impl<S: Substrate> InteractionStore<S> {
    pub(crate) fn new(ctx: Arc<StoreContext<S>>) -> Self {
        Self { ctx }
    }

    fn load(&self) -> Result<InteractionTable, StoreError> {
        self.ctx.namespace::<InteractionTable>().load()
    }

    fn initial_record(&self, id: &str) -> InteractionRecord {
        self.ctx.config.seeds.initial_record(id)
    }

    /// The record for `id`, creating and persisting the initial record if
    /// the item has never been touched.
    pub fn get(&self, id: &str) -> Result<InteractionRecord, StoreError> {
        let repo = self.ctx.namespace::<InteractionTable>();
        let mut table = repo.load()?;
        if let Some(record) = table.0.get(id) {
            return Ok(record.clone());
        }

        let record = self.initial_record(id);
        debug!(item = id, "creating interaction record");
        table.0.insert(id.to_string(), record.clone());
        repo.save_quiet(&table)?;
        Ok(record)
    }

    /// The record for `id` without persisting anything.
    pub fn peek(&self, id: &str) -> Result<InteractionRecord, StoreError> {
        let table = self.load()?;
        Ok(table
            .0
            .get(id)
            .cloned()
            .unwrap_or_else(|| self.initial_record(id)))
    }

    /// Apply `change` to the record for `id` and persist if anything moved.
    fn mutate<T>(
        &self,
        id: &str,
        change: impl FnOnce(&mut InteractionRecord) -> T,
    ) -> Result<T, StoreError> {
        let repo = self.ctx.namespace::<InteractionTable>();
        let mut table = repo.load()?;

        let existing = table.0.get(id).cloned();
        let mut record = existing.clone().unwrap_or_else(|| self.initial_record(id));
        let out = change(&mut record);

        if existing.as_ref() != Some(&record) {
            table.0.insert(id.to_string(), record);
            repo.save(&table)?;
        }
        Ok(out)
    }

    /// Count a view unless one was counted within the throttling window.
    ///
    /// Returns true if the view was counted.
    pub fn record_view(&self, id: &str) -> Result<bool, StoreError> {
        let now = self.ctx.clock.now();
        let window = self.ctx.config.view_throttle();
        let counted = self.mutate(id, |record| record.register_view(now, window))?;
        debug!(item = id, counted, "record_view");
        Ok(counted)
    }

    /// Flip the like flag and adjust `like_count`. Returns the new flag.
    ///
    /// After `decrement_like` has floored a liked item at zero, a double
    /// toggle leaves `like_count` at 1 rather than 0.
    pub fn toggle_like(&self, id: &str) -> Result<bool, StoreError> {
        let liked = self.mutate(id, InteractionRecord::toggle_like)?;
        debug!(item = id, liked, "toggle_like");
        Ok(liked)
    }

    /// Flip the save flag and adjust `save_count`. Returns the new flag.
    ///
    /// Same zero-floor caveat as [`InteractionStore::toggle_like`].
    pub fn toggle_save(&self, id: &str) -> Result<bool, StoreError> {
        let saved = self.mutate(id, InteractionRecord::toggle_save)?;
        debug!(item = id, saved, "toggle_save");
        Ok(saved)
    }

    /// Bump `like_count` without touching `is_liked`. Returns the new count.
    pub fn increment_like(&self, id: &str) -> Result<u64, StoreError> {
        self.mutate(id, |record| {
            record.like_count = record.like_count.saturating_add(1);
            record.like_count
        })
    }

    /// Lower `like_count` (floored at zero) without touching `is_liked`.
    pub fn decrement_like(&self, id: &str) -> Result<u64, StoreError> {
        self.mutate(id, |record| {
            record.like_count = record.like_count.saturating_sub(1);
            record.like_count
        })
    }

    /// Bump `save_count` without touching `is_saved`. Returns the new count.
    pub fn increment_save(&self, id: &str) -> Result<u64, StoreError> {
        self.mutate(id, |record| {
            record.save_count = record.save_count.saturating_add(1);
            record.save_count
        })
    }

    /// Lower `save_count` (floored at zero) without touching `is_saved`.
    pub fn decrement_save(&self, id: &str) -> Result<u64, StoreError> {
        self.mutate(id, |record| {
            record.save_count = record.save_count.saturating_sub(1);
            record.save_count
        })
    }

    /// Forget `id`. Its next access starts from the seed again.
    pub fn reset(&self, id: &str) -> Result<(), StoreError> {
        let repo = self.ctx.namespace::<InteractionTable>();
        let mut table = repo.load()?;
        debug!(item = id, "reset interaction record");
        if table.0.remove(id).is_some() {
            repo.save(&table)
        } else {
            self.ctx.bus.publish(repo.key())
        }
    }

    /// Forget every record.
    pub fn reset_all(&self) -> Result<(), StoreError> {
        self.ctx.namespace::<InteractionTable>().clear()
    }

    /// Every persisted record, by item id.
    pub fn records(&self) -> Result<BTreeMap<String, InteractionRecord>, StoreError> {
        Ok(self.load()?.0)
    }

    /// Ids with a persisted record.
    pub fn tracked_ids(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.load()?.0.into_keys().collect())
    }

    /// Overlay current counters onto catalog items for display.
    ///
    /// Read-only: untracked items show their seed without being persisted.
    pub fn project<T>(&self, items: &[T]) -> Result<Vec<DisplayItem<T>>, StoreError>
    where
        T: CatalogItem + Clone,
    {
        let table = self.load()?;
        Ok(items
            .iter()
            .map(|item| match table.0.get(item.item_id()) {
                Some(record) => merge(item, record),
                None => merge(item, &self.initial_record(item.item_id())),
            })
            .collect())
    }
}
