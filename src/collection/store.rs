use std::sync::Arc;

use tracing::debug;

use super::{
    position, LikedEntry, LikedTable, SavedEntry, SavedTable, TasteCache, VisitDetails,
    VisitRecord, VisitTable, RATING_RANGE,
};
use crate::analytics::{analyze, TasteAnalysis};
use crate::error::StoreError;
use crate::store::StoreContext;
use crate::substrate::Substrate;

/// Saved items, liked items and visit history for one execution context.
///
/// Calls that would change nothing (saving an already saved item,
/// removing a missing one) neither write nor publish.
pub struct CollectionStore<S: Substrate> {
    ctx: Arc<StoreContext<S>>,
}

impl<S: Substrate> Clone for CollectionStore<S> {
    fn clone(&self) -> Self {
        Self {
            ctx: Arc::clone(&self.ctx),
        }
    }
}

impl<S: Substrate> CollectionStore<S> {
    pub(crate) fn new(ctx: Arc<StoreContext<S>>) -> Self {
        Self { ctx }
    }

    // --- saved -----------------------------------------------------------

    /// Append `item_id` to the saved list. Returns false if already saved.
    pub fn add_saved(&self, item_id: &str, notes: Option<&str>) -> Result<bool, StoreError> {
        let repo = self.ctx.namespace::<SavedTable>();
        let mut table = repo.load()?;
        if position(&table.0, item_id).is_some() {
            return Ok(false);
        }

        table.0.push(SavedEntry {
            item_id: item_id.to_string(),
            saved_at: self.ctx.clock.now(),
            notes: notes.map(str::to_string),
        });
        repo.save(&table)?;
        debug!(item = item_id, "saved");
        Ok(true)
    }

    /// Remove `item_id` from the saved list. Returns false if it was not there.
    pub fn remove_saved(&self, item_id: &str) -> Result<bool, StoreError> {
        let repo = self.ctx.namespace::<SavedTable>();
        let mut table = repo.load()?;
        let Some(index) = position(&table.0, item_id) else {
            return Ok(false);
        };

        table.0.remove(index);
        repo.save(&table)?;
        debug!(item = item_id, "unsaved");
        Ok(true)
    }

    /// Save or unsave. Returns whether the item is saved afterwards.
    pub fn toggle_saved(&self, item_id: &str) -> Result<bool, StoreError> {
        if self.remove_saved(item_id)? {
            Ok(false)
        } else {
            self.add_saved(item_id, None)
        }
    }

    pub fn is_saved(&self, item_id: &str) -> Result<bool, StoreError> {
        let table = self.ctx.namespace::<SavedTable>().load()?;
        Ok(position(&table.0, item_id).is_some())
    }

    /// Saved entries in the order they were saved.
    pub fn list_saved(&self) -> Result<Vec<SavedEntry>, StoreError> {
        Ok(self.ctx.namespace::<SavedTable>().load()?.0)
    }

    pub fn saved_count(&self) -> Result<usize, StoreError> {
        Ok(self.ctx.namespace::<SavedTable>().load()?.0.len())
    }

    /// Replace the notes of a saved item. Returns false if it is not saved.
    pub fn update_notes(&self, item_id: &str, notes: Option<&str>) -> Result<bool, StoreError> {
        let repo = self.ctx.namespace::<SavedTable>();
        let mut table = repo.load()?;
        let Some(entry) = table.0.iter_mut().find(|e| e.item_id == item_id) else {
            return Ok(false);
        };

        let notes = notes.map(str::to_string);
        if entry.notes != notes {
            entry.notes = notes;
            repo.save(&table)?;
        }
        Ok(true)
    }

    // --- liked -----------------------------------------------------------

    /// Add `item_id` to the liked set. Returns false if already liked.
    pub fn add_liked(&self, item_id: &str) -> Result<bool, StoreError> {
        let repo = self.ctx.namespace::<LikedTable>();
        let mut table = repo.load()?;
        if position(&table.0, item_id).is_some() {
            return Ok(false);
        }

        table.0.push(LikedEntry {
            item_id: item_id.to_string(),
            liked_at: self.ctx.clock.now(),
        });
        repo.save(&table)?;
        debug!(item = item_id, "liked");
        Ok(true)
    }

    /// Remove `item_id` from the liked set. Returns false if it was not there.
    pub fn remove_liked(&self, item_id: &str) -> Result<bool, StoreError> {
        let repo = self.ctx.namespace::<LikedTable>();
        let mut table = repo.load()?;
        let Some(index) = position(&table.0, item_id) else {
            return Ok(false);
        };

        table.0.remove(index);
        repo.save(&table)?;
        debug!(item = item_id, "unliked");
        Ok(true)
    }

    /// Like or unlike. Returns whether the item is liked afterwards.
    pub fn toggle_liked(&self, item_id: &str) -> Result<bool, StoreError> {
        if self.remove_liked(item_id)? {
            Ok(false)
        } else {
            self.add_liked(item_id)
        }
    }

    pub fn is_liked(&self, item_id: &str) -> Result<bool, StoreError> {
        let table = self.ctx.namespace::<LikedTable>().load()?;
        Ok(position(&table.0, item_id).is_some())
    }

    pub fn list_liked(&self) -> Result<Vec<LikedEntry>, StoreError> {
        Ok(self.ctx.namespace::<LikedTable>().load()?.0)
    }

    // --- visits ----------------------------------------------------------

    /// Record a visit to `item_id`.
    ///
    /// An item keeps a single visit record: a repeat visit refreshes the
    /// date and overwrites only the fields `details` supplies. The taste
    /// analysis is refreshed afterwards.
    pub fn record_visit(
        &self,
        item_id: &str,
        details: VisitDetails,
    ) -> Result<VisitRecord, StoreError> {
        if let Some(rating) = details.rating {
            if !RATING_RANGE.contains(&rating) {
                return Err(StoreError::InvalidRating(rating));
            }
        }

        let repo = self.ctx.namespace::<VisitTable>();
        let mut table = repo.load()?;
        let now = self.ctx.clock.now();

        let record = match position(&table.0, item_id) {
            Some(index) => {
                let existing = &mut table.0[index];
                existing.apply(details, now);
                existing.clone()
            }
            None => {
                let record = VisitRecord {
                    item_id: item_id.to_string(),
                    visit_date: now,
                    category: details.category,
                    location: details.location,
                    rating: details.rating,
                };
                table.0.push(record.clone());
                record
            }
        };

        repo.save(&table)?;
        debug!(item = item_id, visits = table.0.len(), "recorded visit");
        self.refresh_analysis(&table.0)?;
        Ok(record)
    }

    pub fn list_visits(&self) -> Result<Vec<VisitRecord>, StoreError> {
        Ok(self.ctx.namespace::<VisitTable>().load()?.0)
    }

    pub fn visit_for(&self, item_id: &str) -> Result<Option<VisitRecord>, StoreError> {
        let table = self.ctx.namespace::<VisitTable>().load()?;
        Ok(table.0.into_iter().find(|v| v.item_id == item_id))
    }

    /// Drop the visit record for `item_id`. Returns false if there was none.
    pub fn remove_visit(&self, item_id: &str) -> Result<bool, StoreError> {
        let repo = self.ctx.namespace::<VisitTable>();
        let mut table = repo.load()?;
        let Some(index) = position(&table.0, item_id) else {
            return Ok(false);
        };

        table.0.remove(index);
        repo.save(&table)?;
        self.refresh_analysis(&table.0)?;
        Ok(true)
    }

    /// Forget the visit history. The last analysis stays cached.
    pub fn clear_visits(&self) -> Result<(), StoreError> {
        self.ctx.namespace::<VisitTable>().clear()
    }

    // --- taste -----------------------------------------------------------

    /// Analyze the current visit history.
    ///
    /// With no visits, the previously cached analysis (if any) is returned
    /// unchanged rather than a zeroed one.
    pub fn taste_analysis(&self) -> Result<Option<TasteAnalysis>, StoreError> {
        let visits = self.ctx.namespace::<VisitTable>().load()?;
        match self.refresh_analysis(&visits.0)? {
            Some(analysis) => Ok(Some(analysis)),
            None => self.cached_analysis(),
        }
    }

    /// The last cached analysis, without recomputing.
    pub fn cached_analysis(&self) -> Result<Option<TasteAnalysis>, StoreError> {
        Ok(self.ctx.namespace::<TasteCache>().load()?.0)
    }

    /// Recompute and cache. `None` when `visits` is empty; the cache is
    /// left alone in that case.
    fn refresh_analysis(
        &self,
        visits: &[VisitRecord],
    ) -> Result<Option<TasteAnalysis>, StoreError> {
        let Some(analysis) = analyze(visits) else {
            return Ok(None);
        };

        let repo = self.ctx.namespace::<TasteCache>();
        let cached = repo.load()?;
        if cached.0.as_ref() != Some(&analysis) {
            debug!(pattern = %analysis.taste_pattern, "taste analysis changed");
            repo.save(&TasteCache(Some(analysis.clone())))?;
        }
        Ok(Some(analysis))
    }

    /// Clear saved items, liked items, visits and the cached analysis.
    pub fn reset_all(&self) -> Result<(), StoreError> {
        self.ctx.namespace::<SavedTable>().clear()?;
        self.ctx.namespace::<LikedTable>().clear()?;
        self.ctx.namespace::<VisitTable>().clear()?;
        self.ctx.namespace::<TasteCache>().clear()
    }
}
