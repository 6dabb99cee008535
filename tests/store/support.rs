//! Shared fixtures: a catalog type, multi-tab setup, a notice recorder.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use engagement_store::{
    CatalogItem, ChangeNotice, ContextSubstrate, EngagementStore, ManualClock, SeedTable,
    SeedValues, SharedOrigin, StoreConfig,
};

pub type Store = EngagementStore<ContextSubstrate>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub category: String,
}

impl Venue {
    pub fn new(id: &str, name: &str, category: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
        }
    }
}

impl CatalogItem for Venue {
    fn item_id(&self) -> &str {
        &self.id
    }
}

pub fn start_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_750_000_000, 0).unwrap()
}

pub fn test_seeds() -> SeedTable {
    SeedTable::empty().with("star-venue", SeedValues::new(100, 20, 5))
}

/// A store on its own origin with a controllable clock.
pub fn single_tab() -> (Store, ManualClock) {
    let clock = ManualClock::new(start_time());
    let store = EngagementStore::builder(SharedOrigin::new().context())
        .config(StoreConfig::default().with_seeds(test_seeds()))
        .clock(clock.clone())
        .build()
        .unwrap();
    (store, clock)
}

/// Two independent stores on the same origin, like two browser tabs.
pub fn two_tabs() -> (Store, Store, SharedOrigin) {
    let origin = SharedOrigin::new();
    let config = StoreConfig::default().with_seeds(test_seeds());
    let tab = |clock: ManualClock| {
        EngagementStore::builder(origin.context())
            .config(config.clone())
            .clock(clock)
            .build()
            .unwrap()
    };
    let a = tab(ManualClock::new(start_time()));
    let b = tab(ManualClock::new(start_time()));
    (a, b, origin)
}

/// Collects every notice a handler receives.
#[derive(Clone, Default)]
pub struct Recorder {
    seen: Arc<Mutex<Vec<ChangeNotice>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handler(&self) -> impl Fn(&ChangeNotice) + Send + Sync + 'static {
        let seen = Arc::clone(&self.seen);
        move |notice: &ChangeNotice| seen.lock().unwrap().push(notice.clone())
    }

    pub fn notices(&self) -> Vec<ChangeNotice> {
        self.seen.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}
