//! In-memory origin storage with per-context views.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::trace;

use super::{StorageEvent, Substrate, WatchId, Watcher};
use crate::error::StoreError;

struct RegisteredWatcher {
    id: u64,
    context: u64,
    watcher: Watcher,
}

struct OriginState {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    watchers: RwLock<Vec<RegisteredWatcher>>,
    next_context: AtomicU64,
    next_watch: AtomicU64,
}

/// The storage of one origin, shared by every context created from it.
///
/// Clone-friendly via Arc; clones refer to the same origin.
///
/// ## Example
///
/// ```
/// use engagement_store::{SharedOrigin, Substrate};
///
/// let origin = SharedOrigin::new();
/// let tab_a = origin.context();
/// let tab_b = origin.context();
///
/// tab_a.set("greeting", b"hello".to_vec()).unwrap();
/// assert_eq!(tab_b.get("greeting").unwrap(), Some(b"hello".to_vec()));
/// ```
#[derive(Clone)]
pub struct SharedOrigin {
    state: Arc<OriginState>,
}

impl Default for SharedOrigin {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedOrigin {
    /// Create a new empty origin.
    pub fn new() -> Self {
        Self {
            state: Arc::new(OriginState {
                entries: RwLock::new(HashMap::new()),
                watchers: RwLock::new(Vec::new()),
                next_context: AtomicU64::new(1),
                next_watch: AtomicU64::new(1),
            }),
        }
    }

    /// Open a new execution context on this origin.
    pub fn context(&self) -> ContextSubstrate {
        let id = self.state.next_context.fetch_add(1, Ordering::SeqCst);
        ContextSubstrate {
            origin: self.clone(),
            context_id: id,
        }
    }

    /// All keys currently stored, sorted.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        let entries = self
            .state
            .entries
            .read()
            .map_err(|_| StoreError::poisoned("origin keys"))?;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    /// Number of stored keys.
    pub fn len(&self) -> Result<usize, StoreError> {
        let entries = self
            .state
            .entries
            .read()
            .map_err(|_| StoreError::poisoned("origin len"))?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Deliver `event` to every watcher not owned by `from`.
    ///
    /// Watchers are cloned out first so they may touch the origin again.
    fn notify_others(&self, from: u64, event: StorageEvent) -> Result<(), StoreError> {
        let targets: Vec<Watcher> = {
            let watchers = self
                .state
                .watchers
                .read()
                .map_err(|_| StoreError::poisoned("watcher read"))?;
            watchers
                .iter()
                .filter(|w| w.context != from)
                .map(|w| Arc::clone(&w.watcher))
                .collect()
        };

        trace!(
            key = ?event.key,
            from_context = from,
            watchers = targets.len(),
            "delivering storage event"
        );
        for watcher in targets {
            watcher(&event);
        }
        Ok(())
    }
}

/// One execution context's view of a [`SharedOrigin`].
///
/// Cloning yields another handle to the same context, not a new one.
#[derive(Clone)]
pub struct ContextSubstrate {
    origin: SharedOrigin,
    context_id: u64,
}

impl ContextSubstrate {
    pub fn context_id(&self) -> u64 {
        self.context_id
    }

    pub fn origin(&self) -> &SharedOrigin {
        &self.origin
    }
}

impl Substrate for ContextSubstrate {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self
            .origin
            .state
            .entries
            .read()
            .map_err(|_| StoreError::poisoned("read"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let old_value = {
            let mut entries = self
                .origin
                .state
                .entries
                .write()
                .map_err(|_| StoreError::poisoned("write"))?;
            entries.insert(key.to_string(), bytes.clone())
        };

        if old_value.as_deref() == Some(bytes.as_slice()) {
            return Ok(());
        }

        self.origin.notify_others(
            self.context_id,
            StorageEvent {
                key: Some(key.to_string()),
                old_value,
                new_value: Some(bytes),
            },
        )
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let old_value = {
            let mut entries = self
                .origin
                .state
                .entries
                .write()
                .map_err(|_| StoreError::poisoned("remove"))?;
            entries.remove(key)
        };

        match old_value {
            Some(old) => self.origin.notify_others(
                self.context_id,
                StorageEvent {
                    key: Some(key.to_string()),
                    old_value: Some(old),
                    new_value: None,
                },
            ),
            None => Ok(()),
        }
    }

    fn clear(&self) -> Result<(), StoreError> {
        let had_entries = {
            let mut entries = self
                .origin
                .state
                .entries
                .write()
                .map_err(|_| StoreError::poisoned("clear"))?;
            let had = !entries.is_empty();
            entries.clear();
            had
        };

        if had_entries {
            self.origin
                .notify_others(self.context_id, StorageEvent::cleared())?;
        }
        Ok(())
    }

    fn watch(&self, watcher: Watcher) -> Result<WatchId, StoreError> {
        let id = self.origin.state.next_watch.fetch_add(1, Ordering::SeqCst);
        let mut watchers = self
            .origin
            .state
            .watchers
            .write()
            .map_err(|_| StoreError::poisoned("watch"))?;
        watchers.push(RegisteredWatcher {
            id,
            context: self.context_id,
            watcher,
        });
        Ok(WatchId(id))
    }

    fn unwatch(&self, id: WatchId) -> Result<bool, StoreError> {
        let mut watchers = self
            .origin
            .state
            .watchers
            .write()
            .map_err(|_| StoreError::poisoned("unwatch"))?;
        let before = watchers.len();
        watchers.retain(|w| w.id != id.0);
        Ok(watchers.len() != before)
    }
}
