//! Substrate - the host's synchronous, origin-scoped key/value storage.
//!
//! Every execution context (a tab, a window, a worker) of the same origin
//! sees the same keys. Writes are last-writer-wins per key and there is no
//! compare-and-swap. A context is told about writes made by *other*
//! contexts through its watchers; it never hears its own writes that way,
//! which is why the notification bus also dispatches locally.
//!
//! ```text
//!   context A ──set(k)──▶ ┌──────────────┐ ──StorageEvent(k)──▶ context B watchers
//!                         │ SharedOrigin │ ──StorageEvent(k)──▶ context C watchers
//!   context B ──get(k)──▶ └──────────────┘
//! ```

mod in_memory;

use std::fmt;
use std::sync::Arc;

use crate::error::StoreError;

pub use in_memory::{ContextSubstrate, SharedOrigin};

/// A change made by another execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    /// The key that changed, or `None` when the whole origin was cleared.
    pub key: Option<String>,
    pub old_value: Option<Vec<u8>>,
    pub new_value: Option<Vec<u8>>,
}

impl StorageEvent {
    pub fn cleared() -> Self {
        Self {
            key: None,
            old_value: None,
            new_value: None,
        }
    }
}

/// Callback invoked for cross-context storage events.
pub type Watcher = Arc<dyn Fn(&StorageEvent) + Send + Sync>;

/// Handle returned by [`Substrate::watch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(pub(crate) u64);

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "watch-{}", self.0)
    }
}

/// Synchronous key/value byte storage shared by all contexts of an origin.
pub trait Substrate: Send + Sync {
    /// Read the bytes stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Overwrite `key` with `bytes`.
    fn set(&self, key: &str, bytes: Vec<u8>) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is a no-op.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Remove every key of the origin.
    fn clear(&self) -> Result<(), StoreError>;

    /// Register a watcher for writes made by other contexts.
    fn watch(&self, watcher: Watcher) -> Result<WatchId, StoreError>;

    /// Remove a watcher. Returns true if it was registered.
    fn unwatch(&self, id: WatchId) -> Result<bool, StoreError>;
}
