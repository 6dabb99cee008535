use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, Weak};

use tracing::debug;

use crate::error::StoreError;
use crate::substrate::StorageEvent;

/// Which path a change notice arrived through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Written by this execution context.
    Local,
    /// Written by another execution context on the same origin.
    Remote,
}

/// A change notification for one namespace key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotice {
    pub key: String,
    pub origin: ChangeOrigin,
}

/// Subscriber callback.
pub type Handler = Arc<dyn Fn(&ChangeNotice) + Send + Sync>;

#[derive(Default)]
struct Registry {
    by_key: HashMap<String, Vec<(u64, Handler)>>,
    wildcard: Vec<(u64, Handler)>,
}

/// Synchronous in-context pub/sub keyed by namespace key.
///
/// Clone-friendly via Arc; clones share subscribers.
#[derive(Clone, Default)]
pub struct NotificationBus {
    registry: Arc<RwLock<Registry>>,
    next_id: Arc<AtomicU64>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for changes under `key`.
    pub fn subscribe<F>(&self, key: impl Into<String>, handler: F) -> Result<Subscription, StoreError>
    where
        F: Fn(&ChangeNotice) + Send + Sync + 'static,
    {
        let key = key.into();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut registry = self
            .registry
            .write()
            .map_err(|_| StoreError::poisoned("bus subscribe"))?;
        registry
            .by_key
            .entry(key.clone())
            .or_default()
            .push((id, Arc::new(handler)));

        Ok(Subscription {
            registry: Arc::downgrade(&self.registry),
            key: Some(key),
            id,
        })
    }

    /// Register `handler` for changes under every key.
    pub fn subscribe_all<F>(&self, handler: F) -> Result<Subscription, StoreError>
    where
        F: Fn(&ChangeNotice) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let mut registry = self
            .registry
            .write()
            .map_err(|_| StoreError::poisoned("bus subscribe"))?;
        registry.wildcard.push((id, Arc::new(handler)));

        Ok(Subscription {
            registry: Arc::downgrade(&self.registry),
            key: None,
            id,
        })
    }

    /// Notify local subscribers that `key` was written by this context.
    pub fn publish(&self, key: &str) -> Result<(), StoreError> {
        self.dispatch(ChangeNotice {
            key: key.to_string(),
            origin: ChangeOrigin::Local,
        })
    }

    /// Notify local subscribers of a write made by another context.
    ///
    /// A whole-origin clear reaches every key that has a subscriber.
    pub fn dispatch_remote(&self, event: &StorageEvent) -> Result<(), StoreError> {
        match &event.key {
            Some(key) => self.dispatch(ChangeNotice {
                key: key.clone(),
                origin: ChangeOrigin::Remote,
            }),
            None => self.dispatch_cleared(std::iter::empty::<String>()),
        }
    }

    /// Notify local subscribers that another context cleared the origin.
    ///
    /// One remote notice goes out per distinct key among `known` and the
    /// subscribed keys, in key order. Wildcard handlers see each of them.
    pub fn dispatch_cleared<I>(&self, known: I) -> Result<(), StoreError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut keys: BTreeSet<String> = known.into_iter().map(Into::into).collect();
        {
            let registry = self
                .registry
                .read()
                .map_err(|_| StoreError::poisoned("bus dispatch"))?;
            keys.extend(registry.by_key.keys().cloned());
        }

        debug!(keys = keys.len(), "fanning out origin clear");
        for key in keys {
            self.dispatch(ChangeNotice {
                key,
                origin: ChangeOrigin::Remote,
            })?;
        }
        Ok(())
    }

    /// Number of handlers registered for exactly `key`.
    pub fn subscriber_count(&self, key: &str) -> Result<usize, StoreError> {
        let registry = self
            .registry
            .read()
            .map_err(|_| StoreError::poisoned("bus read"))?;
        Ok(registry.by_key.get(key).map(Vec::len).unwrap_or(0))
    }

    fn dispatch(&self, notice: ChangeNotice) -> Result<(), StoreError> {
        // Handlers run outside the lock so they can subscribe or unsubscribe.
        let handlers: Vec<Handler> = {
            let registry = self
                .registry
                .read()
                .map_err(|_| StoreError::poisoned("bus dispatch"))?;
            registry
                .by_key
                .get(&notice.key)
                .into_iter()
                .flatten()
                .chain(registry.wildcard.iter())
                .map(|(_, handler)| Arc::clone(handler))
                .collect()
        };

        debug!(
            key = %notice.key,
            origin = ?notice.origin,
            handlers = handlers.len(),
            "dispatching change notice"
        );
        for handler in handlers {
            handler(&notice);
        }
        Ok(())
    }
}

/// Returned by `subscribe`; call [`Subscription::unsubscribe`] to stop
/// receiving notices. Dropping it leaves the handler registered.
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<RwLock<Registry>>,
    key: Option<String>,
    id: u64,
}

impl Subscription {
    /// The key this subscription listens to (`None` for wildcard).
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Remove the handler. Returns true if it was still registered.
    pub fn unsubscribe(self) -> Result<bool, StoreError> {
        let Some(registry) = self.registry.upgrade() else {
            return Ok(false);
        };
        let mut registry = registry
            .write()
            .map_err(|_| StoreError::poisoned("bus unsubscribe"))?;

        let handlers = match &self.key {
            Some(key) => match registry.by_key.get_mut(key) {
                Some(handlers) => handlers,
                None => return Ok(false),
            },
            None => &mut registry.wildcard,
        };
        let before = handlers.len();
        handlers.retain(|(id, _)| *id != self.id);
        let removed = handlers.len() != before;

        if let Some(key) = &self.key {
            if registry.by_key.get(key).is_some_and(Vec::is_empty) {
                registry.by_key.remove(key);
            }
        }
        Ok(removed)
    }
}
