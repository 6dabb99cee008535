//! EngagementStore - one handle per execution context.
//!
//! Construct it once at startup and hand clones to whatever needs it:
//!
//! ```
//! use engagement_store::{EngagementStore, NamespaceKind, SharedOrigin};
//!
//! let origin = SharedOrigin::new();
//! let store = EngagementStore::builder(origin.context()).build().unwrap();
//!
//! let _sub = store
//!     .subscribe(NamespaceKind::Interactions, |notice| {
//!         println!("{} changed", notice.key);
//!     })
//!     .unwrap();
//!
//! store.interactions().toggle_like("venue-1").unwrap();
//! ```

mod context;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::bus::{ChangeNotice, NotificationBus, Subscription};
use crate::clock::{Clock, SystemClock};
use crate::codec::{Codec, NamespaceKind};
use crate::collection::CollectionStore;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::interaction::InteractionStore;
use crate::substrate::{StorageEvent, Substrate};

use context::Attachment;
pub(crate) use context::StoreContext;

/// Builder for [`EngagementStore`].
pub struct EngagementStoreBuilder<S: Substrate> {
    substrate: S,
    config: StoreConfig,
    clock: Arc<dyn Clock>,
    bus: Option<NotificationBus>,
}

impl<S: Substrate> EngagementStoreBuilder<S> {
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Use an existing bus instead of a fresh one.
    pub fn bus(mut self, bus: NotificationBus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Build the store and attach its bus to the substrate's
    /// cross-context notifications.
    pub fn build(self) -> Result<EngagementStore<S>, StoreError> {
        let bus = self.bus.unwrap_or_default();
        let prefix = format!("{}:", self.config.key_prefix);
        let remote_bus = bus.clone();

        let watch = self.substrate.watch(Arc::new(move |event: &StorageEvent| {
            forward_remote(&remote_bus, &prefix, event);
        }))?;
        debug!(watch = %watch, prefix = %self.config.key_prefix, "attached to substrate");

        Ok(EngagementStore {
            attachment: Arc::new(Attachment {
                ctx: Arc::new(StoreContext {
                    substrate: self.substrate,
                    bus,
                    codec: Codec::new(self.config.codec),
                    config: self.config,
                    clock: self.clock,
                }),
                watch,
            }),
        })
    }
}

/// Translate a substrate event into bus notices for our namespaces.
fn forward_remote(bus: &NotificationBus, prefix: &str, event: &StorageEvent) {
    let result = match &event.key {
        Some(key) if key.starts_with(prefix) => bus.dispatch_remote(event),
        Some(_) => Ok(()),
        None => bus.dispatch_cleared(
            NamespaceKind::ALL
                .iter()
                .map(|kind| format!("{}{}", prefix, kind.as_str())),
        ),
    };
    if let Err(e) = result {
        warn!(key = ?event.key, error = %e, "dropped cross-context notice");
    }
}

/// The store for one execution context.
///
/// Clones are cheap handles to the same context. The context hears other
/// contexts' writes while at least one `EngagementStore` handle is alive.
/// `InteractionStore` and `CollectionStore` handles keep reading and
/// writing after that, but remote notices stop.
pub struct EngagementStore<S: Substrate> {
    attachment: Arc<Attachment<S>>,
}

impl<S: Substrate> Clone for EngagementStore<S> {
    fn clone(&self) -> Self {
        Self {
            attachment: Arc::clone(&self.attachment),
        }
    }
}

impl<S: Substrate> EngagementStore<S> {
    pub fn builder(substrate: S) -> EngagementStoreBuilder<S> {
        EngagementStoreBuilder {
            substrate,
            config: StoreConfig::default(),
            clock: Arc::new(SystemClock),
            bus: None,
        }
    }

    /// Build with default configuration and the system clock.
    pub fn new(substrate: S) -> Result<Self, StoreError> {
        Self::builder(substrate).build()
    }

    /// Per-item counters and flags.
    pub fn interactions(&self) -> InteractionStore<S> {
        InteractionStore::new(Arc::clone(&self.attachment.ctx))
    }

    /// Saved items, liked items and visit history.
    pub fn collections(&self) -> CollectionStore<S> {
        CollectionStore::new(Arc::clone(&self.attachment.ctx))
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.attachment.ctx.bus
    }

    pub fn config(&self) -> &StoreConfig {
        &self.attachment.ctx.config
    }

    pub fn substrate(&self) -> &S {
        &self.attachment.ctx.substrate
    }

    /// Full substrate key of a namespace.
    pub fn key_for(&self, kind: NamespaceKind) -> String {
        self.attachment.ctx.key_for(kind)
    }

    /// Subscribe to changes of one namespace, from this or any other context.
    pub fn subscribe<F>(&self, kind: NamespaceKind, handler: F) -> Result<Subscription, StoreError>
    where
        F: Fn(&ChangeNotice) + Send + Sync + 'static,
    {
        self.attachment.ctx.bus.subscribe(self.key_for(kind), handler)
    }

    /// Subscribe to changes of every namespace.
    pub fn subscribe_all<F>(&self, handler: F) -> Result<Subscription, StoreError>
    where
        F: Fn(&ChangeNotice) + Send + Sync + 'static,
    {
        self.attachment.ctx.bus.subscribe_all(handler)
    }

    /// Clear every namespace, publishing each.
    pub fn reset_all(&self) -> Result<(), StoreError> {
        self.interactions().reset_all()?;
        self.collections().reset_all()
    }

    pub(crate) fn context(&self) -> &StoreContext<S> {
        &self.attachment.ctx
    }
}
