use std::sync::Arc;

use tracing::{debug, warn};

use crate::bus::NotificationBus;
use crate::clock::Clock;
use crate::codec::{Codec, Namespace, NamespaceKind, NamespaceRepository};
use crate::config::StoreConfig;
use crate::substrate::{Substrate, WatchId};

/// Everything one execution context's stores share.
pub(crate) struct StoreContext<S: Substrate> {
    pub(crate) substrate: S,
    pub(crate) bus: NotificationBus,
    pub(crate) codec: Codec,
    pub(crate) config: StoreConfig,
    pub(crate) clock: Arc<dyn Clock>,
}

impl<S: Substrate> StoreContext<S> {
    pub(crate) fn key_for(&self, kind: NamespaceKind) -> String {
        kind.key(&self.config.key_prefix)
    }

    pub(crate) fn namespace<N: Namespace>(&self) -> NamespaceRepository<'_, S, N> {
        NamespaceRepository::new(self)
    }
}

/// The substrate watch feeding a context's bus.
///
/// Only `EngagementStore` handles own it. Sub-stores captured by bus
/// handlers hold the context alone, so they cannot keep the watch alive.
pub(crate) struct Attachment<S: Substrate> {
    pub(crate) ctx: Arc<StoreContext<S>>,
    pub(crate) watch: WatchId,
}

impl<S: Substrate> Drop for Attachment<S> {
    fn drop(&mut self) {
        match self.ctx.substrate.unwatch(self.watch) {
            Ok(_) => debug!(watch = %self.watch, "detached from substrate"),
            Err(e) => warn!(watch = %self.watch, error = %e, "failed to detach from substrate"),
        }
    }
}
