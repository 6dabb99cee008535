//! NamespaceRepository - typed load/save of one namespace table.

use std::marker::PhantomData;

use tracing::{debug, trace, warn};

use super::Namespace;
use crate::error::StoreError;
use crate::store::StoreContext;
use crate::substrate::Substrate;

/// Typed accessor for one namespace of a store context.
pub(crate) struct NamespaceRepository<'a, S: Substrate, N> {
    ctx: &'a StoreContext<S>,
    key: String,
    _marker: PhantomData<N>,
}

impl<'a, S: Substrate, N: Namespace> NamespaceRepository<'a, S, N> {
    pub(crate) fn new(ctx: &'a StoreContext<S>) -> Self {
        Self {
            key: ctx.key_for(N::KIND),
            ctx,
            _marker: PhantomData,
        }
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    /// Load the table. Absent or corrupt bytes yield `N::default()`.
    pub(crate) fn load(&self) -> Result<N, StoreError> {
        let Some(bytes) = self.ctx.substrate.get(&self.key)? else {
            trace!(key = %self.key, "namespace absent, using default");
            return Ok(N::default());
        };

        match self.ctx.codec.decode::<N>(&bytes) {
            Ok(table) => Ok(table),
            Err(reason) => {
                warn!(key = %self.key, %reason, "discarding unreadable namespace");
                Ok(N::default())
            }
        }
    }

    /// Whether anything is persisted under this namespace.
    pub(crate) fn exists(&self) -> Result<bool, StoreError> {
        Ok(self.ctx.substrate.get(&self.key)?.is_some())
    }

    /// Persist the table and notify local subscribers.
    pub(crate) fn save(&self, table: &N) -> Result<(), StoreError> {
        self.save_quiet(table)?;
        self.ctx.bus.publish(&self.key)
    }

    /// Persist the table without a local notification.
    ///
    /// Other contexts still observe the write through the substrate.
    pub(crate) fn save_quiet(&self, table: &N) -> Result<(), StoreError> {
        let bytes = self.ctx.codec.encode(table)?;
        debug!(key = %self.key, bytes = bytes.len(), "persisting namespace");
        self.ctx.substrate.set(&self.key, bytes)
    }

    /// Remove the table and notify local subscribers.
    pub(crate) fn clear(&self) -> Result<(), StoreError> {
        debug!(key = %self.key, "clearing namespace");
        self.ctx.substrate.remove(&self.key)?;
        self.ctx.bus.publish(&self.key)
    }
}
