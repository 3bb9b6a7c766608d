//! Registry of currently-loaded regions.
//!
//! The host calls [`RegionRegistry::insert`] when a region loads,
//! [`RegionRegistry::remove`] when it unloads, and
//! [`RegionRegistry::clear`] when a world (re)loads. Background export
//! tasks call [`RegionRegistry::loaded`] to get the handle set for one
//! snapshot.
//!
//! The registry itself is the only synchronized piece of the read path:
//! the handle map sits behind an [`RwLock`] held just long enough to clone
//! the `Arc`s out. Reads of the region *data* behind those handles remain
//! unsynchronized best-effort reads, per the crate-level contract.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rimio_types::RegionId;
use tracing::debug;

use crate::source::RegionSource;

type RegionMap = BTreeMap<RegionId, Arc<dyn RegionSource>>;

/// Owned map of loaded regions, keyed by stable identifier.
///
/// Iteration order is key order, so a snapshot's region sequence is
/// deterministic for a given loaded set.
#[derive(Default)]
pub struct RegionRegistry {
    regions: RwLock<RegionMap>,
}

impl RegionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly-loaded region, replacing any previous handle
    /// under the same id.
    pub fn insert(&self, region: Arc<dyn RegionSource>) {
        let id = region.id();
        self.write().insert(id, region);
        debug!(region = %id, "region registered");
    }

    /// Deregister an unloaded region. A no-op if the id is unknown.
    pub fn remove(&self, id: RegionId) {
        if self.write().remove(&id).is_some() {
            debug!(region = %id, "region deregistered");
        }
    }

    /// Drop every handle. Called when a world loads or reloads.
    pub fn clear(&self) {
        self.write().clear();
        debug!("region registry cleared");
    }

    /// Clone out the currently-loaded handles, in id order.
    pub fn loaded(&self) -> Vec<Arc<dyn RegionSource>> {
        self.read().values().cloned().collect()
    }

    /// Number of registered regions.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no regions are registered.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Lock poisoning means a writer panicked mid-update; the map itself
    // is still structurally sound, so keep serving it.
    fn read(&self) -> RwLockReadGuard<'_, RegionMap> {
        self.regions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegionMap> {
        self.regions.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl core::fmt::Debug for RegionRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegionRegistry")
            .field("len", &self.len())
            .finish()
    }
}
