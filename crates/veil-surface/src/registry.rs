//! Process-wide registry of live headless surfaces.

use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;
use veil_transport::{SurfaceChannel, SurfaceId};

/// Maps live surface identifiers to their command channels.
///
/// Mutated only by create and dispose. The mutex keeps the map sound
/// even when commands are delivered from more than one thread.
#[derive(Debug, Default)]
pub struct SurfaceRegistry {
    inner: Mutex<HashMap<SurfaceId, SurfaceChannel>>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface's channel under its identifier.
    pub fn insert(&self, id: SurfaceId, channel: SurfaceChannel) {
        debug!("Registering {}", id);
        self.inner.lock().unwrap().insert(id, channel);
    }

    /// Remove a surface, returning its channel if it was live.
    pub fn remove(&self, id: &SurfaceId) -> Option<SurfaceChannel> {
        debug!("Deregistering {}", id);
        self.inner.lock().unwrap().remove(id)
    }

    /// Channel for a live surface, if registered.
    pub fn channel(&self, id: &SurfaceId) -> Option<SurfaceChannel> {
        self.inner.lock().unwrap().get(id).cloned()
    }

    pub fn contains(&self, id: &SurfaceId) -> bool {
        self.inner.lock().unwrap().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identifiers of all live surfaces.
    pub fn ids(&self) -> Vec<SurfaceId> {
        self.inner.lock().unwrap().keys().cloned().collect()
    }
}
