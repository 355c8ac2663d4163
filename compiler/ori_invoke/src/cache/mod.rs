//! Concurrent invoker cache.
//!
//! # Publication
//!
//! Builds run outside any lock. The finished invoker is published through
//! the map's entry API: the first writer for a shape wins and later writers
//! discard their redundant build and return the published invoker. Readers
//! only ever see fully built invokers.
//!
//! # Thread Safety
//!
//! The map is sharded (`DashMap`), so unrelated shapes never wait on one
//! global lock. Entries are never evicted.
//!
//! # Host binding
//!
//! Shapes name types by `TypeId`, which only has meaning inside one host.
//! A cache attaches to the first host it serves through
//! [`attach`](InvokerCache::attach) and refuses every other host.

use std::sync::{Arc, OnceLock};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use ori_reflect::SharedHost;
use rustc_hash::FxBuildHasher;
use tracing::debug;

use crate::errors::InvokeError;
use crate::invoker::Invoker;
use crate::shape::InvokerShape;

/// Shape to invoker map with compute-or-fetch semantics.
pub struct InvokerCache {
    map: DashMap<InvokerShape, Invoker, FxBuildHasher>,
    host: OnceLock<SharedHost>,
}

impl Default for InvokerCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InvokerCache {
    pub fn new() -> Self {
        InvokerCache {
            map: DashMap::with_hasher(FxBuildHasher),
            host: OnceLock::new(),
        }
    }

    /// Create a cache sized for about `capacity` shapes.
    pub fn with_capacity(capacity: usize) -> Self {
        InvokerCache {
            map: DashMap::with_capacity_and_hasher(capacity, FxBuildHasher),
            host: OnceLock::new(),
        }
    }

    /// Tie this cache to `host`. The first call wins; later calls succeed
    /// only for the same host.
    pub fn attach(&self, host: &SharedHost) -> Result<(), InvokeError> {
        let owner = self.host.get_or_init(|| Arc::clone(host));
        if same_host(owner, host) {
            Ok(())
        } else {
            Err(InvokeError::ForeignCache)
        }
    }

    /// Whether this cache is attached to `host`.
    pub fn is_attached_to(&self, host: &SharedHost) -> bool {
        self.host.get().is_some_and(|owner| same_host(owner, host))
    }

    /// The published invoker for `shape`, or the result of `build`.
    ///
    /// A failed build is returned as is and never stored; the next request
    /// for the same shape builds again.
    pub fn get_or_build<E>(
        &self,
        shape: &InvokerShape,
        build: impl FnOnce(&InvokerShape) -> Result<Invoker, E>,
    ) -> Result<Invoker, E> {
        if let Some(hit) = self.map.get(shape) {
            return Ok(hit.value().clone());
        }

        debug!(name = %shape.name, access = ?shape.access, "invoker cache miss");
        let built = build(shape)?;

        match self.map.entry(shape.clone()) {
            Entry::Occupied(published) => {
                debug!(name = %shape.name, "discarding redundant build");
                Ok(published.get().clone())
            }
            Entry::Vacant(slot) => Ok(slot.insert(built).value().clone()),
        }
    }

    pub fn get(&self, shape: &InvokerShape) -> Option<Invoker> {
        self.map.get(shape).map(|hit| hit.value().clone())
    }

    pub fn contains(&self, shape: &InvokerShape) -> bool {
        self.map.contains_key(shape)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

fn same_host(a: &SharedHost, b: &SharedHost) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

impl std::fmt::Debug for InvokerCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvokerCache")
            .field("len", &self.map.len())
            .finish()
    }
}
