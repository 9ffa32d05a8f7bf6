//! Shared key → proxy registry.
//!
//! One `ProxyCache` is shared (behind an `Arc`) by every context and
//! producer in the process. It holds exactly one strong reference per
//! registered key; unregistering drops that reference without any claim
//! about when the texture itself is destroyed.
//!
//! Resolvers that must look up, maybe copy, and then register under a key
//! hold the key's stripe lock from [`ProxyCache::lock_key`] for the whole
//! sequence. That makes check-then-act atomic per key, so concurrent
//! resolvers never produce two derived copies for one key.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use crate::key::UniqueKey;
use crate::proxy::TextureProxy;

/// Default number of key lock stripes.
pub const DEFAULT_KEY_STRIPES: usize = 64;

/// Thread-safe registry of proxies by [`UniqueKey`].
pub struct ProxyCache {
    /// Registered proxies by key.
    entries: RwLock<HashMap<UniqueKey, Arc<TextureProxy>>>,
    /// Per-key lock stripes, indexed by key hash.
    stripes: Box<[Mutex<()>]>,
    /// Lookup hits.
    hits: AtomicU64,
    /// Lookup misses.
    misses: AtomicU64,
}

impl ProxyCache {
    pub fn new() -> Self {
        Self::with_stripes(DEFAULT_KEY_STRIPES)
    }

    /// Create cache with a specific number of key lock stripes (at least 1).
    pub fn with_stripes(stripes: usize) -> Self {
        let stripes = (0..stripes.max(1)).map(|_| Mutex::new(())).collect();
        Self {
            entries: RwLock::new(HashMap::new()),
            stripes,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Serializes resolution of `key` against other resolvers of any key
    /// on the same stripe.
    ///
    /// Never lock two keys at once from one thread: they may share a stripe.
    pub fn lock_key(&self, key: &UniqueKey) -> MutexGuard<'_, ()> {
        let idx = (key.hash_value() % self.stripes.len() as u64) as usize;
        self.stripes[idx]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Proxy registered under `key`, if any.
    pub fn find(&self, key: &UniqueKey) -> Option<Arc<TextureProxy>> {
        let found = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned();
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Registers `proxy` under `key`.
    ///
    /// Callers unregister any previous holder first; a still-registered
    /// holder is replaced (and returned) so the one-proxy-per-key
    /// invariant holds either way.
    pub fn register(&self, key: UniqueKey, proxy: Arc<TextureProxy>) -> Option<Arc<TextureProxy>> {
        let replaced = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, proxy);
        if let Some(old) = &replaced {
            tracing::warn!(proxy = old.id(), "Replacing proxy still registered under key");
        }
        replaced
    }

    /// Removes the association of `key` with `proxy`.
    ///
    /// No-op (returns `false`) when `key` is held by a different proxy.
    pub fn unregister(&self, key: &UniqueKey, proxy: &Arc<TextureProxy>) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(current) if Arc::ptr_eq(current, proxy) => {
                entries.remove(key);
                true
            }
            _ => false,
        }
    }

    pub fn contains(&self, key: &UniqueKey) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    /// Drops every registration.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    // =========================================================================
    // Stats
    // =========================================================================

    /// Number of registered keys.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Cache hit ratio (0.0 - 1.0).
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    pub fn reset_stats(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

impl Default for ProxyCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProxyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyCache")
            .field("len", &self.len())
            .field("stripes", &self.stripes.len())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}
