//! Bounded frame cache keyed by quantized timestamp.
//!
//! Keys are millisecond buckets: two timestamps within the same
//! millisecond collide, which makes repeated scrub requests for "the same"
//! time cache hits despite floating-point jitter.
//!
//! Eviction is strict FIFO by first insertion. A re-requested entry keeps
//! its original queue position, so the cache is not a true LRU; for the
//! monotonic access pattern of playback and scrubbing the difference is
//! immaterial, and the capacity+1-evicts-first behavior is part of the
//! contract.

use cutroom_core::VideoFrame;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use tracing::trace;

/// Default number of cached frames per source.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

#[inline]
fn cache_key(timestamp: f64) -> i64 {
    (timestamp * 1000.0) as i64
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<i64, VideoFrame>,
    order: VecDeque<i64>,
}

/// A capacity-bounded timestamp-keyed frame store.
///
/// Internally synchronized: one provider's cache may be hit from a scrub
/// thread and a playback thread at once. The lock covers only the map
/// bookkeeping; reads copy the frame out so callers never mutate cached
/// state.
pub struct FrameCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl FrameCache {
    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create a cache holding at most `capacity` frames.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Store a frame under the quantized timestamp, evicting the
    /// oldest-inserted entries while over capacity. Re-putting an existing
    /// key replaces the frame without refreshing its queue position.
    pub fn put(&self, timestamp: f64, frame: VideoFrame) {
        let key = cache_key(timestamp);
        let mut inner = self.inner.lock();
        if inner.entries.insert(key, frame).is_none() {
            inner.order.push_back(key);
        }
        while inner.entries.len() > self.capacity {
            match inner.order.pop_front() {
                Some(oldest) => {
                    if let Some(evicted) = inner.entries.remove(&oldest) {
                        trace!(key = oldest, bytes = evicted.memory_size(), "evicted cached frame");
                    }
                }
                None => break,
            }
        }
    }

    /// Look up a frame by timestamp. Returns an independent copy, leaving
    /// the entry (and its eviction order) untouched.
    pub fn get(&self, timestamp: f64) -> Option<VideoFrame> {
        self.inner.lock().entries.get(&cache_key(timestamp)).cloned()
    }

    /// Whether a timestamp is currently cached.
    pub fn contains(&self, timestamp: f64) -> bool {
        self.inner.lock().entries.contains_key(&cache_key(timestamp))
    }

    /// Number of cached frames.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all cached frames.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}

impl Default for FrameCache {
    fn default() -> Self {
        Self::new()
    }
}
