//! In-memory decision cache keyed by (user, operation, normalized path).
//!
//! Entries live for at most one snapshot generation: the engine clears the
//! cache on every reload. Growth is otherwise unbounded in principle; a
//! size cap with bulk eviction keeps the memory profile flat without
//! changing any observable decision.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::Serialize;

use crate::tprintln;

use super::model::Decision;

const CACHE_MAX: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub user: String,
    pub operation: String,
    pub path: String,
}

/// Counters for observability; cheap to copy out.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

#[derive(Default)]
pub struct DecisionCache {
    entries: RwLock<HashMap<CacheKey, Decision>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl DecisionCache {
    pub fn get(&self, key: &CacheKey) -> Option<Decision> {
        if let Some(hit) = self.entries.read().get(key).cloned() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tprintln!("cache hit: user={} op={} path={}", key.user, key.operation, key.path);
            return Some(hit);
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        tprintln!("cache miss: user={} op={} path={}", key.user, key.operation, key.path);
        None
    }

    pub fn insert(&self, key: CacheKey, decision: Decision) {
        let mut w = self.entries.write();
        // If over capacity, evict arbitrary entries (HashMap iteration order
        // is fine here). Evict a few percent at once to reduce churn.
        if w.len() >= CACHE_MAX {
            let evict_n = CACHE_MAX / 20 + 1;
            let keys: Vec<CacheKey> = w.keys().take(evict_n).cloned().collect();
            let mut removed = 0u64;
            for k in keys {
                if w.remove(&k).is_some() {
                    removed += 1;
                }
            }
            self.evictions.fetch_add(removed, Ordering::Relaxed);
            tprintln!("cache evicted {} entries at capacity {}", removed, CACHE_MAX);
        }
        w.insert(key, decision);
    }

    pub fn invalidate_all(&self) {
        self.entries.write().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.entries.read().len(),
        }
    }
}
