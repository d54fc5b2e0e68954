//! The decision engine: owns the swappable snapshot, the decision cache and
//! the audit sink, and runs the three evaluators in a fixed order.
//!
//! No process-wide state: construct one engine and pass it around. Readers
//! clone the snapshot `Arc` and release the lock before evaluating, so a
//! concurrent reload never tears a table mid-decision.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::info;

use super::audit::{AuditEntry, AuditLogger};
use super::cache::{CacheKey, CacheStats, DecisionCache};
use super::model::{Decision, ModelVerdict};
use super::snapshot::{PolicySnapshot, SnapshotData};
use super::{combine, dac, mac, paths, rbac};

/// Debugging view of one user's policy-relevant attributes.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserInfo {
    pub user_id: String,
    pub clearance: String,
    pub roles: Vec<String>,
}

pub struct PolicyEngine {
    snapshot: RwLock<Arc<PolicySnapshot>>,
    generation: AtomicU64,
    cache: DecisionCache,
    audit: AuditLogger,
}

impl PolicyEngine {
    pub fn new(data: SnapshotData, audit: AuditLogger) -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(data.compile(1))),
            generation: AtomicU64::new(1),
            cache: DecisionCache::default(),
            audit,
        }
    }

    /// Authorize one request. Consults the cache first, else evaluates DAC,
    /// MAC and RBAC against the current snapshot and combines them under
    /// fail-safe conjunction. Every request is audited, cache hit or not:
    /// the trail records access attempts, not computation events.
    pub fn authorize(&self, user: &str, operation: &str, path: &str) -> Decision {
        let norm = paths::normalize(path);
        let key = CacheKey {
            user: user.to_string(),
            operation: operation.to_string(),
            path: norm.clone(),
        };

        let decision = match self.cache.get(&key) {
            Some(hit) => hit,
            None => {
                let snap = self.current();
                let dac_v = dac::evaluate(user, operation, &norm, &snap);
                let mac_v = mac::evaluate(user, operation, &norm, &snap);
                let rbac_v = rbac::evaluate(user, operation, &snap);
                let decision = combine::combine(dac_v, mac_v, rbac_v);
                self.cache.insert(key, decision.clone());
                decision
            }
        };

        self.audit.record(AuditEntry::new(user, operation, &norm, decision.granted, &decision.reason));
        decision
    }

    /// Run the three evaluators without combining or auditing; debugging aid.
    pub fn check_models(&self, user: &str, operation: &str, path: &str) -> Vec<ModelVerdict> {
        let norm = paths::normalize(path);
        let snap = self.current();
        vec![
            dac::evaluate(user, operation, &norm, &snap),
            mac::evaluate(user, operation, &norm, &snap),
            rbac::evaluate(user, operation, &snap),
        ]
    }

    pub fn user_info(&self, user: &str) -> Option<UserInfo> {
        let snap = self.current();
        snap.user(user).map(|record| UserInfo {
            user_id: user.to_string(),
            clearance: record.clearance.clone(),
            roles: record.roles.clone(),
        })
    }

    /// Replace the snapshot atomically and invalidate every cached decision;
    /// returns the new generation.
    pub fn reload(&self, data: SnapshotData) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let snap = Arc::new(data.compile(generation));
        *self.snapshot.write() = snap;
        self.cache.invalidate_all();
        info!(target: "filewarden", generation, "policy snapshot reloaded; decision cache invalidated");
        generation
    }

    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Arc<PolicySnapshot> {
        self.current()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn audit_errors(&self) -> u64 {
        self.audit.error_count()
    }

    /// Drain the audit writer; call once before dropping the engine when the
    /// trail must be complete on disk.
    pub async fn shutdown(&mut self) {
        self.audit.shutdown().await;
    }

    fn current(&self) -> Arc<PolicySnapshot> {
        self.snapshot.read().clone()
    }
}
