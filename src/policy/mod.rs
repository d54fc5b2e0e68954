//! Policy decision engine: DAC ownership, Bell-LaPadula MAC and RBAC role
//! checks combined under a fail-safe conjunction, with decision caching and
//! an append-only audit trail.
//!
//! Keep each concern in a small sub-module to avoid large files and match
//! arms. Evaluators are pure functions over an immutable snapshot; all
//! mutable state (snapshot slot, cache, audit sink) lives on `PolicyEngine`.

pub mod model;
pub mod paths;
pub mod snapshot;
pub mod dac;
pub mod mac;
pub mod rbac;
pub mod combine;
pub mod cache;
pub mod audit;
pub mod engine;

// Re-exports for a thin public surface
pub use model::{Decision, Model, ModelVerdict, OpClass, Operation, OwnershipRecord, PermBits, UserRecord};
pub use snapshot::{PolicySnapshot, SnapshotData};
pub use cache::{CacheKey, CacheStats, DecisionCache};
pub use audit::{AuditEntry, AuditLogger};
pub use engine::{PolicyEngine, UserInfo};
