//! Immutable policy snapshot: the compiled, lookup-ready form of the
//! externally loaded configuration tables.
//!
//! `SnapshotData` is the wire shape a configuration collaborator hands the
//! engine; `compile` normalizes paths, parses permission strings and groups
//! role rows. Structural problems (missing root anchors, empty tables) are
//! reported as warnings, never as hard errors: the evaluators degrade to
//! deny-everything over a thin snapshot.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PolicyError, PolicyResult};

use super::model::{OwnershipRecord, PermBits, UserRecord};
use super::paths;

/// One ownership row: path, owner user id, and a permission flag string
/// holding any of `r`, `w`, `x`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnershipRow {
    pub path: String,
    pub owner: String,
    pub permissions: String,
}

/// Security label tables: path labels plus the level-name to rank order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LabelData {
    #[serde(default)]
    pub paths: HashMap<String, String>,
    #[serde(default, rename = "clearance_hierarchy")]
    pub hierarchy: HashMap<String, u32>,
}

/// One role permission row; operations absent for a role are denied.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RolePermRow {
    pub role: String,
    pub operation: String,
    pub allowed: bool,
}

/// External data shape consumed by the engine. All tables default to empty
/// so a partial document still deserializes; the fail-safe evaluators turn
/// the gaps into denials.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotData {
    #[serde(default)]
    pub ownership: Vec<OwnershipRow>,
    #[serde(default)]
    pub labels: LabelData,
    #[serde(default)]
    pub users: HashMap<String, UserRecord>,
    #[serde(default)]
    pub role_perms: Vec<RolePermRow>,
}

impl SnapshotData {
    pub fn from_json(raw: &str) -> PolicyResult<Self> {
        serde_json::from_str(raw).map_err(|e| PolicyError::MalformedSnapshot(e.to_string()))
    }

    /// Compile into the lookup-ready snapshot form, tagged with a generation.
    pub fn compile(self, generation: u64) -> PolicySnapshot {
        let mut owners: HashMap<String, OwnershipRecord> = HashMap::new();
        for row in self.ownership {
            let key = paths::normalize(&row.path);
            owners.insert(
                key,
                OwnershipRecord { owner: row.owner, perms: PermBits::parse(&row.permissions) },
            );
        }

        let labels: HashMap<String, String> = self
            .labels
            .paths
            .into_iter()
            .map(|(p, level)| (paths::normalize(&p), level))
            .collect();
        let hierarchy = self.labels.hierarchy;

        let mut role_perms: HashMap<String, HashMap<String, bool>> = HashMap::new();
        for row in self.role_perms {
            role_perms.entry(row.role).or_default().insert(row.operation, row.allowed);
        }

        let snap = PolicySnapshot {
            generation,
            owners,
            labels,
            hierarchy,
            users: self.users,
            role_perms,
        };
        snap.report_gaps();
        snap
    }
}

/// Compiled, immutable view of all policy tables. Published behind an `Arc`
/// and replaced wholesale on reload; never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicySnapshot {
    pub generation: u64,
    pub owners: HashMap<String, OwnershipRecord>,
    pub labels: HashMap<String, String>,
    pub hierarchy: HashMap<String, u32>,
    pub users: HashMap<String, UserRecord>,
    pub role_perms: HashMap<String, HashMap<String, bool>>,
}

impl PolicySnapshot {
    pub fn user(&self, user_id: &str) -> Option<&UserRecord> {
        self.users.get(user_id)
    }

    pub fn rank(&self, level: &str) -> Option<u32> {
        self.hierarchy.get(level).copied()
    }

    /// Warn about structural gaps that will surface as blanket denials.
    fn report_gaps(&self) {
        if self.owners.is_empty() {
            warn!(target: "filewarden", generation = self.generation, "ownership table is empty; DAC will deny everything");
        } else if !self.owners.contains_key("/") {
            warn!(target: "filewarden", generation = self.generation, "ownership table has no root anchor; unmapped paths will be denied");
        }
        if self.labels.is_empty() {
            warn!(target: "filewarden", generation = self.generation, "label table is empty; MAC will deny everything");
        } else if !self.labels.contains_key("/") {
            warn!(target: "filewarden", generation = self.generation, "label table has no root anchor; unmapped paths will be denied");
        }
        if self.hierarchy.is_empty() {
            warn!(target: "filewarden", generation = self.generation, "clearance hierarchy is empty; MAC will deny everything");
        }
        if self.role_perms.is_empty() {
            warn!(target: "filewarden", generation = self.generation, "role permission table is empty; RBAC will deny everything");
        }
    }
}
