//! Mandatory access control in the Bell-LaPadula style: no read up, no
//! write down, over the label table and clearance hierarchy.

use super::model::{Model, ModelVerdict, OpClass, Operation};
use super::paths;
use super::snapshot::PolicySnapshot;

/// Evaluate the MAC model for one request. Every lookup failure (label,
/// user, hierarchy rank) denies; an unlabeled path is never treated as an
/// implicitly readable one.
pub fn evaluate(user: &str, op_name: &str, path: &str, snap: &PolicySnapshot) -> ModelVerdict {
    let Some((_, level)) = paths::resolve(path, &snap.labels) else {
        return ModelVerdict::deny(Model::Mac, "no security label resolvable for path or ancestor");
    };

    let Some(record) = snap.user(user) else {
        return ModelVerdict::deny(Model::Mac, format!("user {user} has no clearance record"));
    };

    let Some(clearance_rank) = snap.rank(&record.clearance) else {
        return ModelVerdict::deny(
            Model::Mac,
            format!("clearance level {} missing from hierarchy", record.clearance),
        );
    };
    let Some(label_rank) = snap.rank(level) else {
        return ModelVerdict::deny(
            Model::Mac,
            format!("label level {level} missing from hierarchy"),
        );
    };

    let Some(op) = Operation::from_name(op_name) else {
        return ModelVerdict::deny(
            Model::Mac,
            format!("operation {op_name} has no read/write classification"),
        );
    };

    match op.class() {
        OpClass::ReadLike => {
            // simple security property: clearance must dominate the label
            if clearance_rank >= label_rank {
                ModelVerdict::allow(
                    Model::Mac,
                    format!(
                        "read allowed: {}({}) >= {}({})",
                        record.clearance, clearance_rank, level, label_rank
                    ),
                )
            } else {
                ModelVerdict::deny(
                    Model::Mac,
                    format!(
                        "read denied: {}({}) < {}({})",
                        record.clearance, clearance_rank, level, label_rank
                    ),
                )
            }
        }
        OpClass::WriteLike => {
            // star property: the label must dominate the clearance
            if label_rank >= clearance_rank {
                ModelVerdict::allow(
                    Model::Mac,
                    format!(
                        "write allowed: {}({}) >= {}({})",
                        level, label_rank, record.clearance, clearance_rank
                    ),
                )
            } else {
                ModelVerdict::deny(
                    Model::Mac,
                    format!(
                        "write denied: {}({}) < {}({})",
                        level, label_rank, record.clearance, clearance_rank
                    ),
                )
            }
        }
    }
}
