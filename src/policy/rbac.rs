//! Role-based access control: a user passes when any held role maps the
//! operation name to true. Closed world: an operation a role's table never
//! mentions is denied for that role.

use super::model::{Model, ModelVerdict};
use super::snapshot::PolicySnapshot;

/// Evaluate the RBAC model for one request. Matching is on the raw
/// operation name so role tables may carry operations beyond the built-in
/// enum; unknown names simply find no grant.
pub fn evaluate(user: &str, op_name: &str, snap: &PolicySnapshot) -> ModelVerdict {
    let roles = match snap.user(user) {
        Some(record) if !record.roles.is_empty() => &record.roles,
        _ => return ModelVerdict::deny(Model::Rbac, "no roles assigned"),
    };

    let mut granting: Vec<&str> = Vec::new();
    let mut checked: Vec<String> = Vec::new();
    for role in roles {
        match snap.role_perms.get(role).and_then(|perms| perms.get(op_name)) {
            Some(true) => granting.push(role),
            Some(false) => checked.push(role.clone()),
            None => checked.push(format!("{role}(no-perm)")),
        }
    }

    if granting.is_empty() {
        ModelVerdict::deny(
            Model::Rbac,
            format!("no role grants {op_name} (checked: {})", checked.join(", ")),
        )
    } else {
        ModelVerdict::allow(Model::Rbac, format!("allowed by roles: {}", granting.join(", ")))
    }
}
