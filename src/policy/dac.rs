//! Discretionary access control: ownership and permission bits, resolved
//! through the path hierarchy.

use super::model::{Model, ModelVerdict, Operation};
use super::paths;
use super::snapshot::PolicySnapshot;

/// Evaluate the DAC model for one request. The resolved owner always passes;
/// everyone else is tested against the record's permission bits using the
/// fixed operation-to-bit mapping on `Operation::dac_bit`.
pub fn evaluate(user: &str, op_name: &str, path: &str, snap: &PolicySnapshot) -> ModelVerdict {
    let Some((_, record)) = paths::resolve(path, &snap.owners) else {
        return ModelVerdict::deny(Model::Dac, "no ownership record for path or ancestor");
    };

    if user == record.owner {
        return ModelVerdict::allow(Model::Dac, "owner access");
    }

    let Some(op) = Operation::from_name(op_name) else {
        return ModelVerdict::deny(
            Model::Dac,
            format!("no permission mapping for operation {op_name}"),
        );
    };

    let bit = op.dac_bit();
    if record.perms.has(bit) {
        ModelVerdict::allow(Model::Dac, format!("{} permission granted", bit.label()))
    } else {
        ModelVerdict::deny(
            Model::Dac,
            format!(
                "insufficient permissions ({}) for operation {}",
                record.perms.render(),
                op_name
            ),
        )
    }
}
