//! Fail-safe combination of the three model verdicts into one decision.

use super::model::{Decision, ModelVerdict};

/// Combine per-model verdicts under conjunction: any single deny is
/// authoritative. The reason string lists the verdicts in the fixed order
/// DAC, MAC, RBAC so identical requests produce identical reasons.
pub fn combine(dac: ModelVerdict, mac: ModelVerdict, rbac: ModelVerdict) -> Decision {
    let granted = dac.allowed && mac.allowed && rbac.allowed;
    let verdicts = vec![dac, mac, rbac];
    let parts: Vec<String> = verdicts
        .iter()
        .map(|v| format!("{}: {} {}", v.model.name(), if v.allowed { '✓' } else { '✗' }, v.detail))
        .collect();
    let reason = format!(
        "authorization {} - {}",
        if granted { "granted" } else { "denied" },
        parts.join(" | ")
    );
    Decision { granted, verdicts, reason }
}
