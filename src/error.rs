//! Error types shared across the engine surface.
//!
//! Evaluation itself never errors: missing records, unknown operations and
//! malformed tables all terminate in a deny verdict with an explanatory
//! detail. The variants here cover the two places a hard error is still the
//! right shape: an undeserializable snapshot document, and audit sink I/O.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(String),
    #[error("audit write failure: {0}")]
    AuditWrite(String),
}

pub type PolicyResult<T> = Result<T, PolicyError>;
