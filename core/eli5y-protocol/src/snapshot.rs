//! Validated rkyv snapshots of a [`Formula`].
//!
//! The presentation layer hands immutable snapshots to renderers and tools.
//! Decoding always runs `check_bytes`, so a truncated or foreign buffer is a
//! [`SnapshotError`], never undefined behavior.

use rkyv::AlignedVec;

use crate::model::Formula;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(String),
    #[error("invalid snapshot: {0}")]
    Invalid(String),
}

pub fn encode_snapshot(formula: &Formula) -> Result<AlignedVec, SnapshotError> {
    rkyv::to_bytes::<_, 1024>(formula).map_err(|e| SnapshotError::Encode(e.to_string()))
}

pub fn decode_snapshot(bytes: &[u8]) -> Result<Formula, SnapshotError> {
    // Archives must be read from an aligned buffer.
    let mut aligned = AlignedVec::with_capacity(bytes.len());
    aligned.extend_from_slice(bytes);

    rkyv::from_bytes::<Formula>(&aligned).map_err(|e| SnapshotError::Invalid(e.to_string()))
}
