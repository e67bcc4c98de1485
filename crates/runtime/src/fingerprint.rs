//! Deterministic snapshot fingerprints.
//!
//! A fingerprint is the SHA-256 digest of the bincode encoding of a
//! [`State`], rendered as lowercase hex. Equal snapshots always share a
//! fingerprint, which makes replays cheap to compare.
use grid_core::State;
use sha2::{Digest, Sha256};

use crate::error::{Result, RuntimeError};

/// Hex-encoded SHA-256 of a snapshot.
pub fn fingerprint(state: &State) -> Result<String> {
    let bytes = bincode::serialize(state).map_err(|source| RuntimeError::Bincode {
        what: "snapshot",
        source,
    })?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// First 16 hex characters of [`fingerprint`], for log lines.
pub fn short_fingerprint(state: &State) -> Result<String> {
    let mut full = fingerprint(state)?;
    full.truncate(16);
    Ok(full)
}
