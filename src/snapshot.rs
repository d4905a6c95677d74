//! Persisted design state.
//!
//! A [`DesignSnapshot`] is the full layer list in paint order. It is the
//! hand-off to order fulfilment and the restore point when a saved design is
//! reopened; geometry is carried as plain `f64` so nothing is rounded.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::layer::{Layer, LayerId};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("unsupported snapshot version {found} (expected {SNAPSHOT_VERSION})")]
    UnsupportedVersion { found: u32 },
    #[error("duplicate layer id in snapshot: {0}")]
    DuplicateId(LayerId),
    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSnapshot {
    pub version: u32,
    /// Back to front.
    pub layers: Vec<Layer>,
}

impl DesignSnapshot {
    #[must_use]
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { version: SNAPSHOT_VERSION, layers }
    }

    /// Check the version and that every id is unique.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedVersion` or `DuplicateId`.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion { found: self.version });
        }
        let mut seen = HashSet::with_capacity(self.layers.len());
        for layer in &self.layers {
            if !seen.insert(layer.id.as_str()) {
                return Err(SnapshotError::DuplicateId(layer.id.clone()));
            }
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `Json` if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `Json` for malformed input, or a validation error.
    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(raw)?;
        snapshot.validate()?;
        Ok(snapshot)
    }
}
