//! Configuration types for cst-algo

use serde::{Deserialize, Serialize};

use crate::error::CstError;
use crate::result::Result;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CstConfig {
    /// Diff engine tuning
    pub diff: DiffConfig,

    /// Incremental updater tuning
    pub incremental: IncrementalConfig,
}

impl CstConfig {
    /// Reject values no operation can work with
    pub fn validate(&self) -> Result<()> {
        if self.diff.max_alignment_cells == 0 {
            return Err(CstError::config_error(
                "diff.maxAlignmentCells must be greater than zero",
            ));
        }
        if self.incremental.relex_tokens && self.incremental.max_relex_len == 0 {
            return Err(CstError::config_error(
                "incremental.maxRelexLen must be greater than zero when relexing is enabled",
            ));
        }
        Ok(())
    }
}

/// Diff engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct DiffConfig {
    /// Largest child alignment table (old children x new children) built for
    /// one node pair; bigger middles are diffed positionally
    pub max_alignment_cells: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_alignment_cells: 1 << 20,
        }
    }
}

/// Incremental updater configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct IncrementalConfig {
    /// Try to patch a single token before falling back to a reparse
    pub relex_tokens: bool,

    /// Longest token text (in bytes, after the edit) eligible for relexing
    pub max_relex_len: usize,
}

impl Default for IncrementalConfig {
    fn default() -> Self {
        Self {
            relex_tokens: true,
            max_relex_len: 1024,
        }
    }
}
