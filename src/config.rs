use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};

/// Smallest minimum degree that still lets a full node split into two legal halves
pub const MIN_DEGREE_LOWER_BOUND: usize = 2;

/// Construction parameters shared by the indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Minimum degree `t` of a B-tree: non-root nodes hold between `t-1` and `2t-1` keys.
    /// Ignored by the AVL tree.
    pub min_degree: usize,
    /// Record a step-by-step trace for every operation.
    pub trace: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            min_degree: 2,
            trace: true,
        }
    }
}

impl IndexConfig {
    pub fn with_min_degree(min_degree: usize) -> Self {
        IndexConfig {
            min_degree,
            ..IndexConfig::default()
        }
    }

    pub fn without_trace(self) -> Self {
        IndexConfig {
            trace: false,
            ..self
        }
    }

    /// Reject a minimum degree for which the node bounds are degenerate or not representable
    pub fn validate(&self) -> Result<()> {
        if self.min_degree < MIN_DEGREE_LOWER_BOUND {
            return Err(ConfigError::MinDegreeTooSmall {
                min_degree: self.min_degree,
            });
        }
        if self.min_degree.checked_mul(2).is_none() {
            return Err(ConfigError::MinDegreeTooLarge {
                min_degree: self.min_degree,
            });
        }
        Ok(())
    }
}
