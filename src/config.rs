//! Runtime configuration for the pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("config version must be >= 1")]
    InvalidVersion,
    #[error("identifier prefix must match [A-Z0-9]{{1,16}}: {0:?}")]
    InvalidPrefix(String),
}

/// Pipeline behavior knobs.
///
/// Cheap to clone and serializable, so deployments can load it from JSON,
/// TOML, or YAML. Always [`validate`](PipelineConfig::validate) at startup;
/// [`crate::Pipeline::new`] validates again defensively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Configuration schema version, for forward migrations.
    pub version: u32,
    /// Prefix of every business identifier. Changing it changes every
    /// identifier but not the hash segment.
    pub id_prefix: String,
    /// Prefix of universal (file-sensitive) identifiers.
    pub universal_prefix: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            version: 1,
            id_prefix: "DOC".to_string(),
            universal_prefix: "UNIV".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Check the invariants the pipeline relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 {
            return Err(ConfigError::InvalidVersion);
        }
        for prefix in [&self.id_prefix, &self.universal_prefix] {
            let well_formed = !prefix.is_empty()
                && prefix.len() <= 16
                && prefix
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
            if !well_formed {
                return Err(ConfigError::InvalidPrefix(prefix.clone()));
            }
        }
        Ok(())
    }
}
