//! Host construction parameters.
//!
//! Device count and geometry, loadable from a YAML file with per-field
//! defaults so a partial config is enough.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{DEFAULT_QSET, DEFAULT_QUANTUM, Geometry, StoreError};

/// Number of devices a table starts with when nothing is configured.
pub const DEFAULT_DEVICE_COUNT: usize = 4;

/// Host configuration for a device table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// How many independent stores the table owns.
    #[serde(default = "default_devices")]
    pub devices: usize,

    /// Block size in bytes.
    #[serde(default = "default_quantum")]
    pub quantum: usize,

    /// Block slots per node.
    #[serde(default = "default_qset")]
    pub qset: usize,
}

fn default_devices() -> usize {
    DEFAULT_DEVICE_COUNT
}

fn default_quantum() -> usize {
    DEFAULT_QUANTUM
}

fn default_qset() -> usize {
    DEFAULT_QSET
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            devices: DEFAULT_DEVICE_COUNT,
            quantum: DEFAULT_QUANTUM,
            qset: DEFAULT_QSET,
        }
    }
}

impl DeviceConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::IoError)?;
        let config =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        Ok(config)
    }

    /// Validated geometry for these parameters. Rejected before any device
    /// is built.
    pub fn geometry(&self) -> Result<Geometry, StoreError> {
        Geometry::new(self.quantum, self.qset)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file")]
    IoError(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    ParseError(String),
}
