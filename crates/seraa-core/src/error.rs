//! Error types for SERAA Core.

use std::path::PathBuf;

use thiserror::Error;

/// Core error type for engine and configuration operations.
#[derive(Debug, Error)]
pub enum SeraaError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`SeraaConfig`](crate::SeraaConfig).
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// No monitor with this name is registered.
    #[error("Unknown monitor: {0}")]
    UnknownMonitor(String),

    /// Ternary error passthrough.
    #[error("Ternary error: {0}")]
    Ternary(#[from] seraa_ternary::TernaryError),

    /// Monitor error passthrough.
    #[error("Monitor error: {0}")]
    Monitor(#[from] seraa_monitor::MonitorError),

    /// Axiom error passthrough.
    #[error("Axiom error: {0}")]
    Axiom(#[from] seraa_axioms::AxiomError),
}
