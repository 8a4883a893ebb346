// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Process-level failures (spawn errors, non-zero exits) are deliberately not
//! represented here: they surface as [`crate::exec::ProcessOutcome`] and
//! [`crate::job::JobState::ClosedError`] instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransjobError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Probe error: {0}")]
    ProbeError(String),

    #[error("Frame extraction error: {0}")]
    FrameError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TransjobError>;
