// src/config/mod.rs

//! Job file loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a job file from disk (`loader.rs`).
//! - Validate values and required paths (`validate.rs`).
//! - Build the encoder argument set from a validated file (`build.rs`).

pub mod build;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    default_config_path, load_and_validate, load_from_path, load_or_default, resolve_config_path,
};
pub use model::{EncoderOptions, EncoderSection, JobFile, JobSection, RawJobFile};
