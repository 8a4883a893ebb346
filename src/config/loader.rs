// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{JobFile, RawJobFile};
use crate::errors::Result;

/// Load a job file from a given path and return the raw `RawJobFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that, or validate yourself after
/// applying command-line overrides.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawJobFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawJobFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a job file from path and run validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<JobFile> {
    let raw = load_from_path(&path)?;
    let config = JobFile::try_from(raw)?;
    Ok(config)
}

/// Job file used when `--config` is not given and it exists.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Transjob.toml")
}

/// The job file to read: `explicit` if given (it must exist), else the
/// default file when present, else none.
pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(PathBuf::from(path)),
        None => {
            let path = default_config_path();
            path.exists().then_some(path)
        }
    }
}

/// Load the resolved job file, or an empty one when there is none so that
/// every value can come from the command line.
pub fn load_or_default(explicit: Option<&str>) -> Result<(RawJobFile, Option<PathBuf>)> {
    match resolve_config_path(explicit) {
        Some(path) => {
            debug!(path = %path.display(), "loading job file");
            Ok((load_from_path(&path)?, Some(path)))
        }
        None => {
            debug!("no job file; using command-line values only");
            Ok((RawJobFile::default(), None))
        }
    }
}
