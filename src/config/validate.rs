// src/config/validate.rs

use tracing::debug;

use crate::config::model::{JobFile, RawJobFile};
use crate::errors::{Result, TransjobError};
use crate::media::Resolution;

impl TryFrom<RawJobFile> for JobFile {
    type Error = TransjobError;

    fn try_from(raw: RawJobFile) -> std::result::Result<Self, Self::Error> {
        validate_encoder(&raw)?;
        validate_numbers(&raw)?;
        let input = required_path(raw.job.input.as_deref(), "input")?;
        let output = required_path(raw.job.output.as_deref(), "output")?;
        let resolution = parse_resolution(raw.options.resolution.as_deref())?;
        Ok(JobFile::new_unchecked(raw, input, output, resolution))
    }
}

fn validate_encoder(cfg: &RawJobFile) -> Result<()> {
    if cfg.encoder.binary.trim().is_empty() {
        return Err(TransjobError::ConfigError(
            "[encoder].binary must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_numbers(cfg: &RawJobFile) -> Result<()> {
    if let Some(d) = cfg.job.duration {
        if !(d.is_finite() && d > 0.0) {
            return Err(TransjobError::ConfigError(format!(
                "[job].duration must be > 0 (got {d})"
            )));
        }
    }

    if cfg.options.fps == Some(0) {
        return Err(TransjobError::ConfigError(
            "[options].fps must be >= 1 (got 0)".to_string(),
        ));
    }

    if let Some(speed) = cfg.options.speed {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(TransjobError::ConfigError(format!(
                "[options].speed must be > 0 (got {speed})"
            )));
        }
    }

    if let Some(size) = cfg.options.file_size_mb {
        if !(size.is_finite() && size > 0.0) {
            return Err(TransjobError::ConfigError(format!(
                "[options].file_size_mb must be > 0 (got {size})"
            )));
        }
    }

    Ok(())
}

fn required_path(value: Option<&str>, name: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(TransjobError::ConfigError(format!(
            "no {name} given (set [job].{name} or pass it on the command line)"
        ))),
    }
}

fn parse_resolution(value: Option<&str>) -> Result<Option<Resolution>> {
    let resolution = value
        .map(|s| s.parse::<Resolution>().map_err(TransjobError::ConfigError))
        .transpose()?;

    if let Some(r) = resolution.filter(|r| !r.is_standard()) {
        debug!(resolution = %r, "using a non-standard output resolution");
    }
    Ok(resolution)
}
