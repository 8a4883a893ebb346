// src/media/probe.rs

use std::path::Path;
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;

use crate::errors::{Result, TransjobError};

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    /// The prober reports numbers as strings; absent for some image formats.
    duration: Option<String>,
}

/// Ask `probe_binary` (ffprobe-compatible) for the container duration of
/// `source`, in seconds.
pub async fn probe_duration(probe_binary: &str, source: &Path) -> Result<f64> {
    let output = Command::new(probe_binary)
        .args(["-v", "error", "-of", "json", "-show_entries", "format=duration"])
        .arg(source)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| TransjobError::ProbeError(format!("running {probe_binary}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TransjobError::ProbeError(format!(
            "{probe_binary} {} for {}: {}",
            output.status,
            source.display(),
            stderr.trim()
        )));
    }

    let duration = parse_probe_output(&output.stdout)?;
    debug!(source = %source.display(), duration, "probed duration");
    Ok(duration)
}

fn parse_probe_output(stdout: &[u8]) -> Result<f64> {
    let parsed: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| TransjobError::ProbeError(format!("unexpected probe output: {e}")))?;

    let raw = parsed
        .format
        .duration
        .ok_or_else(|| TransjobError::ProbeError("source has no duration".to_string()))?;

    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| TransjobError::ProbeError(format!("invalid duration '{raw}'")))
}
