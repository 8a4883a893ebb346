// src/media/frames.rs

//! Single-frame extraction for thumbnail strips.
//!
//! The strip renderer itself lives outside this crate; it only needs
//! something implementing [`FrameSource`] and the timestamps from
//! [`strip_timestamps`].

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use super::resolution::Resolution;
use crate::args::ArgumentSet;
use crate::errors::{Result, TransjobError};

/// Decodes one frame of a source at a timestamp.
///
/// Calls are independent of each other and of any running job.
pub trait FrameSource: Send + Sync {
    fn get_frame<'a>(
        &'a self,
        source: &'a Path,
        timestamp: f64,
        resolution: Resolution,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;
}

/// [`FrameSource`] that asks the encoder for a single WebP frame on stdout.
#[derive(Debug, Clone)]
pub struct EncoderFrameSource {
    binary: String,
}

impl EncoderFrameSource {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

/// Arguments for extracting one frame to stdout.
pub fn frame_args(source: &Path, timestamp: f64, resolution: Resolution) -> ArgumentSet {
    let mut args = ArgumentSet::flags();
    args.set("ss", format!("{:.3}", timestamp.max(0.0)))
        .set("i", source.to_string_lossy().into_owned())
        .set("frames:v", 1)
        .set("s", resolution.to_string())
        .set("c:v", "webp")
        .set("f", "image2pipe");
    args.push_positional("-");
    args
}

impl FrameSource for EncoderFrameSource {
    fn get_frame<'a>(
        &'a self,
        source: &'a Path,
        timestamp: f64,
        resolution: Resolution,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            if !source.exists() {
                return Err(TransjobError::FrameError(format!(
                    "source not found: {}",
                    source.display()
                )));
            }

            let args = frame_args(source, timestamp, resolution).emit();
            debug!(binary = %self.binary, ?args, "extracting frame");

            let output = Command::new(&self.binary)
                .args(&args)
                .stdin(Stdio::null())
                .kill_on_drop(true)
                .output()
                .await?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let last = stderr.lines().last().unwrap_or("").trim();
                return Err(TransjobError::FrameError(format!(
                    "{} {}: {}",
                    self.binary, output.status, last
                )));
            }

            if output.stdout.is_empty() {
                return Err(TransjobError::FrameError(format!(
                    "no frame decoded at {timestamp:.3}s"
                )));
            }

            Ok(output.stdout)
        })
    }
}

/// Evenly spaced timestamps for a strip `strip_width` wide made of frames
/// `frame_width` wide.
///
/// One extra frame is added so the strip is always covered; the last
/// partially visible frame is cut off by the renderer.
pub fn strip_timestamps(duration: f64, strip_width: f64, frame_width: f64) -> Vec<f64> {
    if !(duration > 0.0 && strip_width >= 0.0 && frame_width > 0.0) {
        return Vec::new();
    }

    let count = (strip_width / frame_width).floor() as usize + 1;
    let interval = duration / count as f64;

    (0..count).map(|i| i as f64 * interval).collect()
}
