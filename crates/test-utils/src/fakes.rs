#![allow(dead_code)]

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use transjob::errors::{Result, TransjobError};
use transjob::media::{FrameSource, Resolution};

/// A request seen by [`FakeFrameSource`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRequest {
    pub source: PathBuf,
    pub timestamp: f64,
    pub resolution: Resolution,
}

/// A `FrameSource` that records requests instead of decoding anything.
///
/// Returns the timestamp (milliseconds, little endian) as the frame bytes,
/// or `FrameError` for negative timestamps.
#[derive(Clone, Default)]
pub struct FakeFrameSource {
    pub requests: Arc<Mutex<Vec<FrameRequest>>>,
}

impl FakeFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<FrameRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl FrameSource for FakeFrameSource {
    fn get_frame<'a>(
        &'a self,
        source: &'a Path,
        timestamp: f64,
        resolution: Resolution,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(FrameRequest {
                source: source.to_path_buf(),
                timestamp,
                resolution,
            });
            if timestamp < 0.0 {
                return Err(TransjobError::FrameError(format!(
                    "negative timestamp {timestamp}"
                )));
            }
            let millis = (timestamp * 1000.0).round() as u64;
            Ok(millis.to_le_bytes().to_vec())
        })
    }
}
