// src/config/model.rs

use serde::Deserialize;

use crate::media::Resolution;

/// Job file as read from TOML, before validation.
///
/// ```toml
/// [encoder]
/// binary = "ffmpeg"
///
/// [job]
/// input = "in.mp4"
/// output = "out.mp4"
/// args = "-preset fast"
/// filters = "scale=1280:720"
/// disabled = ["preset"]
///
/// [options]
/// encoder = "libx264"
/// no_audio = true
/// ```
///
/// Every section is optional; input and output may also come from the
/// command line.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawJobFile {
    #[serde(default)]
    pub encoder: EncoderSection,

    #[serde(default)]
    pub job: JobSection,

    #[serde(default)]
    pub options: EncoderOptions,
}

/// `[encoder]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct EncoderSection {
    /// Encoder executable, looked up on `PATH` when not a path.
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Prober used to find the input duration when `job.duration` is unset.
    #[serde(default = "default_probe")]
    pub probe: String,
}

fn default_binary() -> String {
    "ffmpeg".to_string()
}

fn default_probe() -> String {
    "ffprobe".to_string()
}

impl Default for EncoderSection {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            probe: default_probe(),
        }
    }
}

/// `[job]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct JobSection {
    #[serde(default)]
    pub input: Option<String>,

    #[serde(default)]
    pub output: Option<String>,

    /// Input duration in seconds; probed when absent.
    #[serde(default)]
    pub duration: Option<f64>,

    /// Emit `-y` so an existing output is replaced.
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,

    /// Free-form extra encoder arguments (`-key value` form).
    #[serde(default)]
    pub args: Option<String>,

    /// Video filter chain (`key=value,key=value` form).
    #[serde(default)]
    pub filters: Option<String>,

    /// Option names to leave out of the command line.
    #[serde(default)]
    pub disabled: Vec<String>,
}

fn default_overwrite() -> bool {
    true
}

impl Default for JobSection {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            duration: None,
            overwrite: default_overwrite(),
            args: None,
            filters: None,
            disabled: Vec::new(),
        }
    }
}

/// `[options]` section: typed shortcuts for the common encoder settings.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EncoderOptions {
    /// Video codec, e.g. `libx264` or `h264_nvenc`.
    #[serde(default)]
    pub encoder: Option<String>,

    #[serde(default)]
    pub no_audio: bool,

    #[serde(default)]
    pub fps: Option<u32>,

    /// `WIDTHxHEIGHT`.
    #[serde(default)]
    pub resolution: Option<String>,

    /// Target output size; turned into a video bitrate when the duration
    /// is known.
    #[serde(default)]
    pub file_size_mb: Option<f64>,

    /// Playback speed multiplier applied with a `setpts` filter.
    #[serde(default)]
    pub speed: Option<f64>,

    /// Stop after this many frames (image export).
    #[serde(default)]
    pub frame_limit: Option<u32>,
}

/// Validated job file. Built with `JobFile::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct JobFile {
    pub encoder: EncoderSection,
    pub job: JobSection,
    pub options: EncoderOptions,
    pub input: String,
    pub output: String,
    pub resolution: Option<Resolution>,
}

impl JobFile {
    pub(crate) fn new_unchecked(
        raw: RawJobFile,
        input: String,
        output: String,
        resolution: Option<Resolution>,
    ) -> Self {
        Self {
            encoder: raw.encoder,
            job: raw.job,
            options: raw.options,
            input,
            output,
            resolution,
        }
    }
}
