// src/media/mod.rs

//! Media helpers around the job core: frame sizes, single-frame extraction
//! for thumbnail strips, and duration probing.

pub mod frames;
pub mod probe;
pub mod resolution;

pub use frames::{EncoderFrameSource, FrameSource, frame_args, strip_timestamps};
pub use probe::probe_duration;
pub use resolution::{Resolution, STANDARD_RESOLUTIONS};
