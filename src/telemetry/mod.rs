// src/telemetry/mod.rs

//! Progress telemetry derived from encoder output.
//!
//! [`parse_line`] is a pure function: it keeps no state between calls.
//! Accumulating across lines is done by [`ProgressSnapshot::merge`], which the
//! job controller owns.

pub mod format;
pub mod parser;
pub mod snapshot;

pub use format::format_seconds;
pub use parser::parse_line;
pub use snapshot::ProgressSnapshot;
