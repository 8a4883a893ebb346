// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`supervisor`] owns the single live encoder process, its line buffer and
//!   its close transition.
//! - [`lines`] turns raw pipe bytes into lines and runs the per-stream reader
//!   tasks.

pub mod lines;
pub mod supervisor;

pub use lines::LineSplitter;
pub use supervisor::{LineHandler, ProcessOutcome, Supervisor};
