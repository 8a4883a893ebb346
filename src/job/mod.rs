// src/job/mod.rs

//! Job lifecycle.
//!
//! The [`JobController`] is the facade the rest of the application uses: it
//! renders an [`ArgumentSet`](crate::args::ArgumentSet), runs it through a
//! [`Supervisor`](crate::exec::Supervisor), folds every output line into a
//! [`ProgressSnapshot`] and publishes the result as a [`JobStatus`].

use std::fmt;

use crate::exec::ProcessOutcome;
use crate::telemetry::ProgressSnapshot;

pub mod controller;

pub use controller::JobController;

/// Lifecycle of a job.
///
/// ```text
/// Idle --start--> Running --exit 0--> ClosedSuccess --reset--> Idle
///                 Running --exit != 0 / spawn error--> ClosedError --reset--> Idle
/// ```
///
/// `start` is also accepted from either closed state; `cancel` returns to
/// `Idle` from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Idle,
    Running,
    ClosedSuccess,
    ClosedError,
}

impl JobState {
    pub fn is_closed(self) -> bool {
        matches!(self, JobState::ClosedSuccess | JobState::ClosedError)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobState::Idle => "idle",
            JobState::Running => "running",
            JobState::ClosedSuccess => "success",
            JobState::ClosedError => "error",
        };
        f.write_str(s)
    }
}

/// What subscribers observe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobStatus {
    pub state: JobState,
    pub progress: ProgressSnapshot,
    /// How the last run ended; `None` while running or before the first run.
    pub outcome: Option<ProcessOutcome>,
}
