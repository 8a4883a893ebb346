// src/job/controller.rs

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::args::ArgumentSet;
use crate::exec::{ProcessOutcome, Supervisor};
use crate::telemetry::{ProgressSnapshot, parse_line};

use super::{JobState, JobStatus};

/// State shared between the controller and the supervisor's line handler.
#[derive(Debug)]
struct JobShared {
    status_tx: watch::Sender<JobStatus>,
    /// Bumped by every start and cancel; a finishing run whose generation is
    /// no longer current does not touch the state.
    generation: u64,
    total_duration: f64,
}

fn lock(shared: &Mutex<JobShared>) -> MutexGuard<'_, JobShared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Start / observe / cancel facade over one encoder binary.
///
/// Only one job runs per controller: starting while running kills the
/// previous process (last writer wins). Dropping the controller cancels the
/// running job.
pub struct JobController {
    binary: String,
    supervisor: Supervisor,
    shared: Arc<Mutex<JobShared>>,
}

impl fmt::Debug for JobController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobController")
            .field("binary", &self.binary)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl JobController {
    pub fn new(binary: impl Into<String>) -> Self {
        let (status_tx, _) = watch::channel(JobStatus::default());
        let shared = Arc::new(Mutex::new(JobShared {
            status_tx,
            generation: 0,
            total_duration: 0.0,
        }));

        let handler_shared = Arc::clone(&shared);
        let supervisor = Supervisor::with_line_handler(move |line| {
            apply_line(&handler_shared, line);
        });

        Self {
            binary: binary.into(),
            supervisor,
            shared,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Run the encoder with `args` and wait for the job to close.
    ///
    /// `total_duration` is the expected output length in seconds (`<= 0` if
    /// unknown). Returns the state the job closed in, or `Idle` when it was
    /// cancelled or replaced by a newer start before closing.
    pub async fn start(&self, args: &ArgumentSet, total_duration: f64) -> JobState {
        let tokens = args.emit();

        let generation = {
            let mut sh = lock(&self.shared);
            sh.generation += 1;
            sh.total_duration = total_duration;
            sh.status_tx.send_modify(|s| {
                s.state = JobState::Running;
                s.progress = ProgressSnapshot::default();
                s.outcome = None;
            });
            sh.generation
        };
        let mut guard = StartGuard {
            shared: Arc::clone(&self.shared),
            generation,
            armed: true,
        };

        info!(
            binary = %self.binary,
            generation,
            total_duration,
            args = %tokens.join(" "),
            "starting job"
        );

        let outcome = self.supervisor.spawn(&self.binary, &tokens).await;
        guard.armed = false;

        let sh = lock(&self.shared);
        if sh.generation != generation {
            debug!(generation, %outcome, "job was cancelled or superseded");
            return JobState::Idle;
        }

        let state = match &outcome {
            o if o.is_success() => JobState::ClosedSuccess,
            ProcessOutcome::Killed => JobState::Idle,
            _ => JobState::ClosedError,
        };

        if state == JobState::ClosedError {
            warn!(binary = %self.binary, %outcome, "job failed");
        } else {
            info!(binary = %self.binary, %outcome, "job finished");
        }

        sh.status_tx.send_modify(|s| {
            s.state = state;
            s.outcome = Some(outcome);
        });

        state
    }

    /// Stop the running job and return to `Idle`.
    ///
    /// Percent and ETA are zeroed. Does nothing when already idle. Returns
    /// whether the state changed.
    pub fn cancel(&self) -> bool {
        if self.state() == JobState::Idle {
            return false;
        }

        let killed = self.supervisor.kill();

        let mut sh = lock(&self.shared);
        sh.generation += 1;
        sh.status_tx.send_modify(|s| {
            s.state = JobState::Idle;
            s.progress.reset_progress();
        });

        info!(binary = %self.binary, killed, "job cancelled");
        true
    }

    /// Acknowledge a closed job and return to `Idle`.
    pub fn reset(&self) -> bool {
        let sh = lock(&self.shared);
        sh.status_tx.send_if_modified(|s| {
            if s.state.is_closed() {
                s.state = JobState::Idle;
                true
            } else {
                false
            }
        })
    }

    /// Receive every status change from now on.
    pub fn subscribe(&self) -> watch::Receiver<JobStatus> {
        lock(&self.shared).status_tx.subscribe()
    }

    pub fn status(&self) -> JobStatus {
        lock(&self.shared).status_tx.borrow().clone()
    }

    pub fn state(&self) -> JobState {
        lock(&self.shared).status_tx.borrow().state
    }

    pub fn progress(&self) -> ProgressSnapshot {
        lock(&self.shared).status_tx.borrow().progress.clone()
    }

    /// Output captured from the current or last run.
    pub fn lines(&self) -> Vec<String> {
        self.supervisor.lines()
    }

    /// Last `n` output lines; on failure these usually hold the encoder's own
    /// diagnostic.
    pub fn tail(&self, n: usize) -> Vec<String> {
        self.supervisor.tail(n)
    }

    pub fn pid(&self) -> Option<u32> {
        self.supervisor.pid()
    }

    /// Tear the controller down, cancelling any running job.
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for JobController {
    fn drop(&mut self) {
        self.cancel();
        self.supervisor.kill();
    }
}

/// Returns the job to `Idle` if a `start` future is dropped before its run
/// closes, unless a newer start or a cancel already took over.
struct StartGuard {
    shared: Arc<Mutex<JobShared>>,
    generation: u64,
    armed: bool,
}

impl Drop for StartGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut sh = lock(&self.shared);
        if sh.generation != self.generation {
            return;
        }
        sh.generation += 1;
        sh.status_tx.send_modify(|s| {
            s.state = JobState::Idle;
            s.progress.reset_progress();
        });
        debug!(generation = self.generation, "start dropped before the job closed");
    }
}

fn apply_line(shared: &Mutex<JobShared>, line: &str) {
    let sh = lock(shared);
    let total = sh.total_duration;
    let update = parse_line(line, total);
    if update.is_empty() {
        return;
    }

    sh.status_tx.send_if_modified(|s| {
        if s.state != JobState::Running {
            return false;
        }
        s.progress.merge(&update, total);
        true
    });
}
