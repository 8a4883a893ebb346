// src/exec/supervisor.rs

//! Supervision of a single encoder process.
//!
//! A [`Supervisor`] owns at most one live child at a time. Spawning while a
//! process is running kills the old one first; the new spawn always wins.
//! Both output streams are read by background tasks and funnelled through one
//! channel into the awaiting `spawn` future, which is the only place that
//! appends to the line buffer and calls the line handler. That makes the close
//! transition the last event of a run.

use std::ffi::OsStr;
use std::fmt;
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::lines::spawn_reader;

/// How long to keep reading buffered output after the process has exited.
const DRAIN_TIMEOUT: Duration = Duration::from_millis(500);

/// Callback invoked for every output line, on the task awaiting `spawn`.
pub type LineHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// How a supervised run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The process exited on its own with this code.
    Exited { code: i32 },
    /// The process was terminated by a signal it did not handle.
    Terminated,
    /// The run was stopped by [`Supervisor::kill`] or a newer spawn.
    Killed,
    /// The binary could not be started.
    SpawnFailed { reason: String },
}

impl ProcessOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessOutcome::Exited { code: 0 })
    }

    /// True for outcomes that should be reported as a failed job.
    pub fn is_error(&self) -> bool {
        !self.is_success() && *self != ProcessOutcome::Killed
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ProcessOutcome::Exited { code } => Some(*code),
            _ => None,
        }
    }

    fn from_status(status: ExitStatus) -> Self {
        match status.code() {
            Some(code) => ProcessOutcome::Exited { code },
            None => ProcessOutcome::Terminated,
        }
    }
}

impl fmt::Display for ProcessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessOutcome::Exited { code } => write!(f, "exited with code {code}"),
            ProcessOutcome::Terminated => write!(f, "terminated by signal"),
            ProcessOutcome::Killed => write!(f, "killed"),
            ProcessOutcome::SpawnFailed { reason } => write!(f, "failed to start: {reason}"),
        }
    }
}

/// The live child: its pid and the channel used to stop it.
///
/// Stored as one value so the process reference and the I/O attachment
/// (`run_id`, which gates delivery of lines) are always set and cleared
/// together.
#[derive(Debug)]
struct ProcessHandle {
    run_id: u64,
    pid: Option<u32>,
    kill_tx: oneshot::Sender<()>,
}

#[derive(Debug, Default)]
struct SupervisorState {
    handle: Option<ProcessHandle>,
    lines: Vec<String>,
    last_outcome: Option<ProcessOutcome>,
    /// Bumped by every spawn and every kill; a spawn whose id is no longer
    /// current has been superseded.
    generation: u64,
    /// Id of the most recent spawn.
    latest_run: u64,
}

fn lock(state: &Mutex<SupervisorState>) -> MutexGuard<'_, SupervisorState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Supervisor {
    state: Arc<Mutex<SupervisorState>>,
    on_line: Option<LineHandler>,
}

impl fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let st = lock(&self.state);
        f.debug_struct("Supervisor")
            .field("running", &st.handle.is_some())
            .field("lines", &st.lines.len())
            .field("last_outcome", &st.last_outcome)
            .finish_non_exhaustive()
    }
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SupervisorState::default())),
            on_line: None,
        }
    }

    /// Create a supervisor that calls `handler` for every output line.
    ///
    /// The handler runs synchronously on the task awaiting `spawn`; it must
    /// not block and must not call back into this supervisor.
    pub fn with_line_handler<F>(handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self {
            state: Arc::new(Mutex::new(SupervisorState::default())),
            on_line: Some(Arc::new(handler)),
        }
    }

    /// Run `binary` with `args` and resolve when the run closes.
    ///
    /// Any process already supervised is killed first. Failures to start are
    /// reported as [`ProcessOutcome::SpawnFailed`], never as a panic or error.
    pub async fn spawn<I, S>(&self, binary: &str, args: I) -> ProcessOutcome
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.kill();

        let run_id = {
            let mut st = lock(&self.state);
            st.lines.clear();
            st.last_outcome = None;
            st.generation += 1;
            st.latest_run = st.generation;
            st.generation
        };

        let mut cmd = Command::new(binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                warn!(binary, run_id, error = %e, "failed to start process");
                let outcome = ProcessOutcome::SpawnFailed {
                    reason: e.to_string(),
                };
                self.record_outcome(run_id, &outcome);
                return outcome;
            }
        };

        let pid = child.id();
        let (kill_tx, mut kill_rx) = oneshot::channel::<()>();
        let attached = {
            let mut st = lock(&self.state);
            // A kill or a newer spawn may have landed while we were starting.
            let current = st.generation == run_id;
            if current {
                st.handle = Some(ProcessHandle {
                    run_id,
                    pid,
                    kill_tx,
                });
            }
            current
        };

        if !attached {
            debug!(binary, run_id, "run superseded before it was attached");
            if let Err(e) = child.kill().await {
                warn!(run_id, error = %e, "failed to kill superseded process");
            }
            self.record_outcome(run_id, &ProcessOutcome::Killed);
            return ProcessOutcome::Killed;
        }

        info!(binary, run_id, pid, "process started");

        let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            readers.push(spawn_reader(stdout, line_tx.clone(), "stdout"));
        }
        if let Some(stderr) = child.stderr.take() {
            readers.push(spawn_reader(stderr, line_tx.clone(), "stderr"));
        }
        drop(line_tx);

        // Clears the handle and stops the readers however this future ends,
        // including when the caller drops it.
        let _guard = RunGuard {
            state: Arc::clone(&self.state),
            run_id,
            readers,
        };

        let mut streams_open = true;
        let outcome = loop {
            tokio::select! {
                biased;

                _ = &mut kill_rx => {
                    info!(run_id, pid, "stopping supervised process");
                    if let Err(e) = child.kill().await {
                        warn!(run_id, pid, error = %e, "failed to kill process");
                    }
                    break ProcessOutcome::Killed;
                }

                line = line_rx.recv(), if streams_open => match line {
                    Some(line) => self.deliver(run_id, line),
                    None => streams_open = false,
                },

                status = child.wait() => {
                    let outcome = match status {
                        Ok(status) => ProcessOutcome::from_status(status),
                        Err(e) => {
                            warn!(run_id, pid, error = %e, "failed to wait for process");
                            ProcessOutcome::Terminated
                        }
                    };
                    self.drain(run_id, &mut line_rx).await;
                    break outcome;
                }
            }
        };

        info!(
            binary,
            run_id,
            pid,
            exit_code = outcome.exit_code(),
            success = outcome.is_success(),
            "process closed"
        );

        self.record_outcome(run_id, &outcome);
        outcome
    }

    /// Stop the supervised process, if any.
    ///
    /// Idempotent. Detaches the current run immediately: no line produced
    /// after this call reaches the buffer or the handler. Returns whether a
    /// process was attached.
    pub fn kill(&self) -> bool {
        let handle = {
            let mut st = lock(&self.state);
            st.generation += 1;
            st.handle.take()
        };

        match handle {
            Some(handle) => {
                debug!(run_id = handle.run_id, pid = handle.pid, "kill requested");
                // The run may have closed on its own in the meantime.
                let _ = handle.kill_tx.send(());
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        lock(&self.state).handle.is_some()
    }

    pub fn pid(&self) -> Option<u32> {
        lock(&self.state).handle.as_ref().and_then(|h| h.pid)
    }

    /// Snapshot of the line buffer.
    pub fn lines(&self) -> Vec<String> {
        lock(&self.state).lines.clone()
    }

    /// The last `n` lines, oldest first.
    pub fn tail(&self, n: usize) -> Vec<String> {
        let st = lock(&self.state);
        let start = st.lines.len().saturating_sub(n);
        st.lines[start..].to_vec()
    }

    pub fn clear_lines(&self) {
        lock(&self.state).lines.clear();
    }

    /// Outcome of the most recent run, once it has closed.
    pub fn last_outcome(&self) -> Option<ProcessOutcome> {
        lock(&self.state).last_outcome.clone()
    }

    fn deliver(&self, run_id: u64, line: String) {
        {
            let mut st = lock(&self.state);
            if st.handle.as_ref().map(|h| h.run_id) != Some(run_id) {
                trace!(run_id, "dropping line from detached run");
                return;
            }
            st.lines.push(line.clone());
        }

        trace!(run_id, line = %line, "process output");
        if let Some(handler) = &self.on_line {
            handler(&line);
        }
    }

    async fn drain(&self, run_id: u64, line_rx: &mut mpsc::UnboundedReceiver<String>) {
        let drained = tokio::time::timeout(DRAIN_TIMEOUT, async {
            while let Some(line) = line_rx.recv().await {
                self.deliver(run_id, line);
            }
        })
        .await;

        if drained.is_err() {
            debug!(run_id, "output streams still open after exit; not waiting further");
        }
    }

    fn record_outcome(&self, run_id: u64, outcome: &ProcessOutcome) {
        let mut st = lock(&self.state);
        if st.latest_run == run_id {
            st.last_outcome = Some(outcome.clone());
        }
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.kill();
    }
}

struct RunGuard {
    state: Arc<Mutex<SupervisorState>>,
    run_id: u64,
    readers: Vec<JoinHandle<()>>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        for reader in &self.readers {
            reader.abort();
        }

        let mut st = lock(&self.state);
        if st.handle.as_ref().map(|h| h.run_id) == Some(self.run_id) {
            st.handle = None;
        }
    }
}
