// src/lib.rs

pub mod args;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod job;
pub mod logging;
pub mod media;
pub mod telemetry;
pub mod types;

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::args::ArgumentSet;
use crate::cli::CliArgs;
use crate::config::{
    JobFile, RawJobFile, default_config_path, load_or_default, resolve_config_path,
};
use crate::job::{JobController, JobState, JobStatus};
use crate::media::probe_duration;
use crate::telemetry::format_seconds;

/// Lines of encoder output shown when a job fails.
const FAILURE_TAIL_LINES: usize = 20;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - job file loading and CLI overrides
/// - duration probing
/// - the job controller and a progress renderer
/// - Ctrl-C handling
///
/// Returns `Err` unless the job closes successfully.
pub async fn run(args: CliArgs) -> Result<()> {
    let job = resolve_job(&args)?;

    let probed = if job.job.duration.is_none() {
        probe_or_warn(&job).await
    } else {
        None
    };
    let input_duration = job.input_duration(probed);
    let argument_set = job.argument_set(input_duration);

    if args.dry_run {
        print_dry_run(&job, &argument_set, input_duration);
        return Ok(());
    }

    let total = input_duration
        .map(|d| job.output_duration(d))
        .unwrap_or(0.0);

    let controller = JobController::new(job.encoder.binary.clone());
    let renderer = tokio::spawn(render_progress(controller.subscribe()));

    let state = tokio::select! {
        state = controller.start(&argument_set, total) => state,
        res = tokio::signal::ctrl_c() => {
            if let Err(e) = res {
                warn!(error = %e, "failed to listen for Ctrl+C");
            }
            controller.cancel();
            JobState::Idle
        }
    };

    renderer.abort();
    eprintln!();

    match state {
        JobState::ClosedSuccess => {
            info!(output = %job.output, "job finished");
            Ok(())
        }
        JobState::ClosedError => {
            for line in controller.tail(FAILURE_TAIL_LINES) {
                eprintln!("  {line}");
            }
            let outcome = controller
                .status()
                .outcome
                .map(|o| o.to_string())
                .unwrap_or_else(|| "unknown outcome".to_string());
            bail!("{} failed: {outcome}", controller.binary())
        }
        JobState::Idle | JobState::Running => bail!("job cancelled"),
    }
}

/// Load the job file (explicit path, else the default file if present) and
/// layer the command-line overrides on top before validating.
fn resolve_job(args: &CliArgs) -> Result<JobFile> {
    let (mut raw, path) = load_or_default(args.config.as_deref()).with_context(|| {
        let path = resolve_config_path(args.config.as_deref()).unwrap_or_else(default_config_path);
        format!("loading job file {}", path.display())
    })?;
    if let Some(path) = &path {
        info!(path = %path.display(), "using job file");
    }

    apply_overrides(&mut raw, args);

    JobFile::try_from(raw).context("invalid job")
}

fn apply_overrides(raw: &mut RawJobFile, args: &CliArgs) {
    if let Some(input) = &args.input {
        raw.job.input = Some(input.clone());
    }
    if let Some(output) = &args.output {
        raw.job.output = Some(output.clone());
    }
    if let Some(binary) = &args.binary {
        raw.encoder.binary = binary.clone();
    }
    if let Some(duration) = args.duration {
        raw.job.duration = Some(duration);
    }
    if let Some(extra) = &args.args {
        raw.job.args = Some(extra.clone());
    }
    if let Some(filters) = &args.filters {
        raw.job.filters = Some(filters.clone());
    }
    raw.job.disabled.extend(args.disabled.iter().cloned());
}

/// Probe the input duration; a failure only costs percent and ETA.
async fn probe_or_warn(job: &JobFile) -> Option<f64> {
    match probe_duration(&job.encoder.probe, Path::new(&job.input)).await {
        Ok(duration) => {
            debug!(input = %job.input, duration, "probed input duration");
            Some(duration)
        }
        Err(e) => {
            warn!(input = %job.input, error = %e, "could not probe duration; progress will lack percent and ETA");
            None
        }
    }
}

/// Redraw a single status line on stderr for every published change.
async fn render_progress(mut rx: watch::Receiver<JobStatus>) {
    while rx.changed().await.is_ok() {
        let status = rx.borrow_and_update().clone();
        if status.state != JobState::Running {
            continue;
        }
        let p = &status.progress;

        let mut line = String::new();
        if let Some(percent) = p.percent {
            line.push_str(&format!("{percent:5.1}%  "));
        }
        if let Some(position) = p.position {
            line.push_str(&format!("time {}  ", format_seconds(position)));
        }
        if let Some(speed) = p.speed {
            line.push_str(&format!("speed {speed:.2}x  "));
        }
        if let Some(eta) = p.eta {
            line.push_str(&format!("eta {}", format_seconds(eta)));
        }

        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\r{:<72}", line.trim_end());
        let _ = stderr.flush();
    }
}

/// Print the resolved command line without running it.
fn print_dry_run(job: &JobFile, args: &ArgumentSet, input_duration: Option<f64>) {
    println!("transjob dry-run");
    match input_duration {
        Some(d) => println!("  duration: {} ({d}s)", format_seconds(d)),
        None => println!("  duration: unknown"),
    }
    let disabled: Vec<&str> = args.disabled().collect();
    if !disabled.is_empty() {
        println!("  disabled: {}", disabled.join(", "));
    }
    println!("{} {}", job.encoder.binary, args.serialize());

    debug!("dry-run complete (no execution)");
}
