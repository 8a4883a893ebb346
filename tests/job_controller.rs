#![cfg(unix)]

use std::sync::Arc;
use std::time::Duration;

use transjob::exec::ProcessOutcome;
use transjob::job::{JobController, JobState};
use transjob_test_utils::{SHELL, init_tracing, script, wait_until, with_timeout};

const STATUS_LINE: &str = "frame=   42 fps= 25 q=28.0 size=     256KiB time=00:00:01.40 bitrate=1498.2kbits/s speed=1.35x";

#[tokio::test]
async fn clean_exit_closes_with_success() {
    init_tracing();
    let controller = JobController::new(SHELL);

    let state = with_timeout(controller.start(&script("exit 0"), 0.0)).await;

    assert_eq!(state, JobState::ClosedSuccess);
    assert_eq!(controller.state(), JobState::ClosedSuccess);
    assert_eq!(controller.status().outcome, Some(ProcessOutcome::Exited { code: 0 }));

    assert!(controller.reset());
    assert_eq!(controller.state(), JobState::Idle);
}

#[tokio::test]
async fn non_zero_exit_closes_with_error_and_keeps_output() {
    init_tracing();
    let controller = JobController::new(SHELL);

    let state = with_timeout(
        controller.start(&script("echo 'Invalid argument' 1>&2; exit 3"), 10.0),
    )
    .await;

    assert_eq!(state, JobState::ClosedError);
    assert_eq!(controller.status().outcome, Some(ProcessOutcome::Exited { code: 3 }));
    assert_eq!(controller.tail(5), vec!["Invalid argument"]);
}

#[tokio::test]
async fn status_lines_become_progress() {
    init_tracing();
    let controller = JobController::new(SHELL);
    let mut rx = controller.subscribe();

    let body = format!("echo '{STATUS_LINE}'");
    let state = with_timeout(controller.start(&script(&body), 10.0)).await;

    assert_eq!(state, JobState::ClosedSuccess);
    assert!(rx.has_changed().unwrap());
    let progress = rx.borrow_and_update().progress.clone();

    assert_eq!(progress.position, Some(1.4));
    assert_eq!(progress.speed, Some(1.35));
    assert_eq!(progress.frame, Some(42));
    assert_eq!(progress.size.as_deref(), Some("256KiB"));
    let percent = progress.percent.unwrap();
    assert!((percent - 14.0).abs() < 1e-9, "percent {percent}");
    let eta = progress.eta.unwrap();
    assert!((eta - 8.6 / 1.35).abs() < 1e-9, "eta {eta}");
}

#[tokio::test]
async fn progress_is_cumulative_across_lines() {
    init_tracing();
    let controller = JobController::new(SHELL);

    let body = "echo 'frame=1 time=00:00:02.00 speed=2.00x'; echo 'frame=2 time=00:00:04.00'";
    let state = with_timeout(controller.start(&script(body), 8.0)).await;

    assert_eq!(state, JobState::ClosedSuccess);
    let progress = controller.progress();
    assert_eq!(progress.position, Some(4.0));
    assert_eq!(progress.speed, Some(2.0));
    assert_eq!(progress.frame, Some(2));
    assert_eq!(progress.percent, Some(50.0));
    // Recomputed with the last known speed.
    assert_eq!(progress.eta, Some(2.0));
}

#[tokio::test]
async fn cancel_while_running_returns_to_idle() {
    init_tracing();
    let controller = Arc::new(JobController::new(SHELL));

    let run = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move {
            let args = script("echo 'time=00:00:01.00 speed=1.0x'; exec sleep 5");
            controller.start(&args, 10.0).await
        })
    };
    wait_until(|| controller.progress().position.is_some()).await;
    assert_eq!(controller.state(), JobState::Running);

    assert!(controller.cancel());

    assert_eq!(controller.state(), JobState::Idle);
    let progress = controller.progress();
    assert_eq!(progress.percent, Some(0.0));
    assert_eq!(progress.eta, Some(0.0));
    assert_eq!(with_timeout(run).await.unwrap(), JobState::Idle);
    assert_eq!(controller.pid(), None);

    // A second cancel has nothing to do.
    assert!(!controller.cancel());
}

#[tokio::test]
async fn restart_from_closed_state() {
    init_tracing();
    let controller = JobController::new(SHELL);

    assert_eq!(
        with_timeout(controller.start(&script("exit 1"), 0.0)).await,
        JobState::ClosedError
    );
    assert_eq!(
        with_timeout(controller.start(&script("echo again"), 0.0)).await,
        JobState::ClosedSuccess
    );
    assert_eq!(controller.lines(), vec!["again"]);
}

#[tokio::test]
async fn dropping_the_controller_stops_the_process() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let ticks = dir.path().join("ticks");
    let body = format!(
        "while true; do echo tick >> '{}'; sleep 0.05; done",
        ticks.display()
    );

    let run = tokio::spawn(async move {
        let controller = JobController::new(SHELL);
        controller.start(&script(&body), 0.0).await
    });

    wait_until(|| std::fs::metadata(&ticks).map(|m| m.len() > 0).unwrap_or(false)).await;

    run.abort();
    assert!(run.await.unwrap_err().is_cancelled());

    tokio::time::sleep(Duration::from_millis(200)).await;
    let settled = std::fs::read_to_string(&ticks).unwrap().len();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(std::fs::read_to_string(&ticks).unwrap().len(), settled);
}

#[tokio::test]
async fn dropping_the_start_future_returns_to_idle() {
    init_tracing();
    let controller = JobController::new(SHELL);
    let mut rx = controller.subscribe();

    let res = tokio::time::timeout(
        Duration::from_millis(200),
        controller.start(&script("echo 'time=00:00:01.00'; exec sleep 5"), 10.0),
    )
    .await;

    assert!(res.is_err());
    assert_eq!(controller.state(), JobState::Idle);
    assert_eq!(controller.pid(), None);
    let status = rx.borrow_and_update().clone();
    assert_eq!(status.state, JobState::Idle);
    assert_eq!(status.progress.percent, Some(0.0));
    assert_eq!(status.progress.eta, Some(0.0));

    // The controller is usable again afterwards.
    assert_eq!(
        with_timeout(controller.start(&script("exit 0"), 0.0)).await,
        JobState::ClosedSuccess
    );
}

#[tokio::test]
async fn second_start_supersedes_the_running_job() {
    init_tracing();
    let controller = Arc::new(JobController::new(SHELL));

    let first = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move {
            let args = script("echo 'frame=99 time=00:00:05.00 speed=1.0x'; exec sleep 5");
            controller.start(&args, 10.0).await
        })
    };
    wait_until(|| controller.progress().frame == Some(99)).await;

    let second = with_timeout(
        controller.start(&script("echo 'frame=7 time=00:00:01.00 speed=2.0x'"), 10.0),
    )
    .await;

    assert_eq!(second, JobState::ClosedSuccess);
    assert_eq!(with_timeout(first).await.unwrap(), JobState::Idle);

    // Only the second run's output is visible.
    assert_eq!(controller.state(), JobState::ClosedSuccess);
    assert_eq!(controller.lines(), vec!["frame=7 time=00:00:01.00 speed=2.0x"]);
    let progress = controller.progress();
    assert_eq!(progress.frame, Some(7));
    assert_eq!(progress.position, Some(1.0));
    assert_eq!(progress.speed, Some(2.0));
    assert_eq!(controller.status().outcome, Some(ProcessOutcome::Exited { code: 0 }));
}
