pub mod builders;
pub mod fakes;

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt};

use transjob::args::ArgumentSet;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Binary used to run shell scripts as stand-in encoders.
pub const SHELL: &str = "sh";

/// Arguments that make [`SHELL`] run `script` (`sh -c <script>`).
pub fn script(script: &str) -> ArgumentSet {
    let mut args = ArgumentSet::flags();
    args.set("c", script);
    args
}

/// Poll `cond` every 10ms until it holds, panicking after 5 seconds.
pub async fn wait_until<F>(mut cond: F)
where
    F: FnMut() -> bool,
{
    with_timeout(async {
        while !cond() {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    })
    .await
}
