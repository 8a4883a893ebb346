// src/main.rs

use transjob::{cli, logging, run};

// Single-threaded: the job controller's line handler then never races a
// cancel on another worker.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("transjob error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    run(args).await
}
