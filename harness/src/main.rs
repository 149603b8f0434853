//! Load harness runner
//!
//! Resolves configuration from the environment, runs the selected suite
//! (provision → staged scenarios → teardown), and exits non-zero when any
//! iteration's assertions failed.

use clap::Parser;
use std::time::Duration;

use harness::TestSuites;

#[derive(Parser)]
#[command(name = "harness")]
#[command(about = "Load harness for the Grafana alerting rule search API")]
struct Args {
    /// Test suite to run
    #[arg(long, default_value = "search")]
    suite: String,

    /// Setup phase ceiling in seconds
    #[arg(long, default_value = "600")]
    setup_timeout_secs: u64,

    /// Teardown phase ceiling in seconds
    #[arg(long, default_value = "600")]
    teardown_timeout_secs: u64,

    /// List available suites and exit
    #[arg(long)]
    list: bool,

    /// Enable verbose tracing output
    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    shared::logging::init_tracing(args.verbose);

    if args.list {
        println!("Available suites: {}", TestSuites::available_suites().join(", "));
        return Ok(());
    }

    tracing::info!("🧪 Starting alerting search load harness");
    tracing::info!(
        "Suite: {}, setup timeout: {}s, teardown timeout: {}s",
        args.suite,
        args.setup_timeout_secs,
        args.teardown_timeout_secs
    );

    let summaries = TestSuites::run_suite(
        &args.suite,
        Duration::from_secs(args.setup_timeout_secs),
        Duration::from_secs(args.teardown_timeout_secs),
    )
    .await?;

    let mut failed = 0;
    for summary in &summaries {
        tracing::info!(
            "📊 {}: {} iterations ({} passed, {} failed, {} dropped arrivals)",
            summary.name,
            summary.iterations,
            summary.passed,
            summary.failed,
            summary.dropped
        );
        if let Some(first) = &summary.first_failure {
            tracing::warn!("   first failure: {first}");
        }
        failed += summary.failed;
    }

    if failed > 0 {
        tracing::error!("❌ Suite '{}' finished with {} failed iterations", args.suite, failed);
        return Err(format!("{failed} iterations failed").into());
    }

    tracing::info!("✅ Suite '{}' completed successfully", args.suite);
    Ok(())
}
