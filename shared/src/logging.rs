//! Tracing setup shared across the harness

use chrono::{DateTime, Utc};

/// Initialize the stdout tracing subscriber.
///
/// `RUST_LOG` overrides the computed filter when set, so individual runs can
/// turn up reqwest/hyper noise without a rebuild.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let base_level = if verbose { "debug" } else { "info" };
    let default_filter = format!("harness={base_level},shared={base_level},reqwest=warn,hyper=warn");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}
