//! Run Configuration
//!
//! Everything the harness reads from the environment, resolved exactly once
//! at process start into plain structs. No env lookups happen after setup.

mod grafana;
mod suite;

pub use grafana::{GrafanaConfig, env_or_default};
pub use suite::{LoadSuiteConfig, QUERY_DATASOURCE, SearchSuiteConfig, WRITE_DATASOURCE};
