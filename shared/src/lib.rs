//! Shared types for the alerting search load harness
//!
//! Contains the wire types exchanged with the Grafana backend and the rule
//! Generator, the domain error enum, and the tracing setup used by every
//! binary. Harness-internal types (scenario specs, assertion outcomes) live
//! in the harness crate.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
