//! Shared error types for the load harness

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Unknown rule filter: {name}")]
    UnknownFilter { name: String },

    #[error("Duplicate rule filter: {name}")]
    DuplicateFilter { name: String },

    #[error("Invalid configuration: {field} = {value}: {reason}")]
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },

    #[error("Unexpected response from {url}: {message}")]
    ResponseShape { url: String, message: String },

    #[error("Rule generation failed: {message}")]
    Generator { message: String },
}

pub type HarnessResult<T> = Result<T, HarnessError>;
