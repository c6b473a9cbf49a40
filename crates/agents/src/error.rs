//! Error types for the agent pipeline.

use thiserror::Error;

/// Result type alias using AgentError.
pub type Result<T> = std::result::Result<T, AgentError>;

/// Errors raised while running the agent pipeline.
#[derive(Error, Debug)]
pub enum AgentError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The remote service answered with a non-success status.
    #[error("{service} returned HTTP {status}: {body}")]
    ApiError {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// A required credential is not configured.
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    /// The response did not have the expected shape.
    #[error("Malformed response from {service}: {message}")]
    MalformedResponse {
        service: &'static str,
        message: String,
    },

    /// Failed to write a stage artifact.
    #[error("Failed to write output: {0}")]
    IoError(#[from] std::io::Error),
}
