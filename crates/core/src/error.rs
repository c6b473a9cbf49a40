//! Error types for content pack generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while post-processing generated content.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The topic was empty after trimming.
    #[error("Topic cannot be empty. Please run again and enter a valid topic.")]
    EmptyTopic,

    /// The configuration file could not be parsed.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Failed to render a slide deck.
    #[error("PPTX writing error: {0}")]
    PptxWriteError(String),

    /// Failed to parse an existing slide deck.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),
}
