//! Error types for talkscore.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TalkscoreError {
    // Local input errors — recovered by the caller, never retried
    #[error("No {what} supplied for evaluation")]
    InputMissing { what: &'static str },

    #[error("Recording does not meet evaluation requirements")]
    RecordingRejected,

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Audio file error: {message}")]
    Audio { message: String },

    // External service errors
    #[error("{service} request failed: {message}")]
    Transport {
        service: &'static str,
        message: String,
    },

    // Distinct from Transport: the call succeeded but the body did not match
    // the expected schema, which usually means an API contract change.
    #[error("{service} returned an unexpected response: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    // Rubric response parsed, but one or more dimensions were not found.
    // Retryable: the caller may re-submit the content evaluation.
    #[error("Rubric response missing dimensions: {}", missing.join(", "))]
    PartialParse { missing: Vec<&'static str> },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, TalkscoreError>;
