//! Error taxonomy for session setup, configuration and reads.

use thiserror::Error;

/// Errors surfaced by the library.
///
/// Buffer overflow is deliberately absent: a frame that does not fit is
/// truncated, logged and counted, never reported as a failure.
#[derive(Debug, Error)]
pub enum SimError {
    /// A thread or buffer could not be acquired while creating a session.
    #[error("Resource exhaustion: {0}")]
    ResourceExhaustion(String),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A configuration file could not be parsed.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A board literal could not be read.
    #[error("Board parse error: {0}")]
    BoardParse(String),

    /// An internal invariant was violated (e.g. deciding on a finished board).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A blocking read was cancelled before data arrived.
    #[error("Read interrupted")]
    Interrupted,
}

impl SimError {
    /// Whether the caller may simply retry the operation.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, SimError::Interrupted)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;
