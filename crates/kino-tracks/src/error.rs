//! Error types for Kino Tracks

use thiserror::Error;

/// Result type alias for track operations
pub type Result<T> = std::result::Result<T, Error>;

/// Track selection error types
#[derive(Error, Debug)]
pub enum Error {
    // Registration errors
    #[error("Track has no stream id")]
    MissingStreamId,

    // Policy errors
    #[error("Unsupported switch mode: {0}")]
    UnsupportedSwitchMode(String),

    #[error("Unsupported initial track selection mode: {0}")]
    UnsupportedSelectionMode(String),

    #[error("Unknown media type: {0}")]
    UnknownMediaType(String),

    // Storage errors
    #[error("Settings storage failed: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }

    /// Returns true if the error came from a caller-supplied value
    /// rather than from a collaborator
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::MissingStreamId
                | Error::UnsupportedSwitchMode(_)
                | Error::UnsupportedSelectionMode(_)
                | Error::UnknownMediaType(_)
        )
    }

    /// Returns the error code for diagnostics
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::MissingStreamId => "MISSING_STREAM_ID",
            Error::UnsupportedSwitchMode(_) => "SWITCH_MODE_UNSUPPORTED",
            Error::UnsupportedSelectionMode(_) => "SELECTION_MODE_UNSUPPORTED",
            Error::UnknownMediaType(_) => "UNKNOWN_MEDIA_TYPE",
            Error::Storage(_) => "STORAGE",
            Error::Serialization(_) => "SERIALIZATION",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}
