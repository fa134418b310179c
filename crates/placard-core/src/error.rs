//! Error types for placard

use thiserror::Error;

/// The main error type for placard operations
#[derive(Debug, Error)]
pub enum PlacardError {
    #[error("Element not found at index {0}")]
    ElementNotFound(usize),

    #[error("Invalid canvas size: {0} (expected WIDTHxHEIGHT)")]
    InvalidCanvasSize(String),

    #[error("Invalid color: {0} (expected #RRGGBB)")]
    InvalidColor(String),

    #[error("Scene error: {0}")]
    SceneError(String),

    #[error("Command rejected: {0}")]
    CommandRejected(String),

    #[error("Profile load error: {0}")]
    ProfileLoadError(String),

    #[error("Rule '{rule}' failed: {message}")]
    RuleFailed { rule: String, message: String },

    #[error("Fix coverage incomplete: no fix entry for {0:?}")]
    FixCoverageIncomplete(Vec<String>),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(String),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for placard operations
pub type Result<T> = std::result::Result<T, PlacardError>;

impl From<toml::de::Error> for PlacardError {
    fn from(err: toml::de::Error) -> Self {
        PlacardError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for PlacardError {
    fn from(err: toml::ser::Error) -> Self {
        PlacardError::TomlSerError(err.to_string())
    }
}

impl From<serde_json::Error> for PlacardError {
    fn from(err: serde_json::Error) -> Self {
        PlacardError::JsonError(err.to_string())
    }
}
