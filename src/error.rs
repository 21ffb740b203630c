use thiserror::Error;

/// Main error type for StoryGraph
#[derive(Error, Debug)]
pub enum StoryGraphError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Edge rejected by the schema rule table
    #[error("Invalid edge: {0}")]
    InvalidEdge(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenient Result type using StoryGraphError
pub type Result<T> = std::result::Result<T, StoryGraphError>;
