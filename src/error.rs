use thiserror::Error;

/// Main error type for MoocGen
#[derive(Error, Debug)]
pub enum MoocgenError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required relation input file is absent
    #[error("Required input file missing: {0}")]
    MissingInput(String),

    /// Course id not present in the loaded metadata table
    #[error("Course not found: {0}")]
    CourseNotFound(String),
}

/// Convenient Result type using MoocgenError
pub type Result<T> = std::result::Result<T, MoocgenError>;
