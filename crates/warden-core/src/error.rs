use std::path::PathBuf;

/// Errors that can occur across Warden.
///
/// Each variant wraps a specific error domain. Library crates use this type
/// directly; the binary surfaces it as a `miette` report at the boundary.
///
/// # Examples
///
/// ```
/// use warden_core::WardenError;
///
/// let err = WardenError::Config("missing API key".into());
/// assert!(err.to_string().contains("missing API key"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum WardenError {
    /// Filesystem I/O failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    #[diagnostic(help("check .warden.toml and the environment variables listed by `warden doctor`"))]
    Config(String),

    /// The trigger payload is missing a field or is malformed.
    #[error("event payload error: {0}")]
    Event(String),

    /// Language model request or response failure.
    #[error("model provider error: {0}")]
    Provider(String),

    /// Issue tracker request failure.
    #[error("issue tracker error: {0}")]
    Tracker(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}
