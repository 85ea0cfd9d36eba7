//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// Dataset root missing or not a directory
    NotADirectory(String),
    /// Configuration error
    ConfigError(String),
    /// Some videos failed validation
    ValidationFailed(usize),
    /// Result files could not be written
    OutputError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotADirectory(path) => write!(f, "Not a directory: {path}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::ValidationFailed(count) => {
                write!(f, "Validation failed for {count} video(s)")
            }
            CliError::OutputError(msg) => write!(f, "Output error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

/// Fail unless `path` is an existing directory
pub fn require_dir(path: &std::path::Path) -> CliResult<()> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(CliError::NotADirectory(path.display().to_string()).into())
    }
}
