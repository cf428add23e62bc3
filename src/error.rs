//! Error types for code2block.

use std::time::Duration;

use thiserror::Error;

use crate::models::Language;

/// Errors related to minification.
#[derive(Debug, Error)]
pub enum MinifyError {
    #[error("minification is not supported for {0}")]
    Unsupported(Language),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("minifier not found: {0}")]
    NotFound(String),

    #[error("minifier process failed: {0}")]
    Process(String),

    #[error("minifier IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("minifier returned empty output")]
    EmptyOutput,

    #[error("minifier timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// Errors raised while turning input into blocks.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("Please enter some code.")]
    EmptyInput,
}

/// Errors related to reading input text.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input exceeds maximum size: {size} > {max}")]
    TooLarge { size: u64, max: u64 },

    #[error("input is not valid UTF-8")]
    NotUtf8,
}

/// Errors related to configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    #[error("path error: {0}")]
    PathError(String),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Application-level errors that wrap domain errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("minify error: {0}")]
    Minify(#[from] MinifyError),

    #[error("{0}")]
    Process(#[from] ProcessError),

    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_message() {
        let err = AppError::from(ProcessError::EmptyInput);
        assert_eq!(err.to_string(), "Please enter some code.");
    }

    #[test]
    fn test_unsupported_names_language() {
        let err = MinifyError::Unsupported(Language::Python);
        assert_eq!(err.to_string(), "minification is not supported for Python");
    }

    #[test]
    fn test_timeout_message_keeps_subsecond_limits() {
        let err = MinifyError::Timeout(Duration::from_millis(20));
        assert_eq!(err.to_string(), "minifier timed out after 20ms");
    }

    #[test]
    fn test_too_large_message() {
        let err = InputError::TooLarge { size: 10, max: 4 };
        assert_eq!(err.to_string(), "input exceeds maximum size: 10 > 4");
    }
}
