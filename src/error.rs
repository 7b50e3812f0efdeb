//! Error types for the confab scheduling parser.

use thiserror::Error;

/// Main error type for confab operations.
///
/// Resolvers themselves never fail: ambiguity and absence are expressed as
/// sentinel outcomes and flags on the parsed record. Errors here are limited
/// to configuration loading, directory loading, and misuse of the
/// clarification session.
#[derive(Error, Debug)]
pub enum ConfabError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Path expansion failed: {0}")]
    PathExpansion(String),
}

/// Attendee-directory errors.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Failed to read directory file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("Failed to parse directory JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse directory TOML: {0}")]
    ParseToml(#[from] toml::de::Error),

    #[error("Unsupported directory format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid directory entry: {0}")]
    InvalidEntry(String),
}

/// Clarification-session errors.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No pending clarification to answer")]
    NoPendingQuestion,

    #[error("Answer '{answer}' does not resolve the pending question: {question}")]
    UnrecognizedAnswer { answer: String, question: String },

    #[error("Session already resolved")]
    AlreadyResolved,
}

/// Result type alias for confab operations.
pub type Result<T> = std::result::Result<T, ConfabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfabError::Config(ConfigError::MissingField("timezone.utc_offset".to_string()));
        assert!(err.to_string().contains("timezone.utc_offset"));
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ConfabError = io_err.into();
        assert!(matches!(err, ConfabError::Io(_)));
    }

    #[test]
    fn test_session_error_display() {
        let err = ConfabError::Session(SessionError::UnrecognizedAnswer {
            answer: "maybe".to_string(),
            question: "Is 6 AM or PM?".to_string(),
        });
        let text = err.to_string();
        assert!(text.contains("maybe"));
        assert!(text.contains("AM or PM"));
    }
}
