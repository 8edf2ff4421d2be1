use serde::Serialize;
use thiserror::Error;

/// Unified error type for the scopediff application surface.
///
/// The compare core absorbs its recoverable conditions into the result
/// content; this enum covers the paths that do surface to callers — file
/// access, merge resolution, and output serialization.
#[derive(Error, Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum AppError {
    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Merge error: {message}")]
    Merge { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },
}

impl AppError {
    /// Create an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a Merge error
    pub fn merge(message: impl Into<String>) -> Self {
        Self::Merge {
            message: message.into(),
        }
    }

    /// Create a Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a Not Found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Check if this error is recoverable (user can retry or take action)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // IO issues may be transient; merge resolution can be retried
            Self::Io { .. } | Self::Merge { .. } => true,
            // Resource genuinely doesn't exist; parse errors won't change on retry
            Self::NotFound { .. } | Self::Parse { .. } => false,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::io(err.to_string())
    }
}

impl From<crate::merge::MergeError> for AppError {
    fn from(err: crate::merge::MergeError) -> Self {
        use crate::merge::MergeError;
        match err {
            MergeError::Io(e) => AppError::io(e.to_string()),
            other => AppError::merge(other.to_string()),
        }
    }
}

impl From<AppError> for String {
    fn from(err: AppError) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = AppError::merge("model unavailable");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"type\":\"Merge\""));
        assert!(json.contains("\"message\":\"model unavailable\""));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(AppError::io("disk hiccup").is_recoverable());
        assert!(AppError::merge("timeout").is_recoverable());
        assert!(!AppError::not_found("old.py").is_recoverable());
        assert!(!AppError::parse("bad json").is_recoverable());
    }

    #[test]
    fn test_merge_error_conversion() {
        let err: AppError = crate::merge::MergeError::EmptyResponse.into();
        match err {
            AppError::Merge { message } => assert!(message.contains("Empty response")),
            _ => panic!("Wrong variant"),
        }
    }
}
