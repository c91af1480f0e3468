use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a failed operation, the only part of an error
/// the presentation layer is allowed to branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCause {
    /// Network failure, timeout, or a non-2xx status without a structured body.
    Transport,
    /// A body arrived but could not be normalized as a whole.
    Contract,
    /// The service answered with an explicit error payload.
    Upstream,
}

impl ErrorCause {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCause::Transport => "transport",
            ErrorCause::Contract => "contract",
            ErrorCause::Upstream => "upstream",
        }
    }
}

impl std::fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-ready failure stored in `OperationState::Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub message: String,
    pub cause: ErrorCause,
}

impl ErrorInfo {
    pub fn new(cause: ErrorCause, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause,
        }
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.cause)
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request to {endpoint} timed out after {timeout_ms}ms")]
    Timeout { endpoint: String, timeout_ms: u64 },

    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("{endpoint} responded with HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Unexpected response from {endpoint}: {reason}")]
    Contract { endpoint: String, reason: String },
}

impl ApiError {
    pub fn cause(&self) -> ErrorCause {
        match self {
            ApiError::Timeout { .. } | ApiError::Transport { .. } | ApiError::Status { .. } => {
                ErrorCause::Transport
            }
            ApiError::Upstream { .. } => ErrorCause::Upstream,
            ApiError::Contract { .. } => ErrorCause::Contract,
        }
    }
}

impl From<ApiError> for ErrorInfo {
    fn from(err: ApiError) -> Self {
        ErrorInfo::new(err.cause(), err.to_string())
    }
}

impl From<&ApiError> for ErrorInfo {
    fn from(err: &ApiError) -> Self {
        ErrorInfo::new(err.cause(), err.to_string())
    }
}

/// A user intent refused before any state transition or I/O.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("Search query cannot be empty")]
    EmptyQuery,

    #[error("Prompt cannot be empty")]
    EmptyPrompt,

    #[error("Video reference cannot be empty")]
    EmptyVideoRef,

    #[error("No in-video search is open")]
    NoInVideoOverlay,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid base URL {value:?}: {reason}")]
    InvalidBaseUrl { value: String, reason: String },

    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_causes() {
        let timeout = ApiError::Timeout {
            endpoint: "/api/search".to_string(),
            timeout_ms: 30_000,
        };
        let status = ApiError::Status {
            endpoint: "/api/search".to_string(),
            status: 502,
        };
        let upstream = ApiError::Upstream {
            status: 400,
            message: "Query cannot be empty".to_string(),
        };
        let contract = ApiError::Contract {
            endpoint: "/api/summarize".to_string(),
            reason: "missing summary".to_string(),
        };

        assert_eq!(timeout.cause(), ErrorCause::Transport);
        assert_eq!(status.cause(), ErrorCause::Transport);
        assert_eq!(upstream.cause(), ErrorCause::Upstream);
        assert_eq!(contract.cause(), ErrorCause::Contract);
    }

    #[test]
    fn test_upstream_message_is_verbatim() {
        let info = ErrorInfo::from(ApiError::Upstream {
            status: 500,
            message: "Search failed: quota exceeded".to_string(),
        });
        assert_eq!(info.message, "Search failed: quota exceeded");
        assert_eq!(info.cause, ErrorCause::Upstream);
    }

    #[test]
    fn test_cause_serializes_lowercase() {
        let json = serde_json::to_string(&ErrorCause::Transport).unwrap();
        assert_eq!(json, "\"transport\"");
    }
}
