use std::fmt;
use thiserror::Error;

/// Code used for failures that happen before any response was obtained.
pub const NETWORK_FAILURE_CODE: i64 = 0;
/// Code used for local validation failures and unusable server payloads.
pub const VALIDATION_CODE: i64 = 400;
/// Code used when the poll budget runs out before a terminal status.
///
/// This is also HTTP 408, so a server that answers 408 (as a status or as a
/// body `code`) is categorised as `Timeout` too. Only the message tells the
/// two apart.
pub const POLL_TIMEOUT_CODE: i64 = 408;
/// Code used when the server reports a failed document task.
pub const TASK_FAILED_CODE: i64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Auth,
    Forbidden,
    RateLimited,
    ServerError,
    Timeout,
    NetworkFailure,
    Generic,
}

impl ErrorCategory {
    pub fn from_code(code: i64) -> Self {
        match code {
            NETWORK_FAILURE_CODE => ErrorCategory::NetworkFailure,
            401 => ErrorCategory::Auth,
            403 => ErrorCategory::Forbidden,
            POLL_TIMEOUT_CODE => ErrorCategory::Timeout,
            429 => ErrorCategory::RateLimited,
            c if c >= 500 => ErrorCategory::ServerError,
            _ => ErrorCategory::Generic,
        }
    }

    /// Human-readable label for presentation layers.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::Auth => "authentication failed",
            ErrorCategory::Forbidden => "access denied",
            ErrorCategory::RateLimited => "too many requests",
            ErrorCategory::ServerError => "server error",
            ErrorCategory::Timeout => "timed out",
            ErrorCategory::NetworkFailure => "network failure",
            ErrorCategory::Generic => "request failed",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A normalized failure from any remote call.
///
/// Fields are private so the category can only ever be derived from the code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{category} ({code}): {message}")]
pub struct ApiError {
    code: i64,
    message: String,
    category: ErrorCategory,
}

impl ApiError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            category: ErrorCategory::from_code(code),
        }
    }

    pub fn network(message: impl fmt::Display) -> Self {
        Self::new(NETWORK_FAILURE_CODE, format!("network request failed: {}", message))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(VALIDATION_CODE, message)
    }

    pub fn poll_timeout() -> Self {
        Self::new(
            POLL_TIMEOUT_CODE,
            "document translation timed out; the job may still finish on the server, query the result again later",
        )
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::network(err)
    }
}

#[derive(Error, Debug)]
pub enum TranslatorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, TranslatorError>;
