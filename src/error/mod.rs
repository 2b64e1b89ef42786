//! Error types for titan-invoke.

pub mod unified;

pub use unified::{ErrorDetails, ErrorKind, RecoverySuggestion, ServiceErrorCode};

use thiserror::Error;

/// Primary error type for every invocation.
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Credentials error: {0}")]
    Credentials(String),

    /// The service rejected the request.
    #[error("Service error (status {status}): {message}")]
    Service {
        status: u16,
        message: String,
        details: ErrorDetails,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),
}

impl InvokeError {
    /// Create a service error without details.
    pub fn service(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            message: message.into(),
            details: ErrorDetails::default(),
        }
    }

    /// Create a service error with details parsed from the reply.
    pub fn service_with_details(
        status: u16,
        message: impl Into<String>,
        details: ErrorDetails,
    ) -> Self {
        Self::Service {
            status,
            message: message.into(),
            details,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) | Self::Configuration(_) | Self::Credentials(_) => {
                ErrorKind::Validation
            }
            Self::Service { .. } => ErrorKind::Client,
            Self::Network(_)
            | Self::Serialization(_)
            | Self::MalformedResponse(_)
            | Self::Timeout(_) => ErrorKind::Unclassified,
        }
    }

    /// The service error code, when the reply carried one.
    pub fn service_code(&self) -> Option<&ServiceErrorCode> {
        match self {
            Self::Service { details, .. } => details.code.as_ref(),
            _ => None,
        }
    }

    /// Whether the service signalled throttling rather than a permanent rejection.
    pub fn is_throttling(&self) -> bool {
        match self {
            Self::Service { status, details, .. } => {
                *status == 429
                    || matches!(details.code, Some(ServiceErrorCode::ThrottlingException))
            }
            _ => false,
        }
    }

    /// Whether this error is potentially retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Service {
                status, details, ..
            } => {
                self.is_throttling()
                    || (500..=599).contains(status)
                    || details.code.as_ref().is_some_and(|c| c.is_transient())
            }
            Self::Network(_) | Self::Timeout(_) => true,
            _ => false,
        }
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            Self::InvalidArgument(_) => RecoverySuggestion::FixRequest,
            Self::Configuration(_) => RecoverySuggestion::CheckConfiguration,
            Self::Credentials(_) => RecoverySuggestion::CheckCredentials,
            Self::Timeout(_) => RecoverySuggestion::IncreaseTimeout,
            Self::Network(_) => RecoverySuggestion::RetryWithBackoff,
            Self::Service { status, .. } if matches!(*status, 401 | 403) => {
                RecoverySuggestion::CheckCredentials
            }
            Self::Service { .. } if self.is_retryable() => RecoverySuggestion::RetryWithBackoff,
            Self::Service { .. } => RecoverySuggestion::FixRequest,
            Self::Serialization(_) | Self::MalformedResponse(_) => {
                RecoverySuggestion::ContactSupport
            }
        }
    }

    /// Message suitable for the top-level report: the service-provided text
    /// for service errors, the full display otherwise.
    pub fn report_message(&self) -> String {
        match self {
            Self::Service { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, InvokeError>;
