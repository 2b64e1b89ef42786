//! Unified error classification and recovery.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Exception name reported by the inference service in `x-amzn-ErrorType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum ServiceErrorCode {
    AccessDeniedException,
    ValidationException,
    ResourceNotFoundException,
    ThrottlingException,
    ServiceQuotaExceededException,
    ModelNotReadyException,
    ModelTimeoutException,
    ModelErrorException,
    ServiceUnavailableException,
    InternalServerException,
    #[strum(default)]
    Unknown(String),
}

impl ServiceErrorCode {
    /// Parse the raw header value, e.g.
    /// `ValidationException:http://internal.amazon.com/coral/com.amazon.bedrock/`.
    pub fn from_header(raw: &str) -> Option<Self> {
        let name = raw.split(':').next()?.trim();
        if name.is_empty() {
            return None;
        }
        // `strum(default)` makes parsing infallible.
        name.parse().ok()
    }

    /// Errors the service expects callers to retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ThrottlingException
                | Self::ModelNotReadyException
                | Self::ModelTimeoutException
                | Self::ServiceUnavailableException
                | Self::InternalServerException
        )
    }
}

/// Coarse classification surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    /// Rejected locally before any network call.
    Validation,
    /// The remote service replied with an error.
    #[strum(serialize = "ClientError")]
    Client,
    /// Anything else: transport, timeout, malformed reply.
    Unclassified,
}

/// Structured details returned alongside a service error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: Option<ServiceErrorCode>,
    pub request_id: Option<String>,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    CheckCredentials,
    CheckConfiguration,
    FixRequest,
    IncreaseTimeout,
    ContactSupport,
}
