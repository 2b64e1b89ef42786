//! Shared HTTP client, headers, and error-reply parsing.

use std::sync::OnceLock;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};

use crate::error::{ErrorDetails, InvokeError, ServiceErrorCode};

pub const REQUEST_ID_HEADER: &str = "x-amzn-requestid";
pub const ERROR_TYPE_HEADER: &str = "x-amzn-errortype";

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client.
///
/// Per-call deadlines are applied by the caller; the client-level timeout is
/// only a backstop.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(300))
            .pool_max_idle_per_host(10)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new())
    })
}

/// JSON request/response headers. Authorization is added by the signer.
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

pub fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Turn an error reply into a service error carrying the service's message.
pub fn status_to_error(status: u16, headers: &HeaderMap, body: &str) -> InvokeError {
    let code = headers
        .get(ERROR_TYPE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(ServiceErrorCode::from_header);
    let details = ErrorDetails {
        code,
        request_id: request_id(headers),
    };
    InvokeError::service_with_details(status, extract_message(status, body), details)
}

fn extract_message(status: u16, body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        v.get("message")
            .or_else(|| v.get("Message"))
            .and_then(|m| m.as_str())
    });

    match message {
        Some(m) => m.to_string(),
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("unknown error")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(*v));
        }
        map
    }

    #[test]
    fn json_headers_carry_no_credentials() {
        let headers = json_headers();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
        assert!(headers.get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn service_message_and_code_are_extracted() {
        let err = status_to_error(
            400,
            &headers(&[
                ("x-amzn-errortype", "ValidationException:http://internal.amazon.com/"),
                ("x-amzn-requestid", "req-1"),
            ]),
            r#"{"message":"Malformed input request"}"#,
        );

        match err {
            InvokeError::Service {
                status,
                message,
                details,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Malformed input request");
                assert_eq!(details.code, Some(ServiceErrorCode::ValidationException));
                assert_eq!(details.request_id.as_deref(), Some("req-1"));
            }
            other => panic!("expected service error, got {other:?}"),
        }
    }

    #[test]
    fn non_json_body_is_used_verbatim() {
        let err = status_to_error(502, &HeaderMap::new(), "  upstream exploded ");
        assert_eq!(err.report_message(), "upstream exploded");
    }

    #[test]
    fn empty_body_falls_back_to_status_reason() {
        let err = status_to_error(403, &HeaderMap::new(), "");
        assert_eq!(err.report_message(), "Forbidden");
    }
}
