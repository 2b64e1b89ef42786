//! Request authorization: bearer keys and SigV4 signing.

use std::time::SystemTime;

use aws_config::BehaviorVersion;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_credential_types::Credentials;
use aws_sigv4::http_request::{sign, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Url;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::config::AuthMode;
use crate::error::InvokeError;

/// Signing name of the model runtime.
pub const SIGNING_NAME: &str = "bedrock";

/// Adds the `Authorization` (and SigV4 date/token) headers to a request.
#[derive(Debug)]
pub struct RequestSigner {
    auth: AuthMode,
    region: String,
    chain: OnceCell<Option<SharedCredentialsProvider>>,
}

impl RequestSigner {
    pub fn new(auth: AuthMode, region: impl Into<String>) -> Self {
        Self {
            auth,
            region: region.into(),
            chain: OnceCell::new(),
        }
    }

    /// Authorize a request whose final URL, headers and body are known.
    pub async fn authorize(
        &self,
        url: &Url,
        headers: &mut HeaderMap,
        body: &[u8],
    ) -> Result<(), InvokeError> {
        match &self.auth {
            AuthMode::Bearer(token) => {
                let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                    InvokeError::Configuration("bearer key is not a valid header value".into())
                })?;
                headers.insert(AUTHORIZATION, value);
                Ok(())
            }
            AuthMode::Static(credentials) => {
                sign_v4(credentials.clone(), &self.region, url, headers, body)
            }
            AuthMode::DefaultChain => {
                let credentials = self.chain_credentials().await?;
                sign_v4(credentials, &self.region, url, headers, body)
            }
            AuthMode::Unsigned => Ok(()),
        }
    }

    async fn chain_credentials(&self) -> Result<Credentials, InvokeError> {
        let provider = self
            .chain
            .get_or_init(|| async {
                debug!(region = %self.region, "loading AWS credential provider chain");
                let sdk_config = aws_config::defaults(BehaviorVersion::latest())
                    .region(aws_config::Region::new(self.region.clone()))
                    .load()
                    .await;
                sdk_config.credentials_provider()
            })
            .await
            .as_ref()
            .ok_or_else(|| {
                InvokeError::Credentials("no AWS credential provider is configured".into())
            })?;

        provider
            .provide_credentials()
            .await
            .map_err(|e| InvokeError::Credentials(e.to_string()))
    }
}

/// Sign with SigV4 and copy the resulting headers onto `headers`.
pub fn sign_v4(
    credentials: Credentials,
    region: &str,
    url: &Url,
    headers: &mut HeaderMap,
    body: &[u8],
) -> Result<(), InvokeError> {
    let identity: Identity = credentials.into();
    let params: aws_sigv4::http_request::SigningParams<'_> = v4::SigningParams::builder()
        .identity(&identity)
        .region(region)
        .name(SIGNING_NAME)
        .time(SystemTime::now())
        .settings(SigningSettings::default())
        .build()
        .map_err(|e| InvokeError::Credentials(format!("invalid signing parameters: {e}")))?
        .into();

    let header_pairs: Vec<(&str, &str)> = headers
        .iter()
        .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?)))
        .collect();
    let signable = SignableRequest::new(
        "POST",
        url.as_str(),
        header_pairs.into_iter(),
        SignableBody::Bytes(body),
    )
    .map_err(|e| InvokeError::Credentials(format!("request cannot be signed: {e}")))?;

    let (instructions, _signature) = sign(signable, &params)
        .map_err(|e| InvokeError::Credentials(format!("signing failed: {e}")))?
        .into_parts();

    for (name, value) in instructions.headers() {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| InvokeError::Credentials(format!("bad signed header name: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| InvokeError::Credentials(format!("bad signed header value: {e}")))?;
        headers.insert(name, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_credentials(session_token: Option<&str>) -> Credentials {
        Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            session_token.map(str::to_string),
            None,
            "test",
        )
    }

    fn url() -> Url {
        Url::parse("https://bedrock-runtime.us-east-1.amazonaws.com/model/m/invoke").unwrap()
    }

    #[test]
    fn sigv4_adds_authorization_and_date() {
        let mut headers = crate::provider::http::json_headers();
        sign_v4(test_credentials(None), "us-east-1", &url(), &mut headers, b"{}").unwrap();

        let authorization = headers.get(AUTHORIZATION).unwrap().to_str().unwrap();
        assert!(authorization.starts_with("AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/"));
        assert!(authorization.contains("/us-east-1/bedrock/aws4_request"));
        assert!(headers.contains_key("x-amz-date"));
        assert!(!headers.contains_key("x-amz-security-token"));
    }

    #[test]
    fn session_token_is_forwarded() {
        let mut headers = crate::provider::http::json_headers();
        sign_v4(
            test_credentials(Some("session")),
            "eu-west-1",
            &url(),
            &mut headers,
            b"{}",
        )
        .unwrap();

        assert_eq!(headers.get("x-amz-security-token").unwrap(), "session");
    }

    #[tokio::test]
    async fn bearer_mode_sets_bearer_header() {
        let signer = RequestSigner::new(AuthMode::Bearer("api-key".into()), "us-east-1");
        let mut headers = HeaderMap::new();
        signer.authorize(&url(), &mut headers, b"{}").await.unwrap();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer api-key");
    }

    #[tokio::test]
    async fn unsigned_mode_leaves_headers_alone() {
        let signer = RequestSigner::new(AuthMode::Unsigned, "us-east-1");
        let mut headers = HeaderMap::new();
        signer.authorize(&url(), &mut headers, b"{}").await.unwrap();

        assert!(headers.get(AUTHORIZATION).is_none());
    }
}
