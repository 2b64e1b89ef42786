//! Client configuration (explicit values > environment > `.env` file).

use std::fmt;
use std::time::Duration;

use aws_credential_types::Credentials;

use crate::error::InvokeError;
use crate::util::retry::RetryPolicy;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Environment variables consulted by [`ClientConfig::from_env`], in priority order.
pub const REGION_ENV_VARS: [&str; 2] = ["AWS_REGION", "AWS_DEFAULT_REGION"];
pub const BEARER_TOKEN_ENV_VAR: &str = "AWS_BEARER_TOKEN_BEDROCK";
pub const ENDPOINT_URL_ENV_VAR: &str = "BEDROCK_ENDPOINT_URL";

/// How requests are authorized.
#[derive(Clone)]
pub enum AuthMode {
    /// `Authorization: Bearer <key>` (service API key).
    Bearer(String),
    /// SigV4 with explicitly supplied credentials.
    Static(Credentials),
    /// SigV4 with credentials from the environment's AWS provider chain
    /// (environment keys, profiles, SSO, container and instance roles).
    DefaultChain,
    /// No `Authorization` header, for endpoints fronted by a signing proxy.
    Unsigned,
}

impl fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(..)"),
            Self::Static(_) => f.write_str("Static(..)"),
            Self::DefaultChain => f.write_str("DefaultChain"),
            Self::Unsigned => f.write_str("Unsigned"),
        }
    }
}

/// Where and how the client reaches the inference service.
#[derive(Clone)]
pub struct ClientConfig {
    region: String,
    endpoint_url: Option<String>,
    auth: AuthMode,
    timeout: Duration,
    retry_policy: RetryPolicy,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .field("auth", &self.auth)
            .field("timeout", &self.timeout)
            .field("retry_policy", &self.retry_policy)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REGION)
    }
}

impl ClientConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            endpoint_url: None,
            auth: AuthMode::DefaultChain,
            timeout: DEFAULT_TIMEOUT,
            retry_policy: RetryPolicy::default(),
        }
    }

    /// Load from environment variables, reading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    ///
    /// A bearer key wins over SigV4; without one, credentials come from the
    /// default AWS provider chain at call time.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let region = REGION_ENV_VARS
            .iter()
            .find_map(|key| get(*key))
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let mut config = Self::new(region);
        if let Some(token) = get(BEARER_TOKEN_ENV_VAR) {
            config.auth = AuthMode::Bearer(token);
        }
        config.endpoint_url = get(ENDPOINT_URL_ENV_VAR);
        config
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Override the service endpoint (e.g. a VPC endpoint or a local mock).
    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Drop any endpoint override so the regional endpoint is used.
    pub fn without_endpoint_url(mut self) -> Self {
        self.endpoint_url = None;
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthMode::Bearer(token.into());
        self
    }

    /// Sign requests with these credentials instead of the provider chain.
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.auth = AuthMode::Static(credentials);
        self
    }

    pub fn with_auth(mut self, auth: AuthMode) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn auth(&self) -> &AuthMode {
        &self.auth
    }

    pub fn bearer_token(&self) -> Option<&str> {
        match &self.auth {
            AuthMode::Bearer(token) => Some(token),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Resolve the base endpoint: the override when set, otherwise the
    /// regional runtime endpoint.
    pub fn endpoint(&self) -> Result<String, InvokeError> {
        if let Some(url) = &self.endpoint_url {
            let url = url.trim().trim_end_matches('/');
            if url.is_empty() {
                return Err(InvokeError::Configuration(
                    "endpoint URL cannot be empty".to_string(),
                ));
            }
            return Ok(url.to_string());
        }

        let region = self.region.trim();
        if region.is_empty() {
            return Err(InvokeError::Configuration(
                "region cannot be empty".to_string(),
            ));
        }
        Ok(format!("https://bedrock-runtime.{region}.amazonaws.com"))
    }

    /// Validate settings that would otherwise only fail at call time.
    pub fn validate(&self) -> Result<(), InvokeError> {
        self.endpoint()?;
        if self.timeout.is_zero() {
            return Err(InvokeError::Configuration(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
