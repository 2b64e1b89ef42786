//! Client for the hosted model runtime's `invoke` endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::InvokeError;
use crate::generation;
use crate::models::TextModel;
use crate::types::{GenerationConfig, GenerationRequest, GenerationResponse};
use crate::util::timeout::with_timeout;

use super::http::{json_headers, request_id, shared_client, status_to_error};
use super::signing::RequestSigner;
use super::TextGenerator;

/// Sends prompts to one model through one configured endpoint.
#[derive(Debug, Clone)]
pub struct InvocationClient {
    model: TextModel,
    config: ClientConfig,
    invoke_url: Url,
    signer: Arc<RequestSigner>,
}

impl InvocationClient {
    /// Build a client; fails fast on an unusable configuration.
    pub fn new(model: TextModel, config: ClientConfig) -> Result<Self, InvokeError> {
        config.validate()?;
        if model.as_str().trim().is_empty() {
            return Err(InvokeError::Configuration(
                "model identifier cannot be empty".to_string(),
            ));
        }
        let invoke_url = build_invoke_url(&config.endpoint()?, model.as_str())?;
        let signer = Arc::new(RequestSigner::new(
            config.auth().clone(),
            config.region(),
        ));

        Ok(Self {
            model,
            config,
            invoke_url,
            signer,
        })
    }

    pub fn model(&self) -> &TextModel {
        &self.model
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn invoke_url(&self) -> &Url {
        &self.invoke_url
    }

    /// Generate text for `prompt` and return the first result's output.
    pub async fn invoke(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, InvokeError> {
        generation::generate_text(self, prompt, config).await
    }

    /// Like [`invoke`](Self::invoke), but keep token counts, completion
    /// reason and request id.
    pub async fn invoke_detailed(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResponse, InvokeError> {
        generation::generate(self, prompt, config).await
    }

    async fn send_once(
        &self,
        request: &GenerationRequest,
        attempt: u32,
    ) -> Result<GenerationResponse, InvokeError> {
        debug!(model = self.model.as_str(), attempt, "invoke model");

        with_timeout(self.config.timeout(), async {
            let body = serde_json::to_vec(request)?;
            let mut headers = json_headers();
            self.signer
                .authorize(&self.invoke_url, &mut headers, &body)
                .await?;

            let response = shared_client()
                .post(self.invoke_url.clone())
                .headers(headers)
                .body(body)
                .send()
                .await?;

            let status = response.status();
            let headers = response.headers().clone();
            let body = response.text().await?;

            if !status.is_success() {
                return Err(status_to_error(status.as_u16(), &headers, &body));
            }

            let mut decoded: GenerationResponse = serde_json::from_str(&body)?;
            decoded.request_id = request_id(&headers);
            Ok(decoded)
        })
        .await
    }
}

#[async_trait]
impl TextGenerator for InvocationClient {
    fn model_id(&self) -> &str {
        self.model.as_str()
    }

    fn max_output_tokens(&self) -> Option<u32> {
        self.model.max_output_tokens()
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, InvokeError> {
        self.config
            .retry_policy()
            .execute(|attempt| self.send_once(request, attempt))
            .await
    }
}

fn build_invoke_url(endpoint: &str, model_id: &str) -> Result<Url, InvokeError> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| InvokeError::Configuration(format!("invalid endpoint URL {endpoint}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| {
            InvokeError::Configuration(format!("endpoint URL cannot be a base: {endpoint}"))
        })?
        .pop_if_empty()
        .push("model")
        .push(model_id)
        .push("invoke");
    Ok(url)
}
