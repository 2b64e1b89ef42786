//! Shared test helpers and mock generator.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use titan_invoke::config::ClientConfig;
use titan_invoke::error::InvokeError;
use titan_invoke::provider::TextGenerator;
use titan_invoke::types::{GenerationRequest, GenerationResponse, GenerationResult};
use titan_invoke::util::retry::RetryPolicy;

pub const EXPRESS_INVOKE_PATH: &str = "/model/amazon.titan-text-express-v1/invoke";

/// Config pointed at a mock server, with a fast retry curve.
pub fn mock_config(uri: &str, max_attempts: u32) -> ClientConfig {
    ClientConfig::new("us-east-1")
        .with_endpoint_url(uri)
        .with_bearer_token("test-token")
        .with_timeout(Duration::from_secs(5))
        .with_retry_policy(RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(1),
            multiplier: 1.0,
        })
}

pub fn text_response(text: &str) -> GenerationResponse {
    GenerationResponse {
        input_text_token_count: Some(5),
        results: vec![GenerationResult {
            output_text: text.to_string(),
            token_count: Some(7),
            completion_reason: None,
        }],
        request_id: None,
    }
}

/// A generator that echoes prompts back, failing on those containing "fail".
pub struct EchoGenerator {
    pub calls: AtomicUsize,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub seen: Mutex<Vec<String>>,
    delay: Duration,
}

impl EchoGenerator {
    pub fn new(delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            delay,
        }
    }
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    fn model_id(&self) -> &str {
        "echo"
    }

    fn max_output_tokens(&self) -> Option<u32> {
        Some(1_000)
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, InvokeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.prompt().to_string());

        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if request.prompt().contains("fail") {
            return Err(InvokeError::service(400, "rejected"));
        }
        Ok(text_response(&request.prompt().to_uppercase()))
    }
}
