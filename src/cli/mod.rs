//! Command-line interface.

use std::time::Duration;

use clap::Parser;

use crate::config::ClientConfig;
use crate::error::{ErrorKind, InvokeError};
use crate::models::TextModel;
use crate::types::{GenerationConfig, DEFAULT_MAX_TOKEN_COUNT, DEFAULT_TEMPERATURE};
use crate::util::retry::RetryPolicy;

/// Send a prompt to a hosted text model and print the generated text.
#[derive(Parser, Debug)]
#[command(name = "titan-invoke", version)]
pub struct Cli {
    /// Model identifier
    #[arg(short, long, default_value = "amazon.titan-text-express-v1")]
    pub model: String,

    /// Service region (defaults to AWS_REGION, AWS_DEFAULT_REGION, then us-east-1).
    /// Also discards a BEDROCK_ENDPOINT_URL from the environment unless --endpoint-url is given
    #[arg(short, long)]
    pub region: Option<String>,

    /// Override the service endpoint URL
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Maximum number of tokens to generate
    #[arg(long, default_value_t = DEFAULT_MAX_TOKEN_COUNT)]
    pub max_tokens: u32,

    /// Sampling temperature (0.0 - 1.0)
    #[arg(short, long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f64,

    /// Nucleus sampling probability (0.0 - 1.0)
    #[arg(long)]
    pub top_p: Option<f64>,

    /// Stop sequence (repeatable)
    #[arg(long = "stop")]
    pub stop_sequences: Vec<String>,

    /// Per-attempt timeout in seconds
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// Extra attempts for throttling, 5xx and transport errors
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Maximum concurrent calls when several prompts are given
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Print a JSON document with text, completion reason and token usage
    #[arg(long)]
    pub json: bool,

    /// Prompts (read from stdin when omitted)
    pub prompts: Vec<String>,
}

impl Cli {
    pub fn model(&self) -> TextModel {
        // `strum(default)` makes parsing infallible.
        self.model
            .parse()
            .unwrap_or_else(|_| TextModel::Custom(self.model.clone()))
    }

    pub fn generation_config(&self) -> GenerationConfig {
        GenerationConfig::builder()
            .max_token_count(self.max_tokens)
            .temperature(self.temperature)
            .maybe_top_p(self.top_p)
            .stop_sequences(self.stop_sequences.clone())
            .build()
    }

    /// Layer command-line overrides on top of an environment-derived config.
    pub fn client_config(&self, base: ClientConfig) -> ClientConfig {
        let mut config = base
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_retry_policy(RetryPolicy::with_attempts(self.retries.saturating_add(1)));
        if let Some(region) = &self.region {
            // An explicit region targets that region's endpoint.
            config = config.with_region(region.clone()).without_endpoint_url();
        }
        if let Some(url) = &self.endpoint_url {
            config = config.with_endpoint_url(url.clone());
        }
        config
    }
}

/// One-line stderr report for a failed invocation.
///
/// Service rejections show the service's own message; everything else shows
/// the full error.
pub fn report_line(err: &InvokeError) -> String {
    match err.kind() {
        ErrorKind::Client => format!("ClientError: {}", err.report_message()),
        _ => format!("An error occurred: {err}"),
    }
}
