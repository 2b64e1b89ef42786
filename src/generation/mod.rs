//! High-level generation functions over any [`TextGenerator`].

use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::error::InvokeError;
use crate::provider::TextGenerator;
use crate::types::{GenerationConfig, GenerationRequest, GenerationResponse};

/// Validate locally, issue one request, and return the decoded reply.
///
/// Nothing is sent when the prompt or parameters are out of range. A reply
/// without any result is reported as malformed.
pub async fn generate(
    generator: &dyn TextGenerator,
    prompt: &str,
    config: &GenerationConfig,
) -> Result<GenerationResponse, InvokeError> {
    let request = GenerationRequest::new(prompt, config, generator.max_output_tokens())?;

    debug!(
        model = generator.model_id(),
        max_token_count = request.max_token_count(),
        "generate"
    );
    let response = generator.generate(&request).await?;
    response.first_result()?;

    Ok(response)
}

/// Generate and return only the first result's output text.
pub async fn generate_text(
    generator: &dyn TextGenerator,
    prompt: &str,
    config: &GenerationConfig,
) -> Result<String, InvokeError> {
    generate(generator, prompt, config).await?.into_output_text()
}

/// One independent call per prompt, at most `concurrency` in flight.
///
/// Results come back in prompt order; a failure only affects its own slot.
pub async fn generate_batch<S: AsRef<str>>(
    generator: &dyn TextGenerator,
    prompts: &[S],
    config: &GenerationConfig,
    concurrency: usize,
) -> Vec<Result<GenerationResponse, InvokeError>> {
    debug!(
        model = generator.model_id(),
        prompts = prompts.len(),
        concurrency,
        "generate_batch"
    );
    stream::iter(prompts)
        .map(|prompt| generate(generator, prompt.as_ref(), config))
        .buffered(concurrency.max(1))
        .collect()
        .await
}
