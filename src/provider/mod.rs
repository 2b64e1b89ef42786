//! Text generator trait and the hosted-model client.

pub mod bedrock;
pub mod http;
pub mod signing;

pub use bedrock::InvocationClient;

use async_trait::async_trait;

use crate::error::InvokeError;
use crate::types::{GenerationRequest, GenerationResponse};

/// Anything that turns one validated request into one response.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// The model ID this generator serves.
    fn model_id(&self) -> &str;

    /// Largest `maxTokenCount` the model accepts, when known.
    fn max_output_tokens(&self) -> Option<u32> {
        None
    }

    /// Issue a single request and decode the reply.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, InvokeError>;
}
