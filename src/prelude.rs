//! Convenience re-exports for common use.

pub use crate::config::ClientConfig;
pub use crate::error::{ErrorKind, InvokeError, Result};
pub use crate::models::TextModel;
pub use crate::provider::{InvocationClient, TextGenerator};
pub use crate::types::{CompletionReason, GenerationConfig, GenerationResponse, Usage};
pub use crate::util::retry::RetryPolicy;
