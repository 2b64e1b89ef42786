//! Generation parameters and the request/response payloads.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::Display;

use super::usage::Usage;
use crate::error::InvokeError;

pub const DEFAULT_MAX_TOKEN_COUNT: u32 = 512;
pub const DEFAULT_TEMPERATURE: f64 = 0.5;

/// Settings controlling text generation.
///
/// ```
/// use titan_invoke::types::GenerationConfig;
///
/// let config = GenerationConfig::builder()
///     .max_token_count(256)
///     .temperature(0.2)
///     .build();
/// assert!(config.validate(None).is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct GenerationConfig {
    /// Caps the response length.
    #[builder(default = DEFAULT_MAX_TOKEN_COUNT)]
    pub max_token_count: u32,
    /// Sampling randomness, `0.0..=1.0`.
    #[builder(default = DEFAULT_TEMPERATURE)]
    pub temperature: f64,
    pub top_p: Option<f64>,
    #[builder(default)]
    pub stop_sequences: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GenerationConfig {
    /// Check every parameter against the ranges the service accepts.
    ///
    /// `max_output_tokens` is the model's ceiling, when known.
    pub fn validate(&self, max_output_tokens: Option<u32>) -> Result<(), InvokeError> {
        if self.max_token_count == 0 {
            return Err(InvokeError::InvalidArgument(
                "maxTokenCount must be greater than 0".to_string(),
            ));
        }
        if let Some(ceiling) = max_output_tokens {
            if self.max_token_count > ceiling {
                return Err(InvokeError::InvalidArgument(format!(
                    "maxTokenCount {} exceeds the model limit of {ceiling}",
                    self.max_token_count
                )));
            }
        }
        check_unit_interval("temperature", self.temperature)?;
        if let Some(top_p) = self.top_p {
            check_unit_interval("topP", top_p)?;
        }
        if self.stop_sequences.iter().any(|s| s.is_empty()) {
            return Err(InvokeError::InvalidArgument(
                "stop sequences cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<(), InvokeError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(InvokeError::InvalidArgument(format!(
            "{name} must be within [0, 1], got {value}"
        )));
    }
    Ok(())
}

/// Request body sent to the model's `invoke` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    input_text: String,
    text_generation_config: TextGenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct TextGenerationConfig {
    max_token_count: u32,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
}

impl GenerationRequest {
    /// Build a validated request. Empty or whitespace-only prompts are rejected.
    pub fn new(
        prompt: impl Into<String>,
        config: &GenerationConfig,
        max_output_tokens: Option<u32>,
    ) -> Result<Self, InvokeError> {
        let input_text = prompt.into();
        if input_text.trim().is_empty() {
            return Err(InvokeError::InvalidArgument(
                "prompt cannot be empty".to_string(),
            ));
        }
        config.validate(max_output_tokens)?;

        Ok(Self {
            input_text,
            text_generation_config: TextGenerationConfig {
                max_token_count: config.max_token_count,
                temperature: config.temperature,
                top_p: config.top_p,
                stop_sequences: config.stop_sequences.clone(),
            },
        })
    }

    pub fn prompt(&self) -> &str {
        &self.input_text
    }

    pub fn max_token_count(&self) -> u32 {
        self.text_generation_config.max_token_count
    }
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionReason {
    Finish,
    Length,
    StopCriteriaMet,
    RagQueryWhenRagDisabled,
    ContentFiltered,
    #[serde(other)]
    Other,
}

/// Decoded reply from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResponse {
    pub input_text_token_count: Option<u32>,
    pub results: Vec<GenerationResult>,
    /// Service request id, taken from the reply headers.
    #[serde(skip)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub output_text: String,
    pub token_count: Option<u32>,
    pub completion_reason: Option<CompletionReason>,
}

impl GenerationResponse {
    /// First result; only it is consumed.
    pub fn first_result(&self) -> Result<&GenerationResult, InvokeError> {
        self.results.first().ok_or_else(|| {
            InvokeError::MalformedResponse("response contained no results".to_string())
        })
    }

    pub fn output_text(&self) -> Result<&str, InvokeError> {
        self.first_result().map(|r| r.output_text.as_str())
    }

    pub fn into_output_text(self) -> Result<String, InvokeError> {
        self.results.into_iter().next().map(|r| r.output_text).ok_or_else(|| {
            InvokeError::MalformedResponse("response contained no results".to_string())
        })
    }

    pub fn completion_reason(&self) -> Option<CompletionReason> {
        self.results.first().and_then(|r| r.completion_reason)
    }

    pub fn usage(&self) -> Usage {
        let input_tokens = self.input_text_token_count.unwrap_or(0);
        let output_tokens = self
            .results
            .first()
            .and_then(|r| r.token_count)
            .unwrap_or(0);
        Usage {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens.saturating_add(output_tokens),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_serializes_to_wire_shape() {
        let config = GenerationConfig::default();
        let request = GenerationRequest::new("Write an email", &config, None).unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "inputText": "Write an email",
                "textGenerationConfig": {
                    "maxTokenCount": 512,
                    "temperature": 0.5
                }
            })
        );
    }

    #[test]
    fn optional_parameters_are_sent_when_set() {
        let config = GenerationConfig::builder()
            .max_token_count(64)
            .temperature(0.0)
            .top_p(0.9)
            .stop_sequences(vec!["User:".to_string()])
            .build();
        let request = GenerationRequest::new("hi", &config, Some(4_096)).unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap()["textGenerationConfig"],
            serde_json::json!({
                "maxTokenCount": 64,
                "temperature": 0.0,
                "topP": 0.9,
                "stopSequences": ["User:"]
            })
        );
    }

    #[test]
    fn empty_prompt_is_rejected() {
        let err = GenerationRequest::new("", &GenerationConfig::default(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = GenerationRequest::new(" \n\t", &GenerationConfig::default(), None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn out_of_range_parameters_are_rejected() {
        let cases = [
            GenerationConfig::builder().max_token_count(0).build(),
            GenerationConfig::builder().temperature(-0.1).build(),
            GenerationConfig::builder().temperature(1.5).build(),
            GenerationConfig::builder().temperature(f64::NAN).build(),
            GenerationConfig::builder().top_p(1.01).build(),
            GenerationConfig::builder()
                .stop_sequences(vec![String::new()])
                .build(),
        ];
        for config in cases {
            let err = config.validate(None).unwrap_err();
            assert!(
                matches!(err, InvokeError::InvalidArgument(_)),
                "unexpected error for {config:?}: {err}"
            );
        }
    }

    #[test]
    fn boundary_values_are_accepted() {
        GenerationConfig::builder()
            .max_token_count(1)
            .temperature(0.0)
            .build()
            .validate(None)
            .unwrap();
        GenerationConfig::builder()
            .max_token_count(8_192)
            .temperature(1.0)
            .top_p(1.0)
            .build()
            .validate(Some(8_192))
            .unwrap();
    }

    #[test]
    fn model_ceiling_is_enforced() {
        let config = GenerationConfig::builder().max_token_count(4_097).build();
        let err = config.validate(Some(4_096)).unwrap_err();
        assert!(err.to_string().contains("exceeds the model limit of 4096"));
    }

    #[test]
    fn response_decodes_finish_metadata() {
        let response: GenerationResponse = serde_json::from_str(
            r#"{
                "inputTextTokenCount": 12,
                "results": [
                    {"tokenCount": 30, "outputText": "Dear team,", "completionReason": "FINISH"}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(response.output_text().unwrap(), "Dear team,");
        assert_eq!(response.completion_reason(), Some(CompletionReason::Finish));
        assert_eq!(
            response.usage(),
            Usage {
                input_tokens: 12,
                output_tokens: 30,
                total_tokens: 42,
            }
        );
    }

    #[test]
    fn usage_total_saturates_on_oversized_counts() {
        let response: GenerationResponse = serde_json::from_value(serde_json::json!({
            "inputTextTokenCount": u32::MAX,
            "results": [{"outputText": "x", "tokenCount": 10}]
        }))
        .unwrap();

        let usage = response.usage();
        assert_eq!(usage.input_tokens, u32::MAX);
        assert_eq!(usage.output_tokens, 10);
        assert_eq!(usage.total_tokens, u32::MAX);
    }

    #[test]
    fn unrecognized_completion_reason_maps_to_other() {
        let result: GenerationResult = serde_json::from_str(
            r#"{"outputText": "x", "completionReason": "SOMETHING_NEW"}"#,
        )
        .unwrap();
        assert_eq!(result.completion_reason, Some(CompletionReason::Other));
    }

    #[test]
    fn empty_results_are_malformed() {
        let response: GenerationResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        let err = response.into_output_text().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unclassified);
    }

    #[test]
    fn missing_output_text_fails_to_decode() {
        let err = serde_json::from_str::<GenerationResponse>(r#"{"results": [{"tokenCount": 3}]}"#)
            .unwrap_err();
        assert_eq!(InvokeError::from(err).kind(), ErrorKind::Unclassified);
    }
}
