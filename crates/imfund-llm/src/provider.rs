//! Chat-completion transport against an OpenAI-compatible endpoint
//!
//! The contract is deliberately thin: one text block in, one text block or
//! error out. Anything richer belongs to the caller.

use crate::types::{LLMError, LLMMessage, LLMRequest, LLMResponse};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "mistralai/mistral-small-3.1-24b-instruct";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Chat completion request payload
#[derive(Debug, serde::Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [LLMMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

pub struct ChatClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    default_model: String,
}

impl ChatClient {
    /// Create a client. `base_url` and `model` fall back to the OpenRouter
    /// endpoint and its default model.
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
    ) -> Result<Self, LLMError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| LLMError::NetworkError {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            default_model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    /// Execute a completion request
    pub async fn complete(&self, request: &LLMRequest) -> Result<LLMResponse, LLMError> {
        if request.messages.is_empty() {
            return Err(LLMError::InvalidRequest {
                message: "no messages".to_string(),
            });
        }

        let model = request.model.as_deref().unwrap_or(&self.default_model);
        let payload = ChatCompletionRequest {
            model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| LLMError::NetworkError {
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(classify_api_error(status.as_u16(), &body));
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| LLMError::ApiError {
                message: format!("malformed completion response: {}", e),
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or(LLMError::EmptyCompletion)?;

        Ok(LLMResponse {
            content,
            tokens_used: parsed.usage.map(|u| u.total_tokens),
            model: parsed.model.unwrap_or_else(|| model.to_string()),
        })
    }
}

/// Map a non-2xx response onto the error taxonomy
fn classify_api_error(status: u16, body: &str) -> LLMError {
    let lowered = body.to_lowercase();
    match status {
        429 => LLMError::RateLimited {
            retry_after_seconds: Some(60),
        },
        401 | 403 => LLMError::InvalidApiKey,
        _ if lowered.contains("context") && lowered.contains("length") => {
            LLMError::ContextLengthExceeded {
                message: body.to_string(),
            }
        }
        _ => LLMError::ApiError {
            message: format!("status {}: {}", status, body),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rate_limit() {
        assert!(matches!(
            classify_api_error(429, "slow down"),
            LLMError::RateLimited { .. }
        ));
    }

    #[test]
    fn test_classify_auth() {
        assert!(matches!(
            classify_api_error(401, "bad key"),
            LLMError::InvalidApiKey
        ));
        assert!(matches!(
            classify_api_error(403, "forbidden"),
            LLMError::InvalidApiKey
        ));
    }

    #[test]
    fn test_classify_context_length() {
        assert!(matches!(
            classify_api_error(400, "maximum context length exceeded"),
            LLMError::ContextLengthExceeded { .. }
        ));
    }

    #[test]
    fn test_classify_other() {
        assert!(matches!(
            classify_api_error(500, "boom"),
            LLMError::ApiError { .. }
        ));
    }

    #[test]
    fn test_empty_request_rejected() {
        let client = ChatClient::new("key".to_string(), None, None).unwrap();
        let request = LLMRequest {
            model: None,
            messages: vec![],
            max_tokens: None,
            temperature: None,
        };
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let result = runtime.block_on(client.complete(&request));
        assert!(matches!(result, Err(LLMError::InvalidRequest { .. })));
    }

    #[test]
    fn test_parse_completion_response() {
        let json = r#"{
            "choices": [{"message": {"content": "A concise summary."}}],
            "usage": {"total_tokens": 42},
            "model": "mistralai/mistral-small-3.1-24b-instruct"
        }"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("A concise summary.")
        );
        assert_eq!(parsed.usage.unwrap().total_tokens, 42);
    }
}
