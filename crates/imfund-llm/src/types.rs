//! Type definitions for the summary-generation interface

use serde::{Deserialize, Serialize};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LLMRole {
    System,
    User,
    Assistant,
}

/// A single message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMMessage {
    /// Role of the message sender
    pub role: LLMRole,
    /// Text content of the message
    pub content: String,
}

impl LLMMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: LLMRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: LLMRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: LLMRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request to complete a conversation
#[derive(Debug, Clone)]
pub struct LLMRequest {
    /// Model identifier; empty uses the client's default
    pub model: Option<String>,
    /// Conversation messages
    pub messages: Vec<LLMMessage>,
    /// Maximum tokens to generate (optional)
    pub max_tokens: Option<u32>,
    /// Temperature for sampling (0.0-2.0, optional)
    pub temperature: Option<f32>,
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct LLMResponse {
    /// Generated content
    pub content: String,
    /// Number of tokens used in completion
    pub tokens_used: Option<u32>,
    /// Model that generated the response
    pub model: String,
}

/// Error types for LLM operations
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limited: retry after {retry_after_seconds:?} seconds")]
    RateLimited { retry_after_seconds: Option<u32> },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("API error: {message}")]
    ApiError { message: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Context length exceeded: {message}")]
    ContextLengthExceeded { message: String },

    #[error("Empty completion")]
    EmptyCompletion,
}
