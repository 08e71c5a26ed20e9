use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::news::Article;

/// Who produced a chat turn. Serialized with the generator's role names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generator timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
    #[error("no API key configured for {backend}")]
    MissingApiKey { backend: &'static str },
    #[error("http error: {0}")]
    Http(String),
    #[error("{backend} returned status {status}: {body}")]
    Status {
        backend: &'static str,
        status: u16,
        body: String,
    },
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("generator returned no text")]
    EmptyResponse,
}

/// A generative text backend.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// One prompt in, free-form text out.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Continue a conversation. `history` holds the prior turns, oldest first.
    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String, GenerationError>;
}

/// A news search backend. Implementations never fail outward: a failed fetch
/// is reported as a single placeholder article.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch(&self) -> Vec<Article>;
}
