use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clients::traits::{ChatTurn, GenerationError, Role, TextGenerator};
use crate::clients::truncate_body;
use crate::config::GenerationConfig;

/// Gemini `generateContent` REST client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout_ms: u64,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: Role,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, cfg: &GenerationConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .context("Failed to build reqwest client with timeout")?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: cfg.model.clone(),
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            timeout_ms: cfg.timeout_ms,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate_content(&self, contents: Vec<Content<'_>>) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingApiKey { backend: "gemini" })?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        debug!(
            "Calling Gemini (model={}, turns={})",
            self.model,
            contents.len()
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&GenerateRequest { contents })
            .send()
            .await
            .map_err(|e| self.map_transport_err(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(GenerationError::Status {
                backend: "gemini",
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::ParseError(e.to_string()))?;
        extract_text(parsed)
    }

    fn map_transport_err(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else {
            GenerationError::Http(err.to_string())
        }
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, GenerationError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        Err(GenerationError::EmptyResponse)
    } else {
        Ok(text.to_string())
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.generate_content(vec![Content {
            role: Role::User,
            parts: [Part { text: prompt }],
        }])
        .await
    }

    async fn chat(&self, history: &[ChatTurn], message: &str) -> Result<String, GenerationError> {
        let mut contents: Vec<Content<'_>> = history
            .iter()
            .map(|turn| Content {
                role: turn.role,
                parts: [Part { text: &turn.text }],
            })
            .collect();
        contents.push(Content {
            role: Role::User,
            parts: [Part { text: message }],
        });
        self.generate_content(contents).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GenerationConfig {
        GenerationConfig {
            model: "gemini-1.5-flash".to_string(),
            base_url: "http://127.0.0.1:9/v1beta/".to_string(),
            timeout_ms: 500,
        }
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let raw = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Goal: walk"},{"text":"\nAdvice: go "}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(extract_text(parsed).unwrap(), "Goal: walk\nAdvice: go");
    }

    #[test]
    fn test_extract_text_empty_candidates() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(
            extract_text(parsed),
            Err(GenerationError::EmptyResponse)
        ));
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(extract_text(parsed).is_err());
    }

    #[test]
    fn test_chat_request_uses_generator_role_names() {
        let body = GenerateRequest {
            contents: vec![
                Content {
                    role: Role::User,
                    parts: [Part { text: "hi" }],
                },
                Content {
                    role: Role::Model,
                    parts: [Part { text: "hello" }],
                },
            ],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["contents"][1]["parts"][0]["text"], "hello");
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let client = GeminiClient::new(Some("  ".into()), &test_config()).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:9/v1beta");
        assert_eq!(client.model(), test_config().model);
        let err = client.generate("hello").await.unwrap_err();
        assert!(matches!(err, GenerationError::MissingApiKey { .. }));
    }
}
