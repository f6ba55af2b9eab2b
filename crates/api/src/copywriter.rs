//! AI copy generation through an OpenAI-compatible chat-completions endpoint.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::{ApiError, ApiResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_PROMPT: &str =
    "You write concise marketing copy for a website. Reply with the copy only, no quotes or commentary.";

/// Body of `POST /api/admin/generate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyRequest {
    pub prompt: Option<String>,
    /// Content path the copy is for, e.g. `hero.title`.
    pub field: Option<String>,
    pub current_value: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// Thin client for the configured LLM endpoint.
pub struct Copywriter {
    client: reqwest::Client,
    config: LlmConfig,
}

impl Copywriter {
    pub fn new(config: LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "falling back to default http client");
                reqwest::Client::new()
            });
        Self { client, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub async fn generate(&self, request: &CopyRequest) -> ApiResult<String> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(ApiError::Unavailable(
                "AI copy generation is not configured".to_string(),
            ));
        };
        let messages = build_messages(request)?;

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&ChatRequest {
                model: &self.config.model,
                messages,
            })
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("copy request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Upstream(format!(
                "copy endpoint returned {status}"
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Upstream(format!("invalid copy response: {e}")))?;
        let text = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ApiError::Upstream("copy endpoint returned no text".to_string()))?;

        tracing::info!(field = ?request.field, chars = text.len(), "generated copy");
        Ok(text)
    }
}

fn build_messages(request: &CopyRequest) -> ApiResult<Vec<ChatMessage>> {
    let prompt = request
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("prompt is required".to_string()))?;

    let mut user = String::new();
    if let Some(field) = request.field.as_deref().filter(|f| !f.is_empty()) {
        user.push_str(&format!("Field: {field}\n"));
    }
    if let Some(current) = request.current_value.as_deref().filter(|c| !c.is_empty()) {
        user.push_str(&format!("Current copy: {current}\n"));
    }
    user.push_str(prompt);

    Ok(vec![
        ChatMessage {
            role: "system".to_string(),
            content: SYSTEM_PROMPT.to_string(),
        },
        ChatMessage {
            role: "user".to_string(),
            content: user,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(prompt: Option<&str>, field: Option<&str>, current: Option<&str>) -> CopyRequest {
        CopyRequest {
            prompt: prompt.map(String::from),
            field: field.map(String::from),
            current_value: current.map(String::from),
        }
    }

    #[test]
    fn messages_include_field_context() {
        let messages =
            build_messages(&request(Some("Punchier"), Some("hero.title"), Some("We build sites"))).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(
            messages[1].content,
            "Field: hero.title\nCurrent copy: We build sites\nPunchier"
        );
    }

    #[test]
    fn blank_prompt_is_rejected() {
        assert!(matches!(
            build_messages(&request(Some("   "), None, None)),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            build_messages(&request(None, None, None)),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn unconfigured_copywriter_is_unavailable() {
        let writer = Copywriter::new(LlmConfig::default());
        assert!(!writer.is_configured());
        assert!(matches!(
            writer.generate(&request(Some("hi"), None, None)).await,
            Err(ApiError::Unavailable(_))
        ));
    }
}
