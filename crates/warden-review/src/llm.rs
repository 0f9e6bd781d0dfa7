use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use warden_core::{LlmConfig, WardenError};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const OPENAI_BASE_URL: &str = "https://api.openai.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A text-generation backend.
///
/// The review pipeline only needs a single prompt-in, text-out call; any
/// failure is reported as [`WardenError::Provider`].
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Model identifier, for logging.
    fn model(&self) -> &str;

    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, WardenError>;
}

/// Build the model client selected by `config.provider`.
///
/// # Errors
///
/// Returns [`WardenError::Config`] for an unknown provider or a missing API
/// key, or [`WardenError::Provider`] if the HTTP client cannot be built.
///
/// # Examples
///
/// ```
/// use warden_core::LlmConfig;
/// use warden_review::llm::from_config;
///
/// let config = LlmConfig {
///     api_key: Some("test-key".into()),
///     ..LlmConfig::default()
/// };
/// let client = from_config(&config).unwrap();
/// assert_eq!(client.model(), "gemini-2.5-flash");
/// ```
pub fn from_config(config: &LlmConfig) -> Result<Box<dyn ModelClient>, WardenError> {
    let api_key = config.resolve_api_key()?;
    match config.provider.as_str() {
        "gemini" => Ok(Box::new(GeminiClient::new(config, api_key)?)),
        "openai" => Ok(Box::new(OpenAiClient::new(config, api_key)?)),
        other => Err(WardenError::Config(format!(
            "unknown LLM provider '{other}', expected gemini or openai"
        ))),
    }
}

fn http_client() -> Result<reqwest::Client, WardenError> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| WardenError::Provider(format!("failed to create HTTP client: {e}")))
}

async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, WardenError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body_text = response.text().await.unwrap_or_default();
    Err(WardenError::Provider(format!(
        "LLM API error {status}: {body_text}"
    )))
}

/// Google Gemini `generateContent` client.
///
/// # Examples
///
/// ```
/// use warden_core::LlmConfig;
/// use warden_review::llm::{GeminiClient, ModelClient};
///
/// let client = GeminiClient::new(&LlmConfig::default(), "test-key".into()).unwrap();
/// assert_eq!(client.model(), "gemini-2.5-flash");
/// ```
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateResponse {
    fn into_text(self) -> Result<String, WardenError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".into());
            return Err(WardenError::Provider(format!("Gemini returned no text: {reason}")));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.is_empty() {
            return Err(WardenError::Provider("Gemini returned an empty response".into()));
        }
        Ok(text)
    }
}

impl GeminiClient {
    /// Create a client for `config.model` using `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::Provider`] if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self, WardenError> {
        Ok(Self {
            client: http_client()?,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, WardenError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| WardenError::Provider(format!("request failed: {e}")))?;
        let response = error_for_status(response).await?;

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| WardenError::Provider(format!("failed to parse response: {e}")))?;
        parsed.into_text()
    }
}

/// A message in a chat conversation with an OpenAI-compatible model.
///
/// # Examples
///
/// ```
/// use warden_review::llm::{ChatMessage, Role};
///
/// let msg = ChatMessage {
///     role: Role::User,
///     content: "Check this issue".into(),
/// };
/// assert!(matches!(msg.role, Role::User));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: Role,
    /// Text content of the message.
    pub content: String,
}

/// Role in the chat conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System-level instructions.
    System,
    /// User input.
    User,
    /// Assistant response.
    Assistant,
}

/// OpenAI-compatible chat completions client.
///
/// Works with any provider that exposes the `/v1/chat/completions` endpoint:
/// OpenAI, Ollama, vLLM, LiteLLM, etc.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    /// Create a client for `config.model` using `api_key`.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::Provider`] if the HTTP client cannot be built.
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self, WardenError> {
        Ok(Self {
            client: http_client()?,
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
            model: config.model.clone(),
        })
    }

    /// Send a chat completion request and return the text response.
    ///
    /// # Errors
    ///
    /// Returns [`WardenError::Provider`] on HTTP errors or response parsing failures.
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> Result<String, WardenError> {
        let url = format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'));

        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": 0.1,
        });

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| WardenError::Provider(format!("request failed: {e}")))?;
        let response = error_for_status(response).await?;

        let response_body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| WardenError::Provider(format!("failed to parse response: {e}")))?;

        let content = response_body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| {
                WardenError::Provider(format!("unexpected response structure: {response_body}"))
            })?;

        Ok(content.to_string())
    }
}

#[async_trait]
impl ModelClient for OpenAiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, WardenError> {
        self.chat(vec![ChatMessage {
            role: Role::User,
            content: prompt.to_string(),
        }])
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config_for(provider: &str, base_url: &str, model: &str) -> LlmConfig {
        LlmConfig {
            provider: provider.into(),
            model: model.into(),
            api_key: Some("test-key".into()),
            base_url: Some(base_url.into()),
        }
    }

    #[test]
    fn unknown_provider_is_config_error() {
        let config = LlmConfig {
            provider: "cohere".into(),
            api_key: Some("k".into()),
            ..LlmConfig::default()
        };
        let err = from_config(&config).err().unwrap();
        assert!(matches!(err, WardenError::Config(_)));
    }

    #[test]
    fn openai_provider_is_selected() {
        let config = LlmConfig {
            provider: "openai".into(),
            model: "gpt-4o-mini".into(),
            api_key: Some("k".into()),
            base_url: None,
        };
        let client = from_config(&config).unwrap();
        assert_eq!(client.model(), "gpt-4o-mini");
    }

    #[test]
    fn chat_message_serializes() {
        let msg = ChatMessage {
            role: Role::System,
            content: "hello".into(),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn gemini_parts_are_concatenated() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "## 结果\n"}, {"text": "PASS"}]}}]
        }))
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "## 结果\nPASS");
    }

    #[test]
    fn gemini_blocked_prompt_reports_reason() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();
        let err = response.into_text().unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn gemini_generate_posts_prompt() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-2.5-flash:generateContent")
                    .header("x-goog-api-key", "test-key")
                    .body_contains("Issue Title: Crash");
                then.status(200).json_body(json!({
                    "candidates": [{"content": {"parts": [{"text": "### 检查状态\nFAIL"}]}}]
                }));
            })
            .await;

        let config = config_for("gemini", &server.base_url(), "gemini-2.5-flash");
        let client = GeminiClient::new(&config, "test-key".into()).unwrap();
        let text = client.generate("Issue Title: Crash").await.unwrap();

        assert_eq!(text, "### 检查状态\nFAIL");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn gemini_http_error_is_provider_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(429).body("quota exceeded");
            })
            .await;

        let config = config_for("gemini", &server.base_url(), "gemini-2.5-flash");
        let client = GeminiClient::new(&config, "test-key".into()).unwrap();
        let err = client.generate("hi").await.unwrap_err();

        assert!(matches!(err, WardenError::Provider(_)));
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn openai_generate_returns_message_content() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("Authorization", "Bearer test-key");
                then.status(200).json_body(json!({
                    "choices": [{"message": {"role": "assistant", "content": "PASS"}}]
                }));
            })
            .await;

        let config = config_for("openai", &server.base_url(), "gpt-4o");
        let client = OpenAiClient::new(&config, "test-key".into()).unwrap();
        assert_eq!(client.generate("check").await.unwrap(), "PASS");
        mock.assert_async().await;
    }
}
