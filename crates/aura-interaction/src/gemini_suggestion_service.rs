//! GeminiSuggestionService - Gemini REST client that proposes shell actions.
//!
//! The request carries the previous session's turns as chat history, then a
//! single user message asking for one bare shell command. The reply is passed
//! through [`sanitize_action`] before it reaches the resolver.

use async_trait::async_trait;
use aura_core::config::{GeminiConfig, GeminiSecret};
use aura_core::session::{ConversationContext, MessageRole};
use aura_core::suggestion::{sanitize_action, CommandSuggester, SuggestionError};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Builds the instruction sent for a description.
pub fn suggestion_prompt(description: &str) -> String {
    format!(
        "Suggest a command that can be executed in shell and perform this action : {}. \
         Only write the command and nothing else. not even quotation marks or endline characters.",
        description.trim()
    )
}

#[derive(Clone)]
pub struct GeminiSuggestionService {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    history: Vec<Content>,
    retry: RetryPolicy,
}

impl GeminiSuggestionService {
    /// Creates the service; `credentials == None` is allowed and surfaces as
    /// [`SuggestionError::Config`] on the first call.
    pub fn new(credentials: Option<GeminiSecret>, config: &GeminiConfig) -> Self {
        let (api_key, model) = match credentials {
            Some(secret) => (
                Some(secret.api_key),
                secret.model_name.unwrap_or_else(|| config.model.clone()),
            ),
            None => (None, config.model.clone()),
        };

        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: BASE_URL.to_string(),
            history: Vec::new(),
            retry: RetryPolicy::from_config(config),
        }
    }

    /// Seeds the chat history from a previous session.
    pub fn with_context(mut self, context: &ConversationContext) -> Self {
        self.history = context
            .messages()
            .into_iter()
            .map(|message| Content::text(gemini_role(message.role), message.content))
            .collect();
        self
    }

    /// Overrides the API endpoint root (e.g. for a proxy).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, description: &str) -> GenerateContentRequest {
        let mut contents = self.history.clone();
        contents.push(Content::text("user", suggestion_prompt(description)));
        GenerateContentRequest { contents }
    }

    async fn send_request(
        &self,
        api_key: &str,
        body: &GenerateContentRequest,
    ) -> Result<String, SuggestionError> {
        let url = format!(
            "{}/{model}:generateContent",
            self.base_url.trim_end_matches('/'),
            model = self.model
        );

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| SuggestionError::Request {
                message: format!("Gemini API request failed: {err}"),
                retryable: err.is_connect() || err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| SuggestionError::Parse(format!("Failed to parse Gemini response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl CommandSuggester for GeminiSuggestionService {
    async fn suggest(&self, description: &str) -> Result<String, SuggestionError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            SuggestionError::Config(
                "Gemini API key not found in secret.json or GEMINI_API_KEY".to_string(),
            )
        })?;

        let request = self.build_request(description);
        let raw = self
            .retry
            .run(|attempt| {
                tracing::debug!(attempt, model = %self.model, "requesting command suggestion");
                self.send_request(api_key, &request)
            })
            .await?;

        sanitize_action(&raw).ok_or_else(|| {
            SuggestionError::Parse("Gemini returned no usable command".to_string())
        })
    }
}

fn gemini_role(role: MessageRole) -> &'static str {
    match role {
        MessageRole::User => "user",
        MessageRole::Assistant => "model",
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Clone, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn extract_text_response(response: GenerateContentResponse) -> Result<String, SuggestionError> {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .ok_or_else(|| {
            SuggestionError::Parse("Gemini API returned no text in the response candidates".into())
        })
}

fn map_http_error(status: StatusCode, body: &str) -> SuggestionError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::TOO_MANY_REQUESTS => SuggestionError::Quota(message),
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => SuggestionError::Request {
            message: format!("{}: {}", status.as_u16(), message),
            retryable: true,
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            SuggestionError::Config(format!("{}: {}", status.as_u16(), message))
        }
        _ => SuggestionError::request(format!("{}: {}", status.as_u16(), message)),
    }
}
