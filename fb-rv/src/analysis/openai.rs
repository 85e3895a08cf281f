//! OpenAI-compatible chat completion analyzer
//!
//! One request per review, no retries. Any failure (transport, timeout,
//! non-success status, empty completion, unparsable content) yields
//! [`AnalysisResult::fallback`]. A parsed object with missing fields keeps
//! what the service returned and defaults only the gaps.

use async_trait::async_trait;
use fb_common::config::AnalysisSettings;
use fb_common::AiAction;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::{AnalysisError, AnalysisResult, ReviewAnalyzer};
use crate::validator::Rating;

const USER_AGENT: &str = concat!("fb-rv/", env!("CARGO_PKG_VERSION"));

const SYSTEM_PROMPT: &str = "You are a review analyzer. Return ONLY valid JSON with: \
user_response (string), summary (string), action (string: positive/negative/neutral). \
No markdown, no code blocks, just JSON.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Analyzer backed by an OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiAnalyzer {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiAnalyzer {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AnalysisError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AnalysisError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            model: model.into(),
            temperature: 0.7,
            max_tokens: 200,
        })
    }

    pub fn from_settings(settings: &AnalysisSettings) -> Result<Self, AnalysisError> {
        let api_key = settings.credential().unwrap_or_default();
        let mut analyzer = Self::new(
            api_key,
            &settings.base_url,
            settings.model.clone(),
            settings.timeout(),
        )?;
        analyzer.temperature = settings.temperature;
        analyzer.max_tokens = settings.max_tokens;

        Ok(analyzer)
    }

    /// Single attempt against the completion endpoint
    async fn request(&self, text: &str, rating: Rating) -> Result<AnalysisResult, AnalysisError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: format!("Analyze this review (rating: {}/5): \"{}\"", rating.get(), text),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(endpoint = %self.endpoint, rating = rating.get(), "Requesting review analysis");

        let response = self
            .http_client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnalysisError::Api(status.as_u16()));
        }

        let completion: ChatResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AnalysisError::Timeout
            } else {
                AnalysisError::Parse(e.to_string())
            }
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(AnalysisError::EmptyCompletion)?;

        parse_analysis(&content, text)
    }
}

#[async_trait]
impl ReviewAnalyzer for OpenAiAnalyzer {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn analyze(&self, text: &str, rating: Rating) -> AnalysisResult {
        match self.request(text, rating).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Review analysis failed, using fallback");
                AnalysisResult::fallback(text, e)
            }
        }
    }
}

fn transport_error(e: reqwest::Error) -> AnalysisError {
    if e.is_timeout() {
        AnalysisError::Timeout
    } else {
        AnalysisError::Network(e.to_string())
    }
}

/// Remove a surrounding ```` ``` ```` / ```` ```json ```` fence, if any
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    let rest = rest.trim_end();
    let rest = rest.strip_suffix("```").unwrap_or(rest);

    rest.trim()
}

/// Parse completion text into a result, defaulting missing fields
///
/// The content must be a JSON object. Absent, empty, or non-string fields
/// default to the review text (`user_response`), `""` (`summary`), and
/// neutral (`action`). An unrecognized action label also counts as absent.
fn parse_analysis(content: &str, text: &str) -> Result<AnalysisResult, AnalysisError> {
    let value: Value = serde_json::from_str(strip_code_fence(content))
        .map_err(|e| AnalysisError::Parse(e.to_string()))?;

    let Value::Object(fields) = value else {
        return Err(AnalysisError::Parse("expected a JSON object".to_string()));
    };

    let action = match string_field(&fields, "action") {
        Some(label) => label.parse::<AiAction>().unwrap_or_else(|e| {
            debug!(error = %e, "Ignoring unrecognized action label");
            AiAction::Neutral
        }),
        None => AiAction::Neutral,
    };

    Ok(AnalysisResult {
        user_response: string_field(&fields, "user_response")
            .unwrap_or(text)
            .to_string(),
        summary: string_field(&fields, "summary").unwrap_or_default().to_string(),
        action,
    })
}

fn string_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
