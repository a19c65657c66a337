//! The conversational advice collaborator.
//!
//! Advice comes from an OpenAI-compatible `/chat/completions` endpoint. The request carries a
//! system prompt built from a precomputed spending summary, followed by the conversation so far.
//! The reply text is returned as-is.

use crate::analytics::{CategoryTotal, DashboardSummary, LimitProgress};
use crate::error::{Error, ErrorType, Res};
use crate::model::{Amount, User};
use anyhow::{bail, Context};
use async_trait::async_trait;
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

/// How long to wait for the provider before giving up.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 600;
const CURSOR_BASE_URL: &str = "https://api.cursor.sh/v1";

/// The supported advice providers. All of them speak the OpenAI chat completions protocol.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Provider {
    #[default]
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "groq")]
    Groq,
    #[serde(rename = "openai")]
    OpenAi,
    /// Any OpenAI-compatible server, reached through `AiSettings::base_url`.
    #[serde(rename = "cursor")]
    Cursor,
}

serde_plain::derive_display_from_serialize!(Provider);
serde_plain::derive_fromstr_from_deserialize!(Provider);

impl Provider {
    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "meta-llama/llama-3.1-70b-instruct:free",
            Provider::Groq => "llama3-70b-8192",
            Provider::OpenAi | Provider::Cursor => "gpt-4o-mini",
        }
    }

    /// The environment variable that holds this provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "OPENROUTER_API_KEY",
            Provider::Groq => "GROQ_API_KEY",
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Cursor => "CURSOR_API_KEY",
        }
    }

    /// The chat completions URL. `base_url` is only honored for `Cursor`.
    pub fn endpoint(&self, base_url: Option<&str>) -> Res<Url> {
        let url = match self {
            Provider::OpenRouter => "https://openrouter.ai/api/v1/chat/completions".to_string(),
            Provider::Groq => "https://api.groq.com/openai/v1/chat/completions".to_string(),
            Provider::OpenAi => "https://api.openai.com/v1/chat/completions".to_string(),
            Provider::Cursor => {
                let base = base_url.unwrap_or(CURSOR_BASE_URL);
                format!("{}/chat/completions", base.trim_end_matches('/'))
            }
        };
        Url::parse(&url).with_context(|| format!("Invalid advice endpoint '{url}'"))
    }
}

/// The advice settings stored in the config file.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AiSettings {
    pub provider: Provider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl AiSettings {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.provider.default_model())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}

/// The spending summary the advice is grounded on.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AdviceContext {
    pub monthly_budget: Amount,
    pub total_this_month: Amount,
    pub avg_daily: Amount,
    pub top_categories: Vec<CategoryTotal>,
    pub limit_progress: Vec<LimitProgress>,
}

impl AdviceContext {
    pub fn new(user: &User, summary: &DashboardSummary) -> Self {
        Self {
            monthly_budget: user.monthly_budget(),
            total_this_month: summary.total_this_month,
            avg_daily: summary.avg_daily,
            top_categories: summary.top_categories.clone(),
            limit_progress: summary.limit_progress.clone(),
        }
    }

    pub fn system_prompt(&self) -> String {
        let top = if self.top_categories.is_empty() {
            "n/a".to_string()
        } else {
            self.top_categories
                .iter()
                .map(|c| format!("{} {}", c.category, c.amount))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let limits = if self.limit_progress.is_empty() {
            "n/a".to_string()
        } else {
            self.limit_progress
                .iter()
                .map(|l| {
                    format!(
                        "{} {}% ({}/{})",
                        l.category,
                        l.percentage
                            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
                        l.spent,
                        l.limit
                    )
                })
                .collect::<Vec<_>>()
                .join("; ")
        };
        format!(
            "You are a friendly personal finance assistant. Give practical, short, and specific \
             budgeting advice. Use the provided user context to ground suggestions. Avoid generic \
             disclaimers.\n\
             \n\
             User context:\n\
             - Monthly budget: {}\n\
             - This month total: {}\n\
             - Avg daily spend: {}\n\
             - Top categories: {top}\n\
             - Limits: {limits}",
            self.monthly_budget, self.total_this_month, self.avg_daily
        )
    }
}

/// Something that can produce budgeting advice.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Returns the reply to the conversation in `history`, grounded on `context`.
    async fn generate_advice(&self, history: &[ChatMessage], context: &AdviceContext)
        -> Res<String>;
}

/// Finds the API key for `provider`: `explicit` if given, otherwise the provider's environment
/// variable.
pub fn resolve_api_key(provider: Provider, explicit: Option<&str>) -> Option<String> {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(provider.api_key_var()).ok())
        .filter(|key| !key.trim().is_empty())
}

/// An `Advisor` backed by an HTTP chat completions endpoint.
#[derive(Debug, Clone)]
pub struct AdviceClient {
    http: reqwest::Client,
    endpoint: Url,
    model: String,
    api_key: String,
}

impl AdviceClient {
    /// # Errors
    /// - A configuration error if `api_key` is missing or the endpoint is invalid.
    pub fn new(
        settings: &AiSettings,
        api_key: Option<String>,
        timeout: Duration,
    ) -> crate::Result<Self> {
        let Some(api_key) = api_key else {
            return Err(Error::new(
                ErrorType::Config,
                anyhow::anyhow!(
                    "Missing AI API key. Pass --api-key, or set EXPENSES_AI_API_KEY or {}.",
                    settings.provider.api_key_var()
                ),
            ));
        };
        let endpoint = settings
            .provider
            .endpoint(settings.base_url.as_deref())
            .map_err(|e| Error::new(ErrorType::Config, e))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::new(ErrorType::Internal, e))?;
        Ok(Self {
            http,
            endpoint,
            model: settings.model().to_string(),
            api_key,
        })
    }

    fn request<'a>(&'a self, history: &[ChatMessage], context: &AdviceContext) -> ChatRequest<'a> {
        let mut messages = vec![ChatMessage::system(context.system_prompt())];
        messages.extend(
            history
                .iter()
                .filter(|m| m.role != ChatRole::System)
                .cloned(),
        );
        ChatRequest {
            model: &self.model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        }
    }
}

#[async_trait]
impl Advisor for AdviceClient {
    async fn generate_advice(
        &self,
        history: &[ChatMessage],
        context: &AdviceContext,
    ) -> Res<String> {
        let body = self.request(history, context);
        debug!("Requesting advice from {} using {}", self.endpoint, self.model);
        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("AI request failed")?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("AI request failed: {} {}", status.as_u16(), text);
        }

        let reply: ChatResponse = response
            .json()
            .await
            .context("Unable to parse the AI response")?;
        trace!("{reply:?}");
        reply
            .content()
            .context("The AI response contained no message")
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    /// `choices[0].message.content`, falling back to `choices[0].text`.
    fn content(self) -> Option<String> {
        let first = self.choices.into_iter().next()?;
        first
            .message
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty())
            .or(first.text)
    }
}
