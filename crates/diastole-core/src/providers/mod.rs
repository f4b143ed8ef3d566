//! Model-completion backends.
//!
//! Every backend implements [`LlmClient`]; the caller never knows which wire
//! protocol sits behind it. `canned` serves fixed responses from a JSON file and
//! never touches the network.

pub mod anthropic;
pub mod canned;
pub mod openai;

use crate::config::{ProviderKind, RunConfig};
use crate::errors::RunError;
use crate::model::Mode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One completion call: a system instruction plus the conversation so far.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    /// Prompt (or conversation turn) id; only the canned backend looks at it.
    pub prompt_id: &'a str,
    pub mode: Mode,
    pub system: &'a str,
    pub messages: &'a [ChatMessage],
    pub model: &'a str,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    /// Provider response body, stored verbatim in the full record.
    pub raw: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("missing API key: set {var}")]
    MissingApiKey { var: &'static str },

    #[error("{provider} rate limit (status {status}): {detail}")]
    RateLimited {
        provider: String,
        status: u16,
        detail: String,
    },

    #[error("{provider} request timeout: {detail}")]
    Timeout { provider: String, detail: String },

    #[error("{provider} server error (status {status}): {detail}")]
    Server {
        provider: String,
        status: u16,
        detail: String,
    },

    #[error("{provider} rejected request (status {status}): {detail}")]
    Rejected {
        provider: String,
        status: u16,
        detail: String,
    },

    #[error("{provider} network error: {detail}")]
    Network { provider: String, detail: String },

    #[error("{provider} response missing output text: {detail}")]
    MalformedResponse { provider: String, detail: String },

    #[error("no canned response for prompt {prompt_id}")]
    MissingCanned { prompt_id: String, mode: Mode },
}

impl ProviderError {
    /// Map a non-success HTTP status to the matching variant.
    pub fn from_status(provider: &str, status: u16, body: String) -> Self {
        let provider = provider.to_string();
        match status {
            429 => Self::RateLimited {
                provider,
                status,
                detail: body,
            },
            408 | 504 => Self::Timeout {
                provider,
                detail: format!("status {}: {}", status, body),
            },
            500..=599 => Self::Server {
                provider,
                status,
                detail: body,
            },
            _ => Self::Rejected {
                provider,
                status,
                detail: body,
            },
        }
    }

    pub fn from_reqwest(provider: &str, err: &reqwest::Error) -> Self {
        let provider = provider.to_string();
        if err.is_timeout() {
            Self::Timeout {
                provider,
                detail: err.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::from_status(&provider, status.as_u16(), err.to_string())
        } else {
            Self::Network {
                provider,
                detail: err.to_string(),
            }
        }
    }

    /// Failures worth a cool-down before surfacing (rate limits, timeouts, 5xx, network).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::Timeout { .. }
                | Self::Server { .. }
                | Self::Network { .. }
        )
    }

    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::RateLimited { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::Server { provider, .. }
            | Self::Rejected { provider, .. }
            | Self::Network { provider, .. }
            | Self::MalformedResponse { provider, .. } => Some(provider),
            Self::MissingCanned { .. } => Some("canned"),
            Self::MissingApiKey { .. } => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { status, .. }
            | Self::Server { status, .. }
            | Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, req: &CompletionRequest<'_>) -> Result<LlmResponse, ProviderError>;

    fn provider_name(&self) -> &'static str;
}

pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::Client, RunError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RunError::invalid_args(format!("failed to build HTTP client: {}", e)))
}

/// Build the backend selected by `cfg.provider`.
pub fn build_client(cfg: &RunConfig) -> Result<Arc<dyn LlmClient>, RunError> {
    match cfg.provider {
        ProviderKind::OpenAi => {
            let api_key = require_key(cfg, "OPENAI_API_KEY")?;
            let client = openai::OpenAIClient::new(api_key, http_client(cfg.request_timeout)?);
            Ok(Arc::new(client))
        }
        ProviderKind::Anthropic => {
            let api_key = require_key(cfg, "ANTHROPIC_API_KEY")?;
            let client =
                anthropic::AnthropicClient::new(api_key, http_client(cfg.request_timeout)?);
            Ok(Arc::new(client))
        }
        ProviderKind::Canned => {
            let path = cfg.canned_responses.as_ref().ok_or_else(|| {
                RunError::invalid_args("--provider canned requires --canned-responses <file>")
            })?;
            let client = canned::CannedClient::load(path)?;
            if client.is_empty() {
                return Err(RunError::input_parse(
                    path.display().to_string(),
                    "no canned responses",
                ));
            }
            tracing::debug!(responses = client.len(), "loaded canned responses");
            Ok(Arc::new(client))
        }
    }
}

fn require_key(cfg: &RunConfig, var: &'static str) -> Result<String, RunError> {
    match cfg.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(
            RunError::invalid_args(ProviderError::MissingApiKey { var }.to_string())
                .with_provider(cfg.provider.as_str())
                .with_detail(format!("{} is not set", var)),
        ),
    }
}
