//! Shared argument types used across multiple commands.

use clap::ValueEnum;
use diastole_core::config::{
    FailurePolicy, ProviderKind, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE,
    DEFAULT_TIMEOUT_SECS,
};
use std::path::PathBuf;

#[derive(clap::Args, Clone, Debug)]
pub struct ProviderArgs {
    /// Backend to call
    /// - openai: OpenAI Responses API (reads OPENAI_API_KEY)
    /// - anthropic: Anthropic Messages API (reads ANTHROPIC_API_KEY)
    /// - canned: fixed responses from --canned-responses, no network
    #[arg(long, default_value = "openai", env = "DIASTOLIC_PROVIDER")]
    pub provider: ProviderKind,

    /// Model identifier (provider-specific)
    /// Default: gpt-4.1 (openai), claude-sonnet-4-20250514 (anthropic)
    #[arg(long, env = "DIASTOLIC_MODEL")]
    pub model: Option<String>,

    #[arg(long, default_value_t = DEFAULT_TEMPERATURE, env = "DIASTOLIC_TEMPERATURE")]
    pub temperature: f32,

    #[arg(long, default_value_t = DEFAULT_MAX_OUTPUT_TOKENS)]
    pub max_output_tokens: u32,

    /// Per-request HTTP timeout
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// JSON file of fixed responses for --provider canned
    #[arg(long)]
    pub canned_responses: Option<PathBuf>,

    /// Overrides the provider's API key variable
    #[arg(long, hide = true)]
    pub api_key: Option<String>,
}

impl Default for ProviderArgs {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            canned_responses: None,
            api_key: None,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OnError {
    /// Stop at the first failed call
    #[default]
    Abort,
    /// Write an [ERROR: ...] placeholder and keep going
    Record,
}

impl From<OnError> for FailurePolicy {
    fn from(v: OnError) -> Self {
        match v {
            OnError::Abort => FailurePolicy::Abort,
            OnError::Record => FailurePolicy::Record,
        }
    }
}
