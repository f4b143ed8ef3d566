use crate::errors::RunError;
use crate::report::ReportMeta;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_PROVIDER: &str = "DIASTOLIC_PROVIDER";
pub const ENV_MODEL: &str = "DIASTOLIC_MODEL";
pub const ENV_TEMPERATURE: &str = "DIASTOLIC_TEMPERATURE";

pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_SEED: u64 = 12345;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 1024;
pub const DEFAULT_SLEEP_SECS: f64 = 0.5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Anthropic,
    Canned,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Canned => "canned",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "gpt-4.1",
            ProviderKind::Anthropic => "claude-sonnet-4-20250514",
            ProviderKind::Canned => "canned",
        }
    }

    /// Environment variable holding the API key, if the provider needs one.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Canned => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "canned" => Ok(ProviderKind::Canned),
            other => Err(format!(
                "unknown provider '{other}' (expected openai|anthropic|canned)"
            )),
        }
    }
}

/// What a run does when a call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run and report the failing prompt.
    #[default]
    Abort,
    /// Write an `[ERROR: ...]` placeholder record and continue.
    Record,
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub temperature: f32,
    pub seed: u64,
    pub max_output_tokens: u32,
    /// Pause between consecutive calls.
    pub sleep: Duration,
    pub request_timeout: Duration,
    pub failure_policy: FailurePolicy,
    pub prompts_path: PathBuf,
    pub instructions_dir: PathBuf,
    pub out_dir: PathBuf,
    pub api_key: Option<String>,
    pub canned_responses: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            model: ProviderKind::OpenAi.default_model().to_string(),
            temperature: DEFAULT_TEMPERATURE,
            seed: DEFAULT_SEED,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            sleep: Duration::from_secs_f64(DEFAULT_SLEEP_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            failure_policy: FailurePolicy::Abort,
            prompts_path: PathBuf::from("prompts.json"),
            instructions_dir: PathBuf::from("."),
            out_dir: PathBuf::from("."),
            api_key: None,
            canned_responses: None,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), RunError> {
        if self.model.trim().is_empty() {
            return Err(RunError::invalid_args("model must not be empty"));
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(RunError::invalid_args(format!(
                "temperature must be within 0.0..=2.0 (got {})",
                self.temperature
            )));
        }
        if self.max_output_tokens == 0 {
            return Err(RunError::invalid_args("max output tokens must be > 0"));
        }
        if self.request_timeout.is_zero() {
            return Err(RunError::invalid_args("request timeout must be > 0"));
        }
        if self.provider == ProviderKind::Canned && self.canned_responses.is_none() {
            return Err(RunError::invalid_args(
                "--provider canned requires --canned-responses <file>",
            ));
        }
        Ok(())
    }

    pub fn report_meta(&self) -> ReportMeta {
        ReportMeta {
            provider: self.provider.as_str().to_string(),
            model: self.model.clone(),
            temperature: self.temperature,
            seed: self.seed,
        }
    }
}

/// Parse a `--sleep` style seconds value into a duration.
pub fn parse_seconds(secs: f64) -> Result<Duration, RunError> {
    Duration::try_from_secs_f64(secs).map_err(|e| {
        RunError::invalid_args(format!(
            "sleep must be a non-negative number of seconds (got {}): {}",
            secs, e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_case_insensitively() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(
            "claude".parse::<ProviderKind>().unwrap(),
            ProviderKind::Anthropic
        );
        assert!("gemini".parse::<ProviderKind>().is_err());
        assert_eq!(ProviderKind::Canned.api_key_env(), None);
    }

    #[test]
    fn default_config_is_valid() {
        RunConfig::default().validate().unwrap();
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let hot = RunConfig {
            temperature: 3.5,
            ..RunConfig::default()
        };
        assert!(hot.validate().unwrap_err().message.contains("temperature"));

        let nan = RunConfig {
            temperature: f32::NAN,
            ..RunConfig::default()
        };
        assert!(nan.validate().is_err());

        let empty = RunConfig {
            model: "  ".into(),
            ..RunConfig::default()
        };
        assert!(empty.validate().is_err());

        let no_tokens = RunConfig {
            max_output_tokens: 0,
            ..RunConfig::default()
        };
        assert!(no_tokens.validate().is_err());
    }

    #[test]
    fn seconds_must_be_non_negative() {
        assert_eq!(parse_seconds(0.25).unwrap(), Duration::from_millis(250));
        assert!(parse_seconds(-1.0).is_err());
        assert!(parse_seconds(f64::INFINITY).is_err());
        assert!(parse_seconds(f64::NAN).is_err());
        assert_eq!(
            parse_seconds(1e30).unwrap_err().kind,
            crate::errors::RunErrorKind::InvalidArgs
        );
    }
}
