use super::super::args::ProviderArgs;
use diastole_core::caller::Caller;
use diastole_core::config::RunConfig;
use diastole_core::errors::RunError;
use diastole_core::providers::build_client;
use std::time::Duration;

/// Provider settings from flags and environment. The API key comes from
/// `--api-key`, else from the provider's own variable (`OPENAI_API_KEY`,
/// `ANTHROPIC_API_KEY`).
pub(crate) fn run_config(args: &ProviderArgs) -> RunConfig {
    let kind = args.provider;
    let model = args
        .model
        .clone()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| kind.default_model().to_string());
    let api_key = args
        .api_key
        .clone()
        .or_else(|| kind.api_key_env().and_then(|var| std::env::var(var).ok()));

    RunConfig {
        provider: kind,
        model,
        temperature: args.temperature,
        max_output_tokens: args.max_output_tokens,
        request_timeout: Duration::from_secs(args.timeout_secs),
        api_key,
        canned_responses: args.canned_responses.clone(),
        ..RunConfig::default()
    }
}

/// Caller for ad-hoc (non-blinded) use such as the conversation probe.
pub(crate) fn build_caller(cfg: &RunConfig) -> Result<Caller, RunError> {
    let client = build_client(cfg)?;
    Ok(Caller::new(
        client,
        cfg.model.clone(),
        cfg.temperature,
        cfg.max_output_tokens,
    )
    .with_cooldown(cfg.sleep))
}

pub(crate) fn ensure_dir(dir: &std::path::Path) -> Result<(), RunError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| RunError::write(dir.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use diastole_core::config::ProviderKind;

    #[test]
    fn model_defaults_per_provider() {
        let args = ProviderArgs {
            provider: ProviderKind::Anthropic,
            model: Some("  ".into()),
            api_key: Some("k".into()),
            ..ProviderArgs::default()
        };
        let cfg = run_config(&args);
        assert_eq!(cfg.model, "claude-sonnet-4-20250514");
        assert_eq!(cfg.api_key.as_deref(), Some("k"));
        assert_eq!(cfg.request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn canned_needs_no_key() {
        let args = ProviderArgs {
            provider: ProviderKind::Canned,
            ..ProviderArgs::default()
        };
        let cfg = run_config(&args);
        assert_eq!(cfg.model, "canned");
        assert!(cfg.api_key.is_none());
    }
}
