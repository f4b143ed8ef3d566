use crate::providers::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunErrorKind {
    MissingInput,
    InputParse,
    InvalidArgs,
    ProviderRateLimit,
    ProviderTimeout,
    ProviderServer,
    ProviderRejected,
    Network,
    Write,
    IncompleteRun,
    VerifyFailed,
}

impl RunErrorKind {
    /// Input or argument problems the user fixes before re-running.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            RunErrorKind::MissingInput | RunErrorKind::InputParse | RunErrorKind::InvalidArgs
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RunError {
    pub kind: RunErrorKind,
    pub message: String,
    pub path: Option<String>,
    pub status: Option<u16>,
    pub provider: Option<String>,
    pub detail: Option<String>,
}

impl RunError {
    pub fn new(kind: RunErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: None,
            status: None,
            provider: None,
            detail: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn missing_input(path: impl Into<String>, detail: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            RunErrorKind::MissingInput,
            format!("input file not found: {}", path),
        )
        .with_path(path)
        .with_detail(detail)
    }

    pub fn input_parse(path: impl Into<String>, detail: impl Into<String>) -> Self {
        let path = path.into();
        let detail = detail.into();
        Self::new(
            RunErrorKind::InputParse,
            format!("malformed input {}: {}", path, detail),
        )
        .with_path(path)
        .with_detail(detail)
    }

    pub fn invalid_args(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(RunErrorKind::InvalidArgs, detail.clone()).with_detail(detail)
    }

    pub fn write(path: impl Into<String>, detail: impl Into<String>) -> Self {
        let path = path.into();
        let detail = detail.into();
        Self::new(
            RunErrorKind::Write,
            format!("failed to write {}: {}", path, detail),
        )
        .with_path(path)
        .with_detail(detail)
    }

    pub fn incomplete_run(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(
            RunErrorKind::IncompleteRun,
            format!("incomplete run: {}", detail),
        )
        .with_detail(detail)
    }

    pub fn verify_failed(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self::new(
            RunErrorKind::VerifyFailed,
            format!("verification failed: {}", detail),
        )
        .with_detail(detail)
    }

    /// Read failures on input files: not-found is reported separately from
    /// permission or encoding problems.
    pub fn from_read(path: &std::path::Path, err: &std::io::Error) -> Self {
        let shown = path.display().to_string();
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::missing_input(shown, err.to_string())
        } else {
            Self::input_parse(shown, err.to_string())
        }
    }

    /// Provider failure for one (prompt, mode) call.
    pub fn from_provider(err: &ProviderError, prompt_id: &str) -> Self {
        let kind = match err {
            ProviderError::RateLimited { .. } => RunErrorKind::ProviderRateLimit,
            ProviderError::Timeout { .. } => RunErrorKind::ProviderTimeout,
            ProviderError::Server { .. } => RunErrorKind::ProviderServer,
            ProviderError::Network { .. } => RunErrorKind::Network,
            ProviderError::MissingApiKey { .. } => RunErrorKind::InvalidArgs,
            ProviderError::Rejected { .. }
            | ProviderError::MalformedResponse { .. }
            | ProviderError::MissingCanned { .. } => RunErrorKind::ProviderRejected,
        };
        let mut run_error = Self::new(kind, format!("prompt {}: {}", prompt_id, err))
            .with_detail(err.to_string());
        if let Some(provider) = err.provider() {
            run_error = run_error.with_provider(provider);
        }
        if let Some(status) = err.status() {
            run_error = run_error.with_status(status);
        }
        run_error
    }
}

#[cfg(test)]
mod tests {
    use super::{RunError, RunErrorKind};
    use crate::providers::ProviderError;
    use std::path::Path;

    #[test]
    fn typed_constructors_capture_stable_fields() {
        let missing = RunError::missing_input("prompts.json", "os error 2");
        assert_eq!(missing.kind, RunErrorKind::MissingInput);
        assert_eq!(missing.path.as_deref(), Some("prompts.json"));
        assert_eq!(missing.detail.as_deref(), Some("os error 2"));
        assert!(missing.kind.is_config());

        let write = RunError::write("out/key.json", "read-only file system");
        assert_eq!(write.kind, RunErrorKind::Write);
        assert!(!write.kind.is_config());
        assert!(write.to_string().contains("out/key.json"));
    }

    #[test]
    fn read_errors_split_not_found_from_other_failures() {
        let nf = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(
            RunError::from_read(Path::new("x.json"), &nf).kind,
            RunErrorKind::MissingInput
        );
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert_eq!(
            RunError::from_read(Path::new("x.json"), &denied).kind,
            RunErrorKind::InputParse
        );
    }

    #[test]
    fn provider_errors_map_to_run_kinds() {
        let err = ProviderError::RateLimited {
            provider: "openai".into(),
            status: 429,
            detail: "slow down".into(),
        };
        let run_error = RunError::from_provider(&err, "F1");
        assert_eq!(run_error.kind, RunErrorKind::ProviderRateLimit);
        assert_eq!(run_error.status, Some(429));
        assert_eq!(run_error.provider.as_deref(), Some("openai"));
        assert!(run_error.message.starts_with("prompt F1:"));

        let missing_key = ProviderError::MissingApiKey {
            var: "ANTHROPIC_API_KEY",
        };
        assert_eq!(
            RunError::from_provider(&missing_key, "F1").kind,
            RunErrorKind::InvalidArgs
        );
    }
}
