use crate::caller::Caller;
use crate::config::{FailurePolicy, RunConfig};
use crate::errors::RunError;
use crate::instructions::Instructions;
use crate::model::{LogEntry, Mode, Prompt};
use crate::providers::LlmClient;
use crate::recorder::{Recorder, OUTPUTS_DIR};
use crate::report::console::{emit_progress_line, format_call_line, format_progress_line};
use crate::report::{build_report, write_report};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub prompts: usize,
    pub calls: usize,
    pub failures: usize,
    pub outputs_dir: PathBuf,
    pub log_path: PathBuf,
    pub comparison_path: PathBuf,
    pub key_path: PathBuf,
}

/// Drives one experiment: every prompt under both modes, one call at a time.
pub struct ExperimentRunner {
    config: RunConfig,
    caller: Caller,
    progress: bool,
}

impl ExperimentRunner {
    pub fn new(config: RunConfig, client: Arc<dyn LlmClient>) -> Self {
        let caller = Caller::new(
            client,
            config.model.clone(),
            config.temperature,
            config.max_output_tokens,
        )
        .with_cooldown(config.sleep);
        Self {
            config,
            caller,
            progress: true,
        }
    }

    /// Toggle the `[i/n] Processing ...` lines on stderr.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Issue every prompt under both modes, record each call as it returns, then
    /// write the blinded comparison and its key.
    ///
    /// Prompts run in file order. The order of the two calls within a prompt comes
    /// from a generator seeded once with the run seed, so it is reproducible and
    /// has no bearing on slot assignment. The configured pause separates
    /// consecutive calls.
    pub async fn run(
        &self,
        prompts: &[Prompt],
        instructions: &Instructions,
    ) -> Result<RunSummary, RunError> {
        if prompts.is_empty() {
            return Err(RunError::invalid_args("no prompts to run"));
        }

        let recorder = Recorder::create(&self.config.out_dir)?;
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut records: Vec<LogEntry> = Vec::with_capacity(prompts.len() * Mode::ALL.len());
        let mut calls = 0usize;
        let mut failures = 0usize;

        info!(
            provider = self.caller.provider_name(),
            model = self.caller.model(),
            seed = self.config.seed,
            prompts = prompts.len(),
            "starting run"
        );

        for (i, prompt) in prompts.iter().enumerate() {
            self.emit(&format_progress_line(i + 1, prompts.len(), prompt));

            let mut order = Mode::ALL;
            order.shuffle(&mut rng);

            for mode in order {
                if calls > 0 && !self.config.sleep.is_zero() {
                    tokio::time::sleep(self.config.sleep).await;
                }
                calls += 1;

                let rec = match self
                    .caller
                    .call(prompt, mode, instructions.for_mode(mode))
                    .await
                {
                    Ok(rec) => {
                        self.emit(&format_call_line(mode, rec.latency_s, false));
                        rec
                    }
                    Err(failure) => {
                        failures += 1;
                        self.emit(&format_call_line(mode, failure.latency_s, true));
                        match self.config.failure_policy {
                            FailurePolicy::Abort => {
                                return Err(RunError::from_provider(
                                    &failure.error,
                                    &format!("{} ({})", prompt.id, mode),
                                ));
                            }
                            FailurePolicy::Record => {
                                warn!(
                                    prompt_id = %prompt.id,
                                    %mode,
                                    "call failed, recording placeholder: {}",
                                    failure.error
                                );
                                self.caller.error_record(prompt, mode, &failure)
                            }
                        }
                    }
                };

                recorder.record(&rec)?;
                records.push(rec.lean());
            }
        }

        let report = build_report(&records, &self.config.report_meta())?;
        let written = write_report(recorder.out_dir(), &report)?;
        info!(
            calls,
            failures,
            comparison = %written.comparison_path.display(),
            "run complete"
        );

        Ok(RunSummary {
            prompts: prompts.len(),
            calls,
            failures,
            outputs_dir: recorder.out_dir().join(OUTPUTS_DIR),
            log_path: recorder.log_path().to_path_buf(),
            comparison_path: written.comparison_path,
            key_path: written.key_path,
        })
    }

    fn emit(&self, line: &str) {
        if self.progress {
            emit_progress_line(line);
        }
    }
}
