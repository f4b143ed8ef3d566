use crate::model::{round_latency, Mode, Prompt, ResponseRecord};
use crate::providers::{ChatMessage, CompletionRequest, LlmClient, LlmResponse, ProviderError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Issues one completion per (prompt, mode) against the configured backend.
pub struct Caller {
    client: Arc<dyn LlmClient>,
    model: String,
    temperature: f32,
    max_output_tokens: u32,
    /// Wait applied once after a transient failure, before the error is surfaced.
    cooldown: Duration,
}

/// A failed call, with how long it took to fail.
#[derive(Debug)]
pub struct CallFailure {
    pub error: ProviderError,
    pub latency_s: f64,
}

impl Caller {
    pub fn new(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        temperature: f32,
        max_output_tokens: u32,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            temperature,
            max_output_tokens,
            cooldown: Duration::ZERO,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn provider_name(&self) -> &'static str {
        self.client.provider_name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    /// Single-turn call: `prompt` under the `mode` instruction.
    pub async fn call(
        &self,
        prompt: &Prompt,
        mode: Mode,
        instructions: &str,
    ) -> Result<ResponseRecord, CallFailure> {
        let messages = [ChatMessage::user(prompt.text.clone())];
        let (resp, latency_s) = self
            .complete(&prompt.id, mode, instructions, &messages)
            .await?;

        Ok(ResponseRecord {
            ts: utc_now(),
            prompt_id: prompt.id.clone(),
            category: prompt.category,
            mode,
            provider: resp.provider,
            model: self.model.clone(),
            temperature: self.temperature,
            latency_s,
            prompt: prompt.text.clone(),
            output_text: resp.text,
            error: None,
            raw_response: resp.raw,
        })
    }

    /// Multi-turn call with an explicit message history. Returns the response and
    /// its latency in seconds.
    pub async fn complete(
        &self,
        prompt_id: &str,
        mode: Mode,
        instructions: &str,
        messages: &[ChatMessage],
    ) -> Result<(LlmResponse, f64), CallFailure> {
        let req = CompletionRequest {
            prompt_id,
            mode,
            system: instructions,
            messages,
            model: &self.model,
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        };

        let started = Instant::now();
        let result = self.client.complete(&req).await;
        let latency_s = round_latency(started.elapsed().as_secs_f64());

        match result {
            Ok(resp) => {
                debug!(prompt_id, latency_s, chars = resp.text.len(), "call complete");
                Ok((resp, latency_s))
            }
            Err(error) => {
                if error.is_transient() && !self.cooldown.is_zero() {
                    warn!(
                        prompt_id,
                        "transient provider failure, cooling down {:?}: {}", self.cooldown, error
                    );
                    tokio::time::sleep(self.cooldown).await;
                }
                Err(CallFailure { error, latency_s })
            }
        }
    }

    /// Placeholder record written instead of a response when the run keeps going
    /// past a failed call.
    pub fn error_record(
        &self,
        prompt: &Prompt,
        mode: Mode,
        failure: &CallFailure,
    ) -> ResponseRecord {
        let message = failure.error.to_string();
        ResponseRecord {
            ts: utc_now(),
            prompt_id: prompt.id.clone(),
            category: prompt.category,
            mode,
            provider: self.client.provider_name().to_string(),
            model: self.model.clone(),
            temperature: self.temperature,
            latency_s: failure.latency_s,
            prompt: prompt.text.clone(),
            output_text: format!("[ERROR: {}]", message),
            error: Some(message.clone()),
            raw_response: serde_json::json!({ "error": message }),
        }
    }
}

pub fn utc_now() -> String {
    chrono::Utc::now().to_rfc3339()
}
