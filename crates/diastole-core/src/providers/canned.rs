use super::{CompletionRequest, LlmClient, LlmResponse, ProviderError};
use crate::errors::RunError;
use crate::model::Mode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CannedResponse {
    pub prompt_id: String,
    pub mode: Mode,
    pub output_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CannedFile {
    pub responses: Vec<CannedResponse>,
}

/// Offline backend answering from a fixed `(prompt_id, mode) -> text` table.
#[derive(Debug, Default)]
pub struct CannedClient {
    responses: BTreeMap<(String, Mode), String>,
}

impl CannedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(
        mut self,
        prompt_id: impl Into<String>,
        mode: Mode,
        text: impl Into<String>,
    ) -> Self {
        self.responses.insert((prompt_id.into(), mode), text.into());
        self
    }

    pub fn load(path: &Path) -> Result<Self, RunError> {
        let raw = std::fs::read_to_string(path).map_err(|e| RunError::from_read(path, &e))?;
        Self::parse(&raw, &path.display().to_string())
    }

    pub fn parse(raw: &str, origin: &str) -> Result<Self, RunError> {
        let file: CannedFile =
            serde_json::from_str(raw).map_err(|e| RunError::input_parse(origin, e.to_string()))?;
        let mut client = Self::new();
        for r in file.responses {
            let key = (r.prompt_id, r.mode);
            if client.responses.contains_key(&key) {
                return Err(RunError::input_parse(
                    origin,
                    format!("duplicate canned response for {} ({})", key.0, key.1),
                ));
            }
            client.responses.insert(key, r.output_text);
        }
        Ok(client)
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

#[async_trait]
impl LlmClient for CannedClient {
    async fn complete(&self, req: &CompletionRequest<'_>) -> Result<LlmResponse, ProviderError> {
        let text = self
            .responses
            .get(&(req.prompt_id.to_string(), req.mode))
            .cloned()
            .ok_or_else(|| ProviderError::MissingCanned {
                prompt_id: req.prompt_id.to_string(),
                mode: req.mode,
            })?;

        Ok(LlmResponse {
            text,
            provider: "canned".to_string(),
            model: req.model.to_string(),
            raw: serde_json::json!({ "canned": true, "prompt_id": req.prompt_id }),
        })
    }

    fn provider_name(&self) -> &'static str {
        "canned"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ChatMessage;

    fn request<'a>(
        prompt_id: &'a str,
        mode: Mode,
        messages: &'a [ChatMessage],
    ) -> CompletionRequest<'a> {
        CompletionRequest {
            prompt_id,
            mode,
            system: "sys",
            messages,
            model: "canned",
            temperature: 0.0,
            max_output_tokens: 16,
        }
    }

    #[tokio::test]
    async fn serves_response_per_prompt_and_mode() {
        let client = CannedClient::new()
            .with_response("F1", Mode::Continuous, "plain")
            .with_response("F1", Mode::Diastolic, "paused");
        let messages = vec![ChatMessage::user("q")];

        let c = client
            .complete(&request("F1", Mode::Continuous, &messages))
            .await
            .unwrap();
        let d = client
            .complete(&request("F1", Mode::Diastolic, &messages))
            .await
            .unwrap();
        assert_eq!(c.text, "plain");
        assert_eq!(d.text, "paused");
        assert_eq!(c.provider, "canned");

        let err = client
            .complete(&request("F2", Mode::Continuous, &messages))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::MissingCanned { .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn rejects_duplicate_entries() {
        let raw = r#"{"responses":[
            {"prompt_id":"F1","mode":"continuous","output_text":"a"},
            {"prompt_id":"F1","mode":"continuous","output_text":"b"}
        ]}"#;
        let err = CannedClient::parse(raw, "canned.json").unwrap_err();
        assert!(err.message.contains("duplicate canned response"));
    }
}
