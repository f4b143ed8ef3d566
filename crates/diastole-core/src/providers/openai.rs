use super::{CompletionRequest, LlmClient, LlmResponse, ProviderError};
use async_trait::async_trait;
use serde_json::json;

const RESPONSES_URL: &str = "https://api.openai.com/v1/responses";

/// OpenAI Responses API (`/v1/responses`).
pub struct OpenAIClient {
    api_key: String,
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(api_key: String, client: reqwest::Client) -> Self {
        Self { api_key, client }
    }

    pub fn request_body(req: &CompletionRequest<'_>) -> serde_json::Value {
        let input: Vec<serde_json::Value> = req
            .messages
            .iter()
            .map(|m| json!({ "role": m.role, "content": m.content }))
            .collect();

        json!({
            "model": req.model,
            "instructions": req.system,
            "input": input,
            "temperature": req.temperature,
            "max_output_tokens": req.max_output_tokens,
        })
    }
}

/// Concatenate every `output_text` part of every message item.
/// Falls back to a top-level `output_text` string when the body carries one.
pub fn extract_output_text(body: &serde_json::Value) -> Option<String> {
    let mut out = String::new();
    let mut found = false;
    if let Some(items) = body.get("output").and_then(|v| v.as_array()) {
        for item in items {
            let Some(parts) = item.get("content").and_then(|v| v.as_array()) else {
                continue;
            };
            for part in parts {
                if part.get("type").and_then(|t| t.as_str()) == Some("output_text") {
                    if let Some(text) = part.get("text").and_then(|t| t.as_str()) {
                        out.push_str(text);
                        found = true;
                    }
                }
            }
        }
    }
    if found {
        return Some(out);
    }
    body.get("output_text")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, req: &CompletionRequest<'_>) -> Result<LlmResponse, ProviderError> {
        let body = Self::request_body(req);

        let resp = self
            .client
            .post(RESPONSES_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest("openai", &e))?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            return Err(ProviderError::from_status(
                "openai",
                status.as_u16(),
                error_text,
            ));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest("openai", &e))?;

        let text = extract_output_text(&json).ok_or_else(|| ProviderError::MalformedResponse {
            provider: "openai".to_string(),
            detail: "no output_text content in response".to_string(),
        })?;

        let model = json
            .get("model")
            .and_then(|v| v.as_str())
            .unwrap_or(req.model)
            .to_string();

        Ok(LlmResponse {
            text,
            provider: "openai".to_string(),
            model,
            raw: json,
        })
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
