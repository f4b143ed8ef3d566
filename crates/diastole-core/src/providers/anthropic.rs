use super::{CompletionRequest, LlmClient, LlmResponse, ProviderError};
use async_trait::async_trait;
use serde_json::json;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API (`/v1/messages`).
pub struct AnthropicClient {
    api_key: String,
    client: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(api_key: String, client: reqwest::Client) -> Self {
        Self { api_key, client }
    }

    pub fn request_body(req: &CompletionRequest<'_>) -> serde_json::Value {
        json!({
            "model": req.model,
            "max_tokens": req.max_output_tokens,
            "temperature": req.temperature,
            "system": req.system,
            "messages": req.messages,
        })
    }
}

/// Concatenate all `text` content blocks.
pub fn extract_text(body: &serde_json::Value) -> Option<String> {
    let blocks = body.get("content")?.as_array()?;
    let text = blocks
        .iter()
        .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("text"))
        .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
        .collect::<String>();
    Some(text)
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, req: &CompletionRequest<'_>) -> Result<LlmResponse, ProviderError> {
        let body = Self::request_body(req);

        let resp = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest("anthropic", &e))?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            // 529 is Anthropic's "overloaded"; from_status already treats 5xx as server errors.
            return Err(ProviderError::from_status(
                "anthropic",
                status.as_u16(),
                error_text,
            ));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest("anthropic", &e))?;

        let text = extract_text(&json).ok_or_else(|| ProviderError::MalformedResponse {
            provider: "anthropic".to_string(),
            detail: "response has no content array".to_string(),
        })?;

        let model = json
            .get("model")
            .and_then(|v| v.as_str())
            .unwrap_or(req.model)
            .to_string();

        Ok(LlmResponse {
            text,
            provider: "anthropic".to_string(),
            model,
            raw: json,
        })
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mode;
    use crate::providers::ChatMessage;

    #[test]
    fn body_uses_system_field_and_message_history() {
        let messages = vec![
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
            ChatMessage::user("second"),
        ];
        let req = CompletionRequest {
            prompt_id: "turn_2",
            mode: Mode::Continuous,
            system: "Respond normally.",
            messages: &messages,
            model: "claude-sonnet-4-20250514",
            temperature: 0.2,
            max_output_tokens: 1024,
        };
        let body = AnthropicClient::request_body(&req);
        assert_eq!(body["system"], "Respond normally.");
        assert_eq!(body["max_tokens"], 1024);
        assert_eq!(body["messages"].as_array().unwrap().len(), 3);
        assert_eq!(body["messages"][1]["role"], "assistant");
    }

    #[test]
    fn joins_text_blocks_and_skips_tool_use() {
        let body = serde_json::json!({
            "id": "msg_1",
            "content": [
                { "type": "text", "text": "He did. " },
                { "type": "tool_use", "id": "t1", "name": "x", "input": {} },
                { "type": "text", "text": "Here is how." }
            ],
            "stop_reason": "end_turn"
        });
        assert_eq!(extract_text(&body).as_deref(), Some("He did. Here is how."));
    }

    #[test]
    fn missing_content_is_malformed() {
        assert!(extract_text(&serde_json::json!({ "type": "error" })).is_none());
        assert_eq!(
            extract_text(&serde_json::json!({ "content": [] })).as_deref(),
            Some("")
        );
    }
}
