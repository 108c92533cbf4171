use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::{trim_base, ModelInfo, Provider};
use crate::wire::ImagePart;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI-compatible chat completions backend. The prompt goes out as a single
/// user message; inline images ride along as data URLs.
pub struct OpenAIProvider {
    api_key: String,
    api_base: String,
    client: Client,
}

impl OpenAIProvider {
    pub fn new(api_key: String, api_base: Option<String>) -> Self {
        Self {
            api_key,
            api_base: trim_base(api_base, DEFAULT_API_BASE),
            client: Client::new(),
        }
    }
}

fn build_body(model: &str, prompt: &str, images: &[ImagePart]) -> Value {
    let content = if images.is_empty() {
        json!(prompt)
    } else {
        let mut parts = vec![json!({ "type": "text", "text": prompt })];
        parts.extend(images.iter().map(|img| {
            json!({
                "type": "image_url",
                "image_url": { "url": format!("data:{};base64,{}", img.mime_type, img.data) }
            })
        }));
        Value::Array(parts)
    };

    json!({
        "model": model,
        "messages": [ { "role": "user", "content": content } ],
        "temperature": 0.4,
        "response_format": { "type": "json_object" }
    })
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
struct ModelEntry {
    id: String,
}

#[async_trait]
impl Provider for OpenAIProvider {
    async fn generate(&self, model: &str, prompt: &str, images: &[ImagePart]) -> Result<String> {
        let url = format!("{}/chat/completions", self.api_base);
        let body = build_body(model, prompt, images);

        debug!(%url, model, prompt_chars = prompt.len(), images = images.len(), "openai: POST");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("openai request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("openai read body failed")?;

        debug!(%status, body = %text, "openai: raw response");

        if !status.is_success() {
            return Err(anyhow!("OpenAI API error ({status}): {text}"));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse OpenAI response: {e}"))?;

        parsed
            .choices
            .into_iter()
            .filter_map(|c| c.message.content)
            .find(|c| !c.is_empty())
            .ok_or_else(|| anyhow!("openai: empty content"))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.api_base);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("openai list models failed")?;

        let status = resp.status();
        let text = resp.text().await.context("openai read body failed")?;
        if !status.is_success() {
            return Err(anyhow!("OpenAI API error ({status}): {text}"));
        }

        let list: ModelList = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse OpenAI model list: {e}"))?;
        Ok(list
            .data
            .into_iter()
            .map(|m| ModelInfo { id: m.id, display_name: None })
            .collect())
    }
}
