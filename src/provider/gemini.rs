use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{trim_base, ModelInfo, Provider};
use crate::wire::ImagePart;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiProvider {
    api_key: String,
    api_base: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(api_key: String, api_base: Option<String>) -> Self {
        Self {
            api_key,
            api_base: trim_base(api_base, DEFAULT_API_BASE),
            client: Client::new(),
        }
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{trimmed}")
        };
        format!("{}/{}:generateContent", self.api_base, model_path)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: &'a ImagePart,
    },
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelEntry>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelEntry {
    name: String,
    display_name: Option<String>,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

fn build_body<'a>(prompt: &'a str, images: &'a [ImagePart]) -> GenerateRequest<'a> {
    let mut parts = vec![Part::Text { text: prompt }];
    parts.extend(images.iter().map(|img| Part::Inline { inline_data: img }));
    GenerateRequest { contents: vec![Content { role: "user", parts }] }
}

fn first_text(resp: GenerateResponse) -> Option<String> {
    resp.candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .filter_map(|p| p.text)
        .find(|t| !t.is_empty())
}

fn generation_models(list: ModelList) -> Vec<ModelInfo> {
    list.models
        .into_iter()
        .filter(|m| m.supported_generation_methods.iter().any(|s| s == "generateContent"))
        .map(|m| ModelInfo {
            id: m.name.trim_start_matches("models/").to_string(),
            display_name: m.display_name,
        })
        .collect()
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn generate(&self, model: &str, prompt: &str, images: &[ImagePart]) -> Result<String> {
        let url = self.endpoint_for_model(model);
        let body = build_body(prompt, images);

        debug!(%url, prompt_chars = prompt.len(), images = images.len(), "gemini: POST");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("gemini request failed")?;

        let status = resp.status();
        let text = resp.text().await.context("gemini read body failed")?;

        debug!(%status, body = %text, "gemini: raw response");

        if !status.is_success() {
            return Err(anyhow!("Gemini API error ({status}): {text}"));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("gemini response parse error: {e}"))?;

        first_text(parsed).ok_or_else(|| anyhow!("gemini: no text in response"))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.api_base);
        let resp = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .context("gemini list models failed")?;

        let status = resp.status();
        let text = resp.text().await.context("gemini read body failed")?;
        if !status.is_success() {
            return Err(anyhow!("Gemini API error ({status}): {text}"));
        }

        let list: ModelList = serde_json::from_str(&text)
            .map_err(|e| anyhow!("gemini model list parse error: {e}"))?;
        Ok(generation_models(list))
    }
}
