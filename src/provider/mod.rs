use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::cli::ProviderKind;
use crate::wire::ImagePart;

pub mod gemini;
pub mod openai;
pub mod scripted;

/// A backend model the provider can run `generate` against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub display_name: Option<String>,
}

/// One call surface per backend: prompt text plus optional inline images in,
/// raw reply text out.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn generate(&self, model: &str, prompt: &str, images: &[ImagePart]) -> Result<String>;

    async fn list_models(&self) -> Result<Vec<ModelInfo>>;
}

pub type DynProvider = Arc<dyn Provider>;

pub fn make_provider(
    kind: ProviderKind,
    api_key: String,
    api_base: Option<String>,
) -> DynProvider {
    match kind {
        ProviderKind::Gemini => Arc::new(gemini::GeminiProvider::new(api_key, api_base)),
        ProviderKind::OpenAI => Arc::new(openai::OpenAIProvider::new(api_key, api_base)),
    }
}

pub(crate) fn trim_base(base: Option<String>, default: &str) -> String {
    base.map(|b| b.trim().trim_end_matches('/').to_string())
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| default.to_string())
}
