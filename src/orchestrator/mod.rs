use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::chain::{AttemptRecord, ModelChain};
use crate::cli::ProviderKind;
use crate::errors::{DeckError, Result};
use crate::normalize;
use crate::prompt;
use crate::provider::{self, DynProvider};
use crate::wire::{image_parts, GenerationConfig, PresentationDocument, VisualAsset};

/// A normalized document plus which candidate produced it.
#[derive(Debug, Clone)]
pub struct Generated {
    pub document: PresentationDocument,
    pub model: String,
    pub prompt: String,
    pub raw: String,
    pub attempts: Vec<AttemptRecord>,
}

/// Stateless between calls; safe to share across concurrent sessions.
#[derive(Clone)]
pub struct Orchestrator {
    chain: ModelChain,
}

impl Orchestrator {
    pub fn new(chain: ModelChain) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &ModelChain {
        &self.chain
    }

    async fn run(&self, prompt: String, assets: &[VisualAsset]) -> Result<Generated> {
        let images = image_parts(assets);
        debug!(prompt_chars = prompt.len(), images = images.len(), "dispatching prompt");

        let ok = self.chain.execute(&prompt, &images).await?;
        // Parse failures are terminal: the chain already committed to this reply.
        let document = normalize::parse_document(&ok.text).map_err(|e| e.attributed_to(&ok.model))?;
        info!(model = %ok.model, slides = document.slides.len(), "document normalized");

        Ok(Generated { document, model: ok.model, prompt, raw: ok.text, attempts: ok.attempts })
    }

    pub async fn generate(
        &self,
        topic: &str,
        config: &GenerationConfig,
        guidance: Option<&str>,
        assets: &[VisualAsset],
    ) -> Result<Generated> {
        config.validate()?;
        let prompt = prompt::build_generation_prompt(topic, config, guidance, assets);
        self.run(prompt, assets).await
    }

    /// Returns a full replacement document, never a patch. Asset references in
    /// the instruction are not checked locally.
    pub async fn refine(
        &self,
        instruction: &str,
        current: &PresentationDocument,
        assets: &[VisualAsset],
    ) -> Result<Generated> {
        let prompt = prompt::build_refinement_prompt(current, instruction, assets);
        self.run(prompt, assets).await
    }
}

/// Backend settings a `Session` rebuilds its handle from.
#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub kind: ProviderKind,
    pub api_base: Option<String>,
    pub models: Vec<String>,
    pub attempt_timeout: Duration,
}

/// Holds the credential-keyed backend handle. Setting a new credential
/// replaces the handle wholesale; the last write wins.
pub struct Session {
    settings: BackendSettings,
    handle: RwLock<Option<DynProvider>>,
}

impl Session {
    pub fn new(settings: BackendSettings) -> Self {
        Self { settings, handle: RwLock::new(None) }
    }

    /// Blank credentials are ignored, matching an empty key dialog.
    pub fn set_credential(&self, api_key: &str) {
        let key = api_key.trim();
        if key.is_empty() {
            return;
        }
        let provider = provider::make_provider(
            self.settings.kind.clone(),
            key.to_string(),
            self.settings.api_base.clone(),
        );
        *self.handle.write() = Some(provider);
    }

    /// Install an already-built backend (tests, embedding UIs).
    pub fn set_provider(&self, provider: DynProvider) {
        *self.handle.write() = Some(provider);
    }

    pub fn has_credential(&self) -> bool {
        self.handle.read().is_some()
    }

    /// Precondition check happens here, before any backend call.
    pub fn orchestrator(&self) -> Result<Orchestrator> {
        let provider = self.handle.read().clone().ok_or(DeckError::MissingCredential)?;
        let chain = ModelChain::new(
            self.settings.models.clone(),
            Arc::clone(&provider),
            self.settings.attempt_timeout,
        )?;
        Ok(Orchestrator::new(chain))
    }
}
