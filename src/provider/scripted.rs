use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

use super::{ModelInfo, Provider};
use crate::wire::ImagePart;

/// What a scripted model does when called.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail(String),
    /// Never completes; exercises per-attempt timeouts and cancellation.
    Hang,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
    pub images: Vec<ImagePart>,
}

/// Offline provider with canned replies per model. Replies queued for a model
/// are consumed in order; the last one repeats.
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<HashMap<String, VecDeque<Reply>>>,
    default_reply: Option<Reply>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, model: &str, reply: Reply) -> Self {
        self.script.lock().entry(model.to_string()).or_default().push_back(reply);
        self
    }

    /// Reply used for models with nothing scripted.
    pub fn otherwise(mut self, reply: Reply) -> Self {
        self.default_reply = Some(reply);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn invoked_models(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.model.clone()).collect()
    }

    fn next_reply(&self, model: &str) -> Option<Reply> {
        let mut script = self.script.lock();
        match script.get_mut(model) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => self.default_reply.clone(),
        }
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn generate(&self, model: &str, prompt: &str, images: &[ImagePart]) -> Result<String> {
        self.calls.lock().push(RecordedCall {
            model: model.to_string(),
            prompt: prompt.to_string(),
            images: images.to_vec(),
        });

        match self.next_reply(model) {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(msg)) => Err(anyhow!(msg)),
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(anyhow!("no scripted reply for model {model}")),
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let mut ids: Vec<String> = self.script.lock().keys().cloned().collect();
        ids.sort();
        Ok(ids.into_iter().map(|id| ModelInfo { id, display_name: None }).collect())
    }
}
