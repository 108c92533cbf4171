//! Sequential model fallback.
//!
//! Candidates are tried one at a time in priority order. The first success
//! wins and later candidates are never called. When every candidate fails,
//! the last candidate's error is returned; earlier ones only reach the logs.

use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::errors::{DeckError, Result};
use crate::provider::DynProvider;
use crate::wire::ImagePart;

/// Most capable first, progressively cheaper or older.
pub const DEFAULT_MODELS: [&str; 4] = [
    "gemini-3-pro-preview",
    "gemini-3-deep-think",
    "gemini-3-flash-preview",
    "gemini-1.5-pro",
];

pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub model: String,
    pub elapsed: Duration,
    /// `None` for the attempt that succeeded.
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChainSuccess {
    pub text: String,
    pub model: String,
    pub attempts: Vec<AttemptRecord>,
}

#[derive(Clone)]
pub struct ModelChain {
    models: Vec<String>,
    provider: DynProvider,
    attempt_timeout: Duration,
}

impl ModelChain {
    /// A zero `attempt_timeout` disables the per-attempt bound.
    pub fn new(models: Vec<String>, provider: DynProvider, attempt_timeout: Duration) -> Result<Self> {
        let models: Vec<String> = models
            .into_iter()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .collect();
        if models.is_empty() {
            return Err(DeckError::InvalidConfig("model chain is empty".into()));
        }
        Ok(Self { models, provider, attempt_timeout })
    }

    pub fn with_defaults(provider: DynProvider) -> Self {
        Self {
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            provider,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    async fn attempt(&self, model: &str, prompt: &str, images: &[ImagePart]) -> Result<String> {
        let call = self.provider.generate(model, prompt, images);
        let outcome = if self.attempt_timeout.is_zero() {
            call.await
        } else {
            match tokio::time::timeout(self.attempt_timeout, call).await {
                Ok(res) => res,
                Err(_) => {
                    return Err(DeckError::Timeout {
                        model: model.to_string(),
                        secs: self.attempt_timeout.as_secs(),
                    })
                }
            }
        };
        outcome.map_err(|source| DeckError::Backend { model: model.to_string(), source })
    }

    pub async fn execute(&self, prompt: &str, images: &[ImagePart]) -> Result<ChainSuccess> {
        let mut attempts = Vec::with_capacity(self.models.len());
        let mut last_err = None;

        for (idx, model) in self.models.iter().enumerate() {
            let started = Instant::now();
            match self.attempt(model, prompt, images).await {
                Ok(text) => {
                    info!(model = %model, attempt = idx + 1, elapsed_ms = started.elapsed().as_millis() as u64, "model call succeeded");
                    attempts.push(AttemptRecord { model: model.clone(), elapsed: started.elapsed(), error: None });
                    return Ok(ChainSuccess { text, model: model.clone(), attempts });
                }
                Err(e) => {
                    let next = self.models.get(idx + 1).map(String::as_str).unwrap_or("<none>");
                    warn!(model = %model, next = %next, error = %e, "model call failed, falling back");
                    attempts.push(AttemptRecord {
                        model: model.clone(),
                        elapsed: started.elapsed(),
                        error: Some(e.to_string()),
                    });
                    last_err = Some(e);
                }
            }
        }

        // `models` is never empty, so at least one attempt ran.
        let source = last_err.unwrap_or(DeckError::InvalidConfig("model chain is empty".into()));
        let model = attempts.last().map(|a| a.model.clone()).unwrap_or_default();
        error!(model = %model, attempts = attempts.len(), error = %source, "all candidate models failed");
        Err(DeckError::Exhausted { model, attempts: attempts.len(), source: Box::new(source) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::scripted::{Reply, ScriptedProvider};
    use std::sync::Arc;

    fn chain(p: &Arc<ScriptedProvider>) -> ModelChain {
        ModelChain::new(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            p.clone(),
            Duration::from_secs(30),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn first_success_short_circuits() {
        let p = Arc::new(
            ScriptedProvider::new()
                .reply("a", Reply::Fail("quota".into()))
                .reply("b", Reply::Text("from b".into()))
                .reply("c", Reply::Text("from c".into())),
        );
        let ok = chain(&p).execute("prompt", &[]).await.unwrap();
        assert_eq!(ok.text, "from b");
        assert_eq!(ok.model, "b");
        assert_eq!(p.invoked_models(), ["a", "b"]);
        assert_eq!(ok.attempts.len(), 2);
        assert!(ok.attempts[0].error.as_deref().unwrap().contains("quota"));
        assert!(ok.attempts[1].error.is_none());
    }

    #[tokio::test]
    async fn each_success_position_stops_the_chain() {
        let models = ["a", "b", "c", "d"];
        for k in 0..models.len() {
            let mut p = ScriptedProvider::new();
            for (i, m) in models.iter().enumerate() {
                let reply = if i < k { Reply::Fail(format!("{m} down")) } else { Reply::Text(format!("from {m}")) };
                p = p.reply(m, reply);
            }
            let p = Arc::new(p);
            let ok = chain(&p).execute("prompt", &[]).await.unwrap();
            assert_eq!(ok.model, models[k]);
            assert_eq!(ok.text, format!("from {}", models[k]));
            assert_eq!(p.invoked_models(), models[..=k]);
        }
    }

    #[tokio::test]
    async fn exhaustion_surfaces_the_last_error() {
        let p = Arc::new(
            ScriptedProvider::new()
                .reply("a", Reply::Fail("a: 503".into()))
                .reply("b", Reply::Fail("b: 429".into()))
                .reply("c", Reply::Fail("c: 400".into()))
                .reply("d", Reply::Fail("d: 401 invalid key".into())),
        );
        let err = chain(&p).execute("prompt", &[]).await.unwrap_err();
        match err {
            DeckError::Exhausted { model, attempts, source } => {
                assert_eq!(model, "d");
                assert_eq!(attempts, 4);
                assert_eq!(source.model(), Some("d"));
                assert!(source.to_string().contains("d: 401 invalid key"));
                assert!(!source.to_string().contains("a: 503"));
            }
            other => panic!("expected exhausted, got {other:?}"),
        }
        assert_eq!(p.invoked_models(), ["a", "b", "c", "d"]);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_candidate_times_out_and_falls_back() {
        let p = Arc::new(
            ScriptedProvider::new()
                .reply("a", Reply::Hang)
                .reply("b", Reply::Text("late but fine".into())),
        );
        let ok = chain(&p).execute("prompt", &[]).await.unwrap();
        assert_eq!(ok.model, "b");
        assert!(ok.attempts[0].error.as_deref().unwrap().contains("timed out after 30s"));
    }

    #[tokio::test]
    async fn prompt_and_images_reach_every_candidate() {
        let p = Arc::new(ScriptedProvider::new().reply("a", Reply::Fail("x".into())).reply("b", Reply::Text("ok".into())));
        let images = vec![ImagePart { mime_type: "image/png".into(), data: "AAAA".into() }];
        chain(&p).execute("the prompt", &images).await.unwrap();
        for call in p.calls() {
            assert_eq!(call.prompt, "the prompt");
            assert_eq!(call.images, images);
        }
    }

    #[test]
    fn empty_or_blank_model_list_is_rejected() {
        let p: DynProvider = Arc::new(ScriptedProvider::new());
        assert!(matches!(
            ModelChain::new(vec![], p.clone(), DEFAULT_ATTEMPT_TIMEOUT),
            Err(DeckError::InvalidConfig(_))
        ));
        assert!(ModelChain::new(vec!["  ".into()], p, DEFAULT_ATTEMPT_TIMEOUT).is_err());
    }

    #[test]
    fn defaults_follow_priority_order() {
        let c = ModelChain::with_defaults(Arc::new(ScriptedProvider::new()));
        assert_eq!(c.models(), DEFAULT_MODELS);
        assert_eq!(c.attempt_timeout(), DEFAULT_ATTEMPT_TIMEOUT);
    }
}
