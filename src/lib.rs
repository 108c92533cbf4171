//! Presentation drafting over generative model backends.
//!
//! A topic and a [`wire::GenerationConfig`] become a prompt, the prompt runs
//! through an ordered [`chain::ModelChain`] of candidate models, and the
//! winning reply is normalized into a [`wire::PresentationDocument`].
//! Refinement sends the current document plus an instruction through the same
//! path and gets a full replacement back.

pub mod assets;
pub mod chain;
pub mod cli;
pub mod config;
pub mod errors;
pub mod history;
pub mod log;
pub mod normalize;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod templates;
pub mod ux;
pub mod wire;

pub use chain::{ModelChain, DEFAULT_MODELS};
pub use errors::{DeckError, Result};
pub use orchestrator::{Generated, Orchestrator, Session};
pub use wire::{GenerationConfig, PresentationDocument, SlideRecord, VisualAsset};
