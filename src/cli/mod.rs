use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "google")]
    Gemini,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
}

impl ProviderKind {
    /// Environment variable the credential is read from when not given explicitly.
    pub fn key_env(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::OpenAI => "OPENAI_API_KEY",
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StyleArg {
    #[value(name = "3d")]
    ThreeD,
    #[value(name = "2d")]
    TwoD,
    Photo,
}

#[derive(Parser, Debug)]
#[command(name = "deckgen", version, about = "LLM presentation generator with model fallback")]
pub struct Args {
    #[arg(long, default_value = ".")]
    pub root: String,

    #[arg(long, value_enum)]
    pub provider: Option<ProviderKind>,

    /// Candidate model, highest priority first. Repeat to build a chain.
    #[arg(long = "model")]
    pub models: Vec<String>,

    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub api_base: Option<String>,

    /// Per-attempt timeout; 0 disables it.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, default_value_t = false)]
    pub save_request: bool,

    #[arg(long, default_value_t = false)]
    pub save_response: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Hide the spinner shown while waiting on the backend.
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Draft a new deck from a topic.
    Generate(GenerateArgs),
    /// Apply a natural-language edit to an existing deck.
    Refine(RefineArgs),
    /// List previously generated decks.
    History,
    /// List the built-in deck templates.
    Templates,
    /// List backend models that support content generation.
    Models,
    /// Produce a placeholder visual asset URL.
    Asset {
        subject: String,
        #[arg(long, value_enum, default_value_t = StyleArg::ThreeD)]
        style: StyleArg,
    },
}

#[derive(ClapArgs, Debug)]
pub struct GenerateArgs {
    /// Topic of the presentation; defaults to the template name when --template is set.
    pub topic: Option<String>,

    #[arg(long)]
    pub template: Option<String>,

    #[arg(long)]
    pub pages: Option<u32>,

    #[arg(long)]
    pub audience: Option<String>,

    #[arg(long)]
    pub purpose: Option<String>,

    #[arg(long)]
    pub tone: Option<String>,

    #[arg(long)]
    pub domain: Option<String>,

    #[arg(long)]
    pub sub_domain: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub guidance: Option<String>,

    /// Reference image: a local file or an http(s) URL.
    #[arg(long = "image")]
    pub images: Vec<String>,

    #[arg(long)]
    pub out: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct RefineArgs {
    pub instruction: String,

    /// Deck JSON file to edit.
    #[arg(long, conflicts_with = "history")]
    pub input: Option<String>,

    /// Index into the history list (0 = most recent).
    #[arg(long)]
    pub history: Option<usize>,

    /// Asset on the canvas: a local file or an http(s) URL.
    #[arg(long = "asset")]
    pub assets: Vec<String>,

    #[arg(long)]
    pub out: Option<String>,
}
