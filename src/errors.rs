use thiserror::Error;

/// How much of a raw model reply is kept in error messages and logs.
const SNIPPET_CHARS: usize = 240;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("no API credential set")]
    MissingCredential,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("model {model} failed: {source}")]
    Backend {
        model: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("model {model} timed out after {secs}s")]
    Timeout { model: String, secs: u64 },

    #[error("all {attempts} candidate models failed; last was {model}: {source}")]
    Exhausted {
        model: String,
        attempts: usize,
        #[source]
        source: Box<DeckError>,
    },

    #[error("response{} is not valid JSON: {source} (raw: {})", origin(.model), snippet(.raw))]
    Parse {
        model: Option<String>,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response{} has the wrong shape: {reason} (raw: {})", origin(.model), snippet(.raw))]
    Schema {
        model: Option<String>,
        reason: String,
        raw: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DeckError {
    /// Model id the error is attributed to, if any.
    pub fn model(&self) -> Option<&str> {
        match self {
            DeckError::Backend { model, .. }
            | DeckError::Timeout { model, .. }
            | DeckError::Exhausted { model, .. } => Some(model),
            DeckError::Parse { model, .. } | DeckError::Schema { model, .. } => model.as_deref(),
            _ => None,
        }
    }

    /// Attribute a parse or schema error to the candidate whose reply it came from.
    pub fn attributed_to(mut self, id: &str) -> Self {
        if let DeckError::Parse { model, .. } | DeckError::Schema { model, .. } = &mut self {
            *model = Some(id.to_string());
        }
        self
    }

    /// Raw backend text attached to parse and schema errors.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            DeckError::Parse { raw, .. } | DeckError::Schema { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// True for failures where the caller should fall back to placeholder slides.
    pub fn is_shape_error(&self) -> bool {
        matches!(self, DeckError::Schema { .. })
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;

fn origin(model: &Option<String>) -> String {
    model.as_deref().map(|m| format!(" from {m}")).unwrap_or_default()
}

/// First few hundred characters of `raw`, cut on a char boundary.
pub fn snippet(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(SNIPPET_CHARS) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
