use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::chain::DEFAULT_MODELS;
use crate::cli::{Args, ProviderKind};
use crate::orchestrator::BackendSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schema_version: String,
    pub root: String,
    pub provider: ProviderKind,
    pub models: Vec<String>,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub data_dir: String,
    pub history_namespace: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: "2025-10-01".into(),
            root: ".".into(),
            provider: ProviderKind::Gemini,
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            api_base: None,
            api_key: None,
            timeout_secs: 60,
            data_dir: ".deckgen".into(),
            history_namespace: "deckgen-storage".into(),
        }
    }
}

impl Config {
    /// Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// Config file (if any) first, then command-line overrides.
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(p) => Self::load(Path::new(p))?,
            None => Self::default(),
        };
        if args.root != "." || args.config.is_none() {
            cfg.root = args.root.clone();
        }
        if let Some(kind) = &args.provider {
            cfg.provider = kind.clone();
        }
        if !args.models.is_empty() {
            cfg.models = args.models.clone();
        }
        if let Some(base) = &args.api_base {
            cfg.api_base = Some(base.clone());
        }
        if let Some(key) = &args.api_key {
            cfg.api_key = Some(key.clone());
        }
        if let Some(secs) = args.timeout_secs {
            cfg.timeout_secs = secs;
        }
        Ok(cfg)
    }

    /// Flag or config value, then the provider's environment variable.
    pub fn credential(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(self.provider.key_env()).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    /// Directory holding persisted state for this namespace.
    pub fn namespace_dir(&self) -> PathBuf {
        let data = Path::new(&self.data_dir);
        let base = if data.is_absolute() { data.to_path_buf() } else { Path::new(&self.root).join(data) };
        base.join(&self.history_namespace)
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            kind: self.provider.clone(),
            api_base: self.api_base.clone(),
            models: self.models.clone(),
            attempt_timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deckgen.toml");
        fs::write(&path, "provider = \"openai\"\nmodels = [\"gpt-4.1\", \"gpt-4.1-mini\"]\ntimeout_secs = 45\n").unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.provider, ProviderKind::OpenAI);
        assert_eq!(cfg.models, ["gpt-4.1", "gpt-4.1-mini"]);
        assert_eq!(cfg.timeout_secs, 45);
        assert_eq!(cfg.history_namespace, "deckgen-storage");
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deckgen.toml");
        fs::write(&path, "timeout_secs = 45\napi_key = \"from-file\"\n").unwrap();
        let args = Args::try_parse_from([
            "deckgen", "--config", path.to_str().unwrap(), "--timeout-secs", "10",
            "--model", "gemini-1.5-pro", "history",
        ])
        .unwrap();
        let cfg = Config::resolve(&args).unwrap();
        assert_eq!(cfg.timeout_secs, 10);
        assert_eq!(cfg.models, ["gemini-1.5-pro"]);
        assert_eq!(cfg.credential().as_deref(), Some("from-file"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deckgen.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn namespace_dir_is_under_root() {
        let cfg = Config { root: "/tmp/work".into(), ..Default::default() };
        assert_eq!(cfg.namespace_dir(), Path::new("/tmp/work/.deckgen/deckgen-storage"));
    }
}
