use fs_err as fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::orchestrator::Generated;

pub struct SavedPaths {
    pub dir: PathBuf,
    pub request: Option<PathBuf>,
    pub response: Option<PathBuf>,
}

fn tx_dir(root: &Path, tx: Uuid) -> PathBuf {
    root.join(".deckgen").join("tx").join(tx.to_string())
}

/// `DECKGEN_LOG`, then `RUST_LOG`, then `deckgen=info` (`debug` with `--debug`).
pub fn init_tracing(debug: bool) {
    let fallback = if debug { "deckgen=debug" } else { "deckgen=info" };
    let filter = EnvFilter::try_from_env("DECKGEN_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Persist the prompt and the winning raw reply for one stage of a transaction.
pub fn save_stage(
    stage: &str,
    out: &Generated,
    tx: Uuid,
    root: &Path,
    save_request: bool,
    save_response: bool,
) -> anyhow::Result<SavedPaths> {
    let dir = tx_dir(root, tx);
    let mut request_path = None;
    let mut response_path = None;

    if save_request || save_response {
        fs::create_dir_all(&dir)?;
    }

    if save_request {
        let p = dir.join(format!("{stage}.prompt.txt"));
        fs::write(&p, &out.prompt)?;
        request_path = Some(p);
    }

    if save_response {
        let p = dir.join(format!("{stage}.response.txt"));
        let header = format!("# model: {}\n", out.model);
        fs::write(&p, header + &out.raw)?;
        response_path = Some(p);
    }

    let saved = SavedPaths { dir, request: request_path, response: response_path };
    print_saved_paths(stage, &saved);
    Ok(saved)
}

pub fn print_saved_paths(stage: &str, saved: &SavedPaths) {
    debug!(stage, dir = %saved.dir.display(), "transaction artifacts directory");
    if let Some(p) = &saved.request {
        debug!(stage, path = %p.display(), "prompt saved");
    }
    if let Some(p) = &saved.response {
        debug!(stage, path = %p.display(), "response saved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::PresentationDocument;

    fn generated() -> Generated {
        Generated {
            document: PresentationDocument::placeholder("X"),
            model: "gemini-1.5-pro".into(),
            prompt: "the prompt".into(),
            raw: "{\"title\":\"X\"}".into(),
            attempts: vec![],
        }
    }

    #[test]
    fn saves_only_what_is_asked() {
        let dir = tempfile::tempdir().unwrap();
        let tx = Uuid::new_v4();
        let saved = save_stage("generate", &generated(), tx, dir.path(), true, false).unwrap();
        let req = saved.request.unwrap();
        assert_eq!(fs::read_to_string(&req).unwrap(), "the prompt");
        assert!(req.ends_with(format!(".deckgen/tx/{tx}/generate.prompt.txt")));
        assert!(saved.response.is_none());
    }

    #[test]
    fn response_file_records_the_winning_model() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_stage("refine", &generated(), Uuid::new_v4(), dir.path(), false, true).unwrap();
        let text = fs::read_to_string(saved.response.unwrap()).unwrap();
        assert_eq!(text, "# model: gemini-1.5-pro\n{\"title\":\"X\"}");
    }

    #[test]
    fn nothing_is_written_when_both_flags_are_off() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_stage("generate", &generated(), Uuid::new_v4(), dir.path(), false, false).unwrap();
        assert!(!saved.dir.exists());
    }
}
