use chrono::{DateTime, Utc};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::errors::Result;
use crate::wire::PresentationDocument;

const HISTORY_FILE: &str = "history.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
    pub id: Uuid,
    pub title: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub document: PresentationDocument,
}

impl HistoryItem {
    pub fn new(document: PresentationDocument, model: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: document.title.clone(),
            created_at: Utc::now(),
            model,
            document,
        }
    }
}

/// Past decks, newest first, stored as one JSON file per namespace directory.
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(namespace_dir: impl Into<PathBuf>) -> Self {
        Self { dir: namespace_dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(HISTORY_FILE)
    }

    /// A missing file is an empty history.
    pub fn load(&self) -> Result<Vec<HistoryItem>> {
        let path = self.path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn get(&self, index: usize) -> Result<Option<HistoryItem>> {
        Ok(self.load()?.into_iter().nth(index))
    }

    /// Prepends `item` and rewrites the file.
    pub fn push(&self, item: HistoryItem) -> Result<Vec<HistoryItem>> {
        let mut items = self.load()?;
        items.insert(0, item);
        self.save(&items)?;
        Ok(items)
    }

    fn save(&self, items: &[HistoryItem]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(items)?;
        write_atomic(&self.dir, &self.path(), json.as_bytes())?;
        debug!(path = %self.path().display(), items = items.len(), "history saved");
        Ok(())
    }
}

fn write_atomic(dir: &Path, dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("ns"));
        assert!(store.load().unwrap().is_empty());
        assert!(store.get(0).unwrap().is_none());
    }

    #[test]
    fn push_prepends_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("ns"));
        store.push(HistoryItem::new(PresentationDocument::placeholder("first"), None)).unwrap();
        store
            .push(HistoryItem::new(PresentationDocument::placeholder("second"), Some("gemini-1.5-pro".into())))
            .unwrap();

        let reopened = HistoryStore::new(dir.path().join("ns"));
        let items = reopened.load().unwrap();
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["second", "first"]);
        assert_eq!(items[0].model.as_deref(), Some("gemini-1.5-pro"));
    }

    #[test]
    fn stored_documents_round_trip_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path());
        let item = HistoryItem::new(PresentationDocument::placeholder("deck"), None);
        store.push(item.clone()).unwrap();
        assert_eq!(store.get(0).unwrap(), Some(item));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path());
        fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().is_err());
    }
}
