//! Storage backends for analysis history.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use crate::error::StoreError;
use crate::record::AnalysisRecord;

/// Storage boundary for analysis history.
#[async_trait::async_trait]
pub trait AnalysisStore: Send + Sync {
    /// Persist one record. Called at most once per analysis run.
    async fn save(&self, record: AnalysisRecord) -> Result<(), StoreError>;

    /// All records for one user, oldest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<AnalysisRecord>, StoreError>;
}

/// Append-only JSON-lines store: one record per line in a single file.
pub struct JsonlStore {
    path: PathBuf,
}

impl JsonlStore {
    /// Store records in the given file, creating parent directories on the
    /// first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl AnalysisStore for JsonlStore {
    async fn save(&self, record: AnalysisRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        info!(path = %self.path.display(), document = %record.document_name, "analysis saved");
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<AnalysisRecord>, StoreError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };

        let mut records = Vec::new();
        for line in contents.lines().filter(|l| !l.trim().is_empty()) {
            match serde_json::from_str::<AnalysisRecord>(line) {
                Ok(record) if record.user_id == user_id => records.push(record),
                Ok(_) => {}
                Err(err) => warn!(error = %err, "skipping corrupt history line"),
            }
        }
        Ok(records)
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<AnalysisRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl AnalysisStore for MemoryStore {
    async fn save(&self, record: AnalysisRecord) -> Result<(), StoreError> {
        self.records
            .lock()
            .map_err(|_| StoreError::Other("store lock poisoned".into()))?
            .push(record);
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<AnalysisRecord>, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|_| StoreError::Other("store lock poisoned".into()))?;
        Ok(records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexstream_core::Analysis;

    fn record(user: &str, name: &str) -> AnalysisRecord {
        AnalysisRecord::from_analysis(
            user,
            name,
            Analysis {
                summary: "s".into(),
                risks: vec![],
                verdict: "v".into(),
                disclaimer: "d".into(),
            },
        )
    }

    #[tokio::test]
    async fn jsonl_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlStore::new(dir.path().join("analyses.jsonl"));

        store.save(record("u1", "a.pdf")).await.unwrap();
        store.save(record("u2", "b.pdf")).await.unwrap();
        store.save(record("u1", "c.pdf")).await.unwrap();

        let records = store.list_for_user("u1").await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].document_name, "a.pdf");
        assert_eq!(records[1].document_name, "c.pdf");
    }

    #[tokio::test]
    async fn jsonl_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonlStore::new(dir.path().join("nothing-here.jsonl"));
        assert!(store.list_for_user("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn jsonl_store_skips_corrupt_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analyses.jsonl");
        let store = JsonlStore::new(&path);
        store.save(record("u1", "a.pdf")).await.unwrap();
        tokio::fs::write(
            &path,
            format!(
                "{}not json\n",
                tokio::fs::read_to_string(&path).await.unwrap()
            ),
        )
        .await
        .unwrap();

        let records = store.list_for_user("u1").await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn memory_store_filters_by_user() {
        let store = MemoryStore::new();
        store.save(record("u1", "a.pdf")).await.unwrap();
        store.save(record("u2", "b.pdf")).await.unwrap();
        assert_eq!(store.len(), 2);
        let records = store.list_for_user("u2").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].document_name, "b.pdf");
    }
}
