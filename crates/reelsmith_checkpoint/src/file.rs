//! File-backed checkpoint store.

use crate::{CheckpointDocument, CheckpointStore, FieldMap};
use reelsmith_core::JobId;
use reelsmith_error::{PersistenceError, PersistenceErrorKind, ReelsmithResult};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;

/// Stores each job as `{checkpoint_dir}/{job_id}.json`.
///
/// # Features
///
/// - **Atomic writes**: each update goes to a temp file which is then renamed
///   over the checkpoint, so a crash never leaves a torn document
/// - **Per-job locking**: writers of the same job are serialised in-process;
///   different jobs never contend, and a job's lock is dropped once no writer
///   holds it
/// - **Human-readable**: pretty-printed JSON that can be inspected or edited
pub struct FileCheckpointStore {
    checkpoint_dir: PathBuf,
    locks: Mutex<HashMap<JobId, Weak<Mutex<()>>>>,
}

impl FileCheckpointStore {
    /// Create a store rooted at `checkpoint_dir`.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(checkpoint_dir))]
    pub fn new(checkpoint_dir: impl Into<PathBuf>) -> ReelsmithResult<Self> {
        let checkpoint_dir = checkpoint_dir.into();

        std::fs::create_dir_all(&checkpoint_dir).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::DirectoryCreation(format!(
                "{}: {}",
                checkpoint_dir.display(),
                e
            )))
        })?;

        tracing::debug!(path = %checkpoint_dir.display(), "Initialized checkpoint store");
        Ok(Self {
            checkpoint_dir,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Directory holding the checkpoint documents.
    pub fn checkpoint_dir(&self) -> &Path {
        &self.checkpoint_dir
    }

    /// Location of a job's checkpoint document.
    pub fn job_path(&self, job_id: &JobId) -> PathBuf {
        self.checkpoint_dir.join(format!("{}.json", job_id))
    }

    async fn job_lock(&self, job_id: &JobId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.retain(|_, lock| lock.strong_count() > 0);
        if let Some(lock) = locks.get(job_id).and_then(Weak::upgrade) {
            return lock;
        }
        let lock = Arc::new(Mutex::new(()));
        locks.insert(job_id.clone(), Arc::downgrade(&lock));
        lock
    }

    async fn read_document(&self, job_id: &JobId) -> ReelsmithResult<Option<CheckpointDocument>> {
        let path = self.job_path(job_id);

        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(PersistenceError::new(PersistenceErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        let document: CheckpointDocument = serde_json::from_str(&contents).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::Corrupt {
                job_id: job_id.to_string(),
                message: e.to_string(),
            })
        })?;

        Ok(Some(document))
    }

    async fn write_document(&self, document: &CheckpointDocument) -> ReelsmithResult<()> {
        let path = self.job_path(&document.job_id);
        let contents = serde_json::to_string_pretty(document).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::Serialization {
                field: "*".to_string(),
                message: e.to_string(),
            })
        })?;

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, contents).await.map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl CheckpointStore for FileCheckpointStore {
    #[tracing::instrument(skip(self), fields(job_id = %job_id))]
    async fn get(&self, job_id: &JobId, field: &str) -> ReelsmithResult<Option<Value>> {
        let document = self.read_document(job_id).await?;
        Ok(document.and_then(|mut doc| doc.fields.remove(field)))
    }

    #[tracing::instrument(skip(self, value), fields(job_id = %job_id))]
    async fn set(&self, job_id: &JobId, field: &str, value: Value) -> ReelsmithResult<()> {
        let lock = self.job_lock(job_id).await;
        let _guard = lock.lock().await;

        let mut document = self
            .read_document(job_id)
            .await?
            .unwrap_or_else(|| CheckpointDocument::new(job_id.clone()));
        document.fields.insert(field.to_string(), value);
        document.touch();
        self.write_document(&document).await?;

        tracing::debug!(field, fields = document.fields.len(), "Checkpointed field");
        Ok(())
    }

    async fn exists(&self, job_id: &JobId) -> ReelsmithResult<bool> {
        let path = self.job_path(job_id);
        tokio::fs::try_exists(&path).await.map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()
        })
    }

    #[tracing::instrument(skip(self), fields(job_id = %job_id))]
    async fn load(&self, job_id: &JobId) -> ReelsmithResult<FieldMap> {
        let fields = self
            .read_document(job_id)
            .await?
            .map(|doc| doc.fields)
            .unwrap_or_default();
        tracing::debug!(fields = fields.len(), "Loaded checkpoint");
        Ok(fields)
    }

    #[tracing::instrument(skip(self), fields(job_id = %job_id))]
    async fn clear(&self, job_id: &JobId, field: &str) -> ReelsmithResult<bool> {
        let lock = self.job_lock(job_id).await;
        let _guard = lock.lock().await;

        let Some(mut document) = self.read_document(job_id).await? else {
            return Ok(false);
        };
        if document.fields.remove(field).is_none() {
            return Ok(false);
        }
        document.touch();
        self.write_document(&document).await?;

        tracing::info!(field, "Cleared checkpointed field");
        Ok(true)
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
