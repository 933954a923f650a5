use crate::modules::storage::backend::{Storage, Tables};
use crate::modules::storage::error::StoreError;
use crate::modules::storage::records::{BehaviorRule, ConversationLog, MemoryRecord, TrainingEntry};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Stores every table in a single JSON snapshot that is rewritten after each
/// mutation.
pub struct JsonFileStorage {
    path: PathBuf,
    tables: Mutex<Tables>,
}

impl JsonFileStorage {
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let tables = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => Tables::default(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Tables::default(),
            Err(e) => return Err(StoreError::Io(e)),
        };

        Ok(Self {
            path,
            tables: Mutex::new(tables),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self, tables: &Tables) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(tables)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        Ok(())
    }

    /// Applies `f` to a copy of the tables and keeps it only once it is on disk.
    async fn mutate<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> Result<T, StoreError> {
        let mut tables = self.tables.lock().await;
        let mut next = tables.clone();
        let result = f(&mut next);
        self.persist(&next).await?;

        *tables = next;
        Ok(result)
    }
}

#[async_trait]
impl Storage for JsonFileStorage {
    async fn load_log(&self, user_id: &str) -> Result<Option<ConversationLog>, StoreError> {
        Ok(self.tables.lock().await.load_log(user_id))
    }

    async fn save_log(&self, log: ConversationLog) -> Result<(), StoreError> {
        self.mutate(|tables| tables.save_log(log)).await
    }

    async fn insert_memory(&self, record: MemoryRecord) -> Result<(), StoreError> {
        self.mutate(|tables| tables.insert_memory(record)).await
    }

    async fn memories(&self, user_id: &str) -> Result<Vec<MemoryRecord>, StoreError> {
        Ok(self.tables.lock().await.memories(user_id))
    }

    async fn count_memories(&self, user_id: &str) -> Result<usize, StoreError> {
        Ok(self.tables.lock().await.count_memories(user_id))
    }

    async fn delete_memories(&self, user_id: &str, ids: &[String]) -> Result<usize, StoreError> {
        self.mutate(|tables| tables.delete_memories(user_id, ids)).await
    }

    async fn find_rule(&self, user_id: &str, trigger: &str) -> Result<Option<BehaviorRule>, StoreError> {
        Ok(self.tables.lock().await.find_rule(user_id, trigger))
    }

    async fn rules(&self, user_id: &str) -> Result<Vec<BehaviorRule>, StoreError> {
        Ok(self.tables.lock().await.rules(user_id))
    }

    async fn save_rule(&self, rule: BehaviorRule) -> Result<(), StoreError> {
        self.mutate(|tables| tables.save_rule(rule)).await
    }

    async fn insert_training(&self, entry: TrainingEntry) -> Result<(), StoreError> {
        self.mutate(|tables| tables.insert_training(entry)).await
    }

    async fn training(&self, user_id: &str) -> Result<Vec<TrainingEntry>, StoreError> {
        Ok(self.tables.lock().await.training(user_id))
    }
}
