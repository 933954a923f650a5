use async_trait::async_trait;
use std::sync::Mutex;
use thulli_core::modules::storage::{BehaviorRule, ConversationLog, MemoryRecord, TrainingEntry};
use thulli_core::{InMemoryStorage, Storage, StoreError};

/// In-memory storage that inserts a pending record right after the first
/// memory listing, as a concurrent writer would.
pub struct LateInsertStorage {
    pub inner: InMemoryStorage,
    pending: Mutex<Option<MemoryRecord>>,
}

impl LateInsertStorage {
    pub fn new(pending: MemoryRecord) -> Self {
        Self {
            inner: InMemoryStorage::new(),
            pending: Mutex::new(Some(pending)),
        }
    }
}

#[async_trait]
impl Storage for LateInsertStorage {
    async fn load_log(&self, user_id: &str) -> Result<Option<ConversationLog>, StoreError> {
        self.inner.load_log(user_id).await
    }

    async fn save_log(&self, log: ConversationLog) -> Result<(), StoreError> {
        self.inner.save_log(log).await
    }

    async fn insert_memory(&self, record: MemoryRecord) -> Result<(), StoreError> {
        self.inner.insert_memory(record).await
    }

    async fn memories(&self, user_id: &str) -> Result<Vec<MemoryRecord>, StoreError> {
        let snapshot = self.inner.memories(user_id).await?;
        let pending = self.pending.lock().unwrap().take();
        if let Some(record) = pending {
            self.inner.insert_memory(record).await?;
        }
        Ok(snapshot)
    }

    async fn count_memories(&self, user_id: &str) -> Result<usize, StoreError> {
        self.inner.count_memories(user_id).await
    }

    async fn delete_memories(&self, user_id: &str, ids: &[String]) -> Result<usize, StoreError> {
        self.inner.delete_memories(user_id, ids).await
    }

    async fn find_rule(&self, user_id: &str, trigger: &str) -> Result<Option<BehaviorRule>, StoreError> {
        self.inner.find_rule(user_id, trigger).await
    }

    async fn rules(&self, user_id: &str) -> Result<Vec<BehaviorRule>, StoreError> {
        self.inner.rules(user_id).await
    }

    async fn save_rule(&self, rule: BehaviorRule) -> Result<(), StoreError> {
        self.inner.save_rule(rule).await
    }

    async fn insert_training(&self, entry: TrainingEntry) -> Result<(), StoreError> {
        self.inner.insert_training(entry).await
    }

    async fn training(&self, user_id: &str) -> Result<Vec<TrainingEntry>, StoreError> {
        self.inner.training(user_id).await
    }
}
