use crate::modules::storage::error::StoreError;
use crate::modules::storage::records::{BehaviorRule, ConversationLog, MemoryRecord, TrainingEntry, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// Durable document store behind every per-user entity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Storage: Send + Sync {
    async fn load_log(&self, user_id: &str) -> Result<Option<ConversationLog>, StoreError>;

    async fn save_log(&self, log: ConversationLog) -> Result<(), StoreError>;

    async fn insert_memory(&self, record: MemoryRecord) -> Result<(), StoreError>;

    /// All memories of a user, oldest first.
    async fn memories(&self, user_id: &str) -> Result<Vec<MemoryRecord>, StoreError>;

    async fn count_memories(&self, user_id: &str) -> Result<usize, StoreError>;

    /// Deletes the given ids and returns how many were removed.
    async fn delete_memories(&self, user_id: &str, ids: &[String]) -> Result<usize, StoreError>;

    async fn find_rule(&self, user_id: &str, trigger: &str) -> Result<Option<BehaviorRule>, StoreError>;

    async fn rules(&self, user_id: &str) -> Result<Vec<BehaviorRule>, StoreError>;

    /// Inserts the rule or replaces the one with the same id.
    async fn save_rule(&self, rule: BehaviorRule) -> Result<(), StoreError>;

    async fn insert_training(&self, entry: TrainingEntry) -> Result<(), StoreError>;

    async fn training(&self, user_id: &str) -> Result<Vec<TrainingEntry>, StoreError>;
}

/// Plain tables shared by the in-memory and file-backed stores.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Tables {
    pub logs: HashMap<UserId, ConversationLog>,
    pub memories: HashMap<UserId, Vec<MemoryRecord>>,
    pub rules: HashMap<UserId, Vec<BehaviorRule>>,
    pub training: HashMap<UserId, Vec<TrainingEntry>>,
}

impl Tables {
    pub fn load_log(&self, user_id: &str) -> Option<ConversationLog> {
        self.logs.get(user_id).cloned()
    }

    pub fn save_log(&mut self, log: ConversationLog) {
        self.logs.insert(log.user_id.clone(), log);
    }

    pub fn insert_memory(&mut self, record: MemoryRecord) {
        self.memories.entry(record.user_id.clone()).or_default().push(record);
    }

    pub fn memories(&self, user_id: &str) -> Vec<MemoryRecord> {
        let mut records = self.memories.get(user_id).cloned().unwrap_or_default();
        records.sort_by_key(|record| record.created_at);
        records
    }

    pub fn count_memories(&self, user_id: &str) -> usize {
        self.memories.get(user_id).map(Vec::len).unwrap_or(0)
    }

    pub fn delete_memories(&mut self, user_id: &str, ids: &[String]) -> usize {
        match self.memories.get_mut(user_id) {
            Some(records) => {
                let before = records.len();
                records.retain(|record| !ids.contains(&record.id));
                before - records.len()
            }
            None => 0,
        }
    }

    pub fn find_rule(&self, user_id: &str, trigger: &str) -> Option<BehaviorRule> {
        self.rules
            .get(user_id)
            .and_then(|rules| rules.iter().find(|rule| rule.trigger == trigger).cloned())
    }

    pub fn rules(&self, user_id: &str) -> Vec<BehaviorRule> {
        self.rules.get(user_id).cloned().unwrap_or_default()
    }

    pub fn save_rule(&mut self, rule: BehaviorRule) {
        let rules = self.rules.entry(rule.user_id.clone()).or_default();
        match rules.iter_mut().find(|existing| existing.id == rule.id) {
            Some(existing) => *existing = rule,
            None => rules.push(rule),
        }
    }

    pub fn insert_training(&mut self, entry: TrainingEntry) {
        self.training.entry(entry.user_id.clone()).or_default().push(entry);
    }

    pub fn training(&self, user_id: &str) -> Vec<TrainingEntry> {
        self.training.get(user_id).cloned().unwrap_or_default()
    }
}

#[derive(Default)]
pub struct InMemoryStorage {
    tables: Mutex<Tables>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_tables<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> Result<T, StoreError> {
        let mut tables = self.tables.lock().map_err(|_| StoreError::LockPoisoned("storage tables"))?;
        Ok(f(&mut tables))
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn load_log(&self, user_id: &str) -> Result<Option<ConversationLog>, StoreError> {
        self.with_tables(|tables| tables.load_log(user_id))
    }

    async fn save_log(&self, log: ConversationLog) -> Result<(), StoreError> {
        self.with_tables(|tables| tables.save_log(log))
    }

    async fn insert_memory(&self, record: MemoryRecord) -> Result<(), StoreError> {
        self.with_tables(|tables| tables.insert_memory(record))
    }

    async fn memories(&self, user_id: &str) -> Result<Vec<MemoryRecord>, StoreError> {
        self.with_tables(|tables| tables.memories(user_id))
    }

    async fn count_memories(&self, user_id: &str) -> Result<usize, StoreError> {
        self.with_tables(|tables| tables.count_memories(user_id))
    }

    async fn delete_memories(&self, user_id: &str, ids: &[String]) -> Result<usize, StoreError> {
        self.with_tables(|tables| tables.delete_memories(user_id, ids))
    }

    async fn find_rule(&self, user_id: &str, trigger: &str) -> Result<Option<BehaviorRule>, StoreError> {
        self.with_tables(|tables| tables.find_rule(user_id, trigger))
    }

    async fn rules(&self, user_id: &str) -> Result<Vec<BehaviorRule>, StoreError> {
        self.with_tables(|tables| tables.rules(user_id))
    }

    async fn save_rule(&self, rule: BehaviorRule) -> Result<(), StoreError> {
        self.with_tables(|tables| tables.save_rule(rule))
    }

    async fn insert_training(&self, entry: TrainingEntry) -> Result<(), StoreError> {
        self.with_tables(|tables| tables.insert_training(entry))
    }

    async fn training(&self, user_id: &str) -> Result<Vec<TrainingEntry>, StoreError> {
        self.with_tables(|tables| tables.training(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryStorage, Storage};
    use crate::_test_mock::agent_mock::StorageTestHelpers;
    use crate::modules::storage::records::{BehaviorRule, TrainingEntry};

    #[tokio::test]
    async fn test_missing_log_is_none() {
        let storage = InMemoryStorage::new();
        assert!(storage.load_log("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memories_are_per_user_and_deletable() {
        let storage = InMemoryStorage::new();
        let first = StorageTestHelpers::memory("user-1", "happy about minecraft", 0.2);
        let second = StorageTestHelpers::memory("user-1", "sad about exam", 0.2);
        let other = StorageTestHelpers::memory("user-2", "bored about life", 0.2);

        storage.insert_memory(first.clone()).await.unwrap();
        storage.insert_memory(second.clone()).await.unwrap();
        storage.insert_memory(other).await.unwrap();

        assert_eq!(storage.count_memories("user-1").await.unwrap(), 2);
        assert_eq!(storage.count_memories("user-2").await.unwrap(), 1);

        let removed = storage
            .delete_memories("user-1", &[first.id.clone(), "unknown".to_string()])
            .await
            .unwrap();
        assert_eq!(removed, 1);

        let remaining = storage.memories("user-1").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second.id);
    }

    #[tokio::test]
    async fn test_memories_are_oldest_first() {
        let storage = InMemoryStorage::new();
        storage
            .insert_memory(StorageTestHelpers::aged_memory("user-1", "happy about today", 0.4, 0))
            .await
            .unwrap();
        storage
            .insert_memory(StorageTestHelpers::aged_memory("user-1", "sad about last week", 0.4, 60 * 24 * 7))
            .await
            .unwrap();

        let records = storage.memories("user-1").await.unwrap();
        assert_eq!(records[0].summary, "sad about last week");
        assert_eq!(records[1].summary, "happy about today");
    }

    #[tokio::test]
    async fn test_save_rule_replaces_by_id() {
        let storage = InMemoryStorage::new();
        let mut rule = BehaviorRule::new("user-1", "ping", "pong");
        storage.save_rule(rule.clone()).await.unwrap();

        rule.add_response("pong!");
        storage.save_rule(rule).await.unwrap();

        let rules = storage.rules("user-1").await.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].responses.len(), 2);
        assert!(storage.find_rule("user-1", "ping").await.unwrap().is_some());
        assert!(storage.find_rule("user-2", "ping").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_training_is_append_only() {
        let storage = InMemoryStorage::new();
        storage
            .insert_training(TrainingEntry::fact("user-1", Some("sky".to_string()), "blue"))
            .await
            .unwrap();
        storage
            .insert_training(TrainingEntry::fact("user-1", Some("sky".to_string()), "grey"))
            .await
            .unwrap();

        let entries = storage.training("user-1").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].value, "grey");
    }
}
