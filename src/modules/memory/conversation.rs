use crate::config::MemoryConfig;
use crate::modules::storage::{ConversationLog, LogEntry, Speaker, Storage, StoreError};
use crate::utils::keyed_lock::KeyedLocks;
use std::sync::Arc;

/// Bounded recent-turn window per user, persisted through [`Storage`].
pub struct ConversationLogStore {
    storage: Arc<dyn Storage>,
    window: usize,
    summarize_after: usize,
    locks: KeyedLocks,
}

impl ConversationLogStore {
    pub fn new(storage: Arc<dyn Storage>, config: &MemoryConfig) -> Self {
        Self {
            storage,
            window: config.window,
            summarize_after: config.summarize_after,
            locks: KeyedLocks::new(),
        }
    }

    pub async fn append(&self, user_id: &str, from: Speaker, text: &str) -> Result<ConversationLog, StoreError> {
        let _guard = self.locks.lock(user_id).await;

        let mut log = self
            .storage
            .load_log(user_id)
            .await?
            .unwrap_or_else(|| ConversationLog::new(user_id));
        log.push(LogEntry::new(from, text), self.window);
        self.storage.save_log(log.clone()).await?;

        Ok(log)
    }

    pub async fn should_summarize(&self, user_id: &str) -> Result<bool, StoreError> {
        Ok(self
            .storage
            .load_log(user_id)
            .await?
            .map(|log| log.user_turns() >= self.summarize_after)
            .unwrap_or(false))
    }

    pub async fn messages(&self, user_id: &str) -> Result<Vec<LogEntry>, StoreError> {
        Ok(self
            .storage
            .load_log(user_id)
            .await?
            .map(|log| log.messages)
            .unwrap_or_default())
    }

    /// Last `n` entries, most recent last.
    pub async fn recent(&self, user_id: &str, n: usize) -> Result<Vec<LogEntry>, StoreError> {
        let mut messages = self.messages(user_id).await?;
        let skip = messages.len().saturating_sub(n);
        Ok(messages.split_off(skip))
    }

    /// Empties the message list but keeps the log itself.
    pub async fn clear(&self, user_id: &str) -> Result<(), StoreError> {
        let _guard = self.locks.lock(user_id).await;

        if let Some(mut log) = self.storage.load_log(user_id).await? {
            log.clear();
            self.storage.save_log(log).await?;
        }

        Ok(())
    }
}
