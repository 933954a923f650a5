use crate::modules::storage::{Storage, StoreError, TrainingEntry, TrainingKind};
use std::sync::Arc;

/// Taught facts and pairs of one user, in the order they were taught.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    facts: Vec<TrainingEntry>,
    pairs: Vec<TrainingEntry>,
}

impl TrainingSet {
    pub fn new(entries: Vec<TrainingEntry>) -> Self {
        let (facts, pairs): (Vec<TrainingEntry>, Vec<TrainingEntry>) = entries
            .into_iter()
            .partition(|entry| entry.kind == TrainingKind::Fact);
        Self { facts, pairs }
    }

    pub fn facts(&self) -> &[TrainingEntry] {
        &self.facts
    }

    pub fn pairs(&self) -> &[TrainingEntry] {
        &self.pairs
    }

    /// The most recently taught fact whose key equals `key`, ignoring case.
    pub fn fact_by_key(&self, key: &str) -> Option<&TrainingEntry> {
        let key = key.trim().to_lowercase();
        self.facts
            .iter()
            .rev()
            .find(|fact| fact.key.as_deref().map(str::to_lowercase).as_deref() == Some(key.as_str()))
    }

    pub fn has_fact(&self, key: &str) -> bool {
        self.fact_by_key(key).is_some()
    }

    /// The most recently taught pair whose key occurs in `utterance`.
    pub fn pair_in(&self, utterance: &str) -> Option<&TrainingEntry> {
        let lower = utterance.to_lowercase();
        self.pairs.iter().rev().find(|pair| {
            pair.key
                .as_deref()
                .map(|key| !key.trim().is_empty() && lower.contains(&key.to_lowercase()))
                .unwrap_or(false)
        })
    }
}

pub struct TrainingStore {
    storage: Arc<dyn Storage>,
}

impl TrainingStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn remember_fact(
        &self,
        user_id: &str,
        key: Option<String>,
        value: &str,
    ) -> Result<TrainingEntry, StoreError> {
        let entry = TrainingEntry::fact(user_id, key, value);
        self.storage.insert_training(entry.clone()).await?;
        Ok(entry)
    }

    pub async fn teach_pair(&self, user_id: &str, key: &str, value: &str) -> Result<TrainingEntry, StoreError> {
        let entry = TrainingEntry::pair(user_id, key, value);
        self.storage.insert_training(entry.clone()).await?;
        Ok(entry)
    }

    pub async fn load(&self, user_id: &str) -> Result<TrainingSet, StoreError> {
        Ok(TrainingSet::new(self.storage.training(user_id).await?))
    }
}
