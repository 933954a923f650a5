use crate::config::EmotionConfig;
use crate::modules::emotion::state::{EmotionSnapshot, EmotionState};
use crate::modules::storage::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Per-user emotion states. A state is created from the configured defaults the
/// first time a user is referenced.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EmotionStateStore: Send + Sync {
    async fn load(&self, user_id: &str) -> Result<EmotionState, StoreError>;

    async fn save(&self, user_id: &str, state: EmotionState) -> Result<(), StoreError>;

    async fn snapshot(&self, user_id: &str) -> Result<EmotionSnapshot, StoreError> {
        Ok(self.load(user_id).await?.get_state())
    }
}

/// Process-lifetime emotion states kept in memory.
pub struct InMemoryEmotionStore {
    config: EmotionConfig,
    states: Mutex<HashMap<String, EmotionState>>,
}

impl InMemoryEmotionStore {
    pub fn new(config: EmotionConfig) -> Self {
        Self {
            config,
            states: Mutex::new(HashMap::new()),
        }
    }

    pub fn user_count(&self) -> Result<usize, StoreError> {
        let states = self.states.lock().map_err(|_| StoreError::LockPoisoned("emotion states"))?;
        Ok(states.len())
    }
}

impl Default for InMemoryEmotionStore {
    fn default() -> Self {
        Self::new(EmotionConfig::default())
    }
}

#[async_trait]
impl EmotionStateStore for InMemoryEmotionStore {
    async fn load(&self, user_id: &str) -> Result<EmotionState, StoreError> {
        let mut states = self.states.lock().map_err(|_| StoreError::LockPoisoned("emotion states"))?;
        let state = states
            .entry(user_id.to_string())
            .or_insert_with(|| EmotionState::new(&self.config));

        Ok(state.clone())
    }

    async fn save(&self, user_id: &str, state: EmotionState) -> Result<(), StoreError> {
        let mut states = self.states.lock().map_err(|_| StoreError::LockPoisoned("emotion states"))?;
        states.insert(user_id.to_string(), state);

        Ok(())
    }
}
