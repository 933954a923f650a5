use crate::agent::Agent;
use crate::config::AgentConfig;
use crate::modules::analysis::Analysis;
use crate::modules::emotion::EmotionSnapshot;
use crate::modules::memory::TrainingSet;
use crate::modules::storage::{InMemoryStorage, MemoryRecord};
use crate::pipeline::TurnContext;
use crate::utils::random::ScriptedRandom;
use chrono::{Duration, Utc};
use std::sync::Arc;

pub struct StorageTestHelpers;

impl StorageTestHelpers {
    pub fn memory(user_id: &str, summary: &str, importance: f32) -> MemoryRecord {
        let emotion = summary.split_whitespace().next().unwrap_or("neutral");
        MemoryRecord::new(
            user_id,
            format!("{}:{}", emotion, Utc::now().timestamp_millis()),
            summary,
            Vec::new(),
            importance,
            emotion,
        )
    }

    pub fn tagged_memory(user_id: &str, summary: &str, tag: &str, importance: f32) -> MemoryRecord {
        let mut record = Self::memory(user_id, summary, importance);
        record.tags = vec![tag.to_string()];
        record
    }

    pub fn aged_memory(user_id: &str, summary: &str, importance: f32, minutes_ago: i64) -> MemoryRecord {
        let mut record = Self::memory(user_id, summary, importance);
        record.created_at = Utc::now() - Duration::minutes(minutes_ago);
        record
    }
}

/// A turn for `user-1` with an empty analysis and no history.
pub fn turn_context(utterance: &str) -> TurnContext {
    TurnContext {
        user_id: "user-1".to_string(),
        user_name: "Dear".to_string(),
        utterance: utterance.to_string(),
        analysis: Analysis::default(),
        emotion: EmotionSnapshot::new("neutral", 0.1),
        recent: Vec::new(),
        training: TrainingSet::default(),
    }
}

/// An agent over fresh in-memory storage whose random draws are all `draw`.
pub fn scripted_agent(draw: f64) -> (Arc<InMemoryStorage>, Agent) {
    let storage = Arc::new(InMemoryStorage::new());
    let agent = Agent::builder(AgentConfig::default())
        .storage(storage.clone())
        .random(Arc::new(ScriptedRandom::constant(draw)))
        .build()
        .expect("default config builds an agent");
    (storage, agent)
}
