use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub type UserId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub from: Speaker,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(from: Speaker, text: impl Into<String>) -> Self {
        Self {
            from,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Bounded window of recent messages for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationLog {
    pub user_id: UserId,
    pub messages: Vec<LogEntry>,
    pub last_updated: DateTime<Utc>,
}

impl ConversationLog {
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            messages: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    /// Appends `entry` and evicts the oldest messages beyond `window`.
    pub fn push(&mut self, entry: LogEntry, window: usize) {
        self.last_updated = entry.timestamp;
        self.messages.push(entry);

        if self.messages.len() > window {
            let overflow = self.messages.len() - window;
            self.messages.drain(..overflow);
        }
    }

    pub fn user_turns(&self) -> usize {
        self.messages.iter().filter(|entry| entry.from == Speaker::User).count()
    }

    pub fn last_from(&self, speaker: Speaker) -> Option<&LogEntry> {
        self.messages.iter().rev().find(|entry| entry.from == speaker)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.last_updated = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub id: String,
    pub user_id: UserId,
    pub key: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub importance: f32,
    pub emotion_snapshot: String,
    pub created_at: DateTime<Utc>,
}

impl MemoryRecord {
    pub fn new(
        user_id: impl Into<UserId>,
        key: impl Into<String>,
        summary: impl Into<String>,
        tags: Vec<String>,
        importance: f32,
        emotion_snapshot: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            key: key.into(),
            summary: summary.into(),
            tags,
            importance: importance.clamp(0.0, 1.0),
            emotion_snapshot: emotion_snapshot.into(),
            created_at: Utc::now(),
        }
    }

    pub fn first_tag(&self) -> &str {
        self.tags.first().map(String::as_str).unwrap_or("misc")
    }
}

pub const CUSTOM_CATEGORY: &str = "custom";

/// A user-taught trigger and the replies it may produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorRule {
    pub id: String,
    pub user_id: UserId,
    pub trigger: String,
    pub responses: Vec<String>,
    pub category: String,
    pub usage_count: u64,
    pub created_at: DateTime<Utc>,
}

impl BehaviorRule {
    pub fn new(user_id: impl Into<UserId>, trigger: impl Into<String>, response: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let trigger = trigger.into();

        Self {
            id: Self::rule_id(&user_id, &trigger),
            user_id,
            trigger,
            responses: vec![response.into()],
            category: CUSTOM_CATEGORY.to_string(),
            usage_count: 0,
            created_at: Utc::now(),
        }
    }

    /// Stable id for a (user, normalized trigger) pair.
    pub fn rule_id(user_id: &str, trigger: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(user_id.as_bytes());
        hasher.update([0u8]);
        hasher.update(trigger.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn has_response(&self, response: &str) -> bool {
        self.responses.iter().any(|existing| existing == response)
    }

    /// Returns false when the response is already known.
    pub fn add_response(&mut self, response: impl Into<String>) -> bool {
        let response = response.into();
        if self.has_response(&response) {
            return false;
        }
        self.responses.push(response);
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingKind {
    Fact,
    Pair,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingEntry {
    pub id: String,
    pub user_id: UserId,
    pub kind: TrainingKind,
    pub key: Option<String>,
    pub value: String,
    pub created_at: DateTime<Utc>,
}

impl TrainingEntry {
    fn new(user_id: impl Into<UserId>, kind: TrainingKind, key: Option<String>, value: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            kind,
            key,
            value: value.into(),
            created_at: Utc::now(),
        }
    }

    pub fn fact(user_id: impl Into<UserId>, key: Option<String>, value: impl Into<String>) -> Self {
        Self::new(user_id, TrainingKind::Fact, key, value)
    }

    pub fn pair(user_id: impl Into<UserId>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(user_id, TrainingKind::Pair, Some(key.into()), value)
    }
}
