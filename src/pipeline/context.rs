use crate::modules::analysis::Analysis;
use crate::modules::emotion::EmotionSnapshot;
use crate::modules::memory::TrainingSet;
use crate::modules::storage::{LogEntry, Speaker};

/// What the pre-analysis command stages see.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub user_id: String,
    pub utterance: String,
}

impl CommandContext {
    pub fn new(user_id: impl Into<String>, utterance: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            utterance: utterance.into(),
        }
    }
}

/// Everything the post-analysis stages may read about the current turn.
#[derive(Debug, Clone)]
pub struct TurnContext {
    pub user_id: String,
    pub user_name: String,
    pub utterance: String,
    pub analysis: Analysis,
    pub emotion: EmotionSnapshot,
    /// Recent log entries, most recent last, including this turn's utterance
    /// unless the log was just summarized.
    pub recent: Vec<LogEntry>,
    pub training: TrainingSet,
}

impl TurnContext {
    pub fn lowercase(&self) -> String {
        self.utterance.trim().to_lowercase()
    }

    pub fn last_from(&self, speaker: Speaker) -> Option<&LogEntry> {
        self.recent.iter().rev().find(|entry| entry.from == speaker)
    }

    pub fn top_emotion(&self) -> Option<&str> {
        self.analysis.top_emotion()
    }

    pub fn is_negative_mood(&self) -> bool {
        matches!(self.top_emotion(), Some("sad" | "angry" | "anxious"))
    }
}
