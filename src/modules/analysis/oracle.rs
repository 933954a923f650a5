use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum CollaboratorError {
    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Task error: {0}")]
    Task(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Classifier error: {0}")]
    Classifier(String),
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(error: reqwest::Error) -> Self {
        CollaboratorError::Search(error.to_string())
    }
}

/// What the text-analysis oracle extracted from one utterance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub text: String,
    pub emotions: Vec<String>,
    pub emotion_scores: HashMap<String, f64>,
    pub intents: Vec<String>,
    pub topics: Vec<String>,
    pub entities: Vec<String>,
    pub sentiment: f64,
    pub tone: String,
    pub is_question: bool,
}

impl Analysis {
    pub fn top_emotion(&self) -> Option<&str> {
        self.emotions.first().map(String::as_str)
    }

    pub fn emotion_score(&self, emotion: &str) -> Option<f64> {
        self.emotion_scores.get(emotion).copied()
    }

    pub fn has_intent(&self, intent: &str) -> bool {
        self.intents.iter().any(|existing| existing == intent)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<Analysis, CollaboratorError>;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, CollaboratorError>;

    fn cosine_similarity(&self, a: &[f32], b: &[f32]) -> f32 {
        crate::modules::analysis::similarity::cosine_similarity(a, b)
    }
}
