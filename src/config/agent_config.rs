use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub type TraitValue = f32;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    pub name: String,
    pub creator: String,
    pub background: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, creator: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            creator: creator.into(),
            background: String::new(),
        }
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: "Thulli".to_string(),
            creator: "silentCosmo".to_string(),
            background: "a curious companion that remembers what you teach it".to_string(),
        }
    }
}

/// Probability, per reply, that each personality flavor line is added.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityTraits {
    pub humor: TraitValue,
    pub curiosity: TraitValue,
    pub kindness: TraitValue,
}

impl PersonalityTraits {
    pub fn new(humor: TraitValue, curiosity: TraitValue, kindness: TraitValue) -> Self {
        Self {
            humor,
            curiosity,
            kindness,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        let traits = [
            ("humor", self.humor),
            ("curiosity", self.curiosity),
            ("kindness", self.kindness),
        ];

        for (name, value) in traits {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!(
                    "Personality trait '{}' has value {}, but must be between 0.0 and 1.0",
                    name, value
                ));
            }
        }

        Ok(())
    }
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self::new(0.22, 0.4, 0.5)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionConfig {
    pub initial_intensity: f32,
    pub decay_rate: f32,
    pub nudge_weight: f32,
    pub trigger_capacity: usize,
}

impl EmotionConfig {
    pub fn new(decay_rate: f32) -> Self {
        Self {
            decay_rate,
            ..Self::default()
        }
    }
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            initial_intensity: 0.1,
            decay_rate: 0.01,
            nudge_weight: 0.25,
            trigger_capacity: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Messages kept in a user's conversation log.
    pub window: usize,
    /// User turns that trigger summarization into long-term memory.
    pub summarize_after: usize,
    pub compaction_threshold: usize,
    pub compaction_batch: usize,
    pub merge_limit: usize,
    pub recent_memories: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            window: 30,
            summarize_after: 6,
            compaction_threshold: 500,
            compaction_batch: 50,
            merge_limit: 20,
            recent_memories: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecallConfig {
    pub match_threshold: f64,
    pub semantic_threshold: f32,
    pub classifier_threshold: f64,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.4,
            semantic_threshold: 0.75,
            classifier_threshold: 0.7,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub identity: Identity,
    pub personality: PersonalityTraits,
    pub emotion: EmotionConfig,
    pub memory: MemoryConfig,
    pub recall: RecallConfig,
}

impl AgentConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: AgentConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.personality.validate().map_err(ConfigError::Invalid)?;

        if self.identity.name.trim().is_empty() {
            return Err(ConfigError::Invalid("Identity name must not be empty".to_string()));
        }
        if !(0.0..=1.0).contains(&self.emotion.initial_intensity) {
            return Err(ConfigError::Invalid(format!(
                "Initial intensity {} must be between 0.0 and 1.0",
                self.emotion.initial_intensity
            )));
        }
        if self.emotion.decay_rate < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "Decay rate {} must not be negative",
                self.emotion.decay_rate
            )));
        }
        if self.memory.window == 0 || self.memory.summarize_after == 0 {
            return Err(ConfigError::Invalid(
                "Memory window and summarize_after must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
