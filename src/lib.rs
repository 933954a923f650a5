pub mod agent;
pub mod api;
pub mod config;
pub mod modules;
pub mod pipeline;
pub mod utils;

#[cfg(test)]
mod _test_mock;

pub use agent::{Agent, AgentBuilder, AgentError, AgentResult, TurnOutcome};
pub use config::{AgentConfig, ConfigError, EmotionConfig, Identity, MemoryConfig, PersonalityTraits, RecallConfig};
pub use modules::analysis::{Analysis, CollaboratorError, LexiconAnalyzer, TextAnalyzer};
pub use modules::emotion::{EmotionSnapshot, EmotionState, EmotionStateStore, InMemoryEmotionStore};
pub use modules::intents::{IntentClassifier, PhraseClassifier};
pub use modules::storage::{InMemoryStorage, JsonFileStorage, Storage, StoreError};
pub use modules::tasks::{SearchProvider, TaskIntentResolver, TaskResolver, WebSearch};
pub use utils::random::{RandomSource, ScriptedRandom, StdRandom};
