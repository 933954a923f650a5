pub mod agent_config;

pub use agent_config::{
    AgentConfig, ConfigError, EmotionConfig, Identity, MemoryConfig, PersonalityTraits, RecallConfig, TraitValue,
};
