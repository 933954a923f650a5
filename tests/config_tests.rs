pub mod mock;

use std::io::Write;
use thulli_core::{Agent, AgentConfig, ConfigError, EmotionConfig, Identity, PersonalityTraits};

#[test]
fn test_identity() {
    let identity = Identity::new("Nova", "Ada");
    assert_eq!(identity.name, "Nova");
    assert_eq!(identity.creator, "Ada");
    assert_eq!(identity.background, "");

    let default = Identity::default();
    assert_eq!(default.name, "Thulli");
    assert_eq!(default.creator, "silentCosmo");
}

#[test]
fn test_personality_traits() {
    let mut traits = PersonalityTraits::default();
    assert_eq!(traits.humor, 0.22);
    assert_eq!(traits.curiosity, 0.4);
    assert_eq!(traits.kindness, 0.5);
    assert!(traits.validate().is_ok());

    traits.kindness = 1.5;
    assert!(traits.validate().is_err());
}

#[test]
fn test_emotion_config() {
    let emotion = EmotionConfig::new(0.05);
    assert_eq!(emotion.decay_rate, 0.05);
    assert_eq!(emotion.initial_intensity, 0.1);
    assert_eq!(emotion.nudge_weight, 0.25);
}

#[test]
fn test_agent_config_defaults() {
    let config = AgentConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.memory.window, 30);
    assert_eq!(config.memory.summarize_after, 6);
    assert_eq!(config.memory.compaction_threshold, 500);
    assert_eq!(config.recall.match_threshold, 0.4);
    assert_eq!(config.recall.classifier_threshold, 0.7);
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = AgentConfig::from_toml_str(
        r#"
        [identity]
        name = "Nova"

        [personality]
        humor = 0.9
        "#,
    )
    .unwrap();

    assert_eq!(config.identity.name, "Nova");
    assert_eq!(config.identity.creator, "silentCosmo");
    assert_eq!(config.personality.humor, 0.9);
    assert_eq!(config.personality.kindness, 0.5);
    assert_eq!(config.memory.window, 30);
}

#[test]
fn test_invalid_toml_is_rejected() {
    let out_of_range = AgentConfig::from_toml_str("[personality]\ncuriosity = 2.0\n");
    assert!(matches!(out_of_range, Err(ConfigError::Invalid(_))));

    let nameless = AgentConfig::from_toml_str("[identity]\nname = \"  \"\n");
    assert!(matches!(nameless, Err(ConfigError::Invalid(_))));

    let malformed = AgentConfig::from_toml_str("[identity\nname = 1");
    assert!(matches!(malformed, Err(ConfigError::Parse(_))));
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[memory]\nsummarize_after = 3").unwrap();

    let config = AgentConfig::from_toml_file(file.path()).unwrap();
    assert_eq!(config.memory.summarize_after, 3);

    let missing = AgentConfig::from_toml_file("/nonexistent/thulli.toml");
    assert!(matches!(missing, Err(ConfigError::Io(_))));
}

#[test]
fn test_builder_rejects_invalid_config() {
    let mut config = AgentConfig::default();
    config.personality.humor = -0.1;

    let err = Agent::builder(config).build().err().unwrap();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_agent_name_drives_training_commands() {
    let mut config = AgentConfig::default();
    config.identity = Identity::new("Nova", "Ada");
    let agent = Agent::builder(config).build().unwrap();

    let outcome = agent.handle_turn("user-1", "Dear", "Nova, remember I like tea").await.unwrap();
    assert_eq!(outcome.reply, "Got it! I'll remember that.");
    assert_eq!(outcome.stage, "training_command");
}
