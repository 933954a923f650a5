use crate::agent::error::{AgentError, AgentResult};
use crate::modules::memory::TrainingStore;
use crate::pipeline::context::CommandContext;
use crate::pipeline::stage::Stage;
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

pub const REMEMBERED: &str = "Got it! I'll remember that.";
pub const PAIR_LEARNED: &str = "Understood! I'll respond like that next time.";

/// Explicit training commands addressed to the agent, handled before analysis:
/// `[<name>,] remember <fact>` and `<name>, if I say X, you say Y`.
pub struct TrainingCommandStage {
    training: Arc<TrainingStore>,
    remember: Regex,
    pair: Regex,
}

impl TrainingCommandStage {
    pub fn new(training: Arc<TrainingStore>, agent_name: &str) -> AgentResult<Self> {
        let name = regex::escape(agent_name.trim());
        let remember = Regex::new(&format!(r"(?i)^\s*(?:{}\s*,?\s+)?remember\s+(?:that\s+)?(.+?)\s*$", name))
            .map_err(|e| AgentError::Internal(format!("Invalid remember pattern: {}", e)))?;
        let pair = Regex::new(&format!(r"(?i)^\s*{}\s*,?\s+if\s+i\s+say\s+(.+),\s*you\s+say\s+(.+?)\s*$", name))
            .map_err(|e| AgentError::Internal(format!("Invalid pair pattern: {}", e)))?;

        Ok(Self {
            training,
            remember,
            pair,
        })
    }
}

#[async_trait]
impl Stage<CommandContext> for TrainingCommandStage {
    fn name(&self) -> &'static str {
        "training_command"
    }

    async fn attempt(&self, context: &CommandContext) -> AgentResult<Option<String>> {
        if let Some(captures) = self.pair.captures(&context.utterance) {
            let key = captures[1].trim();
            let value = captures[2].trim();
            if !key.is_empty() && !value.is_empty() {
                self.training.teach_pair(&context.user_id, key, value).await?;
                tracing::debug!(user_id = %context.user_id, key, "taught reply pair");
                return Ok(Some(PAIR_LEARNED.to_string()));
            }
        }

        if let Some(captures) = self.remember.captures(&context.utterance) {
            let fact = captures[1].trim();
            if !fact.is_empty() {
                self.training
                    .remember_fact(&context.user_id, Some(fact.to_lowercase()), fact)
                    .await?;
                tracing::debug!(user_id = %context.user_id, "remembered fact");
                return Ok(Some(REMEMBERED.to_string()));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::{TrainingCommandStage, PAIR_LEARNED, REMEMBERED};
    use crate::modules::memory::TrainingStore;
    use crate::modules::storage::{InMemoryStorage, Storage, TrainingKind};
    use crate::pipeline::context::CommandContext;
    use crate::pipeline::stage::Stage;
    use std::sync::Arc;

    fn stage() -> (Arc<InMemoryStorage>, TrainingCommandStage) {
        let storage = Arc::new(InMemoryStorage::new());
        let training = Arc::new(TrainingStore::new(storage.clone()));
        (storage, TrainingCommandStage::new(training, "Thulli").unwrap())
    }

    #[tokio::test]
    async fn test_remember_command_stores_fact() {
        let (storage, stage) = stage();
        let context = CommandContext::new("user-1", "thulli, remember I have a dog named Max");

        let reply = stage.attempt(&context).await.unwrap();
        assert_eq!(reply.as_deref(), Some(REMEMBERED));

        let entries = storage.training("user-1").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, TrainingKind::Fact);
        assert_eq!(entries[0].key.as_deref(), Some("i have a dog named max"));
        assert_eq!(entries[0].value, "I have a dog named Max");
    }

    #[tokio::test]
    async fn test_remember_without_name_and_with_that() {
        let (storage, stage) = stage();
        let reply = stage
            .attempt(&CommandContext::new("user-1", "Remember that my birthday is in May"))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some(REMEMBERED));
        assert_eq!(storage.training("user-1").await.unwrap()[0].value, "my birthday is in May");
    }

    #[tokio::test]
    async fn test_pair_command_requires_name() {
        let (storage, stage) = stage();

        let reply = stage
            .attempt(&CommandContext::new("user-1", "Thulli, if I say marco, you say polo"))
            .await
            .unwrap();
        assert_eq!(reply.as_deref(), Some(PAIR_LEARNED));

        let entries = storage.training("user-1").await.unwrap();
        assert_eq!(entries[0].kind, TrainingKind::Pair);
        assert_eq!(entries[0].key.as_deref(), Some("marco"));
        assert_eq!(entries[0].value, "polo");

        let reply = stage
            .attempt(&CommandContext::new("user-1", "if I say ping, you say pong"))
            .await
            .unwrap();
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_questions_about_memory_are_not_commands() {
        let (storage, stage) = stage();
        assert!(stage
            .attempt(&CommandContext::new("user-1", "do you remember my dog"))
            .await
            .unwrap()
            .is_none());
        assert!(storage.training("user-1").await.unwrap().is_empty());
    }
}
