use crate::agent::error::AgentResult;
use async_trait::async_trait;

/// One strategy in the reply chain. `None` passes the turn to the next stage.
#[async_trait]
pub trait Stage<C>: Send + Sync
where
    C: Send + Sync,
{
    fn name(&self) -> &'static str;

    async fn attempt(&self, context: &C) -> AgentResult<Option<String>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReply {
    pub stage: &'static str,
    pub text: String,
}

/// Ordered stages; the first one to produce a reply wins.
pub struct Pipeline<C> {
    stages: Vec<Box<dyn Stage<C>>>,
}

impl<C> Pipeline<C>
where
    C: Send + Sync,
{
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    pub fn with_stage<S>(mut self, stage: S) -> Self
    where
        S: Stage<C> + 'static,
    {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub async fn run(&self, context: &C) -> AgentResult<Option<StageReply>> {
        for stage in &self.stages {
            if let Some(text) = stage.attempt(context).await? {
                tracing::debug!(stage = stage.name(), "stage produced reply");
                return Ok(Some(StageReply {
                    stage: stage.name(),
                    text,
                }));
            }
        }

        Ok(None)
    }
}

impl<C> Default for Pipeline<C>
where
    C: Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Pipeline, Stage};
    use crate::agent::error::{AgentError, AgentResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed {
        name: &'static str,
        reply: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Stage<String> for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn attempt(&self, _context: &String) -> AgentResult<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.map(str::to_string))
        }
    }

    struct Failing;

    #[async_trait]
    impl Stage<String> for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn attempt(&self, _context: &String) -> AgentResult<Option<String>> {
            Err(AgentError::Internal("storage offline".to_string()))
        }
    }

    fn fixed(name: &'static str, reply: Option<&'static str>, calls: &Arc<AtomicUsize>) -> Fixed {
        Fixed {
            name,
            reply,
            calls: calls.clone(),
        }
    }

    #[tokio::test]
    async fn test_first_reply_wins() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new()
            .with_stage(fixed("skip", None, &calls))
            .with_stage(fixed("answer", Some("hello"), &calls))
            .with_stage(fixed("never", Some("unreachable"), &calls));

        let reply = pipeline.run(&"hi".to_string()).await.unwrap().unwrap();
        assert_eq!(reply.stage, "answer");
        assert_eq!(reply.text, "hello");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(pipeline.stage_names(), vec!["skip", "answer", "never"]);
    }

    #[tokio::test]
    async fn test_errors_abort_the_chain() {
        let calls = Arc::new(AtomicUsize::new(0));
        let pipeline = Pipeline::new()
            .with_stage(Failing)
            .with_stage(fixed("after", Some("late"), &calls));

        assert!(pipeline.run(&"hi".to_string()).await.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_pipeline_yields_nothing() {
        let pipeline: Pipeline<String> = Pipeline::default();
        assert!(pipeline.is_empty());
        assert!(pipeline.run(&"hi".to_string()).await.unwrap().is_none());
    }
}
