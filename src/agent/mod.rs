pub mod error;

use crate::config::AgentConfig;
use crate::modules::analysis::{Analysis, LexiconAnalyzer, TextAnalyzer};
use crate::modules::behavior::BehaviorStore;
use crate::modules::emotion::{EmotionSnapshot, EmotionStateStore, InMemoryEmotionStore};
use crate::modules::intents::{IntentClassifier, PhraseClassifier};
use crate::modules::memory::{ConversationLogStore, LongTermMemory, TrainingStore};
use crate::modules::storage::{BehaviorRule, InMemoryStorage, LogEntry, MemoryRecord, Speaker, Storage};
use crate::modules::tasks::{TaskIntentResolver, TaskResolver};
use crate::pipeline::phrases::FALLBACKS;
use crate::pipeline::{
    BasicIntentStage, BehaviorMatchStage, BehaviorTeachingStage, CommandContext, ComposerStage, DynamicFactStage,
    FactQueryStage, MemoryCheckStage, PairLookupStage, Pipeline, SemanticRecallStage, StageReply, TaskStage,
    TrainingCommandStage, TurnContext,
};
use crate::utils::keyed_lock::KeyedLocks;
use crate::utils::random::{RandomSource, StdRandom};
use serde::Serialize;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub use error::{AgentError, AgentResult};

const RECENT_MESSAGES: usize = 10;

/// Result of one conversational turn.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    pub reply: String,
    pub emotion_state: EmotionSnapshot,
    /// `None` when a training command answered before analysis ran.
    pub analysis: Option<Analysis>,
    pub stage: &'static str,
}

/// Collaborators default to the in-process implementations.
pub struct AgentBuilder {
    config: AgentConfig,
    storage: Option<Arc<dyn Storage>>,
    emotions: Option<Arc<dyn EmotionStateStore>>,
    analyzer: Option<Arc<dyn TextAnalyzer>>,
    tasks: Option<Arc<dyn TaskResolver>>,
    classifier: Option<Arc<dyn IntentClassifier>>,
    random: Option<Arc<dyn RandomSource>>,
}

impl AgentBuilder {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            storage: None,
            emotions: None,
            analyzer: None,
            tasks: None,
            classifier: None,
            random: None,
        }
    }

    pub fn storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn emotions(mut self, emotions: Arc<dyn EmotionStateStore>) -> Self {
        self.emotions = Some(emotions);
        self
    }

    pub fn analyzer(mut self, analyzer: Arc<dyn TextAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn tasks(mut self, tasks: Arc<dyn TaskResolver>) -> Self {
        self.tasks = Some(tasks);
        self
    }

    pub fn classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn random(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    pub fn build(self) -> AgentResult<Agent> {
        self.config
            .validate()
            .map_err(|e| AgentError::Validation(e.to_string()))?;

        let config = self.config;
        let storage: Arc<dyn Storage> = match self.storage {
            Some(storage) => storage,
            None => Arc::new(InMemoryStorage::new()),
        };
        let emotions: Arc<dyn EmotionStateStore> = match self.emotions {
            Some(emotions) => emotions,
            None => Arc::new(InMemoryEmotionStore::new(config.emotion.clone())),
        };
        let analyzer: Arc<dyn TextAnalyzer> = match self.analyzer {
            Some(analyzer) => analyzer,
            None => Arc::new(LexiconAnalyzer::new()),
        };
        let random: Arc<dyn RandomSource> = match self.random {
            Some(random) => random,
            None => Arc::new(StdRandom::from_entropy()),
        };
        let tasks: Arc<dyn TaskResolver> = match self.tasks {
            Some(tasks) => tasks,
            None => Arc::new(TaskIntentResolver::new()),
        };
        let classifier: Arc<dyn IntentClassifier> = match self.classifier {
            Some(classifier) => classifier,
            None => Arc::new(PhraseClassifier::new(
                config.identity.clone(),
                random.clone(),
                config.recall.classifier_threshold,
            )),
        };

        let log = Arc::new(ConversationLogStore::new(storage.clone(), &config.memory));
        let memory = Arc::new(LongTermMemory::new(
            storage.clone(),
            log.clone(),
            analyzer.clone(),
            config.memory.clone(),
        ));
        let training = Arc::new(TrainingStore::new(storage.clone()));
        let behaviors = Arc::new(BehaviorStore::new(storage.clone(), random.clone()));

        let commands = Pipeline::new().with_stage(TrainingCommandStage::new(training.clone(), &config.identity.name)?);

        let stages = Pipeline::new()
            .with_stage(BehaviorTeachingStage::new(behaviors.clone()))
            .with_stage(BehaviorMatchStage::new(behaviors.clone()))
            .with_stage(TaskStage::new(tasks))
            .with_stage(BasicIntentStage::new(classifier))
            .with_stage(MemoryCheckStage::new(
                memory.clone(),
                random.clone(),
                config.recall.match_threshold,
            ))
            .with_stage(PairLookupStage)
            .with_stage(FactQueryStage)
            .with_stage(DynamicFactStage::new(training.clone()))
            .with_stage(SemanticRecallStage::new(analyzer.clone(), config.recall.semantic_threshold))
            .with_stage(ComposerStage::new(
                training.clone(),
                memory.clone(),
                random,
                config.identity.clone(),
                config.personality.clone(),
            ));

        Ok(Agent {
            config,
            storage,
            emotions,
            analyzer,
            log,
            memory,
            training,
            behaviors,
            commands,
            stages,
            turn_locks: KeyedLocks::new(),
        })
    }
}

/// Turns one utterance plus the stored per-user history into a reply.
pub struct Agent {
    config: AgentConfig,
    storage: Arc<dyn Storage>,
    emotions: Arc<dyn EmotionStateStore>,
    analyzer: Arc<dyn TextAnalyzer>,
    log: Arc<ConversationLogStore>,
    memory: Arc<LongTermMemory>,
    training: Arc<TrainingStore>,
    behaviors: Arc<BehaviorStore>,
    commands: Pipeline<CommandContext>,
    stages: Pipeline<TurnContext>,
    turn_locks: KeyedLocks,
}

impl Agent {
    pub fn builder(config: AgentConfig) -> AgentBuilder {
        AgentBuilder::new(config)
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        let mut names = self.commands.stage_names();
        names.extend(self.stages.stage_names());
        names
    }

    pub async fn handle_turn(&self, user_id: &str, user_name: &str, utterance: &str) -> AgentResult<TurnOutcome> {
        let text = utterance.trim();
        if text.is_empty() {
            return Err(AgentError::Validation("Utterance must not be empty".to_string()));
        }

        let _turn = self.turn_locks.lock(user_id).await;
        tracing::debug!(user_id, "handling turn");

        let command = CommandContext::new(user_id, text);
        if let Some(reply) = self.commands.run(&command).await? {
            self.log.append(user_id, Speaker::Assistant, &reply.text).await?;
            let emotion_state = self.emotions.snapshot(user_id).await?;
            return Ok(TurnOutcome {
                reply: reply.text,
                emotion_state,
                analysis: None,
                stage: reply.stage,
            });
        }

        let analysis = self.analyzer.analyze(text).await?;

        let mut state = self.emotions.load(user_id).await?;
        let emotion_state = state.apply_turn(&analysis.emotions);

        // The stage chain sees this utterance before anything about the turn is written.
        let mut recent = self.log.recent(user_id, RECENT_MESSAGES).await?;
        recent.push(LogEntry::new(Speaker::User, text));
        if recent.len() > RECENT_MESSAGES {
            recent.drain(..recent.len() - RECENT_MESSAGES);
        }

        let context = TurnContext {
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            utterance: text.to_string(),
            analysis,
            emotion: emotion_state.clone(),
            recent,
            training: self.training.load(user_id).await?,
        };

        let reply = match self.stages.run(&context).await? {
            Some(reply) => reply,
            None => StageReply {
                stage: "fallback",
                text: FALLBACKS[0].to_string(),
            },
        };

        self.emotions.save(user_id, state).await?;
        self.log.append(user_id, Speaker::User, text).await?;
        if self.log.should_summarize(user_id).await? {
            match self.memory.summarize_and_store(user_id).await {
                Ok(record) => {
                    if let Some(record) = record {
                        tracing::info!(user_id, key = %record.key, "summarized conversation");
                    }
                    self.spawn_compaction(user_id);
                }
                Err(e) => tracing::warn!(user_id, error = %e, "summarization failed"),
            }
        }
        self.log.append(user_id, Speaker::Assistant, &reply.text).await?;

        tracing::debug!(user_id, stage = reply.stage, "turn complete");
        Ok(TurnOutcome {
            reply: reply.text,
            emotion_state,
            analysis: Some(context.analysis),
            stage: reply.stage,
        })
    }

    /// Runs compaction for `user_id` in the background; failures are logged and dropped.
    pub fn spawn_compaction(&self, user_id: &str) -> JoinHandle<()> {
        let memory = self.memory.clone();
        let user_id = user_id.to_string();
        let threshold = self.config.memory.compaction_threshold;

        tokio::spawn(async move {
            match memory.compact_if_needed(&user_id, threshold).await {
                Ok(report) if !report.is_noop() => tracing::info!(
                    user_id = %user_id,
                    merged = report.merged_records,
                    deleted = report.deleted_records,
                    "background compaction finished"
                ),
                Ok(_) => {}
                Err(e) => tracing::warn!(user_id = %user_id, error = %e, "background compaction failed"),
            }
        })
    }

    pub async fn emotion_state(&self, user_id: &str) -> AgentResult<EmotionSnapshot> {
        Ok(self.emotions.snapshot(user_id).await?)
    }

    pub async fn conversation(&self, user_id: &str) -> AgentResult<Vec<LogEntry>> {
        Ok(self.log.messages(user_id).await?)
    }

    pub async fn memories(&self, user_id: &str) -> AgentResult<Vec<MemoryRecord>> {
        Ok(self.storage.memories(user_id).await?)
    }

    pub async fn behaviors(&self, user_id: &str) -> AgentResult<Vec<BehaviorRule>> {
        Ok(self.behaviors.rules(user_id).await?)
    }
}
