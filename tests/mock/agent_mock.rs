use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thulli_core::config::MemoryConfig;
use thulli_core::modules::memory::{ConversationLogStore, LongTermMemory};
use thulli_core::modules::storage::{BehaviorRule, ConversationLog, MemoryRecord, TrainingEntry};
use thulli_core::{
    Agent, AgentConfig, Analysis, CollaboratorError, InMemoryStorage, LexiconAnalyzer, ScriptedRandom, Storage,
    StoreError, TextAnalyzer,
};

/// Builds an analysis carrying only the given emotions, intents and topics.
pub fn analysis(text: &str, emotions: &[&str], intents: &[&str], topics: &[&str]) -> Analysis {
    Analysis {
        text: text.to_string(),
        emotions: emotions.iter().map(|e| e.to_string()).collect(),
        intents: intents.iter().map(|i| i.to_string()).collect(),
        topics: topics.iter().map(|t| t.to_string()).collect(),
        ..Analysis::default()
    }
}

/// Replies with canned analyses per exact text, or a default one.
pub struct ScriptedAnalyzer {
    responses: HashMap<String, Result<Analysis, CollaboratorError>>,
    default_response: Result<Analysis, CollaboratorError>,
}

impl ScriptedAnalyzer {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            default_response: Ok(Analysis::default()),
        }
    }

    pub fn with_response(mut self, text: &str, response: Result<Analysis, CollaboratorError>) -> Self {
        self.responses.insert(text.to_string(), response);
        self
    }

    pub fn with_default_response(mut self, response: Result<Analysis, CollaboratorError>) -> Self {
        self.default_response = response;
        self
    }

    pub fn feeling(emotion: &str) -> Self {
        Self::new().with_default_response(Ok(analysis("", &[emotion], &[], &[])))
    }

    pub fn offline() -> Self {
        Self::new().with_default_response(Err(CollaboratorError::Analysis("analysis service offline".to_string())))
    }
}

#[async_trait]
impl TextAnalyzer for ScriptedAnalyzer {
    async fn analyze(&self, text: &str) -> Result<Analysis, CollaboratorError> {
        let response = self.responses.get(text).unwrap_or(&self.default_response);
        response.clone().map(|mut analysis| {
            analysis.text = text.to_string();
            analysis
        })
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, CollaboratorError> {
        Ok(LexiconAnalyzer::new().embed_text(text))
    }
}

/// Which storage call `FailingStorage` refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    LogWrites,
    MemoryCount,
    RuleReads,
}

/// In-memory storage that fails one kind of call.
pub struct FailingStorage {
    inner: InMemoryStorage,
    failure: Failure,
}

impl FailingStorage {
    pub fn new(failure: Failure) -> Self {
        Self {
            inner: InMemoryStorage::new(),
            failure,
        }
    }
}

#[async_trait]
impl Storage for FailingStorage {
    async fn load_log(&self, user_id: &str) -> Result<Option<ConversationLog>, StoreError> {
        self.inner.load_log(user_id).await
    }

    async fn save_log(&self, log: ConversationLog) -> Result<(), StoreError> {
        if self.failure == Failure::LogWrites {
            return Err(StoreError::LockPoisoned("logs"));
        }
        self.inner.save_log(log).await
    }

    async fn insert_memory(&self, record: MemoryRecord) -> Result<(), StoreError> {
        self.inner.insert_memory(record).await
    }

    async fn memories(&self, user_id: &str) -> Result<Vec<MemoryRecord>, StoreError> {
        self.inner.memories(user_id).await
    }

    async fn count_memories(&self, user_id: &str) -> Result<usize, StoreError> {
        if self.failure == Failure::MemoryCount {
            return Err(StoreError::LockPoisoned("memories"));
        }
        self.inner.count_memories(user_id).await
    }

    async fn delete_memories(&self, user_id: &str, ids: &[String]) -> Result<usize, StoreError> {
        self.inner.delete_memories(user_id, ids).await
    }

    async fn find_rule(&self, user_id: &str, trigger: &str) -> Result<Option<BehaviorRule>, StoreError> {
        self.inner.find_rule(user_id, trigger).await
    }

    async fn rules(&self, user_id: &str) -> Result<Vec<BehaviorRule>, StoreError> {
        if self.failure == Failure::RuleReads {
            return Err(StoreError::LockPoisoned("rules"));
        }
        self.inner.rules(user_id).await
    }

    async fn save_rule(&self, rule: BehaviorRule) -> Result<(), StoreError> {
        self.inner.save_rule(rule).await
    }

    async fn insert_training(&self, entry: TrainingEntry) -> Result<(), StoreError> {
        self.inner.insert_training(entry).await
    }

    async fn training(&self, user_id: &str) -> Result<Vec<TrainingEntry>, StoreError> {
        self.inner.training(user_id).await
    }
}

/// An agent over fresh in-memory storage whose random draws are all `draw`.
pub fn scripted_agent(draw: f64) -> (Arc<InMemoryStorage>, Agent) {
    let storage = Arc::new(InMemoryStorage::new());
    let agent = Agent::builder(AgentConfig::default())
        .storage(storage.clone())
        .random(Arc::new(ScriptedRandom::constant(draw)))
        .build()
        .expect("default config builds an agent");
    (storage, agent)
}

/// Agent over in-memory storage with a chosen analyzer.
pub struct AgentWith;

impl AgentWith {
    pub fn analyzer(analyzer: ScriptedAnalyzer) -> Agent {
        Agent::builder(AgentConfig::default())
            .analyzer(Arc::new(analyzer))
            .random(Arc::new(ScriptedRandom::constant(0.0)))
            .build()
            .expect("default config builds an agent")
    }
}

/// Long-term memory wired to its own in-memory storage and log.
pub struct TestMemory {
    pub storage: Arc<InMemoryStorage>,
    pub log: Arc<ConversationLogStore>,
    pub memory: LongTermMemory,
}

impl TestMemory {
    pub fn new() -> Self {
        let storage = Arc::new(InMemoryStorage::new());
        let config = MemoryConfig::default();
        let log = Arc::new(ConversationLogStore::new(storage.clone(), &config));
        let memory = LongTermMemory::new(storage.clone(), log.clone(), Arc::new(LexiconAnalyzer::new()), config);
        Self { storage, log, memory }
    }

    pub fn record(&self, user_id: &str, summary: &str, tag: Option<&str>, importance: f32) -> MemoryRecord {
        let tags = tag.map(|tag| vec![tag.to_string()]).unwrap_or_default();
        MemoryRecord::new(user_id, format!("test:{}", summary), summary, tags, importance, "neutral")
    }
}
