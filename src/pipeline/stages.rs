use crate::agent::error::AgentResult;
use crate::modules::analysis::{CollaboratorError, TextAnalyzer};
use crate::modules::behavior::BehaviorStore;
use crate::modules::intents::IntentClassifier;
use crate::modules::memory::{LongTermMemory, Recollection, TrainingStore};
use crate::modules::tasks::TaskResolver;
use crate::pipeline::context::TurnContext;
use crate::pipeline::phrases::REMIND_ME;
use crate::pipeline::stage::Stage;
use crate::utils::random::{choose, RandomSource};
use crate::utils::text::strip_punctuation;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

lazy_static! {
    static ref MEMORY_CHECK: Regex = Regex::new(r"(?i)^\s*(?:do|did|have|has|will|can)\s+you\s+remember").unwrap();
    static ref REMEMBER_WORD: Regex = Regex::new(r"(?i)remember").unwrap();
    static ref FACT_QUERY: Regex = Regex::new(r"(?i)who is (.+)|what is (.+)").unwrap();
    static ref FACT_STATEMENT: Regex = Regex::new(r"(?i)^(.*)\s+is\s+(.*)$").unwrap();
}

const MAX_LISTED_MATCHES: usize = 3;

pub struct BehaviorTeachingStage {
    behaviors: Arc<BehaviorStore>,
}

impl BehaviorTeachingStage {
    pub fn new(behaviors: Arc<BehaviorStore>) -> Self {
        Self { behaviors }
    }
}

#[async_trait]
impl Stage<TurnContext> for BehaviorTeachingStage {
    fn name(&self) -> &'static str {
        "behavior_teaching"
    }

    async fn attempt(&self, context: &TurnContext) -> AgentResult<Option<String>> {
        Ok(self.behaviors.detect_and_learn(&context.user_id, &context.utterance).await?)
    }
}

pub struct BehaviorMatchStage {
    behaviors: Arc<BehaviorStore>,
}

impl BehaviorMatchStage {
    pub fn new(behaviors: Arc<BehaviorStore>) -> Self {
        Self { behaviors }
    }
}

#[async_trait]
impl Stage<TurnContext> for BehaviorMatchStage {
    fn name(&self) -> &'static str {
        "behavior_match"
    }

    async fn attempt(&self, context: &TurnContext) -> AgentResult<Option<String>> {
        Ok(self.behaviors.find_match(&context.user_id, &context.utterance).await?)
    }
}

pub struct TaskStage {
    tasks: Arc<dyn TaskResolver>,
}

impl TaskStage {
    pub fn new(tasks: Arc<dyn TaskResolver>) -> Self {
        Self { tasks }
    }
}

#[async_trait]
impl Stage<TurnContext> for TaskStage {
    fn name(&self) -> &'static str {
        "task"
    }

    async fn attempt(&self, context: &TurnContext) -> AgentResult<Option<String>> {
        match self.tasks.resolve(&context.user_id, &context.utterance).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                tracing::warn!(user_id = %context.user_id, error = %e, "task resolver failed");
                Ok(None)
            }
        }
    }
}

pub struct BasicIntentStage {
    classifier: Arc<dyn IntentClassifier>,
}

impl BasicIntentStage {
    pub fn new(classifier: Arc<dyn IntentClassifier>) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl Stage<TurnContext> for BasicIntentStage {
    fn name(&self) -> &'static str {
        "basic_intent"
    }

    async fn attempt(&self, context: &TurnContext) -> AgentResult<Option<String>> {
        match self.classifier.classify(&context.utterance).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                tracing::warn!(user_id = %context.user_id, error = %e, "intent classifier failed");
                Ok(None)
            }
        }
    }
}

/// Answers "do you remember ..." from taught facts and the newest memories.
pub struct MemoryCheckStage {
    memory: Arc<LongTermMemory>,
    random: Arc<dyn RandomSource>,
    threshold: f64,
}

impl MemoryCheckStage {
    pub fn new(memory: Arc<LongTermMemory>, random: Arc<dyn RandomSource>, threshold: f64) -> Self {
        Self {
            memory,
            random,
            threshold,
        }
    }

    fn query_fragment(utterance: &str) -> String {
        let after = match REMEMBER_WORD.find(utterance) {
            Some(found) => &utterance[found.end()..],
            None => "",
        };
        strip_punctuation(after.trim()).trim().to_lowercase()
    }
}

#[async_trait]
impl Stage<TurnContext> for MemoryCheckStage {
    fn name(&self) -> &'static str {
        "memory_check"
    }

    async fn attempt(&self, context: &TurnContext) -> AgentResult<Option<String>> {
        if !MEMORY_CHECK.is_match(&context.utterance) {
            return Ok(None);
        }

        let query = Self::query_fragment(&context.utterance);
        let recent = self
            .memory
            .recent(&context.user_id, self.memory.config().recent_memories)
            .await?;

        let candidates: Vec<Recollection> = context
            .training
            .facts()
            .iter()
            .cloned()
            .map(Recollection::Fact)
            .chain(recent.into_iter().map(Recollection::Memory))
            .collect();

        let matches = LongTermMemory::match_by_query(&query, &candidates, self.threshold);
        let reply = match matches.as_slice() {
            [] => choose(REMIND_ME, self.random.draw())
                .map(|line| line.to_string())
                .unwrap_or_default(),
            [only] => format!("Yes! You told me that {}.", only.recollection.value()),
            many => {
                let listed: Vec<String> = many
                    .iter()
                    .take(MAX_LISTED_MATCHES)
                    .enumerate()
                    .map(|(index, found)| format!("({}) {}", index + 1, found.recollection.value()))
                    .collect();
                format!("Yes! You told me: {}", listed.join(" | "))
            }
        };

        Ok(Some(reply))
    }
}

/// Replies with a taught pair whose key appears in the utterance.
pub struct PairLookupStage;

#[async_trait]
impl Stage<TurnContext> for PairLookupStage {
    fn name(&self) -> &'static str {
        "pair_lookup"
    }

    async fn attempt(&self, context: &TurnContext) -> AgentResult<Option<String>> {
        Ok(context.training.pair_in(&context.utterance).map(|pair| pair.value.clone()))
    }
}

/// `who is X` / `what is X` against taught facts. A miss asks to be taught.
pub struct FactQueryStage;

impl FactQueryStage {
    fn query_key(utterance: &str) -> Option<String> {
        let captures = FACT_QUERY.captures(utterance)?;
        let raw = captures.get(1).or_else(|| captures.get(2))?.as_str();
        let key = raw.trim().trim_end_matches(['?', '!', '.']).trim().to_lowercase();

        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}

#[async_trait]
impl Stage<TurnContext> for FactQueryStage {
    fn name(&self) -> &'static str {
        "fact_query"
    }

    async fn attempt(&self, context: &TurnContext) -> AgentResult<Option<String>> {
        let key = match Self::query_key(&context.utterance) {
            Some(key) => key,
            None => return Ok(None),
        };

        let reply = match context.training.fact_by_key(&key) {
            Some(fact) => fact.value.clone(),
            None => format!("I'm not sure... teach me about {}!", key),
        };
        Ok(Some(reply))
    }
}

/// Learns `<key> is <value>` statements about things not yet known.
pub struct DynamicFactStage {
    training: Arc<TrainingStore>,
}

impl DynamicFactStage {
    pub fn new(training: Arc<TrainingStore>) -> Self {
        Self { training }
    }
}

#[async_trait]
impl Stage<TurnContext> for DynamicFactStage {
    fn name(&self) -> &'static str {
        "dynamic_fact"
    }

    async fn attempt(&self, context: &TurnContext) -> AgentResult<Option<String>> {
        let captures = match FACT_STATEMENT.captures(context.utterance.trim()) {
            Some(captures) => captures,
            None => return Ok(None),
        };

        let key = captures[1].trim().to_lowercase();
        let value = captures[2].trim();
        if key.is_empty() || value.is_empty() || context.training.has_fact(&key) {
            return Ok(None);
        }

        self.training
            .remember_fact(&context.user_id, Some(key.clone()), value)
            .await?;
        tracing::debug!(user_id = %context.user_id, key = %key, "learned fact from statement");

        Ok(Some(format!("Oh! That's new to me. I'll remember that {} is {}.", key, value)))
    }
}

/// Embedding similarity between the utterance and every taught fact value.
pub struct SemanticRecallStage {
    analyzer: Arc<dyn TextAnalyzer>,
    threshold: f32,
}

impl SemanticRecallStage {
    pub fn new(analyzer: Arc<dyn TextAnalyzer>, threshold: f32) -> Self {
        Self { analyzer, threshold }
    }

    async fn best_fact(&self, context: &TurnContext) -> Result<Option<(String, f32)>, CollaboratorError> {
        let query = self.analyzer.embed(&context.utterance).await?;

        let mut best: Option<(String, f32)> = None;
        for fact in context.training.facts() {
            let vector = self.analyzer.embed(&fact.value).await?;
            let score = self.analyzer.cosine_similarity(&query, &vector);
            if best.as_ref().map(|(_, top)| score > *top).unwrap_or(true) {
                best = Some((fact.value.clone(), score));
            }
        }

        Ok(best)
    }
}

#[async_trait]
impl Stage<TurnContext> for SemanticRecallStage {
    fn name(&self) -> &'static str {
        "semantic_recall"
    }

    async fn attempt(&self, context: &TurnContext) -> AgentResult<Option<String>> {
        if context.training.facts().is_empty() {
            return Ok(None);
        }

        match self.best_fact(context).await {
            Ok(Some((value, score))) if score > self.threshold => {
                tracing::debug!(user_id = %context.user_id, score, "semantic recall hit");
                Ok(Some(format!("Hmm, that reminds me, you once told me \"{}\".", value)))
            }
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!(user_id = %context.user_id, error = %e, "embedding failed");
                Ok(None)
            }
        }
    }
}
