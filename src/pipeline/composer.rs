use crate::agent::error::AgentResult;
use crate::config::{Identity, PersonalityTraits, TraitValue};
use crate::modules::memory::{LongTermMemory, TrainingStore, GENERAL_TOPICS};
use crate::modules::storage::Speaker;
use crate::pipeline::context::TurnContext;
use crate::pipeline::phrases::{
    emotion_lines, intent_lines, CONFUSION, CURIOSITY, FALLBACKS, HUMOR, INTENT_PRIORITY, KINDNESS,
    REPHRASE_REMEMBER, STILL_HERE,
};
use crate::pipeline::stage::Stage;
use crate::utils::random::{choose, RandomSource};
use crate::utils::text::mirror_sentence;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

lazy_static! {
    static ref REMEMBER_CONTENT: Regex = Regex::new(r"(?i)remember(?: that)? (.+)").unwrap();
    static ref EMOTION_PREFIX: Regex = Regex::new(r"^[a-z_]+ about ").unwrap();
}

const CONFIDENT_EMOTION: f64 = 0.4;
const DEFAULT_EMOTION_SCORE: f64 = 0.5;
const CONTEXT_MEMORIES: usize = 3;

/// Terminal stage: assembles a reply from independently gated parts.
pub struct ComposerStage {
    training: Arc<TrainingStore>,
    memory: Arc<LongTermMemory>,
    random: Arc<dyn RandomSource>,
    identity: Identity,
    personality: PersonalityTraits,
}

impl ComposerStage {
    pub fn new(
        training: Arc<TrainingStore>,
        memory: Arc<LongTermMemory>,
        random: Arc<dyn RandomSource>,
        identity: Identity,
        personality: PersonalityTraits,
    ) -> Self {
        Self {
            training,
            memory,
            random,
            identity,
            personality,
        }
    }

    fn pick(&self, bank: &[&str]) -> Option<String> {
        choose(bank, self.random.draw()).map(|line| line.to_string())
    }

    fn roll_above(&self, gate: f64) -> bool {
        self.random.draw() > gate
    }

    fn trait_roll(&self, probability: TraitValue) -> bool {
        self.roll_above(1.0 - f64::from(probability))
    }

    async fn remember(&self, context: &TurnContext) -> AgentResult<String> {
        let content = REMEMBER_CONTENT
            .captures(&context.utterance)
            .and_then(|captures| captures.get(1))
            .map(|found| found.as_str().trim().to_string())
            .filter(|content| !content.is_empty());

        match content {
            Some(content) => {
                self.training.remember_fact(&context.user_id, None, &content).await?;
                Ok(format!("Got it! I'll remember that {}.", content))
            }
            None => Ok(REPHRASE_REMEMBER.to_string()),
        }
    }

    fn intent_line(&self, context: &TurnContext) -> Option<String> {
        let intents = &context.analysis.intents;
        let selected = INTENT_PRIORITY
            .iter()
            .find(|intent| context.analysis.has_intent(intent))
            .copied()
            .or_else(|| intents.first().map(String::as_str))?;

        let lines = intent_lines(selected, &self.identity.name, &context.user_name)?;
        choose(&lines, self.random.draw()).cloned()
    }

    fn emotion_line(&self, context: &TurnContext) -> Option<String> {
        let emotion = context.top_emotion()?;
        let bank = emotion_lines(emotion);
        let score = context.analysis.emotion_score(emotion).unwrap_or(DEFAULT_EMOTION_SCORE);

        if score > CONFIDENT_EMOTION {
            bank.first().map(|line| line.to_string())
        } else {
            self.pick(bank)
        }
    }

    fn mirror_line(&self, context: &TurnContext) -> Option<String> {
        let last_user = context.last_from(Speaker::User)?;
        if !self.roll_above(0.75) {
            return None;
        }

        let mirror = mirror_sentence(&last_user.text)?;
        let already_echoed = context
            .last_from(Speaker::Assistant)
            .map(|reply| reply.text.contains(&last_user.text))
            .unwrap_or(false);

        if already_echoed {
            None
        } else {
            Some(format!("You said: \"{}\"", mirror))
        }
    }

    async fn memory_line(&self, context: &TurnContext) -> AgentResult<Option<String>> {
        let memories = self
            .memory
            .recent(&context.user_id, self.memory.config().recent_memories)
            .await?;
        if memories.is_empty() || !self.roll_above(0.75) {
            return Ok(None);
        }

        let subjects: Vec<String> = memories
            .iter()
            .take(CONTEXT_MEMORIES)
            .flat_map(|record| record.summary.split('|'))
            .map(|summary| EMOTION_PREFIX.replace(summary.trim(), "").trim().to_string())
            .filter(|subject| !subject.is_empty() && subject != GENERAL_TOPICS)
            .collect();

        if subjects.is_empty() {
            Ok(None)
        } else {
            Ok(Some(format!("I remember you mentioned {} before.", subjects.join(", "))))
        }
    }

    async fn compose(&self, context: &TurnContext) -> AgentResult<String> {
        let negative = context.is_negative_mood();
        let mut parts: Vec<String> = Vec::new();

        let intent_line = self.intent_line(context);
        if let Some(line) = &intent_line {
            parts.push(line.clone());
        }

        if let Some(line) = self.emotion_line(context) {
            if intent_line.is_none() || self.roll_above(0.3) {
                parts.push(line);
            }
        }

        let topics = &context.analysis.topics;
        if !negative && !topics.is_empty() && self.roll_above(0.5) {
            let mentioned: Vec<&str> = topics.iter().take(2).map(String::as_str).collect();
            parts.push(format!("You mentioned {}.", mentioned.join(", ")));
        }

        if !negative {
            if let Some(line) = self.mirror_line(context) {
                parts.push(line);
            }
            if let Some(line) = self.memory_line(context).await? {
                parts.push(line);
            }
        }

        if intent_line.is_none() && parts.is_empty() && self.roll_above(0.5) {
            parts.extend(self.pick(CONFUSION));
        }

        if !negative {
            if self.trait_roll(self.personality.humor) {
                parts.extend(self.pick(HUMOR));
            }
            if self.trait_roll(self.personality.curiosity) {
                parts.extend(self.pick(CURIOSITY));
            }
        }
        if self.trait_roll(self.personality.kindness) {
            parts.extend(self.pick(KINDNESS));
        }

        let mut seen = HashSet::new();
        parts.retain(|part| seen.insert(part.clone()));
        let reply = parts.join(" ");

        let repeats_last = context
            .last_from(Speaker::Assistant)
            .map(|last| !reply.trim().is_empty() && reply.trim() == last.text.trim())
            .unwrap_or(false);
        if repeats_last {
            return Ok(STILL_HERE.to_string());
        }

        if reply.trim().is_empty() {
            return Ok(self.pick(FALLBACKS).unwrap_or_default());
        }

        Ok(reply)
    }
}

#[async_trait]
impl Stage<TurnContext> for ComposerStage {
    fn name(&self) -> &'static str {
        "composer"
    }

    async fn attempt(&self, context: &TurnContext) -> AgentResult<Option<String>> {
        if context.analysis.has_intent("remember") {
            return self.remember(context).await.map(Some);
        }

        self.compose(context).await.map(Some)
    }
}
