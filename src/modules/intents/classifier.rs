use crate::config::Identity;
use crate::modules::analysis::{dice_coefficient, CollaboratorError};
use crate::modules::intents::corpus::{IntentPhrases, BASIC_INTENTS};
use crate::utils::random::{choose, RandomSource};
use crate::utils::text::fold_for_matching;
use async_trait::async_trait;
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IntentClassifier: Send + Sync {
    /// A canned reply for a recognized small-talk intent, or `None`.
    async fn classify(&self, utterance: &str) -> Result<Option<String>, CollaboratorError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntentScore {
    pub intent: &'static str,
    pub confidence: f64,
}

/// Scores an utterance against the basic intent corpus by bigram similarity.
pub struct PhraseClassifier {
    identity: Identity,
    random: Arc<dyn RandomSource>,
    threshold: f64,
    corpus: &'static [IntentPhrases],
}

impl PhraseClassifier {
    pub fn new(identity: Identity, random: Arc<dyn RandomSource>, threshold: f64) -> Self {
        Self {
            identity,
            random,
            threshold,
            corpus: BASIC_INTENTS,
        }
    }

    /// Best scoring intent; the earlier intent wins a tie.
    pub fn score(&self, utterance: &str) -> Option<IntentScore> {
        let folded = fold_for_matching(utterance);
        if folded.is_empty() {
            return None;
        }

        let mut best: Option<IntentScore> = None;
        for intent in self.corpus {
            let confidence = intent
                .phrases
                .iter()
                .map(|phrase| dice_coefficient(&folded, phrase))
                .fold(0.0, f64::max);

            if best.as_ref().map(|b| confidence > b.confidence).unwrap_or(true) {
                best = Some(IntentScore {
                    intent: intent.name,
                    confidence,
                });
            }
        }
        best
    }

    fn render(&self, answer: &str) -> String {
        answer
            .replace("{agent}", &self.identity.name)
            .replace("{creator}", &self.identity.creator)
    }
}

#[async_trait]
impl IntentClassifier for PhraseClassifier {
    async fn classify(&self, utterance: &str) -> Result<Option<String>, CollaboratorError> {
        let score = match self.score(utterance) {
            Some(score) if score.confidence > self.threshold => score,
            _ => return Ok(None),
        };

        let intent = self
            .corpus
            .iter()
            .find(|intent| intent.name == score.intent)
            .ok_or_else(|| CollaboratorError::Classifier(format!("Unknown intent '{}'", score.intent)))?;

        tracing::debug!(intent = intent.name, confidence = score.confidence, "classified basic intent");
        Ok(choose(intent.answers, self.random.draw()).map(|answer| self.render(answer)))
    }
}

#[cfg(test)]
mod tests {
    use super::{IntentClassifier, PhraseClassifier};
    use crate::config::Identity;
    use crate::utils::random::ScriptedRandom;
    use std::sync::Arc;

    fn classifier() -> PhraseClassifier {
        PhraseClassifier::new(Identity::default(), Arc::new(ScriptedRandom::constant(0.0)), 0.7)
    }

    #[test]
    fn test_score_exact_phrase() {
        let score = classifier().score("Hello there!").unwrap();
        assert_eq!(score.intent, "greetings");
        assert_eq!(score.confidence, 1.0);

        let score = classifier().score("Thank you so much").unwrap();
        assert_eq!(score.intent, "gratitude");
    }

    #[tokio::test]
    async fn test_classify_renders_identity() {
        let reply = classifier().classify("Who made you?").await.unwrap();
        assert_eq!(reply.as_deref(), Some("Ah yes, silentCosmo made me! That means a lot."));

        let custom = PhraseClassifier::new(
            Identity::new("Pip", "Ada"),
            Arc::new(ScriptedRandom::constant(0.0)),
            0.7,
        );
        let reply = custom.classify("what is your name").await.unwrap();
        assert_eq!(reply.as_deref(), Some("I'm Pip, your AI companion, created by Ada."));
    }

    #[tokio::test]
    async fn test_unrelated_text_is_unclassified() {
        let classifier = classifier();
        assert!(classifier.classify("my dog ate the homework yesterday").await.unwrap().is_none());
        assert!(classifier.classify("what is I have a dog named Max").await.unwrap().is_none());
        assert!(classifier.classify("   ").await.unwrap().is_none());
    }
}
