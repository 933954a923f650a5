use crate::modules::storage::{BehaviorRule, Storage, StoreError};
use crate::utils::keyed_lock::KeyedLocks;
use crate::utils::random::{choose, RandomSource};
use crate::utils::text::normalize_phrase;
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

lazy_static! {
    static ref TEACH_AFTER_COMMA: Regex = Regex::new(
        r#"(?i)^\s*(?:when|if)\s+(?:the\s+)?(?:user|i|someone)\s+says?\s+["'“”‘’]?(.+?)["'“”‘’]?\s*,\s*(?:then\s+)?(?:you\s+)?(?:reply|respond|answer|say)(?:\s+with)?\s+["'“”‘’]?(.+?)["'“”‘’]?\s*$"#
    )
    .unwrap();
    static ref TEACH_AFTER_SPACE: Regex = Regex::new(
        r#"(?i)^\s*(?:when|if)\s+(?:the\s+)?(?:user|i|someone)\s+says?\s+["'“”‘’]?(.+?)["'“”‘’]?\s+(?:then\s+)?(?:you\s+)?(?:reply|respond|answer|say)(?:\s+with)?\s+["'“”‘’]?(.+?)["'“”‘’]?\s*$"#
    )
    .unwrap();
}

const LIST_COMMANDS: [&str; 6] = [
    "list behaviors",
    "show behaviors",
    "list all behaviors",
    "show all behaviors",
    "what behaviors",
    "display behaviors",
];

/// A trigger/response pair extracted from a teaching utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeachingRequest {
    pub trigger: String,
    pub response: String,
}

impl TeachingRequest {
    pub fn parse(utterance: &str) -> Option<Self> {
        // A comma marks the end of the trigger when present; otherwise the first
        // whole-word reply verb does.
        let captures = TEACH_AFTER_COMMA
            .captures(utterance)
            .or_else(|| TEACH_AFTER_SPACE.captures(utterance))?;
        let trigger = normalize_phrase(captures.get(1)?.as_str());
        let response = captures.get(2)?.as_str().trim().to_string();

        if trigger.is_empty() || response.is_empty() {
            return None;
        }
        Some(Self { trigger, response })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LearnOutcome {
    AlreadyKnown,
    Updated,
    Created,
}

/// User-taught trigger/response rules, one rule per normalized trigger.
pub struct BehaviorStore {
    storage: Arc<dyn Storage>,
    random: Arc<dyn RandomSource>,
    locks: KeyedLocks,
}

impl BehaviorStore {
    pub fn new(storage: Arc<dyn Storage>, random: Arc<dyn RandomSource>) -> Self {
        Self {
            storage,
            random,
            locks: KeyedLocks::new(),
        }
    }

    pub async fn learn(&self, user_id: &str, request: &TeachingRequest) -> Result<LearnOutcome, StoreError> {
        let _guard = self.locks.lock(user_id).await;

        match self.storage.find_rule(user_id, &request.trigger).await? {
            Some(rule) if rule.has_response(&request.response) => Ok(LearnOutcome::AlreadyKnown),
            Some(mut rule) => {
                rule.add_response(request.response.clone());
                self.storage.save_rule(rule).await?;
                Ok(LearnOutcome::Updated)
            }
            None => {
                let rule = BehaviorRule::new(user_id, request.trigger.clone(), request.response.clone());
                self.storage.save_rule(rule).await?;
                Ok(LearnOutcome::Created)
            }
        }
    }

    /// Learns from a teaching utterance and returns the acknowledgment, or
    /// `None` when the utterance is not a teaching request.
    pub async fn detect_and_learn(&self, user_id: &str, utterance: &str) -> Result<Option<String>, StoreError> {
        let request = match TeachingRequest::parse(utterance) {
            Some(request) => request,
            None => return Ok(None),
        };

        let outcome = self.learn(user_id, &request).await?;
        tracing::debug!(user_id, trigger = %request.trigger, ?outcome, "learned behavior");

        let reply = match outcome {
            LearnOutcome::AlreadyKnown => format!(
                "I already know that. When someone says \"{}\", I can reply \"{}\".",
                request.trigger, request.response
            ),
            LearnOutcome::Updated => format!(
                "Got it! I can now also reply \"{}\" when someone says \"{}\".",
                request.response, request.trigger
            ),
            LearnOutcome::Created => format!(
                "Got it! When someone says \"{}\", I'll reply \"{}\".",
                request.trigger, request.response
            ),
        };
        Ok(Some(reply))
    }

    pub async fn rules(&self, user_id: &str) -> Result<Vec<BehaviorRule>, StoreError> {
        self.storage.rules(user_id).await
    }

    /// Lists rules on request, otherwise picks a reply from a rule whose
    /// trigger occurs in the utterance.
    pub async fn find_match(&self, user_id: &str, utterance: &str) -> Result<Option<String>, StoreError> {
        let normalized = normalize_phrase(utterance);
        let rules = self.storage.rules(user_id).await?;

        if LIST_COMMANDS.iter().any(|command| normalized.contains(command)) {
            return Ok(Some(Self::format_listing(&rules)));
        }

        let matching: Vec<&BehaviorRule> = rules
            .iter()
            .filter(|rule| {
                let trigger = normalize_phrase(&rule.trigger);
                !trigger.is_empty() && normalized.contains(&trigger)
            })
            .collect();

        let rule = match choose(&matching, self.random.draw()) {
            Some(rule) => (*rule).clone(),
            None => return Ok(None),
        };
        let response = match choose(&rule.responses, self.random.draw()) {
            Some(response) => response.clone(),
            None => return Ok(None),
        };

        let _guard = self.locks.lock(user_id).await;
        if let Some(mut stored) = self.storage.find_rule(user_id, &rule.trigger).await? {
            stored.usage_count += 1;
            self.storage.save_rule(stored).await?;
        }

        Ok(Some(response))
    }

    fn format_listing(rules: &[BehaviorRule]) -> String {
        if rules.is_empty() {
            return "You haven't taught me any custom behaviors yet.".to_string();
        }

        let lines: Vec<String> = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                format!(
                    "{}. trigger: \"{}\", reply: {}",
                    index + 1,
                    rule.trigger,
                    rule.responses.join(" | ")
                )
            })
            .collect();
        format!("Here are the behaviors I've learned:\n{}", lines.join("\n"))
    }
}
