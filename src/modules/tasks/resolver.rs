use crate::modules::analysis::CollaboratorError;
use crate::modules::tasks::math::{calculate, looks_like_math};
use crate::modules::tasks::search::SearchProvider;
use async_trait::async_trait;
use chrono::Local;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

lazy_static! {
    static ref TIMER: Regex = Regex::new(r"set (?:a )?timer for (\d+)\s*(minutes?|seconds?)").unwrap();
    static ref TIME_QUERY: Regex = Regex::new(r"\b(?:what time|current time|time is it)\b").unwrap();
    static ref DATE_QUERY: Regex =
        Regex::new(r"\b(?:what day|date is it|today's date|what's the date|what is the date)\b").unwrap();
    static ref WEATHER: Regex = Regex::new(r"\b(?:weather|temperature|raining|rain)\b").unwrap();
    static ref SEARCH: Regex =
        Regex::new(r"(?i)^\s*(?:search(?:\s+for)?|find|look\s+up|look\s+for)\s+(.+?)\s*[?.!]*\s*$").unwrap();
    static ref BARE_SEARCH: Regex = Regex::new(r"(?i)^\s*(?:search|find|look\s+up|look\s+for)\s*[?.!]*\s*$").unwrap();
}

const MAX_TIMER_SECONDS: u64 = 7 * 24 * 60 * 60;
const TIMER_TOO_LONG: &str = "That's way too long for a timer. Try something under a week?";

/// Stateless helpers for utterances that ask for a task rather than a chat.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskResolver: Send + Sync {
    async fn resolve(&self, user_id: &str, utterance: &str) -> Result<Option<String>, CollaboratorError>;
}

/// Arithmetic, timers, clock lookups, a weather placeholder and web search.
pub struct TaskIntentResolver {
    search: Option<Arc<dyn SearchProvider>>,
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl TaskIntentResolver {
    pub fn new() -> Self {
        Self {
            search: None,
            timers: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_search(mut self, provider: Arc<dyn SearchProvider>) -> Self {
        self.search = Some(provider);
        self
    }

    fn set_timer(&self, user_id: &str, amount: u64, unit: &str) -> Result<String, CollaboratorError> {
        let seconds = if unit.starts_with("second") {
            Some(amount)
        } else {
            amount.checked_mul(60)
        };
        let seconds = match seconds.filter(|seconds| *seconds <= MAX_TIMER_SECONDS) {
            Some(seconds) => seconds,
            None => return Ok(TIMER_TOO_LONG.to_string()),
        };

        let owner = user_id.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            tracing::info!(user_id = %owner, seconds, "timer finished");
        });

        let mut timers = self
            .timers
            .lock()
            .map_err(|_| CollaboratorError::Task("Failed to acquire timer lock".to_string()))?;
        timers.retain(|_, timer| !timer.is_finished());
        if let Some(previous) = timers.insert(user_id.to_string(), handle) {
            previous.abort();
        }

        let unit = if unit.starts_with("second") { "second" } else { "minute" };
        let plural = if amount == 1 { "" } else { "s" };
        Ok(format!("Timer set for {} {}{}!", amount, unit, plural))
    }

    /// Timers that have been set and not yet pruned.
    pub fn timer_count(&self) -> usize {
        self.timers.lock().map(|timers| timers.len()).unwrap_or(0)
    }

    pub fn has_active_timer(&self, user_id: &str) -> bool {
        self.timers
            .lock()
            .map(|timers| timers.get(user_id).map(|handle| !handle.is_finished()).unwrap_or(false))
            .unwrap_or(false)
    }

    async fn search(&self, topic: &str) -> String {
        let provider = match &self.search {
            Some(provider) => provider,
            None => return "I can't search the web right now.".to_string(),
        };

        match provider.search(topic).await {
            Ok(Some(answer)) => answer,
            Ok(None) => format!("I couldn't find a clear answer for \"{}\".", topic),
            Err(e) => {
                tracing::warn!(error = %e, topic, "search failed");
                "Oops! I couldn't perform the search right now.".to_string()
            }
        }
    }
}

impl Default for TaskIntentResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskResolver for TaskIntentResolver {
    async fn resolve(&self, user_id: &str, utterance: &str) -> Result<Option<String>, CollaboratorError> {
        let lower = utterance.trim().to_lowercase();

        if looks_like_math(&lower) {
            return Ok(Some(calculate(&lower)));
        }

        if let Some(captures) = TIMER.captures(&lower) {
            return match captures[1].parse::<u64>() {
                Ok(amount) => self.set_timer(user_id, amount, &captures[2]).map(Some),
                Err(_) => Ok(Some(TIMER_TOO_LONG.to_string())),
            };
        }

        if TIME_QUERY.is_match(&lower) {
            return Ok(Some(format!("It's currently {}.", Local::now().format("%-I:%M %p"))));
        }

        if DATE_QUERY.is_match(&lower) {
            return Ok(Some(format!("Today's date is {}.", Local::now().format("%A, %B %-d, %Y"))));
        }

        if WEATHER.is_match(&lower) {
            return Ok(Some("I can't fetch live weather yet, but soon I'll be able to.".to_string()));
        }

        if BARE_SEARCH.is_match(utterance) {
            return Ok(Some("Tell me what to search for?".to_string()));
        }

        if let Some(captures) = SEARCH.captures(utterance) {
            return Ok(Some(self.search(captures[1].trim()).await));
        }

        Ok(None)
    }
}
