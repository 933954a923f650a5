use crate::config::MemoryConfig;
use crate::modules::analysis::{dice_coefficient, TextAnalyzer};
use crate::modules::emotion::NEUTRAL;
use crate::modules::memory::conversation::ConversationLogStore;
use crate::modules::memory::MemoryError;
use crate::modules::storage::{MemoryRecord, Storage, StoreError, TrainingEntry};
use crate::utils::keyed_lock::KeyedLocks;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;

const BASE_IMPORTANCE: f32 = 0.4;
const REMEMBER_IMPORTANCE: f32 = 1.0;
const SENTIMENT_BONUS: f32 = 0.2;
const STRONG_SENTIMENT: f64 = 0.6;
const MAX_TAGS: usize = 5;

pub const LOW_IMPORTANCE: f32 = 0.3;
pub const COMPACTED_IMPORTANCE: f32 = 0.25;
pub const MIXED_EMOTION: &str = "mixed";
pub const GENERAL_TOPICS: &str = "general topics";

/// Something the agent can be asked to recall.
#[derive(Debug, Clone, PartialEq)]
pub enum Recollection {
    Fact(TrainingEntry),
    Memory(MemoryRecord),
}

impl Recollection {
    /// Text compared against a recall query.
    pub fn match_text(&self) -> &str {
        match self {
            Recollection::Fact(entry) => entry.key.as_deref().unwrap_or(&entry.value),
            Recollection::Memory(record) => &record.summary,
        }
    }

    /// Text reported back to the user.
    pub fn value(&self) -> &str {
        match self {
            Recollection::Fact(entry) => &entry.value,
            Recollection::Memory(record) => &record.summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecallMatch {
    pub recollection: Recollection,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompactionReport {
    pub merged_records: usize,
    pub deleted_records: usize,
}

impl CompactionReport {
    pub fn is_noop(&self) -> bool {
        self.merged_records == 0 && self.deleted_records == 0
    }
}

pub struct LongTermMemory {
    storage: Arc<dyn Storage>,
    log: Arc<ConversationLogStore>,
    analyzer: Arc<dyn TextAnalyzer>,
    config: MemoryConfig,
    compaction_locks: KeyedLocks,
}

impl LongTermMemory {
    pub fn new(
        storage: Arc<dyn Storage>,
        log: Arc<ConversationLogStore>,
        analyzer: Arc<dyn TextAnalyzer>,
        config: MemoryConfig,
    ) -> Self {
        Self {
            storage,
            log,
            analyzer,
            config,
            compaction_locks: KeyedLocks::new(),
        }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Folds the current conversation log into one memory record and clears the log.
    pub async fn summarize_and_store(&self, user_id: &str) -> Result<Option<MemoryRecord>, MemoryError> {
        let messages = self.log.messages(user_id).await?;
        if messages.is_empty() {
            return Ok(None);
        }

        let combined = messages
            .iter()
            .map(|entry| entry.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let analysis = self.analyzer.analyze(&combined).await?;

        let dominant = analysis.top_emotion().unwrap_or(NEUTRAL).to_string();
        let tags: Vec<String> = analysis.topics.iter().take(MAX_TAGS).cloned().collect();
        let subject = if tags.is_empty() {
            GENERAL_TOPICS.to_string()
        } else {
            tags.join(", ")
        };

        let mut importance = BASE_IMPORTANCE;
        if analysis.has_intent("remember") {
            importance = REMEMBER_IMPORTANCE;
        }
        if analysis.sentiment.abs() > STRONG_SENTIMENT {
            importance = (importance + SENTIMENT_BONUS).min(1.0);
        }

        let record = MemoryRecord::new(
            user_id,
            format!("{}:{}", dominant, Utc::now().timestamp_millis()),
            format!("{} about {}", dominant, subject),
            tags,
            importance,
            dominant.clone(),
        );
        self.storage.insert_memory(record.clone()).await?;
        self.log.clear(user_id).await?;

        tracing::debug!(user_id, key = %record.key, importance, "stored memory summary");
        Ok(Some(record))
    }

    /// Merges the oldest low-importance memories by first tag once a user has
    /// more than `threshold` records. Only records from the snapshot read here are
    /// ever deleted.
    pub async fn compact_if_needed(&self, user_id: &str, threshold: usize) -> Result<CompactionReport, StoreError> {
        let _guard = self.compaction_locks.lock(user_id).await;

        let total = self.storage.count_memories(user_id).await?;
        if total <= threshold {
            return Ok(CompactionReport::default());
        }

        let candidates: Vec<MemoryRecord> = self
            .storage
            .memories(user_id)
            .await?
            .into_iter()
            .filter(|record| record.importance < LOW_IMPORTANCE)
            .take(self.config.compaction_batch)
            .collect();
        if candidates.len() < 2 {
            return Ok(CompactionReport::default());
        }

        let mut groups: BTreeMap<String, Vec<MemoryRecord>> = BTreeMap::new();
        for record in candidates {
            groups.entry(record.first_tag().to_string()).or_default().push(record);
        }

        let mut report = CompactionReport::default();
        for (tag, items) in groups {
            if items.len() < 2 {
                continue;
            }

            let merged_summary = items
                .iter()
                .take(self.config.merge_limit)
                .map(|record| record.summary.as_str())
                .collect::<Vec<_>>()
                .join(" | ");
            let merged = MemoryRecord::new(
                user_id,
                format!("compacted:{}:{}", tag, Utc::now().timestamp_millis()),
                merged_summary,
                vec![tag.clone()],
                COMPACTED_IMPORTANCE,
                MIXED_EMOTION,
            );
            self.storage.insert_memory(merged).await?;

            let ids: Vec<String> = items.iter().map(|record| record.id.clone()).collect();
            report.deleted_records += self.storage.delete_memories(user_id, &ids).await?;
            report.merged_records += 1;
        }

        tracing::info!(
            user_id,
            merged = report.merged_records,
            deleted = report.deleted_records,
            "compacted memories"
        );
        Ok(report)
    }

    /// Newest memories first.
    pub async fn recent(&self, user_id: &str, n: usize) -> Result<Vec<MemoryRecord>, StoreError> {
        let mut records = self.storage.memories(user_id).await?;
        records.reverse();
        records.truncate(n);
        Ok(records)
    }

    /// Scores every candidate against `query` and keeps those above `threshold`,
    /// best first.
    pub fn match_by_query(query: &str, candidates: &[Recollection], threshold: f64) -> Vec<RecallMatch> {
        let query = query.to_lowercase();
        let mut matches: Vec<RecallMatch> = candidates
            .iter()
            .map(|candidate| RecallMatch {
                score: dice_coefficient(&query, &candidate.match_text().to_lowercase()),
                recollection: candidate.clone(),
            })
            .filter(|candidate| candidate.score > threshold)
            .collect();

        matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        matches
    }
}
