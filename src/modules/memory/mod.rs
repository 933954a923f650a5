pub mod conversation;
pub mod long_term;
pub mod training;

use crate::modules::analysis::CollaboratorError;
use crate::modules::storage::StoreError;
use thiserror::Error;

pub use conversation::ConversationLogStore;
pub use long_term::{
    CompactionReport, LongTermMemory, RecallMatch, Recollection, COMPACTED_IMPORTANCE, GENERAL_TOPICS, LOW_IMPORTANCE,
    MIXED_EMOTION,
};
pub use training::{TrainingSet, TrainingStore};

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Analysis(#[from] CollaboratorError),
}
