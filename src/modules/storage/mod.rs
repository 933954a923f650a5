pub mod backend;
pub mod error;
pub mod file_backend;
pub mod records;

pub use backend::{InMemoryStorage, Storage, Tables};
#[cfg(test)]
pub use backend::MockStorage;
pub use error::StoreError;
pub use file_backend::JsonFileStorage;
pub use records::{
    BehaviorRule, ConversationLog, LogEntry, MemoryRecord, Speaker, TrainingEntry, TrainingKind, UserId,
};
