pub mod registry;
pub mod state;

pub use registry::{EmotionStateStore, InMemoryEmotionStore};
pub use state::{EmotionSnapshot, EmotionState, EmotionTrigger, NEUTRAL};
