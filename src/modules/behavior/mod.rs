pub mod learning;

pub use learning::{BehaviorStore, LearnOutcome, TeachingRequest};
