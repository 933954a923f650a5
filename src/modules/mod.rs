pub mod analysis;
pub mod behavior;
pub mod emotion;
pub mod intents;
pub mod memory;
pub mod storage;
pub mod tasks;
