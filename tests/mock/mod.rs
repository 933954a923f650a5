pub mod agent_mock;
pub mod storage_mock;

pub use agent_mock::{
    analysis, scripted_agent, AgentWith, Failure, FailingStorage, ScriptedAnalyzer, TestMemory,
};
pub use storage_mock::LateInsertStorage;
