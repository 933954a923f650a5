pub mod agent_mock;
