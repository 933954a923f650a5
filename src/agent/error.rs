use crate::modules::analysis::CollaboratorError;
use crate::modules::memory::MemoryError;
use crate::modules::storage::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("Collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AgentError {
    /// HTTP-style status for the JSON boundary.
    pub fn status_code(&self) -> u16 {
        match self {
            AgentError::Validation(_) => 400,
            AgentError::NotFound(_) => 404,
            _ => 500,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.status_code() == 500
    }
}

impl From<MemoryError> for AgentError {
    fn from(error: MemoryError) -> Self {
        match error {
            MemoryError::Store(e) => AgentError::Persistence(e),
            MemoryError::Analysis(e) => AgentError::Collaborator(e),
        }
    }
}

pub type AgentResult<T> = Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::AgentError;
    use crate::modules::analysis::CollaboratorError;
    use crate::modules::memory::MemoryError;
    use crate::modules::storage::StoreError;

    #[test]
    fn test_status_codes() {
        assert_eq!(AgentError::Validation("empty".to_string()).status_code(), 400);
        assert_eq!(AgentError::NotFound("fact".to_string()).status_code(), 404);
        assert_eq!(AgentError::Internal("boom".to_string()).status_code(), 500);
        assert!(AgentError::from(StoreError::LockPoisoned("logs")).is_internal());
    }

    #[test]
    fn test_memory_errors_keep_their_layer() {
        let error: AgentError = MemoryError::Analysis(CollaboratorError::Analysis("down".to_string())).into();
        assert!(matches!(error, AgentError::Collaborator(_)));

        let error: AgentError = MemoryError::Store(StoreError::LockPoisoned("memories")).into();
        assert!(matches!(error, AgentError::Persistence(_)));
        assert_eq!(error.to_string(), "Persistence error: Failed to acquire lock on memories");
    }
}
