//! Errors reported at the action operation boundary

use crate::application::ports::outbound::RepoError;
use crate::domain::services::LedgerError;

/// Errors that can occur while running an action operation
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("An action with intent {0} already exists")]
    DuplicateIntent(String),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Asset {0} is already committed to another action")]
    AssetInUse(String),

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),

    /// Some writes landed before the store failed; nothing was rolled back
    #[error(
        "Reconciliation stopped after {} completed write(s) [{}]: {source}",
        .completed.len(),
        .completed.join("; ")
    )]
    PartialReconciliation {
        completed: Vec<String>,
        #[source]
        source: RepoError,
    },
}

impl ActionError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        ActionError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Stable machine-readable error code
    pub fn kind(&self) -> &'static str {
        match self {
            ActionError::Validation(_) => "VALIDATION_ERROR",
            ActionError::DuplicateIntent(_) => "DUPLICATE_INTENT",
            ActionError::NotFound { .. } => "NOT_FOUND",
            ActionError::AssetNotFound(_) => "ASSET_NOT_FOUND",
            ActionError::AssetInUse(_) => "ASSET_IN_USE",
            ActionError::Storage(_) => "STORAGE_ERROR",
            ActionError::PartialReconciliation { .. } => "PARTIAL_RECONCILIATION_FAILURE",
        }
    }
}

impl From<LedgerError> for ActionError {
    fn from(err: LedgerError) -> Self {
        ActionError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_failure_message_lists_steps() {
        let err = ActionError::PartialReconciliation {
            completed: vec!["action saved".into(), "asset Rope claimed".into()],
            source: RepoError::Database("disk full".into()),
        };
        assert_eq!(err.kind(), "PARTIAL_RECONCILIATION_FAILURE");
        let message = err.to_string();
        assert!(message.contains("2 completed write(s)"));
        assert!(message.contains("asset Rope claimed"));
        assert!(message.contains("disk full"));
    }

    #[test]
    fn test_ledger_error_is_validation() {
        let err: ActionError = LedgerError::InsufficientEffort {
            available: 1,
            requested: 2,
        }
        .into();
        assert_eq!(err.kind(), "VALIDATION_ERROR");
        assert_eq!(ActionError::not_found("Action", "abc").to_string(), "Action not found: abc");
    }
}
