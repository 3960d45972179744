//! Reconciliation bookkeeping for multi-write operations

use crate::application::ports::outbound::RepoError;
use crate::application::services::action_error::ActionError;
use crate::domain::value_objects::CharacterId;

/// Resources settled by one operation on one action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub creator: CharacterId,
    pub effort_before: i32,
    pub effort_after: i32,
    /// Assets marked used
    pub claimed: Vec<String>,
    /// Assets returned to unused
    pub freed: Vec<String>,
}

/// Ordered record of the writes an operation has completed
///
/// A store failure before any write is reported as plain storage failure; a
/// failure after at least one write becomes a partial reconciliation failure
/// naming what already landed.
#[derive(Debug, Default)]
pub struct WriteJournal {
    completed: Vec<String>,
}

impl WriteJournal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: impl Into<String>) {
        self.completed.push(step.into());
    }

    pub fn record<T>(
        &mut self,
        step: impl Into<String>,
        outcome: Result<T, RepoError>,
    ) -> Result<T, ActionError> {
        match outcome {
            Ok(value) => {
                self.push(step);
                Ok(value)
            }
            Err(source) => Err(self.fail(source)),
        }
    }

    pub fn fail(&mut self, source: RepoError) -> ActionError {
        if self.completed.is_empty() {
            return ActionError::Storage(source);
        }
        tracing::error!(
            completed = ?self.completed,
            error = %source,
            "Store failed mid-reconciliation"
        );
        ActionError::PartialReconciliation {
            completed: std::mem::take(&mut self.completed),
            source,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_failure_is_storage_error() {
        let mut journal = WriteJournal::new();
        let err = journal
            .record::<()>("action saved", Err(RepoError::Database("locked".into())))
            .unwrap_err();
        assert_eq!(err.kind(), "STORAGE_ERROR");
    }

    #[test]
    fn test_later_failure_is_partial() {
        let mut journal = WriteJournal::new();
        journal.record("action saved", Ok(())).unwrap();
        let err = journal
            .record::<()>("character saved", Err(RepoError::Database("locked".into())))
            .unwrap_err();
        match err {
            ActionError::PartialReconciliation { completed, .. } => {
                assert_eq!(completed, vec!["action saved".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
