use huddle_db::time_key::TimeKeyError;
use thiserror::Error;

/// Errors surfaced by [`crate::PlanStore`] operations.
///
/// Every variant returned from a write means the enclosing transaction was
/// rolled back; nothing from that call is visible to readers. A missing plan
/// is not an error (reads return `Ok(None)`).
#[derive(Debug, Error)]
pub enum RepoError {
    /// Storage unreachable or a statement was rejected.
    #[error("persistence failure: {0:#}")]
    Persistence(#[from] anyhow::Error),

    /// A response named an option key the plan does not have.
    #[error("plan {plan_id:?} has no option {time_key:?}")]
    UnknownOption { plan_id: String, time_key: String },

    /// Two options of one plan encode to the same key.
    #[error("plan {plan_id:?} lists option {time_key:?} more than once")]
    DuplicateOption { plan_id: String, time_key: String },

    /// An option time that cannot be written as a key.
    #[error("invalid option time: {0}")]
    TimeKey(#[from] TimeKeyError),
}

impl RepoError {
    /// True for errors caused by the caller's input rather than the store.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::Persistence(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_message_includes_context_chain() {
        let inner = anyhow::anyhow!("connection refused").context("failed to begin transaction");
        let err = RepoError::from(inner);
        assert_eq!(
            err.to_string(),
            "persistence failure: failed to begin transaction: connection refused"
        );
        assert!(!err.is_rejection());
    }

    #[test]
    fn unknown_option_is_a_rejection() {
        let err = RepoError::UnknownOption {
            plan_id: "abc".into(),
            time_key: "2025-01-01T10:00".into(),
        };
        assert!(err.is_rejection());
        assert_eq!(
            err.to_string(),
            "plan \"abc\" has no option \"2025-01-01T10:00\""
        );
    }

    #[test]
    fn time_key_error_converts() {
        let err: RepoError = TimeKeyError::OutOfRange { year: 12_000 }.into();
        assert!(matches!(err, RepoError::TimeKey(_)));
    }
}
