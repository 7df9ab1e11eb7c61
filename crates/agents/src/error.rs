use guardian_core::error::CoreError;
use guardian_core::generation::GenerationError;

/// Errors surfaced by agent operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A domain-level error from `guardian_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The agent is disabled or has not been initialized.
    #[error("Agent {0} is not available")]
    Unavailable(&'static str),
}

impl From<GenerationError> for AgentError {
    fn from(err: GenerationError) -> Self {
        Self::Core(CoreError::Generation(err))
    }
}

/// Turn a unique violation into [`CoreError::Conflict`] and a foreign key
/// violation into [`CoreError::NotFound`]; pass anything else through.
pub(crate) fn classify_write_error(
    err: sqlx::Error,
    conflict: impl FnOnce() -> String,
    missing: impl FnOnce() -> CoreError,
) -> AgentError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            CoreError::Conflict(conflict()).into()
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => missing().into(),
        _ => AgentError::Database(err),
    }
}
