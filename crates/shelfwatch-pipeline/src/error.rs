use shelfwatch_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("row store unavailable: {0}")]
    Store(#[from] DbError),
}

impl PipelineError {
    /// `true` when the row store could not be reached, as opposed to a
    /// failed statement against a reachable store.
    #[must_use]
    pub fn is_connection_failure(&self) -> bool {
        match self {
            PipelineError::Store(e) => e.is_connection_failure(),
        }
    }
}
