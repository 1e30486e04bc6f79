use thiserror::Error;

/// Errors raised while building or solving an allocation model.
///
/// Infeasible and unbounded problems are not errors: they come back as a
/// [`SolveStatus`](crate::domain::SolveStatus) on the solution record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AllocationError {
    /// Missing, negative or otherwise invalid input. Raised before any model
    /// is built.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Constraint, objective and variable list disagree on dimension.
    #[error("Model error: {0}")]
    Model(String),

    /// The blocking solve task panicked or was cancelled.
    #[error("Solver task failed: {0}")]
    Join(String),
}

impl AllocationError {
    pub fn config(msg: impl Into<String>) -> Self {
        AllocationError::Configuration(msg.into())
    }

    pub fn model(msg: impl Into<String>) -> Self {
        AllocationError::Model(msg.into())
    }

    /// Short tag used in structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            AllocationError::Configuration(_) => "configuration",
            AllocationError::Model(_) => "model",
            AllocationError::Join(_) => "join",
        }
    }
}

impl From<validator::ValidationErrors> for AllocationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AllocationError::Configuration(errors.to_string())
    }
}

impl From<tokio::task::JoinError> for AllocationError {
    fn from(error: tokio::task::JoinError) -> Self {
        AllocationError::Join(error.to_string())
    }
}

pub type Result<T, E = AllocationError> = std::result::Result<T, E>;
