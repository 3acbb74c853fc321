use std::fmt;

use crate::validation::Deficiency;

/// Something `generate` needs before it can issue a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    PantryRecord,
    NutritionRange,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precondition::PantryRecord => f.write_str("pantry has not been saved"),
            Precondition::NutritionRange => f.write_str("nutrition range has not been calculated"),
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("missing preconditions: {}", join(.0))]
    PreconditionMissing(Vec<Precondition>),

    #[error("{endpoint} failed: {status} - {body}")]
    RemoteCallFailed {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("pantry does not satisfy the duration rules: {}", join(.0))]
    ValidationFailed(Vec<Deficiency>),

    #[error("invalid ingredient catalog: {0}")]
    InvalidCatalog(String),

    #[error("diet request {ticket} was superseded by request {latest}")]
    Superseded { ticket: u64, latest: u64 },
}

impl PlannerError {
    /// Remote failures are recoverable; the caller decides whether to retry.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            PlannerError::RemoteCallFailed { .. } | PlannerError::Transport { .. }
        )
    }
}

pub type Result<T, E = PlannerError> = std::result::Result<T, E>;
