//! Error types for annealing runs.

use thiserror::Error;

use crate::config::Field;

/// Errors raised while configuring or starting a simulation.
///
/// Both variants are fatal: the engine performs no I/O, so nothing is
/// retried and a failed run yields no state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnnealError {
    /// A numeric parameter or control strategy is unusable.
    ///
    /// Raised during validation, before any state is built.
    #[error("configuration error: {reason}")]
    Configuration { field: Field, reason: String },

    /// The energy calculator or state change strategy is absent at
    /// every configuration layer.
    ///
    /// Raised when the first state is constructed.
    #[error("missing {0} function")]
    MissingStrategy(Field),
}

impl AnnealError {
    /// Builds a [`AnnealError::Configuration`] for `field`.
    pub fn configuration(field: Field, reason: impl Into<String>) -> Self {
        AnnealError::Configuration {
            field,
            reason: reason.into(),
        }
    }

    /// The field this error is about.
    pub fn field(&self) -> Field {
        match self {
            AnnealError::Configuration { field, .. } => *field,
            AnnealError::MissingStrategy(field) => *field,
        }
    }
}

/// Result type alias for annealing operations.
pub type Result<T> = std::result::Result<T, AnnealError>;
