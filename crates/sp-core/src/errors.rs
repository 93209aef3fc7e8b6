//! Cross-cutting error types for Schelling Point.
//!
//! Domain-specific errors (e.g., `DatabaseError`, `ConfigError`) are defined in
//! their respective crates. The binary converges everything into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Schelling Point crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Ledger contract violation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Contract violations at the boundary of the credit ledger.
///
/// Budget rejections are not errors; see [`crate::ledger::BudgetExceeded`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A vote count, credit amount, or budget outside its domain.
    #[error("Invalid {field} {value}: {reason}")]
    InvalidInput {
        field: &'static str,
        value: i128,
        reason: &'static str,
    },
}
