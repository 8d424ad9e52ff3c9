//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Lifecycle rules come from `arqo-core`; repositories run
//! those guards inside the same transaction as the writes they protect.

pub mod audit;
pub mod movement;
pub mod payment_method;
pub mod report;
pub mod session;

pub use audit::{AuditAction, AuditEvent, AuditRepository};
pub use movement::{MovementRepository, MovementWithMethod};
pub use payment_method::PaymentMethodRepository;
pub use report::{ReportRepository, StatsFilter};
pub use session::{
    CloseSessionInput, OpenSessionInput, RegisterStatus, SessionDetail, SessionFilter,
    SessionRepository, SuggestedInitial,
};

use sea_orm::DbErr;

use arqo_core::RegisterError;

/// Error type shared by the cash-register repositories.
///
/// Business rule violations keep their [`RegisterError`] so the API layer
/// can map them to stable codes; anything else is a database failure.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A cash-register rule rejected the operation.
    #[error("{0}")]
    Register(#[from] RegisterError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Returns the business rule error, if this is one.
    #[must_use]
    pub const fn as_register(&self) -> Option<&RegisterError> {
        match self {
            Self::Register(err) => Some(err),
            Self::Database(_) => None,
        }
    }
}
