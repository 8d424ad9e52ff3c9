//! Audit trail repository.
//!
//! Session lifecycle events are recorded best-effort: writes run on a
//! detached task and a failed write never fails the operation it
//! describes.

use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};
use tracing::warn;
use uuid::Uuid;

use crate::entities::audit_log;

/// What happened to the audited entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    /// A session was opened.
    Open,
    /// A session was closed.
    Close,
    /// A session was modified (reopen).
    Update,
}

impl AuditAction {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Close => "CLOSE",
            Self::Update => "UPDATE",
        }
    }
}

/// One audit entry to be written.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Kind of entity the event is about, e.g. `cash_session`.
    pub entity_type: &'static str,
    /// The entity's id.
    pub entity_id: Uuid,
    /// What happened.
    pub action: AuditAction,
    /// Who did it, when known.
    pub actor: Option<Uuid>,
    /// Entity state before the change.
    pub before: Option<serde_json::Value>,
    /// Entity state after the change.
    pub after: Option<serde_json::Value>,
    /// Human-readable summary.
    pub description: String,
}

/// Append-only writer for the audit log.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an event without blocking the caller.
    ///
    /// The insert runs on a detached task; failures are logged at `warn`
    /// and otherwise swallowed.
    pub fn record(&self, event: AuditEvent) {
        let db = self.db.clone();
        tokio::spawn(async move {
            if let Err(e) = Self::insert(&db, event).await {
                warn!(error = %e, "Failed to write audit entry");
            }
        });
    }

    /// Records an event and waits for the write.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn record_now(&self, event: AuditEvent) -> Result<(), DbErr> {
        Self::insert(&self.db, event).await
    }

    async fn insert(db: &DatabaseConnection, event: AuditEvent) -> Result<(), DbErr> {
        audit_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            entity_type: Set(event.entity_type.to_string()),
            entity_id: Set(event.entity_id),
            action: Set(event.action.as_str().to_string()),
            actor: Set(event.actor),
            before: Set(event.before),
            after: Set(event.after),
            description: Set(event.description),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(db)
        .await?;

        Ok(())
    }
}
