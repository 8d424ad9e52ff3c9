//! Payment method repository.
//!
//! The payment method catalog is seeded by migration and read-only here;
//! ledger rows and movements key on it.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::payment_methods;

/// Read-only access to the payment method catalog.
#[derive(Debug, Clone)]
pub struct PaymentMethodRepository {
    db: DatabaseConnection,
}

impl PaymentMethodRepository {
    /// Creates a new payment method repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists active payment methods ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_active(&self) -> Result<Vec<payment_methods::Model>, DbErr> {
        payment_methods::Entity::find()
            .filter(payment_methods::Column::IsActive.eq(true))
            .order_by_asc(payment_methods::Column::Code)
            .all(&self.db)
            .await
    }

    /// Finds a payment method by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<payment_methods::Model>, DbErr> {
        payment_methods::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a payment method by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<payment_methods::Model>, DbErr> {
        payment_methods::Entity::find()
            .filter(payment_methods::Column::Code.eq(code))
            .one(&self.db)
            .await
    }

    /// Finds the method that holds the physical drawer.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_cash(&self) -> Result<Option<payment_methods::Model>, DbErr> {
        payment_methods::Entity::find()
            .filter(payment_methods::Column::IsCash.eq(true))
            .one(&self.db)
            .await
    }
}
