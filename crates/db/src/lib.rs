//! Persistence for the cash register.
//!
//! `SeaORM` entities for the register tables, repositories that wrap them
//! in domain operations, and the schema migrations. Repositories hold a
//! `DatabaseConnection` and run every multi-write operation inside a
//! transaction.

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    AuditRepository, MovementRepository, PaymentMethodRepository, ReportRepository,
    SessionRepository,
};

use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Connects with default pool settings.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Connects with an explicit pool size.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with_pool(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url);
    options
        .max_connections(max_connections)
        .min_connections(min_connections)
        .connect_timeout(Duration::from_secs(10));

    Database::connect(options).await
}
