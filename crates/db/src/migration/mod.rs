//! Schema migrations, managed with `sea-orm-migration`.
//!
//! The migrator binary exposes these through the standard up/down/status
//! CLI.

pub use sea_orm_migration::prelude::*;

mod m20260115_000001_initial;
mod m20260115_000002_audit_log;

/// Runs the register schema migrations in order.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260115_000001_initial::Migration),
            Box::new(m20260115_000002_audit_log::Migration),
        ]
    }
}
