//! `SeaORM` entity definitions for the cash-register schema.

pub mod audit_log;
pub mod cash_ledger_entries;
pub mod cash_movements;
pub mod cash_sessions;
pub mod payment_methods;
pub mod sea_orm_active_enums;
