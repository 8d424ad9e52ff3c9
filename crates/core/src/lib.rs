//! Core cash-register logic for Arqo.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, lifecycle rules, and cash math live here.
//!
//! # Modules
//!
//! - `session` - Session lifecycle rules (open, close, reopen)
//! - `movement` - Movement kinds and origins
//! - `ledger` - Per-payment-method running balances
//! - `reconciliation` - End-of-day count vs expected ("arqueo")
//! - `reports` - Cash-flow report and statistics aggregation
//! - `error` - The domain error with API codes and HTTP statuses

pub mod error;
pub mod ledger;
pub mod movement;
pub mod reconciliation;
pub mod reports;
pub mod session;

#[cfg(test)]
mod ledger_props;

pub use error::RegisterError;
pub use ledger::LedgerTotals;
pub use movement::{MovementKind, MovementSource, NewMovement};
pub use reconciliation::{CountedAmount, MethodBalance, Reconciliation, ReconciledEntry, reconcile};
pub use session::{SessionSnapshot, SessionStatus};
