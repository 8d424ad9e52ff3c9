//! Cash-flow report generation.
//!
//! Pure aggregation over rows the repository has already fetched:
//! - Period cash-flow report (summary, per-method, per-day, comparison)
//! - Session statistics
//!
//! Reporting never mutates register state.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::{PreviousPeriod, ReportService};
pub use types::*;
