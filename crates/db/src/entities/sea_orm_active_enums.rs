//! Postgres enum types used by the cash-register tables.

use arqo_core::{MovementKind, MovementSource, SessionStatus};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Maps the `cash_session_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cash_session_status")]
#[serde(rename_all = "lowercase")]
pub enum CashSessionStatus {
    /// Session is open and accepting movements.
    #[sea_orm(string_value = "open")]
    Open,
    /// Session has been reconciled and closed.
    #[sea_orm(string_value = "closed")]
    Closed,
}

impl From<SessionStatus> for CashSessionStatus {
    fn from(status: SessionStatus) -> Self {
        match status {
            SessionStatus::Open => Self::Open,
            SessionStatus::Closed => Self::Closed,
        }
    }
}

impl From<CashSessionStatus> for SessionStatus {
    fn from(status: CashSessionStatus) -> Self {
        match status {
            CashSessionStatus::Open => Self::Open,
            CashSessionStatus::Closed => Self::Closed,
        }
    }
}

/// Maps the `cash_movement_type` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cash_movement_type")]
#[serde(rename_all = "lowercase")]
pub enum CashMovementType {
    /// Money into the drawer.
    #[sea_orm(string_value = "income")]
    Income,
    /// Money out of the drawer.
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl From<MovementKind> for CashMovementType {
    fn from(kind: MovementKind) -> Self {
        match kind {
            MovementKind::Income => Self::Income,
            MovementKind::Expense => Self::Expense,
        }
    }
}

impl From<CashMovementType> for MovementKind {
    fn from(movement_type: CashMovementType) -> Self {
        match movement_type {
            CashMovementType::Income => Self::Income,
            CashMovementType::Expense => Self::Expense,
        }
    }
}

/// Maps the `cash_movement_reference` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "cash_movement_reference"
)]
#[serde(rename_all = "snake_case")]
pub enum CashMovementReference {
    /// Payment collected for a completed sale.
    #[sea_orm(string_value = "sale_payment")]
    SalePayment,
    /// Expense document paid from the drawer.
    #[sea_orm(string_value = "expense")]
    Expense,
    /// Supplier purchase paid from the drawer.
    #[sea_orm(string_value = "purchase")]
    Purchase,
    /// Miscellaneous income document.
    #[sea_orm(string_value = "income")]
    Income,
    /// Manual adjustment entered at the register.
    #[sea_orm(string_value = "manual")]
    Manual,
    /// Payment received against a customer account.
    #[sea_orm(string_value = "account_payment")]
    AccountPayment,
}

impl From<&MovementSource> for CashMovementReference {
    fn from(source: &MovementSource) -> Self {
        match source {
            MovementSource::SalePayment { .. } => Self::SalePayment,
            MovementSource::Expense { .. } => Self::Expense,
            MovementSource::Purchase { .. } => Self::Purchase,
            MovementSource::Income { .. } => Self::Income,
            MovementSource::Manual { .. } => Self::Manual,
            MovementSource::AccountPayment { .. } => Self::AccountPayment,
        }
    }
}

impl CashMovementReference {
    /// Returns the lowercase string form used on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SalePayment => "sale_payment",
            Self::Expense => "expense",
            Self::Purchase => "purchase",
            Self::Income => "income",
            Self::Manual => "manual",
            Self::AccountPayment => "account_payment",
        }
    }
}
