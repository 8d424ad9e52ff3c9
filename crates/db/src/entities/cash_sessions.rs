//! `SeaORM` Entity for the `cash_sessions` table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CashSessionStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub session_date: Date,
    pub opened_at: DateTimeWithTimeZone,
    pub closed_at: Option<DateTimeWithTimeZone>,
    pub initial_amount: Decimal,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub expected_amount: Option<Decimal>,
    pub actual_amount: Option<Decimal>,
    pub difference: Option<Decimal>,
    pub status: CashSessionStatus,
    pub opening_notes: Option<String>,
    pub closing_notes: Option<String>,
    pub opened_by: Uuid,
    pub closed_by: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::cash_ledger_entries::Entity")]
    CashLedgerEntries,
    #[sea_orm(has_many = "super::cash_movements::Entity")]
    CashMovements,
}

impl Related<super::cash_ledger_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashLedgerEntries.def()
    }
}

impl Related<super::cash_movements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CashMovements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
