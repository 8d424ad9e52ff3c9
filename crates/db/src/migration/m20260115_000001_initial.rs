//! Initial database migration.
//!
//! Creates the cash-register enums and tables and seeds the payment
//! method catalog.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: PAYMENT METHODS
        // ============================================================
        db.execute_unprepared(PAYMENT_METHODS_SQL).await?;

        // ============================================================
        // PART 3: CASH SESSIONS
        // ============================================================
        db.execute_unprepared(CASH_SESSIONS_SQL).await?;

        // ============================================================
        // PART 4: CASH LEDGER ENTRIES
        // ============================================================
        db.execute_unprepared(CASH_LEDGER_ENTRIES_SQL).await?;

        // ============================================================
        // PART 5: CASH MOVEMENTS
        // ============================================================
        db.execute_unprepared(CASH_MOVEMENTS_SQL).await?;

        // ============================================================
        // PART 6: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_PAYMENT_METHODS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Cash session lifecycle
CREATE TYPE cash_session_status AS ENUM ('open', 'closed');

-- Movement direction
CREATE TYPE cash_movement_type AS ENUM ('income', 'expense');

-- Movement origin document
CREATE TYPE cash_movement_reference AS ENUM (
    'sale_payment',
    'expense',
    'purchase',
    'income',
    'manual',
    'account_payment'
);
";

const PAYMENT_METHODS_SQL: &str = r"
CREATE TABLE payment_methods (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(50) NOT NULL UNIQUE,
    name VARCHAR(100) NOT NULL,
    is_cash BOOLEAN NOT NULL DEFAULT false,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- At most one method holds the physical drawer
CREATE UNIQUE INDEX idx_payment_methods_single_cash ON payment_methods(is_cash) WHERE is_cash = true;
CREATE INDEX idx_payment_methods_active ON payment_methods(code) WHERE is_active = true;
";

const CASH_SESSIONS_SQL: &str = r"
CREATE TABLE cash_sessions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    session_date DATE NOT NULL UNIQUE,
    opened_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    closed_at TIMESTAMPTZ,
    initial_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    total_income NUMERIC(14, 2) NOT NULL DEFAULT 0,
    total_expense NUMERIC(14, 2) NOT NULL DEFAULT 0,
    expected_amount NUMERIC(14, 2),
    actual_amount NUMERIC(14, 2),
    difference NUMERIC(14, 2),
    status cash_session_status NOT NULL DEFAULT 'open',
    opening_notes TEXT,
    closing_notes TEXT,
    opened_by UUID NOT NULL,
    closed_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_session_initial_non_negative CHECK (initial_amount >= 0),
    CONSTRAINT chk_session_totals_non_negative CHECK (total_income >= 0 AND total_expense >= 0)
);

-- At most one open session system-wide; a lost open() race surfaces as a
-- unique violation instead of a second open row
CREATE UNIQUE INDEX idx_cash_sessions_single_open ON cash_sessions(status) WHERE status = 'open';
";

const CASH_LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE cash_ledger_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    session_id UUID NOT NULL REFERENCES cash_sessions(id) ON DELETE CASCADE,
    payment_method_id UUID NOT NULL REFERENCES payment_methods(id),
    initial_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    total_income NUMERIC(14, 2) NOT NULL DEFAULT 0,
    total_expense NUMERIC(14, 2) NOT NULL DEFAULT 0,
    expected_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    actual_amount NUMERIC(14, 2),
    difference NUMERIC(14, 2),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_ledger_totals_non_negative CHECK (
        initial_amount >= 0 AND total_income >= 0 AND total_expense >= 0
    ),
    UNIQUE (session_id, payment_method_id)
);

CREATE INDEX idx_cash_ledger_session ON cash_ledger_entries(session_id);
";

const CASH_MOVEMENTS_SQL: &str = r"
CREATE TABLE cash_movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    session_id UUID NOT NULL REFERENCES cash_sessions(id) ON DELETE CASCADE,
    movement_type cash_movement_type NOT NULL,
    reference_type cash_movement_reference NOT NULL,
    reference_id UUID,
    amount NUMERIC(14, 2) NOT NULL,
    payment_method_id UUID NOT NULL REFERENCES payment_methods(id),
    description TEXT,
    notes TEXT,
    created_by UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_movement_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_cash_movements_session ON cash_movements(session_id, created_at);
CREATE INDEX idx_cash_movements_method ON cash_movements(payment_method_id);
";

const SEED_PAYMENT_METHODS_SQL: &str = r"
-- ============================================================
-- SEED: Payment method catalog
-- ============================================================
INSERT INTO payment_methods (code, name, is_cash, is_active) VALUES
('cash', 'Cash', true, true),
('card', 'Card', false, true),
('transfer', 'Bank Transfer', false, true),
('account', 'Customer Account', false, true);
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================
DROP TABLE IF EXISTS cash_movements CASCADE;
DROP TABLE IF EXISTS cash_ledger_entries CASCADE;
DROP TABLE IF EXISTS cash_sessions CASCADE;
DROP TABLE IF EXISTS payment_methods CASCADE;

DROP TYPE IF EXISTS cash_movement_reference;
DROP TYPE IF EXISTS cash_movement_type;
DROP TYPE IF EXISTS cash_session_status;
";
