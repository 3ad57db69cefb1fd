//! Initial database migration.
//!
//! Creates the organization catalog, user accounts and their review trail,
//! per-account entries with their change history, declarations, messages
//! and legislation documents.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ORGANIZATIONS & ACCOUNTS
        // ============================================================
        db.execute_unprepared(ORGANIZATIONS_SQL).await?;
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(REGISTRATION_REQUESTS_SQL).await?;
        db.execute_unprepared(ACTIONS_LOG_SQL).await?;

        // ============================================================
        // PART 2: ENTRIES
        // ============================================================
        db.execute_unprepared(ENTRIES_SQL).await?;
        db.execute_unprepared(ENTRY_HISTORY_SQL).await?;

        // ============================================================
        // PART 3: DECLARATIONS
        // ============================================================
        db.execute_unprepared(DECLARATIONS_SQL).await?;
        db.execute_unprepared(RESPONSIBLE_PERSONS_SQL).await?;

        // ============================================================
        // PART 4: COMMUNICATION
        // ============================================================
        db.execute_unprepared(MESSAGES_SQL).await?;
        db.execute_unprepared(LEGISLATION_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

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

const ORGANIZATIONS_SQL: &str = r"
CREATE TABLE organizations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL UNIQUE,
    kind VARCHAR(3) NOT NULL CHECK (kind IN ('CFA', 'CRA')),
    state CHAR(2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Exactly one national council
CREATE UNIQUE INDEX idx_organizations_single_cfa ON organizations(kind) WHERE kind = 'CFA';
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    email VARCHAR(255) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    cpf CHAR(11),
    organization_id UUID NOT NULL REFERENCES organizations(id),
    role VARCHAR(10) NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
    status VARCHAR(10) NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'suspended')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_organization ON users(organization_id);
CREATE INDEX idx_users_full_name ON users(full_name);
";

const REGISTRATION_REQUESTS_SQL: &str = r"
CREATE TABLE user_registration_requests (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    full_name VARCHAR(255) NOT NULL,
    cpf CHAR(11) NOT NULL,
    email VARCHAR(255) NOT NULL,
    requested_organization_id UUID NOT NULL REFERENCES organizations(id),
    status VARCHAR(10) NOT NULL DEFAULT 'pending'
        CHECK (status IN ('pending', 'approved', 'rejected')),
    rejection_reason TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    reviewed_at TIMESTAMPTZ,

    CONSTRAINT chk_reviewed_when_processed
        CHECK (status = 'pending' OR reviewed_at IS NOT NULL)
);

CREATE INDEX idx_registration_requests_status ON user_registration_requests(status, created_at DESC);
CREATE INDEX idx_registration_requests_email ON user_registration_requests(email);
CREATE INDEX idx_registration_requests_cpf ON user_registration_requests(cpf);
";

const ACTIONS_LOG_SQL: &str = r"
-- Append-only; target_user_id outlives the user it points to
CREATE TABLE user_actions_log (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    action_type VARCHAR(20) NOT NULL
        CHECK (action_type IN ('approve', 'reject', 'suspend', 'reactivate', 'delete')),
    target_user_id UUID,
    target_user_email VARCHAR(255) NOT NULL,
    target_user_name VARCHAR(255) NOT NULL,
    performed_by_id UUID NOT NULL,
    performed_by_email VARCHAR(255) NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL DEFAULT now(),
    details JSONB NOT NULL DEFAULT '{}'::jsonb
);

CREATE INDEX idx_user_actions_log_timestamp ON user_actions_log(timestamp DESC);
";

const ENTRIES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    account_id VARCHAR(20) NOT NULL,
    total NUMERIC(18, 2) NOT NULL DEFAULT 0,
    finalistica NUMERIC(18, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_expenses_org_account UNIQUE (organization_id, account_id),
    CONSTRAINT chk_expense_non_negative CHECK (total >= 0 AND finalistica >= 0),
    CONSTRAINT chk_finalistica_within_total CHECK (finalistica <= total)
);

CREATE TABLE revenues (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    account_id VARCHAR(20) NOT NULL,
    value NUMERIC(18, 2) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT uq_revenues_org_account UNIQUE (organization_id, account_id),
    CONSTRAINT chk_revenue_non_negative CHECK (value >= 0)
);
";

const ENTRY_HISTORY_SQL: &str = r"
CREATE TABLE entry_history (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    account_id VARCHAR(20) NOT NULL,
    field VARCHAR(20) NOT NULL CHECK (field IN ('total', 'finalistica', 'value')),
    previous_value NUMERIC(18, 2) NOT NULL,
    new_value NUMERIC(18, 2) NOT NULL,
    changed_by UUID NOT NULL,
    changed_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_entry_history_org ON entry_history(organization_id, changed_at DESC);
";

const DECLARATIONS_SQL: &str = r"
-- One row per submission; the newest row carries the current status
CREATE TABLE declarations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    period_year INTEGER NOT NULL,
    status VARCHAR(20) NOT NULL CHECK (status IN ('draft', 'submitted')),
    receipt_number VARCHAR(20) NOT NULL,
    is_rectification BOOLEAN NOT NULL DEFAULT false,
    rectification_count INTEGER NOT NULL DEFAULT 0 CHECK (rectification_count >= 0),
    total_revenue NUMERIC(18, 2) NOT NULL DEFAULT 0,
    total_expense NUMERIC(18, 2) NOT NULL DEFAULT 0,
    total_finalistica NUMERIC(18, 2) NOT NULL DEFAULT 0,
    total_apoio NUMERIC(18, 2) NOT NULL DEFAULT 0,
    snapshot JSONB NOT NULL DEFAULT '{}'::jsonb,
    responsible JSONB,
    submitted_by UUID NOT NULL,
    submitted_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_declarations_org_period ON declarations(organization_id, period_year, submitted_at DESC);
";

const RESPONSIBLE_PERSONS_SQL: &str = r"
CREATE TABLE responsible_persons (
    organization_id UUID PRIMARY KEY REFERENCES organizations(id) ON DELETE CASCADE,
    unit_responsible_name VARCHAR(255) NOT NULL,
    unit_responsible_cra_number VARCHAR(50) NOT NULL,
    data_responsible_name VARCHAR(255) NOT NULL,
    data_responsible_role VARCHAR(255) NOT NULL,
    data_responsible_doc_type VARCHAR(10) NOT NULL,
    data_responsible_doc_number VARCHAR(50) NOT NULL,
    cnpj VARCHAR(18),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const MESSAGES_SQL: &str = r"
CREATE TABLE messages (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    sender_org UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    kind VARCHAR(20) NOT NULL CHECK (kind IN ('cra_to_cfa', 'cfa_to_cras')),
    content TEXT NOT NULL CHECK (char_length(content) BETWEEN 1 AND 5000),
    read BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_messages_created ON messages(created_at DESC);
CREATE INDEX idx_messages_sender ON messages(sender_org);
";

const LEGISLATION_SQL: &str = r"
CREATE TABLE legislation_documents (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    file_name VARCHAR(255) NOT NULL,
    file_path VARCHAR(512) NOT NULL UNIQUE,
    description TEXT NOT NULL DEFAULT '',
    display_order INTEGER NOT NULL DEFAULT 0,
    uploaded_by UUID NOT NULL,
    uploaded_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_legislation_documents_order ON legislation_documents(display_order);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: touch_updated_at
-- ============================================================
CREATE OR REPLACE FUNCTION touch_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_expenses_updated_at
BEFORE UPDATE ON expenses
FOR EACH ROW
EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_revenues_updated_at
BEFORE UPDATE ON revenues
FOR EACH ROW
EXECUTE FUNCTION touch_updated_at();

CREATE TRIGGER trg_responsible_persons_updated_at
BEFORE UPDATE ON responsible_persons
FOR EACH ROW
EXECUTE FUNCTION touch_updated_at();
";

const DROP_ALL_SQL: &str = r"
-- Order matters due to foreign key constraints
DROP TRIGGER IF EXISTS trg_responsible_persons_updated_at ON responsible_persons;
DROP TRIGGER IF EXISTS trg_revenues_updated_at ON revenues;
DROP TRIGGER IF EXISTS trg_expenses_updated_at ON expenses;
DROP FUNCTION IF EXISTS touch_updated_at();

DROP TABLE IF EXISTS legislation_documents CASCADE;
DROP TABLE IF EXISTS messages CASCADE;
DROP TABLE IF EXISTS responsible_persons CASCADE;
DROP TABLE IF EXISTS declarations CASCADE;
DROP TABLE IF EXISTS entry_history CASCADE;
DROP TABLE IF EXISTS revenues CASCADE;
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS user_actions_log CASCADE;
DROP TABLE IF EXISTS user_registration_requests CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP TABLE IF EXISTS organizations CASCADE;
";
