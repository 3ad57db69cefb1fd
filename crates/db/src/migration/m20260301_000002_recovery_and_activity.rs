//! Recovery flag on entry history and the organization activity log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(ENTRY_HISTORY_RECOVERY_SQL).await?;
        db.execute_unprepared(ACTIVITY_LOG_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_SQL).await?;
        Ok(())
    }
}

const ENTRY_HISTORY_RECOVERY_SQL: &str = r"
ALTER TABLE entry_history ADD COLUMN is_recovery BOOLEAN NOT NULL DEFAULT false;
";

const ACTIVITY_LOG_SQL: &str = r"
-- Append-only
CREATE TABLE organization_activity_log (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    kind VARCHAR(30) NOT NULL
        CHECK (kind IN ('responsible_updated', 'report_printed', 'snapshot_restored')),
    performed_by UUID NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL DEFAULT now(),
    details JSONB NOT NULL DEFAULT '{}'::jsonb
);

CREATE INDEX idx_organization_activity_log_org ON organization_activity_log(organization_id, timestamp DESC);
";

const DROP_SQL: &str = r"
DROP TABLE IF EXISTS organization_activity_log CASCADE;
ALTER TABLE entry_history DROP COLUMN IF EXISTS is_recovery;
";
