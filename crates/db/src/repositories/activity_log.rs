//! Organization activity repository. Entries are never updated or deleted.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{corrupt, db_err};
use crate::entities::organization_activity_log;
use declara_core::audit::{
    ActivityKind, ActivityLogRepository as ActivityLogRepoTrait, OrganizationActivity,
};
use declara_core::store::StoreError;
use declara_shared::types::{ActivityId, OrganizationId, UserId};

/// Activity log repository implementation.
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    db: DatabaseConnection,
}

impl ActivityLogRepository {
    /// Create a new activity log repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ActivityLogRepoTrait for ActivityLogRepository {
    async fn append_activity(&self, entry: &OrganizationActivity) -> Result<(), StoreError> {
        let active_model = organization_activity_log::ActiveModel {
            id: Set(entry.id.into_inner()),
            organization_id: Set(entry.organization_id.into_inner()),
            kind: Set(entry.kind.as_str().to_string()),
            performed_by: Set(entry.performed_by.into_inner()),
            timestamp: Set(entry.timestamp.into()),
            details: Set(entry.details.clone()),
        };

        active_model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn list_activity(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<OrganizationActivity>, StoreError> {
        let models = organization_activity_log::Entity::find()
            .filter(
                organization_activity_log::Column::OrganizationId
                    .eq(organization_id.into_inner()),
            )
            .order_by_desc(organization_activity_log::Column::Timestamp)
            .order_by_desc(organization_activity_log::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        models.into_iter().map(to_domain).collect()
    }
}

/// Convert database model to domain model.
fn to_domain(model: organization_activity_log::Model) -> Result<OrganizationActivity, StoreError> {
    let kind = ActivityKind::parse(&model.kind)
        .ok_or_else(|| corrupt("organization_activity_log.kind", &model.kind))?;

    Ok(OrganizationActivity {
        id: ActivityId::from_uuid(model.id),
        organization_id: OrganizationId::from_uuid(model.organization_id),
        kind,
        performed_by: UserId::from_uuid(model.performed_by),
        timestamp: model.timestamp.with_timezone(&Utc),
        details: model.details,
    })
}
