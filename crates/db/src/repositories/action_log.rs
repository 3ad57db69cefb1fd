//! Moderation audit repository. Entries are never updated or deleted.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
    Set,
};

use super::{corrupt, db_err};
use crate::entities::user_actions_log;
use declara_core::audit::{
    ActionLogRepository as ActionLogRepoTrait, ActionType, UserActionLogEntry,
};
use declara_core::store::StoreError;
use declara_shared::types::{ActionLogId, PageRequest, UserId};

/// Audit log repository implementation.
#[derive(Debug, Clone)]
pub struct ActionLogRepository {
    db: DatabaseConnection,
}

impl ActionLogRepository {
    /// Create a new audit log repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ActionLogRepoTrait for ActionLogRepository {
    async fn append(&self, entry: &UserActionLogEntry) -> Result<(), StoreError> {
        let active_model = user_actions_log::ActiveModel {
            id: Set(entry.id.into_inner()),
            action_type: Set(entry.action_type.as_str().to_string()),
            target_user_id: Set(entry.target_user_id.map(UserId::into_inner)),
            target_user_email: Set(entry.target_user_email.clone()),
            target_user_name: Set(entry.target_user_name.clone()),
            performed_by_id: Set(entry.performed_by_id.into_inner()),
            performed_by_email: Set(entry.performed_by_email.clone()),
            timestamp: Set(entry.timestamp.into()),
            details: Set(entry.details.clone()),
        };

        active_model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<UserActionLogEntry>, u64), StoreError> {
        let total = user_actions_log::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let models = user_actions_log::Entity::find()
            .order_by_desc(user_actions_log::Column::Timestamp)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let entries = models
            .into_iter()
            .map(to_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((entries, total))
    }
}

/// Convert database model to domain model.
fn to_domain(model: user_actions_log::Model) -> Result<UserActionLogEntry, StoreError> {
    let action_type = ActionType::parse(&model.action_type)
        .ok_or_else(|| corrupt("user_actions_log.action_type", &model.action_type))?;

    Ok(UserActionLogEntry {
        id: ActionLogId::from_uuid(model.id),
        action_type,
        target_user_id: model.target_user_id.map(UserId::from_uuid),
        target_user_email: model.target_user_email,
        target_user_name: model.target_user_name,
        performed_by_id: UserId::from_uuid(model.performed_by_id),
        performed_by_email: model.performed_by_email,
        timestamp: model.timestamp.with_timezone(&Utc),
        details: model.details,
    })
}
