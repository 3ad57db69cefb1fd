//! Organization repository for database operations.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use super::{corrupt, db_err};
use crate::entities::organizations;
use declara_core::organization::{
    Organization, OrganizationRepository as OrganizationRepoTrait, OrganizationSeed,
};
use declara_core::store::StoreError;
use declara_shared::types::{OrganizationId, OrganizationKind};

/// Organization repository implementation.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    db: DatabaseConnection,
}

impl OrganizationRepository {
    /// Create a new organization repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl OrganizationRepoTrait for OrganizationRepository {
    async fn list(&self) -> Result<Vec<Organization>, StoreError> {
        let models = organizations::Entity::find()
            .order_by_asc(organizations::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        models.into_iter().map(to_domain).collect()
    }

    async fn find(&self, id: OrganizationId) -> Result<Option<Organization>, StoreError> {
        let model = organizations::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        model.map(to_domain).transpose()
    }

    async fn upsert_by_name(&self, seed: &OrganizationSeed) -> Result<Organization, StoreError> {
        let active_model = organizations::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(seed.name.to_string()),
            kind: Set(seed.kind.as_str().to_string()),
            state: Set(seed.state.to_string()),
            created_at: Set(Utc::now().into()),
        };

        let model = organizations::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(organizations::Column::Name)
                    .update_columns([organizations::Column::Kind, organizations::Column::State])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(db_err)?;

        to_domain(model)
    }
}

/// Convert database model to domain model.
fn to_domain(model: organizations::Model) -> Result<Organization, StoreError> {
    let kind = OrganizationKind::parse(&model.kind)
        .ok_or_else(|| corrupt("organizations.kind", &model.kind))?;

    Ok(Organization {
        id: OrganizationId::from_uuid(model.id),
        name: model.name,
        kind,
        state: model.state,
    })
}
