//! User profile repository for database operations.

use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use super::{corrupt, db_err};
use crate::entities::users;
use declara_core::store::StoreError;
use declara_core::user::{UserProfile, UserRepository as UserRepoTrait, UserStatus};
use declara_shared::types::{OrganizationId, PageRequest, Role, UserId};

/// User repository implementation.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl UserRepoTrait for UserRepository {
    async fn find(&self, id: UserId) -> Result<Option<UserProfile>, StoreError> {
        let model = users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        model.map(to_domain).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserProfile>, StoreError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email.to_lowercase()))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        model.map(to_domain).transpose()
    }

    async fn list(&self, page: &PageRequest) -> Result<(Vec<UserProfile>, u64), StoreError> {
        let total = users::Entity::find()
            .count(&self.db)
            .await
            .map_err(db_err)?;

        let models = users::Entity::find()
            .order_by_asc(users::Column::FullName)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let profiles = models
            .into_iter()
            .map(to_domain)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((profiles, total))
    }

    async fn upsert(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let active_model = users::ActiveModel {
            id: Set(profile.id.into_inner()),
            email: Set(profile.email.to_lowercase()),
            full_name: Set(profile.full_name.clone()),
            cpf: Set(profile.cpf.clone()),
            organization_id: Set(profile.organization_id.into_inner()),
            role: Set(profile.role.as_str().to_string()),
            status: Set(profile.status.as_str().to_string()),
            created_at: Set(profile.created_at.into()),
        };

        users::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(users::Column::Id)
                    .update_columns([
                        users::Column::Email,
                        users::Column::FullName,
                        users::Column::Cpf,
                        users::Column::OrganizationId,
                        users::Column::Role,
                        users::Column::Status,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn set_status(&self, id: UserId, status: UserStatus) -> Result<bool, StoreError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Status, Expr::value(status.as_str()))
            .filter(users::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        users::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete_by_email(&self, email: &str) -> Result<u64, StoreError> {
        let result = users::Entity::delete_many()
            .filter(users::Column::Email.eq(email.to_lowercase()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }
}

/// Convert database model to domain model.
fn to_domain(model: users::Model) -> Result<UserProfile, StoreError> {
    let role = Role::parse(&model.role).ok_or_else(|| corrupt("users.role", &model.role))?;
    let status =
        UserStatus::parse(&model.status).ok_or_else(|| corrupt("users.status", &model.status))?;

    Ok(UserProfile {
        id: UserId::from_uuid(model.id),
        email: model.email,
        full_name: model.full_name,
        cpf: model.cpf,
        organization_id: OrganizationId::from_uuid(model.organization_id),
        role,
        status,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
