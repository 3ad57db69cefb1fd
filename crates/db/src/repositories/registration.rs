//! Registration request repository for database operations.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use super::{corrupt, db_err};
use crate::entities::user_registration_requests as requests;
use declara_core::registration::{
    RegistrationRepository as RegistrationRepoTrait, RegistrationRequest, RegistrationStatus,
};
use declara_core::store::StoreError;
use declara_shared::types::{OrganizationId, RegistrationRequestId};

/// Registration request repository implementation.
#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    db: DatabaseConnection,
}

impl RegistrationRepository {
    /// Create a new registration request repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl RegistrationRepoTrait for RegistrationRepository {
    async fn insert(&self, request: &RegistrationRequest) -> Result<(), StoreError> {
        let active_model = requests::ActiveModel {
            id: Set(request.id.into_inner()),
            full_name: Set(request.full_name.clone()),
            cpf: Set(request.cpf.clone()),
            email: Set(request.email.clone()),
            requested_organization_id: Set(request.requested_organization_id.into_inner()),
            status: Set(request.status.as_str().to_string()),
            rejection_reason: Set(request.rejection_reason.clone()),
            created_at: Set(request.created_at.into()),
            reviewed_at: Set(request.reviewed_at.map(Into::into)),
        };

        active_model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find(
        &self,
        id: RegistrationRequestId,
    ) -> Result<Option<RegistrationRequest>, StoreError> {
        let model = requests::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        model.map(to_domain).transpose()
    }

    async fn list(
        &self,
        status: Option<RegistrationStatus>,
    ) -> Result<Vec<RegistrationRequest>, StoreError> {
        let mut query = requests::Entity::find().order_by_desc(requests::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(requests::Column::Status.eq(status.as_str()));
        }

        let models = query.all(&self.db).await.map_err(db_err)?;
        models.into_iter().map(to_domain).collect()
    }

    async fn delete_by_email(&self, email: &str) -> Result<u64, StoreError> {
        let result = requests::Entity::delete_many()
            .filter(requests::Column::Email.eq(email.to_lowercase()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }

    async fn delete_by_cpf(&self, cpf: &str) -> Result<u64, StoreError> {
        let result = requests::Entity::delete_many()
            .filter(requests::Column::Cpf.eq(cpf))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }

    async fn delete_other_by_identity(
        &self,
        keep: RegistrationRequestId,
        email: &str,
        cpf: &str,
    ) -> Result<u64, StoreError> {
        let result = requests::Entity::delete_many()
            .filter(requests::Column::Id.ne(keep.into_inner()))
            .filter(
                Condition::any()
                    .add(requests::Column::Email.eq(email.to_lowercase()))
                    .add(requests::Column::Cpf.eq(cpf)),
            )
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }

    async fn set_status(
        &self,
        id: RegistrationRequestId,
        status: RegistrationStatus,
        rejection_reason: Option<&str>,
        reviewed_at: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let reviewed_at: sea_orm::prelude::DateTimeWithTimeZone = reviewed_at.into();

        let result = requests::Entity::update_many()
            .col_expr(requests::Column::Status, Expr::value(status.as_str()))
            .col_expr(
                requests::Column::RejectionReason,
                Expr::value(rejection_reason.map(str::to_string)),
            )
            .col_expr(requests::Column::ReviewedAt, Expr::value(reviewed_at))
            .filter(requests::Column::Id.eq(id.into_inner()))
            .filter(requests::Column::Status.eq(RegistrationStatus::Pending.as_str()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain model.
fn to_domain(model: requests::Model) -> Result<RegistrationRequest, StoreError> {
    let status = RegistrationStatus::parse(&model.status)
        .ok_or_else(|| corrupt("user_registration_requests.status", &model.status))?;

    Ok(RegistrationRequest {
        id: RegistrationRequestId::from_uuid(model.id),
        full_name: model.full_name,
        cpf: model.cpf,
        email: model.email,
        requested_organization_id: OrganizationId::from_uuid(model.requested_organization_id),
        status,
        rejection_reason: model.rejection_reason,
        created_at: model.created_at.with_timezone(&Utc),
        reviewed_at: model.reviewed_at.map(|t| t.with_timezone(&Utc)),
    })
}
