//! Declaration repository for database operations.
//!
//! Declarations are append-only; only the status of a record changes after
//! it is written.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::{corrupt, db_err};
use crate::entities::declarations;
use declara_core::declaration::{
    Declaration, DeclarationRepository as DeclarationRepoTrait, DeclarationStatus,
    DeclarationTotals, ResponsibleData,
};
use declara_core::store::StoreError;
use declara_shared::types::{DeclarationId, OrganizationId, UserId};

/// Declaration repository implementation.
#[derive(Debug, Clone)]
pub struct DeclarationRepository {
    db: DatabaseConnection,
}

impl DeclarationRepository {
    /// Create a new declaration repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl DeclarationRepoTrait for DeclarationRepository {
    async fn latest(
        &self,
        organization_id: OrganizationId,
        period_year: i32,
    ) -> Result<Option<Declaration>, StoreError> {
        let model = declarations::Entity::find()
            .filter(declarations::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(declarations::Column::PeriodYear.eq(period_year))
            .order_by_desc(declarations::Column::SubmittedAt)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        model.map(to_domain).transpose()
    }

    async fn history(
        &self,
        organization_id: OrganizationId,
        period_year: i32,
    ) -> Result<Vec<Declaration>, StoreError> {
        let models = declarations::Entity::find()
            .filter(declarations::Column::OrganizationId.eq(organization_id.into_inner()))
            .filter(declarations::Column::PeriodYear.eq(period_year))
            .order_by_desc(declarations::Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        models.into_iter().map(to_domain).collect()
    }

    async fn insert(&self, declaration: &Declaration) -> Result<(), StoreError> {
        let responsible = declaration
            .responsible
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| StoreError::backend(e.to_string()))?;

        let active_model = declarations::ActiveModel {
            id: Set(declaration.id.into_inner()),
            organization_id: Set(declaration.organization_id.into_inner()),
            period_year: Set(declaration.period_year),
            status: Set(declaration.status.as_str().to_string()),
            receipt_number: Set(declaration.receipt_number.clone()),
            is_rectification: Set(declaration.is_rectification),
            rectification_count: Set(declaration.rectification_count),
            total_revenue: Set(declaration.totals.total_revenue),
            total_expense: Set(declaration.totals.total_expense),
            total_finalistica: Set(declaration.totals.total_finalistica),
            total_apoio: Set(declaration.totals.total_apoio),
            snapshot: Set(declaration.snapshot.clone()),
            responsible: Set(responsible),
            submitted_by: Set(declaration.submitted_by.into_inner()),
            submitted_at: Set(declaration.submitted_at.into()),
        };

        active_model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn set_status(
        &self,
        id: DeclarationId,
        status: DeclarationStatus,
    ) -> Result<(), StoreError> {
        declarations::Entity::update_many()
            .col_expr(declarations::Column::Status, Expr::value(status.as_str()))
            .filter(declarations::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

/// Convert database model to domain model.
fn to_domain(model: declarations::Model) -> Result<Declaration, StoreError> {
    let status = DeclarationStatus::parse(&model.status)
        .ok_or_else(|| corrupt("declarations.status", &model.status))?;
    let responsible = model
        .responsible
        .map(serde_json::from_value::<ResponsibleData>)
        .transpose()
        .map_err(|e| StoreError::corrupt(format!("declarations.responsible: {e}")))?;

    Ok(Declaration {
        id: DeclarationId::from_uuid(model.id),
        organization_id: OrganizationId::from_uuid(model.organization_id),
        period_year: model.period_year,
        status,
        receipt_number: model.receipt_number,
        is_rectification: model.is_rectification,
        rectification_count: model.rectification_count,
        totals: DeclarationTotals {
            total_revenue: model.total_revenue,
            total_expense: model.total_expense,
            total_finalistica: model.total_finalistica,
            total_apoio: model.total_apoio,
        },
        snapshot: model.snapshot,
        responsible,
        submitted_by: UserId::from_uuid(model.submitted_by),
        submitted_at: model.submitted_at.with_timezone(&Utc),
    })
}
