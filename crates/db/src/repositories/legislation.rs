//! Legislation document repository. Stores metadata only; file bytes live
//! in object storage under `file_path`.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::db_err;
use crate::entities::legislation_documents as documents;
use declara_core::legislation::{
    LegislationDocument, LegislationRepository as LegislationRepoTrait,
};
use declara_core::store::StoreError;
use declara_shared::types::{DocumentId, UserId};

/// Legislation document repository implementation.
#[derive(Debug, Clone)]
pub struct LegislationRepository {
    db: DatabaseConnection,
}

impl LegislationRepository {
    /// Create a new legislation document repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl LegislationRepoTrait for LegislationRepository {
    async fn insert(&self, document: &LegislationDocument) -> Result<(), StoreError> {
        let active_model = documents::ActiveModel {
            id: Set(document.id.into_inner()),
            file_name: Set(document.file_name.clone()),
            file_path: Set(document.file_path.clone()),
            description: Set(document.description.clone()),
            display_order: Set(document.display_order),
            uploaded_by: Set(document.uploaded_by.into_inner()),
            uploaded_at: Set(document.uploaded_at.into()),
        };

        active_model.insert(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn find(&self, id: DocumentId) -> Result<Option<LegislationDocument>, StoreError> {
        let model = documents::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(to_domain))
    }

    async fn list(&self) -> Result<Vec<LegislationDocument>, StoreError> {
        let models = documents::Entity::find()
            .order_by_asc(documents::Column::DisplayOrder)
            .order_by_asc(documents::Column::UploadedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn max_display_order(&self) -> Result<Option<i32>, StoreError> {
        let model = documents::Entity::find()
            .order_by_desc(documents::Column::DisplayOrder)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(model.map(|m| m.display_order))
    }

    async fn set_display_order(&self, order: &[(DocumentId, i32)]) -> Result<(), StoreError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        for (id, position) in order {
            documents::Entity::update_many()
                .col_expr(documents::Column::DisplayOrder, Expr::value(*position))
                .filter(documents::Column::Id.eq(id.into_inner()))
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: DocumentId) -> Result<(), StoreError> {
        documents::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

/// Convert database model to domain model.
fn to_domain(model: documents::Model) -> LegislationDocument {
    LegislationDocument {
        id: DocumentId::from_uuid(model.id),
        file_name: model.file_name,
        file_path: model.file_path,
        description: model.description,
        display_order: model.display_order,
        uploaded_by: UserId::from_uuid(model.uploaded_by),
        uploaded_at: model.uploaded_at.with_timezone(&Utc),
    }
}
