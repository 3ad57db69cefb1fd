//! Responsible persons repository, one row per organization.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use super::{corrupt, db_err};
use crate::entities::responsible_persons;
use declara_core::declaration::{
    DocumentType, ResponsibleData, ResponsibleRepository as ResponsibleRepoTrait,
};
use declara_core::store::StoreError;
use declara_shared::types::OrganizationId;

/// Responsible persons repository implementation.
#[derive(Debug, Clone)]
pub struct ResponsibleRepository {
    db: DatabaseConnection,
}

impl ResponsibleRepository {
    /// Create a new responsible persons repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ResponsibleRepoTrait for ResponsibleRepository {
    async fn find(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Option<ResponsibleData>, StoreError> {
        let model = responsible_persons::Entity::find_by_id(organization_id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_err)?;

        model.map(to_domain).transpose()
    }

    async fn upsert(
        &self,
        organization_id: OrganizationId,
        data: &ResponsibleData,
    ) -> Result<(), StoreError> {
        use responsible_persons::Column;

        let active_model = responsible_persons::ActiveModel {
            organization_id: Set(organization_id.into_inner()),
            unit_responsible_name: Set(data.unit_responsible_name.clone()),
            unit_responsible_cra_number: Set(data.unit_responsible_cra_number.clone()),
            data_responsible_name: Set(data.data_responsible_name.clone()),
            data_responsible_role: Set(data.data_responsible_role.clone()),
            data_responsible_doc_type: Set(data.data_responsible_doc_type.as_str().to_string()),
            data_responsible_doc_number: Set(data.data_responsible_doc_number.clone()),
            cnpj: Set(data.cnpj.clone()),
            updated_at: Set(Utc::now().into()),
        };

        responsible_persons::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(Column::OrganizationId)
                    .update_columns([
                        Column::UnitResponsibleName,
                        Column::UnitResponsibleCraNumber,
                        Column::DataResponsibleName,
                        Column::DataResponsibleRole,
                        Column::DataResponsibleDocType,
                        Column::DataResponsibleDocNumber,
                        Column::Cnpj,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

/// Convert database model to domain model.
fn to_domain(model: responsible_persons::Model) -> Result<ResponsibleData, StoreError> {
    let doc_type = DocumentType::parse(&model.data_responsible_doc_type).ok_or_else(|| {
        corrupt(
            "responsible_persons.data_responsible_doc_type",
            &model.data_responsible_doc_type,
        )
    })?;

    Ok(ResponsibleData {
        unit_responsible_name: model.unit_responsible_name,
        unit_responsible_cra_number: model.unit_responsible_cra_number,
        data_responsible_name: model.data_responsible_name,
        data_responsible_role: model.data_responsible_role,
        data_responsible_doc_type: doc_type,
        data_responsible_doc_number: model.data_responsible_doc_number,
        cnpj: model.cnpj,
    })
}
