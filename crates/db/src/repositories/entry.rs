//! Entry repository: expense and revenue rows plus their change history.
//!
//! Rows are unique per `(organization_id, account_id)`. Batch upserts run in
//! one transaction so a failed row leaves the organization untouched.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{corrupt, db_err};
use crate::entities::{entry_history, expenses, revenues};
use declara_core::entries::{
    ClearedData, EntryChange, EntryField, EntryRepository as EntryRepoTrait, ExpenseAmounts,
    ExpenseRow, ExpenseValues, RevenueRow, RevenueValues,
};
use declara_core::store::StoreError;
use declara_shared::types::{OrganizationId, UserId};

/// Entry repository implementation.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    db: DatabaseConnection,
}

impl EntryRepository {
    /// Create a new entry repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl EntryRepoTrait for EntryRepository {
    async fn load_expenses(
        &self,
        organization_id: OrganizationId,
    ) -> Result<ExpenseValues, StoreError> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::OrganizationId.eq(organization_id.into_inner()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models
            .into_iter()
            .map(|m| (m.account_id, amounts(m.total, m.finalistica)))
            .collect())
    }

    async fn load_revenues(
        &self,
        organization_id: OrganizationId,
    ) -> Result<RevenueValues, StoreError> {
        let models = revenues::Entity::find()
            .filter(revenues::Column::OrganizationId.eq(organization_id.into_inner()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(|m| (m.account_id, m.value)).collect())
    }

    async fn upsert_expenses(
        &self,
        organization_id: OrganizationId,
        rows: &[(String, ExpenseAmounts)],
    ) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }

        let txn = self.db.begin().await.map_err(db_err)?;
        let now = Utc::now();

        for (account_id, amounts) in rows {
            let active_model = expenses::ActiveModel {
                id: Set(Uuid::now_v7()),
                organization_id: Set(organization_id.into_inner()),
                account_id: Set(account_id.clone()),
                total: Set(amounts.total),
                finalistica: Set(amounts.finalistica),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };

            expenses::Entity::insert(active_model)
                .on_conflict(
                    OnConflict::columns([
                        expenses::Column::OrganizationId,
                        expenses::Column::AccountId,
                    ])
                    .update_columns([expenses::Column::Total, expenses::Column::Finalistica])
                    .to_owned(),
                )
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        tracing::debug!(org_id = %organization_id, rows = rows.len(), "expenses upserted");
        Ok(())
    }

    async fn upsert_revenues(
        &self,
        organization_id: OrganizationId,
        rows: &[(String, Decimal)],
    ) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }

        let txn = self.db.begin().await.map_err(db_err)?;
        let now = Utc::now();

        for (account_id, value) in rows {
            let active_model = revenues::ActiveModel {
                id: Set(Uuid::now_v7()),
                organization_id: Set(organization_id.into_inner()),
                account_id: Set(account_id.clone()),
                value: Set(*value),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };

            revenues::Entity::insert(active_model)
                .on_conflict(
                    OnConflict::columns([
                        revenues::Column::OrganizationId,
                        revenues::Column::AccountId,
                    ])
                    .update_column(revenues::Column::Value)
                    .to_owned(),
                )
                .exec(&txn)
                .await
                .map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;
        tracing::debug!(org_id = %organization_id, rows = rows.len(), "revenues upserted");
        Ok(())
    }

    async fn all_expenses(&self) -> Result<Vec<ExpenseRow>, StoreError> {
        let models = expenses::Entity::find()
            .order_by_asc(expenses::Column::OrganizationId)
            .order_by_asc(expenses::Column::AccountId)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models
            .into_iter()
            .map(|m| ExpenseRow {
                organization_id: OrganizationId::from_uuid(m.organization_id),
                account_id: m.account_id,
                amounts: amounts(m.total, m.finalistica),
            })
            .collect())
    }

    async fn all_revenues(&self) -> Result<Vec<RevenueRow>, StoreError> {
        let models = revenues::Entity::find()
            .order_by_asc(revenues::Column::OrganizationId)
            .order_by_asc(revenues::Column::AccountId)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(models
            .into_iter()
            .map(|m| RevenueRow {
                organization_id: OrganizationId::from_uuid(m.organization_id),
                account_id: m.account_id,
                value: m.value,
            })
            .collect())
    }

    async fn clear_all(&self) -> Result<ClearedData, StoreError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let expenses = expenses::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?
            .rows_affected;
        let revenues = revenues::Entity::delete_many()
            .exec(&txn)
            .await
            .map_err(db_err)?
            .rows_affected;

        txn.commit().await.map_err(db_err)?;
        Ok(ClearedData { expenses, revenues })
    }

    async fn append_history(&self, changes: &[EntryChange]) -> Result<(), StoreError> {
        if changes.is_empty() {
            return Ok(());
        }

        let models = changes.iter().map(|c| entry_history::ActiveModel {
            id: Set(Uuid::now_v7()),
            organization_id: Set(c.organization_id.into_inner()),
            account_id: Set(c.account_id.clone()),
            field: Set(c.field.as_str().to_string()),
            previous_value: Set(c.previous_value),
            new_value: Set(c.new_value),
            changed_by: Set(c.changed_by.into_inner()),
            changed_at: Set(c.changed_at.into()),
            is_recovery: Set(c.is_recovery),
        });

        entry_history::Entity::insert_many(models)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn list_history(
        &self,
        organization_id: OrganizationId,
    ) -> Result<Vec<EntryChange>, StoreError> {
        let models = entry_history::Entity::find()
            .filter(entry_history::Column::OrganizationId.eq(organization_id.into_inner()))
            .order_by_desc(entry_history::Column::ChangedAt)
            .order_by_desc(entry_history::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        models.into_iter().map(history_to_domain).collect()
    }
}

/// Stored figures; the table constraints already enforce the invariant.
fn amounts(total: Decimal, finalistica: Decimal) -> ExpenseAmounts {
    ExpenseAmounts { total, finalistica }
}

/// Convert a history row to its domain record.
fn history_to_domain(model: entry_history::Model) -> Result<EntryChange, StoreError> {
    let field = EntryField::parse(&model.field)
        .ok_or_else(|| corrupt("entry_history.field", &model.field))?;

    Ok(EntryChange {
        organization_id: OrganizationId::from_uuid(model.organization_id),
        account_id: model.account_id,
        field,
        previous_value: model.previous_value,
        new_value: model.new_value,
        changed_by: UserId::from_uuid(model.changed_by),
        changed_at: model.changed_at.with_timezone(&Utc),
        is_recovery: model.is_recovery,
    })
}
