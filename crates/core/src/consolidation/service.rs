//! Privileged read path over every organization's entries.

use std::sync::Arc;

use declara_shared::{AppError, Principal};
use thiserror::Error;
use tracing::debug;

use super::aggregate::{
    ConsolidatedExpenses, ConsolidatedRevenues, consolidate_expenses, consolidate_revenues,
};
use super::table::{bi_expense_table, bi_revenue_table};
use crate::entries::EntryRepository;
use crate::organization::OrganizationRepository;
use crate::sheet::{self, SheetError};
use crate::store::StoreError;

/// Errors of the consolidated views.
#[derive(Debug, Error)]
pub enum ConsolidationError {
    /// Only the national council and administrators see every organization.
    #[error("consolidated data is restricted to the national council")]
    Forbidden,

    /// Rendering the table failed.
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// Backing store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ConsolidationError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Forbidden => 403,
            Self::Sheet(_) | Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Forbidden => "FORBIDDEN",
            Self::Sheet(_) => "INTERNAL_ERROR",
            Self::Store(_) => "DATABASE_ERROR",
        }
    }
}

impl From<ConsolidationError> for AppError {
    fn from(err: ConsolidationError) -> Self {
        match err {
            ConsolidationError::Forbidden => Self::Forbidden(err.to_string()),
            ConsolidationError::Sheet(e) => Self::Internal(e.to_string()),
            ConsolidationError::Store(e) => e.into(),
        }
    }
}

/// Consolidated views for the national council.
pub struct ConsolidationService<E, O>
where
    E: EntryRepository,
    O: OrganizationRepository,
{
    entries: Arc<E>,
    organizations: Arc<O>,
}

impl<E, O> ConsolidationService<E, O>
where
    E: EntryRepository,
    O: OrganizationRepository,
{
    /// Create a new consolidation service.
    #[must_use]
    pub fn new(entries: Arc<E>, organizations: Arc<O>) -> Self {
        Self {
            entries,
            organizations,
        }
    }

    fn authorize(principal: &Principal) -> Result<(), ConsolidationError> {
        if principal.can_view_consolidated() {
            Ok(())
        } else {
            Err(ConsolidationError::Forbidden)
        }
    }

    /// Expense values of every organization.
    ///
    /// # Errors
    ///
    /// `Forbidden` for regional members, `Store` on read failures.
    pub async fn expenses(
        &self,
        principal: &Principal,
    ) -> Result<ConsolidatedExpenses, ConsolidationError> {
        Self::authorize(principal)?;
        let rows = self.entries.all_expenses().await?;
        debug!(rows = rows.len(), "consolidating expenses");
        Ok(consolidate_expenses(&rows))
    }

    /// Revenue values of every organization.
    ///
    /// # Errors
    ///
    /// `Forbidden` for regional members, `Store` on read failures.
    pub async fn revenues(
        &self,
        principal: &Principal,
    ) -> Result<ConsolidatedRevenues, ConsolidationError> {
        Self::authorize(principal)?;
        let rows = self.entries.all_revenues().await?;
        debug!(rows = rows.len(), "consolidating revenues");
        Ok(consolidate_revenues(&rows))
    }

    /// Expense BI table rendered as CSV.
    ///
    /// # Errors
    ///
    /// Same as [`Self::expenses`].
    pub async fn expense_bi(&self, principal: &Principal) -> Result<Vec<u8>, ConsolidationError> {
        let consolidated = self.expenses(principal).await?;
        let organizations = self.organizations.list().await?;
        Ok(sheet::write_table(&bi_expense_table(
            &consolidated,
            &organizations,
        ))?)
    }

    /// Revenue BI table rendered as CSV.
    ///
    /// # Errors
    ///
    /// Same as [`Self::revenues`].
    pub async fn revenue_bi(&self, principal: &Principal) -> Result<Vec<u8>, ConsolidationError> {
        let consolidated = self.revenues(principal).await?;
        let organizations = self.organizations.list().await?;
        Ok(sheet::write_table(&bi_revenue_table(
            &consolidated,
            &organizations,
        ))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStore, admin_principal, principal_for};
    use declara_shared::types::OrganizationKind;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_regional_member_is_forbidden() {
        let store = Arc::new(MemoryStore::new());
        let service = ConsolidationService::new(store.clone(), store);
        let result = service.expenses(&principal_for(OrganizationKind::Cra)).await;
        assert!(matches!(result, Err(ConsolidationError::Forbidden)));
    }

    #[tokio::test]
    async fn test_cfa_sees_every_organization() {
        let store = Arc::new(MemoryStore::new());
        let orgs = store.seed_organizations().await;
        let ce = orgs.iter().find(|o| o.name == "CRA-CE").unwrap().id;
        let sp = orgs.iter().find(|o| o.name == "CRA-SP").unwrap().id;
        store.put_expense(ce, "1.1.1.1", dec!(100), dec!(10));
        store.put_expense(sp, "1.1.1.1", dec!(200), dec!(20));
        store.put_revenue(sp, "1.1.1", dec!(999));

        let service = ConsolidationService::new(store.clone(), store);
        let cfa = principal_for(OrganizationKind::Cfa);
        let expenses = service.expenses(&cfa).await.unwrap();
        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[&sp]["1.1.1.1"].total, dec!(200));
        let revenues = service.revenues(&admin_principal()).await.unwrap();
        assert_eq!(revenues[&sp]["1.1.1"], dec!(999));
    }

    #[tokio::test]
    async fn test_bi_export_has_a_row_per_organization() {
        let store = Arc::new(MemoryStore::new());
        let orgs = store.seed_organizations().await;
        let service = ConsolidationService::new(store.clone(), store);

        let bytes = service
            .expense_bi(&principal_for(OrganizationKind::Cfa))
            .await
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), orgs.len() + 1);
        assert!(text.starts_with("Organização,"));
    }
}
