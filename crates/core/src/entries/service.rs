//! Entry service: guarded writes, imports, exports and history.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use declara_shared::Principal;
use declara_shared::types::OrganizationId;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::error::EntryError;
use super::report::{self, Report};
use super::types::{
    ClearedData, EntryChange, EntryField, ExpenseAmounts, ExpenseRow, ExpenseValues,
    ImportReport, ImportedRow, RestoredSnapshot, RevenueRow, RevenueValues, expense_changes,
    revenue_change, validate_revenue,
};
use crate::audit::{ActivityKind, ActivityLogRepository, OrganizationActivity};
use crate::catalog::Catalog;
use crate::declaration::{
    DeclarationRepository, LockGuard, LockState, ReportingPeriod, persisted_status,
};
use crate::sheet;
use crate::store::StoreError;

/// Phrase an administrator must type to wipe every entry.
pub const CLEAR_DATA_CONFIRMATION: &str = "LIMPAR TUDO";

/// Repository trait for expense and revenue rows.
///
/// Rows are unique per `(organization_id, account_id)`; every write is an
/// upsert on that key.
pub trait EntryRepository: Send + Sync {
    /// Expense values of one organization.
    fn load_expenses(
        &self,
        organization_id: OrganizationId,
    ) -> impl Future<Output = Result<ExpenseValues, StoreError>> + Send;

    /// Revenue values of one organization.
    fn load_revenues(
        &self,
        organization_id: OrganizationId,
    ) -> impl Future<Output = Result<RevenueValues, StoreError>> + Send;

    /// Upserts expense rows of one organization in a single call.
    fn upsert_expenses(
        &self,
        organization_id: OrganizationId,
        rows: &[(String, ExpenseAmounts)],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Upserts revenue rows of one organization in a single call.
    fn upsert_revenues(
        &self,
        organization_id: OrganizationId,
        rows: &[(String, Decimal)],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Every expense row of every organization.
    fn all_expenses(&self) -> impl Future<Output = Result<Vec<ExpenseRow>, StoreError>> + Send;

    /// Every revenue row of every organization.
    fn all_revenues(&self) -> impl Future<Output = Result<Vec<RevenueRow>, StoreError>> + Send;

    /// Deletes every expense and revenue row.
    fn clear_all(&self) -> impl Future<Output = Result<ClearedData, StoreError>> + Send;

    /// Appends change records.
    fn append_history(
        &self,
        changes: &[EntryChange],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Change records of one organization, newest first.
    fn list_history(
        &self,
        organization_id: OrganizationId,
    ) -> impl Future<Output = Result<Vec<EntryChange>, StoreError>> + Send;
}

/// Entry service for one reporting period.
pub struct EntryService<E, D, A>
where
    E: EntryRepository,
    D: DeclarationRepository,
    A: ActivityLogRepository,
{
    entries: Arc<E>,
    declarations: Arc<D>,
    activity: Arc<A>,
    period: ReportingPeriod,
}

impl<E, D, A> EntryService<E, D, A>
where
    E: EntryRepository,
    D: DeclarationRepository,
    A: ActivityLogRepository,
{
    /// Create a new entry service.
    #[must_use]
    pub fn new(
        entries: Arc<E>,
        declarations: Arc<D>,
        activity: Arc<A>,
        period: ReportingPeriod,
    ) -> Self {
        Self {
            entries,
            declarations,
            activity,
            period,
        }
    }

    fn authorize_read(
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> Result<(), EntryError> {
        if principal.can_access(organization_id) || principal.can_view_consolidated() {
            Ok(())
        } else {
            Err(EntryError::Forbidden(
                "entries belong to another organization".to_string(),
            ))
        }
    }

    fn authorize_write(
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> Result<(), EntryError> {
        if principal.can_access(organization_id) {
            Ok(())
        } else {
            Err(EntryError::Forbidden(
                "entries belong to another organization".to_string(),
            ))
        }
    }

    /// Rejects writes while the declaration is submitted or the period closed.
    async fn ensure_writable(
        &self,
        organization_id: OrganizationId,
        now: DateTime<Utc>,
    ) -> Result<(), EntryError> {
        let status =
            persisted_status(self.declarations.as_ref(), organization_id, &self.period).await?;
        match LockGuard::evaluate(status.unwrap_or_default(), now, self.period.deadline, false) {
            LockState::Open => Ok(()),
            LockState::Submitted => Err(EntryError::Locked),
            LockState::Closed => Err(EntryError::DeadlinePassed {
                year: self.period.year,
            }),
        }
    }

    async fn record_history(&self, organization_id: OrganizationId, changes: &[EntryChange]) {
        if changes.is_empty() {
            return;
        }
        if let Err(e) = self.entries.append_history(changes).await {
            warn!(org_id = %organization_id, error = %e, "entry history not recorded");
        }
    }

    async fn record_activity(&self, entry: OrganizationActivity) {
        if let Err(e) = self.activity.append_activity(&entry).await {
            warn!(
                org_id = %entry.organization_id,
                kind = entry.kind.as_str(),
                error = %e,
                "organization activity not recorded"
            );
        }
    }

    /// Expense values of an organization.
    ///
    /// # Errors
    ///
    /// Fails on foreign organizations (unless CFA/admin) and store errors.
    pub async fn load_expenses(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> Result<ExpenseValues, EntryError> {
        Self::authorize_read(principal, organization_id)?;
        Ok(self.entries.load_expenses(organization_id).await?)
    }

    /// Revenue values of an organization.
    ///
    /// # Errors
    ///
    /// Fails on foreign organizations (unless CFA/admin) and store errors.
    pub async fn load_revenues(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> Result<RevenueValues, EntryError> {
        Self::authorize_read(principal, organization_id)?;
        Ok(self.entries.load_revenues(organization_id).await?)
    }

    /// Writes one expense entry.
    ///
    /// Validation runs before anything else touches the store, so a rejected
    /// write leaves the previous row unchanged.
    ///
    /// # Errors
    ///
    /// * `Validation` / `Account` for bad figures or accounts
    /// * `Locked` / `DeadlinePassed` when the guard refuses the write
    pub async fn save_expense(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
        account_id: &str,
        amounts: ExpenseAmounts,
        now: DateTime<Utc>,
    ) -> Result<ExpenseAmounts, EntryError> {
        Self::authorize_write(principal, organization_id)?;
        amounts.validate()?;
        Catalog::expense().require_analytic(account_id)?;
        self.ensure_writable(organization_id, now).await?;

        let previous = self.entries.load_expenses(organization_id).await?;
        self.entries
            .upsert_expenses(organization_id, &[(account_id.to_string(), amounts)])
            .await?;

        let changes = expense_changes(
            organization_id,
            account_id,
            previous.get(account_id).copied(),
            amounts,
            principal.user_id,
            now,
        );
        self.record_history(organization_id, &changes).await;
        Ok(amounts)
    }

    /// Writes one revenue entry.
    ///
    /// # Errors
    ///
    /// Same as [`Self::save_expense`].
    pub async fn save_revenue(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
        account_id: &str,
        value: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Decimal, EntryError> {
        Self::authorize_write(principal, organization_id)?;
        validate_revenue(value)?;
        Catalog::revenue().require_analytic(account_id)?;
        self.ensure_writable(organization_id, now).await?;

        let previous = self.entries.load_revenues(organization_id).await?;
        self.entries
            .upsert_revenues(organization_id, &[(account_id.to_string(), value)])
            .await?;

        let change = revenue_change(
            organization_id,
            account_id,
            previous.get(account_id).copied(),
            value,
            principal.user_id,
            now,
        );
        self.record_history(organization_id, change.as_slice()).await;
        Ok(value)
    }

    /// Imports an expense spreadsheet.
    ///
    /// Rows are validated one by one; valid rows are written in one batch,
    /// invalid ones are reported and skipped. Rows naming unknown accounts
    /// never reach this point (the codec drops them).
    ///
    /// # Errors
    ///
    /// Fails for unreadable files, a locked declaration or store errors.
    pub async fn import_expenses(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
        file: &[u8],
        now: DateTime<Utc>,
    ) -> Result<ImportReport, EntryError> {
        Self::authorize_write(principal, organization_id)?;
        let parsed = sheet::import_expenses(file)?;
        self.ensure_writable(organization_id, now).await?;

        let mut report = ImportReport::default();
        let mut accepted = BTreeMap::new();
        for row in parsed {
            let amounts = row.value;
            let rejected = amounts.validate().err().map(|e| e.to_string());
            if rejected.is_none() {
                accepted.insert(row.account_id.clone(), amounts);
            }
            report.rows.push(ImportedRow {
                line: row.line,
                account_id: row.account_id,
                rejected,
                warnings: row.issues.iter().map(ToString::to_string).collect(),
            });
        }

        let previous = self.entries.load_expenses(organization_id).await?;
        let rows: Vec<_> = accepted.into_iter().collect();
        if !rows.is_empty() {
            self.entries.upsert_expenses(organization_id, &rows).await?;
        }

        let changes: Vec<_> = rows
            .iter()
            .flat_map(|(account_id, amounts)| {
                expense_changes(
                    organization_id,
                    account_id,
                    previous.get(account_id).copied(),
                    *amounts,
                    principal.user_id,
                    now,
                )
            })
            .collect();
        self.record_history(organization_id, &changes).await;

        info!(
            org_id = %organization_id,
            applied = report.applied(),
            rejected = report.rejected(),
            warnings = report.warnings(),
            "expense spreadsheet imported"
        );
        Ok(report)
    }

    /// Imports a revenue spreadsheet.
    ///
    /// # Errors
    ///
    /// Same as [`Self::import_expenses`].
    pub async fn import_revenues(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
        file: &[u8],
        now: DateTime<Utc>,
    ) -> Result<ImportReport, EntryError> {
        Self::authorize_write(principal, organization_id)?;
        let parsed = sheet::import_revenues(file)?;
        self.ensure_writable(organization_id, now).await?;

        let mut report = ImportReport::default();
        let mut accepted = BTreeMap::new();
        for row in parsed {
            let value = row.value;
            let rejected = validate_revenue(value).err().map(|e| e.to_string());
            if rejected.is_none() {
                accepted.insert(row.account_id.clone(), value);
            }
            report.rows.push(ImportedRow {
                line: row.line,
                account_id: row.account_id,
                rejected,
                warnings: row.issues.iter().map(ToString::to_string).collect(),
            });
        }

        let previous = self.entries.load_revenues(organization_id).await?;
        let rows: Vec<_> = accepted.into_iter().collect();
        if !rows.is_empty() {
            self.entries.upsert_revenues(organization_id, &rows).await?;
        }

        let changes: Vec<_> = rows
            .iter()
            .filter_map(|(account_id, value)| {
                revenue_change(
                    organization_id,
                    account_id,
                    previous.get(account_id).copied(),
                    *value,
                    principal.user_id,
                    now,
                )
            })
            .collect();
        self.record_history(organization_id, &changes).await;

        info!(
            org_id = %organization_id,
            applied = report.applied(),
            rejected = report.rejected(),
            warnings = report.warnings(),
            "revenue spreadsheet imported"
        );
        Ok(report)
    }

    /// Expense spreadsheet of an organization.
    ///
    /// # Errors
    ///
    /// Fails on foreign organizations and store errors.
    pub async fn export_expenses(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> Result<Vec<u8>, EntryError> {
        let values = self.load_expenses(principal, organization_id).await?;
        Ok(sheet::export_expenses(&values)?)
    }

    /// Revenue spreadsheet of an organization.
    ///
    /// # Errors
    ///
    /// Fails on foreign organizations and store errors.
    pub async fn export_revenues(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> Result<Vec<u8>, EntryError> {
        let values = self.load_revenues(principal, organization_id).await?;
        Ok(sheet::export_revenues(&values)?)
    }

    /// Change history of an organization, newest first.
    ///
    /// # Errors
    ///
    /// Fails on foreign organizations and store errors.
    pub async fn history(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> Result<Vec<EntryChange>, EntryError> {
        Self::authorize_read(principal, organization_id)?;
        Ok(self.entries.list_history(organization_id).await?)
    }

    /// Change history rendered as a spreadsheet.
    ///
    /// # Errors
    ///
    /// Fails on foreign organizations and store errors.
    pub async fn export_history(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> Result<Vec<u8>, EntryError> {
        let changes = self.history(principal, organization_id).await?;
        Ok(sheet::export_history(&changes)?)
    }

    /// Rolls an organization's entries back to their values at `as_of`.
    ///
    /// Every recorded change newer than `as_of` is undone, newest first, by
    /// restoring its previous value. Accounts first written after `as_of`
    /// return to zero. Each restored field is recorded as a recovery change.
    ///
    /// # Errors
    ///
    /// * `Forbidden` on foreign organizations
    /// * `Locked` / `DeadlinePassed` when the guard refuses the write
    /// * `Validation` if the recorded history yields invalid figures
    pub async fn restore_snapshot(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
        as_of: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<RestoredSnapshot, EntryError> {
        Self::authorize_write(principal, organization_id)?;
        self.ensure_writable(organization_id, now).await?;

        let current_expenses = self.entries.load_expenses(organization_id).await?;
        let current_revenues = self.entries.load_revenues(organization_id).await?;
        let history = self.entries.list_history(organization_id).await?;

        let mut expenses = current_expenses.clone();
        let mut revenues = current_revenues.clone();
        for change in history.into_iter().take_while(|c| c.changed_at > as_of) {
            match change.field {
                EntryField::Total => {
                    expenses.entry(change.account_id).or_default().total = change.previous_value;
                }
                EntryField::Finalistica => {
                    expenses.entry(change.account_id).or_default().finalistica =
                        change.previous_value;
                }
                EntryField::Value => {
                    revenues.insert(change.account_id, change.previous_value);
                }
            }
        }
        expenses.retain(|code, amounts| {
            current_expenses.contains_key(code) || *amounts != ExpenseAmounts::ZERO
        });
        revenues.retain(|code, value| current_revenues.contains_key(code) || !value.is_zero());

        let expense_rows: Vec<_> = expenses
            .iter()
            .filter(|(code, amounts)| current_expenses.get(*code) != Some(*amounts))
            .map(|(code, amounts)| (code.clone(), *amounts))
            .collect();
        let revenue_rows: Vec<_> = revenues
            .iter()
            .filter(|(code, value)| current_revenues.get(*code) != Some(*value))
            .map(|(code, value)| (code.clone(), *value))
            .collect();
        for (_, amounts) in &expense_rows {
            amounts.validate()?;
        }
        for (_, value) in &revenue_rows {
            validate_revenue(*value)?;
        }

        if !expense_rows.is_empty() {
            self.entries
                .upsert_expenses(organization_id, &expense_rows)
                .await?;
        }
        if !revenue_rows.is_empty() {
            self.entries
                .upsert_revenues(organization_id, &revenue_rows)
                .await?;
        }

        let changes: Vec<_> = expense_rows
            .iter()
            .flat_map(|(code, amounts)| {
                expense_changes(
                    organization_id,
                    code,
                    current_expenses.get(code).copied(),
                    *amounts,
                    principal.user_id,
                    now,
                )
            })
            .chain(revenue_rows.iter().filter_map(|(code, value)| {
                revenue_change(
                    organization_id,
                    code,
                    current_revenues.get(code).copied(),
                    *value,
                    principal.user_id,
                    now,
                )
            }))
            .map(EntryChange::into_recovery)
            .collect();
        self.record_history(organization_id, &changes).await;
        self.record_activity(OrganizationActivity::new(
            organization_id,
            ActivityKind::SnapshotRestored,
            principal.user_id,
            now,
            serde_json::json!({ "as_of": as_of, "changes": changes.len() }),
        ))
        .await;

        info!(
            org_id = %organization_id,
            as_of = %as_of,
            changes = changes.len(),
            "entries restored"
        );
        Ok(RestoredSnapshot {
            as_of,
            expenses,
            revenues,
            changes: changes.len(),
        })
    }

    /// Printable expense report with synthetic subtotals.
    ///
    /// # Errors
    ///
    /// Fails on foreign organizations (unless CFA/admin) and store errors.
    pub async fn expense_report(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
        now: DateTime<Utc>,
    ) -> Result<Report, EntryError> {
        let values = self.load_expenses(principal, organization_id).await?;
        let lines = report::expense_lines(&values);
        self.printed(principal, organization_id, "expenses", lines, now)
            .await
    }

    /// Printable revenue report with synthetic subtotals.
    ///
    /// # Errors
    ///
    /// Fails on foreign organizations (unless CFA/admin) and store errors.
    pub async fn revenue_report(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
        now: DateTime<Utc>,
    ) -> Result<Report, EntryError> {
        let values = self.load_revenues(principal, organization_id).await?;
        let lines = report::revenue_lines(&values);
        self.printed(principal, organization_id, "revenues", lines, now)
            .await
    }

    async fn printed(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
        name: &str,
        lines: Vec<report::ReportLine>,
        now: DateTime<Utc>,
    ) -> Result<Report, EntryError> {
        let report = Report {
            organization_id,
            period_year: self.period.year,
            generated_at: now,
            grand_total: report::grand_total(&lines),
            lines,
        };
        self.record_activity(OrganizationActivity::new(
            organization_id,
            ActivityKind::ReportPrinted,
            principal.user_id,
            now,
            serde_json::json!({ "report": name, "grand_total": report.grand_total }),
        ))
        .await;
        Ok(report)
    }

    /// Activity log of an organization, newest first.
    ///
    /// # Errors
    ///
    /// Fails on foreign organizations (unless CFA/admin) and store errors.
    pub async fn activity(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> Result<Vec<OrganizationActivity>, EntryError> {
        Self::authorize_read(principal, organization_id)?;
        Ok(self.activity.list_activity(organization_id).await?)
    }

    /// Deletes every expense and revenue row of every organization.
    ///
    /// Non-recoverable. Requires an administrator and the exact phrase
    /// [`CLEAR_DATA_CONFIRMATION`].
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admins, `ConfirmationMismatch` for a wrong phrase.
    pub async fn clear_all_data(
        &self,
        principal: &Principal,
        confirmation: &str,
    ) -> Result<ClearedData, EntryError> {
        if !principal.is_admin() {
            return Err(EntryError::Forbidden(
                "only administrators can clear data".to_string(),
            ));
        }
        if confirmation.trim() != CLEAR_DATA_CONFIRMATION {
            return Err(EntryError::ConfirmationMismatch);
        }

        let cleared = self.entries.clear_all().await?;
        warn!(
            performed_by = %principal.user_id,
            expenses = cleared.expenses,
            revenues = cleared.revenues,
            "all entry data cleared"
        );
        Ok(cleared)
    }
}
