//! Declaration service: submission, rectification and lock state.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use declara_shared::Principal;
use declara_shared::types::{DeclarationId, OrganizationId};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use super::error::DeclarationError;
use super::guard::{LockGuard, LockState};
use super::lifecycle::{DeclarationLifecycle, Transition};
use super::responsible::{ResponsibleData, ResponsibleRepository};
use super::types::{Declaration, DeclarationStatus, DeclarationTotals, ReportingPeriod};
use crate::audit::{ActivityKind, ActivityLogRepository, OrganizationActivity};
use crate::entries::{EntryRepository, ExpenseValues, RevenueValues};
use crate::store::StoreError;

/// Repository trait for declaration persistence.
///
/// Records are never deleted; every submission appends one.
pub trait DeclarationRepository: Send + Sync {
    /// Latest record of an organization for a period.
    fn latest(
        &self,
        organization_id: OrganizationId,
        period_year: i32,
    ) -> impl Future<Output = Result<Option<Declaration>, StoreError>> + Send;

    /// All records of an organization for a period, newest first.
    fn history(
        &self,
        organization_id: OrganizationId,
        period_year: i32,
    ) -> impl Future<Output = Result<Vec<Declaration>, StoreError>> + Send;

    /// Appends a record.
    fn insert(
        &self,
        declaration: &Declaration,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Changes the status of a record.
    fn set_status(
        &self,
        id: DeclarationId,
        status: DeclarationStatus,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Loads the persisted status, `Draft` when nothing was stored.
pub(crate) async fn persisted_status<D: DeclarationRepository>(
    declarations: &D,
    organization_id: OrganizationId,
    period: &ReportingPeriod,
) -> Result<Option<DeclarationStatus>, StoreError> {
    Ok(declarations
        .latest(organization_id, period.year)
        .await?
        .map(|d| d.status))
}

#[derive(Serialize)]
struct Snapshot<'a> {
    expenses: &'a ExpenseValues,
    revenues: &'a RevenueValues,
}

/// Computes declaration totals from entry values.
#[must_use]
pub fn compute_totals(expenses: &ExpenseValues, revenues: &RevenueValues) -> DeclarationTotals {
    let total_expense: Decimal = expenses.values().map(|e| e.total).sum();
    let total_finalistica: Decimal = expenses.values().map(|e| e.finalistica).sum();
    DeclarationTotals {
        total_revenue: revenues.values().copied().sum(),
        total_expense,
        total_finalistica,
        total_apoio: total_expense - total_finalistica,
    }
}

/// Generates a receipt number `YYYY.NNNNNN`.
fn receipt_number(now: DateTime<Utc>) -> String {
    let sequence: u32 = rand::rng().random_range(0..1_000_000);
    format!("{}.{sequence:06}", now.year())
}

/// Declaration service for one reporting period.
pub struct DeclarationService<D, E, P, A>
where
    D: DeclarationRepository,
    E: EntryRepository,
    P: ResponsibleRepository,
    A: ActivityLogRepository,
{
    declarations: Arc<D>,
    entries: Arc<E>,
    responsible: Arc<P>,
    activity: Arc<A>,
    period: ReportingPeriod,
}

impl<D, E, P, A> DeclarationService<D, E, P, A>
where
    D: DeclarationRepository,
    E: EntryRepository,
    P: ResponsibleRepository,
    A: ActivityLogRepository,
{
    /// Create a new declaration service.
    #[must_use]
    pub fn new(
        declarations: Arc<D>,
        entries: Arc<E>,
        responsible: Arc<P>,
        activity: Arc<A>,
        period: ReportingPeriod,
    ) -> Self {
        Self {
            declarations,
            entries,
            responsible,
            activity,
            period,
        }
    }

    /// The period this service acts on.
    #[must_use]
    pub fn period(&self) -> ReportingPeriod {
        self.period
    }

    fn authorize(
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> Result<(), DeclarationError> {
        if principal.can_access(organization_id) {
            Ok(())
        } else {
            Err(DeclarationError::Forbidden(
                "declaration belongs to another organization".to_string(),
            ))
        }
    }

    /// Latest declaration, if any.
    ///
    /// # Errors
    ///
    /// Fails on foreign organizations and store errors.
    pub async fn current(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> Result<Option<Declaration>, DeclarationError> {
        Self::authorize(principal, organization_id)?;
        Ok(self
            .declarations
            .latest(organization_id, self.period.year)
            .await?)
    }

    /// All declarations of the period, newest first.
    ///
    /// # Errors
    ///
    /// Fails on foreign organizations and store errors.
    pub async fn history(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> Result<Vec<Declaration>, DeclarationError> {
        Self::authorize(principal, organization_id)?;
        Ok(self
            .declarations
            .history(organization_id, self.period.year)
            .await?)
    }

    /// Lock state for an entry-editing surface.
    ///
    /// # Errors
    ///
    /// Fails on foreign organizations and store errors.
    pub async fn lock_state(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
        now: DateTime<Utc>,
        rectify_ack: bool,
    ) -> Result<LockState, DeclarationError> {
        Self::authorize(principal, organization_id)?;
        let status =
            persisted_status(self.declarations.as_ref(), organization_id, &self.period).await?;
        Ok(LockGuard::evaluate(
            status.unwrap_or_default(),
            now,
            self.period.deadline,
            rectify_ack,
        ))
    }

    /// Submits the organization's figures.
    ///
    /// Uses `responsible` when given, otherwise the stored responsible data.
    ///
    /// # Errors
    ///
    /// * `DeadlinePassed` after the deadline
    /// * `InvalidTransition` if the latest declaration is already submitted
    /// * `Validation` if responsible data is missing or incomplete
    pub async fn submit(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
        responsible: Option<ResponsibleData>,
        now: DateTime<Utc>,
    ) -> Result<Declaration, DeclarationError> {
        Self::authorize(principal, organization_id)?;

        let previous = self
            .declarations
            .latest(organization_id, self.period.year)
            .await?;
        DeclarationLifecycle::submit(previous.as_ref().map(|d| d.status), &self.period, now)?;

        let responsible = match responsible {
            Some(data) => data,
            None => self
                .responsible
                .find(organization_id)
                .await?
                .ok_or_else(|| {
                    DeclarationError::Validation("responsible persons are required".to_string())
                })?,
        };
        responsible.validate()?;

        let expenses = self.entries.load_expenses(organization_id).await?;
        let revenues = self.entries.load_revenues(organization_id).await?;
        let snapshot = serde_json::to_value(Snapshot {
            expenses: &expenses,
            revenues: &revenues,
        })
        .map_err(|e| StoreError::corrupt(e.to_string()))?;

        let declaration = Declaration {
            id: DeclarationId::new(),
            organization_id,
            period_year: self.period.year,
            status: DeclarationStatus::Submitted,
            receipt_number: receipt_number(now),
            is_rectification: previous.is_some(),
            rectification_count: previous.as_ref().map_or(0, |p| p.rectification_count + 1),
            totals: compute_totals(&expenses, &revenues),
            snapshot,
            responsible: Some(responsible),
            submitted_by: principal.user_id,
            submitted_at: now,
        };
        self.declarations.insert(&declaration).await?;

        info!(
            org_id = %organization_id,
            receipt = %declaration.receipt_number,
            rectification_count = declaration.rectification_count,
            "declaration submitted"
        );
        Ok(declaration)
    }

    /// Reopens a submitted declaration for editing.
    ///
    /// The draft status is persisted before the unlocked state is returned;
    /// if the store fails, the declaration stays locked. Rectifying a draft
    /// or absent declaration succeeds without writing.
    ///
    /// # Errors
    ///
    /// `DeadlinePassed` after the deadline, store errors.
    pub async fn rectify(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
        now: DateTime<Utc>,
    ) -> Result<LockState, DeclarationError> {
        Self::authorize(principal, organization_id)?;

        let latest = self
            .declarations
            .latest(organization_id, self.period.year)
            .await?;
        let transition =
            DeclarationLifecycle::rectify(latest.as_ref().map(|d| d.status), &self.period, now)?;

        if let (Transition::To(status), Some(declaration)) = (transition, latest.as_ref()) {
            self.declarations
                .set_status(declaration.id, status)
                .await
                .inspect_err(|e| {
                    warn!(org_id = %organization_id, error = %e, "rectification not persisted");
                })?;
            info!(org_id = %organization_id, declaration_id = %declaration.id, "declaration reopened");
        }

        Ok(LockGuard::evaluate(
            DeclarationStatus::Draft,
            now,
            self.period.deadline,
            true,
        ))
    }

    /// Stored responsible persons.
    ///
    /// # Errors
    ///
    /// Fails on foreign organizations and store errors.
    pub async fn responsible(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> Result<Option<ResponsibleData>, DeclarationError> {
        Self::authorize(principal, organization_id)?;
        Ok(self.responsible.find(organization_id).await?)
    }

    /// Replaces the stored responsible persons.
    ///
    /// The change is recorded in the organization activity log; a failure
    /// to record it is logged and does not fail the save.
    ///
    /// # Errors
    ///
    /// Fails on foreign organizations, incomplete data and store errors.
    pub async fn save_responsible(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
        data: &ResponsibleData,
        now: DateTime<Utc>,
    ) -> Result<(), DeclarationError> {
        Self::authorize(principal, organization_id)?;
        data.validate()?;
        self.responsible.upsert(organization_id, data).await?;

        let entry = OrganizationActivity::new(
            organization_id,
            ActivityKind::ResponsibleUpdated,
            principal.user_id,
            now,
            serde_json::json!({
                "unit_responsible_name": data.unit_responsible_name,
                "data_responsible_name": data.data_responsible_name,
            }),
        );
        if let Err(e) = self.activity.append_activity(&entry).await {
            warn!(org_id = %organization_id, error = %e, "responsible update not logged");
        }
        info!(org_id = %organization_id, "responsible persons saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entries::ExpenseAmounts;
    use crate::testing::{MemoryStore, principal_for, responsible_fixture};
    use chrono::Duration;
    use declara_shared::types::OrganizationKind;
    use rust_decimal_macros::dec;

    type Service = DeclarationService<MemoryStore, MemoryStore, MemoryStore, MemoryStore>;

    fn service(store: &Arc<MemoryStore>, deadline: DateTime<Utc>) -> Service {
        DeclarationService::new(
            Arc::clone(store),
            Arc::clone(store),
            Arc::clone(store),
            Arc::clone(store),
            ReportingPeriod::new(2025, deadline),
        )
    }

    #[test]
    fn test_compute_totals() {
        let mut expenses = ExpenseValues::new();
        expenses.insert("1.1.1.1".into(), ExpenseAmounts::new(dec!(1000), dec!(100)).unwrap());
        expenses.insert("1.1.1.2".into(), ExpenseAmounts::new(dec!(500), dec!(500)).unwrap());
        let mut revenues = RevenueValues::new();
        revenues.insert("1.1.1".into(), dec!(7000));

        let totals = compute_totals(&expenses, &revenues);
        assert_eq!(totals.total_expense, dec!(1500));
        assert_eq!(totals.total_finalistica, dec!(600));
        assert_eq!(totals.total_apoio, dec!(900));
        assert_eq!(totals.total_revenue, dec!(7000));
    }

    #[test]
    fn test_receipt_number_format() {
        let now = Utc::now();
        let receipt = receipt_number(now);
        let (year, sequence) = receipt.split_once('.').unwrap();
        assert_eq!(year, now.year().to_string());
        assert_eq!(sequence.len(), 6);
        assert!(sequence.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_submit_then_resubmit_is_rejected() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let svc = service(&store, now + Duration::days(10));
        let user = principal_for(OrganizationKind::Cra);

        let first = svc
            .submit(&user, user.organization_id, Some(responsible_fixture()), now)
            .await
            .unwrap();
        assert_eq!(first.status, DeclarationStatus::Submitted);
        assert!(!first.is_rectification);
        assert_eq!(first.rectification_count, 0);

        let err = svc
            .submit(&user, user.organization_id, Some(responsible_fixture()), now)
            .await
            .unwrap_err();
        assert!(matches!(err, DeclarationError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn test_rectify_then_resubmit_counts_rectifications() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let svc = service(&store, now + Duration::days(10));
        let user = principal_for(OrganizationKind::Cra);
        let org = user.organization_id;

        svc.submit(&user, org, Some(responsible_fixture()), now)
            .await
            .unwrap();
        assert_eq!(
            svc.lock_state(&user, org, now, false).await.unwrap(),
            LockState::Submitted
        );

        assert_eq!(svc.rectify(&user, org, now).await.unwrap(), LockState::Open);
        assert_eq!(
            svc.lock_state(&user, org, now, false).await.unwrap(),
            LockState::Open
        );

        let second = svc
            .submit(&user, org, Some(responsible_fixture()), now)
            .await
            .unwrap();
        assert!(second.is_rectification);
        assert_eq!(second.rectification_count, 1);
        assert_eq!(svc.history(&user, org).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_submit_snapshots_totals() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let svc = service(&store, now + Duration::days(10));
        let user = principal_for(OrganizationKind::Cra);
        let org = user.organization_id;
        store.put_expense(org, "1.1.1.1", dec!(1000), dec!(100));
        store.put_revenue(org, "1.1.1", dec!(5000));

        let declaration = svc
            .submit(&user, org, Some(responsible_fixture()), now)
            .await
            .unwrap();
        assert_eq!(declaration.totals.total_expense, dec!(1000));
        assert_eq!(declaration.totals.total_apoio, dec!(900));
        assert_eq!(declaration.totals.total_revenue, dec!(5000));
        assert!(declaration.snapshot["expenses"]["1.1.1.1"].is_object());
    }

    #[tokio::test]
    async fn test_submit_uses_stored_responsible_data() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let svc = service(&store, now + Duration::days(10));
        let user = principal_for(OrganizationKind::Cra);
        let org = user.organization_id;

        let err = svc.submit(&user, org, None, now).await.unwrap_err();
        assert!(matches!(err, DeclarationError::Validation(_)));

        svc.save_responsible(&user, org, &responsible_fixture(), now)
            .await
            .unwrap();
        let declaration = svc.submit(&user, org, None, now).await.unwrap();
        assert_eq!(declaration.responsible, Some(responsible_fixture()));

        let activity = store.list_activity(org).await.unwrap();
        assert_eq!(activity.len(), 1);
        assert_eq!(activity[0].kind, ActivityKind::ResponsibleUpdated);
        assert_eq!(activity[0].performed_by, user.user_id);
        assert_eq!(activity[0].details["unit_responsible_name"], "Ana Presidente");
    }

    #[tokio::test]
    async fn test_rectify_without_declaration_is_noop() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let svc = service(&store, now + Duration::days(10));
        let user = principal_for(OrganizationKind::Cra);

        let state = svc.rectify(&user, user.organization_id, now).await.unwrap();
        assert_eq!(state, LockState::Open);
        assert!(svc.current(&user, user.organization_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rectify_failure_keeps_lock() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let svc = service(&store, now + Duration::days(10));
        let user = principal_for(OrganizationKind::Cra);
        let org = user.organization_id;
        svc.submit(&user, org, Some(responsible_fixture()), now)
            .await
            .unwrap();

        store.fail_declaration_writes(true);
        let err = svc.rectify(&user, org, now).await.unwrap_err();
        assert!(matches!(err, DeclarationError::Store(_)));

        store.fail_declaration_writes(false);
        assert_eq!(
            svc.lock_state(&user, org, now, false).await.unwrap(),
            LockState::Submitted
        );
    }

    #[tokio::test]
    async fn test_deadline_closes_submission_and_rectification() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let user = principal_for(OrganizationKind::Cra);
        let org = user.organization_id;
        service(&store, now + Duration::days(1))
            .submit(&user, org, Some(responsible_fixture()), now)
            .await
            .unwrap();

        let closed = service(&store, now - Duration::seconds(1));
        assert!(matches!(
            closed.rectify(&user, org, now).await,
            Err(DeclarationError::DeadlinePassed { year: 2025 })
        ));
        assert_eq!(
            closed.lock_state(&user, org, now, true).await.unwrap(),
            LockState::Closed
        );
    }

    #[tokio::test]
    async fn test_foreign_organization_is_forbidden() {
        let store = Arc::new(MemoryStore::new());
        let now = Utc::now();
        let svc = service(&store, now + Duration::days(1));
        let user = principal_for(OrganizationKind::Cra);

        let err = svc
            .submit(&user, OrganizationId::new(), Some(responsible_fixture()), now)
            .await
            .unwrap_err();
        assert!(matches!(err, DeclarationError::Forbidden(_)));
    }
}
