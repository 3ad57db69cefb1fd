//! Test-data seeding.

use std::sync::Arc;

use rand::Rng;
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::types::{BatchItem, BatchOutcome, BatchReport};
use crate::catalog::Catalog;
use crate::entries::{EntryRepository, ExpenseAmounts};
use crate::organization::Organization;

/// Seeds entries for many organizations.
///
/// Writes go straight to the repository: seeding is an administrative tool
/// and does not consult declaration locks.
pub struct SeedService<E: EntryRepository> {
    entries: Arc<E>,
}

impl<E: EntryRepository> SeedService<E> {
    /// Create a new seed service.
    #[must_use]
    pub fn new(entries: Arc<E>) -> Self {
        Self { entries }
    }

    /// Fills every analytic account of every organization with random values.
    ///
    /// Expenses then revenues, one batch each per organization. A failed
    /// expense batch stops the job: the remaining organizations are reported
    /// as skipped and earlier ones stay written. A failed revenue batch only
    /// adds a warning.
    pub async fn seed_random<R>(&self, organizations: &[Organization], rng: &mut R) -> BatchReport
    where
        R: Rng + Send + ?Sized,
    {
        let mut report = BatchReport::default();
        let mut stopped = false;

        for org in organizations {
            if stopped {
                report.items.push(item(org, BatchOutcome::Skipped));
                continue;
            }

            let expenses = random_expenses(rng);
            if let Err(e) = self.entries.upsert_expenses(org.id, &expenses).await {
                warn!(org_id = %org.id, error = %e, "expense seeding failed, stopping");
                report.items.push(item(org, BatchOutcome::Failed(e.to_string())));
                stopped = true;
                continue;
            }

            let revenues = random_revenues(rng);
            if let Err(e) = self.entries.upsert_revenues(org.id, &revenues).await {
                warn!(org_id = %org.id, error = %e, "revenue seeding failed");
                report
                    .warnings
                    .push(format!("{}: revenues not seeded: {e}", org.name));
            }
            report.items.push(item(org, BatchOutcome::Succeeded));
        }

        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            skipped = report.skipped(),
            "random seed finished"
        );
        report
    }

    /// Writes the same expense entry for every regional council.
    ///
    /// Every organization is attempted regardless of earlier failures.
    pub async fn seed_fixed_expense(
        &self,
        organizations: &[Organization],
        account_id: &str,
        amounts: ExpenseAmounts,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        let row = [(account_id.to_string(), amounts)];

        for org in organizations.iter().filter(|o| !o.is_cfa()) {
            let outcome = match self.entries.upsert_expenses(org.id, &row).await {
                Ok(()) => BatchOutcome::Succeeded,
                Err(e) => {
                    warn!(org_id = %org.id, error = %e, "fixed expense not written");
                    BatchOutcome::Failed(e.to_string())
                }
            };
            report.items.push(item(org, outcome));
        }

        info!(
            account_id,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "fixed expense seed finished"
        );
        report
    }
}

fn item(org: &Organization, outcome: BatchOutcome) -> BatchItem {
    BatchItem {
        organization_id: org.id,
        organization_name: org.name.clone(),
        outcome,
    }
}

fn random_expenses<R: Rng + ?Sized>(rng: &mut R) -> Vec<(String, ExpenseAmounts)> {
    Catalog::expense()
        .analytic()
        .map(|account| {
            let total: i64 = rng.random_range(1_000..=50_000);
            let finalistica: i64 = rng.random_range(0..=total);
            (
                account.code.to_string(),
                ExpenseAmounts {
                    total: Decimal::from(total),
                    finalistica: Decimal::from(finalistica),
                },
            )
        })
        .collect()
}

fn random_revenues<R: Rng + ?Sized>(rng: &mut R) -> Vec<(String, Decimal)> {
    Catalog::revenue()
        .analytic()
        .map(|account| {
            let value: i64 = rng.random_range(5_000..=100_000);
            (account.code.to_string(), Decimal::from(value))
        })
        .collect()
}
