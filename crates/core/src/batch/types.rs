//! Batch report types.

use declara_shared::types::OrganizationId;
use serde::Serialize;

/// Result of one organization's step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum BatchOutcome {
    /// Written.
    Succeeded,
    /// The write failed.
    Failed(String),
    /// Not attempted because the job stopped earlier.
    Skipped,
}

/// One organization's line in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchItem {
    /// Organization ID.
    pub organization_id: OrganizationId,
    /// Organization name.
    pub organization_name: String,
    /// What happened.
    pub outcome: BatchOutcome,
}

/// Outcome of a whole job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Per-organization results in processing order.
    pub items: Vec<BatchItem>,
    /// Non-fatal problems.
    pub warnings: Vec<String>,
}

impl BatchReport {
    /// Number of succeeded items.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Succeeded))
    }

    /// Number of failed items.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Failed(_)))
    }

    /// Number of skipped items.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Skipped))
    }

    fn count(&self, f: impl Fn(&BatchOutcome) -> bool) -> usize {
        self.items.iter().filter(|i| f(&i.outcome)).count()
    }
}
