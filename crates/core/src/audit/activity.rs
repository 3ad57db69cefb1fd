//! Per-organization log of notable actions on declaration data.

use std::future::Future;

use chrono::{DateTime, Utc};
use declara_shared::types::{ActivityId, OrganizationId, UserId};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

/// Kind of organization activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// The responsible persons were replaced.
    ResponsibleUpdated,
    /// A printable report was produced.
    ReportPrinted,
    /// Entries were rolled back to an earlier date.
    SnapshotRestored,
}

impl ActivityKind {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResponsibleUpdated => "responsible_updated",
            Self::ReportPrinted => "report_printed",
            Self::SnapshotRestored => "snapshot_restored",
        }
    }

    /// Parses the stored representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "responsible_updated" => Some(Self::ResponsibleUpdated),
            "report_printed" => Some(Self::ReportPrinted),
            "snapshot_restored" => Some(Self::SnapshotRestored),
            _ => None,
        }
    }
}

/// One activity entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationActivity {
    /// Entry ID.
    pub id: ActivityId,
    /// Organization the action concerned.
    pub organization_id: OrganizationId,
    /// What was done.
    pub kind: ActivityKind,
    /// Who did it.
    pub performed_by: UserId,
    /// When.
    pub timestamp: DateTime<Utc>,
    /// Free-form details.
    pub details: serde_json::Value,
}

impl OrganizationActivity {
    /// Builds an entry stamped `now`.
    #[must_use]
    pub fn new(
        organization_id: OrganizationId,
        kind: ActivityKind,
        performed_by: UserId,
        now: DateTime<Utc>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            id: ActivityId::new(),
            organization_id,
            kind,
            performed_by,
            timestamp: now,
            details,
        }
    }
}

/// Repository trait for the activity log. Entries are never updated or deleted.
pub trait ActivityLogRepository: Send + Sync {
    /// Appends an entry.
    fn append_activity(
        &self,
        entry: &OrganizationActivity,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Entries of one organization, newest first.
    fn list_activity(
        &self,
        organization_id: OrganizationId,
    ) -> impl Future<Output = Result<Vec<OrganizationActivity>, StoreError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            ActivityKind::ResponsibleUpdated,
            ActivityKind::ReportPrinted,
            ActivityKind::SnapshotRestored,
        ] {
            assert_eq!(ActivityKind::parse(kind.as_str()), Some(kind));
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::json!(kind.as_str())
            );
        }
        assert_eq!(ActivityKind::parse("printed"), None);
    }
}
