//! Declaration domain types.

use std::fmt;

use chrono::{DateTime, Utc};
use declara_shared::ReportingPeriodConfig;
use declara_shared::types::{DeclarationId, OrganizationId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::responsible::ResponsibleData;

/// Status of an organization's declaration for one period.
///
/// An organization without a stored declaration is in `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationStatus {
    /// Entries are editable.
    #[default]
    Draft,
    /// Sent; entries are read-only until rectified.
    Submitted,
}

impl DeclarationStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "submitted" => Some(Self::Submitted),
            _ => None,
        }
    }
}

impl fmt::Display for DeclarationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reporting cycle and its hard cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    /// Reference year of the declared figures.
    pub year: i32,
    /// No submission, rectification or entry write is possible after this instant.
    pub deadline: DateTime<Utc>,
}

impl ReportingPeriod {
    /// Creates a period.
    #[must_use]
    pub fn new(year: i32, deadline: DateTime<Utc>) -> Self {
        Self { year, deadline }
    }

    /// Returns true once `now` is past the deadline.
    #[must_use]
    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        now > self.deadline
    }
}

impl From<&ReportingPeriodConfig> for ReportingPeriod {
    fn from(config: &ReportingPeriodConfig) -> Self {
        Self {
            year: config.year,
            deadline: config.deadline.with_timezone(&Utc),
        }
    }
}

/// Totals computed at submission time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationTotals {
    /// Sum of revenue values.
    pub total_revenue: Decimal,
    /// Sum of expense totals.
    pub total_expense: Decimal,
    /// Sum of expense finalística shares.
    pub total_finalistica: Decimal,
    /// Sum of expense apoio shares.
    pub total_apoio: Decimal,
}

/// A stored declaration record.
///
/// Each submission inserts a new record; the latest one carries the current
/// status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    /// Declaration ID.
    pub id: DeclarationId,
    /// Declaring organization.
    pub organization_id: OrganizationId,
    /// Reference year.
    pub period_year: i32,
    /// Current status.
    pub status: DeclarationStatus,
    /// Receipt number `YYYY.NNNNNN`.
    pub receipt_number: String,
    /// True when an earlier declaration exists for the period.
    pub is_rectification: bool,
    /// Number of earlier declarations for the period.
    pub rectification_count: i32,
    /// Totals at submission.
    pub totals: DeclarationTotals,
    /// Entry values at submission.
    pub snapshot: serde_json::Value,
    /// Responsible persons at submission.
    pub responsible: Option<ResponsibleData>,
    /// Who submitted.
    pub submitted_by: UserId,
    /// When.
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_status_parse_and_default() {
        assert_eq!(DeclarationStatus::default(), DeclarationStatus::Draft);
        assert_eq!(
            DeclarationStatus::parse("SUBMITTED"),
            Some(DeclarationStatus::Submitted)
        );
        assert_eq!(DeclarationStatus::parse("pending"), None);
    }

    #[test]
    fn test_period_closes_strictly_after_deadline() {
        let deadline = Utc.with_ymd_and_hms(2026, 4, 1, 2, 59, 59).unwrap();
        let period = ReportingPeriod::new(2025, deadline);
        assert!(!period.is_closed(deadline));
        assert!(period.is_closed(deadline + chrono::Duration::seconds(1)));
    }

    #[test]
    fn test_period_from_config() {
        let config = declara_shared::ReportingConfig::default();
        let period = ReportingPeriod::from(config.active_period().unwrap());
        assert_eq!(period.year, 2025);
        assert_eq!(
            period.deadline,
            Utc.with_ymd_and_hms(2026, 4, 1, 2, 59, 59).unwrap()
        );
    }
}
