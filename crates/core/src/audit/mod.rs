//! Append-only audit logs.
//!
//! Moderation actions on user accounts live here; actions on an
//! organization's declaration data live in `activity`.

use std::future::Future;

use chrono::{DateTime, Utc};
use declara_shared::types::{ActionLogId, PageRequest, UserId};
use serde::{Deserialize, Serialize};

use crate::store::StoreError;

mod activity;

pub use activity::{ActivityKind, ActivityLogRepository, OrganizationActivity};

/// Kind of moderation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    /// A registration request was approved.
    Approve,
    /// A registration request was rejected.
    Reject,
    /// A user was suspended.
    Suspend,
    /// A suspended user was reactivated.
    Reactivate,
    /// A user was deleted.
    Delete,
}

impl ActionType {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Suspend => "suspend",
            Self::Reactivate => "reactivate",
            Self::Delete => "delete",
        }
    }

    /// Parses the stored representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            "suspend" => Some(Self::Suspend),
            "reactivate" => Some(Self::Reactivate),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// The administrator performing an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Administrator ID.
    pub id: UserId,
    /// Administrator e-mail, `unknown` when no profile exists.
    pub email: String,
}

/// One log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActionLogEntry {
    /// Entry ID.
    pub id: ActionLogId,
    /// What was done.
    pub action_type: ActionType,
    /// Affected user, absent for rejected requests.
    pub target_user_id: Option<UserId>,
    /// Affected e-mail.
    pub target_user_email: String,
    /// Affected name.
    pub target_user_name: String,
    /// Administrator ID.
    pub performed_by_id: UserId,
    /// Administrator e-mail.
    pub performed_by_email: String,
    /// When.
    pub timestamp: DateTime<Utc>,
    /// Free-form details.
    pub details: serde_json::Value,
}

impl UserActionLogEntry {
    /// Builds an entry stamped `now`.
    #[must_use]
    pub fn new(
        action_type: ActionType,
        target_user_id: Option<UserId>,
        target_user_email: impl Into<String>,
        target_user_name: impl Into<String>,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActionLogId::new(),
            action_type,
            target_user_id,
            target_user_email: target_user_email.into(),
            target_user_name: target_user_name.into(),
            performed_by_id: actor.id,
            performed_by_email: actor.email.clone(),
            timestamp: now,
            details: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    /// Replaces the details.
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }
}

/// Repository trait for the action log. Entries are never updated or deleted.
pub trait ActionLogRepository: Send + Sync {
    /// Appends an entry.
    fn append(
        &self,
        entry: &UserActionLogEntry,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// One page of entries, newest first, with the total count.
    fn list(
        &self,
        page: &PageRequest,
    ) -> impl Future<Output = Result<(Vec<UserActionLogEntry>, u64), StoreError>> + Send;
}
