//! User profiles.
//!
//! Credentials live with the external identity provider; this module only
//! keeps the profile that ties a user to an organization, a role and a
//! moderation status.

use std::future::Future;

use chrono::{DateTime, Utc};
use declara_shared::Principal;
use declara_shared::types::{OrganizationId, PageRequest, Role, UserId};
use serde::{Deserialize, Serialize};

use crate::audit::Actor;
use crate::store::StoreError;

/// Whether a user may sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Normal access.
    #[default]
    Active,
    /// Blocked by an administrator.
    Suspended,
}

impl UserStatus {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }

    /// Parses the stored representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }
}

/// A user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID, shared with the identity provider.
    pub id: UserId,
    /// Lowercased e-mail, unique.
    pub email: String,
    /// Full name.
    pub full_name: String,
    /// CPF digits, when known.
    pub cpf: Option<String>,
    /// Organization the user reports for.
    pub organization_id: OrganizationId,
    /// Role.
    pub role: Role,
    /// Moderation status.
    pub status: UserStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Repository trait for user profiles.
pub trait UserRepository: Send + Sync {
    /// Finds a profile by ID.
    fn find(&self, id: UserId)
    -> impl Future<Output = Result<Option<UserProfile>, StoreError>> + Send;

    /// Finds a profile by e-mail (case-insensitive).
    fn find_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<UserProfile>, StoreError>> + Send;

    /// One page of profiles ordered by name, with the total count.
    fn list(
        &self,
        page: &PageRequest,
    ) -> impl Future<Output = Result<(Vec<UserProfile>, u64), StoreError>> + Send;

    /// Inserts or replaces a profile by ID.
    fn upsert(&self, profile: &UserProfile) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Updates the status. Returns false when no such user exists.
    fn set_status(
        &self,
        id: UserId,
        status: UserStatus,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Deletes a profile by ID.
    fn delete(&self, id: UserId) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Deletes profiles with this e-mail. Returns how many were removed.
    fn delete_by_email(&self, email: &str)
    -> impl Future<Output = Result<u64, StoreError>> + Send;
}

/// Resolves the audit identity of an administrator.
pub(crate) async fn actor_for<U: UserRepository>(
    users: &U,
    principal: &Principal,
) -> Result<Actor, StoreError> {
    let email = users
        .find(principal.user_id)
        .await?
        .map_or_else(|| "unknown".to_string(), |p| p.email);
    Ok(Actor {
        id: principal.user_id,
        email,
    })
}
