//! Moderation service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use declara_shared::Principal;
use declara_shared::types::{PageRequest, PageResponse, UserId};
use tracing::info;

use super::error::ModerationError;
use crate::audit::{ActionLogRepository, ActionType, UserActionLogEntry};
use crate::registration::RegistrationRepository;
use crate::user::{UserProfile, UserRepository, UserStatus, actor_for};

/// Administrator operations on user accounts.
///
/// Every state change is logged to the action log. Deleting a user keeps
/// the organization's entries.
pub struct ModerationService<U, A, R>
where
    U: UserRepository,
    A: ActionLogRepository,
    R: RegistrationRepository,
{
    users: Arc<U>,
    actions: Arc<A>,
    requests: Arc<R>,
    protected_email: String,
}

impl<U, A, R> ModerationService<U, A, R>
where
    U: UserRepository,
    A: ActionLogRepository,
    R: RegistrationRepository,
{
    /// Create a new moderation service. `protected_email` can never be deleted.
    #[must_use]
    pub fn new(
        users: Arc<U>,
        actions: Arc<A>,
        requests: Arc<R>,
        protected_email: impl Into<String>,
    ) -> Self {
        Self {
            users,
            actions,
            requests,
            protected_email: protected_email.into().to_lowercase(),
        }
    }

    fn authorize(principal: &Principal) -> Result<(), ModerationError> {
        if principal.is_admin() {
            Ok(())
        } else {
            Err(ModerationError::Forbidden(
                "moderation requires an administrator".to_string(),
            ))
        }
    }

    async fn target(&self, user_id: UserId) -> Result<UserProfile, ModerationError> {
        self.users
            .find(user_id)
            .await?
            .ok_or(ModerationError::NotFound)
    }

    /// One page of users.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admins.
    pub async fn list_users(
        &self,
        principal: &Principal,
        page: &PageRequest,
    ) -> Result<PageResponse<UserProfile>, ModerationError> {
        Self::authorize(principal)?;
        let (users, total) = self.users.list(page).await?;
        Ok(PageResponse::new(users, page, total))
    }

    /// Suspends or reactivates a user.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admins, `NotFound` for unknown users.
    pub async fn set_suspended(
        &self,
        principal: &Principal,
        user_id: UserId,
        suspend: bool,
        now: DateTime<Utc>,
    ) -> Result<UserProfile, ModerationError> {
        Self::authorize(principal)?;
        let mut target = self.target(user_id).await?;

        let (status, action) = if suspend {
            (UserStatus::Suspended, ActionType::Suspend)
        } else {
            (UserStatus::Active, ActionType::Reactivate)
        };
        if !self.users.set_status(user_id, status).await? {
            return Err(ModerationError::NotFound);
        }
        target.status = status;

        let actor = actor_for(self.users.as_ref(), principal).await?;
        let entry = UserActionLogEntry::new(
            action,
            Some(target.id),
            &target.email,
            &target.full_name,
            &actor,
            now,
        );
        self.actions.append(&entry).await?;

        info!(user_id = %user_id, status = status.as_str(), "user status changed");
        Ok(target)
    }

    /// Deletes a user profile.
    ///
    /// The caller must repeat the target's e-mail as confirmation. The log
    /// entry is written before the profile disappears, and registration
    /// requests for the e-mail are removed so it can register again.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admins and for the protected account,
    /// `ConfirmationMismatch` when the e-mail is not repeated exactly.
    pub async fn delete_user(
        &self,
        principal: &Principal,
        user_id: UserId,
        confirmation: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ModerationError> {
        Self::authorize(principal)?;
        let target = self.target(user_id).await?;

        if target.email.eq_ignore_ascii_case(&self.protected_email) {
            return Err(ModerationError::Forbidden(format!(
                "{} cannot be deleted",
                target.email
            )));
        }
        if !confirmation.trim().eq_ignore_ascii_case(&target.email) {
            return Err(ModerationError::ConfirmationMismatch);
        }

        let actor = actor_for(self.users.as_ref(), principal).await?;
        let entry = UserActionLogEntry::new(
            ActionType::Delete,
            Some(target.id),
            &target.email,
            &target.full_name,
            &actor,
            now,
        );
        self.actions.append(&entry).await?;

        self.requests.delete_by_email(&target.email).await?;
        self.users.delete(user_id).await?;

        info!(user_id = %user_id, "user deleted");
        Ok(())
    }

    /// One page of the action log, newest first.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admins.
    pub async fn list_actions(
        &self,
        principal: &Principal,
        page: &PageRequest,
    ) -> Result<PageResponse<UserActionLogEntry>, ModerationError> {
        Self::authorize(principal)?;
        let (entries, total) = self.actions.list(page).await?;
        Ok(PageResponse::new(entries, page, total))
    }
}
