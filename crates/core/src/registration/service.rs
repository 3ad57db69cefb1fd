//! Registration submission and review.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use declara_shared::Principal;
use declara_shared::types::{RegistrationRequestId, Role, UserId};
use tracing::{info, warn};

use super::error::RegistrationError;
use super::types::{NewRegistration, RegistrationRequest, RegistrationStatus};
use crate::audit::{ActionLogRepository, ActionType, UserActionLogEntry};
use crate::organization::OrganizationRepository;
use crate::store::StoreError;
use crate::user::{UserProfile, UserRepository, UserStatus, actor_for};

/// Reason recorded when an administrator rejects without one.
pub const DEFAULT_REJECTION_REASON: &str = "Não especificado";

/// Repository trait for registration requests.
pub trait RegistrationRepository: Send + Sync {
    /// Inserts a new request.
    fn insert(
        &self,
        request: &RegistrationRequest,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Finds a request by ID.
    fn find(
        &self,
        id: RegistrationRequestId,
    ) -> impl Future<Output = Result<Option<RegistrationRequest>, StoreError>> + Send;

    /// Requests, newest first, optionally filtered by status.
    fn list(
        &self,
        status: Option<RegistrationStatus>,
    ) -> impl Future<Output = Result<Vec<RegistrationRequest>, StoreError>> + Send;

    /// Deletes requests with this e-mail.
    fn delete_by_email(&self, email: &str)
    -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Deletes requests with this CPF.
    fn delete_by_cpf(&self, cpf: &str) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Deletes requests sharing the e-mail or CPF, except `keep`.
    fn delete_other_by_identity(
        &self,
        keep: RegistrationRequestId,
        email: &str,
        cpf: &str,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// Records a review. Returns false unless the request was still pending.
    fn set_status(
        &self,
        id: RegistrationRequestId,
        status: RegistrationStatus,
        rejection_reason: Option<&str>,
        reviewed_at: DateTime<Utc>,
    ) -> impl Future<Output = Result<bool, StoreError>> + Send;
}

/// Registration workflow.
pub struct RegistrationService<R, U, A, O>
where
    R: RegistrationRepository,
    U: UserRepository,
    A: ActionLogRepository,
    O: OrganizationRepository,
{
    requests: Arc<R>,
    users: Arc<U>,
    actions: Arc<A>,
    organizations: Arc<O>,
}

impl<R, U, A, O> RegistrationService<R, U, A, O>
where
    R: RegistrationRepository,
    U: UserRepository,
    A: ActionLogRepository,
    O: OrganizationRepository,
{
    /// Create a new registration service.
    #[must_use]
    pub fn new(requests: Arc<R>, users: Arc<U>, actions: Arc<A>, organizations: Arc<O>) -> Self {
        Self {
            requests,
            users,
            actions,
            organizations,
        }
    }

    fn authorize(principal: &Principal) -> Result<(), RegistrationError> {
        if principal.is_admin() {
            Ok(())
        } else {
            Err(RegistrationError::Forbidden)
        }
    }

    /// Files a request. Any earlier request with the same e-mail or CPF is
    /// discarded, so the latest submission wins.
    ///
    /// # Errors
    ///
    /// `Validation` for malformed forms or unknown organizations.
    pub async fn submit(
        &self,
        form: NewRegistration,
        now: DateTime<Utc>,
    ) -> Result<RegistrationRequest, RegistrationError> {
        let request = form.into_request(now)?;
        if self
            .organizations
            .find(request.requested_organization_id)
            .await?
            .is_none()
        {
            return Err(RegistrationError::validation("unknown organization"));
        }

        self.requests.delete_by_email(&request.email).await?;
        self.requests.delete_by_cpf(&request.cpf).await?;
        self.requests.insert(&request).await?;

        info!(request_id = %request.id, org_id = %request.requested_organization_id, "registration submitted");
        Ok(request)
    }

    /// Pending or all requests, newest first.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admins.
    pub async fn list(
        &self,
        principal: &Principal,
        status: Option<RegistrationStatus>,
    ) -> Result<Vec<RegistrationRequest>, RegistrationError> {
        Self::authorize(principal)?;
        Ok(self.requests.list(status).await?)
    }

    /// Approves a pending request and creates the user's profile.
    ///
    /// A stale profile with the same e-mail is replaced, and other requests
    /// sharing the e-mail or CPF are removed.
    ///
    /// # Errors
    ///
    /// `NotFound` when the request is absent or already reviewed.
    pub async fn approve(
        &self,
        principal: &Principal,
        request_id: RegistrationRequestId,
        now: DateTime<Utc>,
    ) -> Result<UserProfile, RegistrationError> {
        Self::authorize(principal)?;
        let request = self
            .requests
            .find(request_id)
            .await?
            .filter(|r| r.status == RegistrationStatus::Pending)
            .ok_or(RegistrationError::NotFound)?;

        let stale = self.users.delete_by_email(&request.email).await?;
        if stale > 0 {
            warn!(email = %request.email, "replaced stale user profile");
        }
        self.requests
            .delete_other_by_identity(request.id, &request.email, &request.cpf)
            .await?;

        let profile = UserProfile {
            id: UserId::new(),
            email: request.email.clone(),
            full_name: request.full_name.clone(),
            cpf: Some(request.cpf.clone()),
            organization_id: request.requested_organization_id,
            role: Role::User,
            status: UserStatus::Active,
            created_at: now,
        };
        self.users.upsert(&profile).await?;
        self.requests
            .set_status(request.id, RegistrationStatus::Approved, None, now)
            .await?;

        let actor = actor_for(self.users.as_ref(), principal).await?;
        let entry = UserActionLogEntry::new(
            ActionType::Approve,
            Some(profile.id),
            &profile.email,
            &profile.full_name,
            &actor,
            now,
        )
        .with_details(serde_json::json!({
            "organization_id": profile.organization_id,
            "request_id": request.id,
        }));
        self.actions.append(&entry).await?;

        info!(request_id = %request.id, user_id = %profile.id, "registration approved");
        Ok(profile)
    }

    /// Rejects a pending request.
    ///
    /// Absent or already reviewed requests are left alone and reported as
    /// success.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-admins, `Store` on write failures.
    pub async fn reject(
        &self,
        principal: &Principal,
        request_id: RegistrationRequestId,
        reason: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<(), RegistrationError> {
        Self::authorize(principal)?;
        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REJECTION_REASON);

        let Some(request) = self.requests.find(request_id).await? else {
            return Ok(());
        };
        let rejected = self
            .requests
            .set_status(request_id, RegistrationStatus::Rejected, Some(reason), now)
            .await?;
        if !rejected {
            return Ok(());
        }

        let actor = actor_for(self.users.as_ref(), principal).await?;
        let entry = UserActionLogEntry::new(
            ActionType::Reject,
            None,
            &request.email,
            &request.full_name,
            &actor,
            now,
        )
        .with_details(serde_json::json!({ "reason": reason }));
        self.actions.append(&entry).await?;

        info!(request_id = %request_id, "registration rejected");
        Ok(())
    }
}
