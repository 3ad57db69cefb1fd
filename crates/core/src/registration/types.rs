//! Registration request types.

use chrono::{DateTime, Utc};
use declara_shared::types::{OrganizationId, RegistrationRequestId};
use serde::{Deserialize, Serialize};

use super::error::RegistrationError;

/// Review status of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Approved; a profile exists.
    Approved,
    /// Rejected with a reason.
    Rejected,
}

impl RegistrationStatus {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses the stored representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// A stored registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// Request ID.
    pub id: RegistrationRequestId,
    /// Applicant's full name.
    pub full_name: String,
    /// CPF, digits only.
    pub cpf: String,
    /// Lowercased e-mail.
    pub email: String,
    /// Organization the applicant will report for.
    pub requested_organization_id: OrganizationId,
    /// Review status.
    pub status: RegistrationStatus,
    /// Reason given on rejection.
    pub rejection_reason: Option<String>,
    /// Submission timestamp.
    pub created_at: DateTime<Utc>,
    /// Review timestamp.
    pub reviewed_at: Option<DateTime<Utc>>,
}

/// Raw form input for a new request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRegistration {
    /// Applicant's full name.
    pub full_name: String,
    /// CPF in any punctuation.
    pub cpf: String,
    /// E-mail in any case.
    pub email: String,
    /// Requested organization.
    pub requested_organization_id: OrganizationId,
}

/// Strips everything but digits from a CPF.
#[must_use]
pub fn normalize_cpf(cpf: &str) -> String {
    cpf.chars().filter(char::is_ascii_digit).collect()
}

impl NewRegistration {
    /// Normalizes and checks the form, producing a pending request.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::Validation` for missing fields, a CPF
    /// that is not 11 digits or an e-mail without `@`.
    pub fn into_request(self, now: DateTime<Utc>) -> Result<RegistrationRequest, RegistrationError> {
        let full_name = self.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(RegistrationError::validation("full name is required"));
        }
        let cpf = normalize_cpf(&self.cpf);
        if cpf.len() != 11 {
            return Err(RegistrationError::validation("CPF must have 11 digits"));
        }
        let email = self.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(RegistrationError::validation("a valid e-mail is required"));
        }

        Ok(RegistrationRequest {
            id: RegistrationRequestId::new(),
            full_name,
            cpf,
            email,
            requested_organization_id: self.requested_organization_id,
            status: RegistrationStatus::Pending,
            rejection_reason: None,
            created_at: now,
            reviewed_at: None,
        })
    }
}
