//! Session claims and the authenticated principal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{OrganizationId, OrganizationKind, Role, UserId};

/// JWT claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Organization the user belongs to.
    pub org: Uuid,
    /// Kind of that organization.
    pub org_type: OrganizationKind,
    /// User's role.
    pub role: Role,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a principal.
    #[must_use]
    pub fn new(principal: &Principal, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: principal.user_id.into_inner(),
            org: principal.organization_id.into_inner(),
            org_type: principal.organization_type,
            role: principal.role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the principal described by these claims.
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: UserId::from_uuid(self.sub),
            organization_id: OrganizationId::from_uuid(self.org),
            organization_type: self.org_type,
            role: self.role,
        }
    }
}

/// The identity a request acts on behalf of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// User ID.
    pub user_id: UserId,
    /// Organization of the user.
    pub organization_id: OrganizationId,
    /// Kind of that organization.
    pub organization_type: OrganizationKind,
    /// User's role.
    pub role: Role,
}

impl Principal {
    /// Returns true for administrators.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns true for members of the national council.
    #[must_use]
    pub fn is_cfa(&self) -> bool {
        self.organization_type == OrganizationKind::Cfa
    }

    /// Cross-organization reads are reserved to the national council and admins.
    #[must_use]
    pub fn can_view_consolidated(&self) -> bool {
        self.is_cfa() || self.is_admin()
    }

    /// Whether this principal may read or write the given organization's entries.
    #[must_use]
    pub fn can_access(&self, organization_id: OrganizationId) -> bool {
        self.organization_id == organization_id || self.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(kind: OrganizationKind, role: Role) -> Principal {
        Principal {
            user_id: UserId::new(),
            organization_id: OrganizationId::new(),
            organization_type: kind,
            role,
        }
    }

    #[test]
    fn test_claims_round_trip_principal() {
        let p = principal(OrganizationKind::Cra, Role::User);
        let now = Utc::now();
        let claims = Claims::new(&p, now, now + chrono::Duration::hours(1));
        assert_eq!(claims.principal(), p);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_consolidated_access() {
        assert!(principal(OrganizationKind::Cfa, Role::User).can_view_consolidated());
        assert!(principal(OrganizationKind::Cra, Role::Admin).can_view_consolidated());
        assert!(!principal(OrganizationKind::Cra, Role::User).can_view_consolidated());
    }

    #[test]
    fn test_can_access_own_organization_only() {
        let p = principal(OrganizationKind::Cra, Role::User);
        assert!(p.can_access(p.organization_id));
        assert!(!p.can_access(OrganizationId::new()));

        let admin = principal(OrganizationKind::Cfa, Role::Admin);
        assert!(admin.can_access(OrganizationId::new()));
    }
}
