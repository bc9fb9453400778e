//! Identity types carried in bearer tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role assigned to a signed-in user by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Grant administrator. Can see everything and reopen submitted reports.
    Admin,
    /// Internal staff. Can see every organization's reports, read-only.
    Staff,
    /// Member of a grantee organization.
    OrgUser,
}

impl UserRole {
    /// Returns true if this role may see applications of every organization.
    #[must_use]
    pub const fn sees_all_organizations(self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }

    /// Returns true if this role may reopen a submitted report.
    #[must_use]
    pub const fn can_reopen_reports(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns the wire representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::OrgUser => "org_user",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "org_user" => Ok(Self::OrgUser),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Organization the user reports for. Absent for admin and staff accounts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org: Option<Uuid>,
    /// User's role.
    pub role: UserRole,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        org_id: Option<Uuid>,
        role: UserRole,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            org: org_id,
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the organization ID from claims.
    #[must_use]
    pub const fn organization_id(&self) -> Option<Uuid> {
        self.org
    }

    /// Returns true if the user may act on data owned by `org_id`.
    #[must_use]
    pub fn can_access_organization(&self, org_id: Uuid) -> bool {
        self.role.sees_all_organizations() || self.org == Some(org_id)
    }

    /// Returns true if the user may edit or submit reports owned by `org_id`.
    ///
    /// Staff accounts are read-only.
    #[must_use]
    pub fn can_edit_for_organization(&self, org_id: Uuid) -> bool {
        match self.role {
            UserRole::Admin => true,
            UserRole::Staff => false,
            UserRole::OrgUser => self.org == Some(org_id),
        }
    }
}
