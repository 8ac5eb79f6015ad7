//! Authentication types for admin login and JWT claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Roles carried in access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AdminRole {
    /// App user signed in through the user login. No dashboard access.
    Member,
    /// Regular operator.
    Admin,
    /// Operator with full access, including settings.
    SuperAdmin,
}

impl AdminRole {
    /// Operators of either level may use the dashboard.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    /// Returns true for the elevated role.
    #[must_use]
    pub const fn is_super_admin(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Wire name used inside tokens.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::SuperAdmin => "super-admin",
        }
    }
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims for admin access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (operator email).
    pub sub: String,
    /// Operator role.
    pub role: AdminRole,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an operator.
    #[must_use]
    pub fn new(subject: &str, role: AdminRole, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: subject.to_string(),
            role,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the operator email from claims.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.sub
    }
}

/// Login request payload, shared by admin and user login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    /// Email.
    pub email: String,
    /// Password.
    pub password: String,
}

/// Operator profile cached by the dashboard client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    /// Stable operator id.
    pub id: String,
    /// Email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: AdminRole,
    /// Time of this login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

/// Admin login response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    /// Always true on a 200 response.
    pub success: bool,
    /// Bearer token for subsequent calls.
    pub token: String,
    /// Operator profile.
    pub admin: AdminProfile,
    /// Token lifetime in seconds.
    #[serde(rename = "expiresIn")]
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_role_permissions() {
        assert!(AdminRole::Admin.is_admin());
        assert!(AdminRole::SuperAdmin.is_admin());
        assert!(AdminRole::SuperAdmin.is_super_admin());
        assert!(!AdminRole::Admin.is_super_admin());
        assert!(!AdminRole::Member.is_admin());
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(
            serde_json::to_string(&AdminRole::SuperAdmin).unwrap(),
            "\"super-admin\""
        );
        let role: AdminRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, AdminRole::Admin);
        assert!(serde_json::from_str::<AdminRole>("\"root\"").is_err());
    }

    #[test]
    fn test_claims_new_sets_correct_fields() {
        let expires_at = Utc::now() + Duration::hours(1);
        let claims = Claims::new("admin@admin.com", AdminRole::SuperAdmin, expires_at);

        assert_eq!(claims.subject(), "admin@admin.com");
        assert_eq!(claims.role, AdminRole::SuperAdmin);
        assert!(claims.iat <= Utc::now().timestamp());
        assert_eq!(claims.exp, expires_at.timestamp());
    }

    #[test]
    fn test_profile_uses_camel_case() {
        let profile = AdminProfile {
            id: "1".into(),
            email: "admin@admin.com".into(),
            name: "Administrator".into(),
            role: AdminRole::Admin,
            last_login: None,
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["role"], "admin");
        assert!(value.get("lastLogin").is_none());
    }
}
