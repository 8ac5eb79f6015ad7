//! Operator authentication.
//!
//! The dashboard has a single configured operator account. Its password is
//! hashed once at startup and checked with Argon2id on every login.

mod password;

pub use password::{PasswordError, hash_password, verify_password};
pub use sleepdash_shared::auth::AdminRole;

use chrono::{DateTime, Utc};
use sleepdash_shared::auth::AdminProfile;
use thiserror::Error;

/// Errors returned by [`AdminAccount::authenticate`].
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. The two are not distinguished.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The stored hash could not be checked.
    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// The configured operator account.
#[derive(Clone)]
pub struct AdminAccount {
    id: String,
    email: String,
    name: String,
    role: AdminRole,
    password_hash: String,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

impl AdminAccount {
    /// Creates the account, hashing the plaintext password.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::HashError` if hashing fails.
    pub fn new(email: &str, name: &str, password: &str) -> Result<Self, PasswordError> {
        Ok(Self {
            id: "admin".to_string(),
            email: email.trim().to_lowercase(),
            name: name.to_string(),
            role: AdminRole::SuperAdmin,
            password_hash: hash_password(password)?,
        })
    }

    /// Operator email, lowercased.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Operator role.
    #[must_use]
    pub const fn role(&self) -> AdminRole {
        self.role
    }

    /// Checks credentials and returns the profile for this login.
    ///
    /// Email comparison ignores case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on any mismatch.
    pub fn authenticate(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<AdminProfile, AuthError> {
        if !email.trim().eq_ignore_ascii_case(&self.email) {
            return Err(AuthError::InvalidCredentials);
        }
        if !verify_password(password, &self.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(self.profile(Some(now)))
    }

    /// Public profile of the account.
    #[must_use]
    pub fn profile(&self, last_login: Option<DateTime<Utc>>) -> AdminProfile {
        AdminProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            role: self.role,
            last_login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> AdminAccount {
        AdminAccount::new("Admin@Admin.com", "Administrator", "admin123").unwrap()
    }

    #[test]
    fn test_authenticate_success() {
        let now = Utc::now();
        let profile = account().authenticate(" admin@admin.com ", "admin123", now).unwrap();

        assert_eq!(profile.email, "admin@admin.com");
        assert_eq!(profile.name, "Administrator");
        assert!(profile.role.is_super_admin());
        assert_eq!(profile.last_login, Some(now));
    }

    #[test]
    fn test_authenticate_rejects_wrong_password() {
        let result = account().authenticate("admin@admin.com", "admin124", Utc::now());
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_authenticate_rejects_unknown_email() {
        let result = account().authenticate("root@admin.com", "admin123", Utc::now());
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[test]
    fn test_debug_hides_hash() {
        let debug = format!("{:?}", account());
        assert!(!debug.contains("argon2"));
    }
}
