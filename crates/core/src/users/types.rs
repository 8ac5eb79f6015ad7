//! App user data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sleepdash_shared::types::UserId;

use crate::raw;

/// Billing state of a user's subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Paying or free account in good standing.
    Active,
    /// Lapsed or suspended.
    Inactive,
    /// Trial period, the state of every new account.
    #[default]
    Trial,
}

impl SubscriptionStatus {
    /// Label shown in the users table.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Trial => "Trial",
        }
    }

    /// CSS class of the status badge.
    #[must_use]
    pub const fn badge_class(self) -> &'static str {
        match self {
            Self::Active => "status-active",
            Self::Inactive => "status-inactive",
            Self::Trial => "status-trial",
        }
    }
}

/// Subscription plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    /// No charge.
    #[default]
    Free,
    /// Individual paid plan.
    Premium,
    /// Business plan.
    Enterprise,
}

impl SubscriptionTier {
    /// All tiers, cheapest first.
    pub const ALL: [Self; 3] = [Self::Free, Self::Premium, Self::Enterprise];

    /// Label shown in the users table.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::Premium => "Premium",
            Self::Enterprise => "Enterprise",
        }
    }

    /// Monthly list price in USD.
    #[must_use]
    pub fn monthly_price(self) -> Decimal {
        match self {
            Self::Free => Decimal::ZERO,
            Self::Premium => dec!(9.99),
            Self::Enterprise => dec!(49.99),
        }
    }

    /// Price label such as `$9.99/mo`.
    #[must_use]
    pub fn price_label(self) -> String {
        format!("${}/mo", self.monthly_price())
    }

    /// Returns true for tiers that are billed.
    #[must_use]
    pub const fn is_paid(self) -> bool {
        matches!(self, Self::Premium | Self::Enterprise)
    }
}

/// An app user as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User ID.
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Unique email.
    pub email: String,
    /// Argon2 hash, never sent over the wire.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Billing state.
    #[serde(default)]
    pub subscription_status: SubscriptionStatus,
    /// Plan tier.
    #[serde(default)]
    pub subscription_type: SubscriptionTier,
    /// Registered devices.
    #[serde(default = "default_devices")]
    pub devices: u32,
    /// Recorded sleep sessions.
    #[serde(default)]
    pub sleep_sessions: u64,
    /// Last login time.
    pub last_login: DateTime<Utc>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

fn default_devices() -> u32 {
    1
}

/// Fields required to create a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Email, must be unique.
    pub email: String,
    /// Plaintext password.
    pub password: String,
    /// Optional initial status, defaults to trial.
    #[serde(default)]
    pub subscription_status: Option<SubscriptionStatus>,
    /// Optional initial tier, defaults to free.
    #[serde(default)]
    pub subscription_type: Option<SubscriptionTier>,
}

impl NewUser {
    /// Checks required fields.
    ///
    /// # Errors
    ///
    /// Returns a human readable message for the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        let email = self.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err("email is invalid".to_string()),
        }
        if self.password.is_empty() {
            return Err("password is required".to_string());
        }
        Ok(())
    }
}

impl User {
    /// Reads a user from an untyped upstream record.
    ///
    /// Missing fields take display defaults: name `Unknown User`, one
    /// device, zero sessions, and `now` for timestamps. The tier falls
    /// back to the legacy `subscription` field, and when no status is
    /// given a paid tier counts as active. Returns `None` when the record
    /// has no usable id.
    #[must_use]
    pub fn from_raw(raw: &Value, now: DateTime<Utc>) -> Option<Self> {
        let id = raw::string(raw, "_id")
            .or_else(|| raw::string(raw, "id"))?
            .parse()
            .ok()?;

        let tier = raw::typed::<SubscriptionTier>(raw, "subscriptionType")
            .or_else(|| raw::typed(raw, "subscription"))
            .unwrap_or_default();
        let status = raw::typed(raw, "subscriptionStatus").unwrap_or(if tier.is_paid() {
            SubscriptionStatus::Active
        } else {
            SubscriptionStatus::Inactive
        });

        let created_at = raw::typed(raw, "createdAt").unwrap_or(now);
        Some(Self {
            id,
            name: raw::string(raw, "name").unwrap_or("Unknown User").to_string(),
            email: raw::string(raw, "email").unwrap_or_default().to_string(),
            password_hash: String::new(),
            subscription_status: status,
            subscription_type: tier,
            devices: raw::count(raw, "devices")
                .and_then(|d| u32::try_from(d).ok())
                .filter(|d| *d > 0)
                .unwrap_or(1),
            sleep_sessions: raw::count(raw, "sleepSessionsCount")
                .or_else(|| raw::count(raw, "sleepSessions"))
                .unwrap_or(0),
            last_login: raw::typed(raw, "lastLogin").unwrap_or(created_at),
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_display() {
        assert_eq!(SubscriptionStatus::Active.badge_class(), "status-active");
        assert_eq!(SubscriptionStatus::Trial.badge_class(), "status-trial");
        assert_eq!(SubscriptionStatus::Inactive.display_name(), "Inactive");
    }

    #[test]
    fn test_tier_prices() {
        assert_eq!(SubscriptionTier::Free.price_label(), "$0/mo");
        assert_eq!(SubscriptionTier::Premium.price_label(), "$9.99/mo");
        assert_eq!(SubscriptionTier::Enterprise.price_label(), "$49.99/mo");
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            name: "Sarah".into(),
            email: "sarah@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            subscription_status: SubscriptionStatus::Active,
            subscription_type: SubscriptionTier::Premium,
            devices: 2,
            sleep_sessions: 40,
            last_login: now,
            created_at: now,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["subscriptionType"], "premium");
        assert_eq!(value["_id"], user.id.to_string());
    }

    #[test]
    fn test_from_raw_applies_defaults() {
        let now = Utc::now();
        let id = UserId::new();
        let user = User::from_raw(&json!({ "_id": id.to_string() }), now).unwrap();

        assert_eq!(user.name, "Unknown User");
        assert_eq!(user.devices, 1);
        assert_eq!(user.sleep_sessions, 0);
        assert_eq!(user.subscription_type, SubscriptionTier::Free);
        assert_eq!(user.subscription_status, SubscriptionStatus::Inactive);
        assert_eq!(user.created_at, now);
    }

    #[test]
    fn test_from_raw_reads_legacy_fields() {
        let raw = json!({
            "id": UserId::new().to_string(),
            "name": "John",
            "subscription": "premium",
            "sleepSessionsCount": 156,
            "devices": 0
        });
        let user = User::from_raw(&raw, Utc::now()).unwrap();

        assert_eq!(user.subscription_type, SubscriptionTier::Premium);
        assert_eq!(user.subscription_status, SubscriptionStatus::Active);
        assert_eq!(user.sleep_sessions, 156);
        assert_eq!(user.devices, 1);
    }

    #[test]
    fn test_from_raw_requires_id() {
        assert!(User::from_raw(&json!({ "name": "x" }), Utc::now()).is_none());
        assert!(User::from_raw(&json!({ "_id": "64f0c2" }), Utc::now()).is_none());
    }

    #[test]
    fn test_new_user_validation() {
        let mut new_user = NewUser {
            name: "Emma".into(),
            email: "emma@creative.org".into(),
            password: "pw".into(),
            subscription_status: None,
            subscription_type: None,
        };
        assert!(new_user.validate().is_ok());

        new_user.email = "emma".into();
        assert_eq!(new_user.validate().unwrap_err(), "email is invalid");
    }
}
