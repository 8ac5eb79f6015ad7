//! Aggregate figures for the users and subscriptions pages.

use rust_decimal::Decimal;
use serde::Serialize;

use super::types::{SubscriptionStatus, SubscriptionTier, User};

/// Session count above which a user is highly engaged.
pub const HIGH_ENGAGEMENT_SESSIONS: u64 = 100;
/// Session count above which a user is moderately engaged.
pub const MEDIUM_ENGAGEMENT_SESSIONS: u64 = 50;

/// Users with an active subscription status.
#[must_use]
pub fn active_count(users: &[User]) -> u64 {
    count_where(users, |u| u.subscription_status == SubscriptionStatus::Active)
}

/// Users on a paid tier.
#[must_use]
pub fn premium_count(users: &[User]) -> u64 {
    count_where(users, |u| u.subscription_type.is_paid())
}

/// Users on an active paid plan.
#[must_use]
pub fn active_subscription_count(users: &[User]) -> u64 {
    count_where(users, |u| {
        u.subscription_status == SubscriptionStatus::Active && u.subscription_type.is_paid()
    })
}

/// Sum of list prices across all users, rounded to whole dollars.
#[must_use]
pub fn monthly_revenue(users: &[User]) -> Decimal {
    users
        .iter()
        .map(|u| u.subscription_type.monthly_price())
        .sum::<Decimal>()
        .round()
}

/// Unrounded revenue per tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevenueByTier {
    /// Always zero.
    pub free: Decimal,
    /// Premium users times the premium price.
    pub premium: Decimal,
    /// Enterprise users times the enterprise price.
    pub enterprise: Decimal,
}

/// Revenue split by plan tier.
#[must_use]
pub fn revenue_by_tier(users: &[User]) -> RevenueByTier {
    let for_tier = |tier: SubscriptionTier| {
        Decimal::from(count_where(users, |u| u.subscription_type == tier)) * tier.monthly_price()
    };
    RevenueByTier {
        free: for_tier(SubscriptionTier::Free),
        premium: for_tier(SubscriptionTier::Premium),
        enterprise: for_tier(SubscriptionTier::Enterprise),
    }
}

/// Users bucketed by recorded sleep sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Engagement {
    /// More than 100 sessions.
    pub high: u64,
    /// 51 to 100 sessions.
    pub medium: u64,
    /// 50 sessions or fewer.
    pub low: u64,
}

/// Engagement buckets across all users.
#[must_use]
pub fn engagement(users: &[User]) -> Engagement {
    users.iter().fold(Engagement::default(), |mut acc, u| {
        match u.sleep_sessions {
            s if s > HIGH_ENGAGEMENT_SESSIONS => acc.high += 1,
            s if s > MEDIUM_ENGAGEMENT_SESSIONS => acc.medium += 1,
            _ => acc.low += 1,
        }
        acc
    })
}

/// Estimated sleep quality score, 75 to 100.
///
/// A base of 75, plus 10 for premium or 15 for enterprise, plus one point
/// per 30 sessions up to 10.
#[must_use]
pub fn sleep_quality_score(user: &User) -> u8 {
    let tier_bonus: u8 = match user.subscription_type {
        SubscriptionTier::Free => 0,
        SubscriptionTier::Premium => 10,
        SubscriptionTier::Enterprise => 15,
    };
    let session_bonus = u8::try_from((user.sleep_sessions / 30).min(10)).unwrap_or(10);
    (75 + tier_bonus + session_bonus).min(100)
}

fn count_where(users: &[User], pred: impl Fn(&User) -> bool) -> u64 {
    users.iter().filter(|u| pred(u)).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use sleepdash_shared::types::UserId;

    fn user(tier: SubscriptionTier, status: SubscriptionStatus, sessions: u64) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            name: "Test".into(),
            email: "test@example.com".into(),
            password_hash: String::new(),
            subscription_status: status,
            subscription_type: tier,
            devices: 1,
            sleep_sessions: sessions,
            last_login: now,
            created_at: now,
        }
    }

    fn sample() -> Vec<User> {
        use SubscriptionStatus::{Active, Inactive, Trial};
        use SubscriptionTier::{Enterprise, Free, Premium};
        vec![
            user(Premium, Active, 156),
            user(Free, Active, 23),
            user(Enterprise, Active, 89),
            user(Premium, Inactive, 50),
            user(Free, Trial, 51),
        ]
    }

    #[test]
    fn test_counts() {
        let users = sample();
        assert_eq!(active_count(&users), 3);
        assert_eq!(premium_count(&users), 3);
        assert_eq!(active_subscription_count(&users), 2);
    }

    #[test]
    fn test_monthly_revenue_rounds() {
        // 9.99 + 49.99 + 9.99 = 69.97
        assert_eq!(monthly_revenue(&sample()), dec!(70));
        assert_eq!(monthly_revenue(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_revenue_by_tier() {
        let split = revenue_by_tier(&sample());
        assert_eq!(split.free, Decimal::ZERO);
        assert_eq!(split.premium, dec!(19.98));
        assert_eq!(split.enterprise, dec!(49.99));
    }

    #[test]
    fn test_engagement_boundaries() {
        assert_eq!(
            engagement(&sample()),
            Engagement { high: 1, medium: 2, low: 2 }
        );
    }

    #[rstest]
    #[case(SubscriptionTier::Free, 0, 75)]
    #[case(SubscriptionTier::Free, 29, 75)]
    #[case(SubscriptionTier::Free, 30, 76)]
    #[case(SubscriptionTier::Premium, 156, 90)]
    #[case(SubscriptionTier::Enterprise, 300, 100)]
    #[case(SubscriptionTier::Enterprise, 10_000, 100)]
    fn test_sleep_quality_score(
        #[case] tier: SubscriptionTier,
        #[case] sessions: u64,
        #[case] expected: u8,
    ) {
        assert_eq!(
            sleep_quality_score(&user(tier, SubscriptionStatus::Active, sessions)),
            expected
        );
    }

    proptest! {
        #[test]
        fn test_engagement_partitions_users(sessions in prop::collection::vec(0u64..500, 0..40)) {
            let users: Vec<User> = sessions
                .iter()
                .map(|s| user(SubscriptionTier::Free, SubscriptionStatus::Active, *s))
                .collect();
            let e = engagement(&users);
            prop_assert_eq!(e.high + e.medium + e.low, users.len() as u64);
        }
    }
}
