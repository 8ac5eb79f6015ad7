//! Seeded mock data.
//!
//! The same seed and reference time always produce the same users, sounds
//! and gift codes. Each collection draws from its own RNG stream, so asking
//! for more sounds does not change the generated users.

use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use sleepdash_shared::types::{GiftCodeId, SoundId, UserId};

use crate::gift_codes::{GiftCode, GiftCodeKind, GiftCodeStatus, random_code};
use crate::sounds::{Sound, SoundCategory, SoundStatus};
use crate::users::{SubscriptionStatus, SubscriptionTier, User};

const FIRST_NAMES: &[&str] = &[
    "Sarah", "Michael", "Emma", "James", "Olivia", "Liam", "Ava", "Noah", "Sophia", "Lucas",
    "Mia", "Ethan", "Isabella", "Mason", "Amelia", "Logan",
];
const LAST_NAMES: &[&str] = &[
    "Johnson", "Chen", "Wilson", "Garcia", "Martinez", "Brown", "Davis", "Lopez", "Kim",
    "Patel", "Nguyen", "Taylor",
];
const EMAIL_DOMAINS: &[&str] = &["email.com", "tech.com", "creative.org", "mail.net"];
const SOUND_MOODS: &[&str] = &[
    "Gentle", "Deep", "Distant", "Soft", "Midnight", "Calm", "Warm", "Endless",
];
const SOUND_SUBJECTS: &[&str] = &[
    "Rain", "Forest", "Waves", "Thunder", "Fireplace", "Wind", "Drift", "Stream", "Cafe",
    "Delta Waves",
];
const CODE_PREFIXES: &[&str] = &["SLEEP", "DREAM", "REST", "CALM", "PEACE"];

const USER_STREAM: u64 = 1;
const SOUND_STREAM: u64 = 2;
const GIFT_CODE_STREAM: u64 = 3;
const BATCH_STREAM: u64 = 4;

/// Deterministic fixture generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fixtures {
    seed: u64,
}

impl Fixtures {
    /// Creates a generator for `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng(self, stream: u64) -> StdRng {
        StdRng::seed_from_u64(self.seed.wrapping_mul(31).wrapping_add(stream))
    }

    /// RNG for gift code batches issued after seeding.
    #[must_use]
    pub fn batch_rng(self) -> StdRng {
        self.rng(BATCH_STREAM)
    }

    /// Generates `count` users with unique emails.
    ///
    /// Every user shares `password_hash` so that seeding does not hash
    /// once per user.
    #[must_use]
    pub fn users(self, count: usize, password_hash: &str, now: DateTime<Utc>) -> Vec<User> {
        let mut rng = self.rng(USER_STREAM);
        (0..count)
            .map(|i| {
                let first = pick(&mut rng, FIRST_NAMES);
                let last = pick(&mut rng, LAST_NAMES);
                let domain = pick(&mut rng, EMAIL_DOMAINS);

                let tier = match rng.random_range(0..100) {
                    0..50 => SubscriptionTier::Free,
                    50..85 => SubscriptionTier::Premium,
                    _ => SubscriptionTier::Enterprise,
                };
                let status = match rng.random_range(0..100) {
                    0..70 => SubscriptionStatus::Active,
                    70..85 => SubscriptionStatus::Inactive,
                    _ => SubscriptionStatus::Trial,
                };

                let age_days = rng.random_range(1..365);
                let created_at = now - Duration::days(age_days);
                let idle_minutes = rng.random_range(0..age_days.min(30) * 24 * 60);

                User {
                    id: UserId::from_random_bytes(rng.random()),
                    name: format!("{first} {last}"),
                    email: format!(
                        "{}.{}{i}@{domain}",
                        first.to_lowercase(),
                        last.to_lowercase()
                    ),
                    password_hash: password_hash.to_string(),
                    subscription_status: status,
                    subscription_type: tier,
                    devices: rng.random_range(1..=4),
                    sleep_sessions: rng.random_range(0..300),
                    last_login: now - Duration::minutes(idle_minutes),
                    created_at,
                }
            })
            .collect()
    }

    /// Generates `count` sounds across all categories.
    #[must_use]
    pub fn sounds(self, count: usize, now: DateTime<Utc>) -> Vec<Sound> {
        let mut rng = self.rng(SOUND_STREAM);
        (0..count)
            .map(|_| {
                let id = SoundId::from_random_bytes(rng.random());
                let plays = rng.random_range(1_000..21_000);
                Sound {
                    id,
                    name: format!(
                        "{} {}",
                        pick(&mut rng, SOUND_MOODS),
                        pick(&mut rng, SOUND_SUBJECTS)
                    ),
                    category: *pick(&mut rng, &SoundCategory::ALL),
                    duration_secs: rng.random_range(300..1_500),
                    premium: rng.random_bool(0.4),
                    plays,
                    likes: plays / rng.random_range(8..20),
                    file_url: format!("https://cdn.sleepdash.app/sounds/{id}.mp3"),
                    status: SoundStatus::Active,
                    created_at: now - Duration::days(rng.random_range(1..730)),
                }
            })
            .collect()
    }

    /// Generates `count` gift codes issued within 60 days of `today`.
    #[must_use]
    pub fn gift_codes(self, count: usize, today: NaiveDate) -> Vec<GiftCode> {
        const STATUSES: [GiftCodeStatus; 5] = [
            GiftCodeStatus::Active,
            GiftCodeStatus::Active,
            GiftCodeStatus::Active,
            GiftCodeStatus::Redeemed,
            GiftCodeStatus::Expired,
        ];

        let mut rng = self.rng(GIFT_CODE_STREAM);
        (0..count)
            .map(|i| {
                let kind = *pick(&mut rng, &GiftCodeKind::ALL);
                let status = *pick(&mut rng, &STATUSES);
                let created = today
                    .checked_sub_days(Days::new(rng.random_range(0..60)))
                    .unwrap_or(today);
                let redeemed = status == GiftCodeStatus::Redeemed;
                let prefix = pick(&mut rng, CODE_PREFIXES);
                let value = match kind {
                    GiftCodeKind::Discount => Decimal::from(rng.random_range(10_u32..60)),
                    other => other.default_value(),
                };

                GiftCode {
                    id: GiftCodeId::from_random_bytes(rng.random()),
                    code: random_code(&mut rng, prefix),
                    kind,
                    status,
                    created_date: created,
                    expires_date: created.checked_add_days(Days::new(30)).unwrap_or(created),
                    redeemed_by: redeemed.then(|| format!("user{i}@example.com")),
                    value,
                    max_uses: 1,
                    current_uses: u32::from(redeemed),
                }
            })
            .collect()
    }
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    // Callers only pass non-empty constant tables.
    items.choose(rng).unwrap_or(&items[0])
}
